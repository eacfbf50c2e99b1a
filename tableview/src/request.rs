use alloc::vec::Vec;

use crate::{Cell, CellRect, CreateMode, Edge};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub(crate) enum RequestState {
    #[default]
    Inactive,
    Active,
    Done,
}

/// One in-flight edge load: an ordered run of cells materialized one by one.
///
/// The request can stop at any cell whose item is still pending and resume from there.
#[derive(Clone, Debug, Default)]
pub(crate) struct LoadRequest {
    /// `None` while loading the very first cell at the grid origin.
    edge: Option<Edge>,
    cells: Vec<Cell>,
    cursor: usize,
    mode: Option<CreateMode>,
    state: RequestState,
}

impl LoadRequest {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn begin_origin(&mut self, mode: CreateMode) {
        self.begin(None, alloc::vec![Cell::ORIGIN], mode);
    }

    /// Starts loading the line of cells just outside `window` on `edge`.
    pub(crate) fn begin_edge(&mut self, window: CellRect, edge: Edge, mode: CreateMode) {
        let cells = window.grown(edge).edge_cells(edge).collect();
        self.begin(Some(edge), cells, mode);
    }

    fn begin(&mut self, edge: Option<Edge>, cells: Vec<Cell>, mode: CreateMode) {
        debug_assert!(
            !self.is_active(),
            "begin: a load request is already active ({self:?})"
        );
        debug_assert!(!cells.is_empty(), "begin: empty cell sequence");
        self.edge = edge;
        self.cells = cells;
        self.cursor = 0;
        self.mode = Some(mode);
        self.state = RequestState::Active;
        vdebug!(?edge, len = self.cells.len(), ?mode, "load request begin");
    }

    pub(crate) fn is_active(&self) -> bool {
        self.state == RequestState::Active
    }

    pub(crate) fn edge(&self) -> Option<Edge> {
        self.edge
    }

    pub(crate) fn mode(&self) -> CreateMode {
        self.mode.unwrap_or(CreateMode::AsynchronousIfNested)
    }

    pub(crate) fn current_cell(&self) -> Option<Cell> {
        self.cells.get(self.cursor).copied()
    }

    pub(crate) fn move_to_next_cell(&mut self) {
        debug_assert!(self.cursor < self.cells.len(), "move_to_next_cell past the end");
        self.cursor += 1;
    }

    /// Cells this request has already materialized.
    pub(crate) fn loaded_cells(&self) -> &[Cell] {
        &self.cells[..self.cursor.min(self.cells.len())]
    }

    /// The window once every cell is loaded.
    pub(crate) fn merged_window(&self, window: Option<CellRect>) -> Option<CellRect> {
        let first = *self.cells.first()?;
        let last = *self.cells.last()?;
        match (self.edge, window) {
            (Some(Edge::Left | Edge::Top), Some(window)) => {
                Some(CellRect::new(first, window.bottom_right()))
            }
            (Some(Edge::Right | Edge::Bottom), Some(window)) => {
                Some(CellRect::new(window.top_left(), last))
            }
            _ => Some(CellRect::new(first, last)),
        }
    }

    pub(crate) fn mark_done(&mut self) {
        self.state = RequestState::Done;
    }

    /// Public view of the active request.
    pub(crate) fn info(&self) -> Option<LoadRequestInfo> {
        self.is_active().then(|| LoadRequestInfo {
            edge: self.edge,
            cursor: self.cursor,
            len: self.cells.len(),
            mode: self.mode(),
        })
    }
}

/// Snapshot of the active load request, see [`crate::TableView::load_request`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LoadRequestInfo {
    /// `None` for the initial load of the origin cell.
    pub edge: Option<Edge>,
    /// Index of the next cell to materialize.
    pub cursor: usize,
    pub len: usize,
    pub mode: CreateMode,
}
