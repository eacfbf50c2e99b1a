use alloc::format;
use alloc::string::String;
use alloc::sync::Arc;

use crate::edges::EdgeProbe;
use crate::error::{self, Result};
use crate::extent::{AxisSample, ExtentEstimator};
use crate::layout::{self, LayoutPass, WindowRects};
use crate::pool::{ItemPool, LoadedItem, Materialized};
use crate::request::{LoadRequest, LoadRequestInfo};
use crate::size::SizeResolver;
use crate::state::{ContentState, FrameState, ViewportState};
use crate::{
    Cell, CellRect, ChangeEvent, CreateMode, DataSourceRef, Diagnostics, Edge, GridSize,
    ItemFactory, MAX_POOL_TIME, Margins, ModelChange, Rect, Reusable, Size, SizeProvider, Spacing,
    TableViewOptions,
};

/// What a call to [`TableView::tick`] did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickOutcome {
    /// A scheduled polish ran.
    pub polished: bool,
    /// The prefetch timer fired and the buffer was loaded (or started loading).
    pub buffer_loaded: bool,
}

/// A virtualized grid.
///
/// Keeps a rectangular window of materialized cells covering the viewport (plus, once the
/// viewport settles, a prefetch buffer). Items come from an [`ItemFactory`]; the grid shape
/// comes from a [`crate::DataSource`].
///
/// The view is driven by its host:
/// - setters record a change and schedule a polish,
/// - [`TableView::polish`] (or [`TableView::tick`]) reconciles the window with the viewport,
/// - [`TableView::on_creation_completed`] resumes a load that was waiting on an
///   asynchronous item.
///
/// Edges are loaded one at a time, and a pending item suspends everything until it completes,
/// so the window is never half-loaded.
pub struct TableView<F: ItemFactory> {
    options: TableViewOptions,
    model: Option<DataSourceRef>,
    factory: Option<F>,

    grid: GridSize,
    viewport: Rect,
    window: Option<CellRect>,
    rects: WindowRects,
    pool: ItemPool<F::Item>,
    request: LoadRequest,
    sizes: SizeResolver,
    extent: ExtentEstimator,
    diagnostics: Diagnostics,

    invalid: bool,
    rebuilding: bool,
    layout_stale: bool,
    has_buffered_items: bool,
    pub(crate) polishing: bool,
    polish_scheduled: bool,

    now_ms: u64,
    buffer_deadline_ms: Option<u64>,
}

impl<F: ItemFactory> Default for TableView<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: ItemFactory> TableView<F> {
    pub fn new() -> Self {
        Self {
            options: TableViewOptions::new(),
            model: None,
            factory: None,
            grid: GridSize::EMPTY,
            viewport: Rect::default(),
            window: None,
            rects: WindowRects::default(),
            pool: ItemPool::new(),
            request: LoadRequest::new(),
            sizes: SizeResolver::new(),
            extent: ExtentEstimator::new(),
            diagnostics: Diagnostics::default(),
            invalid: true,
            rebuilding: false,
            layout_stale: false,
            has_buffered_items: false,
            polishing: false,
            polish_scheduled: false,
            now_ms: 0,
            buffer_deadline_ms: None,
        }
    }

    pub fn with_options(options: TableViewOptions) -> Result<Self> {
        options.validate()?;
        let mut view = Self::new();
        view.options = options;
        Ok(view)
    }

    pub fn options(&self) -> &TableViewOptions {
        &self.options
    }

    /// Replaces the options, relaying out or unloading the buffer as needed.
    ///
    /// Invalid options are rejected and leave the view untouched.
    pub fn set_options(&mut self, options: TableViewOptions) -> Result<()> {
        options.validate()?;

        let column_provider_changed = !same_provider(
            &self.options.column_width_provider,
            &options.column_width_provider,
        );
        let row_provider_changed =
            !same_provider(&self.options.row_height_provider, &options.row_height_provider);
        if column_provider_changed {
            self.sizes.reset_columns();
        }
        if row_provider_changed {
            self.sizes.reset_rows();
        }

        let layout_changed = column_provider_changed
            || row_provider_changed
            || self.options.spacing != options.spacing
            || self.options.margins != options.margins
            || self.options.default_column_width != options.default_column_width
            || self.options.default_row_height != options.default_row_height;
        let buffer_disabled = self.options.buffer_margin > 0.0 && options.buffer_margin == 0.0;

        self.options = options;
        if buffer_disabled {
            self.unload_buffer();
        }
        if layout_changed {
            self.invalidate_layout();
        } else {
            self.schedule_polish();
        }
        Ok(())
    }

    /// Clones the options, applies `f`, and sets them.
    pub fn update_options(&mut self, f: impl FnOnce(&mut TableViewOptions)) -> Result<()> {
        let mut next = self.options.clone();
        f(&mut next);
        self.set_options(next)
    }

    pub fn set_model(&mut self, model: Option<DataSourceRef>) {
        self.model = model;
        self.invalidate();
    }

    pub fn model(&self) -> Option<&DataSourceRef> {
        self.model.as_ref()
    }

    /// Installs a new factory and returns the previous one.
    ///
    /// Every loaded item is released to the previous factory first.
    pub fn set_factory(&mut self, factory: Option<F>) -> Option<F> {
        self.clear();
        let previous = core::mem::replace(&mut self.factory, factory);
        self.invalidate();
        previous
    }

    pub fn factory(&self) -> Option<&F> {
        self.factory.as_ref()
    }

    pub fn factory_mut(&mut self) -> Option<&mut F> {
        self.factory.as_mut()
    }

    /// Forces a full rebuild on the next polish. Cancels (and rolls back) an active load.
    pub fn invalidate(&mut self) {
        vdebug!("invalidate");
        self.invalid = true;
        self.cancel_load_request();
        self.schedule_polish();
    }

    /// Reacts to a structural change of the data source. Any top-level change rebuilds the
    /// whole window; changes below the top level are ignored.
    pub fn model_changed(&mut self, change: ModelChange) {
        if !change.invalidates_grid() {
            vtrace!(?change, "ignoring nested model change");
            return;
        }
        vdebug!(?change, "model changed");
        self.invalidate();
    }

    pub fn set_viewport(&mut self, viewport: Rect) {
        if viewport == self.viewport {
            return;
        }
        self.viewport = viewport;
        self.schedule_polish();
    }

    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    pub fn set_row_spacing(&mut self, spacing: f64) -> Result<()> {
        let spacing = error::check_spacing(spacing)?;
        self.set_spacing(Spacing::new(self.options.spacing.column, spacing))
    }

    pub fn set_column_spacing(&mut self, spacing: f64) -> Result<()> {
        let spacing = error::check_spacing(spacing)?;
        self.set_spacing(Spacing::new(spacing, self.options.spacing.row))
    }

    pub fn set_spacing(&mut self, spacing: Spacing) -> Result<()> {
        error::check_spacing(spacing.column)?;
        error::check_spacing(spacing.row)?;
        if spacing == self.options.spacing {
            return Ok(());
        }
        self.options.spacing = spacing;
        self.invalidate_layout();
        Ok(())
    }

    pub fn set_margins(&mut self, margins: Margins) -> Result<()> {
        for margin in [margins.left, margins.top, margins.right, margins.bottom] {
            error::check_margin(margin)?;
        }
        if margins == self.options.margins {
            return Ok(());
        }
        self.options.margins = margins;
        self.invalidate_layout();
        Ok(())
    }

    /// Sets the prefetch margin. `0.0` drops the buffered cells right away.
    pub fn set_buffer_margin(&mut self, margin: f64) -> Result<()> {
        let margin = error::check_buffer_margin(margin)?;
        if margin == self.options.buffer_margin {
            return Ok(());
        }
        self.options.buffer_margin = margin;
        if margin == 0.0 {
            self.unload_buffer();
        }
        self.schedule_polish();
        Ok(())
    }

    pub fn set_column_width_provider(&mut self, provider: Option<SizeProvider>) {
        self.options.column_width_provider = provider;
        self.sizes.reset_columns();
        self.invalidate_layout();
    }

    pub fn set_row_height_provider(&mut self, provider: Option<SizeProvider>) {
        self.options.row_height_provider = provider;
        self.sizes.reset_rows();
        self.invalidate_layout();
    }

    /// Whether unloaded items are handed back as reusable. Takes effect on the next unload.
    pub fn set_reuse_items(&mut self, reuse: bool) {
        self.options.reuse_items = reuse;
    }

    pub fn schedule_polish(&mut self) {
        self.polish_scheduled = true;
    }

    pub fn is_polish_scheduled(&self) -> bool {
        self.polish_scheduled
    }

    /// Reconciles the loaded window with the current inputs.
    ///
    /// A call made while a polish is already running is deferred to the next cycle.
    pub fn polish(&mut self) {
        if self.polishing {
            self.polish_scheduled = true;
            return;
        }
        self.polish_scheduled = false;
        self.polishing = true;
        self.update_polish();
        self.polishing = false;
    }

    /// Advances the view's clock to `now_ms`: runs a scheduled polish, then fires the prefetch
    /// timer if it is due.
    pub fn tick(&mut self, now_ms: u64) -> TickOutcome {
        self.now_ms = self.now_ms.max(now_ms);
        let mut outcome = TickOutcome::default();

        if self.polish_scheduled {
            self.polish();
            outcome.polished = true;
        }

        if let Some(deadline) = self.buffer_deadline_ms {
            if self.now_ms >= deadline {
                self.buffer_deadline_ms = None;
                self.load_buffer();
                outcome.buffer_loaded = true;
            }
        }

        outcome
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// When the prefetch timer fires, if armed.
    pub fn buffer_deadline_ms(&self) -> Option<u64> {
        self.buffer_deadline_ms
    }

    /// Resumes the active load once the factory finished creating the item at `index`.
    ///
    /// Signals for any other index are ignored.
    pub fn on_creation_completed(&mut self, index: usize) {
        let expected = self
            .request
            .current_cell()
            .filter(|_| self.request.is_active())
            .map(|cell| self.grid.cell_to_index(cell));
        if expected != Some(index) {
            vtrace!(index, ?expected, "ignoring stale creation signal");
            return;
        }

        vdebug!(index, "item done loading");
        self.process_load_request();
        self.load_and_unload_visible_edges();
        self.polish();
    }

    pub fn rows(&self) -> usize {
        self.grid.rows
    }

    pub fn columns(&self) -> usize {
        self.grid.columns
    }

    pub fn grid(&self) -> GridSize {
        self.grid
    }

    pub fn loaded_window(&self) -> Option<CellRect> {
        self.window
    }

    pub fn loaded_item_count(&self) -> usize {
        self.pool.len()
    }

    /// The loaded item at `cell`, if `cell` is inside the loaded window.
    pub fn loaded_item(&self, cell: Cell) -> Option<&LoadedItem<F::Item>> {
        let window = self.window?;
        if !window.contains(cell) {
            return None;
        }
        self.pool.get(self.grid.cell_to_index(cell))
    }

    pub fn cell_geometry(&self, cell: Cell) -> Option<Rect> {
        self.loaded_item(cell).map(|loaded| loaded.geometry)
    }

    /// Visits every item of the loaded window, column by column.
    pub fn for_each_loaded_item(&self, mut f: impl FnMut(&LoadedItem<F::Item>)) {
        let Some(window) = self.window else {
            return;
        };
        for cell in window.cells() {
            if let Some(loaded) = self.pool.get(self.grid.cell_to_index(cell)) {
                f(loaded);
            }
        }
    }

    pub fn content_width(&self) -> f64 {
        self.extent.width.reported()
    }

    pub fn content_height(&self) -> f64 {
        self.extent.height.reported()
    }

    pub fn content_size(&self) -> Size {
        Size::new(self.content_width(), self.content_height())
    }

    pub fn has_buffered_items(&self) -> bool {
        self.has_buffered_items
    }

    pub fn load_request(&self) -> Option<LoadRequestInfo> {
        self.request.info()
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn clear_diagnostics(&mut self) {
        self.diagnostics.clear();
    }

    /// One-line description of the window, used in assertion messages and logs.
    pub fn layout_summary(&self) -> String {
        let window = match self.window {
            Some(window) => format!("{window}"),
            None => String::from("empty"),
        };
        format!(
            "table {}x{}, loaded {window}, outer {:?}, inner {:?}, viewport {:?}, request {:?}",
            self.grid.columns,
            self.grid.rows,
            self.rects.outer,
            self.rects.inner,
            self.viewport,
            self.request.info(),
        )
    }

    pub fn frame_state(&self) -> FrameState {
        FrameState {
            viewport: ViewportState {
                rect: self.viewport,
                buffer_margin: self.options.buffer_margin,
            },
            content: ContentState {
                size: self.content_size(),
                exact: self.extent.width.is_exact() && self.extent.height.is_exact(),
            },
            grid: self.grid,
            window: self.window,
        }
    }

    /// Applies a saved viewport. The window follows on the next polish.
    pub fn restore_viewport_state(&mut self, state: ViewportState) -> Result<()> {
        self.set_buffer_margin(state.buffer_margin)?;
        self.set_viewport(state.rect);
        Ok(())
    }

    fn update_polish(&mut self) {
        if self.request.is_active() {
            // Loading an edge is atomic. on_creation_completed polishes again when it is done.
            return;
        }

        if !self.viewport.is_valid() {
            vtrace!(viewport = ?self.viewport, "viewport not valid, skipping polish");
            return;
        }

        if self.invalid {
            self.begin_rebuild();
            if self.request.is_active() {
                return;
            }
        }

        if self.rebuilding {
            self.end_rebuild();
        }

        if self.pool.is_empty() {
            vdebug!("no items loaded, empty model or no factory");
            return;
        }

        if self.layout_stale {
            self.relayout();
        }

        if self.has_buffered_items && self.next_edge_to_load(self.viewport).is_some() {
            // More edges are coming in; trim the buffer first so they are not loaded on top of it.
            self.unload_buffer();
        }

        self.load_and_unload_visible_edges();

        if self.request.is_active() {
            return;
        }

        if self.options.buffer_margin > 0.0 {
            self.buffer_deadline_ms = Some(self.now_ms.saturating_add(self.options.buffer_delay_ms));
        }
    }

    fn begin_rebuild(&mut self) {
        vdebug!("begin rebuild");
        self.clear();
        self.invalid = false;
        self.rebuilding = true;
        self.calculate_grid_size();
        self.load_initial_top_left_item();
        self.load_and_unload_visible_edges();
    }

    fn end_rebuild(&mut self) {
        self.rebuilding = false;

        if self.pool.is_empty() {
            let margins = self.options.margins;
            let width = self.extent.width.force((margins.left + margins.right).max(0.0));
            let height = self.extent.height.force((margins.top + margins.bottom).max(0.0));
            self.publish_width(width);
            self.publish_height(height);
            return;
        }

        self.relayout();
        vdebug!(summary = %self.layout_summary(), "rebuild done");
    }

    /// Releases everything and forgets the window. Leaves the view invalid.
    fn clear(&mut self) {
        self.invalid = true;
        self.rebuilding = false;
        self.cancel_load_request();

        match self.factory.as_mut() {
            Some(factory) => self.pool.release_all(factory),
            None => self.pool.forget_all(),
        }
        self.window = None;
        self.rects = WindowRects::default();
        self.extent.reset();
        self.has_buffered_items = false;
        self.buffer_deadline_ms = None;
    }

    fn calculate_grid_size(&mut self) {
        let previous = self.grid;
        self.grid = match &self.model {
            Some(model) => GridSize::new(model.column_count(), model.row_count()),
            None => GridSize::EMPTY,
        };

        if previous.columns != self.grid.columns {
            self.emit(ChangeEvent::Columns(self.grid.columns));
        }
        if previous.rows != self.grid.rows {
            self.emit(ChangeEvent::Rows(self.grid.rows));
        }
    }

    fn load_initial_top_left_item(&mut self) {
        table_assert!(self, self.pool.is_empty(), "items loaded before the origin");

        if self.grid.is_empty() || self.factory.is_none() {
            return;
        }

        self.request.begin_origin(CreateMode::AsynchronousIfNested);
        self.process_load_request();
    }

    fn load_edge(&mut self, edge: Edge, mode: CreateMode) {
        let Some(window) = self.window else {
            return;
        };
        self.request.begin_edge(window, edge, mode);
        self.process_load_request();
    }

    fn unload_edge(&mut self, edge: Edge) {
        let Some(window) = self.window else {
            return;
        };
        table_assert!(
            self,
            if edge.is_column() {
                window.width() > 1
            } else {
                window.height() > 1
            },
            "unloading the last line on {edge:?}"
        );

        let reusable = self.reusable();
        if let Some(factory) = self.factory.as_mut() {
            for cell in window.edge_cells(edge) {
                self.pool
                    .unload(factory, self.grid.cell_to_index(cell), reusable);
            }
        }
        self.window = Some(window.shrunk(edge));
        self.sync_rects();
        vdebug!(?edge, window = ?self.window, "edge unloaded");
    }

    /// Materializes the remaining cells of the active request. Stops at the first pending
    /// item; otherwise merges the new line into the window and lays it out.
    fn process_load_request(&mut self) {
        table_assert!(
            self,
            self.request.is_active(),
            "process_load_request without an active request"
        );

        let Some(factory) = self.factory.as_mut() else {
            return;
        };
        let mode = if self.options.force_async {
            CreateMode::Asynchronous
        } else {
            self.request.mode()
        };

        while let Some(cell) = self.request.current_cell() {
            let index = self.grid.cell_to_index(cell);
            match self
                .pool
                .materialize(factory, cell, index, mode, &mut self.diagnostics)
            {
                Materialized::Pending => return,
                Materialized::Ready => self.request.move_to_next_cell(),
            }
        }

        self.window = self.request.merged_window(self.window);
        self.layout_request_edge();
        self.sync_rects();
        self.enforce_origin();
        self.update_content_size();
        self.request.mark_done();
        vdebug!(edge = ?self.request.edge(), window = ?self.window, "load request completed");

        if let Some(factory) = self.factory.as_mut() {
            factory.drain_pool(MAX_POOL_TIME);
        }
    }

    /// Abandons the active request and unloads whatever it already created.
    fn cancel_load_request(&mut self) {
        if !self.request.is_active() {
            return;
        }
        self.request.mark_done();

        let reusable = self.reusable();
        let Some(factory) = self.factory.as_mut() else {
            return;
        };
        if let Some(cell) = self.request.current_cell() {
            factory.cancel(self.grid.cell_to_index(cell));
        }
        for &cell in self.request.loaded_cells() {
            self.pool
                .unload(factory, self.grid.cell_to_index(cell), reusable);
        }
        vdebug!(
            edge = ?self.request.edge(),
            rolled_back = self.request.loaded_cells().len(),
            "load request cancelled"
        );
    }

    fn load_and_unload_visible_edges(&mut self) {
        if self.request.is_active() {
            return;
        }
        if self.pool.is_empty() {
            return;
        }

        let unload_rect = if self.has_buffered_items {
            self.buffer_rect()
        } else {
            self.viewport
        };

        loop {
            let mut modified = false;

            if let Some(edge) = self.next_edge_to_unload(unload_rect) {
                modified = true;
                self.unload_edge(edge);
            }

            if let Some(edge) = self.next_edge_to_load(self.viewport) {
                modified = true;
                self.load_edge(edge, CreateMode::AsynchronousIfNested);
                if self.request.is_active() {
                    return;
                }
            }

            if !modified {
                break;
            }
        }
    }

    fn load_buffer(&mut self) {
        if self.options.buffer_margin <= 0.0 || self.request.is_active() || self.pool.is_empty() {
            return;
        }

        vdebug!(buffer_margin = self.options.buffer_margin, "loading buffer");
        let rect = self.buffer_rect();
        while let Some(edge) = self.next_edge_to_load(rect) {
            self.load_edge(edge, CreateMode::Asynchronous);
            if self.request.is_active() {
                break;
            }
        }

        self.has_buffered_items = true;
    }

    fn unload_buffer(&mut self) {
        if !self.has_buffered_items {
            return;
        }

        vdebug!("unloading buffer");
        self.has_buffered_items = false;
        self.buffer_deadline_ms = None;
        self.cancel_load_request();
        while let Some(edge) = self.next_edge_to_unload(self.viewport) {
            self.unload_edge(edge);
        }
    }

    fn buffer_rect(&self) -> Rect {
        self.viewport.inflated(self.options.buffer_margin)
    }

    fn invalidate_layout(&mut self) {
        self.layout_stale = true;
        self.schedule_polish();
    }

    /// Full relayout, then a fresh content size estimate.
    fn relayout(&mut self) {
        self.layout_stale = false;
        let Some(window) = self.window else {
            return;
        };
        let origin = layout::origin_correction(self.rects.outer, window, &self.options)
            .unwrap_or_else(|| self.rects.outer.top_left());
        if let Some(mut pass) = self.layout_pass() {
            pass.relayout_items(origin);
        }
        self.sync_rects();
        self.extent.reset();
        self.update_content_size();
    }

    fn layout_request_edge(&mut self) {
        let edge = self.request.edge();
        let Some(mut pass) = self.layout_pass() else {
            return;
        };
        match edge {
            Some(edge) => pass.layout_edge(edge),
            None => pass.layout_top_left_item(),
        }
    }

    fn enforce_origin(&mut self) {
        let Some(window) = self.window else {
            return;
        };
        let Some(origin) = layout::origin_correction(self.rects.outer, window, &self.options)
        else {
            return;
        };
        vdebug!(?origin, "moving window back to the content origin");
        if let Some(mut pass) = self.layout_pass() {
            pass.relayout_items(origin);
        }
        self.sync_rects();
    }

    fn layout_pass(&mut self) -> Option<LayoutPass<'_, F>> {
        Some(LayoutPass {
            factory: self.factory.as_ref()?,
            pool: &mut self.pool,
            grid: self.grid,
            window: self.window?,
            options: &self.options,
            sizes: &mut self.sizes,
            diagnostics: &mut self.diagnostics,
        })
    }

    fn sync_rects(&mut self) {
        self.rects = match self.window {
            Some(window) => WindowRects::sync(&self.pool, self.grid, window),
            None => WindowRects::default(),
        };
    }

    fn probe(&self) -> Option<EdgeProbe> {
        Some(EdgeProbe {
            grid: self.grid,
            window: self.window?,
            rects: self.rects,
            spacing: self.options.spacing,
        })
    }

    fn next_edge_to_load(&self, target: Rect) -> Option<Edge> {
        self.probe()?.next_edge_to_load(target)
    }

    fn next_edge_to_unload(&self, target: Rect) -> Option<Edge> {
        self.probe()?.next_edge_to_unload(target)
    }

    fn update_content_size(&mut self) {
        let Some(window) = self.window else {
            return;
        };
        let outer = self.rects.outer;
        let spacing = self.options.spacing;
        let margins = self.options.margins;

        let width = self.extent.width.update(AxisSample {
            last_loaded: window.right,
            count: self.grid.columns,
            far_edge: outer.right(),
            spacing: spacing.column,
            trailing_margin: margins.right,
        });
        let height = self.extent.height.update(AxisSample {
            last_loaded: window.bottom,
            count: self.grid.rows,
            far_edge: outer.bottom(),
            spacing: spacing.row,
            trailing_margin: margins.bottom,
        });
        self.publish_width(width);
        self.publish_height(height);
    }

    fn publish_width(&self, width: Option<f64>) {
        if let Some(width) = width {
            vtrace!(width, "content width");
            self.emit(ChangeEvent::ContentWidth(width));
        }
    }

    fn publish_height(&self, height: Option<f64>) {
        if let Some(height) = height {
            vtrace!(height, "content height");
            self.emit(ChangeEvent::ContentHeight(height));
        }
    }

    fn emit(&self, event: ChangeEvent) {
        if let Some(on_change) = &self.options.on_change {
            on_change(event);
        }
    }

    fn reusable(&self) -> Reusable {
        if self.options.reuse_items {
            Reusable::Yes
        } else {
            Reusable::No
        }
    }
}

impl<F: ItemFactory> Drop for TableView<F> {
    fn drop(&mut self) {
        self.cancel_load_request();
        if let Some(factory) = self.factory.as_mut() {
            self.pool.release_all(factory);
        }
    }
}

impl<F: ItemFactory> core::fmt::Debug for TableView<F> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TableView")
            .field("grid", &self.grid)
            .field("viewport", &self.viewport)
            .field("window", &self.window)
            .field("loaded_items", &self.pool.len())
            .field("request", &self.request.info())
            .field("invalid", &self.invalid)
            .field("polish_scheduled", &self.polish_scheduled)
            .field("has_buffered_items", &self.has_buffered_items)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

fn same_provider(a: &Option<SizeProvider>, b: &Option<SizeProvider>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => Arc::ptr_eq(a, b),
        _ => false,
    }
}
