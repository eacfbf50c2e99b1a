use crate::pool::ItemPool;
use crate::size::{self, SizeResolver};
use crate::{Cell, CellRect, Diagnostics, Edge, GridSize, ItemFactory, Point, Rect, TableViewOptions};

/// How far inside the content the window is moved when it drifted to negative coordinates
/// away from the grid origin. Leaves room to flick back.
pub(crate) const FLICK_MARGIN: f64 = 50.0;

/// Derived geometry of the loaded window.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct WindowRects {
    /// Union of the top-left and bottom-right items.
    pub(crate) outer: Rect,
    /// From the top-left item's bottom-right corner to the bottom-right item's top-left corner.
    /// Once this passes outside a target rect, so has the edge row/column.
    pub(crate) inner: Rect,
}

impl WindowRects {
    pub(crate) fn sync<I>(pool: &ItemPool<I>, grid: GridSize, window: CellRect) -> Self {
        let geometry = |cell: Cell| {
            let index = grid.cell_to_index(cell);
            match pool.get(index) {
                Some(loaded) => loaded.geometry,
                None => {
                    debug_assert!(false, "window corner {cell:?} (index {index}) is not loaded");
                    Rect::default()
                }
            }
        };
        let top_left = geometry(window.top_left());
        let bottom_right = geometry(window.bottom_right());
        Self {
            outer: top_left.united(&bottom_right),
            inner: Rect::from_corners(top_left.bottom_right(), bottom_right.top_left()),
        }
    }
}

/// One layout step over the loaded window. Borrows everything it touches for its duration.
pub(crate) struct LayoutPass<'a, F: ItemFactory> {
    pub(crate) factory: &'a F,
    pub(crate) pool: &'a mut ItemPool<F::Item>,
    pub(crate) grid: GridSize,
    pub(crate) window: CellRect,
    pub(crate) options: &'a TableViewOptions,
    pub(crate) sizes: &'a mut SizeResolver,
    pub(crate) diagnostics: &'a mut Diagnostics,
}

impl<F: ItemFactory> LayoutPass<'_, F> {
    pub(crate) fn column_width(&mut self, column: usize) -> f64 {
        debug_assert!(
            (self.window.left..=self.window.right).contains(&column),
            "column_width: column {column} outside {}",
            self.window
        );
        let (factory, pool, grid, window) = (self.factory, &*self.pool, self.grid, self.window);
        self.sizes.column_width(
            column,
            self.options.column_width_provider.as_ref(),
            || size::implicit_column_width(factory, pool, grid, window, column),
            self.options.default_column_width,
            self.diagnostics,
        )
    }

    pub(crate) fn row_height(&mut self, row: usize) -> f64 {
        debug_assert!(
            (self.window.top..=self.window.bottom).contains(&row),
            "row_height: row {row} outside {}",
            self.window
        );
        let (factory, pool, grid, window) = (self.factory, &*self.pool, self.grid, self.window);
        self.sizes.row_height(
            row,
            self.options.row_height_provider.as_ref(),
            || size::implicit_row_height(factory, pool, grid, window, row),
            self.options.default_row_height,
            self.diagnostics,
        )
    }

    /// Lays out every loaded item from `origin`: columns left to right, then rows top to bottom.
    pub(crate) fn relayout_items(&mut self, origin: Point) {
        let spacing = self.options.spacing;

        let mut next_x = origin.x;
        for column in self.window.left..=self.window.right {
            let width = self.column_width(column);
            for row in self.window.top..=self.window.bottom {
                self.update(Cell::new(column, row), |geometry| {
                    geometry.move_left(next_x);
                    geometry.width = width;
                });
            }
            next_x += width + spacing.column;
        }

        let mut next_y = origin.y;
        for row in self.window.top..=self.window.bottom {
            let height = self.row_height(row);
            for column in self.window.left..=self.window.right {
                self.update(Cell::new(column, row), |geometry| {
                    geometry.move_top(next_y);
                    geometry.height = height;
                });
            }
            next_y += height + spacing.row;
        }

        vtrace!(window = %self.window, "relayout");
    }

    /// Lays out a freshly merged edge from the neighbours one step inward, and shows it.
    pub(crate) fn layout_edge(&mut self, edge: Edge) {
        let spacing = self.options.spacing;
        let inward = edge.opposite();

        if edge.is_column() {
            let column = if edge == Edge::Left {
                self.window.left
            } else {
                self.window.right
            };
            let width = self.column_width(column);
            let mut left = None;

            for row in self.window.top..=self.window.bottom {
                let cell = Cell::new(column, row);
                let neighbour = self.geometry(cell.step(inward));
                let x = *left.get_or_insert(match edge {
                    Edge::Left => neighbour.left() - spacing.column - width,
                    _ => neighbour.right() + spacing.column,
                });
                self.place(cell, Rect::new(x, neighbour.top(), width, neighbour.height));
            }
        } else {
            let row = if edge == Edge::Top {
                self.window.top
            } else {
                self.window.bottom
            };
            let height = self.row_height(row);
            let mut top = None;

            for column in self.window.left..=self.window.right {
                let cell = Cell::new(column, row);
                let neighbour = self.geometry(cell.step(inward));
                let y = *top.get_or_insert(match edge {
                    Edge::Top => neighbour.top() - spacing.row - height,
                    _ => neighbour.bottom() + spacing.row,
                });
                self.place(cell, Rect::new(neighbour.left(), y, neighbour.width, height));
            }
        }
    }

    /// Anchors the grid origin at the top-left margins.
    pub(crate) fn layout_top_left_item(&mut self) {
        debug_assert_eq!(
            self.window,
            CellRect::single(Cell::ORIGIN),
            "layout_top_left_item on a non-origin window"
        );
        let margins = self.options.margins;
        let width = self.column_width(0);
        let height = self.row_height(0);
        self.place(
            Cell::ORIGIN,
            Rect::new(margins.left, margins.top, width, height),
        );
    }

    fn geometry(&self, cell: Cell) -> Rect {
        let index = self.grid.cell_to_index(cell);
        match self.pool.get(index) {
            Some(loaded) => loaded.geometry,
            None => {
                debug_assert!(false, "neighbour {cell:?} (index {index}) is not loaded");
                Rect::default()
            }
        }
    }

    fn place(&mut self, cell: Cell, geometry: Rect) {
        let index = self.grid.cell_to_index(cell);
        if let Some(loaded) = self.pool.get_mut(index) {
            loaded.geometry = geometry;
            loaded.visible = true;
            vtrace!(column = cell.column, row = cell.row, ?geometry, "layout item");
        } else {
            debug_assert!(false, "place: {cell:?} (index {index}) is not loaded");
        }
    }

    fn update(&mut self, cell: Cell, f: impl FnOnce(&mut Rect)) {
        let index = self.grid.cell_to_index(cell);
        if let Some(loaded) = self.pool.get_mut(index) {
            f(&mut loaded.geometry);
        } else {
            debug_assert!(false, "relayout: {cell:?} (index {index}) is not loaded");
        }
    }
}

/// Where the outer rect must move so that row/column 0 sits on the margins and the window
/// never hangs off the negative side of the content. `None` when it is already in place.
///
/// A negative leading margin puts row/column 0 itself below zero, so drift is measured
/// against the lower of the margin and zero.
pub(crate) fn origin_correction(
    outer: Rect,
    window: CellRect,
    options: &TableViewOptions,
) -> Option<Point> {
    let margins = options.margins;
    let mut origin = outer.top_left();
    let mut moved = false;

    if window.left == 0 && outer.left() != margins.left {
        origin.x = margins.left;
        moved = true;
    } else if outer.left() < margins.left.min(0.0) {
        origin.x = FLICK_MARGIN;
        moved = true;
    }

    if window.top == 0 && outer.top() != margins.top {
        origin.y = margins.top;
        moved = true;
    } else if outer.top() < margins.top.min(0.0) {
        origin.y = FLICK_MARGIN;
        moved = true;
    }

    moved.then_some(origin)
}
