#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const ZERO: Self = Self::new(0.0, 0.0);

    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// An axis-aligned rectangle in content coordinates.
///
/// `right()`/`bottom()` are exclusive (`x + width`, `y + height`).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_corners(top_left: Point, bottom_right: Point) -> Self {
        Self::new(
            top_left.x,
            top_left.y,
            bottom_right.x - top_left.x,
            bottom_right.y - top_left.y,
        )
    }

    pub fn left(&self) -> f64 {
        self.x
    }

    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn top_left(&self) -> Point {
        Point::new(self.left(), self.top())
    }

    pub fn bottom_right(&self) -> Point {
        Point::new(self.right(), self.bottom())
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// A rect is valid when both dimensions are strictly positive (NaN is invalid).
    pub fn is_valid(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    pub fn move_left(&mut self, x: f64) {
        self.x = x;
    }

    pub fn move_top(&mut self, y: f64) {
        self.y = y;
    }

    /// Moves each side outward by the given amounts (negative values move inward).
    pub fn adjusted(&self, left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self::from_corners(
            Point::new(self.left() + left, self.top() + top),
            Point::new(self.right() + right, self.bottom() + bottom),
        )
    }

    /// Grows the rect by `margin` on all four sides.
    pub fn inflated(&self, margin: f64) -> Self {
        self.adjusted(-margin, -margin, margin, margin)
    }

    pub fn united(&self, other: &Rect) -> Self {
        Self::from_corners(
            Point::new(self.left().min(other.left()), self.top().min(other.top())),
            Point::new(
                self.right().max(other.right()),
                self.bottom().max(other.bottom()),
            ),
        )
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Margins {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Margins {
    pub const fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub const fn uniform(margin: f64) -> Self {
        Self::new(margin, margin, margin, margin)
    }
}

/// Space between neighbouring columns (`column`) and rows (`row`).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Spacing {
    pub column: f64,
    pub row: f64,
}

impl Spacing {
    pub const fn new(column: f64, row: f64) -> Self {
        Self { column, row }
    }
}

/// A logical cell coordinate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    pub column: usize,
    pub row: usize,
}

impl Cell {
    pub const ORIGIN: Self = Self::new(0, 0);

    pub const fn new(column: usize, row: usize) -> Self {
        Self { column, row }
    }

    /// The neighbouring cell on the given side.
    ///
    /// Callers must not step past column/row 0.
    pub(crate) fn step(self, towards: Edge) -> Self {
        match towards {
            Edge::Left => Self::new(self.column - 1, self.row),
            Edge::Right => Self::new(self.column + 1, self.row),
            Edge::Top => Self::new(self.column, self.row - 1),
            Edge::Bottom => Self::new(self.column, self.row + 1),
        }
    }
}

/// One side of the loaded window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Edge {
    Left,
    Right,
    Top,
    Bottom,
}

impl Edge {
    /// Fixed evaluation order used when picking the next edge to load or unload.
    pub const ALL: [Edge; 4] = [Edge::Left, Edge::Right, Edge::Top, Edge::Bottom];

    /// `true` for edges that are whole columns (left/right).
    pub fn is_column(self) -> bool {
        matches!(self, Edge::Left | Edge::Right)
    }

    pub fn opposite(self) -> Edge {
        match self {
            Edge::Left => Edge::Right,
            Edge::Right => Edge::Left,
            Edge::Top => Edge::Bottom,
            Edge::Bottom => Edge::Top,
        }
    }
}

/// An inclusive rectangle of cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellRect {
    pub left: usize,
    pub top: usize,
    pub right: usize,
    pub bottom: usize,
}

impl CellRect {
    pub fn new(top_left: Cell, bottom_right: Cell) -> Self {
        debug_assert!(
            top_left.column <= bottom_right.column && top_left.row <= bottom_right.row,
            "CellRect: corners out of order ({top_left:?}, {bottom_right:?})"
        );
        Self {
            left: top_left.column,
            top: top_left.row,
            right: bottom_right.column,
            bottom: bottom_right.row,
        }
    }

    pub fn single(cell: Cell) -> Self {
        Self::new(cell, cell)
    }

    pub fn top_left(&self) -> Cell {
        Cell::new(self.left, self.top)
    }

    pub fn bottom_right(&self) -> Cell {
        Cell::new(self.right, self.bottom)
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.right - self.left + 1
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.bottom - self.top + 1
    }

    pub fn area(&self) -> usize {
        self.width() * self.height()
    }

    pub fn contains(&self, cell: Cell) -> bool {
        (self.left..=self.right).contains(&cell.column) && (self.top..=self.bottom).contains(&cell.row)
    }

    /// The cells along one side, in ascending order.
    pub fn edge_cells(&self, edge: Edge) -> impl Iterator<Item = Cell> + use<> {
        let (columns, rows) = match edge {
            Edge::Left => (self.left..=self.left, self.top..=self.bottom),
            Edge::Right => (self.right..=self.right, self.top..=self.bottom),
            Edge::Top => (self.left..=self.right, self.top..=self.top),
            Edge::Bottom => (self.left..=self.right, self.bottom..=self.bottom),
        };
        columns.flat_map(move |column| rows.clone().map(move |row| Cell::new(column, row)))
    }

    /// Iterates every cell, column by column.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + use<> {
        let rows = self.top..=self.bottom;
        (self.left..=self.right).flat_map(move |column| rows.clone().map(move |row| Cell::new(column, row)))
    }

    /// The rect with one more column/row on `edge`. Growing left/top requires a non-zero side.
    pub fn grown(&self, edge: Edge) -> Self {
        let mut next = *self;
        match edge {
            Edge::Left => next.left -= 1,
            Edge::Right => next.right += 1,
            Edge::Top => next.top -= 1,
            Edge::Bottom => next.bottom += 1,
        }
        next
    }

    /// The rect with the column/row on `edge` removed. The rect must be wider/taller than one.
    pub fn shrunk(&self, edge: Edge) -> Self {
        let mut next = *self;
        match edge {
            Edge::Left => next.left += 1,
            Edge::Right => next.right -= 1,
            Edge::Top => next.top += 1,
            Edge::Bottom => next.bottom -= 1,
        }
        next
    }
}

impl core::fmt::Display for CellRect {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "({},{}) -> ({},{})",
            self.left, self.top, self.right, self.bottom
        )
    }
}
