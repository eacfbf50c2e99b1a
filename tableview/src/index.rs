use crate::Cell;

/// Number of columns and rows in the grid, as reported by the data source.
///
/// Cells map to the data source's linear index column by column:
/// `index = row + column * rows`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridSize {
    pub columns: usize,
    pub rows: usize,
}

impl GridSize {
    pub const EMPTY: Self = Self::new(0, 0);

    pub const fn new(columns: usize, rows: usize) -> Self {
        Self { columns, rows }
    }

    pub fn is_empty(&self) -> bool {
        self.columns == 0 || self.rows == 0
    }

    pub fn cell_count(&self) -> usize {
        self.columns.saturating_mul(self.rows)
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.column < self.columns && cell.row < self.rows
    }

    pub fn last_column(&self) -> Option<usize> {
        self.columns.checked_sub(1)
    }

    pub fn last_row(&self) -> Option<usize> {
        self.rows.checked_sub(1)
    }

    pub fn cell_to_index(&self, cell: Cell) -> usize {
        assert!(
            self.contains(cell),
            "cell_to_index: {cell:?} outside grid {}x{}",
            self.columns,
            self.rows
        );
        cell.row + cell.column * self.rows
    }

    pub fn index_to_cell(&self, index: usize) -> Cell {
        assert!(self.rows > 0, "index_to_cell: grid has no rows");
        let cell = Cell::new(index / self.rows, index % self.rows);
        assert!(
            cell.column < self.columns,
            "index_to_cell: index {index} outside grid {}x{}",
            self.columns,
            self.rows
        );
        cell
    }
}
