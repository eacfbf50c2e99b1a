use crate::pool::ItemPool;
use crate::{Cell, CellRect, Diagnostic, Diagnostics, GridSize, ItemFactory, SizeProvider};

/// Resolves column widths and row heights.
///
/// Each axis warns at most once until its provider is replaced, so a provider that keeps
/// returning garbage does not flood the diagnostics.
#[derive(Clone, Debug, Default)]
pub(crate) struct SizeResolver {
    column_warned: bool,
    row_warned: bool,
}

impl SizeResolver {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Re-arms the column warning (a new provider deserves its own diagnostic).
    pub(crate) fn reset_columns(&mut self) {
        self.column_warned = false;
    }

    pub(crate) fn reset_rows(&mut self) {
        self.row_warned = false;
    }

    pub(crate) fn column_width(
        &mut self,
        column: usize,
        provider: Option<&SizeProvider>,
        implicit: impl FnOnce() -> f64,
        fallback: f64,
        diagnostics: &mut Diagnostics,
    ) -> f64 {
        let (width, provided) = match provider {
            Some(provider) => (provider(column), true),
            None => (implicit(), false),
        };
        if is_usable(width) {
            return width;
        }

        if !self.column_warned {
            self.column_warned = true;
            if provided {
                vwarn!(column, width, "column width provider returned an invalid width");
                diagnostics.record(Diagnostic::InvalidColumnWidth { column, width });
            } else {
                vwarn!(column, "implicit width of the column items must be greater than zero");
                diagnostics.record(Diagnostic::ZeroImplicitWidth { column });
            }
        }
        fallback
    }

    pub(crate) fn row_height(
        &mut self,
        row: usize,
        provider: Option<&SizeProvider>,
        implicit: impl FnOnce() -> f64,
        fallback: f64,
        diagnostics: &mut Diagnostics,
    ) -> f64 {
        let (height, provided) = match provider {
            Some(provider) => (provider(row), true),
            None => (implicit(), false),
        };
        if is_usable(height) {
            return height;
        }

        if !self.row_warned {
            self.row_warned = true;
            if provided {
                vwarn!(row, height, "row height provider returned an invalid height");
                diagnostics.record(Diagnostic::InvalidRowHeight { row, height });
            } else {
                vwarn!(row, "implicit height of the row items must be greater than zero");
                diagnostics.record(Diagnostic::ZeroImplicitHeight { row });
            }
        }
        fallback
    }
}

/// Zero, negative, and NaN sizes would keep an edge from ever reaching its target rect.
fn is_usable(size: f64) -> bool {
    size > 0.0
}

/// Widest implicit width among the loaded items of `column`. Placeholders count as zero.
pub(crate) fn implicit_column_width<F: ItemFactory>(
    factory: &F,
    pool: &ItemPool<F::Item>,
    grid: GridSize,
    window: CellRect,
    column: usize,
) -> f64 {
    (window.top..=window.bottom)
        .filter_map(|row| pool.get(grid.cell_to_index(Cell::new(column, row))))
        .filter_map(|loaded| loaded.item())
        .map(|item| factory.implicit_size(item).width)
        .fold(0.0, f64::max)
}

/// Tallest implicit height among the loaded items of `row`.
pub(crate) fn implicit_row_height<F: ItemFactory>(
    factory: &F,
    pool: &ItemPool<F::Item>,
    grid: GridSize,
    window: CellRect,
    row: usize,
) -> f64 {
    (window.left..=window.right)
        .filter_map(|column| pool.get(grid.cell_to_index(Cell::new(column, row))))
        .filter_map(|loaded| loaded.item())
        .map(|item| factory.implicit_size(item).height)
        .fold(0.0, f64::max)
}
