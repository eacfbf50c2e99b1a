use alloc::sync::Arc;

use crate::error::{self, Result};
use crate::{Margins, Spacing};

/// Default extent of a column whose width cannot be resolved.
pub const DEFAULT_COLUMN_WIDTH: f64 = 50.0;
/// Default extent of a row whose height cannot be resolved.
pub const DEFAULT_ROW_HEIGHT: f64 = 50.0;
/// Delay between the last polish and the start of prefetching into the buffer.
pub const DEFAULT_BUFFER_DELAY_MS: u64 = 300;

/// Returns the width of a column (or the height of a row) by index.
///
/// Non-positive and NaN results are replaced by the configured default.
pub type SizeProvider = Arc<dyn Fn(usize) -> f64 + Send + Sync>;

/// A callback fired when an observable property of the view changes.
pub type OnChangeCallback = Arc<dyn Fn(ChangeEvent) + Send + Sync>;

/// Observable property changes.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ChangeEvent {
    Rows(usize),
    Columns(usize),
    ContentWidth(f64),
    ContentHeight(f64),
}

/// Configuration for [`crate::TableView`].
///
/// Cheap to clone: providers and callbacks are stored in `Arc`s, so hosts can tweak a field and
/// call `TableView::set_options` without reallocating closures.
pub struct TableViewOptions {
    pub spacing: Spacing,
    pub margins: Margins,

    /// Extra area around the viewport that is prefetched once the viewport settles.
    ///
    /// `0.0` disables prefetching.
    pub buffer_margin: f64,
    /// How long the viewport must stay still before the buffer is loaded.
    pub buffer_delay_ms: u64,

    pub column_width_provider: Option<SizeProvider>,
    pub row_height_provider: Option<SizeProvider>,
    pub default_column_width: f64,
    pub default_row_height: f64,

    /// Hand unloaded items back to the factory as reusable.
    pub reuse_items: bool,

    /// Requests every item asynchronously. Useful to exercise the async code paths of a
    /// factory that normally completes synchronously.
    pub force_async: bool,

    pub on_change: Option<OnChangeCallback>,
}

impl Clone for TableViewOptions {
    fn clone(&self) -> Self {
        Self {
            spacing: self.spacing,
            margins: self.margins,
            buffer_margin: self.buffer_margin,
            buffer_delay_ms: self.buffer_delay_ms,
            column_width_provider: self.column_width_provider.clone(),
            row_height_provider: self.row_height_provider.clone(),
            default_column_width: self.default_column_width,
            default_row_height: self.default_row_height,
            reuse_items: self.reuse_items,
            force_async: self.force_async,
            on_change: self.on_change.clone(),
        }
    }
}

impl Default for TableViewOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl TableViewOptions {
    pub fn new() -> Self {
        Self {
            spacing: Spacing::default(),
            margins: Margins::default(),
            buffer_margin: 0.0,
            buffer_delay_ms: DEFAULT_BUFFER_DELAY_MS,
            column_width_provider: None,
            row_height_provider: None,
            default_column_width: DEFAULT_COLUMN_WIDTH,
            default_row_height: DEFAULT_ROW_HEIGHT,
            reuse_items: true,
            force_async: false,
            on_change: None,
        }
    }

    /// Checks the values the view setters would reject.
    pub fn validate(&self) -> Result<()> {
        error::check_spacing(self.spacing.column)?;
        error::check_spacing(self.spacing.row)?;
        for margin in [
            self.margins.left,
            self.margins.top,
            self.margins.right,
            self.margins.bottom,
        ] {
            error::check_margin(margin)?;
        }
        error::check_buffer_margin(self.buffer_margin)?;
        error::check_default_size(self.default_column_width)?;
        error::check_default_size(self.default_row_height)?;
        Ok(())
    }

    pub fn with_spacing(mut self, spacing: Spacing) -> Self {
        self.spacing = spacing;
        self
    }

    pub fn with_margins(mut self, margins: Margins) -> Self {
        self.margins = margins;
        self
    }

    pub fn with_buffer_margin(mut self, buffer_margin: f64) -> Self {
        self.buffer_margin = buffer_margin;
        self
    }

    pub fn with_buffer_delay_ms(mut self, delay_ms: u64) -> Self {
        self.buffer_delay_ms = delay_ms;
        self
    }

    pub fn with_column_width_provider(
        mut self,
        provider: Option<impl Fn(usize) -> f64 + Send + Sync + 'static>,
    ) -> Self {
        self.column_width_provider = provider.map(|f| Arc::new(f) as _);
        self
    }

    pub fn with_row_height_provider(
        mut self,
        provider: Option<impl Fn(usize) -> f64 + Send + Sync + 'static>,
    ) -> Self {
        self.row_height_provider = provider.map(|f| Arc::new(f) as _);
        self
    }

    pub fn with_default_cell_size(mut self, column_width: f64, row_height: f64) -> Self {
        self.default_column_width = column_width;
        self.default_row_height = row_height;
        self
    }

    pub fn with_reuse_items(mut self, reuse_items: bool) -> Self {
        self.reuse_items = reuse_items;
        self
    }

    pub fn with_force_async(mut self, force_async: bool) -> Self {
        self.force_async = force_async;
        self
    }

    pub fn with_on_change(
        mut self,
        on_change: Option<impl Fn(ChangeEvent) + Send + Sync + 'static>,
    ) -> Self {
        self.on_change = on_change.map(|f| Arc::new(f) as _);
        self
    }
}

impl core::fmt::Debug for TableViewOptions {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TableViewOptions")
            .field("spacing", &self.spacing)
            .field("margins", &self.margins)
            .field("buffer_margin", &self.buffer_margin)
            .field("buffer_delay_ms", &self.buffer_delay_ms)
            .field(
                "column_width_provider",
                &self.column_width_provider.is_some(),
            )
            .field("row_height_provider", &self.row_height_provider.is_some())
            .field("default_column_width", &self.default_column_width)
            .field("default_row_height", &self.default_row_height)
            .field("reuse_items", &self.reuse_items)
            .field("force_async", &self.force_async)
            .finish_non_exhaustive()
    }
}
