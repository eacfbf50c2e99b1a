/// Configuration values rejected by [`crate::TableView`] setters.
///
/// A rejected value leaves the view unchanged.
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
pub enum TableViewError {
    /// Spacing must be finite and non-negative.
    #[error("invalid spacing: {0}")]
    InvalidSpacing(f64),

    /// Margins must be finite. Negative margins are allowed.
    #[error("invalid margin: {0}")]
    InvalidMargin(f64),

    /// The prefetch buffer margin must be finite and non-negative.
    #[error("invalid buffer margin: {0}")]
    InvalidBufferMargin(f64),

    /// Fallback cell sizes must be finite and positive, or edges would never fill a rect.
    #[error("invalid default cell size: {0}")]
    InvalidDefaultSize(f64),
}

/// Convenience alias used by the fallible setters.
pub type Result<T> = core::result::Result<T, TableViewError>;

pub(crate) fn check_spacing(spacing: f64) -> Result<f64> {
    if spacing.is_finite() && spacing >= 0.0 {
        Ok(spacing)
    } else {
        Err(TableViewError::InvalidSpacing(spacing))
    }
}

pub(crate) fn check_margin(margin: f64) -> Result<f64> {
    if margin.is_finite() {
        Ok(margin)
    } else {
        Err(TableViewError::InvalidMargin(margin))
    }
}

pub(crate) fn check_buffer_margin(margin: f64) -> Result<f64> {
    if margin.is_finite() && margin >= 0.0 {
        Ok(margin)
    } else {
        Err(TableViewError::InvalidBufferMargin(margin))
    }
}

pub(crate) fn check_default_size(size: f64) -> Result<f64> {
    if size.is_finite() && size > 0.0 {
        Ok(size)
    } else {
        Err(TableViewError::InvalidDefaultSize(size))
    }
}
