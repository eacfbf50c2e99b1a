use crate::{CellRect, GridSize, Rect, Size};

/// A lightweight, serializable snapshot of the viewport geometry.
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ViewportState {
    pub rect: Rect,
    pub buffer_margin: f64,
}

/// The reported content extent.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContentState {
    pub size: Size,
    /// `true` once the last column and row have both been loaded at least once since the last
    /// rebuild, i.e. the size is no longer an estimate.
    pub exact: bool,
}

/// What a host needs to redraw or restore a view: viewport, content, and the loaded window.
///
/// Restoring only applies the viewport; the window is rebuilt from it.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrameState {
    pub viewport: ViewportState,
    pub content: ContentState,
    pub grid: GridSize,
    pub window: Option<CellRect>,
}
