//! A headless, virtualized grid engine.
//!
//! For host-side utilities (an event/clock driven controller and a recycling item factory),
//! see the `tableview-adapter` crate.
//!
//! Given a grid of `columns x rows` cells backed by a possibly huge data source, a
//! [`TableView`] keeps a small rectangular window of materialized cells that covers the
//! viewport, plus an optional prefetch buffer. As the viewport moves it loads and unloads whole
//! rows and columns, one edge at a time:
//! - cells are requested from an [`ItemFactory`], synchronously or asynchronously,
//! - a load waiting on an asynchronous item can be resumed or cancelled (with rollback),
//! - column widths and row heights come from providers or from the items' implicit sizes,
//! - the total content size is estimated from the loaded sample and becomes exact once the
//!   grid boundary is reached.
//!
//! It is UI-agnostic. The host provides the viewport rect, the data source shape, the item
//! factory, and a clock (see [`TableView::tick`]).
#![forbid(unsafe_code)]

extern crate alloc;

#[macro_use]
mod macros;

mod diagnostics;
mod edges;
mod error;
mod extent;
mod factory;
mod index;
mod layout;
mod options;
mod pool;
mod request;
mod size;
mod state;
mod table_view;
mod types;

#[cfg(test)]
mod tests;

pub use diagnostics::{Diagnostic, Diagnostics};
pub use error::{Result, TableViewError};
pub use factory::{
    CreateMode, Creation, DataSource, DataSourceRef, ItemFactory, MAX_POOL_TIME, ModelChange,
    ModelChangeKind, Released, Reusable,
};
pub use index::GridSize;
pub use options::{
    ChangeEvent, DEFAULT_BUFFER_DELAY_MS, DEFAULT_COLUMN_WIDTH, DEFAULT_ROW_HEIGHT,
    OnChangeCallback, SizeProvider, TableViewOptions,
};
pub use pool::{ItemHandle, LoadedItem};
pub use request::LoadRequestInfo;
pub use state::{ContentState, FrameState, ViewportState};
pub use table_view::{TableView, TickOutcome};
pub use types::{Cell, CellRect, Edge, Margins, Point, Rect, Size, Spacing};
