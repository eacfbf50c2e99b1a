//! Contracts for the collaborators a [`crate::TableView`] drives: the data source that knows the
//! grid size, and the factory that turns a linear index into an item.

use alloc::sync::Arc;

use crate::Size;

/// Load cycles a pooled item may go unused before [`ItemFactory::drain_pool`] destroys it.
/// One cycle per grid dimension.
pub const MAX_POOL_TIME: usize = 2;

/// The backing data source. Only its shape matters to the view.
pub trait DataSource {
    fn row_count(&self) -> usize;
    fn column_count(&self) -> usize;
}

/// Shared handle to the data source attached to a view.
pub type DataSourceRef = Arc<dyn DataSource + Send + Sync>;

/// How eagerly the factory should produce an item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CreateMode {
    /// The item must be returned from `create`.
    Synchronous,
    /// The factory may answer [`Creation::Pending`] and finish later.
    Asynchronous,
    /// Synchronous, unless the factory itself is being driven asynchronously.
    AsynchronousIfNested,
}

/// Whether a released item may be kept for reuse.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Reusable {
    Yes,
    No,
}

/// Result of [`ItemFactory::create`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Creation<I> {
    /// A newly created item.
    Ready(I),
    /// An item taken from the factory's reuse pool and rebound to the index.
    Reused(I),
    /// Creation is in progress. The host calls [`crate::TableView::on_creation_completed`]
    /// once it is done; the view then asks for the same index again.
    Pending,
    /// The factory produced something that cannot be used as a cell item. The view hands it
    /// back with [`ItemFactory::release`] and shows a placeholder instead.
    Unusable(I),
    /// Creation failed. The view shows a placeholder instead.
    Failed,
}

/// Result of [`ItemFactory::release`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Released {
    Destroyed,
    /// The factory kept the underlying object (reuse pool, externally owned objects, ...).
    Pooled,
}

/// Produces and recycles the items shown in cells.
///
/// `Item` is the view's handle to an object the factory owns (an id, a node key, a shared
/// pointer). The view never inspects it; it only stores it, lays out its geometry, and gives
/// it back.
///
/// The `item_*` methods are notification hooks for per-item bookkeeping. They are not
/// consulted for control flow.
pub trait ItemFactory {
    type Item;

    fn create(&mut self, index: usize, mode: CreateMode) -> Creation<Self::Item>;

    fn release(&mut self, index: usize, item: &Self::Item, reusable: Reusable) -> Released;

    /// Abandons a pending creation. Best effort.
    fn cancel(&mut self, index: usize);

    /// The size the item would like to have. Used to size columns and rows when no size
    /// provider is configured.
    fn implicit_size(&self, item: &Self::Item) -> Size;

    /// Called after each completed edge load. Pooled items that have not been reused for more
    /// than `max_pool_time` loads should be destroyed.
    fn drain_pool(&mut self, max_pool_time: usize) {
        let _ = max_pool_time;
    }

    fn item_initialized(&mut self, index: usize, item: &Self::Item) {
        let _ = (index, item);
    }

    fn item_pooled(&mut self, index: usize, item: &Self::Item) {
        let _ = (index, item);
    }

    fn item_reused(&mut self, index: usize, item: &Self::Item) {
        let _ = (index, item);
    }
}

/// A structural change reported by the data source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ModelChangeKind {
    RowsInserted,
    RowsRemoved,
    RowsMoved,
    ColumnsInserted,
    ColumnsRemoved,
    ColumnsMoved,
    Reset,
}

/// A change notification. `nested` changes concern children of a cell (tree models) and do not
/// affect the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModelChange {
    pub kind: ModelChangeKind,
    pub nested: bool,
}

impl ModelChange {
    pub const fn top_level(kind: ModelChangeKind) -> Self {
        Self {
            kind,
            nested: false,
        }
    }

    pub const fn nested(kind: ModelChangeKind) -> Self {
        Self { kind, nested: true }
    }

    pub const fn reset() -> Self {
        Self::top_level(ModelChangeKind::Reset)
    }

    /// Whether the view must rebuild. Resets always do; other changes only at the top level.
    pub fn invalidates_grid(&self) -> bool {
        matches!(self.kind, ModelChangeKind::Reset) || !self.nested
    }
}
