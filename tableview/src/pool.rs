use alloc::vec::Vec;
use std::collections::HashMap;

use crate::{
    Cell, CreateMode, Creation, Diagnostic, Diagnostics, ItemFactory, Rect, Released, Reusable,
};

/// What a cell holds: the factory's item, or an empty placeholder owned by the view.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ItemHandle<I> {
    Item(I),
    Placeholder,
}

impl<I> ItemHandle<I> {
    pub fn item(&self) -> Option<&I> {
        match self {
            Self::Item(item) => Some(item),
            Self::Placeholder => None,
        }
    }
}

/// A materialized cell.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LoadedItem<I> {
    pub cell: Cell,
    /// Linear index in the data source.
    pub index: usize,
    pub handle: ItemHandle<I>,
    pub geometry: Rect,
    /// Items are hidden from creation until their edge is laid out.
    pub visible: bool,
}

impl<I> LoadedItem<I> {
    pub fn owns_placeholder(&self) -> bool {
        matches!(self.handle, ItemHandle::Placeholder)
    }

    pub fn item(&self) -> Option<&I> {
        self.handle.item()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Materialized {
    Ready,
    Pending,
}

/// Owns every materialized item, keyed by linear index.
#[derive(Clone, Debug)]
pub(crate) struct ItemPool<I> {
    items: HashMap<usize, LoadedItem<I>>,
}

impl<I> ItemPool<I> {
    pub(crate) fn new() -> Self {
        Self {
            items: HashMap::new(),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.items.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub(crate) fn get(&self, index: usize) -> Option<&LoadedItem<I>> {
        self.items.get(&index)
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut LoadedItem<I>> {
        self.items.get_mut(&index)
    }

    /// Asks the factory for the item at `index` and stores it, hidden, under that index.
    ///
    /// Failed or unusable creations are replaced by a placeholder so the window stays
    /// rectangular.
    pub(crate) fn materialize<F>(
        &mut self,
        factory: &mut F,
        cell: Cell,
        index: usize,
        mode: CreateMode,
        diagnostics: &mut Diagnostics,
    ) -> Materialized
    where
        F: ItemFactory<Item = I>,
    {
        debug_assert!(
            !self.items.contains_key(&index),
            "materialize: index {index} ({cell:?}) is already loaded"
        );

        let handle = match factory.create(index, mode) {
            Creation::Ready(item) => {
                factory.item_initialized(index, &item);
                ItemHandle::Item(item)
            }
            Creation::Reused(item) => {
                factory.item_reused(index, &item);
                ItemHandle::Item(item)
            }
            Creation::Pending => {
                vtrace!(index, column = cell.column, row = cell.row, "item pending");
                return Materialized::Pending;
            }
            Creation::Unusable(item) => {
                vwarn!(index, "factory returned an unusable item, using a placeholder");
                Self::release_item(factory, index, &item, Reusable::No);
                diagnostics.record(Diagnostic::PlaceholderSubstituted {
                    index,
                    unusable: true,
                });
                ItemHandle::Placeholder
            }
            Creation::Failed => {
                vwarn!(index, "failed loading index, using a placeholder");
                diagnostics.record(Diagnostic::PlaceholderSubstituted {
                    index,
                    unusable: false,
                });
                ItemHandle::Placeholder
            }
        };

        vtrace!(index, column = cell.column, row = cell.row, "item ready");
        self.items.insert(
            index,
            LoadedItem {
                cell,
                index,
                handle,
                geometry: Rect::default(),
                visible: false,
            },
        );
        Materialized::Ready
    }

    /// Removes the item at `index` and hands it back to the factory.
    pub(crate) fn unload<F>(&mut self, factory: &mut F, index: usize, reusable: Reusable)
    where
        F: ItemFactory<Item = I>,
    {
        let Some(loaded) = self.items.remove(&index) else {
            debug_assert!(false, "unload: index {index} is not loaded");
            return;
        };
        Self::release(factory, loaded, reusable);
    }

    /// Releases every item, in index order. The map is emptied before the first release.
    pub(crate) fn release_all<F>(&mut self, factory: &mut F)
    where
        F: ItemFactory<Item = I>,
    {
        let mut snapshot: Vec<LoadedItem<I>> = self.items.drain().map(|(_, item)| item).collect();
        snapshot.sort_unstable_by_key(|item| item.index);
        vdebug!(count = snapshot.len(), "release_all");
        for loaded in snapshot {
            Self::release(factory, loaded, Reusable::No);
        }
    }

    /// Drops the bookkeeping without talking to a factory (used when the factory itself goes
    /// away).
    pub(crate) fn forget_all(&mut self) {
        self.items.clear();
    }

    fn release<F>(factory: &mut F, loaded: LoadedItem<I>, reusable: Reusable)
    where
        F: ItemFactory<Item = I>,
    {
        if let ItemHandle::Item(item) = &loaded.handle {
            Self::release_item(factory, loaded.index, item, reusable);
        }
    }

    fn release_item<F>(factory: &mut F, index: usize, item: &I, reusable: Reusable)
    where
        F: ItemFactory<Item = I>,
    {
        match factory.release(index, item, reusable) {
            Released::Destroyed => {}
            Released::Pooled => factory.item_pooled(index, item),
        }
    }
}
