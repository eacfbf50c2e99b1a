use alloc::boxed::Box;
use alloc::collections::VecDeque;
use core::fmt;
use std::collections::HashMap;

use tableview::{CreateMode, Creation, ItemFactory, Released, Reusable, Size};

/// Handle to an instance owned by a [`ReusePool`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemId(u64);

impl ItemId {
    pub fn get(self) -> u64 {
        self.0
    }
}

#[derive(Clone, Copy, Debug)]
struct PoolEntry {
    id: ItemId,
    /// Drains survived so far.
    age: usize,
}

type CreateFn<T> = Box<dyn FnMut(usize) -> T>;
type SizeFn<T> = Box<dyn Fn(&T) -> Size>;
type RebindFn<T> = Box<dyn FnMut(&mut T, usize)>;

/// A synchronous [`ItemFactory`] that recycles released instances.
///
/// Instances are built by a constructor closure and owned by the pool; the view only holds
/// [`ItemId`]s. Released reusable instances rest in the pool until the next `create` takes them
/// (oldest first) or until they sat through more than `max_pool_time` drains.
pub struct ReusePool<T> {
    create: CreateFn<T>,
    size: SizeFn<T>,
    rebind: Option<RebindFn<T>>,

    instances: HashMap<ItemId, T>,
    pool: VecDeque<PoolEntry>,
    next_id: u64,

    created: usize,
    reused: usize,
    destroyed: usize,
}

impl<T> ReusePool<T> {
    pub fn new(create: impl FnMut(usize) -> T + 'static, size: impl Fn(&T) -> Size + 'static) -> Self {
        Self {
            create: Box::new(create),
            size: Box::new(size),
            rebind: None,
            instances: HashMap::new(),
            pool: VecDeque::new(),
            next_id: 0,
            created: 0,
            reused: 0,
            destroyed: 0,
        }
    }

    /// Called with the new model index whenever a pooled instance is handed out again.
    pub fn with_rebind(mut self, rebind: impl FnMut(&mut T, usize) + 'static) -> Self {
        self.rebind = Some(Box::new(rebind));
        self
    }

    pub fn get(&self, id: ItemId) -> Option<&T> {
        self.instances.get(&id)
    }

    pub fn get_mut(&mut self, id: ItemId) -> Option<&mut T> {
        self.instances.get_mut(&id)
    }

    /// Instances built by the constructor.
    pub fn created(&self) -> usize {
        self.created
    }

    /// Instances taken from the pool instead of being built.
    pub fn reused(&self) -> usize {
        self.reused
    }

    pub fn destroyed(&self) -> usize {
        self.destroyed
    }

    pub fn pooled_len(&self) -> usize {
        self.pool.len()
    }

    /// Instances alive, pooled ones included.
    pub fn live_len(&self) -> usize {
        self.instances.len()
    }

    /// Destroys every pooled instance right away.
    pub fn clear_pool(&mut self) {
        while let Some(entry) = self.pool.pop_front() {
            self.destroy(entry.id);
        }
    }

    fn destroy(&mut self, id: ItemId) {
        if self.instances.remove(&id).is_some() {
            self.destroyed += 1;
        }
    }

    fn take_pooled(&mut self, index: usize) -> Option<ItemId> {
        let entry = self.pool.pop_front()?;
        if let (Some(rebind), Some(instance)) =
            (self.rebind.as_mut(), self.instances.get_mut(&entry.id))
        {
            rebind(instance, index);
        }
        self.reused += 1;
        Some(entry.id)
    }
}

impl<T> ItemFactory for ReusePool<T> {
    type Item = ItemId;

    fn create(&mut self, index: usize, _mode: CreateMode) -> Creation<ItemId> {
        if let Some(id) = self.take_pooled(index) {
            return Creation::Reused(id);
        }

        let id = ItemId(self.next_id);
        self.next_id += 1;
        let instance = (self.create)(index);
        self.instances.insert(id, instance);
        self.created += 1;
        Creation::Ready(id)
    }

    fn release(&mut self, _index: usize, item: &ItemId, reusable: Reusable) -> Released {
        match reusable {
            Reusable::Yes if self.instances.contains_key(item) => {
                self.pool.push_back(PoolEntry { id: *item, age: 0 });
                Released::Pooled
            }
            _ => {
                self.destroy(*item);
                Released::Destroyed
            }
        }
    }

    // Creation is synchronous, nothing is ever in flight.
    fn cancel(&mut self, _index: usize) {}

    fn implicit_size(&self, item: &ItemId) -> Size {
        match self.instances.get(item) {
            Some(instance) => (self.size)(instance),
            None => Size::ZERO,
        }
    }

    fn drain_pool(&mut self, max_pool_time: usize) {
        let mut kept = VecDeque::with_capacity(self.pool.len());
        while let Some(mut entry) = self.pool.pop_front() {
            if entry.age < max_pool_time {
                entry.age += 1;
                kept.push_back(entry);
            } else {
                self.destroy(entry.id);
            }
        }
        self.pool = kept;
    }
}

impl<T> fmt::Debug for ReusePool<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReusePool")
            .field("live", &self.instances.len())
            .field("pooled", &self.pool.len())
            .field("created", &self.created)
            .field("reused", &self.reused)
            .field("destroyed", &self.destroyed)
            .finish_non_exhaustive()
    }
}
