use tableview::{
    DataSourceRef, ItemFactory, LoadedItem, ModelChange, Rect, TableView, TableViewOptions,
};

use crate::{ItemId, ReusePool};

/// Default quiet period after the last viewport event before scrolling is considered over.
pub const DEFAULT_SCROLL_RESET_DELAY_MS: u64 = 150;

/// What a [`Controller`] call did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TickReport {
    /// The view polished (reconciled its window with the viewport).
    pub polished: bool,
    /// The prefetch timer fired.
    pub buffer_loaded: bool,
    /// `is_scrolling` went back to `false` on this tick.
    pub scrolling_ended: bool,
}

/// A framework-neutral controller that drives a [`TableView`] from UI events and a clock.
///
/// It holds no UI objects. Adapters call:
/// - `on_viewport` when the scroll container moves or resizes
/// - `on_model_changed` / `on_item_created` when the data or the factory report back
/// - `tick(now_ms)` each frame/timer tick (scheduled polish, prefetch timer, `is_scrolling`
///   debouncing)
#[derive(Debug)]
pub struct Controller<F: ItemFactory> {
    view: TableView<F>,
    scrolling: bool,
    last_scroll_event_ms: Option<u64>,
    scroll_reset_delay_ms: u64,
}

impl<F: ItemFactory> Controller<F> {
    pub fn new(view: TableView<F>) -> Self {
        Self {
            view,
            scrolling: false,
            last_scroll_event_ms: None,
            scroll_reset_delay_ms: DEFAULT_SCROLL_RESET_DELAY_MS,
        }
    }

    /// Builds the view from its parts.
    pub fn from_parts(
        options: TableViewOptions,
        model: DataSourceRef,
        factory: F,
    ) -> tableview::Result<Self> {
        let mut view = TableView::with_options(options)?;
        view.set_model(Some(model));
        view.set_factory(Some(factory));
        Ok(Self::new(view))
    }

    pub fn view(&self) -> &TableView<F> {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut TableView<F> {
        &mut self.view
    }

    pub fn into_view(self) -> TableView<F> {
        self.view
    }

    pub fn is_scrolling(&self) -> bool {
        self.scrolling
    }

    pub fn scroll_reset_delay_ms(&self) -> u64 {
        self.scroll_reset_delay_ms
    }

    pub fn set_scroll_reset_delay_ms(&mut self, delay_ms: u64) {
        self.scroll_reset_delay_ms = delay_ms;
    }

    /// Call this when the scroll container reports a new visible rect (scroll or resize).
    ///
    /// The view polishes right away instead of waiting for the next tick, so the cells under
    /// the new viewport exist before the frame is drawn.
    pub fn on_viewport(&mut self, viewport: Rect, now_ms: u64) -> TickReport {
        if viewport != self.view.viewport() {
            self.last_scroll_event_ms = Some(now_ms);
            self.scrolling = true;
        }
        self.view.set_viewport(viewport);
        let outcome = self.view.tick(now_ms);
        TickReport {
            polished: outcome.polished,
            buffer_loaded: outcome.buffer_loaded,
            scrolling_ended: false,
        }
    }

    pub fn on_model_changed(&mut self, change: ModelChange) {
        #[cfg(feature = "tracing")]
        tracing::debug!(target: "tableview_adapter", ?change, "model changed");
        self.view.model_changed(change);
    }

    /// Call this when the factory finished an asynchronous item.
    pub fn on_item_created(&mut self, index: usize) {
        self.view.on_creation_completed(index);
    }

    /// Advances the controller clock.
    pub fn tick(&mut self, now_ms: u64) -> TickReport {
        let outcome = self.view.tick(now_ms);
        let scrolling_ended = self.update_scrolling(now_ms);
        TickReport {
            polished: outcome.polished,
            buffer_loaded: outcome.buffer_loaded,
            scrolling_ended,
        }
    }

    fn update_scrolling(&mut self, now_ms: u64) -> bool {
        if !self.scrolling {
            return false;
        }
        let Some(last) = self.last_scroll_event_ms else {
            return false;
        };
        if now_ms.saturating_sub(last) < self.scroll_reset_delay_ms {
            return false;
        }
        self.scrolling = false;
        self.last_scroll_event_ms = None;
        #[cfg(feature = "tracing")]
        tracing::trace!(target: "tableview_adapter", now_ms, "scrolling ended");
        true
    }
}

impl<T> Controller<ReusePool<T>> {
    /// Visits every loaded cell together with the instance behind it. Placeholders are skipped.
    pub fn for_each_instance(&self, mut f: impl FnMut(&LoadedItem<ItemId>, &T)) {
        let Some(pool) = self.view.factory() else {
            return;
        };
        self.view.for_each_loaded_item(|loaded| {
            if let Some(instance) = loaded.item().and_then(|id| pool.get(*id)) {
                f(loaded, instance);
            }
        });
    }
}
