// Example: prefetching around the viewport once scrolling pauses.
use std::sync::Arc;

use tableview::{
    ChangeEvent, CreateMode, Creation, DataSource, ItemFactory, Rect, Released, Reusable, Size,
    TableView, TableViewOptions,
};

struct Shape;

impl DataSource for Shape {
    fn row_count(&self) -> usize {
        10_000
    }

    fn column_count(&self) -> usize {
        20
    }
}

struct Cells;

impl ItemFactory for Cells {
    type Item = usize;

    fn create(&mut self, index: usize, _mode: CreateMode) -> Creation<usize> {
        Creation::Ready(index)
    }

    fn release(&mut self, _index: usize, _item: &usize, _reusable: Reusable) -> Released {
        Released::Destroyed
    }

    fn cancel(&mut self, _index: usize) {}

    fn implicit_size(&self, _item: &usize) -> Size {
        Size::new(80.0, 24.0)
    }
}

fn main() {
    let options = TableViewOptions::new()
        .with_buffer_margin(120.0)
        .with_on_change(Some(|event: ChangeEvent| println!("  change: {event:?}")));
    let mut view = TableView::with_options(options).expect("valid options");
    view.set_model(Some(Arc::new(Shape)));
    view.set_factory(Some(Cells));

    // Scroll for a while at 60fps, then stop.
    let mut now_ms = 0u64;
    for frame in 0..30u32 {
        view.set_viewport(Rect::new(0.0, f64::from(frame) * 12.0, 640.0, 360.0));
        view.tick(now_ms);
        now_ms += 16;
    }
    println!("while scrolling: window={:?}", view.loaded_window());

    while !view.tick(now_ms).buffer_loaded {
        now_ms += 16;
    }
    println!(
        "after {now_ms}ms: buffered={} window={:?}",
        view.has_buffered_items(),
        view.loaded_window()
    );
}
