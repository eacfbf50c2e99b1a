use std::sync::Arc;

use tableview::{DataSource, Rect, Size, TableViewOptions};
use tableview_adapter::{Controller, ReusePool};

struct Shape;

impl DataSource for Shape {
    fn row_count(&self) -> usize {
        50_000
    }

    fn column_count(&self) -> usize {
        8
    }
}

fn main() {
    // Example: a controller fed by scroll events and a frame clock, recycling cell labels.
    //
    // An adapter would:
    // - forward scroll/resize events with on_viewport
    // - call tick(now_ms) in a frame loop / timer
    // - render every instance from for_each_instance
    let pool = ReusePool::new(|index| format!("cell #{index}"), |_| Size::new(96.0, 28.0))
        .with_rebind(|label, index| *label = format!("cell #{index}"));
    let mut c = Controller::from_parts(
        TableViewOptions::new().with_buffer_margin(56.0),
        Arc::new(Shape),
        pool,
    )
    .expect("valid options");

    let mut now_ms = 0u64;
    for step in 0..60u32 {
        c.on_viewport(Rect::new(0.0, f64::from(step) * 9.0, 500.0, 300.0), now_ms);
        c.tick(now_ms);
        now_ms += 16;
    }

    loop {
        let report = c.tick(now_ms);
        if report.scrolling_ended {
            println!("t={now_ms} scrolling ended");
        }
        if report.buffer_loaded {
            println!("t={now_ms} buffer loaded, window={:?}", c.view().loaded_window());
            break;
        }
        now_ms += 16;
    }

    let mut first = None;
    c.for_each_instance(|loaded, label| {
        first.get_or_insert_with(|| (loaded.cell, label.clone()));
    });
    println!("first instance: {first:?}");
    if let Some(pool) = c.view().factory() {
        println!("{pool:?}");
    }
}
