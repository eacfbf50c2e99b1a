// Example: a million-cell grid where only the viewport is materialized.
use std::sync::Arc;

use tableview::{
    CreateMode, Creation, DataSource, ItemFactory, Rect, Released, Reusable, Size, Spacing,
    TableView, TableViewOptions,
};

struct Shape;

impl DataSource for Shape {
    fn row_count(&self) -> usize {
        100_000
    }

    fn column_count(&self) -> usize {
        10
    }
}

/// Items are plain indexes; a real factory would build widgets here.
struct Cells {
    alive: usize,
}

impl ItemFactory for Cells {
    type Item = usize;

    fn create(&mut self, index: usize, _mode: CreateMode) -> Creation<usize> {
        self.alive += 1;
        Creation::Ready(index)
    }

    fn release(&mut self, _index: usize, _item: &usize, _reusable: Reusable) -> Released {
        self.alive -= 1;
        Released::Destroyed
    }

    fn cancel(&mut self, _index: usize) {}

    fn implicit_size(&self, item: &usize) -> Size {
        // Wider every third column, taller every fifth row.
        let column = item / 100_000;
        let row = item % 100_000;
        Size::new(
            if column % 3 == 0 { 140.0 } else { 90.0 },
            if row % 5 == 0 { 32.0 } else { 24.0 },
        )
    }
}

fn main() {
    let options = TableViewOptions::new().with_spacing(Spacing::new(2.0, 1.0));
    let mut view = TableView::with_options(options).expect("valid options");
    view.set_model(Some(Arc::new(Shape)));
    view.set_factory(Some(Cells { alive: 0 }));

    for y in [0.0, 500.0, 50_000.0, 2_000_000.0] {
        view.set_viewport(Rect::new(0.0, y, 640.0, 480.0));
        view.polish();
        println!(
            "y={y} window={:?} items={} alive={} content={:?}",
            view.loaded_window(),
            view.loaded_item_count(),
            view.factory().map_or(0, |f| f.alive),
            view.content_size(),
        );
    }

    if let Some(window) = view.loaded_window() {
        let first = window.top_left();
        println!("first cell {first:?} at {:?}", view.cell_geometry(first));
    }
}
