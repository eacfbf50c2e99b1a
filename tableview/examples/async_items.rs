// Example: a factory that finishes items later (e.g. on a loader thread).
//
// The view stops on the first pending cell of an edge and resumes once the host reports the
// item done. Nothing of that edge is visible until the whole edge exists.
use std::collections::VecDeque;
use std::sync::Arc;

use tableview::{
    CreateMode, Creation, DataSource, ItemFactory, Rect, Released, Reusable, Size, TableView,
    TableViewOptions,
};

struct Shape;

impl DataSource for Shape {
    fn row_count(&self) -> usize {
        500
    }

    fn column_count(&self) -> usize {
        6
    }
}

#[derive(Default)]
struct Loader {
    queue: VecDeque<usize>,
    finished: Vec<usize>,
}

impl ItemFactory for Loader {
    type Item = usize;

    fn create(&mut self, index: usize, mode: CreateMode) -> Creation<usize> {
        if let Some(pos) = self.finished.iter().position(|&done| done == index) {
            self.finished.swap_remove(pos);
            return Creation::Ready(index);
        }
        if mode == CreateMode::Synchronous {
            return Creation::Ready(index);
        }
        if !self.queue.contains(&index) {
            self.queue.push_back(index);
        }
        Creation::Pending
    }

    fn release(&mut self, _index: usize, _item: &usize, _reusable: Reusable) -> Released {
        Released::Destroyed
    }

    fn cancel(&mut self, index: usize) {
        self.queue.retain(|&queued| queued != index);
    }

    fn implicit_size(&self, _item: &usize) -> Size {
        Size::new(120.0, 30.0)
    }
}

fn main() {
    let mut view = TableView::with_options(TableViewOptions::new()).expect("valid options");
    view.set_model(Some(Arc::new(Shape)));
    view.set_factory(Some(Loader::default()));
    view.set_viewport(Rect::new(0.0, 0.0, 480.0, 240.0));
    view.polish();

    let mut frames = 0;
    loop {
        // One item finishes per frame.
        let done = view.factory_mut().and_then(|loader| {
            let index = loader.queue.pop_front()?;
            loader.finished.push(index);
            Some(index)
        });
        let Some(index) = done else {
            break;
        };
        view.on_creation_completed(index);
        frames += 1;
        if let Some(request) = view.load_request() {
            println!("frame {frames}: waiting on {request:?}, window {:?}", view.loaded_window());
        }
    }

    println!(
        "settled after {frames} frames: window={:?} content={:?}",
        view.loaded_window(),
        view.content_size()
    );
}
