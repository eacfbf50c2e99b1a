use crate::*;

use alloc::rc::Rc;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::sync::atomic::{AtomicUsize, Ordering};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

#[derive(Clone, Copy, Debug)]
struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u64(&mut self) -> u64 {
        // Deterministic, dependency-free PRNG for tests.
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0
    }

    fn gen_range_u64(&mut self, start: u64, end_exclusive: u64) -> u64 {
        debug_assert!(start < end_exclusive);
        let span = end_exclusive - start;
        start + (self.next_u64() % span)
    }

    fn gen_range_usize(&mut self, start: usize, end_exclusive: usize) -> usize {
        self.gen_range_u64(start as u64, end_exclusive as u64) as usize
    }

    fn gen_f64(&mut self, start: u64, end_exclusive: u64) -> f64 {
        self.gen_range_u64(start, end_exclusive) as f64
    }

    fn gen_bool(&mut self) -> bool {
        (self.next_u64() & 1) == 1
    }
}

struct TestModel {
    columns: AtomicUsize,
    rows: AtomicUsize,
}

impl TestModel {
    fn new(columns: usize, rows: usize) -> Arc<Self> {
        Arc::new(Self {
            columns: AtomicUsize::new(columns),
            rows: AtomicUsize::new(rows),
        })
    }

    fn resize(&self, columns: usize, rows: usize) {
        self.columns.store(columns, Ordering::SeqCst);
        self.rows.store(rows, Ordering::SeqCst);
    }
}

impl DataSource for TestModel {
    fn row_count(&self) -> usize {
        self.rows.load(Ordering::SeqCst)
    }

    fn column_count(&self) -> usize {
        self.columns.load(Ordering::SeqCst)
    }
}

#[derive(Default)]
struct FactoryState {
    next_id: u64,
    /// Live item id -> index it is bound to.
    live: HashMap<u64, usize>,
    pool: Vec<u64>,

    pend_once: HashSet<usize>,
    pend_all: bool,
    pended: HashSet<usize>,
    pending: HashSet<usize>,
    failing: HashSet<usize>,
    unusable: HashSet<usize>,
    /// Pool released items even when they are not reusable.
    pool_everything: bool,

    created: Vec<usize>,
    modes: Vec<CreateMode>,
    released: Vec<(usize, Reusable)>,
    cancelled: Vec<usize>,
    drained: Vec<usize>,
    destroyed: usize,
    initialized: usize,
    pooled_hooks: usize,
    reused_hooks: usize,
}

impl FactoryState {
    fn complete(&mut self, index: usize) {
        assert!(self.pending.remove(&index), "index {index} was not pending");
    }

    fn only_pending(&self) -> Option<usize> {
        assert!(self.pending.len() <= 1, "more than one pending: {:?}", self.pending);
        self.pending.iter().copied().next()
    }
}

type Shared = Rc<RefCell<FactoryState>>;

struct MockFactory {
    state: Shared,
    size: Rc<dyn Fn(usize) -> Size>,
}

impl MockFactory {
    fn new() -> (Self, Shared) {
        Self::with_size(|_| Size::new(100.0, 20.0))
    }

    fn with_size(size: impl Fn(usize) -> Size + 'static) -> (Self, Shared) {
        let state: Shared = Rc::default();
        (
            Self {
                state: Rc::clone(&state),
                size: Rc::new(size),
            },
            state,
        )
    }
}

impl ItemFactory for MockFactory {
    type Item = u64;

    fn create(&mut self, index: usize, mode: CreateMode) -> Creation<u64> {
        let mut s = self.state.borrow_mut();
        s.modes.push(mode);
        if s.failing.contains(&index) {
            return Creation::Failed;
        }
        if s.pending.contains(&index) {
            return Creation::Pending;
        }
        let should_pend = mode != CreateMode::Synchronous
            && (s.pend_once.remove(&index) || (s.pend_all && s.pended.insert(index)));
        if should_pend {
            s.pending.insert(index);
            return Creation::Pending;
        }

        s.created.push(index);
        let (id, reused) = match s.pool.pop() {
            Some(id) => (id, true),
            None => {
                s.next_id += 1;
                (s.next_id, false)
            }
        };
        s.live.insert(id, index);
        if s.unusable.contains(&index) {
            Creation::Unusable(id)
        } else if reused {
            Creation::Reused(id)
        } else {
            Creation::Ready(id)
        }
    }

    fn release(&mut self, index: usize, item: &u64, reusable: Reusable) -> Released {
        let mut s = self.state.borrow_mut();
        assert_eq!(s.live.remove(item), Some(index), "released an item that is not live");
        s.released.push((index, reusable));
        match reusable {
            _ if s.pool_everything => {
                s.pool.push(*item);
                Released::Pooled
            }
            Reusable::Yes => {
                s.pool.push(*item);
                Released::Pooled
            }
            Reusable::No => {
                s.destroyed += 1;
                Released::Destroyed
            }
        }
    }

    fn cancel(&mut self, index: usize) {
        let mut s = self.state.borrow_mut();
        s.cancelled.push(index);
        s.pending.remove(&index);
    }

    fn implicit_size(&self, item: &u64) -> Size {
        let index = self.state.borrow().live.get(item).copied();
        match index {
            Some(index) => (self.size)(index),
            None => panic!("implicit_size of a dead item {item}"),
        }
    }

    fn drain_pool(&mut self, max_pool_time: usize) {
        let mut s = self.state.borrow_mut();
        s.drained.push(max_pool_time);
        s.destroyed += s.pool.len();
        s.pool.clear();
    }

    fn item_initialized(&mut self, _index: usize, _item: &u64) {
        self.state.borrow_mut().initialized += 1;
    }

    fn item_pooled(&mut self, _index: usize, _item: &u64) {
        self.state.borrow_mut().pooled_hooks += 1;
    }

    fn item_reused(&mut self, _index: usize, _item: &u64) {
        self.state.borrow_mut().reused_hooks += 1;
    }
}

fn view_with(
    options: TableViewOptions,
    model: Arc<TestModel>,
    factory: MockFactory,
    viewport: Rect,
) -> TableView<MockFactory> {
    let mut view = TableView::with_options(options).unwrap();
    view.set_model(Some(model));
    view.set_factory(Some(factory));
    view.set_viewport(viewport);
    view
}

/// 10 columns x 1000 rows of 100x20 items.
fn tall_table(viewport: Rect) -> (TableView<MockFactory>, Shared) {
    let (factory, state) = MockFactory::new();
    let view = view_with(
        TableViewOptions::new(),
        TestModel::new(10, 1000),
        factory,
        viewport,
    );
    (view, state)
}

fn rect(left: usize, top: usize, right: usize, bottom: usize) -> CellRect {
    CellRect::new(Cell::new(left, top), Cell::new(right, bottom))
}

fn snapshot(view: &TableView<MockFactory>) -> Vec<(Cell, Rect, bool)> {
    let mut out = Vec::new();
    view.for_each_loaded_item(|loaded| out.push((loaded.cell, loaded.geometry, loaded.visible)));
    out
}

fn assert_window_consistent(view: &TableView<MockFactory>) {
    let in_flight = view.load_request().map_or(0, |info| info.cursor);
    match view.loaded_window() {
        None => assert_eq!(view.loaded_item_count(), in_flight, "{}", view.layout_summary()),
        Some(window) => {
            assert!(window.width() >= 1 && window.height() >= 1);
            assert!(view.grid().contains(window.bottom_right()));
            assert_eq!(
                view.loaded_item_count(),
                window.area() + in_flight,
                "{}",
                view.layout_summary()
            );
            for cell in window.cells() {
                let loaded = view
                    .loaded_item(cell)
                    .unwrap_or_else(|| panic!("hole at {cell:?}: {}", view.layout_summary()));
                assert_eq!(loaded.cell, cell);
            }
        }
    }
}

fn assert_geometry_contiguous(view: &TableView<MockFactory>) {
    let Some(window) = view.loaded_window() else {
        return;
    };
    if view.load_request().is_some() {
        return;
    }
    let spacing = view.options().spacing;
    let eps = 1e-6;
    for cell in window.cells() {
        let geometry = view.cell_geometry(cell).unwrap();
        assert!(geometry.width > 0.0 && geometry.height > 0.0);
        if cell.column > window.left {
            let left = view.cell_geometry(Cell::new(cell.column - 1, cell.row)).unwrap();
            assert!((left.right() + spacing.column - geometry.left()).abs() < eps);
            assert!((left.top() - geometry.top()).abs() < eps);
        }
        if cell.row > window.top {
            let above = view.cell_geometry(Cell::new(cell.column, cell.row - 1)).unwrap();
            assert!((above.bottom() + spacing.row - geometry.top()).abs() < eps);
            assert!((above.left() - geometry.left()).abs() < eps);
        }
    }
}

#[test]
fn cell_index_mapping_is_column_major() {
    let grid = GridSize::new(10, 1000);
    assert_eq!(grid.cell_to_index(Cell::new(0, 0)), 0);
    assert_eq!(grid.cell_to_index(Cell::new(0, 999)), 999);
    assert_eq!(grid.cell_to_index(Cell::new(3, 5)), 3005);
    for index in [0, 1, 999, 1000, 4321, 9999] {
        assert_eq!(grid.cell_to_index(grid.index_to_cell(index)), index);
    }
}

#[test]
#[should_panic]
fn index_to_cell_without_rows_panics() {
    GridSize::new(3, 0).index_to_cell(0);
}

#[test]
fn initial_fill_loads_exactly_the_viewport_window() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    let (factory, state) = MockFactory::new();
    let mut view = view_with(
        TableViewOptions::new()
            .with_on_change(Some(move |event: ChangeEvent| sink.lock().unwrap().push(event))),
        TestModel::new(10, 1000),
        factory,
        Rect::new(0.0, 0.0, 400.0, 100.0),
    );

    assert!(view.is_polish_scheduled());
    view.polish();

    assert_eq!(view.columns(), 10);
    assert_eq!(view.rows(), 1000);
    assert_eq!(view.loaded_window(), Some(rect(0, 0, 3, 4)));
    assert_eq!(state.borrow().created.len(), 20);
    assert_eq!(state.borrow().initialized, 20);
    assert!(state.borrow().released.is_empty());
    assert_eq!(view.content_width(), 1000.0);
    assert_eq!(view.content_height(), 20_000.0);
    assert_eq!(
        view.cell_geometry(Cell::new(2, 3)),
        Some(Rect::new(200.0, 60.0, 100.0, 20.0))
    );
    view.for_each_loaded_item(|loaded| assert!(loaded.visible));
    assert!(view.load_request().is_none());
    assert!(!view.is_polish_scheduled());
    assert_window_consistent(&view);
    assert_geometry_contiguous(&view);

    let events = events.lock().unwrap();
    assert!(events.contains(&ChangeEvent::Columns(10)));
    assert!(events.contains(&ChangeEvent::Rows(1000)));
    assert!(events.contains(&ChangeEvent::ContentWidth(1000.0)));
    assert!(events.contains(&ChangeEvent::ContentHeight(20_000.0)));
}

#[test]
fn scrolling_one_row_loads_bottom_then_unloads_top() {
    let (mut view, state) = tall_table(Rect::new(0.0, 0.0, 400.0, 100.0));
    view.polish();
    let created_before = state.borrow().created.len();

    view.set_viewport(Rect::new(0.0, 20.0, 400.0, 100.0));
    view.polish();

    let s = state.borrow();
    let created: Vec<usize> = s.created[created_before..].to_vec();
    assert_eq!(created, [5, 1005, 2005, 3005]);
    let released: Vec<usize> = s.released.iter().map(|&(index, _)| index).collect();
    assert_eq!(released, [0, 1000, 2000, 3000]);
    drop(s);

    let window = view.loaded_window().unwrap();
    assert_eq!(window, rect(0, 1, 3, 5));
    assert_eq!((window.width(), window.height()), (4, 5));
    assert_window_consistent(&view);
    assert_geometry_contiguous(&view);
}

#[test]
fn edges_are_visited_left_right_top_bottom() {
    let (mut view, state) = tall_table(Rect::new(0.0, 0.0, 400.0, 100.0));
    view.polish();
    let created_before = state.borrow().created.len();

    // One column right and one row down: the column is handled first.
    view.set_viewport(Rect::new(100.0, 20.0, 400.0, 100.0));
    view.polish();

    let s = state.borrow();
    assert_eq!(
        s.created[created_before..],
        [4000, 4001, 4002, 4003, 4004, 1005, 2005, 3005, 4005]
    );
    let released: Vec<usize> = s.released.iter().map(|&(index, _)| index).collect();
    assert_eq!(released, [0, 1, 2, 3, 4, 1000, 2000, 3000, 4000]);
    drop(s);
    assert_eq!(view.loaded_window(), Some(rect(1, 1, 4, 5)));
}

#[test]
fn pending_item_suspends_the_row_until_completed() {
    let (mut view, state) = tall_table(Rect::new(0.0, 0.0, 500.0, 100.0));
    view.polish();
    assert_eq!(view.loaded_window(), Some(rect(0, 0, 4, 4)));

    state.borrow_mut().pend_once.insert(2005);
    view.set_viewport(Rect::new(0.0, 20.0, 500.0, 100.0));
    view.polish();

    let info = view.load_request().unwrap();
    assert_eq!(info.edge, Some(Edge::Bottom));
    assert_eq!(info.cursor, 2);
    assert_eq!(info.len, 5);
    assert_eq!(view.loaded_window(), Some(rect(0, 1, 4, 4)));
    assert_window_consistent(&view);

    // Polishing while the row is pending changes nothing.
    view.schedule_polish();
    view.polish();
    assert_eq!(view.load_request().unwrap().cursor, 2);

    // Signals for other indexes are ignored.
    view.on_creation_completed(5);
    assert_eq!(view.load_request().unwrap().cursor, 2);

    state.borrow_mut().complete(2005);
    view.on_creation_completed(2005);

    assert!(view.load_request().is_none());
    assert_eq!(view.loaded_window(), Some(rect(0, 1, 4, 5)));
    assert_window_consistent(&view);
    assert_geometry_contiguous(&view);
}

#[test]
fn reset_during_active_request_rolls_back_then_rebuilds_from_origin() {
    let (mut view, state) = tall_table(Rect::new(0.0, 0.0, 500.0, 100.0));
    view.polish();

    state.borrow_mut().pend_once.insert(2005);
    view.set_viewport(Rect::new(0.0, 0.0, 500.0, 110.0));
    view.polish();
    assert_eq!(view.load_request().unwrap().cursor, 2);
    let released_before = state.borrow().released.len();

    view.model_changed(ModelChange::reset());

    assert!(view.load_request().is_none());
    assert_eq!(state.borrow().cancelled, [2005]);
    let rolled_back: Vec<usize> = state.borrow().released[released_before..]
        .iter()
        .map(|&(index, _)| index)
        .collect();
    assert_eq!(rolled_back, [5, 1005]);
    assert_eq!(view.loaded_window(), Some(rect(0, 0, 4, 4)));
    assert_window_consistent(&view);
    assert!(view.is_polish_scheduled());

    let created_before = state.borrow().created.len();
    view.polish();
    assert_eq!(state.borrow().created[created_before], 0);
    assert_eq!(view.loaded_window(), Some(rect(0, 0, 4, 5)));
    assert!(state.borrow().live.len() == view.loaded_item_count());
    assert_window_consistent(&view);
}

#[test]
fn cancelling_restores_window_items_and_geometry() {
    let (mut view, state) = tall_table(Rect::new(0.0, 0.0, 500.0, 100.0));
    view.polish();
    let window_before = view.loaded_window();
    let items_before = snapshot(&view);
    let live_before: HashSet<u64> = state.borrow().live.keys().copied().collect();

    state.borrow_mut().pend_once.insert(2005);
    view.set_viewport(Rect::new(0.0, 0.0, 500.0, 110.0));
    view.polish();
    assert!(view.load_request().is_some());
    assert_eq!(view.loaded_item_count(), 27);

    view.invalidate();

    assert_eq!(view.loaded_window(), window_before);
    assert_eq!(snapshot(&view), items_before);
    let live_after: HashSet<u64> = state.borrow().live.keys().copied().collect();
    assert_eq!(live_after, live_before);
}

#[test]
fn invalid_column_width_falls_back_with_a_single_diagnostic() {
    let (factory, _state) = MockFactory::new();
    let mut view = view_with(
        TableViewOptions::new()
            .with_column_width_provider(Some(|column: usize| if column == 3 { 0.0 } else { 100.0 })),
        TestModel::new(10, 1000),
        factory,
        Rect::new(0.0, 0.0, 1000.0, 100.0),
    );
    view.polish();

    let window = view.loaded_window().unwrap();
    assert_eq!(window.right, 9);
    assert_eq!(
        view.cell_geometry(Cell::new(3, 0)).unwrap().width,
        DEFAULT_COLUMN_WIDTH
    );
    let invalid: Vec<&Diagnostic> = view
        .diagnostics()
        .iter()
        .filter(|d| matches!(d, Diagnostic::InvalidColumnWidth { .. }))
        .collect();
    assert_eq!(
        invalid,
        [&Diagnostic::InvalidColumnWidth {
            column: 3,
            width: 0.0
        }]
    );

    // A fresh provider gets its own warning.
    view.set_column_width_provider(Some(Arc::new(|_: usize| f64::NAN)));
    view.polish();
    let invalid = view
        .diagnostics()
        .iter()
        .filter(|d| matches!(d, Diagnostic::InvalidColumnWidth { .. }))
        .count();
    assert_eq!(invalid, 2);
    assert_eq!(
        view.cell_geometry(Cell::new(0, 0)).unwrap().width,
        DEFAULT_COLUMN_WIDTH
    );
}

#[test]
fn invalidating_twice_is_the_same_as_once() {
    let (mut once, _) = tall_table(Rect::new(30.0, 50.0, 400.0, 100.0));
    let (mut twice, _) = tall_table(Rect::new(30.0, 50.0, 400.0, 100.0));
    once.polish();
    twice.polish();

    once.invalidate();
    once.polish();
    twice.invalidate();
    twice.invalidate();
    twice.polish();

    assert_eq!(once.frame_state(), twice.frame_state());
    assert_eq!(snapshot(&once), snapshot(&twice));
    assert_window_consistent(&twice);
}

#[test]
fn nested_model_changes_are_ignored() {
    let (mut view, state) = tall_table(Rect::new(0.0, 0.0, 400.0, 100.0));
    view.polish();

    view.model_changed(ModelChange::nested(ModelChangeKind::RowsInserted));
    assert!(!view.is_polish_scheduled());

    view.model_changed(ModelChange::top_level(ModelChangeKind::ColumnsRemoved));
    assert!(view.is_polish_scheduled());
    let released_before = state.borrow().released.len();
    view.polish();
    // Full rebuild: every item was released and the window reloaded.
    assert_eq!(state.borrow().released.len() - released_before, 20);
    assert_eq!(view.loaded_window(), Some(rect(0, 0, 3, 4)));
}

#[test]
fn model_resize_is_picked_up_on_rebuild() {
    let model = TestModel::new(10, 1000);
    let (factory, _) = MockFactory::new();
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    let mut view = view_with(
        TableViewOptions::new()
            .with_on_change(Some(move |event: ChangeEvent| sink.lock().unwrap().push(event))),
        Arc::clone(&model),
        factory,
        Rect::new(0.0, 0.0, 400.0, 100.0),
    );
    view.polish();

    model.resize(2, 3);
    view.model_changed(ModelChange::top_level(ModelChangeKind::RowsRemoved));
    view.polish();

    assert_eq!((view.columns(), view.rows()), (2, 3));
    assert_eq!(view.loaded_window(), Some(rect(0, 0, 1, 2)));
    assert_eq!(view.content_size(), Size::new(200.0, 60.0));
    assert!(view.frame_state().content.exact);
    let events = events.lock().unwrap();
    assert!(events.contains(&ChangeEvent::Columns(2)));
    assert!(events.contains(&ChangeEvent::Rows(3)));
}

#[test]
fn setters_reject_invalid_values_and_keep_state() {
    let (mut view, _) = tall_table(Rect::new(0.0, 0.0, 400.0, 100.0));
    view.polish();

    assert!(matches!(
        view.set_row_spacing(f64::NAN),
        Err(TableViewError::InvalidSpacing(_))
    ));
    assert_eq!(
        view.set_column_spacing(-1.0),
        Err(TableViewError::InvalidSpacing(-1.0))
    );
    assert_eq!(
        view.set_spacing(Spacing::new(1.0, f64::INFINITY)),
        Err(TableViewError::InvalidSpacing(f64::INFINITY))
    );
    assert!(matches!(
        view.set_margins(Margins::new(0.0, f64::NAN, 0.0, 0.0)),
        Err(TableViewError::InvalidMargin(_))
    ));
    assert_eq!(
        view.set_buffer_margin(-5.0),
        Err(TableViewError::InvalidBufferMargin(-5.0))
    );
    assert_eq!(
        view.update_options(|o| o.default_row_height = 0.0),
        Err(TableViewError::InvalidDefaultSize(0.0))
    );
    assert!(!view.is_polish_scheduled());
    assert_eq!(view.options().spacing, Spacing::default());
    assert_eq!(view.options().default_row_height, DEFAULT_ROW_HEIGHT);

    assert_eq!(
        view.set_margins(Margins::new(f64::NEG_INFINITY, 0.0, 0.0, 0.0)),
        Err(TableViewError::InvalidMargin(f64::NEG_INFINITY))
    );
    assert_eq!(
        view.set_margins(Margins::new(0.0, 0.0, f64::INFINITY, 0.0)),
        Err(TableViewError::InvalidMargin(f64::INFINITY))
    );
    assert_eq!(
        TableViewOptions::new()
            .with_margins(Margins::uniform(f64::INFINITY))
            .validate(),
        Err(TableViewError::InvalidMargin(f64::INFINITY))
    );
    assert!(!view.is_polish_scheduled());
    assert_eq!(view.options().margins, Margins::default());

    // Negative margins are allowed.
    assert!(view.set_margins(Margins::uniform(-5.0)).is_ok());
    assert!(view.is_polish_scheduled());
}

#[test]
fn spacing_change_relayouts_the_window() {
    let (mut view, _) = tall_table(Rect::new(0.0, 0.0, 400.0, 100.0));
    view.polish();

    view.set_column_spacing(10.0).unwrap();
    assert!(view.is_polish_scheduled());
    view.polish();

    assert_eq!(view.cell_geometry(Cell::new(1, 0)).unwrap().x, 110.0);
    assert_eq!(view.cell_geometry(Cell::new(3, 4)).unwrap().x, 330.0);
    assert_eq!(view.loaded_window(), Some(rect(0, 0, 3, 4)));
    // 430 / 4 + 10 per column, minus the trailing spacing.
    assert_eq!(view.content_width(), 1165.0);
    assert_geometry_contiguous(&view);
}

#[test]
fn margins_offset_the_origin_and_pad_the_content() {
    let (factory, _) = MockFactory::new();
    let mut view = view_with(
        TableViewOptions::new().with_margins(Margins::new(10.0, 5.0, 20.0, 15.0)),
        TestModel::new(10, 1000),
        factory,
        Rect::new(0.0, 0.0, 400.0, 100.0),
    );
    view.polish();

    assert_eq!(
        view.cell_geometry(Cell::ORIGIN),
        Some(Rect::new(10.0, 5.0, 100.0, 20.0))
    );
    assert_eq!(view.loaded_window(), Some(rect(0, 0, 3, 4)));
    assert_eq!(view.content_width(), 1045.0);
    assert_eq!(view.content_height(), 21_015.0);

    view.set_margins(Margins::uniform(0.0)).unwrap();
    view.polish();
    assert_eq!(
        view.cell_geometry(Cell::ORIGIN),
        Some(Rect::new(0.0, 0.0, 100.0, 20.0))
    );
}

#[test]
fn negative_margins_wider_than_a_cell_settle_and_scroll() {
    let (factory, _) = MockFactory::new();
    let mut view = view_with(
        TableViewOptions::new().with_margins(Margins::uniform(-100.0)),
        TestModel::new(10, 1000),
        factory,
        Rect::new(0.0, 0.0, 400.0, 100.0),
    );
    view.polish();

    // Column 0 and rows 0..=4 lie entirely above/left of the viewport.
    assert!(view.load_request().is_none());
    assert_eq!(view.loaded_window(), Some(rect(1, 5, 4, 9)));
    assert_eq!(
        view.cell_geometry(Cell::new(1, 5)),
        Some(Rect::new(0.0, 0.0, 100.0, 20.0))
    );
    assert_window_consistent(&view);
    assert_geometry_contiguous(&view);

    view.set_viewport(Rect::new(-50.0, 300.0, 400.0, 100.0));
    view.polish();
    assert_eq!(view.loaded_window(), Some(rect(0, 20, 4, 24)));
    assert_eq!(
        view.cell_geometry(Cell::new(0, 20)),
        Some(Rect::new(-100.0, 300.0, 100.0, 20.0))
    );
    assert_window_consistent(&view);
    assert_geometry_contiguous(&view);

    view.set_viewport(Rect::new(-100.0, -100.0, 400.0, 100.0));
    view.polish();
    assert_eq!(view.loaded_window(), Some(rect(0, 0, 3, 4)));
    assert_eq!(
        view.cell_geometry(Cell::ORIGIN),
        Some(Rect::new(-100.0, -100.0, 100.0, 20.0))
    );
    assert_window_consistent(&view);
    assert_geometry_contiguous(&view);
}

#[test]
fn negative_margin_past_the_whole_grid_keeps_the_last_column() {
    let (factory, _) = MockFactory::new();
    let mut view = view_with(
        TableViewOptions::new().with_margins(Margins::uniform(-1000.0)),
        TestModel::new(10, 1000),
        factory,
        Rect::new(0.0, 0.0, 400.0, 100.0),
    );
    view.polish();

    assert!(view.load_request().is_none());
    assert_eq!(view.loaded_window(), Some(rect(9, 50, 9, 54)));
    assert_eq!(
        view.cell_geometry(Cell::new(9, 50)),
        Some(Rect::new(-100.0, 0.0, 100.0, 20.0))
    );
    assert_window_consistent(&view);
}

#[test]
fn unusable_items_pooled_by_the_factory_fire_the_pooled_hook() {
    let (mut view, state) = tall_table(Rect::new(0.0, 0.0, 400.0, 100.0));
    {
        let mut s = state.borrow_mut();
        s.unusable.insert(1);
        s.pool_everything = true;
    }
    view.polish();

    let s = state.borrow();
    assert_eq!(s.released, [(1, Reusable::No)]);
    assert_eq!(s.pooled_hooks, 1);
    assert!(view.loaded_item(Cell::new(0, 1)).unwrap().owns_placeholder());
}

#[test]
fn polish_during_polish_is_deferred_to_the_next_cycle() {
    let (mut view, _) = tall_table(Rect::new(0.0, 0.0, 400.0, 100.0));
    view.polishing = true;
    view.polish();
    assert!(view.is_polish_scheduled());
    assert_eq!(view.loaded_window(), None);

    view.polishing = false;
    assert!(view.tick(0).polished);
    assert!(!view.is_polish_scheduled());
    assert_eq!(view.loaded_window(), Some(rect(0, 0, 3, 4)));
}

#[test]
fn diagnostics_evict_the_oldest_entry_when_full() {
    let mut log = Diagnostics::new(2);
    for index in 0..5 {
        log.record(Diagnostic::PlaceholderSubstituted {
            index,
            unusable: false,
        });
    }

    assert_eq!(log.len(), 2);
    assert_eq!(log.dropped(), 3);
    let kept: Vec<usize> = log
        .iter()
        .map(|d| match d {
            Diagnostic::PlaceholderSubstituted { index, .. } => *index,
            other => panic!("unexpected {other:?}"),
        })
        .collect();
    assert_eq!(kept, [3, 4]);
    assert!(!log.contains(&Diagnostic::PlaceholderSubstituted {
        index: 0,
        unusable: false
    }));

    log.clear();
    assert!(log.is_empty());
    assert_eq!(log.dropped(), 0);
}

#[test]
fn failed_and_unusable_items_become_placeholders() {
    let (mut view, state) = tall_table(Rect::new(0.0, 0.0, 400.0, 100.0));
    state.borrow_mut().failing.insert(1);
    state.borrow_mut().unusable.insert(1001);
    view.polish();

    assert_eq!(view.loaded_window(), Some(rect(0, 0, 3, 4)));
    assert_window_consistent(&view);
    let failed = view.loaded_item(Cell::new(0, 1)).unwrap();
    assert!(failed.owns_placeholder());
    assert_eq!(failed.geometry, Rect::new(0.0, 20.0, 100.0, 20.0));
    assert!(view.loaded_item(Cell::new(1, 1)).unwrap().owns_placeholder());
    assert!(!view.loaded_item(Cell::new(2, 1)).unwrap().owns_placeholder());

    let entries = view.diagnostics();
    assert!(entries.contains(&Diagnostic::PlaceholderSubstituted {
        index: 1,
        unusable: false
    }));
    assert!(entries.contains(&Diagnostic::PlaceholderSubstituted {
        index: 1001,
        unusable: true
    }));
    assert!(state.borrow().released.contains(&(1001, Reusable::No)));

    // Placeholders are dropped on unload without reaching the factory.
    let released_before = state.borrow().released.len();
    view.set_viewport(Rect::new(0.0, 40.0, 400.0, 100.0));
    view.polish();
    let s = state.borrow();
    let released: Vec<usize> = s.released[released_before..]
        .iter()
        .map(|&(index, _)| index)
        .collect();
    assert_eq!(released, [0, 1000, 2000, 3000, 2001, 3001]);
}

#[test]
fn unloaded_items_are_pooled_reused_and_drained() {
    let (mut view, state) = tall_table(Rect::new(0.0, 0.0, 400.0, 100.0));
    view.polish();

    view.set_viewport(Rect::new(0.0, 20.0, 400.0, 100.0));
    view.polish();

    let s = state.borrow();
    assert!(s.released[s.released.len() - 4..]
        .iter()
        .all(|&(_, reusable)| reusable == Reusable::Yes));
    assert_eq!(s.pooled_hooks, 4);
    assert_eq!(s.reused_hooks, 4);
    assert!(!s.drained.is_empty());
    assert!(s.drained.iter().all(|&max| max == MAX_POOL_TIME));
}

#[test]
fn disabling_reuse_releases_items_as_not_reusable() {
    let (mut view, state) = tall_table(Rect::new(0.0, 0.0, 400.0, 100.0));
    view.polish();
    view.set_reuse_items(false);

    view.set_viewport(Rect::new(0.0, 20.0, 400.0, 100.0));
    view.polish();

    let s = state.borrow();
    assert_eq!(s.released.len(), 4);
    assert!(s.released.iter().all(|&(_, reusable)| reusable == Reusable::No));
    assert_eq!(s.pooled_hooks, 0);
    assert_eq!(s.reused_hooks, 0);
}

#[test]
fn buffer_loads_after_the_delay_and_unloads_when_disabled() {
    let (factory, state) = MockFactory::new();
    let mut view = view_with(
        TableViewOptions::new().with_buffer_margin(100.0),
        TestModel::new(10, 1000),
        factory,
        Rect::new(0.0, 0.0, 400.0, 100.0),
    );

    let outcome = view.tick(0);
    assert!(outcome.polished);
    assert!(!outcome.buffer_loaded);
    assert_eq!(view.loaded_window(), Some(rect(0, 0, 3, 4)));
    assert_eq!(view.buffer_deadline_ms(), Some(DEFAULT_BUFFER_DELAY_MS));

    assert_eq!(view.tick(299), TickOutcome::default());
    assert!(!view.has_buffered_items());

    let outcome = view.tick(300);
    assert!(outcome.buffer_loaded);
    assert!(view.has_buffered_items());
    assert_eq!(view.loaded_window(), Some(rect(0, 0, 4, 9)));
    assert!(
        state.borrow().modes[20..]
            .iter()
            .all(|&mode| mode == CreateMode::Asynchronous)
    );
    assert_window_consistent(&view);

    view.set_buffer_margin(0.0).unwrap();
    assert!(!view.has_buffered_items());
    assert_eq!(view.loaded_window(), Some(rect(0, 0, 3, 4)));
    assert_eq!(view.buffer_deadline_ms(), None);
}

#[test]
fn buffer_is_trimmed_before_loading_new_edges() {
    let (factory, _) = MockFactory::new();
    let mut view = view_with(
        TableViewOptions::new().with_buffer_margin(100.0),
        TestModel::new(10, 1000),
        factory,
        Rect::new(0.0, 0.0, 400.0, 100.0),
    );
    view.tick(0);
    view.tick(300);
    assert_eq!(view.loaded_window(), Some(rect(0, 0, 4, 9)));

    view.set_viewport(Rect::new(0.0, 200.0, 400.0, 100.0));
    let outcome = view.tick(310);
    assert!(outcome.polished);
    assert!(!outcome.buffer_loaded);

    assert!(!view.has_buffered_items());
    assert_eq!(view.loaded_window(), Some(rect(0, 10, 3, 14)));
    assert_eq!(view.buffer_deadline_ms(), Some(610));
    assert_window_consistent(&view);
    assert_geometry_contiguous(&view);
}

#[test]
fn empty_model_or_missing_factory_loads_nothing() {
    let (factory, state) = MockFactory::new();
    let mut view = view_with(
        TableViewOptions::new(),
        TestModel::new(10, 0),
        factory,
        Rect::new(0.0, 0.0, 400.0, 100.0),
    );
    view.polish();
    assert_eq!(view.loaded_window(), None);
    assert!(state.borrow().created.is_empty());
    assert_eq!(view.content_size(), Size::ZERO);
    assert_eq!(view.rows(), 0);

    let mut bare: TableView<MockFactory> = TableView::new();
    bare.set_model(Some(TestModel::new(3, 3)));
    bare.set_viewport(Rect::new(0.0, 0.0, 100.0, 100.0));
    bare.polish();
    assert_eq!(bare.loaded_window(), None);
    assert_eq!(bare.columns(), 3);
}

#[test]
fn degenerate_viewport_skips_polish() {
    let (mut view, state) = tall_table(Rect::new(0.0, 0.0, 0.0, 100.0));
    view.polish();
    assert!(state.borrow().created.is_empty());
    assert_eq!(view.loaded_window(), None);

    view.set_viewport(Rect::new(0.0, 0.0, 100.0, 20.0));
    view.polish();
    assert_eq!(view.loaded_window(), Some(rect(0, 0, 0, 0)));
}

#[test]
fn dropping_the_view_releases_every_item() {
    let (mut view, state) = tall_table(Rect::new(0.0, 0.0, 400.0, 100.0));
    view.polish();
    assert_eq!(state.borrow().live.len(), 20);

    drop(view);
    let s = state.borrow();
    assert!(s.live.is_empty());
    assert!(s.released.iter().all(|&(_, reusable)| reusable == Reusable::No));
}

#[test]
fn replacing_the_factory_releases_to_the_previous_one() {
    let (mut view, first) = tall_table(Rect::new(0.0, 0.0, 400.0, 100.0));
    view.polish();

    let (second_factory, second) = MockFactory::new();
    let previous = view.set_factory(Some(second_factory));
    assert!(previous.is_some());
    assert!(first.borrow().live.is_empty());
    assert_eq!(view.loaded_item_count(), 0);

    view.polish();
    assert_eq!(second.borrow().live.len(), 20);
    assert_eq!(view.loaded_window(), Some(rect(0, 0, 3, 4)));
}

#[test]
fn force_async_requests_every_item_asynchronously() {
    let (factory, state) = MockFactory::new();
    state.borrow_mut().pend_all = true;
    let mut view = view_with(
        TableViewOptions::new().with_force_async(true),
        TestModel::new(10, 1000),
        factory,
        Rect::new(0.0, 0.0, 400.0, 100.0),
    );
    view.polish();
    assert_eq!(view.load_request().unwrap().edge, None);

    let mut rounds = 0;
    loop {
        let pending = state.borrow().only_pending();
        let Some(index) = pending else {
            break;
        };
        state.borrow_mut().complete(index);
        view.on_creation_completed(index);
        assert_window_consistent(&view);
        rounds += 1;
        assert!(rounds <= 100, "async fill did not converge");
    }

    assert_eq!(rounds, 20);
    assert!(view.load_request().is_none());
    assert_eq!(view.loaded_window(), Some(rect(0, 0, 3, 4)));
    assert!(
        state
            .borrow()
            .modes
            .iter()
            .all(|&mode| mode == CreateMode::Asynchronous)
    );
    assert_geometry_contiguous(&view);
}

#[test]
fn content_height_estimate_grows_monotonically_while_scrolling_down() {
    let (factory, _) =
        MockFactory::with_size(|index| Size::new(100.0, 10.0 + ((index % 1000) % 7) as f64 * 5.0));
    let mut view = view_with(
        TableViewOptions::new().with_spacing(Spacing::new(0.0, 2.0)),
        TestModel::new(4, 1000),
        factory,
        Rect::new(0.0, 0.0, 400.0, 100.0),
    );
    view.polish();

    let mut last = view.content_height();
    let mut y = 0.0;
    for _ in 0..300 {
        y += 37.0;
        view.set_viewport(Rect::new(0.0, y, 400.0, 100.0));
        view.polish();
        let window = view.loaded_window().unwrap();
        if window.bottom + 1 >= view.rows() {
            break;
        }
        let height = view.content_height();
        assert!(height >= last, "estimate shrank from {last} to {height}");
        last = height;
        assert_window_consistent(&view);
    }
}

#[test]
fn frame_state_round_trips_the_viewport() {
    let (mut view, _) = tall_table(Rect::new(0.0, 0.0, 400.0, 100.0));
    view.polish();
    view.set_viewport(Rect::new(250.0, 1200.0, 400.0, 100.0));
    view.polish();
    let saved = view.frame_state();
    assert_eq!(saved.grid, GridSize::new(10, 1000));
    assert_eq!(saved.window, view.loaded_window());
    assert!(!saved.content.exact);

    let (mut restored, _) = tall_table(Rect::new(0.0, 0.0, 400.0, 100.0));
    restored.restore_viewport_state(saved.viewport).unwrap();
    restored.polish();
    assert_eq!(restored.viewport(), saved.viewport.rect);
    assert_eq!(restored.loaded_window(), saved.window);
}

#[test]
fn stale_completion_signals_are_ignored() {
    let (mut view, state) = tall_table(Rect::new(0.0, 0.0, 400.0, 100.0));
    view.polish();
    let created = state.borrow().created.len();

    view.on_creation_completed(42);
    assert_eq!(state.borrow().created.len(), created);
    assert!(view.load_request().is_none());
}

#[test]
fn layout_summary_describes_the_window() {
    let (mut view, _) = tall_table(Rect::new(0.0, 0.0, 400.0, 100.0));
    assert!(view.layout_summary().contains("loaded empty"));
    view.polish();
    let summary = view.layout_summary();
    assert!(summary.contains("table 10x1000"));
    assert!(summary.contains("(0,0) -> (3,4)"));
}

#[test]
fn property_random_operations_keep_the_window_rectangular() {
    for seed in 1..=12u64 {
        let mut rng = Lcg::new(seed);
        let columns = rng.gen_range_usize(1, 30);
        let rows = rng.gen_range_usize(1, 60);
        let widths: Vec<f64> = (0..columns).map(|_| rng.gen_f64(5, 120)).collect();
        let heights: Vec<f64> = (0..rows).map(|_| rng.gen_f64(5, 60)).collect();
        let size = move |index: usize| Size::new(widths[index / rows], heights[index % rows]);

        let (factory, state) = MockFactory::with_size(size);
        let model = TestModel::new(columns, rows);
        let spacing = Spacing::new(rng.gen_f64(0, 8), rng.gen_f64(0, 8));
        let mut view = view_with(
            TableViewOptions::new()
                .with_spacing(spacing)
                .with_buffer_margin(rng.gen_f64(0, 200)),
            Arc::clone(&model),
            factory,
            Rect::new(0.0, 0.0, 300.0, 200.0),
        );

        let mut now = 0u64;
        for _ in 0..200 {
            match rng.gen_range_usize(0, 8) {
                0 | 1 | 2 => {
                    let viewport = Rect::new(
                        rng.gen_f64(0, 2500),
                        rng.gen_f64(0, 2500),
                        rng.gen_f64(1, 600),
                        rng.gen_f64(1, 600),
                    );
                    view.set_viewport(viewport);
                }
                3 => {
                    let index = rng.gen_range_usize(0, columns * rows);
                    state.borrow_mut().pend_once.insert(index);
                }
                4 => {
                    let pending = state.borrow().only_pending();
                    if let Some(index) = pending {
                        state.borrow_mut().complete(index);
                        view.on_creation_completed(index);
                    }
                }
                5 => {
                    if rng.gen_bool() {
                        view.invalidate();
                    } else {
                        view.set_buffer_margin(rng.gen_f64(0, 200)).unwrap();
                    }
                }
                6 => {
                    let spacing = Spacing::new(rng.gen_f64(0, 8), rng.gen_f64(0, 8));
                    view.set_spacing(spacing).unwrap();
                }
                _ => {
                    now += rng.gen_range_u64(0, 400);
                }
            }

            view.tick(now);
            assert!(!view.is_polish_scheduled() || view.load_request().is_some());
            assert_window_consistent(&view);
            assert_geometry_contiguous(&view);

            let live = state.borrow().live.len();
            let placeholders = {
                let mut count = 0;
                view.for_each_loaded_item(|loaded| count += usize::from(loaded.owns_placeholder()));
                count
            };
            assert_eq!(
                live + placeholders,
                view.loaded_item_count(),
                "seed {seed}: {}",
                view.layout_summary()
            );
        }
    }
}

#[cfg(feature = "tracing")]
#[test]
fn invalid_sizes_are_reported_as_warnings() {
    use tracing_subscriber::layer::{Context, SubscriberExt};
    use tracing_subscriber::Layer;

    struct WarnCounter(Arc<AtomicUsize>);

    impl<S: tracing::Subscriber> Layer<S> for WarnCounter {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            let meta = event.metadata();
            if *meta.level() == tracing::Level::WARN && meta.target() == "tableview" {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    let warnings = Arc::new(AtomicUsize::new(0));
    let subscriber = tracing_subscriber::registry().with(WarnCounter(Arc::clone(&warnings)));
    tracing::subscriber::with_default(subscriber, || {
        let (factory, _) = MockFactory::new();
        let mut view = view_with(
            TableViewOptions::new().with_row_height_provider(Some(|_: usize| -1.0)),
            TestModel::new(10, 1000),
            factory,
            Rect::new(0.0, 0.0, 400.0, 100.0),
        );
        view.polish();
    });

    assert_eq!(warnings.load(Ordering::SeqCst), 1);
}
