use std::cell::Cell;
use std::collections::BTreeSet;
use std::rc::Rc;
use std::sync::{Arc, Mutex};

use crate::{ItemProvider, ListEvent, ListOptions, MeasureConstraints, Rect, StableId};

pub(super) struct Lcg(u64);

impl Lcg {
    pub(super) fn new(seed: u64) -> Self {
        Self(seed)
    }

    pub(super) fn next_u64(&mut self) -> u64 {
        // Deterministic, dependency-free PRNG for tests.
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0
    }

    pub(super) fn gen_range_u64(&mut self, start: u64, end_exclusive: u64) -> u64 {
        debug_assert!(start < end_exclusive);
        let span = end_exclusive - start;
        start + ((self.next_u64() >> 16) % span)
    }

    pub(super) fn gen_range_usize(&mut self, start: usize, end_exclusive: usize) -> usize {
        self.gen_range_u64(start as u64, end_exclusive as u64) as usize
    }

    pub(super) fn gen_range_u32(&mut self, start: u32, end_exclusive: u32) -> u32 {
        self.gen_range_u64(start as u64, end_exclusive as u64) as u32
    }

    pub(super) fn gen_range_i32(&mut self, start: i32, end_exclusive: i32) -> i32 {
        let span = (i64::from(end_exclusive) - i64::from(start)) as u64;
        (i64::from(start) + self.gen_range_u64(0, span) as i64) as i32
    }

    pub(super) fn gen_bool(&mut self) -> bool {
        self.next_u64() >> 63 == 1
    }
}

/// A view that tracks how many instances are alive.
#[derive(Debug)]
pub(super) struct TestView {
    pub serial: usize,
    pub bound: usize,
    pub checked: bool,
    pub live: bool,
    alive: Rc<Cell<usize>>,
}

impl Drop for TestView {
    fn drop(&mut self) {
        self.alive.set(self.alive.get() - 1);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) struct BindRecord {
    pub index: usize,
    pub recycled_from: Option<usize>,
}

/// Items of configurable width whose binds are logged.
pub(super) struct TestProvider {
    pub widths: Vec<u32>,
    pub ids: Vec<StableId>,
    pub stable: bool,
    pub disabled: BTreeSet<usize>,
    pub live_state: BTreeSet<usize>,
    pub checkable: bool,
    pub binds: Vec<BindRecord>,
    pub created: usize,
    pub alive: Rc<Cell<usize>>,
}

impl TestProvider {
    pub(super) fn new(widths: Vec<u32>) -> Self {
        let ids = (0..widths.len() as u64).map(|i| 1_000 + i).collect();
        Self {
            widths,
            ids,
            stable: false,
            disabled: BTreeSet::new(),
            live_state: BTreeSet::new(),
            checkable: false,
            binds: Vec::new(),
            created: 0,
            alive: Rc::new(Cell::new(0)),
        }
    }

    pub(super) fn uniform(count: usize, width: u32) -> Self {
        Self::new(vec![width; count])
    }

    pub(super) fn with_stable_ids(mut self) -> Self {
        self.stable = true;
        self
    }

    pub(super) fn checkable(mut self) -> Self {
        self.checkable = true;
        self
    }

    pub(super) fn insert(&mut self, index: usize, width: u32, id: StableId) {
        self.widths.insert(index, width);
        self.ids.insert(index, id);
    }

    pub(super) fn remove(&mut self, index: usize) {
        self.widths.remove(index);
        self.ids.remove(index);
    }

    pub(super) fn alive(&self) -> usize {
        self.alive.get()
    }
}

impl ItemProvider for TestProvider {
    type View = TestView;

    fn count(&self) -> usize {
        self.widths.len()
    }

    fn has_stable_ids(&self) -> bool {
        self.stable
    }

    fn id_for(&self, index: usize) -> Option<StableId> {
        self.stable.then(|| self.ids.get(index).copied()).flatten()
    }

    fn is_enabled(&self, index: usize) -> bool {
        !self.disabled.contains(&index)
    }

    fn bind(&mut self, index: usize, recycled: Option<TestView>) -> TestView {
        let live = self.live_state.contains(&index);
        match recycled {
            Some(mut view) => {
                self.binds.push(BindRecord {
                    index,
                    recycled_from: Some(view.bound),
                });
                view.bound = index;
                view.live = live;
                view
            }
            None => {
                self.binds.push(BindRecord {
                    index,
                    recycled_from: None,
                });
                self.created += 1;
                self.alive.set(self.alive.get() + 1);
                TestView {
                    serial: self.created,
                    bound: index,
                    checked: false,
                    live,
                    alive: Rc::clone(&self.alive),
                }
            }
        }
    }

    fn measure(&mut self, index: usize, _view: &TestView, _constraints: MeasureConstraints) -> u32 {
        self.widths[index]
    }

    fn has_live_state(&self, view: &TestView) -> bool {
        view.live
    }

    fn supports_checked_visual_state(&self, _view: &TestView) -> bool {
        self.checkable
    }

    fn set_checked_visual_state(&mut self, view: &mut TestView, checked: bool) {
        view.checked = checked;
    }
}

pub(super) fn options(main: u32) -> ListOptions {
    ListOptions::new(Rect { main, cross: 100 })
}

pub(super) type EventLog = Arc<Mutex<Vec<ListEvent>>>;

/// Options whose callback records every event. Long clicks report `handle_long_click`.
pub(super) fn recording_options(main: u32, handle_long_click: bool) -> (ListOptions, EventLog) {
    let log: EventLog = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&log);
    let options = options(main).with_on_event(Some(move |event: &ListEvent| {
        sink.lock().unwrap().push(*event);
        matches!(event, ListEvent::ItemLongClick { .. }) && handle_long_click
    }));
    (options, log)
}

pub(super) fn take_events(log: &EventLog) -> Vec<ListEvent> {
    core::mem::take(&mut *log.lock().unwrap())
}

pub(super) fn has_event(events: &[ListEvent], wanted: ListEvent) -> bool {
    events.iter().any(|e| *e == wanted)
}
