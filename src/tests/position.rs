use super::support::{TestProvider, options};
use crate::{HorizontalList, MotionState, PointerEvent, PositionScroller, ScrollStep, Window};

fn run(list: &mut HorizontalList<TestProvider>, from_ms: u64) {
    let mut now = from_ms;
    while list.on_tick(now) {
        now += 16;
        assert!(now < from_ms + 60_000, "position scroll never finished");
    }
}

#[test]
fn scrolls_forward_to_far_item() {
    let mut list = HorizontalList::headless(TestProvider::uniform(100, 100), options(500));
    list.smooth_scroll_to_position(50, 0, Some(1_000), 0);
    assert!(list.is_position_scrolling());
    assert_eq!(list.motion_state(), MotionState::Fling);

    run(&mut list, 16);
    assert!(!list.is_position_scrolling());
    assert_eq!(list.motion_state(), MotionState::Rest);
    assert_eq!(list.first_visible_index(), Some(50));
    assert_eq!(list.window().descriptor(50).map(|d| d.left), Some(0));
    assert_eq!(list.scroll_offset(), 5_000);
}

#[test]
fn scrolls_backward_with_offset() {
    let mut list = HorizontalList::headless(TestProvider::uniform(100, 100), options(500));
    list.set_selection_from_left(80, 0);
    list.smooth_scroll_to_position(10, 30, None, 0);
    run(&mut list, 16);
    assert_eq!(list.window().descriptor(10).map(|d| d.left), Some(30));
    assert_eq!(list.first_visible_index(), Some(9));
}

#[test]
fn visible_target_takes_a_single_step() {
    let mut list = HorizontalList::headless(TestProvider::uniform(100, 100), options(500));
    list.smooth_scroll_to_position(3, 0, Some(300), 0);
    assert!(!list.is_position_scrolling());
    run(&mut list, 16);
    assert_eq!(list.first_visible_index(), Some(3));
    assert_eq!(list.window().descriptor(3).map(|d| d.left), Some(0));
    assert_eq!(list.scroll_offset(), 300);
}

#[test]
fn target_past_the_end_stops_at_edge() {
    let mut list = HorizontalList::headless(TestProvider::uniform(40, 100), options(500));
    list.smooth_scroll_to_position(99, 0, Some(500), 0);
    run(&mut list, 16);
    assert!(!list.is_position_scrolling());
    assert_eq!(list.last_visible_index(), Some(39));
    assert_eq!(list.window().right(), Some(500));
}

#[test]
fn pointer_down_cancels_position_scroll() {
    let mut list = HorizontalList::headless(TestProvider::uniform(100, 100), options(500));
    list.smooth_scroll_to_position(60, 0, Some(2_000), 0);
    list.on_tick(16);
    assert!(list.is_position_scrolling());
    list.on_pointer_event(PointerEvent::down(10.0, 20));
    assert!(!list.is_position_scrolling());
}

#[test]
fn scroller_steps_one_item_past_window() {
    let mut scroller = PositionScroller::new();
    let window: Window<()> = Window::new();
    assert_eq!(scroller.animate_to(4, 0, 100, 0, &window, 10, (0, 500)), None);
    assert!(!scroller.is_running());
    assert_eq!(scroller.animate_to(4, 0, 100, 0, &window, 0, (0, 500)), None);
}

#[test]
fn scroller_plans_steps_from_window() {
    let mut list = HorizontalList::headless(TestProvider::uniform(100, 100), options(500));
    list.scroll_by(50);
    let mut scroller = PositionScroller::new();
    let step = scroller.animate_to(20, 0, 1_000, 0, list.window(), 100, (0, 500));
    // One item past the 50 px overhang, spread over the 15 remaining items.
    assert_eq!(step, Some(ScrollStep { distance: 150, duration_ms: 66 }));
    assert_eq!(scroller.target_index(), Some(20));

    // Same window twice more: the scroller gives up.
    assert!(scroller.next_step(10, list.window(), 100, (0, 500)).is_some());
    assert_eq!(scroller.next_step(20, list.window(), 100, (0, 500)), None);
    assert!(!scroller.is_running());
}
