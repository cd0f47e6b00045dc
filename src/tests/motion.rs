use super::support::{TestProvider, has_event, options, recording_options, take_events};
use crate::{
    ChoiceMode, EdgeState, HorizontalList, ListEvent, MotionState, PointerAction, PointerEvent,
    ScrollState,
};

fn list_of(count: usize, main: u32) -> HorizontalList<TestProvider> {
    HorizontalList::headless(TestProvider::uniform(count, 100), options(main))
}

/// Ticks every 16 ms until the list goes idle, returning the time it stopped at.
fn settle(list: &mut HorizontalList<TestProvider>, from_ms: u64) -> u64 {
    let mut now = from_ms;
    while list.on_tick(now) {
        now += 16;
        assert!(now < from_ms + 20_000, "list never settled");
    }
    now
}

#[test]
fn tap_after_timeout_presses_then_clicks() {
    let (opts, log) = recording_options(500, false);
    let mut list = HorizontalList::headless(TestProvider::uniform(20, 100), opts);

    assert!(list.on_pointer_event(PointerEvent::down(150.0, 0)));
    assert_eq!(list.motion_state(), MotionState::Down);
    assert!(list.host().tick_requests > 0);

    list.on_tick(50);
    assert_eq!(list.motion_state(), MotionState::Down);
    list.on_tick(100);
    assert_eq!(list.motion_state(), MotionState::Tap);
    assert_eq!(list.pressed_index(), Some(1));

    list.on_pointer_event(PointerEvent::up(152.0, 120));
    assert_eq!(list.motion_state(), MotionState::Rest);
    assert_eq!(list.pressed_index(), None);

    let events = take_events(&log);
    assert!(has_event(&events, ListEvent::PressedChanged(Some(1))));
    assert!(has_event(&events, ListEvent::ItemClick { index: 1, id: None }));
    assert_eq!(events.last(), Some(&ListEvent::MotionStateChanged {
        from: MotionState::Tap,
        to: MotionState::Rest,
    }));
}

#[test]
fn quick_tap_still_clicks() {
    let (opts, log) = recording_options(500, false);
    let mut list = HorizontalList::headless(TestProvider::uniform(20, 100), opts);
    list.on_pointer_event(PointerEvent::down(250.0, 0));
    list.on_pointer_event(PointerEvent::up(250.0, 40));
    let events = take_events(&log);
    assert!(has_event(&events, ListEvent::ItemClick { index: 2, id: None }));
}

#[test]
fn release_over_another_item_does_not_click() {
    let (opts, log) = recording_options(500, false);
    let mut list = HorizontalList::headless(TestProvider::uniform(20, 100), opts.with_touch_slop(200));
    list.on_pointer_event(PointerEvent::down(150.0, 0));
    list.on_pointer_event(PointerEvent::moved(260.0, 20));
    list.on_pointer_event(PointerEvent::up(260.0, 40));
    let events = take_events(&log);
    assert!(!events.iter().any(|e| matches!(e, ListEvent::ItemClick { .. })));
    assert_eq!(list.scroll_offset(), 0);
}

#[test]
fn disabled_items_are_not_pressed() {
    let mut provider = TestProvider::uniform(20, 100);
    provider.disabled.insert(1);
    let (opts, log) = recording_options(500, false);
    let mut list = HorizontalList::headless(provider, opts);
    list.on_pointer_event(PointerEvent::down(150.0, 0));
    assert_eq!(list.motion_state(), MotionState::Rest);
    list.on_pointer_event(PointerEvent::up(150.0, 30));
    assert!(!take_events(&log).iter().any(|e| matches!(e, ListEvent::ItemClick { .. })));
}

#[test]
fn handled_long_press_suppresses_click() {
    let (opts, log) = recording_options(500, true);
    let mut list = HorizontalList::headless(TestProvider::uniform(20, 100), opts);
    list.on_pointer_event(PointerEvent::down(50.0, 0));
    list.on_tick(100);
    assert_eq!(list.motion_state(), MotionState::Tap);
    list.on_tick(400);
    assert_eq!(list.motion_state(), MotionState::Tap);
    list.on_tick(600);
    assert_eq!(list.motion_state(), MotionState::Rest);
    list.on_pointer_event(PointerEvent::up(50.0, 700));

    let events = take_events(&log);
    assert!(has_event(&events, ListEvent::ItemLongClick { index: 0, id: None }));
    assert!(!events.iter().any(|e| matches!(e, ListEvent::ItemClick { .. })));
}

#[test]
fn press_on_disabled_item_never_drags() {
    let mut provider = TestProvider::uniform(20, 100);
    provider.disabled.insert(1);
    let mut list = HorizontalList::headless(provider, options(500));
    list.on_pointer_event(PointerEvent::down(150.0, 0));
    list.on_pointer_event(PointerEvent::moved(100.0, 16));
    list.on_pointer_event(PointerEvent::moved(-50.0, 32));
    assert_eq!(list.motion_state(), MotionState::Rest);
    assert_eq!(list.scroll_offset(), 0);
    list.on_pointer_event(PointerEvent::up(-50.0, 48));
    assert_eq!(list.motion_state(), MotionState::Rest);
}

#[test]
fn moving_after_handled_long_press_does_not_scroll() {
    let (opts, log) = recording_options(500, true);
    let mut list = HorizontalList::headless(TestProvider::uniform(20, 100), opts);
    list.on_pointer_event(PointerEvent::down(250.0, 0));
    list.on_tick(100);
    list.on_tick(600);
    assert_eq!(list.motion_state(), MotionState::Rest);

    list.on_pointer_event(PointerEvent::moved(50.0, 620));
    assert_eq!(list.motion_state(), MotionState::Rest);
    assert_eq!(list.scroll_offset(), 0);
    list.on_pointer_event(PointerEvent::up(50.0, 640));
    assert!(!take_events(&log).iter().any(|e| matches!(e, ListEvent::ItemClick { .. })));
}

#[test]
fn unhandled_long_press_waits_then_clicks() {
    let (opts, log) = recording_options(500, false);
    let mut list = HorizontalList::headless(TestProvider::uniform(20, 100), opts);
    list.on_pointer_event(PointerEvent::down(50.0, 0));
    list.on_tick(100);
    list.on_tick(600);
    assert_eq!(list.motion_state(), MotionState::DoneWaiting);
    list.on_pointer_event(PointerEvent::up(50.0, 700));
    let events = take_events(&log);
    assert!(has_event(&events, ListEvent::ItemLongClick { index: 0, id: None }));
    assert!(has_event(&events, ListEvent::ItemClick { index: 0, id: None }));
}

#[test]
fn drag_starts_past_slop_without_jump() {
    let (opts, log) = recording_options(500, false);
    let mut list = HorizontalList::headless(TestProvider::uniform(100, 100), opts);
    list.on_pointer_event(PointerEvent::down(300.0, 0));
    list.on_pointer_event(PointerEvent::moved(295.0, 8));
    assert_eq!(list.motion_state(), MotionState::Down);
    assert_eq!(list.scroll_offset(), 0);

    list.on_pointer_event(PointerEvent::moved(250.0, 16));
    assert_eq!(list.motion_state(), MotionState::Drag);
    assert_eq!(list.scroll_offset(), 42);
    list.on_pointer_event(PointerEvent::moved(200.0, 24));
    assert_eq!(list.scroll_offset(), 92);
    assert_eq!(list.host().offset, 92);

    let events = take_events(&log);
    assert!(has_event(&events, ListEvent::ScrollStateChanged(ScrollState::TouchScroll)));
    assert!(events.iter().any(|e| matches!(e, ListEvent::Scrolled { first_index: 0, .. })));

    // Dragging right moves back towards the start.
    list.on_pointer_event(PointerEvent::moved(230.0, 32));
    assert_eq!(list.scroll_offset(), 62);
}

#[test]
fn slow_release_does_not_fling() {
    let mut list = list_of(100, 500);
    list.on_pointer_event(PointerEvent::down(300.0, 0));
    list.on_pointer_event(PointerEvent::moved(280.0, 100));
    list.on_pointer_event(PointerEvent::moved(279.0, 400));
    list.on_pointer_event(PointerEvent::up(279.0, 480));
    assert_eq!(list.motion_state(), MotionState::Rest);
}

#[test]
fn fast_release_flings_and_settles() {
    let (opts, log) = recording_options(500, false);
    let mut list = HorizontalList::headless(TestProvider::uniform(1_000, 100), opts);
    list.on_pointer_event(PointerEvent::down(400.0, 0));
    for (i, x) in [380.0, 340.0, 280.0, 200.0].into_iter().enumerate() {
        list.on_pointer_event(PointerEvent::moved(x, 8 * (i as u64 + 1)));
    }
    list.on_pointer_event(PointerEvent::up(200.0, 40));
    assert_eq!(list.motion_state(), MotionState::Fling);
    let released_at = list.scroll_offset();

    settle(&mut list, 56);
    assert_eq!(list.motion_state(), MotionState::Rest);
    assert!(list.scroll_offset() > released_at + 200);

    let events = take_events(&log);
    assert!(has_event(&events, ListEvent::ScrollStateChanged(ScrollState::Fling)));
    assert_eq!(events.iter().rev().find_map(|e| match e {
        ListEvent::ScrollStateChanged(s) => Some(*s),
        _ => None,
    }), Some(ScrollState::Idle));
}

#[test]
fn fling_into_trailing_edge_overflings_then_rests() {
    let (opts, log) = recording_options(500, false);
    let mut list = HorizontalList::headless(TestProvider::uniform(9, 100), opts);
    list.fling(-2_000.0, 0);
    assert_eq!(list.motion_state(), MotionState::Fling);

    let mut now = 0;
    while list.on_tick(now) && now < 5_000 {
        now += 16;
        if list.motion_state() == MotionState::Rest {
            break;
        }
    }
    assert_eq!(list.motion_state(), MotionState::Rest);
    assert_eq!(list.scroll_offset(), 400);
    assert_eq!(list.overscroll_offset(), 0);
    assert_eq!(list.window().last_index(), Some(8));
    assert_eq!(list.window().right(), Some(500));

    let events = take_events(&log);
    assert!(has_event(&events, ListEvent::MotionStateChanged {
        from: MotionState::Fling,
        to: MotionState::Overfling,
    }));
    assert!(has_event(&events, ListEvent::MotionStateChanged {
        from: MotionState::Overfling,
        to: MotionState::Rest,
    }));
    assert_ne!(list.edge_effects().trailing.state(), EdgeState::Pull);
}

#[test]
fn fling_with_overfling_distance_springs_back() {
    let opts = options(500).with_overfling_distance(40);
    let mut list = HorizontalList::headless(TestProvider::uniform(9, 100), opts);
    list.fling(-3_000.0, 0);

    let mut peak = 0;
    let mut now = 0;
    while list.on_tick(now) {
        peak = peak.max(list.overscroll_offset());
        now += 8;
        assert!(now < 10_000);
    }
    assert!(peak > 0 && peak <= 40, "peak overscroll {peak}");
    assert_eq!(list.overscroll_offset(), 0);
    assert_eq!(list.scroll_offset(), 400);
    assert_eq!(list.host().offset, 400);
    assert_eq!(list.motion_state(), MotionState::Rest);
}

#[test]
fn dragging_past_leading_edge_pulls_and_springs_back() {
    let mut list = list_of(20, 500);
    list.on_pointer_event(PointerEvent::down(100.0, 0));
    list.on_pointer_event(PointerEvent::moved(200.0, 16));
    assert_eq!(list.motion_state(), MotionState::Overscroll);
    assert_eq!(list.overscroll_offset(), -46);
    assert_eq!(list.edge_effects().leading.state(), EdgeState::Pull);
    assert!(list.edge_effects().leading.magnitude() > 0.0);

    // The pull is capped at the configured distance.
    list.on_pointer_event(PointerEvent::moved(600.0, 32));
    assert_eq!(list.overscroll_offset(), -64);

    list.on_pointer_event(PointerEvent::up(600.0, 48));
    assert_eq!(list.motion_state(), MotionState::Overfling);
    assert_eq!(list.edge_effects().leading.state(), EdgeState::Recede);
    settle(&mut list, 64);
    assert_eq!(list.motion_state(), MotionState::Rest);
    assert_eq!(list.overscroll_offset(), 0);
    assert_eq!(list.scroll_offset(), 0);
    assert!(list.edge_effects().is_finished());
}

#[test]
fn reversing_an_overscroll_releases_it_first() {
    let mut list = list_of(20, 500);
    list.on_pointer_event(PointerEvent::down(100.0, 0));
    list.on_pointer_event(PointerEvent::moved(200.0, 16));
    assert_eq!(list.overscroll_offset(), -46);

    list.on_pointer_event(PointerEvent::moved(170.0, 32));
    assert_eq!(list.overscroll_offset(), -16);
    assert_eq!(list.scroll_offset(), 0);

    list.on_pointer_event(PointerEvent::moved(120.0, 48));
    assert_eq!(list.overscroll_offset(), 0);
    assert_eq!(list.motion_state(), MotionState::Drag);
    assert_eq!(list.scroll_offset(), 34);
}

#[test]
fn no_glow_without_hardware_acceleration() {
    let mut list = list_of(20, 500);
    list.host_mut().hardware_accelerated = false;
    list.on_pointer_event(PointerEvent::down(100.0, 0));
    list.on_pointer_event(PointerEvent::moved(200.0, 16));
    assert_eq!(list.motion_state(), MotionState::Overscroll);
    assert_eq!(list.edge_effects().leading.magnitude(), 0.0);
    assert!(list.edge_effects().is_finished());
}

#[test]
fn fast_fling_is_caught_into_a_drag() {
    let mut list = list_of(1_000, 500);
    list.fling(-8_000.0, 0);
    list.on_tick(16);
    assert_eq!(list.motion_state(), MotionState::Fling);
    let offset = list.scroll_offset();

    list.on_pointer_event(PointerEvent::down(250.0, 32));
    assert_eq!(list.motion_state(), MotionState::Drag);
    list.on_tick(48);
    assert_eq!(list.scroll_offset(), offset);

    list.on_pointer_event(PointerEvent::moved(240.0, 48));
    assert_eq!(list.scroll_offset(), offset + 10);
}

#[test]
fn slow_animation_stops_and_hit_tests() {
    let (opts, log) = recording_options(500, false);
    let mut list = HorizontalList::headless(TestProvider::uniform(100, 100), opts);
    list.smooth_scroll_by(10, 1_000, 0);
    list.on_tick(16);
    assert_eq!(list.motion_state(), MotionState::Fling);

    list.on_pointer_event(PointerEvent::down(250.0, 32));
    assert_eq!(list.motion_state(), MotionState::Down);
    list.on_pointer_event(PointerEvent::up(250.0, 60));
    assert!(has_event(&take_events(&log), ListEvent::ItemClick { index: 2, id: None }));
}

#[test]
fn cancel_returns_to_rest_without_click() {
    let (opts, log) = recording_options(500, false);
    let mut list = HorizontalList::headless(TestProvider::uniform(20, 100), opts);
    list.on_pointer_event(PointerEvent::down(150.0, 0));
    list.on_tick(100);
    list.on_pointer_event(PointerEvent::cancel(120));
    assert_eq!(list.motion_state(), MotionState::Rest);
    assert_eq!(list.pressed_index(), None);
    let events = take_events(&log);
    assert!(!events.iter().any(|e| matches!(e, ListEvent::ItemClick { .. })));
    assert!(!list.on_pointer_event(PointerEvent::moved(10.0, 130)));
}

#[test]
fn second_pointer_takes_over_without_jump() {
    let mut list = list_of(100, 500);
    let at = |action, id, x, t| PointerEvent::new(action, id, x, 0.0, t);

    list.on_pointer_event(at(PointerAction::Down, 0, 300.0, 0));
    list.on_pointer_event(at(PointerAction::Move, 0, 250.0, 10));
    assert_eq!(list.scroll_offset(), 42);

    list.on_pointer_event(at(PointerAction::PointerDown, 1, 100.0, 20));
    assert_eq!(list.scroll_offset(), 42);
    list.on_pointer_event(at(PointerAction::Move, 1, 80.0, 30));
    assert_eq!(list.scroll_offset(), 62);

    // The first pointer is no longer active.
    list.on_pointer_event(at(PointerAction::Move, 0, 0.0, 35));
    assert_eq!(list.scroll_offset(), 62);

    list.on_pointer_event(at(PointerAction::PointerUp, 1, 80.0, 40));
    list.on_pointer_event(at(PointerAction::Move, 0, 240.0, 50));
    assert_eq!(list.scroll_offset(), 62);
    list.on_pointer_event(at(PointerAction::Move, 0, 230.0, 60));
    assert_eq!(list.scroll_offset(), 72);
}

#[test]
fn click_in_single_choice_checks_before_reporting() {
    let (opts, log) = recording_options(500, false);
    let mut list = HorizontalList::headless(TestProvider::uniform(20, 100), opts);
    list.set_choice_mode(ChoiceMode::Single);
    list.on_pointer_event(PointerEvent::down(150.0, 0));
    list.on_pointer_event(PointerEvent::up(150.0, 20));
    list.on_pointer_event(PointerEvent::down(350.0, 100));
    list.on_pointer_event(PointerEvent::up(350.0, 120));
    assert_eq!(list.checked_item_position(), Some(3));

    let events = take_events(&log);
    let checked = events
        .iter()
        .position(|e| *e == ListEvent::ItemCheckedChanged { index: 1, id: None, checked: true });
    let clicked = events
        .iter()
        .position(|e| *e == ListEvent::ItemClick { index: 1, id: None });
    assert!(checked.is_some() && checked < clicked);
}

#[test]
fn click_in_multiple_choice_toggles() {
    let mut list = list_of(20, 500);
    list.set_choice_mode(ChoiceMode::Multiple);
    for t in [0u64, 100] {
        list.on_pointer_event(PointerEvent::down(150.0, t));
        list.on_pointer_event(PointerEvent::up(150.0, t + 20));
    }
    assert!(!list.is_item_checked(1));
    list.on_pointer_event(PointerEvent::down(150.0, 200));
    list.on_pointer_event(PointerEvent::up(150.0, 220));
    assert!(list.is_item_checked(1));
}
