use crate::edge::EdgeEffects;
use crate::fling::{FlingMode, FlingPhysics, PhysicsConfig};
use crate::velocity::VelocityTracker;
use crate::{Edge, ListEvent, MotionState, PointerAction, PointerEvent, ScrollDirection, ScrollOutcome};

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct MotionConfig {
    pub touch_slop: u32,
    pub min_fling_velocity: f32,
    pub max_fling_velocity: f32,
    pub flywheel_velocity: f32,
    pub overscroll_distance: u32,
    pub overscroll_damping: f32,
    pub overfling_distance: u32,
    pub tap_timeout_ms: u64,
    pub long_press_timeout_ms: u64,
    pub clickable: bool,
    pub long_clickable: bool,
    pub edge_effects_enabled: bool,
    pub max_edge_effect: f32,
    pub physics: PhysicsConfig,
}

/// What the motion controller drives. Implemented by the list façade over its layout engine.
pub(crate) trait MotionTarget {
    /// Main-axis extent of the content area, used to normalize edge pulls.
    fn viewport_extent(&self) -> i32;
    fn item_at(&self, x: i32) -> Option<usize>;
    fn is_item_enabled(&self, index: usize) -> bool;
    /// `delta > 0` moves towards higher indices.
    fn scroll_by(&mut self, delta: i32) -> ScrollOutcome;
    fn can_scroll(&self, direction: ScrollDirection) -> bool;
    fn set_pressed(&mut self, index: Option<usize>);
    fn perform_click(&mut self, index: usize);
    /// Returns whether the long click was handled.
    fn perform_long_click(&mut self, index: usize) -> bool;
    /// Distance the content is drawn past its edge; positive past the trailing edge.
    fn set_overscroll_offset(&mut self, px: i32);
    fn dispatch(&mut self, event: ListEvent) -> bool;
    fn request_tick(&mut self);
    fn edge_glow_allowed(&self) -> bool;
}

/// Interprets pointer events and ticks into drags, flings, overscroll and clicks.
#[derive(Clone, Debug)]
pub struct MotionController {
    config: MotionConfig,
    state: MotionState,
    physics: FlingPhysics,
    tracker: VelocityTracker,
    edges: EdgeEffects,
    active_pointer: Option<u32>,
    pointers_down: usize,
    down_x: f32,
    last_x: f32,
    /// Sub-pixel drag travel not yet applied.
    remainder: f32,
    motion_index: Option<usize>,
    pressed: Option<usize>,
    down_ms: u64,
    long_press_at: Option<u64>,
    overscroll: i32,
    last_fling_offset: i32,
}

impl MotionController {
    pub(crate) fn new(config: MotionConfig) -> Self {
        Self {
            config,
            state: MotionState::Rest,
            physics: FlingPhysics::new(config.physics),
            tracker: VelocityTracker::new(),
            edges: EdgeEffects::new(config.max_edge_effect),
            active_pointer: None,
            pointers_down: 0,
            down_x: 0.0,
            last_x: 0.0,
            remainder: 0.0,
            motion_index: None,
            pressed: None,
            down_ms: 0,
            long_press_at: None,
            overscroll: 0,
            last_fling_offset: 0,
        }
    }

    pub(crate) fn set_config(&mut self, config: MotionConfig) {
        self.config = config;
        self.physics.set_config(config.physics);
        self.edges.set_max_effect(config.max_edge_effect);
        if !config.edge_effects_enabled {
            self.edges.finish();
        }
    }

    pub fn state(&self) -> MotionState {
        self.state
    }

    pub fn overscroll(&self) -> i32 {
        self.overscroll
    }

    pub fn edges(&self) -> &EdgeEffects {
        &self.edges
    }

    pub fn physics(&self) -> &FlingPhysics {
        &self.physics
    }

    pub fn pressed(&self) -> Option<usize> {
        self.pressed
    }

    pub fn is_pointer_down(&self) -> bool {
        self.pointers_down > 0
    }

    /// Whether [`Self::on_tick`] still has work to do.
    pub fn needs_ticks(&self) -> bool {
        self.state.is_animating()
            || matches!(self.state, MotionState::Down)
            || (self.state == MotionState::Tap && self.long_press_at.is_some())
            || !self.edges.is_finished()
    }

    fn set_state(&mut self, to: MotionState, target: &mut impl MotionTarget) {
        let from = self.state;
        if from == to {
            return;
        }
        self.state = to;
        ldebug!(?from, ?to, "motion state");
        target.dispatch(ListEvent::MotionStateChanged { from, to });
        if from.scroll_state() != to.scroll_state() {
            target.dispatch(ListEvent::ScrollStateChanged(to.scroll_state()));
        }
    }

    fn set_pressed(&mut self, index: Option<usize>, target: &mut impl MotionTarget) {
        if self.pressed != index {
            self.pressed = index;
            target.set_pressed(index);
        }
    }

    fn set_overscroll(&mut self, px: i32, target: &mut impl MotionTarget) {
        if self.overscroll != px {
            self.overscroll = px;
            target.set_overscroll_offset(px);
        }
    }

    fn glow(&self, target: &impl MotionTarget) -> bool {
        self.config.edge_effects_enabled && target.edge_glow_allowed()
    }

    /// Feeds one pointer event. Returns whether the event was consumed.
    pub(crate) fn on_pointer_event(&mut self, event: &PointerEvent, target: &mut impl MotionTarget) -> bool {
        match event.action {
            PointerAction::Down => self.on_down(event, target),
            PointerAction::Move => self.on_move(event, target),
            PointerAction::Up => self.on_up(event, target),
            PointerAction::Cancel => {
                self.on_cancel(event.time_ms, target);
                true
            }
            PointerAction::PointerDown => {
                self.pointers_down += 1;
                self.active_pointer = Some(event.pointer_id);
                self.down_x = event.x;
                self.adopt(event);
                true
            }
            PointerAction::PointerUp => {
                self.pointers_down = self.pointers_down.saturating_sub(1);
                if self.active_pointer == Some(event.pointer_id) {
                    // The next pointer that moves takes over.
                    self.active_pointer = None;
                    self.tracker.clear();
                }
                true
            }
        }
    }

    /// Continues the gesture from `event`'s position without a jump.
    fn adopt(&mut self, event: &PointerEvent) {
        self.last_x = event.x;
        self.remainder = 0.0;
        self.tracker.clear();
        self.tracker.add(event.time_ms, event.x);
    }

    fn on_down(&mut self, event: &PointerEvent, target: &mut impl MotionTarget) -> bool {
        let now = event.time_ms;
        self.pointers_down = 1;
        self.active_pointer = Some(event.pointer_id);
        self.down_x = event.x;
        self.down_ms = now;
        self.long_press_at = None;
        self.adopt(event);

        match self.state {
            MotionState::Fling => {
                let velocity = self.physics.current_velocity();
                self.physics.abort();
                if velocity.abs() >= self.config.flywheel_velocity {
                    // Catch the list and keep dragging.
                    self.motion_index = None;
                    self.set_state(MotionState::Drag, target);
                    return true;
                }
                // Stop the animation, then hit-test the static layout.
                self.set_state(MotionState::Rest, target);
            }
            MotionState::Overfling => {
                self.physics.abort();
                self.motion_index = None;
                self.set_state(MotionState::Overscroll, target);
                return true;
            }
            _ => {}
        }

        let hit = target
            .item_at(event.x as i32)
            .filter(|&i| target.is_item_enabled(i));
        self.motion_index = hit;
        match hit {
            Some(_) => {
                self.set_state(MotionState::Down, target);
                target.request_tick();
            }
            None => self.set_state(MotionState::Rest, target),
        }
        self.config.clickable || hit.is_some()
    }

    fn on_move(&mut self, event: &PointerEvent, target: &mut impl MotionTarget) -> bool {
        if self.pointers_down == 0 {
            return false;
        }
        match self.active_pointer {
            None => {
                self.active_pointer = Some(event.pointer_id);
                self.down_x = event.x;
                self.adopt(event);
                return true;
            }
            Some(id) if id != event.pointer_id => return true,
            Some(_) => {}
        }
        self.tracker.add(event.time_ms, event.x);

        match self.state {
            MotionState::Down | MotionState::Tap | MotionState::DoneWaiting => {
                let travel = event.x - self.down_x;
                let slop = self.config.touch_slop as f32;
                if travel.abs() <= slop {
                    return true;
                }
                self.long_press_at = None;
                self.motion_index = None;
                self.set_pressed(None, target);
                self.set_state(MotionState::Drag, target);
                // Start from the slop boundary so the content doesn't jump.
                self.last_x = self.down_x + slop.copysign(travel);
                self.remainder = 0.0;
                self.drag_to(event.x, event.time_ms, target);
            }
            MotionState::Drag | MotionState::Overscroll => self.drag_to(event.x, event.time_ms, target),
            // A press off any enabled item, or one consumed by a long click, never scrolls.
            MotionState::Rest | MotionState::Fling | MotionState::Overfling => {}
        }
        true
    }

    fn take_delta(&mut self, x: f32) -> i32 {
        let total = (self.last_x - x) + self.remainder;
        self.last_x = x;
        let delta = total.trunc();
        self.remainder = total - delta;
        delta as i32
    }

    fn drag_to(&mut self, x: f32, now: u64, target: &mut impl MotionTarget) {
        let delta = self.take_delta(x);
        if delta == 0 {
            return;
        }
        if self.state == MotionState::Overscroll && self.overscroll == 0 {
            self.set_state(MotionState::Drag, target);
        }

        if self.state == MotionState::Overscroll {
            if delta.signum() == self.overscroll.signum() {
                self.pull(delta, now, target);
                return;
            }
            // Moving back towards the content.
            let released = self.overscroll + delta;
            if released.signum() == self.overscroll.signum() {
                self.set_overscroll(released, target);
                return;
            }
            self.set_overscroll(0, target);
            self.edges.release(now);
            self.set_state(MotionState::Drag, target);
            if released != 0 {
                self.scroll_or_pull(released, now, target);
            }
            return;
        }
        self.scroll_or_pull(delta, now, target);
    }

    fn scroll_or_pull(&mut self, delta: i32, now: u64, target: &mut impl MotionTarget) {
        let outcome = target.scroll_by(delta);
        let unconsumed = outcome.unconsumed(delta);
        if outcome.clamped && unconsumed != 0 {
            self.set_state(MotionState::Overscroll, target);
            self.pull(unconsumed, now, target);
        }
    }

    /// Pulls the content past an edge by a damped share of `delta`.
    fn pull(&mut self, delta: i32, now: u64, target: &mut impl MotionTarget) {
        let limit = i32::try_from(self.config.overscroll_distance).unwrap_or(i32::MAX);
        let damped = (delta as f32 * self.config.overscroll_damping).round() as i32;
        let damped = if damped == 0 { delta.signum() } else { damped };
        let next = self.overscroll.saturating_add(damped).clamp(-limit, limit);
        self.set_overscroll(next, target);

        if let Some(direction) = ScrollDirection::of(delta).filter(|_| self.glow(target)) {
            let extent = target.viewport_extent().max(1) as f32;
            self.edges
                .get_mut(Edge::of(direction))
                .on_pull(delta.unsigned_abs() as f32 / extent, now);
            target.request_tick();
        }
    }

    fn on_up(&mut self, event: &PointerEvent, target: &mut impl MotionTarget) -> bool {
        if self.pointers_down == 0 {
            return false;
        }
        let now = event.time_ms;
        if self.active_pointer == Some(event.pointer_id) {
            self.tracker.add(now, event.x);
        }

        match self.state {
            MotionState::Down | MotionState::Tap | MotionState::DoneWaiting => {
                if let Some(index) = self.motion_index {
                    let still_over = target.item_at(event.x as i32) == Some(index);
                    if still_over && self.config.clickable && target.is_item_enabled(index) {
                        self.set_pressed(Some(index), target);
                        target.perform_click(index);
                    }
                }
                self.set_pressed(None, target);
                self.set_state(MotionState::Rest, target);
            }
            MotionState::Drag => {
                let pointer_velocity = self.tracker.velocity_capped(self.config.max_fling_velocity);
                let velocity = -pointer_velocity;
                let can_travel = ScrollDirection::of(velocity.signum() as i32)
                    .is_some_and(|dir| target.can_scroll(dir));
                if velocity.abs() > self.config.min_fling_velocity && can_travel {
                    self.start_fling(velocity, now, target);
                } else {
                    self.set_state(MotionState::Rest, target);
                }
            }
            MotionState::Overscroll => {
                self.edges.release(now);
                self.spring_back_or_rest(now, target);
            }
            MotionState::Rest | MotionState::Fling | MotionState::Overfling => {}
        }

        self.pointers_down = 0;
        self.active_pointer = None;
        self.motion_index = None;
        self.long_press_at = None;
        self.tracker.clear();
        true
    }

    fn on_cancel(&mut self, now: u64, target: &mut impl MotionTarget) {
        self.pointers_down = 0;
        self.active_pointer = None;
        self.motion_index = None;
        self.long_press_at = None;
        self.tracker.clear();
        self.physics.abort();
        self.set_pressed(None, target);
        self.set_overscroll(0, target);
        self.edges.release(now);
        self.set_state(MotionState::Rest, target);
    }

    fn spring_back_or_rest(&mut self, now: u64, target: &mut impl MotionTarget) {
        if self.physics.start_springback(self.overscroll, 0, 0, now) {
            self.set_state(MotionState::Overfling, target);
            target.request_tick();
        } else {
            self.set_overscroll(0, target);
            self.set_state(MotionState::Rest, target);
        }
    }

    /// Starts a fling with a scroll-space velocity (positive towards higher indices).
    pub(crate) fn start_fling(&mut self, velocity: f32, now: u64, target: &mut impl MotionTarget) {
        let max = self.config.max_fling_velocity;
        let velocity = if max.is_finite() && max > 0.0 { velocity.clamp(-max, max) } else { velocity };
        self.physics.start_from_velocity(0, velocity, now);
        self.last_fling_offset = 0;
        self.set_state(MotionState::Fling, target);
        target.request_tick();
    }

    /// Scrolls exactly `distance` px over `duration_ms`, cancelling any running fling.
    pub(crate) fn smooth_scroll_by(&mut self, distance: i32, duration_ms: u64, now: u64, target: &mut impl MotionTarget) {
        self.physics.abort();
        if distance == 0 {
            if self.state == MotionState::Fling {
                self.set_state(MotionState::Rest, target);
            }
            return;
        }
        self.physics.start_from_distance(0, distance, duration_ms, now);
        self.last_fling_offset = 0;
        self.set_state(MotionState::Fling, target);
        target.request_tick();
    }

    /// Stops any animation immediately.
    pub(crate) fn stop(&mut self, target: &mut impl MotionTarget) {
        self.physics.abort();
        if self.state.is_animating() {
            self.set_overscroll(0, target);
            self.set_state(MotionState::Rest, target);
        }
    }

    /// Advances timers and animations. Returns whether more ticks are needed.
    pub(crate) fn on_tick(&mut self, now: u64, target: &mut impl MotionTarget) -> bool {
        match self.state {
            MotionState::Down if now >= self.down_ms.saturating_add(self.config.tap_timeout_ms) => {
                self.set_state(MotionState::Tap, target);
                self.set_pressed(self.motion_index, target);
                if self.config.long_clickable {
                    self.long_press_at = Some(now.saturating_add(self.config.long_press_timeout_ms));
                } else {
                    self.set_state(MotionState::DoneWaiting, target);
                }
            }
            MotionState::Tap => {
                if self.long_press_at.is_some_and(|at| now >= at) {
                    self.long_press_at = None;
                    let handled = self.motion_index.is_some_and(|i| target.perform_long_click(i));
                    if handled {
                        self.motion_index = None;
                        self.set_pressed(None, target);
                        self.set_state(MotionState::Rest, target);
                    } else {
                        self.set_state(MotionState::DoneWaiting, target);
                    }
                }
            }
            MotionState::Fling => self.tick_fling(now, target),
            MotionState::Overfling => self.tick_overfling(now, target),
            _ => {}
        }

        self.edges.tick(now);
        self.needs_ticks()
    }

    fn tick_fling(&mut self, now: u64, target: &mut impl MotionTarget) {
        let (offset, finished) = self.physics.tick(now);
        let delta = offset - self.last_fling_offset;
        self.last_fling_offset = offset;

        if delta != 0 {
            let velocity = self.physics.current_velocity();
            let outcome = target.scroll_by(delta);
            if outcome.clamped && outcome.unconsumed(delta) != 0 {
                self.on_edge_hit(velocity, delta, now, target);
                return;
            }
        }
        if finished {
            self.set_state(MotionState::Rest, target);
        }
    }

    fn on_edge_hit(&mut self, velocity: f32, delta: i32, now: u64, target: &mut impl MotionTarget) {
        self.physics.abort();
        // Keep the direction even if the curve's slope read zero on this tick.
        let velocity = if velocity == 0.0 { delta.signum() as f32 } else { velocity };
        ltrace!(velocity, "fling hit edge");
        if let Some(direction) = ScrollDirection::of(delta).filter(|_| self.glow(target)) {
            self.edges.get_mut(Edge::of(direction)).on_absorb(velocity, now);
        }
        self.set_state(MotionState::Overfling, target);
        if self.physics.start_overfling(0, velocity, self.config.overfling_distance, now) {
            self.last_fling_offset = 0;
            target.request_tick();
            return;
        }
        self.spring_back_or_rest(now, target);
    }

    fn tick_overfling(&mut self, now: u64, target: &mut impl MotionTarget) {
        let mode = self.physics.mode();
        let (offset, finished) = self.physics.tick(now);
        self.set_overscroll(offset, target);
        if !finished {
            return;
        }
        if mode == Some(FlingMode::Overfling) && self.physics.start_springback(offset, 0, 0, now) {
            return;
        }
        self.set_overscroll(0, target);
        self.set_state(MotionState::Rest, target);
    }
}
