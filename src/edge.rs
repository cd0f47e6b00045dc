use crate::Edge;

const MIN_ABSORB_VELOCITY: f32 = 100.0;
const MAX_ABSORB_VELOCITY: f32 = 10_000.0;
/// Glow magnitude per px/s of absorbed velocity.
const VELOCITY_GLOW_FACTOR: f32 = 6e-5;
const RECEDE_MS: u64 = 600;
/// A pull that is never released fades out after this long.
const PULL_DECAY_MS: u64 = 2_000;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EdgeState {
    #[default]
    Idle,
    /// Following a finger dragged past the edge.
    Pull,
    /// Growing after a fling slammed into the edge.
    Absorb,
    /// Fading back to nothing.
    Recede,
}

/// Visual-only glow shown when content is pushed against an edge.
///
/// The glow never influences scroll offsets; it only reports a magnitude in `[0, max_effect]`
/// for the host to paint.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeEffect {
    state: EdgeState,
    max_effect: f32,
    magnitude: f32,
    from: f32,
    to: f32,
    start_ms: u64,
    duration_ms: u64,
    pull_distance: f32,
}

impl Default for EdgeEffect {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl EdgeEffect {
    pub fn new(max_effect: f32) -> Self {
        Self {
            state: EdgeState::Idle,
            max_effect: max_effect.max(0.0),
            magnitude: 0.0,
            from: 0.0,
            to: 0.0,
            start_ms: 0,
            duration_ms: 0,
            pull_distance: 0.0,
        }
    }

    pub fn set_max_effect(&mut self, max_effect: f32) {
        self.max_effect = max_effect.max(0.0);
        self.magnitude = self.magnitude.min(self.max_effect);
    }

    pub fn state(&self) -> EdgeState {
        self.state
    }

    pub fn magnitude(&self) -> f32 {
        self.magnitude
    }

    pub fn is_finished(&self) -> bool {
        self.state == EdgeState::Idle
    }

    fn animate(&mut self, state: EdgeState, to: f32, duration_ms: u64, now_ms: u64) {
        self.state = state;
        self.from = self.magnitude;
        self.to = to;
        self.start_ms = now_ms;
        self.duration_ms = duration_ms;
    }

    /// `fraction` is the pulled distance relative to the viewport extent.
    pub fn on_pull(&mut self, fraction: f32, now_ms: u64) {
        if !fraction.is_finite() {
            return;
        }
        if self.state != EdgeState::Pull {
            self.pull_distance = 0.0;
        }
        self.pull_distance += fraction.abs();
        self.magnitude = self.pull_distance.min(self.max_effect);
        self.animate(EdgeState::Pull, 0.0, PULL_DECAY_MS, now_ms);
    }

    /// Absorbs the velocity (px/s) a fling had when it hit the edge.
    pub fn on_absorb(&mut self, velocity: f32, now_ms: u64) {
        if !velocity.is_finite() {
            return;
        }
        let v = velocity.abs().clamp(MIN_ABSORB_VELOCITY, MAX_ABSORB_VELOCITY);
        let target = (v * VELOCITY_GLOW_FACTOR).min(self.max_effect);
        let duration_ms = 150 + (v * 0.02) as u64;
        self.pull_distance = 0.0;
        self.animate(EdgeState::Absorb, target, duration_ms, now_ms);
    }

    pub fn on_release(&mut self, now_ms: u64) {
        self.pull_distance = 0.0;
        if matches!(self.state, EdgeState::Pull | EdgeState::Absorb) {
            self.animate(EdgeState::Recede, 0.0, RECEDE_MS, now_ms);
        }
    }

    /// Advances the animation. Returns whether it still needs ticks.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        if self.state == EdgeState::Idle {
            return false;
        }
        let elapsed = now_ms.saturating_sub(self.start_ms);
        let t = if self.duration_ms == 0 {
            1.0
        } else {
            (elapsed as f32 / self.duration_ms as f32).min(1.0)
        };
        match self.state {
            // A held pull keeps its magnitude until it times out.
            EdgeState::Pull if t < 1.0 => return true,
            EdgeState::Pull => {
                self.animate(EdgeState::Recede, 0.0, RECEDE_MS, now_ms);
                return true;
            }
            _ => {}
        }

        // Decelerate interpolation.
        let eased = 1.0 - (1.0 - t) * (1.0 - t);
        self.magnitude = self.from + (self.to - self.from) * eased;
        if t < 1.0 {
            return true;
        }
        match self.state {
            EdgeState::Absorb => {
                self.animate(EdgeState::Recede, 0.0, RECEDE_MS, now_ms);
                true
            }
            _ => {
                self.state = EdgeState::Idle;
                self.magnitude = 0.0;
                false
            }
        }
    }

    pub fn finish(&mut self) {
        self.state = EdgeState::Idle;
        self.magnitude = 0.0;
        self.pull_distance = 0.0;
    }
}

/// The glow pair for both ends of the list.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EdgeEffects {
    pub leading: EdgeEffect,
    pub trailing: EdgeEffect,
}

impl EdgeEffects {
    pub fn new(max_effect: f32) -> Self {
        Self {
            leading: EdgeEffect::new(max_effect),
            trailing: EdgeEffect::new(max_effect),
        }
    }

    pub fn get(&self, edge: Edge) -> &EdgeEffect {
        match edge {
            Edge::Leading => &self.leading,
            Edge::Trailing => &self.trailing,
        }
    }

    pub fn get_mut(&mut self, edge: Edge) -> &mut EdgeEffect {
        match edge {
            Edge::Leading => &mut self.leading,
            Edge::Trailing => &mut self.trailing,
        }
    }

    pub fn set_max_effect(&mut self, max_effect: f32) {
        self.leading.set_max_effect(max_effect);
        self.trailing.set_max_effect(max_effect);
    }

    pub fn release(&mut self, now_ms: u64) {
        self.leading.on_release(now_ms);
        self.trailing.on_release(now_ms);
    }

    pub fn tick(&mut self, now_ms: u64) -> bool {
        // Both must tick.
        let leading = self.leading.tick(now_ms);
        let trailing = self.trailing.tick(now_ms);
        leading || trailing
    }

    pub fn finish(&mut self) {
        self.leading.finish();
        self.trailing.finish();
    }

    pub fn is_finished(&self) -> bool {
        self.leading.is_finished() && self.trailing.is_finished()
    }
}
