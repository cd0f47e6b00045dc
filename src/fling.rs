//! Scroll animation curves: spline deceleration for flings, a viscous-fluid curve for
//! fixed-distance scrolls, a cubic spring-back, and ballistic overfling past an edge.
//!
//! All offsets here are abstract scroll positions; the motion controller turns successive
//! offsets into deltas for the layout engine.

use std::sync::LazyLock;

const INFLECTION: f32 = 0.35;
const START_TENSION: f32 = 0.5;
const END_TENSION: f32 = 1.0;
const P1: f32 = START_TENSION * INFLECTION;
const P2: f32 = 1.0 - END_TENSION * (1.0 - INFLECTION);
const SAMPLES: usize = 100;

/// `ln(0.78) / ln(0.9)`
const DECELERATION_RATE: f64 = 2.358_201_6;
const GRAVITY_EARTH: f32 = 9.806_65;
const INCHES_PER_METER: f32 = 39.37;
const PHYSICAL_FRICTION: f32 = 0.84;

/// Deceleration (px/s²) of a ballistic overfling when it fits within the allowed distance.
const OVERFLING_GRAVITY: f32 = 2_000.0;

const VISCOUS_FLUID_SCALE: f32 = 8.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct PhysicsConfig {
    pub friction: f32,
    pub density: f32,
    pub spring_back_duration_ms: u64,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            friction: 0.015,
            density: 1.0,
            spring_back_duration_ms: 250,
        }
    }
}

static SPLINE: LazyLock<[f32; SAMPLES + 1]> = LazyLock::new(|| {
    let mut positions = [0.0f32; SAMPLES + 1];
    let mut x_min = 0.0f32;
    for (i, slot) in positions.iter_mut().enumerate().take(SAMPLES) {
        let alpha = i as f32 / SAMPLES as f32;
        let mut x_max = 1.0f32;
        // Bisect for the curve parameter whose time coordinate is `alpha`.
        let (x, coef) = loop {
            let x = x_min + (x_max - x_min) / 2.0;
            let coef = 3.0 * x * (1.0 - x);
            let tx = coef * ((1.0 - x) * P1 + x * P2) + x * x * x;
            if (tx - alpha).abs() < 1e-5 || x_max - x_min < f32::EPSILON {
                break (x, coef);
            }
            if tx > alpha {
                x_max = x;
            } else {
                x_min = x;
            }
        };
        *slot = coef * ((1.0 - x) * START_TENSION + x) + x * x * x;
    }
    positions[SAMPLES] = 1.0;
    positions
});

/// Distance fraction and its slope at normalized time `t`.
fn spline_at(t: f32) -> (f32, f32) {
    let t = t.clamp(0.0, 1.0);
    let index = (SAMPLES as f32 * t) as usize;
    if index >= SAMPLES {
        return (1.0, 0.0);
    }
    let t_inf = index as f32 / SAMPLES as f32;
    let t_sup = (index + 1) as f32 / SAMPLES as f32;
    let d_inf = SPLINE[index];
    let d_sup = SPLINE[index + 1];
    let slope = (d_sup - d_inf) / (t_sup - t_inf);
    (d_inf + (t - t_inf) * slope, slope)
}

fn viscous_fluid_raw(x: f32) -> f32 {
    let x = x * VISCOUS_FLUID_SCALE;
    if x < 1.0 {
        x - (1.0 - (-x).exp())
    } else {
        let start = 0.367_879_44; // 1/e
        start + (1.0 - (1.0 - x).exp()) * (1.0 - start)
    }
}

fn viscous_fluid(t: f32) -> f32 {
    let normalize = 1.0 / viscous_fluid_raw(1.0);
    let offset = 1.0 - normalize * viscous_fluid_raw(1.0);
    let v = normalize * viscous_fluid_raw(t.clamp(0.0, 1.0));
    if v > 0.0 { v + offset } else { v }
}

fn ease_out_cubic(t: f32) -> f32 {
    let u = 1.0 - t.clamp(0.0, 1.0);
    1.0 - u * u * u
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FlingMode {
    /// Decelerating from an initial velocity.
    Velocity,
    /// Travelling an exact distance in a fixed time.
    Distance,
    /// Returning to the nearest bound after overscroll.
    Spring,
    /// Coasting past an edge under constant deceleration.
    Overfling,
}

/// A running scroll animation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlingJob {
    pub mode: FlingMode,
    pub start_offset: i32,
    pub final_offset: i32,
    pub start_ms: u64,
    pub duration_ms: u64,
    /// Signed initial velocity in px/s (zero for distance and spring jobs).
    pub velocity: f32,
    /// Signed constant acceleration in px/s², used by overfling.
    acceleration: f32,
}

impl FlingJob {
    fn distance(&self) -> i32 {
        self.final_offset - self.start_offset
    }
}

/// Deceleration-curve simulator driven by absolute timestamps.
#[derive(Clone, Debug)]
pub struct FlingPhysics {
    config: PhysicsConfig,
    /// `friction * physical coefficient`, in px/s².
    deceleration: f32,
    job: Option<FlingJob>,
    offset: i32,
    velocity: f32,
    last_tick_ms: u64,
}

impl Default for FlingPhysics {
    fn default() -> Self {
        Self::new(PhysicsConfig::default())
    }
}

impl FlingPhysics {
    pub(crate) fn new(config: PhysicsConfig) -> Self {
        let mut physics = Self {
            config,
            deceleration: 0.0,
            job: None,
            offset: 0,
            velocity: 0.0,
            last_tick_ms: 0,
        };
        physics.set_config(config);
        physics
    }

    pub(crate) fn set_config(&mut self, config: PhysicsConfig) {
        let density = if config.density.is_finite() && config.density > 0.0 {
            config.density
        } else {
            lwarn!(density = config.density, "invalid density; using 1.0");
            1.0
        };
        let physical = GRAVITY_EARTH * INCHES_PER_METER * density * 160.0 * PHYSICAL_FRICTION;
        self.config = config;
        self.deceleration = config.friction.max(f32::MIN_POSITIVE) * physical;
    }

    fn spline_log(&self, velocity: f32) -> f64 {
        (f64::from(INFLECTION) * f64::from(velocity.abs()) / f64::from(self.deceleration)).ln()
    }

    /// Total unsigned distance a fling at `velocity` px/s travels before stopping.
    pub fn fling_distance(&self, velocity: f32) -> f32 {
        if velocity == 0.0 || !velocity.is_finite() {
            return 0.0;
        }
        let l = self.spline_log(velocity);
        let exp = DECELERATION_RATE / (DECELERATION_RATE - 1.0) * l;
        (f64::from(self.deceleration) * exp.exp()) as f32
    }

    /// Duration in ms of a fling at `velocity` px/s.
    pub fn fling_duration_ms(&self, velocity: f32) -> u64 {
        if velocity == 0.0 || !velocity.is_finite() {
            return 0;
        }
        let l = self.spline_log(velocity);
        (1000.0 * (l / (DECELERATION_RATE - 1.0)).exp()) as u64
    }

    fn start(&mut self, job: FlingJob) {
        ldebug!(
            mode = ?job.mode,
            from = job.start_offset,
            to = job.final_offset,
            duration_ms = job.duration_ms,
            "fling job started"
        );
        self.offset = job.start_offset;
        self.velocity = job.velocity;
        self.last_tick_ms = job.start_ms;
        self.job = Some(job);
    }

    /// Starts a deceleration from `velocity` (px/s, positive towards higher offsets).
    pub fn start_from_velocity(&mut self, offset: i32, velocity: f32, now_ms: u64) {
        let velocity = if velocity.is_finite() { velocity } else { 0.0 };
        let distance = self.fling_distance(velocity).round() as i32;
        let distance = if velocity < 0.0 { -distance } else { distance };
        self.start(FlingJob {
            mode: FlingMode::Velocity,
            start_offset: offset,
            final_offset: offset.saturating_add(distance),
            start_ms: now_ms,
            duration_ms: self.fling_duration_ms(velocity),
            velocity,
            acceleration: 0.0,
        });
    }

    /// Starts a scroll that lands exactly on `offset + distance` after `duration_ms`.
    pub fn start_from_distance(&mut self, offset: i32, distance: i32, duration_ms: u64, now_ms: u64) {
        self.start(FlingJob {
            mode: FlingMode::Distance,
            start_offset: offset,
            final_offset: offset.saturating_add(distance),
            start_ms: now_ms,
            duration_ms,
            velocity: 0.0,
            acceleration: 0.0,
        });
    }

    /// Animates an out-of-bounds `offset` back to the nearest of `[min, max]`.
    ///
    /// Returns `false` without touching the current job when `offset` is already in bounds.
    pub fn start_springback(&mut self, offset: i32, min: i32, max: i32, now_ms: u64) -> bool {
        let target = if offset < min {
            min
        } else if offset > max {
            max
        } else {
            return false;
        };
        self.start(FlingJob {
            mode: FlingMode::Spring,
            start_offset: offset,
            final_offset: target,
            start_ms: now_ms,
            duration_ms: self.config.spring_back_duration_ms,
            velocity: 0.0,
            acceleration: 0.0,
        });
        true
    }

    /// Lets a fling that hit an edge coast past it by at most `max_distance` px.
    ///
    /// Returns `false` when no overfling is possible (zero distance or velocity).
    pub fn start_overfling(&mut self, offset: i32, velocity: f32, max_distance: u32, now_ms: u64) -> bool {
        if max_distance == 0 || velocity == 0.0 || !velocity.is_finite() {
            return false;
        }
        let sign = velocity.signum();
        let v2 = velocity * velocity;
        let mut acceleration = -sign * OVERFLING_GRAVITY;
        let mut distance = v2 / (2.0 * OVERFLING_GRAVITY);
        if distance > max_distance as f32 {
            acceleration = -sign * v2 / (2.0 * max_distance as f32);
            distance = max_distance as f32;
        }
        let duration_ms = (-1000.0 * velocity / acceleration) as u64;
        let travel = (distance as i32).max(1);
        self.start(FlingJob {
            mode: FlingMode::Overfling,
            start_offset: offset,
            final_offset: offset.saturating_add(if sign > 0.0 { travel } else { -travel }),
            start_ms: now_ms,
            duration_ms,
            velocity,
            acceleration,
        });
        true
    }

    /// Advances to `now_ms`, returning the current offset and whether the job has finished.
    pub fn tick(&mut self, now_ms: u64) -> (i32, bool) {
        let Some(job) = self.job else {
            return (self.offset, true);
        };
        let elapsed = now_ms.saturating_sub(job.start_ms);
        if elapsed >= job.duration_ms {
            self.offset = job.final_offset;
            self.velocity = 0.0;
            self.job = None;
            ltrace!(offset = self.offset, "fling job finished");
            return (self.offset, true);
        }

        let t = elapsed as f32 / job.duration_ms as f32;
        let distance = job.distance() as f32;
        let prev = self.offset;
        let (offset, velocity) = match job.mode {
            FlingMode::Velocity => {
                let (coef, slope) = spline_at(t);
                let v = slope * distance / job.duration_ms as f32 * 1000.0;
                (job.start_offset + (distance * coef).round() as i32, v)
            }
            FlingMode::Distance => (job.start_offset + (distance * viscous_fluid(t)).round() as i32, f32::NAN),
            FlingMode::Spring => (job.start_offset + (distance * ease_out_cubic(t)).round() as i32, f32::NAN),
            FlingMode::Overfling => {
                let secs = elapsed as f32 / 1000.0;
                let travelled = job.velocity * secs + 0.5 * job.acceleration * secs * secs;
                let travelled = if distance >= 0.0 {
                    travelled.clamp(0.0, distance)
                } else {
                    travelled.clamp(distance, 0.0)
                };
                (job.start_offset + travelled.round() as i32, job.velocity + job.acceleration * secs)
            }
        };
        self.velocity = if velocity.is_nan() {
            let dt = now_ms.saturating_sub(self.last_tick_ms).max(1) as f32;
            (offset - prev) as f32 * 1000.0 / dt
        } else {
            velocity
        };
        self.offset = offset;
        self.last_tick_ms = now_ms;
        ltrace!(offset, velocity = self.velocity, "fling tick");
        (offset, false)
    }

    /// Instantaneous velocity (px/s) as of the last tick.
    pub fn current_velocity(&self) -> f32 {
        self.velocity
    }

    pub fn current_offset(&self) -> i32 {
        self.offset
    }

    /// Stops the job where it is.
    pub fn abort(&mut self) {
        if self.job.take().is_some() {
            ltrace!(offset = self.offset, "fling job aborted");
        }
        self.velocity = 0.0;
    }

    pub fn is_finished(&self) -> bool {
        self.job.is_none()
    }

    pub fn mode(&self) -> Option<FlingMode> {
        self.job.map(|j| j.mode)
    }

    pub fn job(&self) -> Option<&FlingJob> {
        self.job.as_ref()
    }
}
