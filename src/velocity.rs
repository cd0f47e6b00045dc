use std::collections::VecDeque;

const HISTORY: usize = 20;
/// Samples older than this (relative to the newest) are ignored.
const HORIZON_MS: u64 = 100;
/// A gap this long between samples means the pointer stopped.
const STOPPED_GAP_MS: u64 = 40;

#[derive(Clone, Copy, Debug, PartialEq)]
struct Sample {
    time_ms: u64,
    x: f32,
}

/// Estimates pointer velocity along the scroll axis from recent absolute positions.
///
/// Uses the impulse strategy: each segment's velocity contributes kinetic energy, so a flick that
/// accelerates at the end is weighted towards its final speed.
#[derive(Clone, Debug, Default)]
pub struct VelocityTracker {
    samples: VecDeque<Sample>,
}

impl VelocityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, time_ms: u64, x: f32) {
        if let Some(last) = self.samples.back() {
            if time_ms < last.time_ms {
                // Out-of-order timestamps restart tracking.
                self.samples.clear();
            }
        }
        if self.samples.len() == HISTORY {
            self.samples.pop_front();
        }
        self.samples.push_back(Sample { time_ms, x });
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    /// Velocity in px/s; positive when the pointer moves right.
    pub fn velocity(&self) -> f32 {
        let Some(newest) = self.samples.back().copied() else {
            return 0.0;
        };

        // Newest first, stopping at the horizon or at a pause.
        let mut window: Vec<Sample> = Vec::with_capacity(self.samples.len());
        let mut prev_time = newest.time_ms;
        for s in self.samples.iter().rev() {
            if newest.time_ms - s.time_ms > HORIZON_MS || prev_time - s.time_ms > STOPPED_GAP_MS {
                break;
            }
            prev_time = s.time_ms;
            window.push(*s);
        }
        if window.len() < 2 {
            return 0.0;
        }

        let mut work = 0.0f32;
        let oldest = window.len() - 1;
        for i in (1..=oldest).rev() {
            let (from, to) = (window[i], window[i - 1]);
            if from.time_ms == to.time_ms {
                continue;
            }
            let dt = (to.time_ms - from.time_ms) as f32;
            let v = (to.x - from.x) / dt;
            let v_prev = energy_to_velocity(work);
            work += (v - v_prev) * v.abs();
            if i == oldest {
                work *= 0.5;
            }
        }
        energy_to_velocity(work) * 1000.0
    }

    /// [`Self::velocity`] clamped to `±max`.
    pub fn velocity_capped(&self, max: f32) -> f32 {
        if !max.is_finite() || max <= 0.0 {
            return 0.0;
        }
        let v = self.velocity();
        if v.is_nan() { 0.0 } else { v.clamp(-max, max) }
    }
}

fn energy_to_velocity(work: f32) -> f32 {
    work.signum() * (2.0 * work.abs()).sqrt()
}
