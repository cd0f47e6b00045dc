use crate::window::Window;
use crate::clamp_width;

/// One smooth scroll the list should run next.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScrollStep {
    /// Signed distance; positive moves towards higher indices.
    pub distance: i32,
    pub duration_ms: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Target {
    index: usize,
    offset: i32,
    start_ms: u64,
    duration_ms: u64,
}

/// Brings an arbitrary index into view in animated steps.
///
/// Widths of items outside the window are unknown, so the scroller only travels one item past
/// the window edge per step and re-plans from the resulting layout.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PositionScroller {
    target: Option<Target>,
    last_window: Option<(usize, usize, i32)>,
    stalls: u8,
}

impl PositionScroller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.target.is_some()
    }

    pub fn target_index(&self) -> Option<usize> {
        self.target.map(|t| t.index)
    }

    pub fn stop(&mut self) {
        if self.target.take().is_some() {
            ldebug!("position scroller stopped");
        }
        self.last_window = None;
        self.stalls = 0;
    }

    /// Starts moving `index` to `offset` px from the content start, then returns the first step.
    pub fn animate_to<V>(
        &mut self,
        index: usize,
        offset: i32,
        duration_ms: u64,
        now_ms: u64,
        window: &Window<V>,
        count: usize,
        content: (i32, i32),
    ) -> Option<ScrollStep> {
        self.stop();
        if count == 0 {
            return None;
        }
        self.target = Some(Target {
            index: index.min(count - 1),
            offset,
            start_ms: now_ms,
            duration_ms,
        });
        self.next_step(now_ms, window, count, content)
    }

    /// Plans the next step from the current window, or finishes.
    pub fn next_step<V>(
        &mut self,
        now_ms: u64,
        window: &Window<V>,
        count: usize,
        (start, end): (i32, i32),
    ) -> Option<ScrollStep> {
        let target = self.target?;
        let (Some(first), Some(last), Some(left), Some(right)) =
            (window.first_index(), window.last_index(), window.left(), window.right())
        else {
            self.stop();
            return None;
        };
        let index = target.index.min(count.saturating_sub(1));
        let remaining_ms = target
            .duration_ms
            .saturating_sub(now_ms.saturating_sub(target.start_ms))
            .max(1);

        if let Some(desc) = window.descriptor(index) {
            // Final, direct step.
            self.stop();
            let distance = desc.left - start.saturating_add(target.offset);
            return (distance != 0).then_some(ScrollStep {
                distance,
                duration_ms: remaining_ms,
            });
        }

        let snapshot = (first, last, if index > last { right } else { left });
        if self.last_window == Some(snapshot) {
            self.stalls += 1;
            if self.stalls >= 2 {
                ldebug!(index, "position scroller stalled");
                self.stop();
                return None;
            }
        } else {
            self.stalls = 0;
        }
        self.last_window = Some(snapshot);

        let average = average_width(window);
        let (distance, steps) = if index > last {
            let overhang = right.saturating_sub(end).max(0);
            (overhang.saturating_add(average), index - last)
        } else {
            let overhang = start.saturating_sub(left).max(0);
            (-overhang.saturating_add(average), first - index)
        };
        let steps = u64::try_from(steps).unwrap_or(u64::MAX).max(1);
        let step = ScrollStep {
            distance,
            duration_ms: (remaining_ms / steps).max(1),
        };
        ltrace!(index, distance = step.distance, duration_ms = step.duration_ms, steps, "position step");
        Some(step)
    }
}

fn average_width<V>(window: &Window<V>) -> i32 {
    let n = window.len().max(1);
    let total: i64 = window.descriptors().map(|d| i64::from(clamp_width(d.width))).sum();
    let span = match (window.left(), window.right()) {
        (Some(l), Some(r)) => i64::from(r) - i64::from(l),
        _ => total,
    };
    // Span includes gaps.
    let avg = span.max(total) / n as i64;
    i32::try_from(avg).unwrap_or(i32::MAX).max(1)
}
