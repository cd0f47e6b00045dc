use crate::pool::{ItemPool, PooledView, Recycled};
use crate::selection::{SelectionModel, search_outward};
use crate::window::{Window, WindowEntry};
use crate::{
    ItemDescriptor, ItemProvider, LayoutMode, MeasureConstraints, Rect, ScrollDirection,
    ScrollOutcome, clamp_width,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct LayoutConfig {
    pub viewport: Rect,
    pub padding_start: u32,
    pub padding_end: u32,
    pub gap: u32,
    pub look_ahead: u32,
    pub stack_from_end: bool,
    pub sync_search_radius: usize,
}

/// Borrowed collaborators for one layout or scroll pass.
pub struct LayoutPass<'a, P: ItemProvider> {
    pub provider: &'a mut P,
    pub selection: &'a SelectionModel,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Flow {
    /// The new item's left edge sits at the given x.
    After,
    /// The new item's right edge sits at the given x.
    Before,
}

/// Decides which items are materialized and where they sit.
///
/// The engine owns the [`Window`] and the [`ItemPool`]; every view passes between the two through
/// this type, so each view is owned by exactly one of them (or by a caller-visible drop).
#[derive(Debug)]
pub struct LayoutEngine<V> {
    config: LayoutConfig,
    window: Window<V>,
    pool: ItemPool<V>,
    expected_count: usize,
    data_changed: bool,
}

impl<V> LayoutEngine<V> {
    pub(crate) fn new(config: LayoutConfig) -> Self {
        Self {
            config,
            window: Window::new(),
            pool: ItemPool::new(),
            expected_count: 0,
            data_changed: false,
        }
    }

    pub(crate) fn set_config(&mut self, config: LayoutConfig) {
        self.config = config;
    }

    pub fn window(&self) -> &Window<V> {
        &self.window
    }

    pub(crate) fn window_mut(&mut self) -> &mut Window<V> {
        &mut self.window
    }

    pub fn pool(&self) -> &ItemPool<V> {
        &self.pool
    }

    pub(crate) fn pool_mut(&mut self) -> &mut ItemPool<V> {
        &mut self.pool
    }

    pub fn expected_count(&self) -> usize {
        self.expected_count
    }

    /// Records the count a change notification reported. The next pass checks the provider
    /// against it.
    pub(crate) fn set_expected_count(&mut self, count: usize) {
        self.expected_count = count;
    }

    /// On-screen views may now show stale data; the next relayout rebinds them.
    pub(crate) fn mark_data_changed(&mut self) {
        self.data_changed = true;
    }

    pub fn content_start(&self) -> i32 {
        clamp_width(self.config.padding_start)
    }

    pub fn content_end(&self) -> i32 {
        let end = clamp_width(self.config.viewport.main).saturating_sub(clamp_width(self.config.padding_end));
        end.max(self.content_start())
    }

    fn gap(&self) -> i32 {
        clamp_width(self.config.gap)
    }

    fn look_ahead(&self) -> i32 {
        clamp_width(self.config.look_ahead)
    }

    /// Drops every view, materialized or pooled.
    pub(crate) fn clear(&mut self) {
        drop(self.window.drain());
        self.pool.clear();
        self.data_changed = false;
    }

    pub fn can_scroll(&self, direction: ScrollDirection) -> bool {
        let (Some(first), Some(last), Some(left), Some(right)) = (
            self.window.first_index(),
            self.window.last_index(),
            self.window.left(),
            self.window.right(),
        ) else {
            return false;
        };
        match direction {
            ScrollDirection::Forward => last + 1 < self.expected_count || right > self.content_end(),
            ScrollDirection::Backward => first > 0 || left < self.content_start(),
        }
    }

    fn check_count<P: ItemProvider<View = V>>(&self, provider: &P) {
        let actual = provider.count();
        if actual != self.expected_count {
            lwarn!(
                expected = self.expected_count,
                actual,
                "item count changed without a change notification"
            );
            panic!(
                "item provider count changed from {} to {actual} without a change notification; \
                 notify the list on the layout thread before the next pass",
                self.expected_count
            );
        }
    }

    fn make_entry<P: ItemProvider<View = V>>(
        &mut self,
        pass: &mut LayoutPass<'_, P>,
        index: usize,
        x: i32,
        flow: Flow,
    ) -> WindowEntry<V> {
        let provider = &mut *pass.provider;
        let view_type = provider.view_type_for(index);

        let (mut view, recycled_from) = match self.pool.take_live_state_view(index) {
            Some(parked) if parked.view_type == view_type => {
                (provider.bind(index, Some(parked.view)), Some(parked.origin_index))
            }
            parked => {
                drop(parked);
                match self.pool.obtain(index, view_type) {
                    Some(Recycled::Active(p)) => (p.view, Some(p.origin_index)),
                    Some(Recycled::Scrap(p)) => (provider.bind(index, Some(p.view)), Some(p.origin_index)),
                    None => (provider.bind(index, None), None),
                }
            }
        };

        let constraints = MeasureConstraints {
            cross: self.config.viewport.cross,
            viewport_main: self.config.viewport.main,
        };
        let width = provider.measure(index, &view, constraints);
        let checkable = provider.supports_checked_visual_state(&view);
        if checkable {
            provider.set_checked_visual_state(&mut view, pass.selection.is_checked(index));
        }

        let left = match flow {
            Flow::After => x,
            Flow::Before => x.saturating_sub(clamp_width(width)),
        };
        WindowEntry {
            desc: ItemDescriptor {
                index,
                stable_id: provider.id_for(index),
                view_type,
                left,
                width,
                recycled_from,
            },
            view,
            checkable,
        }
    }

    fn retire_entry<P: ItemProvider<View = V>>(&mut self, provider: &P, entry: WindowEntry<V>) {
        let has_live_state = provider.has_live_state(&entry.view);
        let index = entry.desc.index;
        let pooled = PooledView::new(entry.view, entry.desc.view_type, index).with_live_state(has_live_state);
        let _outcome = self.pool.retire(pooled, index);
        ltrace!(index, outcome = ?_outcome, "retired item");
    }

    /// Places items from `from` rightwards, the first with its left edge at `x`, until the
    /// look-ahead edge is covered or the data runs out. Returns the last index placed.
    pub fn fill_after<P: ItemProvider<View = V>>(
        &mut self,
        pass: &mut LayoutPass<'_, P>,
        from: usize,
        x: i32,
    ) -> Option<usize> {
        let limit = self.content_end().saturating_add(self.look_ahead());
        let gap = self.gap();
        let mut x = x;
        let mut index = from;
        let mut last = None;
        while x < limit && index < self.expected_count {
            let entry = self.make_entry(pass, index, x, Flow::After);
            x = entry.desc.right().saturating_add(gap);
            self.window.push_back(entry);
            last = Some(index);
            index += 1;
        }
        last
    }

    /// Places items from `from` leftwards, the first with its right edge at `x`. Returns the last
    /// (lowest) index placed.
    pub fn fill_before<P: ItemProvider<View = V>>(
        &mut self,
        pass: &mut LayoutPass<'_, P>,
        from: usize,
        x: i32,
    ) -> Option<usize> {
        let limit = self.content_start().saturating_sub(self.look_ahead());
        let gap = self.gap();
        let mut x = x;
        let mut next = Some(from).filter(|&i| i < self.expected_count);
        let mut last = None;
        while let Some(index) = next {
            if x <= limit {
                break;
            }
            let entry = self.make_entry(pass, index, x, Flow::Before);
            x = entry.desc.left.saturating_sub(gap);
            self.window.push_front(entry);
            last = Some(index);
            next = index.checked_sub(1);
        }
        last
    }

    /// Places `index` with its left edge at `x`, then fills both sides.
    fn fill_specific<P: ItemProvider<View = V>>(&mut self, pass: &mut LayoutPass<'_, P>, index: usize, x: i32) {
        let entry = self.make_entry(pass, index, x, Flow::After);
        let (left, right) = (entry.desc.left, entry.desc.right());
        self.window.push_back(entry);
        let gap = self.gap();
        self.fill_after(pass, index + 1, right.saturating_add(gap));
        if let Some(before) = index.checked_sub(1) {
            self.fill_before(pass, before, left.saturating_sub(gap));
        }
    }

    /// Shifts content by `delta` (positive moves towards higher indices), recycling items that
    /// leave the trailing edge and filling the leading edge.
    ///
    /// A single call moves at most one viewport extent. When the data is exhausted in the
    /// direction of travel the shift stops with the boundary item flush against the content edge
    /// and the outcome is marked `clamped`.
    pub fn scroll_by<P: ItemProvider<View = V>>(&mut self, pass: &mut LayoutPass<'_, P>, delta: i32) -> ScrollOutcome {
        self.check_count(pass.provider);
        let (Some(first), Some(last), Some(left), Some(right)) = (
            self.window.first_index(),
            self.window.last_index(),
            self.window.left(),
            self.window.right(),
        ) else {
            return ScrollOutcome::default();
        };
        if delta == 0 {
            return ScrollOutcome::default();
        }

        let start = self.content_start();
        let end = self.content_end();
        let extent = (end - start).max(1);
        let requested = delta.clamp(-extent, extent);

        let mut outcome = ScrollOutcome {
            consumed: requested,
            clamped: false,
        };
        if requested > 0 && last + 1 == self.expected_count {
            let room = right.saturating_sub(end).max(0);
            if requested > room {
                outcome = ScrollOutcome { consumed: room, clamped: true };
            }
        } else if requested < 0 && first == 0 {
            let room = start.saturating_sub(left).max(0);
            if -requested > room {
                outcome = ScrollOutcome { consumed: -room, clamped: true };
            }
        }
        if outcome.consumed == 0 {
            return outcome;
        }

        self.window.offset_all(-outcome.consumed);
        let gap = self.gap();
        let look_ahead = self.look_ahead();
        if outcome.consumed > 0 {
            let next = last + 1;
            let edge = (right - outcome.consumed).saturating_add(gap);
            while self.window.first_right().is_some_and(|r| r <= start.saturating_sub(look_ahead)) {
                if let Some(entry) = self.window.pop_front() {
                    self.retire_entry(pass.provider, entry);
                }
            }
            self.fill_after(pass, next, edge);
            if let (Some(last), Some(right)) = (self.window.last_index(), self.window.right()) {
                if last + 1 == self.expected_count && right < end {
                    let back = self.overshoot_after(end - right);
                    outcome.consumed -= back;
                    outcome.clamped = true;
                    self.refill_before(pass);
                }
            }
        } else {
            let edge = (left - outcome.consumed).saturating_sub(gap);
            while self.window.last_left().is_some_and(|l| l >= end.saturating_add(look_ahead)) {
                if let Some(entry) = self.window.pop_back() {
                    self.retire_entry(pass.provider, entry);
                }
            }
            if let Some(before) = first.checked_sub(1) {
                self.fill_before(pass, before, edge);
            }
            if let (Some(0), Some(left)) = (self.window.first_index(), self.window.left()) {
                if left > start {
                    let back = left - start;
                    self.window.offset_all(-back);
                    outcome.consumed += back;
                    outcome.clamped = true;
                    self.refill_after(pass);
                }
            }
        }

        ltrace!(
            delta,
            consumed = outcome.consumed,
            clamped = outcome.clamped,
            first = ?self.window.first_index(),
            last = ?self.window.last_index(),
            "scroll applied"
        );
        #[cfg(debug_assertions)]
        self.window.check_invariants();
        outcome
    }

    /// Applies a scroll and reports whether further travel in that direction is impossible.
    pub fn apply_scroll<P: ItemProvider<View = V>>(&mut self, pass: &mut LayoutPass<'_, P>, delta: i32) -> bool {
        self.scroll_by(pass, delta).clamped
    }

    fn refill_before<P: ItemProvider<View = V>>(&mut self, pass: &mut LayoutPass<'_, P>) {
        if let (Some(first), Some(left)) = (self.window.first_index(), self.window.left()) {
            if let Some(before) = first.checked_sub(1) {
                self.fill_before(pass, before, left.saturating_sub(self.gap()));
            }
        }
    }

    fn refill_after<P: ItemProvider<View = V>>(&mut self, pass: &mut LayoutPass<'_, P>) {
        if let (Some(last), Some(right)) = (self.window.last_index(), self.window.right()) {
            self.fill_after(pass, last + 1, right.saturating_add(self.gap()));
        }
    }

    /// Moves content right to close a gap after the last item, never past the content start.
    /// Returns the shift applied.
    fn overshoot_after(&mut self, gap_px: i32) -> i32 {
        let start = self.content_start();
        let shift = match (self.window.first_index(), self.window.left()) {
            (Some(0), Some(left)) => gap_px.min(start.saturating_sub(left)).max(0),
            _ => gap_px,
        };
        self.window.offset_all(shift);
        shift
    }

    /// Rebuilds the window from scratch.
    ///
    /// Views on screen are offered back to the same indices without a rebind, unless the data
    /// changed since the last pass.
    ///
    /// # Panics
    ///
    /// Panics if the provider's count differs from the last notified count.
    pub fn relayout<P: ItemProvider<View = V>>(&mut self, pass: &mut LayoutPass<'_, P>, mode: LayoutMode) {
        self.check_count(pass.provider);

        let type_count = pass.provider.view_type_count();
        if type_count != self.pool.view_type_count() {
            self.pool.set_view_type_count(type_count);
        }

        let (first, entries) = self.window.drain();
        if self.data_changed {
            self.pool.set_active_capacity(entries.len());
            for entry in entries {
                self.retire_entry(pass.provider, entry);
            }
        } else {
            let provider = &*pass.provider;
            self.pool.fill_active(
                first,
                entries.into_iter().map(|e| {
                    let live = provider.has_live_state(&e.view);
                    PooledView::new(e.view, e.desc.view_type, e.desc.index).with_live_state(live)
                }),
            );
        }
        self.data_changed = false;

        let count = self.expected_count;
        if count > 0 {
            let start = self.content_start();
            match mode {
                LayoutMode::ForceFirst => {
                    self.fill_after(pass, 0, start);
                }
                LayoutMode::ForceLast => {
                    let end = self.content_end();
                    self.fill_before(pass, count - 1, end);
                }
                LayoutMode::Specific { index, offset } => {
                    self.fill_specific(pass, index.min(count - 1), start.saturating_add(offset));
                }
                LayoutMode::Sync(anchor) => {
                    let found = match anchor.stable_id {
                        Some(id) if pass.provider.has_stable_ids() => {
                            let provider = &*pass.provider;
                            search_outward(anchor.index, count, self.config.sync_search_radius, |i| {
                                provider.id_for(i) == Some(id)
                            })
                        }
                        _ => Some(anchor.index.min(count - 1)),
                    };
                    match found {
                        Some(index) => self.fill_specific(pass, index, start.saturating_add(anchor.offset)),
                        None => {
                            ldebug!(
                                index = anchor.index,
                                id = ?anchor.stable_id,
                                "sync anchor not found; resetting to first item"
                            );
                            self.fill_after(pass, 0, start);
                        }
                    }
                }
            }
            self.correct_gaps(pass);
            self.trim_edges(pass.provider);
        }

        self.pool.scrap_active();
        let provider = &*pass.provider;
        self.pool.release_ended_live_state(|v| provider.has_live_state(v));

        ldebug!(
            mode = ?mode,
            first = ?self.window.first_index(),
            last = ?self.window.last_index(),
            scrap = self.pool.scrap_len(),
            "relayout"
        );
        #[cfg(debug_assertions)]
        self.window.check_invariants();
    }

    /// Pulls content against the edges so no gap is left before the first or after the last item.
    fn correct_gaps<P: ItemProvider<View = V>>(&mut self, pass: &mut LayoutPass<'_, P>) {
        let start = self.content_start();
        let end = self.content_end();
        let count = self.expected_count;

        // Gap after the last item.
        if let (Some(first), Some(last), Some(left), Some(right)) = (
            self.window.first_index(),
            self.window.last_index(),
            self.window.left(),
            self.window.right(),
        ) {
            if last + 1 == count && right < end && (first > 0 || left < start) && self.overshoot_after(end - right) > 0 {
                self.refill_before(pass);
            }
        }

        // Gap before the first item.
        if let (Some(0), Some(last), Some(left), Some(right)) = (
            self.window.first_index(),
            self.window.last_index(),
            self.window.left(),
            self.window.right(),
        ) {
            let short_and_stacked = self.config.stack_from_end && last + 1 == count && right <= end;
            if left > start && !short_and_stacked {
                self.window.offset_all(start - left);
                self.refill_after(pass);
            }
        }
    }

    /// Retires items that ended up wholly beyond the look-ahead margins.
    fn trim_edges<P: ItemProvider<View = V>>(&mut self, provider: &P) {
        let lo = self.content_start().saturating_sub(self.look_ahead());
        let hi = self.content_end().saturating_add(self.look_ahead());
        while self.window.len() > 1 && self.window.first_right().is_some_and(|r| r <= lo) {
            if let Some(entry) = self.window.pop_front() {
                self.retire_entry(provider, entry);
            }
        }
        while self.window.len() > 1 && self.window.last_left().is_some_and(|l| l >= hi) {
            if let Some(entry) = self.window.pop_back() {
                self.retire_entry(provider, entry);
            }
        }
    }

    /// Re-applies the checked visual state to on-screen views at `indices`.
    pub(crate) fn refresh_checked_visuals<P: ItemProvider<View = V>>(
        &mut self,
        provider: &mut P,
        selection: &SelectionModel,
        indices: &[usize],
    ) {
        for &index in indices {
            if let Some(entry) = self.window.get_mut(index) {
                if entry.checkable {
                    provider.set_checked_visual_state(&mut entry.view, selection.is_checked(index));
                }
            }
        }
    }

    /// Re-applies the checked visual state to every on-screen view.
    pub(crate) fn refresh_all_checked_visuals<P: ItemProvider<View = V>>(
        &mut self,
        provider: &mut P,
        selection: &SelectionModel,
    ) {
        let indices: Vec<usize> = self.window.descriptors().map(|d| d.index).collect();
        self.refresh_checked_visuals(provider, selection, &indices);
    }
}
