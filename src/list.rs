use crate::edge::EdgeEffects;
use crate::layout::{LayoutEngine, LayoutPass};
use crate::motion::{MotionController, MotionTarget};
use crate::pool::ItemPool;
use crate::position::PositionScroller;
use crate::selection::SelectionModel;
use crate::state::SavedState;
use crate::window::Window;
use crate::{
    ChoiceMode, HeadlessHost, Host, ItemProvider, LayoutMode, ListEvent, ListOptions, MotionState,
    PointerAction, PointerEvent, Rect, ScrollDirection, ScrollOutcome, ScrollState, StableId,
    SyncAnchor, ViewType,
};

/// A horizontally scrolling, virtualized list.
///
/// The list is driven entirely by the host: pointer events go to [`Self::on_pointer_event`],
/// frame callbacks to [`Self::on_tick`] and data mutations are announced through the
/// `notify_*` methods. Everything runs on the caller's thread; nothing blocks.
pub struct HorizontalList<P: ItemProvider, H: Host = HeadlessHost> {
    options: ListOptions,
    provider: P,
    host: H,
    layout: LayoutEngine<P::View>,
    motion: MotionController,
    selection: SelectionModel,
    scroller: PositionScroller,
    /// Absolute scroll position (px from the content start), excluding overscroll.
    scroll_offset: i64,
    overscroll: i32,
}

impl<P: ItemProvider> HorizontalList<P, HeadlessHost> {
    pub fn headless(provider: P, options: ListOptions) -> Self {
        Self::new(provider, HeadlessHost::new(), options)
    }
}

impl<P: ItemProvider, H: Host> HorizontalList<P, H> {
    pub fn new(provider: P, host: H, options: ListOptions) -> Self {
        let mut layout = LayoutEngine::new(options.layout_config());
        layout.set_expected_count(provider.count());
        let mut list = Self {
            motion: MotionController::new(options.motion_config()),
            options,
            provider,
            host,
            layout,
            selection: SelectionModel::new(),
            scroller: PositionScroller::new(),
            scroll_offset: 0,
            overscroll: 0,
        };
        list.relayout(list.default_mode());
        list
    }

    fn default_mode(&self) -> LayoutMode {
        if self.options.capabilities.stack_from_end {
            LayoutMode::ForceLast
        } else {
            LayoutMode::ForceFirst
        }
    }

    pub fn options(&self) -> &ListOptions {
        &self.options
    }

    /// Applies new options, keeping the first visible item where it is.
    pub fn set_options(&mut self, options: ListOptions) {
        self.options = options;
        self.layout.set_config(self.options.layout_config());
        self.motion.set_config(self.options.motion_config());
        self.relayout(self.preserving_mode());
    }

    pub fn update_options(&mut self, f: impl FnOnce(&mut ListOptions)) {
        let mut options = self.options.clone();
        f(&mut options);
        self.set_options(options);
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Mutable access for data changes. Announce every change with the matching `notify_*`
    /// call before the next pointer event, tick or layout.
    pub fn provider_mut(&mut self) -> &mut P {
        &mut self.provider
    }

    /// Replaces the provider, dropping all views and the checked state. Returns the old provider.
    pub fn set_provider(&mut self, provider: P) -> P {
        self.stop_scroll();
        self.layout.clear();
        self.selection.clear();
        let old = core::mem::replace(&mut self.provider, provider);
        self.layout.set_expected_count(self.provider.count());
        self.scroll_offset = 0;
        self.relayout(self.default_mode());
        old
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn layout(&self) -> &LayoutEngine<P::View> {
        &self.layout
    }

    pub fn window(&self) -> &Window<P::View> {
        self.layout.window()
    }

    pub fn pool(&self) -> &ItemPool<P::View> {
        self.layout.pool()
    }

    pub fn item_count(&self) -> usize {
        self.layout.expected_count()
    }

    pub fn motion_state(&self) -> MotionState {
        self.motion.state()
    }

    pub fn scroll_state(&self) -> ScrollState {
        self.motion.state().scroll_state()
    }

    /// Absolute scroll position in px from the content start.
    ///
    /// Exact while the list scrolls continuously or shows its first item; after a relayout that
    /// jumps elsewhere it is carried over from the previous position.
    pub fn scroll_offset(&self) -> i64 {
        self.scroll_offset
    }

    /// Distance the content is drawn past an edge; positive past the trailing edge.
    pub fn overscroll_offset(&self) -> i32 {
        self.overscroll
    }

    pub fn edge_effects(&self) -> &EdgeEffects {
        self.motion.edges()
    }

    pub fn pressed_index(&self) -> Option<usize> {
        self.motion.pressed()
    }

    pub fn is_position_scrolling(&self) -> bool {
        self.scroller.is_running()
    }

    pub fn first_visible_index(&self) -> Option<usize> {
        let (start, end) = self.content_range();
        self.window().first_visible(start, end).map(|d| d.index)
    }

    pub fn last_visible_index(&self) -> Option<usize> {
        let (start, end) = self.content_range();
        self.window()
            .descriptors()
            .rev()
            .find(|d| d.right() > start && d.left < end)
            .map(|d| d.index)
    }

    pub fn can_scroll(&self, direction: ScrollDirection) -> bool {
        self.layout.can_scroll(direction)
    }

    fn content_range(&self) -> (i32, i32) {
        (self.layout.content_start(), self.layout.content_end())
    }

    fn split(&mut self) -> (&mut MotionController, ListTarget<'_, P, H>) {
        (
            &mut self.motion,
            ListTarget {
                provider: &mut self.provider,
                host: &mut self.host,
                layout: &mut self.layout,
                selection: &mut self.selection,
                options: &self.options,
                scroll_offset: &mut self.scroll_offset,
                overscroll: &mut self.overscroll,
            },
        )
    }

    fn emit(&self, event: ListEvent) -> bool {
        emit(&self.options, event)
    }

    fn request_tick_if_needed(&mut self) {
        if self.motion.needs_ticks() || self.scroller.is_running() {
            self.host.post_animation_tick();
        }
    }

    /// Feeds a pointer event. Returns whether the list consumed it.
    pub fn on_pointer_event(&mut self, event: PointerEvent) -> bool {
        if event.action == PointerAction::Down {
            self.scroller.stop();
        }
        let (motion, mut target) = self.split();
        let consumed = motion.on_pointer_event(&event, &mut target);
        self.request_tick_if_needed();
        consumed
    }

    /// Advances timers and animations to `now_ms`. Returns whether further ticks are needed.
    pub fn on_tick(&mut self, now_ms: u64) -> bool {
        let (motion, mut target) = self.split();
        motion.on_tick(now_ms, &mut target);

        if self.scroller.is_running() && self.motion.state() == MotionState::Rest && !self.motion.is_pointer_down() {
            let count = self.item_count();
            let content = self.content_range();
            match self.scroller.next_step(now_ms, self.layout.window(), count, content) {
                Some(step) => {
                    let (motion, mut target) = self.split();
                    motion.smooth_scroll_by(step.distance, step.duration_ms, now_ms, &mut target);
                }
                None => self.scroller.stop(),
            }
        }

        let active = self.motion.needs_ticks() || self.scroller.is_running();
        if active {
            self.host.post_animation_tick();
        }
        active
    }

    /// Scrolls immediately by `delta` px (positive towards higher indices).
    pub fn scroll_by(&mut self, delta: i32) -> ScrollOutcome {
        let (_, mut target) = self.split();
        target.scroll_by(delta)
    }

    /// Starts a fling with a pointer-space velocity in px/s: a negative velocity (finger moving
    /// left) travels towards higher indices.
    pub fn fling(&mut self, velocity: f32, now_ms: u64) {
        self.scroller.stop();
        let (motion, mut target) = self.split();
        motion.start_fling(-velocity, now_ms, &mut target);
    }

    /// Scrolls exactly `distance` px over `duration_ms`.
    pub fn smooth_scroll_by(&mut self, distance: i32, duration_ms: u64, now_ms: u64) {
        self.scroller.stop();
        let (motion, mut target) = self.split();
        motion.smooth_scroll_by(distance, duration_ms, now_ms, &mut target);
    }

    /// Animates `index` to `offset` px from the content start, one item at a time when it is
    /// not materialized yet. `duration_ms` defaults to the configured smooth-scroll duration.
    pub fn smooth_scroll_to_position(&mut self, index: usize, offset: i32, duration_ms: Option<u64>, now_ms: u64) {
        let duration = duration_ms.unwrap_or(self.options.smooth_scroll_duration_ms);
        {
            let (motion, mut target) = self.split();
            motion.stop(&mut target);
        }
        let count = self.item_count();
        let content = self.content_range();
        let step = self
            .scroller
            .animate_to(index, offset, duration, now_ms, self.layout.window(), count, content);
        if let Some(step) = step {
            let (motion, mut target) = self.split();
            motion.smooth_scroll_by(step.distance, step.duration_ms, now_ms, &mut target);
        }
        self.request_tick_if_needed();
    }

    /// Stops flings, smooth scrolls and position scrolling.
    pub fn stop_scroll(&mut self) {
        self.scroller.stop();
        let (motion, mut target) = self.split();
        motion.stop(&mut target);
    }

    /// Jumps so that `index` starts `offset` px from the content start.
    pub fn set_selection_from_left(&mut self, index: usize, offset: i32) {
        self.stop_scroll();
        self.relayout(LayoutMode::Specific { index, offset });
    }

    pub fn set_viewport(&mut self, viewport: Rect) {
        if viewport == self.options.viewport {
            return;
        }
        self.options.viewport = viewport;
        self.layout.set_config(self.options.layout_config());
        self.relayout(self.preserving_mode());
    }

    fn preserving_mode(&self) -> LayoutMode {
        let start = self.layout.content_start();
        match self.window().entries().next() {
            Some(e) => LayoutMode::Specific {
                index: e.desc.index,
                offset: e.desc.left - start,
            },
            None => self.default_mode(),
        }
    }

    /// Where a data-change relayout should put things back: the checked item in single-choice
    /// mode when it is on screen, else the first visible item.
    fn sync_anchor(&self) -> Option<SyncAnchor> {
        let (start, end) = self.content_range();
        let window = self.window();
        let desc = self
            .selection
            .checked_position()
            .and_then(|i| window.descriptor(i))
            .filter(|d| d.right() > start && d.left < end)
            .or_else(|| window.first_visible(start, end))?;
        Some(SyncAnchor {
            index: desc.index,
            offset: desc.left - start,
            stable_id: desc.stable_id,
        })
    }

    /// Rebuilds the window in `mode`.
    ///
    /// # Panics
    ///
    /// Panics if the provider's count changed without a notification.
    pub fn relayout(&mut self, mode: LayoutMode) {
        let before = self.window().entries().next().map(|e| (e.desc.index, e.desc.left));
        {
            let mut pass = LayoutPass {
                provider: &mut self.provider,
                selection: &self.selection,
            };
            self.layout.relayout(&mut pass, mode);
        }

        let start = self.layout.content_start();
        let after = self.window().entries().next().map(|e| (e.desc.index, e.desc.left));
        match (before, after) {
            (_, Some((0, left))) => self.scroll_offset = i64::from(start - left),
            (Some((i, old)), Some((j, new))) if i == j => self.scroll_offset += i64::from(old - new),
            (_, None) => self.scroll_offset = 0,
            _ => {}
        }
        self.host.set_offset(self.scroll_offset + i64::from(self.overscroll));
        self.emit(scrolled_event(&self.layout));
    }

    fn resync(&mut self, anchor: Option<SyncAnchor>) {
        let mode = anchor.map_or(self.default_mode(), LayoutMode::Sync);
        self.relayout(mode);
    }

    fn reconcile(&mut self) {
        let count = self.provider.count();
        let has_ids = self.provider.has_stable_ids();
        let provider = &self.provider;
        self.selection.reconcile_after_data_change(
            count,
            has_ids,
            |i| provider.id_for(i),
            self.options.check_search_radius,
        );
    }

    /// The provider's data changed in place; views are rebound and the first visible (or
    /// checked) item keeps its position.
    pub fn notify_data_changed(&mut self) {
        let anchor = self.sync_anchor();
        ldebug!(count = self.provider.count(), "data changed");
        self.layout.set_expected_count(self.provider.count());
        self.layout.mark_data_changed();
        self.reconcile();
        self.resync(anchor);
    }

    /// The provider's data is no longer valid; pooled views are dropped and the list resets.
    pub fn notify_data_invalidated(&mut self) {
        ldebug!(count = self.provider.count(), "data invalidated");
        self.stop_scroll();
        self.layout.set_expected_count(self.provider.count());
        self.layout.mark_data_changed();
        self.layout.pool_mut().clear();
        self.reconcile();
        self.relayout(self.default_mode());
    }

    /// An item was inserted at `index`.
    pub fn notify_item_added(&mut self, index: usize) {
        let anchor = self.sync_anchor().map(|mut a| {
            if a.index >= index {
                a.index += 1;
            }
            a
        });
        self.selection.on_item_added(index);
        self.layout.set_expected_count(self.provider.count());
        self.layout.mark_data_changed();
        self.reconcile();
        self.resync(anchor);
    }

    /// The item at `index`, of `view_type`, was removed.
    pub fn notify_item_removed(&mut self, index: usize, view_type: ViewType) {
        let anchor = self.sync_anchor().map(|mut a| {
            if a.index > index {
                a.index -= 1;
            } else if a.index == index {
                a.stable_id = None;
            }
            a
        });
        let _discarded = self.layout.pool_mut().discard(index, view_type);
        ldebug!(index, discarded = _discarded, "item removed");
        self.selection.on_item_removed(index);
        self.layout.set_expected_count(self.provider.count());
        self.layout.mark_data_changed();
        self.reconcile();
        self.resync(anchor);
    }

    pub fn choice_mode(&self) -> ChoiceMode {
        self.selection.choice_mode()
    }

    pub fn set_choice_mode(&mut self, mode: ChoiceMode) {
        self.selection.set_choice_mode(mode);
        self.layout
            .refresh_all_checked_visuals(&mut self.provider, &self.selection);
    }

    /// Sets the checked bit of `index`. Ignored with a warning for out-of-range indices or when
    /// the choice mode is [`ChoiceMode::None`].
    pub fn set_item_checked(&mut self, index: usize, checked: bool) {
        if index >= self.item_count() {
            lwarn!(index, count = self.item_count(), "set_item_checked: index out of range");
            return;
        }
        let (_, mut target) = self.split();
        target.set_checked(index, checked);
    }

    pub fn is_item_checked(&self, index: usize) -> bool {
        self.selection.is_checked(index)
    }

    pub fn checked_item_count(&self) -> usize {
        self.selection.checked_count()
    }

    pub fn checked_item_ids(&self) -> Vec<StableId> {
        self.selection.checked_ids()
    }

    pub fn checked_item_position(&self) -> Option<usize> {
        self.selection.checked_position()
    }

    pub fn checked_item_positions(&self) -> Vec<usize> {
        self.selection.checked_positions()
    }

    pub fn selection(&self) -> &SelectionModel {
        &self.selection
    }

    pub fn clear_choices(&mut self) {
        let cleared = self.selection.clear();
        self.layout
            .refresh_checked_visuals(&mut self.provider, &self.selection, &cleared);
        for index in cleared {
            let id = self.provider.id_for(index);
            self.emit(ListEvent::ItemCheckedChanged {
                index,
                id,
                checked: false,
            });
        }
    }

    pub fn save_state(&self) -> SavedState {
        let start = self.layout.content_start();
        let first = self.window().entries().next().map(|e| &e.desc);
        let specific_offset = first.map_or(0, |d| d.left - start);
        let selected = self.selection.checked_position();
        SavedState {
            first_index: first.map_or(0, |d| d.index),
            specific_offset,
            first_stable_id: first.and_then(|d| d.stable_id),
            selected_stable_id: selected.and_then(|i| self.provider.id_for(i)),
            selected_offset: selected
                .and_then(|i| self.window().descriptor(i))
                .map_or(specific_offset, |d| d.left - start),
            checked: self.selection.snapshot(),
        }
    }

    /// Restores checked state and re-enters layout anchored on the saved selected item, or on
    /// the saved first item when nothing was selected.
    pub fn restore_state(&mut self, state: &SavedState) {
        self.stop_scroll();
        self.selection.restore(&state.checked);
        self.reconcile();
        let anchor = match state.selected_stable_id {
            Some(id) => SyncAnchor {
                index: saved_position(state, id),
                offset: state.selected_offset,
                stable_id: Some(id),
            },
            None => SyncAnchor {
                index: state.first_index,
                offset: state.specific_offset,
                stable_id: state.first_stable_id,
            },
        };
        self.relayout(LayoutMode::Sync(anchor));
    }
}

impl<P, H> core::fmt::Debug for HorizontalList<P, H>
where
    P: ItemProvider,
    H: Host,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HorizontalList")
            .field("options", &self.options)
            .field("item_count", &self.item_count())
            .field("first_index", &self.window().first_index())
            .field("last_index", &self.window().last_index())
            .field("motion_state", &self.motion.state())
            .field("scroll_offset", &self.scroll_offset)
            .field("overscroll", &self.overscroll)
            .field("checked", &self.selection.checked_count())
            .finish_non_exhaustive()
    }
}

/// Where `id` was checked when `state` was saved, falling back to the first item.
fn saved_position(state: &SavedState, id: StableId) -> usize {
    state
        .checked
        .ids
        .iter()
        .find(|&&(checked, _)| checked == id)
        .map(|&(_, position)| position)
        .or_else(|| state.checked.positions.first().copied())
        .unwrap_or(state.first_index)
}

fn emit(options: &ListOptions, event: ListEvent) -> bool {
    ltrace!(?event, "event");
    options.on_event.as_ref().is_some_and(|cb| cb(&event))
}

fn scrolled_event<V>(layout: &LayoutEngine<V>) -> ListEvent {
    let (start, end) = (layout.content_start(), layout.content_end());
    let window = layout.window();
    ListEvent::Scrolled {
        first_index: window.first_visible(start, end).map_or(0, |d| d.index),
        visible_count: window.visible_count(start, end),
        item_count: layout.expected_count(),
    }
}

/// Disjoint borrows of the list handed to the motion controller.
struct ListTarget<'a, P: ItemProvider, H: Host> {
    provider: &'a mut P,
    host: &'a mut H,
    layout: &'a mut LayoutEngine<P::View>,
    selection: &'a mut SelectionModel,
    options: &'a ListOptions,
    scroll_offset: &'a mut i64,
    overscroll: &'a mut i32,
}

impl<P: ItemProvider, H: Host> ListTarget<'_, P, H> {
    fn set_checked(&mut self, index: usize, checked: bool) {
        let id = self
            .provider
            .has_stable_ids()
            .then(|| self.provider.id_for(index))
            .flatten();
        let changed = self.selection.set_checked(index, checked, id);
        self.after_checked_change(&changed);
    }

    fn after_checked_change(&mut self, changed: &[usize]) {
        self.layout
            .refresh_checked_visuals(self.provider, self.selection, changed);
        for &index in changed {
            emit(
                self.options,
                ListEvent::ItemCheckedChanged {
                    index,
                    id: self.provider.id_for(index),
                    checked: self.selection.is_checked(index),
                },
            );
        }
    }

    fn report_offset(&mut self) {
        self.host
            .set_offset(*self.scroll_offset + i64::from(*self.overscroll));
    }
}

impl<P: ItemProvider, H: Host> MotionTarget for ListTarget<'_, P, H> {
    fn viewport_extent(&self) -> i32 {
        self.layout.content_end() - self.layout.content_start()
    }

    fn item_at(&self, x: i32) -> Option<usize> {
        self.layout.window().item_at(x).map(|d| d.index)
    }

    fn is_item_enabled(&self, index: usize) -> bool {
        self.provider.is_enabled(index)
    }

    fn scroll_by(&mut self, delta: i32) -> ScrollOutcome {
        // The engine moves at most one viewport per call.
        let mut total = ScrollOutcome::default();
        let mut remaining = delta;
        while remaining != 0 {
            let mut pass = LayoutPass {
                provider: &mut *self.provider,
                selection: &*self.selection,
            };
            let outcome = self.layout.scroll_by(&mut pass, remaining);
            total.consumed += outcome.consumed;
            remaining -= outcome.consumed;
            if outcome.clamped {
                total.clamped = true;
                break;
            }
            if outcome.consumed == 0 {
                break;
            }
        }
        if total.consumed != 0 {
            *self.scroll_offset += i64::from(total.consumed);
            self.report_offset();
            emit(self.options, scrolled_event(self.layout));
        }
        total
    }

    fn can_scroll(&self, direction: ScrollDirection) -> bool {
        self.layout.can_scroll(direction)
    }

    fn set_pressed(&mut self, index: Option<usize>) {
        emit(self.options, ListEvent::PressedChanged(index));
    }

    fn perform_click(&mut self, index: usize) {
        match self.selection.choice_mode() {
            ChoiceMode::None => {}
            ChoiceMode::Single => self.set_checked(index, true),
            ChoiceMode::Multiple => {
                let checked = !self.selection.is_checked(index);
                self.set_checked(index, checked);
            }
        }
        let id = self.provider.id_for(index);
        emit(self.options, ListEvent::ItemClick { index, id });
    }

    fn perform_long_click(&mut self, index: usize) -> bool {
        if !self.options.long_clickable {
            return false;
        }
        let id = self.provider.id_for(index);
        emit(self.options, ListEvent::ItemLongClick { index, id })
    }

    fn set_overscroll_offset(&mut self, px: i32) {
        *self.overscroll = px;
        self.report_offset();
    }

    fn dispatch(&mut self, event: ListEvent) -> bool {
        emit(self.options, event)
    }

    fn request_tick(&mut self) {
        self.host.post_animation_tick();
    }

    fn edge_glow_allowed(&self) -> bool {
        self.host.is_hardware_accelerated()
    }
}
