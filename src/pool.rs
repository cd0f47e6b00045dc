use std::collections::HashMap;

use crate::ViewType;

/// A view held by the pool together with the metadata needed to reuse it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PooledView<V> {
    pub view: V,
    pub view_type: ViewType,
    /// Index the view was last bound to.
    pub origin_index: usize,
    pub has_live_state: bool,
}

impl<V> PooledView<V> {
    pub fn new(view: V, view_type: ViewType, origin_index: usize) -> Self {
        Self {
            view,
            view_type,
            origin_index,
            has_live_state: false,
        }
    }

    pub fn with_live_state(mut self, has_live_state: bool) -> Self {
        self.has_live_state = has_live_state;
        self
    }
}

/// Where [`ItemPool::obtain`] found a view.
#[derive(Debug, PartialEq, Eq)]
pub enum Recycled<V> {
    /// The view showed this exact index during the previous pass and needs no rebind.
    Active(PooledView<V>),
    /// A retired view of the same type; the caller must rebind it.
    Scrap(PooledView<V>),
}

impl<V> Recycled<V> {
    pub fn into_inner(self) -> PooledView<V> {
        match self {
            Self::Active(v) | Self::Scrap(v) => v,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active(_))
    }
}

/// What [`ItemPool::retire`] did with a view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Retired {
    Pooled,
    /// Kept aside because it has live state; only [`ItemPool::take_live_state_view`] returns it.
    Parked,
    /// Non-recyclable or out-of-range type.
    Dropped,
}

/// Type-partitioned pool of retired views.
///
/// Besides the scrap lists it keeps the "active" views of the pass in progress: the window moves
/// its views here before a relayout so that an item that stays on screen gets its own view back
/// without a rebind.
#[derive(Debug)]
pub struct ItemPool<V> {
    first_active_index: usize,
    active: Vec<Option<PooledView<V>>>,
    active_capacity: usize,
    scrap: Vec<Vec<PooledView<V>>>,
    live: HashMap<usize, PooledView<V>>,
}

impl<V> Default for ItemPool<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> ItemPool<V> {
    pub fn new() -> Self {
        Self {
            first_active_index: 0,
            active: Vec::new(),
            active_capacity: 0,
            scrap: vec![Vec::new()],
            live: HashMap::new(),
        }
    }

    /// Resets the scrap partitions. Pooled views are dropped.
    pub fn set_view_type_count(&mut self, count: usize) {
        let count = if count == 0 {
            lwarn!("view type count must be at least 1; using 1");
            1
        } else {
            count
        };
        self.scrap.clear();
        self.scrap.resize_with(count, Vec::new);
    }

    pub fn view_type_count(&self) -> usize {
        self.scrap.len()
    }

    /// Records the views that are on screen before a relayout, in index order from `first_index`.
    pub fn fill_active(&mut self, first_index: usize, views: impl IntoIterator<Item = PooledView<V>>) {
        self.scrap_active();
        self.first_active_index = first_index;
        self.active.extend(views.into_iter().map(Some));
        self.active_capacity = self.active.len();
    }

    /// Sizes scrap pruning for `count` on-screen views when they are retired instead of offered
    /// back as active views.
    pub fn set_active_capacity(&mut self, count: usize) {
        self.active_capacity = count;
    }

    /// Returns a view for `index`: the active view for that index if there is one, otherwise a
    /// scrap view of `view_type`, preferring one last bound to `index`.
    pub fn obtain(&mut self, index: usize, view_type: ViewType) -> Option<Recycled<V>> {
        if let Some(pooled) = self.take_active(index) {
            if pooled.view_type == view_type {
                return Some(Recycled::Active(pooled));
            }
            self.retire_inner(pooled);
        }

        let ViewType::Typed(t) = view_type else {
            return None;
        };
        let scrap = self.scrap.get_mut(t)?;
        let pos = scrap
            .iter()
            .rposition(|v| v.origin_index == index)
            .or_else(|| scrap.len().checked_sub(1))?;
        Some(Recycled::Scrap(scrap.swap_remove(pos)))
    }

    fn take_active(&mut self, index: usize) -> Option<PooledView<V>> {
        let slot = index.checked_sub(self.first_active_index)?;
        self.active.get_mut(slot)?.take()
    }

    /// Hands a view back to the pool after it stopped showing `index`.
    pub fn retire(&mut self, mut pooled: PooledView<V>, index: usize) -> Retired {
        pooled.origin_index = index;
        self.retire_inner(pooled)
    }

    fn retire_inner(&mut self, pooled: PooledView<V>) -> Retired {
        let ViewType::Typed(t) = pooled.view_type else {
            return Retired::Dropped;
        };
        if pooled.has_live_state {
            self.live.insert(pooled.origin_index, pooled);
            return Retired::Parked;
        }
        match self.scrap.get_mut(t) {
            Some(list) => {
                list.push(pooled);
                Retired::Pooled
            }
            None => {
                lwarn!(
                    view_type = t,
                    count = self.scrap.len(),
                    "view type out of range; dropping view"
                );
                Retired::Dropped
            }
        }
    }

    /// Returns the view parked for `index` because it had live state.
    pub fn take_live_state_view(&mut self, index: usize) -> Option<PooledView<V>> {
        self.live.remove(&index)
    }

    /// Drops parked views whose live state has ended.
    pub fn release_ended_live_state(&mut self, mut still_live: impl FnMut(&V) -> bool) {
        self.live.retain(|_, v| still_live(&v.view));
    }

    /// Moves every active view that was not reused into scrap, then prunes the scrap lists to the
    /// size of the last active set.
    pub fn scrap_active(&mut self) {
        let leftovers: Vec<_> = self.active.drain(..).flatten().collect();
        for pooled in leftovers {
            self.retire_inner(pooled);
        }
        self.prune(self.active_capacity);
    }

    /// Caps each scrap list at `max` views.
    pub fn prune(&mut self, max: usize) {
        let mut pruned = 0usize;
        for list in &mut self.scrap {
            if list.len() > max {
                pruned += list.len() - max;
                // Oldest first.
                list.drain(..list.len() - max);
            }
        }
        if pruned > 0 {
            ldebug!(pruned, max, "pruned scrap views");
        }
    }

    /// Forgets views tied to a removed index.
    pub fn discard(&mut self, index: usize, view_type: ViewType) -> usize {
        let mut dropped = usize::from(self.live.remove(&index).is_some());
        if let ViewType::Typed(t) = view_type {
            if let Some(list) = self.scrap.get_mut(t) {
                let before = list.len();
                list.retain(|v| v.origin_index != index);
                dropped += before - list.len();
            }
        }
        dropped
    }

    /// Drops every view the pool holds.
    pub fn clear(&mut self) {
        self.active.clear();
        self.active_capacity = 0;
        for list in &mut self.scrap {
            list.clear();
        }
        self.live.clear();
    }

    pub fn active_len(&self) -> usize {
        self.active.iter().filter(|v| v.is_some()).count()
    }

    pub fn scrap_len(&self) -> usize {
        self.scrap.iter().map(Vec::len).sum()
    }

    pub fn scrap_len_of(&self, view_type: ViewType) -> usize {
        match view_type {
            ViewType::Typed(t) => self.scrap.get(t).map_or(0, Vec::len),
            _ => 0,
        }
    }

    pub fn live_len(&self) -> usize {
        self.live.len()
    }

    /// Number of views the pool currently owns.
    pub fn len(&self) -> usize {
        self.active_len() + self.scrap_len() + self.live_len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
