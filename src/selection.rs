use std::collections::{BTreeMap, BTreeSet};

use crate::state::CheckedState;
use crate::{ChoiceMode, StableId};

/// Outcome of [`SelectionModel::reconcile_after_data_change`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReconcileSummary {
    /// Ids still found at their last known index.
    pub kept: usize,
    /// Ids found elsewhere within the search radius and moved there.
    pub migrated: usize,
    /// Checked entries that could not be located and were unchecked.
    pub dropped: usize,
}

/// Per-index checked bits plus, for providers with stable ids, an id to last-known-index map.
///
/// `checked_count()` always equals the number of set bits; in [`ChoiceMode::Single`] it is at
/// most one.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectionModel {
    mode: ChoiceMode,
    checked: BTreeSet<usize>,
    ids: BTreeMap<StableId, usize>,
}

impl SelectionModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn choice_mode(&self) -> ChoiceMode {
        self.mode
    }

    /// Switching to `None` clears everything. Switching to `Single` keeps only the lowest checked
    /// index; callers that care should clear first.
    pub fn set_choice_mode(&mut self, mode: ChoiceMode) {
        if mode == self.mode {
            return;
        }
        ldebug!(from = ?self.mode, to = ?mode, "choice mode changed");
        self.mode = mode;
        match mode {
            ChoiceMode::None => {
                self.clear();
            }
            ChoiceMode::Single => self.keep_lowest(),
            ChoiceMode::Multiple => {}
        }
    }

    /// Sets the checked bit of `index`, returning every index whose bit changed.
    ///
    /// A no-op in [`ChoiceMode::None`].
    pub fn set_checked(&mut self, index: usize, value: bool, id: Option<StableId>) -> Vec<usize> {
        let mut changed = Vec::new();
        match self.mode {
            ChoiceMode::None => {
                lwarn!(index, "set_checked ignored: choice mode is None");
                return changed;
            }
            ChoiceMode::Single if value => {
                changed.extend(self.checked.iter().copied().filter(|&i| i != index));
                self.checked.retain(|&i| i == index);
                self.ids.clear();
            }
            _ => {}
        }

        if value {
            if self.checked.insert(index) {
                changed.push(index);
            }
            if let Some(id) = id {
                self.ids.insert(id, index);
            }
        } else {
            if self.checked.remove(&index) {
                changed.push(index);
            }
            self.ids.retain(|_, i| *i != index);
        }
        changed
    }

    pub fn toggle(&mut self, index: usize, id: Option<StableId>) -> Vec<usize> {
        let value = !self.is_checked(index);
        self.set_checked(index, value, id)
    }

    pub fn is_checked(&self, index: usize) -> bool {
        self.checked.contains(&index)
    }

    pub fn checked_count(&self) -> usize {
        self.checked.len()
    }

    /// Stable ids of checked items, in id order.
    pub fn checked_ids(&self) -> Vec<StableId> {
        self.ids.keys().copied().collect()
    }

    pub fn checked_positions(&self) -> Vec<usize> {
        self.checked.iter().copied().collect()
    }

    /// The checked index in single-choice mode.
    pub fn checked_position(&self) -> Option<usize> {
        match self.mode {
            ChoiceMode::Single => self.checked.iter().next().copied(),
            _ => None,
        }
    }

    /// Clears all bits and ids but keeps the mode.
    pub fn clear(&mut self) -> Vec<usize> {
        self.ids.clear();
        core::mem::take(&mut self.checked).into_iter().collect()
    }

    /// Shifts state after an insertion at `index`.
    pub fn on_item_added(&mut self, index: usize) {
        self.checked = self
            .checked
            .iter()
            .map(|&i| if i >= index { i + 1 } else { i })
            .collect();
        for pos in self.ids.values_mut() {
            if *pos >= index {
                *pos += 1;
            }
        }
    }

    /// Drops the bit of a removed index and shifts everything after it.
    pub fn on_item_removed(&mut self, index: usize) {
        self.checked = self
            .checked
            .iter()
            .filter(|&&i| i != index)
            .map(|&i| if i > index { i - 1 } else { i })
            .collect();
        self.ids.retain(|_, pos| *pos != index);
        for pos in self.ids.values_mut() {
            if *pos > index {
                *pos -= 1;
            }
        }
    }

    /// Re-validates checked state against the current data.
    ///
    /// With stable ids, every checked id is looked up at its last known index and, failing that,
    /// within `radius` positions either side (nearest first). Ids not found are treated as
    /// removed. The bounded search is best-effort: a larger reordering drops the selection.
    /// Without stable ids, bits at or beyond `count` are dropped.
    pub fn reconcile_after_data_change(
        &mut self,
        count: usize,
        has_stable_ids: bool,
        id_for: impl Fn(usize) -> Option<StableId>,
        radius: usize,
    ) -> ReconcileSummary {
        let mut summary = ReconcileSummary::default();

        if !has_stable_ids {
            let before = self.checked.len();
            self.checked.retain(|&i| i < count);
            self.ids.clear();
            summary.kept = self.checked.len();
            summary.dropped = before - summary.kept;
            ldebug!(kept = summary.kept, dropped = summary.dropped, "reconciled checked positions");
            return summary;
        }

        let referenced: BTreeSet<usize> = self.ids.values().copied().collect();
        let mut checked: BTreeSet<usize> = self
            .checked
            .iter()
            .copied()
            .filter(|i| !referenced.contains(i))
            .filter(|&i| i < count)
            .collect();
        summary.dropped += self
            .checked
            .iter()
            .filter(|i| !referenced.contains(i) && **i >= count)
            .count();

        let mut ids = BTreeMap::new();
        for (&id, &last) in &self.ids {
            if last < count && id_for(last) == Some(id) {
                checked.insert(last);
                ids.insert(id, last);
                summary.kept += 1;
                continue;
            }
            match search_outward(last, count, radius, |i| id_for(i) == Some(id)) {
                Some(found) => {
                    checked.insert(found);
                    ids.insert(id, found);
                    summary.migrated += 1;
                }
                None => summary.dropped += 1,
            }
        }

        self.checked = checked;
        self.ids = ids;
        if self.mode == ChoiceMode::Single {
            self.keep_lowest();
        }
        ldebug!(
            kept = summary.kept,
            migrated = summary.migrated,
            dropped = summary.dropped,
            "reconciled checked state"
        );
        summary
    }

    pub fn snapshot(&self) -> CheckedState {
        CheckedState {
            positions: self.checked_positions(),
            ids: self.ids.iter().map(|(&id, &pos)| (id, pos)).collect(),
        }
    }

    /// Replaces the checked state. Entries beyond the first are ignored in single-choice mode,
    /// and everything is ignored in [`ChoiceMode::None`].
    pub fn restore(&mut self, state: &CheckedState) {
        self.clear();
        if self.mode == ChoiceMode::None {
            return;
        }
        self.checked.extend(state.positions.iter().copied());
        self.ids.extend(state.ids.iter().copied());
        if self.mode == ChoiceMode::Single {
            self.keep_lowest();
        }
    }

    fn keep_lowest(&mut self) {
        if let Some(&keep) = self.checked.iter().next() {
            self.checked.retain(|&i| i == keep);
            self.ids.retain(|_, i| *i == keep);
        }
    }
}

/// Searches `center ± 1..=radius` alternating sides, nearest first.
pub(crate) fn search_outward(
    center: usize,
    count: usize,
    radius: usize,
    mut matches: impl FnMut(usize) -> bool,
) -> Option<usize> {
    if count == 0 {
        return None;
    }
    let center = center.min(count - 1);
    if matches(center) {
        return Some(center);
    }
    for step in 1..=radius {
        let after = center.checked_add(step).filter(|&i| i < count);
        let before = center.checked_sub(step);
        if after.is_none() && before.is_none() {
            break;
        }
        if let Some(i) = after.filter(|&i| matches(i)) {
            return Some(i);
        }
        if let Some(i) = before.filter(|&i| matches(i)) {
            return Some(i);
        }
    }
    None
}
