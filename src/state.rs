use crate::StableId;

/// Checked bits and the id to index map, as handed to the host for persistence.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CheckedState {
    pub positions: Vec<usize>,
    pub ids: Vec<(StableId, usize)>,
}

/// Everything [`crate::HorizontalList::restore_state`] needs to put the list back.
///
/// The host owns the serialization format; with the `serde` feature this type derives
/// `Serialize`/`Deserialize` for convenience.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SavedState {
    pub first_index: usize,
    /// Left edge of `first_index` relative to the content start.
    pub specific_offset: i32,
    pub first_stable_id: Option<StableId>,
    /// Stable id of the checked item in single-choice mode. Restoring anchors on it in
    /// preference to the first item.
    pub selected_stable_id: Option<StableId>,
    /// Left edge of the selected item relative to the content start, or `specific_offset` when
    /// it was off screen.
    #[cfg_attr(feature = "serde", serde(default))]
    pub selected_offset: i32,
    pub checked: CheckedState,
}
