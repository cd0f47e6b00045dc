use std::collections::VecDeque;

use crate::ItemDescriptor;

/// One materialized item: its placement and the view showing it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WindowEntry<V> {
    pub desc: ItemDescriptor,
    pub view: V,
    /// The provider reported that this view renders a checked state.
    pub checkable: bool,
}

/// The contiguous run of items currently materialized, ordered left to right.
///
/// Entries are index-contiguous and never overlap. Only the layout engine mutates a window.
#[derive(Clone, Debug)]
pub struct Window<V> {
    first_index: usize,
    items: VecDeque<WindowEntry<V>>,
}

impl<V> Default for Window<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Window<V> {
    pub fn new() -> Self {
        Self {
            first_index: 0,
            items: VecDeque::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn first_index(&self) -> Option<usize> {
        (!self.items.is_empty()).then_some(self.first_index)
    }

    pub fn last_index(&self) -> Option<usize> {
        self.items.back().map(|e| e.desc.index)
    }

    /// Left edge of the first materialized item.
    pub fn left(&self) -> Option<i32> {
        self.items.front().map(|e| e.desc.left)
    }

    /// Right edge of the last materialized item.
    pub fn right(&self) -> Option<i32> {
        self.items.back().map(|e| e.desc.right())
    }

    /// Right edge of the first materialized item.
    pub fn first_right(&self) -> Option<i32> {
        self.items.front().map(|e| e.desc.right())
    }

    /// Left edge of the last materialized item.
    pub fn last_left(&self) -> Option<i32> {
        self.items.back().map(|e| e.desc.left)
    }

    pub fn contains_index(&self, index: usize) -> bool {
        index >= self.first_index && index - self.first_index < self.items.len()
    }

    pub fn get(&self, index: usize) -> Option<&WindowEntry<V>> {
        let slot = index.checked_sub(self.first_index)?;
        self.items.get(slot)
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut WindowEntry<V>> {
        let slot = index.checked_sub(self.first_index)?;
        self.items.get_mut(slot)
    }

    pub fn descriptor(&self, index: usize) -> Option<&ItemDescriptor> {
        self.get(index).map(|e| &e.desc)
    }

    pub fn view(&self, index: usize) -> Option<&V> {
        self.get(index).map(|e| &e.view)
    }

    pub fn view_mut(&mut self, index: usize) -> Option<&mut V> {
        self.get_mut(index).map(|e| &mut e.view)
    }

    pub fn entries(&self) -> impl DoubleEndedIterator<Item = &WindowEntry<V>> + ExactSizeIterator {
        self.items.iter()
    }

    pub fn descriptors(&self) -> impl DoubleEndedIterator<Item = &ItemDescriptor> + ExactSizeIterator {
        self.items.iter().map(|e| &e.desc)
    }

    /// Hit-tests a viewport x coordinate.
    pub fn item_at(&self, x: i32) -> Option<&ItemDescriptor> {
        let pos = self.items.partition_point(|e| e.desc.right() <= x);
        self.items
            .get(pos)
            .map(|e| &e.desc)
            .filter(|d| d.contains(x))
    }

    /// Number of items intersecting `[start, end)`.
    pub fn visible_count(&self, start: i32, end: i32) -> usize {
        self.items
            .iter()
            .filter(|e| e.desc.right() > start && e.desc.left < end)
            .count()
    }

    /// First item intersecting `[start, end)`.
    pub fn first_visible(&self, start: i32, end: i32) -> Option<&ItemDescriptor> {
        self.items
            .iter()
            .map(|e| &e.desc)
            .find(|d| d.right() > start && d.left < end)
    }

    pub(crate) fn push_back(&mut self, entry: WindowEntry<V>) {
        match self.items.back() {
            Some(last) => debug_assert_eq!(entry.desc.index, last.desc.index + 1),
            None => self.first_index = entry.desc.index,
        }
        self.items.push_back(entry);
    }

    pub(crate) fn push_front(&mut self, entry: WindowEntry<V>) {
        if !self.items.is_empty() {
            debug_assert_eq!(entry.desc.index + 1, self.first_index);
        }
        self.first_index = entry.desc.index;
        self.items.push_front(entry);
    }

    pub(crate) fn pop_front(&mut self) -> Option<WindowEntry<V>> {
        let entry = self.items.pop_front()?;
        self.first_index = entry.desc.index + 1;
        Some(entry)
    }

    pub(crate) fn pop_back(&mut self) -> Option<WindowEntry<V>> {
        self.items.pop_back()
    }

    pub(crate) fn offset_all(&mut self, dx: i32) {
        if dx == 0 {
            return;
        }
        for e in &mut self.items {
            e.desc.left = e.desc.left.saturating_add(dx);
        }
    }

    /// Empties the window, returning the first index and the entries in order.
    pub(crate) fn drain(&mut self) -> (usize, Vec<WindowEntry<V>>) {
        let first = self.first_index;
        self.first_index = 0;
        (first, self.items.drain(..).collect())
    }

    /// Panics if the entries are not index-contiguous and left-to-right ordered.
    pub fn check_invariants(&self) {
        let mut prev_right: Option<i32> = None;
        for (slot, e) in self.items.iter().enumerate() {
            let expected = self.first_index + slot;
            if e.desc.index != expected {
                lwarn!(expected, found = e.desc.index, "window is not index-contiguous");
                panic!(
                    "window is not index-contiguous: expected index {expected}, found {}",
                    e.desc.index
                );
            }
            if let Some(right) = prev_right {
                if e.desc.left < right {
                    lwarn!(index = e.desc.index, left = e.desc.left, right, "window items overlap");
                    panic!(
                        "window items overlap: item {} starts at {} before previous end {right}",
                        e.desc.index, e.desc.left
                    );
                }
            }
            prev_right = Some(e.desc.right());
        }
    }
}
