use crate::{MeasureConstraints, StableId, ViewType};

/// The data source and view factory the engine materializes items from.
///
/// Every accessor must be cheap and non-blocking; it is called from inside layout and scroll
/// passes. After mutating the underlying data the host must call the matching `notify_*` method
/// on [`crate::HorizontalList`] before the next layout, otherwise the engine aborts.
pub trait ItemProvider {
    /// Host-side handle of a materialized item.
    type View;

    fn count(&self) -> usize;

    /// Whether [`Self::id_for`] identifies items across data changes.
    fn has_stable_ids(&self) -> bool {
        false
    }

    fn id_for(&self, _index: usize) -> Option<StableId> {
        None
    }

    fn view_type_for(&self, _index: usize) -> ViewType {
        ViewType::Typed(0)
    }

    fn view_type_count(&self) -> usize {
        1
    }

    fn is_enabled(&self, _index: usize) -> bool {
        true
    }

    /// Produces the view for `index`, rebinding `recycled` when one is offered.
    fn bind(&mut self, index: usize, recycled: Option<Self::View>) -> Self::View;

    /// Returns the main-axis width of a freshly bound view. Zero is allowed.
    fn measure(&mut self, index: usize, view: &Self::View, constraints: MeasureConstraints) -> u32;

    /// Views with live state (focus, running animation) bypass the pool.
    fn has_live_state(&self, _view: &Self::View) -> bool {
        false
    }

    /// Asked once per bind.
    fn supports_checked_visual_state(&self, _view: &Self::View) -> bool {
        false
    }

    fn set_checked_visual_state(&mut self, _view: &mut Self::View, _checked: bool) {}
}

/// A fixed decoration placed before or after the wrapped provider's items.
#[derive(Clone, Debug)]
pub struct FixedItem<V> {
    pub view: V,
    pub width: u32,
    pub selectable: bool,
}

impl<V> FixedItem<V> {
    pub fn new(view: V, width: u32) -> Self {
        Self {
            view,
            width,
            selectable: false,
        }
    }

    pub fn selectable(mut self, selectable: bool) -> Self {
        self.selectable = selectable;
        self
    }
}

/// Decorates a provider with header and footer items.
///
/// Fixed items report [`ViewType::HeaderOrFooter`], so the pool never recycles them; binding one
/// hands out a clone of its prototype view.
#[derive(Clone, Debug)]
pub struct HeaderFooterProvider<P: ItemProvider> {
    inner: P,
    headers: Vec<FixedItem<P::View>>,
    footers: Vec<FixedItem<P::View>>,
}

enum Slot {
    Header(usize),
    Item(usize),
    Footer(usize),
}

impl<P: ItemProvider> HeaderFooterProvider<P>
where
    P::View: Clone,
{
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            headers: Vec::new(),
            footers: Vec::new(),
        }
    }

    pub fn with_header(mut self, item: FixedItem<P::View>) -> Self {
        self.headers.push(item);
        self
    }

    pub fn with_footer(mut self, item: FixedItem<P::View>) -> Self {
        self.footers.push(item);
        self
    }

    pub fn add_header(&mut self, item: FixedItem<P::View>) {
        self.headers.push(item);
    }

    pub fn add_footer(&mut self, item: FixedItem<P::View>) {
        self.footers.push(item);
    }

    pub fn remove_header(&mut self, position: usize) -> Option<FixedItem<P::View>> {
        (position < self.headers.len()).then(|| self.headers.remove(position))
    }

    pub fn remove_footer(&mut self, position: usize) -> Option<FixedItem<P::View>> {
        (position < self.footers.len()).then(|| self.footers.remove(position))
    }

    pub fn header_count(&self) -> usize {
        self.headers.len()
    }

    pub fn footer_count(&self) -> usize {
        self.footers.len()
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut P {
        &mut self.inner
    }

    pub fn into_inner(self) -> P {
        self.inner
    }

    /// Maps an outer index to the wrapped provider's index, if it is not a decoration.
    pub fn inner_index(&self, index: usize) -> Option<usize> {
        match self.slot(index) {
            Slot::Item(i) => Some(i),
            _ => None,
        }
    }

    fn slot(&self, index: usize) -> Slot {
        let headers = self.headers.len();
        let items = self.inner.count();
        if index < headers {
            Slot::Header(index)
        } else if index - headers < items {
            Slot::Item(index - headers)
        } else {
            Slot::Footer(index - headers - items)
        }
    }

    fn fixed(&self, index: usize) -> Option<&FixedItem<P::View>> {
        match self.slot(index) {
            Slot::Header(i) => self.headers.get(i),
            Slot::Footer(i) => self.footers.get(i),
            Slot::Item(_) => None,
        }
    }
}

impl<P: ItemProvider> ItemProvider for HeaderFooterProvider<P>
where
    P::View: Clone,
{
    type View = P::View;

    fn count(&self) -> usize {
        self.headers.len() + self.inner.count() + self.footers.len()
    }

    fn has_stable_ids(&self) -> bool {
        self.inner.has_stable_ids()
    }

    fn id_for(&self, index: usize) -> Option<StableId> {
        self.inner_index(index).and_then(|i| self.inner.id_for(i))
    }

    fn view_type_for(&self, index: usize) -> ViewType {
        match self.inner_index(index) {
            Some(i) => self.inner.view_type_for(i),
            None => ViewType::HeaderOrFooter,
        }
    }

    fn view_type_count(&self) -> usize {
        self.inner.view_type_count()
    }

    fn is_enabled(&self, index: usize) -> bool {
        match self.slot(index) {
            Slot::Item(i) => self.inner.is_enabled(i),
            _ => self.fixed(index).is_some_and(|f| f.selectable),
        }
    }

    fn bind(&mut self, index: usize, recycled: Option<Self::View>) -> Self::View {
        match self.slot(index) {
            Slot::Item(i) => self.inner.bind(i, recycled),
            Slot::Header(i) => self.headers[i].view.clone(),
            Slot::Footer(i) => self.footers[i].view.clone(),
        }
    }

    fn measure(&mut self, index: usize, view: &Self::View, constraints: MeasureConstraints) -> u32 {
        match self.slot(index) {
            Slot::Item(i) => self.inner.measure(i, view, constraints),
            Slot::Header(i) => self.headers[i].width,
            Slot::Footer(i) => self.footers[i].width,
        }
    }

    fn has_live_state(&self, view: &Self::View) -> bool {
        self.inner.has_live_state(view)
    }

    fn supports_checked_visual_state(&self, view: &Self::View) -> bool {
        self.inner.supports_checked_visual_state(view)
    }

    fn set_checked_visual_state(&mut self, view: &mut Self::View, checked: bool) {
        self.inner.set_checked_visual_state(view, checked);
    }
}
