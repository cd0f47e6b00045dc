//! A headless, horizontally scrolling, virtualized item list.
//!
//! The engine materializes only the items that intersect the viewport (plus an optional
//! look-ahead margin), recycles views that scroll out through a type-partitioned pool, and turns
//! a raw pointer-event stream into drags, flings, overscroll and clicks. It does not paint: the
//! host supplies an [`ItemProvider`] that binds and measures views, a [`Host`] that schedules
//! frame ticks, and reads placements back from [`Window`].
//!
//! ```
//! use hlistview::{HorizontalList, ItemProvider, ListOptions, MeasureConstraints, PointerEvent, Rect};
//!
//! struct Cards(usize);
//!
//! impl ItemProvider for Cards {
//!     type View = String;
//!
//!     fn count(&self) -> usize {
//!         self.0
//!     }
//!
//!     fn bind(&mut self, index: usize, recycled: Option<String>) -> String {
//!         let mut view = recycled.unwrap_or_default();
//!         view.clear();
//!         view.push_str(&format!("card {index}"));
//!         view
//!     }
//!
//!     fn measure(&mut self, _: usize, _: &String, _: MeasureConstraints) -> u32 {
//!         120
//!     }
//! }
//!
//! let options = ListOptions::new(Rect { main: 600, cross: 200 });
//! let mut list = HorizontalList::headless(Cards(1_000), options);
//! assert_eq!(list.window().first_index(), Some(0));
//!
//! list.on_pointer_event(PointerEvent::down(300.0, 0));
//! list.on_pointer_event(PointerEvent::moved(100.0, 16));
//! list.on_pointer_event(PointerEvent::up(100.0, 32));
//! assert!(list.scroll_offset() > 0);
//! ```
#![forbid(unsafe_code)]

#[macro_use]
mod macros;

mod edge;
mod fling;
mod host;
mod layout;
mod list;
mod motion;
mod options;
mod pool;
mod position;
mod provider;
mod selection;
mod state;
mod types;
mod velocity;
mod window;

#[cfg(test)]
mod tests;

pub use edge::{EdgeEffect, EdgeEffects, EdgeState};
pub use fling::{FlingJob, FlingMode, FlingPhysics};
pub use host::{HeadlessHost, Host};
pub use layout::{LayoutEngine, LayoutPass};
pub use list::HorizontalList;
pub use motion::MotionController;
pub use options::{EventCallback, ListCapabilities, ListOptions};
pub use pool::{ItemPool, PooledView, Recycled, Retired};
pub use position::{PositionScroller, ScrollStep};
pub use provider::{FixedItem, HeaderFooterProvider, ItemProvider};
pub use selection::{ReconcileSummary, SelectionModel};
pub use state::{CheckedState, SavedState};
pub use types::{
    ChoiceMode, Edge, ItemDescriptor, LayoutMode, ListEvent, MeasureConstraints, MotionState,
    PointerAction, PointerEvent, Rect, ScrollDirection, ScrollOutcome, ScrollState, StableId,
    SyncAnchor, ViewType,
};
pub use velocity::VelocityTracker;
pub use window::{Window, WindowEntry};

pub(crate) use types::clamp_width;
