/// Identity of a data item that survives reordering.
pub type StableId = u64;

/// Item shape used to partition the recycling pool.
///
/// Only [`ViewType::Typed`] views are ever pooled. `HeaderOrFooter` is reserved for fixed
/// decorations and `Ignore` for views the provider never wants reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ViewType {
    Typed(usize),
    HeaderOrFooter,
    Ignore,
}

impl ViewType {
    pub fn is_recyclable(self) -> bool {
        matches!(self, Self::Typed(_))
    }
}

impl Default for ViewType {
    fn default() -> Self {
        Self::Typed(0)
    }
}

/// Viewport geometry: `main` is the scrolling (horizontal) extent, `cross` the height.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    pub main: u32,
    pub cross: u32,
}

/// Constraints handed to [`crate::ItemProvider::measure`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MeasureConstraints {
    /// Exact cross-axis size every item is laid out with.
    pub cross: u32,
    /// Main-axis size of the viewport. Items may be wider.
    pub viewport_main: u32,
}

/// Placement of one materialized item, superseded on every layout pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemDescriptor {
    pub index: usize,
    pub stable_id: Option<StableId>,
    pub view_type: ViewType,
    /// Left edge relative to the viewport's left edge.
    pub left: i32,
    pub width: u32,
    /// Index the reused view was last bound to, when it came from the pool.
    pub recycled_from: Option<usize>,
}

impl ItemDescriptor {
    pub fn right(&self) -> i32 {
        self.left.saturating_add(clamp_width(self.width))
    }

    pub fn contains(&self, x: i32) -> bool {
        x >= self.left && x < self.right()
    }
}

pub(crate) fn clamp_width(width: u32) -> i32 {
    i32::try_from(width).unwrap_or(i32::MAX)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScrollDirection {
    /// Towards higher indices (content moves left).
    Forward,
    /// Towards lower indices (content moves right).
    Backward,
}

impl ScrollDirection {
    pub fn of(delta: i32) -> Option<Self> {
        match delta.signum() {
            1 => Some(Self::Forward),
            -1 => Some(Self::Backward),
            _ => None,
        }
    }
}

/// One end of the list, used for edge effects and overscroll.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Edge {
    Leading,
    Trailing,
}

impl Edge {
    pub(crate) fn of(direction: ScrollDirection) -> Self {
        match direction {
            ScrollDirection::Forward => Self::Trailing,
            ScrollDirection::Backward => Self::Leading,
        }
    }
}

/// Touch/fling state machine value owned by the motion controller.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MotionState {
    #[default]
    Rest,
    Down,
    Tap,
    DoneWaiting,
    Drag,
    Fling,
    Overscroll,
    Overfling,
}

impl MotionState {
    pub fn scroll_state(self) -> ScrollState {
        match self {
            Self::Rest | Self::Down | Self::Tap | Self::DoneWaiting => ScrollState::Idle,
            Self::Drag | Self::Overscroll => ScrollState::TouchScroll,
            Self::Fling | Self::Overfling => ScrollState::Fling,
        }
    }

    pub fn is_animating(self) -> bool {
        matches!(self, Self::Fling | Self::Overfling)
    }
}

/// Coarse scroll state reported to listeners.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScrollState {
    Idle,
    TouchScroll,
    Fling,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ChoiceMode {
    #[default]
    None,
    Single,
    Multiple,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PointerAction {
    Down,
    Move,
    Up,
    Cancel,
    PointerDown,
    PointerUp,
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PointerEvent {
    pub action: PointerAction,
    pub pointer_id: u32,
    pub x: f32,
    pub y: f32,
    pub time_ms: u64,
}

impl PointerEvent {
    pub fn new(action: PointerAction, pointer_id: u32, x: f32, y: f32, time_ms: u64) -> Self {
        Self {
            action,
            pointer_id,
            x,
            y,
            time_ms,
        }
    }

    pub fn down(x: f32, time_ms: u64) -> Self {
        Self::new(PointerAction::Down, 0, x, 0.0, time_ms)
    }

    pub fn moved(x: f32, time_ms: u64) -> Self {
        Self::new(PointerAction::Move, 0, x, 0.0, time_ms)
    }

    pub fn up(x: f32, time_ms: u64) -> Self {
        Self::new(PointerAction::Up, 0, x, 0.0, time_ms)
    }

    pub fn cancel(time_ms: u64) -> Self {
        Self::new(PointerAction::Cancel, 0, 0.0, 0.0, time_ms)
    }
}

/// Where a sync relayout should try to put things back.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SyncAnchor {
    pub index: usize,
    /// Distance from the content start to the anchor's left edge.
    pub offset: i32,
    pub stable_id: Option<StableId>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LayoutMode {
    /// Reset to index 0 at the content start.
    ForceFirst,
    /// Reset to the last index, right-aligned.
    ForceLast,
    /// Preserve an anchor item's on-screen position; falls back to `ForceFirst`.
    Sync(SyncAnchor),
    /// Place `index` at `offset` pixels from the content start.
    Specific { index: usize, offset: i32 },
}

/// Result of a single scroll application.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScrollOutcome {
    /// Pixels actually applied (same sign as the request).
    pub consumed: i32,
    /// The source is exhausted in the direction of travel and the request was cut short.
    pub clamped: bool,
}

impl ScrollOutcome {
    pub fn unconsumed(&self, requested: i32) -> i32 {
        requested - self.consumed
    }
}

/// Notifications emitted by [`crate::HorizontalList`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListEvent {
    MotionStateChanged {
        from: MotionState,
        to: MotionState,
    },
    ScrollStateChanged(ScrollState),
    Scrolled {
        first_index: usize,
        visible_count: usize,
        item_count: usize,
    },
    PressedChanged(Option<usize>),
    ItemClick {
        index: usize,
        id: Option<StableId>,
    },
    /// The callback's return value tells whether the long click was handled.
    ItemLongClick {
        index: usize,
        id: Option<StableId>,
    },
    ItemCheckedChanged {
        index: usize,
        id: Option<StableId>,
        checked: bool,
    },
}
