use std::sync::Arc;

use crate::fling::PhysicsConfig;
use crate::layout::LayoutConfig;
use crate::motion::MotionConfig;
use crate::{ListEvent, Rect};

/// A callback receiving every [`ListEvent`].
///
/// The return value is only consulted for [`ListEvent::ItemLongClick`], where `true` means the
/// long click was handled and the pending click must not fire.
pub type EventCallback = Arc<dyn Fn(&ListEvent) -> bool + Send + Sync>;

/// Optional list behaviours.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ListCapabilities {
    /// The provider may report [`crate::ViewType::HeaderOrFooter`] items.
    pub supports_headers: bool,
    /// Initial and invalidated layouts align the last item to the trailing edge.
    pub stack_from_end: bool,
}

/// Configuration for [`crate::HorizontalList`].
///
/// Cloning is cheap: the callback is stored in an `Arc`.
pub struct ListOptions {
    pub viewport: Rect,
    /// Padding before the first item.
    pub padding_start: u32,
    /// Padding after the last item.
    pub padding_end: u32,
    /// Space between items.
    pub gap: u32,
    /// Extra pixels materialized beyond each viewport edge.
    pub look_ahead: u32,
    pub capabilities: ListCapabilities,

    /// Distance a pointer must travel before a press turns into a drag.
    pub touch_slop: u32,
    /// Release velocities (px/s) below this end a drag without a fling.
    pub min_fling_velocity: f32,
    /// Release velocities are capped to this value (px/s).
    pub max_fling_velocity: f32,
    /// A press during a fling faster than this (px/s) grabs the list straight into a drag.
    pub flywheel_velocity: f32,
    /// Scroll friction of the deceleration curve.
    pub friction: f32,
    /// Display density, used to calibrate the fling curve (1.0 = 160 dpi).
    pub density: f32,

    /// Maximum distance (px) a drag may pull the content past an edge.
    pub overscroll_distance: u32,
    /// Fraction of finger travel applied while pulling past an edge.
    pub overscroll_damping: f32,
    /// Maximum distance (px) a fling may travel past an edge before springing back.
    pub overfling_distance: u32,
    pub spring_back_duration_ms: u64,

    pub tap_timeout_ms: u64,
    pub long_press_timeout_ms: u64,
    /// Whether presses on items are reported as clicks at all.
    pub clickable: bool,
    pub long_clickable: bool,

    /// How far (in indices) a sync relayout looks for the anchor's stable id.
    pub sync_search_radius: usize,
    /// How far (in indices) checked-state reconciliation looks for a moved id.
    pub check_search_radius: usize,

    pub edge_effects_enabled: bool,
    /// Upper bound of the edge glow magnitude.
    pub max_edge_effect: f32,

    /// Default duration of programmatic smooth scrolls.
    pub smooth_scroll_duration_ms: u64,

    pub on_event: Option<EventCallback>,
}

impl Clone for ListOptions {
    fn clone(&self) -> Self {
        Self {
            viewport: self.viewport,
            padding_start: self.padding_start,
            padding_end: self.padding_end,
            gap: self.gap,
            look_ahead: self.look_ahead,
            capabilities: self.capabilities,
            touch_slop: self.touch_slop,
            min_fling_velocity: self.min_fling_velocity,
            max_fling_velocity: self.max_fling_velocity,
            flywheel_velocity: self.flywheel_velocity,
            friction: self.friction,
            density: self.density,
            overscroll_distance: self.overscroll_distance,
            overscroll_damping: self.overscroll_damping,
            overfling_distance: self.overfling_distance,
            spring_back_duration_ms: self.spring_back_duration_ms,
            tap_timeout_ms: self.tap_timeout_ms,
            long_press_timeout_ms: self.long_press_timeout_ms,
            clickable: self.clickable,
            long_clickable: self.long_clickable,
            sync_search_radius: self.sync_search_radius,
            check_search_radius: self.check_search_radius,
            edge_effects_enabled: self.edge_effects_enabled,
            max_edge_effect: self.max_edge_effect,
            smooth_scroll_duration_ms: self.smooth_scroll_duration_ms,
            on_event: self.on_event.clone(),
        }
    }
}

impl Default for ListOptions {
    fn default() -> Self {
        Self::new(Rect::default())
    }
}

impl ListOptions {
    /// Creates options for a viewport of the given size with platform-typical defaults.
    pub fn new(viewport: Rect) -> Self {
        Self {
            viewport,
            padding_start: 0,
            padding_end: 0,
            gap: 0,
            look_ahead: 0,
            capabilities: ListCapabilities::default(),
            touch_slop: 8,
            min_fling_velocity: 50.0,
            max_fling_velocity: 8_000.0,
            flywheel_velocity: 600.0,
            friction: 0.015,
            density: 1.0,
            overscroll_distance: 64,
            overscroll_damping: 0.5,
            overfling_distance: 0,
            spring_back_duration_ms: 250,
            tap_timeout_ms: 100,
            long_press_timeout_ms: 500,
            clickable: true,
            long_clickable: true,
            sync_search_radius: 100,
            check_search_radius: 20,
            edge_effects_enabled: true,
            max_edge_effect: 1.0,
            smooth_scroll_duration_ms: 200,
            on_event: None,
        }
    }

    pub fn with_viewport(mut self, viewport: Rect) -> Self {
        self.viewport = viewport;
        self
    }

    pub fn with_padding(mut self, padding_start: u32, padding_end: u32) -> Self {
        self.padding_start = padding_start;
        self.padding_end = padding_end;
        self
    }

    pub fn with_gap(mut self, gap: u32) -> Self {
        self.gap = gap;
        self
    }

    pub fn with_look_ahead(mut self, look_ahead: u32) -> Self {
        self.look_ahead = look_ahead;
        self
    }

    pub fn with_capabilities(mut self, capabilities: ListCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn with_touch_slop(mut self, touch_slop: u32) -> Self {
        self.touch_slop = touch_slop;
        self
    }

    pub fn with_fling_velocity_range(mut self, min: f32, max: f32) -> Self {
        self.min_fling_velocity = min;
        self.max_fling_velocity = max;
        self
    }

    pub fn with_flywheel_velocity(mut self, velocity: f32) -> Self {
        self.flywheel_velocity = velocity;
        self
    }

    pub fn with_friction(mut self, friction: f32) -> Self {
        self.friction = friction;
        self
    }

    pub fn with_density(mut self, density: f32) -> Self {
        self.density = density;
        self
    }

    pub fn with_overscroll(mut self, distance: u32, damping: f32) -> Self {
        self.overscroll_distance = distance;
        self.overscroll_damping = damping;
        self
    }

    pub fn with_overfling_distance(mut self, distance: u32) -> Self {
        self.overfling_distance = distance;
        self
    }

    pub fn with_spring_back_duration_ms(mut self, duration_ms: u64) -> Self {
        self.spring_back_duration_ms = duration_ms;
        self
    }

    pub fn with_press_timeouts(mut self, tap_ms: u64, long_press_ms: u64) -> Self {
        self.tap_timeout_ms = tap_ms;
        self.long_press_timeout_ms = long_press_ms;
        self
    }

    pub fn with_clickable(mut self, clickable: bool, long_clickable: bool) -> Self {
        self.clickable = clickable;
        self.long_clickable = long_clickable;
        self
    }

    pub fn with_search_radii(mut self, sync: usize, checked: usize) -> Self {
        self.sync_search_radius = sync;
        self.check_search_radius = checked;
        self
    }

    pub fn with_edge_effects(mut self, enabled: bool, max_effect: f32) -> Self {
        self.edge_effects_enabled = enabled;
        self.max_edge_effect = max_effect;
        self
    }

    pub fn with_smooth_scroll_duration_ms(mut self, duration_ms: u64) -> Self {
        self.smooth_scroll_duration_ms = duration_ms;
        self
    }

    pub fn with_on_event(
        mut self,
        on_event: Option<impl Fn(&ListEvent) -> bool + Send + Sync + 'static>,
    ) -> Self {
        self.on_event = on_event.map(|f| Arc::new(f) as _);
        self
    }

    pub(crate) fn layout_config(&self) -> LayoutConfig {
        LayoutConfig {
            viewport: self.viewport,
            padding_start: self.padding_start,
            padding_end: self.padding_end,
            gap: self.gap,
            look_ahead: self.look_ahead,
            stack_from_end: self.capabilities.stack_from_end,
            sync_search_radius: self.sync_search_radius,
        }
    }

    pub(crate) fn physics_config(&self) -> PhysicsConfig {
        PhysicsConfig {
            friction: self.friction,
            density: self.density,
            spring_back_duration_ms: self.spring_back_duration_ms,
        }
    }

    pub(crate) fn motion_config(&self) -> MotionConfig {
        MotionConfig {
            touch_slop: self.touch_slop,
            min_fling_velocity: self.min_fling_velocity,
            max_fling_velocity: self.max_fling_velocity,
            flywheel_velocity: self.flywheel_velocity,
            overscroll_distance: self.overscroll_distance,
            overscroll_damping: self.overscroll_damping,
            overfling_distance: self.overfling_distance,
            tap_timeout_ms: self.tap_timeout_ms,
            long_press_timeout_ms: self.long_press_timeout_ms,
            clickable: self.clickable,
            long_clickable: self.long_clickable,
            edge_effects_enabled: self.edge_effects_enabled,
            max_edge_effect: self.max_edge_effect,
            physics: self.physics_config(),
        }
    }
}

impl core::fmt::Debug for ListOptions {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ListOptions")
            .field("viewport", &self.viewport)
            .field("padding_start", &self.padding_start)
            .field("padding_end", &self.padding_end)
            .field("gap", &self.gap)
            .field("look_ahead", &self.look_ahead)
            .field("capabilities", &self.capabilities)
            .field("touch_slop", &self.touch_slop)
            .field("min_fling_velocity", &self.min_fling_velocity)
            .field("max_fling_velocity", &self.max_fling_velocity)
            .field("flywheel_velocity", &self.flywheel_velocity)
            .field("friction", &self.friction)
            .field("density", &self.density)
            .field("overscroll_distance", &self.overscroll_distance)
            .field("overscroll_damping", &self.overscroll_damping)
            .field("overfling_distance", &self.overfling_distance)
            .field("spring_back_duration_ms", &self.spring_back_duration_ms)
            .field("tap_timeout_ms", &self.tap_timeout_ms)
            .field("long_press_timeout_ms", &self.long_press_timeout_ms)
            .field("clickable", &self.clickable)
            .field("long_clickable", &self.long_clickable)
            .field("sync_search_radius", &self.sync_search_radius)
            .field("check_search_radius", &self.check_search_radius)
            .field("edge_effects_enabled", &self.edge_effects_enabled)
            .field("max_edge_effect", &self.max_edge_effect)
            .field("smooth_scroll_duration_ms", &self.smooth_scroll_duration_ms)
            .finish_non_exhaustive()
    }
}
