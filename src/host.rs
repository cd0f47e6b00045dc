/// Platform capabilities injected at construction.
///
/// The engine never discovers these at runtime; a host implements the trait once per platform.
pub trait Host {
    /// Asks the host to call [`crate::HorizontalList::on_tick`] on the next frame.
    fn post_animation_tick(&mut self);

    /// Reports the absolute scroll offset (px from the content start) after it changed.
    fn set_offset(&mut self, px: i64);

    /// Edge glow is only animated on hardware-accelerated hosts.
    fn is_hardware_accelerated(&self) -> bool {
        true
    }
}

/// A host that records what the engine asked of it. Used by tests and headless simulations.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HeadlessHost {
    pub tick_requests: usize,
    pub offset: i64,
    pub hardware_accelerated: bool,
}

impl HeadlessHost {
    pub fn new() -> Self {
        Self {
            tick_requests: 0,
            offset: 0,
            hardware_accelerated: true,
        }
    }

    /// Returns and resets the number of pending tick requests.
    pub fn take_tick_requests(&mut self) -> usize {
        core::mem::take(&mut self.tick_requests)
    }
}

impl Host for HeadlessHost {
    fn post_animation_tick(&mut self) {
        self.tick_requests += 1;
    }

    fn set_offset(&mut self, px: i64) {
        self.offset = px;
    }

    fn is_hardware_accelerated(&self) -> bool {
        self.hardware_accelerated
    }
}
