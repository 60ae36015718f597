// Tunables for the scroll coordinator.
// Built once at boot and handed to StreamSession::new; never renegotiated.

/// Scroll-settling and estimate knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamConfig {
    /// upper bound on window shifts handled inside one scroll event
    pub max_shifts_per_event: u8,
    /// prefetch trigger: within viewport / reserve_divisor of an edge
    pub reserve_divisor: i32,
    /// fallback chunk height in text lines, used until a slot is measured
    pub fallback_lines: i32,
}

impl StreamConfig {
    pub const DEFAULT: Self = Self {
        max_shifts_per_event: 2,
        reserve_divisor: 3,
        fallback_lines: 4,
    };

    pub const fn with_max_shifts_per_event(mut self, n: u8) -> Self {
        self.max_shifts_per_event = n;
        self
    }

    // a divisor below 1 would divide by zero; clamp instead
    pub const fn with_reserve_divisor(mut self, d: i32) -> Self {
        self.reserve_divisor = if d < 1 { 1 } else { d };
        self
    }

    pub const fn with_fallback_lines(mut self, lines: i32) -> Self {
        self.fallback_lines = lines;
        self
    }

    #[inline]
    pub const fn reserve(&self, viewport_height: i32) -> i32 {
        let d = if self.reserve_divisor < 1 { 1 } else { self.reserve_divisor };
        viewport_height / d
    }
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
