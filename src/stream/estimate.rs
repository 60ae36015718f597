// Per-chunk height estimate for the virtual spacers.
//
// The true rendered height of an unloaded chunk is unknown; the first
// real measurement of a loaded slot stands in for every chunk until the
// session ends. Chunks wrap to slightly different line counts, so this
// is an approximation, accepted in exchange for never re-measuring.

use super::config::StreamConfig;

// used when the measurer has no line height to offer
const FALLBACK_PX: i32 = 32;

/// Rendering capability injected into the session: how tall a piece of
/// text would be once laid out. Keeps the core free of any display stack.
pub trait Measure {
    /// rendered height in pixels; empty text is 0
    fn measure(&mut self, text: &[u8]) -> i32;

    /// height of one text line in pixels, 0 if unknown
    fn line_height(&self) -> i32 {
        0
    }
}

impl<M: Measure + ?Sized> Measure for &mut M {
    fn measure(&mut self, text: &[u8]) -> i32 {
        (**self).measure(text)
    }

    fn line_height(&self) -> i32 {
        (**self).line_height()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SizeEstimator {
    cached: i32,
}

impl SizeEstimator {
    pub const fn new() -> Self {
        Self { cached: 0 }
    }

    /// Cached estimate if one exists, else the tallest measured slot,
    /// else a few text lines. Only a real measurement is cached.
    pub fn estimate(&mut self, slot_heights: &[i32], line_height: i32, cfg: &StreamConfig) -> i32 {
        if self.cached > 0 {
            return self.cached;
        }

        let measured = slot_heights.iter().copied().max().unwrap_or(0);
        if measured > 0 {
            self.cached = measured;
            return measured;
        }

        if line_height > 0 {
            line_height * cfg.fallback_lines
        } else {
            FALLBACK_PX
        }
    }

    #[inline]
    pub fn cached(&self) -> Option<i32> {
        (self.cached > 0).then_some(self.cached)
    }

    pub fn reset(&mut self) {
        self.cached = 0;
    }
}
