// Streaming view session: window cache + estimate + scroll geometry.
//
// The rendering layer lays out, top to bottom:
//
//   top spacer      base * estimate        (chunks before the window)
//   slot 0 .. N-1   measured heights       (resident chunks)
//   bottom spacer   estimate or 0          (one chunk of runway)
//
// and reports its scroll offset through on_scroll. When the viewport
// gets within reserve of either edge the window moves one chunk and the
// scroll offset is re-anchored to the same position inside the first
// slot, so the scrollbar never sees the file as anything but whole.
//
// Pixel geometry saturates at i32::MAX; past that point a huge file's
// top spacer stops growing instead of wrapping negative.

use log::{debug, info, warn};

use super::config::StreamConfig;
use super::error::StreamError;
use super::estimate::{Measure, SizeEstimator};
use super::reader::FileAccess;
use super::window::{SLOT_COUNT, WindowCache};

/// What one scroll event changed. Any shift means every slot was
/// reloaded and must be re-rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollUpdate {
    pub shifted_down: u8,
    pub shifted_up: u8,
    // slot loads that failed during those shifts
    pub failed_loads: u8,
    pub scroll_y: i32,
    pub top_space: i32,
    pub bottom_space: i32,
}

impl ScrollUpdate {
    #[inline]
    pub fn reloaded(&self) -> bool {
        self.shifted_down > 0 || self.shifted_up > 0
    }
}

pub struct StreamSession<F: FileAccess, M: Measure> {
    cache: WindowCache<F>,
    estimator: SizeEstimator,
    measure: M,
    config: StreamConfig,
    active: bool,
    scroll_y: i32,
    top_space: i32,
    bottom_space: i32,
    slot_heights: [i32; SLOT_COUNT],
}

impl<F: FileAccess, M: Measure> StreamSession<F, M> {
    pub const fn new(fs: F, measure: M, config: StreamConfig) -> Self {
        Self {
            cache: WindowCache::new(fs),
            estimator: SizeEstimator::new(),
            measure,
            config,
            active: false,
            scroll_y: 0,
            top_space: 0,
            bottom_space: 0,
            slot_heights: [0; SLOT_COUNT],
        }
    }

    /// Begin streaming `path` at chunk 0. Replaces any open session; on
    /// failure the session stays closed.
    pub fn open_stream(&mut self, path: &str) -> Result<(), StreamError> {
        self.close_stream();
        self.cache.open_window(path)?;

        self.active = true;
        self.measure_slots();
        self.update_spacers();
        info!(
            "stream: session open chunks={} est={}",
            self.cache.total_chunks(),
            self.chunk_estimate().unwrap_or(0)
        );
        Ok(())
    }

    // safe to call on a closed session
    pub fn close_stream(&mut self) {
        if self.active {
            info!("stream: session close");
        }
        self.active = false;
        self.cache.close_window();
        self.estimator.reset();
        self.scroll_y = 0;
        self.top_space = 0;
        self.bottom_space = 0;
        self.slot_heights = [0; SLOT_COUNT];
    }

    /// Feed the renderer's scroll offset and viewport height. Moves the
    /// window at most `max_shifts_per_event` chunks; load failures are
    /// logged and counted, never returned, so scrolling stays live.
    pub fn on_scroll(&mut self, scroll_position: i32, viewport_height: i32) -> ScrollUpdate {
        if !self.active {
            return ScrollUpdate {
                scroll_y: scroll_position,
                ..ScrollUpdate::default()
            };
        }

        self.scroll_y = scroll_position;
        let reserve = self.config.reserve(viewport_height);
        let mut update = ScrollUpdate::default();

        for _ in 0..self.config.max_shifts_per_event {
            let remaining_down = self
                .content_height()
                .saturating_sub(viewport_height)
                .saturating_sub(self.scroll_y);
            let remaining_up = self.scroll_y;
            debug!(
                "stream: scroll check base={} rem_down={} rem_up={}",
                self.cache.base_index(),
                remaining_down,
                remaining_up
            );

            if remaining_down < reserve && self.cache.can_shift_down() {
                if self.step_down().is_err() {
                    update.failed_loads += 1;
                }
                update.shifted_down += 1;
                continue;
            }

            if remaining_up < reserve && self.cache.can_shift_up() {
                if self.step_up().is_err() {
                    update.failed_loads += 1;
                }
                update.shifted_up += 1;
                continue;
            }

            break;
        }

        update.scroll_y = self.scroll_y;
        update.top_space = self.top_space;
        update.bottom_space = self.bottom_space;
        update
    }

    /// One chunk forward. `Ok(false)` at the tail. On a load error the
    /// window has still moved and the failed slot is empty.
    pub fn shift_down(&mut self) -> Result<bool, StreamError> {
        if !self.active {
            return Err(StreamError::NotOpen);
        }
        if !self.cache.can_shift_down() {
            return Ok(false);
        }
        self.step_down()?;
        Ok(true)
    }

    /// One chunk back. `Ok(false)` at the head.
    pub fn shift_up(&mut self) -> Result<bool, StreamError> {
        if !self.active {
            return Err(StreamError::NotOpen);
        }
        if !self.cache.can_shift_up() {
            return Ok(false);
        }
        self.step_up()?;
        Ok(true)
    }

    fn step_down(&mut self) -> Result<(), StreamError> {
        let offset_in_first = self.scroll_y.saturating_sub(self.top_space).max(0);

        let loaded = self.cache.shift_down();
        self.measure_slots();
        self.update_spacers();
        self.scroll_y = self.top_space.saturating_add(offset_in_first);

        debug!(
            "stream: -> base={} new_scroll={}",
            self.cache.base_index(),
            self.scroll_y
        );
        if let Err(e) = loaded {
            warn!("stream: shift down load failed: {}", e);
        }
        loaded
    }

    fn step_up(&mut self) -> Result<(), StreamError> {
        let offset_in_first = self.scroll_y.saturating_sub(self.top_space).max(0);

        let loaded = self.cache.shift_up();
        self.measure_slots();
        self.update_spacers();
        // the chunk that just moved into slot 0 sits above the old anchor
        self.scroll_y = self
            .top_space
            .saturating_add(offset_in_first)
            .saturating_add(self.slot_heights[0]);

        debug!(
            "stream: <- base={} new_scroll={}",
            self.cache.base_index(),
            self.scroll_y
        );
        if let Err(e) = loaded {
            warn!("stream: shift up load failed: {}", e);
        }
        loaded
    }

    fn measure_slots(&mut self) {
        for (height, slot) in self.slot_heights.iter_mut().zip(self.cache.slots().iter()) {
            *height = if slot.is_empty() {
                0
            } else {
                self.measure.measure(slot.content())
            };
        }
    }

    // one chunk of runway below the window whenever more chunks exist,
    // however many that is
    fn update_spacers(&mut self) {
        let est = self.estimator.estimate(
            &self.slot_heights,
            self.measure.line_height(),
            &self.config,
        );
        let base = self.cache.base_index();
        let remaining = self
            .cache
            .total_chunks()
            .saturating_sub(base + SLOT_COUNT);

        self.top_space = i32::try_from(base)
            .unwrap_or(i32::MAX)
            .saturating_mul(est);
        self.bottom_space = if remaining > 0 { est } else { 0 };
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// (base_index, total_chunks)
    #[inline]
    pub fn current_window(&self) -> (usize, usize) {
        (self.cache.base_index(), self.cache.total_chunks())
    }

    pub fn slot_content(&self, slot_idx: usize) -> Result<&[u8], StreamError> {
        self.cache
            .slot(slot_idx)
            .map(|s| s.content())
            .ok_or(StreamError::InvalidArgument("slot index out of range"))
    }

    pub fn slot_text(&self, slot_idx: usize) -> Result<&str, StreamError> {
        self.cache
            .slot(slot_idx)
            .map(|s| s.text())
            .ok_or(StreamError::InvalidArgument("slot index out of range"))
    }

    // whole slot for rendering, bad bytes shown as U+FFFD
    pub fn slot_text_runs(
        &self,
        slot_idx: usize,
    ) -> Result<impl Iterator<Item = &str>, StreamError> {
        self.cache
            .slot(slot_idx)
            .map(|s| s.text_runs())
            .ok_or(StreamError::InvalidArgument("slot index out of range"))
    }

    pub fn slot_chunk(&self, slot_idx: usize) -> Option<usize> {
        self.cache.slot(slot_idx).and_then(|s| s.chunk())
    }

    pub fn slot_height(&self, slot_idx: usize) -> Option<i32> {
        self.slot_heights.get(slot_idx).copied()
    }

    #[inline]
    pub fn scroll_y(&self) -> i32 {
        self.scroll_y
    }

    #[inline]
    pub fn top_space(&self) -> i32 {
        self.top_space
    }

    #[inline]
    pub fn bottom_space(&self) -> i32 {
        self.bottom_space
    }

    pub fn content_height(&self) -> i32 {
        self.slot_heights
            .iter()
            .fold(self.top_space, |acc, &h| acc.saturating_add(h))
            .saturating_add(self.bottom_space)
    }

    pub fn chunk_estimate(&self) -> Option<i32> {
        self.estimator.cached()
    }

    pub fn file_size(&self) -> u32 {
        self.cache.file_size()
    }

    pub fn window_bytes(&self) -> core::ops::Range<u32> {
        self.cache.window_bytes()
    }

    pub fn config(&self) -> &StreamConfig {
        &self.config
    }

    pub fn measure(&self) -> &M {
        &self.measure
    }
}
