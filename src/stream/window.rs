// Sliding window of SLOT_COUNT chunk buffers over the open file.
//
// Slot k always holds chunk base + k, or nothing when that chunk lies
// past the end of the file. Buffers are fixed arrays; the whole window
// costs SLOT_COUNT * (CHUNK_BYTES + 1) bytes regardless of file size.

use core::ops::Range;

use log::{debug, info};

use super::error::StreamError;
use super::reader::{CHUNK_BYTES, ChunkReader, FileAccess, chunk_count};

pub const SLOT_COUNT: usize = 2;

pub struct Slot {
    // +1 for the terminator expected by C-string text APIs
    buf: [u8; CHUNK_BYTES + 1],
    len: usize,
    chunk: Option<usize>,
}

impl Slot {
    pub const EMPTY: Self = Self {
        buf: [0u8; CHUNK_BYTES + 1],
        len: 0,
        chunk: None,
    };

    #[inline]
    pub fn content(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    // content including the trailing NUL
    #[inline]
    pub fn content_with_nul(&self) -> &[u8] {
        &self.buf[..=self.len]
    }

    // content minus the torn tail of a character begun in the previous chunk
    fn untorn(&self) -> &[u8] {
        let bytes = self.content();
        let skip = bytes
            .iter()
            .take(3)
            .take_while(|&&b| b & 0xC0 == 0x80)
            .count();
        &bytes[skip..]
    }

    /// Longest valid UTF-8 prefix after any torn lead-in. Stops at the
    /// first invalid byte; use `text_runs` to render the whole chunk.
    pub fn text(&self) -> &str {
        let bytes = self.untorn();
        match core::str::from_utf8(bytes) {
            Ok(s) => s,
            Err(e) => core::str::from_utf8(&bytes[..e.valid_up_to()]).unwrap_or(""),
        }
    }

    /// The whole chunk as text pieces: valid runs as they are, each
    /// invalid sequence as one U+FFFD. A torn lead-in is dropped; a
    /// sequence cut by the chunk's end also shows as U+FFFD.
    pub fn text_runs(&self) -> impl Iterator<Item = &str> {
        self.untorn()
            .utf8_chunks()
            .flat_map(|c| {
                let bad = if c.invalid().is_empty() { "" } else { "\u{FFFD}" };
                [c.valid(), bad]
            })
            .filter(|s| !s.is_empty())
    }

    #[inline]
    pub fn chunk(&self) -> Option<usize> {
        self.chunk
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn clear(&mut self) {
        self.buf[0] = 0;
        self.len = 0;
        self.chunk = None;
    }
}

pub struct WindowCache<F: FileAccess> {
    reader: ChunkReader<F>,
    slots: [Slot; SLOT_COUNT],
    base: usize,
    total_chunks: usize,
}

impl<F: FileAccess> WindowCache<F> {
    pub const fn new(fs: F) -> Self {
        Self {
            reader: ChunkReader::new(fs),
            slots: [Slot::EMPTY; SLOT_COUNT],
            base: 0,
            total_chunks: 0,
        }
    }

    /// Open `path` and load chunks 0..SLOT_COUNT. Any failure leaves the
    /// cache closed.
    pub fn open_window(&mut self, path: &str) -> Result<(), StreamError> {
        self.close_window();

        let size = self.reader.open(path)?;
        self.total_chunks = chunk_count(size);
        self.base = 0;
        info!(
            "stream: open {} size={} chunk={} chunks={}",
            path, size, CHUNK_BYTES, self.total_chunks
        );

        if let Err(e) = self.reload() {
            self.close_window();
            return Err(e);
        }
        Ok(())
    }

    /// Load `chunk_idx` into `slot_idx`.
    ///
    /// A chunk past the end (or no open reader) clears the slot and
    /// succeeds. A seek failure leaves the slot as it was, so a direct
    /// retry can keep showing it; a read failure clears it, since the
    /// buffer was already partly overwritten.
    pub fn load_slot(&mut self, slot_idx: usize, chunk_idx: usize) -> Result<(), StreamError> {
        if slot_idx >= SLOT_COUNT {
            return Err(StreamError::InvalidArgument("slot index out of range"));
        }

        if !self.reader.is_open() || chunk_idx >= self.total_chunks {
            self.slots[slot_idx].clear();
            return Ok(());
        }

        let offset = (chunk_idx * CHUNK_BYTES) as u32;
        self.reader.seek(offset)?;

        let slot = &mut self.slots[slot_idx];
        match self.reader.read_next(&mut slot.buf[..CHUNK_BYTES]) {
            Ok(n) => {
                slot.buf[n] = 0;
                slot.len = n;
                slot.chunk = Some(chunk_idx);
                debug!(
                    "stream: load slot={} chunk={} len={} offset={}",
                    slot_idx, chunk_idx, n, offset
                );
                Ok(())
            }
            Err(e) => {
                slot.clear();
                Err(e)
            }
        }
    }

    // reload every slot for the current base; keeps going past a
    // failed slot and reports the first error. A failed slot is cleared
    // so no slot keeps a chunk from outside the window.
    pub fn reload(&mut self) -> Result<(), StreamError> {
        let mut first_err = None;
        for k in 0..SLOT_COUNT {
            if let Err(e) = self.load_slot(k, self.base + k) {
                self.slots[k].clear();
                first_err.get_or_insert(e);
            }
        }
        first_err.map_or(Ok(()), Err)
    }

    #[inline]
    pub fn can_shift_down(&self) -> bool {
        self.base + SLOT_COUNT < self.total_chunks
    }

    #[inline]
    pub fn can_shift_up(&self) -> bool {
        self.base > 0
    }

    // advance one chunk and reload; no-op at the tail
    pub fn shift_down(&mut self) -> Result<(), StreamError> {
        if !self.can_shift_down() {
            return Ok(());
        }
        self.base += 1;
        self.reload()
    }

    // back one chunk and reload; no-op at the head
    pub fn shift_up(&mut self) -> Result<(), StreamError> {
        if !self.can_shift_up() {
            return Ok(());
        }
        self.base -= 1;
        self.reload()
    }

    // safe when nothing is open
    pub fn close_window(&mut self) {
        self.reader.close();
        for slot in self.slots.iter_mut() {
            slot.clear();
        }
        self.base = 0;
        self.total_chunks = 0;
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.reader.is_open()
    }

    #[inline]
    pub fn base_index(&self) -> usize {
        self.base
    }

    #[inline]
    pub fn total_chunks(&self) -> usize {
        self.total_chunks
    }

    #[inline]
    pub fn file_size(&self) -> u32 {
        self.reader.size()
    }

    pub fn slot(&self, slot_idx: usize) -> Option<&Slot> {
        self.slots.get(slot_idx)
    }

    pub fn slots(&self) -> &[Slot; SLOT_COUNT] {
        &self.slots
    }

    // byte range of the file currently resident
    pub fn window_bytes(&self) -> Range<u32> {
        let size = self.reader.size() as usize;
        let start = (self.base * CHUNK_BYTES).min(size);
        let end = ((self.base + SLOT_COUNT) * CHUNK_BYTES).min(size);
        start as u32..end as u32
    }

    pub fn reader(&self) -> &ChunkReader<F> {
        &self.reader
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::flash::FlashFiles;
    use std::vec::Vec;

    fn pattern(len: usize) -> Vec<u8> {
        (0..len).map(|i| b'a' + (i % 26) as u8).collect()
    }

    #[test]
    fn open_loads_first_two_chunks() {
        let data = pattern(1300);
        let files = [("BIG.TXT", data.as_slice())];
        let mut cache = WindowCache::new(FlashFiles::new(&files));

        cache.open_window("BIG.TXT").unwrap();
        assert_eq!(cache.total_chunks(), 3);
        assert_eq!(cache.base_index(), 0);
        assert_eq!(cache.slots()[0].content(), &data[..512]);
        assert_eq!(cache.slots()[1].content(), &data[512..1024]);
        assert_eq!(cache.slots()[1].chunk(), Some(1));
        assert_eq!(cache.window_bytes(), 0..1024);
    }

    #[test]
    fn out_of_range_chunk_clears_slot() {
        let data = pattern(100);
        let files = [("SMALL.TXT", data.as_slice())];
        let mut cache = WindowCache::new(FlashFiles::new(&files));

        cache.open_window("SMALL.TXT").unwrap();
        assert_eq!(cache.total_chunks(), 1);
        assert_eq!(cache.slots()[0].len(), 100);
        assert!(cache.slots()[1].is_empty());
        assert_eq!(cache.slots()[1].chunk(), None);

        assert_eq!(cache.load_slot(0, 7), Ok(()));
        assert!(cache.slots()[0].is_empty());
    }

    #[test]
    fn slot_index_is_validated() {
        let files = [("A.TXT", &b"abc"[..])];
        let mut cache = WindowCache::new(FlashFiles::new(&files));
        cache.open_window("A.TXT").unwrap();
        assert_eq!(
            cache.load_slot(SLOT_COUNT, 0),
            Err(StreamError::InvalidArgument("slot index out of range"))
        );
        assert_eq!(cache.slots()[0].content(), b"abc");
    }

    #[test]
    fn loads_without_reader_clear() {
        let files: [(&str, &[u8]); 0] = [];
        let mut cache = WindowCache::new(FlashFiles::new(&files));
        assert_eq!(cache.load_slot(0, 0), Ok(()));
        assert!(cache.slots()[0].is_empty());
    }

    #[test]
    fn buffer_is_nul_terminated() {
        let files = [("A.TXT", &b"abc"[..])];
        let mut cache = WindowCache::new(FlashFiles::new(&files));
        cache.open_window("A.TXT").unwrap();
        assert_eq!(cache.slots()[0].content_with_nul(), b"abc\0");
    }

    #[test]
    fn shifts_are_clamped() {
        let data = pattern(1300);
        let files = [("BIG.TXT", data.as_slice())];
        let mut cache = WindowCache::new(FlashFiles::new(&files));
        cache.open_window("BIG.TXT").unwrap();

        cache.shift_up().unwrap();
        assert_eq!(cache.base_index(), 0);

        cache.shift_down().unwrap();
        assert_eq!(cache.base_index(), 1);
        assert_eq!(cache.slots()[1].content(), &data[1024..]);
        assert_eq!(cache.slots()[1].len(), 276);

        cache.shift_down().unwrap();
        assert_eq!(cache.base_index(), 1);
        assert_eq!(cache.window_bytes(), 512..1300);
    }

    #[test]
    fn close_resets_everything() {
        let data = pattern(2000);
        let files = [("BIG.TXT", data.as_slice())];
        let mut cache = WindowCache::new(FlashFiles::new(&files));
        cache.open_window("BIG.TXT").unwrap();
        cache.shift_down().unwrap();

        cache.close_window();
        cache.close_window();
        assert!(!cache.is_open());
        assert_eq!(cache.base_index(), 0);
        assert_eq!(cache.total_chunks(), 0);
        assert!(cache.slots().iter().all(|s| s.is_empty() && s.chunk().is_none()));
        assert_eq!(cache.reader().file_access().open_handles(), 0);
    }

    #[test]
    fn failed_open_leaves_cache_closed() {
        let files = [("A.TXT", &b"abc"[..])];
        let mut cache = WindowCache::new(FlashFiles::new(&files));
        cache.open_window("A.TXT").unwrap();
        assert!(cache.open_window("MISSING.TXT").is_err());
        assert!(!cache.is_open());
        assert!(cache.slots()[0].is_empty());
    }

    #[test]
    fn text_skips_torn_utf8() {
        // 'é' is C3 A9; start mid-sequence and end mid-sequence
        let data = [0xA9, b'o', b'k', 0xC3];
        let files = [("U.TXT", &data[..])];
        let mut cache = WindowCache::new(FlashFiles::new(&files));
        cache.open_window("U.TXT").unwrap();
        assert_eq!(cache.slots()[0].text(), "ok");
    }

    #[test]
    fn text_runs_replace_bad_bytes_instead_of_stopping() {
        // Latin-1 'é' is a lone E9
        let data = b"caf\xE9 au lait";
        let files = [("L1.TXT", &data[..])];
        let mut cache = WindowCache::new(FlashFiles::new(&files));
        cache.open_window("L1.TXT").unwrap();

        let slot = &cache.slots()[0];
        assert_eq!(slot.text(), "caf");
        let runs: Vec<&str> = slot.text_runs().collect();
        assert_eq!(runs, ["caf", "\u{FFFD}", " au lait"]);
    }
}
