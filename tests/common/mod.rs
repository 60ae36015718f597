// Shared doubles for the stream integration tests.

#![allow(dead_code)]

use std::cell::Cell;

use pulp_textview::stream::{FileAccess, Measure, StreamError};

/// One pixel row per eight bytes, ten pixel text lines.
pub struct ByteRows;

impl Measure for ByteRows {
    fn measure(&mut self, text: &[u8]) -> i32 {
        (text.len() / 8) as i32
    }

    fn line_height(&self) -> i32 {
        10
    }
}

/// Printable bytes whose value depends on the offset, so a chunk read
/// from the wrong place never compares equal.
pub fn pattern(len: usize) -> Vec<u8> {
    (0..len).map(|i| b'!' + (i % 89) as u8).collect()
}

/// Expected bytes of chunk `idx`.
pub fn chunk_of(data: &[u8], idx: usize) -> &[u8] {
    let start = (idx * 512).min(data.len());
    let end = ((idx + 1) * 512).min(data.len());
    &data[start..end]
}

/// Fault switches, flipped by the test while the session holds the files.
#[derive(Default)]
pub struct Faults {
    pub open: Cell<bool>,
    // fail any seek to this offset
    pub seek_at: Cell<Option<u32>>,
    // fail reads that follow a seek to this offset
    pub read_at: Cell<Option<u32>>,
    pub reads: Cell<usize>,
}

/// Wraps a backend and fails the operations `faults` selects.
pub struct FaultyFiles<'a, F> {
    inner: F,
    faults: &'a Faults,
    last_seek: u32,
}

impl<'a, F> FaultyFiles<'a, F> {
    pub fn new(inner: F, faults: &'a Faults) -> Self {
        Self {
            inner,
            faults,
            last_seek: 0,
        }
    }
}

impl<F: FileAccess> FileAccess for FaultyFiles<'_, F> {
    type Handle = F::Handle;

    fn open(&mut self, path: &str) -> Result<(Self::Handle, u32), StreamError> {
        if self.faults.open.get() {
            return Err(StreamError::Io("open file failed"));
        }
        self.inner.open(path)
    }

    fn seek(&mut self, handle: Self::Handle, offset: u32) -> Result<(), StreamError> {
        if self.faults.seek_at.get() == Some(offset) {
            return Err(StreamError::Io("seek failed"));
        }
        self.last_seek = offset;
        self.inner.seek(handle, offset)
    }

    fn read(&mut self, handle: Self::Handle, buf: &mut [u8]) -> Result<usize, StreamError> {
        self.faults.reads.set(self.faults.reads.get() + 1);
        if self.faults.read_at.get() == Some(self.last_seek) {
            // scribble first, like a transfer that died halfway
            buf.iter_mut().take(16).for_each(|b| *b = 0xFF);
            return Err(StreamError::Io("read failed"));
        }
        self.inner.read(handle, buf)
    }

    fn close(&mut self, handle: Self::Handle) {
        self.inner.close(handle)
    }
}

/// A file of `size` newlines that never exists in memory.
pub struct Newlines {
    size: u32,
    pos: u32,
}

impl Newlines {
    pub fn new(size: u32) -> Self {
        Self { size, pos: 0 }
    }
}

impl FileAccess for Newlines {
    type Handle = ();

    fn open(&mut self, _path: &str) -> Result<((), u32), StreamError> {
        self.pos = 0;
        Ok(((), self.size))
    }

    fn seek(&mut self, _handle: (), offset: u32) -> Result<(), StreamError> {
        self.pos = offset;
        Ok(())
    }

    fn read(&mut self, _handle: (), buf: &mut [u8]) -> Result<usize, StreamError> {
        let n = (self.size - self.pos).min(buf.len() as u32) as usize;
        buf[..n].fill(b'\n');
        self.pos += n as u32;
        Ok(n)
    }

    fn close(&mut self, _handle: ()) {}
}

/// Every non-empty chunk is a million pixels tall.
pub struct Tall;

impl Measure for Tall {
    fn measure(&mut self, text: &[u8]) -> i32 {
        if text.is_empty() { 0 } else { 1_000_000 }
    }
}
