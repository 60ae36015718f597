// Read-only files baked into flash with include_bytes!.
// Zero heap; a handle is just the table index plus a cursor slot.
// Used for built-in help text when no card is mounted.

use crate::stream::{FileAccess, StreamError};

// concurrent handles per table
const MAX_OPEN: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlashHandle(u8);

pub struct FlashFiles<'a> {
    files: &'a [(&'a str, &'a [u8])],
    // (file index, cursor) per open handle
    open: [Option<(usize, usize)>; MAX_OPEN],
}

impl<'a> FlashFiles<'a> {
    pub const fn new(files: &'a [(&'a str, &'a [u8])]) -> Self {
        Self {
            files,
            open: [None; MAX_OPEN],
        }
    }

    fn find(&self, path: &str) -> Option<usize> {
        let path = path.trim_start_matches('/');
        self.files
            .iter()
            .position(|(name, _)| name.eq_ignore_ascii_case(path))
    }

    pub fn open_handles(&self) -> usize {
        self.open.iter().filter(|h| h.is_some()).count()
    }

    fn entry(&self, handle: FlashHandle) -> Result<(usize, usize), StreamError> {
        self.open
            .get(handle.0 as usize)
            .copied()
            .flatten()
            .ok_or(StreamError::Io("stale flash handle"))
    }
}

impl FileAccess for FlashFiles<'_> {
    type Handle = FlashHandle;

    fn open(&mut self, path: &str) -> Result<(FlashHandle, u32), StreamError> {
        let idx = self.find(path).ok_or(StreamError::Io("open file failed"))?;
        let slot = self
            .open
            .iter()
            .position(|h| h.is_none())
            .ok_or(StreamError::Io("too many open files"))?;
        self.open[slot] = Some((idx, 0));
        Ok((FlashHandle(slot as u8), self.files[idx].1.len() as u32))
    }

    fn seek(&mut self, handle: FlashHandle, offset: u32) -> Result<(), StreamError> {
        let (idx, _) = self.entry(handle)?;
        if offset as usize > self.files[idx].1.len() {
            return Err(StreamError::Io("seek failed"));
        }
        self.open[handle.0 as usize] = Some((idx, offset as usize));
        Ok(())
    }

    fn read(&mut self, handle: FlashHandle, buf: &mut [u8]) -> Result<usize, StreamError> {
        let (idx, pos) = self.entry(handle)?;
        let data = self.files[idx].1;
        let n = data.len().saturating_sub(pos).min(buf.len());
        buf[..n].copy_from_slice(&data[pos..pos + n]);
        self.open[handle.0 as usize] = Some((idx, pos + n));
        Ok(n)
    }

    fn close(&mut self, handle: FlashHandle) {
        if let Some(h) = self.open.get_mut(handle.0 as usize) {
            *h = None;
        }
    }
}
