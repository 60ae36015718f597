// Random-access chunk reads over an exclusively owned file handle.
//
// FileAccess is the seam to whatever actually holds the bytes (FAT on
// SD, flash tables, test doubles). ChunkReader adds the cursor, size
// bookkeeping and idempotent close; it does no caching of its own.

use log::debug;

use super::error::StreamError;

// one SD sector per chunk
pub const CHUNK_BYTES: usize = 512;

/// Number of chunks for a file of `size` bytes; an empty file still has one.
pub const fn chunk_count(size: u32) -> usize {
    let n = (size as usize).div_ceil(CHUNK_BYTES);
    if n == 0 { 1 } else { n }
}

/// File-access collaborator consumed by the reader.
///
/// `read` may return fewer bytes than asked; only a zero return means
/// end of file. `close` must tolerate a handle that already failed.
pub trait FileAccess {
    type Handle: Copy;

    /// open read-only, returning the handle and the file size in bytes
    fn open(&mut self, path: &str) -> Result<(Self::Handle, u32), StreamError>;
    fn seek(&mut self, handle: Self::Handle, offset: u32) -> Result<(), StreamError>;
    fn read(&mut self, handle: Self::Handle, buf: &mut [u8]) -> Result<usize, StreamError>;
    fn close(&mut self, handle: Self::Handle);
}

pub struct ChunkReader<F: FileAccess> {
    fs: F,
    handle: Option<F::Handle>,
    size: u32,
    pos: u32,
}

impl<F: FileAccess> ChunkReader<F> {
    pub const fn new(fs: F) -> Self {
        Self {
            fs,
            handle: None,
            size: 0,
            pos: 0,
        }
    }

    // replaces any file already open
    pub fn open(&mut self, path: &str) -> Result<u32, StreamError> {
        if path.is_empty() {
            return Err(StreamError::InvalidArgument("empty path"));
        }
        self.close();

        let (handle, size) = self.fs.open(path)?;
        self.handle = Some(handle);
        self.size = size;
        self.pos = 0;
        debug!("reader: open {} ({} bytes)", path, size);
        Ok(size)
    }

    // offset == size is valid and yields zero bytes on the next read
    pub fn seek(&mut self, offset: u32) -> Result<(), StreamError> {
        let handle = self.handle.ok_or(StreamError::NotOpen)?;
        if offset > self.size {
            return Err(StreamError::Io("seek past end"));
        }
        self.fs.seek(handle, offset)?;
        self.pos = offset;
        Ok(())
    }

    // fill buf from the cursor; short only at end of file
    pub fn read_next(&mut self, buf: &mut [u8]) -> Result<usize, StreamError> {
        let handle = self.handle.ok_or(StreamError::NotOpen)?;

        let mut total = 0;
        while total < buf.len() {
            let n = self.fs.read(handle, &mut buf[total..])?;
            if n == 0 {
                break;
            }
            total += n;
        }

        self.pos += total as u32;
        Ok(total)
    }

    pub fn close(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.fs.close(handle);
        }
        self.size = 0;
        self.pos = 0;
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.handle.is_some()
    }

    #[inline]
    pub fn size(&self) -> u32 {
        self.size
    }

    #[inline]
    pub fn position(&self) -> u32 {
        self.pos
    }

    pub fn file_access(&self) -> &F {
        &self.fs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::flash::FlashFiles;

    const TEXT: &[u8] = b"0123456789abcdefghij";

    fn reader() -> ChunkReader<FlashFiles<'static>> {
        static FILES: &[(&str, &[u8])] = &[("NOTES.TXT", TEXT), ("EMPTY.TXT", b"")];
        ChunkReader::new(FlashFiles::new(FILES))
    }

    #[test]
    fn chunk_count_rounds_up_and_never_hits_zero() {
        assert_eq!(chunk_count(0), 1);
        assert_eq!(chunk_count(1), 1);
        assert_eq!(chunk_count(512), 1);
        assert_eq!(chunk_count(513), 2);
        assert_eq!(chunk_count(1300), 3);
    }

    #[test]
    fn open_records_size() {
        let mut r = reader();
        assert_eq!(r.open("NOTES.TXT"), Ok(20));
        assert!(r.is_open());
        assert_eq!(r.size(), 20);
        assert_eq!(r.position(), 0);
    }

    #[test]
    fn open_missing_file_fails_and_stays_closed() {
        let mut r = reader();
        assert!(r.open("NOPE.TXT").unwrap_err().is_io());
        assert!(!r.is_open());
    }

    #[test]
    fn empty_path_is_rejected() {
        let mut r = reader();
        assert_eq!(
            r.open(""),
            Err(StreamError::InvalidArgument("empty path"))
        );
    }

    #[test]
    fn seek_then_read_advances_cursor() {
        let mut r = reader();
        r.open("NOTES.TXT").unwrap();
        r.seek(10).unwrap();

        let mut buf = [0u8; 4];
        assert_eq!(r.read_next(&mut buf), Ok(4));
        assert_eq!(&buf, b"abcd");
        assert_eq!(r.position(), 14);
    }

    #[test]
    fn read_is_short_only_at_eof() {
        let mut r = reader();
        r.open("NOTES.TXT").unwrap();
        r.seek(16).unwrap();

        let mut buf = [0u8; 8];
        assert_eq!(r.read_next(&mut buf), Ok(4));
        assert_eq!(&buf[..4], b"ghij");
        assert_eq!(r.read_next(&mut buf), Ok(0));
    }

    #[test]
    fn seek_to_size_is_valid_but_past_it_is_not() {
        let mut r = reader();
        r.open("NOTES.TXT").unwrap();
        assert_eq!(r.seek(20), Ok(()));
        let mut buf = [0u8; 4];
        assert_eq!(r.read_next(&mut buf), Ok(0));
        assert_eq!(r.seek(21), Err(StreamError::Io("seek past end")));
    }

    #[test]
    fn close_is_idempotent() {
        let mut r = reader();
        r.close();
        r.open("EMPTY.TXT").unwrap();
        r.close();
        r.close();
        assert!(!r.is_open());
        assert_eq!(r.size(), 0);

        let mut buf = [0u8; 4];
        assert_eq!(r.read_next(&mut buf), Err(StreamError::NotOpen));
        assert_eq!(r.seek(0), Err(StreamError::NotOpen));
    }
}
