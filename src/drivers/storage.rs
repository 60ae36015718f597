// SD card file access for the stream reader.
//
// Keeps one file open through raw embedded-sdmmc handles, so paging
// through a file costs a seek + read per chunk rather than a fresh
// volume -> root -> file walk. The volume stays open while the file is,
// so with the default VolumeManager only one file is open at a time.

use embedded_sdmmc::{
    BlockDevice, Mode, RawDirectory, RawFile, RawVolume, TimeSource, VolumeIdx, VolumeManager,
};
use log::warn;

use crate::stream::{FileAccess, StreamError};

#[derive(Clone, Copy)]
pub struct SdHandle {
    volume: RawVolume,
    file: RawFile,
}

pub struct SdFileAccess<'a, D, T>
where
    D: BlockDevice,
    T: TimeSource,
{
    mgr: &'a VolumeManager<D, T>,
}

fn sd_err<E: core::fmt::Debug>(what: &'static str, e: embedded_sdmmc::Error<E>) -> StreamError {
    warn!("sd: {}: {:?}", what, e);
    StreamError::Io(what)
}

// "/BOOKS/NOTES.TXT" -> ("BOOKS", "NOTES.TXT"); names are 8.3
pub fn split_path(path: &str) -> Result<(&str, &str), StreamError> {
    let path = path.trim_matches('/');
    let (dirs, name) = match path.rfind('/') {
        Some(i) => (&path[..i], &path[i + 1..]),
        None => ("", path),
    };
    if name.is_empty() {
        return Err(StreamError::InvalidArgument("empty file name"));
    }
    Ok((dirs, name))
}

impl<'a, D, T> SdFileAccess<'a, D, T>
where
    D: BlockDevice,
    T: TimeSource,
{
    pub const fn new(mgr: &'a VolumeManager<D, T>) -> Self {
        Self { mgr }
    }

    // walk dirs from root; each parent is closed once its child is open
    fn open_dir_path(&self, volume: RawVolume, dirs: &str) -> Result<RawDirectory, StreamError> {
        let mut dir = self
            .mgr
            .open_root_dir(volume)
            .map_err(|e| sd_err("open root dir failed", e))?;

        for name in dirs.split('/').filter(|c| !c.is_empty()) {
            let next = self.mgr.open_dir(dir, name);
            let _ = self.mgr.close_dir(dir);
            dir = next.map_err(|e| sd_err("open dir failed", e))?;
        }
        Ok(dir)
    }

    fn open_in_volume(&self, volume: RawVolume, path: &str) -> Result<(RawFile, u32), StreamError> {
        let (dirs, name) = split_path(path)?;
        let dir = self.open_dir_path(volume, dirs)?;

        let file = self.mgr.open_file_in_dir(dir, name, Mode::ReadOnly);
        let _ = self.mgr.close_dir(dir);
        let file = file.map_err(|e| sd_err("open file failed", e))?;

        match self.mgr.file_length(file) {
            Ok(size) => Ok((file, size)),
            Err(e) => {
                let _ = self.mgr.close_file(file);
                Err(sd_err("file length failed", e))
            }
        }
    }
}

impl<D, T> FileAccess for SdFileAccess<'_, D, T>
where
    D: BlockDevice,
    T: TimeSource,
{
    type Handle = SdHandle;

    fn open(&mut self, path: &str) -> Result<(SdHandle, u32), StreamError> {
        let volume = self
            .mgr
            .open_raw_volume(VolumeIdx(0))
            .map_err(|e| sd_err("open volume failed", e))?;

        match self.open_in_volume(volume, path) {
            Ok((file, size)) => Ok((SdHandle { volume, file }, size)),
            Err(e) => {
                let _ = self.mgr.close_volume(volume);
                Err(e)
            }
        }
    }

    fn seek(&mut self, handle: SdHandle, offset: u32) -> Result<(), StreamError> {
        self.mgr
            .file_seek_from_start(handle.file, offset)
            .map_err(|e| sd_err("seek failed", e))
    }

    fn read(&mut self, handle: SdHandle, buf: &mut [u8]) -> Result<usize, StreamError> {
        let eof = self
            .mgr
            .file_eof(handle.file)
            .map_err(|e| sd_err("eof check failed", e))?;
        if eof {
            return Ok(0);
        }
        self.mgr
            .read(handle.file, buf)
            .map_err(|e| sd_err("read failed", e))
    }

    // file before volume; the volume refuses to close with files open
    fn close(&mut self, handle: SdHandle) {
        if let Err(e) = self.mgr.close_file(handle.file) {
            warn!("sd: close file failed: {:?}", e);
        }
        if let Err(e) = self.mgr.close_volume(handle.volume) {
            warn!("sd: close volume failed: {:?}", e);
        }
    }
}
