// SD card over SPI with FAT volume manager
// No RTC on board; timestamps are fixed to 2025-01-01.

use embedded_sdmmc::{SdCard, TimeSource, Timestamp, VolumeIdx, VolumeManager};
use log::{info, warn};

use crate::drivers::storage::SdFileAccess;

// card init must run at <= 400 kHz
pub const SD_INIT_FREQ_KHZ: u32 = 400;

#[derive(Default, Clone, Copy)]
pub struct DummyTimeSource;

impl TimeSource for DummyTimeSource {
    fn get_timestamp(&self) -> Timestamp {
        Timestamp {
            year_since_1970: 55,
            zero_indexed_month: 0,
            zero_indexed_day: 0,
            hours: 0,
            minutes: 0,
            seconds: 0,
        }
    }
}

pub type SdVolumeManager<SPI> = VolumeManager<SdCard<SPI, esp_hal::delay::Delay>, DummyTimeSource>;

pub struct SdStorage<SPI>
where
    SPI: embedded_hal::spi::SpiDevice,
{
    pub volume_mgr: SdVolumeManager<SPI>,
}

impl<SPI> SdStorage<SPI>
where
    SPI: embedded_hal::spi::SpiDevice,
{
    pub fn new(spi: SPI) -> Self {
        let sdcard = SdCard::new(spi, esp_hal::delay::Delay::new());

        // probing runs the card init sequence before the volume manager owns it
        match sdcard.num_bytes() {
            Ok(bytes) => info!("SD card: {} bytes ({} MB)", bytes, bytes / 1024 / 1024),
            Err(e) => info!("SD card probe failed: {:?}", e),
        }

        let volume_mgr = VolumeManager::new(sdcard, DummyTimeSource);
        Self { volume_mgr }
    }

    // true if volume 0 mounts; leaves it closed for the stream reader
    pub fn probe(&self) -> bool {
        match self.volume_mgr.open_raw_volume(VolumeIdx(0)) {
            Ok(volume) => {
                let _ = self.volume_mgr.close_volume(volume);
                true
            }
            Err(e) => {
                warn!("SD volume unavailable: {:?}", e);
                false
            }
        }
    }

    pub fn file_access(&self) -> SdFileAccess<'_, SdCard<SPI, esp_hal::delay::Delay>, DummyTimeSource> {
        SdFileAccess::new(&self.volume_mgr)
    }
}
