// File-access backends for the stream reader.
//
// storage: FAT on SD through embedded-sdmmc (any BlockDevice)
// flash:   read-only tables compiled into the image
// sdcard:  the X4's SPI SD card (firmware only)

pub mod flash;
pub mod storage;

#[cfg(feature = "firmware")]
pub mod sdcard;
