//! XTEink X4 board support for the text viewer.
//!
//! Maps the SD card's SPI bus and the button ladders to named subsystems
//! so the viewer doesn't need to know GPIO numbers or peripheral details.
//! Button decoding and pin tables build everywhere; the hardware bundles
//! need the `firmware` feature.

pub mod button;
pub mod pins;

pub use button::{Button, ROW1_THRESHOLDS, ROW2_THRESHOLDS, ViewAction, decode_ladder};
pub use pins::{DISPLAY_HEIGHT, DISPLAY_WIDTH};

#[cfg(feature = "firmware")]
mod hw;

#[cfg(feature = "firmware")]
pub use hw::{Board, InputHw, SdSpi, SpiBus};
