// windowed text streaming for the XTEink X4 (ESP32-C3, e-paper)

#![cfg_attr(not(test), no_std)]

pub mod board;
pub mod drivers;
pub mod fonts;
pub mod stream;
