//! GPIO |     Function    |      Notes
//! -----+-----------------+----------------------------------
//!  1   | ADC1 - Button 2 | Resistance ladder: Right/Left/Confirm/Back
//!  2   | ADC2 - Button 1 | Resistance ladder: Volume Up/Down
//!  7   | SPI2 MISO       | SD card data out
//!  8   | SPI2 SCK        | Shared SPI clock
//! 10   | SPI2 MOSI       | Shared SPI data out
//! 12   | SD CS           | SD card chip select
//! 21   | EPD CS          | Display chip select, held high while streaming

// ----- SD Card -----
pub const SD_CS: u8 = 12;

// ----- SPI Bus (shared: EPD + SD) -----
pub const SPI_SCK: u8 = 8;
pub const SPI_MOSI: u8 = 10;
pub const SPI_MISO: u8 = 7;
pub const EPD_CS: u8 = 21;

// ----- Buttons (ADC) -----
pub const BTN_ROW1_ADC: u8 = 1;
pub const BTN_ROW2_ADC: u8 = 2;

// ----- Panel geometry (portrait) -----
pub const DISPLAY_WIDTH: u16 = 480;
pub const DISPLAY_HEIGHT: u16 = 800;
