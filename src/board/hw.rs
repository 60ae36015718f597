// Peripheral bring-up for the SD card bus and the button ladders.

use embedded_hal_bus::spi::ExclusiveDevice;
use esp_hal::{
    Blocking,
    analog::adc::{Adc, AdcCalCurve, AdcConfig, AdcPin, Attenuation},
    delay::Delay,
    gpio::{Level, Output, OutputConfig},
    peripherals::{ADC1, GPIO1, GPIO2, Peripherals},
    spi,
    time::Rate,
};

use super::button::{Button, ROW1_THRESHOLDS, ROW2_THRESHOLDS, decode_ladder};
use crate::drivers::sdcard::SD_INIT_FREQ_KHZ;

pub type SpiBus = spi::master::Spi<'static, Blocking>;
pub type SdSpi = ExclusiveDevice<SpiBus, Output<'static>, Delay>;

/// Button ladders on ADC1.
pub struct InputHw {
    pub adc: Adc<'static, ADC1<'static>, Blocking>,
    pub row1: AdcPin<GPIO1<'static>, ADC1<'static>, AdcCalCurve<ADC1<'static>>>,
    pub row2: AdcPin<GPIO2<'static>, ADC1<'static>, AdcCalCurve<ADC1<'static>>>,
}

impl InputHw {
    // row 1 wins when both ladders read a press
    pub fn read_button(&mut self) -> Option<Button> {
        let row1 = nb::block!(self.adc.read_oneshot(&mut self.row1)).ok();
        if let Some(b) = row1.and_then(|mv| decode_ladder(mv, ROW1_THRESHOLDS)) {
            return Some(b);
        }
        let row2 = nb::block!(self.adc.read_oneshot(&mut self.row2)).ok();
        row2.and_then(|mv| decode_ladder(mv, ROW2_THRESHOLDS))
    }
}

/// Board hardware the viewer needs.
pub struct Board {
    pub input: InputHw,
    /// SD card on SPI2, clocked for card init
    pub sd_spi: SdSpi,
    /// display select, parked high so the panel ignores SD traffic
    pub epd_cs: Output<'static>,
}

impl Board {
    pub fn init(p: Peripherals) -> Self {
        let mut adc_cfg = AdcConfig::new();

        // 11dB attenuation for the full 0-3.3V range
        let row1 = adc_cfg.enable_pin_with_cal::<_, AdcCalCurve<ADC1>>(p.GPIO1, Attenuation::_11dB);
        let row2 = adc_cfg.enable_pin_with_cal::<_, AdcCalCurve<ADC1>>(p.GPIO2, Attenuation::_11dB);
        let adc = Adc::new(p.ADC1, adc_cfg);

        let epd_cs = Output::new(p.GPIO21, Level::High, OutputConfig::default());
        let sd_cs = Output::new(p.GPIO12, Level::High, OutputConfig::default());

        let spi_cfg =
            spi::master::Config::default().with_frequency(Rate::from_khz(SD_INIT_FREQ_KHZ));
        let spi_bus = spi::master::Spi::new(p.SPI2, spi_cfg)
            .unwrap()
            .with_sck(p.GPIO8)
            .with_mosi(p.GPIO10)
            .with_miso(p.GPIO7);

        let sd_spi = ExclusiveDevice::new(spi_bus, sd_cs, Delay::new()).unwrap();

        Board {
            input: InputHw { adc, row1, row2 },
            sd_spi,
            epd_cs,
        }
    }
}
