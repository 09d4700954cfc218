//! GPIO-driven board LEDs (active-low on the nRF52840-DK).

use embassy_nrf::gpio::{AnyPin, Level, Output, OutputDrive};

use super::{Indicator, Indicators};

/// The four indicator LEDs, in [`Indicator::ALL`] order.
pub struct BoardLeds {
    leds: [Output<'static>; 4],
}

impl BoardLeds {
    /// Take the LED pins (LED 1 first) and switch every LED off.
    pub fn new(pins: [AnyPin; 4]) -> Self {
        Self {
            leds: pins.map(|pin| Output::new(pin, Level::High, OutputDrive::Standard)),
        }
    }
}

impl Indicators for BoardLeds {
    fn set(&mut self, indicator: Indicator, on: bool) {
        let led = &mut self.leds[indicator.index()];
        if on {
            led.set_low();
        } else {
            led.set_high();
        }
    }

    fn invert(&mut self, indicator: Indicator) {
        self.leds[indicator.index()].toggle();
    }
}
