//! User-facing hardware - four indicator LEDs and four push buttons.
//!
//! ## Indicators
//!
//! | LED | Meaning                                         |
//! |-----|-------------------------------------------------|
//! | 1   | Caps Lock, as reported by the host              |
//! | 2   | Num Lock, as reported by the host               |
//! | 3   | Toggles on every HID report received or sent    |
//! | 4   | USB library started and bus not suspended       |
//!
//! The core only ever writes indicators; the GPIO driver behind
//! [`Indicators`] is never read back.

#[cfg(feature = "embedded")]
pub mod buttons;
#[cfg(feature = "embedded")]
pub mod leds;

/// Board indicators driven by the firmware.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Indicator {
    CapsLock,
    NumLock,
    /// Activity heartbeat for HID report traffic.
    HidReport,
    /// USB started and not suspended.
    UsbActive,
}

impl Indicator {
    pub const ALL: [Indicator; 4] = [
        Indicator::CapsLock,
        Indicator::NumLock,
        Indicator::HidReport,
        Indicator::UsbActive,
    ];

    /// Position of this indicator in [`Indicator::ALL`] (LED number - 1).
    pub const fn index(self) -> usize {
        match self {
            Indicator::CapsLock => 0,
            Indicator::NumLock => 1,
            Indicator::HidReport => 2,
            Indicator::UsbActive => 3,
        }
    }
}

/// Write-only indicator sink.
pub trait Indicators {
    /// Drive one indicator on or off.
    fn set(&mut self, indicator: Indicator, on: bool);

    /// Flip one indicator.
    fn invert(&mut self, indicator: Indicator);

    /// Turn every indicator off.
    fn all_off(&mut self) {
        for indicator in Indicator::ALL {
            self.set(indicator, false);
        }
    }
}
