//! Host LED state and the Num/Caps Lock indicator sync.
//!
//! The boot keyboard output report is a single byte:
//! ```text
//! Bit 0 = Num Lock, Bit 1 = Caps Lock, Bit 2 = Scroll Lock,
//! Bit 3 = Compose,  Bit 4 = Kana,      Bits 5-7 = padding
//! ```

use crate::error::Error;
use crate::ui::{Indicator, Indicators};

use super::KeyboardClass;

/// One LED in the host output report.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Led {
    NumLock,
    CapsLock,
    ScrollLock,
    Compose,
    Kana,
}

impl Led {
    const fn mask(self) -> u8 {
        match self {
            Led::NumLock => 1 << 0,
            Led::CapsLock => 1 << 1,
            Led::ScrollLock => 1 << 2,
            Led::Compose => 1 << 3,
            Led::Kana => 1 << 4,
        }
    }
}

/// LED bits last written by the host.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LedState(u8);

impl LedState {
    const VALID_BITS: u8 = 0x1F;

    pub const fn empty() -> Self {
        Self(0)
    }

    /// Build from a raw LED byte; padding bits are discarded.
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & Self::VALID_BITS)
    }

    /// Parse a host output report.
    pub fn from_output_report(data: &[u8]) -> Result<Self, Error> {
        data.first()
            .map(|&b| Self::from_bits(b))
            .ok_or(Error::ShortReport)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn is_on(self, led: Led) -> bool {
        self.0 & led.mask() != 0
    }
}

/// Mirror the host's Num Lock and Caps Lock onto the board indicators.
///
/// Both bits are read fresh from `keyboard` on every call.
pub fn sync_lock_leds<K, I>(keyboard: &K, indicators: &mut I)
where
    K: KeyboardClass + ?Sized,
    I: Indicators + ?Sized,
{
    indicators.set(Indicator::NumLock, keyboard.led_state(Led::NumLock));
    indicators.set(Indicator::CapsLock, keyboard.led_state(Led::CapsLock));
}
