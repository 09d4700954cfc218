//! HID keyboard class interface and class-level event handling.

pub mod keyboard;
pub mod led;


use crate::error::Error;
use crate::ui::{Indicator, Indicators};
use led::Led;

/// The HID keyboard class instance as seen by the core.
pub trait KeyboardClass {
    /// Press (`pressed = true`) or release `usage` and queue the report.
    fn key_control(&mut self, usage: u8, pressed: bool) -> Result<(), Error>;

    /// Current state of one host LED.  Never cached by the caller.
    fn led_state(&self, led: Led) -> bool;

    /// Drop the report being assembled.
    fn clear_buffer(&mut self) -> Result<(), Error>;
}

/// Class-specific events raised by the HID interface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HidEvent {
    /// The host wrote the LED output report.
    OutReportReady,
    /// An input report finished transmitting.
    InReportDone,
    /// SET_PROTOCOL(boot).
    SetBootProtocol,
    /// SET_PROTOCOL(report).
    SetReportProtocol,
    /// SET_IDLE with the requested duration (ms).
    SetIdle(u32),
}

/// React to one HID class event.
///
/// Nothing here is reported back to the caller: indicator feedback and
/// buffer clears are best-effort.
pub fn handle_event<K, I>(event: HidEvent, keyboard: &mut K, indicators: &mut I)
where
    K: KeyboardClass,
    I: Indicators,
{
    match event {
        HidEvent::OutReportReady => {
            // Only one output report exists for the keyboard: the LEDs.
            indicators.invert(Indicator::HidReport);
            led::sync_lock_leds(&*keyboard, indicators);
        }
        HidEvent::InReportDone => {
            indicators.invert(Indicator::HidReport);
        }
        HidEvent::SetBootProtocol | HidEvent::SetReportProtocol => {
            if let Err(e) = keyboard.clear_buffer() {
                debug!("clear_buffer failed: {}", e);
            }
        }
        _ => {}
    }
}
