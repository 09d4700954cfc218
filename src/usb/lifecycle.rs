//! USB connection lifecycle state machine.
//!
//! ```text
//!                PowerDetected            PowerReady
//!  Disconnected ───────────────▶ PowerDetected ─────────▶ Started
//!       ▲                                                 │    ▲
//!       │ Stopped (from any state)                Suspend │    │ Resume
//!       │                                                 ▼    │
//!       └───────────────────────────────────────────── Suspended
//! ```
//!
//! `PowerRemoved` only asks the stack to stop; the state follows when the
//! stack reports `Stopped`.  `Started` moves to `Started` from any state.
//! Every other (state, event) pair is ignored.

use crate::hid::{led, KeyboardClass};
use crate::ui::{Indicator, Indicators};

use super::{UsbEvent, UsbStack};

/// Logical connection state of the device.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConnectionState {
    #[default]
    Disconnected,
    PowerDetected,
    Started,
    Suspended,
    /// Representable but not reached by any transition; `Stopped` events
    /// land in `Disconnected`.
    Stopped,
}

/// Single owner of [`ConnectionState`].
#[derive(Debug, Default)]
pub struct ConnectionManager {
    state: ConnectionState,
}

impl ConnectionManager {
    pub const fn new() -> Self {
        Self {
            state: ConnectionState::Disconnected,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_state(state: ConnectionState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Bring the stack up without waiting for VBUS events.
    ///
    /// Used when power detection is disabled in [`crate::config`].
    pub fn start_without_power_detection<U, I>(&mut self, usb: &mut U, indicators: &mut I)
    where
        U: UsbStack,
        I: Indicators,
    {
        info!("No USB power detection enabled, starting USB now");
        usb.enable();
        usb.start();
        indicators.set(Indicator::UsbActive, true);
        self.transition(ConnectionState::Started);
    }

    /// Apply one lifecycle event.
    pub fn handle<U, K, I>(&mut self, event: UsbEvent, usb: &mut U, keyboard: &K, indicators: &mut I)
    where
        U: UsbStack,
        K: KeyboardClass,
        I: Indicators,
    {
        use ConnectionState::*;

        match (self.state, event) {
            (_, UsbEvent::StartOfFrame) => {}

            (Started, UsbEvent::Suspend) => {
                if !usb.suspend_request() {
                    debug!("suspend request refused");
                }
                indicators.all_off();
                self.transition(Suspended);
            }

            (Suspended, UsbEvent::Resume) => {
                indicators.set(Indicator::UsbActive, true);
                // Everything went dark on suspend; the host may also have
                // changed the lock keys meanwhile.
                led::sync_lock_leds(keyboard, indicators);
                self.transition(Started);
            }

            (_, UsbEvent::Started) => {
                indicators.set(Indicator::UsbActive, true);
                self.transition(Started);
            }

            (_, UsbEvent::Stopped) => {
                usb.disable();
                indicators.all_off();
                self.transition(Disconnected);
            }

            (Disconnected, UsbEvent::PowerDetected) => {
                info!("USB power detected");
                if !usb.is_enabled() {
                    usb.enable();
                }
                self.transition(PowerDetected);
            }

            (PowerDetected | Started | Suspended, UsbEvent::PowerRemoved) => {
                info!("USB power removed");
                usb.stop();
            }

            (PowerDetected, UsbEvent::PowerReady) => {
                info!("USB ready");
                usb.start();
                indicators.set(Indicator::UsbActive, true);
                self.transition(Started);
            }

            (state, event) => {
                debug!("ignoring {} in {}", event, state);
            }
        }
    }

    fn transition(&mut self, next: ConnectionState) {
        if next != self.state {
            debug!("USB: {} -> {}", self.state, next);
            self.state = next;
        }
    }
}
