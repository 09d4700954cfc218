//! Button → HID usage mapping.
//!
//! Four buttons are recognised; each sends one fixed key.  Transitions
//! from any other pin are dropped without touching the keyboard class.

use crate::config;
use crate::hid::KeyboardClass;

/// Debounced button edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonAction {
    Push,
    Release,
}

/// A debounced transition on one button, identified by its pin number.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonEvent {
    pub pin: u8,
    pub action: ButtonAction,
}

impl ButtonEvent {
    pub const fn push(pin: u8) -> Self {
        Self {
            pin,
            action: ButtonAction::Push,
        }
    }

    pub const fn release(pin: u8) -> Self {
        Self {
            pin,
            action: ButtonAction::Release,
        }
    }
}

/// Static pin → usage table, in button order (button 1 first).
pub const KEY_MAP: [(u8, u8); 4] = [
    (config::BUTTON1_PIN, config::BUTTON1_KEY),
    (config::BUTTON2_PIN, config::BUTTON2_KEY),
    (config::BUTTON3_PIN, config::BUTTON3_KEY),
    (config::BUTTON4_PIN, config::BUTTON4_KEY),
];

/// Usage code bound to `pin`, if it is one of the four buttons.
pub fn key_for(pin: u8) -> Option<u8> {
    KEY_MAP
        .iter()
        .find(|(p, _)| *p == pin)
        .map(|&(_, usage)| usage)
}

/// 1-based button number for log messages.
fn button_number(pin: u8) -> Option<usize> {
    KEY_MAP.iter().position(|(p, _)| *p == pin).map(|i| i + 1)
}

/// Translate a button edge into a `(usage, is_down)` pair.
pub fn translate(event: ButtonEvent) -> Option<(u8, bool)> {
    let usage = key_for(event.pin)?;
    Some((usage, event.action == ButtonAction::Push))
}

/// Forward a button edge to the keyboard class.
///
/// Delivery is best-effort: a rejected key event is logged and dropped,
/// the next button edge produces a fresh report anyway.
pub fn dispatch<K: KeyboardClass>(event: ButtonEvent, keyboard: &mut K) {
    let Some((usage, down)) = translate(event) else {
        return;
    };

    if let Err(e) = keyboard.key_control(usage, down) {
        warn!("key_control({=u8:#x}, {}) failed: {}", usage, down, e);
    }

    if let Some(n) = button_number(event.pin) {
        if down {
            info!("button{} pressed.", n);
        } else {
            info!("button{} released.", n);
        }
    }
}
