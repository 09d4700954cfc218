//! usbkbd - a four-button USB HID keyboard for the nRF52840.
//!
//! Buttons 1-4 type `a`-`d`; the host's Caps Lock and Num Lock state is
//! shown on LED 1 and LED 2.
//!
//! The hardware-independent core (USB lifecycle state machine, HID event
//! handling, key mapping and the event loop) builds on the host and is
//! unit tested there:
//!
//! Usage: `cargo test`
//!
//! The `embedded` feature adds the Embassy/nRF adapters and the firmware
//! binary in `main.rs`.

#![cfg_attr(not(test), no_std)]

// Must come first so the logging macros are visible to every module.
mod fmt;

pub mod app;
pub mod config;
pub mod error;
pub mod hid;
pub mod keymap;
pub mod queue;
pub mod ui;
pub mod usb;

#[cfg(test)]
mod mock;

pub use app::{Firmware, LogSink};
pub use error::Error;
pub use queue::{Event, EventQueue};

// ═══════════════════════════════════════════════════════════════════════════
// Unit Tests - key mapping and error classification
// ═══════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use critical_section as _;

    use super::config;
    use super::error::Error;
    use super::hid::led::Led;
    use super::hid::KeyboardClass;
    use super::keymap::{self, ButtonAction, ButtonEvent};

    #[derive(Default)]
    struct RecordingKeyboard {
        calls: Vec<(u8, bool)>,
        fail: bool,
    }

    impl KeyboardClass for RecordingKeyboard {
        fn key_control(&mut self, usage: u8, pressed: bool) -> Result<(), Error> {
            self.calls.push((usage, pressed));
            if self.fail {
                Err(Error::ReportQueueFull)
            } else {
                Ok(())
            }
        }

        fn led_state(&self, _led: Led) -> bool {
            false
        }

        fn clear_buffer(&mut self) -> Result<(), Error> {
            Ok(())
        }
    }

    // ════════════════════════════════════════════════════════════════════════
    // Key Mapper Tests
    // ════════════════════════════════════════════════════════════════════════

    #[test]
    fn each_button_maps_to_its_key() {
        assert_eq!(keymap::key_for(config::BUTTON1_PIN), Some(0x04)); // a
        assert_eq!(keymap::key_for(config::BUTTON2_PIN), Some(0x05)); // b
        assert_eq!(keymap::key_for(config::BUTTON3_PIN), Some(0x06)); // c
        assert_eq!(keymap::key_for(config::BUTTON4_PIN), Some(0x07)); // d
    }

    #[test]
    fn unknown_pins_have_no_key() {
        for pin in [0u8, 1, 13, 16, 31, 255] {
            assert_eq!(keymap::key_for(pin), None);
        }
    }

    #[test]
    fn translate_carries_edge_direction() {
        for &(pin, usage) in keymap::KEY_MAP.iter() {
            assert_eq!(
                keymap::translate(ButtonEvent::push(pin)),
                Some((usage, true))
            );
            assert_eq!(
                keymap::translate(ButtonEvent::release(pin)),
                Some((usage, false))
            );
        }
    }

    #[test]
    fn translate_is_deterministic() {
        let ev = ButtonEvent {
            pin: config::BUTTON3_PIN,
            action: ButtonAction::Push,
        };
        assert_eq!(keymap::translate(ev), keymap::translate(ev));
    }

    #[test]
    fn dispatch_forwards_press_then_release() {
        let mut kb = RecordingKeyboard::default();
        keymap::dispatch(ButtonEvent::push(config::BUTTON1_PIN), &mut kb);
        keymap::dispatch(ButtonEvent::release(config::BUTTON1_PIN), &mut kb);
        assert_eq!(kb.calls, vec![(0x04, true), (0x04, false)]);
    }

    #[test]
    fn dispatch_ignores_unknown_pin() {
        let mut kb = RecordingKeyboard::default();
        keymap::dispatch(ButtonEvent::push(3), &mut kb);
        keymap::dispatch(ButtonEvent::release(3), &mut kb);
        assert!(kb.calls.is_empty());
    }

    #[test]
    fn dispatch_swallows_key_control_errors() {
        let mut kb = RecordingKeyboard {
            fail: true,
            ..Default::default()
        };
        keymap::dispatch(ButtonEvent::push(config::BUTTON4_PIN), &mut kb);
        keymap::dispatch(ButtonEvent::push(config::BUTTON2_PIN), &mut kb);
        assert_eq!(kb.calls, vec![(0x07, true), (0x05, true)]);
    }

    #[test]
    fn key_map_pins_are_distinct() {
        for (i, (a, _)) in keymap::KEY_MAP.iter().enumerate() {
            for (b, _) in keymap::KEY_MAP.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    // ════════════════════════════════════════════════════════════════════════
    // Error Tests
    // ════════════════════════════════════════════════════════════════════════

    #[test]
    fn only_init_errors_are_fatal() {
        assert!(Error::Spawn.is_fatal());
        assert!(Error::UsbInit.is_fatal());
        for e in [
            Error::Usb,
            Error::Rollover,
            Error::ReportQueueFull,
            Error::ShortReport,
            Error::QueueFull,
        ] {
            assert!(!e.is_fatal());
        }
    }
}
