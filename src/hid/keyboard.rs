//! USB HID keyboard report (boot protocol compatible).
//!
//! Layout (8 bytes):
//! ```text
//! Byte 0: Modifier keys (bitfield)
//!         Bit 0 = Left Ctrl,  Bit 1 = Left Shift,
//!         Bit 2 = Left Alt,   Bit 3 = Left GUI,
//!         Bit 4 = Right Ctrl, Bit 5 = Right Shift,
//!         Bit 6 = Right Alt,  Bit 7 = Right GUI
//! Byte 1: Reserved (0x00)
//! Byte 2-7: Up to 6 simultaneous key codes (USB HID usage codes)
//! ```

use crate::error::Error;

/// Keyboard report size in bytes.
pub const KEYBOARD_REPORT_SIZE: usize = 8;

/// First and last modifier usages (Left Control .. Right GUI).
const MODIFIER_FIRST: u8 = 0xE0;
const MODIFIER_LAST: u8 = 0xE7;

/// Standard USB HID boot-protocol keyboard report.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyboardReport {
    /// Modifier key bitfield.
    pub modifier: u8,
    /// Reserved byte (always 0x00).
    pub reserved: u8,
    /// Up to 6 simultaneously pressed key codes.
    pub keycodes: [u8; 6],
}

impl KeyboardReport {
    /// Create an empty (all-keys-released) report.
    pub const fn empty() -> Self {
        Self {
            modifier: 0,
            reserved: 0,
            keycodes: [0; 6],
        }
    }

    /// Mark `usage` as held.
    ///
    /// Returns `Ok(false)` if it was already held.
    pub fn press(&mut self, usage: u8) -> Result<bool, Error> {
        if let Some(bit) = modifier_bit(usage) {
            let changed = self.modifier & bit == 0;
            self.modifier |= bit;
            return Ok(changed);
        }
        if usage == 0 || self.keycodes.contains(&usage) {
            return Ok(false);
        }
        let slot = self
            .keycodes
            .iter_mut()
            .find(|k| **k == 0)
            .ok_or(Error::Rollover)?;
        *slot = usage;
        Ok(true)
    }

    /// Mark `usage` as released.
    ///
    /// Returns `false` if it was not held.
    pub fn release(&mut self, usage: u8) -> bool {
        if let Some(bit) = modifier_bit(usage) {
            let changed = self.modifier & bit != 0;
            self.modifier &= !bit;
            return changed;
        }
        match self.keycodes.iter_mut().find(|k| **k == usage && usage != 0) {
            Some(slot) => {
                *slot = 0;
                true
            }
            None => false,
        }
    }

    /// Serialise into a byte slice for USB HID transmission.
    /// Returns the number of bytes written (always 8).
    pub fn serialize(&self, buf: &mut [u8]) -> usize {
        if buf.len() < KEYBOARD_REPORT_SIZE {
            return 0;
        }
        buf[0] = self.modifier;
        buf[1] = self.reserved;
        buf[2..8].copy_from_slice(&self.keycodes);
        KEYBOARD_REPORT_SIZE
    }

    /// The report as a fixed-size array.
    pub fn to_bytes(&self) -> [u8; KEYBOARD_REPORT_SIZE] {
        let mut buf = [0u8; KEYBOARD_REPORT_SIZE];
        self.serialize(&mut buf);
        buf
    }

    /// Returns `true` if no keys are pressed (release event).
    pub fn is_empty(&self) -> bool {
        self.modifier == 0 && self.keycodes.iter().all(|&k| k == 0)
    }
}

fn modifier_bit(usage: u8) -> Option<u8> {
    if (MODIFIER_FIRST..=MODIFIER_LAST).contains(&usage) {
        Some(1 << (usage - MODIFIER_FIRST))
    } else {
        None
    }
}

/// The input report being assembled by the device.
#[derive(Clone, Debug, Default)]
pub struct KeyboardState {
    report: KeyboardReport,
}

impl KeyboardState {
    pub const fn new() -> Self {
        Self {
            report: KeyboardReport::empty(),
        }
    }

    /// Apply one key transition.
    ///
    /// Returns the updated report when it changed and must be sent.
    pub fn key_control(&mut self, usage: u8, pressed: bool) -> Result<Option<KeyboardReport>, Error> {
        let changed = if pressed {
            self.report.press(usage)?
        } else {
            self.report.release(usage)
        };
        Ok(changed.then_some(self.report))
    }

    /// Drop every held key.
    pub fn clear(&mut self) {
        self.report = KeyboardReport::empty();
    }

    pub fn report(&self) -> &KeyboardReport {
        &self.report
    }
}

// USB HID report descriptor for a boot-protocol keyboard

/// USB HID Report Descriptor for a standard keyboard.
///
/// This descriptor tells the USB host that we are a keyboard with:
///   - 8 modifier key bits (input)
///   - 1 reserved byte
///   - 5 LED indicators (output)
///   - 6 key code bytes (input)
pub const KEYBOARD_REPORT_DESCRIPTOR: &[u8] = &[
    0x05, 0x01, // Usage Page (Generic Desktop)
    0x09, 0x06, // Usage (Keyboard)
    0xA1, 0x01, // Collection (Application)
    //
    //   - Modifier keys (8 bits) -
    0x05, 0x07, //   Usage Page (Keyboard/Keypad)
    0x19, 0xE0, //   Usage Minimum (Left Control)
    0x29, 0xE7, //   Usage Maximum (Right GUI)
    0x15, 0x00, //   Logical Minimum (0)
    0x25, 0x01, //   Logical Maximum (1)
    0x75, 0x01, //   Report Size (1)
    0x95, 0x08, //   Report Count (8)
    0x81, 0x02, //   Input (Data, Variable, Absolute)
    //
    //   - Reserved byte -
    0x95, 0x01, //   Report Count (1)
    0x75, 0x08, //   Report Size (8)
    0x81, 0x01, //   Input (Constant) - padding
    //
    //   - LED output (5 bits + 3 padding) -
    0x05, 0x08, //   Usage Page (LEDs)
    0x19, 0x01, //   Usage Minimum (Num Lock)
    0x29, 0x05, //   Usage Maximum (Kana)
    0x95, 0x05, //   Report Count (5)
    0x75, 0x01, //   Report Size (1)
    0x91, 0x02, //   Output (Data, Variable, Absolute)
    0x95, 0x01, //   Report Count (1)
    0x75, 0x03, //   Report Size (3)
    0x91, 0x01, //   Output (Constant) - padding
    //
    //   - Key codes (6 bytes) -
    0x05, 0x07, //   Usage Page (Keyboard/Keypad)
    0x19, 0x00, //   Usage Minimum (0)
    0x29, 0xFF, //   Usage Maximum (255)
    0x15, 0x00, //   Logical Minimum (0)
    0x26, 0xFF, 0x00, // Logical Maximum (255)
    0x95, 0x06, //   Report Count (6)
    0x75, 0x08, //   Report Size (8)
    0x81, 0x00, //   Input (Data, Array)
    //
    0xC0, // End Collection
];
