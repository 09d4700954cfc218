//! Application-wide constants and compile-time configuration.
//!
//! All pin assignments, key bindings, timing parameters and USB identity
//! strings live here so they can be tuned in one place.

// Key bindings

/// HID usage codes sent by buttons 1..4 (Keyboard/Keypad page).
/// 0x04 = `a`, 0x05 = `b`, 0x06 = `c`, 0x07 = `d`.
pub const BUTTON1_KEY: u8 = 0x04;
pub const BUTTON2_KEY: u8 = 0x05;
pub const BUTTON3_KEY: u8 = 0x06;
pub const BUTTON4_KEY: u8 = 0x07;

// GPIO pin assignments (nRF52840-DK / PCA10056)
//
// The embedded build selects the matching `embassy_nrf::peripherals::*`
// in `main.rs`.  Buttons are active-low with internal pull-up, LEDs are
// active-low.
//
//   Button 1 → P0.11     LED 1 (Caps Lock)  → P0.13
//   Button 2 → P0.12     LED 2 (Num Lock)   → P0.14
//   Button 3 → P0.24     LED 3 (HID report) → P0.15
//   Button 4 → P0.25     LED 4 (USB active) → P0.16

/// Button identities are the raw pin numbers on port 0.
pub const BUTTON1_PIN: u8 = 11;
pub const BUTTON2_PIN: u8 = 12;
pub const BUTTON3_PIN: u8 = 24;
pub const BUTTON4_PIN: u8 = 25;

/// Button detection (debounce) time (ms).
pub const BUTTON_DETECTION_MS: u64 = 30;

// USB

/// Watch VBUS and bring the USB stack up only when the cable is powered.
/// When `false` the stack is enabled and started right away at boot.
pub const USBD_POWER_DETECTION: bool = true;

/// USB VID/PID - "pid.codes" open-source test VID.
/// Replace with your own allocated VID/PID for production.
pub const USB_VID: u16 = 0x1209;
pub const USB_PID: u16 = 0x0002;

/// USB device strings.
pub const USB_MANUFACTURER: &str = "usbkbd";
pub const USB_PRODUCT: &str = "Four-Button HID Keyboard";
pub const USB_SERIAL_NUMBER: &str = "000001";

/// Current drawn from the bus (mA).
pub const USB_MAX_POWER_MA: u16 = 100;

/// USB HID polling interval (ms).
pub const USB_HID_POLL_MS: u8 = 10;

// Event loop

/// Capacity of the pending-event queue.
pub const EVENT_QUEUE_DEPTH: usize = 32;

/// Capacity of the outgoing keyboard report queue.
pub const REPORT_QUEUE_DEPTH: usize = 8;
