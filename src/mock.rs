//! Recording fakes for the collaborator traits, shared by unit tests.

use crate::error::Error;
use crate::hid::led::{Led, LedState};
use crate::hid::KeyboardClass;
use crate::ui::{Indicator, Indicators};
use crate::usb::UsbStack;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UsbCall {
    Enable,
    Disable,
    Start,
    Stop,
    SuspendRequest,
}

#[derive(Default)]
pub struct MockUsb {
    pub enabled: bool,
    pub calls: Vec<UsbCall>,
}

impl UsbStack for MockUsb {
    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn enable(&mut self) {
        self.enabled = true;
        self.calls.push(UsbCall::Enable);
    }

    fn disable(&mut self) {
        self.enabled = false;
        self.calls.push(UsbCall::Disable);
    }

    fn start(&mut self) {
        self.calls.push(UsbCall::Start);
    }

    fn stop(&mut self) {
        self.calls.push(UsbCall::Stop);
    }

    fn suspend_request(&mut self) -> bool {
        self.calls.push(UsbCall::SuspendRequest);
        true
    }
}

#[derive(Default)]
pub struct MockKeyboard {
    pub leds: LedState,
    pub keys: Vec<(u8, bool)>,
    pub led_queries: core::cell::Cell<usize>,
    pub clears: usize,
    pub fail_clear: bool,
}

impl MockKeyboard {
    pub fn with_leds(bits: u8) -> Self {
        Self {
            leds: LedState::from_bits(bits),
            ..Default::default()
        }
    }
}

impl KeyboardClass for MockKeyboard {
    fn key_control(&mut self, usage: u8, pressed: bool) -> Result<(), Error> {
        self.keys.push((usage, pressed));
        Ok(())
    }

    fn led_state(&self, led: Led) -> bool {
        self.led_queries.set(self.led_queries.get() + 1);
        self.leds.is_on(led)
    }

    fn clear_buffer(&mut self) -> Result<(), Error> {
        self.clears += 1;
        if self.fail_clear {
            Err(Error::Usb)
        } else {
            Ok(())
        }
    }
}

#[derive(Default)]
pub struct MockIndicators {
    pub on: [bool; 4],
    pub inverts: usize,
}

impl MockIndicators {
    pub fn is_on(&self, indicator: Indicator) -> bool {
        self.on[indicator.index()]
    }

    pub fn all_dark(&self) -> bool {
        self.on.iter().all(|&on| !on)
    }
}

impl Indicators for MockIndicators {
    fn set(&mut self, indicator: Indicator, on: bool) {
        self.on[indicator.index()] = on;
    }

    fn invert(&mut self, indicator: Indicator) {
        self.inverts += 1;
        self.on[indicator.index()] = !self.on[indicator.index()];
    }
}
