//! Unit tests for the USB connection lifecycle.

use super::lifecycle::{ConnectionManager, ConnectionState};
use super::UsbEvent;
use crate::mock::{MockIndicators, MockKeyboard, MockUsb, UsbCall};
use crate::ui::Indicator;

use ConnectionState::*;

const STATES: [ConnectionState; 5] = [Disconnected, PowerDetected, Started, Suspended, Stopped];

const EVENTS: [UsbEvent; 8] = [
    UsbEvent::StartOfFrame,
    UsbEvent::Suspend,
    UsbEvent::Resume,
    UsbEvent::Started,
    UsbEvent::Stopped,
    UsbEvent::PowerDetected,
    UsbEvent::PowerRemoved,
    UsbEvent::PowerReady,
];

/// Expected next state for every (state, event) pair.
fn expected(state: ConnectionState, event: UsbEvent) -> ConnectionState {
    match (state, event) {
        (Started, UsbEvent::Suspend) => Suspended,
        (Suspended, UsbEvent::Resume) => Started,
        (_, UsbEvent::Started) => Started,
        (_, UsbEvent::Stopped) => Disconnected,
        (Disconnected, UsbEvent::PowerDetected) => PowerDetected,
        (PowerDetected, UsbEvent::PowerReady) => Started,
        (s, _) => s,
    }
}

struct Rig {
    manager: ConnectionManager,
    usb: MockUsb,
    keyboard: MockKeyboard,
    indicators: MockIndicators,
}

impl Rig {
    fn new(state: ConnectionState) -> Self {
        Self {
            manager: ConnectionManager::with_state(state),
            usb: MockUsb::default(),
            keyboard: MockKeyboard::default(),
            indicators: MockIndicators::default(),
        }
    }

    fn send(&mut self, event: UsbEvent) {
        self.manager
            .handle(event, &mut self.usb, &self.keyboard, &mut self.indicators);
    }
}

#[test]
fn starts_disconnected() {
    assert_eq!(ConnectionManager::new().state(), Disconnected);
    assert_eq!(ConnectionManager::default().state(), Disconnected);
}

#[test]
fn every_state_event_pair_matches_table() {
    for state in STATES {
        for event in EVENTS {
            let mut rig = Rig::new(state);
            rig.send(event);
            assert_eq!(
                rig.manager.state(),
                expected(state, event),
                "{:?} + {:?}",
                state,
                event
            );
        }
    }
}

#[test]
fn start_of_frame_does_nothing_anywhere() {
    for state in STATES {
        let mut rig = Rig::new(state);
        rig.indicators.on = [true, false, true, false];
        rig.send(UsbEvent::StartOfFrame);
        assert_eq!(rig.manager.state(), state);
        assert!(rig.usb.calls.is_empty());
        assert_eq!(rig.indicators.on, [true, false, true, false]);
    }
}

#[test]
fn ignored_pairs_have_no_side_effects() {
    for state in STATES {
        for event in EVENTS {
            if expected(state, event) != state
                || matches!(event, UsbEvent::Started | UsbEvent::Stopped)
                || (event == UsbEvent::PowerRemoved
                    && matches!(state, PowerDetected | Started | Suspended))
            {
                continue;
            }
            let mut rig = Rig::new(state);
            rig.indicators.on = [true; 4];
            rig.send(event);
            assert!(rig.usb.calls.is_empty(), "{:?} + {:?}", state, event);
            assert_eq!(rig.indicators.on, [true; 4]);
        }
    }
}

#[test]
fn power_detected_enables_disabled_peripheral() {
    let mut rig = Rig::new(Disconnected);
    rig.send(UsbEvent::PowerDetected);
    assert_eq!(rig.usb.calls, vec![UsbCall::Enable]);
    assert!(rig.usb.enabled);
    assert_eq!(rig.manager.state(), PowerDetected);
}

#[test]
fn power_detected_skips_enable_when_already_enabled() {
    let mut rig = Rig::new(Disconnected);
    rig.usb.enabled = true;
    rig.send(UsbEvent::PowerDetected);
    assert!(rig.usb.calls.is_empty());
    assert_eq!(rig.manager.state(), PowerDetected);
}

#[test]
fn power_ready_starts_and_lights_usb_active() {
    let mut rig = Rig::new(PowerDetected);
    rig.send(UsbEvent::PowerReady);
    assert_eq!(rig.usb.calls, vec![UsbCall::Start]);
    assert!(rig.indicators.is_on(Indicator::UsbActive));
    assert_eq!(rig.manager.state(), Started);
}

#[test]
fn power_removed_stops_but_waits_for_stopped() {
    for state in [PowerDetected, Started, Suspended] {
        let mut rig = Rig::new(state);
        rig.send(UsbEvent::PowerRemoved);
        assert_eq!(rig.usb.calls, vec![UsbCall::Stop]);
        assert_eq!(rig.manager.state(), state);

        rig.send(UsbEvent::Stopped);
        assert_eq!(rig.usb.calls, vec![UsbCall::Stop, UsbCall::Disable]);
        assert_eq!(rig.manager.state(), Disconnected);
    }
}

#[test]
fn stopped_disables_and_darkens_from_any_state() {
    for state in STATES {
        let mut rig = Rig::new(state);
        rig.indicators.on = [true; 4];
        rig.send(UsbEvent::Stopped);
        assert_eq!(rig.usb.calls, vec![UsbCall::Disable]);
        assert!(rig.indicators.all_dark());
        assert_eq!(rig.manager.state(), Disconnected);
    }
}

#[test]
fn started_lights_usb_active_from_any_state() {
    for state in STATES {
        let mut rig = Rig::new(state);
        rig.send(UsbEvent::Started);
        assert!(rig.indicators.is_on(Indicator::UsbActive));
        assert!(rig.usb.calls.is_empty());
        assert_eq!(rig.manager.state(), Started);
    }
}

#[test]
fn suspend_requests_low_power_and_darkens() {
    let mut rig = Rig::new(Started);
    rig.indicators.on = [true; 4];
    rig.send(UsbEvent::Suspend);
    assert_eq!(rig.usb.calls, vec![UsbCall::SuspendRequest]);
    assert!(rig.indicators.all_dark());
    assert_eq!(rig.manager.state(), Suspended);
}

#[test]
fn resume_rederives_leds_from_current_host_bits() {
    let mut rig = Rig::new(Started);
    rig.keyboard = MockKeyboard::with_leds(0x02); // Caps
    rig.indicators.on[Indicator::CapsLock.index()] = true;

    rig.send(UsbEvent::Suspend);
    assert!(rig.indicators.all_dark());

    // Host flips to Num Lock only while we sleep.
    rig.keyboard = MockKeyboard::with_leds(0x01);
    rig.send(UsbEvent::Resume);

    assert_eq!(rig.manager.state(), Started);
    assert!(rig.indicators.is_on(Indicator::UsbActive));
    assert!(rig.indicators.is_on(Indicator::NumLock));
    assert!(!rig.indicators.is_on(Indicator::CapsLock));
    assert_eq!(rig.keyboard.led_queries.get(), 2);
}

#[test]
fn full_power_cycle() {
    let mut rig = Rig::new(Disconnected);
    for event in [
        UsbEvent::PowerDetected,
        UsbEvent::PowerReady,
        UsbEvent::Started,
        UsbEvent::Suspend,
        UsbEvent::Resume,
        UsbEvent::PowerRemoved,
        UsbEvent::Stopped,
    ] {
        rig.send(event);
    }
    assert_eq!(
        rig.usb.calls,
        vec![
            UsbCall::Enable,
            UsbCall::Start,
            UsbCall::SuspendRequest,
            UsbCall::Stop,
            UsbCall::Disable,
        ]
    );
    assert_eq!(rig.manager.state(), Disconnected);
    assert!(rig.indicators.all_dark());
}

#[test]
fn start_without_power_detection_goes_straight_to_started() {
    let mut rig = Rig::new(Disconnected);
    rig.manager
        .start_without_power_detection(&mut rig.usb, &mut rig.indicators);
    assert_eq!(rig.usb.calls, vec![UsbCall::Enable, UsbCall::Start]);
    assert!(rig.indicators.is_on(Indicator::UsbActive));
    assert_eq!(rig.manager.state(), Started);
}
