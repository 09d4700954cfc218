//! Pending-event queue between interrupt-side producers and the main loop.
//!
//! Producers (USB callbacks, VBUS detection, button tasks, the HID writer)
//! only ever `push`.  The main loop is the single consumer.  Pushing also
//! raises a wake signal so the idle loop notices new work.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;

use crate::config::EVENT_QUEUE_DEPTH;
use crate::error::Error;
use crate::hid::HidEvent;
use crate::keymap::ButtonEvent;
use crate::usb::UsbEvent;

/// Everything the main loop reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    Usb(UsbEvent),
    Hid(HidEvent),
    Button(ButtonEvent),
}

impl From<UsbEvent> for Event {
    fn from(e: UsbEvent) -> Self {
        Event::Usb(e)
    }
}

impl From<HidEvent> for Event {
    fn from(e: HidEvent) -> Self {
        Event::Hid(e)
    }
}

impl From<ButtonEvent> for Event {
    fn from(e: ButtonEvent) -> Self {
        Event::Button(e)
    }
}

/// Bounded FIFO of pending events.
pub struct EventQueue {
    events: Channel<CriticalSectionRawMutex, Event, EVENT_QUEUE_DEPTH>,
    wake: Signal<CriticalSectionRawMutex, ()>,
}

impl EventQueue {
    pub const fn new() -> Self {
        Self {
            events: Channel::new(),
            wake: Signal::new(),
        }
    }

    /// Enqueue an event without blocking.
    ///
    /// When the queue is full the new event is dropped; queued events
    /// keep their order.
    pub fn push(&self, event: impl Into<Event>) -> Result<(), Error> {
        let event = event.into();
        let result = self.events.try_send(event).map_err(|_| Error::QueueFull);
        if result.is_err() {
            warn!("event queue full, dropping {}", event);
        }
        self.wake.signal(());
        result
    }

    /// Take the oldest pending event.
    pub fn pop(&self) -> Option<Event> {
        self.events.try_receive().ok()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Wait until something was pushed since the last wait.
    ///
    /// Returns immediately if a push happened while the loop was busy.
    pub async fn wait(&self) {
        self.wake.wait().await
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}
