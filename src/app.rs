//! Main loop: drain pending events, flush logs, go idle.

use crate::hid::{self, KeyboardClass};
use crate::keymap;
use crate::queue::{Event, EventQueue};
use crate::ui::Indicators;
use crate::usb::{ConnectionManager, ConnectionState, UsbStack};

/// Deferred log backend serviced once per loop pass.
pub trait LogSink {
    /// Push buffered log output to the transport.
    /// Returns `true` if more is pending.
    fn process_pending(&mut self) -> bool;
}

/// Log transports that write synchronously (defmt-rtt) have nothing to do.
impl LogSink for () {
    fn process_pending(&mut self) -> bool {
        false
    }
}

/// All state owned by the main loop.
///
/// Interrupt-side code never touches this; it only pushes into the
/// [`EventQueue`].
pub struct Firmware<U, K, I> {
    connection: ConnectionManager,
    usb: U,
    keyboard: K,
    indicators: I,
}

impl<U, K, I> Firmware<U, K, I>
where
    U: UsbStack,
    K: KeyboardClass,
    I: Indicators,
{
    pub fn new(usb: U, keyboard: K, indicators: I) -> Self {
        Self {
            connection: ConnectionManager::new(),
            usb,
            keyboard,
            indicators,
        }
    }

    /// Start the USB stack without VBUS detection.
    pub fn start_without_power_detection(&mut self) {
        self.connection
            .start_without_power_detection(&mut self.usb, &mut self.indicators);
    }

    /// Route one event to its handler.
    pub fn dispatch(&mut self, event: Event) {
        match event {
            Event::Usb(e) => {
                self.connection
                    .handle(e, &mut self.usb, &self.keyboard, &mut self.indicators)
            }
            Event::Hid(e) => hid::handle_event(e, &mut self.keyboard, &mut self.indicators),
            Event::Button(e) => keymap::dispatch(e, &mut self.keyboard),
        }
    }

    /// One loop pass: handle every queued event in arrival order, then
    /// service the log sink.  Returns the number of events handled.
    pub fn run_pass<L: LogSink + ?Sized>(&mut self, queue: &EventQueue, log: &mut L) -> usize {
        let mut handled = 0;
        while let Some(event) = queue.pop() {
            self.dispatch(event);
            handled += 1;
        }
        let _ = log.process_pending();
        handled
    }

    /// Run forever.  Sleeps in `queue.wait()` between passes; the executor
    /// puts the core into WFE while no task is ready.
    pub async fn run<L: LogSink>(&mut self, queue: &EventQueue, log: &mut L) -> ! {
        loop {
            self.run_pass(queue, log);
            queue.wait().await;
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.connection.state()
    }

    pub fn usb(&self) -> &U {
        &self.usb
    }

    pub fn keyboard(&self) -> &K {
        &self.keyboard
    }

    pub fn indicators(&self) -> &I {
        &self.indicators
    }

    /// Mutable access to the keyboard class (host LED updates in tests).
    pub fn keyboard_mut(&mut self) -> &mut K {
        &mut self.keyboard
    }
}
