//! GPIO button input with async debouncing.
//!
//! Four physical buttons (active-low with internal pull-up).  Each is
//! handled by an async task that waits for the opposite level, lets the
//! contacts settle for [`BUTTON_DETECTION_MS`] and queues a
//! [`ButtonEvent`] if the level really changed.  The task never blocks on the queue.

use embassy_nrf::gpio::{AnyPin, Input, Pull};
use embassy_time::{Duration, Timer};

use crate::config::BUTTON_DETECTION_MS;
use crate::keymap::ButtonEvent;
use crate::queue::EventQueue;

/// Run a single button loop for the button on `pin`.
///
/// `id` is the identity reported in every event (the pin number).
pub async fn button_task(pin: AnyPin, id: u8, events: &'static EventQueue) -> ! {
    let mut btn = Input::new(pin, Pull::Up);
    let mut pressed = btn.is_low();

    loop {
        // Wait for the level opposite to the one last reported, so a flip
        // between the debounce read and here is still seen.
        if pressed {
            btn.wait_for_high().await;
        } else {
            btn.wait_for_low().await;
        }

        // Debounce: wait and re-check.
        Timer::after(Duration::from_millis(BUTTON_DETECTION_MS)).await;

        let now = btn.is_low();
        if now == pressed {
            continue;
        }
        pressed = now;

        let event = if now {
            ButtonEvent::push(id)
        } else {
            ButtonEvent::release(id)
        };
        let _ = events.push(event);
    }
}
