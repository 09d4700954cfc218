//! USB device subsystem.
//!
//! - [`lifecycle`] owns the connection state and reacts to power and bus
//!   events coming from the USB stack.
//! - `hid_device` (embedded only) builds the embassy-usb device, turns its
//!   callbacks into queued events and implements [`UsbStack`] and
//!   [`KeyboardClass`](crate::hid::KeyboardClass) on top of it.

pub mod lifecycle;

#[cfg(feature = "embedded")]
pub mod hid_device;

#[cfg(test)]
mod tests;

pub use lifecycle::{ConnectionManager, ConnectionState};

/// Control surface of the USB peripheral driver and stack.
pub trait UsbStack {
    /// Whether the USB peripheral is powered up.
    fn is_enabled(&self) -> bool;

    /// Power up the USB peripheral.
    fn enable(&mut self);

    /// Power down the USB peripheral.
    fn disable(&mut self);

    /// Attach to the bus and start servicing the host.
    fn start(&mut self);

    /// Detach from the bus.  The stack follows up with
    /// [`UsbEvent::Stopped`] once it has wound down.
    fn stop(&mut self);

    /// Allow the peripheral to enter low-power suspend.
    /// Returns `false` if the stack refused.
    fn suspend_request(&mut self) -> bool;
}

/// Power and bus events raised by the USB stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UsbEvent {
    /// Start-of-frame tick.
    StartOfFrame,
    /// The host suspended the bus.
    Suspend,
    /// The host resumed the bus.
    Resume,
    /// The stack finished starting.
    Started,
    /// The stack finished stopping.
    Stopped,
    /// VBUS appeared.
    PowerDetected,
    /// VBUS went away.
    PowerRemoved,
    /// VBUS is stable and the peripheral may start.
    PowerReady,
}
