//! Unified error type for usbkbd.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! Derives `defmt::Format` when the `defmt` feature is enabled.

/// Top-level error type used across the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    // Initialisation (fatal)
    /// An executor task could not be spawned.
    Spawn,

    /// The USB device could not be built.
    UsbInit,

    // USB runtime
    /// USB endpoint write failed.
    Usb,

    // HID
    /// All six key slots of the report are in use.
    Rollover,

    /// The outgoing report queue is full; the report was dropped.
    ReportQueueFull,

    /// A host output report was shorter than the LED byte.
    ShortReport,

    // Event loop
    /// The pending-event queue is full; the event was dropped.
    QueueFull,
}

impl Error {
    /// Whether this error can only occur before the event loop starts.
    /// These halt the firmware; everything else is logged and dropped.
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Error::Spawn | Error::UsbInit)
    }
}
