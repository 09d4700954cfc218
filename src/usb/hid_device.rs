//! USB HID keyboard device on the nRF52840 USBD peripheral.
//!
//! Initialises the Embassy USB stack with one boot-keyboard interface and
//! adapts it to the core:
//!
//! - [`UsbLifecycleHandler`] turns bus callbacks (enable, suspend/resume,
//!   SET_PROTOCOL) into queued events.
//! - [`EventVbus`] wraps VBUS detection and queues the power events.
//!   Without power detection a software detector reports the bus as
//!   powered from the start.
//! - [`LedRequestHandler`] latches the host's LED output report.
//! - [`UsbControl`] / [`UsbKeyboard`] implement the core traits on top of
//!   the device task and the report writer task.

use core::cell::Cell;
use core::sync::atomic::{AtomicU8, Ordering};

use embassy_futures::select::{select, Either};
use embassy_nrf::usb::vbus_detect::{HardwareVbusDetect, SoftwareVbusDetect, VbusDetect};
use embassy_nrf::usb::Driver;
use embassy_nrf::{bind_interrupts, peripherals};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;
use embassy_usb::class::hid::{Config as HidConfig, HidWriter, ReportId, RequestHandler, State};
use embassy_usb::control::{OutResponse, Recipient, Request, RequestType};
use embassy_usb::{Builder, Config, Handler, UsbDevice};
use static_cell::StaticCell;

use crate::config;
use crate::error::Error;
use crate::hid::keyboard::{KeyboardState, KEYBOARD_REPORT_DESCRIPTOR, KEYBOARD_REPORT_SIZE};
use crate::hid::led::{Led, LedState};
use crate::hid::{HidEvent, KeyboardClass};
use crate::queue::EventQueue;
use crate::usb::{UsbEvent, UsbStack};

bind_interrupts!(struct Irqs {
    USBD => embassy_nrf::usb::InterruptHandler<peripherals::USBD>;
    CLOCK_POWER => embassy_nrf::usb::vbus_detect::InterruptHandler;
});

/// HID class request: SET_PROTOCOL.
const HID_REQ_SET_PROTOCOL: u8 = 0x0B;

pub type UsbDriver = Driver<'static, peripherals::USBD, EventVbus<PowerSense>>;

type Report = [u8; KEYBOARD_REPORT_SIZE];

static KB_STATE: StaticCell<State> = StaticCell::new();
static USB_CONFIG_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_BOS_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_MSOS_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_CTRL_BUF: StaticCell<[u8; 128]> = StaticCell::new();
static LIFECYCLE_HANDLER: StaticCell<UsbLifecycleHandler> = StaticCell::new();
static LED_HANDLER: StaticCell<LedRequestHandler> = StaticCell::new();
static SOFTWARE_VBUS: StaticCell<SoftwareVbusDetect> = StaticCell::new();

/// LED byte from the last host output report.
static HOST_LEDS: AtomicU8 = AtomicU8::new(0);

/// Input reports waiting for the IN endpoint.
static REPORTS: Channel<CriticalSectionRawMutex, Report, { config::REPORT_QUEUE_DEPTH }> =
    Channel::new();

/// Stop requests for the device task.
static STOP: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// Bus-level callbacks from embassy-usb, forwarded as events.
pub struct UsbLifecycleHandler {
    events: &'static EventQueue,
}

impl Handler for UsbLifecycleHandler {
    fn enabled(&mut self, enabled: bool) {
        if enabled {
            let _ = self.events.push(UsbEvent::Started);
        }
    }

    fn suspended(&mut self, suspended: bool) {
        let event = if suspended {
            UsbEvent::Suspend
        } else {
            UsbEvent::Resume
        };
        let _ = self.events.push(event);
    }

    fn control_out(&mut self, req: Request, _data: &[u8]) -> Option<OutResponse> {
        if req.request_type == RequestType::Class
            && req.recipient == Recipient::Interface
            && req.request == HID_REQ_SET_PROTOCOL
        {
            let event = if req.value == 0 {
                HidEvent::SetBootProtocol
            } else {
                HidEvent::SetReportProtocol
            };
            let _ = self.events.push(event);
        }
        // Observe only; the HID class answers the request.
        None
    }
}

/// Where VBUS state comes from.
pub enum PowerSense {
    /// POWER peripheral USB detection.
    Hardware(HardwareVbusDetect),
    /// Fixed "powered and ready", for boards without VBUS sensing.
    Software(&'static SoftwareVbusDetect),
}

impl VbusDetect for PowerSense {
    fn is_usb_detected(&self) -> bool {
        match self {
            PowerSense::Hardware(hw) => hw.is_usb_detected(),
            PowerSense::Software(sw) => sw.is_usb_detected(),
        }
    }

    async fn wait_power_ready(&mut self) -> Result<(), ()> {
        match self {
            PowerSense::Hardware(hw) => hw.wait_power_ready().await,
            PowerSense::Software(sw) => {
                let mut sw: &SoftwareVbusDetect = *sw;
                sw.wait_power_ready().await
            }
        }
    }
}

/// VBUS detection that also reports power transitions.
pub struct EventVbus<V> {
    inner: V,
    detected: Cell<bool>,
    events: &'static EventQueue,
}

impl<V: VbusDetect> EventVbus<V> {
    pub fn new(inner: V, events: &'static EventQueue) -> Self {
        Self {
            inner,
            detected: Cell::new(false),
            events,
        }
    }
}

impl<V: VbusDetect> VbusDetect for EventVbus<V> {
    fn is_usb_detected(&self) -> bool {
        let detected = self.inner.is_usb_detected();
        if detected != self.detected.replace(detected) {
            let event = if detected {
                UsbEvent::PowerDetected
            } else {
                UsbEvent::PowerRemoved
            };
            let _ = self.events.push(event);
        }
        detected
    }

    async fn wait_power_ready(&mut self) -> Result<(), ()> {
        let ready = self.inner.wait_power_ready().await;
        if ready.is_ok() {
            let _ = self.events.push(UsbEvent::PowerReady);
        }
        ready
    }
}

/// SET_REPORT / SET_IDLE handling for the keyboard interface.
pub struct LedRequestHandler {
    events: &'static EventQueue,
}

impl RequestHandler for LedRequestHandler {
    fn set_report(&mut self, _id: ReportId, data: &[u8]) -> OutResponse {
        match LedState::from_output_report(data) {
            Ok(leds) => {
                HOST_LEDS.store(leds.bits(), Ordering::Relaxed);
                let _ = self.events.push(HidEvent::OutReportReady);
                OutResponse::Accepted
            }
            Err(e) => {
                warn!("bad LED report: {}", e);
                OutResponse::Rejected
            }
        }
    }

    fn set_idle_ms(&mut self, _id: Option<ReportId>, duration_ms: u32) {
        let _ = self.events.push(HidEvent::SetIdle(duration_ms));
    }
}

/// Build result containing the USB device runner and the keyboard writer.
pub struct UsbHidDevice {
    pub device: UsbDevice<'static, UsbDriver>,
    pub keyboard_writer: HidWriter<'static, UsbDriver, 8>,
}

/// Initialise the USB stack and create the HID keyboard device.
///
/// Must be called exactly once.  All static buffers are consumed here.
pub fn init(usbd: peripherals::USBD, events: &'static EventQueue) -> Result<UsbHidDevice, Error> {
    let sense = if config::USBD_POWER_DETECTION {
        PowerSense::Hardware(HardwareVbusDetect::new(Irqs))
    } else {
        let sw = SOFTWARE_VBUS
            .try_init(SoftwareVbusDetect::new(true, true))
            .ok_or(Error::UsbInit)?;
        PowerSense::Software(sw)
    };
    let driver = Driver::new(usbd, Irqs, EventVbus::new(sense, events));

    let mut usb_config = Config::new(config::USB_VID, config::USB_PID);
    usb_config.manufacturer = Some(config::USB_MANUFACTURER);
    usb_config.product = Some(config::USB_PRODUCT);
    usb_config.serial_number = Some(config::USB_SERIAL_NUMBER);
    usb_config.max_power = config::USB_MAX_POWER_MA;
    usb_config.max_packet_size_0 = 64;

    let config_desc = USB_CONFIG_DESC
        .try_init([0u8; 256])
        .ok_or(Error::UsbInit)?;
    let bos_desc = USB_BOS_DESC.try_init([0u8; 256]).ok_or(Error::UsbInit)?;
    let msos_desc = USB_MSOS_DESC.try_init([0u8; 256]).ok_or(Error::UsbInit)?;
    let ctrl_buf = USB_CTRL_BUF.try_init([0u8; 128]).ok_or(Error::UsbInit)?;

    let mut builder = Builder::new(
        driver,
        usb_config,
        config_desc,
        bos_desc,
        msos_desc,
        ctrl_buf,
    );

    // Registered ahead of the HID class so SET_PROTOCOL is seen first.
    let lifecycle = LIFECYCLE_HANDLER
        .try_init(UsbLifecycleHandler { events })
        .ok_or(Error::UsbInit)?;
    builder.handler(lifecycle);

    let kb_state = KB_STATE.try_init(State::new()).ok_or(Error::UsbInit)?;
    let led_handler = LED_HANDLER
        .try_init(LedRequestHandler { events })
        .ok_or(Error::UsbInit)?;
    let kb_config = HidConfig {
        report_descriptor: KEYBOARD_REPORT_DESCRIPTOR,
        request_handler: Some(led_handler),
        poll_ms: config::USB_HID_POLL_MS,
        max_packet_size: 8,
    };
    let keyboard_writer = HidWriter::new(&mut builder, kb_state, kb_config);

    let device = builder.build();

    info!("USB HID keyboard initialised");

    Ok(UsbHidDevice {
        device,
        keyboard_writer,
    })
}

/// Run the USB device stack - must be spawned as a dedicated Embassy task.
///
/// embassy-usb attaches by itself once VBUS is ready and detaches when it
/// goes away.  A [`UsbStack::stop`] request disables the device and
/// reports [`UsbEvent::Stopped`].
pub async fn run_usb_device(mut device: UsbDevice<'static, UsbDriver>, events: &'static EventQueue) -> ! {
    info!("USB device task started");

    loop {
        let suspended = select(device.run_until_suspend(), STOP.wait()).await;
        let stop = match suspended {
            Either::First(()) => {
                let resumed = select(device.wait_resume(), STOP.wait()).await;
                matches!(resumed, Either::Second(()))
            }
            Either::Second(()) => true,
        };

        if stop {
            device.disable().await;
            let _ = events.push(UsbEvent::Stopped);
        }
    }
}

/// Keyboard report writer - drains queued reports into the IN endpoint.
pub async fn hid_writer_task(
    mut keyboard: HidWriter<'static, UsbDriver, 8>,
    events: &'static EventQueue,
) -> ! {
    info!("HID writer task started");

    loop {
        let report = REPORTS.receive().await;
        match keyboard.write(&report).await {
            Ok(()) => {
                let _ = events.push(HidEvent::InReportDone);
            }
            Err(e) => warn!("USB keyboard write failed: {}", e),
        }
    }
}

/// [`UsbStack`] on top of the device task.
#[derive(Default)]
pub struct UsbControl {
    enabled: bool,
}

impl UsbStack for UsbControl {
    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn enable(&mut self) {
        // USBD is powered up by the driver when VBUS is detected.
        self.enabled = true;
    }

    fn disable(&mut self) {
        self.enabled = false;
    }

    fn start(&mut self) {
        debug!("USB start: device task attaches on power ready");
    }

    fn stop(&mut self) {
        STOP.signal(());
    }

    fn suspend_request(&mut self) -> bool {
        // The driver drops USBD into low-power mode on bus suspend.
        true
    }
}

/// [`KeyboardClass`] backed by the report queue and the latched LED byte.
#[derive(Default)]
pub struct UsbKeyboard {
    state: KeyboardState,
}

impl KeyboardClass for UsbKeyboard {
    fn key_control(&mut self, usage: u8, pressed: bool) -> Result<(), Error> {
        if let Some(report) = self.state.key_control(usage, pressed)? {
            REPORTS
                .try_send(report.to_bytes())
                .map_err(|_| Error::ReportQueueFull)?;
        }
        Ok(())
    }

    fn led_state(&self, led: Led) -> bool {
        LedState::from_bits(HOST_LEDS.load(Ordering::Relaxed)).is_on(led)
    }

    fn clear_buffer(&mut self) -> Result<(), Error> {
        self.state.clear();
        REPORTS.clear();
        Ok(())
    }
}
