//! usbkbd firmware entry point (nRF52840).
//!
//! Brings up LEDs, buttons and the USB keyboard, then hands control to the
//! event loop for good.  Any initialisation failure halts before the USB
//! stack is started.

#![no_std]
#![no_main]

use defmt::info;
use defmt_rtt as _;
use panic_probe as _;

use embassy_executor::Spawner;
use embassy_nrf::config::{Config, HfclkSource};
use embassy_nrf::gpio::{AnyPin, Pin};
use embassy_nrf::Peripherals;
use embassy_usb::class::hid::HidWriter;
use embassy_usb::UsbDevice;

use usbkbd::config;
use usbkbd::ui::buttons;
use usbkbd::ui::leds::BoardLeds;
use usbkbd::usb::hid_device::{self, UsbControl, UsbDriver, UsbKeyboard};
use usbkbd::{Error, EventQueue, Firmware};

static EVENTS: EventQueue = EventQueue::new();

type Keyboard = Firmware<UsbControl, UsbKeyboard, BoardLeds>;

#[embassy_executor::task]
async fn usb_task(device: UsbDevice<'static, UsbDriver>) -> ! {
    hid_device::run_usb_device(device, &EVENTS).await
}

#[embassy_executor::task]
async fn hid_writer(writer: HidWriter<'static, UsbDriver, 8>) -> ! {
    hid_device::hid_writer_task(writer, &EVENTS).await
}

#[embassy_executor::task(pool_size = 4)]
async fn button(pin: AnyPin, id: u8) -> ! {
    buttons::button_task(pin, id, &EVENTS).await
}

fn init(spawner: &Spawner, p: Peripherals) -> Result<Keyboard, Error> {
    let leds = BoardLeds::new([
        p.P0_13.degrade(),
        p.P0_14.degrade(),
        p.P0_15.degrade(),
        p.P0_16.degrade(),
    ]);

    let buttons = [
        (p.P0_11.degrade(), config::BUTTON1_PIN),
        (p.P0_12.degrade(), config::BUTTON2_PIN),
        (p.P0_24.degrade(), config::BUTTON3_PIN),
        (p.P0_25.degrade(), config::BUTTON4_PIN),
    ];
    for (pin, id) in buttons {
        spawner.spawn(button(pin, id)).map_err(|_| Error::Spawn)?;
    }

    let usb = hid_device::init(p.USBD, &EVENTS)?;
    spawner
        .spawn(usb_task(usb.device))
        .map_err(|_| Error::Spawn)?;
    spawner
        .spawn(hid_writer(usb.keyboard_writer))
        .map_err(|_| Error::Spawn)?;

    Ok(Firmware::new(
        UsbControl::default(),
        UsbKeyboard::default(),
        leds,
    ))
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("usbkbd starting");

    // USBD needs the crystal oscillator.
    let mut nrf_config = Config::default();
    nrf_config.hfclk_source = HfclkSource::ExternalXtal;
    let p = embassy_nrf::init(nrf_config);

    let mut keyboard = match init(&spawner, p) {
        Ok(keyboard) => keyboard,
        Err(e) => defmt::panic!("init failed: {}", e),
    };

    if !config::USBD_POWER_DETECTION {
        keyboard.start_without_power_detection();
    }

    info!("usbkbd ready");
    keyboard.run(&EVENTS, &mut ()).await
}
