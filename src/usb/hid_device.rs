//! USB HID mouse device toward the locally attached host.
//!
//! Initialises the Embassy USB stack on the RP2040 USB peripheral,
//! exposes the mouse HID endpoint and adapts it to the non-blocking
//! `HidHost` contract the drain task polls every tick.

use core::sync::atomic::{AtomicBool, Ordering};

use defmt::info;
use embassy_futures::poll_once;
use embassy_rp::bind_interrupts;
use embassy_rp::peripherals::USB;
use embassy_rp::usb::Driver;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_usb::class::hid::{Config as HidConfig, HidWriter, State};
use embassy_usb::{Builder, Config, UsbDevice};
use static_cell::StaticCell;

use crate::config;
use crate::hal::HidHost;
use crate::hid::mouse::{MouseSample, MOUSE_REPORT_DESCRIPTOR};
use crate::state::DeviceState;

bind_interrupts!(pub struct Irqs {
    USBCTRL_IRQ => embassy_rp::usb::InterruptHandler<USB>;
});

/// USB-side mouse report size: buttons + 16-bit X/Y + wheel + pan.
const USB_MOUSE_REPORT_LEN: usize = 7;

static MOUSE_STATE: StaticCell<State> = StaticCell::new();
static USB_CONFIG_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_BOS_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_MSOS_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_CTRL_BUF: StaticCell<[u8; 128]> = StaticCell::new();
static USB_BUS_HANDLER: StaticCell<UsbBusHandler> = StaticCell::new();

/// Bus suspend state, mirrored for the drain task's per-tick poll.
static SUSPENDED: AtomicBool = AtomicBool::new(false);

/// One-shot trigger the device task turns into a remote wakeup.
/// Signal semantics collapse duplicate requests, so re-arming every tick
/// while suspended is harmless.
static REMOTE_WAKEUP: Signal<CriticalSectionRawMutex, ()> = Signal::new();

struct UsbBusHandler {
    state: &'static DeviceState,
}

impl embassy_usb::Handler for UsbBusHandler {
    fn configured(&mut self, configured: bool) {
        self.state.set_host_connected(configured);
    }

    fn suspended(&mut self, suspended: bool) {
        SUSPENDED.store(suspended, Ordering::Relaxed);
    }
}

/// Consume the remote wakeup trigger; used by the device task.
pub fn wait_remote_wakeup() -> impl core::future::Future<Output = ()> {
    REMOTE_WAKEUP.wait()
}

/// Build result: the USB device runner plus the mouse endpoint adapter.
pub struct UsbMouseDevice {
    pub device: UsbDevice<'static, Driver<'static, USB>>,
    pub host: UsbHidHost,
}

/// Initialise the USB stack and create the HID mouse device.
///
/// Must be called exactly once. All static buffers are consumed here.
pub fn init(usb: USB, state: &'static DeviceState) -> UsbMouseDevice {
    let driver = Driver::new(usb, Irqs);

    let mut usb_config = Config::new(config::USB_VID, config::USB_PID);
    usb_config.manufacturer = Some(config::USB_MANUFACTURER);
    usb_config.product = Some(config::USB_PRODUCT);
    usb_config.serial_number = Some(config::USB_SERIAL_NUMBER);
    usb_config.max_power = 100; // mA
    usb_config.max_packet_size_0 = 64;
    usb_config.supports_remote_wakeup = true;

    let config_desc = USB_CONFIG_DESC.init([0u8; 256]);
    let bos_desc = USB_BOS_DESC.init([0u8; 256]);
    let msos_desc = USB_MSOS_DESC.init([0u8; 256]);
    let ctrl_buf = USB_CTRL_BUF.init([0u8; 128]);

    let mut builder = Builder::new(
        driver,
        usb_config,
        config_desc,
        bos_desc,
        msos_desc,
        ctrl_buf,
    );

    builder.handler(USB_BUS_HANDLER.init(UsbBusHandler { state }));

    let mouse_state = MOUSE_STATE.init(State::new());
    let mouse_config = HidConfig {
        report_descriptor: MOUSE_REPORT_DESCRIPTOR,
        request_handler: None,
        poll_ms: config::USB_HID_POLL_MS,
        max_packet_size: 8,
    };
    let writer = HidWriter::new(&mut builder, mouse_state, mouse_config);

    let device = builder.build();

    info!("USB HID mouse device initialised");

    UsbMouseDevice {
        device,
        host: UsbHidHost { writer },
    }
}

/// Adapter from the async `HidWriter` to the tick-polled `HidHost`
/// contract. `poll_once` makes every operation complete-or-no-progress:
/// transmit is only attempted after the endpoint reported ready, so the
/// write future resolves on its first poll.
pub struct UsbHidHost {
    writer: HidWriter<'static, Driver<'static, USB>, USB_MOUSE_REPORT_LEN>,
}

impl HidHost for UsbHidHost {
    fn suspended(&self) -> bool {
        SUSPENDED.load(Ordering::Relaxed)
    }

    fn request_wakeup(&mut self) {
        REMOTE_WAKEUP.signal(());
    }

    fn transmit_ready(&mut self) -> bool {
        poll_once(self.writer.ready()).is_ready()
    }

    fn transmit(&mut self, sample: &MouseSample) -> bool {
        let mut buf = [0u8; USB_MOUSE_REPORT_LEN];
        buf[0] = sample.buttons;
        buf[1..3].copy_from_slice(&sample.x.to_le_bytes());
        buf[3..5].copy_from_slice(&sample.y.to_le_bytes());
        buf[5] = sample.wheel as u8;
        buf[6] = sample.pan as u8;

        matches!(poll_once(self.writer.write(&buf)), core::task::Poll::Ready(Ok(())))
    }
}
