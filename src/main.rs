//! duokvm firmware entry point (RP2040).
//!
//! Wires the report pipeline to the hardware: the USB device stack toward
//! the local host, the UART link toward the sibling board, the per-tick
//! queue drain and the persisted configuration. The USB *host* port stack
//! (peripheral side, PIO-based) is a separate component; it ingests raw
//! HID reports through [`on_mouse_report`].

#![no_std]
#![no_main]

use core::cell::RefCell;

use defmt::info;
use defmt_rtt as _;
use panic_probe as _;

use embassy_executor::Spawner;
use embassy_futures::select::{select, Either};
use embassy_rp::bind_interrupts;
use embassy_rp::flash::{Async as FlashAsync, Flash};
use embassy_rp::peripherals::{FLASH, UART0, USB};
use embassy_rp::uart::{self, Uart};
use embassy_rp::usb::Driver;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_time::{Duration, Instant, Ticker};
use embassy_usb::UsbDevice;

use duokvm::hal::Clock;
use duokvm::hid::HidInterface;
use duokvm::relay::{relay_receive_task, UartPeerLink};
use duokvm::usb::{self as usb_dev, UsbHidHost};
use duokvm::{config, pipeline, storage, BoardRole, DeviceState};

bind_interrupts!(struct Irqs {
    UART0_IRQ => uart::InterruptHandler<UART0>;
});

/// Which output this build drives. The B-side image flips this constant;
/// everything else is identical between the two boards.
const BOARD_ROLE: BoardRole = BoardRole::OutputA;

/// External flash size of the Pico (2 MB).
const FLASH_SIZE: usize = 2 * 1024 * 1024;

static DEVICE_STATE: DeviceState = DeviceState::new(BOARD_ROLE);

/// Transmit half of the inter-board link, shared with the ingestion path.
static RELAY_TX: Mutex<CriticalSectionRawMutex, RefCell<Option<UartPeerLink>>> =
    Mutex::new(RefCell::new(None));

struct UptimeClock;

impl Clock for UptimeClock {
    fn now_us(&self) -> u64 {
        Instant::now().as_micros()
    }
}

/// Ingestion entry point for the USB host-port driver: called once per
/// received HID mouse report, from the report-received callback path.
pub fn on_mouse_report(raw: &[u8], iface: &HidInterface) {
    RELAY_TX.lock(|link| {
        if let Some(link) = link.borrow_mut().as_mut() {
            pipeline::process_report(raw, &DEVICE_STATE, iface, &UptimeClock, link);
        }
    });
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_rp::init(Default::default());
    info!("duokvm starting, board role {:?}", BOARD_ROLE);

    // Persisted configuration; falls back to compiled-in defaults when the
    // stored record is absent or invalid.
    let mut flash = Flash::<FLASH, FlashAsync, FLASH_SIZE>::new(p.FLASH, p.DMA_CH0);
    let device_config = storage::load_config(&mut flash).await;
    info!(
        "Config: hotkey 0x{:02x}, force mouse boot mode {}",
        device_config.hotkey_toggle, device_config.force_mouse_boot_mode
    );

    // Inter-board UART link.
    let mut uart_config = uart::Config::default();
    uart_config.baudrate = config::RELAY_BAUD_RATE;
    let uart = Uart::new(
        p.UART0, p.PIN_0, p.PIN_1, Irqs, p.DMA_CH1, p.DMA_CH2, uart_config,
    );
    let (uart_tx, uart_rx) = uart.split();
    RELAY_TX.lock(|link| link.borrow_mut().replace(UartPeerLink::new(uart_tx)));

    // USB device stack toward the local host.
    let usb = usb_dev::init(p.USB, &DEVICE_STATE);

    spawner.must_spawn(usb_device_task(usb.device));
    spawner.must_spawn(mouse_drain_task(usb.host));
    spawner.must_spawn(relay_rx_task(uart_rx, &DEVICE_STATE));
}

/// USB enumeration, suspend/resume and remote wakeup servicing.
#[embassy_executor::task]
async fn usb_device_task(mut device: UsbDevice<'static, Driver<'static, USB>>) -> ! {
    loop {
        device.run_until_suspend().await;
        match select(device.wait_resume(), usb_dev::hid_device::wait_remote_wakeup()).await {
            Either::First(()) => {}
            Either::Second(()) => {
                let _ = device.remote_wakeup().await;
            }
        }
    }
}

/// Cooperative drain tick. 1 ms bounds the added input latency; the drain
/// itself never blocks.
#[embassy_executor::task]
async fn mouse_drain_task(mut host: UsbHidHost) -> ! {
    let mut ticker = Ticker::every(Duration::from_millis(1));
    loop {
        pipeline::process_queue_task(&DEVICE_STATE, &mut host);
        ticker.next().await;
    }
}

#[embassy_executor::task]
async fn relay_rx_task(
    rx: uart::UartRx<'static, uart::Async>,
    state: &'static DeviceState,
) -> ! {
    relay_receive_task(rx, state).await
}
