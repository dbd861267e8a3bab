//! Board-to-board link: UART framing for relayed reports.
//!
//! Frame layout: `[kind, len, payload...]`. The full packet catalogue
//! (switch commands, config sync, ...) lives with the switching logic;
//! this module only ships frames and re-injects the sibling board's mouse
//! samples into the local delivery queue.

use defmt::{debug, warn};
use embassy_rp::uart::{Async, UartRx, UartTx};

use crate::hal::{MessageKind, PeerLink};
use crate::hid::mouse::MouseSample;
use crate::pipeline::queue_report;
use crate::state::DeviceState;

/// Largest payload a frame may carry.
const MAX_PAYLOAD: usize = 32;

/// Transmit half of the inter-board link.
pub struct UartPeerLink {
    tx: UartTx<'static, Async>,
}

impl UartPeerLink {
    pub fn new(tx: UartTx<'static, Async>) -> Self {
        Self { tx }
    }
}

impl PeerLink for UartPeerLink {
    /// Fire-and-forget: at 3.7 Mbaud a mouse frame leaves the wire in
    /// well under the report interval, so a blocking write is acceptable
    /// in the ingestion path.
    fn send(&mut self, kind: MessageKind, payload: &[u8]) {
        if payload.len() > MAX_PAYLOAD {
            warn!("Relay frame too large: {} bytes", payload.len());
            return;
        }
        let header = [kind as u8, payload.len() as u8];
        let _ = self.tx.blocking_write(&header);
        let _ = self.tx.blocking_write(payload);
    }
}

/// Receive task: parse frames from the sibling board and hand mouse
/// samples to the local delivery queue.
pub async fn relay_receive_task(mut rx: UartRx<'static, Async>, state: &'static DeviceState) -> ! {
    let mut header = [0u8; 2];
    let mut payload = [0u8; MAX_PAYLOAD];

    loop {
        if rx.read(&mut header).await.is_err() {
            continue;
        }

        let len = header[1] as usize;
        if len > MAX_PAYLOAD {
            // Desynchronized; drop the byte stream until framing recovers.
            warn!("Relay frame length {} out of range", len);
            continue;
        }
        if len > 0 && rx.read(&mut payload[..len]).await.is_err() {
            continue;
        }

        match MessageKind::from_wire(header[0]) {
            Some(MessageKind::Mouse) => {
                if let Some(sample) = MouseSample::from_wire_bytes(&payload[..len]) {
                    // Dropped samples (disconnected host, full queue) are
                    // part of the delivery contract, nothing to handle.
                    let _ = queue_report(sample, state);
                }
            }
            Some(other) => debug!("Relay frame kind {:?} handled elsewhere", other),
            None => warn!("Unknown relay frame kind {}", header[0]),
        }
    }
}
