//! Boundary traits toward the collaborators the pipeline depends on:
//! the monotonic clock, the inter-board link and the USB HID host link.
//!
//! Hardware implementations live behind the `embedded` feature; the host
//! test suite substitutes mocks.

use crate::hid::mouse::MouseSample;

/// Monotonic microsecond clock.
pub trait Clock {
    fn now_us(&self) -> u64;
}

/// Wire tag of an inter-board message. The full packet catalogue belongs
/// to the link layer; the pipeline only ever emits `Mouse`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum MessageKind {
    Mouse = 1,
    Keyboard = 2,
}

impl MessageKind {
    pub fn from_wire(tag: u8) -> Option<Self> {
        match tag {
            1 => Some(MessageKind::Mouse),
            2 => Some(MessageKind::Keyboard),
            _ => None,
        }
    }
}

/// Fire-and-forget transmission to the sibling board.
pub trait PeerLink {
    fn send(&mut self, kind: MessageKind, payload: &[u8]);
}

/// USB HID primitives toward the locally attached host.
///
/// `transmit_ready`/`transmit` must never block: `transmit` either accepts
/// the sample and returns `true`, or returns `false` and the caller retries
/// on a later tick.
pub trait HidHost {
    /// Whether the host has put the bus into a suspended power state.
    fn suspended(&self) -> bool;

    /// Request a remote wakeup. Duplicate requests while suspended must
    /// be harmless.
    fn request_wakeup(&mut self);

    /// Whether the interrupt-IN endpoint can accept a new report.
    fn transmit_ready(&mut self) -> bool;

    /// Hand one sample to the endpoint. Returns `true` on acceptance.
    fn transmit(&mut self, sample: &MouseSample) -> bool;
}
