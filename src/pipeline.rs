//! Report pipeline entry points: ingestion, routing and queue draining.
//!
//! `process_report` runs synchronously in the USB report-received callback
//! path and must neither block nor allocate. `process_queue_task` runs once
//! per cooperative scheduler tick; "not ready yet, retry next tick" stands
//! in for blocking throughout.

use crate::hal::{Clock, HidHost, MessageKind, PeerLink};
use crate::hid::descriptor::HidInterface;
use crate::hid::extractor;
use crate::hid::mouse::{MouseSample, MOUSE_REPORT_SIZE};
use crate::state::DeviceState;

/// Entry point called once per received HID mouse report.
pub fn process_report(
    raw: &[u8],
    state: &DeviceState,
    iface: &HidInterface,
    clock: &impl Clock,
    relay: &mut impl PeerLink,
) {
    let sample = extractor::extract(raw, state, iface);
    route_report(sample, state, clock, relay);
}

/// Hand one sample to whichever output currently owns the peripherals.
///
/// Active board: local delivery via the queue, stamping this board's
/// activity slot only when the enqueue actually happened. Inactive board:
/// serialize and relay to the sibling; no local side effects.
pub fn route_report(
    sample: MouseSample,
    state: &DeviceState,
    clock: &impl Clock,
    relay: &mut impl PeerLink,
) {
    if state.is_active_output() {
        if queue_report(sample, state) {
            state.touch_activity(state.board_role(), clock.now_us());
        }
    } else {
        let mut buf = [0u8; MOUSE_REPORT_SIZE];
        let len = sample.serialize(&mut buf);
        relay.send(MessageKind::Mouse, &buf[..len]);
    }
}

/// Enqueue a sample for local USB delivery. Returns `true` iff the sample
/// was accepted.
///
/// Disconnected host: silent no-op - queuing would only build a stale
/// backlog the host will never see. Full queue: the sample is dropped,
/// never the caller blocked. Also the entry point for the relay-receive
/// path re-injecting the sibling board's samples.
pub fn queue_report(sample: MouseSample, state: &DeviceState) -> bool {
    if !state.host_connected() {
        return false;
    }
    state.mouse_queue.try_push(sample).is_ok()
}

/// Drain task body, invoked on every scheduler tick.
///
/// Peek-then-conditionally-pop: the head element leaves the queue only
/// after the USB stack accepted it, so a failed or not-ready transmit
/// retries the same element on the next tick and nothing is silently lost.
pub fn process_queue_task(state: &DeviceState, usb: &mut impl HidHost) {
    if !state.host_connected() {
        return;
    }

    let Some(sample) = state.mouse_queue.peek() else {
        return;
    };

    // A suspended host needs a remote wakeup before it will poll us again.
    if usb.suspended() {
        usb.request_wakeup();
    }

    if !usb.transmit_ready() {
        return;
    }

    if usb.transmit(&sample) {
        state.mouse_queue.pop();
    }
}
