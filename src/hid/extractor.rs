//! Raw HID mouse report → canonical `MouseSample`.
//!
//! Two interpretations exist, chosen once per interface: the fixed
//! boot-protocol layout and the descriptor-driven report protocol. Both
//! share the zoom shift and the button carry-over rule: a report that
//! omits the button field must not release held buttons, so the previous
//! bitmask is reused. Wheel and pan deliberately never carry over - a
//! scroll delta that outlives its report would self-repeat.

use crate::config::MOUSE_ZOOM_SHIFT;
use crate::hid::descriptor::{HidInterface, InterfaceProtocol, MouseFieldMap, ReportField};
use crate::hid::mouse::{MouseMode, MouseSample};
use crate::state::DeviceState;

/// Interpret one raw mouse report according to the interface's negotiated
/// protocol, updating the shared button state as a side effect.
pub fn extract(raw: &[u8], state: &DeviceState, iface: &HidInterface) -> MouseSample {
    let shift = if state.mouse_zoom() {
        MOUSE_ZOOM_SHIFT
    } else {
        0
    };

    match &iface.protocol {
        InterfaceProtocol::Boot => extract_boot(raw, state, shift),
        InterfaceProtocol::Report(map) => {
            extract_report(raw, state, map, iface.uses_report_id, shift)
        }
    }
}

/// Boot protocol: buttons, x, y, wheel, pan as signed bytes at fixed
/// offsets, no report ID prefix. Bytes past the end of a short report
/// read as zero.
fn extract_boot(raw: &[u8], state: &DeviceState, shift: u32) -> MouseSample {
    let byte = |i: usize| raw.get(i).copied().unwrap_or(0);

    let buttons = byte(0);
    state.set_mouse_buttons(buttons);

    MouseSample {
        buttons,
        x: ((byte(1) as i8 as i32) >> shift) as i16,
        y: ((byte(2) as i8 as i32) >> shift) as i16,
        wheel: byte(3) as i8,
        pan: byte(4) as i8,
        mode: MouseMode::Relative,
    }
}

/// Report protocol: each field is located through its descriptor entry.
/// A report-ID mismatch skips the field silently - the sample keeps the
/// field's default and, for buttons, falls back to the carried-over state.
fn extract_report(
    raw: &[u8],
    state: &DeviceState,
    map: &MouseFieldMap,
    uses_report_id: bool,
    shift: u32,
) -> MouseSample {
    let move_x = extract_field(uses_report_id, &map.move_x, raw).unwrap_or(0);
    let move_y = extract_field(uses_report_id, &map.move_y, raw).unwrap_or(0);
    let wheel = extract_field(uses_report_id, &map.wheel, raw).unwrap_or(0);
    let pan = extract_field(uses_report_id, &map.pan, raw).unwrap_or(0);

    let buttons = match extract_field(uses_report_id, &map.buttons, raw) {
        Some(value) => {
            let buttons = value as u8;
            state.set_mouse_buttons(buttons);
            buttons
        }
        // Field absent or carried by another report ID: keep held buttons.
        None => state.mouse_buttons(),
    };

    MouseSample {
        buttons,
        x: clamp_i16(move_x >> shift),
        y: clamp_i16(move_y >> shift),
        wheel: clamp_i8(wheel),
        pan: clamp_i8(pan),
        mode: MouseMode::Relative,
    }
}

/// Read one field out of a raw report, honoring the report ID prefix.
///
/// When the interface multiplexes report IDs, the first byte names the
/// report; a mismatch against the field's expected ID means this report
/// simply does not carry the field.
fn extract_field(uses_report_id: bool, field: &ReportField, raw: &[u8]) -> Option<i32> {
    let payload = if uses_report_id {
        let (&id, rest) = raw.split_first()?;
        if id != field.report_id {
            return None;
        }
        rest
    } else {
        raw
    };

    field.read(payload)
}

fn clamp_i16(value: i32) -> i16 {
    value.clamp(i16::MIN as i32, i16::MAX as i32) as i16
}

fn clamp_i8(value: i32) -> i8 {
    value.clamp(i8::MIN as i32, i8::MAX as i32) as i8
}
