//! Unit tests for HID report extraction.
//!
//! These run on the host and verify the pure logic of both report
//! interpretations: layouts, zoom scaling, report-ID dispatch and the
//! button carry-over rule.

use super::descriptor::{HidInterface, InterfaceProtocol, MouseFieldMap, ReportField};
use super::extractor::extract;
use super::mouse::{MouseMode, MouseSample};
use crate::state::{BoardRole, DeviceState};

fn state() -> DeviceState {
    DeviceState::new(BoardRole::OutputA)
}

/// Byte-aligned field map without report IDs:
/// [buttons, x, y, wheel, pan], one signed byte each.
fn byte_map() -> MouseFieldMap {
    let field = |offset: u16, signed: bool| ReportField {
        report_id: 0,
        bit_offset: offset,
        bit_size: 8,
        signed,
    };
    MouseFieldMap {
        buttons: field(0, false),
        move_x: field(8, true),
        move_y: field(16, true),
        wheel: field(24, true),
        pan: field(32, true),
    }
}

/// Same map but multiplexed onto report ID 1.
fn byte_map_with_id(id: u8) -> MouseFieldMap {
    let mut map = byte_map();
    map.buttons.report_id = id;
    map.move_x.report_id = id;
    map.move_y.report_id = id;
    map.wheel.report_id = id;
    map.pan.report_id = id;
    map
}

fn report_iface(map: MouseFieldMap, uses_report_id: bool) -> HidInterface {
    HidInterface {
        protocol: InterfaceProtocol::Report(map),
        uses_report_id,
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Boot protocol
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn boot_report_fixed_layout() {
    let st = state();
    let sample = extract(&[0x01, 0x05, 0xFD, 0x01, 0x00], &st, &HidInterface::boot());

    assert_eq!(
        sample,
        MouseSample {
            buttons: 0x01,
            x: 5,
            y: -3,
            wheel: 1,
            pan: 0,
            mode: MouseMode::Relative,
        }
    );
    // Boot buttons are stored unconditionally.
    assert_eq!(st.mouse_buttons(), 0x01);
}

#[test]
fn boot_report_zoom_reduces_movement_only() {
    let st = state();
    st.set_mouse_zoom(true);

    // x=20, y=-20, wheel=4
    let sample = extract(&[0x00, 0x14, 0xEC, 0x04, 0x00], &st, &HidInterface::boot());

    assert_eq!(sample.x, 5);
    // Arithmetic shift: -20 >> 2 == -5.
    assert_eq!(sample.y, -5);
    // Wheel and pan are never scaled.
    assert_eq!(sample.wheel, 4);
}

#[test]
fn boot_report_short_reads_missing_bytes_as_zero() {
    let st = state();
    let sample = extract(&[0x02, 0x0A], &st, &HidInterface::boot());

    assert_eq!(sample.buttons, 0x02);
    assert_eq!(sample.x, 10);
    assert_eq!(sample.y, 0);
    assert_eq!(sample.wheel, 0);
    assert_eq!(sample.pan, 0);
}

#[test]
fn boot_report_release_clears_stored_buttons() {
    let st = state();
    extract(&[0x07, 0, 0, 0, 0], &st, &HidInterface::boot());
    assert_eq!(st.mouse_buttons(), 0x07);

    extract(&[0x00, 0, 0, 0, 0], &st, &HidInterface::boot());
    assert_eq!(st.mouse_buttons(), 0x00);
}

// ═══════════════════════════════════════════════════════════════════════════
// Report protocol
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn report_protocol_byte_aligned_fields() {
    let st = state();
    let iface = report_iface(byte_map(), false);

    let sample = extract(&[0x01, 0x05, 0xFD, 0x01, 0xFF], &st, &iface);

    assert_eq!(sample.buttons, 0x01);
    assert_eq!(sample.x, 5);
    assert_eq!(sample.y, -3);
    assert_eq!(sample.wheel, 1);
    assert_eq!(sample.pan, -1);
    assert_eq!(st.mouse_buttons(), 0x01);
}

#[test]
fn report_protocol_with_matching_report_id() {
    let st = state();
    let iface = report_iface(byte_map_with_id(1), true);

    // Prefix byte 1 matches every field's expected ID.
    let sample = extract(&[1, 0x03, 0x0A, 0xF6, 0x00, 0x00], &st, &iface);

    assert_eq!(sample.buttons, 0x03);
    assert_eq!(sample.x, 10);
    assert_eq!(sample.y, -10);
}

#[test]
fn report_id_mismatch_skips_all_fields_and_carries_buttons() {
    let st = state();
    st.set_mouse_buttons(0x02);
    let iface = report_iface(byte_map_with_id(1), true);

    // Report ID 5 carries none of the mapped fields.
    let sample = extract(&[5, 0x7F, 0x7F, 0x7F, 0x7F, 0x7F], &st, &iface);

    // Buttons fall back to the prior state; deltas default to zero.
    assert_eq!(sample.buttons, 0x02);
    assert_eq!(sample.x, 0);
    assert_eq!(sample.y, 0);
    assert_eq!(sample.wheel, 0);
    assert_eq!(sample.pan, 0);
    // The stored state is untouched by a skipped field.
    assert_eq!(st.mouse_buttons(), 0x02);
}

#[test]
fn buttons_carry_over_until_next_button_report() {
    let st = state();
    // Movement fields on report 1, buttons only on report 2.
    let mut map = byte_map_with_id(1);
    map.buttons = ReportField {
        report_id: 2,
        bit_offset: 0,
        bit_size: 3,
        signed: false,
    };
    let iface = report_iface(map, true);

    // Button press arrives on report 2.
    let sample = extract(&[2, 0x05], &st, &iface);
    assert_eq!(sample.buttons, 0x05);

    // Pure movement reports keep the held buttons.
    for _ in 0..3 {
        let sample = extract(&[1, 0x01, 0x01, 0x00, 0x00, 0x00], &st, &iface);
        assert_eq!(sample.buttons, 0x05);
    }

    // Release on report 2 clears them.
    let sample = extract(&[2, 0x00], &st, &iface);
    assert_eq!(sample.buttons, 0x00);
}

#[test]
fn wheel_and_pan_never_carry_over() {
    let st = state();
    // Wheel lives on report 2; everything else on report 1.
    let mut map = byte_map_with_id(1);
    map.wheel = ReportField {
        report_id: 2,
        bit_offset: 0,
        bit_size: 8,
        signed: true,
    };
    let iface = report_iface(map, true);

    let sample = extract(&[2, 0x03], &st, &iface);
    assert_eq!(sample.wheel, 3);

    // The next movement report yields wheel 0, not the previous delta.
    let sample = extract(&[1, 0x00, 0x02, 0x02, 0x00, 0x00], &st, &iface);
    assert_eq!(sample.wheel, 0);
    assert_eq!(sample.x, 2);
}

#[test]
fn report_protocol_zoom_scales_after_extraction() {
    let st = state();
    st.set_mouse_zoom(true);
    let iface = report_iface(byte_map(), false);

    let sample = extract(&[0x00, 0x28, 0xD8, 0x02, 0x00], &st, &iface);

    // 40 >> 2 and -40 >> 2; wheel untouched.
    assert_eq!(sample.x, 10);
    assert_eq!(sample.y, -10);
    assert_eq!(sample.wheel, 2);
}

#[test]
fn twelve_bit_fields_sign_extend() {
    let st = state();
    // Buttons in byte 0, then two packed 12-bit signed displacements.
    let map = MouseFieldMap {
        buttons: ReportField {
            report_id: 0,
            bit_offset: 0,
            bit_size: 8,
            signed: false,
        },
        move_x: ReportField {
            report_id: 0,
            bit_offset: 8,
            bit_size: 12,
            signed: true,
        },
        move_y: ReportField {
            report_id: 0,
            bit_offset: 20,
            bit_size: 12,
            signed: true,
        },
        wheel: ReportField::default(),
        pan: ReportField::default(),
    };
    let iface = report_iface(map, false);

    // x = -5 (0xFFB), y = 3, packed little-endian LSB-first.
    let sample = extract(&[0x00, 0xFB, 0x3F, 0x00], &st, &iface);

    assert_eq!(sample.x, -5);
    assert_eq!(sample.y, 3);
    // Zero-width default fields read as absent.
    assert_eq!(sample.wheel, 0);
}

#[test]
fn field_outside_report_reads_as_absent() {
    let st = state();
    st.set_mouse_buttons(0x04);
    let iface = report_iface(byte_map(), false);

    // A single-byte report only carries the buttons field.
    let sample = extract(&[0x01], &st, &iface);
    assert_eq!(sample.buttons, 0x01);
    assert_eq!(sample.x, 0);
    assert_eq!(sample.y, 0);

    // Empty report: every field absent, buttons carried over.
    let sample = extract(&[], &st, &iface);
    assert_eq!(sample.buttons, 0x01);
}

#[test]
fn wide_movement_saturates_into_sample_range() {
    let st = state();
    let mut map = byte_map();
    map.move_x = ReportField {
        report_id: 0,
        bit_offset: 8,
        bit_size: 32,
        signed: true,
    };
    let iface = report_iface(map, false);

    let mut raw = [0u8; 8];
    raw[1..5].copy_from_slice(&100_000i32.to_le_bytes());
    let sample = extract(&raw, &st, &iface);

    assert_eq!(sample.x, i16::MAX);
}

// ═══════════════════════════════════════════════════════════════════════════
// ReportField bit reader
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn report_field_read_rejects_out_of_range() {
    let field = ReportField {
        report_id: 0,
        bit_offset: 16,
        bit_size: 8,
        signed: false,
    };
    assert_eq!(field.read(&[0xFF, 0xFF]), None);
    assert_eq!(field.read(&[0xFF, 0xFF, 0x2A]), Some(0x2A));
}

#[test]
fn report_field_read_single_bit() {
    let field = ReportField {
        report_id: 0,
        bit_offset: 2,
        bit_size: 1,
        signed: false,
    };
    assert_eq!(field.read(&[0b0000_0100]), Some(1));
    assert_eq!(field.read(&[0b0000_0011]), Some(0));
}

#[test]
fn report_field_zero_width_is_absent() {
    assert_eq!(ReportField::default().read(&[0xFF]), None);
}
