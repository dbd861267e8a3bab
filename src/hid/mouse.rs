//! Canonical mouse sample and its relay wire form.
//!
//! Wire layout (8 bytes, little-endian):
//! ```text
//! Byte 0:   Button bitfield
//!           Bit 0 = Left, Bit 1 = Right, Bit 2 = Middle
//! Byte 1-2: X displacement (signed 16-bit)
//! Byte 3-4: Y displacement (signed 16-bit)
//! Byte 5:   Scroll wheel (signed)
//! Byte 6:   Horizontal pan (signed)
//! Byte 7:   Coordinate mode tag
//! ```

/// Serialized mouse sample size in bytes (relay wire form).
pub const MOUSE_REPORT_SIZE: usize = 8;

/// Coordinate mode of a sample. The report pipeline only produces
/// `Relative`; the tag is carried on the wire because the inter-board
/// protocol also transports absolute samples from other producers.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum MouseMode {
    #[default]
    Relative = 0,
    Absolute = 1,
}

/// One canonical mouse sample, produced per processed HID report.
///
/// Displacements are already scale-adjusted (zoom shift applied). A sample
/// lives for one processing step: it is either copied into the delivery
/// queue or serialized for the sibling board, never retained.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MouseSample {
    /// Button bitfield (bit 0 = left, bit 1 = right, bit 2 = middle).
    pub buttons: u8,
    /// Relative X movement (signed).
    pub x: i16,
    /// Relative Y movement (signed).
    pub y: i16,
    /// Vertical scroll delta (signed).
    pub wheel: i8,
    /// Horizontal scroll delta (signed).
    pub pan: i8,
    /// Coordinate mode, fixed to `Relative` in this pipeline.
    pub mode: MouseMode,
}

impl MouseSample {
    /// Serialise into a byte slice for the inter-board link.
    /// Returns the number of bytes written (always 8), or 0 when the
    /// buffer is too small.
    pub fn serialize(&self, buf: &mut [u8]) -> usize {
        if buf.len() < MOUSE_REPORT_SIZE {
            return 0;
        }
        buf[0] = self.buttons;
        buf[1..3].copy_from_slice(&self.x.to_le_bytes());
        buf[3..5].copy_from_slice(&self.y.to_le_bytes());
        buf[5] = self.wheel as u8;
        buf[6] = self.pan as u8;
        buf[7] = self.mode as u8;
        MOUSE_REPORT_SIZE
    }

    /// Parse a sample received from the sibling board.
    pub fn from_wire_bytes(data: &[u8]) -> Option<Self> {
        if data.len() < MOUSE_REPORT_SIZE {
            return None;
        }
        Some(Self {
            buttons: data[0],
            x: i16::from_le_bytes([data[1], data[2]]),
            y: i16::from_le_bytes([data[3], data[4]]),
            wheel: data[5] as i8,
            pan: data[6] as i8,
            mode: match data[7] {
                1 => MouseMode::Absolute,
                _ => MouseMode::Relative,
            },
        })
    }
}

// USB HID report descriptor for the device-facing mouse endpoint

/// USB HID Report Descriptor for a 3-button mouse with vertical wheel
/// and horizontal pan (AC Pan).
pub const MOUSE_REPORT_DESCRIPTOR: &[u8] = &[
    0x05, 0x01, // Usage Page (Generic Desktop)
    0x09, 0x02, // Usage (Mouse)
    0xA1, 0x01, // Collection (Application)
    0x09, 0x01, //   Usage (Pointer)
    0xA1, 0x00, //   Collection (Physical)
    //
    //   - Buttons (3 bits + 5 padding) -
    0x05, 0x09, //     Usage Page (Buttons)
    0x19, 0x01, //     Usage Minimum (Button 1)
    0x29, 0x03, //     Usage Maximum (Button 3)
    0x15, 0x00, //     Logical Minimum (0)
    0x25, 0x01, //     Logical Maximum (1)
    0x95, 0x03, //     Report Count (3)
    0x75, 0x01, //     Report Size (1)
    0x81, 0x02, //     Input (Data, Variable, Absolute)
    0x95, 0x01, //     Report Count (1)
    0x75, 0x05, //     Report Size (5)
    0x81, 0x01, //     Input (Constant) - padding
    //
    //   - X, Y displacement (16-bit) -
    0x05, 0x01, //     Usage Page (Generic Desktop)
    0x09, 0x30, //     Usage (X)
    0x09, 0x31, //     Usage (Y)
    0x16, 0x01, 0x80, //     Logical Minimum (-32767)
    0x26, 0xFF, 0x7F, //     Logical Maximum (32767)
    0x75, 0x10, //     Report Size (16)
    0x95, 0x02, //     Report Count (2)
    0x81, 0x06, //     Input (Data, Variable, Relative)
    //
    //   - Scroll wheel -
    0x09, 0x38, //     Usage (Wheel)
    0x15, 0x81, //     Logical Minimum (-127)
    0x25, 0x7F, //     Logical Maximum (127)
    0x75, 0x08, //     Report Size (8)
    0x95, 0x01, //     Report Count (1)
    0x81, 0x06, //     Input (Data, Variable, Relative)
    //
    //   - Horizontal pan (AC Pan) -
    0x05, 0x0C, //     Usage Page (Consumer)
    0x0A, 0x38, 0x02, //     Usage (AC Pan)
    0x15, 0x81, //     Logical Minimum (-127)
    0x25, 0x7F, //     Logical Maximum (127)
    0x75, 0x08, //     Report Size (8)
    0x95, 0x01, //     Report Count (1)
    0x81, 0x06, //     Input (Data, Variable, Relative)
    //
    0xC0, //   End Collection (Physical)
    0xC0, // End Collection (Application)
];
