//! Per-field report layout descriptors for report-protocol mice.
//!
//! A report-protocol mouse describes each logical field (X, Y, wheel, pan,
//! buttons) through its HID report descriptor: which report ID carries it,
//! where it sits in the report and how wide it is. The descriptor parse
//! itself happens at interface negotiation time (on the USB host port);
//! this module holds the resulting field map and the bit-level reader the
//! extractor uses per report.

/// Location and shape of one logical field inside a raw HID report.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReportField {
    /// Report ID expected to carry this field (meaningful only when the
    /// interface multiplexes report IDs).
    pub report_id: u8,
    /// Offset of the field in bits, counted from the first payload byte
    /// (report ID prefix excluded).
    pub bit_offset: u16,
    /// Width of the field in bits (1..=32).
    pub bit_size: u8,
    /// Whether the field value is two's-complement signed.
    pub signed: bool,
}

impl ReportField {
    /// Extract this field's value from a raw report payload.
    ///
    /// HID reports pack fields LSB-first. Returns `None` when the field
    /// lies outside the report or has a nonsensical width.
    pub fn read(&self, data: &[u8]) -> Option<i32> {
        let start = self.bit_offset as usize;
        let size = self.bit_size as usize;
        if size == 0 || size > 32 {
            return None;
        }
        if start + size > data.len() * 8 {
            return None;
        }

        let mut value: u32 = 0;
        for i in 0..size {
            let bit = start + i;
            if (data[bit / 8] >> (bit % 8)) & 1 == 1 {
                value |= 1 << i;
            }
        }

        // Sign-extend when the top bit of the field is set.
        if self.signed && size < 32 && (value >> (size - 1)) & 1 == 1 {
            value |= u32::MAX << size;
        }

        Some(value as i32)
    }
}

/// Field map of a report-protocol mouse, one `ReportField` per logical
/// value the pipeline consumes.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MouseFieldMap {
    pub move_x: ReportField,
    pub move_y: ReportField,
    pub wheel: ReportField,
    pub pan: ReportField,
    pub buttons: ReportField,
}

/// Report interpretation negotiated for one HID interface.
///
/// Selected once when the interface is set up, not re-decided per report.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InterfaceProtocol {
    /// Fixed device-class-mandated layout, no report ID prefix.
    Boot,
    /// Layout described by the device's report descriptor.
    Report(MouseFieldMap),
}

/// Everything the extractor needs to know about one mouse interface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HidInterface {
    pub protocol: InterfaceProtocol,
    /// Whether reports on this interface carry a report ID prefix byte.
    pub uses_report_id: bool,
}

impl HidInterface {
    /// A boot-protocol interface (fixed layout, no report IDs).
    pub const fn boot() -> Self {
        Self {
            protocol: InterfaceProtocol::Boot,
            uses_report_id: false,
        }
    }
}
