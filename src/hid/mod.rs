//! HID report handling: canonical sample types, per-interface report
//! layout descriptors and the raw-bytes extractor.

pub mod descriptor;
pub mod extractor;
pub mod mouse;

#[cfg(test)]
mod tests;

pub use descriptor::{HidInterface, InterfaceProtocol, MouseFieldMap, ReportField};
pub use mouse::{MouseMode, MouseSample, MOUSE_REPORT_SIZE};
