//! USB device-side stack: the HID mouse endpoint toward the local host.

pub mod hid_device;

pub use hid_device::{init, UsbHidHost, UsbMouseDevice};
