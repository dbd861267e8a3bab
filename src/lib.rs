//! duokvm - dual-host USB KVM switch firmware.
//!
//! Two identical boards each attach to one downstream host and share one
//! set of peripherals over a private board-to-board link. This crate holds
//! the per-report processing pipeline: raw HID mouse bytes are normalized
//! into a canonical sample, routed either to the locally attached host or
//! to the sibling board, and delivered to the USB host through a bounded
//! retry-on-next-tick queue.
//!
//! The pure logic (extraction, routing, queueing, config codec) builds for
//! the host so `cargo test` needs no hardware; everything touching the
//! RP2040 sits behind the `embedded` feature.

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod error;
pub mod hal;
pub mod hid;
pub mod pipeline;
pub mod queue;
pub mod state;
pub mod storage;

#[cfg(feature = "embedded")]
pub mod relay;
#[cfg(feature = "embedded")]
pub mod usb;

pub use config::DeviceConfiguration;
pub use error::Error;
pub use hid::{HidInterface, MouseMode, MouseSample};
pub use pipeline::{process_queue_task, process_report, queue_report, route_report};
pub use state::{BoardRole, DeviceState};
