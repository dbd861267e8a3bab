//! Unified error type for duokvm.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! The report pipeline itself never propagates an error to its caller;
//! these variants exist for the queue and the configuration codec, whose
//! callers resolve them locally (drop the sample, fall back to defaults).

/// Top-level error type used across the firmware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    // Delivery queue
    /// The bounded delivery queue is full; the sample is dropped.
    QueueFull,

    // Configuration codec
    /// Persisted record does not start with the magic sentinel.
    ConfigMagic,

    /// Persisted record carries an unknown schema version.
    ConfigVersion,

    /// Persisted record is shorter than the fixed layout requires.
    ConfigTruncated,

    // Generic
    /// Buffer too small for the requested operation.
    BufferOverflow,

    // Storage
    /// Flash read/write/erase failed.
    Storage,
}
