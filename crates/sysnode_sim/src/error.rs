//! Error types for the device and clock interfaces.
//!
//! All errors that can occur while driving or sampling a device, or while
//! advancing its clock, are represented as variants of [`SimError`].

use std::io;

/// Errors that can occur while interacting with a simulated device.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// A port handle or name does not belong to the device.
    #[error("invalid port reference: {reason}")]
    InvalidPortRef {
        /// Description of why the port reference is invalid.
        reason: String,
    },

    /// An attempt was made to drive an output port.
    #[error("port '{port}' is not an input")]
    NotAnInput {
        /// Name of the port.
        port: String,
    },

    /// A driven value does not have the port's width.
    #[error("width mismatch on port '{port}': port is {expected} bits, value is {actual} bits")]
    WidthMismatch {
        /// Name of the port.
        port: String,
        /// The port width.
        expected: u32,
        /// The width of the driven value.
        actual: u32,
    },

    /// A required generic is not set on the device.
    #[error("missing generic '{0}'")]
    MissingGeneric(String),

    /// A generic holds a value that cannot configure the device.
    #[error("invalid generic '{name}': {reason}")]
    InvalidGeneric {
        /// Name of the generic.
        name: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// The clock was awaited while it was not running.
    #[error("clock is not running")]
    ClockNotRunning,

    /// A clock period of zero was requested.
    #[error("clock period must be positive")]
    ZeroPeriod,

    /// A duration string could not be parsed.
    #[error("invalid duration: {0}")]
    InvalidDuration(String),

    /// An I/O error occurred while writing waveform data.
    #[error("waveform I/O error: {0}")]
    WaveformIo(#[from] io::Error),
}
