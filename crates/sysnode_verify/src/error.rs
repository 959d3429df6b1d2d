//! Error types for verification runs.

use sysnode_common::LogicVec;
use sysnode_sim::SimError;

/// Errors that end a verification run.
///
/// Every variant is fatal for the test instance that raised it. Precision
/// loss in the cast stage is not an error; it is reported as a warning
/// diagnostic only.
#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    /// Invalid bit-width configuration, or a missing generic or port.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A node variant's reference produces a different number of results than
    /// it declares output channels.
    #[error(
        "variant '{variant}' declares {declared} output channels but its reference produces {produced} values"
    )]
    Capability {
        /// Name of the node variant.
        variant: String,
        /// Number of declared output channels.
        declared: usize,
        /// Number of values returned by the reference formula.
        produced: usize,
    },

    /// An output bit pattern differs from the expected one.
    #[error("mismatch at cycle {cycle} on '{channel}': expected {expected}, observed {observed}")]
    Mismatch {
        /// Cycle index counted from the first edge after reset.
        cycle: u64,
        /// Output channel name.
        channel: String,
        /// Casted reference bit pattern.
        expected: LogicVec,
        /// Bit pattern sampled from the device.
        observed: LogicVec,
    },

    /// The device or its clock failed.
    #[error(transparent)]
    Sim(#[from] SimError),
}
