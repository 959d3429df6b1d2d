//! Port handles and per-port runtime state.
//!
//! Every port of a device gets a flat [`SimSignalId`]. The harness resolves
//! port names to ids once, when it binds its channels, and afterwards only
//! passes ids around.

use serde::{Deserialize, Serialize};
use sysnode_common::{Logic, LogicVec};

/// Opaque handle of a device port.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct SimSignalId(u32);

impl SimSignalId {
    /// Creates a `SimSignalId` from a raw index.
    pub fn from_raw(index: u32) -> Self {
        Self(index)
    }

    /// Returns the raw index.
    pub fn as_raw(self) -> u32 {
        self.0
    }
}

/// Direction of a port as seen from the device.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PortDirection {
    /// Driven by the harness.
    Input,
    /// Driven by the device.
    Output,
}

/// The runtime state of one port.
///
/// Tracks the current value and the value last written to the waveform, so
/// that only changes are recorded.
#[derive(Clone, Debug)]
pub struct PortState {
    /// Port name, used for lookup and waveform output.
    pub name: String,
    /// Direction of the port.
    pub direction: PortDirection,
    /// Bit width of this port.
    pub width: u32,
    /// Current value.
    pub value: LogicVec,
    /// Value at the last waveform sample.
    pub previous_value: Option<LogicVec>,
}

impl PortState {
    /// Creates a port whose value is unknown until first driven or reset.
    pub fn new_unknown(name: impl Into<String>, direction: PortDirection, width: u32) -> Self {
        Self {
            name: name.into(),
            direction,
            width,
            value: LogicVec::filled(width, Logic::X),
            previous_value: None,
        }
    }

    /// Returns `true` if the value changed since the last waveform sample.
    pub fn changed(&self) -> bool {
        self.previous_value.as_ref() != Some(&self.value)
    }
}
