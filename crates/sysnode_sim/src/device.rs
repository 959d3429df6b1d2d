//! The interfaces through which the harness talks to a device under test.
//!
//! [`Device`] exposes port-level access with raw bit patterns and the device's
//! integer generics. [`SyncClock`] owns the clock and reset: it is the only
//! place where a test task suspends, by waiting for the next rising edge.
//!
//! Ordering contract: values driven between two calls to
//! [`SyncClock::rising_edge`] are latched by the device at the second edge,
//! and values sampled right after `rising_edge` returns reflect the registers
//! updated at that edge.

use sysnode_common::LogicVec;

use crate::error::SimError;
use crate::time::SimTime;
use crate::value::SimSignalId;

/// Port-level access to a device under test.
pub trait Device {
    /// Instance name, used in diagnostics and waveform scopes.
    fn name(&self) -> &str;

    /// Resolves a port name to its handle.
    fn port(&self, name: &str) -> Option<SimSignalId>;

    /// Returns the width of a port in bits.
    fn port_width(&self, port: SimSignalId) -> Result<u32, SimError>;

    /// Returns the value of an integer generic, if the device defines it.
    fn generic(&self, name: &str) -> Option<i64>;

    /// Drives a raw bit pattern onto an input port.
    fn drive(&mut self, port: SimSignalId, value: LogicVec) -> Result<(), SimError>;

    /// Samples the raw bit pattern currently on a port.
    fn sample(&self, port: SimSignalId) -> Result<LogicVec, SimError>;
}

/// Clock and reset control of a synchronous device.
pub trait SyncClock {
    /// Starts a periodic clock. The first rising edge occurs half a period later.
    fn start_clock(&mut self, period: SimTime) -> Result<(), SimError>;

    /// Blocks until the next rising edge has been processed and returns its time.
    fn rising_edge(&mut self) -> Result<SimTime, SimError>;

    /// Asserts or deasserts the synchronous reset.
    fn set_reset(&mut self, asserted: bool) -> Result<(), SimError>;

    /// Stops the clock. Awaiting an edge afterwards is an error.
    fn stop_clock(&mut self) -> Result<(), SimError>;
}
