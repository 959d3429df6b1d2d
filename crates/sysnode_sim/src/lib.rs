//! Synchronous device interfaces and a behavioral processor-node model.
//!
//! The verification harness never talks to a simulator directly. It sees a
//! device through two traits: [`Device`] for port and generic access, and
//! [`SyncClock`] for clock and reset control. Any backend implementing both
//! can be verified.
//!
//! This crate also ships [`NodeModel`], a cycle-based model of the two
//! systolic-array node entities with a register pipeline, synchronous reset,
//! optional output fault injection and VCD waveform output.
//!
//! # Usage
//!
//! ```ignore
//! use sysnode_sim::{build_model, ModelConfig, NodeKind};
//!
//! let config = ModelConfig::new(NodeKind::A, NodeKind::A.generics((8, 8), (16, 16)));
//! let mut model = build_model(&config)?;
//! ```
//!
//! # Modules
//!
//! - `error`: Device and clock error types
//! - `time`: Femtosecond-precision simulation time
//! - `value`: Port handles and port state
//! - `device`: The `Device` and `SyncClock` traits
//! - `model`: Behavioral model of processor nodes A and B
//! - `waveform`: Waveform recording (VCD format)

#![warn(missing_docs)]

pub mod device;
pub mod error;
pub mod model;
pub mod time;
pub mod value;
pub mod waveform;

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

pub use device::{Device, SyncClock};
pub use error::SimError;
pub use model::{BitFlip, NodeKind, NodeModel, PortSpec, DEFAULT_LATENCY};
pub use time::SimTime;
pub use value::{PortDirection, PortState, SimSignalId};
pub use waveform::{VcdRecorder, WaveformRecorder};

/// Configuration for building a behavioral node model.
#[derive(Debug, Clone)]
pub struct ModelConfig {
    /// Which node entity to model.
    pub kind: NodeKind,
    /// Width generics, name to value.
    pub generics: BTreeMap<String, i64>,
    /// Register stages between inputs and outputs.
    pub latency: usize,
    /// Optional VCD output path.
    pub waveform_path: Option<PathBuf>,
    /// Output bit flips to inject.
    pub faults: Vec<BitFlip>,
}

impl ModelConfig {
    /// Creates a configuration with the default latency, no waveform and no faults.
    pub fn new(kind: NodeKind, generics: BTreeMap<String, i64>) -> Self {
        Self {
            kind,
            generics,
            latency: DEFAULT_LATENCY,
            waveform_path: None,
            faults: Vec::new(),
        }
    }
}

/// Builds a node model from its configuration, attaching a VCD recorder when
/// a waveform path is set.
pub fn build_model(config: &ModelConfig) -> Result<NodeModel, SimError> {
    let mut model = NodeModel::with_latency(config.kind, config.generics.clone(), config.latency)?;

    for fault in &config.faults {
        model.inject_fault(fault.clone())?;
    }

    if let Some(path) = &config.waveform_path {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        model.set_recorder(Box::new(VcdRecorder::new(writer)))?;
    }

    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_config_defaults() {
        let config = ModelConfig::new(NodeKind::A, NodeKind::A.generics((4, 4), (8, 8)));
        assert_eq!(config.latency, 3);
        assert!(config.waveform_path.is_none());
        assert!(config.faults.is_empty());
    }

    #[test]
    fn build_plain_model() {
        let config = ModelConfig::new(NodeKind::B, NodeKind::B.generics((4, 4), (8, 8)));
        let model = build_model(&config).unwrap();
        assert_eq!(model.name(), "processor_node_b");
        assert_eq!(model.latency(), 3);
        assert!(model.port("data_out_se").is_none());
    }

    #[test]
    fn build_rejects_bad_fault() {
        let mut config = ModelConfig::new(NodeKind::B, NodeKind::B.generics((4, 4), (8, 8)));
        config.faults.push(BitFlip {
            cycle: 0,
            port: "data_out_se".into(),
            bit: 0,
        });
        assert!(matches!(build_model(&config), Err(SimError::InvalidPortRef { .. })));
    }

    #[test]
    fn build_with_waveform_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wave.vcd");
        let mut config = ModelConfig::new(NodeKind::A, NodeKind::A.generics((4, 4), (8, 8)));
        config.waveform_path = Some(path.clone());
        let mut model = build_model(&config).unwrap();
        model.start_clock(SimTime::from_ns(10)).unwrap();
        model.rising_edge().unwrap();
        model.stop_clock().unwrap();
        let vcd = std::fs::read_to_string(&path).unwrap();
        assert!(vcd.contains("$enddefinitions $end"));
        assert!(vcd.contains("data_in_nw"));
    }

    #[test]
    fn build_with_bad_waveform_path() {
        let mut config = ModelConfig::new(NodeKind::A, NodeKind::A.generics((4, 4), (8, 8)));
        config.waveform_path = Some(PathBuf::from("/nonexistent/dir/wave.vcd"));
        assert!(matches!(build_model(&config), Err(SimError::WaveformIo(_))));
    }
}
