//! Fixed-point verification engine for systolic-array processor nodes.
//!
//! A test instance binds a [`NodeVariant`] to a device, generates random
//! operands for every input channel, and then lets a [`Driver`] clock the
//! device: each cycle it drives one operand tuple and, once the pipeline is
//! full, compares every output with the exact reference result cast to the
//! output's format. The first mismatch ends the instance.
//!
//! # Usage
//!
//! ```ignore
//! use sysnode_diagnostics::DiagnosticSink;
//! use sysnode_sim::{NodeKind, NodeModel};
//! use sysnode_verify::{run_test, NodeA, RunOptions};
//!
//! let mut dut = NodeModel::new(NodeKind::A, NodeKind::A.generics((8, 8), (16, 16)))?;
//! let sink = DiagnosticSink::new();
//! let report = run_test(&mut dut, &NodeA, 100, &RunOptions::default(), &sink)?;
//! ```

#![warn(missing_docs)]

pub mod cast;
pub mod driver;
pub mod error;
pub mod node_a;
pub mod node_b;
pub mod stimulus;
pub mod variant;

use rand::rngs::StdRng;
use rand::SeedableRng;
use sysnode_diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSink};
use sysnode_sim::{Device, SimTime, SyncClock};

pub use cast::{cast_result, loses_precision, CastStage};
pub use driver::{Driver, DriverState, RunReport, PIPELINE_LATENCY};
pub use error::VerifyError;
pub use node_a::NodeA;
pub use node_b::NodeB;
pub use stimulus::StimulusSequence;
pub use variant::{bind, widths_from_generics, Bindings, Channel, NodeVariant};

/// Settings of one test instance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunOptions {
    /// Stimulus seed. A random seed is drawn, and reported, when unset.
    pub seed: Option<u64>,
    /// Clock period handed to the device.
    pub clock_period: SimTime,
    /// Label for diagnostics. Defaults to the variant name.
    pub instance: Option<String>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            seed: None,
            clock_period: SimTime::from_ns(10),
            instance: None,
        }
    }
}

/// Verifies `dut` against `variant` over `n_events` random operand tuples.
///
/// Configuration problems are logged as `E101` and returned before any
/// stimulus is generated. The seed used is logged as `N301` and recorded in
/// the report.
pub fn run_test<D, V>(
    dut: &mut D,
    variant: &V,
    n_events: usize,
    options: &RunOptions,
    sink: &DiagnosticSink,
) -> Result<RunReport, VerifyError>
where
    D: Device + SyncClock,
    V: NodeVariant + ?Sized,
{
    let instance = options
        .instance
        .clone()
        .unwrap_or_else(|| variant.name().to_string());

    let bindings = match bind(&*dut, variant) {
        Ok(bindings) => bindings,
        Err(e) => {
            sink.emit(
                Diagnostic::error(DiagnosticCode::CONFIGURATION, e.to_string())
                    .with_instance(instance.as_str()),
            );
            return Err(e);
        }
    };

    let seed = options.seed.unwrap_or_else(rand::random);
    sink.emit(
        Diagnostic::new(DiagnosticCode::RUN_INFO, format!("stimulus seed {seed}"))
            .with_instance(instance.as_str()),
    );
    let mut rng = StdRng::seed_from_u64(seed);
    let stimulus = StimulusSequence::generate(
        &bindings.input_specs(),
        n_events + PIPELINE_LATENCY,
        &mut rng,
    )?;

    let cast = CastStage::new(sink, instance);
    let driver = Driver::new(
        dut,
        variant,
        bindings,
        stimulus,
        n_events,
        options.clock_period,
        cast,
    )?;
    let mut report = driver.run()?;
    report.seed = Some(seed);
    Ok(report)
}
