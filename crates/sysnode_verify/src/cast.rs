//! Quantize/cast stage between the exact reference and the output ports.
//!
//! Reference results are cast to each output channel's format with
//! convergent rounding and saturation, the behavior of the hardware's
//! `resize`. A cast that moves the value by more than 1% of its magnitude is
//! reported as a precision warning; it never fails a test.

use std::cell::Cell;

use sysnode_common::{BitWidthSpec, FixedPoint, Overflow, Quantization};
use sysnode_diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSink};

use crate::variant::Channel;

/// Relative deviation above which a cast is reported, as a fraction.
pub const PRECISION_TOLERANCE: (u32, u32) = (1, 100);

/// Casts an exact value to an output format.
pub fn cast_result(exact: &FixedPoint, target: BitWidthSpec) -> FixedPoint {
    exact.cast(target, Quantization::Convergent, Overflow::Saturate)
}

/// Returns `true` if `casted` is more than 1% away from a non-zero `exact`.
pub fn loses_precision(exact: &FixedPoint, casted: &FixedPoint) -> bool {
    let (numerator, denominator) = PRECISION_TOLERANCE;
    !exact.is_zero() && exact.exceeds_relative_error(casted, numerator, denominator)
}

/// Casts results for one test instance and reports lossy casts.
pub struct CastStage<'a> {
    sink: &'a DiagnosticSink,
    instance: String,
    warnings: Cell<usize>,
}

impl<'a> CastStage<'a> {
    /// Creates a stage reporting into `sink` on behalf of `instance`.
    pub fn new(sink: &'a DiagnosticSink, instance: impl Into<String>) -> Self {
        Self {
            sink,
            instance: instance.into(),
            warnings: Cell::new(0),
        }
    }

    /// The sink diagnostics go to.
    pub fn sink(&self) -> &'a DiagnosticSink {
        self.sink
    }

    /// Name of the test instance.
    pub fn instance(&self) -> &str {
        &self.instance
    }

    /// Number of precision warnings emitted so far.
    pub fn warnings(&self) -> usize {
        self.warnings.get()
    }

    /// Casts `exact` to `channel`'s format, warning if precision is lost.
    pub fn cast(&self, exact: &FixedPoint, channel: &Channel, cycle: Option<u64>) -> FixedPoint {
        let casted = cast_result(exact, channel.spec);
        if loses_precision(exact, &casted) {
            self.warnings.set(self.warnings.get() + 1);
            let mut diag = Diagnostic::new(
                DiagnosticCode::PRECISION,
                format!(
                    "casting {} to {} gives {}, off by more than 1%",
                    exact.to_f64(),
                    channel.spec,
                    casted.to_f64()
                ),
            )
            .with_instance(self.instance.as_str())
            .with_channel(channel.name.as_str())
            .with_help(format!("widen the format of '{}'", channel.name));
            if let Some(cycle) = cycle {
                diag = diag.with_cycle(cycle);
            }
            self.sink.emit(diag);
        }
        casted
    }
}
