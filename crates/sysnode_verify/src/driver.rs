//! Driver/comparator: clocks the device, applies stimulus and checks outputs.
//!
//! The driver is an explicit state machine advanced one clock cycle at a time
//! by [`Driver::step`]. The only point where it waits is
//! [`SyncClock::rising_edge`].
//!
//! ```text
//! Reset --> Warmup(0) --> .. --> Warmup(L-1) --> Steady(L) --> .. --> Steady(N+L-1) --> Done
//! ```
//!
//! In cycle `n` the driver waits for an edge and then drives operand tuple
//! `n`. From cycle `L` on it also compares every output against the casted
//! reference of tuple `n - L`, which the device latched `L` edges earlier.

use serde::Serialize;
use sysnode_common::LogicVec;
use sysnode_diagnostics::{Diagnostic, DiagnosticCode};
use sysnode_sim::{Device, SimTime, SyncClock};

use crate::cast::CastStage;
use crate::error::VerifyError;
use crate::stimulus::StimulusSequence;
use crate::variant::{Bindings, NodeVariant};

/// Clock cycles between driving an operand tuple and seeing its results.
pub const PIPELINE_LATENCY: usize = 3;

/// Where the driver is in a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DriverState {
    /// Reset has not been applied yet.
    Reset,
    /// Filling the pipeline; the next step processes this cycle without checking.
    Warmup {
        /// Cycle the next step processes.
        cycle: u64,
    },
    /// The next step processes this cycle and checks the outputs.
    Steady {
        /// Cycle the next step processes.
        cycle: u64,
    },
    /// All cycles processed and the clock stopped.
    Done,
}

/// Summary of a passing run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RunReport {
    /// Test instance name.
    pub instance: String,
    /// Number of operand tuples whose results were checked.
    pub events: usize,
    /// Clock cycles after reset.
    pub cycles: u64,
    /// Individual output comparisons performed.
    pub comparisons: u64,
    /// Precision warnings raised by the cast stage.
    pub precision_warnings: usize,
    /// Seed the stimulus was drawn from, when it was random.
    pub seed: Option<u64>,
    /// Time of the last rising edge.
    pub end_time: SimTime,
}

/// Drives one test instance through reset, warmup and steady state.
pub struct Driver<'a, D, V: ?Sized> {
    dut: &'a mut D,
    variant: &'a V,
    bindings: Bindings,
    stimulus: StimulusSequence,
    events: usize,
    clock_period: SimTime,
    cast: CastStage<'a>,
    state: DriverState,
    comparisons: u64,
    last_edge: SimTime,
}

impl<'a, D, V> Driver<'a, D, V>
where
    D: Device + SyncClock,
    V: NodeVariant + ?Sized,
{
    /// Prepares a run checking `events` tuples of `stimulus`.
    ///
    /// Fails before touching the device if the stimulus does not fit the
    /// bindings, or if the variant's reference returns a different number of
    /// results than it has output channels.
    pub fn new(
        dut: &'a mut D,
        variant: &'a V,
        bindings: Bindings,
        stimulus: StimulusSequence,
        events: usize,
        clock_period: SimTime,
        cast: CastStage<'a>,
    ) -> Result<Self, VerifyError> {
        if stimulus.channel_count() != bindings.inputs.len() {
            return Err(VerifyError::Configuration(format!(
                "stimulus has {} channels, {} has {} inputs",
                stimulus.channel_count(),
                variant.name(),
                bindings.inputs.len()
            )));
        }
        if stimulus.len() < events + PIPELINE_LATENCY {
            return Err(VerifyError::Configuration(format!(
                "{events} events need {} stimulus tuples, got {}",
                events + PIPELINE_LATENCY,
                stimulus.len()
            )));
        }
        if !stimulus.is_empty() {
            let produced = variant.reference(&stimulus.tuple(0)).len();
            let declared = bindings.outputs.len();
            if produced != declared {
                cast.sink().emit(
                    Diagnostic::error(
                        DiagnosticCode::CAPABILITY,
                        format!("reference of {} returns {produced} values", variant.name()),
                    )
                    .with_instance(cast.instance())
                    .with_note(format!("{declared} output channels are declared")),
                );
                return Err(VerifyError::Capability {
                    variant: variant.name().to_string(),
                    declared,
                    produced,
                });
            }
        }

        Ok(Self {
            dut,
            variant,
            bindings,
            stimulus,
            events,
            clock_period,
            cast,
            state: DriverState::Reset,
            comparisons: 0,
            last_edge: SimTime::zero(),
        })
    }

    /// The state the next [`step`](Self::step) starts from.
    pub fn state(&self) -> DriverState {
        self.state
    }

    fn total_cycles(&self) -> u64 {
        (self.events + PIPELINE_LATENCY) as u64
    }

    fn state_for(&self, cycle: u64) -> DriverState {
        if cycle >= self.total_cycles() {
            DriverState::Done
        } else if cycle < PIPELINE_LATENCY as u64 {
            DriverState::Warmup { cycle }
        } else {
            DriverState::Steady { cycle }
        }
    }

    /// Advances by one clock cycle (or applies reset) and returns the new state.
    pub fn step(&mut self) -> Result<DriverState, VerifyError> {
        let next = match self.state {
            DriverState::Reset => {
                self.reset()?;
                self.state_for(0)
            }
            DriverState::Warmup { cycle } => {
                self.last_edge = self.dut.rising_edge()?;
                self.apply(cycle)?;
                self.state_for(cycle + 1)
            }
            DriverState::Steady { cycle } => {
                self.last_edge = self.dut.rising_edge()?;
                self.apply(cycle)?;
                if let Err(e) = self.check(cycle) {
                    // Flush the waveform; the mismatch is what gets reported.
                    let _ = self.dut.stop_clock();
                    return Err(e);
                }
                self.state_for(cycle + 1)
            }
            DriverState::Done => return Ok(DriverState::Done),
        };
        if next == DriverState::Done {
            self.dut.stop_clock()?;
        }
        self.state = next;
        Ok(next)
    }

    /// Steps until done and returns the run summary.
    pub fn run(mut self) -> Result<RunReport, VerifyError> {
        while self.step()? != DriverState::Done {}
        Ok(RunReport {
            instance: self.cast.instance().to_string(),
            events: self.events,
            cycles: self.total_cycles(),
            comparisons: self.comparisons,
            precision_warnings: self.cast.warnings(),
            seed: None,
            end_time: self.last_edge,
        })
    }

    fn reset(&mut self) -> Result<(), VerifyError> {
        for channel in &self.bindings.inputs {
            self.dut.drive(channel.port, LogicVec::new(channel.spec.width()))?;
        }
        self.dut.set_reset(true)?;
        self.dut.start_clock(self.clock_period)?;
        self.last_edge = self.dut.rising_edge()?;
        self.dut.set_reset(false)?;
        Ok(())
    }

    /// Drives operand tuple `cycle` onto the inputs.
    fn apply(&mut self, cycle: u64) -> Result<(), VerifyError> {
        let tuple = self.stimulus.tuple(cycle as usize);
        for (channel, value) in self.bindings.inputs.iter().zip(&tuple) {
            let bits = LogicVec::from_biguint(&value.to_bits(), channel.spec.width());
            self.dut.drive(channel.port, bits)?;
        }
        Ok(())
    }

    /// Compares the outputs with the reference of the tuple applied `L` cycles ago.
    fn check(&mut self, cycle: u64) -> Result<(), VerifyError> {
        let source = cycle as usize - PIPELINE_LATENCY;
        let operands = self.stimulus.tuple(source);
        let exact = self.variant.reference(&operands);

        for (channel, exact) in self.bindings.outputs.iter().zip(&exact) {
            let casted = self.cast.cast(exact, channel, Some(cycle));
            let expected = LogicVec::from_biguint(&casted.to_bits(), channel.spec.width());
            let observed = self.dut.sample(channel.port)?;
            self.comparisons += 1;
            if observed == expected {
                continue;
            }

            let operand_list = operands
                .iter()
                .map(|v| v.to_f64().to_string())
                .collect::<Vec<_>>()
                .join(", ");
            let mut diag = Diagnostic::error(
                DiagnosticCode::MISMATCH,
                format!("'{}' is {observed}, expected {expected}", channel.name),
            )
            .with_instance(self.cast.instance())
            .with_cycle(cycle)
            .with_channel(channel.name.as_str())
            .with_note(format!(
                "operands ({operand_list}) were applied in cycle {source}; expected value {}",
                casted.to_f64()
            ));
            if observed.width() != expected.width() {
                diag = diag.with_note(format!(
                    "port is {} bits wide, expected {}",
                    observed.width(),
                    expected.width()
                ));
            } else if !observed.has_unknown() {
                let bits = observed
                    .differing_bits(&expected)
                    .iter()
                    .map(u32::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                diag = diag.with_note(format!("differing bits: {bits}"));
            }
            self.cast.sink().emit(diag);

            return Err(VerifyError::Mismatch {
                cycle,
                channel: channel.name.clone(),
                expected,
                observed,
            });
        }
        Ok(())
    }
}
