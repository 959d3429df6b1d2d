//! Cycle-based behavioral model of the systolic-array processor nodes.
//!
//! [`NodeModel`] stands in for an HDL simulation of `processor_node_a` or
//! `processor_node_b`. It has the same ports and generics as the entities and
//! a register pipeline of configurable depth:
//!
//! ```text
//! edge k+1: input register  <- ports driven after edge k
//! edge k+2: pipeline stage  <- input register
//! edge k+3: output register <- cast(f(stage))
//! ```
//!
//! so with the default depth an input driven after edge `k` is visible on the
//! outputs right after edge `k + 3`. Reset is synchronous and clears every
//! register to zero. Outputs are cast with convergent rounding and saturation,
//! as the `sfixed` package does in hardware.

use std::collections::{BTreeMap, VecDeque};
use std::fmt;
use std::str::FromStr;

use sysnode_common::{BitWidthSpec, FixedPoint, Logic, LogicVec, Overflow, Quantization};

use crate::device::{Device, SyncClock};
use crate::error::SimError;
use crate::time::SimTime;
use crate::value::{PortDirection, PortState, SimSignalId};
use crate::waveform::WaveformRecorder;

/// Register stages between an input port and the outputs, counted in edges.
pub const DEFAULT_LATENCY: usize = 3;

/// A data port of a node entity and the prefix of its width generics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PortSpec {
    /// Port name on the entity.
    pub port: &'static str,
    /// Prefix of the `<PREFIX>_INTEGER_WIDTH` / `<PREFIX>_DECIMAL_WIDTH` generics.
    pub generic_prefix: &'static str,
}

const fn port(port: &'static str, generic_prefix: &'static str) -> PortSpec {
    PortSpec {
        port,
        generic_prefix,
    }
}

const NODE_INPUTS: [PortSpec; 3] = [
    port("data_in_nw", "NW"),
    port("data_in_ne", "NE"),
    port("data_in_s", "S"),
];
const NODE_A_OUTPUTS: [PortSpec; 3] = [
    port("data_out_se", "SE"),
    port("data_out_sw", "SW"),
    port("data_out_n", "N"),
];
const NODE_B_OUTPUTS: [PortSpec; 2] = [port("data_out_sw", "SW"), port("data_out_n", "N")];

/// Name of the integer-width generic for a port prefix.
pub fn integer_width_generic(prefix: &str) -> String {
    format!("{prefix}_INTEGER_WIDTH")
}

/// Name of the fractional-width generic for a port prefix.
pub fn decimal_width_generic(prefix: &str) -> String {
    format!("{prefix}_DECIMAL_WIDTH")
}

/// Which processor-node entity is modeled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Passes two operands through and accumulates `c + a*b`.
    A,
    /// Produces `-(a*b)` and `c - a^2*b`.
    B,
}

impl NodeKind {
    /// Name of the HDL entity.
    pub fn toplevel(self) -> &'static str {
        match self {
            NodeKind::A => "processor_node_a",
            NodeKind::B => "processor_node_b",
        }
    }

    /// Data input ports in operand order `(a, b, c)`.
    pub fn input_ports(self) -> &'static [PortSpec] {
        &NODE_INPUTS
    }

    /// Data output ports in result order.
    pub fn output_ports(self) -> &'static [PortSpec] {
        match self {
            NodeKind::A => &NODE_A_OUTPUTS,
            NodeKind::B => &NODE_B_OUTPUTS,
        }
    }

    /// Generic map giving every input one format and every output another.
    pub fn generics(self, input: (i64, i64), output: (i64, i64)) -> BTreeMap<String, i64> {
        let mut generics = BTreeMap::new();
        let inputs = self.input_ports().iter().map(|p| (p, input));
        let outputs = self.output_ports().iter().map(|p| (p, output));
        for (spec, (int_bits, frac_bits)) in inputs.chain(outputs) {
            generics.insert(integer_width_generic(spec.generic_prefix), int_bits);
            generics.insert(decimal_width_generic(spec.generic_prefix), frac_bits);
        }
        generics
    }

    /// The node's datapath, computed exactly.
    fn datapath(self, operands: &[FixedPoint]) -> Vec<FixedPoint> {
        let (a, b, c) = (&operands[0], &operands[1], &operands[2]);
        let ab = a * b;
        match self {
            NodeKind::A => vec![a.clone(), b.clone(), c + &ab],
            NodeKind::B => vec![-&ab, c - &(&a.pow(2) * b)],
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::A => write!(f, "a"),
            NodeKind::B => write!(f, "b"),
        }
    }
}

impl FromStr for NodeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "a" => Ok(NodeKind::A),
            "b" => Ok(NodeKind::B),
            other => Err(format!("unknown node variant '{other}' (expected 'a' or 'b')")),
        }
    }
}

/// A single-cycle bit flip on an output register, for fault-injection tests.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BitFlip {
    /// Cycle index, counted from the first edge after reset is released.
    pub cycle: u64,
    /// Output port whose register is corrupted.
    pub port: String,
    /// Bit index to invert.
    pub bit: u32,
}

/// Resolved data port: handle plus fixed-point format.
#[derive(Clone, Copy, Debug)]
struct DataPort {
    id: SimSignalId,
    spec: BitWidthSpec,
}

/// Behavioral processor-node device with clock and reset.
pub struct NodeModel {
    kind: NodeKind,
    name: String,
    generics: BTreeMap<String, i64>,
    ports: Vec<PortState>,
    clk: SimSignalId,
    rst: SimSignalId,
    inputs: Vec<DataPort>,
    outputs: Vec<DataPort>,
    /// Captured operand tuples waiting for the output register; `None` is unknown.
    pipeline: VecDeque<Option<Vec<FixedPoint>>>,
    latency: usize,
    period: Option<SimTime>,
    next_edge: SimTime,
    cycle: Option<u64>,
    faults: Vec<BitFlip>,
    recorder: Option<Box<dyn WaveformRecorder>>,
}

impl NodeModel {
    /// Creates a model with the default pipeline depth.
    pub fn new(kind: NodeKind, generics: BTreeMap<String, i64>) -> Result<Self, SimError> {
        Self::with_latency(kind, generics, DEFAULT_LATENCY)
    }

    /// Creates a model whose outputs trail its inputs by `latency` edges.
    pub fn with_latency(
        kind: NodeKind,
        generics: BTreeMap<String, i64>,
        latency: usize,
    ) -> Result<Self, SimError> {
        if latency == 0 {
            return Err(SimError::InvalidGeneric {
                name: "latency".into(),
                reason: "the node has at least one register stage".into(),
            });
        }

        let mut ports = vec![
            PortState::new_unknown("clk", PortDirection::Input, 1),
            PortState::new_unknown("rst", PortDirection::Input, 1),
        ];
        let mut bind = |spec: &PortSpec, direction| -> Result<DataPort, SimError> {
            let format = port_format(&generics, spec.generic_prefix)?;
            let id = SimSignalId::from_raw(ports.len() as u32);
            ports.push(PortState::new_unknown(spec.port, direction, format.width()));
            Ok(DataPort { id, spec: format })
        };
        let inputs = kind
            .input_ports()
            .iter()
            .map(|p| bind(p, PortDirection::Input))
            .collect::<Result<Vec<_>, _>>()?;
        let outputs = kind
            .output_ports()
            .iter()
            .map(|p| bind(p, PortDirection::Output))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            kind,
            name: kind.toplevel().to_string(),
            generics,
            ports,
            clk: SimSignalId::from_raw(0),
            rst: SimSignalId::from_raw(1),
            inputs,
            outputs,
            pipeline: std::iter::repeat_with(|| None).take(latency - 1).collect(),
            latency,
            period: None,
            next_edge: SimTime::zero(),
            cycle: None,
            faults: Vec::new(),
            recorder: None,
        })
    }

    /// The modeled entity.
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Pipeline depth in edges.
    pub fn latency(&self) -> usize {
        self.latency
    }

    /// Cycles elapsed since reset was released, if it has been.
    pub fn cycle(&self) -> Option<u64> {
        self.cycle
    }

    /// Schedules a bit flip on an output register.
    pub fn inject_fault(&mut self, fault: BitFlip) -> Result<(), SimError> {
        let id = self.port(&fault.port).ok_or_else(|| SimError::InvalidPortRef {
            reason: format!("no port named '{}'", fault.port),
        })?;
        let state = &self.ports[id.as_raw() as usize];
        if state.direction != PortDirection::Output {
            return Err(SimError::InvalidPortRef {
                reason: format!("faults can only be injected on outputs, '{}' is an input", fault.port),
            });
        }
        if fault.bit >= state.width {
            return Err(SimError::InvalidPortRef {
                reason: format!(
                    "bit {} is out of range for '{}' ({} bits)",
                    fault.bit, fault.port, state.width
                ),
            });
        }
        self.faults.push(fault);
        Ok(())
    }

    /// Attaches a waveform recorder and declares every port in it.
    pub fn set_recorder(&mut self, mut recorder: Box<dyn WaveformRecorder>) -> Result<(), SimError> {
        recorder.begin_scope(&self.name)?;
        for (index, state) in self.ports.iter().enumerate() {
            recorder.register_port(SimSignalId::from_raw(index as u32), &state.name, state.width)?;
        }
        recorder.end_scope()?;
        self.recorder = Some(recorder);
        Ok(())
    }

    fn state(&self, id: SimSignalId) -> Result<&PortState, SimError> {
        self.ports
            .get(id.as_raw() as usize)
            .ok_or_else(|| SimError::InvalidPortRef {
                reason: format!("port handle {} does not belong to {}", id.as_raw(), self.name),
            })
    }

    fn set_port(&mut self, id: SimSignalId, value: LogicVec) {
        self.ports[id.as_raw() as usize].value = value;
    }

    /// Decodes the values currently driven on the data inputs.
    fn capture_inputs(&self) -> Option<Vec<FixedPoint>> {
        self.inputs
            .iter()
            .map(|input| {
                let bits = self.ports[input.id.as_raw() as usize].value.to_biguint()?;
                FixedPoint::from_bits(&bits, input.spec).ok()
            })
            .collect()
    }

    /// Updates every register as the rising edge does.
    fn clock_registers(&mut self) {
        if self.ports[self.rst.as_raw() as usize].value.get(0) == Logic::One {
            self.cycle = None;
            let zeros: Vec<FixedPoint> = self.inputs.iter().map(|p| FixedPoint::zero(p.spec)).collect();
            self.pipeline = std::iter::repeat_with(|| Some(zeros.clone()))
                .take(self.latency - 1)
                .collect();
            for output in self.outputs.clone() {
                self.set_port(output.id, LogicVec::new(output.spec.width()));
            }
            return;
        }

        let cycle = self.cycle.map_or(0, |c| c + 1);
        self.cycle = Some(cycle);

        let captured = self.capture_inputs();
        self.pipeline.push_back(captured);
        let operands = self.pipeline.pop_front().flatten();

        let results = operands.map(|ops| self.kind.datapath(&ops));
        for (index, output) in self.outputs.clone().into_iter().enumerate() {
            let width = output.spec.width();
            let mut value = match &results {
                Some(results) => {
                    let casted = results[index].cast(output.spec, Quantization::Convergent, Overflow::Saturate);
                    LogicVec::from_biguint(&casted.to_bits(), width)
                }
                None => LogicVec::filled(width, Logic::X),
            };
            let port_name = &self.ports[output.id.as_raw() as usize].name;
            for fault in self.faults.iter().filter(|f| f.cycle == cycle && &f.port == port_name) {
                value = value.with_flipped_bit(fault.bit);
            }
            self.set_port(output.id, value);
        }
    }

    /// Writes every port that changed since the last sample.
    fn record(&mut self, time: SimTime) -> Result<(), SimError> {
        let Some(recorder) = self.recorder.as_mut() else {
            return Ok(());
        };
        for (index, state) in self.ports.iter_mut().enumerate() {
            if state.changed() {
                recorder.record_change(time, SimSignalId::from_raw(index as u32), &state.value)?;
                state.previous_value = Some(state.value.clone());
            }
        }
        Ok(())
    }
}

/// Reads the format of a port from its two width generics.
fn port_format(generics: &BTreeMap<String, i64>, prefix: &str) -> Result<BitWidthSpec, SimError> {
    let lookup = |name: String| {
        generics
            .get(&name)
            .copied()
            .ok_or(SimError::MissingGeneric(name))
    };
    let int_bits = lookup(integer_width_generic(prefix))?;
    let frac_bits = lookup(decimal_width_generic(prefix))?;
    BitWidthSpec::new(int_bits, frac_bits).map_err(|e| SimError::InvalidGeneric {
        name: format!("{prefix}_*_WIDTH"),
        reason: e.to_string(),
    })
}

impl Device for NodeModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn port(&self, name: &str) -> Option<SimSignalId> {
        self.ports
            .iter()
            .position(|p| p.name == name)
            .map(|i| SimSignalId::from_raw(i as u32))
    }

    fn port_width(&self, port: SimSignalId) -> Result<u32, SimError> {
        Ok(self.state(port)?.width)
    }

    fn generic(&self, name: &str) -> Option<i64> {
        self.generics.get(name).copied()
    }

    fn drive(&mut self, port: SimSignalId, value: LogicVec) -> Result<(), SimError> {
        let state = self.state(port)?;
        if state.direction != PortDirection::Input || port == self.clk {
            return Err(SimError::NotAnInput {
                port: state.name.clone(),
            });
        }
        if state.width != value.width() {
            return Err(SimError::WidthMismatch {
                port: state.name.clone(),
                expected: state.width,
                actual: value.width(),
            });
        }
        self.set_port(port, value);
        Ok(())
    }

    fn sample(&self, port: SimSignalId) -> Result<LogicVec, SimError> {
        Ok(self.state(port)?.value.clone())
    }
}

impl SyncClock for NodeModel {
    fn start_clock(&mut self, period: SimTime) -> Result<(), SimError> {
        if period.fs == 0 {
            return Err(SimError::ZeroPeriod);
        }
        self.period = Some(period);
        self.next_edge = self.next_edge.after(SimTime::from_fs(period.fs / 2));
        self.set_port(self.clk, LogicVec::new(1));
        Ok(())
    }

    fn rising_edge(&mut self) -> Result<SimTime, SimError> {
        let period = self.period.ok_or(SimError::ClockNotRunning)?;
        let edge = self.next_edge;

        // Inputs driven during the cycle show up at the falling edge.
        self.record(SimTime::from_fs(edge.fs.saturating_sub(period.fs / 2)))?;

        self.clock_registers();
        self.set_port(self.clk, LogicVec::from_u64(1, 1));
        self.record(edge)?;
        self.set_port(self.clk, LogicVec::new(1));

        self.next_edge = edge.after(period);
        Ok(edge)
    }

    fn set_reset(&mut self, asserted: bool) -> Result<(), SimError> {
        self.set_port(self.rst, LogicVec::filled(1, Logic::from_bool(asserted)));
        Ok(())
    }

    fn stop_clock(&mut self) -> Result<(), SimError> {
        let Some(period) = self.period.take() else {
            return Ok(());
        };
        let last_fall = SimTime::from_fs(self.next_edge.fs.saturating_sub(period.fs / 2));
        self.record(last_fall)?;
        if let Some(recorder) = self.recorder.as_mut() {
            recorder.finalize()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(kind: NodeKind) -> NodeModel {
        NodeModel::new(kind, kind.generics((4, 4), (8, 8))).unwrap()
    }

    fn drive_inputs(m: &mut NodeModel, values: [f64; 3]) {
        let spec = BitWidthSpec::new(4, 4).unwrap();
        for (p, v) in NODE_INPUTS.iter().zip(values) {
            let id = m.port(p.port).unwrap();
            let bits = FixedPoint::from_f64(v, spec).unwrap().to_bits();
            m.drive(id, LogicVec::from_biguint(&bits, 8)).unwrap();
        }
    }

    fn output(m: &NodeModel, name: &str) -> Option<f64> {
        let id = m.port(name).unwrap();
        let bits = m.sample(id).unwrap().to_biguint()?;
        let spec = BitWidthSpec::new(8, 8).unwrap();
        Some(FixedPoint::from_bits(&bits, spec).unwrap().to_f64())
    }

    fn reset(m: &mut NodeModel) {
        drive_inputs(m, [0.0; 3]);
        m.set_reset(true).unwrap();
        m.start_clock(SimTime::from_ns(10)).unwrap();
        m.rising_edge().unwrap();
        m.set_reset(false).unwrap();
    }

    #[test]
    fn generics_cover_every_port() {
        let g = NodeKind::B.generics((4, 2), (8, 6));
        assert_eq!(g.len(), 10);
        assert_eq!(g["NW_INTEGER_WIDTH"], 4);
        assert_eq!(g["N_DECIMAL_WIDTH"], 6);
        assert!(!g.contains_key("SE_INTEGER_WIDTH"));
    }

    #[test]
    fn parse_kind() {
        assert_eq!("A".parse::<NodeKind>().unwrap(), NodeKind::A);
        assert_eq!("b".parse::<NodeKind>().unwrap(), NodeKind::B);
        assert!("c".parse::<NodeKind>().is_err());
        assert_eq!(NodeKind::B.to_string(), "b");
    }

    #[test]
    fn port_widths_follow_generics() {
        let m = model(NodeKind::A);
        let out = m.port("data_out_n").unwrap();
        assert_eq!(m.port_width(out).unwrap(), 16);
        assert_eq!(m.port_width(m.port("data_in_nw").unwrap()).unwrap(), 8);
        assert_eq!(m.generic("SE_DECIMAL_WIDTH"), Some(8));
        assert_eq!(m.generic("FOO"), None);
    }

    #[test]
    fn missing_generic_is_reported() {
        let mut g = NodeKind::A.generics((4, 4), (8, 8));
        g.remove("S_DECIMAL_WIDTH");
        let err = NodeModel::new(NodeKind::A, g).err().unwrap();
        assert!(matches!(err, SimError::MissingGeneric(ref n) if n == "S_DECIMAL_WIDTH"));
    }

    #[test]
    fn invalid_generic_is_reported() {
        let g = NodeKind::A.generics((0, 4), (8, 8));
        let err = NodeModel::new(NodeKind::A, g).err().unwrap();
        assert!(matches!(err, SimError::InvalidGeneric { .. }));
    }

    #[test]
    fn outputs_unknown_before_reset() {
        let m = model(NodeKind::A);
        assert_eq!(output(&m, "data_out_n"), None);
    }

    #[test]
    fn reset_clears_outputs() {
        let mut m = model(NodeKind::A);
        reset(&mut m);
        assert_eq!(output(&m, "data_out_se"), Some(0.0));
        assert_eq!(output(&m, "data_out_n"), Some(0.0));
        assert_eq!(m.cycle(), None);
    }

    #[test]
    fn node_a_latency_three() {
        let mut m = model(NodeKind::A);
        reset(&mut m);
        m.rising_edge().unwrap(); // cycle 0
        drive_inputs(&mut m, [1.5, 2.0, 0.25]);
        m.rising_edge().unwrap(); // cycle 1: captured
        assert_eq!(output(&m, "data_out_n"), Some(0.0));
        m.rising_edge().unwrap(); // cycle 2
        assert_eq!(output(&m, "data_out_n"), Some(0.0));
        m.rising_edge().unwrap(); // cycle 3: visible
        assert_eq!(m.cycle(), Some(3));
        assert_eq!(output(&m, "data_out_se"), Some(1.5));
        assert_eq!(output(&m, "data_out_sw"), Some(2.0));
        assert_eq!(output(&m, "data_out_n"), Some(3.25));
    }

    #[test]
    fn node_b_datapath() {
        let mut m = model(NodeKind::B);
        reset(&mut m);
        drive_inputs(&mut m, [1.0, 1.0, 0.0]);
        for _ in 0..3 {
            m.rising_edge().unwrap();
        }
        assert_eq!(output(&m, "data_out_sw"), Some(-1.0));
        assert_eq!(output(&m, "data_out_n"), Some(-1.0));
    }

    #[test]
    fn shallower_pipeline() {
        let mut m = NodeModel::with_latency(NodeKind::B, NodeKind::B.generics((4, 4), (8, 8)), 1).unwrap();
        reset(&mut m);
        drive_inputs(&mut m, [2.0, 0.5, 1.0]);
        m.rising_edge().unwrap();
        assert_eq!(output(&m, "data_out_sw"), Some(-1.0));
        assert_eq!(output(&m, "data_out_n"), Some(-1.0));
        assert!(NodeModel::with_latency(NodeKind::B, NodeKind::B.generics((4, 4), (8, 8)), 0).is_err());
    }

    #[test]
    fn unknown_inputs_propagate_as_x() {
        let mut m = model(NodeKind::A);
        m.set_reset(true).unwrap();
        m.start_clock(SimTime::from_ns(10)).unwrap();
        m.rising_edge().unwrap();
        m.set_reset(false).unwrap();
        for _ in 0..3 {
            m.rising_edge().unwrap();
        }
        // The data inputs were never driven.
        let id = m.port("data_out_n").unwrap();
        assert!(m.sample(id).unwrap().has_unknown());
    }

    #[test]
    fn injected_fault_flips_one_cycle() {
        let mut m = model(NodeKind::A);
        m.inject_fault(BitFlip {
            cycle: 1,
            port: "data_out_se".into(),
            bit: 0,
        })
        .unwrap();
        reset(&mut m);
        drive_inputs(&mut m, [0.0, 0.0, 0.0]);
        m.rising_edge().unwrap();
        assert_eq!(output(&m, "data_out_se"), Some(0.0));
        m.rising_edge().unwrap();
        assert_eq!(output(&m, "data_out_se"), Some(1.0 / 256.0));
        m.rising_edge().unwrap();
        assert_eq!(output(&m, "data_out_se"), Some(0.0));
    }

    #[test]
    fn fault_validation() {
        let mut m = model(NodeKind::B);
        let bad_port = BitFlip {
            cycle: 0,
            port: "data_out_se".into(),
            bit: 0,
        };
        assert!(m.inject_fault(bad_port).is_err());
        let input = BitFlip {
            cycle: 0,
            port: "data_in_s".into(),
            bit: 0,
        };
        assert!(m.inject_fault(input).is_err());
        let wide = BitFlip {
            cycle: 0,
            port: "data_out_n".into(),
            bit: 16,
        };
        assert!(m.inject_fault(wide).is_err());
    }

    #[test]
    fn drive_checks() {
        let mut m = model(NodeKind::A);
        let out = m.port("data_out_n").unwrap();
        assert!(matches!(
            m.drive(out, LogicVec::new(16)),
            Err(SimError::NotAnInput { .. })
        ));
        let clk = m.port("clk").unwrap();
        assert!(matches!(
            m.drive(clk, LogicVec::new(1)),
            Err(SimError::NotAnInput { .. })
        ));
        let input = m.port("data_in_s").unwrap();
        assert!(matches!(
            m.drive(input, LogicVec::new(4)),
            Err(SimError::WidthMismatch { expected: 8, actual: 4, .. })
        ));
        assert!(m.sample(SimSignalId::from_raw(99)).is_err());
    }

    #[test]
    fn clock_timing() {
        let mut m = model(NodeKind::A);
        assert!(matches!(m.rising_edge(), Err(SimError::ClockNotRunning)));
        assert!(matches!(m.start_clock(SimTime::zero()), Err(SimError::ZeroPeriod)));
        m.start_clock(SimTime::from_ns(10)).unwrap();
        assert_eq!(m.rising_edge().unwrap(), SimTime::from_ns(5));
        assert_eq!(m.rising_edge().unwrap(), SimTime::from_ns(15));
        m.stop_clock().unwrap();
        assert!(matches!(m.rising_edge(), Err(SimError::ClockNotRunning)));
    }

    #[test]
    fn waveform_records_ports() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("node.vcd");
        let file = std::fs::File::create(&path).unwrap();

        let mut m = model(NodeKind::B);
        m.set_recorder(Box::new(crate::VcdRecorder::new(std::io::BufWriter::new(file))))
            .unwrap();
        reset(&mut m);
        m.rising_edge().unwrap();
        m.stop_clock().unwrap();

        let vcd = std::fs::read_to_string(&path).unwrap();
        assert!(vcd.contains("$scope module processor_node_b $end"));
        assert!(vcd.contains("data_out_sw"));
        assert!(vcd.contains("#5000000"));
        assert!(vcd.contains("#15000000"));
    }
}
