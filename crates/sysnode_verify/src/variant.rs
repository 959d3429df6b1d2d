//! The capability set every node variant implements, and channel binding.
//!
//! A [`NodeVariant`] describes one hardware node from the test bench's point
//! of view: which ports carry operands and results, how their formats are read
//! from the device's generics, and the exact arithmetic the node is supposed to
//! perform. The stimulus generator, cast stage and driver only ever see this
//! trait, so supporting a new node means implementing it once.

use sysnode_common::{BitWidthSpec, FixedPoint};
use sysnode_sim::model::{decimal_width_generic, integer_width_generic};
use sysnode_sim::{Device, PortDirection, PortSpec, SimSignalId};

use crate::error::VerifyError;

/// Capabilities of a processor-node variant.
pub trait NodeVariant {
    /// Entity name of the node, used to label diagnostics.
    fn name(&self) -> &str;

    /// Input ports in operand order.
    fn input_ports(&self) -> &[PortSpec];

    /// Formats of the input ports, read from the device's generics.
    fn input_widths(&self, dut: &dyn Device) -> Result<Vec<BitWidthSpec>, VerifyError>;

    /// Output ports in result order.
    fn output_ports(&self) -> &[PortSpec];

    /// Formats of the output ports, read from the device's generics.
    fn output_widths(&self, dut: &dyn Device) -> Result<Vec<BitWidthSpec>, VerifyError>;

    /// Exact results for one operand tuple, one per output port.
    fn reference(&self, inputs: &[FixedPoint]) -> Vec<FixedPoint>;
}

/// Reads each port's `<PREFIX>_INTEGER_WIDTH` and `<PREFIX>_DECIMAL_WIDTH` generics.
pub fn widths_from_generics(
    dut: &dyn Device,
    ports: &[PortSpec],
) -> Result<Vec<BitWidthSpec>, VerifyError> {
    ports
        .iter()
        .map(|port| {
            let read = |name: String| {
                dut.generic(&name).ok_or_else(|| {
                    VerifyError::Configuration(format!("{} has no generic '{name}'", dut.name()))
                })
            };
            let int_bits = read(integer_width_generic(port.generic_prefix))?;
            let frac_bits = read(decimal_width_generic(port.generic_prefix))?;
            BitWidthSpec::new(int_bits, frac_bits).map_err(|e| {
                VerifyError::Configuration(format!("port '{}' of {}: {e}", port.port, dut.name()))
            })
        })
        .collect()
}

/// A device port bound to its format for the duration of a test.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Channel {
    /// Port name.
    pub name: String,
    /// Whether the bench drives or samples the port.
    pub direction: PortDirection,
    /// Resolved port handle.
    pub port: SimSignalId,
    /// Fixed-point format of the values on the port.
    pub spec: BitWidthSpec,
}

/// The channels of one test instance.
#[derive(Clone, Debug)]
pub struct Bindings {
    /// Operand channels in operand order.
    pub inputs: Vec<Channel>,
    /// Result channels in result order.
    pub outputs: Vec<Channel>,
}

impl Bindings {
    /// Formats of the input channels.
    pub fn input_specs(&self) -> Vec<BitWidthSpec> {
        self.inputs.iter().map(|c| c.spec).collect()
    }
}

/// Resolves a variant's ports on a device and checks their widths.
pub fn bind<V: NodeVariant + ?Sized>(dut: &dyn Device, variant: &V) -> Result<Bindings, VerifyError> {
    let input_specs = variant.input_widths(dut)?;
    let output_specs = variant.output_widths(dut)?;
    Ok(Bindings {
        inputs: bind_channels(dut, variant.input_ports(), &input_specs, PortDirection::Input)?,
        outputs: bind_channels(dut, variant.output_ports(), &output_specs, PortDirection::Output)?,
    })
}

fn bind_channels(
    dut: &dyn Device,
    ports: &[PortSpec],
    specs: &[BitWidthSpec],
    direction: PortDirection,
) -> Result<Vec<Channel>, VerifyError> {
    if ports.len() != specs.len() {
        return Err(VerifyError::Configuration(format!(
            "{} ports but {} formats",
            ports.len(),
            specs.len()
        )));
    }
    ports
        .iter()
        .zip(specs)
        .map(|(port, &spec)| {
            let handle = dut.port(port.port).ok_or_else(|| {
                VerifyError::Configuration(format!("{} has no port '{}'", dut.name(), port.port))
            })?;
            let width = dut.port_width(handle)?;
            if width != spec.width() {
                return Err(VerifyError::Configuration(format!(
                    "port '{}' is {width} bits wide but its generics describe {spec}",
                    port.port
                )));
            }
            Ok(Channel {
                name: port.port.to_string(),
                direction,
                port: handle,
                spec,
            })
        })
        .collect()
}
