//! Node B: negated product and a squared-operand update, as used by the
//! diagonal cells of the Cholesky array.

use sysnode_common::{BitWidthSpec, FixedPoint};
use sysnode_sim::{Device, NodeKind, PortSpec};

use crate::error::VerifyError;
use crate::variant::{widths_from_generics, NodeVariant};

/// `(a, b, c) -> (-(a*b), c - a^2*b)`.
#[derive(Clone, Copy, Debug, Default)]
pub struct NodeB;

impl NodeVariant for NodeB {
    fn name(&self) -> &str {
        "processor_node_b"
    }

    fn input_ports(&self) -> &[PortSpec] {
        NodeKind::B.input_ports()
    }

    fn input_widths(&self, dut: &dyn Device) -> Result<Vec<BitWidthSpec>, VerifyError> {
        widths_from_generics(dut, NodeKind::B.input_ports())
    }

    fn output_ports(&self) -> &[PortSpec] {
        NodeKind::B.output_ports()
    }

    fn output_widths(&self, dut: &dyn Device) -> Result<Vec<BitWidthSpec>, VerifyError> {
        widths_from_generics(dut, NodeKind::B.output_ports())
    }

    fn reference(&self, inputs: &[FixedPoint]) -> Vec<FixedPoint> {
        let [a, b, c] = inputs else {
            return Vec::new();
        };
        vec![-(a * b), c - &(&a.pow(2) * b)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sysnode_sim::NodeModel;

    fn fx(v: f64) -> FixedPoint {
        FixedPoint::from_f64(v, BitWidthSpec::new(8, 8).unwrap()).unwrap()
    }

    #[test]
    fn unit_operands() {
        let out = NodeB.reference(&[fx(1.0), fx(1.0), fx(0.0)]);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].to_f64(), -1.0);
        assert_eq!(out[1].to_f64(), -1.0);
    }

    #[test]
    fn fractional_operands() {
        let out = NodeB.reference(&[fx(-0.5), fx(3.0), fx(2.25)]);
        assert_eq!(out[0].to_f64(), 1.5);
        assert_eq!(out[1].to_f64(), 1.5);
    }

    #[test]
    fn ports_exist_on_the_model() {
        let model = NodeModel::new(NodeKind::B, NodeKind::B.generics((4, 4), (8, 8))).unwrap();
        let ports = NodeB.input_ports().iter().chain(NodeB.output_ports());
        for spec in ports {
            assert!(model.port(spec.port).is_some(), "missing {}", spec.port);
        }
        assert_eq!(NodeB.output_ports().len(), 2);
    }
}
