//! Node A: passes its operands through and accumulates their product.

use sysnode_common::{BitWidthSpec, FixedPoint};
use sysnode_sim::{Device, NodeKind, PortSpec};

use crate::error::VerifyError;
use crate::variant::{widths_from_generics, NodeVariant};

/// `(a, b, c) -> (a, b, c + a*b)`.
#[derive(Clone, Copy, Debug, Default)]
pub struct NodeA;

impl NodeVariant for NodeA {
    fn name(&self) -> &str {
        "processor_node_a"
    }

    fn input_ports(&self) -> &[PortSpec] {
        NodeKind::A.input_ports()
    }

    fn input_widths(&self, dut: &dyn Device) -> Result<Vec<BitWidthSpec>, VerifyError> {
        widths_from_generics(dut, NodeKind::A.input_ports())
    }

    fn output_ports(&self) -> &[PortSpec] {
        NodeKind::A.output_ports()
    }

    fn output_widths(&self, dut: &dyn Device) -> Result<Vec<BitWidthSpec>, VerifyError> {
        widths_from_generics(dut, NodeKind::A.output_ports())
    }

    fn reference(&self, inputs: &[FixedPoint]) -> Vec<FixedPoint> {
        let [a, b, c] = inputs else {
            return Vec::new();
        };
        vec![a.clone(), b.clone(), c + &(a * b)]
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
    fn reference_is_exact() {
        let out = NodeA.reference(&[fx(1.5), fx(2.0), fx(0.25)]);
        assert_eq!(out.len(), 3);
        assert_eq!(out[0].to_f64(), 1.5);
        assert_eq!(out[1].to_f64(), 2.0);
        assert_eq!(out[2].to_f64(), 3.25);
    }

    #[test]
    fn accumulation_widens() {
        let max = FixedPoint::max_value(BitWidthSpec::new(4, 4).unwrap());
        let out = NodeA.reference(&[max.clone(), max.clone(), max.clone()]);
        // 7.9375^2 + 7.9375 does not fit fixed(4, 4) but is exact here.
        assert_eq!(out[2].to_f64(), 7.9375 * 7.9375 + 7.9375);
    }

    #[test]
    fn wrong_arity_yields_nothing() {
        assert!(NodeA.reference(&[fx(1.0)]).is_empty());
    }

    #[test]
    fn ports_exist_on_the_model() {
        let model = NodeModel::new(NodeKind::A, NodeKind::A.generics((4, 4), (8, 8))).unwrap();
        let ports = NodeA.input_ports().iter().chain(NodeA.output_ports());
        for spec in ports {
            assert!(model.port(spec.port).is_some(), "missing {}", spec.port);
        }
        assert_eq!(NodeA.output_ports().len(), 3);
    }
}
