//! Configuration types deserialized from `sysnode.toml`.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::str::FromStr;

use sysnode_sim::{NodeKind, SimTime, DEFAULT_LATENCY};

/// The top-level configuration parsed from `sysnode.toml`.
///
/// Every section is optional; an empty file describes a 100-event run of
/// node A with 8.8-bit inputs and 16.16-bit outputs.
#[derive(Debug, Default, Deserialize)]
pub struct SysnodeConfig {
    /// Which node to verify and how deep its model pipeline is.
    #[serde(default)]
    pub node: NodeConfig,
    /// Device generics, name to value. Empty means the default grid point.
    #[serde(default)]
    pub generics: BTreeMap<String, i64>,
    /// Settings of a single run.
    #[serde(default)]
    pub run: RunConfig,
    /// Bit-width grid for sweeps.
    #[serde(default)]
    pub sweep: SweepConfig,
}

impl SysnodeConfig {
    /// The generics for a single run of `variant`: the `[generics]` table, or
    /// the default grid point of that variant when the table is empty.
    ///
    /// Takes the variant explicitly because the command line may override
    /// `node.variant`.
    pub fn run_generics(&self, variant: Variant) -> BTreeMap<String, i64> {
        if self.generics.is_empty() {
            SweepPoint::DEFAULT.generics(variant.kind())
        } else {
            self.generics.clone()
        }
    }
}

/// The node under test.
#[derive(Debug, Deserialize)]
pub struct NodeConfig {
    /// Node variant.
    #[serde(default)]
    pub variant: Variant,
    /// Register stages of the behavioral model.
    #[serde(default = "default_latency")]
    pub latency: usize,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            variant: Variant::default(),
            latency: DEFAULT_LATENCY,
        }
    }
}

fn default_latency() -> usize {
    DEFAULT_LATENCY
}

/// Processor-node variant name.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// `processor_node_a`.
    #[default]
    #[serde(alias = "A")]
    A,
    /// `processor_node_b`.
    #[serde(alias = "B")]
    B,
}

impl Variant {
    /// The model kind for this variant.
    pub fn kind(self) -> NodeKind {
        match self {
            Variant::A => NodeKind::A,
            Variant::B => NodeKind::B,
        }
    }
}

impl FromStr for Variant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.parse::<NodeKind>()? {
            NodeKind::A => Ok(Variant::A),
            NodeKind::B => Ok(Variant::B),
        }
    }
}

/// Settings of a single verification run.
#[derive(Debug, Deserialize)]
pub struct RunConfig {
    /// Number of operand tuples whose results are checked.
    #[serde(default = "default_events")]
    pub events: usize,
    /// Stimulus seed; drawn at random when absent.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Clock period as a duration string (e.g., `"10ns"`).
    #[serde(default = "default_clock_period")]
    pub clock_period: String,
    /// Path of a VCD file to record.
    #[serde(default)]
    pub waveform: Option<PathBuf>,
}

impl RunConfig {
    /// The parsed clock period.
    ///
    /// Only fails on configurations that skipped validation.
    pub fn clock_period(&self) -> Result<SimTime, sysnode_sim::SimError> {
        self.clock_period.parse()
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            events: default_events(),
            seed: None,
            clock_period: default_clock_period(),
            waveform: None,
        }
    }
}

fn default_events() -> usize {
    100
}

fn default_clock_period() -> String {
    "10ns".to_string()
}

/// Grid of bit-width configurations.
///
/// Inputs take every `(input_int, input_frac)` pair; outputs scale the input
/// widths by every `(output_int_scale, output_frac_scale)` pair, so that the
/// exact results of the node always fit.
#[derive(Debug, Deserialize)]
pub struct SweepConfig {
    /// Integer widths of the inputs.
    #[serde(default = "default_widths", deserialize_with = "deserialize_int_or_vec")]
    pub input_int: Vec<i64>,
    /// Fractional widths of the inputs.
    #[serde(default = "default_widths", deserialize_with = "deserialize_int_or_vec")]
    pub input_frac: Vec<i64>,
    /// Factors applied to the input integer width to get the output's.
    #[serde(default = "default_scales", deserialize_with = "deserialize_int_or_vec")]
    pub output_int_scale: Vec<i64>,
    /// Factors applied to the input fractional width to get the output's.
    #[serde(default = "default_scales", deserialize_with = "deserialize_int_or_vec")]
    pub output_frac_scale: Vec<i64>,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            input_int: default_widths(),
            input_frac: default_widths(),
            output_int_scale: default_scales(),
            output_frac_scale: default_scales(),
        }
    }
}

fn default_widths() -> Vec<i64> {
    vec![4, 8, 16, 32]
}

fn default_scales() -> Vec<i64> {
    vec![2, 3]
}

impl SweepConfig {
    /// Every point of the grid, inputs varying slowest.
    pub fn points(&self) -> Vec<SweepPoint> {
        let mut points = Vec::new();
        for &input_int in &self.input_int {
            for &input_frac in &self.input_frac {
                for &int_scale in &self.output_int_scale {
                    for &frac_scale in &self.output_frac_scale {
                        points.push(SweepPoint {
                            input_int,
                            input_frac,
                            output_int: input_int * int_scale,
                            output_frac: input_frac * frac_scale,
                        });
                    }
                }
            }
        }
        points
    }
}

/// One bit-width configuration: a format for all inputs and one for all outputs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SweepPoint {
    /// Input integer bits.
    pub input_int: i64,
    /// Input fractional bits.
    pub input_frac: i64,
    /// Output integer bits.
    pub output_int: i64,
    /// Output fractional bits.
    pub output_frac: i64,
}

impl SweepPoint {
    /// 8.8-bit inputs, 16.16-bit outputs.
    pub const DEFAULT: SweepPoint = SweepPoint {
        input_int: 8,
        input_frac: 8,
        output_int: 16,
        output_frac: 16,
    };

    /// The generic map of `kind` for this point.
    pub fn generics(&self, kind: NodeKind) -> BTreeMap<String, i64> {
        kind.generics(
            (self.input_int, self.input_frac),
            (self.output_int, self.output_frac),
        )
    }

    /// Short label such as `8.8->16.24`.
    pub fn label(&self) -> String {
        format!(
            "{}.{}->{}.{}",
            self.input_int, self.input_frac, self.output_int, self.output_frac
        )
    }
}

/// Deserializes a field that can be either a single integer or a list of integers.
///
/// Allows `input_int = 8` as shorthand for `input_int = [8]`.
fn deserialize_int_or_vec<'de, D>(deserializer: D) -> Result<Vec<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    struct IntOrVec;

    impl<'de> Visitor<'de> for IntOrVec {
        type Value = Vec<i64>;

        fn expecting(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            formatter.write_str("an integer or a list of integers")
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            Ok(vec![v])
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            i64::try_from(v)
                .map(|v| vec![v])
                .map_err(|_| E::custom(format!("{v} is too large")))
        }

        fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
            let mut vec = Vec::new();
            while let Some(val) = seq.next_element::<i64>()? {
                vec.push(val);
            }
            Ok(vec)
        }
    }

    deserializer.deserialize_any(IntOrVec)
}
