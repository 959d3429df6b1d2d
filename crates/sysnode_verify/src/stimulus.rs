//! Randomized operand sequences.
//!
//! Each input channel gets an independent sequence of values drawn uniformly
//! over every raw code its format can represent, so both extremes and zero are
//! as likely as any other value.

use num_bigint::{BigInt, RandBigInt};
use rand::Rng;
use sysnode_common::{BitWidthSpec, FixedPoint};

use crate::error::VerifyError;

/// Per-channel operand values, one tuple per cycle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StimulusSequence {
    channels: Vec<Vec<FixedPoint>>,
}

impl StimulusSequence {
    /// Draws `len` values for each channel format.
    pub fn generate<R: Rng + ?Sized>(
        specs: &[BitWidthSpec],
        len: usize,
        rng: &mut R,
    ) -> Result<Self, VerifyError> {
        let channels = specs
            .iter()
            .map(|&spec| {
                let low = spec.min_raw();
                let high = spec.max_raw() + BigInt::from(1);
                (0..len)
                    .map(|_| random_value(rng, &low, &high, spec))
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { channels })
    }

    /// Wraps explicit per-channel values. All channels must have the same length.
    pub fn from_channels(channels: Vec<Vec<FixedPoint>>) -> Result<Self, VerifyError> {
        if let Some(first) = channels.first() {
            if let Some(bad) = channels.iter().position(|c| c.len() != first.len()) {
                return Err(VerifyError::Configuration(format!(
                    "stimulus channel {bad} has {} values, channel 0 has {}",
                    channels[bad].len(),
                    first.len()
                )));
            }
        }
        Ok(Self { channels })
    }

    /// Repeats one operand tuple `len` times.
    pub fn constant(tuple: &[FixedPoint], len: usize) -> Self {
        Self {
            channels: tuple.iter().map(|v| vec![v.clone(); len]).collect(),
        }
    }

    /// Number of tuples.
    pub fn len(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }

    /// Returns `true` if there are no tuples.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of channels.
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// All values of one channel.
    pub fn channel(&self, index: usize) -> &[FixedPoint] {
        &self.channels[index]
    }

    /// The operand tuple applied in cycle `n`.
    pub fn tuple(&self, n: usize) -> Vec<FixedPoint> {
        self.channels.iter().map(|c| c[n].clone()).collect()
    }
}

fn random_value<R: Rng + ?Sized>(
    rng: &mut R,
    low: &BigInt,
    high: &BigInt,
    spec: BitWidthSpec,
) -> Result<FixedPoint, VerifyError> {
    let raw = rng.gen_bigint_range(low, high);
    FixedPoint::from_raw(raw, spec)
        .map_err(|e| VerifyError::Configuration(format!("stimulus for {spec}: {e}")))
}
