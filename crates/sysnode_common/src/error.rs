//! Error types for fixed-point construction and conversion.

use num_bigint::BigInt;

/// Errors raised when a bit-width specification or fixed-point value cannot be built.
///
/// Arithmetic on already-valid values never fails: exact operations widen their
/// result instead, and casts saturate or wrap as requested.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FixedPointError {
    /// The integer part must hold at least the sign bit.
    #[error("integer bit count must be at least 1, got {0}")]
    IntegerBits(i64),

    /// The fractional part cannot be negative.
    #[error("fractional bit count must not be negative, got {0}")]
    FractionalBits(i64),

    /// The requested width does not fit the supported range.
    #[error("bit count {0} is too large")]
    TooWide(i64),

    /// A raw integer lies outside the range representable by its specification.
    #[error("raw value {raw} is outside the range of {spec}")]
    OutOfRange {
        /// The offending raw value.
        raw: BigInt,
        /// Display form of the target specification.
        spec: String,
    },

    /// A bit pattern is wider than the specification it is decoded against.
    #[error("bit pattern of {bits} bits does not fit in a {width}-bit value")]
    PatternTooWide {
        /// Significant bits in the pattern.
        bits: u64,
        /// Total width of the specification.
        width: u32,
    },

    /// NaN and infinities have no fixed-point representation.
    #[error("cannot represent non-finite value {0}")]
    NonFinite(f64),
}
