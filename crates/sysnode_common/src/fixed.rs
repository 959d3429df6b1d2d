//! Exact signed fixed-point values with explicit quantization and overflow.
//!
//! A [`FixedPoint`] stores an arbitrary-precision raw integer together with
//! the [`BitWidthSpec`] it is interpreted under: the value is
//! `raw / 2^frac_bits`. Arithmetic is exact; every operation widens its result
//! specification far enough that no bits are lost, so rounding only ever happens
//! in an explicit [`FixedPoint::cast`].
//!
//! The default cast used against hardware outputs follows the `sfixed`
//! conventions of IEEE 1076-2008 (section G.4.4): round half to even and
//! saturate on overflow.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use num_bigint::{BigInt, BigUint, Sign};
use num_integer::Integer;
use num_traits::{One, Signed, ToPrimitive, Zero};
use serde::{Deserialize, Serialize};

use crate::error::FixedPointError;

/// Widths beyond this are rejected; they only arise from corrupt configuration.
const MAX_BITS: i64 = 1 << 16;

/// Integer/fractional bit split of a two's complement fixed-point format.
///
/// The integer part includes the sign bit. With `w = int_bits + frac_bits`,
/// the representable raw range is `[-2^(w-1), 2^(w-1) - 1]`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct BitWidthSpec {
    int_bits: u32,
    frac_bits: u32,
}

impl BitWidthSpec {
    /// Validates and creates a specification.
    ///
    /// Takes signed counts because they usually come straight from device
    /// generics, which are plain integers.
    pub fn new(int_bits: i64, frac_bits: i64) -> Result<Self, FixedPointError> {
        if int_bits < 1 {
            return Err(FixedPointError::IntegerBits(int_bits));
        }
        if frac_bits < 0 {
            return Err(FixedPointError::FractionalBits(frac_bits));
        }
        // Saturate so huge generics report as too wide instead of overflowing.
        let width = int_bits.saturating_add(frac_bits);
        if width > MAX_BITS {
            return Err(FixedPointError::TooWide(width));
        }
        Ok(Self {
            int_bits: int_bits as u32,
            frac_bits: frac_bits as u32,
        })
    }

    /// Builds a spec produced by an exact operation on already-valid specs.
    fn grown(int_bits: u32, frac_bits: u32) -> Self {
        debug_assert!(int_bits >= 1);
        Self {
            int_bits,
            frac_bits,
        }
    }

    /// Number of integer bits, sign included.
    pub fn int_bits(self) -> u32 {
        self.int_bits
    }

    /// Number of fractional bits.
    pub fn frac_bits(self) -> u32 {
        self.frac_bits
    }

    /// Total width in bits.
    pub fn width(self) -> u32 {
        self.int_bits + self.frac_bits
    }

    /// Smallest representable raw value, `-2^(w-1)`.
    pub fn min_raw(self) -> BigInt {
        -(BigInt::one() << (self.width() - 1))
    }

    /// Largest representable raw value, `2^(w-1) - 1`.
    pub fn max_raw(self) -> BigInt {
        (BigInt::one() << (self.width() - 1)) - 1
    }

    /// Returns `true` if `raw` lies within the representable range.
    pub fn contains_raw(self, raw: &BigInt) -> bool {
        *raw >= self.min_raw() && *raw <= self.max_raw()
    }
}

impl fmt::Display for BitWidthSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fixed({}, {})", self.int_bits, self.frac_bits)
    }
}

/// How bits below the target's least significant bit are discarded.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Quantization {
    /// Round toward negative infinity (drop the bits).
    Truncate,
    /// Round to nearest, ties toward positive infinity.
    RoundHalfUp,
    /// Round to nearest, ties to the even neighbor (convergent rounding).
    Convergent,
}

/// How values outside the target's range are handled.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Overflow {
    /// Clamp to the nearest representable extreme.
    Saturate,
    /// Keep the low `w` bits (two's complement wraparound).
    Wrap,
}

/// An exact fixed-point value.
///
/// Equality is structural: two values are equal when both the raw integer and
/// the specification match. Use [`FixedPoint::cmp_value`] to compare numerically
/// across specifications.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FixedPoint {
    raw: BigInt,
    spec: BitWidthSpec,
}

impl FixedPoint {
    /// Creates a value from its raw integer, checking the range.
    pub fn from_raw(raw: BigInt, spec: BitWidthSpec) -> Result<Self, FixedPointError> {
        if !spec.contains_raw(&raw) {
            return Err(FixedPointError::OutOfRange {
                raw,
                spec: spec.to_string(),
            });
        }
        Ok(Self { raw, spec })
    }

    /// The value zero in the given format.
    pub fn zero(spec: BitWidthSpec) -> Self {
        Self {
            raw: BigInt::zero(),
            spec,
        }
    }

    /// The largest representable value of `spec`.
    pub fn max_value(spec: BitWidthSpec) -> Self {
        Self {
            raw: spec.max_raw(),
            spec,
        }
    }

    /// The smallest representable value of `spec`.
    pub fn min_value(spec: BitWidthSpec) -> Self {
        Self {
            raw: spec.min_raw(),
            spec,
        }
    }

    /// Converts a binary64 value into `spec`.
    ///
    /// The float is decoded exactly (every finite `f64` is a dyadic rational)
    /// and then cast with convergent rounding and saturation.
    pub fn from_f64(value: f64, spec: BitWidthSpec) -> Result<Self, FixedPointError> {
        Ok(Self::exact_from_f64(value)?.cast(spec, Quantization::Convergent, Overflow::Saturate))
    }

    /// Decodes a finite `f64` into a value wide enough to hold it exactly.
    pub fn exact_from_f64(value: f64) -> Result<Self, FixedPointError> {
        if !value.is_finite() {
            return Err(FixedPointError::NonFinite(value));
        }
        let bits = value.to_bits();
        let negative = bits >> 63 == 1;
        let biased_exp = ((bits >> 52) & 0x7ff) as i64;
        let fraction = bits & ((1u64 << 52) - 1);
        let (mantissa, exp) = if biased_exp == 0 {
            (fraction, -1074)
        } else {
            (fraction | (1u64 << 52), biased_exp - 1075)
        };

        let mut raw = BigInt::from(mantissa);
        let frac_bits = if exp >= 0 {
            raw <<= exp as usize;
            0
        } else {
            (-exp) as u32
        };
        if negative {
            raw = -raw;
        }
        let needed = raw.bits() as u32 + 1;
        let int_bits = needed.saturating_sub(frac_bits).max(1);
        Ok(Self {
            raw,
            spec: BitWidthSpec::grown(int_bits, frac_bits),
        })
    }

    /// Decodes a two's complement bit pattern of `spec.width()` bits.
    pub fn from_bits(bits: &BigUint, spec: BitWidthSpec) -> Result<Self, FixedPointError> {
        let width = spec.width();
        if bits.bits() > u64::from(width) {
            return Err(FixedPointError::PatternTooWide {
                bits: bits.bits(),
                width,
            });
        }
        let mut raw = BigInt::from_biguint(Sign::Plus, bits.clone());
        if bits.bit(u64::from(width - 1)) {
            raw -= BigInt::one() << width;
        }
        Ok(Self { raw, spec })
    }

    /// Encodes the value as an unsigned two's complement pattern of `width()` bits.
    pub fn to_bits(&self) -> BigUint {
        let raw = if self.raw.is_negative() {
            &self.raw + (BigInt::one() << self.spec.width())
        } else {
            self.raw.clone()
        };
        // Non-negative by construction.
        raw.magnitude().clone()
    }

    /// Floating approximation, for diagnostics only.
    pub fn to_f64(&self) -> f64 {
        let raw = self.raw.to_f64().unwrap_or(f64::NAN);
        raw * 2f64.powi(-(self.spec.frac_bits as i32))
    }

    /// The raw integer, `value * 2^frac_bits`.
    pub fn raw(&self) -> &BigInt {
        &self.raw
    }

    /// The format this value is interpreted under.
    pub fn spec(&self) -> BitWidthSpec {
        self.spec
    }

    /// Returns `true` if the value is exactly zero.
    pub fn is_zero(&self) -> bool {
        self.raw.is_zero()
    }

    /// Absolute value, widened by one integer bit so `-min` stays representable.
    pub fn abs(&self) -> Self {
        Self {
            raw: self.raw.abs(),
            spec: BitWidthSpec::grown(self.spec.int_bits + 1, self.spec.frac_bits),
        }
    }

    /// Raises the value to a non-negative integer power, exactly.
    pub fn pow(&self, exp: u32) -> Self {
        if exp == 0 {
            return Self {
                raw: BigInt::one(),
                spec: BitWidthSpec::grown(2, 0),
            };
        }
        let mut acc = self.clone();
        for _ in 1..exp {
            acc = &acc * self;
        }
        acc
    }

    /// Compares the numeric values of two fixed-point numbers of any format.
    pub fn cmp_value(&self, other: &FixedPoint) -> Ordering {
        let (a, b) = aligned(self, other);
        a.cmp(&b)
    }

    /// Returns `true` if `|self - approx| * denominator > |self| * numerator`.
    ///
    /// Evaluated exactly; `exceeds_relative_error(x, 1, 100)` is the 1% test.
    pub fn exceeds_relative_error(&self, approx: &FixedPoint, numerator: u32, denominator: u32) -> bool {
        let (exact, approx) = aligned(self, approx);
        let deviation = (&exact - &approx).abs() * BigInt::from(denominator);
        deviation > exact.abs() * BigInt::from(numerator)
    }

    /// Converts to another format with the given quantization and overflow handling.
    pub fn cast(&self, target: BitWidthSpec, quantization: Quantization, overflow: Overflow) -> Self {
        let raw = requantize(&self.raw, self.spec.frac_bits, target.frac_bits, quantization);
        let raw = match overflow {
            Overflow::Saturate => raw.clamp(target.min_raw(), target.max_raw()),
            Overflow::Wrap => {
                let modulus = BigInt::one() << target.width();
                let wrapped = raw.mod_floor(&modulus);
                if wrapped > target.max_raw() {
                    wrapped - modulus
                } else {
                    wrapped
                }
            }
        };
        Self { raw, spec: target }
    }
}

/// Moves `raw` from `from` fractional bits to `to` fractional bits.
fn requantize(raw: &BigInt, from: u32, to: u32, quantization: Quantization) -> BigInt {
    if to >= from {
        return raw << (to - from);
    }
    let shift = from - to;
    let (quot, rem) = raw.div_mod_floor(&(BigInt::one() << shift));
    let half = BigInt::one() << (shift - 1);
    match quantization {
        Quantization::Truncate => quot,
        Quantization::RoundHalfUp => {
            if rem >= half {
                quot + 1
            } else {
                quot
            }
        }
        Quantization::Convergent => match rem.cmp(&half) {
            Ordering::Greater => quot + 1,
            Ordering::Less => quot,
            Ordering::Equal if quot.is_odd() => quot + 1,
            Ordering::Equal => quot,
        },
    }
}

/// Raw values of `a` and `b` scaled to a common number of fractional bits.
fn aligned(a: &FixedPoint, b: &FixedPoint) -> (BigInt, BigInt) {
    let frac = a.spec.frac_bits.max(b.spec.frac_bits);
    (
        &a.raw << (frac - a.spec.frac_bits),
        &b.raw << (frac - b.spec.frac_bits),
    )
}

impl Add for &FixedPoint {
    type Output = FixedPoint;

    fn add(self, rhs: Self) -> FixedPoint {
        let (a, b) = aligned(self, rhs);
        FixedPoint {
            raw: a + b,
            spec: BitWidthSpec::grown(
                self.spec.int_bits.max(rhs.spec.int_bits) + 1,
                self.spec.frac_bits.max(rhs.spec.frac_bits),
            ),
        }
    }
}

impl Sub for &FixedPoint {
    type Output = FixedPoint;

    fn sub(self, rhs: Self) -> FixedPoint {
        let (a, b) = aligned(self, rhs);
        FixedPoint {
            raw: a - b,
            spec: BitWidthSpec::grown(
                self.spec.int_bits.max(rhs.spec.int_bits) + 1,
                self.spec.frac_bits.max(rhs.spec.frac_bits),
            ),
        }
    }
}

impl Mul for &FixedPoint {
    type Output = FixedPoint;

    fn mul(self, rhs: Self) -> FixedPoint {
        FixedPoint {
            raw: &self.raw * &rhs.raw,
            spec: BitWidthSpec::grown(
                self.spec.int_bits + rhs.spec.int_bits,
                self.spec.frac_bits + rhs.spec.frac_bits,
            ),
        }
    }
}

impl Neg for &FixedPoint {
    type Output = FixedPoint;

    fn neg(self) -> FixedPoint {
        FixedPoint {
            raw: -&self.raw,
            spec: BitWidthSpec::grown(self.spec.int_bits + 1, self.spec.frac_bits),
        }
    }
}

macro_rules! forward_owned_binop {
    ($($imp:ident :: $method:ident),*) => {$(
        impl $imp for FixedPoint {
            type Output = FixedPoint;

            fn $method(self, rhs: FixedPoint) -> FixedPoint {
                (&self).$method(&rhs)
            }
        }
    )*};
}

forward_owned_binop!(Add::add, Sub::sub, Mul::mul);

impl Neg for FixedPoint {
    type Output = FixedPoint;

    fn neg(self) -> FixedPoint {
        -&self
    }
}

impl fmt::Display for FixedPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_f64())
    }
}

impl fmt::Debug for FixedPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FixedPoint({} @ {})", self.to_f64(), self.spec)
    }
}
