//! Packed 4-state vectors holding the raw bit pattern of a port.

use crate::logic::Logic;
use num_bigint::BigUint;
use num_traits::Zero;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::BitXor;

/// A vector of 4-state [`Logic`] values packed for efficient storage.
///
/// Each logic value occupies 2 bits (encoding 4 states), with 32 values packed
/// per `u64` word. Ports of any width are supported; fixed-point patterns wider
/// than 64 bits are converted through [`BigUint`].
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LogicVec {
    width: u32,
    /// Packed storage: 2 bits per logic value, 32 values per u64.
    data: Vec<u64>,
}

/// Number of logic values packed per u64 word.
const VALUES_PER_WORD: u32 = 32;

impl LogicVec {
    /// Creates a new `LogicVec` of the given width, initialized to all `Zero`.
    pub fn new(width: u32) -> Self {
        Self {
            width,
            data: vec![0; word_count(width)],
        }
    }

    /// Creates a vector with every bit set to `value`.
    pub fn filled(width: u32, value: Logic) -> Self {
        let mut v = Self::new(width);
        for i in 0..width {
            v.set(i, value);
        }
        v
    }

    /// Returns the number of logic values in this vector.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Gets the logic value at the given index.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.width()`.
    pub fn get(&self, index: u32) -> Logic {
        assert!(
            index < self.width,
            "index {index} out of bounds for width {}",
            self.width
        );
        let word_idx = (index / VALUES_PER_WORD) as usize;
        let bit_offset = (index % VALUES_PER_WORD) * 2;
        match (self.data[word_idx] >> bit_offset) & 0b11 {
            0 => Logic::Zero,
            1 => Logic::One,
            2 => Logic::X,
            _ => Logic::Z,
        }
    }

    /// Sets the logic value at the given index.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.width()`.
    pub fn set(&mut self, index: u32, value: Logic) {
        assert!(
            index < self.width,
            "index {index} out of bounds for width {}",
            self.width
        );
        let word_idx = (index / VALUES_PER_WORD) as usize;
        let bit_offset = (index % VALUES_PER_WORD) * 2;
        let mask = !(0b11u64 << bit_offset);
        self.data[word_idx] = (self.data[word_idx] & mask) | ((value as u64) << bit_offset);
    }

    /// Creates a `LogicVec` from an unsigned bit pattern.
    ///
    /// Bits at or beyond `width` are ignored.
    pub fn from_biguint(value: &BigUint, width: u32) -> Self {
        let mut v = Self::new(width);
        for i in 0..width {
            if value.bit(u64::from(i)) {
                v.set(i, Logic::One);
            }
        }
        v
    }

    /// Creates a `LogicVec` from a `u64` value with the given width.
    pub fn from_u64(value: u64, width: u32) -> Self {
        Self::from_biguint(&BigUint::from(value), width)
    }

    /// Converts the vector to an unsigned bit pattern.
    ///
    /// Returns `None` if any bit is X or Z.
    pub fn to_biguint(&self) -> Option<BigUint> {
        let mut result = BigUint::zero();
        for i in 0..self.width {
            match self.get(i) {
                Logic::Zero => {}
                Logic::One => result.set_bit(u64::from(i), true),
                Logic::X | Logic::Z => return None,
            }
        }
        Some(result)
    }

    /// Returns `true` if any bit is X or Z.
    pub fn has_unknown(&self) -> bool {
        (0..self.width).any(|i| !self.get(i).is_known())
    }

    /// Returns a copy with the bit at `index` inverted. Unknown bits stay unknown.
    pub fn with_flipped_bit(&self, index: u32) -> Self {
        let mut v = self.clone();
        let flipped = match self.get(index) {
            Logic::Zero => Logic::One,
            Logic::One => Logic::Zero,
            other => other,
        };
        v.set(index, flipped);
        v
    }

    /// Indices of bits that differ between two equally wide vectors.
    ///
    /// A bit counts as differing unless both sides hold the same known level.
    pub fn differing_bits(&self, other: &LogicVec) -> Vec<u32> {
        let diff = self ^ other;
        (0..diff.width)
            .filter(|&i| diff.get(i) != Logic::Zero)
            .collect()
    }

    /// Parses a binary string like `"10XZ"` into a `LogicVec`.
    ///
    /// The leftmost character is the most significant bit (highest index).
    /// Returns `None` if the string contains invalid characters.
    pub fn from_binary_str(s: &str) -> Option<Self> {
        let mut v = Self::new(s.len() as u32);
        for (i, c) in s.chars().rev().enumerate() {
            v.set(i as u32, Logic::from_char(c)?);
        }
        Some(v)
    }
}

impl fmt::Display for LogicVec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in (0..self.width).rev() {
            write!(f, "{}", self.get(i))?;
        }
        Ok(())
    }
}

impl fmt::Debug for LogicVec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LogicVec({self})")
    }
}

impl BitXor for &LogicVec {
    type Output = LogicVec;

    fn bitxor(self, rhs: Self) -> LogicVec {
        assert_eq!(self.width, rhs.width, "LogicVec width mismatch in XOR");
        let mut result = LogicVec::new(self.width);
        for i in 0..self.width {
            result.set(i, self.get(i) ^ rhs.get(i));
        }
        result
    }
}

/// Returns the number of u64 words needed to store `width` logic values.
fn word_count(width: u32) -> usize {
    width.div_ceil(VALUES_PER_WORD) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_initializes_to_zero() {
        let v = LogicVec::new(70);
        assert_eq!(v.width(), 70);
        assert!((0..70).all(|i| v.get(i) == Logic::Zero));
    }

    #[test]
    fn from_binary_str() {
        let v = LogicVec::from_binary_str("10XZ").unwrap();
        assert_eq!(v.width(), 4);
        assert_eq!(v.get(3), Logic::One); // MSB
        assert_eq!(v.get(2), Logic::Zero);
        assert_eq!(v.get(1), Logic::X);
        assert_eq!(v.get(0), Logic::Z); // LSB
        assert!(LogicVec::from_binary_str("10A1").is_none());
    }

    #[test]
    fn biguint_roundtrip_wide() {
        let value = (BigUint::from(1u8) << 150u32) | BigUint::from(0b1011u8);
        let v = LogicVec::from_biguint(&value, 160);
        assert_eq!(v.get(150), Logic::One);
        assert_eq!(v.get(149), Logic::Zero);
        assert_eq!(v.to_biguint(), Some(value));
    }

    #[test]
    fn from_biguint_truncates_to_width() {
        let v = LogicVec::from_u64(0b1_0110, 4);
        assert_eq!(format!("{v}"), "0110");
    }

    #[test]
    fn unknown_bits_have_no_value() {
        let v = LogicVec::from_binary_str("1X01").unwrap();
        assert!(v.has_unknown());
        assert_eq!(v.to_biguint(), None);
        assert!(!LogicVec::from_u64(5, 4).has_unknown());
    }

    #[test]
    fn filled_with_x() {
        let v = LogicVec::filled(3, Logic::X);
        assert_eq!(format!("{v}"), "XXX");
    }

    #[test]
    fn flip_bit() {
        let v = LogicVec::from_binary_str("1010").unwrap();
        assert_eq!(format!("{}", v.with_flipped_bit(0)), "1011");
        assert_eq!(format!("{}", v.with_flipped_bit(3)), "0010");
        let u = LogicVec::from_binary_str("X0").unwrap();
        assert_eq!(format!("{}", u.with_flipped_bit(1)), "X0");
    }

    #[test]
    fn differing_bits() {
        let a = LogicVec::from_binary_str("1100").unwrap();
        let b = LogicVec::from_binary_str("1X10").unwrap();
        assert_eq!(a.differing_bits(&b), vec![1, 2]);
        assert!(a.differing_bits(&a).is_empty());
    }

    #[test]
    fn serde_roundtrip() {
        let v = LogicVec::from_binary_str("10XZ1010").unwrap();
        let json = serde_json::to_string(&v).unwrap();
        let back: LogicVec = serde_json::from_str(&json).unwrap();
        assert_eq!(v, back);
    }
}
