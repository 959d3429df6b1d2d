//! Shared foundational types for the systolic-node verification harness.
//!
//! This crate provides 4-state logic values, packed logic vectors used as raw
//! port bit patterns, and the exact fixed-point arithmetic used to compute
//! reference results: bit-width specifications, exact widening operations, and
//! casts with explicit quantization and overflow modes.

#![warn(missing_docs)]

pub mod error;
pub mod fixed;
pub mod logic;
pub mod logic_vec;

pub use error::FixedPointError;
pub use fixed::{BitWidthSpec, FixedPoint, Overflow, Quantization};
pub use logic::Logic;
pub use logic_vec::LogicVec;
