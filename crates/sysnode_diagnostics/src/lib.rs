//! Diagnostic creation, severity management, and rendering.
//!
//! Every message the harness reports goes through this crate: precision
//! warnings from the cast stage, configuration and capability errors, and
//! output mismatches. A [`Diagnostic`] carries a severity, a structured code and
//! the cycle/channel it concerns. The thread-safe [`DiagnosticSink`] collects
//! them for one or many test instances, and [`DiagnosticRenderer`]
//! implementations format them for a terminal or as JSON.

#![warn(missing_docs)]

pub mod code;
pub mod diagnostic;
pub mod renderer;
pub mod severity;
pub mod sink;

pub use code::{Category, DiagnosticCode};
pub use diagnostic::Diagnostic;
pub use renderer::{DiagnosticRenderer, JsonRenderer, TerminalRenderer};
pub use severity::Severity;
pub use sink::DiagnosticSink;
