//! Parsing and validation of `sysnode.toml` run configuration files.
//!
//! This crate reads the configuration file and produces a strongly-typed
//! [`SysnodeConfig`]: which node to verify, its generics, run settings, and the
//! bit-width grid swept by `sysnode sweep`.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_file, load_config_from_str, CONFIG_FILE_NAME};
pub use types::*;
