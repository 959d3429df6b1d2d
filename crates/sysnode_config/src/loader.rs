//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::SysnodeConfig;
use std::path::Path;
use sysnode_sim::SimTime;

/// Name of the configuration file looked up in a project directory.
pub const CONFIG_FILE_NAME: &str = "sysnode.toml";

/// Loads and validates `sysnode.toml` from a directory.
///
/// A missing file is not an error: the defaults are returned.
pub fn load_config(dir: &Path) -> Result<SysnodeConfig, ConfigError> {
    let config_path = dir.join(CONFIG_FILE_NAME);
    if !config_path.exists() {
        return Ok(SysnodeConfig::default());
    }
    load_config_file(&config_path)
}

/// Loads and validates a configuration file at an explicit path.
pub fn load_config_file(path: &Path) -> Result<SysnodeConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    load_config_from_str(&content)
}

/// Parses and validates a `sysnode.toml` configuration from a string.
pub fn load_config_from_str(content: &str) -> Result<SysnodeConfig, ConfigError> {
    let config: SysnodeConfig =
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

/// Checks value ranges that the type system does not capture.
fn validate_config(config: &SysnodeConfig) -> Result<(), ConfigError> {
    if config.node.latency == 0 {
        return Err(invalid("node.latency", "must be at least 1"));
    }
    if config.run.events == 0 {
        return Err(invalid("run.events", "must be positive"));
    }
    let period = config
        .run
        .clock_period
        .parse::<SimTime>()
        .map_err(|e| invalid("run.clock_period", e.to_string()))?;
    if period.fs == 0 {
        return Err(invalid("run.clock_period", "must be positive"));
    }

    let sweep = &config.sweep;
    for (field, values, min) in [
        ("sweep.input_int", &sweep.input_int, 1),
        ("sweep.input_frac", &sweep.input_frac, 0),
        ("sweep.output_int_scale", &sweep.output_int_scale, 1),
        ("sweep.output_frac_scale", &sweep.output_frac_scale, 1),
    ] {
        if values.is_empty() {
            return Err(invalid(field, "must not be empty"));
        }
        if let Some(bad) = values.iter().find(|&&v| v < min) {
            return Err(invalid(field, format!("contains {bad}, minimum is {min}")));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Variant;

    #[test]
    fn parse_empty_config() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config.node.variant, Variant::A);
        assert_eq!(config.node.latency, 3);
        assert_eq!(config.run.events, 100);
        assert_eq!(config.run.seed, None);
        assert_eq!(config.run.clock_period().unwrap(), SimTime::from_ns(10));
        assert!(config.run.waveform.is_none());
        assert!(config.generics.is_empty());
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
[node]
variant = "b"
latency = 4

[generics]
NW_INTEGER_WIDTH = 8
NW_DECIMAL_WIDTH = 8

[run]
events = 250
seed = 42
clock_period = "4ns"
waveform = "wave.vcd"

[sweep]
input_int = [4, 8]
input_frac = [4]
output_int_scale = [2, 3]
output_frac_scale = [2]
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.node.variant, Variant::B);
        assert_eq!(config.node.latency, 4);
        assert_eq!(config.generics["NW_DECIMAL_WIDTH"], 8);
        assert_eq!(config.run.events, 250);
        assert_eq!(config.run.seed, Some(42));
        assert_eq!(config.run.clock_period().unwrap(), SimTime::from_ns(4));
        assert_eq!(config.run.waveform.as_deref(), Some(Path::new("wave.vcd")));
        assert_eq!(config.sweep.points().len(), 4);
    }

    #[test]
    fn invalid_toml_errors() {
        let err = load_config_from_str("this is not valid toml {{{}}}").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn zero_events_rejected() {
        let err = load_config_from_str("[run]\nevents = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "run.events", .. }));
    }

    #[test]
    fn zero_latency_rejected() {
        let err = load_config_from_str("[node]\nlatency = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "node.latency", .. }));
    }

    #[test]
    fn bad_clock_period_rejected() {
        for period in ["10 parsecs", "0ns", "fast"] {
            let toml = format!("[run]\nclock_period = \"{period}\"\n");
            let err = load_config_from_str(&toml).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid { field: "run.clock_period", .. }), "{period}");
        }
    }

    #[test]
    fn empty_sweep_list_rejected() {
        let err = load_config_from_str("[sweep]\ninput_frac = []\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "sweep.input_frac", .. }));
    }

    #[test]
    fn non_positive_width_rejected() {
        let err = load_config_from_str("[sweep]\ninput_int = [0, 4]\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref reason, .. } if reason.contains("contains 0")));
    }

    #[test]
    fn load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "[run]\nevents = 7\n").unwrap();
        let config = load_config(dir.path()).unwrap();
        assert_eq!(config.run.events, 7);
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(dir.path()).unwrap();
        assert_eq!(config.run.events, 100);
    }

    #[test]
    fn io_error_from_explicit_path() {
        let err = load_config_file(Path::new("/nonexistent/sysnode.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
