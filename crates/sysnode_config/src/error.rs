//! Errors raised while reading `sysnode.toml`.

use std::path::PathBuf;

/// Errors that can occur when loading or validating a `sysnode.toml` configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("cannot read {}: {source}", path.display())]
    Read {
        /// Path that was opened.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed or has the wrong shape.
    #[error("failed to parse configuration: {0}")]
    Parse(String),

    /// A value is well-formed but out of range.
    #[error("invalid '{field}': {reason}")]
    Invalid {
        /// Dotted key of the offending value, e.g. `run.events`.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_invalid() {
        let err = ConfigError::Invalid {
            field: "run.events",
            reason: "must be positive".into(),
        };
        assert_eq!(err.to_string(), "invalid 'run.events': must be positive");
    }

    #[test]
    fn display_read_names_the_file() {
        let err = ConfigError::Read {
            path: PathBuf::from("/tmp/sysnode.toml"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
        };
        assert_eq!(err.to_string(), "cannot read /tmp/sysnode.toml: file not found");
        assert!(std::error::Error::source(&err).is_some());
    }
}
