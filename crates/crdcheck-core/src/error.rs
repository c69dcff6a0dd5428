//! # Error Types — Structured Error Hierarchy
//!
//! Defines the error types used throughout check-examples. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Process-level failures (bad configuration, unreadable input) are
//!   errors and propagate with `?`.
//! - Validation findings are NOT errors. They are data produced by the
//!   validator and live in `crdcheck-schema`.

use std::path::PathBuf;

use thiserror::Error;

/// Error loading or interpreting configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("cannot read config file '{path}': {source}")]
    Read {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying IO failure.
        source: std::io::Error,
    },

    /// The configuration file is not valid YAML for [`crate::CheckConfig`].
    #[error("invalid config file '{path}': {source}")]
    Parse {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying YAML failure.
        source: serde_yaml::Error,
    },

    /// A configuration value (from file, environment, or flag) is not recognized.
    #[error("invalid value '{value}' for {field}; expected one of: {expected}")]
    InvalidValue {
        /// Name of the setting.
        field: &'static str,
        /// The rejected value.
        value: String,
        /// Accepted values, comma separated.
        expected: &'static str,
    },
}

/// Error loading a YAML document stream.
#[derive(Error, Debug)]
pub enum DocumentError {
    /// The file could not be read.
    #[error("cannot read '{path}': {source}")]
    Read {
        /// Path to the file.
        path: PathBuf,
        /// Underlying IO failure.
        source: std::io::Error,
    },

    /// A document in the stream is not valid YAML.
    #[error("{0}")]
    Parse(#[from] serde_yaml::Error),
}
