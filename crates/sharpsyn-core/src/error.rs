//! Error types for the fallible surfaces around the parser
//!
//! Parsing itself never fails; malformed source is reported through
//! [`Diagnostic`](crate::diagnostics::Diagnostic)s. These errors cover
//! configuration, option parsing and file access.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for sharpsyn operations
#[derive(Debug, Error)]
pub enum SharpsynError {
    /// Configuration loading or validation errors
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// Malformed TOML in a configuration file
    #[error("Invalid configuration in '{path}': {source}")]
    TomlError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A language version string that names no known version
    #[error("Unknown language version '{value}'")]
    InvalidLanguageVersion { value: String },

    /// An option value outside its accepted set
    #[error("Invalid value '{value}' for {option}; expected one of: {expected}")]
    InvalidOption {
        option: String,
        value: String,
        expected: String,
    },

    /// File system I/O errors
    #[error("IO error for path '{path}': {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The tree did not reproduce its source text
    #[error("Round-trip mismatch in '{path}': {message}")]
    RoundTripMismatch { path: PathBuf, message: String },
}

/// Error kind enumeration for categorizing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Config,
    Option,
    Io,
    RoundTrip,
}

impl SharpsynError {
    /// Get the error kind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            SharpsynError::ConfigError { .. } | SharpsynError::TomlError { .. } => {
                ErrorKind::Config
            }
            SharpsynError::InvalidLanguageVersion { .. } | SharpsynError::InvalidOption { .. } => {
                ErrorKind::Option
            }
            SharpsynError::IoError { .. } => ErrorKind::Io,
            SharpsynError::RoundTripMismatch { .. } => ErrorKind::RoundTrip,
        }
    }

    /// Whether processing can continue with the next file
    pub fn is_recoverable(&self) -> bool {
        matches!(self.kind(), ErrorKind::Io | ErrorKind::RoundTrip)
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create an IO error with path context
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::IoError {
            path: path.into(),
            source,
        }
    }

    pub fn invalid_option(
        option: impl Into<String>,
        value: impl Into<String>,
        expected: impl Into<String>,
    ) -> Self {
        Self::InvalidOption {
            option: option.into(),
            value: value.into(),
            expected: expected.into(),
        }
    }

    pub fn round_trip_mismatch(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::RoundTripMismatch {
            path: path.into(),
            message: message.into(),
        }
    }
}
