// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the configuration crate.
//!
//! This module defines the error types that can occur when resolving, parsing,
//! caching or addressing configuration. All errors use `thiserror` for proper
//! error handling and conversion.

use std::num::{ParseFloatError, ParseIntError};
use std::str::ParseBoolError;
use thiserror::Error;

/// The main error type for configuration operations.
///
/// Filesystem trouble around the parse cache never reaches callers as an
/// error: cache adapters log it and degrade to a miss. What does cross the
/// boundary is a missing source, a malformed source, or a programming mistake
/// ([`ConfigError::Misuse`]).
///
/// # Examples
///
/// ```
/// use layercfg::domain::errors::ConfigError;
///
/// fn locate() -> Result<std::path::PathBuf, ConfigError> {
///     Err(ConfigError::SourceNotFound {
///         source_name: "engine".to_string(),
///         package: None,
///     })
/// }
///
/// assert!(locate().unwrap_err().is_not_found());
/// ```
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// The source identifier could not be resolved to a readable file.
    #[error("Unable to find config source \"{source_name}\"{}", package_suffix(.package))]
    SourceNotFound {
        /// The identifier that was requested
        source_name: String,
        /// The package it was searched in, if any
        package: Option<String>,
    },

    /// The source file exists but could not be read.
    #[error("Configuration source '{source_name}' error: {message}")]
    SourceError {
        /// The identifier of the source that encountered the error
        source_name: String,
        /// The error message
        message: String,
        /// The underlying error, if any
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The content of a source or artifact is malformed for its format.
    #[error("Failed to parse configuration: {message}")]
    ParseError {
        /// The error message
        message: String,
        /// The underlying parsing error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A cache artifact could not be read or written.
    #[error("Configuration cache error: {message}")]
    CacheError {
        /// The error message
        message: String,
        /// The underlying error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The API was used in a way it does not support.
    #[error("Configuration misuse: {message}")]
    Misuse {
        /// What was attempted
        message: String,
    },

    /// A write was attempted on a main document that was never built.
    #[error("No main configuration built for format {format}")]
    MainNotBuilt {
        /// The format whose main document is missing
        format: String,
    },

    /// Failed to convert a configuration value to the requested type.
    #[error(
        "Failed to convert configuration value at '{path}' to type {target_type}: {source}"
    )]
    TypeConversionError {
        /// The path of the value being converted
        path: String,
        /// The target type name
        target_type: String,
        /// The underlying conversion error
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// An I/O error occurred while reading configuration.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

fn package_suffix(package: &Option<String>) -> String {
    match package {
        Some(package) => format!(" in package \"{}\"", package),
        None => String::new(),
    }
}

impl ConfigError {
    /// Creates a `Misuse` error.
    pub fn misuse(message: impl Into<String>) -> Self {
        ConfigError::Misuse {
            message: message.into(),
        }
    }

    /// Creates a `ParseError` without an underlying cause.
    pub fn parse(message: impl Into<String>) -> Self {
        ConfigError::ParseError {
            message: message.into(),
            source: None,
        }
    }

    /// Returns true if this error means the source does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ConfigError::SourceNotFound { .. })
    }

    /// Returns true if this error means the source content was malformed.
    pub fn is_parse_failure(&self) -> bool {
        matches!(self, ConfigError::ParseError { .. })
    }

    /// Creates a TypeConversionError from a ParseIntError.
    pub fn from_parse_int_error(path: String, err: ParseIntError) -> Self {
        ConfigError::TypeConversionError {
            path,
            target_type: "integer".to_string(),
            source: Box::new(err),
        }
    }

    /// Creates a TypeConversionError from a ParseFloatError.
    pub fn from_parse_float_error(path: String, err: ParseFloatError) -> Self {
        ConfigError::TypeConversionError {
            path,
            target_type: "float".to_string(),
            source: Box::new(err),
        }
    }

    /// Creates a TypeConversionError from a ParseBoolError.
    pub fn from_parse_bool_error(path: String, err: ParseBoolError) -> Self {
        ConfigError::TypeConversionError {
            path,
            target_type: "boolean".to_string(),
            source: Box::new(err),
        }
    }
}

/// A specialized Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_not_found_app_level() {
        let error = ConfigError::SourceNotFound {
            source_name: "engine".to_string(),
            package: None,
        };
        assert_eq!(error.to_string(), "Unable to find config source \"engine\"");
        assert!(error.is_not_found());
        assert!(!error.is_parse_failure());
    }

    #[test]
    fn test_source_not_found_names_package() {
        let error = ConfigError::SourceNotFound {
            source_name: "conf".to_string(),
            package: Some("acme/mailer".to_string()),
        };
        assert_eq!(
            error.to_string(),
            "Unable to find config source \"conf\" in package \"acme/mailer\""
        );
    }

    #[test]
    fn test_source_error() {
        let error = ConfigError::SourceError {
            source_name: "engine".to_string(),
            message: "Failed to read configuration file".to_string(),
            source: None,
        };
        assert_eq!(
            error.to_string(),
            "Configuration source 'engine' error: Failed to read configuration file"
        );
    }

    #[test]
    fn test_parse_error() {
        let error = ConfigError::parse("line 3: expected '='");
        assert_eq!(
            error.to_string(),
            "Failed to parse configuration: line 3: expected '='"
        );
        assert!(error.is_parse_failure());
    }

    #[test]
    fn test_misuse_error() {
        let error = ConfigError::misuse("pretty output is not implemented");
        assert_eq!(
            error.to_string(),
            "Configuration misuse: pretty output is not implemented"
        );
    }

    #[test]
    fn test_main_not_built_error() {
        let error = ConfigError::MainNotBuilt {
            format: "ini".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "No main configuration built for format ini"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error = ConfigError::from(io_error);
        assert!(matches!(error, ConfigError::IoError(_)));
    }

    #[test]
    fn test_from_parse_int_error() {
        let parse_err = "not_a_number".parse::<i64>().unwrap_err();
        let error = ConfigError::from_parse_int_error("db/port".to_string(), parse_err);
        assert!(matches!(error, ConfigError::TypeConversionError { .. }));
        assert!(error.to_string().contains("integer"));
        assert!(error.to_string().contains("db/port"));
    }

    #[test]
    fn test_from_parse_float_error() {
        let parse_err = "not_a_float".parse::<f64>().unwrap_err();
        let error = ConfigError::from_parse_float_error("ratio".to_string(), parse_err);
        assert!(error.to_string().contains("float"));
    }

    #[test]
    fn test_from_parse_bool_error() {
        let parse_err = "not_a_bool".parse::<bool>().unwrap_err();
        let error = ConfigError::from_parse_bool_error("debug".to_string(), parse_err);
        assert!(error.to_string().contains("boolean"));
    }
}
