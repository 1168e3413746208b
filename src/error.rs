//! Error types for wp-requirements operations.
//!
//! This module defines [`RequirementsError`], the error type used by the
//! host-facing parts of the crate, and a [`Result`] type alias.
//!
//! # Error Handling Strategy
//!
//! - The validation core never fails: a missing requirements file, malformed
//!   JSON and unmet probes are all represented as data (an empty spec or a
//!   `false` leaf).
//! - `RequirementsError` covers the host side: reading an environment
//!   snapshot, or a requirements file the user named explicitly.
//! - Host I/O that has no dedicated variant attaches `anyhow::Context` and
//!   surfaces as `RequirementsError::Other`.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for wp-requirements operations.
#[derive(Debug, Error)]
pub enum RequirementsError {
    /// Environment snapshot file not found.
    #[error("Environment snapshot not found: {path}")]
    EnvironmentNotFound { path: PathBuf },

    /// Environment snapshot could not be parsed.
    #[error("Failed to parse environment snapshot at {path}: {message}")]
    EnvironmentParseError { path: PathBuf, message: String },

    /// A requirements file named explicitly could not be read or parsed.
    #[error("Failed to load requirements from {path}: {message}")]
    RequirementsFileError { path: PathBuf, message: String },

    /// Version comparison operator is not one of the supported forms.
    #[error("Unknown version compare operator: '{operator}'")]
    UnknownOperator { operator: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Host I/O failure with context attached.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for wp-requirements operations.
pub type Result<T> = std::result::Result<T, RequirementsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn environment_not_found_displays_path() {
        let err = RequirementsError::EnvironmentNotFound {
            path: PathBuf::from("/srv/env.json"),
        };
        assert!(err.to_string().contains("/srv/env.json"));
    }

    #[test]
    fn environment_parse_error_displays_path_and_message() {
        let err = RequirementsError::EnvironmentParseError {
            path: PathBuf::from("/env.json"),
            message: "expected value".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("/env.json"));
        assert!(msg.contains("expected value"));
    }

    #[test]
    fn requirements_file_error_displays_path_and_message() {
        let err = RequirementsError::RequirementsFileError {
            path: PathBuf::from("wp-requirements.json"),
            message: "trailing comma".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("wp-requirements.json"));
        assert!(msg.contains("trailing comma"));
    }

    #[test]
    fn unknown_operator_displays_operator() {
        let err = RequirementsError::UnknownOperator {
            operator: "~>".into(),
        };
        assert!(err.to_string().contains("~>"));
    }

    #[test]
    fn io_error_converts_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: RequirementsError = io_err.into();
        assert!(matches!(err, RequirementsError::Io(_)));
    }

    #[test]
    fn context_error_displays_outer_message() {
        use anyhow::Context;

        let io: std::result::Result<(), std::io::Error> =
            Err(std::io::ErrorKind::PermissionDenied.into());
        let err: RequirementsError = io
            .context("Failed to resolve the working directory")
            .unwrap_err()
            .into();
        assert!(matches!(err, RequirementsError::Other(_)));
        assert_eq!(err.to_string(), "Failed to resolve the working directory");
    }
}
