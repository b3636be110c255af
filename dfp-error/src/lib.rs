//! Unified error handling for devicefp
//!
//! This crate provides the single error type used by the collectors, the
//! canonicalizer and the orchestrator. It uses thiserror for the Display and
//! Error trait impls.

use std::io;
use std::path::PathBuf;

/// Result type alias using FingerprintError
pub type Result<T> = std::result::Result<T, FingerprintError>;

/// Unified error type for all devicefp operations
#[derive(thiserror::Error, Debug)]
pub enum FingerprintError {
    // ============================================================================
    // File System Errors
    // ============================================================================
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: io::Error,
    },

    // ============================================================================
    // Canonicalization and Hashing Errors
    // ============================================================================
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Canonicalization failed: {0}")]
    Canonicalization(String),

    #[error("Hashing failed: {0}")]
    Hashing(String),

    // ============================================================================
    // Collection Errors
    // ============================================================================
    #[error("Failed to collect {category} information: {reason}")]
    Collector {
        category: String,
        reason: String,
    },

    #[error("Probe {probe} failed: {reason}")]
    Probe {
        probe: String,
        reason: String,
    },

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("Operation timed out: {0}")]
    Timeout(String),

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration value for {field}: {reason}")]
    InvalidConfig {
        field: String,
        reason: String,
    },

    #[error("Unknown signal category: {0}")]
    UnknownCategory(String),
}

impl FingerprintError {
    /// Create a config error from a string
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid config error for a named field
    pub fn invalid_config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create a collector error for a category
    pub fn collector(category: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Collector {
            category: category.into(),
            reason: reason.into(),
        }
    }

    /// Create a probe error
    pub fn probe(probe: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Probe {
            probe: probe.into(),
            reason: reason.into(),
        }
    }

    /// Create a file read error with path context
    pub fn file_read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::FileRead {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collector_error_display() {
        let err = FingerprintError::collector("network", "socket closed");
        assert_eq!(
            err.to_string(),
            "Failed to collect network information: socket closed"
        );
    }

    #[test]
    fn test_file_read_keeps_path() {
        let err = FingerprintError::file_read(
            "/tmp/devicefp.json",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(err.to_string(), "Failed to read file /tmp/devicefp.json: denied");
    }

    #[test]
    fn test_invalid_config_display() {
        let err = FingerprintError::invalid_config("timeout", "must be greater than zero");
        assert_eq!(
            err.to_string(),
            "Invalid configuration value for timeout: must be greater than zero"
        );
    }
}
