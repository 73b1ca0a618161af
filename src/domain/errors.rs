//! Domain error types
//!
//! This module defines the error hierarchy for ShiftSync. Collaborator
//! failures, transaction failures and configuration problems all surface as
//! [`ShiftSyncError`]; third-party error types are converted to strings at
//! the boundary so they never leak into the public API.

use thiserror::Error;

/// Main ShiftSync error type
///
/// Variants carry pre-rendered messages. The `Warning` variant marks an
/// error as non-fatal: a phase transaction that ends with a warning is still
/// committed (see [`Warnable`]).
#[derive(Debug, Error)]
pub enum ShiftSyncError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Database-related errors (pool, connection, statement)
    #[error("Database error: {0}")]
    Database(String),

    /// Input or diagnostic validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Errors reported by the schedule import collaborator
    #[error("Import error: {0}")]
    Import(String),

    /// Errors reported by the external schedule scrape collaborator
    #[error("Scrape error: {0}")]
    Scrape(String),

    /// Errors reported by the coverage calculation collaborator
    #[error("Coverage error: {0}")]
    Coverage(String),

    /// The run context was cancelled before the work could start
    #[error("Operation cancelled: {0}")]
    Cancelled(String),

    /// Non-fatal condition; data produced alongside it is kept
    #[error("Warning: {0}")]
    Warning(String),

    /// Beginning a phase transaction failed
    #[error("failed to begin {phase} transaction: {message}")]
    TransactionBegin { phase: String, message: String },

    /// Committing a phase transaction failed
    #[error("{phase} commit failed: {message}")]
    TransactionCommit { phase: String, message: String },

    /// A unit of work failed and the subsequent rollback failed as well
    #[error("{phase} failed and rollback failed: {cause} (rollback error: {rollback})")]
    TransactionRollback {
        phase: String,
        cause: String,
        rollback: String,
    },

    /// A workflow phase failed in a way that makes the run unusable
    #[error("{phase} failed: {message}")]
    PhaseFailed { phase: String, message: String },

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

impl ShiftSyncError {
    /// Creates a non-fatal warning error
    pub fn warning(message: impl Into<String>) -> Self {
        ShiftSyncError::Warning(message.into())
    }

    /// Returns true if this error only marks a non-fatal condition
    pub fn is_warning(&self) -> bool {
        matches!(self, ShiftSyncError::Warning(_))
    }

    /// Returns true if this error came from context cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ShiftSyncError::Cancelled(_))
    }
}

/// Capability marking an error as non-fatal for transaction-commit purposes
///
/// The transaction manager commits when a unit of work fails with an error
/// whose `is_warning()` returns true, and rolls back for every other error.
pub trait Warnable: std::error::Error {
    /// Returns true if the error should not roll back the transaction
    fn is_warning(&self) -> bool;
}

impl Warnable for ShiftSyncError {
    fn is_warning(&self) -> bool {
        ShiftSyncError::is_warning(self)
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for ShiftSyncError {
    fn from(err: std::io::Error) -> Self {
        ShiftSyncError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for ShiftSyncError {
    fn from(err: serde_json::Error) -> Self {
        ShiftSyncError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for ShiftSyncError {
    fn from(err: toml::de::Error) -> Self {
        ShiftSyncError::Configuration(format!("TOML parse error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ShiftSyncError::Configuration("Invalid config".to_string());
        assert_eq!(err.to_string(), "Configuration error: Invalid config");
    }

    #[test]
    fn test_warning_is_warnable() {
        let err = ShiftSyncError::warning("3 shifts skipped");
        assert!(err.is_warning());
        assert!(Warnable::is_warning(&err));

        let err = ShiftSyncError::Import("connection timeout".to_string());
        assert!(!err.is_warning());
    }

    #[test]
    fn test_rollback_error_embeds_both_failures() {
        let err = ShiftSyncError::TransactionRollback {
            phase: "phase 1 (schedule import)".to_string(),
            cause: "unique constraint".to_string(),
            rollback: "connection reset".to_string(),
        };
        let rendered = err.to_string();
        assert!(rendered.contains("unique constraint"));
        assert!(rendered.contains("connection reset"));
    }

    #[test]
    fn test_cancelled_flag() {
        assert!(ShiftSyncError::Cancelled("shutdown".to_string()).is_cancelled());
        assert!(!ShiftSyncError::Other("x".to_string()).is_cancelled());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: ShiftSyncError = io_err.into();
        assert!(matches!(err, ShiftSyncError::Io(_)));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: ShiftSyncError = json_err.into();
        assert!(matches!(err, ShiftSyncError::Serialization(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let err: ShiftSyncError = toml_err.into();
        assert!(matches!(err, ShiftSyncError::Configuration(_)));
        assert!(err.to_string().contains("TOML parse error"));
    }
}
