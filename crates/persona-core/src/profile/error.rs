//! Error types for profile operations

use std::path::PathBuf;
use thiserror::Error;

/// Result type for profile operations
pub type ProfileResult<T> = Result<T, ProfileError>;

/// Errors that can occur during profile operations
#[derive(Debug, Error)]
pub enum ProfileError {
    /// Profile not found in the cache
    #[error("profile not found: {id}")]
    NotFound { id: String },

    /// No active profile has been selected
    #[error("no active profile")]
    NoActiveProfile,

    /// A profile with the same ID already exists
    #[error("profile already exists: {id}")]
    AlreadyExists { id: String },

    /// A field-level business rule was violated
    #[error("validation failed for {field}: {message}")]
    Validation { field: String, message: String },

    /// Disallowed operation on the default or active profile
    #[error("cannot delete {reason} profile: {id}")]
    Conflict { id: String, reason: String },

    /// File I/O error
    #[error("I/O error for {path}: {message}")]
    Io { path: PathBuf, message: String },

    /// Profile file parse or serialize error
    #[error("parse error in {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

impl ProfileError {
    /// Get the error code for CLI/API responses
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } | Self::NoActiveProfile => "NOT_FOUND",
            Self::AlreadyExists { .. } => "ALREADY_EXISTS",
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::Conflict { .. } => "CONFLICT",
            Self::Io { .. } => "IO_ERROR",
            Self::Parse { .. } => "PARSE_ERROR",
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, err: &std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: err.to_string(),
        }
    }

    pub(crate) fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}
