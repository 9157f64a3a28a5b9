//! Error types for variable resolution
//!
//! Every failure aborts the current resolution; there is no partial output.

use std::fmt;
use thiserror::Error;

/// Main error type for variable JSON operations
#[derive(Debug, Error)]
pub enum VariableJsonError {
    /// Malformed JSON text, a non-object root, or a variables section that is
    /// not an object
    #[error("Invalid document: {message}")]
    InvalidDocument { message: String },

    /// A referenced path could not be located in the variables section
    #[error("Variable {path} not found.")]
    VariableNotFound { path: String },

    /// A reference chain exceeded the configured hop bound
    #[error("Max recursion reached. (limit {max})")]
    MaxRecursionExceeded { max: usize },

    /// A path segment addresses a node it cannot descend into
    #[error("Invalid path {path}: {reason}")]
    InvalidPath { path: String, reason: String },

    /// Output insertion would overwrite an existing key
    #[error("Duplicate key '{key}' in output")]
    DuplicateKey { key: String },

    /// Typed deserialization of the resolved tree failed
    #[error("Serde error: {message}")]
    Serde { message: String },
}

/// Convenience alias used throughout the crate
pub type Result<T> = std::result::Result<T, VariableJsonError>;

impl VariableJsonError {
    /// Builds a `VariableNotFound` for the given path
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::VariableNotFound { path: path.into() }
    }

    /// Builds an `InvalidPath` error
    pub fn invalid_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Builds an `InvalidDocument` error
    pub fn invalid_document(message: impl Into<String>) -> Self {
        Self::InvalidDocument {
            message: message.into(),
        }
    }

    /// Returns true if this error was caused by the input document itself
    /// rather than by a reference inside it
    pub fn is_document_error(&self) -> bool {
        matches!(self, Self::InvalidDocument { .. })
    }

    /// Returns the path carried by the error, if any
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::VariableNotFound { path } | Self::InvalidPath { path, .. } => Some(path),
            Self::DuplicateKey { key } => Some(key),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for VariableJsonError {
    fn from(error: serde_json::Error) -> Self {
        Self::invalid_document(error.to_string())
    }
}

impl serde::de::Error for VariableJsonError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Self::Serde {
            message: msg.to_string(),
        }
    }
}
