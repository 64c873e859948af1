//! Error types for schema conversion.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stable, machine-readable error codes.
///
/// The serialized `snake_case` strings are part of the public API, so variant
/// names must not change once published.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum ErrorCode {
    /// Input file missing, unreadable, unparsable, or without the root entry.
    LoadError,
    /// Data type code whose 4-character prefix is not a known kind.
    UnknownType,
    /// Empty path segment or misplaced array marker.
    MalformedPath,
    /// Internal invariant violated by an earlier stage.
    ConsistencyError,
    /// Path or inline nesting deeper than `ConvertOptions::max_depth`.
    RecursionDepthExceeded,
}

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("Failed to load schema from {path}: {message}")]
    Load { path: String, message: String },

    #[error("Unknown data type '{data_type}' at {path}")]
    UnknownType { path: String, data_type: String },

    #[error("Malformed path '{path}': {message}")]
    MalformedPath { path: String, message: String },

    #[error("Consistency error at {path}: {message}")]
    Consistency { path: String, message: String },

    #[error("Recursion depth exceeded at {path} (max: {max_depth})")]
    RecursionDepthExceeded { path: String, max_depth: usize },
}

impl ConvertError {
    /// Returns the stable error code for this error variant.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            ConvertError::Load { .. } => ErrorCode::LoadError,
            ConvertError::UnknownType { .. } => ErrorCode::UnknownType,
            ConvertError::MalformedPath { .. } => ErrorCode::MalformedPath,
            ConvertError::Consistency { .. } => ErrorCode::ConsistencyError,
            ConvertError::RecursionDepthExceeded { .. } => ErrorCode::RecursionDepthExceeded,
        }
    }

    /// Returns the offending location: a file path for `Load`, a dotted
    /// schema path otherwise.
    pub fn path(&self) -> &str {
        match self {
            ConvertError::Load { path, .. }
            | ConvertError::UnknownType { path, .. }
            | ConvertError::MalformedPath { path, .. }
            | ConvertError::Consistency { path, .. }
            | ConvertError::RecursionDepthExceeded { path, .. } => path,
        }
    }

    pub(crate) fn consistency(path: impl Into<String>, message: impl Into<String>) -> Self {
        ConvertError::Consistency {
            path: path.into(),
            message: message.into(),
        }
    }

    pub(crate) fn malformed_path(path: impl Into<String>, message: impl Into<String>) -> Self {
        ConvertError::MalformedPath {
            path: path.into(),
            message: message.into(),
        }
    }
}
