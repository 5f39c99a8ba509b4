//! Common error types for Canopy.

use thiserror::Error;

/// Coarse classification of a [`ResourceError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A missing attribute or path segment.
    NotFound,
    /// An attribute is present under a different type than requested.
    TypeMismatch,
    /// A child or root id collision.
    DuplicateId,
    /// A node that cannot be accepted where it was passed.
    InvalidArgument,
    /// A struct converter failed to produce a node.
    Conversion,
}

/// Errors that can occur during tree, registry and index operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResourceError {
    /// Attribute not found.
    #[error("Attribute not found: {0}")]
    AttributeNotFound(String),

    /// A path (or one of its segments) does not resolve.
    #[error("Path not found: {0}")]
    PathNotFound(String),

    /// Attribute stored under a different type.
    #[error("Type mismatch for attribute {key}: expected {expected}, got {actual}")]
    TypeMismatch {
        key: String,
        expected: &'static str,
        actual: &'static str,
    },

    /// Another child (or root) already uses this id.
    #[error("Duplicate id: {0}")]
    DuplicateId(String),

    /// Invalid argument.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Converter failure.
    #[error("Conversion failed: {0}")]
    Conversion(String),
}

impl ResourceError {
    /// Returns the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ResourceError::AttributeNotFound(_) | ResourceError::PathNotFound(_) => {
                ErrorKind::NotFound
            }
            ResourceError::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            ResourceError::DuplicateId(_) => ErrorKind::DuplicateId,
            ResourceError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            ResourceError::Conversion(_) => ErrorKind::Conversion,
        }
    }

    /// Returns true if this is a not-found error.
    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}

/// Result type for resource operations.
pub type ResourceResult<T> = Result<T, ResourceError>;
