//! Error types for Admin Forge
//!
//! This module provides unified error handling across the framework:
//! schema validation failures, remote transport failures, mock lookups
//! and configuration problems all surface as one `AdminError`.

use crate::validation::ValidationError;
use thiserror::Error;

/// The main error type for Admin Forge
#[derive(Debug, Error)]
pub enum AdminError {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    /// A candidate record failed schema validation
    #[error("Validation error: {0}")]
    Validation(ValidationError),

    /// An entity config references something its schema does not define
    #[error("Invalid entity config for '{entity}': {message}")]
    InvalidEntity { entity: String, message: String },

    // ========================================================================
    // Service Errors
    // ========================================================================
    /// Remote API answered with a non-success status
    #[error("HTTP error ({status}): {message}")]
    Http { status: u16, message: String },

    /// The request never produced a response (connection refused, timeout)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Response body did not have the expected shape
    #[error("Unexpected response shape: {0}")]
    Decode(String),

    /// Record not found by id
    #[error("{entity} with id '{id}' not found")]
    NotFound { entity: String, id: String },

    /// Operation is not available for this entity
    #[error("Not implemented: {0}")]
    NotImplemented(String),

    // ========================================================================
    // Serialization / IO Errors
    // ========================================================================
    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// File IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl AdminError {
    /// Create a not-found error
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        AdminError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Create a not-implemented error
    pub fn not_implemented(msg: impl Into<String>) -> Self {
        AdminError::NotImplemented(msg.into())
    }

    /// Create an entity config error
    pub fn invalid_entity(entity: impl Into<String>, msg: impl Into<String>) -> Self {
        AdminError::InvalidEntity {
            entity: entity.into(),
            message: msg.into(),
        }
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        AdminError::Config(msg.into())
    }

    /// Check if this error is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, AdminError::Validation(_))
    }

    /// Check if this error is a not-found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, AdminError::NotFound { .. })
    }

    /// Check if this error is a remote status error
    pub fn is_http(&self) -> bool {
        matches!(self, AdminError::Http { .. })
    }

    /// Check if this error comes from a disabled operation
    pub fn is_not_implemented(&self) -> bool {
        matches!(self, AdminError::NotImplemented(_))
    }

    /// HTTP status carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            AdminError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<ValidationError> for AdminError {
    fn from(err: ValidationError) -> Self {
        AdminError::Validation(err)
    }
}

/// Result type alias using AdminError
pub type AdminResult<T> = Result<T, AdminError>;

// ============================================================================
// Tests
// ============================================================================
