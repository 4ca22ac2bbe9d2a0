//! Typed error handling for the location data service
//!
//! Every [`RecordStore`](crate::core::RecordStore) operation fails with a
//! [`ServiceError`], so callers can react to a specific failure instead of
//! inspecting a generic `anyhow::Error`.
//!
//! # Error Categories
//!
//! - [`ValidationError`]: malformed drafts, updates or query parameters
//! - [`ServiceError::NotFound`]: an operation referenced an unknown id
//! - [`PersistenceError`]: the storage medium failed to read or write
//! - [`ConfigError`]: configuration could not be loaded or is inconsistent
//!
//! # Example
//!
//! ```rust,ignore
//! match store.get_by_id(&loc_id).await {
//!     Ok(loc) => show(loc),
//!     Err(ServiceError::NotFound { id }) => flash(format!("{id} is gone")),
//!     Err(e) => flash(format!("Cannot load location: {e}")),
//! }
//! ```

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type of the service
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Input failed validation
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No location is stored under this id
    #[error("location with id '{id}' not found")]
    NotFound { id: String },

    /// The storage backend failed
    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    /// Configuration errors
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ServiceError {
    /// Build a `NotFound` error for `id`
    pub fn not_found(id: impl Into<String>) -> Self {
        ServiceError::NotFound { id: id.into() }
    }

    /// Get the error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            ServiceError::Validation(_) => "VALIDATION_ERROR",
            ServiceError::NotFound { .. } => "LOCATION_NOT_FOUND",
            ServiceError::Persistence(e) => e.error_code(),
            ServiceError::Config(_) => "CONFIG_ERROR",
        }
    }

    /// True for `NotFound`
    pub fn is_not_found(&self) -> bool {
        matches!(self, ServiceError::NotFound { .. })
    }

    /// True for validation failures
    pub fn is_validation(&self) -> bool {
        matches!(self, ServiceError::Validation(_))
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// A single field validation error
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldValidationError {
    pub field: String,
    pub message: String,
}

impl FieldValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Errors related to input validation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Single field validation error
    #[error("validation error for field '{field}': {message}")]
    FieldError { field: String, message: String },

    /// Multiple field validation errors
    #[error("validation errors: {}", join_fields(.0))]
    FieldErrors(Vec<FieldValidationError>),

    /// A query parameter could not be interpreted
    #[error("invalid value '{value}' for parameter '{name}': {message}")]
    InvalidParam {
        name: String,
        value: String,
        message: String,
    },
}

impl ValidationError {
    /// All offending fields, flattened
    pub fn fields(&self) -> Vec<&str> {
        match self {
            ValidationError::FieldError { field, .. } => vec![field.as_str()],
            ValidationError::FieldErrors(errors) => {
                errors.iter().map(|e| e.field.as_str()).collect()
            }
            ValidationError::InvalidParam { name, .. } => vec![name.as_str()],
        }
    }
}

fn join_fields(errors: &[FieldValidationError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join(", ")
}

// =============================================================================
// Persistence Errors
// =============================================================================

/// Errors raised by storage backends
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// Filesystem failure
    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A record could not be serialized
    #[error("failed to encode location: {message}")]
    Encode { message: String },

    /// Stored bytes could not be deserialized
    #[error("failed to decode stored data: {message}")]
    Decode { message: String },

    /// A stored record decoded but violates the schema
    #[error("stored location '{id}' is corrupted: {message}")]
    Corrupted { id: String, message: String },

    /// Backend-specific failure
    #[error("{backend} backend error: {message}")]
    Backend { backend: String, message: String },
}

impl PersistenceError {
    pub fn backend(backend: impl Into<String>, message: impl ToString) -> Self {
        PersistenceError::Backend {
            backend: backend.into(),
            message: message.to_string(),
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            PersistenceError::Corrupted { .. } => "PERSISTENCE_CORRUPTED",
            _ => "PERSISTENCE_ERROR",
        }
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file could not be read
    #[error("failed to read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse configuration
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// Invalid value in configuration
    #[error("invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl ConfigError {
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(err: serde_json::Error) -> Self {
        PersistenceError::Decode {
            message: err.to_string(),
        }
    }
}
