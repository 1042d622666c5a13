//! Unified error types for all layers of the authorization engine.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use thiserror::Error;

/// Unified error type for the Lumen admin authorization engine.
///
/// The engine deliberately keeps a small taxonomy: bad input to a mutating
/// operation, a missing grant, and genuine persistence failure. A denied
/// authorization check is a verdict, never an error.
#[derive(Error, Debug)]
pub enum LumenError {
    /// Resource not found
    #[error("Resource not found: {resource_type} with id {id}")]
    NotFound {
        resource_type: &'static str,
        id: String,
    },

    /// Validation error (invalid role tier, unparseable allow-list entry,
    /// duplicate grant creation)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Underlying persistence failure. Callers must distinguish this from a
    /// DENY verdict: "could not determine" is not "determined: no".
    #[error("Store error: {0}")]
    Store(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Generic error wrapper
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LumenError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotFound { .. } => 404,
            Self::Validation(_) => 400,
            Self::Store(_) | Self::Internal(_) | Self::Other(_) => 500,
        }
    }

    /// Returns a machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Store(_) => "STORE_ERROR",
            Self::Internal(_) | Self::Other(_) => "INTERNAL_ERROR",
        }
    }

    /// Creates a not found error for a resource.
    #[must_use]
    pub fn not_found<T: ToString>(resource_type: &'static str, id: T) -> Self {
        Self::NotFound {
            resource_type,
            id: id.to_string(),
        }
    }

    /// Creates a validation error.
    #[must_use]
    pub fn validation<T: Into<String>>(message: T) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a store error.
    #[must_use]
    pub fn store<T: Into<String>>(message: T) -> Self {
        Self::Store(message.into())
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal<T: Into<String>>(message: T) -> Self {
        Self::Internal(message.into())
    }

    /// Checks if this error is retriable.
    #[must_use]
    pub const fn is_retriable(&self) -> bool {
        matches!(self, Self::Store(_))
    }
}

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for LumenError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => Self::NotFound {
                resource_type: "database_row",
                id: "unknown".to_string(),
            },
            sqlx::Error::Database(db_err) => {
                // Unique constraint violation means a second grant for the
                // same user raced past the existence check.
                if let Some(code) = db_err.code() {
                    if code == "23505" || code == "1062" {
                        return Self::Validation(db_err.message().to_string());
                    }
                }
                Self::Store(err.to_string())
            }
            _ => Self::Store(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for LumenError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(format!("JSON serialization error: {}", err))
    }
}

/// Serializable error response for API callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Machine-readable error code
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

impl ErrorResponse {
    /// Creates a new error response from a `LumenError`.
    #[must_use]
    pub fn from_error(error: &LumenError) -> Self {
        Self {
            code: error.error_code().to_string(),
            message: error.to_string(),
        }
    }
}

impl From<&LumenError> for ErrorResponse {
    fn from(error: &LumenError) -> Self {
        Self::from_error(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(LumenError::not_found("Grant", 1).status_code(), 404);
        assert_eq!(LumenError::validation("bad cidr").status_code(), 400);
        assert_eq!(LumenError::store("connection lost").status_code(), 500);
        assert_eq!(LumenError::internal("oops").status_code(), 500);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(LumenError::not_found("Grant", 1).error_code(), "NOT_FOUND");
        assert_eq!(LumenError::validation("bad").error_code(), "VALIDATION_ERROR");
        assert_eq!(LumenError::store("io").error_code(), "STORE_ERROR");
        assert_eq!(LumenError::internal("bug").error_code(), "INTERNAL_ERROR");
    }

    #[test]
    fn test_retriable_errors() {
        assert!(LumenError::store("connection lost").is_retriable());
        assert!(!LumenError::validation("bad input").is_retriable());
        assert!(!LumenError::not_found("Grant", 1).is_retriable());
    }

    #[test]
    fn test_error_constructors() {
        let not_found = LumenError::not_found("Grant", "123");
        assert!(not_found.to_string().contains("Grant"));

        let validation = LumenError::validation("invalid entry");
        assert!(validation.to_string().contains("invalid entry"));

        let store = LumenError::store("timeout");
        assert!(store.to_string().contains("timeout"));
    }

    #[test]
    fn test_error_response_from_error() {
        let err = LumenError::not_found("Grant", 1);
        let response = ErrorResponse::from_error(&err);
        assert_eq!(response.code, "NOT_FOUND");
        assert!(!response.message.is_empty());
    }
}
