//! Typed error handling for veneer
//!
//! The error hierarchy maps every failure the core can produce onto a stable
//! HTTP status and machine-readable code:
//!
//! - [`EntityError`]: entity read operations (not found)
//! - [`AuthError`]: sign-up / sign-in / sign-out failures
//! - [`StorageError`]: underlying store failures, propagated unmodified
//!
//! Malformed optional query input (bad filter syntax, non-numeric pagination)
//! is deliberately *not* represented here: the query parser defaults or drops
//! it, so an optional refinement can never turn a successful read into a
//! client error.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

/// The main error type for veneer request handling
#[derive(Debug)]
pub enum ApiError {
    /// Entity-related errors (read operations)
    Entity(EntityError),

    /// Authentication errors
    Auth(AuthError),

    /// Storage backend errors
    Storage(StorageError),

    /// Internal errors (should not happen in normal operation)
    Internal(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Entity(e) => write!(f, "{}", e),
            ApiError::Auth(e) => write!(f, "{}", e),
            ApiError::Storage(e) => write!(f, "{}", e),
            ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Entity(e) => Some(e),
            ApiError::Auth(e) => Some(e),
            ApiError::Storage(e) => Some(e),
            ApiError::Internal(_) => None,
        }
    }
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

impl ApiError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Entity(e) => e.status_code(),
            ApiError::Auth(e) => e.status_code(),
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Entity(e) => e.error_code(),
            ApiError::Auth(e) => e.error_code(),
            ApiError::Storage(_) => "STORAGE_ERROR",
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Convert to an error response body
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

// =============================================================================
// Entity Errors
// =============================================================================

/// Errors related to entity read operations
#[derive(Debug)]
pub enum EntityError {
    /// Entity was not found, or was found but rejected by a supplied filter
    NotFound { entity_type: String, id: Uuid },
}

impl fmt::Display for EntityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityError::NotFound { entity_type, id } => {
                write!(f, "{} with id '{}' not found", entity_type, id)
            }
        }
    }
}

impl std::error::Error for EntityError {}

impl EntityError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            EntityError::NotFound { .. } => StatusCode::NOT_FOUND,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            EntityError::NotFound { .. } => "ENTITY_NOT_FOUND",
        }
    }
}

impl From<EntityError> for ApiError {
    fn from(err: EntityError) -> Self {
        ApiError::Entity(err)
    }
}

// =============================================================================
// Auth Errors
// =============================================================================

/// Errors related to session authentication
#[derive(Debug)]
pub enum AuthError {
    /// Sign-up with an email that already has an account
    EmailTaken { email: String },

    /// Sign-up password and confirmation do not match
    PasswordMismatch,

    /// Unknown email or wrong password on sign-in
    InvalidCredentials,

    /// Operation requires a valid session
    SessionRequired,
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::EmailTaken { email } => {
                write!(f, "An account with email '{}' already exists", email)
            }
            AuthError::PasswordMismatch => {
                write!(f, "Password and password confirmation do not match")
            }
            AuthError::InvalidCredentials => write!(f, "Invalid email or password"),
            AuthError::SessionRequired => write!(f, "A valid session is required"),
        }
    }
}

impl std::error::Error for AuthError {}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::EmailTaken { .. } => StatusCode::BAD_REQUEST,
            AuthError::PasswordMismatch => StatusCode::BAD_REQUEST,
            AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::SessionRequired => StatusCode::UNAUTHORIZED,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::EmailTaken { .. } => "EMAIL_TAKEN",
            AuthError::PasswordMismatch => "PASSWORD_MISMATCH",
            AuthError::InvalidCredentials => "INVALID_CREDENTIALS",
            AuthError::SessionRequired => "SESSION_REQUIRED",
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        ApiError::Auth(err)
    }
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors related to storage backends
#[derive(Debug)]
pub enum StorageError {
    /// Query execution error
    QueryError { backend: String, message: String },
}

impl StorageError {
    /// Shorthand for an in-memory backend failure
    pub fn in_memory(message: impl Into<String>) -> Self {
        StorageError::QueryError {
            backend: "in-memory".to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::QueryError { backend, message } => {
                write!(f, "{} query error: {}", backend, message)
            }
        }
    }
}

impl std::error::Error for StorageError {}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        ApiError::Storage(err)
    }
}

/// A specialized Result type for veneer operations
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_error_display() {
        let err = EntityError::NotFound {
            entity_type: "user".to_string(),
            id: Uuid::nil(),
        };
        assert!(err.to_string().contains("user"));
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_entity_error_status_code() {
        let err = EntityError::NotFound {
            entity_type: "user".to_string(),
            id: Uuid::nil(),
        };
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_auth_error_status_codes() {
        assert_eq!(
            AuthError::EmailTaken {
                email: "a@b.c".to_string()
            }
            .status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AuthError::PasswordMismatch.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AuthError::InvalidCredentials.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::SessionRequired.status_code(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_api_error_conversion() {
        let entity_err = EntityError::NotFound {
            entity_type: "post".to_string(),
            id: Uuid::nil(),
        };
        let api_err: ApiError = entity_err.into();
        assert_eq!(api_err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(api_err.error_code(), "ENTITY_NOT_FOUND");
    }

    #[test]
    fn test_storage_error_propagates_as_500() {
        let err: ApiError = StorageError::in_memory("lock poisoned").into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.error_code(), "STORAGE_ERROR");
        assert!(err.to_string().contains("in-memory"));
    }

    #[test]
    fn test_error_response_serialization() {
        let err = ApiError::Auth(AuthError::InvalidCredentials);
        let response = err.to_response();
        assert_eq!(response.code, "INVALID_CREDENTIALS");
        assert!(!response.message.is_empty());
    }
}
