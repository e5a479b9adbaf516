//! API error handling module
//!
//! Provides a unified error type for all API endpoints with structured error variants.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use imprint_core::RegistryError;
use thiserror::Error;

/// API error type with structured variants for different error categories
#[derive(Debug, Error)]
pub enum ApiError {
    /// Bad request - malformed body or parameter
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Not found - requested resource does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Internal server error - unexpected server-side failure
    #[error("Internal error: {0}")]
    Internal(String),

    /// Registry error - raised by the core registry
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),
}

impl ApiError {
    /// Create a bad request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Create an internal server error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Create a validation error listing the empty fields
    pub fn missing_fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Registry(RegistryError::missing(fields))
    }

    /// Create an unknown-operation error
    pub fn unknown_operation(mode: impl Into<String>) -> Self {
        Self::Registry(RegistryError::UnknownOperation(mode.into()))
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Registry(ref e) => match e {
                // Caller errors → 400
                RegistryError::Validation { .. } | RegistryError::UnknownOperation(_) => {
                    StatusCode::BAD_REQUEST
                }

                // Undecodable upload → 422
                RegistryError::Fingerprint(_) => StatusCode::UNPROCESSABLE_ENTITY,

                RegistryError::DuplicateExactHash { .. } => StatusCode::CONFLICT,

                // Never surfaced by a request path; treated as internal
                RegistryError::LengthMismatch { .. } | RegistryError::Notification(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
        }
    }

    /// Get the error code for programmatic error handling
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "INVALID_INPUT",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Internal(_) => "INTERNAL_ERROR",
            Self::Registry(ref e) => match e {
                RegistryError::Validation { .. } => "VALIDATION_ERROR",
                RegistryError::UnknownOperation(_) => "UNKNOWN_OPERATION",
                RegistryError::Fingerprint(_) => "FINGERPRINT_ERROR",
                RegistryError::LengthMismatch { .. } => "HASH_LENGTH_MISMATCH",
                RegistryError::Notification(_) => "NOTIFICATION_ERROR",
                RegistryError::DuplicateExactHash { .. } => "DUPLICATE_CONTENT",
            },
        }
    }

    /// Get sanitized error message for client response
    fn client_message(&self) -> String {
        match self {
            Self::Registry(ref e) => match e {
                RegistryError::Validation { .. } => e.to_string(),
                RegistryError::UnknownOperation(mode) if mode.is_empty() => {
                    "Unknown mode: expected \"register\" or \"claim\"".to_string()
                }
                RegistryError::UnknownOperation(mode) => {
                    format!("Unknown mode '{mode}': expected \"register\" or \"claim\"")
                }
                RegistryError::Fingerprint(_) => "Content could not be fingerprinted".to_string(),
                RegistryError::DuplicateExactHash { .. } => {
                    "Content is already registered".to_string()
                }
                RegistryError::LengthMismatch { .. } | RegistryError::Notification(_) => {
                    "Internal registry error".to_string()
                }
            },
            Self::Internal(_) => "Internal server error".to_string(),
            // For other errors, use the Display message
            _ => self.to_string(),
        }
    }

    /// Get the error category for logging
    fn error_category(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "bad_request",
            Self::NotFound(_) => "not_found",
            Self::Internal(_) => "internal",
            Self::Registry(_) => "registry",
        }
    }

    /// Names of the empty fields, for validation errors
    fn missing_field_names(&self) -> Option<&[String]> {
        match self {
            Self::Registry(RegistryError::Validation { missing_fields }) => Some(missing_fields.as_slice()),
            _ => None,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let category = self.error_category();
        let code = self.error_code();
        let internal_message = self.to_string();
        let client_message = self.client_message();

        // Log based on severity, always including internal details
        if status.is_server_error() {
            tracing::error!(
                status = %status,
                category = category,
                code = code,
                error = %internal_message,
                "Server error"
            );
        } else {
            tracing::warn!(
                status = %status,
                category = category,
                code = code,
                error = %internal_message,
                "Client error"
            );
        }

        // All error responses include a `code` field for programmatic error handling
        let mut body = serde_json::json!({
            "error": client_message,
            "code": code,
        });
        if let Some(fields) = self.missing_field_names() {
            body["missingFields"] = serde_json::json!(fields);
        }

        (status, Json(body)).into_response()
    }
}
