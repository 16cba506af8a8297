//! Error handling and response envelope
//!
//! Domain failures are typed outcomes; collaborator failures (store, mailer)
//! are converted to a generic internal error at the operation boundary so
//! responses never leak backend detail. Internals are logged, clients see a
//! short message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::token::TokenError;
use crate::validation::ValidationError;

// ============================================================================
// Response Envelope
// ============================================================================

/// Uniform response body: a status flag, a human-readable message, and an
/// optional payload. Failure responses never carry a payload.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub status: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Successful response with a payload.
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            status: true,
            message: message.into(),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    /// Successful response with no payload.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            status: true,
            message: message.into(),
            data: None,
        }
    }

    /// Failure envelope; used by the `IntoResponse` impl below.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            status: false,
            message: message.into(),
            data: None,
        }
    }
}

// ============================================================================
// Domain Errors
// ============================================================================

/// Failures surfaced by authentication operations.
///
/// Expected domain outcomes (duplicate email, bad credentials, missing
/// account, rejected token) carry their own variants; everything else is
/// collapsed into [`AuthError::Internal`] with the detail kept out of the
/// client-visible message.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Malformed request input, rejected before any collaborator call.
    #[error("Invalid request: {0}")]
    Validation(String),

    /// An account already exists for the given email.
    #[error("Email already exists")]
    Conflict,

    /// Missing account or failed credential/token check.
    #[error("Authentication failed")]
    Unauthorized,

    /// The identity decoded from a reset token has no account.
    #[error("Account not found")]
    NotFound,

    /// Token signature did not match the expected signing key.
    #[error("Invalid token")]
    InvalidSignature,

    /// Token was well-formed but past its expiry.
    #[error("Token expired")]
    Expired,

    /// Collaborator failure; detail is logged, not exposed.
    #[error("Internal server error")]
    Internal(String),
}

impl AuthError {
    /// Wrap a collaborator failure. The detail is logged here and never
    /// reaches the response body.
    pub fn internal(details: impl std::fmt::Display) -> Self {
        let details = details.to_string();
        error!(error = %details, "internal error");
        Self::Internal(details)
    }

    /// HTTP status code this error maps to.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Conflict => StatusCode::CONFLICT,
            Self::Unauthorized | Self::InvalidSignature | Self::Expired => {
                StatusCode::UNAUTHORIZED
            }
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ValidationError> for AuthError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired => Self::Expired,
            TokenError::InvalidSignature => Self::InvalidSignature,
            TokenError::Encoding(details) => Self::internal(details),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let message = match &self {
            // Internal detail stays in the log.
            Self::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        };

        (self.status_code(), Json(ApiResponse::failure(message))).into_response()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AuthError::Validation("email: invalid format".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AuthError::Conflict.status_code(), StatusCode::CONFLICT);
        assert_eq!(
            AuthError::Unauthorized.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(AuthError::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            AuthError::InvalidSignature.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(AuthError::Expired.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AuthError::internal("boom").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_detail_not_exposed() {
        let err = AuthError::internal("connection refused to backend at 10.0.0.3");
        assert_eq!(err.to_string(), "Internal server error");
    }

    #[test]
    fn test_token_error_conversion() {
        assert!(matches!(
            AuthError::from(TokenError::Expired),
            AuthError::Expired
        ));
        assert!(matches!(
            AuthError::from(TokenError::InvalidSignature),
            AuthError::InvalidSignature
        ));
    }

    #[test]
    fn test_envelope_skips_empty_data() {
        let body = serde_json::to_value(ApiResponse::message("Logout successful")).unwrap();
        assert_eq!(body["status"], true);
        assert_eq!(body["message"], "Logout successful");
        assert!(body.get("data").is_none());
    }

    #[test]
    fn test_envelope_carries_data() {
        let body =
            serde_json::to_value(ApiResponse::success("ok", serde_json::json!({"id": 1}))).unwrap();
        assert_eq!(body["status"], true);
        assert_eq!(body["data"]["id"], 1);
    }
}
