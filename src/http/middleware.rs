//! Bearer-token middleware
//!
//! Verifies the session token on protected routes and hands the decoded
//! identity to handlers through request extensions. Verification is
//! signature-plus-expiry only; the token store plays no part here.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use tracing::warn;

use crate::error::AuthError;
use crate::observability::SecurityEvent;
use crate::security_event;
use crate::token::TokenKind;

use super::AppState;

/// Identity decoded from a verified bearer token.
#[derive(Debug, Clone)]
pub struct Identity(pub String);

impl Identity {
    pub fn email(&self) -> &str {
        &self.0
    }
}

/// Require a valid session bearer token.
pub async fn require_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) if header.starts_with("Bearer ") => &header[7..],
        Some(_) => {
            warn!("malformed Authorization header");
            return Err(AuthError::Unauthorized);
        }
        None => return Err(AuthError::Unauthorized),
    };

    let claims = match state.issuer.verify(token, TokenKind::Session) {
        Ok(claims) => claims,
        Err(err) => {
            security_event!(
                SecurityEvent::TokenRejected,
                kind = %TokenKind::Session,
                reason = %err,
                "bearer token rejected"
            );
            return Err(err.into());
        }
    };

    request
        .extensions_mut()
        .insert(Identity(claims.sub));

    Ok(next.run(request).await)
}

impl<S> axum::extract::FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .ok_or(AuthError::Unauthorized)
    }
}
