//! Request handlers
//!
//! Thin translation between the wire format and the authenticator: parse and
//! validate input, call the operation, wrap the outcome in the response
//! envelope. Response messages are stable strings; failure detail never
//! leaves the log.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::account::Account;
use crate::authenticator::Session;
use crate::error::{ApiResponse, AuthError};
use crate::validation::{validate_email, validate_length};

use super::middleware::Identity;
use super::AppState;

const PASSWORD_MAX_LEN: usize = 128;

// ============================================================================
// Registration
// ============================================================================

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    /// Everything else in the body becomes the account's profile.
    #[serde(flatten)]
    pub profile: serde_json::Map<String, serde_json::Value>,
}

pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Account>>), AuthError> {
    validate_email(&input.email)?;
    validate_length(&input.password, 1, PASSWORD_MAX_LEN, "password")?;

    let account = state
        .auth
        .register(&input.email, &input.password, input.profile)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("Customer created successfully", account)),
    ))
}

// ============================================================================
// Session
// ============================================================================

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> Result<Json<ApiResponse<Session>>, AuthError> {
    let session = state.auth.login(&input.email, &input.password).await?;
    Ok(Json(ApiResponse::success("Auth successful", session)))
}

pub async fn logout(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Json<ApiResponse<()>>, AuthError> {
    state.auth.logout(identity.email()).await?;
    Ok(Json(ApiResponse::message("Logout successful")))
}

/// "Who am I" lookup for the bearer identity.
pub async fn me(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Json<ApiResponse<Account>>, AuthError> {
    let account = state.auth.authenticate(identity.email()).await?;
    Ok(Json(ApiResponse::success("User found", account)))
}

// ============================================================================
// Password reset
// ============================================================================

#[derive(Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

pub async fn request_password_reset(
    State(state): State<AppState>,
    Json(input): Json<ForgotPasswordRequest>,
) -> Result<Json<ApiResponse<()>>, AuthError> {
    validate_email(&input.email)?;

    state.auth.request_password_reset(&input.email).await?;
    Ok(Json(ApiResponse::message("Email sent successfully")))
}

#[derive(Deserialize)]
pub struct ResetPasswordRequest {
    pub password: String,
}

pub async fn complete_password_reset(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Json(input): Json<ResetPasswordRequest>,
) -> Result<Json<ApiResponse<()>>, AuthError> {
    validate_length(&input.password, 1, PASSWORD_MAX_LEN, "password")?;

    state
        .auth
        .complete_password_reset(&token, &input.password)
        .await?;
    Ok(Json(ApiResponse::message("Password reset successful")))
}

// ============================================================================
// Health
// ============================================================================

/// Liveness check.
pub async fn health() -> &'static str {
    "OK"
}
