//! HTTP surface
//!
//! Transport plumbing around the authenticator: routing, request parsing,
//! bearer middleware, and cross-cutting tower layers. No domain behavior
//! lives here.

pub mod handlers;
pub mod middleware;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer, limit::RequestBodyLimitLayer, timeout::TimeoutLayer, trace::TraceLayer,
};

use crate::authenticator::Authenticator;
use crate::token::TokenIssuer;

pub use middleware::Identity;

const MAX_BODY_BYTES: usize = 64 * 1024;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// State shared across handlers and middleware.
#[derive(Clone)]
pub struct AppState {
    pub auth: Authenticator,
    pub issuer: Arc<TokenIssuer>,
}

/// Build the service router.
pub fn router(state: AppState) -> Router {
    let public = Router::new()
        .route("/health", get(handlers::health))
        .route("/auth/register", post(handlers::register))
        .route("/auth/login", post(handlers::login))
        .route(
            "/auth/password/forgot",
            post(handlers::request_password_reset),
        )
        .route(
            "/auth/password/reset/{token}",
            post(handlers::complete_password_reset),
        );

    let protected = Router::new()
        .route("/auth/logout", post(handlers::logout))
        .route("/auth/me", get(handlers::me))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::require_session,
        ));

    Router::new()
        .merge(public)
        .merge(protected)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
}
