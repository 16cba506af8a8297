//! Service entry point
//!
//! Wires configuration, stores, token issuer, and mailer into the router and
//! serves it.

use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use portcullis::config::AppConfig;
use portcullis::http::{router, AppState};
use portcullis::mailer::LogMailer;
use portcullis::observability::{init_tracing, SecurityEvent};
use portcullis::security_event;
use portcullis::store::{MemoryCredentialStore, MemoryTokenStore};
use portcullis::{Authenticator, TokenIssuer};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = AppConfig::from_env()?;

    let issuer = Arc::new(TokenIssuer::new(
        &config.session_secret,
        &config.reset_secret,
        config.session_ttl_secs,
        config.reset_ttl_secs,
    ));

    let auth = Authenticator::new(
        Arc::new(MemoryCredentialStore::new()),
        Arc::new(MemoryTokenStore::new()),
        issuer.clone(),
        Arc::new(LogMailer),
        config.reset_link_base.clone(),
    );

    let app = router(AppState { auth, issuer });

    security_event!(
        SecurityEvent::SystemStartup,
        address = %config.bind_addr,
        "service starting"
    );

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!(address = %config.bind_addr, "server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
