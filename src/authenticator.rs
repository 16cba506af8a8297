//! Authentication orchestrator
//!
//! Composes the credential store, token store, password hasher, token issuer,
//! and mailer into the account operations: register, login, logout,
//! authenticate, and the two halves of the password-reset flow.
//!
//! Each operation is a short sequence of collaborator calls with no internal
//! concurrency. Cross-request consistency is delegated to the stores — most
//! importantly the credential store's atomic conditional create, which is
//! what makes two simultaneous registrations for one email resolve to
//! exactly one success. The orchestrator itself takes no locks.

use std::sync::Arc;

use serde::Serialize;

use crate::account::Account;
use crate::error::AuthError;
use crate::mailer::{reset_email, Mailer};
use crate::observability::SecurityEvent;
use crate::password::PasswordHasher;
use crate::security_event;
use crate::store::{CredentialStore, StoreError, TokenStore};
use crate::token::{TokenIssuer, TokenKind};

/// Successful login payload: the bearer token plus the account it grants.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub token: String,
    pub expires_in: u64,
    pub account: Account,
}

/// Orchestrates the credential and token lifecycle.
///
/// Holds no state of its own beyond the injected collaborators; safe to
/// clone/share across request handlers.
#[derive(Clone)]
pub struct Authenticator {
    credentials: Arc<dyn CredentialStore>,
    tokens: Arc<dyn TokenStore>,
    hasher: PasswordHasher,
    issuer: Arc<TokenIssuer>,
    mailer: Arc<dyn Mailer>,
    reset_link_base: String,
}

impl Authenticator {
    pub fn new(
        credentials: Arc<dyn CredentialStore>,
        tokens: Arc<dyn TokenStore>,
        issuer: Arc<TokenIssuer>,
        mailer: Arc<dyn Mailer>,
        reset_link_base: impl Into<String>,
    ) -> Self {
        Self {
            credentials,
            tokens,
            hasher: PasswordHasher::new(),
            issuer,
            mailer,
            reset_link_base: reset_link_base.into(),
        }
    }

    // ========================================================================
    // Registration
    // ========================================================================

    /// Create an account for `email`.
    ///
    /// The duplicate check is the store's conditional insert, not a separate
    /// find: under two concurrent registrations for the same email exactly
    /// one caller gets the account, the other gets [`AuthError::Conflict`].
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        profile: serde_json::Map<String, serde_json::Value>,
    ) -> Result<Account, AuthError> {
        let digest = self.hasher.hash(password).map_err(AuthError::internal)?;

        let stored = self
            .credentials
            .create(Account::new(email, digest, profile))
            .await
            .map_err(|e| match e {
                StoreError::AlreadyExists => AuthError::Conflict,
                other => AuthError::internal(other),
            })?;

        security_event!(
            SecurityEvent::UserRegistered,
            identity = %stored.email,
            "account registered"
        );

        Ok(stored)
    }

    // ========================================================================
    // Session lifecycle
    // ========================================================================

    /// Verify credentials and issue a session token.
    ///
    /// An unknown email and a wrong password are the same outcome to the
    /// caller; the distinction only reaches the audit log.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let account = match self.credentials.find(email).await {
            Ok(account) => account,
            Err(StoreError::NotFound) => {
                security_event!(
                    SecurityEvent::AuthenticationFailure,
                    identity = %email,
                    reason = "unknown_identity",
                    "login failed"
                );
                return Err(AuthError::Unauthorized);
            }
            Err(other) => return Err(AuthError::internal(other)),
        };

        if !self.hasher.verify(password, &account.password_digest) {
            security_event!(
                SecurityEvent::AuthenticationFailure,
                identity = %email,
                reason = "wrong_password",
                "login failed"
            );
            return Err(AuthError::Unauthorized);
        }

        let token = self.issuer.issue(&account.email, TokenKind::Session)?;

        // Last write wins: a concurrent login for the same identity may
        // overwrite this record, but both issued tokens stay independently
        // valid until their own expiry.
        self.tokens
            .put(&account.email, TokenKind::Session, &token)
            .await
            .map_err(AuthError::internal)?;

        security_event!(
            SecurityEvent::AuthenticationSuccess,
            identity = %account.email,
            "login succeeded"
        );
        security_event!(
            SecurityEvent::SessionCreated,
            identity = %account.email,
            "session token recorded"
        );

        Ok(Session {
            token,
            expires_in: self.issuer.ttl_secs(TokenKind::Session),
            account,
        })
    }

    /// Clear the recorded session token for `identity`. Idempotent.
    pub async fn logout(&self, identity: &str) -> Result<(), AuthError> {
        self.tokens
            .delete(identity, TokenKind::Session)
            .await
            .map_err(AuthError::internal)?;

        security_event!(
            SecurityEvent::Logout,
            identity = %identity,
            "session record cleared"
        );

        Ok(())
    }

    /// Resolve a previously verified identity to its account.
    ///
    /// The caller has already verified the bearer token's signature and
    /// expiry (the HTTP middleware does this); only the account's existence
    /// is checked here. The token store is not consulted, so logout does not
    /// invalidate tokens still inside their expiry window.
    pub async fn authenticate(&self, identity: &str) -> Result<Account, AuthError> {
        match self.credentials.find(identity).await {
            Ok(account) => Ok(account),
            Err(StoreError::NotFound) => Err(AuthError::Unauthorized),
            Err(other) => Err(AuthError::internal(other)),
        }
    }

    // ========================================================================
    // Password reset
    // ========================================================================

    /// Issue a reset token for `email` and hand the rendered message to the
    /// mailer. The response carries nothing sensitive; the token travels
    /// only inside the email link.
    pub async fn request_password_reset(&self, email: &str) -> Result<(), AuthError> {
        let account = match self.credentials.find(email).await {
            Ok(account) => account,
            Err(StoreError::NotFound) => return Err(AuthError::Unauthorized),
            Err(other) => return Err(AuthError::internal(other)),
        };

        let token = self.issuer.issue(&account.email, TokenKind::Reset)?;
        self.tokens
            .put(&account.email, TokenKind::Reset, &token)
            .await
            .map_err(AuthError::internal)?;

        let valid_minutes = self.issuer.ttl_secs(TokenKind::Reset) / 60;
        let message = reset_email(&account.email, &token, &self.reset_link_base, valid_minutes);
        self.mailer
            .send(&message)
            .await
            .map_err(AuthError::internal)?;

        security_event!(
            SecurityEvent::PasswordResetRequested,
            identity = %account.email,
            "reset token issued"
        );

        Ok(())
    }

    /// Verify a reset token and overwrite the account's password.
    ///
    /// The password write and the token-record delete are not atomic; a
    /// crash between them leaves a stale reset record that the token's own
    /// expiry neutralizes.
    pub async fn complete_password_reset(
        &self,
        token: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        let claims = match self.issuer.verify(token, TokenKind::Reset) {
            Ok(claims) => claims,
            Err(err) => {
                security_event!(
                    SecurityEvent::TokenRejected,
                    kind = %TokenKind::Reset,
                    reason = %err,
                    "reset token rejected"
                );
                return Err(err.into());
            }
        };

        let account = match self.credentials.find(claims.identity()).await {
            Ok(account) => account,
            Err(StoreError::NotFound) => return Err(AuthError::NotFound),
            Err(other) => return Err(AuthError::internal(other)),
        };

        let digest = self.hasher.hash(new_password).map_err(AuthError::internal)?;
        self.credentials
            .update_password(&account.email, &digest)
            .await
            .map_err(|e| match e {
                StoreError::NotFound => AuthError::NotFound,
                other => AuthError::internal(other),
            })?;

        self.tokens
            .delete(&account.email, TokenKind::Reset)
            .await
            .map_err(AuthError::internal)?;

        security_event!(
            SecurityEvent::PasswordChanged,
            identity = %account.email,
            "password reset completed"
        );

        Ok(())
    }
}
