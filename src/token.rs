//! Signed token issuance and verification
//!
//! Session and reset tokens are HS256 JWTs. Each kind is signed with its own
//! secret, so a reset token can never pass verification as a session token
//! (or vice versa) — the kind discriminator is the signing key itself, not a
//! claim an attacker could edit.
//!
//! Verification is stateless: signature plus expiry, nothing else. The token
//! store (see [`crate::store`]) is revocation bookkeeping and is never
//! consulted here.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default session token lifetime: one hour.
pub const DEFAULT_SESSION_TTL_SECS: u64 = 60 * 60;

/// Default reset token lifetime: twenty minutes.
pub const DEFAULT_RESET_TTL_SECS: u64 = 20 * 60;

/// Discriminates the two token families and selects the signing secret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Bearer token issued on login.
    Session,
    /// Short-lived token issued for password reset.
    Reset,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Session => "session",
            Self::Reset => "reset",
        }
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Token verification/creation failures.
#[derive(Debug, Error)]
pub enum TokenError {
    /// Well-formed and correctly signed, but past its expiry.
    #[error("token expired")]
    Expired,

    /// Signature mismatch, malformed token, or a token signed for the other
    /// kind.
    #[error("invalid token signature")]
    InvalidSignature,

    /// Signing failed; only plausible with broken key material.
    #[error("token encoding failed: {0}")]
    Encoding(String),
}

/// Claims carried by every issued token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Identity: the account email.
    pub sub: String,
    /// Issued-at (Unix seconds).
    pub iat: i64,
    /// Expiry (Unix seconds).
    pub exp: i64,
    /// Random token id, for audit correlation.
    pub jti: String,
}

impl Claims {
    pub fn identity(&self) -> &str {
        &self.sub
    }
}

struct KindKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_secs: u64,
}

impl KindKeys {
    fn new(secret: &str, ttl_secs: u64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl_secs,
        }
    }
}

/// Mints and verifies signed tokens.
///
/// Holds one key pair per [`TokenKind`], fixed at construction from the
/// injected configuration. Immutable and cheap to share for the process
/// lifetime.
pub struct TokenIssuer {
    session: KindKeys,
    reset: KindKeys,
}

impl TokenIssuer {
    pub fn new(
        session_secret: &str,
        reset_secret: &str,
        session_ttl_secs: u64,
        reset_ttl_secs: u64,
    ) -> Self {
        Self {
            session: KindKeys::new(session_secret, session_ttl_secs),
            reset: KindKeys::new(reset_secret, reset_ttl_secs),
        }
    }

    fn keys(&self, kind: TokenKind) -> &KindKeys {
        match kind {
            TokenKind::Session => &self.session,
            TokenKind::Reset => &self.reset,
        }
    }

    /// Lifetime configured for the given kind, in seconds.
    pub fn ttl_secs(&self, kind: TokenKind) -> u64 {
        self.keys(kind).ttl_secs
    }

    /// Mint a signed token for `identity`, expiring after the kind's
    /// configured lifetime.
    pub fn issue(&self, identity: &str, kind: TokenKind) -> Result<String, TokenError> {
        let keys = self.keys(kind);
        let now = Utc::now();
        let exp = now + Duration::seconds(keys.ttl_secs as i64);

        let claims = Claims {
            sub: identity.to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            jti: uuid::Uuid::new_v4().to_string(),
        };

        encode(&Header::default(), &claims, &keys.encoding)
            .map_err(|e| TokenError::Encoding(e.to_string()))
    }

    /// Verify a token against the given kind's secret and decode its claims.
    ///
    /// Rejects with [`TokenError::Expired`] when past expiry (zero clock-skew
    /// leeway) and [`TokenError::InvalidSignature`] for everything else —
    /// including tokens signed with the other kind's secret.
    pub fn verify(&self, token: &str, kind: TokenKind) -> Result<Claims, TokenError> {
        let mut validation = Validation::default();
        validation.leeway = 0;

        decode::<Claims>(token, &self.keys(kind).decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::InvalidSignature,
            })
    }
}
