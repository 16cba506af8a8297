//! Credential and token persistence
//!
//! Two independent repositories over a key-value backend: accounts keyed by
//! email, token records keyed by (identity, kind). No transaction spans the
//! two — operations that touch both must tolerate a crash between writes,
//! which is safe here because token expiry neutralizes any stale record.
//!
//! The backend is a collaborator; the traits below are its contract. The
//! bundled [`MemoryCredentialStore`]/[`MemoryTokenStore`] keep everything
//! in-process.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::account::Account;
use crate::token::TokenKind;

mod memory;
pub use memory::{MemoryCredentialStore, MemoryTokenStore};

/// Storage failures. `AlreadyExists`/`NotFound` are expected outcomes of the
/// conditional operations; `Backend` is an I/O-level fault.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record already exists")]
    AlreadyExists,

    #[error("record not found")]
    NotFound,

    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Account repository: one record per email.
///
/// `create`/`find`/`update_password` must be linearizable per email from
/// the store's perspective. In particular `create` is an atomic conditional
/// insert — two simultaneous creates for the same email resolve to exactly
/// one success and one `AlreadyExists`. Callers perform no locking of their
/// own and rely on this.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Insert a new account; fails with [`StoreError::AlreadyExists`] when a
    /// record for the email is already present. Returns the stored record.
    async fn create(&self, account: Account) -> Result<Account, StoreError>;

    /// Look up an account by email.
    async fn find(&self, email: &str) -> Result<Account, StoreError>;

    /// Overwrite only the password digest, leaving every other field alone.
    /// Fails with [`StoreError::NotFound`] if the email is absent.
    async fn update_password(&self, email: &str, new_digest: &str) -> Result<(), StoreError>;

    // No delete: accounts are never removed through this interface.
}

/// Bookkeeping entry for the most recently issued token of one kind.
///
/// Not authoritative for validity — signature verification is stateless —
/// only for revocation bookkeeping.
#[derive(Debug, Clone)]
pub struct TokenRecord {
    pub token: String,
    pub issued_at: DateTime<Utc>,
}

/// Token repository: at most one record per (identity, kind).
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Idempotent upsert keyed by (identity, kind); overwrites any prior
    /// token of the same kind. Concurrent puts resolve last-write-wins.
    async fn put(&self, identity: &str, kind: TokenKind, token: &str) -> Result<(), StoreError>;

    /// Remove the record if present. Deleting a missing record is not an
    /// error.
    async fn delete(&self, identity: &str, kind: TokenKind) -> Result<(), StoreError>;
}
