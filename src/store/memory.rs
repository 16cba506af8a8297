//! In-process store backends
//!
//! Suitable for single-instance deployments and tests. For a shared backend,
//! implement [`CredentialStore`]/[`TokenStore`] over Redis, PostgreSQL, or
//! another store with an atomic conditional write.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;

use crate::account::Account;
use crate::token::TokenKind;

use super::{CredentialStore, StoreError, TokenRecord, TokenStore};

/// Account repository backed by a write-locked map.
///
/// The conditional insert in `create` holds the write lock for the whole
/// check-and-insert, which is what makes the duplicate-email race resolve to
/// exactly one winner.
#[derive(Default)]
pub struct MemoryCredentialStore {
    accounts: RwLock<HashMap<String, Account>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn create(&self, account: Account) -> Result<Account, StoreError> {
        let mut accounts = self.accounts.write();
        match accounts.entry(account.email.clone()) {
            Entry::Occupied(_) => Err(StoreError::AlreadyExists),
            Entry::Vacant(slot) => {
                slot.insert(account.clone());
                Ok(account)
            }
        }
    }

    async fn find(&self, email: &str) -> Result<Account, StoreError> {
        self.accounts
            .read()
            .get(email)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn update_password(&self, email: &str, new_digest: &str) -> Result<(), StoreError> {
        let mut accounts = self.accounts.write();
        let account = accounts.get_mut(email).ok_or(StoreError::NotFound)?;
        account.password_digest = new_digest.to_string();
        Ok(())
    }
}

/// Token repository backed by a write-locked map.
#[derive(Default)]
pub struct MemoryTokenStore {
    records: RwLock<HashMap<(String, TokenKind), TokenRecord>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inspect the currently recorded token for (identity, kind).
    ///
    /// Not part of the store contract — authentication never reads back
    /// tokens — but useful for tests and operational checks.
    pub fn current(&self, identity: &str, kind: TokenKind) -> Option<TokenRecord> {
        self.records
            .read()
            .get(&(identity.to_string(), kind))
            .cloned()
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn put(&self, identity: &str, kind: TokenKind, token: &str) -> Result<(), StoreError> {
        self.records.write().insert(
            (identity.to_string(), kind),
            TokenRecord {
                token: token.to_string(),
                issued_at: Utc::now(),
            },
        );
        Ok(())
    }

    async fn delete(&self, identity: &str, kind: TokenKind) -> Result<(), StoreError> {
        self.records.write().remove(&(identity.to_string(), kind));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn account(email: &str) -> Account {
        Account::new(email, "digest", serde_json::Map::new())
    }

    #[tokio::test]
    async fn test_create_then_find() {
        let store = MemoryCredentialStore::new();

        let stored = store.create(account("a@x.com")).await.unwrap();
        assert_eq!(stored.email, "a@x.com");

        let found = store.find("a@x.com").await.unwrap();
        assert_eq!(found.email, "a@x.com");
    }

    #[tokio::test]
    async fn test_create_duplicate_fails() {
        let store = MemoryCredentialStore::new();

        store.create(account("a@x.com")).await.unwrap();
        assert!(matches!(
            store.create(account("a@x.com")).await,
            Err(StoreError::AlreadyExists)
        ));
    }

    #[tokio::test]
    async fn test_emails_are_case_sensitive() {
        let store = MemoryCredentialStore::new();

        store.create(account("a@x.com")).await.unwrap();
        // No normalization: differing case is a different key.
        store.create(account("A@x.com")).await.unwrap();

        assert!(store.find("a@x.com").await.is_ok());
        assert!(store.find("A@x.com").await.is_ok());
    }

    #[tokio::test]
    async fn test_concurrent_create_single_winner() {
        let store = Arc::new(MemoryCredentialStore::new());

        let a = tokio::spawn({
            let store = store.clone();
            async move { store.create(account("a@x.com")).await }
        });
        let b = tokio::spawn({
            let store = store.clone();
            async move { store.create(account("a@x.com")).await }
        });

        let (a, b) = (a.await.unwrap(), b.await.unwrap());
        assert_eq!(
            1,
            [&a, &b].iter().filter(|r| r.is_ok()).count(),
            "exactly one of two concurrent creates must win"
        );
        assert!([a, b]
            .into_iter()
            .any(|r| matches!(r, Err(StoreError::AlreadyExists))));
    }

    #[tokio::test]
    async fn test_update_password_touches_only_digest() {
        let store = MemoryCredentialStore::new();

        let mut profile = serde_json::Map::new();
        profile.insert("name".into(), "Ada".into());
        store
            .create(Account::new("a@x.com", "old", profile))
            .await
            .unwrap();

        store.update_password("a@x.com", "new").await.unwrap();

        let found = store.find("a@x.com").await.unwrap();
        assert_eq!(found.password_digest, "new");
        assert_eq!(found.profile["name"], "Ada");
    }

    #[tokio::test]
    async fn test_update_password_missing_account() {
        let store = MemoryCredentialStore::new();
        assert!(matches!(
            store.update_password("ghost@x.com", "new").await,
            Err(StoreError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_put_overwrites_same_kind() {
        let store = MemoryTokenStore::new();

        store.put("a@x.com", TokenKind::Session, "t1").await.unwrap();
        store.put("a@x.com", TokenKind::Session, "t2").await.unwrap();

        let record = store.current("a@x.com", TokenKind::Session).unwrap();
        assert_eq!(record.token, "t2");
    }

    #[tokio::test]
    async fn test_kinds_are_independent_slots() {
        let store = MemoryTokenStore::new();

        store.put("a@x.com", TokenKind::Session, "s").await.unwrap();
        store.put("a@x.com", TokenKind::Reset, "r").await.unwrap();

        assert_eq!(store.current("a@x.com", TokenKind::Session).unwrap().token, "s");
        assert_eq!(store.current("a@x.com", TokenKind::Reset).unwrap().token, "r");

        store.delete("a@x.com", TokenKind::Reset).await.unwrap();
        assert!(store.current("a@x.com", TokenKind::Reset).is_none());
        assert!(store.current("a@x.com", TokenKind::Session).is_some());
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let store = MemoryTokenStore::new();

        assert!(store.delete("a@x.com", TokenKind::Session).await.is_ok());
        store.put("a@x.com", TokenKind::Session, "t").await.unwrap();
        assert!(store.delete("a@x.com", TokenKind::Session).await.is_ok());
        assert!(store.delete("a@x.com", TokenKind::Session).await.is_ok());
    }
}
