//! Account model
//!
//! One account per email address. The password is held only as a digest and
//! is excluded from every serialized representation.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A customer account keyed by email.
#[derive(Debug, Clone, Serialize)]
pub struct Account {
    /// Unique key. Stored case-sensitive, no normalization.
    pub email: String,

    /// Salted one-way digest of the password. Never serialized.
    #[serde(skip_serializing)]
    pub password_digest: String,

    /// Arbitrary profile fields supplied at registration, serialized inline
    /// alongside the fixed fields.
    #[serde(flatten)]
    pub profile: serde_json::Map<String, serde_json::Value>,

    pub created_at: DateTime<Utc>,
}

impl Account {
    pub fn new(
        email: impl Into<String>,
        password_digest: impl Into<String>,
        profile: serde_json::Map<String, serde_json::Value>,
    ) -> Self {
        Self {
            email: email.into(),
            password_digest: password_digest.into(),
            profile,
            created_at: Utc::now(),
        }
    }
}
