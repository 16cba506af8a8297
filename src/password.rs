//! Password hashing
//!
//! One-way transform between plaintext passwords and storable digests,
//! using Argon2id with a per-digest random salt. Plaintext passwords exist
//! only transiently inside `hash` and `verify`; everything persisted or
//! returned is a PHC-format digest string.

use argon2::password_hash::{PasswordHash, SaltString};
use argon2::{Argon2, PasswordHasher as _, PasswordVerifier as _};
use rand::rngs::OsRng;
use thiserror::Error;

/// Digest derivation failure. Verification never errors; a digest that
/// cannot be parsed simply fails to verify.
#[derive(Debug, Error)]
pub enum HashError {
    #[error("password hashing failed: {0}")]
    Hashing(String),
}

/// Hashes and verifies passwords.
///
/// Stateless; the Argon2id parameters are the library defaults. Because each
/// digest carries its own salt, equality of digests says nothing — all
/// comparison goes through [`PasswordHasher::verify`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PasswordHasher;

impl PasswordHasher {
    pub fn new() -> Self {
        Self
    }

    /// Derive a storable digest from a plaintext password.
    pub fn hash(&self, plaintext: &str) -> Result<String, HashError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|digest| digest.to_string())
            .map_err(|e| HashError::Hashing(e.to_string()))
    }

    /// Check a plaintext password against a stored digest.
    ///
    /// Verification cost is dominated by the Argon2 computation, so timing
    /// does not vary usefully with where the candidate differs.
    pub fn verify(&self, plaintext: &str, digest: &str) -> bool {
        PasswordHash::new(digest)
            .ok()
            .map(|parsed| {
                Argon2::default()
                    .verify_password(plaintext.as_bytes(), &parsed)
                    .is_ok()
            })
            .unwrap_or(false)
    }
}
