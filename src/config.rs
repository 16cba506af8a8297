//! Application configuration
//!
//! Loaded from environment variables once at startup, validated, and
//! injected into components at construction. Immutable for the process
//! lifetime — no component reads the environment after this point.

use anyhow::{bail, Context, Result};

use crate::token::{DEFAULT_RESET_TTL_SECS, DEFAULT_SESSION_TTL_SECS};

/// Signing secrets must be at least this many bytes.
const MIN_SECRET_LEN: usize = 32;

/// Service configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Listen address for the HTTP server.
    pub bind_addr: String,

    /// Secret signing session tokens.
    pub session_secret: String,

    /// Secret signing password-reset tokens. Must differ from the session
    /// secret so the two token families are not interchangeable.
    pub reset_secret: String,

    /// Session token lifetime in seconds.
    pub session_ttl_secs: u64,

    /// Reset token lifetime in seconds.
    pub reset_ttl_secs: u64,

    /// URL prefix for the reset link embedded in outbound email.
    pub reset_link_base: String,
}

impl AppConfig {
    /// Load and validate configuration from environment variables.
    ///
    /// Required: `SESSION_TOKEN_SECRET`, `RESET_TOKEN_SECRET`. Everything
    /// else has a development-friendly default.
    pub fn from_env() -> Result<Self> {
        let bind_addr =
            std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        let session_secret = std::env::var("SESSION_TOKEN_SECRET")
            .context("SESSION_TOKEN_SECRET environment variable required")?;
        let reset_secret = std::env::var("RESET_TOKEN_SECRET")
            .context("RESET_TOKEN_SECRET environment variable required")?;

        let session_ttl_secs = env_u64("SESSION_TOKEN_TTL_SECS", DEFAULT_SESSION_TTL_SECS)?;
        let reset_ttl_secs = env_u64("RESET_TOKEN_TTL_SECS", DEFAULT_RESET_TTL_SECS)?;

        let reset_link_base = std::env::var("RESET_LINK_BASE")
            .unwrap_or_else(|_| "http://localhost:3000".to_string());

        let config = Self {
            bind_addr,
            session_secret,
            reset_secret,
            session_ttl_secs,
            reset_ttl_secs,
            reset_link_base,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject weak or unusable key material before the service comes up.
    pub fn validate(&self) -> Result<()> {
        if self.session_secret.len() < MIN_SECRET_LEN {
            bail!(
                "SESSION_TOKEN_SECRET must be at least {} characters",
                MIN_SECRET_LEN
            );
        }
        if self.reset_secret.len() < MIN_SECRET_LEN {
            bail!(
                "RESET_TOKEN_SECRET must be at least {} characters",
                MIN_SECRET_LEN
            );
        }
        // Disjoint key material is what keeps a reset token from doubling as
        // a session token.
        if self.session_secret == self.reset_secret {
            bail!("SESSION_TOKEN_SECRET and RESET_TOKEN_SECRET must differ");
        }
        if self.session_ttl_secs == 0 || self.reset_ttl_secs == 0 {
            bail!("token lifetimes must be positive");
        }
        Ok(())
    }
}

fn env_u64(name: &str, default: u64) -> Result<u64> {
    match std::env::var(name) {
        Ok(value) => value
            .parse()
            .with_context(|| format!("{name} must be an integer number of seconds")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> AppConfig {
        AppConfig {
            bind_addr: "127.0.0.1:0".to_string(),
            session_secret: "s".repeat(MIN_SECRET_LEN) + "-session",
            reset_secret: "r".repeat(MIN_SECRET_LEN) + "-reset",
            session_ttl_secs: DEFAULT_SESSION_TTL_SECS,
            reset_ttl_secs: DEFAULT_RESET_TTL_SECS,
            reset_link_base: "http://localhost:3000".to_string(),
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn test_short_secret_rejected() {
        let mut config = valid();
        config.session_secret = "short".to_string();
        assert!(config.validate().is_err());

        let mut config = valid();
        config.reset_secret = "short".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_equal_secrets_rejected() {
        let mut config = valid();
        config.reset_secret = config.session_secret.clone();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_ttl_rejected() {
        let mut config = valid();
        config.reset_ttl_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_default_ttls() {
        let config = valid();
        assert_eq!(config.session_ttl_secs, 60 * 60);
        assert_eq!(config.reset_ttl_secs, 20 * 60);
    }
}
