//! # Portcullis
//!
//! Customer identity service: account registration, login, bearer sessions,
//! and password reset.
//!
//! The core is the credential and token lifecycle engine:
//!
//! - [`password`]: one-way transform between plaintexts and stored digests
//! - [`token`]: signed session/reset tokens with disjoint signing secrets
//! - [`store`]: credential and token repositories (traits plus an
//!   in-process backend with an atomic conditional create)
//! - [`authenticator`]: the orchestrator composing the above with the
//!   [`mailer`] seam
//!
//! Everything else is plumbing around that engine: [`http`] for routing and
//! bearer middleware, [`config`] for environment-driven setup,
//! [`observability`] for structured security-event logging.
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use portcullis::mailer::LogMailer;
//! use portcullis::store::{MemoryCredentialStore, MemoryTokenStore};
//! use portcullis::{Authenticator, TokenIssuer};
//!
//! let issuer = Arc::new(TokenIssuer::new(session_secret, reset_secret, 3600, 1200));
//! let auth = Authenticator::new(
//!     Arc::new(MemoryCredentialStore::new()),
//!     Arc::new(MemoryTokenStore::new()),
//!     issuer,
//!     Arc::new(LogMailer),
//!     "https://app.example.com",
//! );
//!
//! let account = auth.register("a@x.com", "password", Default::default()).await?;
//! let session = auth.login("a@x.com", "password").await?;
//! ```

pub mod account;
pub mod authenticator;
pub mod config;
pub mod error;
pub mod http;
pub mod mailer;
pub mod observability;
pub mod password;
pub mod store;
pub mod token;
pub mod validation;

// Re-exports
pub use account::Account;
pub use authenticator::{Authenticator, Session};
pub use config::AppConfig;
pub use error::{ApiResponse, AuthError};
pub use password::PasswordHasher;
pub use token::{TokenIssuer, TokenKind};
