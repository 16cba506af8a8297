//! Outbound email collaborator
//!
//! This service renders the complete message — subject and body, reset link
//! included — and hands it to a [`Mailer`]. Delivery mechanics (SMTP, an
//! email API, a queue) live behind the trait.

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, info};

/// Delivery failure; surfaces as a generic server error at the operation
/// boundary.
#[derive(Debug, Error)]
pub enum MailerError {
    #[error("email delivery failed: {0}")]
    Delivery(String),
}

/// A fully rendered outbound message.
#[derive(Debug, Clone)]
pub struct OutboundEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Email delivery seam.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: &OutboundEmail) -> Result<(), MailerError>;
}

/// Render the password-reset message for `recipient`.
///
/// `link_base` is the user-facing URL prefix; the reset token rides in the
/// link path. `valid_minutes` is only wording — enforcement is the token's
/// own expiry.
pub fn reset_email(
    recipient: &str,
    token: &str,
    link_base: &str,
    valid_minutes: u64,
) -> OutboundEmail {
    let link = format!(
        "{}/reset-password/{}",
        link_base.trim_end_matches('/'),
        token
    );

    OutboundEmail {
        to: recipient.to_string(),
        subject: "Reset your password".to_string(),
        body: format!(
            "Hello,\n\n\
             A password reset was requested for this address. Open the link \
             below within {valid_minutes} minutes to choose a new password:\n\n\
             {link}\n\n\
             If you did not request this, you can ignore this message."
        ),
    }
}

/// Mailer that records the outbound message in the structured log instead of
/// dispatching it. Default wiring for development; the message body (which
/// contains the reset link) is logged at debug only.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, message: &OutboundEmail) -> Result<(), MailerError> {
        info!(
            to = %message.to,
            subject = %message.subject,
            "outbound email"
        );
        debug!(body = %message.body, "outbound email body");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_email_embeds_token_link() {
        let message = reset_email("a@x.com", "tok-123", "https://app.example.com", 20);

        assert_eq!(message.to, "a@x.com");
        assert!(message
            .body
            .contains("https://app.example.com/reset-password/tok-123"));
        assert!(message.body.contains("20 minutes"));
    }

    #[test]
    fn test_link_base_trailing_slash() {
        let message = reset_email("a@x.com", "tok", "https://app.example.com/", 20);
        assert!(message
            .body
            .contains("https://app.example.com/reset-password/tok"));
    }

    #[tokio::test]
    async fn test_log_mailer_accepts_message() {
        let message = reset_email("a@x.com", "tok", "https://app.example.com", 20);
        assert!(LogMailer.send(&message).await.is_ok());
    }
}
