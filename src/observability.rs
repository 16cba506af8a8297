//! Structured security-event logging
//!
//! Application code uses the standard `tracing` macros; security-relevant
//! transitions additionally go through [`security_event!`] so every audit
//! line carries a stable event name, category, and severity.

use std::fmt;

/// Auditable event categories for this service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecurityEvent {
    // Authentication events
    /// Successful login
    AuthenticationSuccess,
    /// Failed login attempt
    AuthenticationFailure,
    /// Session token issued
    SessionCreated,
    /// Session record cleared on logout
    Logout,
    /// Bearer token rejected (bad signature or expired)
    TokenRejected,

    // Account lifecycle events
    /// New account registered
    UserRegistered,
    /// Password reset requested, reset token issued
    PasswordResetRequested,
    /// Password overwritten via completed reset
    PasswordChanged,

    // System events
    /// Service started
    SystemStartup,
}

impl SecurityEvent {
    /// Event category for filtering/grouping.
    pub fn category(&self) -> &'static str {
        match self {
            Self::AuthenticationSuccess
            | Self::AuthenticationFailure
            | Self::SessionCreated
            | Self::Logout
            | Self::TokenRejected => "authentication",

            Self::UserRegistered | Self::PasswordResetRequested | Self::PasswordChanged => {
                "user_management"
            }

            Self::SystemStartup => "system",
        }
    }

    /// Severity level, which selects the `tracing` level the event logs at.
    pub fn severity(&self) -> Severity {
        match self {
            Self::AuthenticationFailure | Self::TokenRejected => Severity::High,

            Self::AuthenticationSuccess
            | Self::UserRegistered
            | Self::PasswordResetRequested
            | Self::PasswordChanged => Severity::Medium,

            Self::SessionCreated | Self::Logout | Self::SystemStartup => Severity::Low,
        }
    }

    /// Stable machine-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::AuthenticationSuccess => "authentication_success",
            Self::AuthenticationFailure => "authentication_failure",
            Self::SessionCreated => "session_created",
            Self::Logout => "logout",
            Self::TokenRejected => "token_rejected",
            Self::UserRegistered => "user_registered",
            Self::PasswordResetRequested => "password_reset_requested",
            Self::PasswordChanged => "password_changed",
            Self::SystemStartup => "system_startup",
        }
    }
}

impl fmt::Display for SecurityEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Event severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Routine operations
    Low,
    /// Important state changes
    Medium,
    /// Security-relevant failures
    High,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

/// Log a security event with structured fields.
///
/// The macro automatically attaches `security_event`, `category`, and
/// `severity` fields and dispatches to the `tracing` level matching the
/// event's severity.
///
/// ```ignore
/// security_event!(
///     SecurityEvent::AuthenticationSuccess,
///     identity = %email,
///     "login succeeded"
/// );
/// ```
#[macro_export]
macro_rules! security_event {
    ($event:expr, $($field:tt)*) => {{
        let event = $event;
        let severity = event.severity();
        let category = event.category();
        let event_name = event.name();

        match severity {
            $crate::observability::Severity::High => {
                ::tracing::warn!(
                    security_event = event_name,
                    category = category,
                    severity = "high",
                    $($field)*
                );
            }
            $crate::observability::Severity::Medium => {
                ::tracing::info!(
                    security_event = event_name,
                    category = category,
                    severity = "medium",
                    $($field)*
                );
            }
            $crate::observability::Severity::Low => {
                ::tracing::debug!(
                    security_event = event_name,
                    category = category,
                    severity = "low",
                    $($field)*
                );
            }
        }
    }};
}

pub use security_event;

/// Initialize the tracing subscriber.
///
/// Must be called once at startup, before any logging. `RUST_LOG` controls
/// the filter; `LOG_FORMAT=json` switches to JSON lines for log shipping.
pub fn init_tracing() {
    let filter =
        std::env::var("RUST_LOG").unwrap_or_else(|_| "info,portcullis=debug".to_string());
    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_categories() {
        assert_eq!(
            SecurityEvent::AuthenticationSuccess.category(),
            "authentication"
        );
        assert_eq!(SecurityEvent::TokenRejected.category(), "authentication");
        assert_eq!(SecurityEvent::UserRegistered.category(), "user_management");
        assert_eq!(SecurityEvent::SystemStartup.category(), "system");
    }

    #[test]
    fn test_event_severity() {
        assert_eq!(
            SecurityEvent::AuthenticationFailure.severity(),
            Severity::High
        );
        assert_eq!(SecurityEvent::PasswordChanged.severity(), Severity::Medium);
        assert_eq!(SecurityEvent::Logout.severity(), Severity::Low);
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Low < Severity::Medium);
        assert!(Severity::Medium < Severity::High);
    }

    #[test]
    fn test_event_name() {
        assert_eq!(
            SecurityEvent::PasswordResetRequested.name(),
            "password_reset_requested"
        );
        assert_eq!(SecurityEvent::SessionCreated.name(), "session_created");
    }
}
