//! Request input validation
//!
//! Light boundary checks applied before any collaborator is touched: email
//! shape and field length. Arbitrary profile fields pass through as opaque
//! values.

use std::fmt;

/// Validation failure with field context.
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: &'static str,
}

impl ValidationError {
    fn new(field: &'static str, message: &'static str) -> Self {
        Self { field, message }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Validate string length in characters.
pub fn validate_length(
    value: &str,
    min: usize,
    max: usize,
    field: &'static str,
) -> Result<(), ValidationError> {
    let len = value.chars().count();
    if len < min {
        return Err(ValidationError::new(field, "too short"));
    }
    if len > max {
        return Err(ValidationError::new(field, "too long"));
    }
    Ok(())
}

/// Validate email shape.
///
/// Pragmatic checks that reject the obviously malformed without attempting
/// full address-grammar validation; deliverability is not checked.
pub fn validate_email(value: &str) -> Result<(), ValidationError> {
    let Some((local, domain)) = value.split_once('@') else {
        return Err(ValidationError::new("email", "invalid format"));
    };
    if domain.contains('@') {
        return Err(ValidationError::new("email", "invalid format"));
    }

    if local.is_empty() || local.len() > 64 {
        return Err(ValidationError::new("email", "invalid local part"));
    }
    if local.starts_with('.') || local.ends_with('.') || local.contains("..") {
        return Err(ValidationError::new("email", "invalid local part"));
    }

    if domain.is_empty() || domain.len() > 255 || !domain.contains('.') {
        return Err(ValidationError::new("email", "invalid domain"));
    }
    if !domain
        .chars()
        .all(|c| c.is_alphanumeric() || c == '.' || c == '-')
    {
        return Err(ValidationError::new("email", "invalid domain"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_emails() {
        assert!(validate_email("a@x.com").is_ok());
        assert!(validate_email("first.last@sub.example.co").is_ok());
        assert!(validate_email("user+tag@example.org").is_ok());
    }

    #[test]
    fn test_invalid_emails() {
        assert!(validate_email("").is_err());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("a@b@c.com").is_err());
        assert!(validate_email("@x.com").is_err());
        assert!(validate_email(".a@x.com").is_err());
        assert!(validate_email("a..b@x.com").is_err());
        assert!(validate_email("a@nodot").is_err());
        assert!(validate_email("a@bad_domain.com").is_err());
    }

    #[test]
    fn test_length_bounds() {
        assert!(validate_length("abc", 1, 8, "field").is_ok());
        assert!(validate_length("", 1, 8, "field").is_err());
        assert!(validate_length("too-long-value", 1, 8, "field").is_err());
    }
}
