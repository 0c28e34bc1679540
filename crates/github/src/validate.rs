//! GitHub username validation

use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

const MAX_USERNAME_LEN: usize = 39;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("GitHub username must be between 1 and 39 characters")]
    Length,
    #[error("GitHub username may only contain alphanumeric characters and hyphens, and cannot start or end with a hyphen")]
    Format,
    #[error("GitHub username cannot contain consecutive hyphens")]
    ConsecutiveHyphens,
}

impl From<ValidationError> for common::Error {
    fn from(err: ValidationError) -> Self {
        common::Error::Validation(err.to_string())
    }
}

fn username_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9]([a-zA-Z0-9-]{0,37}[a-zA-Z0-9])?$").expect("valid regex")
    })
}

/// Reject names GitHub would never accept before spending a request on them
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if username.is_empty() || username.len() > MAX_USERNAME_LEN {
        return Err(ValidationError::Length);
    }
    if !username_pattern().is_match(username) {
        return Err(ValidationError::Format);
    }
    if username.contains("--") {
        return Err(ValidationError::ConsecutiveHyphens);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_usernames() {
        assert!(validate_username("octocat").is_ok());
        assert!(validate_username("test-user").is_ok());
        assert!(validate_username("user123").is_ok());
        assert!(validate_username("a").is_ok());
        assert!(validate_username("a-b-c").is_ok());
        assert!(validate_username(&"a".repeat(39)).is_ok());
    }

    #[test]
    fn test_invalid_usernames() {
        assert_eq!(validate_username(""), Err(ValidationError::Length));
        assert_eq!(validate_username(&"a".repeat(40)), Err(ValidationError::Length));
        assert_eq!(validate_username("-invalid"), Err(ValidationError::Format));
        assert_eq!(validate_username("invalid-"), Err(ValidationError::Format));
        assert_eq!(validate_username("user@invalid"), Err(ValidationError::Format));
        assert_eq!(
            validate_username("test--user"),
            Err(ValidationError::ConsecutiveHyphens)
        );
    }
}
