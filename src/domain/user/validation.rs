//! User validation utilities

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Errors that can occur during user validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum UserValidationError {
    #[error("Username is too short. Minimum length is {0} characters")]
    UsernameTooShort(usize),

    #[error("Email '{0}' is not a valid address")]
    InvalidEmail(String),

    #[error("Password hash is too short. Minimum length is {0} characters")]
    PasswordHashTooShort(usize),

    #[error("First name cannot be empty")]
    EmptyFirstName,

    #[error("Last name cannot be empty")]
    EmptyLastName,
}

const MIN_USERNAME_LENGTH: usize = 3;
const MIN_PASSWORD_HASH_LENGTH: usize = 6;

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
        .expect("email pattern must compile")
});

/// Validate a username
///
/// Rules:
/// - Minimum 3 characters
pub fn validate_username(username: &str) -> Result<(), UserValidationError> {
    if username.len() < MIN_USERNAME_LENGTH {
        return Err(UserValidationError::UsernameTooShort(MIN_USERNAME_LENGTH));
    }

    Ok(())
}

/// Validate an email address against a `local@domain.tld` pattern
pub fn validate_email(email: &str) -> Result<(), UserValidationError> {
    if !EMAIL_PATTERN.is_match(email) {
        return Err(UserValidationError::InvalidEmail(email.to_string()));
    }

    Ok(())
}

/// Validate a password hash
///
/// The hash is opaque; only a minimum length is enforced.
pub fn validate_password_hash(password_hash: &str) -> Result<(), UserValidationError> {
    if password_hash.len() < MIN_PASSWORD_HASH_LENGTH {
        return Err(UserValidationError::PasswordHashTooShort(
            MIN_PASSWORD_HASH_LENGTH,
        ));
    }

    Ok(())
}

/// Validate first and last names
pub fn validate_names(first_name: &str, last_name: &str) -> Result<(), UserValidationError> {
    if first_name.is_empty() {
        return Err(UserValidationError::EmptyFirstName);
    }

    if last_name.is_empty() {
        return Err(UserValidationError::EmptyLastName);
    }

    Ok(())
}
