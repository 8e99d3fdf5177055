use thiserror::Error;

use crate::domain::account::models::AccountId;

/// Error for Username validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UsernameError {
    #[error("Username too short: minimum {min} characters, got {actual}")]
    TooShort { min: usize, actual: usize },

    #[error("Username too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },

    #[error("Username contains invalid characters (only letters, digits and underscore allowed)")]
    InvalidCharacters,
}

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Invalid email format: {0}")]
    InvalidFormat(String),

    #[error("Email too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Error for PhoneNumber validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PhoneNumberError {
    #[error("Phone number must be between {min} and {max} characters, got {actual}")]
    InvalidLength {
        min: usize,
        max: usize,
        actual: usize,
    },

    #[error("Phone number may only contain digits and a leading '+'")]
    InvalidCharacters,
}

/// Top-level error for all account and session operations.
///
/// The variants group into five kinds the transport layer maps to statuses:
/// bad request, unauthorized, conflict, not found and internal.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    // Bad request
    #[error("Invalid date format for date of birth, use YYYY-MM-DD: {0}")]
    InvalidDateOfBirth(String),

    #[error("Invalid old password")]
    InvalidOldPassword,

    #[error("Invalid or expired reset token")]
    InvalidResetToken,

    // Unauthorized
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Account is deactivated")]
    AccountDeactivated,

    #[error("Invalid refresh token")]
    InvalidRefreshToken,

    #[error("Refresh token expired")]
    RefreshTokenExpired,

    // Conflict
    #[error("Email already registered: {0}")]
    EmailAlreadyExists(String),

    #[error("Username already taken: {0}")]
    UsernameAlreadyExists(String),

    #[error("Phone number already registered: {0}")]
    PhoneNumberAlreadyExists(String),

    // Not found
    #[error("Account not found: {0}")]
    NotFound(AccountId),

    // Internal
    #[error("Password error: {0}")]
    Password(#[from] auth::PasswordError),

    #[error("Token error: {0}")]
    Token(#[from] auth::JwtError),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl AuthError {
    /// Name of the unique field a conflict was raised for.
    pub fn conflict_field(&self) -> Option<&'static str> {
        match self {
            AuthError::EmailAlreadyExists(_) => Some("email"),
            AuthError::UsernameAlreadyExists(_) => Some("username"),
            AuthError::PhoneNumberAlreadyExists(_) => Some("phone_number"),
            _ => None,
        }
    }
}
