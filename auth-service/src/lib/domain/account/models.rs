use std::fmt;
use std::str::FromStr;

use auth::TokenIdentity;
use auth::TokenPair;
use chrono::DateTime;
use chrono::NaiveDate;
use chrono::Utc;

use crate::domain::account::errors::EmailError;
use crate::domain::account::errors::PhoneNumberError;
use crate::domain::account::errors::UsernameError;

/// Role every new account starts with.
pub const DEFAULT_ROLE: &str = "user";

/// Calendar format accepted for dates of birth.
pub const DATE_OF_BIRTH_FORMAT: &str = "%Y-%m-%d";

/// Account aggregate entity.
///
/// Carries the password hash and reset-token internals; outward views are
/// built by the transport layer and never include them.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub id: AccountId,
    pub username: Username,
    pub email: EmailAddress,
    pub phone_number: PhoneNumber,
    pub full_name: String,
    pub address: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub password_hash: String,
    pub role: String,
    pub is_active: bool,
    pub email_verified: bool,
    pub reset_token: Option<ResetToken>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Claims identity for minting tokens for this account.
    pub fn token_identity(&self) -> TokenIdentity {
        TokenIdentity {
            account_id: self.id.0,
            email: self.email.as_str().to_string(),
            username: self.username.as_str().to_string(),
            role: self.role.clone(),
        }
    }
}

/// Account fields known before the store assigns an id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAccount {
    pub username: Username,
    pub email: EmailAddress,
    pub phone_number: PhoneNumber,
    pub full_name: String,
    pub address: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub password_hash: String,
    pub role: String,
}

/// Outstanding password-reset token stored on an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Account unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AccountId(pub i64);

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Username value type
///
/// 3-20 characters; letters, digits and underscore only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Username(String);

impl Username {
    const MIN_LENGTH: usize = 3;
    const MAX_LENGTH: usize = 20;

    /// Create a new valid username.
    ///
    /// # Errors
    /// * `TooShort` - Username shorter than 3 characters
    /// * `TooLong` - Username longer than 20 characters
    /// * `InvalidCharacters` - Contains anything but ASCII letters, digits or `_`
    pub fn new(username: String) -> Result<Self, UsernameError> {
        let username = Self::with_valid_length(username)?;
        let username = Self::with_valid_chars(username)?;
        Ok(Self(username))
    }

    fn with_valid_length(username: String) -> Result<String, UsernameError> {
        let length = username.chars().count();
        if length < Self::MIN_LENGTH {
            Err(UsernameError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            })
        } else if length > Self::MAX_LENGTH {
            Err(UsernameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(username)
        }
    }

    fn with_valid_chars(username: String) -> Result<String, UsernameError> {
        if username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            Ok(username)
        } else {
            Err(UsernameError::InvalidCharacters)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Validates email format using RFC 5322 compliant parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    const MAX_LENGTH: usize = 100;

    /// Create a new validated email address.
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    /// * `TooLong` - Longer than 100 characters
    pub fn new(email: String) -> Result<Self, EmailError> {
        let length = email.chars().count();
        if length > Self::MAX_LENGTH {
            return Err(EmailError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            });
        }

        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Phone number type
///
/// 8-15 characters, digits only with an optional leading `+`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    const MIN_LENGTH: usize = 8;
    const MAX_LENGTH: usize = 15;

    /// Create a new validated phone number.
    ///
    /// # Errors
    /// * `InvalidLength` - Outside 8-15 characters
    /// * `InvalidCharacters` - Anything but digits after an optional `+`
    pub fn new(phone_number: String) -> Result<Self, PhoneNumberError> {
        let length = phone_number.chars().count();
        if !(Self::MIN_LENGTH..=Self::MAX_LENGTH).contains(&length) {
            return Err(PhoneNumberError::InvalidLength {
                min: Self::MIN_LENGTH,
                max: Self::MAX_LENGTH,
                actual: length,
            });
        }

        let digits = phone_number.strip_prefix('+').unwrap_or(&phone_number);
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(PhoneNumberError::InvalidCharacters);
        }

        Ok(Self(phone_number))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Session unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(pub i64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// One live login: the account's current token pair and its expiries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: SessionId,
    pub account_id: AccountId,
    pub access_token: String,
    pub refresh_token: String,
    pub access_expires_at: DateTime<Utc>,
    pub refresh_expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    /// Replace the token pair in place, keeping id and creation time.
    pub fn rotate(&mut self, tokens: &TokenPair) {
        self.access_token = tokens.access_token.clone();
        self.refresh_token = tokens.refresh_token.clone();
        self.access_expires_at = tokens.access_expires_at;
        self.refresh_expires_at = tokens.refresh_expires_at;
        self.updated_at = Utc::now();
    }
}

/// Session fields known before the store assigns an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSession {
    pub account_id: AccountId,
    pub access_token: String,
    pub refresh_token: String,
    pub access_expires_at: DateTime<Utc>,
    pub refresh_expires_at: DateTime<Utc>,
}

impl NewSession {
    pub fn new(account_id: AccountId, tokens: &TokenPair) -> Self {
        Self {
            account_id,
            access_token: tokens.access_token.clone(),
            refresh_token: tokens.refresh_token.clone(),
            access_expires_at: tokens.access_expires_at,
            refresh_expires_at: tokens.refresh_expires_at,
        }
    }
}

/// Command to register a new account with validated identifier fields.
#[derive(Debug)]
pub struct RegisterCommand {
    pub username: Username,
    pub email: EmailAddress,
    pub phone_number: PhoneNumber,
    pub full_name: String,
    pub address: Option<String>,
    /// Raw `YYYY-MM-DD` value; parsed by the service.
    pub date_of_birth: Option<String>,
    /// Plain text password (will be hashed by service)
    pub password: String,
}

/// Command to log in with an email or a username.
#[derive(Debug)]
pub struct LoginCommand {
    pub identifier: String,
    pub password: String,
}

/// Command to redeem a reset token.
#[derive(Debug)]
pub struct ResetPasswordCommand {
    pub token: String,
    pub new_password: String,
}

/// Command to change the password of an authenticated account.
#[derive(Debug)]
pub struct ChangePasswordCommand {
    pub old_password: String,
    pub new_password: String,
}

/// Result of register, login and refresh: the account and its new tokens.
#[derive(Debug, Clone)]
pub struct AuthOutcome {
    pub account: Account,
    pub tokens: TokenPair,
}
