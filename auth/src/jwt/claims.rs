use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use super::errors::JwtError;

/// Identity a token pair is minted for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenIdentity {
    pub account_id: i64,
    pub email: String,
    pub username: String,
    pub role: String,
}

/// Claims carried by an access token.
///
/// `sub` holds the account id in decimal form (RFC 7519 requires a string).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccessClaims {
    pub sub: String,
    pub email: String,
    pub username: String,
    pub role: String,
    pub iat: i64,
    pub nbf: i64,
    pub exp: i64,
    pub iss: String,
    /// Unique per token, so two tokens minted within one second still differ.
    pub jti: String,
}

/// Claims carried by a refresh token: the account id and nothing else.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RefreshClaims {
    pub sub: String,
    pub iat: i64,
    pub nbf: i64,
    pub exp: i64,
    pub iss: String,
    pub jti: String,
}

impl AccessClaims {
    /// Build access claims valid from `issued_at` for `ttl`.
    pub fn new(
        identity: &TokenIdentity,
        issuer: &str,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Self {
        Self {
            sub: identity.account_id.to_string(),
            email: identity.email.clone(),
            username: identity.username.clone(),
            role: identity.role.clone(),
            iat: issued_at.timestamp(),
            nbf: issued_at.timestamp(),
            exp: (issued_at + ttl).timestamp(),
            iss: issuer.to_string(),
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// Account id parsed from `sub`.
    pub fn account_id(&self) -> Result<i64, JwtError> {
        parse_subject(&self.sub)
    }

    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp < current_timestamp
    }
}

impl RefreshClaims {
    /// Build refresh claims valid from `issued_at` for `ttl`.
    pub fn new(account_id: i64, issuer: &str, issued_at: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            sub: account_id.to_string(),
            iat: issued_at.timestamp(),
            nbf: issued_at.timestamp(),
            exp: (issued_at + ttl).timestamp(),
            iss: issuer.to_string(),
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// Account id parsed from `sub`.
    pub fn account_id(&self) -> Result<i64, JwtError> {
        parse_subject(&self.sub)
    }

    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp < current_timestamp
    }
}

fn parse_subject(sub: &str) -> Result<i64, JwtError> {
    sub.parse::<i64>()
        .map_err(|_| JwtError::InvalidToken(format!("subject is not an account id: {}", sub)))
}
