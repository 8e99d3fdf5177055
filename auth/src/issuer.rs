use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

use crate::jwt::AccessClaims;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::jwt::RefreshClaims;
use crate::jwt::TokenIdentity;

/// Default issuer written to and expected in every token.
pub const DEFAULT_ISSUER: &str = "auth-service";

/// Signing keys and lifetimes for a [`TokenIssuer`].
#[derive(Debug, Clone)]
pub struct TokenSettings {
    /// Access token key. Required.
    pub access_secret: Option<String>,
    /// Refresh token key. Falls back to `access_secret` when unset or empty.
    pub refresh_secret: Option<String>,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
    pub issuer: String,
}

impl TokenSettings {
    /// Settings with the default lifetimes (24 hours / 7 days).
    pub fn new(access_secret: impl Into<String>) -> Self {
        Self {
            access_secret: Some(access_secret.into()),
            refresh_secret: None,
            access_ttl: Duration::hours(24),
            refresh_ttl: Duration::days(7),
            issuer: DEFAULT_ISSUER.to_string(),
        }
    }

    pub fn with_refresh_secret(mut self, refresh_secret: impl Into<String>) -> Self {
        self.refresh_secret = Some(refresh_secret.into());
        self
    }

    pub fn with_access_ttl(mut self, ttl: Duration) -> Self {
        self.access_ttl = ttl;
        self
    }

    pub fn with_refresh_ttl(mut self, ttl: Duration) -> Self {
        self.refresh_ttl = ttl;
        self
    }
}

/// A freshly minted access/refresh pair with their expiries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub access_expires_at: DateTime<Utc>,
    pub refresh_token: String,
    pub refresh_expires_at: DateTime<Utc>,
}

/// Issues and verifies the two token kinds.
///
/// Access and refresh tokens are signed by separate [`JwtHandler`]s so the
/// two kinds never verify against each other's key when distinct secrets are
/// configured.
pub struct TokenIssuer {
    access: JwtHandler,
    refresh: JwtHandler,
    access_ttl: Duration,
    refresh_ttl: Duration,
    issuer: String,
}

impl TokenIssuer {
    /// Build an issuer from settings.
    ///
    /// # Errors
    /// * `MissingSecret` - no access secret configured
    pub fn new(settings: TokenSettings) -> Result<Self, JwtError> {
        let access_secret = settings
            .access_secret
            .filter(|s| !s.is_empty())
            .ok_or_else(|| JwtError::MissingSecret("access token secret".to_string()))?;

        let refresh_secret = settings
            .refresh_secret
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| access_secret.clone());

        Ok(Self {
            access: JwtHandler::new(access_secret.as_bytes()).with_issuer(&settings.issuer),
            refresh: JwtHandler::new(refresh_secret.as_bytes()).with_issuer(&settings.issuer),
            access_ttl: settings.access_ttl,
            refresh_ttl: settings.refresh_ttl,
            issuer: settings.issuer,
        })
    }

    /// Mint an access and a refresh token for `identity`.
    ///
    /// # Errors
    /// * `EncodingFailed` - signing failed
    pub fn issue_pair(&self, identity: &TokenIdentity) -> Result<TokenPair, JwtError> {
        let now = Utc::now();

        let access_claims = AccessClaims::new(identity, &self.issuer, now, self.access_ttl);
        let refresh_claims =
            RefreshClaims::new(identity.account_id, &self.issuer, now, self.refresh_ttl);

        Ok(TokenPair {
            access_token: self.access.encode(&access_claims)?,
            access_expires_at: now + self.access_ttl,
            refresh_token: self.refresh.encode(&refresh_claims)?,
            refresh_expires_at: now + self.refresh_ttl,
        })
    }

    /// Verify an access token and return its claims.
    pub fn verify_access(&self, token: &str) -> Result<AccessClaims, JwtError> {
        self.access.decode(token)
    }

    /// Verify a refresh token and return its claims.
    pub fn verify_refresh(&self, token: &str) -> Result<RefreshClaims, JwtError> {
        self.refresh.decode(token)
    }

    pub fn access_ttl(&self) -> Duration {
        self.access_ttl
    }

    pub fn refresh_ttl(&self) -> Duration {
        self.refresh_ttl
    }
}
