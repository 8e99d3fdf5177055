//! Authentication primitives library
//!
//! Provides the building blocks the auth service composes:
//! - Password hashing (Argon2id)
//! - JWT encoding and strict HS256 validation
//! - Paired access/refresh token issuing
//! - Opaque password-reset tokens
//!
//! Nothing here touches storage; sessions and accounts live in the service.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! let is_valid = hasher.verify("my_password", &hash).unwrap();
//! assert!(is_valid);
//! ```
//!
//! ## Token Pairs
//! ```
//! use auth::{TokenIdentity, TokenIssuer, TokenSettings};
//!
//! let issuer = TokenIssuer::new(TokenSettings::new("secret_key_at_least_32_bytes_long!")).unwrap();
//! let identity = TokenIdentity {
//!     account_id: 1,
//!     email: "alice@example.com".to_string(),
//!     username: "alice".to_string(),
//!     role: "user".to_string(),
//! };
//!
//! let pair = issuer.issue_pair(&identity).unwrap();
//! let claims = issuer.verify_access(&pair.access_token).unwrap();
//! assert_eq!(claims.username, "alice");
//!
//! let refresh = issuer.verify_refresh(&pair.refresh_token).unwrap();
//! assert_eq!(refresh.account_id().unwrap(), 1);
//! ```

pub mod issuer;
pub mod jwt;
pub mod password;
pub mod reset;

// Re-export commonly used items
pub use issuer::TokenIssuer;
pub use issuer::TokenPair;
pub use issuer::TokenSettings;
pub use jwt::AccessClaims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use jwt::RefreshClaims;
pub use jwt::TokenIdentity;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use reset::generate_reset_token;
pub use reset::reset_token_ttl;
