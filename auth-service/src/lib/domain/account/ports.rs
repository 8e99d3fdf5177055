use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;

use crate::domain::account::errors::AuthError;
use crate::domain::account::models::Account;
use crate::domain::account::models::AccountId;
use crate::domain::account::models::AuthOutcome;
use crate::domain::account::models::ChangePasswordCommand;
use crate::domain::account::models::EmailAddress;
use crate::domain::account::models::LoginCommand;
use crate::domain::account::models::NewAccount;
use crate::domain::account::models::NewSession;
use crate::domain::account::models::PhoneNumber;
use crate::domain::account::models::RegisterCommand;
use crate::domain::account::models::ResetPasswordCommand;
use crate::domain::account::models::ResetToken;
use crate::domain::account::models::Session;
use crate::domain::account::models::Username;

/// Port for the authentication and session lifecycle.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Register a new account and open its first session.
    ///
    /// # Errors
    /// * `EmailAlreadyExists` / `UsernameAlreadyExists` / `PhoneNumberAlreadyExists`
    /// * `InvalidDateOfBirth` - date of birth is not `YYYY-MM-DD`
    /// * `Password`, `Token`, `DatabaseError` - internal failures
    async fn register(&self, command: RegisterCommand) -> Result<AuthOutcome, AuthError>;

    /// Verify credentials and replace every session of the account with a new one.
    ///
    /// # Errors
    /// * `InvalidCredentials` - no such account or wrong password
    /// * `AccountDeactivated` - account is inactive
    async fn login(&self, command: LoginCommand) -> Result<AuthOutcome, AuthError>;

    /// Exchange a refresh token for a new pair, rotating the session in place.
    ///
    /// # Errors
    /// * `InvalidRefreshToken` - bad token, no session, or token superseded
    /// * `RefreshTokenExpired` - the stored session has expired
    /// * `AccountDeactivated` - account is inactive
    async fn refresh_token(&self, refresh_token: &str) -> Result<AuthOutcome, AuthError>;

    /// Issue a reset token for the account with this email, if any.
    ///
    /// Succeeds silently when no account matches.
    async fn forgot_password(&self, email: &str) -> Result<(), AuthError>;

    /// Redeem a reset token, set the new password, and end every session.
    ///
    /// # Errors
    /// * `InvalidResetToken` - unknown or expired token
    async fn reset_password(&self, command: ResetPasswordCommand) -> Result<(), AuthError>;

    /// Change the password of an authenticated account and end every session.
    ///
    /// # Errors
    /// * `NotFound` - account vanished
    /// * `InvalidOldPassword` - old password does not match
    async fn change_password(
        &self,
        account_id: AccountId,
        command: ChangePasswordCommand,
    ) -> Result<(), AuthError>;

    /// End the session holding this access token. Idempotent.
    async fn logout(&self, account_id: AccountId, access_token: &str) -> Result<(), AuthError>;

    /// Retrieve the account behind an authenticated identity.
    ///
    /// # Errors
    /// * `NotFound` - account vanished
    async fn get_profile(&self, account_id: AccountId) -> Result<Account, AuthError>;
}

/// Persistence operations for the account aggregate.
#[async_trait]
pub trait AccountRepository: Send + Sync + 'static {
    /// Persist a new account.
    ///
    /// # Errors
    /// * `EmailAlreadyExists` / `UsernameAlreadyExists` / `PhoneNumberAlreadyExists` -
    ///   unique constraint hit at insert time
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, account: NewAccount) -> Result<Account, AuthError>;

    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, AuthError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AuthError>;

    async fn find_by_username(&self, username: &Username) -> Result<Option<Account>, AuthError>;

    async fn find_by_phone_number(
        &self,
        phone_number: &PhoneNumber,
    ) -> Result<Option<Account>, AuthError>;

    /// Single lookup matching either the email or the username column.
    async fn find_by_email_or_username(
        &self,
        identifier: &str,
    ) -> Result<Option<Account>, AuthError>;

    /// Account holding `token` as its reset token with an expiry after `now`.
    async fn find_by_reset_token(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Account>, AuthError>;

    async fn update_password(&self, id: AccountId, password_hash: &str)
        -> Result<(), AuthError>;

    /// Store a reset token, overwriting any outstanding one.
    async fn save_reset_token(&self, id: AccountId, reset_token: &ResetToken)
        -> Result<(), AuthError>;

    /// Set a new password hash and clear the reset token in one write, but
    /// only while the account still holds `token` unexpired at `now`.
    ///
    /// # Returns
    /// `false` when the token was already redeemed, replaced or expired
    async fn reset_password(
        &self,
        id: AccountId,
        token: &str,
        password_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, AuthError>;
}

/// Persistence operations for sessions.
#[async_trait]
pub trait SessionRepository: Send + Sync + 'static {
    async fn create(&self, session: NewSession) -> Result<Session, AuthError>;

    /// Atomically delete every session of the account and insert `session`.
    async fn replace_for_account(&self, session: NewSession) -> Result<Session, AuthError>;

    /// Most recently created session of the account.
    async fn find_latest_by_account(
        &self,
        account_id: AccountId,
    ) -> Result<Option<Session>, AuthError>;

    /// Overwrite the session's tokens, but only while it still holds
    /// `previous_refresh_token`.
    ///
    /// # Returns
    /// `false` when the stored refresh token had already changed
    async fn rotate(
        &self,
        session: &Session,
        previous_refresh_token: &str,
    ) -> Result<bool, AuthError>;

    /// Delete the session with this access token.
    ///
    /// # Returns
    /// Number of deleted rows (zero is not an error)
    async fn delete_by_access_token(&self, access_token: &str) -> Result<u64, AuthError>;

    /// Delete every session of the account.
    async fn delete_by_account(&self, account_id: AccountId) -> Result<u64, AuthError>;
}

/// Delivery channel for password-reset tokens.
#[async_trait]
pub trait ResetTokenNotifier: Send + Sync + 'static {
    /// Hand a freshly issued reset token to its recipient.
    async fn send_reset_token(
        &self,
        email: &EmailAddress,
        reset_token: &ResetToken,
    ) -> Result<(), AuthError>;
}
