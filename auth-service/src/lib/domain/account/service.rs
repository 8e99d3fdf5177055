use std::sync::Arc;

use async_trait::async_trait;
use auth::PasswordHasher;
use auth::TokenIssuer;
use chrono::NaiveDate;
use chrono::Utc;

use crate::domain::account::errors::AuthError;
use crate::domain::account::models::Account;
use crate::domain::account::models::AccountId;
use crate::domain::account::models::AuthOutcome;
use crate::domain::account::models::ChangePasswordCommand;
use crate::domain::account::models::LoginCommand;
use crate::domain::account::models::NewAccount;
use crate::domain::account::models::NewSession;
use crate::domain::account::models::RegisterCommand;
use crate::domain::account::models::ResetPasswordCommand;
use crate::domain::account::models::ResetToken;
use crate::domain::account::models::DATE_OF_BIRTH_FORMAT;
use crate::domain::account::models::DEFAULT_ROLE;
use crate::domain::account::ports::AccountRepository;
use crate::domain::account::ports::AuthServicePort;
use crate::domain::account::ports::ResetTokenNotifier;
use crate::domain::account::ports::SessionRepository;

/// Domain service implementation for the authentication lifecycle.
///
/// Concrete implementation of AuthServicePort with dependency injection.
pub struct AuthService<AR, SR, RN>
where
    AR: AccountRepository,
    SR: SessionRepository,
    RN: ResetTokenNotifier,
{
    accounts: Arc<AR>,
    sessions: Arc<SR>,
    notifier: Arc<RN>,
    token_issuer: Arc<TokenIssuer>,
    password_hasher: PasswordHasher,
}

impl<AR, SR, RN> AuthService<AR, SR, RN>
where
    AR: AccountRepository,
    SR: SessionRepository,
    RN: ResetTokenNotifier,
{
    /// Create a new auth service with injected dependencies.
    ///
    /// # Arguments
    /// * `accounts` - Account persistence implementation
    /// * `sessions` - Session persistence implementation
    /// * `notifier` - Reset token delivery channel
    /// * `token_issuer` - Access/refresh token issuer
    pub fn new(
        accounts: Arc<AR>,
        sessions: Arc<SR>,
        notifier: Arc<RN>,
        token_issuer: Arc<TokenIssuer>,
    ) -> Self {
        Self {
            accounts,
            sessions,
            notifier,
            token_issuer,
            password_hasher: PasswordHasher::new(),
        }
    }

    /// Runs on the blocking pool.
    async fn hash_password(&self, password: String) -> Result<String, AuthError> {
        let hasher = self.password_hasher;
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AuthError::Unknown(format!("Password hashing task failed: {}", e)))?
            .map_err(AuthError::from)
    }

    async fn verify_password(&self, password: String, hash: String) -> Result<bool, AuthError> {
        let hasher = self.password_hasher;
        tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|e| AuthError::Unknown(format!("Password verification task failed: {}", e)))?
            .map_err(AuthError::from)
    }

    async fn ensure_identifiers_available(
        &self,
        command: &RegisterCommand,
    ) -> Result<(), AuthError> {
        if self
            .accounts
            .find_by_email(command.email.as_str())
            .await?
            .is_some()
        {
            return Err(AuthError::EmailAlreadyExists(command.email.to_string()));
        }

        if self
            .accounts
            .find_by_username(&command.username)
            .await?
            .is_some()
        {
            return Err(AuthError::UsernameAlreadyExists(command.username.to_string()));
        }

        if self
            .accounts
            .find_by_phone_number(&command.phone_number)
            .await?
            .is_some()
        {
            return Err(AuthError::PhoneNumberAlreadyExists(
                command.phone_number.to_string(),
            ));
        }

        Ok(())
    }
}

/// Parse an optional `YYYY-MM-DD` date; blank counts as absent.
fn parse_date_of_birth(raw: Option<&str>) -> Result<Option<NaiveDate>, AuthError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(value) => NaiveDate::parse_from_str(value, DATE_OF_BIRTH_FORMAT)
            .map(Some)
            .map_err(|_| AuthError::InvalidDateOfBirth(value.to_string())),
    }
}

#[async_trait]
impl<AR, SR, RN> AuthServicePort for AuthService<AR, SR, RN>
where
    AR: AccountRepository,
    SR: SessionRepository,
    RN: ResetTokenNotifier,
{
    async fn register(&self, command: RegisterCommand) -> Result<AuthOutcome, AuthError> {
        self.ensure_identifiers_available(&command).await?;

        let date_of_birth = parse_date_of_birth(command.date_of_birth.as_deref())?;
        let password_hash = self.hash_password(command.password).await?;

        let account = self
            .accounts
            .create(NewAccount {
                username: command.username,
                email: command.email,
                phone_number: command.phone_number,
                full_name: command.full_name,
                address: command.address.filter(|a| !a.is_empty()),
                date_of_birth,
                password_hash,
                role: DEFAULT_ROLE.to_string(),
            })
            .await?;

        // The account row is already committed; failures below leave it without a session.
        let tokens = self.token_issuer.issue_pair(&account.token_identity())?;
        let session = self
            .sessions
            .create(NewSession::new(account.id, &tokens))
            .await?;

        tracing::info!(
            account_id = %account.id,
            session_id = %session.id,
            "Account registered"
        );

        Ok(AuthOutcome { account, tokens })
    }

    async fn login(&self, command: LoginCommand) -> Result<AuthOutcome, AuthError> {
        let account = self
            .accounts
            .find_by_email_or_username(&command.identifier)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !account.is_active {
            tracing::warn!(account_id = %account.id, "Login attempt on deactivated account");
            return Err(AuthError::AccountDeactivated);
        }

        if !self
            .verify_password(command.password, account.password_hash.clone())
            .await?
        {
            tracing::warn!(account_id = %account.id, "Login failed: wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        let tokens = self.token_issuer.issue_pair(&account.token_identity())?;
        let session = self
            .sessions
            .replace_for_account(NewSession::new(account.id, &tokens))
            .await?;

        tracing::info!(
            account_id = %account.id,
            session_id = %session.id,
            "Account logged in"
        );

        Ok(AuthOutcome { account, tokens })
    }

    async fn refresh_token(&self, refresh_token: &str) -> Result<AuthOutcome, AuthError> {
        let claims = self
            .token_issuer
            .verify_refresh(refresh_token)
            .map_err(|e| {
                tracing::debug!(error = %e, "Refresh token rejected");
                AuthError::InvalidRefreshToken
            })?;
        let account_id = AccountId(
            claims
                .account_id()
                .map_err(|_| AuthError::InvalidRefreshToken)?,
        );

        let mut session = self
            .sessions
            .find_latest_by_account(account_id)
            .await?
            .filter(|session| session.refresh_token == refresh_token)
            .ok_or_else(|| {
                tracing::warn!(
                    account_id = %account_id,
                    "Refresh token does not match the current session"
                );
                AuthError::InvalidRefreshToken
            })?;

        if Utc::now() > session.refresh_expires_at {
            return Err(AuthError::RefreshTokenExpired);
        }

        let account = self
            .accounts
            .find_by_id(account_id)
            .await?
            .ok_or(AuthError::InvalidRefreshToken)?;

        if !account.is_active {
            return Err(AuthError::AccountDeactivated);
        }

        let tokens = self.token_issuer.issue_pair(&account.token_identity())?;
        session.rotate(&tokens);

        if !self.sessions.rotate(&session, refresh_token).await? {
            tracing::warn!(
                account_id = %account_id,
                session_id = %session.id,
                "Refresh token was rotated concurrently"
            );
            return Err(AuthError::InvalidRefreshToken);
        }

        tracing::info!(account_id = %account_id, session_id = %session.id, "Session rotated");

        Ok(AuthOutcome { account, tokens })
    }

    async fn forgot_password(&self, email: &str) -> Result<(), AuthError> {
        let Some(account) = self.accounts.find_by_email(email).await? else {
            tracing::debug!("Password reset requested for unknown email");
            return Ok(());
        };

        let reset_token = ResetToken {
            token: auth::generate_reset_token(),
            expires_at: Utc::now() + auth::reset_token_ttl(),
        };

        self.accounts
            .save_reset_token(account.id, &reset_token)
            .await?;

        if let Err(e) = self
            .notifier
            .send_reset_token(&account.email, &reset_token)
            .await
        {
            tracing::error!(
                account_id = %account.id,
                error = %e,
                "Failed to deliver password reset token"
            );
        }

        tracing::info!(account_id = %account.id, "Password reset token issued");

        Ok(())
    }

    async fn reset_password(&self, command: ResetPasswordCommand) -> Result<(), AuthError> {
        let now = Utc::now();
        let account = self
            .accounts
            .find_by_reset_token(&command.token, now)
            .await?
            .ok_or(AuthError::InvalidResetToken)?;

        let password_hash = self.hash_password(command.new_password).await?;
        let redeemed = self
            .accounts
            .reset_password(account.id, &command.token, &password_hash, now)
            .await?;

        if !redeemed {
            tracing::warn!(
                account_id = %account.id,
                "Reset token was redeemed concurrently"
            );
            return Err(AuthError::InvalidResetToken);
        }

        let revoked = self.sessions.delete_by_account(account.id).await?;

        tracing::info!(
            account_id = %account.id,
            revoked_sessions = revoked,
            "Password reset"
        );

        Ok(())
    }

    async fn change_password(
        &self,
        account_id: AccountId,
        command: ChangePasswordCommand,
    ) -> Result<(), AuthError> {
        let account = self
            .accounts
            .find_by_id(account_id)
            .await?
            .ok_or(AuthError::NotFound(account_id))?;

        if !self
            .verify_password(command.old_password, account.password_hash.clone())
            .await?
        {
            return Err(AuthError::InvalidOldPassword);
        }

        let password_hash = self.hash_password(command.new_password).await?;
        self.accounts
            .update_password(account_id, &password_hash)
            .await?;

        // Includes the caller's own session.
        let revoked = self.sessions.delete_by_account(account_id).await?;

        tracing::info!(
            account_id = %account_id,
            revoked_sessions = revoked,
            "Password changed"
        );

        Ok(())
    }

    async fn logout(&self, account_id: AccountId, access_token: &str) -> Result<(), AuthError> {
        let deleted = self.sessions.delete_by_access_token(access_token).await?;

        tracing::info!(account_id = %account_id, deleted, "Logged out");

        Ok(())
    }

    async fn get_profile(&self, account_id: AccountId) -> Result<Account, AuthError> {
        self.accounts
            .find_by_id(account_id)
            .await?
            .ok_or(AuthError::NotFound(account_id))
    }
}
