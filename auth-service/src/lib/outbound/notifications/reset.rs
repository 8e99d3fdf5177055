use async_trait::async_trait;

use crate::domain::account::errors::AuthError;
use crate::domain::account::models::EmailAddress;
use crate::domain::account::models::ResetToken;
use crate::domain::account::ports::ResetTokenNotifier;

/// Reset token delivery that only writes to the log.
///
/// The token itself is only logged at `debug` level.
#[derive(Debug, Clone, Default)]
pub struct LoggingResetTokenNotifier;

impl LoggingResetTokenNotifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ResetTokenNotifier for LoggingResetTokenNotifier {
    async fn send_reset_token(
        &self,
        email: &EmailAddress,
        reset_token: &ResetToken,
    ) -> Result<(), AuthError> {
        tracing::info!(
            recipient = %email,
            expires_at = %reset_token.expires_at,
            "Password reset token ready for delivery"
        );
        tracing::debug!(recipient = %email, token = %reset_token.token, "Password reset token");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    #[tokio::test]
    async fn test_send_reset_token_succeeds() {
        let notifier = LoggingResetTokenNotifier::new();
        let email = EmailAddress::new("a@x.com".to_string()).unwrap();
        let reset_token = ResetToken {
            token: auth::generate_reset_token(),
            expires_at: Utc::now() + auth::reset_token_ttl(),
        };

        assert!(notifier.send_reset_token(&email, &reset_token).await.is_ok());
    }
}
