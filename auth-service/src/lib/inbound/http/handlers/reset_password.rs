use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;

use super::register::PASSWORD_MAX_LENGTH;
use super::ApiError;
use super::ApiJson;
use super::ApiSuccess;
use super::ValidationErrors;
use crate::domain::account::models::ResetPasswordCommand;
use crate::domain::account::ports::AuthServicePort;
use crate::inbound::http::router::AppState;

pub(super) const NEW_PASSWORD_MIN_LENGTH: usize = 6;

pub async fn reset_password(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<ResetPasswordRequest>,
) -> Result<ApiSuccess<()>, ApiError> {
    state
        .auth_service
        .reset_password(body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|_| ApiSuccess::message(StatusCode::OK, "Password reset successfully"))
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ResetPasswordRequest {
    token: String,
    new_password: String,
}

impl ResetPasswordRequest {
    fn try_into_command(self) -> Result<ResetPasswordCommand, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        errors.require("token", &self.token);
        errors.length(
            "new_password",
            &self.new_password,
            NEW_PASSWORD_MIN_LENGTH,
            Some(PASSWORD_MAX_LENGTH),
        );

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(ResetPasswordCommand {
            token: self.token.trim().to_string(),
            new_password: self.new_password,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_password_minimum() {
        let body = ResetPasswordRequest {
            token: "deadbeef".to_string(),
            new_password: "12345".to_string(),
        };
        assert!(body.try_into_command().is_err());

        let body = ResetPasswordRequest {
            token: "deadbeef".to_string(),
            new_password: "123456".to_string(),
        };
        assert!(body.try_into_command().is_ok());
    }

    #[test]
    fn test_new_password_maximum() {
        let body = ResetPasswordRequest {
            token: "deadbeef".to_string(),
            new_password: "x".repeat(73),
        };
        assert!(body.try_into_command().is_err());

        let body = ResetPasswordRequest {
            token: "deadbeef".to_string(),
            new_password: "x".repeat(72),
        };
        assert!(body.try_into_command().is_ok());
    }
}
