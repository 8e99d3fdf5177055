use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use serde::Deserialize;

use super::register::PASSWORD_MAX_LENGTH;
use super::reset_password::NEW_PASSWORD_MIN_LENGTH;
use super::ApiError;
use super::ApiJson;
use super::ApiSuccess;
use super::ValidationErrors;
use crate::domain::account::models::ChangePasswordCommand;
use crate::domain::account::ports::AuthServicePort;
use crate::inbound::http::middleware::AuthenticatedAccount;
use crate::inbound::http::router::AppState;

pub async fn change_password(
    State(state): State<AppState>,
    Extension(identity): Extension<AuthenticatedAccount>,
    ApiJson(body): ApiJson<ChangePasswordRequest>,
) -> Result<ApiSuccess<()>, ApiError> {
    state
        .auth_service
        .change_password(identity.account_id, body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|_| ApiSuccess::message(StatusCode::OK, "Password changed successfully"))
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ChangePasswordRequest {
    old_password: String,
    new_password: String,
}

impl ChangePasswordRequest {
    fn try_into_command(self) -> Result<ChangePasswordCommand, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        errors.require("old_password", &self.old_password);
        errors.length(
            "new_password",
            &self.new_password,
            NEW_PASSWORD_MIN_LENGTH,
            Some(PASSWORD_MAX_LENGTH),
        );

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(ChangePasswordCommand {
            old_password: self.old_password,
            new_password: self.new_password,
        })
    }
}
