use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;

use super::ApiError;
use super::ApiJson;
use super::ApiSuccess;
use super::AuthResponseData;
use super::ValidationErrors;
use crate::domain::account::models::LoginCommand;
use crate::domain::account::ports::AuthServicePort;
use crate::inbound::http::router::AppState;

pub async fn login(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<LoginRequest>,
) -> Result<ApiSuccess<AuthResponseData>, ApiError> {
    state
        .auth_service
        .login(body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref outcome| ApiSuccess::new(StatusCode::OK, "Login successful", outcome.into()))
}

/// HTTP request body for logging in with an email or a username
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    email_or_username: String,
    password: String,
}

impl LoginRequest {
    fn try_into_command(self) -> Result<LoginCommand, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        errors.require("email_or_username", &self.email_or_username);
        errors.require("password", &self.password);

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(LoginCommand {
            identifier: self.email_or_username.trim().to_string(),
            password: self.password,
        })
    }
}
