use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;

use super::ApiError;
use super::ApiJson;
use super::ApiSuccess;
use super::ValidationErrors;
use crate::domain::account::models::EmailAddress;
use crate::domain::account::ports::AuthServicePort;
use crate::inbound::http::router::AppState;

/// Same response whether or not the email belongs to an account.
pub const FORGOT_PASSWORD_MESSAGE: &str =
    "If the email exists, a password reset link has been sent";

pub async fn forgot_password(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<ForgotPasswordRequest>,
) -> Result<ApiSuccess<()>, ApiError> {
    let mut errors = ValidationErrors::default();
    let email = errors.check("email", EmailAddress::new(body.email));
    let Some(email) = email else {
        return Err(errors.into());
    };

    state
        .auth_service
        .forgot_password(email.as_str())
        .await
        .map_err(ApiError::from)
        .map(|_| ApiSuccess::message(StatusCode::OK, FORGOT_PASSWORD_MESSAGE))
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ForgotPasswordRequest {
    email: String,
}
