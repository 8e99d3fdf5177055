use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;

use super::ApiError;
use super::ApiJson;
use super::ApiSuccess;
use super::AuthResponseData;
use super::ValidationErrors;
use crate::domain::account::ports::AuthServicePort;
use crate::inbound::http::router::AppState;

pub async fn refresh_token(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<RefreshTokenRequest>,
) -> Result<ApiSuccess<AuthResponseData>, ApiError> {
    let mut errors = ValidationErrors::default();
    errors.require("refresh_token", &body.refresh_token);
    if !errors.is_empty() {
        return Err(errors.into());
    }

    state
        .auth_service
        .refresh_token(&body.refresh_token)
        .await
        .map_err(ApiError::from)
        .map(|ref outcome| {
            ApiSuccess::new(
                StatusCode::OK,
                "Token refreshed successfully",
                outcome.into(),
            )
        })
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RefreshTokenRequest {
    refresh_token: String,
}
