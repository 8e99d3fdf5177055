use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;

use super::ApiError;
use super::ApiJson;
use super::ApiSuccess;
use super::AuthResponseData;
use super::ValidationErrors;
use crate::domain::account::models::EmailAddress;
use crate::domain::account::models::PhoneNumber;
use crate::domain::account::models::RegisterCommand;
use crate::domain::account::models::Username;
use crate::domain::account::ports::AuthServicePort;
use crate::inbound::http::router::AppState;

const PASSWORD_MIN_LENGTH: usize = 8;
pub(super) const PASSWORD_MAX_LENGTH: usize = 72;
const FULL_NAME_MIN_LENGTH: usize = 3;
const FULL_NAME_MAX_LENGTH: usize = 100;
const ADDRESS_MAX_LENGTH: usize = 500;

pub async fn register(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<RegisterRequest>,
) -> Result<ApiSuccess<AuthResponseData>, ApiError> {
    state
        .auth_service
        .register(body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref outcome| {
            ApiSuccess::new(
                StatusCode::CREATED,
                "User registered successfully",
                outcome.into(),
            )
        })
}

/// HTTP request body for registering an account (raw JSON)
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RegisterRequest {
    username: String,
    email: String,
    phone_number: String,
    full_name: String,
    address: Option<String>,
    dob: Option<String>,
    password: String,
}

impl RegisterRequest {
    fn try_into_command(self) -> Result<RegisterCommand, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let username = errors.check("username", Username::new(self.username));
        let email = errors.check("email", EmailAddress::new(self.email));
        let phone_number = errors.check("phone_number", PhoneNumber::new(self.phone_number));

        let full_name = self.full_name.trim().to_string();
        errors.length(
            "full_name",
            &full_name,
            FULL_NAME_MIN_LENGTH,
            Some(FULL_NAME_MAX_LENGTH),
        );
        if let Some(address) = &self.address {
            errors.length("address", address, 0, Some(ADDRESS_MAX_LENGTH));
        }
        errors.length(
            "password",
            &self.password,
            PASSWORD_MIN_LENGTH,
            Some(PASSWORD_MAX_LENGTH),
        );

        match (username, email, phone_number) {
            (Some(username), Some(email), Some(phone_number)) if errors.is_empty() => {
                Ok(RegisterCommand {
                    username,
                    email,
                    phone_number,
                    full_name,
                    address: self.address,
                    date_of_birth: self.dob,
                    password: self.password,
                })
            }
            _ => Err(errors),
        }
    }
}
