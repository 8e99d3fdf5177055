use std::collections::BTreeMap;
use std::fmt::Display;

use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequest;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use chrono::DateTime;
use chrono::NaiveDate;
use chrono::Utc;
use serde::Serialize;
use serde_json::json;

use crate::domain::account::errors::AuthError;
use crate::domain::account::models::Account;
use crate::domain::account::models::AuthOutcome;

pub mod change_password;
pub mod forgot_password;
pub mod get_profile;
pub mod health_check;
pub mod login;
pub mod logout;
pub mod refresh_token;
pub mod register;
pub mod reset_password;

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<ApiResponseBody<T>>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, message: impl Into<String>, data: T) -> Self {
        ApiSuccess(
            status,
            Json(ApiResponseBody::new(status, message.into(), Some(data))),
        )
    }
}

impl ApiSuccess<()> {
    /// Success envelope without a `data` member.
    pub fn message(status: StatusCode, message: impl Into<String>) -> Self {
        ApiSuccess(status, Json(ApiResponseBody::new(status, message.into(), None)))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    BadRequest(String),
    /// Field name to message, one entry per invalid field.
    Validation(BTreeMap<String, String>),
    Unauthorized(String),
    Forbidden(String),
    NotFound(String),
    Conflict { field: String, message: String },
}

/// JSON body extractor whose rejections use the error envelope.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(error = %rejection.body_text(), "Rejected request body");

        let message = match rejection {
            JsonRejection::MissingJsonContentType(_) => {
                "Request body must be JSON with Content-Type: application/json"
            }
            JsonRejection::JsonSyntaxError(_) => "Request body is not valid JSON",
            JsonRejection::JsonDataError(_) => "Request body has invalid field types",
            _ => "Request body could not be read",
        };
        ApiError::BadRequest(message.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, details) = match self {
            ApiError::InternalServerError(msg) => {
                tracing::error!(error = %msg, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    None,
                )
            }
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, None),
            ApiError::Validation(fields) => (
                StatusCode::BAD_REQUEST,
                "Validation failed".to_string(),
                Some(json!(fields)),
            ),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg, None),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg, None),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, None),
            ApiError::Conflict { field, message } => (
                StatusCode::CONFLICT,
                message,
                Some(json!({ "field": field })),
            ),
        };

        (status, Json(ApiErrorBody::new(status, message, details))).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidDateOfBirth(_)
            | AuthError::InvalidOldPassword
            | AuthError::InvalidResetToken => ApiError::BadRequest(err.to_string()),
            AuthError::InvalidCredentials
            | AuthError::AccountDeactivated
            | AuthError::InvalidRefreshToken
            | AuthError::RefreshTokenExpired => ApiError::Unauthorized(err.to_string()),
            AuthError::EmailAlreadyExists(_)
            | AuthError::UsernameAlreadyExists(_)
            | AuthError::PhoneNumberAlreadyExists(_) => ApiError::Conflict {
                field: err.conflict_field().unwrap_or_default().to_string(),
                message: err.to_string(),
            },
            AuthError::NotFound(_) => ApiError::NotFound(err.to_string()),
            AuthError::Password(_)
            | AuthError::Token(_)
            | AuthError::DatabaseError(_)
            | AuthError::Unknown(_) => ApiError::InternalServerError(err.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    code: u16,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
}

impl<T: Serialize + PartialEq> ApiResponseBody<T> {
    pub fn new(status_code: StatusCode, message: String, data: Option<T>) -> Self {
        Self {
            code: status_code.as_u16(),
            message,
            data,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiErrorBody {
    code: u16,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

impl ApiErrorBody {
    pub fn new(
        status_code: StatusCode,
        message: String,
        details: Option<serde_json::Value>,
    ) -> Self {
        Self {
            code: status_code.as_u16(),
            message,
            details,
        }
    }
}

/// Collects per-field validation failures for a request body.
#[derive(Debug, Default)]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        // First failure per field wins.
        self.0
            .entry(field.to_string())
            .or_insert_with(|| message.into());
    }

    /// Record the error of a value-object constructor under `field`.
    pub fn check<T, E: Display>(&mut self, field: &str, result: Result<T, E>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                self.add(field, e.to_string());
                None
            }
        }
    }

    pub fn require(&mut self, field: &str, value: &str) {
        if value.trim().is_empty() {
            self.add(field, format!("{} is required", field));
        }
    }

    /// Length bounds in characters; `max` of `None` means unbounded.
    pub fn length(&mut self, field: &str, value: &str, min: usize, max: Option<usize>) {
        let length = value.chars().count();
        if length < min {
            self.add(
                field,
                format!("{} must be at least {} characters", field, min),
            );
        } else if let Some(max) = max.filter(|max| length > *max) {
            self.add(
                field,
                format!("{} must be at most {} characters", field, max),
            );
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::Validation(errors.0)
    }
}

/// Outward view of an account; never carries the password hash or reset token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserData {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub phone_number: String,
    pub full_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dob: Option<NaiveDate>,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Account> for UserData {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id.0,
            username: account.username.as_str().to_string(),
            email: account.email.as_str().to_string(),
            phone_number: account.phone_number.as_str().to_string(),
            full_name: account.full_name.clone(),
            address: account.address.clone(),
            dob: account.date_of_birth,
            role: account.role.clone(),
            created_at: account.created_at,
        }
    }
}

/// Payload of register, login and refresh responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthResponseData {
    pub user: UserData,
    pub access_token: String,
    pub refresh_token: String,
    /// Access token expiry.
    pub expires_at: DateTime<Utc>,
}

impl From<&AuthOutcome> for AuthResponseData {
    fn from(outcome: &AuthOutcome) -> Self {
        Self {
            user: UserData::from(&outcome.account),
            access_token: outcome.tokens.access_token.clone(),
            refresh_token: outcome.tokens.refresh_token.clone(),
            expires_at: outcome.tokens.access_expires_at,
        }
    }
}
