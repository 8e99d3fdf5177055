use axum::http::StatusCode;
use serde::Serialize;

use super::ApiSuccess;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthData {
    pub status: &'static str,
    pub service: &'static str,
}

pub async fn health_check() -> ApiSuccess<HealthData> {
    ApiSuccess::new(
        StatusCode::OK,
        "Service is healthy",
        HealthData {
            status: "ok",
            service: env!("CARGO_PKG_NAME"),
        },
    )
}
