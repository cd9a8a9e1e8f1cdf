use axum::http::StatusCode;
use serde::Serialize;

use super::ApiSuccess;

pub async fn root() -> ApiSuccess<RootResponseData> {
    ApiSuccess::new(
        StatusCode::OK,
        RootResponseData {
            message: "Welcome to the Health Metrics API".to_string(),
        },
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RootResponseData {
    pub message: String,
}
