use axum::extract::State;
use axum::http::StatusCode;

use super::ApiError;
use super::ApiSuccess;
use super::MetricData;
use crate::inbound::http::router::AppState;

pub async fn list_metrics(
    State(state): State<AppState>,
) -> Result<ApiSuccess<Vec<MetricData>>, ApiError> {
    state
        .metric_service
        .list_metrics()
        .await
        .map_err(ApiError::from)
        .map(|metrics| {
            ApiSuccess::new(
                StatusCode::OK,
                metrics.iter().map(MetricData::from).collect(),
            )
        })
}
