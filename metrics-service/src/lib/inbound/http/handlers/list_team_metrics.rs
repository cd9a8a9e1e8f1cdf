use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;

use super::ApiError;
use super::ApiSuccess;
use super::MetricData;
use crate::inbound::http::router::AppState;
use crate::team::models::TeamId;

pub async fn list_team_metrics(
    State(state): State<AppState>,
    Path(team_id): Path<String>,
) -> Result<ApiSuccess<Vec<MetricData>>, ApiError> {
    let team_id =
        TeamId::from_string(&team_id).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    state
        .metric_service
        .list_team_metrics(&team_id)
        .await
        .map_err(ApiError::from)
        .map(|metrics| {
            ApiSuccess::new(
                StatusCode::OK,
                metrics.iter().map(MetricData::from).collect(),
            )
        })
}
