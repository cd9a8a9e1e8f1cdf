use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::MetricData;
use crate::inbound::http::router::AppState;
use crate::metric::errors::MetricError;
use crate::metric::models::CreateMetricCommand;
use crate::metric::models::MetricName;
use crate::metric::models::MetricValue;
use crate::team::models::TeamId;

pub async fn create_metric(
    State(state): State<AppState>,
    Json(body): Json<CreateMetricRequest>,
) -> Result<ApiSuccess<MetricData>, ApiError> {
    let command = body.try_into_command()?;

    state
        .metric_service
        .create_metric(command)
        .await
        .map_err(ApiError::from)
        .map(|ref metric| ApiSuccess::new(StatusCode::CREATED, metric.into()))
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CreateMetricRequest {
    name: String,
    value: f64,
    team_id: String,
}

impl CreateMetricRequest {
    fn try_into_command(self) -> Result<CreateMetricCommand, MetricError> {
        Ok(CreateMetricCommand {
            name: MetricName::new(self.name)?,
            value: MetricValue::new(self.value)?,
            team_id: TeamId::from_string(&self.team_id)?,
        })
    }
}
