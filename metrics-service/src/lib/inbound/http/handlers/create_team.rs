use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::TeamData;
use crate::inbound::http::router::AppState;
use crate::team::errors::TeamError;
use crate::team::models::CreateTeamCommand;
use crate::team::models::TeamName;
use crate::user::models::UserId;

pub async fn create_team(
    State(state): State<AppState>,
    Json(body): Json<CreateTeamRequest>,
) -> Result<ApiSuccess<TeamData>, ApiError> {
    let command = body.try_into_command()?;

    state
        .team_service
        .create_team(command)
        .await
        .map_err(ApiError::from)
        .map(|ref team| ApiSuccess::new(StatusCode::CREATED, team.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateTeamRequest {
    name: String,
    #[serde(default)]
    leader_id: Option<String>,
}

impl CreateTeamRequest {
    fn try_into_command(self) -> Result<CreateTeamCommand, TeamError> {
        Ok(CreateTeamCommand {
            name: TeamName::new(self.name)?,
            leader_id: self
                .leader_id
                .as_deref()
                .map(UserId::from_string)
                .transpose()?,
        })
    }
}
