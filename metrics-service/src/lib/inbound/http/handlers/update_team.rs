use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Deserializer;

use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::handlers::TeamData;
use crate::inbound::http::router::AppState;
use crate::team::errors::TeamError;
use crate::team::models::TeamId;
use crate::team::models::TeamName;
use crate::team::models::UpdateTeamCommand;
use crate::user::models::UserId;

/// HTTP request body for updating a team (raw JSON)
///
/// An absent `leader_id` keeps the current leader; `null` removes it.
#[derive(Debug, Deserialize)]
pub struct UpdateTeamRequest {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub leader_id: Option<Option<String>>,
}

/// Wrap a field that was present in the body, even as `null`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl UpdateTeamRequest {
    fn try_into_command(self) -> Result<UpdateTeamCommand, TeamError> {
        let name = self.name.map(TeamName::new).transpose()?;
        let leader_id = self
            .leader_id
            .map(|leader| leader.as_deref().map(UserId::from_string).transpose())
            .transpose()?;

        Ok(UpdateTeamCommand { name, leader_id })
    }
}

pub async fn update_team(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateTeamRequest>,
) -> Result<ApiSuccess<TeamData>, ApiError> {
    let team_id = TeamId::from_string(&id).map_err(|e| ApiError::BadRequest(e.to_string()))?;
    let command = req.try_into_command()?;

    state
        .team_service
        .update_team(&team_id, command)
        .await
        .map_err(ApiError::from)
        .map(|ref team| ApiSuccess::new(StatusCode::OK, team.into()))
}
