use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use thiserror::Error;

use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::inbound::http::router::AppState;
use crate::team::errors::TeamIdError;
use crate::team::models::TeamId;
use crate::user::errors::EmailError;
use crate::user::errors::FullNameError;
use crate::user::errors::RoleError;
use crate::user::models::CreateUserCommand;
use crate::user::models::EmailAddress;
use crate::user::models::FullName;
use crate::user::models::Role;

pub async fn create_user(
    State(state): State<AppState>,
    Json(body): Json<CreateUserRequest>,
) -> Result<ApiSuccess<UserData>, ApiError> {
    state
        .user_service
        .create_user(body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::CREATED, user.into()))
}

/// HTTP request body for registering a user (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateUserRequest {
    email: String,
    password: String,
    full_name: String,
    role: String,
    #[serde(default)]
    team_id: Option<String>,
}

#[derive(Debug, Clone, Error)]
enum ParseCreateUserRequestError {
    #[error("Invalid email: {0}")]
    Email(#[from] EmailError),

    #[error("Invalid full name: {0}")]
    FullName(#[from] FullNameError),

    #[error("Invalid role: {0}")]
    Role(#[from] RoleError),

    #[error("Invalid team ID: {0}")]
    TeamId(#[from] TeamIdError),
}

impl CreateUserRequest {
    fn try_into_command(self) -> Result<CreateUserCommand, ParseCreateUserRequestError> {
        let email = EmailAddress::new(self.email)?;
        let full_name = FullName::new(self.full_name)?;
        let role = self.role.parse::<Role>()?;
        let team_id = self
            .team_id
            .as_deref()
            .map(TeamId::from_string)
            .transpose()?;

        Ok(CreateUserCommand {
            email,
            password: self.password,
            full_name,
            role,
            team_id,
        })
    }
}

impl From<ParseCreateUserRequestError> for ApiError {
    fn from(err: ParseCreateUserRequestError) -> Self {
        ApiError::UnprocessableEntity(err.to_string())
    }
}
