use axum::http::header;
use axum::http::HeaderValue;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use crate::authentication::errors::AuthError;
use crate::metric::errors::MetricError;
use crate::metric::models::Metric;
use crate::team::errors::TeamError;
use crate::team::models::Team;
use crate::user::errors::UserError;
use crate::user::models::User;

pub mod create_metric;
pub mod create_team;
pub mod create_user;
pub mod get_current_user;
pub mod list_metrics;
pub mod list_team_metrics;
pub mod list_teams;
pub mod login;
pub mod root;
pub mod update_team;
pub mod upload_csv;

/// Message returned for every rejected bearer token, whatever the cause.
pub const INVALID_TOKEN_MESSAGE: &str = "Could not validate credentials";

/// Message returned for every failed login, whatever the cause.
pub const INVALID_LOGIN_MESSAGE: &str = "Incorrect username or password";

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
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(ApiResponseBody::new(status, data)))
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
    UnprocessableEntity(String),
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    /// Rendered with `WWW-Authenticate: Bearer`.
    Unauthorized(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InternalServerError(msg) => {
                tracing::error!(error = %msg, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            ApiError::UnprocessableEntity(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
        };

        let mut response =
            (status, Json(ApiResponseBody::new_error(status, message))).into_response();

        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }

        response
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Internal(msg) => ApiError::InternalServerError(msg),
            AuthError::InvalidCredentials => ApiError::Unauthorized(INVALID_LOGIN_MESSAGE.to_string()),
            AuthError::InvalidSignature
            | AuthError::Malformed(_)
            | AuthError::Expired
            | AuthError::UnknownSubject(_) => {
                ApiError::Unauthorized(INVALID_TOKEN_MESSAGE.to_string())
            }
        }
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::EmailAlreadyExists(_) => ApiError::Conflict(err.to_string()),
            UserError::InvalidEmail(_)
            | UserError::InvalidFullName(_)
            | UserError::InvalidRole(_)
            | UserError::EmptyPassword
            | UserError::TeamNotFound(_) => ApiError::UnprocessableEntity(err.to_string()),
            UserError::DatabaseError(_) | UserError::Unknown(_) => {
                ApiError::InternalServerError(err.to_string())
            }
        }
    }
}

impl From<TeamError> for ApiError {
    fn from(err: TeamError) -> Self {
        match err {
            TeamError::NotFound(_) => ApiError::NotFound(err.to_string()),
            TeamError::NameAlreadyExists(_) => ApiError::Conflict(err.to_string()),
            TeamError::InvalidTeamId(_)
            | TeamError::InvalidTeamName(_)
            | TeamError::InvalidLeaderId(_)
            | TeamError::LeaderNotFound(_)
            | TeamError::LeaderNotEligible { .. } => {
                ApiError::UnprocessableEntity(err.to_string())
            }
            TeamError::DatabaseError(_) | TeamError::Unknown(_) => {
                ApiError::InternalServerError(err.to_string())
            }
        }
    }
}

impl From<MetricError> for ApiError {
    fn from(err: MetricError) -> Self {
        match err {
            MetricError::TeamNotFound(_) => ApiError::NotFound(err.to_string()),
            MetricError::InvalidMetricName(_)
            | MetricError::InvalidMetricValue(_)
            | MetricError::InvalidTeamId(_)
            | MetricError::InvalidCsv(_)
            | MetricError::InvalidRow { .. } => ApiError::UnprocessableEntity(err.to_string()),
            MetricError::DatabaseError(_) | MetricError::Unknown(_) => {
                ApiError::InternalServerError(err.to_string())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    status_code: u16,
    data: T,
}

impl<T: Serialize + PartialEq> ApiResponseBody<T> {
    pub fn new(status_code: StatusCode, data: T) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data,
        }
    }
}

impl ApiResponseBody<ApiErrorData> {
    pub fn new_error(status_code: StatusCode, message: String) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data: ApiErrorData { message },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorData {
    pub message: String,
}

/// Public view of a user. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserData {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub role: String,
    pub team_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserData {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            email: user.email.as_str().to_string(),
            full_name: user.full_name.as_str().to_string(),
            role: user.role.as_str().to_string(),
            team_id: user.team_id.map(|id| id.to_string()),
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamData {
    pub id: String,
    pub name: String,
    pub leader_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&Team> for TeamData {
    fn from(team: &Team) -> Self {
        Self {
            id: team.id.to_string(),
            name: team.name.as_str().to_string(),
            leader_id: team.leader_id.map(|id| id.to_string()),
            created_at: team.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricData {
    pub id: String,
    pub name: String,
    pub value: f64,
    pub team_id: String,
    pub timestamp: DateTime<Utc>,
}

impl From<&Metric> for MetricData {
    fn from(metric: &Metric) -> Self {
        Self {
            id: metric.id.to_string(),
            name: metric.name.as_str().to_string(),
            value: metric.value.get(),
            team_id: metric.team_id.to_string(),
            timestamp: metric.recorded_at,
        }
    }
}
