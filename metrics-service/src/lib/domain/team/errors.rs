use thiserror::Error;

use crate::team::models::TeamId;
use crate::user::errors::UserIdError;

/// Error type for TeamId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TeamIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error type for TeamName validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TeamNameError {
    #[error("Team name is empty")]
    Empty,

    #[error("Team name too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Top-level error type for all team-related operations
#[derive(Debug, Clone, Error)]
pub enum TeamError {
    #[error("Invalid team ID: {0}")]
    InvalidTeamId(#[from] TeamIdError),

    #[error("Invalid team name: {0}")]
    InvalidTeamName(#[from] TeamNameError),

    #[error("Invalid leader ID: {0}")]
    InvalidLeaderId(#[from] UserIdError),

    #[error("Team not found: {0}")]
    NotFound(TeamId),

    #[error("Team name already exists: {0}")]
    NameAlreadyExists(String),

    #[error("Leader not found: {0}")]
    LeaderNotFound(String),

    #[error("User {user_id} has role '{role}' and cannot lead a team")]
    LeaderNotEligible { user_id: String, role: String },

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}
