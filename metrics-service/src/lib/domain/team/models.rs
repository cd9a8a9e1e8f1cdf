use std::fmt;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::team::errors::TeamIdError;
use crate::team::errors::TeamNameError;
use crate::user::models::UserId;

/// Team aggregate.
///
/// `leader_id` is a nullable reference to a user; its existence and the
/// leader's role are checked when the team is written.
#[derive(Debug, Clone, PartialEq)]
pub struct Team {
    pub id: TeamId,
    pub name: TeamName,
    pub leader_id: Option<UserId>,
    pub created_at: DateTime<Utc>,
}

/// Team unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TeamId(pub Uuid);

impl TeamId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a team ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, TeamIdError> {
        Uuid::parse_str(s.trim())
            .map(TeamId)
            .map_err(|e| TeamIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for TeamId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Team name, unique across teams.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamName(String);

impl TeamName {
    const MAX_LENGTH: usize = 100;

    /// # Errors
    /// * `Empty` - Name is blank
    /// * `TooLong` - Name exceeds 100 characters
    pub fn new(name: String) -> Result<Self, TeamNameError> {
        let name = name.trim().to_string();
        let length = name.chars().count();

        if length == 0 {
            return Err(TeamNameError::Empty);
        }
        if length > Self::MAX_LENGTH {
            return Err(TeamNameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            });
        }

        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TeamName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug)]
pub struct CreateTeamCommand {
    pub name: TeamName,
    pub leader_id: Option<UserId>,
}

/// Partial team update. Only provided fields change.
///
/// `leader_id` is `Some(None)` to remove the current leader.
#[derive(Debug)]
pub struct UpdateTeamCommand {
    pub name: Option<TeamName>,
    pub leader_id: Option<Option<UserId>>,
}
