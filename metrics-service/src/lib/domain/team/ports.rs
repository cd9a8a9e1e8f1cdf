use async_trait::async_trait;

use crate::team::errors::TeamError;
use crate::team::models::CreateTeamCommand;
use crate::team::models::Team;
use crate::team::models::TeamId;
use crate::team::models::UpdateTeamCommand;

/// Port for team domain service operations.
#[async_trait]
pub trait TeamServicePort: Send + Sync + 'static {
    /// Create a team, optionally with a leader.
    ///
    /// # Errors
    /// * `NameAlreadyExists` - Another team has this name
    /// * `LeaderNotFound` - Leader does not exist
    /// * `LeaderNotEligible` - Leader's role cannot lead a team
    /// * `DatabaseError` - Database operation failed
    async fn create_team(&self, command: CreateTeamCommand) -> Result<Team, TeamError>;

    /// List all teams ordered by name.
    async fn list_teams(&self) -> Result<Vec<Team>, TeamError>;

    /// Retrieve a team.
    ///
    /// # Errors
    /// * `NotFound` - Team does not exist
    async fn get_team(&self, id: &TeamId) -> Result<Team, TeamError>;

    /// Rename a team and/or change or remove its leader.
    ///
    /// # Errors
    /// * `NotFound` - Team does not exist
    /// * `NameAlreadyExists` - New name is taken
    /// * `LeaderNotFound` / `LeaderNotEligible` - New leader is unusable
    async fn update_team(&self, id: &TeamId, command: UpdateTeamCommand)
        -> Result<Team, TeamError>;
}

/// Persistence operations for the team aggregate.
#[async_trait]
pub trait TeamRepository: Send + Sync + 'static {
    /// # Errors
    /// * `NameAlreadyExists` - Another team has this name
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, team: Team) -> Result<Team, TeamError>;

    /// # Returns
    /// Optional team entity (None if not found)
    async fn find_by_id(&self, id: &TeamId) -> Result<Option<Team>, TeamError>;

    async fn list_all(&self) -> Result<Vec<Team>, TeamError>;

    /// # Errors
    /// * `NotFound` - Team does not exist
    /// * `NameAlreadyExists` - New name is taken
    /// * `DatabaseError` - Database operation failed
    async fn update(&self, team: Team) -> Result<Team, TeamError>;
}
