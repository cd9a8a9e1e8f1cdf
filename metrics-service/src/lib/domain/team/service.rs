use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::team::errors::TeamError;
use crate::team::models::CreateTeamCommand;
use crate::team::models::Team;
use crate::team::models::TeamId;
use crate::team::models::UpdateTeamCommand;
use crate::team::ports::TeamRepository;
use crate::team::ports::TeamServicePort;
use crate::user::models::UserId;
use crate::user::ports::UserRepository;

/// Domain service implementation for team operations.
pub struct TeamService<TR, UR>
where
    TR: TeamRepository,
    UR: UserRepository,
{
    repository: Arc<TR>,
    user_repository: Arc<UR>,
}

impl<TR, UR> TeamService<TR, UR>
where
    TR: TeamRepository,
    UR: UserRepository,
{
    /// Create a new team service.
    ///
    /// # Arguments
    /// * `repository` - Team persistence implementation
    /// * `user_repository` - Used to check leader references at write time
    pub fn new(repository: Arc<TR>, user_repository: Arc<UR>) -> Self {
        Self {
            repository,
            user_repository,
        }
    }

    async fn ensure_can_lead(&self, leader_id: &UserId) -> Result<(), TeamError> {
        let leader = self
            .user_repository
            .find_by_id(leader_id)
            .await
            .map_err(|e| TeamError::DatabaseError(e.to_string()))?
            .ok_or_else(|| TeamError::LeaderNotFound(leader_id.to_string()))?;

        if !leader.role.can_lead_team() {
            return Err(TeamError::LeaderNotEligible {
                user_id: leader_id.to_string(),
                role: leader.role.to_string(),
            });
        }

        Ok(())
    }
}

#[async_trait]
impl<TR, UR> TeamServicePort for TeamService<TR, UR>
where
    TR: TeamRepository,
    UR: UserRepository,
{
    async fn create_team(&self, command: CreateTeamCommand) -> Result<Team, TeamError> {
        if let Some(leader_id) = &command.leader_id {
            self.ensure_can_lead(leader_id).await?;
        }

        let team = Team {
            id: TeamId::new(),
            name: command.name,
            leader_id: command.leader_id,
            created_at: Utc::now(),
        };

        let created = self.repository.create(team).await?;
        tracing::info!(team_id = %created.id, name = %created.name, "Team created");

        Ok(created)
    }

    async fn list_teams(&self) -> Result<Vec<Team>, TeamError> {
        self.repository.list_all().await
    }

    async fn get_team(&self, id: &TeamId) -> Result<Team, TeamError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(TeamError::NotFound(*id))
    }

    async fn update_team(
        &self,
        id: &TeamId,
        command: UpdateTeamCommand,
    ) -> Result<Team, TeamError> {
        let mut team = self.get_team(id).await?;

        if let Some(new_name) = command.name {
            team.name = new_name;
        }

        match command.leader_id {
            Some(Some(new_leader)) => {
                self.ensure_can_lead(&new_leader).await?;
                team.leader_id = Some(new_leader);
            }
            Some(None) => team.leader_id = None,
            None => {}
        }

        let updated = self.repository.update(team).await?;
        tracing::info!(team_id = %updated.id, "Team updated");

        Ok(updated)
    }
}
