use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::FromRow;
use sqlx::PgPool;
use uuid::Uuid;

use crate::team::errors::TeamError;
use crate::team::models::Team;
use crate::team::models::TeamId;
use crate::team::models::TeamName;
use crate::team::ports::TeamRepository;
use crate::user::models::UserId;

pub struct PostgresTeamRepository {
    pool: PgPool,
}

impl PostgresTeamRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct TeamRow {
    id: Uuid,
    name: String,
    leader_id: Option<Uuid>,
    created_at: DateTime<Utc>,
}

impl TryFrom<TeamRow> for Team {
    type Error = TeamError;

    fn try_from(r: TeamRow) -> Result<Self, Self::Error> {
        Ok(Team {
            id: TeamId(r.id),
            name: TeamName::new(r.name)?,
            leader_id: r.leader_id.map(UserId),
            created_at: r.created_at,
        })
    }
}

/// Translate constraint violations on insert and update.
fn write_error(e: sqlx::Error, team: &Team) -> TeamError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() && db_err.constraint() == Some("teams_name_key") {
            return TeamError::NameAlreadyExists(team.name.as_str().to_string());
        }
        if db_err.is_foreign_key_violation() {
            if let Some(leader_id) = team.leader_id {
                return TeamError::LeaderNotFound(leader_id.to_string());
            }
        }
    }
    TeamError::DatabaseError(e.to_string())
}

#[async_trait]
impl TeamRepository for PostgresTeamRepository {
    async fn create(&self, team: Team) -> Result<Team, TeamError> {
        sqlx::query(
            r#"
            INSERT INTO teams (id, name, leader_id, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(team.id.0)
        .bind(team.name.as_str())
        .bind(team.leader_id.map(|id| id.0))
        .bind(team.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| write_error(e, &team))?;

        Ok(team)
    }

    async fn find_by_id(&self, id: &TeamId) -> Result<Option<Team>, TeamError> {
        let row = sqlx::query_as::<_, TeamRow>(
            r#"
            SELECT id, name, leader_id, created_at
            FROM teams
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| TeamError::DatabaseError(e.to_string()))?;

        row.map(Team::try_from).transpose()
    }

    async fn list_all(&self) -> Result<Vec<Team>, TeamError> {
        let rows = sqlx::query_as::<_, TeamRow>(
            r#"
            SELECT id, name, leader_id, created_at
            FROM teams
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| TeamError::DatabaseError(e.to_string()))?;

        rows.into_iter().map(Team::try_from).collect()
    }

    async fn update(&self, team: Team) -> Result<Team, TeamError> {
        let result = sqlx::query(
            r#"
            UPDATE teams
            SET name = $2, leader_id = $3
            WHERE id = $1
            "#,
        )
        .bind(team.id.0)
        .bind(team.name.as_str())
        .bind(team.leader_id.map(|id| id.0))
        .execute(&self.pool)
        .await
        .map_err(|e| write_error(e, &team))?;

        if result.rows_affected() == 0 {
            return Err(TeamError::NotFound(team.id));
        }

        Ok(team)
    }
}
