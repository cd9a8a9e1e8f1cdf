use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::team::ports::TeamRepository;
use crate::user::errors::UserError;
use crate::user::models::CreateUserCommand;
use crate::user::models::User;
use crate::user::models::UserId;
use crate::user::ports::UserRepository;
use crate::user::ports::UserServicePort;

/// Domain service implementation for user operations.
///
/// Concrete implementation of UserServicePort with dependency injection.
pub struct UserService<UR, TR>
where
    UR: UserRepository,
    TR: TeamRepository,
{
    repository: Arc<UR>,
    team_repository: Arc<TR>,
    password_hasher: auth::PasswordHasher,
}

impl<UR, TR> UserService<UR, TR>
where
    UR: UserRepository,
    TR: TeamRepository,
{
    /// Create a new user service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - User persistence implementation
    /// * `team_repository` - Used to check team references at write time
    pub fn new(repository: Arc<UR>, team_repository: Arc<TR>) -> Self {
        Self {
            repository,
            team_repository,
            password_hasher: auth::PasswordHasher::new(),
        }
    }
}

#[async_trait]
impl<UR, TR> UserServicePort for UserService<UR, TR>
where
    UR: UserRepository,
    TR: TeamRepository,
{
    async fn create_user(&self, command: CreateUserCommand) -> Result<User, UserError> {
        if let Some(team_id) = &command.team_id {
            let team = self
                .team_repository
                .find_by_id(team_id)
                .await
                .map_err(|e| UserError::DatabaseError(e.to_string()))?;
            if team.is_none() {
                return Err(UserError::TeamNotFound(team_id.to_string()));
            }
        }

        let password_hash = self
            .password_hasher
            .hash(&command.password)
            .map_err(|e| match e {
                auth::PasswordError::Empty => UserError::EmptyPassword,
                other => UserError::Unknown(format!("Password hashing failed: {}", other)),
            })?;

        let user = User {
            id: UserId::new(),
            email: command.email,
            password_hash,
            full_name: command.full_name,
            role: command.role,
            team_id: command.team_id,
            created_at: Utc::now(),
        };

        let created_user = self.repository.create(user).await?;
        tracing::info!(
            user_id = %created_user.id,
            role = %created_user.role,
            "User registered"
        );

        Ok(created_user)
    }
}
