use async_trait::async_trait;

use crate::user::errors::UserError;
use crate::user::models::CreateUserCommand;
use crate::user::models::EmailAddress;
use crate::user::models::User;
use crate::user::models::UserId;

/// Port for user domain service operations.
#[async_trait]
pub trait UserServicePort: Send + Sync + 'static {
    /// Register a new user.
    ///
    /// # Arguments
    /// * `command` - Validated registration data, password still in plaintext
    ///
    /// # Returns
    /// Created user entity
    ///
    /// # Errors
    /// * `EmptyPassword` - Password is empty
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `TeamNotFound` - Referenced team does not exist
    /// * `DatabaseError` - Database operation failed
    async fn create_user(&self, command: CreateUserCommand) -> Result<User, UserError>;
}

/// Persistence operations for the user aggregate (the credential store).
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist new user to storage.
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `TeamNotFound` - Referenced team vanished before insert
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, user: User) -> Result<User, UserError>;

    /// Retrieve user by identifier.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;

    /// Retrieve user by email address.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError>;
}
