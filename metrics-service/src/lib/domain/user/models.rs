use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::team::models::TeamId;
use crate::user::errors::EmailError;
use crate::user::errors::FullNameError;
use crate::user::errors::RoleError;
use crate::user::errors::UserIdError;

/// User aggregate entity.
///
/// The identity a request acts as once authenticated. The auth flow only
/// ever reads it.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: UserId,
    pub email: EmailAddress,
    pub password_hash: String,
    pub full_name: FullName,
    pub role: Role,
    pub team_id: Option<TeamId>,
    pub created_at: DateTime<Utc>,
}

/// User unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Generate a new random user ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a user ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, UserIdError> {
        Uuid::parse_str(s)
            .map(UserId)
            .map_err(|e| UserIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Validated with an RFC 5322 parser and stored lowercased, so lookups and
/// the uniqueness constraint are case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated email address.
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        let email = email.trim().to_lowercase();
        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Display name of a user, 1-100 characters after trimming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FullName(String);

impl FullName {
    const MAX_LENGTH: usize = 100;

    /// # Errors
    /// * `Empty` - Name is blank
    /// * `TooLong` - Name is longer than 100 characters
    pub fn new(full_name: String) -> Result<Self, FullNameError> {
        let full_name = full_name.trim().to_string();
        let length = full_name.chars().count();

        if length == 0 {
            Err(FullNameError::Empty)
        } else if length > Self::MAX_LENGTH {
            Err(FullNameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(Self(full_name))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Organizational role of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Manager,
    Leader,
    TeamMember,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Manager => "manager",
            Role::Leader => "leader",
            Role::TeamMember => "team_member",
        }
    }

    /// Whether a user with this role may be assigned as a team's leader.
    pub fn can_lead_team(&self) -> bool {
        matches!(self, Role::Manager | Role::Leader)
    }
}

impl FromStr for Role {
    type Err = RoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "manager" => Ok(Role::Manager),
            "leader" => Ok(Role::Leader),
            "team_member" => Ok(Role::TeamMember),
            other => Err(RoleError::Unknown(other.to_string())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Command to register a new user with domain types
#[derive(Debug)]
pub struct CreateUserCommand {
    pub email: EmailAddress,
    pub password: String,
    pub full_name: FullName,
    pub role: Role,
    pub team_id: Option<TeamId>,
}
