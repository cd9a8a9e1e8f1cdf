use chrono::DateTime;
use chrono::Utc;

/// Bearer token handed out at login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl From<auth::AuthenticationResult> for AccessToken {
    fn from(result: auth::AuthenticationResult) -> Self {
        Self {
            token: result.access_token,
            expires_at: result.expires_at,
        }
    }
}
