use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Access token claims.
///
/// Standard RFC 7519 registered claims. Timestamps are whole Unix seconds.
/// Fields are optional on the wire so that a token missing one of them
/// decodes and can be reported as malformed rather than as a decoding failure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Claims {
    /// Subject (the identity's email address)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    /// Expiration time (Unix timestamp)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,

    /// Issued at (Unix timestamp)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
}

impl Claims {
    /// Create new empty claims.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create claims for a subject issued at `now` and valid for `ttl`.
    ///
    /// `now` is truncated to whole seconds; the token expires at `iat + ttl`.
    /// `exp` is left unset when that sum overflows.
    pub fn for_subject(sub: impl ToString, now: DateTime<Utc>, ttl: Duration) -> Self {
        let issued_at = now.timestamp();

        Self {
            sub: Some(sub.to_string()),
            exp: issued_at.checked_add(ttl.num_seconds()),
            iat: Some(issued_at),
        }
    }

    /// Set subject.
    pub fn with_subject(mut self, sub: impl ToString) -> Self {
        self.sub = Some(sub.to_string());
        self
    }

    /// Set expiration (Unix timestamp).
    pub fn with_expiration(mut self, exp: i64) -> Self {
        self.exp = Some(exp);
        self
    }

    /// Check if the token is expired at `current_timestamp`.
    ///
    /// A token is valid up to, but excluding, its expiration second.
    /// Claims without `exp` are never considered expired here; callers that
    /// require an expiry check for its presence first.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp.map_or(false, |exp| current_timestamp >= exp)
    }
}
