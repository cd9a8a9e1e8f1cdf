use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

use crate::jwt::Claims;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

/// Authentication coordinator combining password verification and JWT handling.
///
/// Holds the process-wide signing secret and token lifetime. Built once at
/// startup and shared read-only between request handlers.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    jwt_handler: JwtHandler,
    token_ttl: Duration,
    decoy_hash: Option<String>,
}

/// Result of successful authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticationResult {
    /// Signed JWT access token
    pub access_token: String,
    /// Absolute expiry of the token
    pub expires_at: DateTime<Utc>,
}

/// Authentication operation errors.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("JWT error: {0}")]
    JwtError(#[from] JwtError),
}

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// # Arguments
    /// * `jwt_secret` - Secret key for JWT signing
    /// * `token_ttl` - Lifetime of issued access tokens
    pub fn new(jwt_secret: &[u8], token_ttl: Duration) -> Self {
        let password_hasher = PasswordHasher::new();
        let decoy_hash = password_hasher.hash("decoy-password-for-unknown-users").ok();

        Self {
            password_hasher,
            jwt_handler: JwtHandler::new(jwt_secret),
            token_ttl,
            decoy_hash,
        }
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `Empty` - Password is empty
    /// * `HashingFailed` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Verify credentials and issue an access token for `subject`.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match the stored hash
    /// * `JwtError` - Token generation failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: &str,
        subject: &str,
        now: DateTime<Utc>,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        if !self.password_hasher.verify(password, stored_hash) {
            return Err(AuthenticationError::InvalidCredentials);
        }

        Ok(self.issue_token(subject, now)?)
    }

    /// Reject a login attempt for an identity that does not exist.
    ///
    /// Runs a verification against a decoy hash so the response takes as
    /// long as a wrong-password rejection.
    pub fn reject_unknown(&self, password: &str) -> AuthenticationError {
        if let Some(decoy) = &self.decoy_hash {
            let _ = self.password_hasher.verify(password, decoy);
        }
        AuthenticationError::InvalidCredentials
    }

    /// Issue a token without password verification.
    ///
    /// The caller must already have authenticated `subject`.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token generation failed
    pub fn issue_token(
        &self,
        subject: &str,
        now: DateTime<Utc>,
    ) -> Result<AuthenticationResult, JwtError> {
        let claims = Claims::for_subject(subject, now, self.token_ttl);
        let expires_at = claims
            .exp
            .and_then(|exp| DateTime::<Utc>::from_timestamp(exp, 0))
            .ok_or_else(|| JwtError::EncodingFailed("expiry out of range".to_string()))?;
        let access_token = self.jwt_handler.encode(&claims)?;

        Ok(AuthenticationResult {
            access_token,
            expires_at,
        })
    }

    /// Validate a token at `now` and return its claims.
    ///
    /// The returned claims always carry a subject and an expiry.
    ///
    /// # Errors
    /// * `InvalidSignature` - Token was not signed with this secret
    /// * `Malformed` - Token cannot be decoded, or lacks `sub` or `exp`
    /// * `Expired` - `now` is at or past the token's expiry
    pub fn validate_token(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, JwtError> {
        let claims: Claims = self.jwt_handler.decode(token)?;

        if claims.sub.as_deref().map_or(true, str::is_empty) {
            return Err(JwtError::Malformed("missing subject".to_string()));
        }
        if claims.exp.is_none() {
            return Err(JwtError::Malformed("missing expiry".to_string()));
        }
        if claims.is_expired(now.timestamp()) {
            return Err(JwtError::Expired);
        }

        Ok(claims)
    }
}
