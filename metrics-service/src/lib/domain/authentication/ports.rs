use async_trait::async_trait;

use crate::authentication::errors::AuthError;
use crate::authentication::models::AccessToken;
use crate::user::models::User;

/// Port for authentication operations.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Exchange email and password for an access token.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email or wrong password, indistinguishably
    /// * `Internal` - Lookup or token generation failed
    async fn login(&self, email: &str, password: &str) -> Result<AccessToken, AuthError>;

    /// Resolve the identity behind a bearer token at the current time.
    ///
    /// # Errors
    /// * `InvalidSignature` - Token was tampered with or signed elsewhere
    /// * `Malformed` - Token cannot be decoded or lacks subject/expiry
    /// * `Expired` - Token lifetime has elapsed
    /// * `UnknownSubject` - Token subject is no longer registered
    /// * `Internal` - Lookup failed
    async fn resolve(&self, token: &str) -> Result<User, AuthError>;
}
