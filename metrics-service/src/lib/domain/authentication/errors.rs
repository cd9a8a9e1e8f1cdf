use thiserror::Error;

/// Failures of login and bearer-token resolution.
///
/// Every variant except `Internal` is a rejection of the caller. The HTTP
/// boundary reports them all as 401 without revealing which one occurred.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token signature is invalid")]
    InvalidSignature,

    #[error("Token is malformed: {0}")]
    Malformed(String),

    #[error("Token is expired")]
    Expired,

    #[error("Token subject no longer exists: {0}")]
    UnknownSubject(String),

    #[error("Authentication failed: {0}")]
    Internal(String),
}

impl From<auth::JwtError> for AuthError {
    fn from(err: auth::JwtError) -> Self {
        match err {
            auth::JwtError::InvalidSignature => AuthError::InvalidSignature,
            auth::JwtError::Malformed(reason) => AuthError::Malformed(reason),
            auth::JwtError::Expired => AuthError::Expired,
            auth::JwtError::EncodingFailed(reason) => AuthError::Internal(reason),
        }
    }
}

impl From<auth::AuthenticationError> for AuthError {
    fn from(err: auth::AuthenticationError) -> Self {
        match err {
            auth::AuthenticationError::InvalidCredentials => AuthError::InvalidCredentials,
            auth::AuthenticationError::JwtError(e) => AuthError::from(e),
        }
    }
}
