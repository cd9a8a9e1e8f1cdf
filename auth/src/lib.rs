//! Authentication utilities library
//!
//! Provides the credential and token primitives used by the service:
//! - Password hashing (Argon2id)
//! - JWT access token issuance and validation against an explicit clock
//! - Authentication coordination
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash));
//! assert!(!hasher.verify("other_password", &hash));
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use auth::Authenticator;
//! use chrono::{Duration, Utc};
//!
//! let auth = Authenticator::new(b"secret_key_at_least_32_bytes_long!", Duration::minutes(30));
//!
//! // Register: hash password
//! let hash = auth.hash_password("password123").unwrap();
//!
//! // Login: verify and issue token
//! let now = Utc::now();
//! let result = auth.authenticate("password123", &hash, "a@x.com", now).unwrap();
//!
//! // Validate token
//! let claims = auth.validate_token(&result.access_token, now).unwrap();
//! assert_eq!(claims.sub.as_deref(), Some("a@x.com"));
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;

pub use authenticator::AuthenticationError;
pub use authenticator::AuthenticationResult;
pub use authenticator::Authenticator;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use password::PasswordError;
pub use password::PasswordHasher;
