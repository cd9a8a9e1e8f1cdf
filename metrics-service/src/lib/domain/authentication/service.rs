use std::sync::Arc;

use async_trait::async_trait;
use auth::Authenticator;

use crate::authentication::errors::AuthError;
use crate::authentication::models::AccessToken;
use crate::authentication::ports::AuthServicePort;
use crate::domain::clock::Clock;
use crate::user::models::EmailAddress;
use crate::user::models::User;
use crate::user::ports::UserRepository;

/// Login and bearer-token resolution against the credential store.
pub struct AuthService<UR, C>
where
    UR: UserRepository,
    C: Clock,
{
    repository: Arc<UR>,
    authenticator: Arc<Authenticator>,
    clock: Arc<C>,
}

impl<UR, C> AuthService<UR, C>
where
    UR: UserRepository,
    C: Clock,
{
    /// # Arguments
    /// * `repository` - Credential store
    /// * `authenticator` - Holds the signing secret and token lifetime
    /// * `clock` - Time source for issuing and checking tokens
    pub fn new(repository: Arc<UR>, authenticator: Arc<Authenticator>, clock: Arc<C>) -> Self {
        Self {
            repository,
            authenticator,
            clock,
        }
    }

    fn reject_unknown(&self, password: &str) -> AuthError {
        self.authenticator.reject_unknown(password).into()
    }
}

#[async_trait]
impl<UR, C> AuthServicePort for AuthService<UR, C>
where
    UR: UserRepository,
    C: Clock,
{
    async fn login(&self, email: &str, password: &str) -> Result<AccessToken, AuthError> {
        let Ok(email) = EmailAddress::new(email.to_string()) else {
            tracing::warn!(reason = "invalid email", "Login rejected");
            return Err(self.reject_unknown(password));
        };

        let user = self
            .repository
            .find_by_email(&email)
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        let Some(user) = user else {
            tracing::warn!(reason = "unknown email", "Login rejected");
            return Err(self.reject_unknown(password));
        };

        let result = self
            .authenticator
            .authenticate(
                password,
                &user.password_hash,
                user.email.as_str(),
                self.clock.now(),
            )
            .map_err(|e| {
                tracing::warn!(user_id = %user.id, error = %e, "Login rejected");
                AuthError::from(e)
            })?;

        tracing::info!(user_id = %user.id, expires_at = %result.expires_at, "Access token issued");

        Ok(result.into())
    }

    async fn resolve(&self, token: &str) -> Result<User, AuthError> {
        let claims = self.authenticator.validate_token(token, self.clock.now())?;
        let subject = claims.sub.unwrap_or_default();

        let email = EmailAddress::new(subject.clone())
            .map_err(|_| AuthError::Malformed(format!("subject is not an email: {}", subject)))?;

        self.repository
            .find_by_email(&email)
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))?
            .ok_or(AuthError::UnknownSubject(subject))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use chrono::DateTime;
    use chrono::Duration;
    use chrono::TimeZone;
    use chrono::Utc;
    use mockall::mock;

    use super::*;
    use crate::user::errors::UserError;
    use crate::user::models::FullName;
    use crate::user::models::Role;
    use crate::user::models::UserId;

    mock! {
        pub TestUserRepository {}

        #[async_trait]
        impl UserRepository for TestUserRepository {
            async fn create(&self, user: User) -> Result<User, UserError>;
            async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;
            async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError>;
        }
    }

    struct TestClock(Mutex<DateTime<Utc>>);

    impl TestClock {
        fn at(now: DateTime<Utc>) -> Self {
            Self(Mutex::new(now))
        }

        fn advance(&self, by: Duration) {
            let mut now = self.0.lock().unwrap();
            *now = *now + by;
        }
    }

    impl Clock for TestClock {
        fn now(&self) -> DateTime<Utc> {
            *self.0.lock().unwrap()
        }
    }

    const SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

    fn authenticator() -> Arc<Authenticator> {
        Arc::new(Authenticator::new(SECRET, Duration::minutes(30)))
    }

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap()
    }

    fn registered(authenticator: &Authenticator) -> User {
        User {
            id: UserId::new(),
            email: EmailAddress::new("a@x.com".to_string()).unwrap(),
            password_hash: authenticator.hash_password("secret").unwrap(),
            full_name: FullName::new("Alice Example".to_string()).unwrap(),
            role: Role::TeamMember,
            team_id: None,
            created_at: start(),
        }
    }

    fn repository_with(user: Option<User>) -> MockTestUserRepository {
        let mut repository = MockTestUserRepository::new();
        repository
            .expect_find_by_email()
            .returning(move |email| {
                Ok(user
                    .clone()
                    .filter(|u| u.email.as_str() == email.as_str()))
            });
        repository
    }

    #[tokio::test]
    async fn test_login_and_resolve() {
        let authenticator = authenticator();
        let user = registered(&authenticator);
        let clock = Arc::new(TestClock::at(start()));
        let service = AuthService::new(
            Arc::new(repository_with(Some(user.clone()))),
            Arc::clone(&authenticator),
            Arc::clone(&clock),
        );

        let token = service.login("A@X.com", "secret").await.unwrap();
        assert_eq!(token.expires_at, start() + Duration::minutes(30));

        let resolved = service.resolve(&token.token).await.unwrap();
        assert_eq!(resolved.id, user.id);
        assert_eq!(resolved.email.as_str(), "a@x.com");
    }

    #[tokio::test]
    async fn test_login_rejections_are_indistinguishable() {
        let authenticator = authenticator();
        let user = registered(&authenticator);
        let service = AuthService::new(
            Arc::new(repository_with(Some(user))),
            Arc::clone(&authenticator),
            Arc::new(TestClock::at(start())),
        );

        let wrong_password = service.login("a@x.com", "wrong").await.unwrap_err();
        let unknown_email = service.login("b@x.com", "secret").await.unwrap_err();
        let not_an_email = service.login("nobody", "secret").await.unwrap_err();

        assert_eq!(wrong_password, AuthError::InvalidCredentials);
        assert_eq!(unknown_email, wrong_password);
        assert_eq!(not_an_email, wrong_password);
    }

    #[tokio::test]
    async fn test_resolve_after_expiry() {
        let authenticator = authenticator();
        let user = registered(&authenticator);
        let clock = Arc::new(TestClock::at(start()));
        let service = AuthService::new(
            Arc::new(repository_with(Some(user))),
            Arc::clone(&authenticator),
            Arc::clone(&clock),
        );

        let token = service.login("a@x.com", "secret").await.unwrap();

        clock.advance(Duration::minutes(30) - Duration::seconds(1));
        assert!(service.resolve(&token.token).await.is_ok());

        clock.advance(Duration::seconds(1));
        assert_eq!(service.resolve(&token.token).await, Err(AuthError::Expired));
    }

    #[tokio::test]
    async fn test_resolve_unknown_subject() {
        let authenticator = authenticator();
        let service = AuthService::new(
            Arc::new(repository_with(None)),
            Arc::clone(&authenticator),
            Arc::new(TestClock::at(start())),
        );

        let token = authenticator.issue_token("gone@x.com", start()).unwrap();

        assert_eq!(
            service.resolve(&token.access_token).await,
            Err(AuthError::UnknownSubject("gone@x.com".to_string()))
        );
    }

    #[tokio::test]
    async fn test_resolve_foreign_token() {
        let service = AuthService::new(
            Arc::new(repository_with(None)),
            authenticator(),
            Arc::new(TestClock::at(start())),
        );

        let foreign = Authenticator::new(b"some-other-secret-key-at-least-32-bytes", Duration::minutes(30))
            .issue_token("a@x.com", start())
            .unwrap();

        assert_eq!(
            service.resolve(&foreign.access_token).await,
            Err(AuthError::InvalidSignature)
        );
        assert!(matches!(
            service.resolve("garbage").await,
            Err(AuthError::Malformed(_))
        ));
    }

    #[tokio::test]
    async fn test_login_store_failure_is_internal() {
        let mut repository = MockTestUserRepository::new();
        repository
            .expect_find_by_email()
            .times(1)
            .returning(|_| Err(UserError::DatabaseError("connection reset".to_string())));

        let service = AuthService::new(
            Arc::new(repository),
            authenticator(),
            Arc::new(TestClock::at(start())),
        );

        assert!(matches!(
            service.login("a@x.com", "secret").await,
            Err(AuthError::Internal(_))
        ));
    }
}
