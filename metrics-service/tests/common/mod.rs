use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use auth::Authenticator;
use chrono::DateTime;
use chrono::Duration;
use chrono::TimeZone;
use chrono::Utc;
use metrics_service::authentication::service::AuthService;
use metrics_service::domain::clock::Clock;
use metrics_service::inbound::http::router::create_router;
use metrics_service::inbound::http::router::AppState;
use metrics_service::metric::errors::MetricError;
use metrics_service::metric::models::Metric;
use metrics_service::metric::ports::MetricRepository;
use metrics_service::metric::service::MetricService;
use metrics_service::team::errors::TeamError;
use metrics_service::team::models::Team;
use metrics_service::team::models::TeamId;
use metrics_service::team::ports::TeamRepository;
use metrics_service::team::service::TeamService;
use metrics_service::user::errors::UserError;
use metrics_service::user::models::EmailAddress;
use metrics_service::user::models::User;
use metrics_service::user::models::UserId;
use metrics_service::user::ports::UserRepository;
use metrics_service::user::service::UserService;
use serde_json::json;
use serde_json::Value;

pub const TEST_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";
pub const TOKEN_TTL_MINUTES: i64 = 30;

/// Test application that spawns a real server over in-memory storage.
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub clock: Arc<ManualClock>,
    pub metrics: Arc<InMemoryMetricRepository>,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        Self::spawn_with_origins(&[]).await
    }

    /// Spawn the application with a restricted CORS origin list.
    pub async fn spawn_with_origins(allowed_origins: &[String]) -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let users = Arc::new(InMemoryUserRepository::default());
        let teams = Arc::new(InMemoryTeamRepository::default());
        let metrics = Arc::new(InMemoryMetricRepository::default());
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap(),
        ));

        let authenticator = Arc::new(Authenticator::new(
            TEST_SECRET,
            Duration::minutes(TOKEN_TTL_MINUTES),
        ));

        let state = AppState {
            user_service: Arc::new(UserService::new(Arc::clone(&users), Arc::clone(&teams))),
            team_service: Arc::new(TeamService::new(Arc::clone(&teams), Arc::clone(&users))),
            metric_service: Arc::new(MetricService::new(
                Arc::clone(&metrics),
                Arc::clone(&teams),
            )),
            auth_service: Arc::new(AuthService::new(users, authenticator, Arc::clone(&clock))),
        };

        let router = create_router(state, allowed_origins);

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            api_client: reqwest::Client::new(),
            clock,
            metrics,
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Helper to make POST request with Bearer token
    pub fn post_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.post(path).bearer_auth(token)
    }

    /// Helper to make PATCH request with Bearer token
    pub fn patch_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .patch(format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Register a user and return the response body.
    pub async fn register(&self, email: &str, password: &str, role: &str) -> Value {
        let response = self
            .post("/users")
            .json(&json!({
                "email": email,
                "password": password,
                "full_name": "Test User",
                "role": role,
            }))
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(response.status(), reqwest::StatusCode::CREATED);
        response.json().await.expect("Failed to parse response")
    }

    /// Exchange credentials at the token endpoint.
    pub async fn login(&self, username: &str, password: &str) -> reqwest::Response {
        self.post("/token")
            .form(&[("username", username), ("password", password)])
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Register a leader and return a valid access token for them.
    pub async fn leader_token(&self) -> String {
        self.register("lead@example.com", "pass_word!", "leader")
            .await;

        let body: Value = self
            .login("lead@example.com", "pass_word!")
            .await
            .json()
            .await
            .expect("Failed to parse response");

        body["access_token"]
            .as_str()
            .expect("Missing access_token")
            .to_string()
    }

    /// Create a team and return its id.
    pub async fn create_team(&self, token: &str, name: &str) -> String {
        let body: Value = self
            .post_authenticated("/teams", token)
            .json(&json!({ "name": name }))
            .send()
            .await
            .expect("Failed to execute request")
            .json()
            .await
            .expect("Failed to parse response");

        body["data"]["id"]
            .as_str()
            .expect("Missing team id")
            .to_string()
    }
}

/// Clock the tests move by hand.
pub struct ManualClock(Mutex<DateTime<Utc>>);

impl ManualClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.0.lock().unwrap();
        *now = *now + by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap()
    }
}

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<HashMap<UserId, User>>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> Result<User, UserError> {
        let mut users = self.users.lock().unwrap();
        if users.values().any(|u| u.email == user.email) {
            return Err(UserError::EmailAlreadyExists(user.email.to_string()));
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        Ok(self.users.lock().unwrap().get(id).cloned())
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| &u.email == email)
            .cloned())
    }
}

#[derive(Default)]
pub struct InMemoryTeamRepository {
    teams: Mutex<HashMap<TeamId, Team>>,
}

#[async_trait]
impl TeamRepository for InMemoryTeamRepository {
    async fn create(&self, team: Team) -> Result<Team, TeamError> {
        let mut teams = self.teams.lock().unwrap();
        if teams.values().any(|t| t.name == team.name) {
            return Err(TeamError::NameAlreadyExists(team.name.to_string()));
        }
        teams.insert(team.id, team.clone());
        Ok(team)
    }

    async fn find_by_id(&self, id: &TeamId) -> Result<Option<Team>, TeamError> {
        Ok(self.teams.lock().unwrap().get(id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<Team>, TeamError> {
        let mut teams: Vec<Team> = self.teams.lock().unwrap().values().cloned().collect();
        teams.sort_by(|a, b| a.name.as_str().cmp(b.name.as_str()));
        Ok(teams)
    }

    async fn update(&self, team: Team) -> Result<Team, TeamError> {
        let mut teams = self.teams.lock().unwrap();
        if teams
            .values()
            .any(|t| t.id != team.id && t.name == team.name)
        {
            return Err(TeamError::NameAlreadyExists(team.name.to_string()));
        }
        match teams.get_mut(&team.id) {
            Some(stored) => {
                *stored = team.clone();
                Ok(team)
            }
            None => Err(TeamError::NotFound(team.id)),
        }
    }
}

#[derive(Default)]
pub struct InMemoryMetricRepository {
    metrics: Mutex<Vec<Metric>>,
}

impl InMemoryMetricRepository {
    pub fn count(&self) -> usize {
        self.metrics.lock().unwrap().len()
    }
}

#[async_trait]
impl MetricRepository for InMemoryMetricRepository {
    async fn create(&self, metric: Metric) -> Result<Metric, MetricError> {
        self.metrics.lock().unwrap().push(metric.clone());
        Ok(metric)
    }

    async fn list_all(&self) -> Result<Vec<Metric>, MetricError> {
        let mut metrics = self.metrics.lock().unwrap().clone();
        metrics.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at));
        Ok(metrics)
    }

    async fn list_by_team(&self, team_id: &TeamId) -> Result<Vec<Metric>, MetricError> {
        let mut metrics: Vec<Metric> = self
            .metrics
            .lock()
            .unwrap()
            .iter()
            .filter(|m| &m.team_id == team_id)
            .cloned()
            .collect();
        metrics.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at));
        Ok(metrics)
    }

    async fn create_many(&self, metrics: Vec<Metric>) -> Result<usize, MetricError> {
        let count = metrics.len();
        self.metrics.lock().unwrap().extend(metrics);
        Ok(count)
    }
}
