use std::sync::Arc;

use auth::Authenticator;
use metrics_service::authentication::service::AuthService;
use metrics_service::config::Config;
use metrics_service::domain::clock::SystemClock;
use metrics_service::inbound::http::router::create_router;
use metrics_service::inbound::http::router::AppState;
use metrics_service::metric::service::MetricService;
use metrics_service::repositories::PostgresMetricRepository;
use metrics_service::repositories::PostgresTeamRepository;
use metrics_service::repositories::PostgresUserRepository;
use metrics_service::team::service::TeamService;
use metrics_service::user::service::UserService;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "metrics_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "metrics-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load().map_err(|e| {
        tracing::error!(error = %e, "Invalid configuration");
        e
    })?;

    tracing::info!(
        http_port = config.server.http_port,
        token_ttl_minutes = config.jwt.expiration_minutes,
        cors_origins = ?config.cors.allowed_origins,
        "Configuration loaded"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = 5,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let authenticator = Arc::new(Authenticator::new(
        config.jwt.secret.as_bytes(),
        config.jwt.token_ttl()?,
    ));
    let user_repository = Arc::new(PostgresUserRepository::new(pg_pool.clone()));
    let team_repository = Arc::new(PostgresTeamRepository::new(pg_pool.clone()));
    let metric_repository = Arc::new(PostgresMetricRepository::new(pg_pool));

    let state = AppState {
        user_service: Arc::new(UserService::new(
            Arc::clone(&user_repository),
            Arc::clone(&team_repository),
        )),
        team_service: Arc::new(TeamService::new(
            Arc::clone(&team_repository),
            Arc::clone(&user_repository),
        )),
        metric_service: Arc::new(MetricService::new(
            metric_repository,
            Arc::clone(&team_repository),
        )),
        auth_service: Arc::new(AuthService::new(
            user_repository,
            authenticator,
            Arc::new(SystemClock),
        )),
    };

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(state, &config.cors.allowed_origins);
    axum::serve(http_listener, http_application).await?;

    tracing::info!("Server exited successfully");

    Ok(())
}
