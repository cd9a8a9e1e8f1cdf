use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::HeaderValue;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::patch;
use axum::routing::post;
use axum::Router;
use tower_http::cors::AllowHeaders;
use tower_http::cors::AllowMethods;
use tower_http::cors::AllowOrigin;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::create_metric::create_metric;
use super::handlers::create_team::create_team;
use super::handlers::create_user::create_user;
use super::handlers::get_current_user::get_current_user;
use super::handlers::list_metrics::list_metrics;
use super::handlers::list_team_metrics::list_team_metrics;
use super::handlers::list_teams::list_teams;
use super::handlers::login::login;
use super::handlers::root::root;
use super::handlers::update_team::update_team;
use super::handlers::upload_csv::upload_csv;
use super::middleware::authenticate as auth_middleware;
use crate::authentication::ports::AuthServicePort;
use crate::metric::ports::MetricServicePort;
use crate::team::ports::TeamServicePort;
use crate::user::ports::UserServicePort;

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserServicePort>,
    pub team_service: Arc<dyn TeamServicePort>,
    pub metric_service: Arc<dyn MetricServicePort>,
    pub auth_service: Arc<dyn AuthServicePort>,
}

pub fn create_router(state: AppState, allowed_origins: &[String]) -> Router {
    let public_routes = Router::new()
        .route("/", get(root))
        .route("/token", post(login))
        .route("/users", post(create_user));

    let protected_routes = Router::new()
        .route("/users/me", get(get_current_user))
        .route("/teams", get(list_teams).post(create_team))
        .route("/teams/:team_id", patch(update_team))
        .route("/teams/:team_id/metrics", get(list_team_metrics))
        .route("/metrics", get(list_metrics).post(create_metric))
        .route("/upload-csv", post(upload_csv))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(trace_layer)
        .layer(cors_layer(allowed_origins))
        .with_state(state)
}

/// Browser access policy. With no configured origins any origin is allowed,
/// without credentials.
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
}
