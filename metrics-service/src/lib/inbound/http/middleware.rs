use axum::extract::Request;
use axum::extract::State;
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;

use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::INVALID_TOKEN_MESSAGE;
use crate::inbound::http::router::AppState;
use crate::user::models::User;

/// The user resolved from the bearer token, stored in request extensions.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

/// Middleware that resolves the bearer token to a registered user.
///
/// Every rejection, whatever its cause, produces the same 401 response.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(&req).ok_or_else(|| {
        tracing::warn!(reason = "missing bearer token", "Request rejected");
        ApiError::Unauthorized(INVALID_TOKEN_MESSAGE.to_string())
    })?;

    let user = state.auth_service.resolve(token).await.map_err(|e| {
        tracing::warn!(error = %e, "Request rejected");
        ApiError::from(e)
    })?;

    req.extensions_mut().insert(AuthenticatedUser(user));

    Ok(next.run(req).await)
}

fn extract_bearer_token(req: &Request) -> Option<&str> {
    let value = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let token = token.trim();
    (!token.is_empty()).then_some(token)
}
