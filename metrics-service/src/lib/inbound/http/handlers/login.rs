use axum::extract::State;
use axum::Form;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use crate::inbound::http::router::AppState;

/// OAuth2 password-flow token endpoint.
///
/// Responds with the bare token body rather than the usual envelope so that
/// standard OAuth2 clients can consume it.
pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Json<TokenResponse>, ApiError> {
    let token = state
        .auth_service
        .login(&form.username, &form.password)
        .await?;

    Ok(Json(TokenResponse {
        access_token: token.token,
        token_type: "bearer".to_string(),
    }))
}

/// Form-encoded login body. `username` carries the email address.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginForm {
    username: String,
    password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}
