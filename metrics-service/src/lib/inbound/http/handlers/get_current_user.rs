use axum::http::StatusCode;
use axum::Extension;

use super::ApiSuccess;
use super::UserData;
use crate::inbound::http::middleware::AuthenticatedUser;

pub async fn get_current_user(
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
) -> ApiSuccess<UserData> {
    ApiSuccess::new(StatusCode::OK, (&user).into())
}
