//! HTTP handlers. Each one extracts its inputs, calls into `services`, and returns
//! `Result<_, AppError>` so failures render through `AppError::into_response`.

use crate::{
    auth::AuthUser,
    error::{AppError, AppResult},
    extract::Json,
    models::Message,
    repository::Repository,
    services::users::get_current_user_is_superuser,
};

pub mod blog;
pub mod calendar;
pub mod items;
pub mod login;
pub mod media;
pub mod users;

/// health
///
/// [Public Route] Liveness check for load balancers.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up", body = Message))
)]
pub async fn health() -> Json<Message> {
    Json(Message::new("Healthy"))
}

/// Rejects callers whose stored account is not a superuser.
pub(crate) async fn require_superuser(repo: &dyn Repository, user: &AuthUser) -> AppResult<()> {
    if !get_current_user_is_superuser(repo, user.id).await? {
        return Err(AppError::authorization(
            "the user doesn't have enough privileges",
        ));
    }
    Ok(())
}
