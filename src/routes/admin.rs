use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{delete, get},
};

/// Admin Router Module
///
/// User administration. The router sits behind the same auth layer as the
/// authenticated routes; each handler then refuses callers that are not superusers.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        // GET /api/v1/users/?limit=&skip=
        // POST /api/v1/users/ (may set isActive / isSuperUser)
        .route(
            "/api/v1/users/",
            get(handlers::users::list_users).post(handlers::users::create_user),
        )
        // DELETE /api/v1/users/{id}
        .route("/api/v1/users/{id}", delete(handlers::users::delete_user))
}
