use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// Gateway endpoints reachable without a token.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Liveness check, always `{"message":"Healthy"}`.
        .route("/health", get(handlers::health))
        // POST /api/v1/login/access-token
        .route(
            "/api/v1/login/access-token",
            post(handlers::login::login_access_token),
        )
        // POST /api/v1/password-recovery/{email}
        // Issues a recovery token; returned in the body only in the local environment.
        .route(
            "/api/v1/password-recovery/{email}",
            post(handlers::login::recover_password),
        )
        // POST /api/v1/reset-password/
        // Sets a new password when given a valid recovery token.
        .route(
            "/api/v1/reset-password/",
            post(handlers::login::reset_password),
        )
        // POST /api/v1/users/signup
        .route("/api/v1/users/signup", post(handlers::users::signup))
}
