use axum::extract::State;

use crate::{
    AppState,
    config::Env,
    error::AppResult,
    extract::{Json, Path},
    models::{LoginRequest, Message, ResetPasswordRequest, Token},
    services::users,
};

/// login_access_token
///
/// [Public Route] Exchanges email and password for a bearer token.
#[utoipa::path(
    post,
    path = "/api/v1/login/access-token",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Access token", body = Token),
        (status = 401, description = "Incorrect email or password")
    )
)]
pub async fn login_access_token(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<Token>> {
    let token = users::login(
        state.repo.as_ref(),
        &payload.email,
        &payload.password,
        &state.config.jwt_secret,
        state.config.access_token_ttl,
        state.config.bcrypt_cost,
    )
    .await?;
    Ok(Json(token))
}

/// recover_password
///
/// [Public Route] Issues a password-reset token for a registered email. Outside
/// `Env::Local` the token is never part of the response.
#[utoipa::path(
    post,
    path = "/api/v1/password-recovery/{email}",
    params(("email" = String, Path, description = "Account email")),
    responses(
        (status = 200, description = "Recovery token issued", body = Message),
        (status = 404, description = "Unknown email")
    )
)]
pub async fn recover_password(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> AppResult<Json<Message>> {
    let token = users::request_password_recovery(
        state.repo.as_ref(),
        &email,
        &state.config.jwt_secret,
        state.config.recovery_token_ttl,
    )
    .await?;

    let mut message = Message::new("Password recovery token issued");
    if state.config.env == Env::Local {
        message.token = Some(token);
    }
    Ok(Json(message))
}

#[utoipa::path(
    post,
    path = "/api/v1/reset-password/",
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password updated", body = Message),
        (status = 400, description = "Invalid token or password")
    )
)]
pub async fn reset_password(
    State(state): State<AppState>,
    Json(payload): Json<ResetPasswordRequest>,
) -> AppResult<Json<Message>> {
    users::reset_password_with_token(
        state.repo.as_ref(),
        &payload.token,
        &payload.new_password,
        &state.config.jwt_secret,
        state.config.bcrypt_cost,
    )
    .await?;
    Ok(Json(Message::new("Password updated successfully")))
}
