use axum::extract::State;
use serde::Deserialize;
use uuid::Uuid;

use super::require_superuser;
use crate::{
    AppState,
    auth::AuthUser,
    error::{AppError, AppResult},
    extract::{Json, Path, Query},
    models::{
        CreateUserRequest, Message, UpdatePasswordRequest, UpdateUserRequest, UserList,
        UserPublic,
    },
    services::users,
};

/// Pagination
///
/// Query parameters of `GET /api/v1/users/`.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct Pagination {
    /// Maximum rows returned (default 100).
    pub limit: Option<i64>,
    /// Rows skipped before the page starts (default 0).
    pub skip: Option<i64>,
}

/// signup
///
/// [Public Route] Self-registration. The account is always active and never a superuser,
/// whatever the payload says.
#[utoipa::path(
    post,
    path = "/api/v1/users/signup",
    request_body = CreateUserRequest,
    responses(
        (status = 200, description = "Registered", body = UserPublic),
        (status = 400, description = "Invalid input or email taken")
    )
)]
pub async fn signup(
    State(state): State<AppState>,
    Json(mut payload): Json<CreateUserRequest>,
) -> AppResult<Json<UserPublic>> {
    payload.is_active = Some(true);
    payload.is_superuser = Some(false);
    let user = users::create_user(state.repo.as_ref(), payload, state.config.bcrypt_cost).await?;
    Ok(Json(user))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    responses((status = 200, description = "Current user", body = UserPublic))
)]
pub async fn read_me(
    AuthUser { id, .. }: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<UserPublic>> {
    Ok(Json(users::get_user_by_id(state.repo.as_ref(), id).await?))
}

/// update_me
///
/// [Authenticated Route] Partial profile update of the caller.
#[utoipa::path(
    patch,
    path = "/api/v1/users/me",
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated", body = UserPublic),
        (status = 400, description = "Invalid email or email taken")
    )
)]
pub async fn update_me(
    AuthUser { id, .. }: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<UpdateUserRequest>,
) -> AppResult<Json<UserPublic>> {
    Ok(Json(
        users::update_user_by_id(state.repo.as_ref(), id, payload).await?,
    ))
}

#[utoipa::path(
    patch,
    path = "/api/v1/users/me/password/",
    request_body = UpdatePasswordRequest,
    responses(
        (status = 200, description = "Password updated", body = Message),
        (status = 400, description = "Wrong current password or unchanged password")
    )
)]
pub async fn update_password_me(
    AuthUser { id, .. }: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<UpdatePasswordRequest>,
) -> AppResult<Json<Message>> {
    users::update_current_user_password(
        state.repo.as_ref(),
        id,
        payload,
        state.config.bcrypt_cost,
    )
    .await?;
    Ok(Json(Message::new("Password updated successfully")))
}

/// list_users
///
/// [Admin Route] Paginated listing of every account.
#[utoipa::path(
    get,
    path = "/api/v1/users/",
    params(Pagination),
    responses(
        (status = 200, description = "Users", body = UserList),
        (status = 403, description = "Not a superuser")
    )
)]
pub async fn list_users(
    user: AuthUser,
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
) -> AppResult<Json<UserList>> {
    require_superuser(state.repo.as_ref(), &user).await?;
    Ok(Json(
        users::list_users(state.repo.as_ref(), page.limit, page.skip).await?,
    ))
}

/// create_user
///
/// [Admin Route] Unlike signup, the activity and superuser flags are honoured.
#[utoipa::path(
    post,
    path = "/api/v1/users/",
    request_body = CreateUserRequest,
    responses(
        (status = 200, description = "Created", body = UserPublic),
        (status = 403, description = "Not a superuser")
    )
)]
pub async fn create_user(
    user: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> AppResult<Json<UserPublic>> {
    require_superuser(state.repo.as_ref(), &user).await?;
    let created =
        users::create_user(state.repo.as_ref(), payload, state.config.bcrypt_cost).await?;
    Ok(Json(created))
}

/// delete_user
///
/// [Admin Route] A superuser cannot delete their own account here.
#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "Deleted", body = Message),
        (status = 403, description = "Not a superuser, or deleting oneself"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_user(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Message>> {
    require_superuser(state.repo.as_ref(), &user).await?;
    if id == user.id {
        return Err(AppError::authorization(
            "super users are not allowed to delete themselves",
        ));
    }
    users::delete_user_by_id(state.repo.as_ref(), id).await?;
    Ok(Json(Message::new("User deleted successfully")))
}
