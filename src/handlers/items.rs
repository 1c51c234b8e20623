use axum::extract::State;

use crate::{
    AppState,
    auth::AuthUser,
    error::AppResult,
    extract::Json,
    models::{CreateItemRequest, ItemList, ItemWithDetails},
    services::items,
};

/// create_item
///
/// [Authenticated Route] Creates an item owned by the caller, with its optional
/// `properties` block.
#[utoipa::path(
    post,
    path = "/api/v1/items/",
    request_body = CreateItemRequest,
    responses(
        (status = 200, description = "Created", body = ItemWithDetails),
        (status = 400, description = "Empty title or negative price")
    )
)]
pub async fn create_item(
    AuthUser { id, .. }: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<CreateItemRequest>,
) -> AppResult<Json<ItemWithDetails>> {
    Ok(Json(items::create_item(state.repo.as_ref(), id, payload).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/items/",
    responses((status = 200, description = "Items", body = ItemList))
)]
pub async fn list_items(
    AuthUser { id, .. }: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<ItemList>> {
    Ok(Json(items::list_items(state.repo.as_ref(), id).await?))
}
