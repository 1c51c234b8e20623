use axum::extract::State;
use uuid::Uuid;

use crate::{
    AppState,
    auth::AuthUser,
    error::AppResult,
    extract::{Json, Path},
    models::{Blog, BlogList, BlogWithImages, CreateBlogRequest, Message, UpdateBlogRequest},
    services::blog,
};

/// create_blog
///
/// [Authenticated Route] The caller becomes the author.
#[utoipa::path(
    post,
    path = "/api/v1/blog/",
    request_body = CreateBlogRequest,
    responses(
        (status = 200, description = "Created", body = Blog),
        (status = 400, description = "Empty title")
    )
)]
pub async fn create_blog(
    AuthUser { id, .. }: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<CreateBlogRequest>,
) -> AppResult<Json<Blog>> {
    Ok(Json(blog::create_blog(state.repo.as_ref(), id, payload).await?))
}

/// get_all_blogs
///
/// [Authenticated Route] The caller's posts in `position` order, each with its images.
#[utoipa::path(
    get,
    path = "/api/v1/blog/",
    responses((status = 200, description = "Blogs", body = BlogList))
)]
pub async fn get_all_blogs(
    AuthUser { id, .. }: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<BlogList>> {
    Ok(Json(blog::get_all_blogs(state.repo.as_ref(), id).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/blog/{id}",
    params(("id" = Uuid, Path, description = "Blog ID")),
    responses(
        (status = 200, description = "Found", body = BlogWithImages),
        (status = 403, description = "Not Owner"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_blog(
    AuthUser { id: user_id, .. }: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<BlogWithImages>> {
    Ok(Json(
        blog::get_blog_by_id(state.repo.as_ref(), id, user_id).await?,
    ))
}

#[utoipa::path(
    put,
    path = "/api/v1/blog/{id}",
    params(("id" = Uuid, Path, description = "Blog ID")),
    request_body = UpdateBlogRequest,
    responses(
        (status = 200, description = "Updated", body = Blog),
        (status = 403, description = "Not Owner"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_blog(
    AuthUser { id: user_id, .. }: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateBlogRequest>,
) -> AppResult<Json<Blog>> {
    Ok(Json(
        blog::update_blog_by_id(state.repo.as_ref(), id, user_id, payload).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/v1/blog/{id}",
    params(("id" = Uuid, Path, description = "Blog ID")),
    responses(
        (status = 200, description = "Deleted", body = Message),
        (status = 403, description = "Not Owner"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_blog(
    AuthUser { id: user_id, .. }: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Message>> {
    blog::delete_blog_by_id(state.repo.as_ref(), id, user_id).await?;
    Ok(Json(Message::new("Blog deleted successfully")))
}
