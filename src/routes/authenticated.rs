use crate::{AppState, handlers};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{delete, get, patch, post},
};

/// Authenticated Router Module
///
/// Every handler here receives an `AuthUser` resolved by the auth layer and acts on the
/// caller's own records. Foreign records answer 403, unknown ones 404.
///
/// `max_upload_bytes` bounds the body of the multipart upload route.
pub fn authenticated_routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::<AppState>::new()
        // --- Current user ---
        .route(
            "/api/v1/users/me",
            get(handlers::users::read_me).patch(handlers::users::update_me),
        )
        .route(
            "/api/v1/users/me/password/",
            patch(handlers::users::update_password_me),
        )
        // --- Calendar ---
        .route(
            "/api/v1/calendar/events",
            get(handlers::calendar::list_events).post(handlers::calendar::create_event),
        )
        .route(
            "/api/v1/calendar/events/{id}",
            delete(handlers::calendar::delete_event),
        )
        // --- Blog ---
        .route(
            "/api/v1/blog/",
            get(handlers::blog::get_all_blogs).post(handlers::blog::create_blog),
        )
        .route(
            "/api/v1/blog/{id}",
            get(handlers::blog::get_blog)
                .put(handlers::blog::update_blog)
                .delete(handlers::blog::delete_blog),
        )
        // --- Items ---
        .route(
            "/api/v1/items/",
            get(handlers::items::list_items).post(handlers::items::create_item),
        )
        // --- Media ---
        // POST /api/v1/blog/{id}/images
        // `id` is a blog or an item. Multipart field `files`, repeated per file.
        .route(
            "/api/v1/blog/{id}/images",
            post(handlers::media::upload_images).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .route(
            "/api/v1/blog/images/{id}",
            get(handlers::media::list_images).delete(handlers::media::delete_image),
        )
}
