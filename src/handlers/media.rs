use axum::{
    extract::{Multipart, State, multipart::MultipartRejection},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{
    AppState,
    auth::AuthUser,
    error::AppResult,
    extract::{Json, Path},
    models::{DeleteMediaRequest, Media, Message},
    services::media::{self, UploadFile},
};

/// Multipart field carrying the uploaded files.
const FILES_FIELD: &str = "files";

/// UploadForm
///
/// OpenAPI shape of the upload body. The `files` part may repeat.
#[derive(utoipa::ToSchema)]
#[allow(dead_code)]
pub struct UploadForm {
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    files: String,
}

/// Buffers every `files` part of the request. Other fields are ignored.
async fn read_files(multipart: &mut Multipart) -> AppResult<Vec<UploadFile>> {
    let mut files = Vec::new();
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILES_FIELD) {
            continue;
        }

        let file_name = field.file_name().map(str::to_string);
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let data = field.bytes().await?;

        files.push(UploadFile {
            file_name,
            content_type,
            data,
        });
    }
    Ok(files)
}

/// upload_images
///
/// [Authenticated Route] Stores every `files` part in object storage and attaches it to
/// the blog or item `id`. Nothing is kept when any file fails.
#[utoipa::path(
    post,
    path = "/api/v1/blog/{id}/images",
    params(("id" = Uuid, Path, description = "Blog or item ID")),
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Uploaded; URLs in upload order", body = [String]),
        (status = 400, description = "No files"),
        (status = 403, description = "Not Owner"),
        (status = 404, description = "Unknown content")
    )
)]
pub async fn upload_images(
    AuthUser { id: user_id, .. }: AuthUser,
    State(state): State<AppState>,
    Path(content_id): Path<Uuid>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<(StatusCode, Json<Vec<String>>)> {
    let files = read_files(&mut multipart?).await?;
    let urls = media::upload_media(
        state.repo.as_ref(),
        state.storage.as_ref(),
        user_id,
        content_id,
        files,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(urls)))
}

#[utoipa::path(
    get,
    path = "/api/v1/blog/images/{id}",
    params(("id" = Uuid, Path, description = "Blog or item ID")),
    responses(
        (status = 200, description = "Media rows", body = [Media]),
        (status = 403, description = "Not Owner"),
        (status = 404, description = "Unknown content")
    )
)]
pub async fn list_images(
    AuthUser { id: user_id, .. }: AuthUser,
    State(state): State<AppState>,
    Path(content_id): Path<Uuid>,
) -> AppResult<Json<Vec<Media>>> {
    Ok(Json(
        media::list_media_by_content(state.repo.as_ref(), user_id, content_id).await?,
    ))
}

/// delete_image
///
/// [Authenticated Route] Detaches the image with the given URL. The object stays in
/// storage.
#[utoipa::path(
    delete,
    path = "/api/v1/blog/images/{id}",
    params(("id" = Uuid, Path, description = "Blog or item ID")),
    request_body = DeleteMediaRequest,
    responses(
        (status = 200, description = "Deleted", body = Message),
        (status = 400, description = "Empty imageUrl"),
        (status = 404, description = "Unknown content or URL")
    )
)]
pub async fn delete_image(
    AuthUser { id: user_id, .. }: AuthUser,
    State(state): State<AppState>,
    Path(content_id): Path<Uuid>,
    Json(payload): Json<DeleteMediaRequest>,
) -> AppResult<Json<Message>> {
    media::delete_media_by_url(
        state.repo.as_ref(),
        user_id,
        content_id,
        &payload.image_url,
    )
    .await?;
    Ok(Json(Message::new("Image deleted successfully")))
}
