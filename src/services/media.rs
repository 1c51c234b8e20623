use bytes::Bytes;
use chrono::Utc;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::Media,
    repository::Repository,
    storage::StorageService,
};

/// UploadFile
///
/// One `files` part of a multipart upload, fully buffered.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: Option<String>,
    pub content_type: String,
    pub data: Bytes,
}

/// Extension for the stored key: the file name's when it looks sane, else one derived
/// from the content type.
fn file_extension(file_name: Option<&str>, content_type: &str) -> String {
    if let Some((_, ext)) = file_name.and_then(|name| name.rsplit_once('.')) {
        if !ext.is_empty() && ext.len() <= 10 && ext.chars().all(|c| c.is_ascii_alphanumeric()) {
            return ext.to_ascii_lowercase();
        }
    }

    match content_type {
        "image/jpeg" => "jpg",
        "image/png" => "png",
        "image/gif" => "gif",
        "image/webp" => "webp",
        "image/svg+xml" => "svg",
        "video/mp4" => "mp4",
        "application/pdf" => "pdf",
        _ => "bin",
    }
    .to_string()
}

pub fn object_key(content_id: Uuid, file: &UploadFile) -> String {
    format!(
        "uploads/{}/{}.{}",
        content_id,
        Uuid::new_v4(),
        file_extension(file.file_name.as_deref(), &file.content_type)
    )
}

/// ensure_content_owner
///
/// Media hangs off a blog or an item. Resolves which one `content_id` names and checks
/// the caller owns it: 404 when it is neither, 403 when it belongs to someone else.
pub async fn ensure_content_owner(
    repo: &dyn Repository,
    content_id: Uuid,
    user_id: Uuid,
) -> AppResult<()> {
    let owner = match repo.get_blog(content_id).await? {
        Some(blog) => blog.author_id,
        None => match repo.get_item(content_id).await? {
            Some(item) => item.owner_id,
            None => return Err(AppError::not_found("content not found")),
        },
    };

    if owner != user_id {
        return Err(AppError::authorization("not enough permissions"));
    }
    Ok(())
}

async fn remove_uploaded(storage: &dyn StorageService, keys: &[String]) {
    for key in keys {
        if let Err(e) = storage.delete_object(key).await {
            // Leaves an orphaned object; nothing references it.
            tracing::warn!(key = %key, error = %e, "compensating delete failed");
        }
    }
}

/// upload_media
///
/// Uploads `files` one after another under `uploads/<content_id>/`, then records every
/// object in a single batch. If an upload or the batch write fails, the objects stored
/// so far are deleted again and the error is returned. Returns the URLs in upload order.
pub async fn upload_media(
    repo: &dyn Repository,
    storage: &dyn StorageService,
    user_id: Uuid,
    content_id: Uuid,
    files: Vec<UploadFile>,
) -> AppResult<Vec<String>> {
    if files.is_empty() {
        return Err(AppError::validation("no files provided"));
    }
    ensure_content_owner(repo, content_id, user_id).await?;

    let mut keys = Vec::with_capacity(files.len());
    let mut rows = Vec::with_capacity(files.len());
    for file in files {
        let key = object_key(content_id, &file);
        let uploaded = storage
            .upload_object(&key, &file.content_type, file.data)
            .await;
        match uploaded {
            Ok(url) => {
                keys.push(key);
                rows.push(Media {
                    id: Uuid::new_v4(),
                    url,
                    content_type: file.content_type,
                    content_id,
                    created_at: Utc::now(),
                });
            }
            Err(e) => {
                tracing::error!(content_id = %content_id, key = %key, error = %e, "upload failed");
                remove_uploaded(storage, &keys).await;
                return Err(e.into());
            }
        }
    }

    let created = match repo.create_media_batch(rows).await {
        Ok(created) => created,
        Err(e) => {
            remove_uploaded(storage, &keys).await;
            return Err(e);
        }
    };

    tracing::info!(content_id = %content_id, files = created.len(), "media uploaded");
    Ok(created.into_iter().map(|m| m.url).collect())
}

pub async fn list_media_by_content(
    repo: &dyn Repository,
    user_id: Uuid,
    content_id: Uuid,
) -> AppResult<Vec<Media>> {
    ensure_content_owner(repo, content_id, user_id).await?;
    repo.list_media_by_content(content_id).await
}

/// delete_media_by_url
///
/// Removes the media row of `content_id` whose URL equals `url`. The stored object is
/// left in place.
pub async fn delete_media_by_url(
    repo: &dyn Repository,
    user_id: Uuid,
    content_id: Uuid,
    url: &str,
) -> AppResult<()> {
    let url = url.trim();
    if url.is_empty() {
        return Err(AppError::validation("imageUrl cannot be empty"));
    }
    ensure_content_owner(repo, content_id, user_id).await?;

    let media = repo
        .list_media_by_content(content_id)
        .await?
        .into_iter()
        .find(|m| m.url == url)
        .ok_or_else(|| AppError::not_found("image not found"))?;

    if !repo.delete_media(media.id).await? {
        return Err(AppError::not_found("image not found"));
    }
    tracing::info!(media_id = %media.id, content_id = %content_id, "media deleted");
    Ok(())
}
