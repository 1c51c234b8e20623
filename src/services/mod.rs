//! Business rules that sit between the HTTP handlers and the repository.
//!
//! Every function takes its collaborators explicitly (`&dyn Repository`, the storage
//! handle, secrets from `AppConfig`) and returns `AppResult`, so handlers stay thin and
//! the rules can be exercised against `InMemoryRepository` without a server.

use std::collections::HashMap;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::Media,
};

pub mod blog;
pub mod calendar;
pub mod items;
pub mod media;
pub mod users;

/// Groups media URLs by the content they belong to, keeping the input order.
pub(crate) fn urls_by_content(media: Vec<Media>) -> HashMap<Uuid, Vec<String>> {
    let mut grouped: HashMap<Uuid, Vec<String>> = HashMap::new();
    for m in media {
        grouped.entry(m.content_id).or_default().push(m.url);
    }
    grouped
}

/// Trims `value` and rejects it when nothing is left.
pub(crate) fn required(value: &str, field: &str) -> AppResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation(format!("{field} cannot be empty")));
    }
    Ok(trimmed.to_string())
}
