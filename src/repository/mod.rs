use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        Blog, CalendarEvent, Item, Media, Property, UpdateBlogRequest, User,
    },
};

pub mod memory;
pub mod postgres;

pub use memory::InMemoryRepository;
pub use postgres::PostgresRepository;

/// BlogSnapshot
///
/// An author's blogs (ascending `position`) together with every media row that
/// references one of them, read from a single consistent snapshot.
#[derive(Debug, Clone, Default)]
pub struct BlogSnapshot {
    pub blogs: Vec<Blog>,
    pub media: Vec<Media>,
}

/// ItemSnapshot
///
/// An owner's items (ascending `position`) with their properties and media.
#[derive(Debug, Clone, Default)]
pub struct ItemSnapshot {
    pub items: Vec<Item>,
    pub properties: Vec<Property>,
    pub media: Vec<Media>,
}

/// Repository Trait
///
/// The persistence contract. Handlers and services hold an `Arc<dyn Repository>` and
/// never see the concrete backend.
///
/// Errors: storage failures propagate as `AppError::Database`; uniqueness violations as
/// `AppError::Validation`. "Not there" is expressed as `Ok(None)` / `Ok(false)` so the
/// service layer chooses the status code.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Users ---
    async fn create_user(&self, user: User) -> AppResult<User>;
    async fn get_user(&self, id: Uuid) -> AppResult<Option<User>>;
    async fn get_user_by_email(&self, email: &str) -> AppResult<Option<User>>;
    async fn list_users(&self, limit: i64, skip: i64) -> AppResult<Vec<User>>;
    // Writes every mutable column of `user` (full_name, email, password, flags).
    async fn save_user(&self, user: &User) -> AppResult<User>;
    // true if a row was deleted. Takes the user's content and its media along.
    async fn delete_user(&self, id: Uuid) -> AppResult<bool>;

    // --- Blogs ---
    async fn create_blog(&self, blog: Blog) -> AppResult<Blog>;
    async fn get_blog(&self, id: Uuid) -> AppResult<Option<Blog>>;
    async fn get_blogs_with_media(&self, author_id: Uuid) -> AppResult<BlogSnapshot>;
    // Owner-scoped partial update. `None` if no blog with that id belongs to `author_id`.
    async fn update_blog(
        &self,
        id: Uuid,
        author_id: Uuid,
        req: UpdateBlogRequest,
    ) -> AppResult<Option<Blog>>;
    // Owner-scoped delete; the blog's media rows go in the same transaction.
    async fn delete_blog(&self, id: Uuid, author_id: Uuid) -> AppResult<bool>;

    // --- Calendar ---
    async fn create_event(&self, event: CalendarEvent) -> AppResult<CalendarEvent>;
    async fn get_event(&self, id: Uuid) -> AppResult<Option<CalendarEvent>>;
    async fn list_events(&self, user_id: Uuid) -> AppResult<Vec<CalendarEvent>>;
    async fn delete_event(&self, id: Uuid, user_id: Uuid) -> AppResult<bool>;

    // --- Items ---
    // Item and its optional property are written atomically.
    async fn create_item(
        &self,
        item: Item,
        property: Option<Property>,
    ) -> AppResult<(Item, Option<Property>)>;
    async fn get_item(&self, id: Uuid) -> AppResult<Option<Item>>;
    async fn get_items_with_details(&self, owner_id: Uuid) -> AppResult<ItemSnapshot>;

    // --- Media ---
    // All rows are written atomically, or none are.
    async fn create_media_batch(&self, media: Vec<Media>) -> AppResult<Vec<Media>>;
    async fn list_media_by_content(&self, content_id: Uuid) -> AppResult<Vec<Media>>;
    async fn delete_media(&self, id: Uuid) -> AppResult<bool>;
}

/// RepositoryState
///
/// The shared handle stored in `AppState`.
pub type RepositoryState = Arc<dyn Repository>;
