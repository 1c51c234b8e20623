use async_trait::async_trait;
use chrono::Utc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{BlogSnapshot, ItemSnapshot, Repository};
use crate::{
    error::{AppError, AppResult},
    models::{Blog, CalendarEvent, Item, Media, Property, UpdateBlogRequest, User},
};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    blogs: Vec<Blog>,
    events: Vec<CalendarEvent>,
    items: Vec<Item>,
    properties: Vec<Property>,
    media: Vec<Media>,
}

/// InMemoryRepository
///
/// `Repository` over plain vectors behind one `RwLock`. It mirrors the Postgres
/// behaviour the services rely on: unique emails, cascading deletes (media included),
/// ordering by `position` / `start_time`, and all-or-nothing batch writes.
#[derive(Default)]
pub struct InMemoryRepository {
    tables: RwLock<Tables>,
    fail_media_writes: AtomicBool,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following `create_media_batch` fail with a database error.
    pub fn fail_media_writes(&self) {
        self.fail_media_writes.store(true, Ordering::SeqCst);
    }

    pub async fn media_count(&self) -> usize {
        self.tables.read().await.media.len()
    }
}

fn duplicate_email() -> AppError {
    AppError::validation("a user with this email already exists")
}

fn media_for(media: &[Media], ids: &[Uuid]) -> Vec<Media> {
    let mut found: Vec<Media> = media
        .iter()
        .filter(|m| ids.contains(&m.content_id))
        .cloned()
        .collect();
    found.sort_by_key(|m| m.created_at);
    found
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn create_user(&self, user: User) -> AppResult<User> {
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(duplicate_email());
        }
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn get_user(&self, id: Uuid) -> AppResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn list_users(&self, limit: i64, skip: i64) -> AppResult<Vec<User>> {
        let tables = self.tables.read().await;
        let mut users = tables.users.clone();
        users.sort_by_key(|u| (u.created_at, u.id));
        Ok(users
            .into_iter()
            .skip(skip.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn save_user(&self, user: &User) -> AppResult<User> {
        let mut tables = self.tables.write().await;
        if tables
            .users
            .iter()
            .any(|u| u.id != user.id && u.email == user.email)
        {
            return Err(duplicate_email());
        }

        let stored = tables
            .users
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or_else(|| AppError::not_found("record not found"))?;
        *stored = User {
            updated_at: Utc::now(),
            ..user.clone()
        };
        Ok(stored.clone())
    }

    async fn delete_user(&self, id: Uuid) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.users.len();
        tables.users.retain(|u| u.id != id);
        if tables.users.len() == before {
            return Ok(false);
        }

        let mut content: Vec<Uuid> = tables
            .blogs
            .iter()
            .filter(|b| b.author_id == id)
            .map(|b| b.id)
            .collect();
        let items: Vec<Uuid> = tables
            .items
            .iter()
            .filter(|i| i.owner_id == id)
            .map(|i| i.id)
            .collect();

        tables.blogs.retain(|b| b.author_id != id);
        tables.events.retain(|e| e.user_id != id);
        tables.items.retain(|i| i.owner_id != id);
        tables.properties.retain(|p| !items.contains(&p.item_id));
        content.extend(items);
        tables.media.retain(|m| !content.contains(&m.content_id));
        Ok(true)
    }

    async fn create_blog(&self, blog: Blog) -> AppResult<Blog> {
        let mut tables = self.tables.write().await;
        tables.blogs.push(blog.clone());
        Ok(blog)
    }

    async fn get_blog(&self, id: Uuid) -> AppResult<Option<Blog>> {
        let tables = self.tables.read().await;
        Ok(tables.blogs.iter().find(|b| b.id == id).cloned())
    }

    async fn get_blogs_with_media(&self, author_id: Uuid) -> AppResult<BlogSnapshot> {
        let tables = self.tables.read().await;
        let mut blogs: Vec<Blog> = tables
            .blogs
            .iter()
            .filter(|b| b.author_id == author_id)
            .cloned()
            .collect();
        blogs.sort_by_key(|b| (b.position, b.created_at));

        let ids: Vec<Uuid> = blogs.iter().map(|b| b.id).collect();
        let media = media_for(&tables.media, &ids);
        Ok(BlogSnapshot { blogs, media })
    }

    async fn update_blog(
        &self,
        id: Uuid,
        author_id: Uuid,
        req: UpdateBlogRequest,
    ) -> AppResult<Option<Blog>> {
        let mut tables = self.tables.write().await;
        let Some(blog) = tables
            .blogs
            .iter_mut()
            .find(|b| b.id == id && b.author_id == author_id)
        else {
            return Ok(None);
        };

        if let Some(title) = req.title {
            blog.title = title;
        }
        if let Some(content) = req.content {
            blog.content = content;
        }
        if let Some(position) = req.position {
            blog.position = position;
        }
        if let Some(status) = req.status {
            blog.status = status;
        }
        blog.updated_at = Utc::now();
        Ok(Some(blog.clone()))
    }

    async fn delete_blog(&self, id: Uuid, author_id: Uuid) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.blogs.len();
        tables
            .blogs
            .retain(|b| !(b.id == id && b.author_id == author_id));
        if tables.blogs.len() == before {
            return Ok(false);
        }
        tables.media.retain(|m| m.content_id != id);
        Ok(true)
    }

    async fn create_event(&self, event: CalendarEvent) -> AppResult<CalendarEvent> {
        let mut tables = self.tables.write().await;
        tables.events.push(event.clone());
        Ok(event)
    }

    async fn get_event(&self, id: Uuid) -> AppResult<Option<CalendarEvent>> {
        let tables = self.tables.read().await;
        Ok(tables.events.iter().find(|e| e.id == id).cloned())
    }

    async fn list_events(&self, user_id: Uuid) -> AppResult<Vec<CalendarEvent>> {
        let tables = self.tables.read().await;
        let mut events: Vec<CalendarEvent> = tables
            .events
            .iter()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect();
        events.sort_by_key(|e| e.start_time);
        Ok(events)
    }

    async fn delete_event(&self, id: Uuid, user_id: Uuid) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.events.len();
        tables
            .events
            .retain(|e| !(e.id == id && e.user_id == user_id));
        Ok(tables.events.len() < before)
    }

    async fn create_item(
        &self,
        item: Item,
        property: Option<Property>,
    ) -> AppResult<(Item, Option<Property>)> {
        let mut tables = self.tables.write().await;
        let property = property.map(|p| Property {
            item_id: item.id,
            ..p
        });
        tables.items.push(item.clone());
        if let Some(p) = &property {
            tables.properties.push(p.clone());
        }
        Ok((item, property))
    }

    async fn get_item(&self, id: Uuid) -> AppResult<Option<Item>> {
        let tables = self.tables.read().await;
        Ok(tables.items.iter().find(|i| i.id == id).cloned())
    }

    async fn get_items_with_details(&self, owner_id: Uuid) -> AppResult<ItemSnapshot> {
        let tables = self.tables.read().await;
        let mut items: Vec<Item> = tables
            .items
            .iter()
            .filter(|i| i.owner_id == owner_id)
            .cloned()
            .collect();
        items.sort_by_key(|i| (i.position, i.created_at));

        let ids: Vec<Uuid> = items.iter().map(|i| i.id).collect();
        let properties = tables
            .properties
            .iter()
            .filter(|p| ids.contains(&p.item_id))
            .cloned()
            .collect();
        let media = media_for(&tables.media, &ids);
        Ok(ItemSnapshot {
            items,
            properties,
            media,
        })
    }

    async fn create_media_batch(&self, media: Vec<Media>) -> AppResult<Vec<Media>> {
        if self.fail_media_writes.load(Ordering::SeqCst) {
            return Err(AppError::Database(sqlx::Error::PoolTimedOut));
        }
        let mut tables = self.tables.write().await;
        tables.media.extend(media.iter().cloned());
        Ok(media)
    }

    async fn list_media_by_content(&self, content_id: Uuid) -> AppResult<Vec<Media>> {
        let tables = self.tables.read().await;
        Ok(media_for(&tables.media, &[content_id]))
    }

    async fn delete_media(&self, id: Uuid) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.media.len();
        tables.media.retain(|m| m.id != id);
        Ok(tables.media.len() < before)
    }
}
