use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{BlogSnapshot, ItemSnapshot, Repository};
use crate::{
    error::AppResult,
    models::{Blog, CalendarEvent, Item, Media, Property, UpdateBlogRequest, User},
};

const USER_COLUMNS: &str =
    "id, full_name, email, password, is_active, is_superuser, created_at, updated_at";
const BLOG_COLUMNS: &str = "id, title, content, position, status, author_id, created_at, updated_at";
const EVENT_COLUMNS: &str =
    "id, title, description, start_time, end_time, all_day, user_id, created_at, updated_at";
const ITEM_COLUMNS: &str = "id, title, content, price, position, language, item_url, category, \
                            status, owner_id, created_at, updated_at";
const PROPERTY_COLUMNS: &str =
    "id, height, width, weight, color, material, brand, size, motif, style, item_id";
const MEDIA_COLUMNS: &str = "id, url, content_type, content_id, created_at";

/// PostgresRepository
///
/// `Repository` backed by PostgreSQL through a shared `PgPool`. Queries are bound at
/// runtime (`query_as::<_, T>`), so building does not need a live database.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Repository for PostgresRepository {
    // --- USERS ---

    async fn create_user(&self, user: User) -> AppResult<User> {
        let sql = format!(
            "INSERT INTO users (id, full_name, email, password, is_active, is_superuser, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {USER_COLUMNS}"
        );
        let created = sqlx::query_as::<_, User>(&sql)
            .bind(user.id)
            .bind(&user.full_name)
            .bind(&user.email)
            .bind(&user.password)
            .bind(user.is_active)
            .bind(user.is_superuser)
            .bind(user.created_at)
            .bind(user.updated_at)
            .fetch_one(&self.pool)
            .await?;
        Ok(created)
    }

    async fn get_user(&self, id: Uuid) -> AppResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn get_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?)
    }

    /// list_users
    ///
    /// Oldest accounts first so `skip` pages are stable.
    async fn list_users(&self, limit: i64, skip: i64) -> AppResult<Vec<User>> {
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at ASC, id ASC LIMIT $1 OFFSET $2"
        );
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(limit)
            .bind(skip)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn save_user(&self, user: &User) -> AppResult<User> {
        let sql = format!(
            "UPDATE users
             SET full_name = $2, email = $3, password = $4,
                 is_active = $5, is_superuser = $6, updated_at = NOW()
             WHERE id = $1
             RETURNING {USER_COLUMNS}"
        );
        // fetch_one: a vanished row surfaces as RowNotFound -> NotFound.
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(user.id)
            .bind(&user.full_name)
            .bind(&user.email)
            .bind(&user.password)
            .bind(user.is_active)
            .bind(user.is_superuser)
            .fetch_one(&self.pool)
            .await?)
    }

    /// delete_user
    ///
    /// Blogs, events, and items go with the user (ON DELETE CASCADE).
    async fn delete_user(&self, id: Uuid) -> AppResult<bool> {
        let mut tx = self.pool.begin().await?;

        // media.content_id has no FK, so the user's blog and item media go first; the
        // content rows themselves follow through ON DELETE CASCADE.
        sqlx::query(
            "DELETE FROM media WHERE content_id IN (
                SELECT id FROM blogs WHERE author_id = $1
                UNION ALL
                SELECT id FROM items WHERE owner_id = $1
             )",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        let res = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if res.rows_affected() == 0 {
            return Ok(false);
        }

        tx.commit().await?;
        Ok(true)
    }

    // --- BLOGS ---

    async fn create_blog(&self, blog: Blog) -> AppResult<Blog> {
        let sql = format!(
            "INSERT INTO blogs (id, title, content, position, status, author_id, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {BLOG_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Blog>(&sql)
            .bind(blog.id)
            .bind(&blog.title)
            .bind(&blog.content)
            .bind(blog.position)
            .bind(blog.status)
            .bind(blog.author_id)
            .bind(blog.created_at)
            .bind(blog.updated_at)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn get_blog(&self, id: Uuid) -> AppResult<Option<Blog>> {
        let sql = format!("SELECT {BLOG_COLUMNS} FROM blogs WHERE id = $1");
        Ok(sqlx::query_as::<_, Blog>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    /// get_blogs_with_media
    ///
    /// Two queries in one read-only REPEATABLE READ transaction: the author's blogs,
    /// then every media row for that id set (`= ANY($1)`), never one query per blog.
    async fn get_blogs_with_media(&self, author_id: Uuid) -> AppResult<BlogSnapshot> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await?;

        let sql = format!(
            "SELECT {BLOG_COLUMNS} FROM blogs WHERE author_id = $1 ORDER BY position ASC, created_at ASC"
        );
        let blogs = sqlx::query_as::<_, Blog>(&sql)
            .bind(author_id)
            .fetch_all(&mut *tx)
            .await?;

        let ids: Vec<Uuid> = blogs.iter().map(|b| b.id).collect();
        let media = if ids.is_empty() {
            Vec::new()
        } else {
            let sql = format!(
                "SELECT {MEDIA_COLUMNS} FROM media WHERE content_id = ANY($1) ORDER BY created_at ASC"
            );
            sqlx::query_as::<_, Media>(&sql)
                .bind(ids.as_slice())
                .fetch_all(&mut *tx)
                .await?
        };

        tx.commit().await?;
        Ok(BlogSnapshot { blogs, media })
    }

    /// update_blog
    ///
    /// COALESCE keeps every column whose field in `req` is `None`.
    async fn update_blog(
        &self,
        id: Uuid,
        author_id: Uuid,
        req: UpdateBlogRequest,
    ) -> AppResult<Option<Blog>> {
        let sql = format!(
            "UPDATE blogs
             SET title = COALESCE($3, title),
                 content = COALESCE($4, content),
                 position = COALESCE($5, position),
                 status = COALESCE($6, status),
                 updated_at = NOW()
             WHERE id = $1 AND author_id = $2
             RETURNING {BLOG_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Blog>(&sql)
            .bind(id)
            .bind(author_id)
            .bind(req.title)
            .bind(req.content)
            .bind(req.position)
            .bind(req.status)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn delete_blog(&self, id: Uuid, author_id: Uuid) -> AppResult<bool> {
        let mut tx = self.pool.begin().await?;

        let res = sqlx::query("DELETE FROM blogs WHERE id = $1 AND author_id = $2")
            .bind(id)
            .bind(author_id)
            .execute(&mut *tx)
            .await?;
        if res.rows_affected() == 0 {
            return Ok(false);
        }

        sqlx::query("DELETE FROM media WHERE content_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(true)
    }

    // --- CALENDAR ---

    async fn create_event(&self, event: CalendarEvent) -> AppResult<CalendarEvent> {
        let sql = format!(
            "INSERT INTO calendar_events
                (id, title, description, start_time, end_time, all_day, user_id, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {EVENT_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, CalendarEvent>(&sql)
            .bind(event.id)
            .bind(&event.title)
            .bind(&event.description)
            .bind(event.start_time)
            .bind(event.end_time)
            .bind(event.all_day)
            .bind(event.user_id)
            .bind(event.created_at)
            .bind(event.updated_at)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn get_event(&self, id: Uuid) -> AppResult<Option<CalendarEvent>> {
        let sql = format!("SELECT {EVENT_COLUMNS} FROM calendar_events WHERE id = $1");
        Ok(sqlx::query_as::<_, CalendarEvent>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn list_events(&self, user_id: Uuid) -> AppResult<Vec<CalendarEvent>> {
        let sql = format!(
            "SELECT {EVENT_COLUMNS} FROM calendar_events WHERE user_id = $1 ORDER BY start_time ASC"
        );
        Ok(sqlx::query_as::<_, CalendarEvent>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn delete_event(&self, id: Uuid, user_id: Uuid) -> AppResult<bool> {
        let res = sqlx::query("DELETE FROM calendar_events WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    // --- ITEMS ---

    async fn create_item(
        &self,
        item: Item,
        property: Option<Property>,
    ) -> AppResult<(Item, Option<Property>)> {
        let mut tx = self.pool.begin().await?;

        let sql = format!(
            "INSERT INTO items
                (id, title, content, price, position, language, item_url, category, status, owner_id, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
             RETURNING {ITEM_COLUMNS}"
        );
        let created = sqlx::query_as::<_, Item>(&sql)
            .bind(item.id)
            .bind(&item.title)
            .bind(&item.content)
            .bind(item.price)
            .bind(item.position)
            .bind(&item.language)
            .bind(&item.item_url)
            .bind(&item.category)
            .bind(item.status)
            .bind(item.owner_id)
            .bind(item.created_at)
            .bind(item.updated_at)
            .fetch_one(&mut *tx)
            .await?;

        let property = match property {
            Some(p) => {
                let sql = format!(
                    "INSERT INTO properties
                        (id, height, width, weight, color, material, brand, size, motif, style, item_id)
                     VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
                     RETURNING {PROPERTY_COLUMNS}"
                );
                let row = sqlx::query_as::<_, Property>(&sql)
                    .bind(p.id)
                    .bind(&p.height)
                    .bind(&p.width)
                    .bind(&p.weight)
                    .bind(&p.color)
                    .bind(&p.material)
                    .bind(&p.brand)
                    .bind(&p.size)
                    .bind(&p.motif)
                    .bind(&p.style)
                    .bind(created.id)
                    .fetch_one(&mut *tx)
                    .await?;
                Some(row)
            }
            None => None,
        };

        tx.commit().await?;
        Ok((created, property))
    }

    async fn get_item(&self, id: Uuid) -> AppResult<Option<Item>> {
        let sql = format!("SELECT {ITEM_COLUMNS} FROM items WHERE id = $1");
        Ok(sqlx::query_as::<_, Item>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    /// get_items_with_details
    ///
    /// Same snapshot pattern as `get_blogs_with_media`, with a third query for the
    /// properties of the fetched items.
    async fn get_items_with_details(&self, owner_id: Uuid) -> AppResult<ItemSnapshot> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await?;

        let sql = format!(
            "SELECT {ITEM_COLUMNS} FROM items WHERE owner_id = $1 ORDER BY position ASC, created_at ASC"
        );
        let items = sqlx::query_as::<_, Item>(&sql)
            .bind(owner_id)
            .fetch_all(&mut *tx)
            .await?;

        let ids: Vec<Uuid> = items.iter().map(|i| i.id).collect();
        if ids.is_empty() {
            tx.commit().await?;
            return Ok(ItemSnapshot::default());
        }

        let sql = format!("SELECT {PROPERTY_COLUMNS} FROM properties WHERE item_id = ANY($1)");
        let properties = sqlx::query_as::<_, Property>(&sql)
            .bind(ids.as_slice())
            .fetch_all(&mut *tx)
            .await?;

        let sql = format!(
            "SELECT {MEDIA_COLUMNS} FROM media WHERE content_id = ANY($1) ORDER BY created_at ASC"
        );
        let media = sqlx::query_as::<_, Media>(&sql)
            .bind(ids.as_slice())
            .fetch_all(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(ItemSnapshot {
            items,
            properties,
            media,
        })
    }

    // --- MEDIA ---

    async fn create_media_batch(&self, media: Vec<Media>) -> AppResult<Vec<Media>> {
        let mut tx = self.pool.begin().await?;
        let sql = format!(
            "INSERT INTO media (id, url, content_type, content_id, created_at)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {MEDIA_COLUMNS}"
        );

        let mut created = Vec::with_capacity(media.len());
        for m in media {
            let row = sqlx::query_as::<_, Media>(&sql)
                .bind(m.id)
                .bind(&m.url)
                .bind(&m.content_type)
                .bind(m.content_id)
                .bind(m.created_at)
                .fetch_one(&mut *tx)
                .await?;
            created.push(row);
        }

        tx.commit().await?;
        Ok(created)
    }

    async fn list_media_by_content(&self, content_id: Uuid) -> AppResult<Vec<Media>> {
        let sql = format!(
            "SELECT {MEDIA_COLUMNS} FROM media WHERE content_id = $1 ORDER BY created_at ASC"
        );
        Ok(sqlx::query_as::<_, Media>(&sql)
            .bind(content_id)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn delete_media(&self, id: Uuid) -> AppResult<bool> {
        let res = sqlx::query("DELETE FROM media WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}
