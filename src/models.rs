use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Core Application Schemas (Mapped to Database) ---

/// User
///
/// The full `users` row, including the bcrypt hash. It has no `Serialize`
/// implementation: every response goes through `UserPublic`.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub full_name: String,
    // Unique (users_email_key).
    pub email: String,
    pub password: String,
    pub is_active: bool,
    pub is_superuser: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// UserPublic
///
/// Response-safe projection of a `User`. Field names follow the admin frontend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct UserPublic {
    #[serde(rename = "ID")]
    pub id: Uuid,
    #[serde(rename = "fullName")]
    pub full_name: String,
    pub email: String,
    #[serde(rename = "isActive")]
    pub is_active: bool,
    #[serde(rename = "isSuperUser")]
    pub is_superuser: bool,
}

impl From<&User> for UserPublic {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            full_name: user.full_name.clone(),
            email: user.email.clone(),
            is_active: user.is_active,
            is_superuser: user.is_superuser,
        }
    }
}

impl From<User> for UserPublic {
    fn from(user: User) -> Self {
        Self::from(&user)
    }
}

/// Blog
///
/// A post from the `blogs` table. `position` orders an author's posts ascending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow)]
#[ts(export)]
pub struct Blog {
    #[serde(rename = "ID")]
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub position: i32,
    // true = published, false = draft.
    pub status: bool,
    pub author_id: Uuid,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// BlogWithImages
///
/// A blog joined with the URLs of every media row that references it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct BlogWithImages {
    #[serde(rename = "ID")]
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub position: i32,
    pub status: bool,
    pub author_id: Uuid,
    pub images: Vec<String>,
}

impl BlogWithImages {
    pub fn new(blog: Blog, images: Vec<String>) -> Self {
        Self {
            id: blog.id,
            title: blog.title,
            content: blog.content,
            position: blog.position,
            status: blog.status,
            author_id: blog.author_id,
            images,
        }
    }
}

/// Media
///
/// A file stored in object storage, attached to a blog or an item through `content_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow)]
#[ts(export)]
pub struct Media {
    #[serde(rename = "ID")]
    pub id: Uuid,
    pub url: String,
    // `type` is reserved in Rust.
    #[serde(rename = "type")]
    pub content_type: String,
    pub content_id: Uuid,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

/// CalendarEvent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow)]
#[ts(export)]
pub struct CalendarEvent {
    #[serde(rename = "ID")]
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    #[ts(type = "string")]
    pub start_time: DateTime<Utc>,
    #[ts(type = "string")]
    pub end_time: DateTime<Utc>,
    pub all_day: bool,
    pub user_id: Uuid,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// Item
///
/// A catalogue entry from the `items` table. Its descriptive attributes live in a
/// separate `Property` row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow)]
#[ts(export)]
pub struct Item {
    #[serde(rename = "ID")]
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub price: f64,
    pub position: i32,
    pub language: Option<String>,
    pub item_url: Option<String>,
    pub category: Option<String>,
    pub status: bool,
    pub owner_id: Uuid,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// Property
///
/// Optional attributes of an `Item`. Every descriptive field may be absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow)]
#[ts(export)]
pub struct Property {
    pub id: Uuid,
    pub height: Option<String>,
    pub width: Option<String>,
    pub weight: Option<String>,
    pub color: Option<String>,
    pub material: Option<String>,
    pub brand: Option<String>,
    pub size: Option<String>,
    pub motif: Option<String>,
    pub style: Option<String>,
    pub item_id: Uuid,
}

/// ItemWithDetails
///
/// An item joined with its properties and image URLs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct ItemWithDetails {
    #[serde(flatten)]
    pub item: Item,
    pub properties: Option<Property>,
    pub images: Vec<String>,
}

/// ListResponse
///
/// The `{data, count}` envelope used by every listing endpoint. `count` always equals
/// `data.len()`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ListResponse<T> {
    pub data: Vec<T>,
    pub count: usize,
}

impl<T> From<Vec<T>> for ListResponse<T> {
    fn from(data: Vec<T>) -> Self {
        let count = data.len();
        Self { data, count }
    }
}

pub type UserList = ListResponse<UserPublic>;
pub type BlogList = ListResponse<BlogWithImages>;
pub type ItemList = ListResponse<ItemWithDetails>;
pub type EventList = ListResponse<CalendarEvent>;

/// --- Request Payloads (Input Schemas) ---

/// LoginRequest
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Token
///
/// Returned by `POST /api/v1/login/access-token`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct Token {
    pub access_token: String,
    pub token_type: String,
}

/// CreateUserRequest
///
/// Payload for signup and for the superuser-only `POST /api/v1/users/`. The two flags are
/// ignored on public signup.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct CreateUserRequest {
    #[serde(rename = "fullName", default)]
    pub full_name: String,
    pub email: String,
    pub password: String,
    #[serde(rename = "isActive", default)]
    #[ts(optional)]
    pub is_active: Option<bool>,
    #[serde(rename = "isSuperUser", default)]
    #[ts(optional)]
    pub is_superuser: Option<bool>,
}

/// UpdateUserRequest
///
/// Partial profile update. Absent or empty fields leave the stored value untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct UpdateUserRequest {
    #[serde(rename = "fullName", default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub email: Option<String>,
}

/// UpdatePasswordRequest
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct UpdatePasswordRequest {
    #[serde(rename = "currentPassword")]
    pub current_password: String,
    #[serde(rename = "newPassword")]
    pub new_password: String,
}

/// ResetPasswordRequest
///
/// Body of `POST /api/v1/reset-password/`. The token comes from the recovery endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct ResetPasswordRequest {
    pub token: String,
    #[serde(rename = "newPassword")]
    pub new_password: String,
}

/// Message
///
/// Plain acknowledgement body. `token` is only filled by password recovery in the
/// local environment.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct Message {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub token: Option<String>,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            token: None,
        }
    }
}

/// CreateBlogRequest
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct CreateBlogRequest {
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub position: i32,
    #[serde(default)]
    pub status: bool,
}

/// UpdateBlogRequest
///
/// Partial update; `None` keeps the stored value (COALESCE in SQL).
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct UpdateBlogRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub position: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub status: Option<bool>,
}

/// CreateEventRequest
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct CreateEventRequest {
    pub title: String,
    #[serde(default)]
    #[ts(optional)]
    pub description: Option<String>,
    #[ts(type = "string")]
    pub start_time: DateTime<Utc>,
    #[ts(type = "string")]
    pub end_time: DateTime<Utc>,
    #[serde(default)]
    pub all_day: bool,
}

/// PropertyInput
///
/// Nested in `CreateItemRequest`; stored as the item's `Property` row.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct PropertyInput {
    #[ts(optional)]
    pub height: Option<String>,
    #[ts(optional)]
    pub width: Option<String>,
    #[ts(optional)]
    pub weight: Option<String>,
    #[ts(optional)]
    pub color: Option<String>,
    #[ts(optional)]
    pub material: Option<String>,
    #[ts(optional)]
    pub brand: Option<String>,
    #[ts(optional)]
    pub size: Option<String>,
    #[ts(optional)]
    pub motif: Option<String>,
    #[ts(optional)]
    pub style: Option<String>,
}

/// CreateItemRequest
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct CreateItemRequest {
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub position: i32,
    #[serde(default)]
    #[ts(optional)]
    pub language: Option<String>,
    #[serde(default)]
    #[ts(optional)]
    pub item_url: Option<String>,
    #[serde(default)]
    #[ts(optional)]
    pub category: Option<String>,
    #[serde(default)]
    pub status: bool,
    #[serde(default)]
    #[ts(optional)]
    pub properties: Option<PropertyInput>,
}

/// DeleteMediaRequest
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct DeleteMediaRequest {
    #[serde(rename = "imageUrl")]
    pub image_url: String,
}
