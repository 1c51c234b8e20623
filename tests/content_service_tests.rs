use admin_panel::{
    AppError, InMemoryRepository,
    models::{
        CreateBlogRequest, CreateEventRequest, CreateItemRequest, Media, PropertyInput,
        UpdateBlogRequest,
    },
    repository::Repository,
    services::{blog, calendar, items, users},
};
use chrono::{Duration, TimeZone, Utc};
use uuid::Uuid;

mod common;
use common::seed_user;

fn blog_request(title: &str, position: i32) -> CreateBlogRequest {
    CreateBlogRequest {
        title: title.to_string(),
        content: "body".to_string(),
        position,
        status: true,
    }
}

fn item_request(title: &str, position: i32) -> CreateItemRequest {
    CreateItemRequest {
        title: title.to_string(),
        content: String::new(),
        price: 9.5,
        position,
        language: Some("en".to_string()),
        item_url: None,
        category: None,
        status: true,
        properties: None,
    }
}

fn media_row(content_id: Uuid, url: &str, minutes: i64) -> Media {
    Media {
        id: Uuid::new_v4(),
        url: url.to_string(),
        content_type: "image/png".to_string(),
        content_id,
        created_at: Utc::now() + Duration::minutes(minutes),
    }
}

// --- Blog ---

#[tokio::test]
async fn test_get_all_blogs_orders_by_position_and_groups_images() {
    let repo = InMemoryRepository::new();
    let author = seed_user(&repo, "author@example.com", false).await;
    let other = seed_user(&repo, "other@example.com", false).await;

    let third = blog::create_blog(&repo, author.id, blog_request("third", 2)).await.unwrap();
    let first = blog::create_blog(&repo, author.id, blog_request("first", 0)).await.unwrap();
    let second = blog::create_blog(&repo, author.id, blog_request("second", 1)).await.unwrap();
    blog::create_blog(&repo, other.id, blog_request("foreign", 0)).await.unwrap();

    repo.create_media_batch(vec![
        media_row(first.id, "https://cdn/a1.png", 0),
        media_row(third.id, "https://cdn/c1.png", 1),
        media_row(first.id, "https://cdn/a2.png", 2),
    ])
    .await
    .unwrap();

    let list = blog::get_all_blogs(&repo, author.id).await.unwrap();
    assert_eq!(list.count, 3);
    assert_eq!(list.count, list.data.len());

    let titles: Vec<&str> = list.data.iter().map(|b| b.title.as_str()).collect();
    assert_eq!(titles, vec!["first", "second", "third"]);

    assert_eq!(list.data[0].images, vec!["https://cdn/a1.png", "https://cdn/a2.png"]);
    assert_eq!(list.data[1].id, second.id);
    assert!(list.data[1].images.is_empty());
    assert_eq!(list.data[2].images, vec!["https://cdn/c1.png"]);
}

#[tokio::test]
async fn test_get_all_blogs_for_author_without_posts() {
    let repo = InMemoryRepository::new();
    let author = seed_user(&repo, "author@example.com", false).await;

    let list = blog::get_all_blogs(&repo, author.id).await.unwrap();
    assert_eq!(list.count, 0);
    assert!(list.data.is_empty());
}

#[tokio::test]
async fn test_create_blog_with_empty_title_persists_nothing() {
    let repo = InMemoryRepository::new();
    let author = seed_user(&repo, "author@example.com", false).await;

    let err = blog::create_blog(&repo, author.id, blog_request("   ", 0))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let list = blog::get_all_blogs(&repo, author.id).await.unwrap();
    assert_eq!(list.count, 0);
}

#[tokio::test]
async fn test_blog_ownership_checks() {
    let repo = InMemoryRepository::new();
    let author = seed_user(&repo, "author@example.com", false).await;
    let intruder = seed_user(&repo, "intruder@example.com", false).await;
    let post = blog::create_blog(&repo, author.id, blog_request("mine", 0)).await.unwrap();

    let err = blog::get_blog_by_id(&repo, post.id, intruder.id).await.unwrap_err();
    assert!(matches!(err, AppError::Authorization(_)));

    let err = blog::delete_blog_by_id(&repo, post.id, intruder.id).await.unwrap_err();
    assert!(matches!(err, AppError::Authorization(_)));

    let err = blog::update_blog_by_id(&repo, post.id, intruder.id, UpdateBlogRequest::default())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Authorization(_)));

    let err = blog::get_blog_by_id(&repo, Uuid::new_v4(), author.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    // Still there for its author.
    assert_eq!(
        blog::get_blog_by_id(&repo, post.id, author.id).await.unwrap().title,
        "mine"
    );
}

#[tokio::test]
async fn test_update_blog_is_partial() {
    let repo = InMemoryRepository::new();
    let author = seed_user(&repo, "author@example.com", false).await;
    let post = blog::create_blog(&repo, author.id, blog_request("draft", 3)).await.unwrap();

    let updated = blog::update_blog_by_id(
        &repo,
        post.id,
        author.id,
        UpdateBlogRequest {
            title: Some("  published  ".to_string()),
            status: Some(false),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(updated.title, "published");
    assert!(!updated.status);
    assert_eq!(updated.position, 3);
    assert_eq!(updated.content, "body");

    let err = blog::update_blog_by_id(
        &repo,
        post.id,
        author.id,
        UpdateBlogRequest {
            title: Some(String::new()),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn test_delete_blog() {
    let repo = InMemoryRepository::new();
    let author = seed_user(&repo, "author@example.com", false).await;
    let post = blog::create_blog(&repo, author.id, blog_request("bye", 0)).await.unwrap();

    blog::delete_blog_by_id(&repo, post.id, author.id).await.unwrap();
    let err = blog::delete_blog_by_id(&repo, post.id, author.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_delete_blog_removes_its_media() {
    let repo = InMemoryRepository::new();
    let author = seed_user(&repo, "author@example.com", false).await;
    let post = blog::create_blog(&repo, author.id, blog_request("bye", 0)).await.unwrap();
    let kept = blog::create_blog(&repo, author.id, blog_request("stays", 1)).await.unwrap();
    repo.create_media_batch(vec![
        media_row(post.id, "https://cdn/gone.png", 0),
        media_row(kept.id, "https://cdn/kept.png", 1),
    ])
    .await
    .unwrap();

    // A rejected delete leaves the media alone.
    let intruder = seed_user(&repo, "intruder@example.com", false).await;
    assert!(blog::delete_blog_by_id(&repo, post.id, intruder.id).await.is_err());
    assert_eq!(repo.media_count().await, 2);

    blog::delete_blog_by_id(&repo, post.id, author.id).await.unwrap();
    assert!(repo.list_media_by_content(post.id).await.unwrap().is_empty());
    assert_eq!(repo.list_media_by_content(kept.id).await.unwrap().len(), 1);
}

// --- Calendar ---

#[tokio::test]
async fn test_events_are_listed_by_start_time() {
    let repo = InMemoryRepository::new();
    let user = seed_user(&repo, "cal@example.com", false).await;
    let base = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();

    for (title, offset) in [("later", 5), ("earliest", 0), ("middle", 2)] {
        calendar::create_event(
            &repo,
            user.id,
            CreateEventRequest {
                title: title.to_string(),
                description: None,
                start_time: base + Duration::hours(offset),
                end_time: base + Duration::hours(offset + 1),
                all_day: false,
            },
        )
        .await
        .unwrap();
    }

    let list = calendar::list_events(&repo, user.id).await.unwrap();
    let titles: Vec<&str> = list.data.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, vec!["earliest", "middle", "later"]);
    assert_eq!(list.count, 3);
}

#[tokio::test]
async fn test_create_event_validation() {
    let repo = InMemoryRepository::new();
    let user = seed_user(&repo, "cal@example.com", false).await;
    let start = Utc::now();

    let err = calendar::create_event(
        &repo,
        user.id,
        CreateEventRequest {
            title: "backwards".to_string(),
            description: None,
            start_time: start,
            end_time: start - Duration::minutes(1),
            all_day: false,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let err = calendar::create_event(
        &repo,
        user.id,
        CreateEventRequest {
            title: String::new(),
            description: None,
            start_time: start,
            end_time: start,
            all_day: true,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn test_delete_event_ownership() {
    let repo = InMemoryRepository::new();
    let owner = seed_user(&repo, "owner@example.com", false).await;
    let other = seed_user(&repo, "other@example.com", false).await;
    let start = Utc::now();

    let event = calendar::create_event(
        &repo,
        owner.id,
        CreateEventRequest {
            title: "standup".to_string(),
            description: Some("daily".to_string()),
            start_time: start,
            end_time: start + Duration::minutes(15),
            all_day: false,
        },
    )
    .await
    .unwrap();

    let err = calendar::delete_event(&repo, event.id, other.id).await.unwrap_err();
    assert!(matches!(err, AppError::Authorization(_)));

    calendar::delete_event(&repo, event.id, owner.id).await.unwrap();
    let err = calendar::delete_event(&repo, event.id, owner.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

// --- Items ---

#[tokio::test]
async fn test_create_item_with_properties() {
    let repo = InMemoryRepository::new();
    let owner = seed_user(&repo, "shop@example.com", false).await;

    let created = items::create_item(
        &repo,
        owner.id,
        CreateItemRequest {
            properties: Some(PropertyInput {
                color: Some("red".to_string()),
                size: Some("XL".to_string()),
                ..Default::default()
            }),
            ..item_request("t-shirt", 0)
        },
    )
    .await
    .unwrap();

    let props = created.properties.expect("properties stored");
    assert_eq!(props.item_id, created.item.id);
    assert_eq!(props.color.as_deref(), Some("red"));
    assert!(props.brand.is_none());
    assert!(created.images.is_empty());
}

#[tokio::test]
async fn test_create_item_validation() {
    let repo = InMemoryRepository::new();
    let owner = seed_user(&repo, "shop@example.com", false).await;

    let err = items::create_item(&repo, owner.id, item_request("", 0))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let err = items::create_item(
        &repo,
        owner.id,
        CreateItemRequest {
            price: -1.0,
            ..item_request("negative", 0)
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    assert_eq!(items::list_items(&repo, owner.id).await.unwrap().count, 0);
}

#[tokio::test]
async fn test_list_items_attaches_properties_and_images() {
    let repo = InMemoryRepository::new();
    let owner = seed_user(&repo, "shop@example.com", false).await;

    let second = items::create_item(&repo, owner.id, item_request("second", 1)).await.unwrap();
    let first = items::create_item(
        &repo,
        owner.id,
        CreateItemRequest {
            properties: Some(PropertyInput {
                material: Some("wool".to_string()),
                ..Default::default()
            }),
            ..item_request("first", 0)
        },
    )
    .await
    .unwrap();

    repo.create_media_batch(vec![media_row(second.item.id, "https://cdn/s.png", 0)])
        .await
        .unwrap();

    let list = items::list_items(&repo, owner.id).await.unwrap();
    assert_eq!(list.count, 2);
    assert_eq!(list.data[0].item.id, first.item.id);
    assert_eq!(
        list.data[0].properties.as_ref().and_then(|p| p.material.as_deref()),
        Some("wool")
    );
    assert!(list.data[0].images.is_empty());
    assert!(list.data[1].properties.is_none());
    assert_eq!(list.data[1].images, vec!["https://cdn/s.png"]);
}

#[tokio::test]
async fn test_user_delete_removes_blog_and_item_media() {
    let repo = InMemoryRepository::new();
    let owner = seed_user(&repo, "owner@example.com", false).await;
    let other = seed_user(&repo, "other@example.com", false).await;

    let post = blog::create_blog(&repo, owner.id, blog_request("post", 0)).await.unwrap();
    let item = items::create_item(&repo, owner.id, item_request("item", 0)).await.unwrap();
    let foreign = blog::create_blog(&repo, other.id, blog_request("foreign", 0)).await.unwrap();
    repo.create_media_batch(vec![
        media_row(post.id, "https://cdn/p.png", 0),
        media_row(item.item.id, "https://cdn/i.png", 1),
        media_row(foreign.id, "https://cdn/f.png", 2),
    ])
    .await
    .unwrap();

    users::delete_user_by_id(&repo, owner.id).await.unwrap();
    assert_eq!(repo.media_count().await, 1);
    assert_eq!(repo.list_media_by_content(foreign.id).await.unwrap().len(), 1);
}
