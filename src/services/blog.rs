use chrono::Utc;
use uuid::Uuid;

use super::{required, urls_by_content};
use crate::{
    error::{AppError, AppResult},
    models::{Blog, BlogList, BlogWithImages, CreateBlogRequest, UpdateBlogRequest},
    repository::{BlogSnapshot, Repository},
};

pub async fn create_blog(
    repo: &dyn Repository,
    author_id: Uuid,
    req: CreateBlogRequest,
) -> AppResult<Blog> {
    let title = required(&req.title, "title")?;

    let now = Utc::now();
    let blog = repo
        .create_blog(Blog {
            id: Uuid::new_v4(),
            title,
            content: req.content,
            position: req.position,
            status: req.status,
            author_id,
            created_at: now,
            updated_at: now,
        })
        .await?;

    tracing::info!(blog_id = %blog.id, author_id = %author_id, "blog created");
    Ok(blog)
}

/// assemble_blogs
///
/// Attaches each blog's image URLs from the snapshot. The blog order is kept; a blog
/// without media gets an empty list.
pub fn assemble_blogs(snapshot: BlogSnapshot) -> BlogList {
    let mut urls = urls_by_content(snapshot.media);
    snapshot
        .blogs
        .into_iter()
        .map(|blog| {
            let images = urls.remove(&blog.id).unwrap_or_default();
            BlogWithImages::new(blog, images)
        })
        .collect::<Vec<_>>()
        .into()
}

/// get_all_blogs
///
/// The author's blogs by ascending `position`, each with its image URLs.
pub async fn get_all_blogs(repo: &dyn Repository, author_id: Uuid) -> AppResult<BlogList> {
    let snapshot = repo.get_blogs_with_media(author_id).await?;
    Ok(assemble_blogs(snapshot))
}

/// Loads a blog and checks that `user_id` wrote it: 404 when unknown, 403 otherwise.
pub(crate) async fn owned_blog(repo: &dyn Repository, id: Uuid, user_id: Uuid) -> AppResult<Blog> {
    let blog = repo
        .get_blog(id)
        .await?
        .ok_or_else(|| AppError::not_found("blog not found"))?;
    if blog.author_id != user_id {
        return Err(AppError::authorization("not enough permissions"));
    }
    Ok(blog)
}

pub async fn get_blog_by_id(
    repo: &dyn Repository,
    id: Uuid,
    user_id: Uuid,
) -> AppResult<BlogWithImages> {
    let blog = owned_blog(repo, id, user_id).await?;
    let images = repo
        .list_media_by_content(id)
        .await?
        .into_iter()
        .map(|m| m.url)
        .collect();
    Ok(BlogWithImages::new(blog, images))
}

pub async fn update_blog_by_id(
    repo: &dyn Repository,
    id: Uuid,
    user_id: Uuid,
    mut req: UpdateBlogRequest,
) -> AppResult<Blog> {
    owned_blog(repo, id, user_id).await?;
    if let Some(title) = req.title.take() {
        req.title = Some(required(&title, "title")?);
    }

    // Deleted between the ownership check and the update.
    repo.update_blog(id, user_id, req)
        .await?
        .ok_or_else(|| AppError::not_found("blog not found"))
}

pub async fn delete_blog_by_id(repo: &dyn Repository, id: Uuid, user_id: Uuid) -> AppResult<()> {
    owned_blog(repo, id, user_id).await?;
    if !repo.delete_blog(id, user_id).await? {
        return Err(AppError::not_found("blog not found"));
    }
    tracing::info!(blog_id = %id, "blog deleted");
    Ok(())
}
