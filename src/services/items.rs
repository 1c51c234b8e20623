use chrono::Utc;
use std::collections::HashMap;
use uuid::Uuid;

use super::{required, urls_by_content};
use crate::{
    error::{AppError, AppResult},
    models::{CreateItemRequest, Item, ItemList, ItemWithDetails, Property},
    repository::{ItemSnapshot, Repository},
};

/// create_item
///
/// Stores the item and, when `properties` is supplied, its property row in the same
/// write.
pub async fn create_item(
    repo: &dyn Repository,
    owner_id: Uuid,
    req: CreateItemRequest,
) -> AppResult<ItemWithDetails> {
    let title = required(&req.title, "title")?;
    if !req.price.is_finite() || req.price < 0.0 {
        return Err(AppError::validation("price must be a non-negative number"));
    }

    let now = Utc::now();
    let item = Item {
        id: Uuid::new_v4(),
        title,
        content: req.content,
        price: req.price,
        position: req.position,
        language: req.language,
        item_url: req.item_url,
        category: req.category,
        status: req.status,
        owner_id,
        created_at: now,
        updated_at: now,
    };
    let property = req.properties.map(|p| Property {
        id: Uuid::new_v4(),
        height: p.height,
        width: p.width,
        weight: p.weight,
        color: p.color,
        material: p.material,
        brand: p.brand,
        size: p.size,
        motif: p.motif,
        style: p.style,
        item_id: item.id,
    });

    let (item, properties) = repo.create_item(item, property).await?;
    tracing::info!(item_id = %item.id, owner_id = %owner_id, "item created");
    Ok(ItemWithDetails {
        item,
        properties,
        images: Vec::new(),
    })
}

pub fn assemble_items(snapshot: ItemSnapshot) -> ItemList {
    let mut urls = urls_by_content(snapshot.media);
    let mut properties: HashMap<Uuid, Property> = snapshot
        .properties
        .into_iter()
        .map(|p| (p.item_id, p))
        .collect();

    snapshot
        .items
        .into_iter()
        .map(|item| ItemWithDetails {
            properties: properties.remove(&item.id),
            images: urls.remove(&item.id).unwrap_or_default(),
            item,
        })
        .collect::<Vec<_>>()
        .into()
}

/// list_items
///
/// The owner's items by ascending `position` with their properties and image URLs.
pub async fn list_items(repo: &dyn Repository, owner_id: Uuid) -> AppResult<ItemList> {
    let snapshot = repo.get_items_with_details(owner_id).await?;
    Ok(assemble_items(snapshot))
}
