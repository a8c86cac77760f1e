use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::repository::Item;

/// Plain `{"message": ...}` body used by the greeting and item creation.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "item received: controller")]
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A single item as returned by the read endpoints.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ItemResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "controller")]
    pub name: String,
    #[schema(example = "game")]
    pub category: String,
    /// Content-addressed image file name, fetchable via `/images/{name}`.
    #[schema(example = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855.jpg")]
    pub image_name: String,
}

/// Envelope shared by every read endpoint, regardless of result count.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ItemListResponse {
    pub items: Vec<ItemResponse>,
}

impl From<Item> for ItemResponse {
    fn from(item: Item) -> Self {
        Self {
            id: item.id,
            name: item.name,
            category: item.category,
            image_name: item.image_name,
        }
    }
}

impl From<Vec<Item>> for ItemListResponse {
    fn from(items: Vec<Item>) -> Self {
        Self {
            items: items.into_iter().map(ItemResponse::from).collect(),
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Substring to look for in item names. Empty matches everything.
    pub keyword: String,
}
