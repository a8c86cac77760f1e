use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{Item, ItemRepository, NewItem, RepositoryError};

/// Process-local repository, mainly for tests and throwaway runs.
///
/// Substring search is case-sensitive.
#[derive(Default)]
pub struct MemoryItemRepository {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    items: Vec<Item>,
    last_id: i32,
}

impl MemoryItemRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ItemRepository for MemoryItemRepository {
    async fn insert(&self, item: NewItem) -> Result<i32, RepositoryError> {
        let mut inner = self.inner.write().await;
        inner.last_id += 1;
        let id = inner.last_id;
        inner.items.push(Item {
            id,
            name: item.name,
            category: item.category,
            image_name: item.image_name,
        });
        Ok(id)
    }

    async fn list_all(&self) -> Result<Vec<Item>, RepositoryError> {
        Ok(self.inner.read().await.items.clone())
    }

    async fn get_by_id(&self, id: i32) -> Result<Vec<Item>, RepositoryError> {
        let inner = self.inner.read().await;
        Ok(inner.items.iter().filter(|i| i.id == id).cloned().collect())
    }

    async fn search(&self, keyword: &str) -> Result<Vec<Item>, RepositoryError> {
        let inner = self.inner.read().await;
        Ok(inner
            .items
            .iter()
            .filter(|i| i.name.contains(keyword))
            .cloned()
            .collect())
    }
}
