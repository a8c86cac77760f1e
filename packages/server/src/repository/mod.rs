//! Item persistence behind a backend-agnostic trait.
//!
//! The backend is picked from the database URL scheme: `sqlite://` and
//! `postgres://` go through [`SqlItemRepository`], `memory://` uses
//! [`MemoryItemRepository`].

mod memory;
mod sql;

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::DbErr;
use tracing::info;

use crate::config::DatabaseConfig;
use crate::database;
use crate::entity::item;

pub use memory::MemoryItemRepository;
pub use sql::SqlItemRepository;

/// URL scheme selecting the in-process backend.
pub const MEMORY_URL_SCHEME: &str = "memory://";

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] DbErr),

    #[error("unsupported database url '{0}'")]
    UnsupportedUrl(String),

    #[error("failed to prepare database location: {0}")]
    Io(#[from] std::io::Error),
}

/// A persisted marketplace item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub id: i32,
    pub name: String,
    pub category: String,
    pub image_name: String,
}

/// Fields supplied when creating an item; `id` is assigned by the store.
#[derive(Debug, Clone)]
pub struct NewItem {
    pub name: String,
    pub category: String,
    pub image_name: String,
}

impl From<item::Model> for Item {
    fn from(model: item::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            category: model.category,
            image_name: model.image_name,
        }
    }
}

#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// Insert a new item and return its assigned id.
    async fn insert(&self, item: NewItem) -> Result<i32, RepositoryError>;

    /// All items in id order.
    async fn list_all(&self) -> Result<Vec<Item>, RepositoryError>;

    /// The item with `id`, as a zero- or one-element list.
    async fn get_by_id(&self, id: i32) -> Result<Vec<Item>, RepositoryError>;

    /// Items whose name contains `keyword` as a literal substring.
    ///
    /// An empty keyword matches every item.
    async fn search(&self, keyword: &str) -> Result<Vec<Item>, RepositoryError>;
}

/// Open the repository described by `config`, running migrations for SQL
/// backends before returning.
pub async fn connect(config: &DatabaseConfig) -> Result<Arc<dyn ItemRepository>, RepositoryError> {
    let url = config.url.trim();

    if url.starts_with(MEMORY_URL_SCHEME) {
        info!("Using in-memory item repository");
        return Ok(Arc::new(MemoryItemRepository::new()));
    }

    if let Some(rest) = url.strip_prefix("sqlite://") {
        prepare_sqlite_dir(rest).await?;
    } else if !(url.starts_with("postgres://") || url.starts_with("postgresql://")) {
        return Err(RepositoryError::UnsupportedUrl(url.to_string()));
    }

    let db = database::init_db(url, config.max_connections).await?;
    info!(backend = ?db.get_database_backend(), "Connected item repository");
    Ok(Arc::new(SqlItemRepository::new(db)))
}

/// SQLite won't create missing parent directories for its database file.
async fn prepare_sqlite_dir(location: &str) -> Result<(), std::io::Error> {
    let path = location.split('?').next().unwrap_or_default();
    if path.is_empty() || path.starts_with(':') {
        return Ok(());
    }

    if let Some(parent) = std::path::Path::new(path).parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent).await?;
    }
    Ok(())
}

/// Escape LIKE wildcard characters in a search string.
pub fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
