use async_trait::async_trait;
use sea_orm::prelude::Expr;
use sea_orm::sea_query::LikeExpr;
use sea_orm::*;

use super::{Item, ItemRepository, NewItem, RepositoryError, escape_like};
use crate::entity::item;

/// Item repository over a SeaORM connection (SQLite or PostgreSQL).
///
/// Every statement is built by SeaORM with bound parameters, so the same
/// code serves both backends.
pub struct SqlItemRepository {
    db: DatabaseConnection,
}

impl SqlItemRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ItemRepository for SqlItemRepository {
    async fn insert(&self, new_item: NewItem) -> Result<i32, RepositoryError> {
        let model = item::ActiveModel {
            name: Set(new_item.name),
            category: Set(new_item.category),
            image_name: Set(new_item.image_name),
            ..Default::default()
        };

        let result = item::Entity::insert(model).exec(&self.db).await?;
        Ok(result.last_insert_id)
    }

    async fn list_all(&self) -> Result<Vec<Item>, RepositoryError> {
        let rows = item::Entity::find()
            .order_by_asc(item::Column::Id)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(Item::from).collect())
    }

    async fn get_by_id(&self, id: i32) -> Result<Vec<Item>, RepositoryError> {
        let rows = item::Entity::find()
            .filter(item::Column::Id.eq(id))
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(Item::from).collect())
    }

    async fn search(&self, keyword: &str) -> Result<Vec<Item>, RepositoryError> {
        let pattern = format!("%{}%", escape_like(keyword));
        let rows = item::Entity::find()
            .filter(Expr::col(item::Column::Name).like(LikeExpr::new(pattern).escape('\\')))
            .order_by_asc(item::Column::Id)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(Item::from).collect())
    }
}
