use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String,
    pub category: String,

    /// Content-addressed file name of the item's image (`<sha256>.jpg`).
    pub image_name: String,
}

impl ActiveModelBehavior for ActiveModel {}
