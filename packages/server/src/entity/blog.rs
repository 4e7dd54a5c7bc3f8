use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A blog post. `image` and `image_id` are written together and are either
/// both set or both null.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "blog")]
pub struct Model {
    /// UUIDv7 primary key.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub title: String,

    #[sea_orm(column_type = "Text")]
    pub summary: String,

    #[sea_orm(column_type = "Text")]
    pub content: String,

    #[sea_orm(indexed)]
    pub category: String,

    pub blogger: String,

    /// Public URL of the attached image.
    pub image: Option<String>,

    /// Media store identifier used to delete the image.
    pub image_id: Option<String>,

    #[sea_orm(indexed)]
    pub created_at: DateTimeUtc,

    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
