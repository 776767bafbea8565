//! Media attachment entity.
//!
//! `post_id` is a plain back-reference without a foreign key: attachments are
//! uploaded before the post that uses them exists.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "media")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// File name inside the media directory
    pub file_path: String,

    #[sea_orm(nullable)]
    pub post_id: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
