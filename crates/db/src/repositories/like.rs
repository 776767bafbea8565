//! Like repository.

use std::sync::Arc;

use crate::entities::{like, user, Like};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, JoinType,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
};
use warbler_common::{AppError, AppResult};

use super::map_db_err;

/// A like joined with the liking user's name.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult)]
pub struct LikerRow {
    /// Liked post.
    pub post_id: i32,
    /// Liking user.
    pub user_id: i32,
    /// Liking user's name.
    pub name: String,
}

/// Like repository for database operations.
#[derive(Clone)]
pub struct LikeRepository {
    db: Arc<DatabaseConnection>,
}

impl LikeRepository {
    /// Create a new like repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Insert a like. A repeated like surfaces as [`AppError::Conflict`].
    pub async fn create(&self, user_id: i32, post_id: i32) -> AppResult<like::Model> {
        like::ActiveModel {
            user_id: Set(user_id),
            post_id: Set(post_id),
            created_at: Set(chrono::Utc::now().fixed_offset()),
            ..Default::default()
        }
        .insert(self.db.as_ref())
        .await
        .map_err(map_db_err)
    }

    /// Delete the like of `user_id` on `post_id`. Returns the number of rows removed.
    pub async fn delete_by_user_and_post(&self, user_id: i32, post_id: i32) -> AppResult<u64> {
        let result = Like::delete_many()
            .filter(like::Column::UserId.eq(user_id))
            .filter(like::Column::PostId.eq(post_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected)
    }

    /// Likers of every post in `post_ids`, in like order.
    pub async fn find_likers_by_posts(&self, post_ids: &[i32]) -> AppResult<Vec<LikerRow>> {
        if post_ids.is_empty() {
            return Ok(vec![]);
        }

        Like::find()
            .select_only()
            .column(like::Column::PostId)
            .column(like::Column::UserId)
            .column_as(user::Column::Name, "name")
            .join(JoinType::InnerJoin, like::Relation::User.def())
            .filter(like::Column::PostId.is_in(post_ids.iter().copied()))
            .order_by_asc(like::Column::Id)
            .into_model::<LikerRow>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
