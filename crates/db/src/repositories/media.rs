//! Media attachment repository.

use std::sync::Arc;

use crate::entities::{media, Media};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use warbler_common::{AppError, AppResult};

use super::map_db_err;

/// Media repository for database operations.
#[derive(Clone)]
pub struct MediaRepository {
    db: Arc<DatabaseConnection>,
}

impl MediaRepository {
    /// Create a new media repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Insert an unattached media row.
    pub async fn create(&self, file_path: &str) -> AppResult<media::Model> {
        media::ActiveModel {
            file_path: Set(file_path.to_string()),
            post_id: Set(None),
            ..Default::default()
        }
        .insert(self.db.as_ref())
        .await
        .map_err(map_db_err)
    }

    /// Point every listed media row at `post_id` in one statement.
    pub async fn attach_to_post(&self, media_ids: &[i32], post_id: i32) -> AppResult<u64> {
        let result = Media::update_many()
            .col_expr(media::Column::PostId, Expr::value(post_id))
            .filter(media::Column::Id.is_in(media_ids.iter().copied()))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected)
    }

    /// Media rows attached to any of `post_ids`, in id order.
    pub async fn find_by_posts(&self, post_ids: &[i32]) -> AppResult<Vec<media::Model>> {
        if post_ids.is_empty() {
            return Ok(vec![]);
        }

        Media::find()
            .filter(media::Column::PostId.is_in(post_ids.iter().copied()))
            .order_by_asc(media::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete the media rows of a post and return what was removed.
    ///
    /// One `DELETE … RETURNING`, so a row linked concurrently is either kept or
    /// reported back for file cleanup.
    pub async fn delete_by_post(&self, post_id: i32) -> AppResult<Vec<media::Model>> {
        Media::delete_many()
            .filter(media::Column::PostId.eq(post_id))
            .exec_with_returning(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
