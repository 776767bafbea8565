//! Post repository.

use std::sync::Arc;

use crate::entities::{follow_edge, post, user, Post};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, JoinType,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Select, Set,
};
use warbler_common::{AppError, AppResult};

use super::map_db_err;

/// A post visible in a viewer's feed, joined with its author.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult)]
pub struct FeedRow {
    /// Post id.
    pub post_id: i32,
    /// Post text.
    pub content: String,
    /// Author's user id.
    pub author_id: i32,
    /// Author's name.
    pub author_name: String,
}

/// Post repository for database operations.
#[derive(Clone)]
pub struct PostRepository {
    db: Arc<DatabaseConnection>,
}

impl PostRepository {
    /// Create a new post repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Insert a post authored by `author_id`.
    pub async fn create(&self, author_id: i32, content: &str) -> AppResult<post::Model> {
        let now = chrono::Utc::now().fixed_offset();
        post::ActiveModel {
            author_id: Set(author_id),
            content: Set(content.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(self.db.as_ref())
        .await
        .map_err(map_db_err)
    }

    /// Find a post by id, only if it belongs to `author_id`.
    pub async fn find_owned(&self, id: i32, author_id: i32) -> AppResult<Option<post::Model>> {
        Post::find_by_id(id)
            .filter(post::Column::AuthorId.eq(author_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a post. Likes go with it through the foreign key cascade.
    pub async fn delete(&self, id: i32) -> AppResult<u64> {
        let result = Post::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected)
    }

    /// Posts by authors `viewer_id` follows, newest first.
    pub async fn find_feed(&self, viewer_id: i32) -> AppResult<Vec<FeedRow>> {
        Self::feed_query(viewer_id)
            .select_only()
            .column_as(post::Column::Id, "post_id")
            .column(post::Column::Content)
            .column(post::Column::AuthorId)
            .column_as(user::Column::Name, "author_name")
            .order_by_desc(post::Column::CreatedAt)
            .order_by_desc(post::Column::Id)
            .into_model::<FeedRow>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Whether `post_id` is among the posts [`Self::find_feed`] would return.
    pub async fn is_in_feed(&self, viewer_id: i32, post_id: i32) -> AppResult<bool> {
        let count = Self::feed_query(viewer_id)
            .filter(post::Column::Id.eq(post_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(count > 0)
    }

    // posts -> users (author) -> follow_edges on followed_id, owned by the viewer
    fn feed_query(viewer_id: i32) -> Select<Post> {
        Post::find()
            .join(JoinType::InnerJoin, post::Relation::Author.def())
            .join(
                JoinType::InnerJoin,
                follow_edge::Relation::Followed.def().rev(),
            )
            .filter(follow_edge::Column::FollowerId.eq(viewer_id))
    }
}
