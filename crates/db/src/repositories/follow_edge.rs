//! Follow edge repository.

use std::sync::Arc;

use crate::entities::{follow_edge, user, FollowEdge};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, JoinType,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
};
use serde::Serialize;
use warbler_common::{AppError, AppResult};

use super::map_db_err;

/// An edge as it appears in a profile: the edge id and the name of the user
/// on the other end.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult, Serialize)]
pub struct EdgeLabel {
    /// Edge id (not the related user's id).
    pub id: i32,
    /// Name of the related user.
    pub name: String,
}

/// Follow edge repository for database operations.
#[derive(Clone)]
pub struct FollowEdgeRepository {
    db: Arc<DatabaseConnection>,
}

impl FollowEdgeRepository {
    /// Create a new follow edge repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find an edge by follower and followed user.
    pub async fn find_by_pair(
        &self,
        follower_id: i32,
        followed_id: i32,
    ) -> AppResult<Option<follow_edge::Model>> {
        FollowEdge::find()
            .filter(follow_edge::Column::FollowerId.eq(follower_id))
            .filter(follow_edge::Column::FollowedId.eq(followed_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert an edge. A duplicate pair surfaces as [`AppError::Conflict`].
    pub async fn create(
        &self,
        follower_id: i32,
        followed_id: i32,
    ) -> AppResult<follow_edge::Model> {
        follow_edge::ActiveModel {
            follower_id: Set(follower_id),
            followed_id: Set(followed_id),
            ..Default::default()
        }
        .insert(self.db.as_ref())
        .await
        .map_err(map_db_err)
    }

    /// Delete an edge by pair. Returns the number of rows removed.
    pub async fn delete_by_pair(&self, follower_id: i32, followed_id: i32) -> AppResult<u64> {
        let result = FollowEdge::delete_many()
            .filter(follow_edge::Column::FollowerId.eq(follower_id))
            .filter(follow_edge::Column::FollowedId.eq(followed_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected)
    }

    /// Edges pointing at `user_id`, labelled with the follower's name.
    pub async fn followers_of(&self, user_id: i32) -> AppResult<Vec<EdgeLabel>> {
        FollowEdge::find()
            .select_only()
            .column(follow_edge::Column::Id)
            .column_as(user::Column::Name, "name")
            .join(JoinType::InnerJoin, follow_edge::Relation::Follower.def())
            .filter(follow_edge::Column::FollowedId.eq(user_id))
            .order_by_asc(follow_edge::Column::Id)
            .into_model::<EdgeLabel>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Edges owned by `user_id`, labelled with the followed user's name.
    pub async fn following_of(&self, user_id: i32) -> AppResult<Vec<EdgeLabel>> {
        FollowEdge::find()
            .select_only()
            .column(follow_edge::Column::Id)
            .column_as(user::Column::Name, "name")
            .join(JoinType::InnerJoin, follow_edge::Relation::Followed.def())
            .filter(follow_edge::Column::FollowerId.eq(user_id))
            .order_by_asc(follow_edge::Column::Id)
            .into_model::<EdgeLabel>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
