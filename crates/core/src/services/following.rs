//! Following service.

use warbler_common::{AppError, AppResult};
use warbler_db::repositories::{FollowEdgeRepository, UserRepository};

use crate::services::activity::ActivityTracker;

/// Following service for follow graph mutations.
#[derive(Clone)]
pub struct FollowingService {
    edge_repo: FollowEdgeRepository,
    user_repo: UserRepository,
    activity: ActivityTracker,
}

impl FollowingService {
    /// Create a new following service.
    #[must_use]
    pub const fn new(
        edge_repo: FollowEdgeRepository,
        user_repo: UserRepository,
        activity: ActivityTracker,
    ) -> Self {
        Self {
            edge_repo,
            user_repo,
            activity,
        }
    }

    /// Make the owner of `api_key` follow `target_id`.
    ///
    /// The edge is written as `follower_id = target`, `followed_id = actor`,
    /// the same orientation the feed join and the seeded graph use.
    pub async fn follow(&self, api_key: &str, target_id: i32) -> AppResult<()> {
        let actor = self
            .user_repo
            .find_by_api_key(api_key)
            .await?
            .ok_or_else(|| AppError::Rejected("Invalid api key".to_string()))?;

        if actor.id == target_id {
            return Err(AppError::Rejected("Cannot follow yourself".to_string()));
        }

        if self.user_repo.find_by_id(target_id).await?.is_none() {
            return Err(AppError::Rejected(format!("User {target_id} does not exist")));
        }

        if self
            .edge_repo
            .find_by_pair(target_id, actor.id)
            .await?
            .is_some()
        {
            return Err(AppError::Rejected("Already following".to_string()));
        }

        match self.edge_repo.create(target_id, actor.id).await {
            Ok(edge) => {
                tracing::debug!(
                    edge_id = edge.id,
                    follower_id = edge.follower_id,
                    followed_id = edge.followed_id,
                    "Created follow edge"
                );
            }
            // Lost a race with an identical insert.
            Err(AppError::Conflict(_)) => {
                return Err(AppError::Rejected("Already following".to_string()));
            }
            Err(e) => return Err(e),
        }

        self.activity.touch_logged(actor.id).await;
        Ok(())
    }

    /// Remove the edge [`Self::follow`] created from the owner of `api_key` to `target_id`.
    pub async fn unfollow(&self, api_key: &str, target_id: i32) -> AppResult<()> {
        let actor = self
            .user_repo
            .find_by_api_key(api_key)
            .await?
            .ok_or_else(|| AppError::Rejected("Invalid api key".to_string()))?;

        if self.edge_repo.delete_by_pair(target_id, actor.id).await? == 0 {
            return Err(AppError::Rejected("Not following this user".to_string()));
        }

        self.activity.touch_logged(actor.id).await;
        Ok(())
    }
}
