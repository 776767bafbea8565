//! Like service.

use warbler_common::{AppError, AppResult};
use warbler_db::repositories::{LikeRepository, PostRepository};

use crate::services::activity::ActivityTracker;

/// Like service.
#[derive(Clone)]
pub struct LikeService {
    like_repo: LikeRepository,
    post_repo: PostRepository,
    activity: ActivityTracker,
}

impl LikeService {
    /// Create a new like service.
    #[must_use]
    pub const fn new(
        like_repo: LikeRepository,
        post_repo: PostRepository,
        activity: ActivityTracker,
    ) -> Self {
        Self {
            like_repo,
            post_repo,
            activity,
        }
    }

    /// A user may like exactly the posts in their feed.
    pub async fn can_like(&self, user_id: i32, post_id: i32) -> AppResult<bool> {
        self.post_repo.is_in_feed(user_id, post_id).await
    }

    /// Record a like. Liking the same post twice is rejected.
    pub async fn add_like(&self, user_id: i32, post_id: i32) -> AppResult<()> {
        match self.like_repo.create(user_id, post_id).await {
            Ok(_) => {}
            Err(AppError::Conflict(_)) => {
                return Err(AppError::Rejected(format!("Post {post_id} is already liked")));
            }
            Err(e) => return Err(e),
        }

        self.activity.touch_logged(user_id).await;
        Ok(())
    }

    /// Withdraw a like.
    pub async fn remove_like(&self, user_id: i32, post_id: i32) -> AppResult<()> {
        if self.like_repo.delete_by_user_and_post(user_id, post_id).await? == 0 {
            return Err(AppError::NotFound(format!("Like on post {post_id}")));
        }

        self.activity.touch_logged(user_id).await;
        Ok(())
    }
}
