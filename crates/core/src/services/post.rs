//! Post service.

use warbler_common::{AppError, AppResult};
use warbler_db::repositories::PostRepository;

use crate::services::{activity::ActivityTracker, media::MediaService};

/// Outcome of a successful post deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostDeletion {
    /// The post and all of its media are gone.
    Deleted,
    /// The post is gone but some media rows or files may remain.
    DeletedButMediaCleanupFailed,
}

/// Post service for creating and deleting posts.
#[derive(Clone)]
pub struct PostService {
    post_repo: PostRepository,
    media: MediaService,
    activity: ActivityTracker,
}

impl PostService {
    /// Create a new post service.
    #[must_use]
    pub const fn new(
        post_repo: PostRepository,
        media: MediaService,
        activity: ActivityTracker,
    ) -> Self {
        Self {
            post_repo,
            media,
            activity,
        }
    }

    /// Create a post and attach previously uploaded media. Returns the post id.
    pub async fn create_post(
        &self,
        author_id: i32,
        content: &str,
        media_ids: &[i32],
    ) -> AppResult<i32> {
        let post = self.post_repo.create(author_id, content).await?;
        tracing::debug!(post_id = post.id, author_id, "Created post");

        self.activity.touch_logged(author_id).await;
        self.media.link_to_post(media_ids, post.id).await;

        Ok(post.id)
    }

    /// Delete one of `actor_id`'s posts, then its media.
    pub async fn delete_post(&self, actor_id: i32, post_id: i32) -> AppResult<PostDeletion> {
        if self.post_repo.find_owned(post_id, actor_id).await?.is_none() {
            return Err(AppError::PostNotFound(post_id.to_string()));
        }

        // Someone else removed it after the ownership check.
        if self.post_repo.delete(post_id).await? == 0 {
            return Err(AppError::PostNotFound(post_id.to_string()));
        }
        self.activity.touch_logged(actor_id).await;

        match self.media.delete_for_post(post_id).await {
            Ok(()) => Ok(PostDeletion::Deleted),
            Err(e) => {
                tracing::error!(error = %e, post_id, "Post deleted but media cleanup failed");
                Ok(PostDeletion::DeletedButMediaCleanupFailed)
            }
        }
    }
}
