//! Feed service.
//!
//! A viewer's feed is every post whose author the viewer follows, newest
//! first, with likers and attachment paths folded in. It is rebuilt on each
//! read.

use std::collections::HashMap;

use serde::Serialize;
use warbler_common::AppResult;
use warbler_db::repositories::{LikeRepository, PostRepository};

use crate::services::{activity::ActivityTracker, media::MediaService};

/// Author of a feed item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedAuthor {
    pub id: i32,
    pub name: String,
}

/// A user who liked a feed item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedLike {
    pub user_id: i32,
    pub name: String,
}

/// One post as shown in a feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedItem {
    pub id: i32,
    pub content: String,
    pub author: FeedAuthor,
    /// `None` when the post has no media, never an empty list.
    pub attachments: Option<Vec<String>>,
    pub likes: Vec<FeedLike>,
}

/// Feed service.
#[derive(Clone)]
pub struct FeedService {
    post_repo: PostRepository,
    like_repo: LikeRepository,
    media: MediaService,
    activity: ActivityTracker,
}

impl FeedService {
    /// Create a new feed service.
    #[must_use]
    pub const fn new(
        post_repo: PostRepository,
        like_repo: LikeRepository,
        media: MediaService,
        activity: ActivityTracker,
    ) -> Self {
        Self {
            post_repo,
            like_repo,
            media,
            activity,
        }
    }

    /// Build the feed for `viewer_id`. Data access failures yield an empty feed.
    pub async fn build_feed(&self, viewer_id: i32) -> Vec<FeedItem> {
        match self.try_build_feed(viewer_id).await {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!(error = %e, viewer_id, "Failed to build feed, returning empty");
                vec![]
            }
        }
    }

    async fn try_build_feed(&self, viewer_id: i32) -> AppResult<Vec<FeedItem>> {
        let rows = self.post_repo.find_feed(viewer_id).await?;
        let post_ids: Vec<i32> = rows.iter().map(|r| r.post_id).collect();

        let mut likes: HashMap<i32, Vec<FeedLike>> = HashMap::new();
        for liker in self.like_repo.find_likers_by_posts(&post_ids).await? {
            likes.entry(liker.post_id).or_default().push(FeedLike {
                user_id: liker.user_id,
                name: liker.name,
            });
        }

        let mut attachments = self.media.attachments_for_posts(&post_ids).await?;

        self.activity.touch_logged(viewer_id).await;

        Ok(rows
            .into_iter()
            .map(|row| FeedItem {
                id: row.post_id,
                content: row.content,
                author: FeedAuthor {
                    id: row.author_id,
                    name: row.author_name,
                },
                attachments: attachments.remove(&row.post_id),
                likes: likes.remove(&row.post_id).unwrap_or_default(),
            })
            .collect())
    }
}
