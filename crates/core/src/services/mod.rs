//! Business logic services.

#![allow(missing_docs)]

pub mod activity;
pub mod feed;
pub mod following;
pub mod like;
pub mod media;
pub mod post;
pub mod user;

pub use activity::ActivityTracker;
pub use feed::{FeedAuthor, FeedItem, FeedLike, FeedService};
pub use following::FollowingService;
pub use like::LikeService;
pub use media::MediaService;
pub use post::{PostDeletion, PostService};
pub use user::{UserProfile, UserService};
