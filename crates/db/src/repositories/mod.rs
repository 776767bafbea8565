//! Repository layer.
//!
//! Each repository wraps a shared connection and returns `AppResult`.

pub mod follow_edge;
pub mod like;
pub mod media;
pub mod post;
pub mod user;

pub use follow_edge::{EdgeLabel, FollowEdgeRepository};
pub use like::{LikeRepository, LikerRow};
pub use media::MediaRepository;
pub use post::{FeedRow, PostRepository};
pub use user::UserRepository;

use sea_orm::{DbErr, SqlErr};
use warbler_common::AppError;

/// Map an insert error, keeping unique violations distinguishable.
pub(crate) fn map_db_err(err: DbErr) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => AppError::Conflict(detail),
        _ => AppError::Database(err.to_string()),
    }
}
