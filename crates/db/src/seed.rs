//! Demo data for local runs.
//!
//! Three users `User_name_1..3` (keys `key1..key3`) plus `test_User` (key
//! `test`). Every higher-numbered user follows every lower-numbered one, and
//! each numbered user has five posts.

use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait, Set};
use tracing::info;
use warbler_common::{AppError, AppResult};

use crate::entities::{follow_edge, post, user, FollowEdge, Post, User};

const DEMO_USERS: i32 = 3;
const POSTS_PER_USER: i32 = 5;

fn demo_users() -> Vec<user::ActiveModel> {
    let now = chrono::Utc::now().fixed_offset();

    let mut users: Vec<_> = (1..=DEMO_USERS)
        .map(|n| user::ActiveModel {
            name: Set(format!("User_name_{n}")),
            email: Set(format!("user{n}email@email.com")),
            api_key: Set(Some(format!("key{n}"))),
            last_activity: Set(now),
            ..Default::default()
        })
        .collect();

    users.push(user::ActiveModel {
        name: Set("test_User".to_string()),
        email: Set("user_test_email@email.com".to_string()),
        api_key: Set(Some("test".to_string())),
        last_activity: Set(now),
        ..Default::default()
    });

    users
}

/// `(follower_id, followed_id)` pairs in insertion order.
fn demo_edges() -> Vec<(i32, i32)> {
    (1..=DEMO_USERS)
        .flat_map(|followed| {
            ((followed + 1)..=DEMO_USERS).map(move |follower| (follower, followed))
        })
        .collect()
}

fn demo_posts() -> Vec<post::ActiveModel> {
    let now = chrono::Utc::now().fixed_offset();

    (1..=DEMO_USERS)
        .flat_map(|author| {
            (1..=POSTS_PER_USER).map(move |n| post::ActiveModel {
                author_id: Set(author),
                content: Set(format!("test tweet number {n} from user {author}")),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            })
        })
        .collect()
}

/// Seed demo data into an empty database.
///
/// Returns `false` without writing anything when users already exist.
pub async fn seed_demo_data(db: &DatabaseConnection) -> AppResult<bool> {
    let existing = User::find()
        .count(db)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    if existing > 0 {
        info!("Users already present, skipping demo seed");
        return Ok(false);
    }

    User::insert_many(demo_users())
        .exec(db)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    // One edge per statement so ids follow insertion order.
    for (follower_id, followed_id) in demo_edges() {
        FollowEdge::insert(follow_edge::ActiveModel {
            follower_id: Set(follower_id),
            followed_id: Set(followed_id),
            ..Default::default()
        })
        .exec(db)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    }

    Post::insert_many(demo_posts())
        .exec(db)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    info!(users = DEMO_USERS + 1, "Seeded demo data");
    Ok(true)
}
