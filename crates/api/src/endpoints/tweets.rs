//! Tweet endpoints: posting, the feed, deletion and likes.

use axum::{
    extract::{Path, State},
    routing::{delete, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use warbler_common::{AppError, AppResult};
use warbler_core::{FeedItem, PostDeletion};

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Create tweet request.
#[derive(Debug, Deserialize)]
pub struct CreateTweetRequest {
    pub tweet_data: String,
    #[serde(default)]
    pub tweet_media_ids: Vec<i32>,
}

#[derive(Serialize)]
pub struct CreateTweetResponse {
    pub tweet_id: i32,
}

#[derive(Serialize)]
pub struct FeedResponse {
    pub tweets: Vec<FeedItem>,
}

async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CreateTweetRequest>,
) -> AppResult<ApiResponse<CreateTweetResponse>> {
    let tweet_id = state
        .post_service
        .create_post(user.id, &req.tweet_data, &req.tweet_media_ids)
        .await?;

    Ok(ApiResponse::created(CreateTweetResponse { tweet_id }))
}

/// The caller's feed.
async fn feed(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<FeedResponse>> {
    let tweets = state.feed_service.build_feed(user.id).await;
    Ok(ApiResponse::ok(FeedResponse { tweets }))
}

async fn remove(
    AuthUser(user): AuthUser,
    Path(id): Path<i32>,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<()>> {
    match state.post_service.delete_post(user.id, id).await? {
        PostDeletion::Deleted => Ok(ApiResponse::done()),
        PostDeletion::DeletedButMediaCleanupFailed => Err(AppError::PartialFailure(format!(
            "Tweet {id} was deleted but its media could not be removed"
        ))),
    }
}

async fn like(
    AuthUser(user): AuthUser,
    Path(id): Path<i32>,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<()>> {
    if !state.like_service.can_like(user.id, id).await? {
        return Err(AppError::PostNotFound(id.to_string()));
    }

    state.like_service.add_like(user.id, id).await?;
    Ok(ApiResponse::created(()))
}

async fn unlike(
    AuthUser(user): AuthUser,
    Path(id): Path<i32>,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<()>> {
    if !state.like_service.can_like(user.id, id).await? {
        return Err(AppError::PostNotFound(id.to_string()));
    }

    state.like_service.remove_like(user.id, id).await?;
    Ok(ApiResponse::done())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create).get(feed))
        .route("/{id}", delete(remove))
        .route("/{id}/likes", post(like).delete(unlike))
}
