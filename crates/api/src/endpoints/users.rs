//! User endpoints.

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use warbler_common::AppResult;
use warbler_core::UserProfile;

use crate::{extractors::ApiKey, middleware::AppState, response::ApiResponse};

#[derive(Serialize)]
pub struct UserResponse {
    pub user: UserProfile,
}

/// Profile of the caller.
async fn me(
    ApiKey(api_key): ApiKey,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<UserResponse>> {
    let user = state.user_service.find_by_token(&api_key).await?;
    Ok(ApiResponse::ok(UserResponse { user }))
}

/// Profile of any user.
async fn show(
    Path(id): Path<i32>,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<UserResponse>> {
    let user = state.user_service.find_by_id(id).await?;
    Ok(ApiResponse::ok(UserResponse { user }))
}

async fn follow(
    ApiKey(api_key): ApiKey,
    Path(id): Path<i32>,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<()>> {
    state.following_service.follow(&api_key, id).await?;
    Ok(ApiResponse::created(()))
}

async fn unfollow(
    ApiKey(api_key): ApiKey,
    Path(id): Path<i32>,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<()>> {
    state.following_service.unfollow(&api_key, id).await?;
    Ok(ApiResponse::done())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/me", get(me))
        .route("/{id}", get(show))
        .route("/{id}/follow", post(follow).delete(unfollow))
}
