//! API middleware.

#![allow(missing_docs)]

use std::sync::Arc;

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use sea_orm::DatabaseConnection;
use warbler_common::StorageService;
use warbler_core::{
    ActivityTracker, FeedService, FollowingService, LikeService, MediaService, PostService,
    UserService,
};
use warbler_db::repositories::{
    FollowEdgeRepository, LikeRepository, MediaRepository, PostRepository, UserRepository,
};

/// Header carrying the caller's API key.
pub const API_KEY_HEADER: &str = "api-key";

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub following_service: FollowingService,
    pub post_service: PostService,
    pub like_service: LikeService,
    pub feed_service: FeedService,
    pub media_service: MediaService,
}

impl AppState {
    /// Wire repositories and services over one connection pool.
    #[must_use]
    pub fn new(db: Arc<DatabaseConnection>, storage: StorageService) -> Self {
        let user_repo = UserRepository::new(Arc::clone(&db));
        let edge_repo = FollowEdgeRepository::new(Arc::clone(&db));
        let post_repo = PostRepository::new(Arc::clone(&db));
        let like_repo = LikeRepository::new(Arc::clone(&db));
        let media_repo = MediaRepository::new(db);

        let activity = ActivityTracker::new(user_repo.clone());
        let media_service = MediaService::new(media_repo, storage);

        Self {
            user_service: UserService::new(user_repo.clone(), edge_repo.clone()),
            following_service: FollowingService::new(edge_repo, user_repo, activity.clone()),
            post_service: PostService::new(
                post_repo.clone(),
                media_service.clone(),
                activity.clone(),
            ),
            like_service: LikeService::new(
                like_repo.clone(),
                post_repo.clone(),
                activity.clone(),
            ),
            feed_service: FeedService::new(
                post_repo,
                like_repo,
                media_service.clone(),
                activity,
            ),
            media_service,
        }
    }
}

/// Authentication middleware.
///
/// Resolves the `api-key` header and stores the user in request extensions.
/// Requests without a valid key pass through; [`crate::extractors::AuthUser`]
/// rejects them where authentication is required.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(api_key) = req
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
    {
        match state.user_service.authenticate(api_key).await {
            Ok(user) => {
                req.extensions_mut().insert(user);
            }
            Err(e) => {
                tracing::debug!(error = %e, "API key did not resolve");
            }
        }
    }

    next.run(req).await
}
