//! API endpoints.

#![allow(missing_docs)]

mod medias;
mod tweets;
mod users;

use axum::Router;

use crate::middleware::AppState;

pub use medias::MAX_UPLOAD_BYTES;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/users", users::router())
        .nest("/tweets", tweets::router())
        .nest("/medias", medias::router())
}
