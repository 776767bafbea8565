//! HTTP API layer for warbler.
//!
//! - **Endpoints**: users, tweets, likes and media uploads under `/api`
//! - **Extractors**: authenticated user and raw `api-key` header
//! - **Middleware**: `api-key` authentication and shared [`middleware::AppState`]
//!
//! Built on Axum 0.8. Core outcomes become responses through
//! [`warbler_common::AppError`]'s `IntoResponse`.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
pub use middleware::{auth_middleware, AppState, API_KEY_HEADER};
