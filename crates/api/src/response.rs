//! API response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Success envelope: `{"result": true, ...body}`.
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    status: StatusCode,
    body: T,
}

#[derive(Serialize)]
struct Envelope<T: Serialize> {
    result: bool,
    #[serde(flatten)]
    body: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// 200 OK.
    pub const fn ok(body: T) -> Self {
        Self {
            status: StatusCode::OK,
            body,
        }
    }

    /// 201 Created.
    pub const fn created(body: T) -> Self {
        Self {
            status: StatusCode::CREATED,
            body,
        }
    }
}

impl ApiResponse<()> {
    /// 200 OK with no fields besides `result`.
    #[must_use]
    pub const fn done() -> Self {
        Self::ok(())
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let envelope = Envelope {
            result: true,
            body: self.body,
        };
        (self.status, Json(envelope)).into_response()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct TweetId {
        tweet_id: i32,
    }

    #[test]
    fn test_envelope_flattens_body() {
        let json = serde_json::to_value(Envelope {
            result: true,
            body: TweetId { tweet_id: 16 },
        })
        .unwrap();

        assert_eq!(json, serde_json::json!({"result": true, "tweet_id": 16}));
    }

    #[test]
    fn test_unit_body_is_bare_result() {
        let json = serde_json::to_value(Envelope {
            result: true,
            body: (),
        })
        .unwrap();

        assert_eq!(json, serde_json::json!({"result": true}));
    }

    #[test]
    fn test_created_status() {
        let response = ApiResponse::created(TweetId { tweet_id: 1 }).into_response();
        assert_eq!(response.status(), StatusCode::CREATED);
    }
}
