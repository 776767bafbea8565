//! Media upload endpoint.

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    routing::post,
    Router,
};
use serde::Serialize;
use warbler_common::{AppError, AppResult};

use crate::{middleware::AppState, response::ApiResponse};

/// Largest accepted upload, multipart framing included.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Serialize)]
pub struct UploadResponse {
    pub media_id: i32,
}

/// Store the multipart `file` field.
async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<ApiResponse<UploadResponse>> {
    let mut file_data: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() == Some("file") {
            file_data = Some(
                field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?
                    .to_vec(),
            );
        }
    }

    let data = file_data.ok_or_else(|| AppError::BadRequest("No file provided".to_string()))?;
    let media_id = state.media_service.upload(&data).await?;

    Ok(ApiResponse::created(UploadResponse { media_id }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(upload))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
}
