//! File upload handler.

use axum::extract::{Multipart, State};
use axum::Json;

use talenta_directus::FileAsset;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Proxy a multipart upload to the remote file endpoint and hand back the
/// asset descriptor; its id builds the public fetch URL.
pub async fn upload_document(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<FileAsset>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field
            .file_name()
            .map(|s| s.to_string())
            .ok_or_else(|| ApiError::validation("file name is required"))?;
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(e.to_string()))?
            .to_vec();

        let asset = state
            .documents
            .upload(&file_name, bytes, &content_type)
            .await?;
        return Ok(Json(asset));
    }

    Err(ApiError::validation("file field is required"))
}
