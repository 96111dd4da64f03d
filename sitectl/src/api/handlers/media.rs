use crate::AppState;
use crate::api::models::media::UploadResponse;
use crate::db::models::media::MediaCreateDBRequest;
use crate::errors::{Error, Result};
use crate::types::{DEFAULT_MEDIA_CONTENT_TYPE, abbrev_uuid, media_url, parse_media_id};
use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::{HeaderValue, header},
    response::{IntoResponse, Response},
};
use tracing::instrument;

/// Name of the multipart field carrying the uploaded file
const UPLOAD_FIELD: &str = "file";

#[utoipa::path(
    post,
    path = "/api/upload",
    tag = "media",
    summary = "Upload media",
    description = "Store an uploaded file as a new media blob. Every upload creates a new blob, even for identical content.",
    request_body(
        content_type = "multipart/form-data",
        description = "Multipart form with a single `file` field"
    ),
    responses(
        (status = 200, description = "Media stored", body = UploadResponse),
        (status = 400, description = "Missing or unreadable file field"),
        (status = 413, description = "Payload too large"),
        (status = 500, description = "Internal server error")
    )
)]
#[instrument(skip_all, err)]
pub async fn upload_media(State(state): State<AppState>, mut multipart: Multipart) -> Result<Json<UploadResponse>> {
    let max_upload_bytes = state.config.media.max_upload_bytes;
    let mut upload: Option<MediaCreateDBRequest> = None;

    while let Some(mut field) = multipart.next_field().await.map_err(|e| Error::BadRequest {
        message: format!("Failed to parse multipart data: {}", e),
    })? {
        if field.name() != Some(UPLOAD_FIELD) {
            tracing::debug!(field = ?field.name(), "Skipping unexpected multipart field");
            continue;
        }

        let filename = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let mut data = Vec::new();

        while let Some(chunk) = field.chunk().await.map_err(|e| Error::BadRequest {
            message: format!("Failed to read file chunk: {}", e),
        })? {
            data.extend_from_slice(&chunk);

            // Abort as soon as the limit is crossed
            if let Some(max) = max_upload_bytes
                && data.len() > max
            {
                tracing::warn!(size = data.len(), max_upload_bytes = max, "Upload size limit exceeded, aborting");
                return Err(Error::PayloadTooLarge {
                    message: format!("File size exceeds maximum allowed size of {} bytes", max),
                });
            }
        }

        upload = Some(MediaCreateDBRequest {
            filename,
            content_type,
            data,
        });
        break;
    }

    let request = upload.ok_or_else(|| Error::BadRequest {
        message: format!("Missing '{}' field in multipart upload", UPLOAD_FIELD),
    })?;

    let stored = state.media.store(request).await?;
    tracing::info!(media_id = %abbrev_uuid(&stored.id), "Media uploaded");

    Ok(Json(UploadResponse {
        url: media_url(&stored.id),
    }))
}

#[utoipa::path(
    get,
    path = "/api/media/{id}",
    tag = "media",
    summary = "Retrieve media",
    description = "Returns the raw bytes of a media blob with its stored content type.",
    responses(
        (status = 200, description = "Media bytes", content_type = "application/octet-stream"),
        (status = 400, description = "Invalid media id"),
        (status = 404, description = "Media not found"),
        (status = 500, description = "Internal server error")
    ),
    params(
        ("id" = String, Path, description = "The ID of the media blob")
    )
)]
#[instrument(skip_all, err)]
pub async fn get_media(State(state): State<AppState>, Path(raw_id): Path<String>) -> Result<Response> {
    let id = parse_media_id(&raw_id)?;

    let blob = state.media.retrieve(id).await?.ok_or_else(|| Error::NotFound {
        resource: "Media".to_string(),
        id: raw_id.clone(),
    })?;

    let content_type = HeaderValue::from_str(blob.content_type_or_default())
        .unwrap_or_else(|_| HeaderValue::from_static(DEFAULT_MEDIA_CONTENT_TYPE));

    Ok(([(header::CONTENT_TYPE, content_type)], blob.data).into_response())
}
