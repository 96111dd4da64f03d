use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Response for a successful upload
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UploadResponse {
    /// Path the blob is served from, `/api/media/{id}`
    pub url: String,
}
