//! Database models for uploaded media blobs.

use crate::types::{DEFAULT_MEDIA_CONTENT_TYPE, MediaId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Request to store a new blob
#[derive(Debug, Clone)]
pub struct MediaCreateDBRequest {
    /// Client-supplied name, advisory only
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

/// Response from storing a blob
#[derive(Debug, Clone)]
pub struct MediaStorageResponse {
    pub id: MediaId,
    pub created_at: DateTime<Utc>,
}

/// A stored blob with its metadata
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MediaBlob {
    pub id: MediaId,
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
    pub created_at: DateTime<Utc>,
}

impl MediaBlob {
    /// Stored content type, or the generic octet-stream type when none was supplied
    pub fn content_type_or_default(&self) -> &str {
        match self.content_type.as_deref() {
            Some(content_type) if !content_type.is_empty() => content_type,
            _ => DEFAULT_MEDIA_CONTENT_TYPE,
        }
    }
}

/// Metadata kept next to the payload by the local filesystem backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaMetadata {
    pub id: MediaId,
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub size: usize,
    pub created_at: DateTime<Utc>,
}
