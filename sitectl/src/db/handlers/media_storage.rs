use crate::db::{
    errors::{DbError, Result},
    models::media::{MediaBlob, MediaCreateDBRequest, MediaMetadata, MediaStorageResponse},
};
use crate::types::{MediaId, abbrev_uuid};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::instrument;
use uuid::Uuid;

/// Trait for media storage backends
///
/// Blobs are immutable once stored: every call to [`MediaStorage::store`] creates
/// a new, independent blob under a freshly generated id, even for identical content.
#[async_trait]
pub trait MediaStorage: Send + Sync {
    /// Store a blob and return its generated id
    async fn store(&self, request: MediaCreateDBRequest) -> Result<MediaStorageResponse>;

    /// Retrieve a blob and its metadata, `None` if no blob has this id
    async fn retrieve(&self, id: MediaId) -> Result<Option<MediaBlob>>;
}

// ============================================================================
// PostgreSQL Storage Implementation
// ============================================================================

/// PostgreSQL storage backend - payload stored inline in the `media` table
pub struct PostgresMediaStorage {
    pool: PgPool,
}

impl PostgresMediaStorage {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MediaStorage for PostgresMediaStorage {
    #[instrument(skip_all, fields(filename = ?request.filename, size = request.data.len()), err)]
    async fn store(&self, request: MediaCreateDBRequest) -> Result<MediaStorageResponse> {
        let id = Uuid::new_v4();

        let created_at: DateTime<Utc> = sqlx::query_scalar(
            r#"
            INSERT INTO media (id, filename, content_type, data)
            VALUES ($1, $2, $3, $4)
            RETURNING created_at
            "#,
        )
        .bind(id)
        .bind(request.filename.as_deref())
        .bind(request.content_type.as_deref())
        .bind(&request.data)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!(media_id = %abbrev_uuid(&id), "Stored media blob in postgres");

        Ok(MediaStorageResponse { id, created_at })
    }

    #[instrument(skip(self), fields(media_id = %abbrev_uuid(&id)), err)]
    async fn retrieve(&self, id: MediaId) -> Result<Option<MediaBlob>> {
        let blob = sqlx::query_as::<_, MediaBlob>(
            r#"
            SELECT id, filename, content_type, data, created_at
            FROM media
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(blob)
    }
}

// ============================================================================
// Local Filesystem Storage Implementation
// ============================================================================

/// Local filesystem storage backend - stores payloads in a directory
///
/// Each blob is written as `{xx}/{id}.dat` with a JSON metadata sidecar
/// `{xx}/{id}.json`, where `xx` is the first two characters of the id.
pub struct LocalMediaStorage {
    base_path: PathBuf,
}

impl LocalMediaStorage {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn shard_dir(&self, id: &MediaId) -> PathBuf {
        let id = id.to_string();
        self.base_path.join(&id[..2])
    }

    fn data_path(&self, id: &MediaId) -> PathBuf {
        self.shard_dir(id).join(format!("{id}.dat"))
    }

    fn metadata_path(&self, id: &MediaId) -> PathBuf {
        self.shard_dir(id).join(format!("{id}.json"))
    }
}

#[async_trait]
impl MediaStorage for LocalMediaStorage {
    #[instrument(skip_all, fields(filename = ?request.filename, size = request.data.len()), err)]
    async fn store(&self, request: MediaCreateDBRequest) -> Result<MediaStorageResponse> {
        let id = Uuid::new_v4();
        let created_at = Utc::now();

        fs::create_dir_all(self.shard_dir(&id)).await?;

        // Payload first, so a metadata file always points at complete data
        let mut file = fs::File::create(self.data_path(&id)).await?;
        file.write_all(&request.data).await?;
        file.sync_all().await?;

        let metadata = MediaMetadata {
            id,
            filename: request.filename,
            content_type: request.content_type,
            size: request.data.len(),
            created_at,
        };
        fs::write(self.metadata_path(&id), serde_json::to_vec(&metadata)?).await?;

        tracing::debug!(media_id = %abbrev_uuid(&id), "Stored media blob on local filesystem");

        Ok(MediaStorageResponse { id, created_at })
    }

    #[instrument(skip(self), fields(media_id = %abbrev_uuid(&id)), err)]
    async fn retrieve(&self, id: MediaId) -> Result<Option<MediaBlob>> {
        let metadata = match fs::read(self.metadata_path(&id)).await {
            Ok(raw) => serde_json::from_slice::<MediaMetadata>(&raw)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let data = fs::read(self.data_path(&id)).await.map_err(|e| {
            DbError::Other(anyhow::anyhow!(
                "Media {} has metadata but its payload is unreadable: {}",
                metadata.id,
                e
            ))
        })?;

        Ok(Some(MediaBlob {
            id: metadata.id,
            filename: metadata.filename,
            content_type: metadata.content_type,
            data,
            created_at: metadata.created_at,
        }))
    }
}

// ============================================================================
// Factory
// ============================================================================

/// Create a media storage backend based on configuration
pub async fn create_media_storage(config: &crate::config::MediaBackend, pool: &PgPool) -> Result<Arc<dyn MediaStorage>> {
    match config {
        crate::config::MediaBackend::Postgres => {
            tracing::info!("Creating PostgreSQL media storage in main database");
            Ok(Arc::new(PostgresMediaStorage::new(pool.clone())))
        }
        crate::config::MediaBackend::Local { path } => {
            tracing::info!("Creating local media storage backend (path: {:?})", path);
            // Ensure directory exists
            if let Err(e) = fs::create_dir_all(path).await {
                return Err(DbError::Other(anyhow::anyhow!(
                    "Failed to create local media directory {:?}: {}",
                    path,
                    e
                )));
            }
            Ok(Arc::new(LocalMediaStorage::new(path.clone())))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_request() -> MediaCreateDBRequest {
        MediaCreateDBRequest {
            filename: Some("logo.png".to_string()),
            content_type: Some("image/png".to_string()),
            data: vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x01],
        }
    }

    #[sqlx::test]
    async fn test_postgres_storage_round_trip(pool: PgPool) {
        let storage = PostgresMediaStorage::new(pool);
        let request = png_request();

        let stored = storage.store(request.clone()).await.unwrap();
        let blob = storage.retrieve(stored.id).await.unwrap().expect("blob should exist");

        assert_eq!(blob.id, stored.id);
        assert_eq!(blob.data, request.data);
        assert_eq!(blob.content_type.as_deref(), Some("image/png"));
        assert_eq!(blob.filename.as_deref(), Some("logo.png"));
    }

    #[sqlx::test]
    async fn test_postgres_storage_does_not_deduplicate(pool: PgPool) {
        let storage = PostgresMediaStorage::new(pool.clone());

        let first = storage.store(png_request()).await.unwrap();
        let second = storage.store(png_request()).await.unwrap();
        assert_ne!(first.id, second.id);

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM media").fetch_one(&pool).await.unwrap();
        assert_eq!(count, 2);
    }

    #[sqlx::test]
    async fn test_postgres_storage_retrieve_unknown_id(pool: PgPool) {
        let storage = PostgresMediaStorage::new(pool);
        assert!(storage.retrieve(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[sqlx::test]
    async fn test_postgres_storage_without_content_type(pool: PgPool) {
        let storage = PostgresMediaStorage::new(pool);
        let stored = storage
            .store(MediaCreateDBRequest {
                filename: None,
                content_type: None,
                data: b"raw".to_vec(),
            })
            .await
            .unwrap();

        let blob = storage.retrieve(stored.id).await.unwrap().unwrap();
        assert!(blob.content_type.is_none());
        assert_eq!(blob.content_type_or_default(), "application/octet-stream");
    }

    #[tokio::test]
    async fn test_local_storage_round_trip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let storage = LocalMediaStorage::new(temp_dir.path().to_path_buf());
        let request = png_request();

        let stored = storage.store(request.clone()).await.unwrap();
        assert!(storage.data_path(&stored.id).exists());
        assert!(storage.metadata_path(&stored.id).exists());

        let blob = storage.retrieve(stored.id).await.unwrap().expect("blob should exist");
        assert_eq!(blob.data, request.data);
        assert_eq!(blob.content_type.as_deref(), Some("image/png"));
        assert_eq!(blob.created_at, stored.created_at);
    }

    #[tokio::test]
    async fn test_local_storage_retrieve_unknown_id() {
        let temp_dir = tempfile::tempdir().unwrap();
        let storage = LocalMediaStorage::new(temp_dir.path().to_path_buf());

        assert!(storage.retrieve(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_local_storage_missing_payload_is_an_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let storage = LocalMediaStorage::new(temp_dir.path().to_path_buf());

        let stored = storage.store(png_request()).await.unwrap();
        std::fs::remove_file(storage.data_path(&stored.id)).unwrap();

        let result = storage.retrieve(stored.id).await;
        assert!(matches!(result, Err(DbError::Other(_))));
    }

    #[tokio::test]
    async fn test_create_local_storage_creates_directory() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("nested").join("media");
        let backend = crate::config::MediaBackend::Local { path: path.clone() };

        // The pool is never used by the local backend
        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy("postgres://localhost/unused")
            .unwrap();
        let storage = create_media_storage(&backend, &pool).await.unwrap();

        assert!(path.is_dir());
        let stored = storage.store(png_request()).await.unwrap();
        assert!(storage.retrieve(stored.id).await.unwrap().is_some());
    }
}
