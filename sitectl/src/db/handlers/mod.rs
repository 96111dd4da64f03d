//! Repository implementations for database access.
//!
//! - [`Settings`]: find-or-create and sparse update of the singleton settings document
//! - [`media_storage`]: the [`MediaStorage`] trait with PostgreSQL and local filesystem backends
//!
//! Repositories wrap a borrowed connection:
//!
//! ```ignore
//! let mut conn = pool.acquire().await?;
//! let settings = Settings::new(&mut conn).get_or_create(&defaults).await?;
//! ```

pub mod media_storage;
pub mod settings;

pub use media_storage::{MediaStorage, create_media_storage};
pub use settings::Settings;
