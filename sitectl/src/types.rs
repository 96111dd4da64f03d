//! Common type definitions.
//!
//! # ID Types
//!
//! All entity IDs are UUIDs wrapped in type aliases:
//!
//! - [`SettingsId`]: identity of the singleton settings document
//! - [`MediaId`]: uploaded media blob identifier, embedded in `/api/media/{id}` URLs
//!
//! # Utility Functions
//!
//! - [`abbrev_uuid`]: Abbreviate UUIDs to first 8 chars for logging
//! - [`parse_media_id`]: Parse a client-supplied media reference

use crate::errors::Error;
use uuid::Uuid;

// Type aliases for IDs
pub type SettingsId = Uuid;
pub type MediaId = Uuid;

/// Lookup discriminator of the one and only settings document.
pub const SETTINGS_SINGLETON_KEY: &str = "singleton";

/// Content type reported for blobs uploaded without one.
pub const DEFAULT_MEDIA_CONTENT_TYPE: &str = "application/octet-stream";

/// Abbreviate a UUID to its first 8 characters for more readable logs and traces
/// Example: "550e8400-e29b-41d4-a716-446655440000" -> "550e8400"
pub fn abbrev_uuid(uuid: &Uuid) -> String {
    uuid.to_string().chars().take(8).collect()
}

/// Parse a client-supplied media reference into a [`MediaId`].
///
/// A malformed reference is an [`Error::InvalidIdentifier`], never a not-found.
pub fn parse_media_id(raw: &str) -> Result<MediaId, Error> {
    Uuid::parse_str(raw.trim()).map_err(|_| Error::InvalidIdentifier {
        resource: "Media".to_string(),
        value: raw.to_string(),
    })
}

/// Public path under which a stored blob is served.
pub fn media_url(id: &MediaId) -> String {
    format!("/api/media/{id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_abbrev_uuid() {
        let id = Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").unwrap();
        assert_eq!(abbrev_uuid(&id), "550e8400");
    }

    #[test]
    fn test_parse_media_id_accepts_uuid() {
        let id = Uuid::new_v4();
        assert_eq!(parse_media_id(&id.to_string()).unwrap(), id);
    }

    #[test]
    fn test_parse_media_id_rejects_garbage() {
        let err = parse_media_id("not-a-valid-id").unwrap_err();
        assert!(matches!(err, Error::InvalidIdentifier { .. }));
    }

    #[test]
    fn test_media_url_embeds_id() {
        let id = Uuid::new_v4();
        assert_eq!(media_url(&id), format!("/api/media/{id}"));
    }
}
