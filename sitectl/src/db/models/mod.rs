//! Database record models.
//!
//! These mirror table rows and are kept separate from the API models in
//! [`crate::api::models`], which handle wire naming.
//!
//! - [`settings`]: the site settings row and its create/update requests
//! - [`media`]: media blobs and the local backend's metadata sidecar

pub mod media;
pub mod settings;
