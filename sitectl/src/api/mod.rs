//! HTTP API: route handlers and request/response models.
//!
//! - `GET /api/settings`, `POST /api/settings`: the site settings document
//! - `POST /api/upload`, `GET /api/media/{id}`: binary media
//! - `GET /test`, `GET /healthz`: diagnostics
//!
//! OpenAPI documentation is served at `/api/docs`.

pub mod handlers;
pub mod models;
