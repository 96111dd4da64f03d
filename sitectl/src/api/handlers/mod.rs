//! Axum route handlers.

pub mod diagnostics;
pub mod media;
pub mod settings;
