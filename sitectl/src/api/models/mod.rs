//! API request and response models.
//!
//! Field names follow the frontend's camelCase wire format; conversions to and
//! from [`crate::db::models`] live next to each model.

pub mod diagnostics;
pub mod media;
pub mod settings;
