//! Database models for the site settings singleton.

use crate::config::SiteDefaults;
use crate::types::SettingsId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use utoipa::ToSchema;

/// A single quiz entry, stored inside the `quiz_questions` JSONB column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct QuizQuestion {
    /// Question text
    pub q: String,
    /// Answer options, in display order
    pub a: Vec<String>,
    /// Zero-based index into `a` of the right answer
    #[serde(default)]
    pub correct: u32,
}

/// Database representation of the settings document
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SiteSettings {
    pub id: SettingsId,
    pub key: String,
    pub title: String,
    pub subtitle: String,
    pub primary_color: String,
    pub accent_color: String,
    pub hero_logo_url: Option<String>,
    pub wheel_bg_url: Option<String>,
    pub quiz_questions: Option<Json<Vec<QuizQuestion>>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Field values used when the singleton has to be created
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsCreateDBRequest {
    pub title: String,
    pub subtitle: String,
    pub primary_color: String,
    pub accent_color: String,
}

impl From<&SiteDefaults> for SettingsCreateDBRequest {
    fn from(defaults: &SiteDefaults) -> Self {
        Self {
            title: defaults.title.clone(),
            subtitle: defaults.subtitle.clone(),
            primary_color: defaults.primary_color.clone(),
            accent_color: defaults.accent_color.clone(),
        }
    }
}

/// Sparse update of the settings document; `None` fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsUpdateDBRequest {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub primary_color: Option<String>,
    pub accent_color: Option<String>,
    pub hero_logo_url: Option<String>,
    pub wheel_bg_url: Option<String>,
    pub quiz_questions: Option<Vec<QuizQuestion>>,
}

impl SettingsUpdateDBRequest {
    /// True when no field is present, i.e. applying it would change nothing
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.subtitle.is_none()
            && self.primary_color.is_none()
            && self.accent_color.is_none()
            && self.hero_logo_url.is_none()
            && self.wheel_bg_url.is_none()
            && self.quiz_questions.is_none()
    }
}

/// Response from database after reading, creating or updating the settings
pub type SettingsDBResponse = SiteSettings;
