use crate::db::models::settings::{QuizQuestion, SettingsUpdateDBRequest, SiteSettings};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// The settings document as served to the frontend
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SettingsResponse {
    /// Stringified document identity
    #[serde(rename = "_id")]
    pub id: String,
    /// Always `"singleton"`
    pub key: String,
    pub title: String,
    pub subtitle: String,
    /// Hex colour code, e.g. `#ef4444`
    pub primary_color: String,
    /// Hex colour code, e.g. `#f59e0b`
    pub accent_color: String,
    pub hero_logo_url: Option<String>,
    pub wheel_bg_url: Option<String>,
    pub quiz_questions: Option<Vec<QuizQuestion>>,
    #[serde(rename = "created_at")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updated_at")]
    pub updated_at: DateTime<Utc>,
}

impl From<SiteSettings> for SettingsResponse {
    fn from(settings: SiteSettings) -> Self {
        Self {
            id: settings.id.to_string(),
            key: settings.key,
            title: settings.title,
            subtitle: settings.subtitle,
            primary_color: settings.primary_color,
            accent_color: settings.accent_color,
            hero_logo_url: settings.hero_logo_url,
            wheel_bg_url: settings.wheel_bg_url,
            quiz_questions: settings.quiz_questions.map(|json| json.0),
            created_at: settings.created_at,
            updated_at: settings.updated_at,
        }
    }
}

/// Sparse settings update. Absent and `null` fields are left unchanged; unknown fields are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdate {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub primary_color: Option<String>,
    pub accent_color: Option<String>,
    pub hero_logo_url: Option<String>,
    pub wheel_bg_url: Option<String>,
    pub quiz_questions: Option<Vec<QuizQuestion>>,
}

impl From<SettingsUpdate> for SettingsUpdateDBRequest {
    fn from(update: SettingsUpdate) -> Self {
        Self {
            title: update.title,
            subtitle: update.subtitle,
            primary_color: update.primary_color,
            accent_color: update.accent_color,
            hero_logo_url: update.hero_logo_url,
            wheel_bg_url: update.wheel_bg_url,
            quiz_questions: update.quiz_questions,
        }
    }
}

/// Outcome of a settings update
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SettingsUpdateResponse {
    /// False when the request carried no fields and nothing was written
    pub updated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SettingsUpdateResponse {
    pub fn updated() -> Self {
        Self {
            updated: true,
            message: None,
        }
    }

    pub fn unchanged() -> Self {
        Self {
            updated: false,
            message: Some("No changes".to_string()),
        }
    }
}
