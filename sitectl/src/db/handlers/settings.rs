//! Database repository for the site settings singleton.
//!
//! There is exactly zero or one row in `site_settings`. The table carries a
//! `UNIQUE (key)` constraint and a `CHECK (key = 'singleton')`, so both
//! find-or-create and upsert are single-row atomic operations: concurrent first
//! readers race on the constraint, never on application state.

use crate::{
    db::{
        errors::Result,
        models::settings::{SettingsCreateDBRequest, SettingsDBResponse, SettingsUpdateDBRequest, SiteSettings},
    },
    types::{SETTINGS_SINGLETON_KEY, abbrev_uuid},
};
use sqlx::{PgConnection, types::Json};
use tracing::{debug, info, instrument};
use uuid::Uuid;

pub struct Settings<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Settings<'c> {
    /// Create a new Settings repository instance
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Return the singleton, creating it from `defaults` if it does not exist yet.
    ///
    /// The insert is a no-op when the row already exists, so repeated and
    /// concurrent calls all observe the same document identity.
    #[instrument(skip_all, err)]
    pub async fn get_or_create(&mut self, defaults: &SettingsCreateDBRequest) -> Result<SettingsDBResponse> {
        let inserted = sqlx::query(
            r#"
            INSERT INTO site_settings (id, key, title, subtitle, primary_color, accent_color)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (key) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(SETTINGS_SINGLETON_KEY)
        .bind(&defaults.title)
        .bind(&defaults.subtitle)
        .bind(&defaults.primary_color)
        .bind(&defaults.accent_color)
        .execute(&mut *self.db)
        .await?;

        let settings = sqlx::query_as::<_, SiteSettings>(
            r#"
            SELECT id, key, title, subtitle, primary_color, accent_color,
                   hero_logo_url, wheel_bg_url, quiz_questions, created_at, updated_at
            FROM site_settings
            WHERE key = $1
            "#,
        )
        .bind(SETTINGS_SINGLETON_KEY)
        .fetch_one(&mut *self.db)
        .await?;

        if inserted.rows_affected() > 0 {
            info!(settings_id = %abbrev_uuid(&settings.id), "Created settings singleton from defaults");
        }

        Ok(settings)
    }

    /// Merge the present fields of `request` into the singleton.
    ///
    /// Returns `None` without touching the database when `request` is empty.
    /// Otherwise a single upsert creates the document from `defaults` (with the
    /// request applied on top) or overwrites only the given columns, and stamps
    /// `updated_at`.
    #[instrument(skip_all, err)]
    pub async fn update(
        &mut self,
        defaults: &SettingsCreateDBRequest,
        request: &SettingsUpdateDBRequest,
    ) -> Result<Option<SettingsDBResponse>> {
        if request.is_empty() {
            debug!("Empty settings update, skipping write");
            return Ok(None);
        }

        let settings = sqlx::query_as::<_, SiteSettings>(
            r#"
            INSERT INTO site_settings (
                id, key, title, subtitle, primary_color, accent_color,
                hero_logo_url, wheel_bg_url, quiz_questions
            )
            VALUES (
                $1, $2, COALESCE($3, $10), COALESCE($4, $11), COALESCE($5, $12), COALESCE($6, $13),
                $7, $8, $9
            )
            ON CONFLICT (key) DO UPDATE SET
                title = COALESCE($3, site_settings.title),
                subtitle = COALESCE($4, site_settings.subtitle),
                primary_color = COALESCE($5, site_settings.primary_color),
                accent_color = COALESCE($6, site_settings.accent_color),
                hero_logo_url = COALESCE($7, site_settings.hero_logo_url),
                wheel_bg_url = COALESCE($8, site_settings.wheel_bg_url),
                quiz_questions = COALESCE($9, site_settings.quiz_questions),
                updated_at = NOW()
            RETURNING id, key, title, subtitle, primary_color, accent_color,
                      hero_logo_url, wheel_bg_url, quiz_questions, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(SETTINGS_SINGLETON_KEY)
        .bind(request.title.as_deref())
        .bind(request.subtitle.as_deref())
        .bind(request.primary_color.as_deref())
        .bind(request.accent_color.as_deref())
        .bind(request.hero_logo_url.as_deref())
        .bind(request.wheel_bg_url.as_deref())
        .bind(request.quiz_questions.as_ref().map(Json))
        .bind(&defaults.title)
        .bind(&defaults.subtitle)
        .bind(&defaults.primary_color)
        .bind(&defaults.accent_color)
        .fetch_one(&mut *self.db)
        .await?;

        debug!(settings_id = %abbrev_uuid(&settings.id), "Settings updated");

        Ok(Some(settings))
    }
}
