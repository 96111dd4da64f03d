use crate::AppState;
use crate::api::models::settings::{SettingsResponse, SettingsUpdate, SettingsUpdateResponse};
use crate::db::handlers::Settings;
use crate::db::models::settings::{SettingsCreateDBRequest, SettingsUpdateDBRequest};
use crate::errors::{Error, Result};
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use tracing::instrument;

#[utoipa::path(
    get,
    path = "/api/settings",
    tag = "settings",
    summary = "Get site settings",
    description = "Returns the site settings document, creating it from the configured defaults on first access.",
    responses(
        (status = 200, description = "Current site settings", body = SettingsResponse),
        (status = 500, description = "Internal server error")
    )
)]
#[instrument(skip_all, err)]
pub async fn get_settings(State(state): State<AppState>) -> Result<Json<SettingsResponse>> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let defaults = SettingsCreateDBRequest::from(&state.config.site_defaults);

    let settings = Settings::new(&mut conn).get_or_create(&defaults).await?;

    Ok(Json(settings.into()))
}

#[utoipa::path(
    post,
    path = "/api/settings",
    tag = "settings",
    summary = "Update site settings",
    description = "Merge the supplied fields into the site settings. Fields that are absent or null are left unchanged; \
                   quizQuestions replaces the whole list.",
    request_body = SettingsUpdate,
    responses(
        (status = 200, description = "Update outcome", body = SettingsUpdateResponse),
        (status = 422, description = "Body does not match the settings schema"),
        (status = 500, description = "Internal server error")
    )
)]
#[instrument(skip_all, err)]
pub async fn update_settings(
    State(state): State<AppState>,
    payload: std::result::Result<Json<SettingsUpdate>, JsonRejection>,
) -> Result<Json<SettingsUpdateResponse>> {
    let Json(update) = payload?;
    let request = SettingsUpdateDBRequest::from(update);

    if request.is_empty() {
        return Ok(Json(SettingsUpdateResponse::unchanged()));
    }

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let defaults = SettingsCreateDBRequest::from(&state.config.site_defaults);

    match Settings::new(&mut conn).update(&defaults, &request).await? {
        Some(_) => Ok(Json(SettingsUpdateResponse::updated())),
        None => Ok(Json(SettingsUpdateResponse::unchanged())),
    }
}

#[cfg(test)]
mod tests {
    use crate::api::models::settings::{SettingsResponse, SettingsUpdateResponse};
    use crate::test_utils::*;
    use axum::http::StatusCode;
    use serde_json::json;
    use sqlx::PgPool;

    #[sqlx::test]
    #[test_log::test]
    async fn test_get_settings_returns_defaults(pool: PgPool) {
        let app = create_test_app(pool).await;

        let response = app.get("/api/settings").await;
        response.assert_status_ok();

        let settings: SettingsResponse = response.json();
        assert_eq!(settings.key, "singleton");
        assert_eq!(settings.title, "Playful Mario\u{2011}vibe Game Hub");
        assert_eq!(settings.primary_color, "#ef4444");
        assert_eq!(settings.accent_color, "#f59e0b");
        assert!(settings.hero_logo_url.is_none());
        assert!(settings.quiz_questions.is_none());

        // Same document on every read
        let again: SettingsResponse = app.get("/api/settings").await.json();
        assert_eq!(again.id, settings.id);
        assert_eq!(again.updated_at, settings.updated_at);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_update_then_get(pool: PgPool) {
        let app = create_test_app(pool).await;

        let response = app.post("/api/settings").json(&json!({"primaryColor": "#000000"})).await;
        response.assert_status_ok();
        let outcome: SettingsUpdateResponse = response.json();
        assert!(outcome.updated);

        let settings: SettingsResponse = app.get("/api/settings").await.json();
        assert_eq!(settings.primary_color, "#000000");
        assert_eq!(settings.title, "Playful Mario\u{2011}vibe Game Hub");
        assert_eq!(settings.accent_color, "#f59e0b");
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_update_replaces_quiz_questions(pool: PgPool) {
        let app = create_test_app(pool).await;

        app.post("/api/settings")
            .json(&json!({"quizQuestions": [
                {"q": "Who jumps?", "a": ["Mario", "Bowser"], "correct": 0},
                {"q": "Colour of coins?", "a": ["Gold", "Blue"], "correct": 0}
            ]}))
            .await
            .assert_status_ok();
        app.post("/api/settings")
            .json(&json!({"quizQuestions": [{"q": "Only one?", "a": ["Yes"]}]}))
            .await
            .assert_status_ok();

        let settings: SettingsResponse = app.get("/api/settings").await.json();
        let questions = settings.quiz_questions.expect("quiz questions should be set");
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].q, "Only one?");
        assert_eq!(questions[0].correct, 0);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_empty_update_reports_no_changes(pool: PgPool) {
        let app = create_test_app(pool.clone()).await;

        let response = app.post("/api/settings").json(&json!({})).await;
        response.assert_status_ok();
        response.assert_json(&json!({"updated": false, "message": "No changes"}));

        // Nulls and unknown fields carry no changes either
        let response = app
            .post("/api/settings")
            .json(&json!({"title": null, "somethingElse": "ignored"}))
            .await;
        response.assert_json(&json!({"updated": false, "message": "No changes"}));

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM site_settings")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_update_rejects_malformed_body(pool: PgPool) {
        let app = create_test_app(pool).await;

        let response = app.post("/api/settings").json(&json!({"title": 42})).await;
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);

        let response = app
            .post("/api/settings")
            .json(&json!({"quizQuestions": [{"q": "Bad", "a": ["x"], "correct": -1}]}))
            .await;
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);

        // Nothing was persisted by the rejected requests
        let settings: SettingsResponse = app.get("/api/settings").await.json();
        assert_eq!(settings.title, "Playful Mario\u{2011}vibe Game Hub");
        assert!(settings.quiz_questions.is_none());
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_update_uses_configured_defaults(pool: PgPool) {
        let mut config = create_test_config();
        config.site_defaults.title = "Configured Title".to_string();
        let app = create_test_app_with_config(pool, config).await;

        app.post("/api/settings")
            .json(&json!({"subtitle": "Fresh subtitle"}))
            .await
            .assert_status_ok();

        let settings: SettingsResponse = app.get("/api/settings").await.json();
        assert_eq!(settings.title, "Configured Title");
        assert_eq!(settings.subtitle, "Fresh subtitle");
    }
}
