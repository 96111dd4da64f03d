use crate::AppState;
use crate::api::models::diagnostics::DiagnosticsResponse;
use axum::{Json, extract::State};

/// Maximum number of table names listed in the report
const MAX_LISTED_TABLES: i64 = 10;
/// Probe error messages are cut to this many characters
const MAX_ERROR_CHARS: usize = 50;

fn truncate_error(error: &impl std::fmt::Display) -> String {
    error.to_string().chars().take(MAX_ERROR_CHARS).collect()
}

fn set_or_not(present: bool) -> String {
    if present { "✅ Set" } else { "❌ Not Set" }.to_string()
}

#[utoipa::path(
    get,
    path = "/test",
    tag = "diagnostics",
    summary = "Database diagnostics",
    description = "Probes database connectivity and reports the outcome as status strings. Never fails.",
    responses(
        (status = 200, description = "Diagnostic report", body = DiagnosticsResponse)
    )
)]
pub async fn database_report(State(state): State<AppState>) -> Json<DiagnosticsResponse> {
    let mut response = DiagnosticsResponse::default();

    match sqlx::query_scalar::<_, String>("SELECT current_database()")
        .fetch_one(&state.db)
        .await
    {
        Ok(name) => {
            response.database = "✅ Available".to_string();
            response.connection_status = "Connected".to_string();
            tracing::debug!(database = %name, "Diagnostics probe connected");

            match sqlx::query_scalar::<_, String>(
                r#"
                SELECT table_name::text
                FROM information_schema.tables
                WHERE table_schema = current_schema()
                ORDER BY table_name
                LIMIT $1
                "#,
            )
            .bind(MAX_LISTED_TABLES)
            .fetch_all(&state.db)
            .await
            {
                Ok(tables) => {
                    response.collections = tables;
                    response.database = "✅ Connected & Working".to_string();
                }
                Err(e) => {
                    tracing::warn!("Diagnostics table listing failed: {}", e);
                    response.database = format!("⚠️  Connected but Error: {}", truncate_error(&e));
                }
            }
        }
        Err(e) => {
            tracing::warn!("Diagnostics database probe failed: {}", e);
            response.database = format!("❌ Error: {}", truncate_error(&e));
        }
    }

    response.database_url = Some(set_or_not(!state.config.database.url.is_empty()));
    response.database_name = Some(set_or_not(state.config.database.name.is_some()));

    Json(response)
}

#[utoipa::path(
    get,
    path = "/healthz",
    tag = "diagnostics",
    summary = "Liveness check",
    responses(
        (status = 200, description = "Service is running", body = String)
    )
)]
pub async fn healthz() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;
    use sqlx::PgPool;

    #[test]
    fn test_truncate_error() {
        let long = "x".repeat(80);
        assert_eq!(truncate_error(&long).chars().count(), 50);
        assert_eq!(truncate_error(&"short"), "short");
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_diagnostics_reports_connected(pool: PgPool) {
        let app = create_test_app(pool).await;

        let response = app.get("/test").await;
        response.assert_status_ok();

        let report: DiagnosticsResponse = response.json();
        assert_eq!(report.backend, "✅ Running");
        assert_eq!(report.database, "✅ Connected & Working");
        assert_eq!(report.connection_status, "Connected");
        assert_eq!(report.database_url.as_deref(), Some("✅ Set"));
        assert_eq!(report.database_name.as_deref(), Some("❌ Not Set"));
        assert!(report.collections.iter().any(|t| t == "site_settings"));
        assert!(report.collections.iter().any(|t| t == "media"));
        assert!(report.collections.len() <= 10);
    }

    #[tokio::test]
    async fn test_diagnostics_never_fails_without_database() {
        // Nothing listens on port 1, so every probe errors
        let pool = sqlx::postgres::PgPoolOptions::new()
            .acquire_timeout(std::time::Duration::from_millis(500))
            .connect_lazy("postgres://sitectl@127.0.0.1:1/unreachable")
            .unwrap();
        let app = create_test_app(pool).await;

        let response = app.get("/test").await;
        response.assert_status_ok();

        let report: DiagnosticsResponse = response.json();
        assert_eq!(report.connection_status, "Not Connected");
        assert!(report.database.starts_with("❌ Error: "));
        assert!(report.database.chars().count() <= "❌ Error: ".chars().count() + 50);
        assert!(report.collections.is_empty());
    }

    #[sqlx::test]
    async fn test_healthz(pool: PgPool) {
        let app = create_test_app(pool).await;

        let response = app.get("/healthz").await;
        response.assert_status_ok();
        response.assert_text("OK");
    }
}
