//! OpenAPI documentation, served at `/api/docs`.

use utoipa::OpenApi;

use crate::api;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "sitectl",
        description = "Site settings and media API for the game hub frontend"
    ),
    paths(
        api::handlers::settings::get_settings,
        api::handlers::settings::update_settings,
        api::handlers::media::upload_media,
        api::handlers::media::get_media,
        api::handlers::diagnostics::database_report,
        api::handlers::diagnostics::healthz,
    ),
    components(
        schemas(
            api::models::settings::SettingsResponse,
            api::models::settings::SettingsUpdate,
            api::models::settings::SettingsUpdateResponse,
            crate::db::models::settings::QuizQuestion,
            api::models::media::UploadResponse,
            api::models::diagnostics::DiagnosticsResponse,
        )
    ),
    tags(
        (name = "settings", description = "The singleton site settings document"),
        (name = "media", description = "Binary media upload and retrieval"),
        (name = "diagnostics", description = "Connectivity and liveness checks"),
    )
)]
pub struct ApiDoc;
