//! # sitectl: Site Settings and Media Backend
//!
//! `sitectl` is the backend behind a single-page game hub landing page. It keeps one
//! editable site settings document (titles, theme colours, image references and quiz
//! content) and a small store for uploaded images that the settings refer to by URL.
//!
//! ## Overview
//!
//! The frontend reads the settings on every page load, and an editor form posts partial
//! updates back. The first read creates the document from the configured
//! [`config::SiteDefaults`]; after that every read returns the same document, and updates only
//! touch the fields they carry. Concurrent first reads still produce exactly one document,
//! which the `site_settings` table enforces with a unique, single-valued key.
//!
//! Uploaded files are stored whole and served back from `/api/media/{id}` with the content
//! type they were uploaded with. Blobs are stored either inline in PostgreSQL or on the local
//! filesystem, selected by [`config::MediaBackend`].
//!
//! ## Endpoints
//!
//! | Method | Path              | Purpose                                  |
//! |--------|-------------------|------------------------------------------|
//! | GET    | `/api/settings`   | Read the settings, creating them if absent |
//! | POST   | `/api/settings`   | Merge a partial update                   |
//! | POST   | `/api/upload`     | Store a multipart `file` field           |
//! | GET    | `/api/media/{id}` | Serve a stored blob                      |
//! | GET    | `/test`           | Database connectivity report             |
//! | GET    | `/healthz`        | Liveness                                 |
//! | GET    | `/api/docs`       | OpenAPI reference                        |
//!
//! ## Quick Start
//!
//! ```no_run
//! use clap::Parser;
//! use sitectl::{Application, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let args = sitectl::config::Args::parse();
//!     let config = Config::load(&args)?;
//!
//!     sitectl::telemetry::init_telemetry(config.enable_otel_export)?;
//!
//!     let app = Application::new(config).await?;
//!     app.serve(async {
//!         let _ = tokio::signal::ctrl_c().await;
//!     })
//!     .await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Database Setup
//!
//! Migrations run automatically on startup. To apply them by hand:
//!
//! ```no_run
//! # use sqlx::PgPool;
//! # async fn example(pool: PgPool) -> Result<(), sqlx::migrate::MigrateError> {
//! sitectl::migrator().run(&pool).await?;
//! # Ok(())
//! # }
//! ```
//!
//! See the [`config`] module for configuration options.

pub mod api;
pub mod config;
pub mod db;
pub mod errors;
mod openapi;
pub mod telemetry;
pub mod types;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

use crate::config::CorsOrigin;
use crate::db::handlers::{MediaStorage, create_media_storage};
use crate::openapi::ApiDoc;
use axum::extract::DefaultBodyLimit;
use axum::http::{self, HeaderValue};
use axum::{
    Router,
    routing::{get, post},
};
use bon::Builder;
pub use config::Config;
use sqlx::PgPool;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{Level, debug, info, instrument};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

pub use types::{MediaId, SettingsId};

/// Application state shared across all request handlers.
///
/// ```ignore
/// let state = AppState::builder()
///     .db(pool)
///     .config(config)
///     .media(media_storage)
///     .build();
/// ```
#[derive(Clone, Builder)]
pub struct AppState {
    pub db: PgPool,
    pub config: Config,
    /// Backend holding uploaded blobs
    pub media: Arc<dyn MediaStorage>,
}

/// Get the sitectl database migrator
pub fn migrator() -> sqlx::migrate::Migrator {
    sqlx::migrate!("./migrations")
}

/// Connect to PostgreSQL and bring the schema up to date.
///
/// `database.name`, when set, replaces the database named in the connection URL.
#[instrument(skip_all)]
async fn setup_database(config: &Config) -> anyhow::Result<PgPool> {
    let mut options: PgConnectOptions = config.database.url.parse()?;
    if let Some(name) = &config.database.name {
        info!("Using database '{}' from configuration", name);
        options = options.database(name);
    }

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect_with(options)
        .await?;

    migrator().run(&pool).await?;
    info!("Database migrations applied");

    Ok(pool)
}

/// Create CORS layer from configuration
fn create_cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let cors_config = &config.cors;

    let allow_origin = if cors_config.allowed_origins.iter().any(|o| matches!(o, CorsOrigin::Wildcard)) {
        AllowOrigin::any()
    } else {
        let mut origins = Vec::new();
        for origin in &cors_config.allowed_origins {
            if let CorsOrigin::Url(url) = origin {
                // Origins never carry a trailing slash
                origins.push(url.as_str().trim_end_matches('/').parse::<HeaderValue>()?);
            }
        }
        AllowOrigin::list(origins)
    };

    // Wildcard methods and headers are not allowed together with credentials
    let (allow_methods, allow_headers) = if cors_config.allow_credentials {
        (AllowMethods::mirror_request(), AllowHeaders::mirror_request())
    } else {
        (AllowMethods::any(), AllowHeaders::any())
    };

    let mut cors = CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(allow_methods)
        .allow_headers(allow_headers)
        .allow_credentials(cors_config.allow_credentials)
        .expose_headers(vec![http::header::CONTENT_TYPE]);

    if let Some(max_age) = cors_config.max_age {
        cors = cors.max_age(std::time::Duration::from_secs(max_age));
    }

    Ok(cors)
}

/// Build the application router with all endpoints and middleware.
///
/// Uploads bypass axum's default body limit; the optional `media.max_upload_bytes`
/// is enforced while the upload streams in.
#[instrument(skip_all)]
pub fn build_router(state: AppState) -> anyhow::Result<Router> {
    let cors_layer = create_cors_layer(&state.config)?;

    let router = Router::new()
        .route(
            "/api/settings",
            get(api::handlers::settings::get_settings).post(api::handlers::settings::update_settings),
        )
        .route(
            "/api/upload",
            post(api::handlers::media::upload_media).layer(DefaultBodyLimit::disable()),
        )
        .route("/api/media/{id}", get(api::handlers::media::get_media))
        .route("/test", get(api::handlers::diagnostics::database_report))
        .route("/healthz", get(api::handlers::diagnostics::healthz))
        .with_state(state)
        .merge(Scalar::with_url("/api/docs", ApiDoc::openapi()));

    let router = router.layer(
        ServiceBuilder::new()
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                    .on_request(DefaultOnRequest::new().level(Level::INFO))
                    .on_response(DefaultOnResponse::new().level(Level::INFO)),
            )
            .layer(cors_layer),
    );

    Ok(router)
}

/// The assembled service: connection pool, media backend and router.
///
/// [`Application::new`] connects to the database and runs migrations, then
/// [`Application::serve`] binds the configured address until the shutdown future resolves.
pub struct Application {
    router: Router,
    config: Config,
    pool: PgPool,
}

impl Application {
    /// Create a new application, connecting to the configured database
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        Self::new_with_pool(config, None).await
    }

    /// Create a new application, optionally reusing an existing pool.
    ///
    /// A supplied pool is used as-is; migrations are only run for pools created here.
    pub async fn new_with_pool(config: Config, pool: Option<PgPool>) -> anyhow::Result<Self> {
        debug!("Starting sitectl with configuration: {:#?}", config);

        let pool = match pool {
            Some(pool) => pool,
            None => setup_database(&config).await?,
        };

        let media = create_media_storage(&config.media.backend, &pool).await?;

        let app_state = AppState::builder()
            .db(pool.clone())
            .config(config.clone())
            .media(media)
            .build();

        let router = build_router(app_state)?;

        Ok(Self { router, config, pool })
    }

    /// Convert application into a test server (for tests)
    #[cfg(any(test, feature = "test-utils"))]
    pub fn into_test_server(self) -> anyhow::Result<axum_test::TestServer> {
        axum_test::TestServer::new(self.router.into_make_service())
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!(
            "sitectl listening on http://{}, available at http://localhost:{}",
            bind_addr, self.config.port
        );

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Closing database connections...");
        self.pool.close().await;

        info!("Shutting down telemetry...");
        telemetry::shutdown_telemetry();

        Ok(())
    }
}
