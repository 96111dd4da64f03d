//! Test utilities for integration testing (available with `test-utils` feature).

use crate::config::{Config, DatabaseConfig};
use axum_test::TestServer;
use sqlx::PgPool;

/// Build a test server on top of a pool prepared by `#[sqlx::test]`.
pub async fn create_test_app(pool: PgPool) -> TestServer {
    create_test_app_with_config(pool, create_test_config()).await
}

pub async fn create_test_app_with_config(pool: PgPool, config: Config) -> TestServer {
    let app = crate::Application::new_with_pool(config, Some(pool))
        .await
        .expect("Failed to create application");

    app.into_test_server().expect("Failed to create test server")
}

pub fn create_test_config() -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        database: DatabaseConfig {
            // Never dialled: tests hand in their own pool
            url: "postgres://localhost:5432/sitectl_test".to_string(),
            name: None,
            max_connections: 1,
        },
        ..Default::default()
    }
}
