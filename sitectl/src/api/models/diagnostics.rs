use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Connectivity report returned by `/test`.
///
/// Every field is a human-readable status string; probe failures are reported
/// inline rather than as an error response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DiagnosticsResponse {
    pub backend: String,
    pub database: String,
    /// Whether a connection string is configured (never the string itself)
    pub database_url: Option<String>,
    /// Whether a database name override is configured
    pub database_name: Option<String>,
    pub connection_status: String,
    /// Up to ten table names from the current schema
    pub collections: Vec<String>,
}

impl Default for DiagnosticsResponse {
    fn default() -> Self {
        Self {
            backend: "✅ Running".to_string(),
            database: "❌ Not Available".to_string(),
            database_url: None,
            database_name: None,
            connection_status: "Not Connected".to_string(),
            collections: Vec::new(),
        }
    }
}
