//! Configuration types.
//!
//! These structures are deserialized from the engine's YAML configuration
//! file.

use serde::Deserialize;

/// Default number of rows on one salary report page.
pub const DEFAULT_ROWS_PER_PAGE: usize = 10;

fn default_rows_per_page() -> usize {
    DEFAULT_ROWS_PER_PAGE
}

/// Connection settings for the field-sales backend.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BackendConfig {
    /// Root URL the attendance, employee and travel endpoints hang off.
    pub base_url: String,
    /// Bearer token sent with every request.
    pub access_token: String,
}

/// Connection settings for the routing service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RoutingConfig {
    /// Root URL of the routing service.
    pub base_url: String,
    /// Bearer token for the directions endpoint.
    pub access_token: String,
}

/// Salary report listing options.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReportConfig {
    /// Rows shown on one page.
    #[serde(default = "default_rows_per_page")]
    pub rows_per_page: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            rows_per_page: DEFAULT_ROWS_PER_PAGE,
        }
    }
}

/// The complete engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EngineConfig {
    /// Backend connection.
    pub backend: BackendConfig,
    /// Routing service connection.
    pub routing: RoutingConfig,
    /// Report options; defaults apply when the section is absent.
    #[serde(default)]
    pub report: ReportConfig,
}
