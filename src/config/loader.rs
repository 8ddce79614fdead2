//! Configuration loading functionality.

use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};

use super::types::{BackendConfig, EngineConfig, ReportConfig, RoutingConfig};

/// Loads and provides access to the engine configuration.
///
/// # File format
///
/// ```yaml
/// backend:
///   base_url: https://api.example.com
///   access_token: secret
/// routing:
///   base_url: https://routing.example.com
///   access_token: secret
/// report:
///   rows_per_page: 10   # optional
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: EngineConfig,
}

impl ConfigLoader {
    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigNotFound` if the file cannot be read and
    /// `ConfigParseError` if it is not a valid configuration document.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use field_payroll::config::ConfigLoader;
    ///
    /// let loader = ConfigLoader::load("./config/field-payroll.yaml")?;
    /// # Ok::<(), field_payroll::error::EngineError>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        Self::parse(&content, path_str)
    }

    /// Parses configuration from an in-memory YAML document.
    pub fn from_yaml_str(content: &str) -> EngineResult<Self> {
        Self::parse(content, "<inline>".to_string())
    }

    fn parse(content: &str, path: String) -> EngineResult<Self> {
        let config: EngineConfig =
            serde_yaml::from_str(content).map_err(|e| EngineError::ConfigParseError {
                path: path.clone(),
                message: e.to_string(),
            })?;

        if config.report.rows_per_page == 0 {
            return Err(EngineError::ConfigParseError {
                path,
                message: "report.rows_per_page must be at least 1".to_string(),
            });
        }

        Ok(Self { config })
    }

    /// Returns the underlying configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the backend connection settings.
    pub fn backend(&self) -> &BackendConfig {
        &self.config.backend
    }

    /// Returns the routing service settings.
    pub fn routing(&self) -> &RoutingConfig {
        &self.config.routing
    }

    /// Returns the report options.
    pub fn report(&self) -> &ReportConfig {
        &self.config.report
    }
}
