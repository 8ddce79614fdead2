//! Configuration loading for the payroll engine.
//!
//! The engine reads one YAML file holding the backend and routing service
//! endpoints with their bearer tokens, plus salary report options.
//!
//! # Example
//!
//! ```no_run
//! use field_payroll::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/field-payroll.yaml").unwrap();
//! println!("Backend: {}", config.backend().base_url);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{BackendConfig, DEFAULT_ROWS_PER_PAGE, EngineConfig, ReportConfig, RoutingConfig};
