//! Utility modules for configuration, error handling, and diagnostics.

pub mod error;
pub mod config;
pub mod scope;

// Re-export commonly used error types for convenience
pub use error::{ClientError, ConfigError, ConnectorError, ExtractError, TemplateError};
pub use scope::MonitoredScope;
