//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use thiserror::Error;

/// Errors that can occur talking to the SharePoint REST endpoints
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Invalid REST response: {0}")]
    InvalidResponse(String),

    #[error("Page not found: {0}")]
    PageNotFound(String),

    #[error("Access denied by the site (check SPO_ACCESS_TOKEN)")]
    AccessDenied,
}

/// Errors that can occur loading an extraction configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration file: {0}")]
    ReadFailed(#[from] std::io::Error),

    #[error("Malformed configuration JSON: {0}")]
    ParseFailed(#[from] serde_json::Error),
}

/// Errors that can occur serializing or parsing a template document
#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Invalid template document: {0}")]
    InvalidDocument(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Errors that can occur persisting files through a connector
#[derive(Error, Debug)]
pub enum ConnectorError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Invalid target path: {0}")]
    InvalidPath(String),
}

/// Errors that can occur during page extraction
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("Malformed canvas content: {0}")]
    InvalidCanvas(String),

    #[error(transparent)]
    Connector(#[from] ConnectorError),
}
