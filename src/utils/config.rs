//! Configuration and constants for the CLI.

use std::time::Duration;

/// Default timeout for REST requests
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Current template document schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Prefix of every generated template identifier
pub const TEMPLATE_ID_PREFIX: &str = "TEMPLATE-";

/// Generator name stamped into exported documents
pub const GENERATOR_NAME: &str = "spo-page-export";

// REST paths under the site URL (SharePoint Online modern page API)
pub const SITE_PAGES_API: &str = "_api/sitepages/pages";
pub const GET_FILE_API: &str = "_api/web/GetFileByServerRelativeUrl";
