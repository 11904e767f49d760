//! Provisioning template object model.
//!
//! A deliberately small slice of the PnP provisioning schema: one template
//! carrying client-side pages. Everything else the schema can hold is out of
//! scope for this tool.

use crate::utils::config::TEMPLATE_ID_PREFIX;
use uuid::Uuid;

/// Top-level provisioning template document
#[derive(Debug, Clone, PartialEq)]
pub struct ProvisioningTemplate {
    /// Template identifier, `TEMPLATE-` plus 32 uppercase hex digits
    pub id: String,

    /// Document schema version
    pub version: String,

    /// RFC 3339 timestamp of when the export ran
    pub generated_at: String,

    /// Exported pages (exactly one for a single-page export)
    pub pages: Vec<ClientSidePageEntity>,
}

impl ProvisioningTemplate {
    /// Create an empty template with a freshly generated identifier
    pub fn new() -> Self {
        Self {
            id: new_template_id(),
            version: crate::utils::config::SCHEMA_VERSION.to_string(),
            generated_at: chrono::Utc::now().to_rfc3339(),
            pages: Vec::new(),
        }
    }
}

impl Default for ProvisioningTemplate {
    fn default() -> Self {
        Self::new()
    }
}

/// A modern page captured into the template
#[derive(Debug, Clone, PartialEq)]
pub struct ClientSidePageEntity {
    /// File name of the page, e.g. `Home.aspx`
    pub page_name: String,

    /// Page title
    pub title: Option<String>,

    /// Page layout (Article, Home, ...)
    pub layout: String,

    /// Page author login, omitted when author information is excluded
    pub author: Option<String>,

    /// Whether applying the template overwrites an existing page
    pub overwrite: bool,

    /// Canvas sections in zone order
    pub sections: Vec<CanvasSection>,
}

/// A horizontal section of the page canvas
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasSection {
    /// 1-based zone order
    pub order: u32,

    /// Columns left to right
    pub columns: Vec<CanvasColumn>,
}

/// A column within a section
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasColumn {
    /// 1-based column order
    pub order: u32,

    /// Width factor out of 12
    pub factor: u32,

    /// Controls top to bottom
    pub controls: Vec<CanvasControl>,
}

/// Kind of control hosted in a column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlType {
    WebPart,
    Text,
}

impl ControlType {
    pub fn as_str(self) -> &'static str {
        match self {
            ControlType::WebPart => "WebPart",
            ControlType::Text => "Text",
        }
    }
}

/// A single web part or text control
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasControl {
    pub control_type: ControlType,

    /// 1-based order within the column
    pub order: u32,

    /// Web part type identifier (web parts only)
    pub web_part_id: Option<String>,

    /// Display title (web parts only)
    pub title: Option<String>,

    /// Raw web part properties as JSON text (web parts only)
    pub properties: Option<String>,

    /// Inner HTML (text controls only)
    pub text: Option<String>,
}

impl CanvasControl {
    /// Empty text control at the given order
    pub fn text(order: u32, html: impl Into<String>) -> Self {
        Self {
            control_type: ControlType::Text,
            order,
            web_part_id: None,
            title: None,
            properties: None,
            text: Some(html.into()),
        }
    }
}

/// Generate a fresh template identifier: fixed label plus uppercase hex
pub fn new_template_id() -> String {
    format!(
        "{}{}",
        TEMPLATE_ID_PREFIX,
        Uuid::new_v4().simple().to_string().to_uppercase()
    )
}

/// Check whether a string is a well-formed template identifier
pub fn is_template_id(candidate: &str) -> bool {
    match candidate.strip_prefix(TEMPLATE_ID_PREFIX) {
        Some(hex) => hex.len() == 32 && hex.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_lowercase()),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_template_id_shape() {
        let id = new_template_id();
        assert!(id.starts_with(TEMPLATE_ID_PREFIX));
        assert_eq!(id.len(), TEMPLATE_ID_PREFIX.len() + 32);
        assert!(is_template_id(&id));
    }

    #[test]
    fn test_new_template_ids_are_unique() {
        assert_ne!(new_template_id(), new_template_id());
    }

    #[test]
    fn test_is_template_id_rejects_lowercase() {
        assert!(!is_template_id("TEMPLATE-abcdefabcdefabcdefabcdefabcdefab"));
    }

    #[test]
    fn test_is_template_id_rejects_wrong_prefix() {
        assert!(!is_template_id("TMPL-ABCDEFABCDEFABCDEFABCDEFABCDEFAB"));
    }

    #[test]
    fn test_fresh_template_is_empty() {
        let template = ProvisioningTemplate::new();
        assert!(template.pages.is_empty());
        assert_eq!(template.version, crate::utils::config::SCHEMA_VERSION);
    }
}
