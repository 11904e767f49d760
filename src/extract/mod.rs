//! Page-to-template extraction engine.
//!
//! `PageExtractor` is the seam between the export command and the engine:
//! the command builds a template shell and creation information, the engine
//! populates the template in place. Tests substitute a capturing fake.

pub mod canvas;
pub mod engine;

pub use engine::ClientSidePageExtractor;

use crate::connectors::FileConnector;
use crate::template::ProvisioningTemplate;
use crate::utils::error::ExtractError;
use crate::utils::scope::MonitoredScope;

/// Settings for one extraction run
pub struct TemplateCreationInfo {
    /// Site the page lives in
    pub site_url: String,

    /// Download branding assets referenced by the page
    pub persist_branding_files: bool,

    /// Leave the page author out of the template
    pub exclude_author_information: bool,

    /// Where persisted assets go; `None` when no output directory was given
    pub file_connector: Option<Box<dyn FileConnector>>,
}

impl TemplateCreationInfo {
    /// Default creation information bound to a site
    pub fn new(site_url: impl Into<String>) -> Self {
        Self {
            site_url: site_url.into(),
            persist_branding_files: false,
            exclude_author_information: false,
            file_connector: None,
        }
    }
}

/// Populates a provisioning template from a named page
pub trait PageExtractor {
    /// Extract one page into the template.
    ///
    /// Mutates `template` in place; `info` carries the extraction settings
    /// and the optional asset connector.
    fn extract_page(
        &self,
        info: &TemplateCreationInfo,
        template: &mut ProvisioningTemplate,
        page_name: &str,
        scope: &MonitoredScope,
    ) -> Result<(), ExtractError>;
}
