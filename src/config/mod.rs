//! Extraction configuration loaded from a user-supplied JSON file.
//!
//! Mirrors the JSON shape the provisioning tooling ecosystem uses: camelCase
//! keys, everything optional, unknown keys ignored.

use crate::extract::TemplateCreationInfo;
use crate::utils::error::ConfigError;
use serde::Deserialize;
use std::path::Path;

/// Settings controlling what a template extraction captures
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExtractConfiguration {
    /// Download branding files referenced by the page
    pub persist_branding_files: Option<bool>,

    /// Download other asset files referenced by the page
    pub persist_asset_files: Option<bool>,

    /// Page-specific settings
    pub pages: Option<PagesConfiguration>,
}

/// Page-specific extraction settings
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PagesConfiguration {
    /// Leave the page author out of the template
    pub exclude_author_information: bool,
}

impl ExtractConfiguration {
    /// Parse a configuration from JSON text
    pub fn from_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a configuration file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_str(&contents)
    }

    /// Convert into the creation information handed to the extraction engine
    pub fn to_creation_info(&self, site_url: impl Into<String>) -> TemplateCreationInfo {
        let mut info = TemplateCreationInfo::new(site_url);
        info.persist_branding_files = self
            .persist_branding_files
            .or(self.persist_asset_files)
            .unwrap_or(false);
        if let Some(pages) = &self.pages {
            info.exclude_author_information = pages.exclude_author_information;
        }
        info
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_configuration() {
        let json = r#"{
            "persistBrandingFiles": true,
            "pages": { "excludeAuthorInformation": true }
        }"#;

        let config = ExtractConfiguration::from_str(json).unwrap();
        assert_eq!(config.persist_branding_files, Some(true));
        assert!(config.pages.unwrap().exclude_author_information);
    }

    #[test]
    fn test_parse_empty_object() {
        let config = ExtractConfiguration::from_str("{}").unwrap();
        assert_eq!(config.persist_branding_files, None);
        assert!(config.pages.is_none());
    }

    #[test]
    fn test_parse_ignores_unknown_keys() {
        let config = ExtractConfiguration::from_str(r#"{"lists":{"includeHidden":true}}"#).unwrap();
        assert_eq!(config.persist_branding_files, None);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(ExtractConfiguration::from_str("{not json").is_err());
    }

    #[test]
    fn test_to_creation_info_applies_settings() {
        let config = ExtractConfiguration::from_str(
            r#"{"persistBrandingFiles": true, "pages": {"excludeAuthorInformation": true}}"#,
        )
        .unwrap();

        let info = config.to_creation_info("https://contoso.sharepoint.com/sites/a");
        assert!(info.persist_branding_files);
        assert!(info.exclude_author_information);
    }

    #[test]
    fn test_to_creation_info_defaults_off() {
        let config = ExtractConfiguration::from_str("{}").unwrap();
        let info = config.to_creation_info("https://contoso.sharepoint.com/sites/a");
        assert!(!info.persist_branding_files);
        assert!(!info.exclude_author_information);
    }

    #[test]
    fn test_persist_asset_files_fallback() {
        let config = ExtractConfiguration::from_str(r#"{"persistAssetFiles": true}"#).unwrap();
        let info = config.to_creation_info("https://contoso.sharepoint.com/sites/a");
        assert!(info.persist_branding_files);
    }
}
