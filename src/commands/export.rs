//! Export command implementation.
//!
//! The export command:
//! 1. Loads the extraction configuration (if one was supplied)
//! 2. Resolves the output path and asks before overwriting
//! 3. Builds a fresh template and creation information
//! 4. Runs the extraction engine
//! 5. Writes the XML to the output file, or returns it to the caller

use crate::config::ExtractConfiguration;
use crate::connectors::FileSystemConnector;
use crate::extract::{PageExtractor, TemplateCreationInfo};
use crate::template::{self, ProvisioningTemplate};
use crate::utils::scope::MonitoredScope;
use anyhow::{Context, Result};
use log::{debug, info};
use std::path::{Path, PathBuf};

/// Arguments for the export command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone, Default)]
pub struct ExportArgs {
    /// Site the page lives in
    pub site_url: String,

    /// Bearer token for the site, if any
    pub access_token: Option<String>,

    /// Name of the page to export
    pub page_name: String,

    /// Output file path (None = return the XML to the caller)
    pub out: Option<PathBuf>,

    /// Skip the overwrite confirmation
    pub force: bool,

    /// Persist branding files; `Some` only when explicitly supplied
    pub persist_branding_files: Option<bool>,

    /// Path to a JSON extraction-configuration file
    pub configuration: Option<PathBuf>,
}

/// What the export invocation ended up doing
#[derive(Debug, PartialEq)]
pub enum ExportOutcome {
    /// Template written to this file
    WrittenToFile(PathBuf),

    /// Template returned as an XML string (no output path was given)
    ReturnedAsValue(String),

    /// User declined the overwrite prompt; nothing written, nothing returned
    SkippedByUser,
}

/// Execute the export command
///
/// **Public** - main entry point called from main.rs
///
/// # Arguments
/// * `args` - Export command arguments
/// * `extractor` - Extraction engine (a fake in tests)
/// * `confirm_overwrite` - Asked once when the output file already exists
///   and `force` is not set; returning `false` skips the export
///
/// # Errors
/// * Unreadable or malformed configuration file
/// * Page lookup / extraction failures
/// * File write errors
pub fn execute_export<E: PageExtractor>(
    args: &ExportArgs,
    extractor: &E,
    confirm_overwrite: impl FnOnce(&Path) -> Result<bool>,
) -> Result<ExportOutcome> {
    let page_name = normalize_page_name(&args.page_name);

    info!("Exporting page {} from {}", page_name, args.site_url);

    // Step 1: Load configuration (if supplied)
    let configuration = match &args.configuration {
        Some(path) => {
            info!("Loading extraction configuration: {}", path.display());
            Some(
                ExtractConfiguration::from_file(path).with_context(|| {
                    format!("Failed to load configuration file {}", path.display())
                })?,
            )
        }
        None => None,
    };

    // Step 2: Resolve the output path and confirm overwrites
    let out = match &args.out {
        Some(out) => {
            let resolved = resolve_out_path(out)?;
            if resolved.exists() && !args.force && !confirm_overwrite(&resolved)? {
                info!("Overwrite declined, nothing exported");
                return Ok(ExportOutcome::SkippedByUser);
            }
            Some(resolved)
        }
        None => None,
    };

    // Step 3-4: Extract into a fresh template
    let out_dir = out.as_deref().and_then(Path::parent);
    let template = extract_template(args, extractor, &page_name, configuration, out_dir)?;

    debug!("Template {} populated with {} page(s)", template.id, template.pages.len());

    // Step 5: Serialize and route the document
    let xml = template::to_xml(&template).context("Failed to serialize the template")?;

    match out {
        Some(path) => {
            std::fs::write(&path, &xml)
                .with_context(|| format!("Failed to write template to {}", path.display()))?;
            info!("✓ Template written to: {}", path.display());
            Ok(ExportOutcome::WrittenToFile(path))
        }
        None => Ok(ExportOutcome::ReturnedAsValue(xml)),
    }
}

/// Build the template and creation information, then run the engine
fn extract_template<E: PageExtractor>(
    args: &ExportArgs,
    extractor: &E,
    page_name: &str,
    configuration: Option<ExtractConfiguration>,
    out_dir: Option<&Path>,
) -> Result<ProvisioningTemplate> {
    let mut template = ProvisioningTemplate::new();

    let mut info = match configuration {
        Some(config) => config.to_creation_info(&args.site_url),
        None => TemplateCreationInfo::new(&args.site_url),
    };

    // An explicit switch beats whatever the configuration file said
    if let Some(persist) = args.persist_branding_files {
        info.persist_branding_files = persist;
    }

    // Assets can only be persisted next to an output file
    if let Some(dir) = out_dir {
        info.file_connector = Some(Box::new(FileSystemConnector::new(dir)));
    }

    let scope = MonitoredScope::new(format!("Extract {}", page_name));
    extractor
        .extract_page(&info, &mut template, page_name, &scope)
        .with_context(|| format!("Failed to extract page {}", page_name))?;

    Ok(template)
}

/// Validate export arguments
///
/// **Public** - can be called before execute_export for early validation
pub fn validate_args(args: &ExportArgs) -> Result<()> {
    if args.site_url.is_empty() {
        anyhow::bail!("Site URL cannot be empty");
    }

    if !args.site_url.starts_with("http://") && !args.site_url.starts_with("https://") {
        anyhow::bail!("Site URL must start with http:// or https://");
    }

    if args.page_name.trim().is_empty() {
        anyhow::bail!("Page name cannot be empty");
    }

    if args.page_name.contains('/') || args.page_name.contains('\\') {
        anyhow::bail!("Page name must be a file name, not a path");
    }

    Ok(())
}

/// Append `.aspx` when the page name has no extension
pub fn normalize_page_name(name: &str) -> String {
    if name.to_ascii_lowercase().ends_with(".aspx") {
        name.to_string()
    } else {
        format!("{}.aspx", name)
    }
}

/// Resolve an output path to absolute form against the current directory
fn resolve_out_path(out: &Path) -> Result<PathBuf> {
    if out.is_absolute() {
        Ok(out.to_path_buf())
    } else {
        let cwd = std::env::current_dir().context("Cannot determine the current directory")?;
        Ok(cwd.join(out))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_args() -> ExportArgs {
        ExportArgs {
            site_url: "https://contoso.sharepoint.com/sites/marketing".to_string(),
            page_name: "Home.aspx".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_validate_args_valid() {
        assert!(validate_args(&valid_args()).is_ok());
    }

    #[test]
    fn test_validate_args_empty_site() {
        let args = ExportArgs {
            site_url: String::new(),
            ..valid_args()
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_invalid_site_scheme() {
        let args = ExportArgs {
            site_url: "ftp://contoso.sharepoint.com".to_string(),
            ..valid_args()
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_empty_page() {
        let args = ExportArgs {
            page_name: "  ".to_string(),
            ..valid_args()
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_page_with_path() {
        let args = ExportArgs {
            page_name: "SitePages/Home.aspx".to_string(),
            ..valid_args()
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_normalize_page_name_appends_extension() {
        assert_eq!(normalize_page_name("Home"), "Home.aspx");
    }

    #[test]
    fn test_normalize_page_name_keeps_extension() {
        assert_eq!(normalize_page_name("Home.aspx"), "Home.aspx");
        assert_eq!(normalize_page_name("Home.ASPX"), "Home.ASPX");
    }

    #[test]
    fn test_resolve_out_path_relative() {
        let resolved = resolve_out_path(Path::new("template.xml")).unwrap();
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(resolved, cwd.join("template.xml"));
    }

    #[test]
    fn test_resolve_out_path_absolute() {
        let resolved = resolve_out_path(Path::new("/tmp/template.xml")).unwrap();
        assert_eq!(resolved, PathBuf::from("/tmp/template.xml"));
    }
}
