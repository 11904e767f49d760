use crate::template;
use crate::utils::config::SCHEMA_VERSION;
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Validate a previously exported template document
pub fn validate_template_file(file_path: PathBuf) -> Result<()> {
    println!("Validating template: {}", file_path.display());

    let xml = std::fs::read_to_string(&file_path)
        .with_context(|| format!("Failed to read {}", file_path.display()))?;
    let parsed = template::from_xml(&xml)?;

    println!("✓ Valid template document");
    println!("  ID: {}", parsed.id);
    println!("  Version: {}", parsed.version);
    println!("  Pages: {}", parsed.pages.len());
    for page in &parsed.pages {
        let controls: usize = page
            .sections
            .iter()
            .flat_map(|s| &s.columns)
            .map(|c| c.controls.len())
            .sum();
        println!(
            "    {} ({} section(s), {} control(s))",
            page.page_name,
            page.sections.len(),
            controls
        );
    }

    Ok(())
}

/// Display version information
pub fn display_version() {
    println!("spo-page-export v{}", env!("CARGO_PKG_VERSION"));
    println!("Template Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Exports SharePoint Online client-side pages to provisioning templates.");
}
