//! spo-page-export CLI
//!
//! Exports SharePoint Online client-side pages to reusable
//! provisioning-template XML documents.

use anyhow::Result;
use clap::{Parser, Subcommand};
use dialoguer::{theme::ColorfulTheme, Confirm};
use env_logger::Env;
use std::path::{Path, PathBuf};

use spo_page_export::client::SiteClient;
use spo_page_export::commands::{
    display_version, execute_export, validate_args, validate_template_file, ExportArgs,
    ExportOutcome,
};
use spo_page_export::extract::ClientSidePageExtractor;

/// spo-page-export - Export client-side pages to provisioning templates
#[derive(Parser, Debug)]
#[command(name = "spo-page-export")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Export a client-side page to a provisioning template
    Export {
        /// The name of the page, e.g. Home.aspx
        page: String,

        /// Site URL the page lives in
        #[arg(short, long, env = "SPO_SITE_URL")]
        site: String,

        /// Bearer token for the site
        #[arg(long, env = "SPO_ACCESS_TOKEN", hide_env_values = true)]
        access_token: Option<String>,

        /// Save the template to this file instead of printing it
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Overwrite an existing output file without asking
        #[arg(short, long)]
        force: bool,

        /// Export referenced branding files next to the output file
        #[arg(long, num_args = 0..=1, default_missing_value = "true")]
        persist_branding_files: Option<bool>,

        /// JSON configuration file controlling the extraction
        #[arg(short, long)]
        configuration: Option<PathBuf>,
    },

    /// Validate an exported template document
    Validate {
        /// Path to the template XML file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Export {
            page,
            site,
            access_token,
            out,
            force,
            persist_branding_files,
            configuration,
        } => {
            let args = ExportArgs {
                site_url: site,
                access_token,
                page_name: page,
                out,
                force,
                persist_branding_files,
                configuration,
            };

            // Validate args first
            validate_args(&args)?;

            let client = SiteClient::new(&args.site_url, args.access_token.clone())?;
            let extractor = ClientSidePageExtractor::new(client);

            match execute_export(&args, &extractor, prompt_overwrite)? {
                ExportOutcome::ReturnedAsValue(xml) => println!("{}", xml),
                // Declining the overwrite is a silent no-op; a written file
                // was already reported through the log
                ExportOutcome::WrittenToFile(_) | ExportOutcome::SkippedByUser => {}
            }
        }

        Commands::Validate { file } => {
            validate_template_file(file)?;
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}

/// Ask whether an existing output file may be overwritten
fn prompt_overwrite(path: &Path) -> Result<bool> {
    Ok(Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(format!("File {} exists. Overwrite?", path.display()))
        .default(false)
        .interact()?)
}
