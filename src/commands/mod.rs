//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the various library components to perform user tasks.

pub mod export;
pub mod utils;

// Re-export main command functions
pub use export::{execute_export, validate_args, ExportArgs, ExportOutcome};
pub use utils::{display_version, validate_template_file};
