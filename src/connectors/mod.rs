//! File connector abstraction for persisting referenced assets.
//!
//! The extraction engine hands every branding file it downloads to a
//! connector; the command attaches a file-system connector rooted at the
//! output directory so assets land next to the template.

use crate::utils::error::ConnectorError;
use log::{debug, info};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Destination for files referenced by an exported page
pub trait FileConnector {
    /// Persist one file under the connector root
    fn save(&self, file_name: &str, data: &[u8]) -> Result<(), ConnectorError>;

    /// Human-readable description of where files go (for logging)
    fn describe(&self) -> String;
}

/// Connector that writes files into a local directory
pub struct FileSystemConnector {
    root: PathBuf,
}

impl FileSystemConnector {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl FileConnector for FileSystemConnector {
    fn save(&self, file_name: &str, data: &[u8]) -> Result<(), ConnectorError> {
        if file_name.is_empty() {
            return Err(ConnectorError::InvalidPath("file name is empty".to_string()));
        }
        // Server-relative URLs must not climb out of the root
        if file_name.contains("..") {
            return Err(ConnectorError::InvalidPath(format!(
                "file name escapes the connector root: {}",
                file_name
            )));
        }

        let target = self.root.join(file_name);

        if let Some(parent) = target.parent() {
            if !parent.exists() {
                debug!("Creating parent directories: {}", parent.display());
                std::fs::create_dir_all(parent)?;
            }
        }

        let file = File::create(&target)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(data)?;
        writer.flush()?;

        info!("Saved {} ({} bytes)", target.display(), data.len());
        Ok(())
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let connector = FileSystemConnector::new(dir.path());

        connector.save("hero.jpg", b"jpeg bytes").unwrap();

        let written = std::fs::read(dir.path().join("hero.jpg")).unwrap();
        assert_eq!(written, b"jpeg bytes");
    }

    #[test]
    fn test_save_creates_nested_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let connector = FileSystemConnector::new(dir.path());

        connector.save("assets/img/hero.jpg", b"x").unwrap();

        assert!(dir.path().join("assets/img/hero.jpg").exists());
    }

    #[test]
    fn test_save_rejects_empty_name() {
        let dir = tempfile::tempdir().unwrap();
        let connector = FileSystemConnector::new(dir.path());

        assert!(connector.save("", b"x").is_err());
    }

    #[test]
    fn test_save_rejects_parent_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let connector = FileSystemConnector::new(dir.path());

        assert!(connector.save("../escape.bin", b"x").is_err());
    }
}
