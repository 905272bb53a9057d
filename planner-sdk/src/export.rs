//! Roadmap export targets
//!
//! Copy and download are best-effort: a failing sink is reported through
//! `ExportOutcome::Failed` and a log line, never as an error the screen has
//! to handle.

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::{ErrorContext, Result, ServiceError};

/// Result of an export attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// The text was handed to the sink
    Exported,
    /// There was no successful roadmap to export
    NothingToExport,
    /// The sink refused; carries its message
    Failed(String),
}

impl ExportOutcome {
    pub fn is_exported(&self) -> bool {
        matches!(self, ExportOutcome::Exported)
    }
}

/// Somewhere text can be copied to
pub trait ClipboardSink {
    fn set_text(&mut self, text: &str) -> Result<()>;
}

/// Somewhere a named text file can be saved
pub trait DownloadSink {
    /// Save `contents` as `file_name`, returning where it landed
    fn save(&self, file_name: &str, contents: &str) -> Result<PathBuf>;
}

/// The system clipboard
pub struct ArboardClipboard {
    clipboard: arboard::Clipboard,
}

impl ArboardClipboard {
    pub fn new() -> Result<Self> {
        let clipboard = arboard::Clipboard::new().map_err(|e| {
            ServiceError::export(format!("Clipboard unavailable: {}", e))
                .with_context(ErrorContext::for_service("clipboard"))
        })?;
        Ok(Self { clipboard })
    }
}

impl ClipboardSink for ArboardClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        self.clipboard
            .set_text(text.to_string())
            .map_err(|e| ServiceError::export(format!("Failed to copy: {}", e)))
    }
}

/// Saves downloads into a fixed directory
#[derive(Debug, Clone)]
pub struct DirectoryDownloads {
    dir: PathBuf,
}

impl DirectoryDownloads {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl DownloadSink for DirectoryDownloads {
    fn save(&self, file_name: &str, contents: &str) -> Result<PathBuf> {
        let path = self.dir.join(file_name);
        fs::create_dir_all(&self.dir)
            .and_then(|_| fs::write(&path, contents))
            .map_err(|e| {
                ServiceError::export(format!("Failed to save {}: {}", file_name, e)).with_context(
                    ErrorContext::for_service("download").with("path", path.display()),
                )
            })?;
        debug!("Saved {} bytes to {}", contents.len(), path.display());
        Ok(path)
    }
}

/// `{topic}.txt`, or `roadmap.txt` for a blank topic
///
/// Characters that would escape or break a file name are replaced by `_`.
pub fn download_file_name(topic: &str) -> String {
    let topic = topic.trim();
    let stem: String = if topic.is_empty() {
        "roadmap".to_string()
    } else {
        topic
            .chars()
            .map(|c| match c {
                '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
                c if c.is_control() => '_',
                c => c,
            })
            .collect()
    };
    format!("{}.txt", stem)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_download_file_name() {
        assert_eq!(download_file_name("Rust"), "Rust.txt");
        assert_eq!(download_file_name("  Machine Learning "), "Machine Learning.txt");
        assert_eq!(download_file_name(""), "roadmap.txt");
        assert_eq!(download_file_name("   "), "roadmap.txt");
        assert_eq!(download_file_name("C/C++"), "C_C++.txt");
        assert_eq!(download_file_name("../etc"), ".._etc.txt");
    }
}
