//! File input backed by paths on disk.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use filepost_core::{FileHandle, FileInput};

/// Files named on the command line, read eagerly so the selection is a
/// snapshot of their contents at startup.
pub struct PathInput {
    files: Vec<FileHandle>,
}

impl PathInput {
    pub async fn read(paths: &[PathBuf]) -> Result<Self> {
        let mut files = Vec::with_capacity(paths.len());
        for path in paths {
            let content = tokio::fs::read(path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?;
            debug!(path = %path.display(), bytes = content.len(), "Selected file");
            files.push(FileHandle::new(display_name(path), content));
        }
        Ok(Self { files })
    }
}

impl FileInput for PathInput {
    fn selected_files(&self) -> Vec<FileHandle> {
        self.files.clone()
    }
}

/// The name a browser would report for the file: its final path component.
fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}
