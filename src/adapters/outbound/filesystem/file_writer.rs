use crate::ports::outbound::OutputPresenter;
use crate::shared::error::SbomError;
use crate::shared::Result;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// FileSystemWriter adapter for writing documents to files
///
/// Content goes to a temporary file next to the destination which is then
/// renamed over it, so the destination either holds the complete document
/// or is left as it was.
pub struct FileSystemWriter {
    output_path: PathBuf,
}

impl FileSystemWriter {
    pub fn new(output_path: PathBuf) -> Self {
        Self { output_path }
    }

    fn error(&self, details: impl Into<String>) -> anyhow::Error {
        SbomError::Serialization {
            path: self.output_path.clone(),
            details: details.into(),
        }
        .into()
    }

    fn parent_directory(&self) -> &Path {
        match self.output_path.parent() {
            Some(parent) if parent != Path::new("") => parent,
            _ => Path::new("."),
        }
    }

    /// Validates that the parent directory exists before writing
    fn validate_parent_directory(&self) -> Result<()> {
        let parent = self.parent_directory();
        if !parent.is_dir() {
            return Err(self.error(format!(
                "Parent directory does not exist: {}",
                parent.display()
            )));
        }
        Ok(())
    }

    /// Security validation before writing: reject an output path that is a
    /// symbolic link
    fn validate_output_security(&self) -> Result<()> {
        if let Ok(metadata) = fs::symlink_metadata(&self.output_path) {
            if metadata.is_symlink() {
                return Err(self.error(
                    "Security: Output path is a symbolic link. For security reasons, writing to symbolic links is not allowed.",
                ));
            }
        }
        Ok(())
    }

    /// Writes `content` atomically to the output path
    pub fn write_atomic(&self, content: &str) -> Result<()> {
        self.validate_parent_directory()?;
        self.validate_output_security()?;

        let mut temp = NamedTempFile::new_in(self.parent_directory())
            .map_err(|e| self.error(format!("Failed to create temporary file: {}", e)))?;
        temp.write_all(content.as_bytes())
            .and_then(|_| temp.as_file().sync_all())
            .map_err(|e| self.error(e.to_string()))?;
        temp.persist(&self.output_path)
            .map_err(|e| self.error(e.error.to_string()))?;

        tracing::info!(path = %self.output_path.display(), bytes = content.len(), "wrote document");
        Ok(())
    }
}

impl OutputPresenter for FileSystemWriter {
    fn present(&self, content: &str) -> Result<()> {
        self.write_atomic(content)?;
        eprintln!("✅ Output complete: {}", self.output_path.display());
        Ok(())
    }
}

/// StdoutPresenter adapter for writing output to stdout
///
/// This adapter implements the OutputPresenter port for stdout output.
pub struct StdoutPresenter;

impl StdoutPresenter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for StdoutPresenter {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputPresenter for StdoutPresenter {
    fn present(&self, content: &str) -> Result<()> {
        io::stdout()
            .write_all(content.as_bytes())
            .map_err(|e| anyhow::anyhow!("Failed to write to stdout: {}", e))?;
        Ok(())
    }
}
