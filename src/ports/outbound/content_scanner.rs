use crate::sbom_generation::domain::File;
use crate::shared::Result;
use std::path::PathBuf;

/// One unit of work for a content scanner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanRequest {
    /// Identifier allocated for the resulting file
    pub id: String,
    /// Display name, relative to the scanned root
    pub name: String,
    /// Location of the content on disk
    pub path: PathBuf,
    /// Concluded license of the enclosing directory
    pub directory_license: Option<String>,
    /// Run license classification on the content
    pub classify: bool,
}

impl ScanRequest {
    pub fn new(id: impl Into<String>, name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            path: path.into(),
            directory_license: None,
            classify: true,
        }
    }

    pub fn with_directory_license(mut self, license: Option<String>) -> Self {
        self.directory_license = license;
        self
    }

    pub fn without_classification(mut self) -> Self {
        self.classify = false;
        self
    }
}

/// ContentScanner port for turning one file on disk into a File element
///
/// Implementations are called from several worker threads at once.
pub trait ContentScanner: Send + Sync {
    /// Checksums the content and classifies its license
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or classification fails
    fn scan(&self, request: &ScanRequest) -> Result<File>;
}
