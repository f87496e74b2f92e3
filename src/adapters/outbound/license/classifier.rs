use crate::ports::outbound::LicenseClassifier;
use crate::sbom_generation::domain::License;
use crate::sbom_generation::services::LicenseMatcher;
use crate::shared::error::SbomError;
use crate::shared::Result;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Lowercased name prefixes of files holding a directory's license
const LICENSE_FILE_PREFIXES: [&str; 3] = ["license", "licence", "copying"];

/// Files larger than this are not classified
const MAX_CLASSIFIED_FILE_SIZE: u64 = 1024 * 1024;

/// CorpusLicenseClassifier adapter matching content against a license corpus
pub struct CorpusLicenseClassifier {
    matcher: LicenseMatcher,
    licenses: HashMap<String, License>,
}

impl CorpusLicenseClassifier {
    pub fn new(corpus: Vec<License>) -> Self {
        let matcher = LicenseMatcher::new(&corpus);
        let licenses = corpus
            .into_iter()
            .map(|l| (l.id().to_string(), l))
            .collect();
        Self { matcher, licenses }
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.matcher = self.matcher.with_threshold(threshold);
        self
    }

    pub fn corpus_size(&self) -> usize {
        self.matcher.len()
    }

    /// Classifies text already in memory
    pub fn classify_text(&self, text: &str) -> Option<License> {
        let found = self.matcher.classify(text)?;
        tracing::trace!(
            license = %found.license_id,
            confidence = found.confidence,
            "license matched"
        );
        self.licenses.get(&found.license_id).cloned()
    }

    /// Top-level files of `root` that look like license files, sorted by name
    fn license_files(root: &Path) -> Result<Vec<PathBuf>> {
        let entries = fs::read_dir(root).map_err(|e| SbomError::FileSystem {
            path: root.to_path_buf(),
            details: format!("Failed to list directory: {}", e),
        })?;

        let mut files: Vec<PathBuf> = entries
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_ok_and(|t| t.is_file()))
            .filter(|e| {
                let name = e.file_name().to_string_lossy().to_lowercase();
                LICENSE_FILE_PREFIXES.iter().any(|p| name.starts_with(p))
            })
            .map(|e| e.path())
            .collect();
        files.sort();
        Ok(files)
    }
}

impl LicenseClassifier for CorpusLicenseClassifier {
    fn classify_file(&self, path: &Path) -> Result<Option<License>> {
        let metadata = fs::metadata(path).map_err(|e| SbomError::FileSystem {
            path: path.to_path_buf(),
            details: e.to_string(),
        })?;
        if metadata.len() > MAX_CLASSIFIED_FILE_SIZE {
            tracing::debug!(path = %path.display(), size = metadata.len(), "too large to classify");
            return Ok(None);
        }

        let bytes = fs::read(path).map_err(|e| SbomError::FileSystem {
            path: path.to_path_buf(),
            details: e.to_string(),
        })?;
        Ok(self.classify_text(&String::from_utf8_lossy(&bytes)))
    }

    fn classify_directory(&self, root: &Path) -> Result<Option<License>> {
        for candidate in Self::license_files(root)? {
            if let Some(license) = self.classify_file(&candidate)? {
                tracing::debug!(
                    file = %candidate.display(),
                    license = license.id(),
                    "directory license found"
                );
                return Ok(Some(license));
            }
        }
        Ok(None)
    }
}

/// Classifier used when license scanning is turned off: nothing matches
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledLicenseClassifier;

impl LicenseClassifier for DisabledLicenseClassifier {
    fn classify_file(&self, _path: &Path) -> Result<Option<License>> {
        Ok(None)
    }

    fn classify_directory(&self, _root: &Path) -> Result<Option<License>> {
        Ok(None)
    }
}
