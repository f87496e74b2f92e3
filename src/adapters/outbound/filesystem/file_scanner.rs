use crate::ports::outbound::{ContentScanner, LicenseClassifier, ScanRequest};
use crate::sbom_generation::domain::{Checksums, File};
use crate::sbom_generation::policies::LicenseConclusion;
use crate::shared::error::SbomError;
use crate::shared::Result;
use anyhow::Context;
use std::fs;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

/// FileContentScanner adapter reading files from disk
///
/// Every file gets SHA1, SHA256 and SHA512 checksums. License values are
/// decided by the `LicenseConclusion` policy from the classifier's answer.
#[derive(Clone)]
pub struct FileContentScanner {
    classifier: Arc<dyn LicenseClassifier>,
}

impl FileContentScanner {
    pub fn new(classifier: Arc<dyn LicenseClassifier>) -> Self {
        Self { classifier }
    }
}

/// Computes the checksums of a file on disk
pub fn checksum_file(path: &Path) -> Result<Checksums> {
    let file = fs::File::open(path).map_err(|e| SbomError::FileSystem {
        path: path.to_path_buf(),
        details: format!("Failed to open file: {}", e),
    })?;
    Checksums::from_reader(BufReader::new(file)).map_err(|e| {
        SbomError::FileSystem {
            path: path.to_path_buf(),
            details: format!("Failed to read file: {}", e),
        }
        .into()
    })
}

impl ContentScanner for FileContentScanner {
    fn scan(&self, request: &ScanRequest) -> Result<File> {
        let found = if request.classify {
            self.classifier
                .classify_file(&request.path)
                .with_context(|| format!("scanning {} for licenses", request.name))?
        } else {
            None
        };

        let checksums = checksum_file(&request.path)
            .with_context(|| format!("checksumming {}", request.name))?;

        let mut file = File::new(&request.name)
            .with_id(&request.id)
            .with_source_path(&request.path);
        file.set_checksums(checksums);

        if request.classify {
            let licenses = LicenseConclusion::for_file(
                found.as_ref().map(|l| l.id()),
                request.directory_license.as_deref(),
            );
            file.set_license_info_in_file(licenses.info_in_file);
            file.set_license_concluded(licenses.concluded);
        }

        tracing::trace!(file = %request.name, id = %request.id, "scanned file");
        Ok(file)
    }
}
