use crate::sbom_generation::domain::License;
use crate::shared::Result;
use std::path::Path;

/// LicenseClassifier port for matching content against a license corpus
///
/// A classifier with scanning disabled answers "no match" to every call.
pub trait LicenseClassifier: Send + Sync {
    /// Classifies a single file
    ///
    /// # Returns
    /// The matched license, or `None` when nothing in the corpus matches
    fn classify_file(&self, path: &Path) -> Result<Option<License>>;

    /// Determines the license of a whole directory from its top-level
    /// license files
    fn classify_directory(&self, root: &Path) -> Result<Option<License>>;
}
