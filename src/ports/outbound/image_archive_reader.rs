use crate::shared::Result;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Contents of an extracted `docker save` image archive
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageArchive {
    pub repo_tags: Vec<String>,
    /// Name of the config blob inside the archive
    pub config: String,
    pub architecture: Option<String>,
    pub os: Option<String>,
    /// Layer names in manifest order, relative to the extraction root
    pub layers: Vec<String>,
}

impl ImageArchive {
    /// Absolute locations of the layers below `root`
    pub fn layer_paths(&self, root: &Path) -> Vec<PathBuf> {
        self.layers.iter().map(|l| root.join(l)).collect()
    }
}

/// ImageArchiveReader port for unpacking image tarballs
pub trait ImageArchiveReader: Send + Sync {
    /// Extracts a tarball into a fresh temporary directory, removed when
    /// the returned handle is dropped
    fn extract_to_temp(&self, tarball: &Path) -> Result<TempDir>;

    /// Parses the archive manifest and image config of an extracted tarball
    ///
    /// # Errors
    /// Returns an error if the manifest is missing, malformed or empty
    fn read_archive(&self, root: &Path) -> Result<ImageArchive>;
}
