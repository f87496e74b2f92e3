use crate::shared::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// One image written to a local archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveDescriptor {
    /// Digest reference of the pulled image
    pub reference: String,
    pub archive_path: PathBuf,
    pub architecture: Option<String>,
    pub os: Option<String>,
}

/// ImagePuller port for fetching container images
///
/// # Async Support
/// Implementations must be `Send + Sync` to support concurrent access.
#[async_trait]
pub trait ImagePuller: Send + Sync {
    /// Pulls `reference` into archives below `destination`
    ///
    /// # Returns
    /// One descriptor for a single image, one per platform for an index
    ///
    /// # Errors
    /// Returns an error if the reference cannot be resolved or an archive
    /// cannot be written
    async fn pull_to_archives(
        &self,
        reference: &str,
        destination: &Path,
    ) -> Result<Vec<ArchiveDescriptor>>;
}
