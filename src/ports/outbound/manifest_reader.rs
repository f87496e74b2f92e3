use crate::sbom_generation::domain::DependencyManifest;
use crate::shared::Result;
use std::path::Path;

/// DependencyManifestReader port for detecting and parsing build-tool
/// dependency manifests
pub trait DependencyManifestReader: Send + Sync {
    /// Reads the manifest found in `dir`
    ///
    /// # Returns
    /// `None` when the directory holds no supported manifest
    ///
    /// # Errors
    /// Returns an error if a manifest exists but cannot be read or parsed
    fn read_manifest(&self, dir: &Path) -> Result<Option<DependencyManifest>>;
}
