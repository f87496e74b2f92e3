use crate::sbom_generation::domain::Package;
use crate::shared::Result;
use std::path::Path;

/// LayerAnalyzer port for enriching layer packages with what is known about
/// their content
pub trait LayerAnalyzer: Send + Sync {
    /// Inspects the layer at `layer_path` and annotates `package`.
    /// Checksums already recorded on the package are left untouched.
    ///
    /// # Returns
    /// `true` when the layer was recognized
    fn analyze_layer(&self, layer_path: &Path, package: &mut Package) -> Result<bool>;
}
