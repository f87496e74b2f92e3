use std::path::PathBuf;

/// Options recognized by every package construction call
///
/// A value is built once at the top of a call and passed down by
/// reference; there is no process-wide default instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SbomOptions {
    /// Run layer analysis on image layers
    pub analyze_layers: bool,
    /// Do not read `<root>/.gitignore`
    pub no_gitignore: bool,
    /// Resolve dependency manifests into sub-packages
    pub process_dependencies: bool,
    /// Record only direct dependencies
    pub only_direct_deps: bool,
    /// Classify file licenses
    pub scan_licenses: bool,
    /// Download cache for license list documents
    pub license_cache_dir: PathBuf,
    /// Corpus of `<ID>.txt` license texts
    pub license_data_dir: PathBuf,
    /// Extra ignore patterns, in gitignore syntax
    pub ignore_patterns: Vec<String>,
}

impl Default for SbomOptions {
    fn default() -> Self {
        let spdx_temp = std::env::temp_dir().join("spdx");
        Self {
            analyze_layers: true,
            no_gitignore: false,
            process_dependencies: true,
            only_direct_deps: false,
            scan_licenses: true,
            license_cache_dir: spdx_temp.join("downloadCache"),
            license_data_dir: spdx_temp.join("licenses"),
            ignore_patterns: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = SbomOptions::default();
        assert!(options.analyze_layers);
        assert!(!options.no_gitignore);
        assert!(options.process_dependencies);
        assert!(!options.only_direct_deps);
        assert!(options.scan_licenses);
        assert!(options.license_cache_dir.ends_with("spdx/downloadCache"));
        assert!(options.license_data_dir.ends_with("spdx/licenses"));
        assert!(options.ignore_patterns.is_empty());
    }
}
