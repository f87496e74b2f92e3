use spdx_sbom::prelude::*;
use std::path::Path;

/// Mock LicenseClassifier matching files by marker text
///
/// A file matches license `id` when its content contains the marker
/// registered for it. The directory license comes from top-level files
/// whose name starts with LICENSE.
#[derive(Default, Clone)]
pub struct MockLicenseClassifier {
    markers: Vec<(String, String)>,
}

impl MockLicenseClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_license(mut self, id: &str, marker: &str) -> Self {
        self.markers.push((id.to_string(), marker.to_string()));
        self
    }
}

impl LicenseClassifier for MockLicenseClassifier {
    fn classify_file(&self, path: &Path) -> Result<Option<License>> {
        let content = std::fs::read_to_string(path).unwrap_or_default();
        Ok(self
            .markers
            .iter()
            .find(|(_, marker)| content.contains(marker.as_str()))
            .map(|(id, _)| License::new(id)))
    }

    fn classify_directory(&self, root: &Path) -> Result<Option<License>> {
        let mut candidates: Vec<_> = std::fs::read_dir(root)?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| {
                p.file_name()
                    .is_some_and(|n| n.to_string_lossy().to_uppercase().starts_with("LICENSE"))
            })
            .collect();
        candidates.sort();
        for candidate in candidates {
            if let Some(license) = self.classify_file(&candidate)? {
                return Ok(Some(license));
            }
        }
        Ok(None)
    }
}
