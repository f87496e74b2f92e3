use crate::adapters::outbound::filesystem::open_maybe_gzip;
use crate::ports::outbound::LayerAnalyzer;
use crate::sbom_generation::domain::{ChecksumAlgorithm, Checksums, Package};
use crate::shared::error::SbomError;
use crate::shared::security::read_metadata_file;
use crate::shared::Result;
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

/// Locations of the os-release file inside a root filesystem layer
const OS_RELEASE_PATHS: [&str; 2] = ["etc/os-release", "usr/lib/os-release"];

const MAX_OS_RELEASE_SIZE: u64 = 64 * 1024;

/// What is known about a published base-image layer
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LayerSignature {
    /// `sha256:<hex>` digest of the layer content
    pub digest: String,
    #[serde(default)]
    pub distribution: Option<String>,
    #[serde(default)]
    pub supplier: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Identity parsed from an os-release file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OsRelease {
    pub id: Option<String>,
    pub version_id: Option<String>,
    pub pretty_name: Option<String>,
}

impl OsRelease {
    pub fn parse(content: &str) -> Self {
        let mut release = Self::default();
        for line in content.lines() {
            let Some((key, value)) = line.trim().split_once('=') else {
                continue;
            };
            let value = value.trim().trim_matches('"').trim_matches('\'').to_string();
            match key {
                "ID" => release.id = Some(value),
                "VERSION_ID" => release.version_id = Some(value),
                "PRETTY_NAME" => release.pretty_name = Some(value),
                _ => {}
            }
        }
        release
    }

    /// e.g. `debian 11`
    pub fn distribution(&self) -> Option<String> {
        let id = self.id.as_ref()?;
        Some(match &self.version_id {
            Some(version) => format!("{} {}", id, version),
            None => id.clone(),
        })
    }
}

/// SignatureLayerAnalyzer adapter recognizing base-image layers
///
/// A layer is recognized either by its digest, looked up in a registry of
/// known signatures, or by an os-release file found in its file system.
/// Digest matches win over os-release sniffing.
#[derive(Debug, Default, Clone)]
pub struct SignatureLayerAnalyzer {
    signatures: HashMap<String, LayerSignature>,
}

impl SignatureLayerAnalyzer {
    pub fn new(signatures: Vec<LayerSignature>) -> Self {
        Self {
            signatures: signatures
                .into_iter()
                .map(|s| (normalize_digest(&s.digest), s))
                .collect(),
        }
    }

    /// Loads a JSON array of signatures
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = read_metadata_file(path, "layer signature registry")?;
        let signatures: Vec<LayerSignature> =
            serde_json::from_str(&content).map_err(|e| SbomError::Image {
                reference: path.display().to_string(),
                details: format!("Malformed layer signature registry: {}", e),
            })?;
        tracing::debug!(signatures = signatures.len(), "loaded layer signatures");
        Ok(Self::new(signatures))
    }

    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }

    /// SHA256 of the layer, taken from the package when already recorded
    fn layer_digest(layer_path: &Path, package: &Package) -> Result<String> {
        if let Some(sha256) = package.checksums().get(ChecksumAlgorithm::Sha256) {
            return Ok(sha256.to_string());
        }
        let file = std::fs::File::open(layer_path).map_err(|e| SbomError::FileSystem {
            path: layer_path.to_path_buf(),
            details: e.to_string(),
        })?;
        let sums = Checksums::from_reader(file).map_err(|e| SbomError::FileSystem {
            path: layer_path.to_path_buf(),
            details: e.to_string(),
        })?;
        Ok(sums
            .get(ChecksumAlgorithm::Sha256)
            .unwrap_or_default()
            .to_string())
    }

    /// Looks for an os-release file in the layer's tar stream
    fn sniff_os_release(layer_path: &Path) -> Result<Option<OsRelease>> {
        let reader = open_maybe_gzip(layer_path).map_err(|e| SbomError::FileSystem {
            path: layer_path.to_path_buf(),
            details: e.to_string(),
        })?;
        let mut archive = tar::Archive::new(reader);

        let entries = match archive.entries() {
            Ok(entries) => entries,
            Err(e) => {
                tracing::debug!(layer = %layer_path.display(), error = %e, "layer is not a tar stream");
                return Ok(None);
            }
        };

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::debug!(layer = %layer_path.display(), error = %e, "stopped reading layer");
                    return Ok(None);
                }
            };
            let name = match entry.path() {
                Ok(p) => p.to_string_lossy().trim_start_matches("./").to_string(),
                Err(_) => continue,
            };
            if !OS_RELEASE_PATHS.contains(&name.as_str()) || !entry.header().entry_type().is_file()
            {
                continue;
            }

            let mut content = String::new();
            entry
                .take(MAX_OS_RELEASE_SIZE)
                .read_to_string(&mut content)
                .map_err(|e| SbomError::FileSystem {
                    path: layer_path.to_path_buf(),
                    details: format!("Failed to read {}: {}", name, e),
                })?;
            return Ok(Some(OsRelease::parse(&content)));
        }
        Ok(None)
    }
}

fn normalize_digest(digest: &str) -> String {
    digest
        .strip_prefix("sha256:")
        .unwrap_or(digest)
        .to_ascii_lowercase()
}

impl LayerAnalyzer for SignatureLayerAnalyzer {
    fn analyze_layer(&self, layer_path: &Path, package: &mut Package) -> Result<bool> {
        if !self.signatures.is_empty() {
            let digest = Self::layer_digest(layer_path, package)?;
            if let Some(signature) = self.signatures.get(&normalize_digest(&digest)) {
                tracing::info!(layer = package.name(), digest = %digest, "known base image layer");
                if let Some(supplier) = &signature.supplier {
                    package.set_supplier(supplier.clone());
                }
                if let Some(description) = &signature.description {
                    package.set_comment(description.clone());
                }
                if let Some(distribution) = &signature.distribution {
                    package.image_mut().distribution = Some(distribution.clone());
                }
                return Ok(true);
            }
        }

        let Some(release) = Self::sniff_os_release(layer_path)? else {
            return Ok(false);
        };
        let Some(distribution) = release.distribution() else {
            return Ok(false);
        };

        tracing::debug!(layer = package.name(), %distribution, "os-release found in layer");
        package.image_mut().distribution = Some(distribution);
        if let Some(pretty) = release.pretty_name {
            package.set_comment(pretty);
        }
        Ok(true)
    }
}
