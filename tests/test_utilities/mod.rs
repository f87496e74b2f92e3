/// Shared helpers for integration tests
pub mod mocks;

use mocks::{MockImagePuller, MockLicenseClassifier, MockProgressReporter};
use spdx_sbom::adapters::outbound::filesystem::{
    FileContentScanner, ManifestFileReader, TarballReader, WalkDirLister,
};
use spdx_sbom::adapters::outbound::layers::SignatureLayerAnalyzer;
use spdx_sbom::prelude::*;
use std::sync::Arc;

/// Default adapters for everything but the network-bound ports
pub fn test_ports(
    classifier: MockLicenseClassifier,
    puller: MockImagePuller,
    progress: MockProgressReporter,
) -> SbomPorts {
    let classifier: Arc<dyn LicenseClassifier> = Arc::new(classifier);
    SbomPorts {
        lister: Arc::new(WalkDirLister::new()),
        scanner: Arc::new(FileContentScanner::new(Arc::clone(&classifier))),
        classifier,
        manifests: Arc::new(ManifestFileReader::new()),
        archives: Arc::new(TarballReader::new()),
        puller: Arc::new(puller),
        layers: Arc::new(SignatureLayerAnalyzer::default()),
        progress: Arc::new(progress),
    }
}
