use crate::ports::outbound::{
    ContentScanner, DependencyManifestReader, DirectoryLister, ImageArchiveReader, ImagePuller,
    LayerAnalyzer, LicenseClassifier, ProgressReporter,
};
use std::sync::Arc;

/// Capabilities a construction call depends on
///
/// Built once (see `PortsFactory`) and shared by every builder of the run.
/// Tests swap single fields for doubles.
#[derive(Clone)]
pub struct SbomPorts {
    pub lister: Arc<dyn DirectoryLister>,
    pub scanner: Arc<dyn ContentScanner>,
    pub classifier: Arc<dyn LicenseClassifier>,
    pub manifests: Arc<dyn DependencyManifestReader>,
    pub archives: Arc<dyn ImageArchiveReader>,
    pub puller: Arc<dyn ImagePuller>,
    pub layers: Arc<dyn LayerAnalyzer>,
    pub progress: Arc<dyn ProgressReporter>,
}
