use crate::adapters::outbound::console::{SilentProgressReporter, StderrProgressReporter};
use crate::adapters::outbound::filesystem::{
    FileContentScanner, ManifestFileReader, TarballReader, WalkDirLister,
};
use crate::adapters::outbound::layers::SignatureLayerAnalyzer;
use crate::adapters::outbound::license::{
    CorpusLicenseClassifier, DisabledLicenseClassifier, LicenseCorpus,
};
use crate::adapters::outbound::network::{
    CachingLicenseSource, RegistryClient, SpdxLicenseListClient,
};
use crate::application::dto::SbomOptions;
use crate::application::use_cases::SbomPorts;
use crate::ports::outbound::{LicenseClassifier, ProgressReporter};
use crate::shared::Result;
use std::path::Path;
use std::sync::Arc;

/// Factory wiring the default adapters into an `SbomPorts` bundle
pub struct PortsFactory;

impl PortsFactory {
    /// Builds the ports for one run
    ///
    /// With license scanning enabled the corpus directory is loaded,
    /// downloading the SPDX license list first when it is empty.
    ///
    /// # Arguments
    /// * `options` - Options of the run
    /// * `layer_signatures` - Optional JSON registry of known base-image layers
    /// * `quiet` - Suppress progress output
    pub async fn create(
        options: &SbomOptions,
        layer_signatures: Option<&Path>,
        quiet: bool,
    ) -> Result<SbomPorts> {
        let progress: Arc<dyn ProgressReporter> = if quiet {
            Arc::new(SilentProgressReporter)
        } else {
            Arc::new(StderrProgressReporter::new())
        };

        let classifier = Self::classifier(options, progress.as_ref()).await?;

        let layers = match layer_signatures {
            Some(path) => SignatureLayerAnalyzer::from_file(path)?,
            None => SignatureLayerAnalyzer::default(),
        };

        Ok(SbomPorts {
            lister: Arc::new(WalkDirLister::new()),
            scanner: Arc::new(FileContentScanner::new(Arc::clone(&classifier))),
            classifier,
            manifests: Arc::new(ManifestFileReader::new()),
            archives: Arc::new(TarballReader::new()),
            puller: Arc::new(RegistryClient::new()?),
            layers: Arc::new(layers),
            progress,
        })
    }

    async fn classifier(
        options: &SbomOptions,
        progress: &dyn ProgressReporter,
    ) -> Result<Arc<dyn LicenseClassifier>> {
        if !options.scan_licenses {
            tracing::debug!("license scanning disabled");
            return Ok(Arc::new(DisabledLicenseClassifier));
        }

        let corpus = LicenseCorpus::new(&options.license_data_dir);
        if !corpus.is_populated()? {
            progress.report(&format!(
                "📥 Downloading SPDX license list into {}",
                corpus.dir().display()
            ));
        }
        let source = CachingLicenseSource::new(SpdxLicenseListClient::new(
            &options.license_cache_dir,
        )?);
        let licenses = corpus.ensure(&source).await?;
        progress.report(&format!("📚 Loaded {} license text(s)", licenses.len()));
        Ok(Arc::new(CorpusLicenseClassifier::new(licenses)))
    }
}
