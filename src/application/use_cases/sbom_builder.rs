use super::{FileScanCoordinator, SbomPorts};
use crate::application::dto::{ArchiveDescriptor, SbomOptions};
use crate::ports::outbound::ScanRequest;
use crate::sbom_generation::domain::{
    build_id_string, File, IdAllocator, ImageMetadata, Package,
};
use crate::sbom_generation::policies::LicenseConclusion;
use crate::sbom_generation::services::{DependencyAnalyzer, IgnorePatterns};
use crate::shared::error::SbomError;
use crate::shared::security::{portable_name, validate_directory, validate_regular_file};
use crate::shared::Result;
use anyhow::Context;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

/// SbomBuilder - Turns directories, image tarballs, image references and
/// single files into document elements
///
/// Every operation takes its options explicitly; the builder itself only
/// holds the injected ports.
pub struct SbomBuilder {
    ports: SbomPorts,
}

impl SbomBuilder {
    pub fn new(ports: SbomPorts) -> Self {
        Self { ports }
    }

    pub fn ports(&self) -> &SbomPorts {
        &self.ports
    }

    fn coordinator(&self) -> FileScanCoordinator {
        FileScanCoordinator::new(Arc::clone(&self.ports.scanner))
            .with_progress(Arc::clone(&self.ports.progress))
    }

    /// Builds a package describing every non-ignored file below `dir`
    ///
    /// # Steps
    /// 1. Compile the ignore rules and filter the directory listing
    /// 2. Classify the directory license from its top-level license files
    /// 3. Scan every file on the worker pool
    /// 4. Resolve the dependency manifest into `DEPENDS_ON` sub-packages
    ///
    /// # Errors
    /// Any failure in these steps; no package is returned in that case
    pub async fn package_from_directory(
        &self,
        dir: &Path,
        options: &SbomOptions,
    ) -> Result<Package> {
        let root = validate_directory(dir)?;
        let name = root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| root.display().to_string());
        let progress = &self.ports.progress;

        progress.report(&format!("📂 Scanning directory: {}", root.display()));

        let ignore = IgnorePatterns::new(&root, &options.ignore_patterns, options.no_gitignore)
            .with_context(|| format!("Failed to compile ignore rules for {}", root.display()))?;
        let listed = self
            .ports
            .lister
            .list_files(&root)
            .with_context(|| format!("Failed to list {}", root.display()))?;
        let listed_count = listed.len();
        let mut files = ignore.filter(listed);
        files.sort();

        for pattern in ignore.unmatched_patterns() {
            progress.report(&format!(
                "⚠️  Warning: Ignore pattern '{}' did not match any files.",
                pattern
            ));
        }
        tracing::info!(
            directory = %root.display(),
            listed = listed_count,
            kept = files.len(),
            "filtered directory listing"
        );

        let directory_license = if options.scan_licenses {
            self.ports
                .classifier
                .classify_directory(&root)
                .with_context(|| format!("Failed to classify license of {}", root.display()))?
                .map(|license| license.id().to_string())
        } else {
            None
        };
        if let Some(license) = &directory_license {
            progress.report(&format!("📜 Directory license: {}", license));
        }

        let mut package = Package::new(&name);
        package.set_files_analyzed(true);
        package.set_license_concluded(LicenseConclusion::for_package(
            directory_license.as_deref(),
        ));

        let mut ids = IdAllocator::new();
        let requests: Vec<ScanRequest> = files
            .iter()
            .map(|relative| {
                let display = portable_name(relative);
                let id = ids.allocate(&["SPDXRef-File", &name, &display]);
                let request = ScanRequest::new(id, display, root.join(relative));
                if options.scan_licenses {
                    request.with_directory_license(directory_license.clone())
                } else {
                    request.without_classification()
                }
            })
            .collect();

        let mut package = self
            .coordinator()
            .scan_into(package, requests)
            .await
            .with_context(|| format!("Failed to build package from {}", root.display()))?;

        if options.process_dependencies {
            let manifest = self
                .ports
                .manifests
                .read_manifest(&root)
                .with_context(|| format!("Failed to resolve dependencies of {}", root.display()))?;
            if let Some(manifest) = manifest {
                let dependencies = DependencyAnalyzer::packages(&manifest, options.only_direct_deps);
                progress.report(&format!(
                    "🔗 Resolved {} dependenc{} from {}",
                    dependencies.len(),
                    if dependencies.len() == 1 { "y" } else { "ies" },
                    manifest.kind()
                ));
                for dependency in dependencies {
                    package.add_dependency(dependency);
                }
            }
        }

        progress.report_completion(&format!(
            "✅ Package {}: {} file(s)",
            package.name(),
            package.file_count()
        ));
        Ok(package)
    }

    /// Builds a package for a `docker save` tarball with one `CONTAINS`
    /// sub-package per layer
    pub async fn package_from_image_tarball(
        &self,
        tarball: &Path,
        options: &SbomOptions,
    ) -> Result<Package> {
        self.image_package(tarball, None, options)
            .await
            .with_context(|| format!("Failed to build package from image {}", tarball.display()))
    }

    /// `id_scope` seeds the layer ids; platform images of one index pass
    /// their digest reference so their layers never clash.
    async fn image_package(
        &self,
        tarball: &Path,
        id_scope: Option<&str>,
        options: &SbomOptions,
    ) -> Result<Package> {
        validate_regular_file(tarball, "image tarball")?;
        self.ports
            .progress
            .report(&format!("📦 Reading image tarball: {}", tarball.display()));

        let scratch = self.extract_tarball_tmp(tarball)?;
        let archive = self.ports.archives.read_archive(scratch.path())?;

        let image_name = archive.repo_tags.first().cloned().unwrap_or_else(|| {
            tarball
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| tarball.display().to_string())
        });
        let scope = id_scope.unwrap_or(&image_name);

        let mut package = Package::new(&image_name);
        // Manifests may list the same layer more than once
        let mut ids = IdAllocator::new();
        ids.reserve(package.id());
        let requests: Vec<ScanRequest> = archive
            .layers
            .iter()
            .map(|layer| {
                ScanRequest::new(
                    ids.allocate(&["SPDXRef-File", scope, layer]),
                    layer,
                    scratch.path().join(layer),
                )
                .without_classification()
            })
            .collect();
        let scanned = self
            .coordinator()
            .scan_into(Package::new(&image_name), requests.clone())
            .await?;

        package.set_image(ImageMetadata {
            architecture: archive.architecture.clone(),
            os: archive.os.clone(),
            repo_tags: archive.repo_tags.clone(),
            distribution: None,
        });

        for (layer, request) in archive.layers.iter().zip(&requests) {
            let file = scanned.file(&request.id).ok_or_else(|| SbomError::Graph {
                details: format!("layer {} was not scanned", layer),
            })?;

            let mut layer_package = Package::new(layer);
            layer_package.set_id(ids.allocate(&["SPDXRef-Package", scope, layer]));
            layer_package.set_checksums(file.checksums().clone());
            layer_package.set_files_analyzed(false);

            if options.analyze_layers {
                self.analyze_image_layer(&request.path, &mut layer_package)?;
                let distribution = layer_package.image().and_then(|i| i.distribution.clone());
                let image = package.image_mut();
                if image.distribution.is_none() {
                    image.distribution = distribution;
                }
            }
            package.add_package(layer_package);
        }

        if let Some(summary) = package.image().and_then(ImageMetadata::summary) {
            package.set_comment(summary);
        }

        tracing::info!(
            image = %image_name,
            layers = archive.layers.len(),
            "built image package"
        );
        Ok(package)
    }

    /// Pulls `reference` and builds its package
    ///
    /// A multi-architecture index becomes a synthetic index package linked
    /// to one package per platform with `VARIANT_OF`.
    pub async fn image_ref_to_package(
        &self,
        reference: &str,
        options: &SbomOptions,
    ) -> Result<Package> {
        let scratch = tempfile::Builder::new()
            .prefix("spdx-image-")
            .tempdir()
            .map_err(|e| SbomError::FileSystem {
                path: std::env::temp_dir(),
                details: format!("Failed to create temporary directory: {}", e),
            })?;

        let descriptors = self
            .pull_images_to_archive(reference, scratch.path())
            .await?;

        match descriptors.as_slice() {
            [] => Err(SbomError::Image {
                reference: reference.to_string(),
                details: "Registry returned no images".to_string(),
            }
            .into()),
            [single] => {
                let mut package = self
                    .image_package(&single.archive_path, None, options)
                    .await
                    .with_context(|| format!("Failed to build package for {}", reference))?;
                fill_platform(&mut package, single);
                Ok(package)
            }
            variants => {
                let mut index = Package::new(reference);
                index.set_comment(format!(
                    "Multi-architecture image index with {} platform images",
                    variants.len()
                ));
                for descriptor in variants {
                    let mut variant = self
                        .image_package(
                            &descriptor.archive_path,
                            Some(&descriptor.reference),
                            options,
                        )
                        .await
                        .with_context(|| {
                            format!("Failed to build package for {}", descriptor.reference)
                        })?;
                    variant.set_name(&descriptor.reference);
                    variant.build_id(&[&descriptor.reference]);
                    fill_platform(&mut variant, descriptor);
                    index.add_variant(variant);
                }
                Ok(index)
            }
        }
    }

    /// Builds a File element for a single file on disk
    ///
    /// # Errors
    /// Returns an error if the path is missing or not a regular file
    pub fn file_from_path(&self, path: &Path) -> Result<File> {
        validate_regular_file(path, "file")?;
        let name = path.to_string_lossy().replace('\\', "/");
        let request = ScanRequest::new(build_id_string(&["SPDXRef-File", &name]), &name, path);
        self.ports
            .scanner
            .scan(&request)
            .with_context(|| format!("Failed to build file element from {}", path.display()))
    }

    /// Runs layer analysis on `layer_path`, annotating `package`
    pub fn analyze_image_layer(&self, layer_path: &Path, package: &mut Package) -> Result<()> {
        let recognized = self
            .ports
            .layers
            .analyze_layer(layer_path, package)
            .with_context(|| format!("Failed to analyze layer {}", layer_path.display()))?;
        tracing::debug!(layer = %package.name(), recognized, "analyzed layer");
        Ok(())
    }

    /// Extracts a tarball into a temporary directory removed on drop
    pub fn extract_tarball_tmp(&self, tarball: &Path) -> Result<TempDir> {
        self.ports
            .archives
            .extract_to_temp(tarball)
            .with_context(|| format!("Failed to extract {}", tarball.display()))
    }

    /// Pulls `reference` into `docker save` archives below `destination`
    pub async fn pull_images_to_archive(
        &self,
        reference: &str,
        destination: &Path,
    ) -> Result<Vec<ArchiveDescriptor>> {
        self.ports
            .progress
            .report(&format!("🐳 Pulling image: {}", reference));
        let descriptors = self
            .ports
            .puller
            .pull_to_archives(reference, destination)
            .await
            .with_context(|| format!("Failed to pull {}", reference))?;
        self.ports.progress.report(&format!(
            "✅ Pulled {} image(s) for {}",
            descriptors.len(),
            reference
        ));
        Ok(descriptors)
    }
}

fn fill_platform(package: &mut Package, descriptor: &ArchiveDescriptor) {
    let image = package.image_mut();
    if image.architecture.is_none() {
        image.architecture = descriptor.architecture.clone();
    }
    if image.os.is_none() {
        image.os = descriptor.os.clone();
    }
    if let Some(summary) = package.image().and_then(ImageMetadata::summary) {
        package.set_comment(summary);
    }
}
