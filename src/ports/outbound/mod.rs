/// Outbound ports (Driven ports) - Infrastructure interfaces
///
/// These ports define the interfaces that the application core uses
/// to interact with external systems (file system, network, console, etc.).
pub mod content_scanner;
pub mod directory_lister;
pub mod formatter;
pub mod image_archive_reader;
pub mod image_puller;
pub mod layer_analyzer;
pub mod license_classifier;
pub mod license_corpus_source;
pub mod manifest_reader;
pub mod output_presenter;
pub mod progress_reporter;

pub use content_scanner::{ContentScanner, ScanRequest};
pub use directory_lister::DirectoryLister;
pub use formatter::SbomFormatter;
pub use image_archive_reader::{ImageArchive, ImageArchiveReader};
pub use image_puller::{ArchiveDescriptor, ImagePuller};
pub use layer_analyzer::LayerAnalyzer;
pub use license_classifier::LicenseClassifier;
pub use license_corpus_source::LicenseCorpusSource;
pub use manifest_reader::DependencyManifestReader;
pub use output_presenter::OutputPresenter;
pub use progress_reporter::ProgressReporter;
