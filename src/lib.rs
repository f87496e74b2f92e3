//! spdx-sbom - SPDX SBOM generation for source trees and container images
//!
//! This library builds SPDX 2.2 documents describing directories, `docker save`
//! image tarballs, registry images and single files, following hexagonal
//! architecture and Domain-Driven Design principles.
//!
//! # Architecture
//!
//! The library is organized into the following layers:
//!
//! - **Domain Layer** (`sbom_generation`): Pure business logic and domain models
//! - **Application Layer** (`application`): Use cases and application services
//! - **Ports** (`ports`): Interface definitions for infrastructure
//! - **Adapters** (`adapters`): Concrete implementations of ports
//! - **Shared** (`shared`): Common utilities and error types
//!
//! # Example
//!
//! ```no_run
//! use spdx_sbom::prelude::*;
//! use std::path::PathBuf;
//!
//! # async fn example() -> Result<()> {
//! let options = DocGenerateOptions {
//!     name: "my-project".to_string(),
//!     directories: vec![PathBuf::from(".")],
//!     ..Default::default()
//! };
//!
//! // Wire the default adapters
//! let ports = PortsFactory::create(&options.sbom, None, false).await?;
//! let builder = DocBuilder::new(ports);
//!
//! // Build and print the document
//! let document = builder.generate(&options).await?;
//! builder.write(&document, PresenterType::Stdout, OutputFormat::TagValue)?;
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod application;
pub mod config;
pub mod ports;
pub mod sbom_generation;
pub mod shared;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::adapters::outbound::console::{SilentProgressReporter, StderrProgressReporter};
    pub use crate::adapters::outbound::formatters::{SpdxJsonFormatter, TagValueFormatter};
    pub use crate::application::dto::{
        ArchiveDescriptor, DocGenerateOptions, ExternalRefSource, OutputFormat, SbomOptions,
    };
    pub use crate::application::factories::{
        FormatterFactory, PortsFactory, PresenterFactory, PresenterType,
    };
    pub use crate::application::read_models::{SpdxReadModel, SpdxReadModelBuilder};
    pub use crate::application::use_cases::{
        DocBuilder, FileScanCoordinator, SbomBuilder, SbomPorts,
    };
    pub use crate::ports::outbound::{
        ContentScanner, DependencyManifestReader, DirectoryLister, ImageArchiveReader,
        ImagePuller, LayerAnalyzer, LicenseClassifier, LicenseCorpusSource, OutputPresenter,
        ProgressReporter, SbomFormatter, ScanRequest,
    };
    pub use crate::sbom_generation::domain::{
        Document, File, License, Package, Relationship, RelationshipType,
    };
    pub use crate::sbom_generation::services::DocumentNaming;
    pub use crate::shared::Result;
}
