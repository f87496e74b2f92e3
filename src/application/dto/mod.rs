/// Data Transfer Objects for application layer
///
/// DTOs are used to transfer data between the application layer
/// and adapters, keeping the domain layer isolated.
mod doc_options;
mod output_format;
mod sbom_options;

pub use crate::ports::outbound::ArchiveDescriptor;
pub use doc_options::{DocGenerateOptions, ExternalRefSource};
pub use output_format::OutputFormat;
pub use sbom_options::SbomOptions;
