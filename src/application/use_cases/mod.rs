/// Use cases module containing application business logic orchestration
mod doc_builder;
mod file_scan_coordinator;
mod sbom_builder;
mod sbom_ports;

pub use doc_builder::DocBuilder;
pub use file_scan_coordinator::{FileScanCoordinator, DEFAULT_MAX_CONCURRENT_SCANS};
pub use sbom_builder::SbomBuilder;
pub use sbom_ports::SbomPorts;
