/// Ports module defining interfaces for hexagonal architecture
///
/// This module contains the outbound ports (driven ports - infrastructure
/// interfaces) the SBOM builder depends on. Each port names one capability;
/// tests swap in doubles implementing the same trait.
pub mod outbound;
