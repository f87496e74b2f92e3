/// Core SBOM construction logic
///
/// `domain` holds the document graph, `services` the pure algorithms that
/// operate on it and `policies` the small decision rules shared by both.
pub mod domain;
pub mod policies;
pub mod services;
