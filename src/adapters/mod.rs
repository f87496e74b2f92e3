/// Adapters layer - filesystem, network, license and console
/// implementations of the outbound ports
pub mod outbound;
