/// Network adapters for external API calls
mod caching_license_source;
mod registry_client;
mod spdx_license_client;

pub use caching_license_source::CachingLicenseSource;
pub use registry_client::{write_docker_archive, ImageReference, RegistryClient};
pub use spdx_license_client::{SpdxLicenseListClient, SPDX_LICENSE_LIST_URL};
