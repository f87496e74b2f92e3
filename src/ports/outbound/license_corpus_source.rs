use crate::sbom_generation::domain::License;
use crate::shared::Result;
use async_trait::async_trait;

/// LicenseCorpusSource port for obtaining license texts
///
/// # Async Support
/// Methods are async since texts are usually downloaded.
/// Implementations must be `Send + Sync` to support concurrent access.
#[async_trait]
pub trait LicenseCorpusSource: Send + Sync {
    /// Lists the identifiers of all licenses the source knows
    async fn license_ids(&self) -> Result<Vec<String>>;

    /// Fetches one license, including its full text
    ///
    /// # Errors
    /// Returns an error if the license is unknown or cannot be retrieved
    async fn fetch_license(&self, id: &str) -> Result<License>;
}
