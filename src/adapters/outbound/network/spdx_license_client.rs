use crate::ports::outbound::LicenseCorpusSource;
use crate::sbom_generation::domain::License;
use crate::shared::error::SbomError;
use crate::shared::Result;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Location of the published SPDX license list
pub const SPDX_LICENSE_LIST_URL: &str = "https://spdx.org/licenses/";

/// Cache entry holding the license index
const LICENSE_INDEX: &str = "licenses.json";

#[derive(Debug, Deserialize)]
struct LicenseIndex {
    #[serde(rename = "licenseListVersion", default)]
    version: Option<String>,
    licenses: Vec<LicenseIndexEntry>,
}

#[derive(Debug, Deserialize)]
struct LicenseIndexEntry {
    #[serde(rename = "licenseId")]
    license_id: String,
    #[serde(rename = "isDeprecatedLicenseId", default)]
    deprecated: bool,
}

#[derive(Debug, Deserialize)]
struct LicenseDetails {
    #[serde(rename = "licenseId")]
    license_id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(rename = "licenseText", default)]
    license_text: Option<String>,
    #[serde(rename = "seeAlso", default)]
    see_also: Vec<String>,
}

/// SpdxLicenseListClient adapter for downloading license texts from spdx.org
///
/// This adapter implements the LicenseCorpusSource port. Every document it
/// downloads is kept in the download cache directory, keyed by license id
/// (`<ID>.json`), and later calls are answered from there without network
/// access.
pub struct SpdxLicenseListClient {
    client: reqwest::Client,
    base_url: String,
    cache_dir: PathBuf,
}

impl SpdxLicenseListClient {
    /// Creates a client caching downloads below `cache_dir`
    pub fn new(cache_dir: impl Into<PathBuf>) -> Result<Self> {
        let version = env!("CARGO_PKG_VERSION");
        let user_agent = format!("spdx-sbom/{}", version);
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            base_url: SPDX_LICENSE_LIST_URL.to_string(),
            cache_dir: cache_dir.into(),
        })
    }

    /// Points the client at a mirror of the license list
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        self.base_url = base_url;
        self
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    fn classification_error(&self, details: impl Into<String>) -> anyhow::Error {
        SbomError::Classification {
            cache_dir: self.cache_dir.clone(),
            details: details.into(),
        }
        .into()
    }

    /// Validates a license id before it is used in a URL or cache file name
    fn validate_license_id(id: &str) -> Result<()> {
        if id.is_empty()
            || !id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '+'))
            || id.contains("..")
        {
            anyhow::bail!("Security: '{}' is not a valid SPDX license identifier", id);
        }
        Ok(())
    }

    /// Returns the named document, from the cache when present
    async fn cached_json<T: DeserializeOwned>(&self, name: &str) -> Result<T> {
        let cache_path = self.cache_dir.join(name);

        if let Ok(content) = tokio::fs::read_to_string(&cache_path).await {
            match serde_json::from_str(&content) {
                Ok(value) => {
                    tracing::debug!(path = %cache_path.display(), "license cache hit");
                    return Ok(value);
                }
                Err(e) => tracing::warn!(
                    path = %cache_path.display(),
                    error = %e,
                    "discarding unreadable license cache entry"
                ),
            }
        }

        let content = self.download(name).await?;
        let value = serde_json::from_str(&content)
            .map_err(|e| self.classification_error(format!("Malformed {}: {}", name, e)))?;
        self.store(&cache_path, &content).await?;
        Ok(value)
    }

    async fn download(&self, name: &str) -> Result<String> {
        let url = format!("{}{}", self.base_url, urlencoding::encode(name));
        tracing::debug!(%url, "downloading license data");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.classification_error(format!("Failed to fetch {}: {}", url, e)))?;

        if !response.status().is_success() {
            return Err(self.classification_error(format!(
                "License list returned status code {} for {}",
                response.status(),
                url
            )));
        }

        response
            .text()
            .await
            .map_err(|e| self.classification_error(format!("Failed to read {}: {}", url, e)))
    }

    /// Writes a cache entry through a temporary file so readers never see
    /// a truncated document
    async fn store(&self, path: &Path, content: &str) -> Result<()> {
        tokio::fs::create_dir_all(&self.cache_dir)
            .await
            .map_err(|e| self.classification_error(format!("Cannot create cache: {}", e)))?;

        let partial = path.with_extension("json.partial");
        tokio::fs::write(&partial, content)
            .await
            .map_err(|e| self.classification_error(format!("Cache write failed: {}", e)))?;
        tokio::fs::rename(&partial, path)
            .await
            .map_err(|e| self.classification_error(format!("Cache write failed: {}", e)))?;
        Ok(())
    }
}

#[async_trait]
impl LicenseCorpusSource for SpdxLicenseListClient {
    async fn license_ids(&self) -> Result<Vec<String>> {
        let index: LicenseIndex = self.cached_json(LICENSE_INDEX).await?;
        tracing::info!(
            version = index.version.as_deref().unwrap_or("unknown"),
            licenses = index.licenses.len(),
            "loaded SPDX license list"
        );

        let mut ids: Vec<String> = index
            .licenses
            .into_iter()
            .filter(|l| !l.deprecated)
            .map(|l| l.license_id)
            .collect();
        ids.sort();
        ids.dedup();
        Ok(ids)
    }

    async fn fetch_license(&self, id: &str) -> Result<License> {
        Self::validate_license_id(id)?;
        let details: LicenseDetails = self.cached_json(&format!("{}.json", id)).await?;

        let mut license = License::new(details.license_id);
        if let Some(name) = details.name {
            license = license.with_name(name);
        }
        if let Some(text) = details.license_text {
            license = license.with_text(text);
        }
        if let Some(url) = details.see_also.into_iter().next() {
            license = license.with_url(url);
        }
        Ok(license)
    }
}
