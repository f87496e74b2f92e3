use crate::adapters::outbound::filesystem::ARCHIVE_MANIFEST;
use crate::ports::outbound::{ArchiveDescriptor, ImagePuller};
use crate::shared::error::SbomError;
use crate::shared::Result;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, WWW_AUTHENTICATE};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;
use tokio::io::AsyncWriteExt;

const DOCKER_HUB_DOMAIN: &str = "docker.io";
const DOCKER_HUB_REGISTRY: &str = "registry-1.docker.io";
const DEFAULT_TAG: &str = "latest";

const OCI_INDEX: &str = "application/vnd.oci.image.index.v1+json";
const DOCKER_MANIFEST_LIST: &str = "application/vnd.docker.distribution.manifest.list.v2+json";
const OCI_MANIFEST: &str = "application/vnd.oci.image.manifest.v1+json";
const DOCKER_MANIFEST: &str = "application/vnd.docker.distribution.manifest.v2+json";

/// A parsed image reference: `[registry/]repository[:tag][@digest]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReference {
    /// Registry host serving the API
    pub registry: String,
    pub repository: String,
    pub tag: Option<String>,
    pub digest: Option<String>,
}

impl ImageReference {
    /// Parses a reference, applying Docker Hub defaults for short names
    pub fn parse(reference: &str) -> Result<Self> {
        let invalid = |reason: &str| -> anyhow::Error {
            SbomError::Image {
                reference: reference.to_string(),
                details: format!("Invalid image reference: {}", reason),
            }
            .into()
        };

        let reference_trimmed = reference.trim();
        if reference_trimmed.is_empty() {
            return Err(invalid("empty reference"));
        }

        let (name, digest) = match reference_trimmed.split_once('@') {
            Some((name, digest)) => {
                if !digest.starts_with("sha256:") {
                    return Err(invalid("only sha256 digests are supported"));
                }
                (name, Some(digest.to_string()))
            }
            None => (reference_trimmed, None),
        };

        // A colon after the last slash separates the tag
        let (name, tag) = match name.rfind(':') {
            Some(idx) if idx > name.rfind('/').unwrap_or(0) => {
                (&name[..idx], Some(name[idx + 1..].to_string()))
            }
            _ => (name, None),
        };

        let (registry, repository) = match name.split_once('/') {
            Some((first, rest))
                if first.contains('.') || first.contains(':') || first == "localhost" =>
            {
                (first.to_string(), rest.to_string())
            }
            Some(_) => (DOCKER_HUB_DOMAIN.to_string(), name.to_string()),
            None => (DOCKER_HUB_DOMAIN.to_string(), format!("library/{}", name)),
        };

        if repository.is_empty()
            || !repository
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || "._-/".contains(c))
        {
            return Err(invalid("malformed repository name"));
        }

        let registry = if registry == DOCKER_HUB_DOMAIN {
            DOCKER_HUB_REGISTRY.to_string()
        } else {
            registry
        };

        let tag = match (&tag, &digest) {
            (None, None) => Some(DEFAULT_TAG.to_string()),
            _ => tag,
        };

        Ok(Self {
            registry,
            repository,
            tag,
            digest,
        })
    }

    /// The tag or digest used to fetch the top-level manifest
    pub fn manifest_reference(&self) -> &str {
        self.digest
            .as_deref()
            .or(self.tag.as_deref())
            .unwrap_or(DEFAULT_TAG)
    }

    fn display_registry(&self) -> &str {
        if self.registry == DOCKER_HUB_REGISTRY {
            DOCKER_HUB_DOMAIN
        } else {
            &self.registry
        }
    }

    /// `registry/repository@digest` for one pulled image
    pub fn with_digest(&self, digest: &str) -> String {
        format!("{}/{}@{}", self.display_registry(), self.repository, digest)
    }

    /// `registry/repository:tag`, used as the archive's repo tag
    pub fn repo_tag(&self) -> Option<String> {
        self.tag
            .as_ref()
            .map(|t| format!("{}/{}:{}", self.display_registry(), self.repository, t))
    }
}

impl fmt::Display for ImageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.display_registry(), self.repository)?;
        if let Some(tag) = &self.tag {
            write!(f, ":{}", tag)?;
        }
        if let Some(digest) = &self.digest {
            write!(f, "@{}", digest)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
struct Descriptor {
    #[serde(rename = "mediaType", default)]
    media_type: Option<String>,
    digest: String,
    #[serde(default)]
    platform: Option<Platform>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
struct Platform {
    architecture: String,
    os: String,
    #[serde(default)]
    variant: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RegistryManifest {
    #[serde(rename = "mediaType", default)]
    media_type: Option<String>,
    #[serde(default)]
    manifests: Vec<Descriptor>,
    #[serde(default)]
    config: Option<Descriptor>,
    #[serde(default)]
    layers: Vec<Descriptor>,
}

impl RegistryManifest {
    fn is_index(&self) -> bool {
        matches!(
            self.media_type.as_deref(),
            Some(OCI_INDEX) | Some(DOCKER_MANIFEST_LIST)
        ) || (!self.manifests.is_empty() && self.config.is_none())
    }

    /// Index entries describing runnable images. Attestation manifests
    /// carry an `unknown` platform and are skipped.
    fn platform_images(&self) -> Vec<(&Descriptor, &Platform)> {
        self.manifests
            .iter()
            .filter_map(|d| d.platform.as_ref().map(|p| (d, p)))
            .filter(|(_, p)| p.architecture != "unknown" && p.os != "unknown")
            .collect()
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPlatform {
    #[serde(default)]
    architecture: Option<String>,
    #[serde(default)]
    os: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    access_token: Option<String>,
}

/// `docker save` manifest entry written into each archive
#[derive(Debug, Serialize)]
struct ArchiveManifestEntry<'a> {
    #[serde(rename = "Config")]
    config: &'a str,
    #[serde(rename = "RepoTags")]
    repo_tags: &'a [String],
    #[serde(rename = "Layers")]
    layers: &'a [String],
}

/// Parses a `WWW-Authenticate: Bearer realm=..,service=..,scope=..` header
fn parse_bearer_challenge(header: &str) -> Option<(String, Vec<(String, String)>)> {
    let rest = header.trim().strip_prefix("Bearer ")?;
    let mut realm = None;
    let mut params = Vec::new();

    let mut remaining = rest.trim();
    while !remaining.is_empty() {
        let (key, after_key) = remaining.split_once('=')?;
        let key = key.trim().trim_start_matches(',').trim();
        let after_key = after_key.trim_start();
        let (value, after_value) = match after_key.strip_prefix('"') {
            Some(quoted) => {
                let end = quoted.find('"')?;
                (&quoted[..end], &quoted[end + 1..])
            }
            None => match after_key.find(',') {
                Some(end) => (&after_key[..end], &after_key[end..]),
                None => (after_key, ""),
            },
        };
        if key == "realm" {
            realm = Some(value.to_string());
        } else {
            params.push((key.to_string(), value.to_string()));
        }
        remaining = after_value.trim_start_matches(',').trim();
    }

    realm.map(|r| (r, params))
}

/// Writes a `docker save` compatible tarball from blobs already on disk
///
/// # Arguments
/// * `archive_path` - Destination tarball
/// * `config` - (digest, local file) of the image config
/// * `layers` - (digest, local file) of each layer, in manifest order
/// * `repo_tags` - Tags recorded in the archive manifest
pub fn write_docker_archive(
    archive_path: &Path,
    config: (&str, &Path),
    layers: &[(String, PathBuf)],
    repo_tags: &[String],
) -> Result<()> {
    let io_error = |e: std::io::Error| -> anyhow::Error {
        SbomError::FileSystem {
            path: archive_path.to_path_buf(),
            details: format!("Failed to write image archive: {}", e),
        }
        .into()
    };

    let file = std::fs::File::create(archive_path).map_err(io_error)?;
    let mut builder = tar::Builder::new(file);

    let config_name = format!("{}.json", digest_hex(config.0));
    builder
        .append_path_with_name(config.1, &config_name)
        .map_err(io_error)?;

    let mut layer_names = Vec::with_capacity(layers.len());
    for (digest, path) in layers {
        let name = format!("{}/layer.tar", digest_hex(digest));
        builder
            .append_path_with_name(path, &name)
            .map_err(io_error)?;
        layer_names.push(name);
    }

    let manifest = serde_json::to_vec(&[ArchiveManifestEntry {
        config: &config_name,
        repo_tags,
        layers: &layer_names,
    }])?;
    let mut header = tar::Header::new_gnu();
    header.set_size(manifest.len() as u64);
    header.set_mode(0o644);
    header.set_cksum();
    builder
        .append_data(&mut header, ARCHIVE_MANIFEST, manifest.as_slice())
        .map_err(io_error)?;

    builder.into_inner().and_then(|mut f| f.flush()).map_err(io_error)?;
    Ok(())
}

fn digest_hex(digest: &str) -> &str {
    digest.split_once(':').map(|(_, hex)| hex).unwrap_or(digest)
}

fn archive_file_name(manifest_digest: &str) -> String {
    format!("{}.tar", digest_hex(manifest_digest))
}

/// Reads the platform fields of an image config blob
fn parse_config_platform(image: &ImageReference, config_json: &[u8]) -> Result<ConfigPlatform> {
    serde_json::from_slice(config_json)
        .map_err(|e| RegistryClient::image_error(image, format!("Malformed image config: {}", e)))
}

/// RegistryClient adapter pulling images over the OCI distribution API
///
/// Access is anonymous: bearer tokens are requested from the realm named in
/// the registry's challenge without credentials. Index manifests are
/// expanded into one archive per platform.
pub struct RegistryClient {
    client: reqwest::Client,
    token: Mutex<Option<String>>,
    scheme: &'static str,
}

impl RegistryClient {
    pub fn new() -> Result<Self> {
        let version = env!("CARGO_PKG_VERSION");
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(300))
            .user_agent(format!("spdx-sbom/{}", version))
            .build()?;

        Ok(Self {
            client,
            token: Mutex::new(None),
            scheme: "https",
        })
    }

    /// Talks plain HTTP, for local test registries
    pub fn insecure(mut self) -> Self {
        self.scheme = "http";
        self
    }

    fn image_error(reference: &ImageReference, details: impl Into<String>) -> anyhow::Error {
        SbomError::Image {
            reference: reference.to_string(),
            details: details.into(),
        }
        .into()
    }

    fn current_token(&self) -> Option<String> {
        self.token.lock().ok().and_then(|t| t.clone())
    }

    async fn authenticate(&self, image: &ImageReference, challenge: &str) -> Result<()> {
        let (realm, params) = parse_bearer_challenge(challenge).ok_or_else(|| {
            Self::image_error(image, format!("Unsupported auth challenge: {}", challenge))
        })?;

        let mut query = params;
        if !query.iter().any(|(k, _)| k == "scope") {
            query.push((
                "scope".to_string(),
                format!("repository:{}:pull", image.repository),
            ));
        }

        let query: Vec<String> = query
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect();
        let separator = if realm.contains('?') { '&' } else { '?' };
        let token_url = format!("{}{}{}", realm, separator, query.join("&"));

        tracing::debug!(%realm, "requesting anonymous registry token");
        let response = self
            .client
            .get(&token_url)
            .send()
            .await
            .map_err(|e| Self::image_error(image, format!("Token request failed: {}", e)))?;
        if !response.status().is_success() {
            return Err(Self::image_error(
                image,
                format!("Token endpoint returned status code {}", response.status()),
            ));
        }
        let body: TokenResponse = response
            .json()
            .await
            .map_err(|e| Self::image_error(image, format!("Malformed token response: {}", e)))?;

        let token = body
            .token
            .or(body.access_token)
            .ok_or_else(|| Self::image_error(image, "Token response holds no token"))?;
        if let Ok(mut slot) = self.token.lock() {
            *slot = Some(token);
        }
        Ok(())
    }

    /// GET against the registry, answering one bearer challenge if needed
    async fn get(
        &self,
        image: &ImageReference,
        path: &str,
        accept: Option<&str>,
    ) -> Result<reqwest::Response> {
        let url = format!(
            "{}://{}/v2/{}/{}",
            self.scheme, image.registry, image.repository, path
        );

        let mut challenged = false;
        loop {
            let mut request = self.client.get(&url);
            if let Some(accept) = accept {
                request = request.header(ACCEPT, accept);
            }
            if let Some(token) = self.current_token() {
                request = request.header(AUTHORIZATION, format!("Bearer {}", token));
            }

            let response = request
                .send()
                .await
                .map_err(|e| Self::image_error(image, format!("Request to {} failed: {}", url, e)))?;

            if response.status() == StatusCode::UNAUTHORIZED && !challenged {
                let challenge = response
                    .headers()
                    .get(WWW_AUTHENTICATE)
                    .and_then(|h| h.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                self.authenticate(image, &challenge).await?;
                challenged = true;
                continue;
            }

            if !response.status().is_success() {
                return Err(Self::image_error(
                    image,
                    format!("Registry returned status code {} for {}", response.status(), url),
                ));
            }
            return Ok(response);
        }
    }

    async fn fetch_manifest(
        &self,
        image: &ImageReference,
        reference: &str,
    ) -> Result<RegistryManifest> {
        let accept = [OCI_INDEX, DOCKER_MANIFEST_LIST, OCI_MANIFEST, DOCKER_MANIFEST].join(", ");
        let response = self
            .get(image, &format!("manifests/{}", reference), Some(&accept))
            .await?;
        response
            .json()
            .await
            .map_err(|e| Self::image_error(image, format!("Malformed manifest: {}", e)))
    }

    /// Streams a blob to `destination`, verifying its digest
    async fn fetch_blob(
        &self,
        image: &ImageReference,
        digest: &str,
        destination: &Path,
    ) -> Result<()> {
        let mut response = self.get(image, &format!("blobs/{}", digest), None).await?;

        let fs_error = |e: std::io::Error| SbomError::FileSystem {
            path: destination.to_path_buf(),
            details: e.to_string(),
        };
        let mut file = tokio::fs::File::create(destination)
            .await
            .map_err(fs_error)?;
        let mut hasher = Sha256::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| Self::image_error(image, format!("Blob download failed: {}", e)))?
        {
            hasher.update(&chunk);
            file.write_all(&chunk).await.map_err(fs_error)?;
        }
        file.flush().await.map_err(fs_error)?;

        let actual = format!("sha256:{:x}", hasher.finalize());
        if actual != digest {
            return Err(Self::image_error(
                image,
                format!("Digest mismatch for blob {}: got {}", digest, actual),
            ));
        }
        Ok(())
    }

    /// Downloads one image manifest's blobs and packs them into `archive_path`
    async fn pull_image(
        &self,
        image: &ImageReference,
        manifest: &RegistryManifest,
        archive_path: &Path,
        blob_dir: &Path,
    ) -> Result<ConfigPlatform> {
        let config = manifest
            .config
            .as_ref()
            .ok_or_else(|| Self::image_error(image, "Image manifest has no config"))?;

        let config_path = blob_dir.join(digest_hex(&config.digest));
        self.fetch_blob(image, &config.digest, &config_path).await?;

        let mut layers = Vec::with_capacity(manifest.layers.len());
        for layer in &manifest.layers {
            if let Some(media_type) = &layer.media_type {
                if media_type.contains("foreign") {
                    tracing::warn!(digest = %layer.digest, "skipping foreign layer");
                    continue;
                }
            }
            let path = blob_dir.join(digest_hex(&layer.digest));
            if !path.exists() {
                self.fetch_blob(image, &layer.digest, &path).await?;
            }
            layers.push((layer.digest.clone(), path));
        }

        let repo_tags: Vec<String> = image.repo_tag().into_iter().collect();
        write_docker_archive(archive_path, (&config.digest, &config_path), &layers, &repo_tags)?;

        let config_json = tokio::fs::read(&config_path)
            .await
            .map_err(|e| SbomError::FileSystem {
                path: config_path.clone(),
                details: e.to_string(),
            })?;
        parse_config_platform(image, &config_json)
    }
}

#[async_trait]
impl ImagePuller for RegistryClient {
    async fn pull_to_archives(
        &self,
        reference: &str,
        destination: &Path,
    ) -> Result<Vec<ArchiveDescriptor>> {
        let image = ImageReference::parse(reference)?;
        let blob_dir = destination.join("blobs");
        std::fs::create_dir_all(&blob_dir).map_err(|e| SbomError::FileSystem {
            path: blob_dir.clone(),
            details: e.to_string(),
        })?;

        tracing::info!(image = %image, "pulling image");
        let top = self.fetch_manifest(&image, image.manifest_reference()).await?;

        if !top.is_index() {
            let archive_path = destination.join("image.tar");
            let platform = self.pull_image(&image, &top, &archive_path, &blob_dir).await?;
            let digest = image.digest.clone();
            return Ok(vec![ArchiveDescriptor {
                reference: digest
                    .map(|d| image.with_digest(&d))
                    .unwrap_or_else(|| image.to_string()),
                archive_path,
                architecture: platform.architecture,
                os: platform.os,
            }]);
        }

        let images = top.platform_images();
        if images.is_empty() {
            return Err(Self::image_error(
                &image,
                "Image index lists no usable platform images",
            ));
        }

        let mut descriptors = Vec::with_capacity(images.len());
        for (descriptor, platform) in images {
            let manifest = self.fetch_manifest(&image, &descriptor.digest).await?;
            let mut label = format!("{}-{}", platform.os, platform.architecture);
            if let Some(variant) = &platform.variant {
                label = format!("{}-{}", label, variant);
            }
            // An index may list several manifests for the same platform
            let archive_path = destination.join(archive_file_name(&descriptor.digest));
            tracing::debug!(platform = %label, digest = %descriptor.digest, "pulling platform image");
            self.pull_image(&image, &manifest, &archive_path, &blob_dir)
                .await?;

            descriptors.push(ArchiveDescriptor {
                reference: image.with_digest(&descriptor.digest),
                archive_path,
                architecture: Some(platform.architecture.clone()),
                os: Some(platform.os.clone()),
            });
        }
        Ok(descriptors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::outbound::filesystem::TarballReader;
    use crate::ports::outbound::ImageArchiveReader;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_parse_docker_hub_short_name() {
        let image = ImageReference::parse("debian").unwrap();
        assert_eq!(image.registry, DOCKER_HUB_REGISTRY);
        assert_eq!(image.repository, "library/debian");
        assert_eq!(image.tag.as_deref(), Some("latest"));
        assert_eq!(image.to_string(), "docker.io/library/debian:latest");
    }

    #[test]
    fn test_parse_registry_with_port_and_digest() {
        let digest = format!("sha256:{}", "a".repeat(64));
        let image = ImageReference::parse(&format!("localhost:5000/team/app@{}", digest)).unwrap();
        assert_eq!(image.registry, "localhost:5000");
        assert_eq!(image.repository, "team/app");
        assert_eq!(image.tag, None);
        assert_eq!(image.manifest_reference(), digest);
    }

    #[test]
    fn test_parse_registry_tag() {
        let image = ImageReference::parse("registry.k8s.io/pause:3.9").unwrap();
        assert_eq!(image.registry, "registry.k8s.io");
        assert_eq!(image.repository, "pause");
        assert_eq!(image.manifest_reference(), "3.9");
        assert_eq!(image.repo_tag().as_deref(), Some("registry.k8s.io/pause:3.9"));
    }

    #[test]
    fn test_parse_invalid_references() {
        assert!(ImageReference::parse("").is_err());
        assert!(ImageReference::parse("Upper/Case").is_err());
        assert!(ImageReference::parse("debian@md5:abc").is_err());
    }

    #[test]
    fn test_parse_bearer_challenge() {
        let (realm, params) = parse_bearer_challenge(
            r#"Bearer realm="https://auth.docker.io/token",service="registry.docker.io",scope="repository:library/debian:pull""#,
        )
        .unwrap();
        assert_eq!(realm, "https://auth.docker.io/token");
        assert_eq!(
            params,
            vec![
                ("service".to_string(), "registry.docker.io".to_string()),
                (
                    "scope".to_string(),
                    "repository:library/debian:pull".to_string()
                ),
            ]
        );
        assert!(parse_bearer_challenge("Basic realm=\"x\"").is_none());
    }

    #[test]
    fn test_index_platform_images_skip_attestations() {
        let manifest: RegistryManifest = serde_json::from_str(&format!(
            r#"{{"mediaType":"{}","manifests":[
                {{"digest":"sha256:1","platform":{{"architecture":"amd64","os":"linux"}}}},
                {{"digest":"sha256:2","platform":{{"architecture":"arm64","os":"linux","variant":"v8"}}}},
                {{"digest":"sha256:3","platform":{{"architecture":"unknown","os":"unknown"}}}}
            ]}}"#,
            OCI_INDEX
        ))
        .unwrap();

        assert!(manifest.is_index());
        let digests: Vec<&str> = manifest
            .platform_images()
            .into_iter()
            .map(|(d, _)| d.digest.as_str())
            .collect();
        assert_eq!(digests, vec!["sha256:1", "sha256:2"]);
    }

    #[test]
    fn test_same_platform_manifests_get_distinct_archives() {
        let first = archive_file_name("sha256:aaaa");
        let second = archive_file_name("sha256:bbbb");
        assert_eq!(first, "aaaa.tar");
        assert_ne!(first, second);
    }

    #[test]
    fn test_config_platform_parsing() {
        let image = ImageReference::parse("alpine:3.19").unwrap();
        let platform =
            parse_config_platform(&image, br#"{"architecture":"arm64","os":"linux"}"#).unwrap();
        assert_eq!(platform.architecture.as_deref(), Some("arm64"));
        assert_eq!(platform.os.as_deref(), Some("linux"));

        let err = parse_config_platform(&image, b"{not json").unwrap_err();
        assert!(format!("{}", err).contains("Malformed image config"));
    }

    #[test]
    fn test_written_archive_is_readable() {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("config");
        fs::write(&config, r#"{"architecture":"arm64","os":"linux"}"#).unwrap();
        let layer = dir.path().join("layer");
        fs::write(&layer, b"layer bytes").unwrap();

        let archive = dir.path().join("image.tar");
        write_docker_archive(
            &archive,
            ("sha256:cfg", &config),
            &[("sha256:abc".to_string(), layer)],
            &["registry.k8s.io/pause:3.9".to_string()],
        )
        .unwrap();

        let reader = TarballReader::new();
        let extracted = reader.extract_to_temp(&archive).unwrap();
        let contents = reader.read_archive(extracted.path()).unwrap();
        assert_eq!(contents.layers, vec!["abc/layer.tar".to_string()]);
        assert_eq!(contents.architecture.as_deref(), Some("arm64"));
        assert_eq!(contents.repo_tags, vec!["registry.k8s.io/pause:3.9".to_string()]);
    }
}
