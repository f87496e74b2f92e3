use crate::ports::outbound::{ImageArchive, ImageArchiveReader};
use crate::shared::error::SbomError;
use crate::shared::security::{read_metadata_file, validate_archive_member};
use crate::shared::Result;
use anyhow::Context;
use flate2::read::GzDecoder;
use serde::Deserialize;
use std::fs;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;
use tempfile::TempDir;

/// Name of the manifest written by `docker save`
pub const ARCHIVE_MANIFEST: &str = "manifest.json";

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// One image entry of `manifest.json`
#[derive(Debug, Deserialize)]
struct ManifestEntry {
    #[serde(rename = "Config")]
    config: String,
    #[serde(rename = "RepoTags", default)]
    repo_tags: Option<Vec<String>>,
    #[serde(rename = "Layers", default)]
    layers: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ImageConfig {
    #[serde(default)]
    architecture: Option<String>,
    #[serde(default)]
    os: Option<String>,
}

/// TarballReader adapter for `docker save` style image archives
///
/// Plain and gzip-compressed tarballs are accepted.
#[derive(Debug, Default, Clone)]
pub struct TarballReader;

impl TarballReader {
    pub fn new() -> Self {
        Self
    }
}

/// Opens a possibly gzip-compressed file as a plain byte stream
pub fn open_maybe_gzip(path: &Path) -> std::io::Result<Box<dyn Read>> {
    let mut file = fs::File::open(path)?;
    let mut magic = [0u8; 2];
    let n = file.read(&mut magic)?;
    file.seek(SeekFrom::Start(0))?;

    if n == 2 && magic == GZIP_MAGIC {
        Ok(Box::new(GzDecoder::new(BufReader::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Unpacks `tarball` into `destination`, refusing members that would land
/// outside of it
pub fn extract_tarball(tarball: &Path, destination: &Path) -> Result<()> {
    let reader = open_maybe_gzip(tarball).map_err(|e| SbomError::FileSystem {
        path: tarball.to_path_buf(),
        details: format!("Failed to open tarball: {}", e),
    })?;
    let mut archive = tar::Archive::new(reader);

    let entries = archive.entries().map_err(|e| SbomError::FileSystem {
        path: tarball.to_path_buf(),
        details: format!("Failed to read tarball: {}", e),
    })?;

    for entry in entries {
        let mut entry = entry.map_err(|e| SbomError::FileSystem {
            path: tarball.to_path_buf(),
            details: format!("Corrupt tarball entry: {}", e),
        })?;
        let name = entry
            .path()
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_default();
        validate_archive_member(&name)?;
        entry
            .unpack_in(destination)
            .with_context(|| format!("extracting {} from {}", name, tarball.display()))?;
    }
    Ok(())
}

impl ImageArchiveReader for TarballReader {
    fn extract_to_temp(&self, tarball: &Path) -> Result<TempDir> {
        let dir = tempfile::Builder::new()
            .prefix("spdx-tar-extract-")
            .tempdir()
            .map_err(|e| SbomError::FileSystem {
                path: std::env::temp_dir(),
                details: format!("Failed to create temporary directory: {}", e),
            })?;

        extract_tarball(tarball, dir.path())?;
        tracing::debug!(
            tarball = %tarball.display(),
            into = %dir.path().display(),
            "extracted tarball"
        );
        Ok(dir)
    }

    fn read_archive(&self, root: &Path) -> Result<ImageArchive> {
        let manifest_path = root.join(ARCHIVE_MANIFEST);
        let content = read_metadata_file(&manifest_path, "image archive manifest")?;
        let mut entries: Vec<ManifestEntry> =
            serde_json::from_str(&content).map_err(|e| SbomError::Image {
                reference: manifest_path.display().to_string(),
                details: format!("Malformed archive manifest: {}", e),
            })?;

        if entries.is_empty() {
            return Err(SbomError::Image {
                reference: manifest_path.display().to_string(),
                details: "Archive manifest lists no images".to_string(),
            }
            .into());
        }
        if entries.len() > 1 {
            tracing::warn!(
                images = entries.len(),
                "archive holds more than one image, only the first is described"
            );
        }
        let entry = entries.swap_remove(0);

        validate_archive_member(&entry.config)?;
        for layer in &entry.layers {
            validate_archive_member(layer)?;
        }

        let config_path = root.join(&entry.config);
        let config: ImageConfig = if config_path.is_file() {
            let raw = read_metadata_file(&config_path, "image config")?;
            serde_json::from_str(&raw).map_err(|e| SbomError::Image {
                reference: config_path.display().to_string(),
                details: format!("Malformed image config: {}", e),
            })?
        } else {
            tracing::warn!(config = %entry.config, "image config missing from archive");
            ImageConfig::default()
        };

        Ok(ImageArchive {
            repo_tags: entry.repo_tags.unwrap_or_default(),
            config: entry.config,
            architecture: config.architecture,
            os: config.os,
            layers: entry.layers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_image_tarball(dir: &Path) -> std::path::PathBuf {
        let staging = dir.join("staging");
        fs::create_dir_all(staging.join("layer1")).unwrap();
        fs::write(staging.join("layer1/layer.tar"), b"layer bytes").unwrap();
        fs::write(
            staging.join("config.json"),
            r#"{"architecture":"arm64","os":"linux"}"#,
        )
        .unwrap();
        fs::write(
            staging.join(ARCHIVE_MANIFEST),
            r#"[{"Config":"config.json","RepoTags":["registry.k8s.io/pause:3.9"],"Layers":["layer1/layer.tar"]}]"#,
        )
        .unwrap();

        let tarball = dir.join("image.tar");
        let file = fs::File::create(&tarball).unwrap();
        let mut builder = tar::Builder::new(file);
        builder.append_dir_all(".", &staging).unwrap();
        builder.finish().unwrap();
        tarball
    }

    #[test]
    fn test_extract_and_read_archive() {
        let dir = TempDir::new().unwrap();
        let tarball = write_image_tarball(dir.path());

        let reader = TarballReader::new();
        let extracted = reader.extract_to_temp(&tarball).unwrap();
        let archive = reader.read_archive(extracted.path()).unwrap();

        assert_eq!(archive.repo_tags, vec!["registry.k8s.io/pause:3.9"]);
        assert_eq!(archive.architecture.as_deref(), Some("arm64"));
        assert_eq!(archive.os.as_deref(), Some("linux"));
        assert_eq!(archive.layers, vec!["layer1/layer.tar"]);
        assert!(archive.layer_paths(extracted.path())[0].is_file());
    }

    #[test]
    fn test_temp_dir_is_removed_on_drop() {
        let dir = TempDir::new().unwrap();
        let tarball = write_image_tarball(dir.path());

        let extracted = TarballReader::new().extract_to_temp(&tarball).unwrap();
        let path = extracted.path().to_path_buf();
        assert!(path.join(ARCHIVE_MANIFEST).exists());
        drop(extracted);
        assert!(!path.exists());
    }

    #[test]
    fn test_missing_manifest_is_an_error() {
        let dir = TempDir::new().unwrap();
        assert!(TarballReader::new().read_archive(dir.path()).is_err());
    }

    #[test]
    fn test_empty_manifest_is_an_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(ARCHIVE_MANIFEST), "[]").unwrap();
        let err = TarballReader::new().read_archive(dir.path()).unwrap_err();
        assert!(err.to_string().contains("lists no images"));
    }

    #[test]
    fn test_layer_outside_root_is_rejected() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(ARCHIVE_MANIFEST),
            r#"[{"Config":"c.json","Layers":["../../etc/passwd"]}]"#,
        )
        .unwrap();
        assert!(TarballReader::new().read_archive(dir.path()).is_err());
    }

    #[test]
    fn test_gzip_tarball_is_extracted() {
        use flate2::write::GzEncoder;
        use flate2::Compression;

        let dir = TempDir::new().unwrap();
        let plain = write_image_tarball(dir.path());
        let gz_path = dir.path().join("image.tar.gz");
        let mut encoder = GzEncoder::new(fs::File::create(&gz_path).unwrap(), Compression::fast());
        std::io::copy(&mut fs::File::open(&plain).unwrap(), &mut encoder).unwrap();
        encoder.finish().unwrap();

        let extracted = TarballReader::new().extract_to_temp(&gz_path).unwrap();
        assert!(extracted.path().join(ARCHIVE_MANIFEST).is_file());
    }
}
