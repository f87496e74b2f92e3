use async_trait::async_trait;
use spdx_sbom::adapters::outbound::network::write_docker_archive;
use spdx_sbom::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Mock ImagePuller writing small `docker save` archives instead of
/// talking to a registry
///
/// One platform produces a single image; more produce an index.
#[derive(Default, Clone)]
pub struct MockImagePuller {
    platforms: Vec<(String, String)>,
    pub pulled: Arc<Mutex<Vec<String>>>,
}

impl MockImagePuller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_platform(mut self, os: &str, architecture: &str) -> Self {
        self.platforms.push((os.to_string(), architecture.to_string()));
        self
    }

    fn write_image(
        destination: &Path,
        label: &str,
        os: &str,
        architecture: &str,
        repo_tag: &str,
    ) -> Result<PathBuf> {
        let blobs = destination.join(format!("blobs-{}", label));
        std::fs::create_dir_all(&blobs)?;

        let config = blobs.join("config.json");
        std::fs::write(
            &config,
            format!(r#"{{"architecture":"{}","os":"{}"}}"#, architecture, os),
        )?;
        let layer = blobs.join("layer.tar");
        let os_release = "ID=alpine\nVERSION_ID=3.18\n";
        let mut builder = tar::Builder::new(std::fs::File::create(&layer)?);
        let mut header = tar::Header::new_gnu();
        header.set_size(os_release.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder.append_data(&mut header, "etc/os-release", os_release.as_bytes())?;
        builder.into_inner()?;

        let archive = destination.join(format!("{}.tar", label));
        let hex = label.replace('-', "");
        let config_digest = format!("sha256:config{}", hex);
        write_docker_archive(
            &archive,
            (config_digest.as_str(), config.as_path()),
            &[(format!("sha256:layer{}", hex), layer)],
            &[repo_tag.to_string()],
        )?;
        Ok(archive)
    }
}

#[async_trait]
impl ImagePuller for MockImagePuller {
    async fn pull_to_archives(
        &self,
        reference: &str,
        destination: &Path,
    ) -> Result<Vec<ArchiveDescriptor>> {
        self.pulled.lock().unwrap().push(reference.to_string());
        if self.platforms.is_empty() {
            anyhow::bail!("manifest unknown: {}", reference);
        }

        let single = self.platforms.len() == 1;
        self.platforms
            .iter()
            .enumerate()
            .map(|(i, (os, architecture))| -> Result<ArchiveDescriptor> {
                let label = format!("{}-{}", os, architecture);
                let archive =
                    Self::write_image(destination, &label, os, architecture, reference)?;
                let reference = if single {
                    reference.to_string()
                } else {
                    let repository = reference
                        .rsplit_once(':')
                        .map(|(repository, _)| repository)
                        .unwrap_or(reference);
                    format!("{}@sha256:{:064x}", repository, i + 1)
                };
                Ok(ArchiveDescriptor {
                    reference,
                    archive_path: archive,
                    architecture: Some(architecture.clone()),
                    os: Some(os.clone()),
                })
            })
            .collect()
    }
}
