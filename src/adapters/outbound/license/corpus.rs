use crate::ports::outbound::LicenseCorpusSource;
use crate::sbom_generation::domain::License;
use crate::shared::error::SbomError;
use crate::shared::security::read_metadata_file;
use crate::shared::Result;
use futures::stream::{self, StreamExt, TryStreamExt};
use std::fs;
use std::path::{Path, PathBuf};

const CORPUS_EXTENSION: &str = "txt";

/// Downloads in flight while materializing the corpus
const MAX_CONCURRENT_DOWNLOADS: usize = 10;

/// LicenseCorpus - License texts stored as `<ID>.txt` in one directory
///
/// A populated directory is loaded as-is. An empty or missing one is filled
/// from a LicenseCorpusSource first.
#[derive(Debug, Clone)]
pub struct LicenseCorpus {
    dir: PathBuf,
}

impl LicenseCorpus {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn classification_error(&self, details: impl Into<String>) -> anyhow::Error {
        SbomError::Classification {
            cache_dir: self.dir.clone(),
            details: details.into(),
        }
        .into()
    }

    fn text_files(&self) -> Result<Vec<PathBuf>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(self.classification_error(format!("Cannot read corpus: {}", e)))
            }
        };

        let mut files: Vec<PathBuf> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_file() && p.extension().is_some_and(|x| x == CORPUS_EXTENSION))
            .collect();
        files.sort();
        Ok(files)
    }

    pub fn is_populated(&self) -> Result<bool> {
        Ok(!self.text_files()?.is_empty())
    }

    /// Reads every license text of the directory, ordered by id
    pub fn load(&self) -> Result<Vec<License>> {
        self.text_files()?
            .into_iter()
            .filter_map(|path| {
                let id = path.file_stem()?.to_string_lossy().into_owned();
                Some((id, path))
            })
            .map(|(id, path)| {
                let text = read_metadata_file(&path, "license text")?;
                Ok(License::new(id).with_text(text))
            })
            .collect()
    }

    /// Fetches every license the source lists and writes its text into the
    /// corpus directory
    ///
    /// # Returns
    /// Number of license texts written
    pub async fn materialize(&self, source: &dyn LicenseCorpusSource) -> Result<usize> {
        let ids = source.license_ids().await?;
        fs::create_dir_all(&self.dir)
            .map_err(|e| self.classification_error(format!("Cannot create corpus: {}", e)))?;

        tracing::info!(licenses = ids.len(), dir = %self.dir.display(), "building license corpus");
        let licenses: Vec<License> = stream::iter(ids)
            .map(|id| async move { source.fetch_license(&id).await })
            .buffer_unordered(MAX_CONCURRENT_DOWNLOADS)
            .try_collect()
            .await?;

        let mut written = 0;
        for license in licenses {
            let Some(text) = license.text() else {
                tracing::debug!(license = license.id(), "license has no text, skipping");
                continue;
            };
            let path = self
                .dir
                .join(format!("{}.{}", license.id(), CORPUS_EXTENSION));
            fs::write(&path, text).map_err(|e| {
                self.classification_error(format!("Cannot write {}: {}", path.display(), e))
            })?;
            written += 1;
        }
        Ok(written)
    }

    /// Loads the corpus, materializing it from `source` when the directory
    /// holds no texts yet
    pub async fn ensure(&self, source: &dyn LicenseCorpusSource) -> Result<Vec<License>> {
        if !self.is_populated()? {
            self.materialize(source).await?;
        }
        let licenses = self.load()?;
        if licenses.is_empty() {
            return Err(self.classification_error("license corpus is empty"));
        }
        Ok(licenses)
    }
}
