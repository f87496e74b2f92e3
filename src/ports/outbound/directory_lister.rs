use crate::shared::Result;
use std::path::{Path, PathBuf};

/// DirectoryLister port for enumerating the files of a directory tree
pub trait DirectoryLister: Send + Sync {
    /// Lists every regular file below `root`
    ///
    /// # Returns
    /// Paths relative to `root`, sorted. Names are kept as found on disk,
    /// including names that are not valid UTF-8.
    ///
    /// # Errors
    /// Returns an error if the tree cannot be walked
    fn list_files(&self, root: &Path) -> Result<Vec<PathBuf>>;
}
