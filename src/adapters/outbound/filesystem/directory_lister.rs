use crate::ports::outbound::DirectoryLister;
use crate::shared::error::SbomError;
use crate::shared::Result;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Directories never descended into while listing a tree
const SKIPPED_DIRECTORIES: &[&str] = &[".git"];

/// WalkDirLister adapter listing a tree with `walkdir`
///
/// Symbolic links are not followed and are not reported as files.
#[derive(Debug, Default, Clone)]
pub struct WalkDirLister;

impl WalkDirLister {
    pub fn new() -> Self {
        Self
    }
}

impl DirectoryLister for WalkDirLister {
    fn list_files(&self, root: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        for entry in WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                e.depth() == 0
                    || !(e.file_type().is_dir()
                        && SKIPPED_DIRECTORIES.contains(&e.file_name().to_string_lossy().as_ref()))
            })
        {
            let entry = entry.map_err(|e| SbomError::FileSystem {
                path: e.path().unwrap_or(root).to_path_buf(),
                details: format!("Failed to walk directory tree: {}", e),
            })?;

            if !entry.file_type().is_file() {
                continue;
            }

            let relative = entry
                .path()
                .strip_prefix(root)
                .map_err(|e| SbomError::FileSystem {
                    path: entry.path().to_path_buf(),
                    details: e.to_string(),
                })?;
            files.push(relative.to_path_buf());
        }

        files.sort();
        Ok(files)
    }
}
