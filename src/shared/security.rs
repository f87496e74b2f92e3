use crate::shared::error::SbomError;
use crate::shared::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// Maximum size of small metadata files read fully into memory
/// (manifests, image configs, license texts).
pub const MAX_METADATA_FILE_SIZE: u64 = 16 * 1024 * 1024;

/// Validates that `path` is an existing directory and returns its absolute form.
///
/// Symbolic links to directories are accepted here: source trees checked out
/// under a symlinked workspace are common in release pipelines.
pub fn validate_directory(path: &Path) -> Result<PathBuf> {
    if !path.exists() {
        return Err(SbomError::InvalidPath {
            path: path.to_path_buf(),
            reason: "Directory does not exist".to_string(),
        }
        .into());
    }

    if !path.is_dir() {
        return Err(SbomError::InvalidPath {
            path: path.to_path_buf(),
            reason: "Not a directory".to_string(),
        }
        .into());
    }

    std::path::absolute(path).map_err(|e| {
        SbomError::InvalidPath {
            path: path.to_path_buf(),
            reason: format!("Failed to resolve absolute path: {}", e),
        }
        .into()
    })
}

/// Validates that a path exists and is a regular file (not a directory or symlink)
///
/// # Errors
/// Returns an error if:
/// - The path doesn't exist
/// - The path is a symbolic link
/// - The path is not a regular file
pub fn validate_regular_file(path: &Path, file_description: &str) -> Result<()> {
    let metadata = fs::symlink_metadata(path).map_err(|e| SbomError::FileSystem {
        path: path.to_path_buf(),
        details: format!("Failed to read {} metadata: {}", file_description, e),
    })?;

    if metadata.is_symlink() {
        anyhow::bail!(
            "Security: {} is a symbolic link. For security reasons, symbolic links are not allowed.",
            path.display()
        );
    }

    if !metadata.is_file() {
        anyhow::bail!("{} is not a regular file", path.display());
    }

    Ok(())
}

/// Reads a small metadata file after checking type and size limits.
pub fn read_metadata_file(path: &Path, file_description: &str) -> Result<String> {
    validate_regular_file(path, file_description)?;

    let size = fs::metadata(path)
        .map_err(|e| SbomError::FileSystem {
            path: path.to_path_buf(),
            details: e.to_string(),
        })?
        .len();
    if size > MAX_METADATA_FILE_SIZE {
        anyhow::bail!(
            "Security: {} is too large ({} bytes). Maximum allowed size is {} bytes.",
            path.display(),
            size,
            MAX_METADATA_FILE_SIZE
        );
    }

    fs::read_to_string(path).map_err(|e| {
        SbomError::FileSystem {
            path: path.to_path_buf(),
            details: format!("Failed to read {}: {}", file_description, e),
        }
        .into()
    })
}

/// Rejects archive member names that would escape the extraction root.
pub fn validate_archive_member(name: &str) -> Result<()> {
    let path = Path::new(name);
    if path.is_absolute()
        || path
            .components()
            .any(|c| matches!(c, std::path::Component::ParentDir))
    {
        anyhow::bail!(
            "Security: archive member '{}' points outside of the archive root",
            name
        );
    }
    Ok(())
}

/// Display form of a relative path: `/` separated, with bytes that are not
/// valid UTF-8 replaced. Only for names and identifier seeds, never for
/// opening the file.
pub fn portable_name(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
