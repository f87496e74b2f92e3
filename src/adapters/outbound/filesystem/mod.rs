/// Filesystem adapters for file I/O operations
mod directory_lister;
mod file_scanner;
mod file_writer;
mod manifest_reader;
mod tarball;

pub use directory_lister::WalkDirLister;
pub use file_scanner::{checksum_file, FileContentScanner};
pub use file_writer::{FileSystemWriter, StdoutPresenter};
pub use manifest_reader::{parse_go_mod, parse_uv_lock, ManifestFileReader};
pub use tarball::{extract_tarball, open_maybe_gzip, TarballReader, ARCHIVE_MANIFEST};
