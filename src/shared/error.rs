use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the CLI application.
///
/// These codes let release tooling distinguish argument mistakes from
/// failures while building or writing a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success - the document was generated and written
    Success = 0,
    /// Invalid command-line arguments (clap parsing errors)
    InvalidArguments = 2,
    /// Application error (I/O, classification, image or serialization error)
    ApplicationError = 3,
}

impl ExitCode {
    /// Convert to i32 for use with std::process::exit
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitCode::Success => write!(f, "Success (0)"),
            ExitCode::InvalidArguments => write!(f, "Invalid Arguments (2)"),
            ExitCode::ApplicationError => write!(f, "Application Error (3)"),
        }
    }
}

/// Errors raised while building SBOM documents.
///
/// Each variant corresponds to one failure family of the construction
/// pipeline. They are wrapped into `anyhow::Error` with extra context at
/// every layer boundary.
#[derive(Debug, Error)]
pub enum SbomError {
    #[error("Filesystem error on {path}\nDetails: {details}")]
    FileSystem { path: PathBuf, details: String },

    #[error("Invalid path: {path}\nReason: {reason}\n\n💡 Hint: Please specify an existing directory or file")]
    InvalidPath { path: PathBuf, reason: String },

    #[error("License classification failed: {details}\n\n💡 Hint: Check the license cache directory ({cache_dir}) is writable")]
    Classification { cache_dir: PathBuf, details: String },

    #[error("Failed to resolve dependencies from {manifest}\nDetails: {details}")]
    DependencyResolution { manifest: PathBuf, details: String },

    #[error("Image error for {reference}\nDetails: {details}")]
    Image { reference: String, details: String },

    /// A relationship or element id that breaks the document graph invariants
    #[error("Document graph error: {details}")]
    Graph { details: String },

    #[error("Failed to write document to {path}\nDetails: {details}\n\n💡 Hint: Please verify that the directory exists and you have write permissions")]
    Serialization { path: PathBuf, details: String },

    /// Validation error for options and configuration
    #[error("Validation error: {message}")]
    Validation { message: String },
}
