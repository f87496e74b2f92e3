use super::{OutputFormat, SbomOptions};
use crate::sbom_generation::domain::{document_ref_id, is_valid_id, DOCUMENT_REF_PREFIX};
use crate::shared::error::SbomError;
use crate::shared::Result;
use std::path::PathBuf;

/// A previously written document to reference from the new one
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalRefSource {
    /// Local alias, with or without the `DocumentRef-` prefix
    pub alias: String,
    /// The referenced document on disk; its namespace becomes the reference
    /// URI and its SHA1 the reference checksum
    pub path: PathBuf,
}

impl std::str::FromStr for ExternalRefSource {
    type Err = String;

    /// Parses `alias=path`
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.split_once('=') {
            Some((alias, path)) if !alias.trim().is_empty() && !path.trim().is_empty() => {
                Ok(Self {
                    alias: alias.trim().to_string(),
                    path: PathBuf::from(path.trim()),
                })
            }
            _ => Err(format!(
                "Invalid external document reference '{}'. Expected ALIAS=PATH",
                s
            )),
        }
    }
}

/// Request for one complete document
#[derive(Debug, Clone, Default)]
pub struct DocGenerateOptions {
    pub name: String,
    /// Unique namespace; generated when absent
    pub namespace: Option<String>,
    pub creator_person: Option<String>,
    pub creator_organization: Option<String>,
    /// Concluded license forced onto every top-level package
    pub license: Option<String>,
    pub directories: Vec<PathBuf>,
    pub tarballs: Vec<PathBuf>,
    pub image_references: Vec<String>,
    pub files: Vec<PathBuf>,
    pub external_doc_refs: Vec<ExternalRefSource>,
    /// Alias of an external reference every top-level element is stamped
    /// `GENERATED_FROM`
    pub generated_from: Option<String>,
    pub output_file: Option<PathBuf>,
    pub format: OutputFormat,
    /// JSON registry of known base-image layers
    pub layer_signatures: Option<PathBuf>,
    pub sbom: SbomOptions,
}

impl DocGenerateOptions {
    /// Checks the request is complete before any work starts
    pub fn validate(&self) -> Result<()> {
        if self.directories.is_empty()
            && self.tarballs.is_empty()
            && self.image_references.is_empty()
            && self.files.is_empty()
        {
            return Err(SbomError::Validation {
                message: "Nothing to describe: specify at least one directory, tarball, image or file"
                    .to_string(),
            }
            .into());
        }

        for alias in self
            .external_doc_refs
            .iter()
            .map(|r| &r.alias)
            .chain(self.generated_from.as_ref())
        {
            let bare = alias.trim();
            let bare = bare.strip_prefix(DOCUMENT_REF_PREFIX).unwrap_or(bare);
            if !is_valid_id(bare) {
                return Err(SbomError::Validation {
                    message: format!(
                        "Invalid external document alias '{}': use only letters, digits, '-' and '.'",
                        alias
                    ),
                }
                .into());
            }
        }

        if let Some(alias) = &self.generated_from {
            let wanted = document_ref_id(alias);
            let known = self
                .external_doc_refs
                .iter()
                .any(|r| document_ref_id(&r.alias) == wanted);
            if !known {
                return Err(SbomError::Validation {
                    message: format!(
                        "generated-from alias '{}' does not name an external document reference",
                        alias
                    ),
                }
                .into());
            }
        }
        Ok(())
    }
}
