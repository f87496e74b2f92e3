use super::{build_id_string, Checksums, Relationship, NOASSERTION};
use std::path::{Path, PathBuf};

/// One scanned file.
///
/// `source_path` points at the file on disk while the document is being
/// built; it is never serialized.
#[derive(Debug, Clone)]
pub struct File {
    id: String,
    name: String,
    source_path: Option<PathBuf>,
    checksums: Checksums,
    license_concluded: String,
    license_info_in_file: String,
    copyright_text: String,
    comment: Option<String>,
    relationships: Vec<Relationship>,
}

impl File {
    /// Creates a file named `name` with an id derived from the name
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: build_id_string(&["SPDXRef-File", &name]),
            name,
            source_path: None,
            checksums: Checksums::new(),
            license_concluded: NOASSERTION.to_string(),
            license_info_in_file: NOASSERTION.to_string(),
            copyright_text: NOASSERTION.to_string(),
            comment: None,
            relationships: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_source_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.source_path = Some(path.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }

    pub fn checksums(&self) -> &Checksums {
        &self.checksums
    }

    pub fn set_checksums(&mut self, checksums: Checksums) {
        self.checksums = checksums;
    }

    pub fn license_concluded(&self) -> &str {
        &self.license_concluded
    }

    pub fn set_license_concluded(&mut self, license: impl Into<String>) {
        self.license_concluded = license.into();
    }

    pub fn license_info_in_file(&self) -> &str {
        &self.license_info_in_file
    }

    pub fn set_license_info_in_file(&mut self, license: impl Into<String>) {
        self.license_info_in_file = license.into();
    }

    pub fn copyright_text(&self) -> &str {
        &self.copyright_text
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    pub fn set_comment(&mut self, comment: impl Into<String>) {
        self.comment = Some(comment.into());
    }

    pub fn relationships(&self) -> &[Relationship] {
        &self.relationships
    }

    pub fn add_relationship(&mut self, relationship: Relationship) {
        self.relationships.push(relationship);
    }
}
