//! SPDX read model for serialization
//!
//! A flat, ordered view of a document graph. Formatters only ever see this
//! view, so every output syntax shares one ordering and de-duplication rule.

/// SPDX version written by every formatter
pub const SPDX_VERSION: &str = "SPDX-2.2";

/// Main read model for SPDX documents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpdxReadModel {
    pub document: DocumentView,
    /// Ordered by id
    pub external_refs: Vec<ExternalRefView>,
    /// Every package of the graph, nested ones included, ordered by id
    pub packages: Vec<PackageView>,
    /// Every file of the graph, ordered by id
    pub files: Vec<FileView>,
    /// Ordered by element, type and peer; duplicates removed
    pub relationships: Vec<RelationshipView>,
}

impl SpdxReadModel {
    /// Files not owned by any package
    pub fn unpackaged_files(&self) -> impl Iterator<Item = &FileView> {
        self.files.iter().filter(|f| f.package.is_none())
    }

    /// Files owned by `package`, ordered by id
    pub fn files_of<'a>(&'a self, package: &'a PackageView) -> impl Iterator<Item = &'a FileView> {
        self.files
            .iter()
            .filter(move |f| f.package.as_deref() == Some(package.id.as_str()))
    }
}

/// View representation of document metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentView {
    pub id: String,
    pub spdx_version: String,
    pub data_license: String,
    pub name: String,
    pub namespace: String,
    /// RFC 3339, seconds precision, UTC
    pub created: String,
    pub creators: Vec<String>,
    pub describes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecksumView {
    pub algorithm: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalRefView {
    pub id: String,
    pub uri: String,
    pub checksum: Option<ChecksumView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageView {
    pub id: String,
    pub name: String,
    pub version: Option<String>,
    pub supplier: Option<String>,
    pub download_location: String,
    pub files_analyzed: bool,
    pub verification_code: Option<String>,
    pub checksums: Vec<ChecksumView>,
    pub license_concluded: String,
    pub license_info_from_files: Vec<String>,
    pub license_declared: String,
    pub copyright_text: String,
    pub comment: Option<String>,
    /// Ids of the owned files, ordered
    pub file_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileView {
    pub id: String,
    pub name: String,
    /// Id of the owning package, if any
    pub package: Option<String>,
    pub checksums: Vec<ChecksumView>,
    pub license_concluded: String,
    pub license_info_in_file: String,
    pub copyright_text: String,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct RelationshipView {
    pub element: String,
    pub relationship_type: String,
    /// Peer id, qualified with its document alias when external
    pub related: String,
    pub comment: Option<String>,
}
