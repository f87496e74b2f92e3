pub mod checksum;
pub mod document;
pub mod external_ref;
pub mod file;
pub mod identifier;
pub mod license;
pub mod manifest;
pub mod package;
pub mod relationship;

pub use checksum::{verification_code, ChecksumAlgorithm, Checksums};
pub use document::{CreatorInfo, Document, Element, DEFAULT_DOCUMENT_AUTHOR};
pub use external_ref::ExternalDocumentRef;
pub use file::File;
pub use identifier::{
    build_id_string, document_ref_id, is_valid_id, IdAllocator, DOCUMENT_ID, DOCUMENT_REF_PREFIX, SPDX_REF_PREFIX,
};
pub use license::{License, DATA_LICENSE, NOASSERTION, NONE};
pub use manifest::{DeclaredModule, DependencyManifest, ManifestKind};
pub use package::{ImageMetadata, Package};
pub use relationship::{Relationship, RelationshipPeer, RelationshipType};
