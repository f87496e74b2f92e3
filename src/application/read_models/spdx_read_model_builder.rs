//! Builder for constructing SpdxReadModel from a Document

use super::spdx_read_model::{
    ChecksumView, DocumentView, ExternalRefView, FileView, PackageView, RelationshipView,
    SpdxReadModel, SPDX_VERSION,
};
use crate::sbom_generation::domain::{
    Checksums, Document, Element, File, Package, RelationshipType,
};
use chrono::SecondsFormat;
use std::collections::BTreeMap;

/// Builder for constructing SpdxReadModel from domain objects
///
/// The same package may be reached more than once (a dependency shared by
/// two packages); the first occurrence is kept. Package to file containment
/// is expressed through `file_ids`, not through relationships.
pub struct SpdxReadModelBuilder;

impl SpdxReadModelBuilder {
    pub fn build(document: &Document) -> SpdxReadModel {
        let mut packages: BTreeMap<String, PackageView> = BTreeMap::new();
        let mut files: BTreeMap<String, FileView> = BTreeMap::new();
        let mut relationships = Vec::new();

        for id in document.described_ids() {
            relationships.push(RelationshipView {
                element: document.id().to_string(),
                relationship_type: RelationshipType::Describes.to_string(),
                related: id.to_string(),
                comment: None,
            });
        }

        document.walk(&mut |element| {
            match element {
                Element::Package(package) => {
                    if packages.contains_key(package.id()) {
                        return;
                    }
                    for file in package.files() {
                        files
                            .entry(file.id().to_string())
                            .or_insert_with(|| Self::file_view(file, Some(package.id())));
                    }
                    packages.insert(package.id().to_string(), Self::package_view(package));
                }
                Element::File(file) => {
                    files
                        .entry(file.id().to_string())
                        .or_insert_with(|| Self::file_view(file, None));
                }
            }

            for relationship in element.relationships() {
                relationships.push(RelationshipView {
                    element: element.id().to_string(),
                    relationship_type: relationship.relationship_type().to_string(),
                    related: relationship.peer().qualified_id(),
                    comment: relationship.comment().map(str::to_string),
                });
            }
        });

        relationships.sort();
        relationships.dedup_by(|a, b| {
            a.element == b.element
                && a.relationship_type == b.relationship_type
                && a.related == b.related
        });

        SpdxReadModel {
            document: Self::document_view(document),
            external_refs: document
                .external_refs()
                .map(|r| ExternalRefView {
                    id: r.id().to_string(),
                    uri: r.uri().to_string(),
                    checksum: r.primary_checksum().map(|(a, v)| ChecksumView {
                        algorithm: a.to_string(),
                        value: v.to_string(),
                    }),
                })
                .collect(),
            packages: packages.into_values().collect(),
            files: files.into_values().collect(),
            relationships,
        }
    }

    fn document_view(document: &Document) -> DocumentView {
        DocumentView {
            id: document.id().to_string(),
            spdx_version: SPDX_VERSION.to_string(),
            data_license: document.data_license().to_string(),
            name: document.name().to_string(),
            namespace: document.namespace().to_string(),
            created: document
                .created()
                .to_rfc3339_opts(SecondsFormat::Secs, true),
            creators: document.creator().lines(),
            describes: document
                .described_ids()
                .into_iter()
                .map(str::to_string)
                .collect(),
        }
    }

    fn checksum_views(checksums: &Checksums) -> Vec<ChecksumView> {
        checksums
            .iter()
            .map(|(algorithm, value)| ChecksumView {
                algorithm: algorithm.to_string(),
                value: value.to_string(),
            })
            .collect()
    }

    fn package_view(package: &Package) -> PackageView {
        PackageView {
            id: package.id().to_string(),
            name: package.name().to_string(),
            version: package.version().map(str::to_string),
            supplier: package.supplier().map(str::to_string),
            download_location: package.download_location().to_string(),
            files_analyzed: package.files_analyzed(),
            verification_code: package.verification_code(),
            checksums: Self::checksum_views(package.checksums()),
            license_concluded: package.license_concluded().to_string(),
            license_info_from_files: if package.files_analyzed() {
                package.license_info_from_files()
            } else {
                Vec::new()
            },
            license_declared: package.license_declared().to_string(),
            copyright_text: package.copyright_text().to_string(),
            comment: package.comment().map(str::to_string),
            file_ids: package.files().map(|f| f.id().to_string()).collect(),
        }
    }

    fn file_view(file: &File, package: Option<&str>) -> FileView {
        FileView {
            id: file.id().to_string(),
            name: file.name().to_string(),
            package: package.map(str::to_string),
            checksums: Self::checksum_views(file.checksums()),
            license_concluded: file.license_concluded().to_string(),
            license_info_in_file: file.license_info_in_file().to_string(),
            copyright_text: file.copyright_text().to_string(),
            comment: file.comment().map(str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sbom_generation::domain::{ExternalDocumentRef, Relationship};

    fn sample_document() -> Document {
        let mut doc = Document::new("test", "https://example.com/test");

        let mut root = Package::new("root");
        root.set_files_analyzed(true);
        let mut file = File::new("b.txt");
        file.set_license_info_in_file("NONE");
        root.add_file(file).unwrap();
        root.add_file(File::new("a.txt")).unwrap();

        let shared = Package::new("shared").with_version("1.0");
        let mut dep = Package::new("dep");
        dep.add_dependency(shared.clone());
        root.add_dependency(dep);
        root.add_dependency(shared);

        doc.add_package(root).unwrap();
        doc.add_file(File::new("standalone")).unwrap();
        doc
    }

    #[test]
    fn test_build_flattens_and_sorts() {
        let model = SpdxReadModelBuilder::build(&sample_document());

        let package_ids: Vec<&str> = model.packages.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(
            package_ids,
            vec![
                "SPDXRef-Package-dep",
                "SPDXRef-Package-root",
                "SPDXRef-Package-shared"
            ]
        );
        assert_eq!(model.files.len(), 3);
        assert_eq!(model.unpackaged_files().count(), 1);

        let root = &model.packages[1];
        assert_eq!(model.files_of(root).count(), 2);
        assert_eq!(root.license_info_from_files, vec!["NOASSERTION", "NONE"]);
        assert!(root.verification_code.is_some());
    }

    #[test]
    fn test_relationships_describes_and_dedup() {
        let model = SpdxReadModelBuilder::build(&sample_document());

        let describes: Vec<&str> = model
            .relationships
            .iter()
            .filter(|r| r.relationship_type == "DESCRIBES")
            .map(|r| r.related.as_str())
            .collect();
        assert_eq!(
            describes,
            vec!["SPDXRef-File-standalone", "SPDXRef-Package-root"]
        );

        let shared_edges = model
            .relationships
            .iter()
            .filter(|r| r.related == "SPDXRef-Package-shared")
            .count();
        assert_eq!(shared_edges, 2);

        let mut sorted = model.relationships.clone();
        sorted.sort();
        assert_eq!(sorted, model.relationships);
    }

    #[test]
    fn test_external_references_are_qualified() {
        let mut doc = sample_document();
        doc.add_external_ref(ExternalDocumentRef::new("source", "https://example.com/src"))
            .unwrap();
        doc.stamp_generated_from("source", "SPDXRef-DOCUMENT", "built from source");

        let model = SpdxReadModelBuilder::build(&doc);
        let generated: Vec<&RelationshipView> = model
            .relationships
            .iter()
            .filter(|r| r.relationship_type == "GENERATED_FROM")
            .collect();
        assert_eq!(generated.len(), 2);
        assert_eq!(generated[0].related, "DocumentRef-source:SPDXRef-DOCUMENT");
        assert_eq!(model.external_refs[0].id, "DocumentRef-source");
    }

    #[test]
    fn test_created_is_utc_seconds() {
        let model = SpdxReadModelBuilder::build(&sample_document());
        assert!(model.document.created.ends_with('Z'));
        assert_eq!(model.document.created.len(), "2021-01-01T00:00:00Z".len());
    }

    #[test]
    fn test_reference_relationship_kept() {
        let mut doc = Document::new("t", "https://example.com/t");
        let mut a = Package::new("a");
        a.add_relationship(Relationship::to_reference(
            RelationshipType::DependsOn,
            "SPDXRef-Package-b",
        ));
        doc.add_package(a).unwrap();
        doc.add_package(Package::new("b")).unwrap();

        let model = SpdxReadModelBuilder::build(&doc);
        assert!(model.relationships.iter().any(|r| r.element == "SPDXRef-Package-a"
            && r.relationship_type == "DEPENDS_ON"
            && r.related == "SPDXRef-Package-b"));
    }
}
