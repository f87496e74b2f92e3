use crate::application::read_models::{
    ChecksumView, FileView, PackageView, RelationshipView, SpdxReadModel,
};
use crate::ports::outbound::SbomFormatter;
use crate::shared::Result;
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SpdxDocument {
    #[serde(rename = "SPDXID")]
    spdx_id: String,
    spdx_version: String,
    creation_info: CreationInfo,
    name: String,
    data_license: String,
    document_namespace: String,
    document_describes: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    external_document_refs: Vec<ExternalDocumentRef>,
    packages: Vec<Package>,
    files: Vec<File>,
    relationships: Vec<Relationship>,
}

#[derive(Debug, Serialize)]
struct CreationInfo {
    created: String,
    creators: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExternalDocumentRef {
    external_document_id: String,
    spdx_document: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    checksum: Option<Checksum>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Checksum {
    algorithm: String,
    checksum_value: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VerificationCode {
    package_verification_code_value: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Package {
    #[serde(rename = "SPDXID")]
    spdx_id: String,
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    version_info: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    supplier: Option<String>,
    download_location: String,
    files_analyzed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    package_verification_code: Option<VerificationCode>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    checksums: Vec<Checksum>,
    license_concluded: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    license_info_from_files: Vec<String>,
    license_declared: String,
    copyright_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    comment: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    has_files: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct File {
    #[serde(rename = "SPDXID")]
    spdx_id: String,
    file_name: String,
    checksums: Vec<Checksum>,
    license_concluded: String,
    license_info_in_files: Vec<String>,
    copyright_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    comment: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Relationship {
    spdx_element_id: String,
    relationship_type: String,
    related_spdx_element: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    comment: Option<String>,
}

/// SpdxJsonFormatter adapter for generating SPDX 2.2 JSON documents
///
/// This adapter implements the SbomFormatter port for the SPDX JSON syntax.
pub struct SpdxJsonFormatter;

impl SpdxJsonFormatter {
    pub fn new() -> Self {
        Self
    }

    fn build_checksums(checksums: &[ChecksumView]) -> Vec<Checksum> {
        checksums
            .iter()
            .map(|c| Checksum {
                algorithm: c.algorithm.clone(),
                checksum_value: c.value.clone(),
            })
            .collect()
    }

    fn build_package(package: &PackageView) -> Package {
        Package {
            spdx_id: package.id.clone(),
            name: package.name.clone(),
            version_info: package.version.clone(),
            supplier: package.supplier.clone(),
            download_location: package.download_location.clone(),
            files_analyzed: package.files_analyzed,
            package_verification_code: package.verification_code.as_ref().map(|code| {
                VerificationCode {
                    package_verification_code_value: code.clone(),
                }
            }),
            checksums: Self::build_checksums(&package.checksums),
            license_concluded: package.license_concluded.clone(),
            license_info_from_files: package.license_info_from_files.clone(),
            license_declared: package.license_declared.clone(),
            copyright_text: package.copyright_text.clone(),
            comment: package.comment.clone(),
            has_files: package.file_ids.clone(),
        }
    }

    fn build_file(file: &FileView) -> File {
        File {
            spdx_id: file.id.clone(),
            file_name: file.name.clone(),
            checksums: Self::build_checksums(&file.checksums),
            license_concluded: file.license_concluded.clone(),
            license_info_in_files: vec![file.license_info_in_file.clone()],
            copyright_text: file.copyright_text.clone(),
            comment: file.comment.clone(),
        }
    }

    fn build_relationship(relationship: &RelationshipView) -> Relationship {
        Relationship {
            spdx_element_id: relationship.element.clone(),
            relationship_type: relationship.relationship_type.clone(),
            related_spdx_element: relationship.related.clone(),
            comment: relationship.comment.clone(),
        }
    }
}

impl Default for SpdxJsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl SbomFormatter for SpdxJsonFormatter {
    fn format(&self, model: &SpdxReadModel) -> Result<String> {
        let document = SpdxDocument {
            spdx_id: model.document.id.clone(),
            spdx_version: model.document.spdx_version.clone(),
            creation_info: CreationInfo {
                created: model.document.created.clone(),
                creators: model.document.creators.clone(),
            },
            name: model.document.name.clone(),
            data_license: model.document.data_license.clone(),
            document_namespace: model.document.namespace.clone(),
            document_describes: model.document.describes.clone(),
            external_document_refs: model
                .external_refs
                .iter()
                .map(|r| ExternalDocumentRef {
                    external_document_id: r.id.clone(),
                    spdx_document: r.uri.clone(),
                    checksum: r.checksum.as_ref().map(|c| Checksum {
                        algorithm: c.algorithm.clone(),
                        checksum_value: c.value.clone(),
                    }),
                })
                .collect(),
            packages: model.packages.iter().map(Self::build_package).collect(),
            files: model.files.iter().map(Self::build_file).collect(),
            relationships: model
                .relationships
                .iter()
                .map(Self::build_relationship)
                .collect(),
        };

        serde_json::to_string_pretty(&document).map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::read_models::SpdxReadModelBuilder;
    use crate::sbom_generation::domain::{Document, File as SpdxFile, Package as SpdxPackage};
    use chrono::{TimeZone, Utc};

    fn create_test_read_model() -> SpdxReadModel {
        let mut doc = Document::new("pause", "https://example.com/pause");
        doc.set_created(Utc.with_ymd_and_hms(2023, 1, 2, 3, 4, 5).unwrap());

        let mut package = SpdxPackage::new("pause").with_version("3.9");
        package.set_files_analyzed(true);
        package.add_file(SpdxFile::new("pause.bin")).unwrap();
        doc.add_package(package).unwrap();
        SpdxReadModelBuilder::build(&doc)
    }

    #[test]
    fn test_format_json_structure() {
        let output = SpdxJsonFormatter::new()
            .format(&create_test_read_model())
            .unwrap();
        let json: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(json["spdxVersion"], "SPDX-2.2");
        assert_eq!(json["SPDXID"], "SPDXRef-DOCUMENT");
        assert_eq!(json["dataLicense"], "CC0-1.0");
        assert_eq!(json["creationInfo"]["created"], "2023-01-02T03:04:05Z");
        assert_eq!(json["documentDescribes"][0], "SPDXRef-Package-pause");
        assert!(json.get("externalDocumentRefs").is_none());

        let package = &json["packages"][0];
        assert_eq!(package["versionInfo"], "3.9");
        assert_eq!(package["filesAnalyzed"], true);
        assert_eq!(package["hasFiles"][0], "SPDXRef-File-pause.bin");
        assert!(package["packageVerificationCode"]["packageVerificationCodeValue"].is_string());

        assert_eq!(json["files"][0]["fileName"], "pause.bin");
        assert_eq!(json["files"][0]["licenseInfoInFiles"][0], "NOASSERTION");
        assert_eq!(json["relationships"][0]["relationshipType"], "DESCRIBES");
    }

    #[test]
    fn test_format_is_stable() {
        let formatter = SpdxJsonFormatter::new();
        let first = formatter.format(&create_test_read_model()).unwrap();
        let second = formatter.format(&create_test_read_model()).unwrap();
        assert_eq!(first, second);
    }
}
