use crate::application::read_models::{
    ChecksumView, DocumentView, ExternalRefView, FileView, PackageView, RelationshipView,
    SpdxReadModel,
};
use crate::ports::outbound::SbomFormatter;
use crate::shared::Result;
use std::fmt::Write;

/// TagValueFormatter adapter for generating SPDX 2.2 tag-value documents
///
/// Layout: document header and external references, files without a
/// package, each package followed by its own files, then relationships.
pub struct TagValueFormatter;

impl TagValueFormatter {
    pub fn new() -> Self {
        Self
    }

    /// Wraps free text that may span lines
    fn text(value: &str) -> String {
        if value.contains('\n') {
            format!("<text>{}</text>", value)
        } else {
            value.to_string()
        }
    }

    fn checksum(checksum: &ChecksumView) -> String {
        format!("{}: {}", checksum.algorithm, checksum.value)
    }

    fn render_header(
        &self,
        output: &mut String,
        document: &DocumentView,
        external_refs: &[ExternalRefView],
    ) -> std::fmt::Result {
        writeln!(output, "SPDXVersion: {}", document.spdx_version)?;
        writeln!(output, "DataLicense: {}", document.data_license)?;
        writeln!(output, "SPDXID: {}", document.id)?;
        writeln!(output, "DocumentName: {}", document.name)?;
        writeln!(output, "DocumentNamespace: {}", document.namespace)?;
        for reference in external_refs {
            match &reference.checksum {
                Some(checksum) => writeln!(
                    output,
                    "ExternalDocumentRef: {} {} {}",
                    reference.id,
                    reference.uri,
                    Self::checksum(checksum)
                )?,
                None => writeln!(output, "ExternalDocumentRef: {} {}", reference.id, reference.uri)?,
            }
        }
        for creator in &document.creators {
            writeln!(output, "Creator: {}", creator)?;
        }
        writeln!(output, "Created: {}", document.created)?;
        writeln!(output)
    }

    fn render_package(&self, output: &mut String, package: &PackageView) -> std::fmt::Result {
        writeln!(output, "##### Package: {}", package.name.replace('\n', " "))?;
        writeln!(output)?;
        writeln!(output, "PackageName: {}", Self::text(&package.name))?;
        writeln!(output, "SPDXID: {}", package.id)?;
        if let Some(version) = &package.version {
            writeln!(output, "PackageVersion: {}", version)?;
        }
        if let Some(supplier) = &package.supplier {
            writeln!(output, "PackageSupplier: {}", supplier)?;
        }
        writeln!(output, "PackageDownloadLocation: {}", package.download_location)?;
        writeln!(output, "FilesAnalyzed: {}", package.files_analyzed)?;
        if let Some(code) = &package.verification_code {
            writeln!(output, "PackageVerificationCode: {}", code)?;
        }
        for checksum in &package.checksums {
            writeln!(output, "PackageChecksum: {}", Self::checksum(checksum))?;
        }
        writeln!(output, "PackageLicenseConcluded: {}", package.license_concluded)?;
        for license in &package.license_info_from_files {
            writeln!(output, "PackageLicenseInfoFromFiles: {}", license)?;
        }
        writeln!(output, "PackageLicenseDeclared: {}", package.license_declared)?;
        writeln!(
            output,
            "PackageCopyrightText: {}",
            Self::text(&package.copyright_text)
        )?;
        if let Some(comment) = &package.comment {
            writeln!(output, "PackageComment: <text>{}</text>", comment)?;
        }
        writeln!(output)
    }

    fn render_file(&self, output: &mut String, file: &FileView) -> std::fmt::Result {
        writeln!(output, "FileName: {}", Self::text(&file.name))?;
        writeln!(output, "SPDXID: {}", file.id)?;
        for checksum in &file.checksums {
            writeln!(output, "FileChecksum: {}", Self::checksum(checksum))?;
        }
        writeln!(output, "LicenseConcluded: {}", file.license_concluded)?;
        writeln!(output, "LicenseInfoInFile: {}", file.license_info_in_file)?;
        writeln!(output, "FileCopyrightText: {}", Self::text(&file.copyright_text))?;
        if let Some(comment) = &file.comment {
            writeln!(output, "FileComment: <text>{}</text>", comment)?;
        }
        writeln!(output)
    }

    fn render_relationship(
        &self,
        output: &mut String,
        relationship: &RelationshipView,
    ) -> std::fmt::Result {
        writeln!(
            output,
            "Relationship: {} {} {}",
            relationship.element, relationship.relationship_type, relationship.related
        )?;
        if let Some(comment) = &relationship.comment {
            writeln!(output, "RelationshipComment: <text>{}</text>", comment)?;
        }
        Ok(())
    }

    fn render(&self, model: &SpdxReadModel) -> std::result::Result<String, std::fmt::Error> {
        let mut output = String::new();
        self.render_header(&mut output, &model.document, &model.external_refs)?;

        for file in model.unpackaged_files() {
            self.render_file(&mut output, file)?;
        }
        for package in &model.packages {
            self.render_package(&mut output, package)?;
            for file in model.files_of(package) {
                self.render_file(&mut output, file)?;
            }
        }

        if !model.relationships.is_empty() {
            writeln!(output, "##### Relationships")?;
            writeln!(output)?;
            for relationship in &model.relationships {
                self.render_relationship(&mut output, relationship)?;
            }
        }
        Ok(output)
    }
}

impl Default for TagValueFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl SbomFormatter for TagValueFormatter {
    fn format(&self, model: &SpdxReadModel) -> Result<String> {
        self.render(model)
            .map_err(|e| anyhow::anyhow!("Failed to render tag-value document: {}", e))
    }
}
