use super::{SbomBuilder, SbomPorts};
use crate::application::dto::{DocGenerateOptions, ExternalRefSource, OutputFormat};
use crate::application::factories::{FormatterFactory, PresenterFactory, PresenterType};
use crate::application::read_models::SpdxReadModelBuilder;
use crate::sbom_generation::domain::{
    document_ref_id, ChecksumAlgorithm, Checksums, CreatorInfo, Document, ExternalDocumentRef,
    DOCUMENT_ID,
};
use crate::sbom_generation::services::DocumentNaming;
use crate::shared::error::SbomError;
use crate::shared::security::read_metadata_file;
use crate::shared::Result;
use anyhow::Context;

/// Comment attached to the relationships added by `generated_from` stamping
const GENERATED_FROM_COMMENT: &str = "Built from the referenced source document";

/// DocBuilder - Assembles complete documents and writes them out
pub struct DocBuilder {
    builder: SbomBuilder,
}

impl DocBuilder {
    pub fn new(ports: SbomPorts) -> Self {
        Self {
            builder: SbomBuilder::new(ports),
        }
    }

    pub fn builder(&self) -> &SbomBuilder {
        &self.builder
    }

    /// Builds the document described by `options`
    ///
    /// Directories are processed first, then tarballs, image references
    /// and single files. The result has passed `Document::validate`.
    pub async fn generate(&self, options: &DocGenerateOptions) -> Result<Document> {
        options.validate()?;
        let progress = &self.builder.ports().progress;

        let mut document =
            DocumentNaming::new_document(&options.name, options.namespace.as_deref());
        let mut creator = CreatorInfo {
            person: options.creator_person.clone(),
            ..CreatorInfo::default()
        };
        if let Some(organization) = &options.creator_organization {
            creator.organization = organization.clone();
        }
        document.set_creator(creator);

        for source in &options.external_doc_refs {
            let reference = Self::external_ref(source)?;
            tracing::debug!(id = reference.id(), uri = reference.uri(), "external document reference");
            document.add_external_ref(reference)?;
        }

        let mut packages = Vec::new();
        for dir in &options.directories {
            packages.push(self.builder.package_from_directory(dir, &options.sbom).await?);
        }
        for tarball in &options.tarballs {
            packages.push(
                self.builder
                    .package_from_image_tarball(tarball, &options.sbom)
                    .await?,
            );
        }
        for reference in &options.image_references {
            packages.push(
                self.builder
                    .image_ref_to_package(reference, &options.sbom)
                    .await?,
            );
        }

        for mut package in packages {
            if let Some(license) = &options.license {
                package.set_license_concluded(license.clone());
            }
            let id = package.id().to_string();
            document
                .add_package(package)
                .with_context(|| format!("Failed to add package {} to the document", id))?;
        }

        for path in &options.files {
            let file = self.builder.file_from_path(path)?;
            let id = file.id().to_string();
            document
                .add_file(file)
                .with_context(|| format!("Failed to add file {} to the document", id))?;
        }

        if let Some(alias) = &options.generated_from {
            document.stamp_generated_from(
                &document_ref_id(alias),
                DOCUMENT_ID,
                GENERATED_FROM_COMMENT,
            );
        }

        document.validate()?;
        progress.report_completion(&format!(
            "✅ Document {} describes {} element(s)",
            document.name(),
            document.described_ids().len()
        ));
        Ok(document)
    }

    /// Serializes `document` in `format`
    pub fn render(&self, document: &Document, format: OutputFormat) -> Result<String> {
        document.validate()?;
        self.builder
            .ports()
            .progress
            .report(FormatterFactory::progress_message(format));
        let model = SpdxReadModelBuilder::build(document);
        FormatterFactory::create(format).format(&model)
    }

    /// Serializes `document` and hands it to the destination. A file
    /// destination is replaced atomically.
    pub fn write(
        &self,
        document: &Document,
        destination: PresenterType,
        format: OutputFormat,
    ) -> Result<()> {
        let content = self.render(document, format)?;
        PresenterFactory::create(destination).present(&content)
    }

    /// Reads a previously written document and references it by namespace
    /// and SHA1
    fn external_ref(source: &ExternalRefSource) -> Result<ExternalDocumentRef> {
        let content = read_metadata_file(&source.path, "external document")
            .with_context(|| format!("Failed to read external document {}", source.alias))?;
        let namespace = document_namespace(&content).ok_or_else(|| SbomError::Validation {
            message: format!(
                "{} has no document namespace",
                source.path.display()
            ),
        })?;

        let sums = Checksums::from_reader(content.as_bytes()).map_err(|e| SbomError::FileSystem {
            path: source.path.clone(),
            details: e.to_string(),
        })?;
        let mut checksums = Checksums::new();
        if let Some(sha1) = sums.get(ChecksumAlgorithm::Sha1) {
            checksums.insert(ChecksumAlgorithm::Sha1, sha1.to_string());
        }

        let mut reference = ExternalDocumentRef::new(&source.alias, namespace);
        reference.set_checksums(checksums);
        Ok(reference)
    }
}

/// Namespace of a tag-value or JSON document
fn document_namespace(content: &str) -> Option<String> {
    let from_tag_value = content.lines().find_map(|line| {
        line.strip_prefix("DocumentNamespace:")
            .map(|ns| ns.trim().to_string())
    });
    from_tag_value
        .or_else(|| {
            serde_json::from_str::<serde_json::Value>(content)
                .ok()?
                .get("documentNamespace")?
                .as_str()
                .map(String::from)
        })
        .filter(|ns| !ns.is_empty())
}
