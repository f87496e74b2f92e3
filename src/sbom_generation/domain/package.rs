use super::{
    build_id_string, verification_code, ChecksumAlgorithm, Checksums, File, Relationship,
    RelationshipPeer, RelationshipType, NOASSERTION,
};
use crate::shared::error::SbomError;
use crate::shared::Result;
use std::collections::{BTreeMap, BTreeSet};

/// Container image metadata attached to image and layer packages
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageMetadata {
    pub architecture: Option<String>,
    pub os: Option<String>,
    pub repo_tags: Vec<String>,
    /// Base distribution identified by layer analysis (e.g. "debian 11")
    pub distribution: Option<String>,
}

impl ImageMetadata {
    /// One-line description used as the package comment
    pub fn summary(&self) -> Option<String> {
        let mut parts = Vec::new();
        if let Some(os) = &self.os {
            parts.push(format!("os: {}", os));
        }
        if let Some(arch) = &self.architecture {
            parts.push(format!("architecture: {}", arch));
        }
        if !self.repo_tags.is_empty() {
            parts.push(format!("tags: {}", self.repo_tags.join(", ")));
        }
        if let Some(distro) = &self.distribution {
            parts.push(format!("distribution: {}", distro));
        }
        if parts.is_empty() {
            None
        } else {
            Some(parts.join("; "))
        }
    }
}

/// A named unit of the document: a source tree, an image, a layer or a
/// dependency.
///
/// The package owns its files and its outgoing relationships, including
/// any sub-packages reached through them.
#[derive(Debug, Clone)]
pub struct Package {
    id: String,
    name: String,
    version: Option<String>,
    files_analyzed: bool,
    license_concluded: String,
    license_declared: String,
    download_location: String,
    copyright_text: String,
    supplier: Option<String>,
    comment: Option<String>,
    checksums: Checksums,
    files: BTreeMap<String, File>,
    relationships: Vec<Relationship>,
    image: Option<ImageMetadata>,
}

impl Package {
    /// Creates a package named `name` with an id derived from the name
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: build_id_string(&["SPDXRef-Package", &name]),
            name,
            version: None,
            files_analyzed: false,
            license_concluded: NOASSERTION.to_string(),
            license_declared: NOASSERTION.to_string(),
            download_location: NOASSERTION.to_string(),
            copyright_text: NOASSERTION.to_string(),
            supplier: None,
            comment: None,
            checksums: Checksums::new(),
            files: BTreeMap::new(),
            relationships: Vec::new(),
            image: None,
        }
    }

    /// Rebuilds the id from `SPDXRef-Package` plus the given seeds
    pub fn build_id(&mut self, seeds: &[&str]) {
        let mut all = Vec::with_capacity(seeds.len() + 1);
        all.push("SPDXRef-Package");
        all.extend_from_slice(seeds);
        self.id = build_id_string(&all);
    }

    /// Replaces the id with one allocated by the caller
    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = id.into();
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
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

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn files_analyzed(&self) -> bool {
        self.files_analyzed
    }

    pub fn set_files_analyzed(&mut self, analyzed: bool) {
        self.files_analyzed = analyzed;
    }

    pub fn license_concluded(&self) -> &str {
        &self.license_concluded
    }

    pub fn set_license_concluded(&mut self, license: impl Into<String>) {
        self.license_concluded = license.into();
    }

    pub fn license_declared(&self) -> &str {
        &self.license_declared
    }

    pub fn set_license_declared(&mut self, license: impl Into<String>) {
        self.license_declared = license.into();
    }

    pub fn download_location(&self) -> &str {
        &self.download_location
    }

    pub fn set_download_location(&mut self, location: impl Into<String>) {
        self.download_location = location.into();
    }

    pub fn copyright_text(&self) -> &str {
        &self.copyright_text
    }

    pub fn supplier(&self) -> Option<&str> {
        self.supplier.as_deref()
    }

    pub fn set_supplier(&mut self, supplier: impl Into<String>) {
        self.supplier = Some(supplier.into());
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    pub fn set_comment(&mut self, comment: impl Into<String>) {
        self.comment = Some(comment.into());
    }

    pub fn checksums(&self) -> &Checksums {
        &self.checksums
    }

    pub fn set_checksums(&mut self, checksums: Checksums) {
        self.checksums = checksums;
    }

    pub fn image(&self) -> Option<&ImageMetadata> {
        self.image.as_ref()
    }

    pub fn image_mut(&mut self) -> &mut ImageMetadata {
        self.image.get_or_insert_with(ImageMetadata::default)
    }

    pub fn set_image(&mut self, image: ImageMetadata) {
        self.image = Some(image);
    }

    /// Files owned by this package, ordered by id
    pub fn files(&self) -> impl Iterator<Item = &File> {
        self.files.values()
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    pub fn file(&self, id: &str) -> Option<&File> {
        self.files.get(id)
    }

    /// Adds a file, rejecting a second file with the same id
    pub fn add_file(&mut self, file: File) -> Result<()> {
        if self.files.contains_key(file.id()) {
            return Err(SbomError::Graph {
                details: format!(
                    "file id {} already exists in package {}",
                    file.id(),
                    self.id
                ),
            }
            .into());
        }
        self.files.insert(file.id().to_string(), file);
        Ok(())
    }

    pub fn relationships(&self) -> &[Relationship] {
        &self.relationships
    }

    pub fn add_relationship(&mut self, relationship: Relationship) {
        self.relationships.push(relationship);
    }

    /// Links a resolved dependency with `DEPENDS_ON`
    pub fn add_dependency(&mut self, dependency: Package) {
        self.add_relationship(Relationship::to_package(
            RelationshipType::DependsOn,
            dependency,
        ));
    }

    /// Nests a sub-package (e.g. an image layer) with `CONTAINS`
    pub fn add_package(&mut self, package: Package) {
        self.add_relationship(Relationship::to_package(RelationshipType::Contains, package));
    }

    /// Links an architecture-specific image with `VARIANT_OF`
    pub fn add_variant(&mut self, variant: Package) {
        self.add_relationship(Relationship::to_package(RelationshipType::VariantOf, variant));
    }

    /// Sub-packages reached through relationships of the given type
    pub fn related_packages(
        &self,
        relationship_type: RelationshipType,
    ) -> impl Iterator<Item = &Package> {
        self.relationships.iter().filter_map(move |r| {
            match (r.relationship_type() == relationship_type, r.peer()) {
                (true, RelationshipPeer::Package(p)) => Some(p.as_ref()),
                _ => None,
            }
        })
    }

    /// Distinct license-found values of the owned files, sorted
    pub fn license_info_from_files(&self) -> Vec<String> {
        self.files
            .values()
            .map(|f| f.license_info_in_file().to_string())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Verification code over the owned files, when files were analyzed
    pub fn verification_code(&self) -> Option<String> {
        if !self.files_analyzed || self.files.is_empty() {
            return None;
        }
        Some(verification_code(
            self.files
                .values()
                .filter_map(|f| f.checksums().get(ChecksumAlgorithm::Sha1)),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sbom_generation::domain::NONE;

    fn file_with_license(name: &str, found: &str) -> File {
        let mut file = File::new(name);
        file.set_license_info_in_file(found);
        let mut sums = Checksums::new();
        sums.insert(ChecksumAlgorithm::Sha1, format!("{:0>40}", name.len()));
        file.set_checksums(sums);
        file
    }

    #[test]
    fn test_package_new_defaults() {
        let package = Package::new("kubernetes");
        assert_eq!(package.id(), "SPDXRef-Package-kubernetes");
        assert_eq!(package.name(), "kubernetes");
        assert_eq!(package.version(), None);
        assert!(!package.files_analyzed());
        assert_eq!(package.license_concluded(), NOASSERTION);
        assert_eq!(package.download_location(), NOASSERTION);
    }

    #[test]
    fn test_build_id_with_seeds() {
        let mut package = Package::new("golang.org/x/text").with_version("v0.3.7");
        package.build_id(&["golang.org/x/text", "v0.3.7"]);
        assert_eq!(package.id(), "SPDXRef-Package-golang.org-x-text-v0.3.7");
        assert_eq!(package.version(), Some("v0.3.7"));
    }

    #[test]
    fn test_add_file_rejects_duplicate_id() {
        let mut package = Package::new("tree");
        package.add_file(File::new("a.txt")).unwrap();
        let result = package.add_file(File::new("a.txt"));
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("already exists"));
        assert_eq!(package.file_count(), 1);
    }

    #[test]
    fn test_files_are_ordered_by_id() {
        let mut package = Package::new("tree");
        package.add_file(File::new("z.txt")).unwrap();
        package.add_file(File::new("a.txt")).unwrap();
        let names: Vec<_> = package.files().map(|f| f.name()).collect();
        assert_eq!(names, vec!["a.txt", "z.txt"]);
    }

    #[test]
    fn test_license_info_from_files_is_distinct_and_sorted() {
        let mut package = Package::new("tree");
        package.add_file(file_with_license("a", "MIT")).unwrap();
        package.add_file(file_with_license("b", NONE)).unwrap();
        package.add_file(file_with_license("c", "Apache-2.0")).unwrap();
        package.add_file(file_with_license("d", "MIT")).unwrap();

        assert_eq!(
            package.license_info_from_files(),
            vec!["Apache-2.0".to_string(), "MIT".to_string(), NONE.to_string()]
        );
    }

    #[test]
    fn test_verification_code_requires_analyzed_files() {
        let mut package = Package::new("tree");
        package.add_file(file_with_license("a", NONE)).unwrap();
        assert!(package.verification_code().is_none());

        package.set_files_analyzed(true);
        assert_eq!(package.verification_code().unwrap().len(), 40);
    }

    #[test]
    fn test_related_packages_by_type() {
        let mut package = Package::new("app");
        package.add_dependency(Package::new("dep-a"));
        package.add_dependency(Package::new("dep-b"));
        package.add_package(Package::new("layer"));

        assert_eq!(package.related_packages(RelationshipType::DependsOn).count(), 2);
        assert_eq!(package.related_packages(RelationshipType::Contains).count(), 1);
        assert_eq!(package.related_packages(RelationshipType::VariantOf).count(), 0);
    }

    #[test]
    fn test_image_metadata_summary() {
        let mut package = Package::new("registry.k8s.io/pause:3.9");
        assert!(package.image().is_none());

        let image = package.image_mut();
        image.os = Some("linux".to_string());
        image.architecture = Some("arm64".to_string());
        image.repo_tags = vec!["registry.k8s.io/pause:3.9".to_string()];

        assert_eq!(
            package.image().unwrap().summary().unwrap(),
            "os: linux; architecture: arm64; tags: registry.k8s.io/pause:3.9"
        );
        assert!(ImageMetadata::default().summary().is_none());
    }
}
