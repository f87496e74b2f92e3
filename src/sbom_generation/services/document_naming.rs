use crate::sbom_generation::domain::{build_id_string, Document};
use uuid::Uuid;

/// Base of namespaces generated when the caller does not provide one
pub const DEFAULT_NAMESPACE_BASE: &str = "https://spdx.org/spdxdocs";

/// Kind of SBOM produced for a release
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BomKind {
    /// The source tree of a release
    Source,
    /// The artifacts built from that source tree
    Release,
}

impl BomKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BomKind::Source => "source",
            BomKind::Release => "release",
        }
    }
}

/// DocumentNaming service for document names, namespaces and file names
///
/// Release SBOMs follow a fixed convention: `https://sbom.<domain>/<version>/<kind>`
/// as namespace and `<kind>-bom-<version>.spdx` as file name.
pub struct DocumentNaming;

impl DocumentNaming {
    /// Namespace of a release SBOM, e.g. `https://sbom.k8s.io/v1.22.0/source`
    pub fn release_namespace(domain: &str, version: &str, kind: BomKind) -> String {
        format!(
            "https://sbom.{}/{}/{}",
            domain.trim_matches('/'),
            version,
            kind.as_str()
        )
    }

    /// File name of a release SBOM, e.g. `release-bom-v1.22.0.spdx`
    pub fn file_name(version: &str, kind: BomKind) -> String {
        format!("{}-bom-{}.spdx", kind.as_str(), version)
    }

    /// Alias under which a source SBOM is referenced from the release SBOM
    pub fn source_reference_alias(project: &str, version: &str) -> String {
        build_id_string(&[project, version])
    }

    /// A namespace unique to this invocation
    pub fn unique_namespace(name: &str) -> String {
        let name = build_id_string(&[name]);
        format!("{}/{}-{}", DEFAULT_NAMESPACE_BASE, name, Uuid::new_v4())
    }

    /// Creates an empty document, generating a namespace when none is given
    pub fn new_document(name: &str, namespace: Option<&str>) -> Document {
        let namespace = match namespace {
            Some(ns) if !ns.trim().is_empty() => ns.to_string(),
            _ => Self::unique_namespace(name),
        };
        Document::new(name, namespace)
    }
}
