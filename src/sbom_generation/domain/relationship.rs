use super::{File, Package, DOCUMENT_REF_PREFIX};
use std::fmt;

/// Relationship types used by the builder
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RelationshipType {
    Describes,
    Contains,
    DependsOn,
    DependencyOf,
    GeneratedFrom,
    VariantOf,
}

impl RelationshipType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationshipType::Describes => "DESCRIBES",
            RelationshipType::Contains => "CONTAINS",
            RelationshipType::DependsOn => "DEPENDS_ON",
            RelationshipType::DependencyOf => "DEPENDENCY_OF",
            RelationshipType::GeneratedFrom => "GENERATED_FROM",
            RelationshipType::VariantOf => "VARIANT_OF",
        }
    }
}

impl fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The far end of a relationship.
///
/// A peer is either an element owned by the relationship (sub-packages such
/// as dependencies, layers or architecture variants) or a plain reference
/// to an element that lives elsewhere, possibly in another document.
#[derive(Debug, Clone)]
pub enum RelationshipPeer {
    Package(Box<Package>),
    File(Box<File>),
    Reference {
        id: String,
        /// Alias of the external document holding the element, if any
        document: Option<String>,
    },
}

impl RelationshipPeer {
    pub fn id(&self) -> &str {
        match self {
            RelationshipPeer::Package(p) => p.id(),
            RelationshipPeer::File(f) => f.id(),
            RelationshipPeer::Reference { id, .. } => id,
        }
    }

    pub fn document(&self) -> Option<&str> {
        match self {
            RelationshipPeer::Reference { document, .. } => document.as_deref(),
            _ => None,
        }
    }

    /// Identifier as written in the document: `DocumentRef-x:SPDXRef-y` for
    /// external peers, the bare id otherwise.
    pub fn qualified_id(&self) -> String {
        match self.document() {
            Some(doc) if doc.starts_with(DOCUMENT_REF_PREFIX) => {
                format!("{}:{}", doc, self.id())
            }
            Some(doc) => format!("{}{}:{}", DOCUMENT_REF_PREFIX, doc, self.id()),
            None => self.id().to_string(),
        }
    }
}

/// Typed edge from the owning element to a peer
#[derive(Debug, Clone)]
pub struct Relationship {
    relationship_type: RelationshipType,
    peer: RelationshipPeer,
    comment: Option<String>,
    /// Render an owned peer element in full, not just the edge
    full_render: bool,
}

impl Relationship {
    pub fn new(relationship_type: RelationshipType, peer: RelationshipPeer) -> Self {
        let full_render = !matches!(peer, RelationshipPeer::Reference { .. });
        Self {
            relationship_type,
            peer,
            comment: None,
            full_render,
        }
    }

    pub fn to_package(relationship_type: RelationshipType, package: Package) -> Self {
        Self::new(relationship_type, RelationshipPeer::Package(Box::new(package)))
    }

    pub fn to_reference(relationship_type: RelationshipType, id: impl Into<String>) -> Self {
        Self::new(
            relationship_type,
            RelationshipPeer::Reference {
                id: id.into(),
                document: None,
            },
        )
    }

    pub fn to_external(
        relationship_type: RelationshipType,
        document: impl Into<String>,
        id: impl Into<String>,
    ) -> Self {
        Self::new(
            relationship_type,
            RelationshipPeer::Reference {
                id: id.into(),
                document: Some(document.into()),
            },
        )
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn with_full_render(mut self, full_render: bool) -> Self {
        self.full_render = full_render;
        self
    }

    pub fn relationship_type(&self) -> RelationshipType {
        self.relationship_type
    }

    pub fn peer(&self) -> &RelationshipPeer {
        &self.peer
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    pub fn full_render(&self) -> bool {
        self.full_render
    }

    /// The owned peer element to render, if any
    pub fn rendered_peer(&self) -> Option<&RelationshipPeer> {
        match &self.peer {
            RelationshipPeer::Reference { .. } => None,
            peer if self.full_render => Some(peer),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relationship_type_strings() {
        assert_eq!(RelationshipType::GeneratedFrom.as_str(), "GENERATED_FROM");
        assert_eq!(RelationshipType::VariantOf.to_string(), "VARIANT_OF");
        assert_eq!(RelationshipType::DependsOn.as_str(), "DEPENDS_ON");
        assert_eq!(RelationshipType::DependencyOf.as_str(), "DEPENDENCY_OF");
    }

    #[test]
    fn test_package_peer_is_fully_rendered() {
        let rel = Relationship::to_package(RelationshipType::DependsOn, Package::new("dep"));
        assert!(rel.full_render());
        assert_eq!(rel.peer().id(), "SPDXRef-Package-dep");
        assert!(rel.rendered_peer().is_some());
    }

    #[test]
    fn test_abbreviated_package_peer() {
        let rel = Relationship::to_package(RelationshipType::DependsOn, Package::new("dep"))
            .with_full_render(false);
        assert!(rel.rendered_peer().is_none());
    }

    #[test]
    fn test_external_reference_qualified_id() {
        let rel = Relationship::to_external(
            RelationshipType::GeneratedFrom,
            "kubernetes-v1.22.0",
            "SPDXRef-Package-kubernetes",
        )
        .with_comment("Source code");

        assert!(!rel.full_render());
        assert_eq!(
            rel.peer().qualified_id(),
            "DocumentRef-kubernetes-v1.22.0:SPDXRef-Package-kubernetes"
        );
        assert_eq!(rel.comment(), Some("Source code"));
    }

    #[test]
    fn test_local_reference_qualified_id() {
        let rel = Relationship::to_reference(RelationshipType::Contains, "SPDXRef-File-x");
        assert_eq!(rel.peer().qualified_id(), "SPDXRef-File-x");
        assert!(rel.peer().document().is_none());
    }
}
