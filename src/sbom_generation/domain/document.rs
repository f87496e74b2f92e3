use super::{
    ExternalDocumentRef, File, Package, Relationship, RelationshipPeer, RelationshipType,
    DATA_LICENSE, DOCUMENT_ID,
};
use crate::shared::error::SbomError;
use crate::shared::Result;
use chrono::{DateTime, SubsecRound, Utc};
use std::collections::{BTreeMap, BTreeSet};

/// Organization recorded as document creator when none is supplied
pub const DEFAULT_DOCUMENT_AUTHOR: &str =
    "Kubernetes Release Managers (release-managers@kubernetes.io)";

/// Who produced the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatorInfo {
    pub person: Option<String>,
    pub organization: String,
    pub tool: String,
}

impl Default for CreatorInfo {
    fn default() -> Self {
        Self {
            person: None,
            organization: DEFAULT_DOCUMENT_AUTHOR.to_string(),
            tool: format!("{}-{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
        }
    }
}

impl CreatorInfo {
    /// Creator lines in the `Kind: value` form
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(3);
        if let Some(person) = &self.person {
            lines.push(format!("Person: {}", person));
        }
        lines.push(format!("Organization: {}", self.organization));
        lines.push(format!("Tool: {}", self.tool));
        lines
    }
}

/// Borrowed view of any identifiable element in the document graph
#[derive(Debug, Clone, Copy)]
pub enum Element<'a> {
    Package(&'a Package),
    File(&'a File),
}

impl<'a> Element<'a> {
    pub fn id(&self) -> &'a str {
        match self {
            Element::Package(p) => p.id(),
            Element::File(f) => f.id(),
        }
    }

    pub fn relationships(&self) -> &'a [Relationship] {
        match self {
            Element::Package(p) => p.relationships(),
            Element::File(f) => f.relationships(),
        }
    }
}

/// Root of the SBOM graph.
///
/// Top-level packages and files are kept ordered by id; nested elements
/// hang off relationships of their owners.
#[derive(Debug, Clone)]
pub struct Document {
    name: String,
    namespace: String,
    created: DateTime<Utc>,
    creator: CreatorInfo,
    packages: BTreeMap<String, Package>,
    files: BTreeMap<String, File>,
    external_refs: BTreeMap<String, ExternalDocumentRef>,
}

impl Document {
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            created: Utc::now().trunc_subsecs(0),
            creator: CreatorInfo::default(),
            packages: BTreeMap::new(),
            files: BTreeMap::new(),
            external_refs: BTreeMap::new(),
        }
    }

    pub fn id(&self) -> &str {
        DOCUMENT_ID
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn set_namespace(&mut self, namespace: impl Into<String>) {
        self.namespace = namespace.into();
    }

    pub fn data_license(&self) -> &str {
        DATA_LICENSE
    }

    pub fn created(&self) -> DateTime<Utc> {
        self.created
    }

    pub fn set_created(&mut self, created: DateTime<Utc>) {
        self.created = created.trunc_subsecs(0);
    }

    pub fn creator(&self) -> &CreatorInfo {
        &self.creator
    }

    pub fn set_creator(&mut self, creator: CreatorInfo) {
        self.creator = creator;
    }

    pub fn packages(&self) -> impl Iterator<Item = &Package> {
        self.packages.values()
    }

    pub fn package(&self, id: &str) -> Option<&Package> {
        self.packages.get(id)
    }

    pub fn files(&self) -> impl Iterator<Item = &File> {
        self.files.values()
    }

    pub fn external_refs(&self) -> impl Iterator<Item = &ExternalDocumentRef> {
        self.external_refs.values()
    }

    /// Adds a top-level package. Fails if any of its element ids is taken.
    pub fn add_package(&mut self, package: Package) -> Result<()> {
        self.ensure_unique(Element::Package(&package))?;
        self.packages.insert(package.id().to_string(), package);
        Ok(())
    }

    /// Adds a top-level file. Fails if its id is taken.
    pub fn add_file(&mut self, file: File) -> Result<()> {
        self.ensure_unique(Element::File(&file))?;
        self.files.insert(file.id().to_string(), file);
        Ok(())
    }

    pub fn add_external_ref(&mut self, reference: ExternalDocumentRef) -> Result<()> {
        if self.external_refs.contains_key(reference.id()) {
            return Err(SbomError::Graph {
                details: format!("external document reference {} declared twice", reference.id()),
            }
            .into());
        }
        self.external_refs
            .insert(reference.id().to_string(), reference);
        Ok(())
    }

    /// Appends a `GENERATED_FROM` edge to `peer_id` in the external document
    /// `document_alias` on every top-level package and file.
    pub fn stamp_generated_from(&mut self, document_alias: &str, peer_id: &str, comment: &str) {
        let make = || {
            Relationship::to_external(RelationshipType::GeneratedFrom, document_alias, peer_id)
                .with_comment(comment)
        };
        for package in self.packages.values_mut() {
            package.add_relationship(make());
        }
        for file in self.files.values_mut() {
            file.add_relationship(make());
        }
    }

    /// Elements described directly by the document
    pub fn described_ids(&self) -> Vec<&str> {
        self.packages
            .keys()
            .chain(self.files.keys())
            .map(String::as_str)
            .collect()
    }

    /// Walks every element reachable from the document, depth first,
    /// owners before the elements they render.
    pub fn walk<'a>(&'a self, visit: &mut dyn FnMut(Element<'a>)) {
        for package in self.packages.values() {
            walk_element(Element::Package(package), visit);
        }
        for file in self.files.values() {
            walk_element(Element::File(file), visit);
        }
    }

    /// Ids of every element in the graph
    pub fn element_ids(&self) -> BTreeSet<&str> {
        let mut ids = BTreeSet::new();
        self.walk(&mut |e| {
            ids.insert(e.id());
        });
        ids
    }

    /// Checks that every relationship peer resolves to an element of this
    /// document or to a declared external document.
    pub fn validate(&self) -> Result<()> {
        let ids = self.element_ids();
        let mut problems = Vec::new();

        self.walk(&mut |element| {
            for relationship in element.relationships() {
                let peer = relationship.peer();
                match peer.document() {
                    Some(_) => {
                        let alias = peer.qualified_id();
                        let alias = alias.split(':').next().unwrap_or_default();
                        if !self.external_refs.contains_key(alias) {
                            problems.push(format!(
                                "{} {} {}: external document {} is not declared",
                                element.id(),
                                relationship.relationship_type(),
                                peer.qualified_id(),
                                alias
                            ));
                        }
                    }
                    None if !ids.contains(peer.id()) => problems.push(format!(
                        "{} {} {}: peer is not an element of the document",
                        element.id(),
                        relationship.relationship_type(),
                        peer.id()
                    )),
                    None => {}
                }
            }
        });

        if problems.is_empty() {
            Ok(())
        } else {
            Err(SbomError::Graph {
                details: problems.join("\n"),
            }
            .into())
        }
    }

    fn ensure_unique(&self, candidate: Element<'_>) -> Result<()> {
        let existing = self.element_ids();
        let mut clashes = BTreeSet::new();
        walk_element(candidate, &mut |e| {
            if existing.contains(e.id()) {
                clashes.insert(e.id().to_string());
            }
        });

        if clashes.is_empty() {
            return Ok(());
        }
        Err(SbomError::Graph {
            details: format!(
                "element ids already present in the document: {}",
                clashes.into_iter().collect::<Vec<_>>().join(", ")
            ),
        }
        .into())
    }
}

fn walk_element<'a>(element: Element<'a>, visit: &mut dyn FnMut(Element<'a>)) {
    visit(element);
    if let Element::Package(package) = element {
        for file in package.files() {
            walk_element(Element::File(file), visit);
        }
    }
    for relationship in element.relationships() {
        match relationship.rendered_peer() {
            Some(RelationshipPeer::Package(p)) => walk_element(Element::Package(p), visit),
            Some(RelationshipPeer::File(f)) => walk_element(Element::File(f), visit),
            _ => {}
        }
    }
}
