use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Build-tool manifest formats understood by the dependency resolver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ManifestKind {
    GoMod,
    UvLock,
}

impl ManifestKind {
    pub const ALL: [ManifestKind; 2] = [ManifestKind::GoMod, ManifestKind::UvLock];

    /// File name the manifest is detected by
    pub fn file_name(&self) -> &'static str {
        match self {
            ManifestKind::GoMod => "go.mod",
            ManifestKind::UvLock => "uv.lock",
        }
    }

    /// Package URL type for modules of this ecosystem
    pub fn purl_type(&self) -> &'static str {
        match self {
            ManifestKind::GoMod => "golang",
            ManifestKind::UvLock => "pypi",
        }
    }
}

impl fmt::Display for ManifestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

/// A module declared by a manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredModule {
    pub name: String,
    pub version: String,
}

impl DeclaredModule {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

/// Dependency declarations parsed from one manifest.
///
/// `edges` maps a module name to the names it depends on; the root's
/// entry lists everything the project requires. `direct` is the subset of
/// the root's requirements the project declares itself.
#[derive(Debug, Clone)]
pub struct DependencyManifest {
    kind: ManifestKind,
    root: String,
    direct: Vec<String>,
    edges: HashMap<String, Vec<String>>,
    modules: BTreeMap<String, DeclaredModule>,
}

impl DependencyManifest {
    pub fn new(kind: ManifestKind, root: impl Into<String>) -> Self {
        Self {
            kind,
            root: root.into(),
            direct: Vec::new(),
            edges: HashMap::new(),
            modules: BTreeMap::new(),
        }
    }

    pub fn kind(&self) -> ManifestKind {
        self.kind
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn direct(&self) -> &[String] {
        &self.direct
    }

    pub fn edges(&self) -> &HashMap<String, Vec<String>> {
        &self.edges
    }

    pub fn module(&self, name: &str) -> Option<&DeclaredModule> {
        self.modules.get(name)
    }

    pub fn module_count(&self) -> usize {
        self.modules.len()
    }

    /// Registers a module, replacing an earlier declaration of the same name
    pub fn add_module(&mut self, module: DeclaredModule) {
        self.modules.insert(module.name.clone(), module);
    }

    pub fn add_direct(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !self.direct.contains(&name) {
            self.direct.push(name);
        }
    }

    pub fn add_edge(&mut self, from: impl Into<String>, to: impl Into<String>) {
        let to = to.into();
        let deps = self.edges.entry(from.into()).or_default();
        if !deps.contains(&to) {
            deps.push(to);
        }
    }

    /// Overrides the version of a declared module (`replace` directives)
    pub fn replace_version(&mut self, name: &str, version: impl Into<String>) -> bool {
        match self.modules.get_mut(name) {
            Some(module) => {
                module.version = version.into();
                true
            }
            None => false,
        }
    }
}
