use crate::ports::outbound::DependencyManifestReader;
use crate::sbom_generation::domain::{DeclaredModule, DependencyManifest, ManifestKind};
use crate::shared::error::SbomError;
use crate::shared::security::read_metadata_file;
use crate::shared::Result;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// ManifestFileReader adapter detecting `go.mod` and `uv.lock` files
///
/// When a directory holds several manifests the first in
/// `ManifestKind::ALL` order is used.
#[derive(Debug, Default, Clone)]
pub struct ManifestFileReader;

impl ManifestFileReader {
    pub fn new() -> Self {
        Self
    }
}

impl DependencyManifestReader for ManifestFileReader {
    fn read_manifest(&self, dir: &Path) -> Result<Option<DependencyManifest>> {
        let Some(kind) = ManifestKind::ALL
            .into_iter()
            .find(|k| dir.join(k.file_name()).is_file())
        else {
            return Ok(None);
        };

        let path = dir.join(kind.file_name());
        let content = read_metadata_file(&path, kind.file_name())?;
        let parsed = match kind {
            ManifestKind::GoMod => parse_go_mod(&content),
            ManifestKind::UvLock => parse_uv_lock(&content),
        };

        parsed.map(Some).map_err(|e| {
            SbomError::DependencyResolution {
                manifest: path,
                details: format!("{:#}", e),
            }
            .into()
        })
    }
}

#[derive(Debug, PartialEq)]
enum GoBlock {
    None,
    Require,
    Replace,
    Other,
}

fn strip_go_comment(line: &str) -> (&str, bool) {
    match line.find("//") {
        Some(idx) => (
            line[..idx].trim(),
            line[idx + 2..].trim().starts_with("indirect"),
        ),
        None => (line.trim(), false),
    }
}

fn unquote(s: &str) -> &str {
    s.trim_matches('"').trim_matches('`')
}

/// Parses a `go.mod` file.
///
/// Every `require` becomes an edge from the module; requirements without an
/// `// indirect` marker are also direct. `replace` directives with a version
/// on the right-hand side rewrite the version of the replaced module.
pub fn parse_go_mod(content: &str) -> Result<DependencyManifest> {
    let mut module_path: Option<String> = None;
    let mut requires: Vec<(String, String, bool)> = Vec::new();
    let mut replaces: Vec<(String, Option<String>, Option<String>)> = Vec::new();
    let mut block = GoBlock::None;

    for (lineno, raw) in content.lines().enumerate() {
        let (line, indirect) = strip_go_comment(raw);
        if line.is_empty() {
            continue;
        }

        if block != GoBlock::None {
            if line == ")" {
                block = GoBlock::None;
                continue;
            }
            match block {
                GoBlock::Require => requires.push(parse_require(line, indirect, lineno)?),
                GoBlock::Replace => replaces.push(parse_replace(line, lineno)?),
                _ => {}
            }
            continue;
        }

        let (directive, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();
        let opens_block = rest == "(";

        match directive {
            "module" => module_path = Some(unquote(rest).to_string()),
            "require" if opens_block => block = GoBlock::Require,
            "require" => requires.push(parse_require(rest, indirect, lineno)?),
            "replace" if opens_block => block = GoBlock::Replace,
            "replace" => replaces.push(parse_replace(rest, lineno)?),
            _ if opens_block => block = GoBlock::Other,
            _ => {}
        }
    }

    if block != GoBlock::None {
        anyhow::bail!("unterminated {:?} block", block);
    }

    let root = module_path.ok_or_else(|| anyhow::anyhow!("missing module directive"))?;
    let mut manifest = DependencyManifest::new(ManifestKind::GoMod, &root);

    for (path, version, indirect) in requires {
        manifest.add_module(DeclaredModule::new(&path, version));
        manifest.add_edge(&root, &path);
        if !indirect {
            manifest.add_direct(path);
        }
    }

    for (old, old_version, new_version) in replaces {
        let Some(new_version) = new_version else {
            continue;
        };
        let applies = match (&old_version, manifest.module(&old)) {
            (Some(v), Some(m)) => &m.version == v,
            (None, Some(_)) => true,
            _ => false,
        };
        if applies {
            manifest.replace_version(&old, new_version);
        }
    }

    Ok(manifest)
}

fn parse_require(spec: &str, indirect: bool, lineno: usize) -> Result<(String, String, bool)> {
    let fields: Vec<&str> = spec.split_whitespace().collect();
    match fields.as_slice() {
        [path, version] => Ok((unquote(path).to_string(), version.to_string(), indirect)),
        _ => anyhow::bail!("line {}: malformed require '{}'", lineno + 1, spec),
    }
}

/// Returns (old path, old version, new version). Replacements by a local
/// directory have no new version.
fn parse_replace(
    spec: &str,
    lineno: usize,
) -> Result<(String, Option<String>, Option<String>)> {
    let (left, right) = spec
        .split_once("=>")
        .ok_or_else(|| anyhow::anyhow!("line {}: malformed replace '{}'", lineno + 1, spec))?;
    let left: Vec<&str> = left.split_whitespace().collect();
    let right: Vec<&str> = right.split_whitespace().collect();

    let (old, old_version) = match left.as_slice() {
        [path] => (unquote(path).to_string(), None),
        [path, version] => (unquote(path).to_string(), Some(version.to_string())),
        _ => anyhow::bail!("line {}: malformed replace '{}'", lineno + 1, spec),
    };

    match right.as_slice() {
        [_, version] => Ok((old, old_version, Some(version.to_string()))),
        [local] => {
            tracing::debug!(module = %old, target = %local, "module replaced by local directory");
            Ok((old, old_version, None))
        }
        _ => anyhow::bail!("line {}: malformed replace '{}'", lineno + 1, spec),
    }
}

#[derive(Debug, Deserialize)]
struct UvLock {
    package: Vec<UvPackage>,
}

#[derive(Debug, Deserialize)]
struct UvPackage {
    name: String,
    version: String,
    #[serde(default)]
    source: Option<UvSource>,
    #[serde(default)]
    dependencies: Vec<UvDependency>,
    #[serde(default, rename = "dev-dependencies")]
    dev_dependencies: BTreeMap<String, Vec<UvDependency>>,
}

#[derive(Debug, Deserialize)]
struct UvSource {
    #[serde(default)]
    editable: Option<String>,
    #[serde(default, rename = "virtual")]
    virtual_path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UvDependency {
    name: String,
}

impl UvPackage {
    fn is_project_root(&self) -> bool {
        self.source.as_ref().is_some_and(|s| {
            s.editable.as_deref() == Some(".") || s.virtual_path.as_deref() == Some(".")
        })
    }
}

/// Parses a `uv.lock` file. The project is the package whose source is the
/// lockfile's own directory (editable or virtual `.`).
pub fn parse_uv_lock(content: &str) -> Result<DependencyManifest> {
    let lockfile: UvLock = toml::from_str(content)
        .map_err(|e| anyhow::anyhow!("Failed to parse uv.lock file: {}", e))?;

    let root = lockfile
        .package
        .iter()
        .find(|p| p.is_project_root())
        .ok_or_else(|| anyhow::anyhow!("project package not found in lockfile"))?;

    let mut manifest = DependencyManifest::new(ManifestKind::UvLock, &root.name);

    for dep in root
        .dependencies
        .iter()
        .chain(root.dev_dependencies.values().flatten())
    {
        manifest.add_direct(&dep.name);
    }

    for pkg in &lockfile.package {
        manifest.add_module(DeclaredModule::new(&pkg.name, &pkg.version));
        for dep in pkg
            .dependencies
            .iter()
            .chain(pkg.dev_dependencies.values().flatten())
        {
            manifest.add_edge(&pkg.name, &dep.name);
        }
    }

    Ok(manifest)
}
