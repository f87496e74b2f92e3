use crate::sbom_generation::domain::{DeclaredModule, DependencyManifest, Package};
use std::collections::{BTreeSet, HashMap, HashSet};

/// DependencyAnalyzer service for turning manifest declarations into packages
///
/// This service contains pure business logic for dependency graph analysis.
/// It has no I/O dependencies and works only with domain objects.
pub struct DependencyAnalyzer;

impl DependencyAnalyzer {
    /// Maximum recursion depth to prevent stack overflow attacks
    /// This limits dependency chains to prevent malicious lockfiles from causing DoS
    const MAX_RECURSION_DEPTH: usize = 100;

    /// Selects the modules to record for a manifest
    ///
    /// # Arguments
    /// * `manifest` - Parsed manifest
    /// * `only_direct` - Restrict the result to the project's own requirements
    ///
    /// # Returns
    /// Declared modules sorted by name. Names the manifest references but
    /// does not declare are skipped with a warning.
    pub fn select(manifest: &DependencyManifest, only_direct: bool) -> Vec<DeclaredModule> {
        let names: BTreeSet<String> = if only_direct {
            manifest.direct().iter().cloned().collect()
        } else {
            let mut all = Vec::new();
            let mut visited = HashSet::new();
            Self::collect_transitive_deps(
                manifest.root(),
                manifest.edges(),
                &mut all,
                &mut visited,
                0,
            );
            all.into_iter().chain(manifest.direct().iter().cloned()).collect()
        };

        names
            .into_iter()
            .filter(|name| name != manifest.root())
            .filter_map(|name| match manifest.module(&name) {
                Some(module) => Some(module.clone()),
                None => {
                    tracing::warn!(
                        manifest = %manifest.kind(),
                        module = %name,
                        "dependency is referenced but not declared, skipping"
                    );
                    None
                }
            })
            .collect()
    }

    /// Builds the minimal sub-packages for a manifest's selected modules
    pub fn packages(manifest: &DependencyManifest, only_direct: bool) -> Vec<Package> {
        Self::select(manifest, only_direct)
            .into_iter()
            .map(|module| Self::to_package(manifest, &module))
            .collect()
    }

    /// Minimal package for a declared module: name, version and package
    /// URL, without file contents
    pub fn to_package(manifest: &DependencyManifest, module: &DeclaredModule) -> Package {
        let mut package = Package::new(&module.name).with_version(&module.version);
        package.build_id(&[&module.name, &module.version]);
        package.set_download_location(Self::purl(manifest, module));
        package
    }

    /// Package URL of a module, e.g. `pkg:golang/golang.org/x/text@v0.3.7`
    pub fn purl(manifest: &DependencyManifest, module: &DeclaredModule) -> String {
        let name = match manifest.kind().purl_type() {
            "pypi" => module.name.to_lowercase().replace('_', "-"),
            _ => module.name.clone(),
        };
        format!(
            "pkg:{}/{}@{}",
            manifest.kind().purl_type(),
            name,
            urlencoding::encode(&module.version)
        )
    }

    /// Recursively collects every module reachable from `package_name`
    ///
    /// This is a pure algorithm with no I/O operations.
    ///
    /// # Arguments
    /// * `package_name` - The package to analyze
    /// * `dependency_map` - Map of package name to its dependencies
    /// * `collected` - Accumulated dependencies, in discovery order
    /// * `visited` - Set of already visited packages (cycle detection)
    /// * `depth` - Current recursion depth (for DoS prevention)
    fn collect_transitive_deps(
        package_name: &str,
        dependency_map: &HashMap<String, Vec<String>>,
        collected: &mut Vec<String>,
        visited: &mut HashSet<String>,
        depth: usize,
    ) {
        if depth >= Self::MAX_RECURSION_DEPTH {
            tracing::warn!(
                max_depth = Self::MAX_RECURSION_DEPTH,
                package = package_name,
                "maximum recursion depth reached, dependency chain may be truncated"
            );
            return;
        }

        if !visited.insert(package_name.to_string()) {
            return;
        }

        if let Some(dependencies) = dependency_map.get(package_name) {
            for dep in dependencies {
                if !collected.contains(dep) {
                    collected.push(dep.clone());
                }
                Self::collect_transitive_deps(dep, dependency_map, collected, visited, depth + 1);
            }
        }
    }
}
