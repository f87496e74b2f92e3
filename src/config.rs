//! Configuration file support for spdx-sbom.
//!
//! Provides YAML-based configuration through `spdx-sbom.config.yml` files,
//! including data structures, file loading, and validation. Values read
//! here are defaults; command-line flags override them.

use anyhow::{bail, Context};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::application::dto::{DocGenerateOptions, ExternalRefSource, OutputFormat, SbomOptions};
use crate::shared::Result;

pub const CONFIG_FILENAME: &str = "spdx-sbom.config.yml";

/// Top-level configuration file schema.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    pub name: Option<String>,
    pub namespace: Option<String>,
    pub creator: Option<CreatorConfig>,
    pub license: Option<String>,
    pub format: Option<String>,
    pub output: Option<PathBuf>,
    pub directories: Option<Vec<PathBuf>>,
    pub tarballs: Option<Vec<PathBuf>>,
    pub images: Option<Vec<String>>,
    pub files: Option<Vec<PathBuf>>,
    pub external_refs: Option<Vec<ExternalRefConfig>>,
    pub generated_from: Option<String>,
    pub layer_signatures: Option<PathBuf>,
    pub analyze_layers: Option<bool>,
    pub no_gitignore: Option<bool>,
    pub process_dependencies: Option<bool>,
    pub only_direct_deps: Option<bool>,
    pub scan_licenses: Option<bool>,
    pub license_cache_dir: Option<PathBuf>,
    pub license_data_dir: Option<PathBuf>,
    pub ignore_patterns: Option<Vec<String>>,
    /// Captures unknown fields for warnings.
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_yaml_ng::Value>,
}

/// Document creator identity.
#[derive(Debug, Deserialize, Default)]
pub struct CreatorConfig {
    pub person: Option<String>,
    pub organization: Option<String>,
}

/// A previously generated document to reference.
#[derive(Debug, Deserialize)]
pub struct ExternalRefConfig {
    pub alias: String,
    pub path: PathBuf,
}

impl ConfigFile {
    /// Converts the file into generation options, filling unset values
    /// with their defaults.
    pub fn into_options(self) -> Result<DocGenerateOptions> {
        let defaults = SbomOptions::default();
        let format = match self.format.as_deref() {
            Some(format) => OutputFormat::from_str(format).map_err(anyhow::Error::msg)?,
            None => OutputFormat::default(),
        };
        let creator = self.creator.unwrap_or_default();

        Ok(DocGenerateOptions {
            name: self.name.unwrap_or_default(),
            namespace: self.namespace,
            creator_person: creator.person,
            creator_organization: creator.organization,
            license: self.license,
            directories: self.directories.unwrap_or_default(),
            tarballs: self.tarballs.unwrap_or_default(),
            image_references: self.images.unwrap_or_default(),
            files: self.files.unwrap_or_default(),
            external_doc_refs: self
                .external_refs
                .unwrap_or_default()
                .into_iter()
                .map(|r| ExternalRefSource {
                    alias: r.alias,
                    path: r.path,
                })
                .collect(),
            generated_from: self.generated_from,
            output_file: self.output,
            format,
            layer_signatures: self.layer_signatures,
            sbom: SbomOptions {
                analyze_layers: self.analyze_layers.unwrap_or(defaults.analyze_layers),
                no_gitignore: self.no_gitignore.unwrap_or(defaults.no_gitignore),
                process_dependencies: self
                    .process_dependencies
                    .unwrap_or(defaults.process_dependencies),
                only_direct_deps: self.only_direct_deps.unwrap_or(defaults.only_direct_deps),
                scan_licenses: self.scan_licenses.unwrap_or(defaults.scan_licenses),
                license_cache_dir: self.license_cache_dir.unwrap_or(defaults.license_cache_dir),
                license_data_dir: self.license_data_dir.unwrap_or(defaults.license_data_dir),
                ignore_patterns: self.ignore_patterns.unwrap_or_default(),
            },
        })
    }
}

/// Load config from an explicit path. Returns an error if the file is not found.
pub fn load_config_from_path(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path).with_context(|| {
        format!(
            "Failed to read config file: {}\n\n💡 Hint: Check that the file exists and is readable.",
            path.display()
        )
    })?;

    let config: ConfigFile = serde_yaml_ng::from_str(&content).with_context(|| {
        format!(
            "Failed to parse config file: {}\n\n💡 Hint: Ensure the file contains valid YAML syntax.",
            path.display()
        )
    })?;

    validate_config(&config)?;
    warn_unknown_fields(&config);

    Ok(config)
}

/// Auto-discover config in a directory. Returns `None` silently if not found.
pub fn discover_config(dir: &Path) -> Result<Option<ConfigFile>> {
    let config_path = dir.join(CONFIG_FILENAME);

    if !config_path.exists() {
        return Ok(None);
    }

    let config = load_config_from_path(&config_path)?;
    Ok(Some(config))
}

/// Validate the loaded configuration.
fn validate_config(config: &ConfigFile) -> Result<()> {
    if let Some(format) = &config.format {
        if let Err(message) = OutputFormat::from_str(format) {
            bail!("Invalid config: {}", message);
        }
    }

    if let Some(refs) = &config.external_refs {
        for (i, entry) in refs.iter().enumerate() {
            if entry.alias.trim().is_empty() {
                bail!(
                    "Invalid config: external_refs[{}].alias must not be empty.\n\n\
                     💡 Hint: Each external_refs entry needs an 'alias' (e.g., \"source\") and a 'path'.",
                    i
                );
            }
        }
    }

    if let Some(patterns) = &config.ignore_patterns {
        if let Some(i) = patterns.iter().position(|p| p.trim().is_empty()) {
            bail!("Invalid config: ignore_patterns[{}] must not be empty.", i);
        }
    }
    Ok(())
}

/// Warn about unknown fields in the config file.
fn warn_unknown_fields(config: &ConfigFile) {
    let mut keys: Vec<&String> = config.unknown_fields.keys().collect();
    keys.sort();
    for key in keys {
        eprintln!(
            "⚠️  Warning: Unknown config field '{}' will be ignored.",
            key
        );
    }
}
