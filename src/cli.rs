use clap::Parser;
use spdx_sbom::application::dto::{DocGenerateOptions, ExternalRefSource, OutputFormat};
use std::path::{Path, PathBuf};

/// Generate SPDX SBOMs for source trees, image tarballs and container images
#[derive(Parser, Debug)]
#[command(name = "spdx-sbom")]
#[command(version)]
#[command(about = "Generate SPDX SBOMs for source trees, image tarballs and container images", long_about = None)]
pub struct Args {
    /// Directory to describe as a package (repeatable)
    #[arg(short, long = "dir", value_name = "DIR")]
    pub dirs: Vec<PathBuf>,

    /// `docker save` image tarball to describe (repeatable)
    #[arg(short, long = "tarball", value_name = "PATH")]
    pub tarballs: Vec<PathBuf>,

    /// Image reference to pull and describe, e.g. registry.k8s.io/pause:3.9 (repeatable)
    #[arg(short, long = "image", value_name = "REF")]
    pub images: Vec<String>,

    /// Single file to describe (repeatable)
    #[arg(long = "file", value_name = "PATH")]
    pub files: Vec<PathBuf>,

    /// Document name
    #[arg(short, long)]
    pub name: Option<String>,

    /// Document namespace (a unique one is generated when not specified)
    #[arg(long)]
    pub namespace: Option<String>,

    /// Person recorded as document creator
    #[arg(long, value_name = "NAME")]
    pub creator_person: Option<String>,

    /// Organization recorded as document creator
    #[arg(long, value_name = "NAME")]
    pub creator_org: Option<String>,

    /// License concluded for every top-level package
    #[arg(short, long, value_name = "SPDX-ID")]
    pub license: Option<String>,

    /// Output format: tag-value or json
    #[arg(short, long)]
    pub format: Option<OutputFormat>,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Reference another document, as ALIAS=PATH (repeatable)
    #[arg(long = "external-ref", value_name = "ALIAS=PATH")]
    pub external_refs: Vec<ExternalRefSource>,

    /// Stamp every top-level element GENERATED_FROM the referenced document ALIAS
    #[arg(long, value_name = "ALIAS")]
    pub generated_from: Option<String>,

    /// Ignore files matching a gitignore-style pattern (repeatable)
    #[arg(short = 'e', long = "ignore", value_name = "PATTERN")]
    pub ignore_patterns: Vec<String>,

    /// Do not read the .gitignore file of scanned directories
    #[arg(long)]
    pub no_gitignore: bool,

    /// Skip analysis of image layers
    #[arg(long)]
    pub no_layer_analysis: bool,

    /// Do not resolve dependency manifests
    #[arg(long)]
    pub no_dependencies: bool,

    /// Record direct dependencies only
    #[arg(long)]
    pub direct_only: bool,

    /// Skip license classification
    #[arg(long)]
    pub no_license_scan: bool,

    /// Download cache for the SPDX license list
    #[arg(long, value_name = "DIR")]
    pub license_cache_dir: Option<PathBuf>,

    /// Directory holding license texts as <ID>.txt
    #[arg(long, value_name = "DIR")]
    pub license_data_dir: Option<PathBuf>,

    /// JSON registry of known base-image layer digests
    #[arg(long, value_name = "PATH")]
    pub layer_signatures: Option<PathBuf>,

    /// Path to config file (auto-discovers spdx-sbom.config.yml when omitted)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Overlays the command line on options read from a config file.
    /// Lists given on the command line replace the configured ones.
    pub fn merge_into(self, mut options: DocGenerateOptions) -> DocGenerateOptions {
        fn replace<T>(target: &mut Vec<T>, values: Vec<T>) {
            if !values.is_empty() {
                *target = values;
            }
        }

        replace(&mut options.directories, self.dirs);
        replace(&mut options.tarballs, self.tarballs);
        replace(&mut options.image_references, self.images);
        replace(&mut options.files, self.files);
        replace(&mut options.external_doc_refs, self.external_refs);
        replace(&mut options.sbom.ignore_patterns, self.ignore_patterns);

        if let Some(name) = self.name {
            options.name = name;
        }
        options.namespace = self.namespace.or(options.namespace);
        options.creator_person = self.creator_person.or(options.creator_person);
        options.creator_organization = self.creator_org.or(options.creator_organization);
        options.license = self.license.or(options.license);
        options.generated_from = self.generated_from.or(options.generated_from);
        options.output_file = self.output.or(options.output_file);
        options.layer_signatures = self.layer_signatures.or(options.layer_signatures);
        if let Some(format) = self.format {
            options.format = format;
        }

        let sbom = &mut options.sbom;
        sbom.no_gitignore |= self.no_gitignore;
        sbom.analyze_layers &= !self.no_layer_analysis;
        sbom.process_dependencies &= !self.no_dependencies;
        sbom.only_direct_deps |= self.direct_only;
        sbom.scan_licenses &= !self.no_license_scan;
        if let Some(dir) = self.license_cache_dir {
            sbom.license_cache_dir = dir;
        }
        if let Some(dir) = self.license_data_dir {
            sbom.license_data_dir = dir;
        }

        if options.name.trim().is_empty() {
            options.name = default_name(&options);
        }
        options
    }
}

/// Names the document after its first input
fn default_name(options: &DocGenerateOptions) -> String {
    let stem = |p: &Path| {
        std::path::absolute(p)
            .ok()
            .and_then(|abs| abs.file_name().map(|n| n.to_string_lossy().into_owned()))
    };
    options
        .directories
        .first()
        .and_then(|d| stem(d))
        .or_else(|| options.image_references.first().cloned())
        .or_else(|| {
            options
                .tarballs
                .first()
                .and_then(|t| t.file_stem().map(|s| s.to_string_lossy().into_owned()))
        })
        .or_else(|| options.files.first().and_then(|f| stem(f)))
        .unwrap_or_else(|| "sbom".to_string())
}
