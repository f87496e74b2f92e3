mod dependency_analyzer;
mod document_naming;
mod ignore_patterns;
mod license_matcher;

pub use dependency_analyzer::DependencyAnalyzer;
pub use document_naming::{BomKind, DocumentNaming, DEFAULT_NAMESPACE_BASE};
pub use ignore_patterns::{IgnorePatterns, GITIGNORE_FILE};
pub use license_matcher::{LicenseMatch, LicenseMatcher, DEFAULT_MATCH_THRESHOLD};
