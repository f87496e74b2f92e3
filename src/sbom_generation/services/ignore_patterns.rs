use crate::shared::Result;
use anyhow::Context;
use ignore::gitignore::{Gitignore, GitignoreBuilder};
use ignore::Match;
use std::cell::RefCell;
use std::collections::BTreeSet;
use std::path::Path;

/// Name of the repository ignore file read from the directory root
pub const GITIGNORE_FILE: &str = ".gitignore";

/// Maximum number of caller-supplied patterns
const MAX_IGNORE_PATTERNS: usize = 256;

/// Maximum length of a single caller-supplied pattern
const MAX_PATTERN_LENGTH: usize = 1024;

/// IgnorePatterns - Excludes files from a directory scan
///
/// Rules follow gitignore semantics as implemented by the `ignore` crate:
/// - a pattern without a slash matches at any depth (`*.o`, `target`)
/// - a leading or inner slash anchors the pattern to the root (`/build`,
///   `docs/*.md`)
/// - `**` spans any number of directories (`**/testdata/**`)
/// - a trailing slash only matches directories, and everything under them
/// - `!pattern` re-includes a path excluded by an earlier rule
///
/// Caller patterns are added after the `.gitignore` rules, so they win over
/// them when both match the same path.
#[derive(Debug)]
pub struct IgnorePatterns {
    matcher: Gitignore,
    caller_patterns: Vec<String>,
    hits: RefCell<BTreeSet<String>>,
}

impl IgnorePatterns {
    /// Compiles the ignore rules for `root`
    ///
    /// # Arguments
    /// * `root` - Directory the scanned paths are relative to
    /// * `patterns` - Caller-supplied patterns
    /// * `no_gitignore` - Skip reading `<root>/.gitignore`
    ///
    /// # Errors
    /// - Too many patterns or a pattern that is empty or too long
    /// - A `.gitignore` that exists but cannot be read or parsed
    pub fn new(root: &Path, patterns: &[String], no_gitignore: bool) -> Result<Self> {
        if patterns.len() > MAX_IGNORE_PATTERNS {
            anyhow::bail!(
                "Too many ignore patterns: {} (maximum: {})",
                patterns.len(),
                MAX_IGNORE_PATTERNS
            );
        }

        let mut builder = GitignoreBuilder::new(root);

        let gitignore = root.join(GITIGNORE_FILE);
        if !no_gitignore && gitignore.is_file() {
            if let Some(err) = builder.add(&gitignore) {
                return Err(err)
                    .with_context(|| format!("Failed to parse {}", gitignore.display()));
            }
            tracing::debug!(path = %gitignore.display(), "loaded ignore rules");
        }

        for pattern in patterns {
            validate_pattern(pattern)?;
            builder
                .add_line(None, pattern)
                .with_context(|| format!("Invalid ignore pattern '{}'", pattern))?;
        }

        let matcher = builder
            .build()
            .context("Failed to compile ignore patterns")?;

        Ok(Self {
            matcher,
            caller_patterns: patterns.to_vec(),
            hits: RefCell::new(BTreeSet::new()),
        })
    }

    /// Number of compiled rules (ignore file plus caller patterns)
    pub fn len(&self) -> usize {
        self.matcher.num_ignores() as usize + self.matcher.num_whitelists() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.matcher.is_empty()
    }

    /// Checks a path relative to the root. A path is ignored when it, or
    /// any directory above it, is excluded by the last rule matching it.
    pub fn is_ignored(&self, relative_path: &Path, is_dir: bool) -> bool {
        match self
            .matcher
            .matched_path_or_any_parents(relative_path, is_dir)
        {
            Match::Ignore(glob) => {
                self.hits.borrow_mut().insert(glob.original().to_string());
                true
            }
            Match::Whitelist(glob) => {
                self.hits.borrow_mut().insert(glob.original().to_string());
                false
            }
            Match::None => false,
        }
    }

    /// Removes ignored entries from a list of root-relative file paths,
    /// keeping the order of the remaining entries.
    pub fn filter<P: AsRef<Path>>(&self, files: Vec<P>) -> Vec<P> {
        if self.is_empty() {
            return files;
        }
        files
            .into_iter()
            .filter(|f| !self.is_ignored(f.as_ref(), false))
            .collect()
    }

    /// Caller patterns that did not decide the fate of any path so far
    pub fn unmatched_patterns(&self) -> Vec<String> {
        let hits = self.hits.borrow();
        self.caller_patterns
            .iter()
            .filter(|p| !hits.contains(p.trim()))
            .cloned()
            .collect()
    }
}

fn validate_pattern(pattern: &str) -> Result<()> {
    if pattern.trim().is_empty() {
        anyhow::bail!("Ignore pattern cannot be empty");
    }
    if pattern.len() > MAX_PATTERN_LENGTH {
        anyhow::bail!(
            "Ignore pattern is too long: {} chars. Maximum: {} chars",
            pattern.len(),
            MAX_PATTERN_LENGTH
        );
    }
    Ok(())
}
