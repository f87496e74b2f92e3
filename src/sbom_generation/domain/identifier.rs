use std::collections::HashSet;
use uuid::Uuid;

/// Prefix reserved for document-scoped element identifiers
pub const SPDX_REF_PREFIX: &str = "SPDXRef-";

/// Prefix for identifiers of external document references
pub const DOCUMENT_REF_PREFIX: &str = "DocumentRef-";

/// Identifier of the document element itself
pub const DOCUMENT_ID: &str = "SPDXRef-DOCUMENT";

fn is_valid_id_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '.'
}

fn sanitize_seed(seed: &str) -> String {
    seed.replace(['/', ':'], "-")
        .chars()
        .filter(|c| is_valid_id_char(*c))
        .collect()
}

/// Builds an identifier from a list of seed strings.
///
/// Path separators (`/`, `:`) are turned into hyphens and any other
/// character outside `[a-zA-Z0-9-.]` is dropped. Seeds that end up empty
/// are discarded. When no surviving seed carries meaning of its own (all
/// were empty or only the `SPDXRef-` prefix), a random UUID is appended so
/// the identifier is still unique.
///
/// ```
/// use spdx_sbom::sbom_generation::domain::build_id_string;
///
/// assert_eq!(
///     build_id_string(&["SPDXRef-Package", "k8s.io/api:v0.1"]),
///     "SPDXRef-Package-k8s.io-api-v0.1"
/// );
/// ```
pub fn build_id_string(seeds: &[&str]) -> String {
    let mut valid_seeds: Vec<String> = Vec::with_capacity(seeds.len() + 1);
    let mut meaningful = 0;

    for seed in seeds {
        let sanitized = sanitize_seed(seed);
        if sanitized.is_empty() {
            continue;
        }
        if !sanitized.starts_with(SPDX_REF_PREFIX) {
            meaningful += 1;
        }
        valid_seeds.push(sanitized);
    }

    if meaningful == 0 {
        valid_seeds.push(Uuid::new_v4().to_string());
    }

    valid_seeds.join("-")
}

/// Identifier of an external document reference for `alias`, which may be
/// given with or without the `DocumentRef-` prefix. Illegal characters are
/// handled as in [`build_id_string`], without the random fallback.
pub fn document_ref_id(alias: &str) -> String {
    let alias = alias.trim();
    let alias = alias.strip_prefix(DOCUMENT_REF_PREFIX).unwrap_or(alias);
    format!("{}{}", DOCUMENT_REF_PREFIX, sanitize_seed(alias))
}

/// Returns true when `id` only contains characters legal in an element id.
pub fn is_valid_id(id: &str) -> bool {
    !id.is_empty() && id.chars().all(is_valid_id_char)
}

/// Hands out identifiers that are unique within one scope.
///
/// Different seeds can sanitize to the same string (`a b.txt` and `ab.txt`).
/// The allocator keeps the first caller's id untouched and suffixes later
/// collisions with `-2`, `-3`, ... Callers that need reproducible output must
/// allocate in a stable order.
#[derive(Debug, Default)]
pub struct IdAllocator {
    used: HashSet<String>,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self, seeds: &[&str]) -> String {
        let base = build_id_string(seeds);
        if self.used.insert(base.clone()) {
            return base;
        }

        let mut n = 2;
        loop {
            let candidate = format!("{}-{}", base, n);
            if self.used.insert(candidate.clone()) {
                return candidate;
            }
            n += 1;
        }
    }

    /// Marks an externally chosen id as taken. Returns false if it already was.
    pub fn reserve(&mut self, id: &str) -> bool {
        self.used.insert(id.to_string())
    }

    pub fn len(&self) -> usize {
        self.used.len()
    }

    pub fn is_empty(&self) -> bool {
        self.used.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_id_replaces_separators() {
        assert_eq!(
            build_id_string(&["SPDXRef-File", "cmd/kubectl/main.go"]),
            "SPDXRef-File-cmd-kubectl-main.go"
        );
        assert_eq!(
            build_id_string(&["registry.k8s.io/pause:3.9"]),
            "registry.k8s.io-pause-3.9"
        );
    }

    #[test]
    fn test_build_id_strips_illegal_characters() {
        assert_eq!(
            build_id_string(&["SPDXRef-Package", "my pkg@1.0_beta"]),
            "SPDXRef-Package-mypkg1.0beta"
        );
    }

    #[test]
    fn test_build_id_discards_empty_seeds() {
        assert_eq!(
            build_id_string(&["SPDXRef-Package", "", "@@@", "name"]),
            "SPDXRef-Package-name"
        );
    }

    #[test]
    fn test_build_id_is_deterministic() {
        let seeds = ["SPDXRef-Package", "kubernetes", "v1.22.0"];
        assert_eq!(build_id_string(&seeds), build_id_string(&seeds));
    }

    #[test]
    fn test_build_id_output_is_always_legal() {
        let inputs: [&[&str]; 5] = [
            &[],
            &[""],
            &["ünïcödé/路径"],
            &["SPDXRef-Package", "a\tb\nc"],
            &["!!", "..", "--"],
        ];
        for seeds in inputs {
            let id = build_id_string(seeds);
            assert!(is_valid_id(&id), "illegal id {:?} for {:?}", id, seeds);
        }
    }

    #[test]
    fn test_build_id_falls_back_to_uuid() {
        let first = build_id_string(&["SPDXRef-Package", "$$$"]);
        let second = build_id_string(&["SPDXRef-Package", "$$$"]);

        assert!(first.starts_with("SPDXRef-Package-"));
        let token = first.strip_prefix("SPDXRef-Package-").unwrap();
        assert_eq!(token.len(), 36);
        assert_ne!(first, second);
    }

    #[test]
    fn test_build_id_no_seeds_is_uuid() {
        let id = build_id_string(&[]);
        assert_eq!(id.len(), 36);
        assert_ne!(id, build_id_string(&[]));
    }

    #[test]
    fn test_prefixed_seeds_do_not_count_as_meaningful() {
        let id = build_id_string(&["SPDXRef-File", "SPDXRef-Package-x"]);
        assert!(id.starts_with("SPDXRef-File-SPDXRef-Package-x-"));
        assert_eq!(id.len(), "SPDXRef-File-SPDXRef-Package-x-".len() + 36);
    }

    #[test]
    fn test_allocator_disambiguates_collisions() {
        let mut allocator = IdAllocator::new();
        let first = allocator.allocate(&["SPDXRef-File", "a b.txt"]);
        let second = allocator.allocate(&["SPDXRef-File", "ab.txt"]);
        let third = allocator.allocate(&["SPDXRef-File", "a@b.txt"]);

        assert_eq!(first, "SPDXRef-File-ab.txt");
        assert_eq!(second, "SPDXRef-File-ab.txt-2");
        assert_eq!(third, "SPDXRef-File-ab.txt-3");
        assert_eq!(allocator.len(), 3);
    }

    #[test]
    fn test_allocator_reserve() {
        let mut allocator = IdAllocator::new();
        assert!(allocator.is_empty());
        assert!(allocator.reserve("SPDXRef-Package-x"));
        assert!(!allocator.reserve("SPDXRef-Package-x"));
        assert_eq!(
            allocator.allocate(&["SPDXRef-Package", "x"]),
            "SPDXRef-Package-x-2"
        );
    }

    #[test]
    fn test_document_ref_id_is_sanitized() {
        assert_eq!(document_ref_id("source"), "DocumentRef-source");
        assert_eq!(document_ref_id("DocumentRef-source"), "DocumentRef-source");
        assert_eq!(document_ref_id("my source/v1"), "DocumentRef-mysource-v1");
        assert!(is_valid_id(&document_ref_id("k8s.io:release v1.22")));
    }
}
