use super::{document_ref_id, ChecksumAlgorithm, Checksums};

/// Pointer to another document produced by a related run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalDocumentRef {
    id: String,
    uri: String,
    checksums: Checksums,
}

impl ExternalDocumentRef {
    /// `alias` may be given with or without the `DocumentRef-` prefix.
    /// Characters not allowed in an identifier are dropped.
    pub fn new(alias: impl AsRef<str>, uri: impl Into<String>) -> Self {
        Self {
            id: document_ref_id(alias.as_ref()),
            uri: uri.into(),
            checksums: Checksums::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn checksums(&self) -> &Checksums {
        &self.checksums
    }

    pub fn set_checksums(&mut self, checksums: Checksums) {
        self.checksums = checksums;
    }

    /// The checksum written next to the reference (SHA1, falling back to
    /// the strongest available)
    pub fn primary_checksum(&self) -> Option<(ChecksumAlgorithm, &str)> {
        [
            ChecksumAlgorithm::Sha1,
            ChecksumAlgorithm::Sha256,
            ChecksumAlgorithm::Sha512,
        ]
        .into_iter()
        .find_map(|a| self.checksums.get(a).map(|v| (a, v)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alias_gets_prefix() {
        let r = ExternalDocumentRef::new("kubernetes-v1.22.0", "https://sbom.k8s.io/v1.22.0/source");
        assert_eq!(r.id(), "DocumentRef-kubernetes-v1.22.0");
        assert_eq!(r.uri(), "https://sbom.k8s.io/v1.22.0/source");

        let r = ExternalDocumentRef::new("DocumentRef-src", "https://example.com/src");
        assert_eq!(r.id(), "DocumentRef-src");
    }

    #[test]
    fn test_alias_with_illegal_characters_is_sanitized() {
        let r = ExternalDocumentRef::new("my source/v1", "https://example.com/src");
        assert_eq!(r.id(), "DocumentRef-mysource-v1");
    }

    #[test]
    fn test_primary_checksum_prefers_sha1() {
        let mut r = ExternalDocumentRef::new("src", "https://example.com/src");
        assert!(r.primary_checksum().is_none());

        let mut sums = Checksums::new();
        sums.insert(ChecksumAlgorithm::Sha256, "b".repeat(64));
        sums.insert(ChecksumAlgorithm::Sha1, "a".repeat(40));
        r.set_checksums(sums);

        let (algorithm, value) = r.primary_checksum().unwrap();
        assert_eq!(algorithm, ChecksumAlgorithm::Sha1);
        assert_eq!(value.len(), 40);
    }
}
