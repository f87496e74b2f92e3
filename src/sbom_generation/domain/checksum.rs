use sha1::Sha1;
use sha2::{Digest, Sha256, Sha512};
use std::collections::BTreeMap;
use std::fmt;
use std::io::Read;

/// Hash algorithms recorded for files, layers and referenced documents
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ChecksumAlgorithm {
    Sha1,
    Sha256,
    Sha512,
}

impl ChecksumAlgorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChecksumAlgorithm::Sha1 => "SHA1",
            ChecksumAlgorithm::Sha256 => "SHA256",
            ChecksumAlgorithm::Sha512 => "SHA512",
        }
    }
}

impl fmt::Display for ChecksumAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Set of hex digests keyed by algorithm, iterated in a fixed order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Checksums(BTreeMap<ChecksumAlgorithm, String>);

impl Checksums {
    pub fn new() -> Self {
        Self::default()
    }

    /// Streams `reader` once and computes SHA1, SHA256 and SHA512.
    pub fn from_reader<R: Read>(mut reader: R) -> std::io::Result<Self> {
        let mut sha1 = Sha1::new();
        let mut sha256 = Sha256::new();
        let mut sha512 = Sha512::new();
        let mut buf = [0u8; 64 * 1024];

        loop {
            let n = reader.read(&mut buf)?;
            if n == 0 {
                break;
            }
            sha1.update(&buf[..n]);
            sha256.update(&buf[..n]);
            sha512.update(&buf[..n]);
        }

        let mut sums = Self::new();
        sums.insert(ChecksumAlgorithm::Sha1, format!("{:x}", sha1.finalize()));
        sums.insert(ChecksumAlgorithm::Sha256, format!("{:x}", sha256.finalize()));
        sums.insert(ChecksumAlgorithm::Sha512, format!("{:x}", sha512.finalize()));
        Ok(sums)
    }

    pub fn insert(&mut self, algorithm: ChecksumAlgorithm, value: String) {
        self.0.insert(algorithm, value);
    }

    pub fn get(&self, algorithm: ChecksumAlgorithm) -> Option<&str> {
        self.0.get(&algorithm).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ChecksumAlgorithm, &str)> {
        self.0.iter().map(|(a, v)| (*a, v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// Computes the package verification code over the SHA1 values of its files.
///
/// The digests are sorted and concatenated before hashing, so the result does
/// not depend on file order.
pub fn verification_code<'a, I>(file_sha1s: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut values: Vec<&str> = file_sha1s.into_iter().collect();
    values.sort_unstable();

    let mut hasher = Sha1::new();
    for value in values {
        hasher.update(value.as_bytes());
    }
    format!("{:x}", hasher.finalize())
}
