use crate::ports::outbound::LicenseCorpusSource;
use crate::sbom_generation::domain::License;
use crate::shared::Result;
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

/// CachingLicenseSource wraps a LicenseCorpusSource and adds in-memory caching.
///
/// This adapter implements the decorator pattern to add caching capability
/// to any LicenseCorpusSource implementation. The cache is thread-safe and
/// suitable for concurrent access, keyed by license id.
pub struct CachingLicenseSource<S: LicenseCorpusSource> {
    inner: S,
    cache: Arc<DashMap<String, License>>,
}

impl<S: LicenseCorpusSource> CachingLicenseSource<S> {
    /// Creates a new caching source wrapping the given inner source
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            cache: Arc::new(DashMap::new()),
        }
    }

    /// Returns the current cache size (for testing/monitoring)
    #[cfg(test)]
    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}

#[async_trait]
impl<S: LicenseCorpusSource> LicenseCorpusSource for CachingLicenseSource<S> {
    async fn license_ids(&self) -> Result<Vec<String>> {
        self.inner.license_ids().await
    }

    async fn fetch_license(&self, id: &str) -> Result<License> {
        if let Some(cached) = self.cache.get(id) {
            return Ok(cached.clone());
        }

        let license = self.inner.fetch_license(id).await?;
        self.cache.insert(id.to_string(), license.clone());
        Ok(license)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Mock source for testing that tracks call counts
    struct MockLicenseSource {
        call_count: AtomicUsize,
    }

    impl MockLicenseSource {
        fn new() -> Self {
            Self {
                call_count: AtomicUsize::new(0),
            }
        }

        fn get_call_count(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl LicenseCorpusSource for MockLicenseSource {
        async fn license_ids(&self) -> Result<Vec<String>> {
            Ok(vec!["MIT".to_string()])
        }

        async fn fetch_license(&self, id: &str) -> Result<License> {
            self.call_count.fetch_add(1, Ordering::SeqCst);
            if id == "Unknown" {
                anyhow::bail!("unknown license {}", id);
            }
            Ok(License::new(id).with_text(format!("{} text", id)))
        }
    }

    #[tokio::test]
    async fn test_caching_source_returns_cached_value() {
        let source = CachingLicenseSource::new(MockLicenseSource::new());

        let first = source.fetch_license("MIT").await.unwrap();
        let second = source.fetch_license("MIT").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(source.inner.get_call_count(), 1);
        assert_eq!(source.cache_size(), 1);
    }

    #[tokio::test]
    async fn test_caching_source_keys_by_id() {
        let source = CachingLicenseSource::new(MockLicenseSource::new());

        source.fetch_license("MIT").await.unwrap();
        source.fetch_license("Apache-2.0").await.unwrap();

        assert_eq!(source.inner.get_call_count(), 2);
        assert_eq!(source.cache_size(), 2);
    }

    #[tokio::test]
    async fn test_caching_source_does_not_cache_errors() {
        let source = CachingLicenseSource::new(MockLicenseSource::new());

        assert!(source.fetch_license("Unknown").await.is_err());
        assert!(source.fetch_license("Unknown").await.is_err());

        assert_eq!(source.inner.get_call_count(), 2);
        assert_eq!(source.cache_size(), 0);
    }

    #[tokio::test]
    async fn test_caching_source_concurrent_access() {
        let source = Arc::new(CachingLicenseSource::new(MockLicenseSource::new()));

        let mut handles = vec![];
        for _ in 0..10 {
            let source = Arc::clone(&source);
            handles.push(tokio::spawn(async move {
                source.fetch_license("MIT").await.unwrap()
            }));
        }
        for handle in handles {
            assert_eq!(handle.await.unwrap().id(), "MIT");
        }

        assert!(source.inner.get_call_count() >= 1);
        assert_eq!(source.cache_size(), 1);
    }
}
