use spdx_sbom::prelude::*;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Mock ContentScanner counting its calls and failing on chosen files
#[derive(Default, Clone)]
pub struct CountingScanner {
    pub attempts: Arc<AtomicUsize>,
    pub successes: Arc<AtomicUsize>,
    failing: HashSet<String>,
}

impl CountingScanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(mut self, name: &str) -> Self {
        self.failing.insert(name.to_string());
        self
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn successes(&self) -> usize {
        self.successes.load(Ordering::SeqCst)
    }
}

impl ContentScanner for CountingScanner {
    fn scan(&self, request: &ScanRequest) -> Result<File> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.failing.contains(&request.name) {
            anyhow::bail!("permission denied: {}", request.name);
        }
        self.successes.fetch_add(1, Ordering::SeqCst);
        Ok(File::new(&request.name).with_id(&request.id))
    }
}
