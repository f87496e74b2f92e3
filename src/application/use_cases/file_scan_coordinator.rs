use crate::ports::outbound::{ContentScanner, ProgressReporter, ScanRequest};
use crate::sbom_generation::domain::Package;
use crate::shared::Result;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Scans allowed to run at the same time
pub const DEFAULT_MAX_CONCURRENT_SCANS: usize = 5;

type FirstError = Arc<Mutex<Option<anyhow::Error>>>;

/// FileScanCoordinator - Runs content scans on a bounded worker pool
///
/// Every request is dispatched even after a scan has failed. The call
/// returns once all workers are done, with the first recorded error if
/// any; in that case the package is dropped, never handed back partially
/// filled.
pub struct FileScanCoordinator {
    scanner: Arc<dyn ContentScanner>,
    progress: Option<Arc<dyn ProgressReporter>>,
    max_concurrent: usize,
}

impl FileScanCoordinator {
    pub fn new(scanner: Arc<dyn ContentScanner>) -> Self {
        Self {
            scanner,
            progress: None,
            max_concurrent: DEFAULT_MAX_CONCURRENT_SCANS,
        }
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressReporter>) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent.max(1);
        self
    }

    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    /// Scans every request and inserts the resulting files into `package`
    ///
    /// # Errors
    /// The first scan or insertion failure, after every request was
    /// attempted
    pub async fn scan_into(&self, package: Package, requests: Vec<ScanRequest>) -> Result<Package> {
        let total = requests.len();
        if total == 0 {
            return Ok(package);
        }
        tracing::debug!(package = %package.id(), files = total, workers = self.max_concurrent, "dispatching scans");

        let shared = Arc::new(Mutex::new(package));
        let first_error: FirstError = Arc::new(Mutex::new(None));
        let completed = Arc::new(AtomicUsize::new(0));
        let semaphore = Arc::new(Semaphore::new(self.max_concurrent));
        let mut workers = JoinSet::new();

        for request in requests {
            let permit = Arc::clone(&semaphore).acquire_owned().await?;
            let scanner = Arc::clone(&self.scanner);
            let progress = self.progress.clone();
            let package = Arc::clone(&shared);
            let first_error = Arc::clone(&first_error);
            let completed = Arc::clone(&completed);

            workers.spawn_blocking(move || {
                let _permit = permit;
                let outcome = scanner.scan(&request).and_then(|file| {
                    package
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .add_file(file)
                });
                if let Err(err) = outcome {
                    tracing::debug!(file = %request.name, error = %err, "scan failed");
                    record_first(
                        &first_error,
                        err.context(format!("Failed to scan {}", request.path.display())),
                    );
                }

                let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                if let Some(progress) = progress {
                    progress.report_progress(done, total, Some(&request.name));
                }
            });
        }

        while let Some(joined) = workers.join_next().await {
            if let Err(err) = joined {
                record_first(&first_error, anyhow::anyhow!("Scan worker failed: {}", err));
            }
        }

        let error = first_error
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(err) = error {
            return Err(err);
        }

        let package = Arc::try_unwrap(shared)
            .map_err(|_| anyhow::anyhow!("Scan workers still hold the package"))?;
        Ok(package.into_inner().unwrap_or_else(PoisonError::into_inner))
    }
}

fn record_first(slot: &Mutex<Option<anyhow::Error>>, error: anyhow::Error) {
    let mut slot = slot.lock().unwrap_or_else(PoisonError::into_inner);
    if slot.is_none() {
        *slot = Some(error);
    }
}
