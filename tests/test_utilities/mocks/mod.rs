/// Mock implementations for testing
mod counting_scanner;
mod mock_image_puller;
mod mock_license_classifier;
mod mock_progress_reporter;

pub use counting_scanner::CountingScanner;
pub use mock_image_puller::MockImagePuller;
pub use mock_license_classifier::MockLicenseClassifier;
pub use mock_progress_reporter::MockProgressReporter;
