mod license_conclusion;

pub use license_conclusion::{FileLicenses, LicenseConclusion};
