/// License corpus and classification adapters
mod classifier;
mod corpus;

pub use classifier::{CorpusLicenseClassifier, DisabledLicenseClassifier};
pub use corpus::LicenseCorpus;
