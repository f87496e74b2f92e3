use crate::application::read_models::SpdxReadModel;
use crate::shared::Result;

/// SbomFormatter port for serializing SBOM documents
///
/// This port abstracts the output syntax (SPDX tag-value, SPDX JSON).
pub trait SbomFormatter {
    /// Serializes the document read model
    ///
    /// # Arguments
    /// * `model` - Ordered, de-duplicated view of the document
    ///
    /// # Returns
    /// Serialized document content
    ///
    /// # Errors
    /// Returns an error if serialization fails
    fn format(&self, model: &SpdxReadModel) -> Result<String>;
}
