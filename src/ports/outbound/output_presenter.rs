use crate::shared::Result;

/// OutputPresenter port for the serialized SPDX document
///
/// Implementations write to stdout or replace a file atomically.
pub trait OutputPresenter {
    /// Writes `content` to the destination
    ///
    /// # Errors
    /// Returns an error if the destination cannot be written. A failed
    /// write never leaves a partial document behind.
    fn present(&self, content: &str) -> Result<()>;
}
