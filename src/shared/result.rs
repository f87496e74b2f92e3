/// Crate-wide result type.
///
/// Errors are `anyhow::Error` so each layer can attach context (the
/// directory, file or image being processed) while keeping the typed
/// `SbomError` available through `downcast_ref`.
pub type Result<T> = std::result::Result<T, anyhow::Error>;
