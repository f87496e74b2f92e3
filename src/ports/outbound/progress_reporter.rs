/// ProgressReporter port for user feedback while a document is built
///
/// Scan workers report from blocking threads, so implementations must be
/// `Send + Sync`. Messages are for humans; nothing parses them.
pub trait ProgressReporter: Send + Sync {
    /// Reports a step, e.g. the directory or image being processed
    fn report(&self, message: &str);

    /// Reports how many of `total` file scans have finished
    ///
    /// `message` names the file that just completed, when known.
    fn report_progress(&self, current: usize, total: usize, message: Option<&str>);

    /// Reports a recoverable problem
    fn report_error(&self, message: &str);

    /// Reports that a package or document is complete
    fn report_completion(&self, message: &str);
}
