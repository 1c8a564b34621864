//! Progress reporting for dataset loading.
//!
//! Decouples progress reporting from any rendering backend. The CLI
//! renders it with `indicatif`; the server and tests use [`NullProgress`].

/// Receives progress updates while a dataset is read and indexed.
///
/// Implementations must be `Send + Sync` so one instance can be shared
/// through an `Arc`.
pub trait ProgressCallback: Send + Sync {
    /// Advance progress by `delta` records.
    fn inc(&self, delta: u64);

    /// Update the message displayed alongside the progress indicator.
    fn set_message(&self, msg: String);

    /// Mark progress as complete with a final message.
    fn finish(&self, msg: String);
}

/// Ignores all progress updates.
pub struct NullProgress;

impl ProgressCallback for NullProgress {
    fn inc(&self, _delta: u64) {}
    fn set_message(&self, _msg: String) {}
    fn finish(&self, _msg: String) {}
}
