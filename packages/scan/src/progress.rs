//! Per-file progress notifications for a scan run.
//!
//! The scanner announces how many files a run will classify and then names
//! each file as soon as it lands in its terminal bucket. Rendering is up to
//! the caller: the CLI drives an `indicatif` bar, library callers and tests
//! use [`NullProgress`].

use std::path::Path;
use std::sync::Arc;

/// Receives progress notifications from a running scan.
///
/// Calls arrive from whichever worker finishes a file, so implementations
/// are `Send + Sync`.
pub trait ProgressCallback: Send + Sync {
    /// Number of distinct files the run will classify.
    fn set_total(&self, files: u64);

    /// `path` has been classified.
    fn file_done(&self, path: &Path);

    /// Free-form status line.
    fn set_message(&self, msg: String);

    /// The run is over; `msg` summarizes it.
    fn finish(&self, msg: String);
}

/// Discards every notification.
pub struct NullProgress;

impl ProgressCallback for NullProgress {
    fn set_total(&self, _files: u64) {}
    fn file_done(&self, _path: &Path) {}
    fn set_message(&self, _msg: String) {}
    fn finish(&self, _msg: String) {}
}

/// Shared [`NullProgress`], the scanner's default.
#[must_use]
pub fn null_progress() -> Arc<dyn ProgressCallback> {
    Arc::new(NullProgress)
}
