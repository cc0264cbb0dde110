#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Concurrent PDF scan core.
//!
//! Given a flat list of files, [`Scanner`] extracts one name/date record
//! per file, merges the accepted records into a single [`ResultSet`], and
//! classifies every file in an [`OutcomeLedger`]:
//!
//! ```text
//! file -> TextExtractor -> extract_record -> validate -> merge_unique -> ResultSet
//!            |                  |               |             |
//!        unreadable        read error      read error    read error
//! ```
//!
//! Files are independent units of work processed by a bounded pool of
//! workers. Blocking PDF I/O runs on tokio's blocking pool and never holds
//! a lock; the only shared state is the result set and the ledger, both of
//! which serialize their own mutations. A per-file failure is recorded and
//! the run continues; nothing aborts the scan.

pub mod discover;
pub mod extractor;
pub mod ledger;
pub mod progress;
pub mod report;
pub mod validate;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use futures::stream::{self, StreamExt as _};
use pdf_crawler_pdf::TextExtractor;
pub use pdf_crawler_scan_models::{
    CandidateRecord, ConfigError, ExtractionFailure, LedgerSnapshot, ResultSet, ScanConfig,
    ScanOutcome,
};

pub use crate::ledger::OutcomeLedger;
use crate::progress::{ProgressCallback, null_progress};
use crate::validate::SharedResultSet;

/// Errors that abort a scan run before any file is processed.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// The scan configuration is invalid.
    #[error("Invalid scan configuration: {0}")]
    Config(#[from] ConfigError),
}

/// Runs scans over sets of files with a shared [`TextExtractor`].
///
/// Every [`Scanner::scan`] call builds its own result set and
/// [`OutcomeLedger`], so one scanner can serve several runs, including
/// concurrent ones.
pub struct Scanner<E> {
    extractor: Arc<E>,
    config: ScanConfig,
    progress: Arc<dyn ProgressCallback>,
}

impl<E: TextExtractor + 'static> Scanner<E> {
    /// Creates a scanner that reads documents through `extractor`.
    #[must_use]
    pub fn new(extractor: E, config: ScanConfig) -> Self {
        Self {
            extractor: Arc::new(extractor),
            config,
            progress: null_progress(),
        }
    }

    /// Reports per-file progress to `progress`.
    #[must_use]
    pub fn with_progress(mut self, progress: Arc<dyn ProgressCallback>) -> Self {
        self.progress = progress;
        self
    }

    /// The scan configuration.
    #[must_use]
    pub const fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Scans `files` and returns the accepted records and the final ledger.
    ///
    /// Paths are made absolute and deduplicated. Up to
    /// [`ScanConfig::concurrency`] files are processed at once, in no
    /// particular order. Returns after every file has been classified.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::Config`] if the configuration is invalid. Per-file
    /// problems never produce an error; they are recorded in the ledger.
    pub async fn scan(&self, files: &[PathBuf]) -> Result<ScanOutcome, ScanError> {
        self.config.validate()?;

        let start = Instant::now();
        let files = unique_absolute(files);
        let results = SharedResultSet::new();
        let ledger = OutcomeLedger::new();

        log::info!(
            "Scanning {} file(s) with concurrency {}",
            files.len(),
            self.config.concurrency
        );
        self.progress.set_total(files.len() as u64);
        self.progress
            .set_message(format!("Scanning {} file(s)", files.len()));

        stream::iter(files.into_iter().map(|path| self.process_file(path, &results, &ledger)))
            .buffer_unordered(self.config.concurrency)
            .for_each(|path| {
                self.progress.file_done(&path);
                std::future::ready(())
            })
            .await;

        let outcome = ScanOutcome {
            results: results.into_inner(),
            ledger: ledger.snapshot(),
        };

        log::info!(
            "Scan complete in {:.1}s: {} selected, {} not read, {} read ({} without errors, {} with errors)",
            start.elapsed().as_secs_f64(),
            outcome.ledger.selected.len(),
            outcome.ledger.not_read.len(),
            outcome.ledger.read.len(),
            outcome.ledger.read_without_errors.len(),
            outcome.ledger.read_with_errors.len(),
        );
        self.progress.finish(format!(
            "Scan complete -- {} record(s) from {} file(s)",
            outcome.results.len(),
            outcome.ledger.selected.len()
        ));

        Ok(outcome)
    }

    /// Takes one file from selection to its terminal bucket and hands the
    /// path back for progress reporting.
    async fn process_file(
        &self,
        path: PathBuf,
        results: &SharedResultSet,
        ledger: &OutcomeLedger,
    ) -> PathBuf {
        let display = path.display().to_string();
        ledger.mark_selected(&display);

        let extractor = Arc::clone(&self.extractor);
        let read_path = path.clone();
        let page = match tokio::task::spawn_blocking(move || {
            extractor.extract_first_page_text(&read_path)
        })
        .await
        {
            Ok(Ok(page)) => page,
            Ok(Err(e)) => {
                reject(
                    ledger,
                    ExtractionFailure::IoFailure {
                        path: display,
                        detail: e.to_string(),
                    },
                );
                return path;
            }
            Err(e) => {
                reject(
                    ledger,
                    ExtractionFailure::IoFailure {
                        path: display,
                        detail: format!("extraction task failed: {e}"),
                    },
                );
                return path;
            }
        };

        let accepted = extractor::extract_record(&path, &page, &self.config).and_then(|record| {
            validate::validate(&display, Some(&record))?;
            results.merge_unique(&display, &record, ledger)?;
            Ok(record)
        });

        match accepted {
            Ok(record) => {
                ledger.mark_read_success(&display);
                log::info!("{display}: Name[{}]:Date[{}]", record.name, record.date);
            }
            Err(failure) => reject(ledger, failure),
        }

        path
    }
}

/// Classifies the failing file and appends the failure to the log.
fn reject(ledger: &OutcomeLedger, failure: ExtractionFailure) {
    if failure.is_unreadable() {
        log::error!("{failure}");
        ledger.mark_unreadable(failure.path());
    } else {
        log::warn!("{failure}");
        ledger.mark_read_error(failure.path());
    }
    ledger.record_failure(failure);
}

/// Absolute, first-seen-order unique copy of `files`.
fn unique_absolute(files: &[PathBuf]) -> Vec<PathBuf> {
    let mut seen = std::collections::BTreeSet::new();
    files
        .iter()
        .map(|file| discover::to_absolute(Path::new(file)))
        .filter(|file| seen.insert(file.clone()))
        .collect()
}
