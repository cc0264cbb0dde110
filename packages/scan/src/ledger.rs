//! Run-scoped outcome ledger.
//!
//! Records which bucket every selected file ended up in. One ledger is
//! owned by a [`crate::Scanner`] and shared with all of its workers, so
//! every method takes `&self` and serializes on an internal mutex.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use pdf_crawler_scan_models::{ExtractionFailure, LedgerSnapshot};

/// Classification ledger for one scan run.
///
/// Each mutation is a single insert under the lock, so the state stays
/// consistent even if a holder panicked; a poisoned lock is recovered
/// instead of propagated.
#[derive(Debug, Default)]
pub struct OutcomeLedger {
    state: Mutex<LedgerSnapshot>,
}

impl OutcomeLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, LedgerSnapshot> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Clears every bucket, the duplicate counts, and the failure log.
    pub fn reset(&self) {
        *self.lock() = LedgerSnapshot::default();
    }

    /// Records that `path` was picked up by the scan.
    pub fn mark_selected(&self, path: &str) {
        self.lock().selected.insert(path.to_owned());
    }

    /// Records that `path` could not be opened or read.
    pub fn mark_unreadable(&self, path: &str) {
        self.lock().not_read.insert(path.to_owned());
    }

    /// Records that `path` was read and its record accepted.
    pub fn mark_read_success(&self, path: &str) {
        let mut state = self.lock();
        state.read.insert(path.to_owned());
        state.read_without_errors.insert(path.to_owned());
    }

    /// Records that `path` was read but did not contribute a record.
    pub fn mark_read_error(&self, path: &str) {
        let mut state = self.lock();
        state.read.insert(path.to_owned());
        state.read_with_errors.insert(path.to_owned());
    }

    /// Counts one rejected collision for `name`.
    pub fn record_duplicate(&self, name: &str) {
        *self.lock().duplicates.entry(name.to_owned()).or_insert(0) += 1;
    }

    /// Appends a per-file failure to the failure log.
    pub fn record_failure(&self, failure: ExtractionFailure) {
        self.lock().failures.push(failure);
    }

    /// Files picked up by the scan.
    #[must_use]
    pub fn selected(&self) -> BTreeSet<String> {
        self.lock().selected.clone()
    }

    /// Files that could not be opened or read.
    #[must_use]
    pub fn not_read(&self) -> BTreeSet<String> {
        self.lock().not_read.clone()
    }

    /// Files that were opened, with or without errors.
    #[must_use]
    pub fn read(&self) -> BTreeSet<String> {
        self.lock().read.clone()
    }

    /// Files whose record was accepted.
    #[must_use]
    pub fn read_without_errors(&self) -> BTreeSet<String> {
        self.lock().read_without_errors.clone()
    }

    /// Files that were opened but rejected.
    #[must_use]
    pub fn read_with_errors(&self) -> BTreeSet<String> {
        self.lock().read_with_errors.clone()
    }

    /// Rejected collision counts per name.
    #[must_use]
    pub fn duplicates(&self) -> BTreeMap<String, u32> {
        self.lock().duplicates.clone()
    }

    /// Number of rejected collisions for `name`.
    #[must_use]
    pub fn duplicate_count(&self, name: &str) -> u32 {
        self.lock().duplicates.get(name).copied().unwrap_or(0)
    }

    /// Copies the whole ledger in one lock acquisition.
    #[must_use]
    pub fn snapshot(&self) -> LedgerSnapshot {
        self.lock().clone()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[test]
    fn read_is_union_of_success_and_error() {
        let ledger = OutcomeLedger::new();
        for path in ["a", "b", "c"] {
            ledger.mark_selected(path);
        }
        ledger.mark_read_success("a");
        ledger.mark_read_error("b");
        ledger.mark_unreadable("c");

        let snapshot = ledger.snapshot();
        assert!(snapshot.is_consistent());
        assert_eq!(ledger.read().len(), 2);
        assert!(ledger.read_without_errors().contains("a"));
        assert!(ledger.read_with_errors().contains("b"));
        assert!(ledger.not_read().contains("c"));
        assert!(!ledger.read().contains("c"));
        assert!(!snapshot.is_error_free());
    }

    #[test]
    fn reset_clears_everything() {
        let ledger = OutcomeLedger::new();
        ledger.mark_selected("a");
        ledger.mark_read_error("a");
        ledger.mark_unreadable("b");
        ledger.record_duplicate("Max Mustermann");
        ledger.record_failure(ExtractionFailure::MissingDate {
            path: "a".to_owned(),
            detail: String::new(),
        });

        ledger.reset();
        assert_eq!(ledger.snapshot(), LedgerSnapshot::default());

        ledger.reset();
        assert_eq!(ledger.snapshot(), LedgerSnapshot::default());
        assert!(ledger.selected().is_empty());
        assert!(ledger.duplicates().is_empty());
    }

    #[test]
    fn counts_duplicates_per_name() {
        let ledger = OutcomeLedger::new();
        ledger.record_duplicate("Max Mustermann");
        ledger.record_duplicate("Max Mustermann");
        ledger.record_duplicate("Erika Musterfrau");

        assert_eq!(ledger.duplicate_count("Max Mustermann"), 2);
        assert_eq!(ledger.duplicate_count("Erika Musterfrau"), 1);
        assert_eq!(ledger.duplicate_count("Nobody"), 0);
    }

    #[test]
    fn concurrent_marks_are_not_lost() {
        let ledger = Arc::new(OutcomeLedger::new());

        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let ledger = Arc::clone(&ledger);
                std::thread::spawn(move || {
                    for i in 0..100 {
                        let path = format!("{worker}-{i}");
                        ledger.mark_selected(&path);
                        if i % 2 == 0 {
                            ledger.mark_read_success(&path);
                        } else {
                            ledger.mark_read_error(&path);
                        }
                        ledger.record_duplicate("shared");
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let snapshot = ledger.snapshot();
        assert_eq!(snapshot.selected.len(), 800);
        assert_eq!(snapshot.read.len(), 800);
        assert_eq!(snapshot.read_without_errors.len(), 400);
        assert_eq!(snapshot.read_with_errors.len(), 400);
        assert_eq!(snapshot.duplicates["shared"], 800);
        assert!(snapshot.is_consistent());
    }
}
