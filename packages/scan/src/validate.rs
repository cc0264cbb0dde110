//! Candidate validation and duplicate detection.
//!
//! [`validate`] rejects absent or blank records. [`check_unique`] rejects a
//! record whose name was already accepted. [`SharedResultSet`] holds the
//! accepted records of a run and runs the uniqueness check and the insert
//! under one lock, so two concurrent candidates for the same name can never
//! both be accepted.

use std::sync::{Mutex, MutexGuard, PoisonError};

use pdf_crawler_scan_models::{CandidateRecord, ExtractionFailure, ResultSet};

use crate::ledger::OutcomeLedger;

/// Rejects an absent record or one with a blank name or date.
///
/// # Errors
///
/// Returns [`ExtractionFailure::EmptyOrBlankRecord`] if `record` is `None`
/// or either of its fields is empty or whitespace-only.
pub fn validate(path: &str, record: Option<&CandidateRecord>) -> Result<(), ExtractionFailure> {
    let Some(record) = record else {
        return Err(ExtractionFailure::EmptyOrBlankRecord {
            path: path.to_owned(),
            detail: "no data could be extracted".to_owned(),
        });
    };

    if record.is_blank() {
        return Err(ExtractionFailure::EmptyOrBlankRecord {
            path: path.to_owned(),
            detail: format!("Name[{}]:Date[{}]", record.name, record.date),
        });
    }

    Ok(())
}

/// Rejects `record` if `results` already holds its name.
///
/// The collision is counted in `ledger` before the failure is returned.
///
/// # Errors
///
/// Returns [`ExtractionFailure::DuplicateKey`] if the name is taken.
pub fn check_unique(
    path: &str,
    record: &CandidateRecord,
    results: &ResultSet,
    ledger: &OutcomeLedger,
) -> Result<(), ExtractionFailure> {
    let Some(existing) = results.get(&record.name) else {
        return Ok(());
    };

    ledger.record_duplicate(&record.name);

    Err(ExtractionFailure::DuplicateKey {
        path: path.to_owned(),
        name: record.name.clone(),
        detail: format!(
            "already accepted with date [{existing}], rejected date [{}]",
            record.date
        ),
    })
}

/// Accepted records of one scan run, shared between workers.
#[derive(Debug, Default)]
pub struct SharedResultSet {
    inner: Mutex<ResultSet>,
}

impl SharedResultSet {
    /// Creates an empty result set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, ResultSet> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Checks `record` for uniqueness and inserts it, atomically.
    ///
    /// The lock on the result set is held across the check and the insert.
    /// The ledger lock is only taken inside it, never the other way round.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionFailure::DuplicateKey`] if the name was already
    /// accepted; the result set is left unchanged.
    pub fn merge_unique(
        &self,
        path: &str,
        record: &CandidateRecord,
        ledger: &OutcomeLedger,
    ) -> Result<(), ExtractionFailure> {
        let mut results = self.lock();
        check_unique(path, record, &results, ledger)?;
        results.insert(record.name.clone(), record.date.clone());
        Ok(())
    }

    /// Number of accepted records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether no record was accepted yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Copies the accepted records.
    #[must_use]
    pub fn snapshot(&self) -> ResultSet {
        self.lock().clone()
    }

    /// Consumes the set and returns the accepted records.
    #[must_use]
    pub fn into_inner(self) -> ResultSet {
        self.inner.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}
