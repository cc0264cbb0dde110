#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Record, failure, ledger snapshot, and configuration types for PDF
//! scanning.
//!
//! These are plain data types shared between the scan core, the output
//! writer, and the CLI. Nothing here performs I/O.

use std::collections::{BTreeMap, BTreeSet};
use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

/// Default marker that prefixes the date-bearing line on the first page.
pub const DEFAULT_DATE_MARKER: &str = "Eingang:";

/// Default file suffix stripped from a file name before deriving the name.
pub const DEFAULT_FILE_SUFFIX: &str = ".pdf";

/// Default separator between the components of a file name.
pub const DEFAULT_NAME_SEPARATOR: &str = "_";

/// Accepted records for one scan run, keyed by person name.
///
/// Keys are unique. A `BTreeMap` keeps the output sorted by name.
pub type ResultSet = BTreeMap<String, String>;

/// An unvalidated name/date pair extracted from one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateRecord {
    /// Person name derived from the file name.
    pub name: String,
    /// Date string derived from the first page text.
    pub date: String,
}

impl CandidateRecord {
    /// Creates a new candidate record.
    #[must_use]
    pub fn new(name: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            date: date.into(),
        }
    }

    /// Whether either the name or the date is empty or whitespace-only.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.name.trim().is_empty() || self.date.trim().is_empty()
    }
}

/// Discriminant of an [`ExtractionFailure`], used for counting and
/// classification without matching on the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FailureKind {
    /// The file could not be opened or read.
    IoFailure,
    /// The document reports itself as encrypted.
    EncryptedDocument,
    /// No name could be derived from the file name.
    MissingName,
    /// No date line was found on the first page.
    MissingDate,
    /// The record is absent or has a blank key or value.
    EmptyOrBlankRecord,
    /// The name was already accepted from another file.
    DuplicateKey,
}

/// Why a single file did not contribute a record.
///
/// Every failure is local to one file and carries the offending path and a
/// human-readable detail line for the run report.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExtractionFailure {
    /// The file could not be opened or read.
    #[error("Error while reading file [{path}]: {detail}")]
    IoFailure {
        /// Absolute path of the file.
        path: String,
        /// Underlying I/O or parse error message.
        detail: String,
    },

    /// The document is encrypted, so no text can be extracted.
    #[error("File [{path}] is encrypted: {detail}")]
    EncryptedDocument {
        /// Absolute path of the file.
        path: String,
        /// Human-readable detail.
        detail: String,
    },

    /// The name could not be derived from the file name.
    #[error("The name could not be extracted. File:[{path}] {detail}")]
    MissingName {
        /// Absolute path of the file.
        path: String,
        /// Human-readable detail.
        detail: String,
    },

    /// The date line was not found on the first page.
    #[error("The date could not be extracted. File:[{path}] {detail}")]
    MissingDate {
        /// Absolute path of the file.
        path: String,
        /// Human-readable detail.
        detail: String,
    },

    /// The record is absent, or its name or date is blank.
    #[error("The extracted data is erroneous. File:[{path}] {detail}")]
    EmptyOrBlankRecord {
        /// Absolute path of the file.
        path: String,
        /// Human-readable detail.
        detail: String,
    },

    /// Another file already contributed a record with the same name.
    #[error("The name [{name}] was found more than once. File:[{path}]")]
    DuplicateKey {
        /// Absolute path of the rejected file.
        path: String,
        /// The colliding name.
        name: String,
        /// Human-readable detail.
        detail: String,
    },
}

impl ExtractionFailure {
    /// Returns the discriminant of this failure.
    #[must_use]
    pub const fn kind(&self) -> FailureKind {
        match self {
            Self::IoFailure { .. } => FailureKind::IoFailure,
            Self::EncryptedDocument { .. } => FailureKind::EncryptedDocument,
            Self::MissingName { .. } => FailureKind::MissingName,
            Self::MissingDate { .. } => FailureKind::MissingDate,
            Self::EmptyOrBlankRecord { .. } => FailureKind::EmptyOrBlankRecord,
            Self::DuplicateKey { .. } => FailureKind::DuplicateKey,
        }
    }

    /// Returns the path of the file this failure belongs to.
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            Self::IoFailure { path, .. }
            | Self::EncryptedDocument { path, .. }
            | Self::MissingName { path, .. }
            | Self::MissingDate { path, .. }
            | Self::EmptyOrBlankRecord { path, .. }
            | Self::DuplicateKey { path, .. } => path,
        }
    }

    /// Returns the human-readable detail of this failure.
    #[must_use]
    pub fn detail(&self) -> &str {
        match self {
            Self::IoFailure { detail, .. }
            | Self::EncryptedDocument { detail, .. }
            | Self::MissingName { detail, .. }
            | Self::MissingDate { detail, .. }
            | Self::EmptyOrBlankRecord { detail, .. }
            | Self::DuplicateKey { detail, .. } => detail,
        }
    }

    /// Whether this failure means the file was never read at all.
    ///
    /// Only I/O failures are unreadable; every other kind is a read error.
    #[must_use]
    pub const fn is_unreadable(&self) -> bool {
        matches!(self, Self::IoFailure { .. })
    }
}

/// Point-in-time copy of the outcome ledger of a scan run.
///
/// Taken after the run completes, so it is internally consistent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    /// Every file the scan looked at.
    pub selected: BTreeSet<String>,
    /// Files that could not be opened or read.
    pub not_read: BTreeSet<String>,
    /// Files that were opened, with or without errors.
    pub read: BTreeSet<String>,
    /// Files whose record was accepted.
    pub read_without_errors: BTreeSet<String>,
    /// Files that were opened but did not contribute a record.
    pub read_with_errors: BTreeSet<String>,
    /// Number of rejected collisions per duplicate name.
    pub duplicates: BTreeMap<String, u32>,
    /// Per-file failures in the order they were detected.
    pub failures: Vec<ExtractionFailure>,
}

impl LedgerSnapshot {
    /// Whether no opened file produced an error.
    ///
    /// Unreadable files do not count against this; they are reported
    /// separately.
    #[must_use]
    pub fn is_error_free(&self) -> bool {
        self.read_with_errors.is_empty()
    }

    /// Checks the ledger invariants: `read` is the disjoint union of
    /// `read_without_errors` and `read_with_errors`, no unreadable file was
    /// read, and every classified file was selected.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let union: BTreeSet<&String> = self
            .read_without_errors
            .iter()
            .chain(&self.read_with_errors)
            .collect();
        let read: BTreeSet<&String> = self.read.iter().collect();

        union == read
            && self.read_without_errors.is_disjoint(&self.read_with_errors)
            && self.not_read.is_disjoint(&self.read)
            && self.read.is_subset(&self.selected)
            && self.not_read.is_subset(&self.selected)
    }
}

/// Final state of a scan run: the accepted records plus the ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanOutcome {
    /// Accepted name to date records.
    pub results: ResultSet,
    /// Classification of every selected file.
    pub ledger: LedgerSnapshot,
}

/// Errors from validating a [`ScanConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required string option is empty.
    #[error("Configuration option '{0}' must not be empty")]
    Empty(&'static str),

    /// The worker count is zero.
    #[error("Configuration option 'concurrency' must be greater than 0")]
    ZeroConcurrency,
}

/// Tunables for record extraction and the worker pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Prefix of the line holding the date on the first page.
    pub date_marker: String,
    /// Suffix stripped from the file name before splitting it.
    pub file_suffix: String,
    /// Separator between file name components.
    pub name_separator: String,
    /// Maximum number of files processed at the same time.
    pub concurrency: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            date_marker: DEFAULT_DATE_MARKER.to_owned(),
            file_suffix: DEFAULT_FILE_SUFFIX.to_owned(),
            name_separator: DEFAULT_NAME_SEPARATOR.to_owned(),
            concurrency: std::thread::available_parallelism().map_or(1, NonZeroUsize::get),
        }
    }
}

impl ScanConfig {
    /// Sets the maximum number of concurrently processed files.
    #[must_use]
    pub const fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the marker or separator is blank or the
    /// concurrency is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.date_marker.trim().is_empty() {
            return Err(ConfigError::Empty("date_marker"));
        }
        if self.name_separator.is_empty() {
            return Err(ConfigError::Empty("name_separator"));
        }
        if self.concurrency == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }
        Ok(())
    }
}
