#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! First-page PDF text extraction.
//!
//! The scan core only needs two facts about a document: whether it is
//! encrypted, and the plain text of its first page. This crate hides how
//! those are obtained behind the [`TextExtractor`] trait so the core can be
//! driven by an in-memory fake in tests.
//!
//! [`PdfTextExtractor`] is the real implementation. It parses the document
//! once with [`lopdf`] to detect encryption, then runs pure-Rust text
//! extraction ([`pdf_extract`]) over the first page of that same document.
//! Later pages are never decoded, so a damaged page further in does not
//! make the file unreadable.

use std::path::Path;

/// Errors raised while opening or reading a PDF.
///
/// Every variant means the file could not be read; none of them is a data
/// problem in an otherwise readable document.
#[derive(Debug, thiserror::Error)]
pub enum PdfError {
    /// The file could not be read from disk.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The bytes are not a loadable PDF document.
    #[error("Failed to load PDF: {0}")]
    Load(#[from] lopdf::Error),

    /// The document loaded but has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// Text extraction failed.
    #[error("PDF extraction error: {0}")]
    Extraction(String),
}

/// Text of the first page of a document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageText {
    /// Plain text of the first page. Empty when `encrypted` is set.
    pub text: String,
    /// Whether the document reports itself as encrypted.
    pub encrypted: bool,
}

impl PageText {
    /// Text of a readable, unencrypted first page.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            encrypted: false,
        }
    }

    /// Marker for an encrypted document; no text was read.
    #[must_use]
    pub const fn encrypted() -> Self {
        Self {
            text: String::new(),
            encrypted: true,
        }
    }
}

/// Source of first-page text for a file on disk.
///
/// Implementations are called from blocking worker threads and must be
/// `Send + Sync` so one instance can be shared across them.
pub trait TextExtractor: Send + Sync {
    /// Reads the file at `path` and returns the text of its first page.
    ///
    /// An encrypted document is not an error: it is reported through
    /// [`PageText::encrypted`] without attempting to read any text.
    ///
    /// # Errors
    ///
    /// Returns [`PdfError`] if the file cannot be opened, parsed, or its
    /// text cannot be extracted.
    fn extract_first_page_text(&self, path: &Path) -> Result<PageText, PdfError>;
}

/// [`TextExtractor`] backed by [`lopdf`] and [`pdf_extract`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfTextExtractor;

impl PdfTextExtractor {
    /// Creates a new extractor.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Extracts the first page of an in-memory PDF.
    ///
    /// # Errors
    ///
    /// Returns [`PdfError`] if the bytes are not a readable PDF.
    pub fn extract_from_mem(bytes: &[u8]) -> Result<PageText, PdfError> {
        let document = lopdf::Document::load_mem(bytes)?;

        // The loader decrypts documents that open with the empty user
        // password and records that in `encryption_state`.
        if document.is_encrypted() || document.encryption_state.is_some() {
            log::debug!("Document is encrypted, skipping text extraction");
            return Ok(PageText::encrypted());
        }

        let Some(&first_page) = document.get_pages().keys().next() else {
            return Err(PdfError::NoPages);
        };

        let mut text = String::new();
        {
            let mut output = pdf_extract::PlainTextOutput::new(&mut text);
            pdf_extract::output_doc_page(&document, &mut output, first_page).map_err(|e| {
                PdfError::Extraction(format!("failed to extract text from page {first_page}: {e}"))
            })?;
        }

        log::debug!("Extracted {} characters from first page", text.len());

        Ok(PageText::new(text))
    }
}

impl TextExtractor for PdfTextExtractor {
    fn extract_first_page_text(&self, path: &Path) -> Result<PageText, PdfError> {
        let bytes = std::fs::read(path)?;

        log::debug!("Read {} bytes from {}", bytes.len(), path.display());

        Self::extract_from_mem(&bytes)
    }
}
