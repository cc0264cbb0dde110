//! Derives a name/date candidate record from one document.
//!
//! The name comes from the file name: components are separated by `_` and
//! the last two are taken as first and last name, so
//! `2023-01-01_Max_Mustermann.pdf` yields `"Max Mustermann"`.
//!
//! The date comes from the first line of the first page that starts with
//! the date marker (`"Eingang:"` by default). The marker and a trailing
//! print-time annotation such as `" 9:30 Uhr (Druck: ...)"` are removed:
//!
//! ```text
//! Eingang: 01.02.2023 9:30 Uhr (Druck: xyz)   ->   01.02.2023
//! ```

use std::path::Path;
use std::sync::LazyLock;

use pdf_crawler_pdf::PageText;
use pdf_crawler_scan_models::{CandidateRecord, ExtractionFailure, ScanConfig};
use regex::Regex;

/// Trailing time-of-day and print annotation after the date.
static TIME_ANNOTATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r" [0-9]?[0-9]:[0-9]?[0-9] Uhr \(Druck:.*").expect("valid regex")
});

/// Extracts a candidate record for the file at `path` from its first page.
///
/// # Errors
///
/// * [`ExtractionFailure::EncryptedDocument`] if the document is encrypted.
/// * [`ExtractionFailure::MissingName`] if no name can be derived from the
///   file name, whether or not a date was found.
/// * [`ExtractionFailure::MissingDate`] if a name was derived but no date
///   line was found.
pub fn extract_record(
    path: &Path,
    page: &PageText,
    config: &ScanConfig,
) -> Result<CandidateRecord, ExtractionFailure> {
    let path_str = path.display().to_string();

    if page.encrypted {
        return Err(ExtractionFailure::EncryptedDocument {
            path: path_str,
            detail: "no text can be extracted from an encrypted document".to_owned(),
        });
    }

    let name = derive_name(path, &config.file_suffix, &config.name_separator);
    let date = extract_date(&page.text, &config.date_marker).unwrap_or_default();

    if name.trim().is_empty() {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        return Err(ExtractionFailure::MissingName {
            path: path_str,
            detail: format!(
                "no first and last name in file name '{file_name}' (expected '{}'-separated components)",
                config.name_separator
            ),
        });
    }

    if date.trim().is_empty() {
        return Err(ExtractionFailure::MissingDate {
            path: path_str,
            detail: format!(
                "no line starting with '{}' on the first page",
                config.date_marker
            ),
        });
    }

    Ok(CandidateRecord::new(name, date))
}

/// Derives the person name from the file name of `path`.
///
/// Strips `suffix` from the end of the file name, splits on `separator`,
/// and joins the last two components with a single space. Trailing empty
/// components are ignored. Returns an empty string if fewer than two
/// components remain.
#[must_use]
pub fn derive_name(path: &Path, suffix: &str, separator: &str) -> String {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = file_name.strip_suffix(suffix).unwrap_or(&file_name);

    let mut components: Vec<&str> = stem.split(separator).collect();
    while components.last().is_some_and(|c| c.is_empty()) {
        components.pop();
    }

    match components.as_slice() {
        [.., first, last] => format!("{first} {last}"),
        _ => String::new(),
    }
}

/// Returns the date from the first line of `text` that starts with
/// `marker`, or `None` if no line does. Later matching lines are ignored.
#[must_use]
pub fn extract_date(text: &str, marker: &str) -> Option<String> {
    text.lines()
        .find(|line| line.starts_with(marker))
        .map(|line| strip_date_line(line, marker))
}

/// Removes the marker and the trailing time annotation from a date line.
#[must_use]
pub fn strip_date_line(line: &str, marker: &str) -> String {
    let without_marker = line.replace(marker.trim(), "");
    TIME_ANNOTATION_RE
        .replace_all(without_marker.trim(), "")
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ScanConfig {
        ScanConfig::default()
    }

    #[test]
    fn derives_name_from_last_two_components() {
        let path = Path::new("/in/2023-01-01_Max_Mustermann.pdf");
        assert_eq!(derive_name(path, ".pdf", "_"), "Max Mustermann");
    }

    #[test]
    fn derives_empty_name_without_separator() {
        let path = Path::new("/in/report.pdf");
        assert_eq!(derive_name(path, ".pdf", "_"), "");
    }

    #[test]
    fn two_components_are_enough() {
        let path = Path::new("Max_Mustermann.pdf");
        assert_eq!(derive_name(path, ".pdf", "_"), "Max Mustermann");
    }

    #[test]
    fn ignores_trailing_empty_components() {
        let path = Path::new("2023_Mustermann_.pdf");
        assert_eq!(derive_name(path, ".pdf", "_"), "2023 Mustermann");

        let path = Path::new("Mustermann_.pdf");
        assert_eq!(derive_name(path, ".pdf", "_"), "");
    }

    #[test]
    fn suffix_is_only_stripped_at_the_end() {
        let path = Path::new("a.pdf.backup_Max_Mustermann.pdf");
        assert_eq!(derive_name(path, ".pdf", "_"), "Max Mustermann");
    }

    #[test]
    fn strips_marker_and_time_annotation() {
        assert_eq!(
            strip_date_line("Eingang: 01.02.2023 9:30 Uhr (Druck: xyz)", "Eingang:"),
            "01.02.2023"
        );
        assert_eq!(
            strip_date_line("Eingang: 01.02.2023 14:05 Uhr (Druck: 02.02.2023)", "Eingang:"),
            "01.02.2023"
        );
    }

    #[test]
    fn keeps_date_without_annotation() {
        assert_eq!(strip_date_line("Eingang:   01.02.2023  ", "Eingang:"), "01.02.2023");
    }

    #[test]
    fn time_annotation_is_case_sensitive() {
        assert_eq!(
            strip_date_line("Eingang: 01.02.2023 9:30 uhr (druck: xyz)", "Eingang:"),
            "01.02.2023 9:30 uhr (druck: xyz)"
        );
    }

    #[test]
    fn uses_first_marker_line_only() {
        let text = "Header\nEingang: 01.02.2023 9:30 Uhr (Druck: a)\nEingang: 05.06.2024\n";
        assert_eq!(extract_date(text, "Eingang:").as_deref(), Some("01.02.2023"));
    }

    #[test]
    fn handles_crlf_line_endings() {
        let text = "Header\r\nEingang: 01.02.2023\r\nFooter";
        assert_eq!(extract_date(text, "Eingang:").as_deref(), Some("01.02.2023"));
    }

    #[test]
    fn marker_must_start_the_line() {
        let text = "  Eingang: 01.02.2023\nSiehe Eingang: 02.02.2023";
        assert_eq!(extract_date(text, "Eingang:"), None);
    }

    #[test]
    fn extracts_record() {
        let page = PageText::new("Bescheid\nEingang: 01.02.2023 9:30 Uhr (Druck: xyz)\n");
        let record = extract_record(
            Path::new("/in/2023-01-01_Max_Mustermann.pdf"),
            &page,
            &config(),
        )
        .unwrap();
        assert_eq!(record, CandidateRecord::new("Max Mustermann", "01.02.2023"));
    }

    #[test]
    fn encrypted_document_fails_first() {
        let failure = extract_record(
            Path::new("/in/report.pdf"),
            &PageText::encrypted(),
            &config(),
        )
        .unwrap_err();
        assert!(matches!(failure, ExtractionFailure::EncryptedDocument { .. }));
        assert_eq!(failure.path(), "/in/report.pdf");
    }

    #[test]
    fn missing_name_wins_over_missing_date() {
        let failure = extract_record(
            Path::new("/in/report.pdf"),
            &PageText::new("no date here"),
            &config(),
        )
        .unwrap_err();
        assert!(matches!(failure, ExtractionFailure::MissingName { .. }));
    }

    #[test]
    fn missing_name_with_date_present() {
        let failure = extract_record(
            Path::new("/in/report.pdf"),
            &PageText::new("Eingang: 01.02.2023"),
            &config(),
        )
        .unwrap_err();
        assert!(matches!(failure, ExtractionFailure::MissingName { .. }));
    }

    #[test]
    fn missing_date_with_name_present() {
        let failure = extract_record(
            Path::new("/in/2023-01-01_Max_Mustermann.pdf"),
            &PageText::new("Bescheid\nohne Datum"),
            &config(),
        )
        .unwrap_err();
        assert!(matches!(failure, ExtractionFailure::MissingDate { .. }));
    }

    #[test]
    fn marker_line_with_only_annotation_is_missing_date() {
        let failure = extract_record(
            Path::new("/in/2023-01-01_Max_Mustermann.pdf"),
            &PageText::new("Eingang: "),
            &config(),
        )
        .unwrap_err();
        assert!(matches!(failure, ExtractionFailure::MissingDate { .. }));
    }

    #[test]
    fn honours_custom_marker() {
        let config = ScanConfig {
            date_marker: "Received:".to_owned(),
            ..ScanConfig::default()
        };
        let page = PageText::new("Received: 2024-03-01");
        let record =
            extract_record(Path::new("x_Erika_Musterfrau.pdf"), &page, &config).unwrap();
        assert_eq!(record, CandidateRecord::new("Erika Musterfrau", "2024-03-01"));
    }
}
