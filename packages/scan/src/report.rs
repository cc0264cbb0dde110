//! Human-readable and JSON renderings of a finished run's ledger.

use std::collections::BTreeSet;
use std::fmt;

use pdf_crawler_scan_models::LedgerSnapshot;

/// Text report for a [`LedgerSnapshot`], rendered through [`fmt::Display`].
///
/// Lists every bucket with its size and paths, the per-file failures, the
/// duplicate names with their collision counts, a statistics block, and a
/// final verdict line.
pub struct Report<'a>(pub &'a LedgerSnapshot);

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ledger = self.0;

        write_section(f, "Found", &ledger.selected)?;
        write_section(f, "Ignored", &ledger.not_read)?;
        write_section(f, "Read", &ledger.read)?;
        write_section(f, "Error-free", &ledger.read_without_errors)?;
        write_section(f, "Erroneous", &ledger.read_with_errors)?;

        if !ledger.failures.is_empty() {
            writeln!(f, "Failures ({}):", ledger.failures.len())?;
            for failure in &ledger.failures {
                writeln!(f, "\t{failure}")?;
            }
        }

        if !ledger.duplicates.is_empty() {
            writeln!(f, "Duplicates ({}):", ledger.duplicates.len())?;
            for (name, count) in &ledger.duplicates {
                writeln!(f, "\t{name}: {count} additional occurrence(s)")?;
            }
        }

        writeln!(f, "Statistics:")?;
        writeln!(f, "\tSelected:\t\t{}", ledger.selected.len())?;
        writeln!(f, "\t===")?;
        writeln!(f, "\tNot read:\t\t{}", ledger.not_read.len())?;
        writeln!(f, "\t===")?;
        writeln!(f, "\tRead:\t\t\t{}", ledger.read.len())?;
        writeln!(f, "\t===")?;
        writeln!(f, "\tWithout errors:\t\t{}", ledger.read_without_errors.len())?;
        writeln!(f, "\t===")?;
        writeln!(f, "\tWith errors:\t\t{}", ledger.read_with_errors.len())?;

        writeln!(f, "{}", verdict(ledger))
    }
}

fn write_section(
    f: &mut fmt::Formatter<'_>,
    title: &str,
    paths: &BTreeSet<String>,
) -> fmt::Result {
    writeln!(f, "{title} ({}):", paths.len())?;
    for path in paths {
        writeln!(f, "\t{path}")?;
    }
    Ok(())
}

/// One-line summary distinguishing clean runs from runs with errors.
#[must_use]
pub fn verdict(ledger: &LedgerSnapshot) -> &'static str {
    if ledger.is_error_free() {
        "Processing finished without errors."
    } else {
        "Processing finished with errors."
    }
}

/// Renders the text report.
#[must_use]
pub fn render_text(ledger: &LedgerSnapshot) -> String {
    Report(ledger).to_string()
}

/// Renders the ledger as pretty-printed JSON.
///
/// # Errors
///
/// Returns [`serde_json::Error`] if serialization fails.
pub fn render_json(ledger: &LedgerSnapshot) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(ledger)
}

#[cfg(test)]
mod tests {
    use pdf_crawler_scan_models::ExtractionFailure;

    use super::*;

    fn ledger_with_errors() -> LedgerSnapshot {
        let mut ledger = LedgerSnapshot::default();
        for path in ["/in/a.pdf", "/in/b.pdf", "/in/c.pdf"] {
            ledger.selected.insert(path.to_owned());
        }
        ledger.read.insert("/in/a.pdf".to_owned());
        ledger.read_without_errors.insert("/in/a.pdf".to_owned());
        ledger.read.insert("/in/b.pdf".to_owned());
        ledger.read_with_errors.insert("/in/b.pdf".to_owned());
        ledger.not_read.insert("/in/c.pdf".to_owned());
        ledger.duplicates.insert("Max Mustermann".to_owned(), 2);
        ledger.failures.push(ExtractionFailure::DuplicateKey {
            path: "/in/b.pdf".to_owned(),
            name: "Max Mustermann".to_owned(),
            detail: String::new(),
        });
        ledger
    }

    #[test]
    fn clean_run_verdict() {
        let ledger = LedgerSnapshot::default();
        assert_eq!(verdict(&ledger), "Processing finished without errors.");
        assert!(render_text(&ledger).ends_with("Processing finished without errors.\n"));
    }

    #[test]
    fn report_lists_buckets_and_duplicates() {
        let text = render_text(&ledger_with_errors());

        assert!(text.contains("Found (3):\n\t/in/a.pdf\n\t/in/b.pdf\n\t/in/c.pdf\n"));
        assert!(text.contains("Ignored (1):\n\t/in/c.pdf\n"));
        assert!(text.contains("Erroneous (1):\n\t/in/b.pdf\n"));
        assert!(text.contains("Max Mustermann: 2 additional occurrence(s)"));
        assert!(text.contains("was found more than once. File:[/in/b.pdf]"));
        assert!(text.ends_with("Processing finished with errors.\n"));
    }

    #[test]
    fn json_report_contains_buckets() {
        let json = render_json(&ledger_with_errors()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["selected"].as_array().unwrap().len(), 3);
        assert_eq!(value["duplicates"]["Max Mustermann"], 2);
        assert_eq!(value["failures"][0]["kind"], "DUPLICATE_KEY");
    }
}
