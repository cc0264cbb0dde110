//! Discover -> scan -> write -> report flow shared by the subcommand and
//! the interactive mode.
//!
//! The scan runs to completion (every worker joined) before the result set
//! is handed to the CSV writer. The report is printed even when writing the
//! CSV fails.

use std::path::PathBuf;

use pdf_crawler_cli_utils::{IndicatifProgress, MultiProgress};
use pdf_crawler_pdf::PdfTextExtractor;
use pdf_crawler_scan::report::{self, Report};
use pdf_crawler_scan::{ScanOutcome, Scanner, discover};

use crate::config::CrawlerConfig;

/// What to scan and where to put the result.
pub struct RunOptions {
    /// Files and directories chosen by the user.
    pub inputs: Vec<PathBuf>,
    /// Directory that receives the CSV file.
    pub output_dir: PathBuf,
    /// Print the report as JSON instead of text.
    pub json: bool,
}

/// Runs one complete crawl and prints its report.
///
/// # Errors
///
/// Returns an error if the scan configuration is invalid, the CSV file
/// cannot be written, or the JSON report cannot be rendered. Per-file
/// failures are not errors; they are part of the report.
pub async fn run(
    config: &CrawlerConfig,
    options: &RunOptions,
    multi: &MultiProgress,
) -> Result<ScanOutcome, Box<dyn std::error::Error>> {
    log::info!("Paths selected for processing:");
    for input in &options.inputs {
        log::info!("\t{}", input.display());
    }

    let files = discover::collect_input_files(&options.inputs);

    let progress = IndicatifProgress::files_bar(multi, "Scanning PDFs");
    let scanner =
        Scanner::new(PdfTextExtractor::new(), config.scan.clone()).with_progress(progress);
    let outcome = scanner.scan(&files).await?;

    let written =
        pdf_crawler_output::write_csv(&outcome.results, &options.output_dir, &config.output);
    match &written {
        Ok(path) => println!(
            "Wrote {} record(s) to {}",
            outcome.results.len(),
            path.display()
        ),
        Err(e) => log::error!(
            "Failed to write CSV to {}: {e}",
            options.output_dir.display()
        ),
    }

    if options.json {
        println!("{}", report::render_json(&outcome.ledger)?);
    } else {
        print!("{}", Report(&outcome.ledger));
    }

    written?;

    Ok(outcome)
}
