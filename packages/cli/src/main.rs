#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the PDF crawler.
//!
//! Scans PDF files for a name/date record, writes the accepted records to a
//! delimited file and prints a report of every file's outcome. Without a
//! subcommand the crawler asks for its inputs interactively.
//!
//! Uses `indicatif-log-bridge` (via [`pdf_crawler_cli_utils::init_logger`])
//! to route `log` output through `indicatif::MultiProgress` so that log
//! lines and the progress bar never fight for the terminal.

mod config;
mod interactive;
mod pipeline;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use pdf_crawler_scan_models::LedgerSnapshot;

use crate::config::CrawlerConfig;
use crate::pipeline::RunOptions;

#[derive(Parser)]
#[command(name = "pdf_crawler", about = "Extract name and date records from PDF files")]
struct Cli {
    /// TOML configuration file (overrides `PDF_CRAWLER_CONFIG` env var)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan PDF files and directories and write the records to a CSV file
    Scan {
        /// PDF files or directories containing PDF files
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
        /// Directory that receives the CSV file
        #[arg(long, short)]
        output: PathBuf,
        /// Number of files processed in parallel
        #[arg(long)]
        concurrency: Option<usize>,
        /// Field delimiter of the CSV file (e.g., ",")
        #[arg(long)]
        delimiter: Option<char>,
        /// Print the report as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Print the effective configuration as TOML
    Config,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = pdf_crawler_cli_utils::init_logger();
    let cli = Cli::parse();

    let mut config = CrawlerConfig::load(cli.config.as_deref())?;

    let Some(command) = cli.command else {
        return interactive::run(&config, &multi).await;
    };

    match command {
        Commands::Scan {
            inputs,
            output,
            concurrency,
            delimiter,
            json,
        } => {
            if let Some(concurrency) = concurrency {
                config.scan = config.scan.with_concurrency(concurrency);
            }
            if let Some(delimiter) = delimiter {
                config.output.delimiter = delimiter;
            }

            let options = RunOptions {
                inputs,
                output_dir: output,
                json,
            };
            let outcome = pipeline::run(&config, &options, &multi).await?;

            for warning in run_warnings(&outcome.ledger) {
                log::warn!("{warning}");
            }
        }
        Commands::Config => {
            print!("{}", config.to_toml()?);
        }
    }

    Ok(())
}

/// End-of-run warnings: one for read errors, one for unreadable files.
fn run_warnings(ledger: &LedgerSnapshot) -> Vec<String> {
    let mut warnings = Vec::new();
    if !ledger.is_error_free() {
        warnings.push(format!(
            "{} file(s) were read with errors",
            ledger.read_with_errors.len()
        ));
    }
    if !ledger.not_read.is_empty() {
        warnings.push(format!("{} file(s) could not be read", ledger.not_read.len()));
    }
    warnings
}
