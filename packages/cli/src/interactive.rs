//! Interactive prompts for running a crawl without memorizing CLI flags.

use std::path::PathBuf;

use dialoguer::{Confirm, Input};
use pdf_crawler_cli_utils::MultiProgress;

use crate::config::CrawlerConfig;
use crate::pipeline::{self, RunOptions};

/// Prompts for input paths and an output directory, then runs the crawl.
///
/// # Errors
///
/// Returns an error if a prompt fails or the crawl itself fails.
pub async fn run(
    config: &CrawlerConfig,
    multi: &MultiProgress,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("PDF Crawler");
    println!();

    let inputs: String = Input::new()
        .with_prompt("Input files or directories (comma-separated)")
        .interact_text()?;
    let inputs = parse_path_list(&inputs);
    if inputs.is_empty() {
        println!("No input paths given.");
        return Ok(());
    }

    let output_dir: String = Input::new()
        .with_prompt("Output directory")
        .interact_text()?;
    let output_dir = output_dir.trim();
    if output_dir.is_empty() {
        println!("No output directory given.");
        return Ok(());
    }

    let json = Confirm::new()
        .with_prompt("Print the report as JSON?")
        .default(false)
        .interact()?;

    let options = RunOptions {
        inputs,
        output_dir: PathBuf::from(output_dir),
        json,
    };
    pipeline::run(config, &options, multi).await?;

    Ok(())
}

/// Splits a comma- or newline-separated list of paths, dropping blanks.
#[must_use]
pub fn parse_path_list(input: &str) -> Vec<PathBuf> {
    input
        .split([',', '\n'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .collect()
}
