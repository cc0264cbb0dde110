#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Delimited-file output for accepted records.
//!
//! Writes a [`ResultSet`] as one `name<delimiter>date` row per record,
//! sorted by name, with an optional header row.

use std::path::{Path, PathBuf};

use pdf_crawler_scan_models::ResultSet;
use serde::{Deserialize, Serialize};

/// Errors that can occur while writing the output file.
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    /// Creating the directory or file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Writing a CSV record failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The configured delimiter is not a single-byte ASCII character.
    #[error("Delimiter must be an ASCII character, got {0:?}")]
    InvalidDelimiter(char),
}

/// Layout of the output file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvConfig {
    /// Name of the file created inside the output directory.
    pub file_name: String,
    /// Field delimiter.
    pub delimiter: char,
    /// Header of the name column.
    pub name_header: String,
    /// Header of the date column.
    pub date_header: String,
    /// Whether to write the header row.
    pub include_header: bool,
}

impl Default for CsvConfig {
    fn default() -> Self {
        Self {
            file_name: "pdf_crawler.csv".to_owned(),
            delimiter: ';',
            name_header: "Name".to_owned(),
            date_header: "Date".to_owned(),
            include_header: true,
        }
    }
}

impl CsvConfig {
    fn delimiter_byte(&self) -> Result<u8, OutputError> {
        u8::try_from(u32::from(self.delimiter))
            .ok()
            .filter(u8::is_ascii)
            .ok_or(OutputError::InvalidDelimiter(self.delimiter))
    }
}

/// Writes `results` into `output_dir`, creating the directory if needed.
///
/// Returns the path of the written file.
///
/// # Errors
///
/// Returns [`OutputError`] if the delimiter is invalid or the directory or
/// file cannot be written.
pub fn write_csv(
    results: &ResultSet,
    output_dir: &Path,
    config: &CsvConfig,
) -> Result<PathBuf, OutputError> {
    let delimiter = config.delimiter_byte()?;

    std::fs::create_dir_all(output_dir)?;
    let path = output_dir.join(&config.file_name);

    let writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .from_path(&path)?;
    write_records(writer, results, config)?;

    log::info!("Wrote {} record(s) to {}", results.len(), path.display());

    Ok(path)
}

/// Writes `results` to any [`std::io::Write`] sink.
///
/// # Errors
///
/// Returns [`OutputError`] if the delimiter is invalid or writing fails.
pub fn write_csv_to<W: std::io::Write>(
    sink: W,
    results: &ResultSet,
    config: &CsvConfig,
) -> Result<(), OutputError> {
    let writer = csv::WriterBuilder::new()
        .delimiter(config.delimiter_byte()?)
        .has_headers(false)
        .from_writer(sink);
    write_records(writer, results, config)
}

fn write_records<W: std::io::Write>(
    mut writer: csv::Writer<W>,
    results: &ResultSet,
    config: &CsvConfig,
) -> Result<(), OutputError> {
    if config.include_header {
        writer.write_record([&config.name_header, &config.date_header])?;
    }
    for (name, date) in results {
        writer.write_record([name, date])?;
    }
    writer.flush()?;
    Ok(())
}
