#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Terminal plumbing for the `pdf_crawler` binary.
//!
//! [`IndicatifProgress`] renders the scan's per-file notifications as a
//! bar that names the most recently classified file. [`init_logger`] routes
//! the crawler's `log` output through the same [`MultiProgress`], so the
//! per-file `Name[..]:Date[..]` lines and failure messages print above the
//! bar instead of through it.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use log::LevelFilter;
use pdf_crawler_scan::progress::ProgressCallback;

pub use indicatif::MultiProgress;

/// Log level used when `RUST_LOG` is not set. The per-file record and
/// failure lines are logged at `info` and above.
pub const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Info;

/// File-count bar for one scan run.
pub struct IndicatifProgress {
    bar: ProgressBar,
    /// Applied by `set_total()`; until then the bar is a spinner.
    counting_style: ProgressStyle,
}

impl IndicatifProgress {
    /// Adds a scan bar to `multi`.
    ///
    /// Spins while inputs are being expanded and switches to a
    /// `done/total files` bar once the scanner knows how many distinct files
    /// it will classify.
    #[must_use]
    pub fn files_bar(multi: &MultiProgress, message: &str) -> Arc<dyn ProgressCallback> {
        Arc::new(Self::new(multi, message))
    }

    fn new(multi: &MultiProgress, message: &str) -> Self {
        let bar = multi.add(ProgressBar::new_spinner());
        bar.enable_steady_tick(Duration::from_millis(100));
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(message.to_string());

        let counting_style = ProgressStyle::with_template(
            "  {wide_bar:.cyan/dim} {pos}/{len} files [{eta}] {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("##-");

        Self {
            bar,
            counting_style,
        }
    }
}

impl ProgressCallback for IndicatifProgress {
    fn set_total(&self, files: u64) {
        self.bar.set_length(files);
        self.bar.set_position(0);
        self.bar.set_style(self.counting_style.clone());
    }

    fn file_done(&self, path: &Path) {
        self.bar.inc(1);
        if let Some(name) = path.file_name() {
            self.bar.set_message(name.to_string_lossy().into_owned());
        }
    }

    fn set_message(&self, msg: String) {
        self.bar.set_message(msg);
    }

    fn finish(&self, msg: String) {
        self.bar.finish_with_message(msg);
    }
}

/// Installs the crawler's logger and returns the [`MultiProgress`] that
/// scan bars are drawn on.
///
/// Filters come from `RUST_LOG` on top of [`DEFAULT_LOG_LEVEL`]. Calling it
/// a second time keeps the first logger.
#[must_use]
pub fn init_logger() -> MultiProgress {
    let multi = MultiProgress::new();

    let logger = pretty_env_logger::formatted_builder()
        .filter_level(DEFAULT_LOG_LEVEL)
        .parse_env("RUST_LOG")
        .build();
    let level = logger.filter();

    if indicatif_log_bridge::LogWrapper::new(multi.clone(), logger)
        .try_init()
        .is_ok()
    {
        log::set_max_level(level);
    }

    multi
}
