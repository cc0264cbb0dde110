//! Expands user-supplied input paths into the flat list of files to scan.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Expands `inputs` into candidate files.
///
/// A directory contributes its immediate file entries, sorted; nested
/// directories are not descended into. Anything else, including a path
/// that does not exist, is passed through unchanged so the scan can
/// classify it as unreadable. Every returned path is absolute and appears
/// once, in first-seen order.
#[must_use]
pub fn collect_input_files(inputs: &[PathBuf]) -> Vec<PathBuf> {
    let mut seen = BTreeSet::new();
    let mut files = Vec::new();

    for input in inputs {
        let input = to_absolute(input);

        let expanded = if input.is_dir() {
            list_directory(&input)
        } else {
            vec![input]
        };

        for file in expanded {
            if seen.insert(file.clone()) {
                files.push(file);
            }
        }
    }

    log::debug!("Collected {} input file(s) from {} path(s)", files.len(), inputs.len());

    files
}

/// Makes `path` absolute against the current directory without touching
/// the filesystem. Falls back to the path as given.
#[must_use]
pub fn to_absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

fn list_directory(dir: &Path) -> Vec<PathBuf> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            log::warn!("Could not list directory {}: {e}", dir.display());
            return Vec::new();
        }
    };

    let mut files: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();
    files.sort();
    files
}
