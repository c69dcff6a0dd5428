//! # File Discovery
//!
//! Locates schema files (flat, one directory) and example files (recursive).
//! Hidden entries, whose names start with `.`, are never returned or descended
//! into. Symlinked directories are not followed. Results are sorted so that
//! index construction and reporting are deterministic.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// List schema files directly inside `dir` whose extension is in `extensions`.
///
/// # Errors
///
/// Returns the IO error if `dir` cannot be listed. Unreadable individual
/// entries are logged and skipped.
pub fn find_schema_files(dir: &Path, extensions: &[String]) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                tracing::warn!(dir = %dir.display(), error = %e, "failed to read directory entry");
                continue;
            }
        };
        let path = entry.path();
        if !is_hidden(&path) && path.is_file() && has_extension(&path, extensions) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Recursively list example files under `dir` whose extension is in `extensions`.
///
/// Directories that cannot be read are logged and skipped; a missing `dir`
/// yields an empty list.
pub fn find_example_files(dir: &Path, extensions: &[String]) -> Vec<PathBuf> {
    let mut found = BTreeSet::new();
    walk_for_files(dir, extensions, &mut found);
    found.into_iter().collect()
}

fn walk_for_files(dir: &Path, extensions: &[String], acc: &mut BTreeSet<PathBuf>) {
    let entries = match std::fs::read_dir(dir) {
        Ok(e) => e,
        Err(e) => {
            tracing::warn!(
                dir = %dir.display(),
                error = %e,
                "failed to read directory during file walk"
            );
            return;
        }
    };
    for entry in entries {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                tracing::warn!(dir = %dir.display(), error = %e, "failed to read directory entry");
                continue;
            }
        };
        let path = entry.path();
        if is_hidden(&path) {
            continue;
        }
        let is_real_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
        if is_real_dir {
            walk_for_files(&path, extensions, acc);
        } else if path.is_file() && has_extension(&path, extensions) {
            acc.insert(path);
        }
    }
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('.'))
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return false;
    };
    extensions
        .iter()
        .any(|wanted| wanted.trim_start_matches('.') == ext)
}
