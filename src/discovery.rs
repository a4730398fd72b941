//! Route file discovery.
//!
//! Walks the pages directory and yields every candidate route file with a
//! path relative to that directory. Entries are visited in file-name order
//! so repeated scans of an unchanged tree yield the same sequence.

use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use crate::classify::{has_route_module_extension, is_excluded_name};
use crate::route_id::win_path;

/// A discovered candidate route file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteFile {
    /// Path relative to the scan root, always `/`-separated.
    pub relative: String,
    pub absolute: PathBuf,
}

/// Lazily enumerates candidate route files under `root`.
///
/// A missing root yields nothing. Unreadable entries are skipped.
pub fn scan_route_files(root: &Path) -> impl Iterator<Item = RouteFile> + '_ {
    WalkDir::new(root)
        .min_depth(1)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !is_excluded_entry(entry))
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::debug!("skipping unreadable entry: {e}");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .filter_map(move |entry| to_route_file(root, entry))
}

fn is_excluded_entry(entry: &DirEntry) -> bool {
    let name = entry.file_name().to_string_lossy();
    is_excluded_name(&name, entry.file_type().is_dir())
}

fn to_route_file(root: &Path, entry: DirEntry) -> Option<RouteFile> {
    let relative = entry.path().strip_prefix(root).ok()?;
    let relative = win_path(&relative.to_string_lossy());
    if !has_route_module_extension(&relative) {
        return None;
    }
    Some(RouteFile {
        relative,
        absolute: entry.into_path(),
    })
}
