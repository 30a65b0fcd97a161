//! Folder snapshot scanning and completeness grouping.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use anyhow::{Result, ensure};
use walkdir::WalkDir;

use crate::pattern::FileId;

/// Snapshot of one directory: entry names in sorted order.
///
/// Only direct children are listed; subdirectory contents are not walked.
pub fn list_entries(dir: &Path) -> Result<Vec<String>> {
    ensure!(dir.is_dir(), "Not a directory: {}", dir.display());
    let mut entries: Vec<String> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(Result::ok)
        .map(|entry| crate::os_str_to_string(entry.file_name()))
        .collect();
    entries.sort();
    Ok(entries)
}

/// Extract identifiers from a folder listing, deduplicated via set semantics.
///
/// Entries without an identifier are dropped.
#[must_use]
pub fn scan_folder(entries: &[String]) -> HashSet<FileId> {
    entries.iter().filter_map(|name| FileId::extract(name)).collect()
}

/// Identifiers whose file group holds fewer than `required_files` distinct names.
///
/// Entries are grouped by extracted identifier; a filename is never counted
/// twice within one group. Groups are reported in the order their identifier
/// first appeared in `entries`.
#[must_use]
pub fn check_completeness(entries: &[String], required_files: usize) -> Vec<FileId> {
    let mut order: Vec<FileId> = Vec::new();
    let mut groups: HashMap<FileId, HashSet<&str>> = HashMap::new();

    for name in entries {
        if let Some(id) = FileId::extract(name) {
            let group = groups.entry(id.clone()).or_default();
            if group.is_empty() {
                order.push(id);
            }
            group.insert(name.as_str());
        }
    }

    order
        .into_iter()
        .filter(|id| groups.get(id).is_some_and(|files| files.len() < required_files))
        .collect()
}
