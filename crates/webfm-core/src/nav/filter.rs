//! Filtering for file entries.

use crate::fs::entry::FileEntry;

/// Returns the entries whose name contains `query`, ignoring case.
///
/// An empty (or whitespace-only) query matches everything. Returns a
/// **new** `Vec<FileEntry>`; the input slice is never mutated.
pub fn filter_by_name(entries: &[FileEntry], query: &str) -> Vec<FileEntry> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return entries.to_vec();
    }
    entries
        .iter()
        .filter(|e| e.name().to_lowercase().contains(&needle))
        .cloned()
        .collect()
}
