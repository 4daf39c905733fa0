//! Render-ready projections of the listing.
//!
//! Frontends draw [`EntryRow`]s instead of reaching into [`FileEntry`]
//! themselves, so icon choice and size formatting stay consistent across
//! them.

use crate::fs::entry::FileEntry;
use crate::fs::icons::icon_for_entry;
use crate::fs::path::RemotePath;

const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

/// What activating a row does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimaryAction {
    /// Navigate into the directory.
    Enter,
    /// Open the file preview.
    Preview,
}

/// One listing row as it should be displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryRow {
    pub name: String,
    pub path: RemotePath,
    pub icon: &'static str,
    /// Human-readable size; `"-"` for directories.
    pub size_label: String,
    pub modified: String,
    pub is_dir: bool,
    pub selected: bool,
    pub action: PrimaryAction,
}

impl EntryRow {
    pub fn from_entry(entry: &FileEntry, selected: bool) -> Self {
        let (size_label, action) = if entry.is_dir() {
            ("-".to_string(), PrimaryAction::Enter)
        } else {
            (format_size(entry.size()), PrimaryAction::Preview)
        };
        Self {
            name: entry.name().to_string(),
            path: entry.path().clone(),
            icon: icon_for_entry(entry),
            size_label,
            modified: entry.modified().to_string(),
            is_dir: entry.is_dir(),
            selected,
            action,
        }
    }
}

/// Formats a byte count with 1024-based units up to GB.
///
/// The value is rounded to two decimals and printed without trailing
/// zeros: `1024` is `"1 KB"`, `1536` is `"1.5 KB"`.
pub fn format_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    let rounded = (value * 100.0).round() / 100.0;
    format!("{rounded} {}", UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_size_zero() {
        assert_eq!(format_size(0), "0 B");
    }

    #[test]
    fn format_size_bytes() {
        assert_eq!(format_size(1), "1 B");
        assert_eq!(format_size(1023), "1023 B");
    }

    #[test]
    fn format_size_kilobytes() {
        assert_eq!(format_size(1024), "1 KB");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(1100), "1.07 KB");
    }

    #[test]
    fn format_size_larger_units() {
        assert_eq!(format_size(1024 * 1024), "1 MB");
        assert_eq!(format_size(5 * 1024 * 1024 * 1024), "5 GB");
    }

    #[test]
    fn format_size_clamps_to_gb() {
        assert_eq!(format_size(2048 * 1024 * 1024 * 1024), "2048 GB");
    }

    #[test]
    fn row_for_file() {
        let entry = FileEntry::new(
            "a.txt",
            RemotePath::parse("docs/a.txt").unwrap(),
            false,
            1024,
            "2024-01-01 10:00:00",
        );
        let row = EntryRow::from_entry(&entry, true);
        assert_eq!(row.name, "a.txt");
        assert_eq!(row.size_label, "1 KB");
        assert_eq!(row.icon, "📋");
        assert_eq!(row.action, PrimaryAction::Preview);
        assert!(row.selected);
    }

    #[test]
    fn row_for_directory() {
        let entry = FileEntry::new("docs", RemotePath::parse("docs").unwrap(), true, 0, "");
        let row = EntryRow::from_entry(&entry, false);
        assert_eq!(row.size_label, "-");
        assert_eq!(row.icon, "📁");
        assert_eq!(row.action, PrimaryAction::Enter);
    }
}
