//! Emoji icon mapping for file entries.
//!
//! Maps file extensions to the glyph shown in front of an entry name.

use crate::fs::entry::{extension_of, FileEntry};

const FOLDER: &str = "📁";
const DEFAULT: &str = "📄";

/// Returns the icon for the given entry.
pub fn icon_for_entry(entry: &FileEntry) -> &'static str {
    if entry.is_dir() {
        return FOLDER;
    }
    icon_for_name(entry.name())
}

/// Returns the icon for a file name, based on its extension.
pub fn icon_for_name(name: &str) -> &'static str {
    extension_of(name)
        .map(|ext| icon_for_extension(&ext))
        .unwrap_or(DEFAULT)
}

fn icon_for_extension(ext: &str) -> &'static str {
    match ext {
        // Documents
        "pdf" => "📄",
        "doc" | "docx" | "md" => "📝",
        "xls" | "xlsx" => "📊",
        "ppt" | "pptx" => "🎯",
        "txt" => "📋",
        // Media
        "jpg" | "jpeg" | "png" | "gif" | "webp" => "🖼️",
        "mp4" | "webm" | "avi" | "mov" | "mkv" => "🎬",
        "mp3" | "wav" | "flac" | "m4a" => "🎵",
        // Archives
        "zip" | "rar" | "7z" | "tar" | "gz" => "📦",
        // Executables and config
        "exe" | "msi" | "app" | "dmg" => "⚙️",
        "json" | "xml" | "yaml" | "yml" | "cpp" | "c" => "⚙️",
        // Source
        "js" | "ts" => "🔧",
        "py" => "🐍",
        "java" => "☕",
        "html" => "🌐",
        "css" => "🎨",
        "php" => "🐘",
        "rb" => "💎",
        "go" => "🐹",
        "rs" => "🦀",
        "sh" | "bat" | "ps1" => "💻",
        _ => DEFAULT,
    }
}
