//! File entry representation.

use serde::{Deserialize, Deserializer, Serialize};
use unicode_normalization::UnicodeNormalization;

use crate::fs::path::RemotePath;

/// A single file or directory entry from one directory listing.
///
/// `FileEntry` is immutable and is only ever produced by a listing. A fresh
/// listing replaces the previous one wholesale; entries are never patched
/// on the client. Directory sizes are reported as `0`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    #[serde(deserialize_with = "nfc_name")]
    name: String,
    path: RemotePath,
    is_dir: bool,
    #[serde(default)]
    size: u64,
    #[serde(default)]
    modified: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    created: Option<String>,
}

impl FileEntry {
    /// Creates an entry. Directory sizes are forced to `0`.
    pub fn new(
        name: impl Into<String>,
        path: RemotePath,
        is_dir: bool,
        size: u64,
        modified: impl Into<String>,
    ) -> Self {
        Self {
            name: crate::nfc_string(&name.into()),
            path,
            is_dir,
            size: if is_dir { 0 } else { size },
            modified: modified.into(),
            created: None,
        }
    }

    /// Display name (NFC-normalised).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Path of the entry relative to the storage root.
    pub fn path(&self) -> &RemotePath {
        &self.path
    }

    pub fn is_dir(&self) -> bool {
        self.is_dir
    }

    /// Size in bytes. Meaningless for directories.
    pub fn size(&self) -> u64 {
        if self.is_dir {
            0
        } else {
            self.size
        }
    }

    /// Last-modified timestamp exactly as the backend formatted it.
    pub fn modified(&self) -> &str {
        &self.modified
    }

    pub fn created(&self) -> Option<&str> {
        self.created.as_deref()
    }

    /// Lower-cased extension (text after the last `.`), if any.
    pub fn extension(&self) -> Option<String> {
        extension_of(&self.name)
    }
}

/// Detailed metadata returned by the info endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInfo {
    #[serde(deserialize_with = "nfc_name")]
    pub name: String,
    pub path: RemotePath,
    pub is_dir: bool,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub modified: String,
    #[serde(default)]
    pub created: String,
    #[serde(default)]
    pub mime_type: Option<String>,
}

/// Returns the lower-cased substring after the last `.` in `name`.
///
/// Names without a dot have no extension. A leading-dot name such as
/// `.bashrc` yields `"bashrc"`, which keeps lookups consistent with how the
/// backend and browsers treat such names.
pub fn extension_of(name: &str) -> Option<String> {
    let (_, ext) = name.rsplit_once('.')?;
    if ext.is_empty() {
        None
    } else {
        Some(ext.to_lowercase())
    }
}

fn nfc_name<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(raw.nfc().collect())
}
