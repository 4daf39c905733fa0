//! Remote storage paths.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// A `/`-separated location relative to the storage root.
///
/// The empty string is the root. A `RemotePath` never has a leading or
/// trailing `/`, never contains empty segments, and never contains `.` or
/// `..` segments. The only way to obtain one is through [`RemotePath::parse`]
/// (or the serde impls, which delegate to it), so every value in the crate
/// upholds the invariant.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RemotePath(String);

impl RemotePath {
    /// The storage root (`""`).
    pub fn root() -> Self {
        Self(String::new())
    }

    /// Parses a path, normalising redundant separators.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidPath`] when any segment is `.` or `..`.
    pub fn parse(raw: &str) -> CoreResult<Self> {
        let mut segments = Vec::new();
        for segment in raw.split('/') {
            match segment {
                "" => continue,
                "." | ".." => return Err(CoreError::InvalidPath(raw.to_string())),
                s => segments.push(s),
            }
        }
        Ok(Self(segments.join("/")))
    }

    /// Returns `true` for the storage root.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the path as it is sent to the backend.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Iterates over the path's segments (empty for the root).
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|s| !s.is_empty())
    }

    /// Returns the last segment, or `None` for the root.
    pub fn file_name(&self) -> Option<&str> {
        self.segments().last()
    }

    /// Returns the parent path. The root is its own parent.
    pub fn parent(&self) -> Self {
        match self.0.rfind('/') {
            Some(idx) => Self(self.0[..idx].to_string()),
            None => Self::root(),
        }
    }

    /// Appends a single child name.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidPath`] if `name` is empty, contains `/`,
    /// or is `.`/`..`.
    pub fn join(&self, name: &str) -> CoreResult<Self> {
        if name.is_empty() || name.contains('/') || name == "." || name == ".." {
            return Err(CoreError::InvalidPath(name.to_string()));
        }
        if self.is_root() {
            Ok(Self(name.to_string()))
        } else {
            Ok(Self(format!("{}/{}", self.0, name)))
        }
    }

    /// Returns `true` if `self` equals `ancestor` or lies beneath it.
    pub fn starts_with(&self, ancestor: &RemotePath) -> bool {
        if ancestor.is_root() || self.0 == ancestor.0 {
            return true;
        }
        self.0
            .strip_prefix(ancestor.as_str())
            .is_some_and(|rest| rest.starts_with('/'))
    }

    /// Number of segments (0 for the root).
    pub fn depth(&self) -> usize {
        self.segments().count()
    }
}

impl fmt::Display for RemotePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            f.write_str("/")
        } else {
            f.write_str(&self.0)
        }
    }
}

impl TryFrom<String> for RemotePath {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<RemotePath> for String {
    fn from(path: RemotePath) -> Self {
        path.0
    }
}

impl std::str::FromStr for RemotePath {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
