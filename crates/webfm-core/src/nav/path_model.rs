//! Current-directory model and breadcrumb trail.

use crate::fs::path::RemotePath;

/// Label of the breadcrumb segment that points at the storage root.
pub const ROOT_LABEL: &str = "home";

/// One clickable (or not) element of the breadcrumb trail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreadcrumbSegment {
    pub label: String,
    pub path: RemotePath,
    /// `false` only for the last segment, the current location.
    pub navigable: bool,
}

/// Owns the current directory path.
///
/// Navigation is a plain assignment; loading the directory is the
/// controller's job.
#[derive(Debug, Clone, Default)]
pub struct PathModel {
    current: RemotePath,
}

impl PathModel {
    /// Starts at the storage root.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> &RemotePath {
        &self.current
    }

    /// Sets the current path unconditionally.
    pub fn navigate_to(&mut self, path: RemotePath) {
        self.current = path;
    }

    /// Path of the parent directory. The root is its own parent.
    pub fn parent(&self) -> RemotePath {
        self.current.parent()
    }

    /// Breadcrumb trail, root first.
    ///
    /// For `a/b/c` this yields `home("")`, `a("a")`, `b("a/b")`,
    /// `c("a/b/c")`, with only `c` non-navigable.
    pub fn segments(&self) -> Vec<BreadcrumbSegment> {
        let mut trail = vec![BreadcrumbSegment {
            label: ROOT_LABEL.to_string(),
            path: RemotePath::root(),
            navigable: true,
        }];

        let mut prefix = RemotePath::root();
        for name in self.current.segments() {
            // Segments of a valid path are always valid child names.
            if let Ok(next) = prefix.join(name) {
                prefix = next;
            }
            trail.push(BreadcrumbSegment {
                label: name.to_string(),
                path: prefix.clone(),
                navigable: true,
            });
        }

        if let Some(last) = trail.last_mut() {
            last.navigable = false;
        }
        trail
    }
}
