//! Remote storage backend access.
//!
//! [`FileService`] is the only seam through which the rest of the crate
//! talks to the backend. [`http::HttpFileService`] implements it over
//! JSON/HTTP with `reqwest`; tests substitute an in-memory fake.
//! Every call either succeeds once or fails once: there are no retries at
//! this layer.

pub mod http;
pub mod wire;

use std::fmt;

use async_trait::async_trait;

use crate::error::CoreResult;
use crate::fs::entry::{FileEntry, FileInfo};
use crate::fs::path::RemotePath;

pub use http::HttpFileService;

/// A file to be uploaded, held in memory.
#[derive(Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub name: String,
    pub data: Vec<u8>,
}

// Contents are left out so command logging stays readable.
impl fmt::Debug for UploadFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadFile")
            .field("name", &self.name)
            .field("len", &self.data.len())
            .finish()
    }
}

impl UploadFile {
    pub fn new(name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }
}

/// Which direct-resource endpoint a URL should point at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    /// `/api/preview/{path}`, served inline.
    Preview,
    /// `/api/download/{path}`, served as an attachment with range support.
    Download,
}

/// One item the backend could not process in a batch request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchFailure {
    pub path: String,
    pub reason: String,
}

/// Result of a batch request that the backend accepted.
///
/// `succeeded` may be shorter than the request: the backend recovers
/// per item and reports the rest in `failed`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    pub succeeded: Vec<RemotePath>,
    pub failed: Vec<BatchFailure>,
}

/// Typed async access to the storage backend.
#[async_trait]
pub trait FileService: Send + Sync {
    /// Lists the immediate children of `dir`.
    async fn list(&self, dir: &RemotePath) -> CoreResult<Vec<FileEntry>>;

    /// Creates folder `name` inside `parent`.
    async fn create_folder(&self, parent: &RemotePath, name: &str) -> CoreResult<()>;

    /// Uploads all `files` into `dir` in a single multipart request.
    /// Returns the names the backend reports as stored.
    async fn upload(&self, dir: &RemotePath, files: Vec<UploadFile>) -> CoreResult<Vec<String>>;

    /// Fetches the raw preview bytes of a file.
    async fn preview(&self, path: &RemotePath) -> CoreResult<Vec<u8>>;

    /// Fetches the full contents of a file.
    async fn download(&self, path: &RemotePath) -> CoreResult<Vec<u8>>;

    /// Fetches detailed metadata for one item.
    async fn info(&self, path: &RemotePath) -> CoreResult<FileInfo>;

    async fn batch_delete(&self, paths: &[RemotePath]) -> CoreResult<BatchOutcome>;

    async fn batch_copy(
        &self,
        paths: &[RemotePath],
        destination: &RemotePath,
    ) -> CoreResult<BatchOutcome>;

    async fn batch_move(
        &self,
        paths: &[RemotePath],
        destination: &RemotePath,
    ) -> CoreResult<BatchOutcome>;

    /// Direct URL of a resource, for frontends that embed media themselves.
    fn resource_url(&self, kind: ResourceKind, path: &RemotePath) -> String;
}
