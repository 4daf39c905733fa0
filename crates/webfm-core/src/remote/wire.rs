//! JSON bodies exchanged with the backend.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::fs::entry::FileEntry;
use crate::fs::path::RemotePath;
use crate::remote::{BatchFailure, BatchOutcome};

/// Response envelope shared by every JSON endpoint. `code == 0` is success.
#[derive(Debug, Deserialize)]
pub struct Envelope {
    pub code: i32,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

impl Envelope {
    /// Converts a failed envelope into [`CoreError::Backend`], using
    /// `fallback` when the backend did not supply a message.
    pub fn into_error(self, fallback: impl FnOnce() -> String) -> CoreError {
        let message = self
            .message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(fallback);
        CoreError::Backend {
            code: self.code,
            message,
        }
    }

    /// Decodes the payload of a successful envelope. A missing or `null`
    /// payload is reported as `None`.
    pub fn into_data<T: serde::de::DeserializeOwned>(self) -> CoreResult<Option<T>> {
        match self.data {
            None | Some(serde_json::Value::Null) => Ok(None),
            Some(value) => serde_json::from_value(value)
                .map(Some)
                .map_err(|e| CoreError::Transport(format!("malformed response payload: {e}"))),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListResponse {
    pub items: Vec<FileEntry>,
    #[serde(default)]
    pub total: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct CreateDirRequest<'a> {
    pub path: &'a str,
    pub name: &'a str,
}

#[derive(Debug, Default, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub uploaded: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct BatchDeleteRequest<'a> {
    pub paths: &'a [RemotePath],
}

#[derive(Debug, Serialize)]
pub struct BatchTransferRequest<'a> {
    pub paths: &'a [RemotePath],
    pub destination: &'a RemotePath,
}

/// Payload of the three batch endpoints. The succeeded list lives under
/// `deleted`, `copied` or `moved` depending on the endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct BatchResponse {
    #[serde(default, alias = "deleted", alias = "copied", alias = "moved")]
    pub succeeded: Vec<RemotePath>,
    #[serde(default)]
    pub failed: Vec<(String, String)>,
}

impl From<BatchResponse> for BatchOutcome {
    fn from(resp: BatchResponse) -> Self {
        Self {
            succeeded: resp.succeeded,
            failed: resp
                .failed
                .into_iter()
                .map(|(path, reason)| BatchFailure { path, reason })
                .collect(),
        }
    }
}
