//! `reqwest`-backed implementation of [`FileService`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

use super::wire::{
    BatchDeleteRequest, BatchResponse, BatchTransferRequest, CreateDirRequest, Envelope,
    ListResponse, UploadResponse,
};
use super::{BatchOutcome, FileService, ResourceKind, UploadFile};
use crate::config::settings::ServerConfig;
use crate::error::{CoreError, CoreResult};
use crate::fs::entry::{FileEntry, FileInfo};
use crate::fs::path::RemotePath;

/// Talks to the backend over JSON/HTTP.
///
/// Stateless apart from the connection pool held by the `reqwest::Client`.
/// The client itself only bounds connecting and each read, so uploads and
/// downloads may run as long as data keeps moving. JSON calls additionally
/// get `timeout_secs` as a limit on the whole request.
#[derive(Debug, Clone)]
pub struct HttpFileService {
    client: reqwest::Client,
    base: Url,
    request_timeout: Duration,
}

impl HttpFileService {
    /// Builds a service from the `[server]` configuration section.
    ///
    /// # Errors
    ///
    /// - [`CoreError::ConfigParse`] if `base_url` is not an absolute http(s) URL.
    /// - [`CoreError::Transport`] if the HTTP client cannot be constructed.
    pub fn new(config: &ServerConfig) -> CoreResult<Self> {
        let base = Url::parse(&config.base_url)
            .map_err(|e| CoreError::ConfigParse(format!("invalid base_url: {e}")))?;
        if base.cannot_be_a_base() || !matches!(base.scheme(), "http" | "https") {
            return Err(CoreError::ConfigParse(format!(
                "base_url must be an http(s) URL, got {}",
                config.base_url
            )));
        }

        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .connect_timeout(config.timeout())
            .read_timeout(config.timeout())
            .build()
            .map_err(|e| CoreError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base,
            request_timeout: config.timeout(),
        })
    }

    /// Returns the base URL every endpoint is resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Joins `route` and the segments of `path` onto the base URL.
    ///
    /// Each segment is percent-encoded individually, so names containing
    /// spaces, `#` or `?` survive the trip. The root path adds no segments,
    /// which yields the bare `/api/files` and `/api/upload` shapes.
    fn endpoint(&self, route: &[&str], path: &RemotePath) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(route).extend(path.segments());
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> CoreResult<T> {
        tracing::debug!(%url, "GET");
        let response = self
            .client
            .get(url)
            .timeout(self.request_timeout)
            .send()
            .await?;
        require_data(read_envelope(response).await?)
    }

    async fn post_json<B, T>(&self, route: &[&str], body: &B) -> CoreResult<Option<T>>
    where
        B: serde::Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(route, &RemotePath::root());
        tracing::debug!(%url, "POST");
        let response = self
            .client
            .post(url)
            .timeout(self.request_timeout)
            .json(body)
            .send()
            .await?;
        read_envelope(response).await
    }

    async fn get_raw(&self, url: Url) -> CoreResult<Vec<u8>> {
        tracing::debug!(%url, "GET raw");
        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        if status.is_success() {
            return Ok(body.to_vec());
        }
        Err(match serde_json::from_slice::<Envelope>(&body) {
            Ok(envelope) if envelope.code != 0 => envelope.into_error(|| status_failure(status)),
            _ => CoreError::Transport(status_failure(status)),
        })
    }
}

/// Reads a JSON envelope, mapping non-zero codes to [`CoreError::Backend`].
///
/// The envelope is consulted before the HTTP status because the backend
/// reports its errors with both a 4xx/5xx status and an envelope carrying
/// the human-readable message.
async fn read_envelope<T: DeserializeOwned>(response: Response) -> CoreResult<Option<T>> {
    let status = response.status();
    let body = response.bytes().await?;
    match serde_json::from_slice::<Envelope>(&body) {
        Ok(envelope) if envelope.code == 0 => envelope.into_data(),
        Ok(envelope) => Err(envelope.into_error(|| status_failure(status))),
        Err(_) if !status.is_success() => Err(CoreError::Transport(status_failure(status))),
        Err(e) => Err(CoreError::Transport(format!("malformed response: {e}"))),
    }
}

fn require_data<T>(data: Option<T>) -> CoreResult<T> {
    data.ok_or_else(|| CoreError::Transport("response is missing its payload".to_string()))
}

fn status_failure(status: StatusCode) -> String {
    format!("server responded with {status}")
}

fn upload_part(file: UploadFile) -> CoreResult<Part> {
    let mime = mime_guess::from_path(&file.name).first_or_octet_stream();
    Ok(Part::bytes(file.data)
        .file_name(file.name)
        .mime_str(mime.as_ref())?)
}

#[async_trait]
impl FileService for HttpFileService {
    async fn list(&self, dir: &RemotePath) -> CoreResult<Vec<FileEntry>> {
        let listing: ListResponse = self.get_json(self.endpoint(&["api", "files"], dir)).await?;
        Ok(listing.items)
    }

    async fn create_folder(&self, parent: &RemotePath, name: &str) -> CoreResult<()> {
        let body = CreateDirRequest {
            path: parent.as_str(),
            name,
        };
        self.post_json::<_, serde_json::Value>(&["api", "mkdir"], &body)
            .await?;
        Ok(())
    }

    async fn upload(&self, dir: &RemotePath, files: Vec<UploadFile>) -> CoreResult<Vec<String>> {
        let mut form = Form::new();
        for file in files {
            form = form.part("files", upload_part(file)?);
        }
        let url = self.endpoint(&["api", "upload"], dir);
        tracing::debug!(%url, "POST multipart");
        let response = self.client.post(url).multipart(form).send().await?;
        let uploaded: Option<UploadResponse> = read_envelope(response).await?;
        Ok(uploaded.unwrap_or_default().uploaded)
    }

    async fn preview(&self, path: &RemotePath) -> CoreResult<Vec<u8>> {
        self.get_raw(self.endpoint(&["api", "preview"], path)).await
    }

    async fn download(&self, path: &RemotePath) -> CoreResult<Vec<u8>> {
        self.get_raw(self.endpoint(&["api", "download"], path)).await
    }

    async fn info(&self, path: &RemotePath) -> CoreResult<FileInfo> {
        self.get_json(self.endpoint(&["api", "info"], path)).await
    }

    async fn batch_delete(&self, paths: &[RemotePath]) -> CoreResult<BatchOutcome> {
        let resp: Option<BatchResponse> = self
            .post_json(&["api", "batch-delete"], &BatchDeleteRequest { paths })
            .await?;
        Ok(require_data(resp)?.into())
    }

    async fn batch_copy(
        &self,
        paths: &[RemotePath],
        destination: &RemotePath,
    ) -> CoreResult<BatchOutcome> {
        let body = BatchTransferRequest { paths, destination };
        let resp: Option<BatchResponse> = self.post_json(&["api", "batch-copy"], &body).await?;
        Ok(require_data(resp)?.into())
    }

    async fn batch_move(
        &self,
        paths: &[RemotePath],
        destination: &RemotePath,
    ) -> CoreResult<BatchOutcome> {
        let body = BatchTransferRequest { paths, destination };
        let resp: Option<BatchResponse> = self.post_json(&["api", "batch-move"], &body).await?;
        Ok(require_data(resp)?.into())
    }

    fn resource_url(&self, kind: ResourceKind, path: &RemotePath) -> String {
        let route = match kind {
            ResourceKind::Preview => ["api", "preview"],
            ResourceKind::Download => ["api", "download"],
        };
        self.endpoint(&route, path).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(base: &str) -> HttpFileService {
        let config = ServerConfig {
            base_url: base.to_string(),
            ..ServerConfig::default()
        };
        HttpFileService::new(&config).unwrap()
    }

    fn path(s: &str) -> RemotePath {
        RemotePath::parse(s).unwrap()
    }

    #[test]
    fn root_listing_uses_bare_route() {
        let svc = service("http://localhost:8080");
        let url = svc.endpoint(&["api", "files"], &RemotePath::root());
        assert_eq!(url.as_str(), "http://localhost:8080/api/files");
    }

    #[test]
    fn nested_listing_appends_segments() {
        let svc = service("http://localhost:8080/");
        let url = svc.endpoint(&["api", "files"], &path("docs/2024"));
        assert_eq!(url.as_str(), "http://localhost:8080/api/files/docs/2024");
    }

    #[test]
    fn base_url_prefix_is_preserved() {
        let svc = service("https://example.com/storage/");
        let url = svc.endpoint(&["api", "upload"], &path("a"));
        assert_eq!(url.as_str(), "https://example.com/storage/api/upload/a");
    }

    #[test]
    fn segments_are_percent_encoded() {
        let svc = service("http://localhost:8080");
        let url = svc.resource_url(ResourceKind::Preview, &path("my docs/a#1.txt"));
        assert_eq!(url, "http://localhost:8080/api/preview/my%20docs/a%231.txt");
    }

    #[test]
    fn download_resource_url() {
        let svc = service("http://localhost:8080");
        let url = svc.resource_url(ResourceKind::Download, &path("v/clip.mp4"));
        assert_eq!(url, "http://localhost:8080/api/download/v/clip.mp4");
    }

    #[test]
    fn rejects_non_http_base() {
        let config = ServerConfig {
            base_url: "mailto:someone@example.com".to_string(),
            ..ServerConfig::default()
        };
        assert!(matches!(
            HttpFileService::new(&config),
            Err(CoreError::ConfigParse(_))
        ));
    }

    #[test]
    fn rejects_unparseable_base() {
        let config = ServerConfig {
            base_url: "not a url".to_string(),
            ..ServerConfig::default()
        };
        assert!(HttpFileService::new(&config).is_err());
    }

    #[test]
    fn upload_part_guesses_mime() {
        let part = upload_part(UploadFile::new("photo.png", vec![1, 2, 3]));
        assert!(part.is_ok());
    }
}
