//! Content-type-aware file previews.
//!
//! [`resolve`] maps a file name to a [`PreviewStrategy`] by extension alone.
//! [`PreviewResolver::load`] turns a strategy into displayable
//! [`PreviewContent`]: media and documents become direct URLs the frontend
//! embeds itself, text is fetched and HTML-escaped.

use std::sync::Arc;

use crate::error::CoreResult;
use crate::event::{Event, Observers, Severity};
use crate::fs::entry::extension_of;
use crate::fs::path::RemotePath;
use crate::remote::{FileService, ResourceKind};

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "bmp"];
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm", "ogg", "mov", "avi", "mkv"];
const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "ogg", "flac", "m4a", "aac"];
const TEXT_EXTENSIONS: &[&str] = &[
    "txt", "md", "json", "xml", "html", "css", "js", "py", "java", "cpp", "c", "h", "rs", "go",
    "rb", "php", "sh", "bat", "ps1", "ini", "pem", "crt", "key", "conf", "config", "log",
];

/// Message shown for files no strategy can display.
pub const PREVIEW_NOT_AVAILABLE: &str = "Preview not available for this file type";

/// How a file should be previewed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewStrategy {
    Image,
    /// Video with the MIME subtype (the lower-cased extension).
    Video(String),
    /// Audio with the MIME subtype (the lower-cased extension).
    Audio(String),
    Text,
    Pdf,
    Unsupported,
}

/// Picks a preview strategy from the extension of `name`.
///
/// A name without any `.` is looked up whole, so `config` or `LOG` preview
/// as text. Video is checked before audio, so `ogg` previews as video.
pub fn resolve(name: &str) -> PreviewStrategy {
    let ext = if name.contains('.') {
        extension_of(name)
    } else {
        Some(name.to_lowercase())
    };
    let Some(ext) = ext else {
        return PreviewStrategy::Unsupported;
    };
    let ext_str = ext.as_str();
    if IMAGE_EXTENSIONS.contains(&ext_str) {
        PreviewStrategy::Image
    } else if VIDEO_EXTENSIONS.contains(&ext_str) {
        PreviewStrategy::Video(ext)
    } else if AUDIO_EXTENSIONS.contains(&ext_str) {
        PreviewStrategy::Audio(ext)
    } else if TEXT_EXTENSIONS.contains(&ext_str) {
        PreviewStrategy::Text
    } else if ext_str == "pdf" {
        PreviewStrategy::Pdf
    } else {
        PreviewStrategy::Unsupported
    }
}

/// Text preview whose markup form is always escaped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextPreview {
    text: String,
}

impl TextPreview {
    /// Decodes raw bytes as UTF-8, replacing invalid sequences.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            text: String::from_utf8_lossy(bytes).into_owned(),
        }
    }

    /// The decoded text, unescaped. Only for non-markup frontends.
    pub fn plain(&self) -> &str {
        &self.text
    }

    /// The text with every HTML special character escaped.
    pub fn html(&self) -> String {
        escape_html(&self.text)
    }
}

/// Structured preview output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewContent {
    Image { url: String },
    Pdf { url: String },
    Video { url: String, mime: String },
    Audio { url: String, mime: String },
    Text(TextPreview),
    /// Fixed "not available" marker.
    Unavailable { message: String },
}

/// Escapes `& < > " '` so text can be embedded in markup verbatim.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            other => out.push(other),
        }
    }
    out
}

/// Loads preview content through a [`FileService`].
pub struct PreviewResolver {
    service: Arc<dyn FileService>,
    observers: Observers,
}

impl PreviewResolver {
    pub fn new(service: Arc<dyn FileService>, observers: Observers) -> Self {
        Self { service, observers }
    }

    /// Resolves the strategy from the path's file name, then loads.
    pub async fn preview(&self, path: &RemotePath) -> CoreResult<PreviewContent> {
        let strategy = resolve(path.file_name().unwrap_or_default());
        self.load(path, &strategy).await
    }

    /// Produces preview content for `path` using `strategy`.
    ///
    /// Only [`PreviewStrategy::Text`] performs a request. A failed fetch
    /// raises an error notification and returns the error.
    pub async fn load(
        &self,
        path: &RemotePath,
        strategy: &PreviewStrategy,
    ) -> CoreResult<PreviewContent> {
        let content = match strategy {
            PreviewStrategy::Image => PreviewContent::Image {
                url: self.service.resource_url(ResourceKind::Preview, path),
            },
            PreviewStrategy::Pdf => PreviewContent::Pdf {
                url: self.service.resource_url(ResourceKind::Preview, path),
            },
            PreviewStrategy::Video(subtype) => PreviewContent::Video {
                url: self.service.resource_url(ResourceKind::Download, path),
                mime: format!("video/{subtype}"),
            },
            PreviewStrategy::Audio(subtype) => PreviewContent::Audio {
                url: self.service.resource_url(ResourceKind::Download, path),
                mime: format!("audio/{subtype}"),
            },
            PreviewStrategy::Text => match self.service.preview(path).await {
                Ok(bytes) => PreviewContent::Text(TextPreview::from_bytes(&bytes)),
                Err(e) => {
                    self.observers
                        .notify(format!("Preview failed: {e}"), Severity::Error);
                    return Err(e);
                }
            },
            PreviewStrategy::Unsupported => PreviewContent::Unavailable {
                message: PREVIEW_NOT_AVAILABLE.to_string(),
            },
        };

        tracing::debug!(path = %path, ?strategy, "preview resolved");
        self.observers.emit(Event::PreviewLoaded {
            path: path.clone(),
            content: content.clone(),
        });
        Ok(content)
    }
}
