//! Remote file-system abstractions for webfm.
//!
//! This module provides the path type ([`path::RemotePath`]), listing
//! entries ([`entry::FileEntry`]), display icons, and content-type-aware
//! previews ([`preview::PreviewResolver`]).

pub mod entry;
pub mod icons;
pub mod path;
pub mod preview;

pub use preview::{PreviewContent, PreviewResolver, PreviewStrategy, TextPreview};
