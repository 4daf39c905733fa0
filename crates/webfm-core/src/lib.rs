//! webfm core library — UI-agnostic remote file manager logic.
//!
//! `webfm-core` keeps the displayed folder contents, the current path and
//! the multi-select set consistent across asynchronous, possibly-failing
//! requests to a JSON/HTTP storage backend. It is intentionally decoupled
//! from any UI: the bundled shell (`webfm-cli`) is one frontend, and any
//! other can drive the same [`AppState`] through [`Command`]s and observe
//! it through [`Event`]s.
//!
//! # Modules
//!
//! - [`fs`] — Remote paths, listing entries, icons and previews.
//! - [`nav`] — Current path and breadcrumb, selection, name filtering.
//! - [`remote`] — The [`FileService`] seam and its HTTP implementation.
//! - [`controller`] — Directory and batch-operation workflows.
//! - [`view`] — Render-ready rows and size formatting.
//! - [`state`] — [`AppState`], the single owner of the controllers.
//! - [`config`] — TOML-based settings.
//! - [`event`] — Command, event and notification types for UI ↔ Core communication.
//! - [`error`] — Unified error type ([`CoreError`]) and result alias ([`CoreResult`]).

pub mod config;
pub mod controller;
pub mod error;
pub mod event;
pub mod fs;
pub mod nav;
pub mod remote;
pub mod state;
pub mod view;

#[cfg(test)]
pub(crate) mod testing;

pub use config::settings::Config;
pub use controller::{
    BatchOperationController, BatchReport, ConfirmGate, DestinationChoice, DirectoryController,
    LoadOutcome, OperationKind, TransferAction,
};
pub use error::{CoreError, CoreResult};
pub use event::{Command, Event, NotificationSink, Observers, Severity, ViewObserver};
pub use fs::entry::{FileEntry, FileInfo};
pub use fs::path::RemotePath;
pub use fs::preview::{PreviewContent, PreviewResolver, PreviewStrategy};
pub use nav::path_model::{BreadcrumbSegment, PathModel};
pub use nav::selection::{SelectionModel, ToolbarState};
pub use remote::{BatchOutcome, FileService, HttpFileService, ResourceKind, UploadFile};
pub use state::AppState;
pub use view::{format_size, EntryRow, PrimaryAction};

/// Re-composes a name into NFC.
///
/// Backends hosted on macOS report names the way the file system stores
/// them, decomposed, and local file names picked for upload can be in
/// either form. Display names and upload names go through here so that
/// matching by name works regardless of the host.
pub fn nfc_string(s: &str) -> String {
    use unicode_normalization::UnicodeNormalization;
    s.nfc().collect()
}
