//! Loading, entering and mutating the current directory.

use std::sync::Arc;

use crate::controller::busy::BusyState;
use crate::error::{CoreError, CoreResult};
use crate::event::{Event, Observers, Severity};
use crate::fs::entry::{FileEntry, FileInfo};
use crate::fs::path::RemotePath;
use crate::nav::filter::filter_by_name;
use crate::nav::path_model::{BreadcrumbSegment, PathModel};
use crate::nav::selection::SelectionModel;
use crate::remote::{FileService, ResourceKind, UploadFile};
use crate::view::EntryRow;

/// Identifies one listing request.
///
/// Only the ticket from the most recent [`DirectoryController::begin_load`]
/// may apply its result; older ones are discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    token: u64,
    path: RemotePath,
}

impl LoadTicket {
    pub fn path(&self) -> &RemotePath {
        &self.path
    }
}

/// What happened to a finished listing request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied,
    /// A newer request was issued meanwhile; the result was dropped.
    Discarded,
}

/// Owns the current path, the current listing and the selection.
pub struct DirectoryController {
    service: Arc<dyn FileService>,
    observers: Observers,
    busy: BusyState,
    path: PathModel,
    selection: SelectionModel,
    entries: Vec<FileEntry>,
    latest_token: u64,
}

impl DirectoryController {
    pub fn new(service: Arc<dyn FileService>, observers: Observers, busy: BusyState) -> Self {
        Self {
            service,
            selection: SelectionModel::new(observers.clone()),
            observers,
            busy,
            path: PathModel::new(),
            entries: Vec::new(),
            latest_token: 0,
        }
    }

    pub fn current(&self) -> &RemotePath {
        self.path.current()
    }

    /// Entries of the most recently applied listing.
    pub fn entries(&self) -> &[FileEntry] {
        &self.entries
    }

    pub fn breadcrumb(&self) -> Vec<BreadcrumbSegment> {
        self.path.segments()
    }

    pub fn selection(&self) -> &SelectionModel {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut SelectionModel {
        &mut self.selection
    }

    pub fn service(&self) -> &Arc<dyn FileService> {
        &self.service
    }

    pub fn observers(&self) -> &Observers {
        &self.observers
    }

    pub fn busy(&self) -> &BusyState {
        &self.busy
    }

    /// Finds a listed entry by its display name.
    pub fn find(&self, name: &str) -> Option<&FileEntry> {
        self.entries.iter().find(|e| e.name() == name)
    }

    /// Stamps a new listing request for `path`, superseding any earlier one.
    pub fn begin_load(&mut self, path: RemotePath) -> LoadTicket {
        self.latest_token += 1;
        LoadTicket {
            token: self.latest_token,
            path,
        }
    }

    /// Applies the result of a listing request.
    ///
    /// A stale ticket is discarded whatever its result. On failure nothing
    /// changes and an error notification is raised. On success the path,
    /// listing, selection scope and breadcrumb are replaced together.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: CoreResult<Vec<FileEntry>>,
    ) -> CoreResult<LoadOutcome> {
        if ticket.token != self.latest_token {
            tracing::debug!(
                path = %ticket.path,
                token = ticket.token,
                latest = self.latest_token,
                "discarding stale listing"
            );
            return Ok(LoadOutcome::Discarded);
        }

        let entries = match result {
            Ok(entries) => entries,
            Err(e) => {
                self.observers
                    .notify(format!("Failed to load files: {e}"), Severity::Error);
                return Err(e);
            }
        };

        tracing::debug!(path = %ticket.path, count = entries.len(), "listing applied");
        self.path.navigate_to(ticket.path.clone());
        self.entries = entries;
        self.selection
            .rescope(self.entries.iter().map(|e| e.path().clone()).collect());
        self.observers
            .emit(Event::BreadcrumbChanged(self.path.segments()));
        self.observers.emit(Event::ListingChanged {
            path: ticket.path,
            entries: self.entries.clone(),
        });
        Ok(LoadOutcome::Applied)
    }

    /// Fetches and applies the listing of `path`.
    pub async fn load(&mut self, path: RemotePath) -> CoreResult<LoadOutcome> {
        let _busy = self.busy.enter();
        let ticket = self.begin_load(path);
        let result = self.service.list(ticket.path()).await;
        self.finish_load(ticket, result)
    }

    /// Navigates into `path`. The displayed path only changes once the
    /// listing has been applied.
    pub async fn enter(&mut self, path: RemotePath) -> CoreResult<LoadOutcome> {
        tracing::debug!(from = %self.current(), to = %path, "enter");
        self.load(path).await
    }

    /// Reloads the current directory.
    pub async fn refresh(&mut self) -> CoreResult<LoadOutcome> {
        let current = self.current().clone();
        self.load(current).await
    }

    /// Enters the parent directory. A no-op at the root.
    pub async fn go_up(&mut self) -> CoreResult<LoadOutcome> {
        if self.current().is_root() {
            return Ok(LoadOutcome::Applied);
        }
        let parent = self.path.parent();
        self.enter(parent).await
    }

    /// Creates folder `name` in the current directory, then reloads.
    ///
    /// # Errors
    ///
    /// [`CoreError::Validation`] without a request when the name is blank
    /// or contains `/`; otherwise whatever the backend reports.
    pub async fn create_folder(&mut self, name: &str) -> CoreResult<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(self.reject("Please enter a folder name"));
        }
        if name.contains('/') || name == "." || name == ".." {
            return Err(self.reject("Folder name must not contain '/' or be '.' or '..'"));
        }

        let parent = self.current().clone();
        let result = {
            let _busy = self.busy.enter();
            self.service.create_folder(&parent, name).await
        };

        match result {
            Ok(()) => {
                tracing::info!(parent = %parent, name, "folder created");
                self.observers.notify("Folder created", Severity::Success);
                self.reload_after_mutation().await;
                Ok(())
            }
            Err(e) => {
                self.observers
                    .notify(format!("Failed to create folder: {e}"), Severity::Error);
                Err(e)
            }
        }
    }

    /// Uploads `files` into the current directory in one request.
    ///
    /// Returns the number of files stored. An empty batch is a no-op.
    /// Whatever the outcome, [`Event::UploadInputCleared`] is emitted once
    /// the request has finished.
    pub async fn upload(&mut self, files: Vec<UploadFile>) -> CoreResult<usize> {
        if files.is_empty() {
            return Ok(0);
        }

        let sent = files.len();
        let dir = self.current().clone();
        let result = {
            let _clear = ClearUploadInput(&self.observers);
            let _busy = self.busy.enter();
            self.service.upload(&dir, files).await
        };

        match result {
            Ok(uploaded) => {
                let count = if uploaded.is_empty() {
                    sent
                } else {
                    uploaded.len()
                };
                tracing::info!(dir = %dir, count, "upload finished");
                self.observers
                    .notify(format!("Uploaded {count} files"), Severity::Success);
                self.reload_after_mutation().await;
                Ok(count)
            }
            Err(e) => {
                self.observers
                    .notify(format!("Upload failed: {e}"), Severity::Error);
                Err(e)
            }
        }
    }

    /// Fetches detailed metadata for one item.
    pub async fn info(&self, path: &RemotePath) -> CoreResult<FileInfo> {
        let _busy = self.busy.enter();
        self.service.info(path).await.inspect_err(|e| {
            self.observers
                .notify(format!("Failed to load file info: {e}"), Severity::Error);
        })
    }

    /// Fetches the full contents of a file.
    pub async fn download(&self, path: &RemotePath) -> CoreResult<Vec<u8>> {
        let _busy = self.busy.enter();
        self.service.download(path).await.inspect_err(|e| {
            self.observers
                .notify(format!("Download failed: {e}"), Severity::Error);
        })
    }

    /// Direct download URL of `path`.
    pub fn download_url(&self, path: &RemotePath) -> String {
        self.service.resource_url(ResourceKind::Download, path)
    }

    /// Entries whose name contains `query`, ignoring case. Neither the
    /// listing nor the selection is touched.
    pub fn filter(&self, query: &str) -> Vec<FileEntry> {
        filter_by_name(&self.entries, query)
    }

    /// Render-ready rows for the whole listing.
    pub fn rows(&self) -> Vec<EntryRow> {
        self.rows_for(&self.entries)
    }

    /// Render-ready rows for a subset of the listing, e.g. a filter result.
    pub fn rows_for(&self, entries: &[FileEntry]) -> Vec<EntryRow> {
        entries
            .iter()
            .map(|e| EntryRow::from_entry(e, self.selection.is_selected(e.path())))
            .collect()
    }

    /// Reloads after a successful mutation. A failed reload has already
    /// been reported by [`Self::load`].
    pub(crate) async fn reload_after_mutation(&mut self) {
        if let Err(e) = self.refresh().await {
            tracing::debug!(error = %e, "reload after mutation failed");
        }
    }

    fn reject(&self, message: &str) -> CoreError {
        self.observers.notify(message, Severity::Warning);
        CoreError::Validation(message.to_string())
    }
}

/// Emits [`Event::UploadInputCleared`] when dropped.
struct ClearUploadInput<'a>(&'a Observers);

impl Drop for ClearUploadInput<'_> {
    fn drop(&mut self) {
        self.0.emit(Event::UploadInputCleared);
    }
}
