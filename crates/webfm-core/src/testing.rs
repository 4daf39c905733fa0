//! In-memory doubles shared by the unit tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::controller::batch::ConfirmGate;
use crate::controller::busy::BusyState;
use crate::controller::directory::DirectoryController;
use crate::error::{CoreError, CoreResult};
use crate::event::{Event, NotificationSink, Observers, Severity, ViewObserver};
use crate::fs::entry::{FileEntry, FileInfo};
use crate::fs::path::RemotePath;
use crate::remote::{BatchOutcome, FileService, ResourceKind, UploadFile};

/// A request the fake service received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List(RemotePath),
    CreateFolder(RemotePath, String),
    Upload(RemotePath, Vec<String>),
    Preview(RemotePath),
    Download(RemotePath),
    Info(RemotePath),
    BatchDelete(Vec<RemotePath>),
    BatchCopy(Vec<RemotePath>, RemotePath),
    BatchMove(Vec<RemotePath>, RemotePath),
}

#[derive(Default)]
struct FakeState {
    dirs: HashMap<RemotePath, Vec<FileEntry>>,
    contents: HashMap<RemotePath, Vec<u8>>,
    failures: HashMap<&'static str, String>,
    batch_result: Option<BatchOutcome>,
    calls: Vec<Call>,
}

/// A [`FileService`] backed by a fixed directory tree that records every
/// call.
#[derive(Default)]
pub struct FakeService {
    state: Mutex<FakeState>,
}

impl FakeService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dir(mut self, path: &str, entries: Vec<FileEntry>) -> Self {
        let path = RemotePath::parse(path).unwrap();
        self.state.get_mut().unwrap().dirs.insert(path, entries);
        self
    }

    pub fn set_content(&self, path: &RemotePath, bytes: &[u8]) {
        self.lock().contents.insert(path.clone(), bytes.to_vec());
    }

    /// Makes every later call of `op` fail with a backend error.
    pub fn fail(&self, op: &'static str, message: &str) {
        self.lock().failures.insert(op, message.to_string());
    }

    /// Overrides the outcome of the batch endpoints.
    pub fn set_batch_result(&self, outcome: BatchOutcome) {
        self.lock().batch_result = Some(outcome);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    pub fn reset_calls(&self) {
        self.lock().calls.clear();
    }

    pub fn list_calls(&self) -> usize {
        self.count(|c| matches!(c, Call::List(_)))
    }

    pub fn preview_calls(&self) -> usize {
        self.count(|c| matches!(c, Call::Preview(_)))
    }

    fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.lock().calls.iter().filter(|c| pred(*c)).count()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    fn record(&self, op: &'static str, call: Call) -> CoreResult<()> {
        let mut state = self.lock();
        state.calls.push(call);
        match state.failures.get(op) {
            Some(message) => Err(CoreError::Backend {
                code: 500,
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }

    fn batch(&self, paths: &[RemotePath]) -> BatchOutcome {
        self.lock()
            .batch_result
            .clone()
            .unwrap_or_else(|| BatchOutcome {
                succeeded: paths.to_vec(),
                failed: Vec::new(),
            })
    }

    fn content(&self, path: &RemotePath) -> CoreResult<Vec<u8>> {
        self.lock()
            .contents
            .get(path)
            .cloned()
            .ok_or_else(|| not_found("File not found"))
    }
}

fn not_found(message: &str) -> CoreError {
    CoreError::Backend {
        code: 404,
        message: message.to_string(),
    }
}

#[async_trait]
impl FileService for FakeService {
    async fn list(&self, dir: &RemotePath) -> CoreResult<Vec<FileEntry>> {
        self.record("list", Call::List(dir.clone()))?;
        self.lock()
            .dirs
            .get(dir)
            .cloned()
            .ok_or_else(|| not_found("Path not found"))
    }

    async fn create_folder(&self, parent: &RemotePath, name: &str) -> CoreResult<()> {
        self.record(
            "create_folder",
            Call::CreateFolder(parent.clone(), name.to_string()),
        )
    }

    async fn upload(&self, dir: &RemotePath, files: Vec<UploadFile>) -> CoreResult<Vec<String>> {
        let names: Vec<String> = files.into_iter().map(|f| f.name).collect();
        self.record("upload", Call::Upload(dir.clone(), names.clone()))?;
        Ok(names)
    }

    async fn preview(&self, path: &RemotePath) -> CoreResult<Vec<u8>> {
        self.record("preview", Call::Preview(path.clone()))?;
        self.content(path)
    }

    async fn download(&self, path: &RemotePath) -> CoreResult<Vec<u8>> {
        self.record("download", Call::Download(path.clone()))?;
        self.content(path)
    }

    async fn info(&self, path: &RemotePath) -> CoreResult<FileInfo> {
        self.record("info", Call::Info(path.clone()))?;
        let state = self.lock();
        let entry = state
            .dirs
            .get(&path.parent())
            .and_then(|entries| entries.iter().find(|e| e.path() == path))
            .ok_or_else(|| not_found("Path not found"))?;
        Ok(FileInfo {
            name: entry.name().to_string(),
            path: entry.path().clone(),
            is_dir: entry.is_dir(),
            size: entry.size(),
            modified: entry.modified().to_string(),
            created: entry.created().unwrap_or_default().to_string(),
            mime_type: None,
        })
    }

    async fn batch_delete(&self, paths: &[RemotePath]) -> CoreResult<BatchOutcome> {
        self.record("batch_delete", Call::BatchDelete(paths.to_vec()))?;
        Ok(self.batch(paths))
    }

    async fn batch_copy(
        &self,
        paths: &[RemotePath],
        destination: &RemotePath,
    ) -> CoreResult<BatchOutcome> {
        self.record(
            "batch_copy",
            Call::BatchCopy(paths.to_vec(), destination.clone()),
        )?;
        Ok(self.batch(paths))
    }

    async fn batch_move(
        &self,
        paths: &[RemotePath],
        destination: &RemotePath,
    ) -> CoreResult<BatchOutcome> {
        self.record(
            "batch_move",
            Call::BatchMove(paths.to_vec(), destination.clone()),
        )?;
        Ok(self.batch(paths))
    }

    fn resource_url(&self, kind: ResourceKind, path: &RemotePath) -> String {
        match kind {
            ResourceKind::Preview => format!("fake://preview/{}", path.as_str()),
            ResourceKind::Download => format!("fake://download/{}", path.as_str()),
        }
    }
}

/// Records every emitted [`Event`].
#[derive(Default)]
pub struct RecordingView {
    events: Mutex<Vec<Event>>,
}

impl RecordingView {
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }
}

impl ViewObserver for RecordingView {
    fn on_event(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }
}

/// Records every notification.
#[derive(Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<(String, Severity)>>,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<(String, Severity)> {
        self.messages.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.messages.lock().unwrap().clear();
    }
}

impl NotificationSink for RecordingNotifier {
    fn notify(&self, message: &str, severity: Severity) {
        self.messages
            .lock()
            .unwrap()
            .push((message.to_string(), severity));
    }
}

/// Answers every confirmation with the same value.
pub struct FixedGate(pub bool);

#[async_trait]
impl ConfirmGate for FixedGate {
    async fn confirm(&self, _prompt: &str) -> bool {
        self.0
    }
}

/// A fake service wired to recording observers.
pub struct Harness {
    pub service: Arc<FakeService>,
    pub view: Arc<RecordingView>,
    pub notifier: Arc<RecordingNotifier>,
    pub observers: Observers,
}

impl Harness {
    pub fn directory(&self) -> DirectoryController {
        DirectoryController::new(
            self.service.clone(),
            self.observers.clone(),
            BusyState::new(self.observers.clone()),
        )
    }
}

pub fn harness(service: FakeService) -> Harness {
    let view = Arc::new(RecordingView::default());
    let notifier = Arc::new(RecordingNotifier::default());
    let observers = Observers::new(view.clone(), notifier.clone());
    Harness {
        service: Arc::new(service),
        view,
        notifier,
        observers,
    }
}

/// A directory entry at `path`.
pub fn dir(path: &str) -> FileEntry {
    let path = RemotePath::parse(path).unwrap();
    let name = path.file_name().unwrap_or_default().to_string();
    FileEntry::new(name, path, true, 0, "2024-01-01 00:00:00")
}

/// A file entry at `path`.
pub fn file(path: &str, size: u64) -> FileEntry {
    let path = RemotePath::parse(path).unwrap();
    let name = path.file_name().unwrap_or_default().to_string();
    FileEntry::new(name, path, false, size, "2024-01-01 00:00:00")
}
