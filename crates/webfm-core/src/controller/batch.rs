//! Multi-item delete, copy and move, including destination picking.

use std::collections::VecDeque;
use std::fmt;

use async_trait::async_trait;

use crate::controller::directory::DirectoryController;
use crate::error::{CoreError, CoreResult};
use crate::event::{Event, Severity};
use crate::fs::path::RemotePath;
use crate::nav::path_model::ROOT_LABEL;
use crate::remote::{BatchFailure, BatchOutcome};

/// Hard cap on how deep the destination picker will walk.
pub const MAX_PICKER_DEPTH: usize = 64;

/// Kinds of batch operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Delete,
    Copy,
    Move,
}

impl OperationKind {
    /// Past-tense verb used in result notifications.
    pub fn past_tense(self) -> &'static str {
        match self {
            OperationKind::Delete => "Deleted",
            OperationKind::Copy => "Copied",
            OperationKind::Move => "Moved",
        }
    }

    fn noun(self) -> &'static str {
        match self {
            OperationKind::Delete => "Delete",
            OperationKind::Copy => "Copy",
            OperationKind::Move => "Move",
        }
    }
}

/// Operations that need a destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransferAction {
    Copy,
    Move,
}

impl From<TransferAction> for OperationKind {
    fn from(action: TransferAction) -> Self {
        match action {
            TransferAction::Copy => OperationKind::Copy,
            TransferAction::Move => OperationKind::Move,
        }
    }
}

impl fmt::Display for TransferAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferAction::Copy => f.write_str("copy"),
            TransferAction::Move => f.write_str("move"),
        }
    }
}

/// One folder offered as a copy/move target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationChoice {
    /// `"home"` for the root, otherwise the path itself.
    pub label: String,
    pub path: RemotePath,
    /// Number of segments below the root.
    pub depth: usize,
}

impl DestinationChoice {
    fn for_path(path: RemotePath) -> Self {
        let label = if path.is_root() {
            ROOT_LABEL.to_string()
        } else {
            path.as_str().to_string()
        };
        Self {
            label,
            depth: path.depth(),
            path,
        }
    }
}

/// The open destination picker.
///
/// Built fresh every time it opens and dropped on confirm or cancel.
/// Nothing is chosen initially, so confirmation starts out disabled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationPicker {
    action: TransferAction,
    choices: Vec<DestinationChoice>,
    chosen: Option<usize>,
}

impl DestinationPicker {
    pub fn action(&self) -> TransferAction {
        self.action
    }

    pub fn choices(&self) -> &[DestinationChoice] {
        &self.choices
    }

    pub fn chosen(&self) -> Option<&DestinationChoice> {
        self.chosen.and_then(|i| self.choices.get(i))
    }

    pub fn can_confirm(&self) -> bool {
        self.chosen.is_some()
    }
}

/// Explicit yes/no gate in front of destructive operations.
#[async_trait]
pub trait ConfirmGate: Send + Sync {
    async fn confirm(&self, prompt: &str) -> bool;
}

/// Result of one batch request the backend accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchReport {
    pub kind: OperationKind,
    pub requested: usize,
    pub succeeded: Vec<RemotePath>,
    pub failed: Vec<BatchFailure>,
}

impl BatchReport {
    /// Number of items the backend actually processed.
    pub fn count(&self) -> usize {
        self.succeeded.len()
    }

    pub fn is_partial(&self) -> bool {
        !self.failed.is_empty()
    }
}

/// One batch request in flight.
#[derive(Debug, Clone)]
struct PendingOperation {
    kind: OperationKind,
    source_paths: Vec<RemotePath>,
    destination: Option<RemotePath>,
}

/// Drives delete/copy/move against the selection of a
/// [`DirectoryController`].
#[derive(Debug)]
pub struct BatchOperationController {
    picker: Option<DestinationPicker>,
    max_depth: usize,
}

impl BatchOperationController {
    /// `max_depth` is how many folder levels below the root the picker
    /// offers; it is clamped to [`MAX_PICKER_DEPTH`].
    pub fn new(max_depth: usize) -> Self {
        Self {
            picker: None,
            max_depth: max_depth.min(MAX_PICKER_DEPTH),
        }
    }

    pub fn picker(&self) -> Option<&DestinationPicker> {
        self.picker.as_ref()
    }

    /// Deletes the selected items after `gate` agrees.
    ///
    /// Returns `Ok(None)` when nothing is selected or the user declines;
    /// neither case makes a request. Any accepted request, even a partially
    /// failed one, is followed by a reload.
    pub async fn delete_selected(
        &mut self,
        dir: &mut DirectoryController,
        gate: &dyn ConfirmGate,
    ) -> CoreResult<Option<BatchReport>> {
        let paths = dir.selection().all();
        if paths.is_empty() {
            return Ok(None);
        }

        let prompt = format!("Delete {} selected item(s)?", paths.len());
        if !gate.confirm(&prompt).await {
            tracing::debug!(count = paths.len(), "delete declined");
            return Ok(None);
        }

        let op = PendingOperation {
            kind: OperationKind::Delete,
            source_paths: paths,
            destination: None,
        };
        self.run(dir, op).await.map(Some)
    }

    /// Opens the destination picker for `action`.
    ///
    /// Folders are enumerated from the root regardless of the current
    /// directory, breadth first, down to the configured depth. A listing
    /// failure anywhere aborts the picker.
    pub async fn open_destination_picker(
        &mut self,
        dir: &DirectoryController,
        action: TransferAction,
    ) -> CoreResult<()> {
        if dir.selection().is_empty() {
            return Ok(());
        }

        let choices = {
            let _busy = dir.busy().enter();
            self.collect_destinations(dir).await
        };
        let choices = match choices {
            Ok(choices) => choices,
            Err(e) => {
                self.picker = None;
                dir.observers()
                    .notify(format!("Failed to load folders: {e}"), Severity::Error);
                return Err(e);
            }
        };

        tracing::debug!(%action, count = choices.len(), "destination picker opened");
        dir.observers().emit(Event::PickerOpened {
            action,
            choices: choices.clone(),
        });
        self.picker = Some(DestinationPicker {
            action,
            choices,
            chosen: None,
        });
        Ok(())
    }

    async fn collect_destinations(
        &self,
        dir: &DirectoryController,
    ) -> CoreResult<Vec<DestinationChoice>> {
        let mut choices = vec![DestinationChoice::for_path(RemotePath::root())];
        let mut queue = VecDeque::from([RemotePath::root()]);

        while let Some(parent) = queue.pop_front() {
            if parent.depth() >= self.max_depth {
                continue;
            }
            for entry in dir.service().list(&parent).await? {
                if entry.is_dir() {
                    choices.push(DestinationChoice::for_path(entry.path().clone()));
                    queue.push_back(entry.path().clone());
                }
            }
        }
        Ok(choices)
    }

    /// Marks the picker entry at `index` as the destination.
    pub fn choose(&mut self, dir: &DirectoryController, index: usize) -> CoreResult<()> {
        let Some(picker) = self.picker.as_mut() else {
            return Err(reject(dir, "No destination picker is open"));
        };
        let Some(choice) = picker.choices.get(index).cloned() else {
            return Err(reject(
                dir,
                &format!("No destination at position {}", index + 1),
            ));
        };
        picker.chosen = Some(index);
        dir.observers().emit(Event::DestinationChosen(choice));
        Ok(())
    }

    /// Closes the picker without doing anything.
    pub fn cancel_picker(&mut self, dir: &DirectoryController) {
        if self.picker.take().is_some() {
            dir.observers().emit(Event::PickerClosed);
        }
    }

    /// Confirms the open picker with its chosen entry.
    pub async fn confirm_chosen(
        &mut self,
        dir: &mut DirectoryController,
    ) -> CoreResult<Option<BatchReport>> {
        let Some(picker) = self.picker.as_ref() else {
            return Err(reject(dir, "No destination picker is open"));
        };
        let action = picker.action;
        let destination = picker.chosen().map(|c| c.path.clone());
        self.confirm_destination(dir, action, destination).await
    }

    /// Copies or moves the selection into `destination`.
    ///
    /// A missing destination, or one inside a selected folder, is rejected
    /// without a request. If the selection was cleared meanwhile (by
    /// navigating away) the picker closes. On success the picker closes and
    /// the directory reloads; on failure the picker stays open for another
    /// attempt.
    pub async fn confirm_destination(
        &mut self,
        dir: &mut DirectoryController,
        action: TransferAction,
        destination: Option<RemotePath>,
    ) -> CoreResult<Option<BatchReport>> {
        let Some(destination) = destination else {
            return Err(reject(dir, "Please choose a destination folder"));
        };

        let paths = dir.selection().all();
        if paths.is_empty() {
            self.cancel_picker(dir);
            return Err(reject(dir, &format!("Nothing selected to {action}")));
        }
        if let Some(source) = paths.iter().find(|p| destination.starts_with(p)) {
            return Err(reject(
                dir,
                &format!("Cannot {action} {source} into itself"),
            ));
        }

        let op = PendingOperation {
            kind: action.into(),
            source_paths: paths,
            destination: Some(destination),
        };
        let report = self.run(dir, op).await?;
        if self.picker.take().is_some() {
            dir.observers().emit(Event::PickerClosed);
        }
        Ok(Some(report))
    }

    async fn run(
        &mut self,
        dir: &mut DirectoryController,
        op: PendingOperation,
    ) -> CoreResult<BatchReport> {
        let result = {
            let _busy = dir.busy().enter();
            dispatch(dir, &op).await
        };

        let outcome = match result {
            Ok(outcome) => outcome,
            Err(e) => {
                dir.observers().notify(
                    format!("{} failed: {e}", op.kind.noun()),
                    Severity::Error,
                );
                return Err(e);
            }
        };

        let report = BatchReport {
            kind: op.kind,
            requested: op.source_paths.len(),
            succeeded: outcome.succeeded,
            failed: outcome.failed,
        };
        for failure in &report.failed {
            tracing::warn!(
                kind = ?report.kind,
                path = %failure.path,
                reason = %failure.reason,
                "batch item failed"
            );
        }
        tracing::info!(
            kind = ?report.kind,
            requested = report.requested,
            succeeded = report.count(),
            "batch operation finished"
        );

        dir.observers().notify(
            format!("{} {} items", report.kind.past_tense(), report.count()),
            Severity::Success,
        );
        dir.reload_after_mutation().await;
        Ok(report)
    }
}

fn reject(dir: &DirectoryController, message: &str) -> CoreError {
    dir.observers().notify(message, Severity::Warning);
    CoreError::Validation(message.to_string())
}

async fn dispatch(dir: &DirectoryController, op: &PendingOperation) -> CoreResult<BatchOutcome> {
    let service = dir.service();
    match (op.kind, op.destination.as_ref()) {
        (OperationKind::Delete, _) => service.batch_delete(&op.source_paths).await,
        (OperationKind::Copy, Some(dest)) => service.batch_copy(&op.source_paths, dest).await,
        (OperationKind::Move, Some(dest)) => service.batch_move(&op.source_paths, dest).await,
        (_, None) => Err(CoreError::Validation(
            "Please choose a destination folder".to_string(),
        )),
    }
}
