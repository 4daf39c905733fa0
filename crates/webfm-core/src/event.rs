//! Event system for communication between UI and Core.
//!
//! The UI translates user input into [`Command`]s, which [`AppState`]
//! dispatches to the controllers. The controllers respond with [`Event`]s
//! delivered to a [`ViewObserver`] and with user-facing messages delivered
//! to a [`NotificationSink`]. Any frontend can drive the same core logic by
//! implementing those two traits.
//!
//! [`AppState`]: crate::state::AppState

use std::fmt;
use std::sync::Arc;

use crate::controller::batch::{DestinationChoice, TransferAction};
use crate::fs::entry::FileEntry;
use crate::fs::path::RemotePath;
use crate::fs::preview::PreviewContent;
use crate::nav::path_model::BreadcrumbSegment;
use crate::nav::selection::ToolbarState;
use crate::remote::UploadFile;

/// An action the UI requests the core to perform.
///
/// Commands flow **UI → Core**. The core never creates commands itself.
#[derive(Debug, Clone)]
pub enum Command {
    /// Navigate into the directory at the given path and load it.
    Enter(RemotePath),
    /// Move to the parent directory.
    GoUp,
    /// Re-read the current directory.
    Refresh,
    /// Add or remove one listed item from the selection.
    ToggleSelection(RemotePath),
    /// Select every listed item, or clear if all are already selected.
    SelectAll,
    ClearSelection,
    /// Create a folder with the given name in the current directory.
    CreateFolder(String),
    /// Upload files into the current directory.
    Upload(Vec<UploadFile>),
    /// Delete the selected items (after confirmation).
    DeleteSelected,
    /// Open the destination picker for a copy or move of the selection.
    OpenPicker(TransferAction),
    /// Choose the picker entry at the given index.
    ChooseDestination(usize),
    /// Run the pending copy/move against the chosen destination.
    ConfirmDestination,
    CancelPicker,
    /// Resolve and load a preview of the given file.
    Preview(RemotePath),
}

/// A notification the core sends back to the UI.
///
/// Events flow **Core → UI**. The UI uses these to update its display state.
#[derive(Debug, Clone)]
pub enum Event {
    /// A directory listing has been applied.
    ListingChanged {
        /// The directory now displayed.
        path: RemotePath,
        /// Its entries, in backend order.
        entries: Vec<FileEntry>,
    },
    /// The breadcrumb trail was recomputed.
    BreadcrumbChanged(Vec<BreadcrumbSegment>),
    /// The selection set changed; carries the new toolbar state.
    SelectionChanged(ToolbarState),
    /// A network-bound workflow started (`true`) or all of them finished.
    BusyChanged(bool),
    /// The destination picker opened with a fresh set of choices.
    PickerOpened {
        action: TransferAction,
        choices: Vec<DestinationChoice>,
    },
    /// A picker entry was chosen; confirmation is now possible.
    DestinationChosen(DestinationChoice),
    PickerClosed,
    /// The file-input control should be reset after an upload attempt.
    UploadInputCleared,
    /// Preview content is ready to be displayed.
    PreviewLoaded {
        path: RemotePath,
        content: PreviewContent,
    },
}

/// How prominently a notification should be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Info => "info",
            Severity::Success => "success",
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        f.write_str(label)
    }
}

/// Receives user-facing messages. Display is entirely up to the frontend.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, message: &str, severity: Severity);
}

/// Receives render-relevant [`Event`]s.
pub trait ViewObserver: Send + Sync {
    fn on_event(&self, event: Event);
}

/// The pair of outward channels every controller reports through.
#[derive(Clone)]
pub struct Observers {
    view: Arc<dyn ViewObserver>,
    notifier: Arc<dyn NotificationSink>,
}

impl Observers {
    pub fn new(view: Arc<dyn ViewObserver>, notifier: Arc<dyn NotificationSink>) -> Self {
        Self { view, notifier }
    }

    pub fn emit(&self, event: Event) {
        self.view.on_event(event);
    }

    pub fn notify(&self, message: impl AsRef<str>, severity: Severity) {
        self.notifier.notify(message.as_ref(), severity);
    }
}

impl fmt::Debug for Observers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observers").finish_non_exhaustive()
    }
}
