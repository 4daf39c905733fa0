//! Terminal implementations of the core's observer and gate traits.

use std::io::Write;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::io::{BufReader, Lines, Stdin};
use tokio::sync::Mutex;
use webfm_core::{ConfirmGate, EntryRow, Event, NotificationSink, Severity, ViewObserver};

use crate::render;

/// Stdin line reader shared by the prompt loop and the delete confirmation.
pub type SharedLines = Arc<Mutex<Lines<BufReader<Stdin>>>>;

/// Prints render-relevant events to stdout.
pub struct TerminalView {
    show_icons: bool,
}

impl TerminalView {
    pub fn new(show_icons: bool) -> Self {
        Self { show_icons }
    }
}

impl ViewObserver for TerminalView {
    fn on_event(&self, event: Event) {
        if let Some(text) = describe(&event, self.show_icons) {
            println!("{text}");
        }
    }
}

/// Text to print for an event, if any.
///
/// An empty selection is not announced: every applied listing resets the
/// selection, and echoing that after each `cd` is noise.
pub fn describe(event: &Event, show_icons: bool) -> Option<String> {
    match event {
        Event::ListingChanged { entries, .. } => {
            let rows: Vec<EntryRow> = entries
                .iter()
                .map(|e| EntryRow::from_entry(e, false))
                .collect();
            Some(render::listing(&rows, show_icons))
        }
        Event::BreadcrumbChanged(segments) => Some(format!("[{}]", render::breadcrumb(segments))),
        Event::SelectionChanged(state) if state.selected > 0 => Some(render::toolbar(state)),
        Event::SelectionChanged(_) => None,
        Event::BusyChanged(busy) => {
            tracing::trace!(busy, "busy changed");
            None
        }
        Event::PickerOpened { action, choices } => Some(render::picker(*action, choices)),
        Event::DestinationChosen(choice) => Some(format!(
            "destination: {} (type 'ok' to confirm)",
            choice.label
        )),
        Event::PickerClosed => Some("destination picker closed".to_string()),
        Event::UploadInputCleared => None,
        Event::PreviewLoaded { path, content } => Some(render::preview(path, content)),
    }
}

/// Prints notifications to stdout, tagged by severity.
pub struct TerminalNotifier;

impl NotificationSink for TerminalNotifier {
    fn notify(&self, message: &str, severity: Severity) {
        println!("{}", render::notification(message, severity));
    }
}

/// Asks `y/N` on the terminal.
pub struct StdinConfirm {
    lines: SharedLines,
}

impl StdinConfirm {
    pub fn new(lines: SharedLines) -> Self {
        Self { lines }
    }
}

#[async_trait]
impl ConfirmGate for StdinConfirm {
    async fn confirm(&self, prompt: &str) -> bool {
        print!("{prompt} [y/N] ");
        let _ = std::io::stdout().flush();
        let mut lines = self.lines.lock().await;
        match lines.next_line().await {
            Ok(Some(answer)) => is_yes(&answer),
            Ok(None) => false,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read confirmation");
                false
            }
        }
    }
}

/// Agrees to everything (`--yes` or `confirm_delete = false`).
pub struct AlwaysConfirm;

#[async_trait]
impl ConfirmGate for AlwaysConfirm {
    async fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
