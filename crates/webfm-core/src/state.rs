//! Application state shared by every frontend.

use std::sync::Arc;

use crate::config::settings::Config;
use crate::controller::batch::{BatchOperationController, ConfirmGate};
use crate::controller::busy::BusyState;
use crate::controller::directory::DirectoryController;
use crate::error::CoreResult;
use crate::event::{Command, Observers};
use crate::fs::preview::PreviewResolver;
use crate::remote::FileService;

/// Everything a running client needs, constructed once at startup.
///
/// Frontends own one `AppState` and feed it [`Command`]s; results come
/// back through the [`Observers`] it was built with.
pub struct AppState {
    directory: DirectoryController,
    batch: BatchOperationController,
    preview: PreviewResolver,
    confirm: Arc<dyn ConfirmGate>,
}

impl AppState {
    pub fn new(
        config: &Config,
        service: Arc<dyn FileService>,
        observers: Observers,
        confirm: Arc<dyn ConfirmGate>,
    ) -> Self {
        let busy = BusyState::new(observers.clone());
        Self {
            directory: DirectoryController::new(service.clone(), observers.clone(), busy),
            batch: BatchOperationController::new(config.picker.max_depth),
            preview: PreviewResolver::new(service, observers),
            confirm,
        }
    }

    pub fn directory(&self) -> &DirectoryController {
        &self.directory
    }

    pub fn directory_mut(&mut self) -> &mut DirectoryController {
        &mut self.directory
    }

    pub fn batch(&self) -> &BatchOperationController {
        &self.batch
    }

    pub fn preview(&self) -> &PreviewResolver {
        &self.preview
    }

    /// Routes a command to the controller that owns it.
    ///
    /// Failures have already been reported through the notification sink
    /// by the time this returns; the error is handed back for callers that
    /// want to react to it.
    pub async fn dispatch(&mut self, command: Command) -> CoreResult<()> {
        tracing::debug!(?command, "dispatch");
        match command {
            Command::Enter(path) => {
                self.directory.enter(path).await?;
            }
            Command::GoUp => {
                self.directory.go_up().await?;
            }
            Command::Refresh => {
                self.directory.refresh().await?;
            }
            Command::ToggleSelection(path) => self.directory.selection_mut().toggle(&path),
            Command::SelectAll => {
                let listed = self.directory.selection().scope().to_vec();
                self.directory.selection_mut().select_all(&listed);
            }
            Command::ClearSelection => self.directory.selection_mut().clear(),
            Command::CreateFolder(name) => self.directory.create_folder(&name).await?,
            Command::Upload(files) => {
                self.directory.upload(files).await?;
            }
            Command::DeleteSelected => {
                self.batch
                    .delete_selected(&mut self.directory, self.confirm.as_ref())
                    .await?;
            }
            Command::OpenPicker(action) => {
                self.batch
                    .open_destination_picker(&self.directory, action)
                    .await?;
            }
            Command::ChooseDestination(index) => self.batch.choose(&self.directory, index)?,
            Command::ConfirmDestination => {
                self.batch.confirm_chosen(&mut self.directory).await?;
            }
            Command::CancelPicker => self.batch.cancel_picker(&self.directory),
            Command::Preview(path) => {
                self.preview.preview(&path).await?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::batch::TransferAction;
    use crate::event::{Event, Severity};
    use crate::fs::path::RemotePath;
    use crate::testing::{dir, file, harness, Call, FakeService, FixedGate, Harness};

    fn p(s: &str) -> RemotePath {
        RemotePath::parse(s).unwrap()
    }

    fn app(confirm: bool) -> (AppState, Harness) {
        let service = FakeService::new()
            .with_dir("", vec![dir("docs"), file("a.txt", 1024), file("b.md", 5)])
            .with_dir("docs", vec![]);
        let h = harness(service);
        let state = AppState::new(
            &Config::default(),
            h.service.clone(),
            h.observers.clone(),
            Arc::new(FixedGate(confirm)),
        );
        (state, h)
    }

    #[tokio::test]
    async fn navigation_commands() {
        let (mut state, _h) = app(true);

        state.dispatch(Command::Enter(p("docs"))).await.unwrap();
        assert_eq!(state.directory().current(), &p("docs"));

        state.dispatch(Command::GoUp).await.unwrap();
        assert!(state.directory().current().is_root());
        assert_eq!(state.directory().entries().len(), 3);
    }

    #[tokio::test]
    async fn selection_commands() {
        let (mut state, _h) = app(true);
        state.dispatch(Command::Refresh).await.unwrap();

        state
            .dispatch(Command::ToggleSelection(p("a.txt")))
            .await
            .unwrap();
        assert_eq!(state.directory().selection().size(), 1);

        state.dispatch(Command::SelectAll).await.unwrap();
        assert_eq!(state.directory().selection().size(), 3);
        state.dispatch(Command::SelectAll).await.unwrap();
        assert_eq!(state.directory().selection().size(), 0);

        state.dispatch(Command::SelectAll).await.unwrap();
        state.dispatch(Command::ClearSelection).await.unwrap();
        assert_eq!(state.directory().selection().size(), 0);
    }

    #[tokio::test]
    async fn delete_uses_confirm_gate() {
        let (mut state, h) = app(false);
        state.dispatch(Command::Refresh).await.unwrap();
        state
            .dispatch(Command::ToggleSelection(p("a.txt")))
            .await
            .unwrap();
        h.service.reset_calls();

        state.dispatch(Command::DeleteSelected).await.unwrap();

        assert!(h.service.calls().is_empty());
    }

    #[tokio::test]
    async fn move_through_picker_commands() {
        let (mut state, h) = app(true);
        state.dispatch(Command::Refresh).await.unwrap();
        state
            .dispatch(Command::ToggleSelection(p("b.md")))
            .await
            .unwrap();

        state
            .dispatch(Command::OpenPicker(TransferAction::Move))
            .await
            .unwrap();
        assert!(state.batch().picker().is_some());

        state
            .dispatch(Command::ChooseDestination(1))
            .await
            .unwrap();
        h.service.reset_calls();
        state.dispatch(Command::ConfirmDestination).await.unwrap();

        assert_eq!(
            h.service.calls(),
            vec![
                Call::BatchMove(vec![p("b.md")], p("docs")),
                Call::List(RemotePath::root()),
            ]
        );
        assert!(state.batch().picker().is_none());
        assert!(h
            .notifier
            .messages()
            .contains(&("Moved 1 items".to_string(), Severity::Success)));
    }

    #[tokio::test]
    async fn cancel_picker_command() {
        let (mut state, _h) = app(true);
        state.dispatch(Command::Refresh).await.unwrap();
        state
            .dispatch(Command::ToggleSelection(p("a.txt")))
            .await
            .unwrap();
        state
            .dispatch(Command::OpenPicker(TransferAction::Copy))
            .await
            .unwrap();

        state.dispatch(Command::CancelPicker).await.unwrap();

        assert!(state.batch().picker().is_none());
    }

    #[tokio::test]
    async fn create_folder_command_validates() {
        let (mut state, h) = app(true);

        let result = state.dispatch(Command::CreateFolder("  ".to_string())).await;

        assert!(result.unwrap_err().is_validation());
        assert!(h.service.calls().is_empty());
    }

    #[tokio::test]
    async fn preview_command_emits_content() {
        let (mut state, h) = app(true);

        state
            .dispatch(Command::Preview(p("pics/cat.png")))
            .await
            .unwrap();

        assert!(h
            .view
            .events()
            .iter()
            .any(|e| matches!(e, Event::PreviewLoaded { .. })));
    }
}
