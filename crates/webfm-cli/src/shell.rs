//! The interactive shell: maps parsed commands onto [`AppState`].

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};
use webfm_core::{AppState, Command, FileEntry, RemotePath, Severity, UploadFile};

use crate::commands::{self, ShellCommand};
use crate::render;

/// Whether the prompt loop should keep going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Shell {
    state: AppState,
    show_icons: bool,
}

impl Shell {
    pub fn new(state: AppState, show_icons: bool) -> Self {
        Self { state, show_icons }
    }

    /// Prompt showing the current location, e.g. `webfm:/docs> `.
    pub fn prompt(&self) -> String {
        let current = self.state.directory().current();
        if current.is_root() {
            "webfm:/> ".to_string()
        } else {
            format!("webfm:/{current}> ")
        }
    }

    /// Loads the first directory.
    pub async fn start(&mut self, path: RemotePath) {
        self.dispatch(Command::Enter(path)).await;
    }

    /// Parses and runs one input line. Errors are printed, never returned.
    pub async fn run_line(&mut self, line: &str) -> Flow {
        let result = match commands::parse(line) {
            Ok(Some(command)) => self.execute(command).await,
            Ok(None) => Ok(Flow::Continue),
            Err(e) => Err(e),
        };
        match result {
            Ok(flow) => flow,
            Err(e) => {
                println!("{}", render::notification(&format!("{e:#}"), Severity::Error));
                Flow::Continue
            }
        }
    }

    async fn execute(&mut self, command: ShellCommand) -> anyhow::Result<Flow> {
        match command {
            ShellCommand::List => {
                let rows = self.state.directory().rows();
                println!("{}", render::listing(&rows, self.show_icons));
                self.print_selection();
            }
            ShellCommand::Cd(arg) => {
                let dir = self.state.directory();
                let target = resolve_target(dir.current(), dir.entries(), &arg)?;
                self.dispatch(Command::Enter(target)).await;
            }
            ShellCommand::Up => self.dispatch(Command::GoUp).await,
            ShellCommand::Home => self.dispatch(Command::Enter(RemotePath::root())).await,
            ShellCommand::Refresh => self.dispatch(Command::Refresh).await,
            ShellCommand::Select(name) => {
                let path = self.listed(&name)?.path().clone();
                self.dispatch(Command::ToggleSelection(path)).await;
                self.print_if_unselected();
            }
            ShellCommand::SelectAll => {
                self.dispatch(Command::SelectAll).await;
                self.print_if_unselected();
            }
            ShellCommand::SelectNone => {
                self.dispatch(Command::ClearSelection).await;
                self.print_if_unselected();
            }
            ShellCommand::Filter(query) => {
                let dir = self.state.directory();
                let rows = dir.rows_for(&dir.filter(&query));
                println!("{}", render::listing(&rows, self.show_icons));
            }
            ShellCommand::Mkdir(name) => self.dispatch(Command::CreateFolder(name)).await,
            ShellCommand::Upload(paths) => {
                let files = read_local_files(&paths).await?;
                self.dispatch(Command::Upload(files)).await;
            }
            ShellCommand::Delete => {
                if self.require_selection() {
                    self.dispatch(Command::DeleteSelected).await;
                }
            }
            ShellCommand::Transfer(action) => {
                if self.require_selection() {
                    self.dispatch(Command::OpenPicker(action)).await;
                }
            }
            ShellCommand::Pick(n) => self.dispatch(Command::ChooseDestination(n - 1)).await,
            ShellCommand::Confirm => self.dispatch(Command::ConfirmDestination).await,
            ShellCommand::Cancel => self.dispatch(Command::CancelPicker).await,
            ShellCommand::Preview(name) => {
                let path = self.target_file(&name)?;
                self.dispatch(Command::Preview(path)).await;
            }
            ShellCommand::Get { name, dest } => {
                let path = self.target_file(&name)?;
                let dest = dest.unwrap_or_else(|| {
                    PathBuf::from(path.file_name().unwrap_or("download"))
                });
                // Failures are reported by the core.
                if let Ok(bytes) = self.state.directory().download(&path).await {
                    tokio::fs::write(&dest, &bytes)
                        .await
                        .with_context(|| format!("failed to write {}", dest.display()))?;
                    println!(
                        "{}",
                        render::notification(
                            &format!("Saved {} bytes to {}", bytes.len(), dest.display()),
                            Severity::Success
                        )
                    );
                }
            }
            ShellCommand::Info(name) => {
                let path = self.target_file(&name)?;
                if let Ok(info) = self.state.directory().info(&path).await {
                    println!("{}", render::info(&info));
                }
            }
            ShellCommand::Help => println!("{}", render::help()),
            ShellCommand::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    /// Runs a core command. The core has already notified the user of any
    /// failure, so the error is only logged here.
    async fn dispatch(&mut self, command: Command) {
        if let Err(e) = self.state.dispatch(command).await {
            tracing::debug!(error = %e, "command failed");
        }
    }

    fn listed(&self, name: &str) -> anyhow::Result<&FileEntry> {
        self.state
            .directory()
            .find(name)
            .ok_or_else(|| anyhow!("no entry named '{name}' here"))
    }

    /// A listed entry by name, or else a path relative to the current one.
    fn target_file(&self, arg: &str) -> anyhow::Result<RemotePath> {
        if let Ok(entry) = self.listed(arg) {
            return Ok(entry.path().clone());
        }
        let dir = self.state.directory();
        resolve_target(dir.current(), dir.entries(), arg)
    }

    fn require_selection(&self) -> bool {
        if self.state.directory().selection().is_empty() {
            println!("nothing selected (use 'select <name>' or 'all')");
            return false;
        }
        true
    }

    fn print_selection(&self) {
        let toolbar = self.state.directory().selection().toolbar();
        if toolbar.selected > 0 {
            println!("{}", render::toolbar(&toolbar));
        }
    }

    fn print_if_unselected(&self) {
        let toolbar = self.state.directory().selection().toolbar();
        if toolbar.selected == 0 {
            println!("{}", render::toolbar(&toolbar));
        }
    }
}

/// Turns a `cd`-style argument into a remote path.
///
/// `..` is the parent, a leading `/` means relative to the root, a listed
/// folder name wins over path interpretation, and anything else is taken
/// relative to `current`.
pub fn resolve_target(
    current: &RemotePath,
    entries: &[FileEntry],
    arg: &str,
) -> anyhow::Result<RemotePath> {
    let arg = arg.trim();
    if arg == ".." {
        return Ok(current.parent());
    }
    if let Some(absolute) = arg.strip_prefix('/') {
        return Ok(RemotePath::parse(absolute)?);
    }
    if let Some(entry) = entries.iter().find(|e| e.name() == arg) {
        return Ok(entry.path().clone());
    }
    Ok(RemotePath::parse(&format!("{}/{arg}", current.as_str()))?)
}

async fn read_local_files(paths: &[PathBuf]) -> anyhow::Result<Vec<UploadFile>> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        let data = tokio::fs::read(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?;
        files.push(UploadFile::new(upload_name(path)?, data));
    }
    Ok(files)
}

fn upload_name(path: &Path) -> anyhow::Result<String> {
    path.file_name()
        .map(|n| webfm_core::nfc_string(&n.to_string_lossy()))
        .ok_or_else(|| anyhow!("{} has no file name", path.display()))
}
