//! webfm — an interactive shell for a remote file store.
//!
//! This binary loads the configuration, connects the core to the backend
//! over HTTP, and runs a line-oriented prompt loop until `quit` or EOF.

mod commands;
mod render;
mod shell;
mod terminal;

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use webfm_core::{AppState, Config, ConfirmGate, HttpFileService, Observers, RemotePath};

use crate::shell::{Flow, Shell};
use crate::terminal::{AlwaysConfirm, SharedLines, StdinConfirm, TerminalNotifier, TerminalView};

/// Browse and manage a remote file store from the terminal
#[derive(Parser, Debug)]
#[command(name = "webfm")]
#[command(about = "Browse and manage a remote file store from the terminal", long_about = None)]
#[command(version)]
struct Args {
    /// Folder to open first, relative to the storage root
    #[arg(value_name = "START_PATH")]
    start: Option<String>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Backend URL, overriding the configuration and WEBFM_BASE_URL
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Delete without asking for confirmation
    #[arg(long)]
    yes: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so they do not interleave with listings on stdout.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "webfm=info,webfm_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;
    let start = RemotePath::parse(args.start.as_deref().unwrap_or_default())
        .context("invalid start path")?;

    let service = HttpFileService::new(&config.server).context("invalid server configuration")?;
    tracing::info!(base_url = %service.base_url(), "using backend");

    let lines: SharedLines = Arc::new(Mutex::new(BufReader::new(tokio::io::stdin()).lines()));
    let observers = Observers::new(
        Arc::new(TerminalView::new(config.ui.show_icons)),
        Arc::new(TerminalNotifier),
    );
    let confirm: Arc<dyn ConfirmGate> = if config.general.confirm_delete {
        Arc::new(StdinConfirm::new(lines.clone()))
    } else {
        Arc::new(AlwaysConfirm)
    };

    let state = AppState::new(&config, Arc::new(service), observers, confirm);
    let mut shell = Shell::new(state, config.ui.show_icons);
    shell.start(start).await;

    loop {
        print!("{}", shell.prompt());
        std::io::stdout().flush()?;

        let line = {
            let mut lines = lines.lock().await;
            lines.next_line().await?
        };
        let Some(line) = line else {
            println!();
            break;
        };
        if shell.run_line(&line).await == Flow::Quit {
            break;
        }
    }

    Ok(())
}

/// Resolves the configuration file and applies environment and flag
/// overrides, in that order.
fn load_config(args: &Args) -> anyhow::Result<Config> {
    let explicit = args
        .config
        .clone()
        .or_else(|| std::env::var_os("WEBFM_CONFIG").map(PathBuf::from));

    let mut config = match explicit {
        Some(path) => Config::load(&path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => match default_config_path() {
            Some(path) => Config::load_or_default(&path)?,
            None => Config::default(),
        },
    };

    apply_overrides(&mut config, std::env::var("WEBFM_BASE_URL").ok(), args);
    Ok(config)
}

fn apply_overrides(config: &mut Config, env_base_url: Option<String>, args: &Args) {
    if let Some(url) = env_base_url.filter(|u| !u.trim().is_empty()) {
        config.server.base_url = url;
    }
    if let Some(url) = &args.base_url {
        config.server.base_url = url.clone();
    }
    if args.yes {
        config.general.confirm_delete = false;
    }
}

/// Returns `~/.config/webfm/config.toml`, if `HOME` is set.
fn default_config_path() -> Option<PathBuf> {
    std::env::var_os("HOME").map(|home| {
        PathBuf::from(home)
            .join(".config")
            .join("webfm")
            .join("config.toml")
    })
}
