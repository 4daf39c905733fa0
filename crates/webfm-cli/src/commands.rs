//! Parsing of shell input lines.

use std::path::PathBuf;

use anyhow::{bail, Context};
use webfm_core::TransferAction;

/// One parsed shell command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    List,
    Cd(String),
    Up,
    Home,
    Refresh,
    Select(String),
    SelectAll,
    SelectNone,
    Filter(String),
    Mkdir(String),
    Upload(Vec<PathBuf>),
    Delete,
    Transfer(TransferAction),
    Pick(usize),
    Confirm,
    Cancel,
    Preview(String),
    Get { name: String, dest: Option<PathBuf> },
    Info(String),
    Help,
    Quit,
}

/// Parses one input line. Blank lines yield `None`.
///
/// Arguments after the verb are taken verbatim (trimmed), so names with
/// spaces need no quoting. `upload` splits its arguments on whitespace.
pub fn parse(line: &str) -> anyhow::Result<Option<ShellCommand>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let command = match verb {
        "ls" | "dir" => ShellCommand::List,
        "cd" => ShellCommand::Cd(required(verb, rest, "<name|path>")?),
        "up" | ".." => ShellCommand::Up,
        "home" => ShellCommand::Home,
        "refresh" | "r" => ShellCommand::Refresh,
        "select" | "s" => ShellCommand::Select(required(verb, rest, "<name>")?),
        "all" => ShellCommand::SelectAll,
        "none" => ShellCommand::SelectNone,
        "filter" | "f" => ShellCommand::Filter(rest.to_string()),
        "mkdir" => ShellCommand::Mkdir(rest.to_string()),
        "upload" => {
            let files: Vec<PathBuf> = rest.split_whitespace().map(PathBuf::from).collect();
            if files.is_empty() {
                bail!("usage: upload <file>...");
            }
            ShellCommand::Upload(files)
        }
        "rm" | "delete" => ShellCommand::Delete,
        "cp" | "copy" => ShellCommand::Transfer(TransferAction::Copy),
        "mv" | "move" => ShellCommand::Transfer(TransferAction::Move),
        "pick" => {
            let n: usize = required(verb, rest, "<n>")?
                .parse()
                .with_context(|| format!("not a number: {rest}"))?;
            if n == 0 {
                bail!("destinations are numbered from 1");
            }
            ShellCommand::Pick(n)
        }
        "ok" => ShellCommand::Confirm,
        "cancel" => ShellCommand::Cancel,
        "preview" | "cat" => ShellCommand::Preview(required(verb, rest, "<name>")?),
        "get" => {
            let arg = required(verb, rest, "<name> [local path]")?;
            let (name, dest) = match arg.rsplit_once(" > ") {
                Some((name, dest)) => (name.trim().to_string(), Some(PathBuf::from(dest.trim()))),
                None => (arg, None),
            };
            ShellCommand::Get { name, dest }
        }
        "info" => ShellCommand::Info(required(verb, rest, "<name>")?),
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" | "q" => ShellCommand::Quit,
        other => bail!("unknown command: {other} (type 'help')"),
    };
    Ok(Some(command))
}

fn required(verb: &str, rest: &str, usage: &str) -> anyhow::Result<String> {
    if rest.is_empty() {
        bail!("usage: {verb} {usage}");
    }
    Ok(rest.to_string())
}
