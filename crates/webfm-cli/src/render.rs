//! Plain-text rendering of core state.
//!
//! Every function here is pure and returns the text to print, so the
//! output format is testable without a terminal.

use webfm_core::controller::batch::{DestinationChoice, TransferAction};
use webfm_core::{
    format_size, BreadcrumbSegment, EntryRow, FileInfo, PreviewContent, RemotePath, Severity,
    ToolbarState,
};

const NAME_WIDTH: usize = 36;

/// Renders listing rows, one per line. Selected rows are marked with `*`.
pub fn listing(rows: &[EntryRow], show_icons: bool) -> String {
    if rows.is_empty() {
        return "  (empty)".to_string();
    }
    rows.iter()
        .map(|row| {
            let mark = if row.selected { '*' } else { ' ' };
            let name = if row.is_dir {
                format!("{}/", row.name)
            } else {
                row.name.clone()
            };
            let icon = if show_icons {
                format!("{} ", row.icon)
            } else {
                String::new()
            };
            format!(
                "{mark} {icon}{name:<width$} {size:>10}  {modified}",
                width = NAME_WIDTH,
                size = row.size_label,
                modified = row.modified
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Renders the breadcrumb trail as `home / a / b`.
pub fn breadcrumb(segments: &[BreadcrumbSegment]) -> String {
    segments
        .iter()
        .map(|s| s.label.as_str())
        .collect::<Vec<_>>()
        .join(" / ")
}

pub fn toolbar(state: &ToolbarState) -> String {
    match &state.label {
        Some(label) if state.all_selected => format!("{label} (all)"),
        Some(label) => label.clone(),
        None => "nothing selected".to_string(),
    }
}

/// Renders the destination picker with 1-based numbers.
pub fn picker(action: TransferAction, choices: &[DestinationChoice]) -> String {
    let mut lines = vec![format!("Choose a destination to {action} into (pick <n>, then ok):")];
    for (i, choice) in choices.iter().enumerate() {
        let indent = "  ".repeat(choice.depth);
        lines.push(format!("  {:>3}. {indent}{}", i + 1, choice.label));
    }
    lines.join("\n")
}

pub fn preview(path: &RemotePath, content: &PreviewContent) -> String {
    let header = format!("--- {path} ---");
    let body = match content {
        PreviewContent::Text(text) => strip_control(text.plain()),
        PreviewContent::Image { url } => format!("image: {url}"),
        PreviewContent::Pdf { url } => format!("pdf: {url}"),
        PreviewContent::Video { url, mime } => format!("video ({mime}): {url}"),
        PreviewContent::Audio { url, mime } => format!("audio ({mime}): {url}"),
        PreviewContent::Unavailable { message } => message.clone(),
    };
    format!("{header}\n{body}")
}

pub fn info(info: &FileInfo) -> String {
    let kind = if info.is_dir { "directory" } else { "file" };
    let mut lines = vec![
        format!("name:     {}", info.name),
        format!("path:     {}", info.path),
        format!("type:     {kind}"),
    ];
    if !info.is_dir {
        lines.push(format!("size:     {} ({} bytes)", format_size(info.size), info.size));
    }
    lines.push(format!("modified: {}", info.modified));
    lines.push(format!("created:  {}", info.created));
    if let Some(mime) = &info.mime_type {
        lines.push(format!("mime:     {mime}"));
    }
    lines.join("\n")
}

pub fn notification(message: &str, severity: Severity) -> String {
    let tag = match severity {
        Severity::Info => "info",
        Severity::Success => " ok ",
        Severity::Warning => "warn",
        Severity::Error => "fail",
    };
    format!("[{tag}] {message}")
}

pub fn help() -> &'static str {
    "\
Navigation:
  ls                     list the current directory
  cd <name|path>         enter a folder (.. for parent, / for home)
  up, home, refresh      parent folder, root folder, reload
  filter [query]         show entries whose name contains query
Selection:
  select <name>          toggle an entry
  all, none              select all (again to clear), clear selection
Operations:
  mkdir <name>           create a folder
  upload <file>...       upload local files here
  rm                     delete the selection
  cp, mv                 copy/move the selection (opens the picker)
  pick <n>, ok, cancel   choose a destination, confirm, close the picker
Files:
  preview <name>         preview a file
  get <name> [> local]   download a file
  info <name>            show file details
  help, quit"
}

/// Strips ANSI escape sequences and other control characters from a string.
///
/// Handles CSI sequences (`\x1b[...`), OSC sequences (`\x1b]...\x07`) and
/// single-character escape codes. Tabs become four spaces; newlines stay.
pub fn strip_control(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\x1b' {
            match chars.peek() {
                Some('[') => {
                    chars.next();
                    while let Some(next) = chars.next() {
                        if next.is_ascii_alphabetic() {
                            break;
                        }
                    }
                }
                Some(']') => {
                    chars.next();
                    while let Some(next) = chars.next() {
                        if next == '\x07' {
                            break;
                        }
                        if next == '\x1b' && chars.peek() == Some(&'\\') {
                            chars.next();
                            break;
                        }
                    }
                }
                Some(_) => {
                    chars.next();
                }
                None => {}
            }
        } else if c == '\t' {
            result.push_str("    ");
        } else if c == '\n' || !c.is_control() {
            result.push(c);
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use webfm_core::fs::preview::TextPreview;
    use webfm_core::FileEntry;

    fn p(s: &str) -> RemotePath {
        RemotePath::parse(s).unwrap()
    }

    fn row(name: &str, is_dir: bool, size: u64, selected: bool) -> EntryRow {
        EntryRow::from_entry(&FileEntry::new(name, p(name), is_dir, size, "2024-01-01"), selected)
    }

    #[test]
    fn listing_marks_selection_and_dirs() {
        let rows = vec![row("docs", true, 0, false), row("a.txt", false, 1536, true)];
        let text = listing(&rows, false);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("  docs/"));
        assert!(lines[0].contains(" -  "));
        assert!(lines[1].starts_with("* a.txt"));
        assert!(lines[1].contains("1.5 KB"));
    }

    #[test]
    fn listing_with_icons() {
        let text = listing(&[row("main.rs", false, 1, false)], true);
        assert!(text.contains("🦀 main.rs"));
    }

    #[test]
    fn empty_listing() {
        assert_eq!(listing(&[], true), "  (empty)");
    }

    #[test]
    fn breadcrumb_joins_labels() {
        let mut model = webfm_core::PathModel::new();
        model.navigate_to(p("a/b"));
        assert_eq!(breadcrumb(&model.segments()), "home / a / b");
    }

    #[test]
    fn toolbar_labels() {
        assert_eq!(toolbar(&ToolbarState::default()), "nothing selected");
        let state = ToolbarState {
            selected: 2,
            all_selected: true,
            batch_enabled: true,
            label: Some("2 selected".to_string()),
        };
        assert_eq!(toolbar(&state), "2 selected (all)");
    }

    #[test]
    fn picker_numbers_from_one_and_indents() {
        let choices = vec![
            DestinationChoice {
                label: "home".to_string(),
                path: RemotePath::root(),
                depth: 0,
            },
            DestinationChoice {
                label: "docs".to_string(),
                path: p("docs"),
                depth: 1,
            },
        ];
        let text = picker(TransferAction::Move, &choices);
        assert!(text.starts_with("Choose a destination to move into"));
        assert!(text.contains("    1. home"));
        assert!(text.contains("    2.   docs"));
    }

    #[test]
    fn text_preview_is_sanitised() {
        let content = PreviewContent::Text(TextPreview::from_bytes(b"\x1b[31mred\x1b[0m\tx"));
        assert_eq!(preview(&p("a.txt"), &content), "--- a.txt ---\nred    x");
    }

    #[test]
    fn media_preview_shows_url() {
        let content = PreviewContent::Video {
            url: "http://h/api/download/v.mp4".to_string(),
            mime: "video/mp4".to_string(),
        };
        assert!(preview(&p("v.mp4"), &content).ends_with("video (video/mp4): http://h/api/download/v.mp4"));
    }

    #[test]
    fn notification_tags() {
        assert_eq!(notification("Folder created", Severity::Success), "[ ok ] Folder created");
        assert_eq!(notification("boom", Severity::Error), "[fail] boom");
    }

    #[test]
    fn info_lists_fields() {
        let meta = FileInfo {
            name: "a.png".to_string(),
            path: p("pics/a.png"),
            is_dir: false,
            size: 2048,
            modified: "m".to_string(),
            created: "c".to_string(),
            mime_type: Some("image/png".to_string()),
        };
        let text = info(&meta);
        assert!(text.contains("size:     2 KB (2048 bytes)"));
        assert!(text.contains("mime:     image/png"));
    }

    #[test]
    fn strip_control_osc_and_bell() {
        assert_eq!(strip_control("\x1b]0;title\x07ok\u{7}"), "ok");
    }
}
