use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crossterm::event::KeyEvent;
use ratatui::prelude::Rect;
use thiserror::Error;

use crate::actions::ActionResult;
use crate::components::{ScrollState, render_lines};
use crate::keybindings::{Action, KeyBindings};
use crate::theme;
use crate::ui::UiFrame;
use crate::window::{ScrollDirection, WindowApp, WindowContext};

/// Bytes inspected when sniffing for binary content.
const SNIFF_BYTES: usize = 1024;

#[derive(Debug, Error)]
pub enum OpenError {
    #[error("binary file")]
    Binary,
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Read-only, scrollable view of a text file.
#[derive(Debug)]
pub struct TextViewer {
    path: PathBuf,
    lines: Vec<String>,
    scroll: ScrollState,
    bindings: KeyBindings,
}

impl TextViewer {
    /// A NUL byte within the first KiB marks the file as binary.
    pub fn open(path: &Path) -> Result<Self, OpenError> {
        let bytes = fs::read(path)?;
        if bytes.iter().take(SNIFF_BYTES).any(|b| *b == 0) {
            return Err(OpenError::Binary);
        }
        let text = String::from_utf8_lossy(&bytes);
        Ok(Self::from_text(path, &text))
    }

    pub fn from_text(path: &Path, text: &str) -> Self {
        let lines = text
            .lines()
            .map(|line| line.replace('\t', "    "))
            .collect();
        Self {
            path: path.to_path_buf(),
            lines,
            scroll: ScrollState::default(),
            bindings: KeyBindings::default(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }
}

impl WindowApp for TextViewer {
    fn render(&mut self, frame: &mut UiFrame<'_>, body: Rect, _focused: bool) {
        let style = theme::style(theme::window_body_fg(), theme::window_body_bg());
        render_lines(frame, body, &self.lines, &mut self.scroll, style);
    }

    fn handle_key(&mut self, key: &KeyEvent, _ctx: &mut WindowContext<'_>) -> Option<ActionResult> {
        scroll_for_key(&self.bindings, key, &mut self.scroll);
        None
    }

    fn handle_scroll(&mut self, direction: ScrollDirection, steps: u16) {
        let delta = steps as isize;
        match direction {
            ScrollDirection::Up => self.scroll.bump(-delta),
            ScrollDirection::Down => self.scroll.bump(delta),
        }
    }

    fn refresh(&mut self) {
        match fs::read(&self.path) {
            Ok(bytes) => {
                let text = String::from_utf8_lossy(&bytes);
                self.lines = text.lines().map(|l| l.replace('\t', "    ")).collect();
            }
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "reload failed");
            }
        }
    }
}

/// Shared scroll key handling for read-only views. Returns `true` when the
/// key moved the view.
pub(crate) fn scroll_for_key(bindings: &KeyBindings, key: &KeyEvent, scroll: &mut ScrollState) -> bool {
    const PAGE: isize = 10;
    if bindings.matches(Action::ScrollUp, key) {
        scroll.bump(-1);
    } else if bindings.matches(Action::ScrollDown, key) {
        scroll.bump(1);
    } else if bindings.matches(Action::ScrollPageUp, key) {
        scroll.bump(-PAGE);
    } else if bindings.matches(Action::ScrollPageDown, key) {
        scroll.bump(PAGE);
    } else {
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nul_byte_in_first_kib_is_binary() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blob.bin");
        fs::write(&path, b"abc\0def").unwrap();
        assert!(matches!(TextViewer::open(&path), Err(OpenError::Binary)));
    }

    #[test]
    fn nul_after_first_kib_is_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("late.txt");
        let mut bytes = vec![b'a'; SNIFF_BYTES];
        bytes.push(0);
        fs::write(&path, &bytes).unwrap();
        assert!(TextViewer::open(&path).is_ok());
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = TextViewer::open(&dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, OpenError::Io(_)));
    }

    #[test]
    fn tabs_expand_to_spaces() {
        let viewer = TextViewer::from_text(Path::new("t"), "a\tb\nc");
        assert_eq!(viewer.line_count(), 2);
        assert_eq!(viewer.lines[0], "a    b");
    }
}
