use std::fs;
use std::path::{Path, PathBuf};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton};
use ratatui::prelude::Rect;

use crate::actions::{ActionResult, AppAction};
use crate::components::{Menu, MenuItem};
use crate::theme;
use crate::ui::UiFrame;
use crate::window::{
    BodyPoint, Document, DropTarget, MenuHost, ScrollDirection, WindowApp, WindowContext,
};

/// Plain text editor: one cursor, no selection.
#[derive(Debug)]
pub struct NoteWindow {
    path: Option<PathBuf>,
    lines: Vec<String>,
    /// Cursor position as (line, char index).
    cursor: (usize, usize),
    top: usize,
    modified: bool,
}

impl Default for NoteWindow {
    fn default() -> Self {
        Self::new()
    }
}

impl NoteWindow {
    pub fn new() -> Self {
        Self {
            path: None,
            lines: vec![String::new()],
            cursor: (0, 0),
            top: 0,
            modified: false,
        }
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn cursor(&self) -> (usize, usize) {
        self.cursor
    }

    fn line_len(&self, line: usize) -> usize {
        self.lines.get(line).map_or(0, |l| l.chars().count())
    }

    fn byte_index(line: &str, col: usize) -> usize {
        line.char_indices().nth(col).map_or(line.len(), |(i, _)| i)
    }

    pub fn insert_text(&mut self, text: &str) {
        let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
        for ch in normalized.chars() {
            if ch == '\n' {
                self.newline();
            } else {
                self.insert_char(ch);
            }
        }
    }

    fn insert_char(&mut self, ch: char) {
        let (line, col) = self.cursor;
        if let Some(text) = self.lines.get_mut(line) {
            let at = Self::byte_index(text, col);
            text.insert(at, ch);
            self.cursor.1 += 1;
            self.modified = true;
        }
    }

    fn newline(&mut self) {
        let (line, col) = self.cursor;
        let Some(text) = self.lines.get_mut(line) else {
            return;
        };
        let at = Self::byte_index(text, col);
        let rest = text.split_off(at);
        self.lines.insert(line + 1, rest);
        self.cursor = (line + 1, 0);
        self.modified = true;
    }

    fn backspace(&mut self) {
        let (line, col) = self.cursor;
        if col > 0 {
            if let Some(text) = self.lines.get_mut(line) {
                let at = Self::byte_index(text, col - 1);
                text.remove(at);
                self.cursor.1 -= 1;
                self.modified = true;
            }
        } else if line > 0 {
            let tail = self.lines.remove(line);
            let prev_len = self.line_len(line - 1);
            if let Some(prev) = self.lines.get_mut(line - 1) {
                prev.push_str(&tail);
            }
            self.cursor = (line - 1, prev_len);
            self.modified = true;
        }
    }

    fn move_cursor(&mut self, code: KeyCode) {
        let (line, col) = self.cursor;
        self.cursor = match code {
            KeyCode::Left if col > 0 => (line, col - 1),
            KeyCode::Left if line > 0 => (line - 1, self.line_len(line - 1)),
            KeyCode::Right if col < self.line_len(line) => (line, col + 1),
            KeyCode::Right if line + 1 < self.lines.len() => (line + 1, 0),
            KeyCode::Up if line > 0 => (line - 1, col.min(self.line_len(line - 1))),
            KeyCode::Down if line + 1 < self.lines.len() => {
                (line + 1, col.min(self.line_len(line + 1)))
            }
            KeyCode::Home => (line, 0),
            KeyCode::End => (line, self.line_len(line)),
            _ => (line, col),
        };
    }

    fn load(&mut self, path: PathBuf) -> Option<ActionResult> {
        match fs::read(&path) {
            Ok(bytes) => {
                let text = String::from_utf8_lossy(&bytes);
                self.lines = text.split('\n').map(str::to_string).collect();
                self.cursor = (0, 0);
                self.top = 0;
                self.modified = false;
                self.path = Some(path);
                None
            }
            Err(err) => Some(ActionResult::error(format!(
                "Cannot open {}:\n{err}",
                path.display()
            ))),
        }
    }

    fn save(&mut self) -> Option<ActionResult> {
        let Some(path) = self.path.clone() else {
            return Some(ActionResult::RequestSaveAs);
        };
        match fs::write(&path, self.text()) {
            Ok(()) => {
                tracing::info!(path = %path.display(), "note saved");
                self.modified = false;
                None
            }
            Err(err) => Some(ActionResult::SaveError(err.to_string())),
        }
    }

    fn keep_cursor_visible(&mut self, height: usize) {
        let line = self.cursor.0;
        if line < self.top {
            self.top = line;
        } else if height > 0 && line >= self.top + height {
            self.top = line + 1 - height;
        }
    }
}

impl WindowApp for NoteWindow {
    fn render(&mut self, frame: &mut UiFrame<'_>, body: Rect, focused: bool) {
        if body.height < 2 {
            return;
        }
        let text_rows = body.height as usize - 1;
        self.keep_cursor_visible(text_rows);
        let style = theme::style(theme::window_body_fg(), theme::window_body_bg());
        for (row, line) in self.lines.iter().skip(self.top).take(text_rows).enumerate() {
            let visible: String = line.chars().take(body.width as usize).collect();
            frame.set_string(body.x, body.y + row as u16, &visible, style);
        }
        if focused {
            let (line, col) = self.cursor;
            let x = body.x + (col as u16).min(body.width.saturating_sub(1));
            let y = body.y + (line - self.top) as u16;
            frame.restyle(Rect::new(x, y, 1, 1), theme::menu_style(true));
        }
        let name = self
            .path
            .as_ref()
            .and_then(|p| p.file_name())
            .map_or_else(|| "Untitled".to_string(), |n| n.to_string_lossy().into_owned());
        let status = format!(
            " {name}{} | Ln {}, Col {}",
            if self.modified { " *" } else { "" },
            self.cursor.0 + 1,
            self.cursor.1 + 1
        );
        let status: String = status.chars().take(body.width as usize).collect();
        let status_y = body.y + body.height - 1;
        frame.fill(
            Rect::new(body.x, status_y, body.width, 1),
            " ",
            theme::style(theme::status_fg(), theme::status_bg()),
        );
        frame.set_string(
            body.x,
            status_y,
            &status,
            theme::style(theme::status_fg(), theme::status_bg()),
        );
    }

    fn handle_key(&mut self, key: &KeyEvent, ctx: &mut WindowContext<'_>) -> Option<ActionResult> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('s') if ctrl => return self.save(),
            KeyCode::Char('o') if ctrl => return Some(ActionResult::RequestOpenPath),
            KeyCode::Char('c') if ctrl => {
                if let Some(line) = self.lines.get(self.cursor.0) {
                    ctx.clipboard.copy(line.clone());
                }
            }
            KeyCode::Char('v') if ctrl => {
                if let Some(text) = ctx.clipboard.paste() {
                    self.insert_text(&text);
                }
            }
            KeyCode::Char(ch) if !ctrl => self.insert_char(ch),
            KeyCode::Enter => self.newline(),
            KeyCode::Backspace => self.backspace(),
            KeyCode::Tab => self.insert_text("    "),
            code => self.move_cursor(code),
        }
        None
    }

    fn handle_click(
        &mut self,
        at: BodyPoint,
        button: MouseButton,
        _ctx: &mut WindowContext<'_>,
    ) -> Option<ActionResult> {
        if button != MouseButton::Left {
            return None;
        }
        let line = (self.top + at.row as usize).min(self.lines.len().saturating_sub(1));
        self.cursor = (line, (at.column as usize).min(self.line_len(line)));
        None
    }

    fn handle_scroll(&mut self, direction: ScrollDirection, steps: u16) {
        let steps = steps as usize;
        let last = self.lines.len().saturating_sub(1);
        let line = match direction {
            ScrollDirection::Up => self.cursor.0.saturating_sub(steps),
            ScrollDirection::Down => (self.cursor.0 + steps).min(last),
        };
        self.cursor = (line, self.cursor.1.min(self.line_len(line)));
    }

    fn menu_host(&mut self) -> Option<&mut dyn MenuHost> {
        Some(self)
    }

    fn document(&mut self) -> Option<&mut dyn Document> {
        Some(self)
    }

    fn drop_target(&mut self) -> Option<&mut dyn DropTarget> {
        Some(self)
    }
}

/// Dropping a file onto a note loads it.
impl DropTarget for NoteWindow {
    fn accept_dropped_path(&mut self, path: &Path) -> Option<ActionResult> {
        self.load(path.to_path_buf())
    }
}

impl MenuHost for NoteWindow {
    fn menus(&self) -> Vec<Menu<String>> {
        let item = |label: &str, command: &str| MenuItem::new(label, command.to_string());
        vec![
            Menu::new(
                "File",
                vec![
                    item("New", "new"),
                    item("Open...  Ctrl+O", "open"),
                    item("Save     Ctrl+S", "save"),
                    item("Save As...", "save_as"),
                    MenuItem::separator(),
                    item("Close", "close"),
                ],
            ),
            Menu::new(
                "Edit",
                vec![
                    item("Copy Line  Ctrl+C", "copy_line"),
                    item("Paste      Ctrl+V", "paste"),
                ],
            ),
        ]
    }

    fn on_menu_command(
        &mut self,
        command: &str,
        ctx: &mut WindowContext<'_>,
    ) -> Option<ActionResult> {
        match command {
            "new" => Some(ActionResult::Execute(AppAction::NewWindow)),
            "open" => Some(ActionResult::RequestOpenPath),
            "save" => self.save(),
            "save_as" => Some(ActionResult::RequestSaveAs),
            "close" => Some(ActionResult::Execute(AppAction::CloseWindow)),
            "copy_line" => {
                if let Some(line) = self.lines.get(self.cursor.0) {
                    ctx.clipboard.copy(line.clone());
                }
                None
            }
            "paste" => {
                if let Some(text) = ctx.clipboard.paste() {
                    self.insert_text(&text);
                }
                None
            }
            other => {
                tracing::debug!(command = other, "unknown note command");
                None
            }
        }
    }
}

impl Document for NoteWindow {
    fn save_as(&mut self, name: &str) -> Option<ActionResult> {
        self.path = Some(PathBuf::from(name));
        self.save()
    }

    fn open_path(&mut self, path: &str) -> Option<ActionResult> {
        let path = path.trim();
        if path.is_empty() {
            return None;
        }
        self.load(PathBuf::from(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::Clipboard;
    use crate::config::DesktopConfig;

    fn press(note: &mut NoteWindow, code: KeyCode) -> Option<ActionResult> {
        let mut clipboard = Clipboard::new(false);
        let config = DesktopConfig::default();
        let mut ctx = WindowContext {
            clipboard: &mut clipboard,
            config: &config,
        };
        note.handle_key(&KeyEvent::new(code, KeyModifiers::NONE), &mut ctx)
    }

    #[test]
    fn typing_and_newlines_edit_buffer() {
        let mut note = NoteWindow::new();
        note.insert_text("ab\ncd");
        press(&mut note, KeyCode::Backspace);
        assert_eq!(note.text(), "ab\nc");
        press(&mut note, KeyCode::Home);
        press(&mut note, KeyCode::Backspace);
        assert_eq!(note.text(), "abc");
        assert_eq!(note.cursor(), (0, 2));
    }

    #[test]
    fn save_without_path_requests_save_as() {
        let mut note = NoteWindow::new();
        assert_eq!(note.save(), Some(ActionResult::RequestSaveAs));
    }

    #[test]
    fn save_as_writes_and_open_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("note.txt");
        let mut note = NoteWindow::new();
        note.insert_text("hello\nworld");
        assert_eq!(note.save_as(path.to_str().unwrap()), None);
        assert!(!note.is_modified());

        let mut other = NoteWindow::new();
        assert_eq!(other.open_path(path.to_str().unwrap()), None);
        assert_eq!(other.text(), "hello\nworld");
    }

    #[test]
    fn save_into_missing_directory_is_save_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing/note.txt");
        let mut note = NoteWindow::new();
        let result = note.save_as(path.to_str().unwrap());
        assert!(matches!(result, Some(ActionResult::SaveError(_))));
    }

    #[test]
    fn menu_close_asks_desktop() {
        let mut note = NoteWindow::new();
        let mut clipboard = Clipboard::new(false);
        let config = DesktopConfig::default();
        let mut ctx = WindowContext {
            clipboard: &mut clipboard,
            config: &config,
        };
        assert_eq!(
            note.on_menu_command("close", &mut ctx),
            Some(ActionResult::Execute(AppAction::CloseWindow))
        );
    }
}
