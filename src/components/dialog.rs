//! Modal dialogs: messages, single-line text input and progress readouts.
//!
//! Layout is recomputed from the terminal area whenever it is needed, so a
//! click can be hit-tested without the dialog having been drawn first.
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::prelude::Rect;
use ratatui::style::{Modifier, Style};

use crate::actions::ActionResult;
use crate::constants::EXIT_DIALOG_TITLE;
use crate::desktop::Desktop;
use crate::keybindings::{Action, KeyBindings};
use crate::layout::{centered_rect, rect_contains};
use crate::theme;
use crate::ui::{UiFrame, fit_to_width, wrap_words};

const SPINNER: [char; 4] = ['|', '/', '-', '\\'];

/// Runs when button 0 resolves the dialog. Input dialogs pass their text.
pub type DialogCallback = Box<dyn FnOnce(&mut Desktop, Option<String>) -> Option<ActionResult>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DialogId(u64);

impl DialogId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum DialogKind {
    Message,
    Input { value: String, cursor: usize },
    Progress { elapsed: Duration },
}

/// Screen geometry of a dialog for a given terminal area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogLayout {
    pub rect: Rect,
    pub buttons: Vec<Rect>,
    pub input: Option<Rect>,
}

pub struct Dialog {
    id: DialogId,
    title: String,
    lines: Vec<String>,
    buttons: Vec<String>,
    selected: usize,
    width: u16,
    kind: DialogKind,
    callback: Option<DialogCallback>,
}

impl fmt::Debug for Dialog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dialog")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("buttons", &self.buttons)
            .field("selected", &self.selected)
            .field("kind", &self.kind)
            .field("has_callback", &self.callback.is_some())
            .finish()
    }
}

impl Dialog {
    /// A message dialog. An empty button list gets a single "OK".
    pub fn new(title: impl Into<String>, message: &str, buttons: &[&str], width: u16) -> Self {
        let title = title.into();
        let width = width.max(title.chars().count() as u16 + 8);
        let lines = wrap_words(message, width.saturating_sub(6) as usize);
        let buttons = if buttons.is_empty() {
            vec!["OK".to_string()]
        } else {
            buttons.iter().map(|b| b.to_string()).collect()
        };
        Self {
            id: DialogId::next(),
            title,
            lines,
            buttons,
            selected: 0,
            width,
            kind: DialogKind::Message,
            callback: None,
        }
    }

    pub fn message(title: impl Into<String>, message: &str) -> Self {
        Self::new(title, message, &["OK"], 50)
    }

    /// OK/Cancel dialog with a text field pre-filled with `initial`.
    pub fn input(title: impl Into<String>, prompt: &str, initial: &str, width: u16) -> Self {
        let mut dialog = Self::new(title, prompt, &["OK", "Cancel"], width);
        dialog.kind = DialogKind::Input {
            value: initial.to_string(),
            cursor: initial.chars().count(),
        };
        dialog
    }

    /// Button-less dialog showing elapsed time while a background job runs.
    pub fn progress(title: impl Into<String>, message: &str, width: u16) -> Self {
        let mut dialog = Self::new(title, message, &["OK"], width);
        dialog.buttons.clear();
        dialog.kind = DialogKind::Progress {
            elapsed: Duration::ZERO,
        };
        dialog
    }

    pub fn with_callback<F>(mut self, callback: F) -> Self
    where
        F: FnOnce(&mut Desktop, Option<String>) -> Option<ActionResult> + 'static,
    {
        self.callback = Some(Box::new(callback));
        self
    }

    pub fn id(&self) -> DialogId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn buttons(&self) -> &[String] {
        &self.buttons
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        let extra = match self.kind {
            DialogKind::Input { .. } => 2,
            _ => 0,
        };
        self.lines.len() as u16 + 7 + extra
    }

    pub fn is_input(&self) -> bool {
        matches!(self.kind, DialogKind::Input { .. })
    }

    pub fn is_progress(&self) -> bool {
        matches!(self.kind, DialogKind::Progress { .. })
    }

    /// The confirmation that ends the session when answered "Yes".
    pub fn is_exit_confirm(&self) -> bool {
        self.title == EXIT_DIALOG_TITLE
    }

    pub fn value(&self) -> Option<&str> {
        match &self.kind {
            DialogKind::Input { value, .. } => Some(value),
            _ => None,
        }
    }

    pub fn set_elapsed(&mut self, elapsed: Duration) {
        if let DialogKind::Progress { elapsed: e } = &mut self.kind {
            *e = elapsed;
        }
    }

    pub fn elapsed(&self) -> Option<Duration> {
        match self.kind {
            DialogKind::Progress { elapsed } => Some(elapsed),
            _ => None,
        }
    }

    pub(crate) fn take_callback(&mut self) -> Option<DialogCallback> {
        self.callback.take()
    }

    /// Insert text at the cursor of an input dialog (typing or paste).
    pub fn insert_text(&mut self, text: &str) {
        let DialogKind::Input { value, cursor } = &mut self.kind else {
            return;
        };
        for ch in text.chars().filter(|c| !c.is_control()) {
            let at = byte_index(value, *cursor);
            value.insert(at, ch);
            *cursor += 1;
        }
    }

    pub fn layout(&self, area: Rect) -> DialogLayout {
        let rect = centered_rect(area, self.width, self.height());
        let button_row = rect.y + rect.height.saturating_sub(3);
        let widths: Vec<u16> = self
            .buttons
            .iter()
            .map(|b| b.chars().count() as u16 + 4)
            .collect();
        let total: u16 = widths.iter().sum::<u16>() + 2 * widths.len().saturating_sub(1) as u16;
        let mut x = rect.x + rect.width.saturating_sub(total) / 2;
        let buttons = widths
            .iter()
            .map(|w| {
                let button = Rect::new(x, button_row, *w, 1);
                x += w + 2;
                button
            })
            .collect();
        let input = self.is_input().then(|| Rect {
            x: rect.x + 3,
            y: rect.y + 3 + self.lines.len() as u16,
            width: rect.width.saturating_sub(6),
            height: 1,
        });
        DialogLayout {
            rect,
            buttons,
            input,
        }
    }

    /// Button index under the pointer.
    pub fn handle_click(&self, area: Rect, column: u16, row: u16) -> Option<usize> {
        self.layout(area)
            .buttons
            .iter()
            .position(|b| rect_contains(*b, column, row))
    }

    /// Returns the resolved button index, if the key resolves the dialog.
    /// Escape picks the last button, which is conventionally "Cancel".
    pub fn handle_key(&mut self, key: &KeyEvent, bindings: &KeyBindings) -> Option<usize> {
        if self.buttons.is_empty() {
            return None;
        }
        let count = self.buttons.len();
        if bindings.matches(Action::DialogAccept, key) {
            return Some(self.selected);
        }
        if bindings.matches(Action::DialogCancel, key) {
            return Some(count - 1);
        }
        if bindings.matches(Action::DialogNext, key) {
            self.selected = (self.selected + 1) % count;
            return None;
        }
        if self.edit_input(key) {
            return None;
        }
        if bindings.matches(Action::DialogLeft, key) {
            self.selected = (self.selected + count - 1) % count;
        } else if bindings.matches(Action::DialogRight, key) {
            self.selected = (self.selected + 1) % count;
        }
        None
    }

    /// Line editing for input dialogs; Left/Right move the caret there.
    fn edit_input(&mut self, key: &KeyEvent) -> bool {
        let DialogKind::Input { value, cursor } = &mut self.kind else {
            return false;
        };
        let len = value.chars().count();
        match key.code {
            KeyCode::Char(ch)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                let at = byte_index(value, *cursor);
                value.insert(at, ch);
                *cursor += 1;
            }
            KeyCode::Backspace if *cursor > 0 => {
                *cursor -= 1;
                let at = byte_index(value, *cursor);
                value.remove(at);
            }
            KeyCode::Delete if *cursor < len => {
                let at = byte_index(value, *cursor);
                value.remove(at);
            }
            KeyCode::Left => *cursor = cursor.saturating_sub(1),
            KeyCode::Right => *cursor = (*cursor + 1).min(len),
            KeyCode::Home => *cursor = 0,
            KeyCode::End => *cursor = len,
            KeyCode::Backspace | KeyCode::Delete => {}
            _ => return false,
        }
        true
    }

    pub fn render(&self, frame: &mut UiFrame<'_>) {
        let layout = self.layout(frame.area());
        let rect = layout.rect;
        let body = theme::style(theme::dialog_fg(), theme::dialog_bg());
        let title_style = theme::style(theme::window_title_fg(), theme::window_title_bg())
            .add_modifier(Modifier::BOLD);

        let shadow = Rect::new(rect.x + 2, rect.y + 1, rect.width, rect.height);
        frame.restyle(shadow, Style::default().add_modifier(Modifier::DIM));
        frame.fill(rect, " ", body);
        frame.draw_box(rect, body, true);
        let title = fit_to_width(
            &format!(" {} ", self.title),
            rect.width.saturating_sub(2) as usize,
        );
        frame.set_string(rect.x + 1, rect.y, &title, title_style);

        for (i, line) in self.lines.iter().enumerate() {
            frame.set_string(rect.x + 3, rect.y + 2 + i as u16, line, body);
        }

        match &self.kind {
            DialogKind::Input { value, cursor } => {
                if let Some(field) = layout.input {
                    self.render_input(frame, field, value, *cursor);
                }
            }
            DialogKind::Progress { elapsed } => {
                let spin = SPINNER[(elapsed.as_millis() / 250) as usize % SPINNER.len()];
                let text = format!("{spin} Elapsed: {:.1}s", elapsed.as_secs_f32());
                frame.set_string(
                    rect.x + 3,
                    rect.y + rect.height.saturating_sub(3),
                    &text,
                    body,
                );
            }
            DialogKind::Message => {}
        }

        for (i, (button, label)) in layout.buttons.iter().zip(&self.buttons).enumerate() {
            let selected = i == self.selected;
            let text = if selected {
                format!("▸ {label} ◂")
            } else {
                format!("[ {label} ]")
            };
            frame.set_string(button.x, button.y, &text, theme::button_style(selected));
        }
    }

    fn render_input(&self, frame: &mut UiFrame<'_>, field: Rect, value: &str, cursor: usize) {
        let style = theme::style(theme::window_body_fg(), theme::window_body_bg());
        let width = field.width as usize;
        let start = cursor.saturating_sub(width.saturating_sub(1));
        let visible: String = value.chars().skip(start).take(width).collect();
        frame.fill(field, " ", style);
        frame.set_string(field.x, field.y, &visible, style);
        let caret = Rect::new(field.x + (cursor - start) as u16, field.y, 1, 1);
        frame.restyle(caret, style.add_modifier(Modifier::REVERSED));
    }
}

fn byte_index(value: &str, char_index: usize) -> usize {
    value
        .char_indices()
        .nth(char_index)
        .map(|(i, _)| i)
        .unwrap_or(value.len())
}
