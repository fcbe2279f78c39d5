use ratatui::prelude::Rect;
use ratatui::style::Modifier;

use crate::constants::TASKBAR_TITLE_CHARS;
use crate::layout::rect_contains;
use crate::theme;
use crate::ui::{UiFrame, truncate_to_width};
use crate::window::WindowId;

/// One `[title]` button per minimized window, left to right from column 1.
/// Buttons that would run into the right edge are left off.
#[derive(Debug, Default)]
pub struct Taskbar {
    entries: Vec<(WindowId, String)>,
}

impl Taskbar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_entries<'a>(&mut self, entries: impl IntoIterator<Item = (WindowId, &'a str)>) {
        self.entries = entries
            .into_iter()
            .map(|(id, title)| (id, truncate_to_width(title, TASKBAR_TITLE_CHARS)))
            .collect();
    }

    /// Button rectangles on `row`, clipped to `width` columns.
    pub fn buttons(&self, row: u16, width: u16) -> Vec<(WindowId, Rect)> {
        let mut x: u16 = 1;
        let mut out = Vec::new();
        for (id, label) in &self.entries {
            let w = label.chars().count() as u16 + 2;
            if x + w >= width.saturating_sub(1) {
                break;
            }
            out.push((*id, Rect::new(x, row, w, 1)));
            x += w + 1;
        }
        out
    }

    pub fn hit(&self, row: u16, width: u16, column: u16, at_row: u16) -> Option<WindowId> {
        self.buttons(row, width)
            .into_iter()
            .find(|(_, rect)| rect_contains(*rect, column, at_row))
            .map(|(id, _)| id)
    }
}

impl super::Component for Taskbar {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect) {
        if self.entries.is_empty() || area.height == 0 {
            return;
        }
        let style = theme::style(theme::taskbar_fg(), theme::taskbar_bg());
        frame.fill(Rect::new(area.x, area.y, area.width, 1), " ", style);
        let buttons = self.buttons(area.y, area.width);
        for ((_, rect), (_, label)) in buttons.iter().zip(&self.entries) {
            frame.set_string(
                rect.x,
                rect.y,
                &format!("[{label}]"),
                style.add_modifier(Modifier::BOLD),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buttons_truncate_titles_and_pack_left() {
        let mut bar = Taskbar::new();
        bar.set_entries([
            (WindowId::new(1), "Notes"),
            (WindowId::new(2), "A very long window title"),
        ]);
        let buttons = bar.buttons(22, 80);
        assert_eq!(buttons[0].1, Rect::new(1, 22, 7, 1));
        assert_eq!(buttons[1].1, Rect::new(9, 22, 17, 1));
        assert_eq!(bar.hit(22, 80, 10, 22), Some(WindowId::new(2)));
        assert_eq!(bar.hit(22, 80, 8, 22), None);
    }

    #[test]
    fn narrow_terminal_drops_overflowing_buttons() {
        let mut bar = Taskbar::new();
        bar.set_entries([(WindowId::new(1), "abcdefgh"), (WindowId::new(2), "ijk")]);
        assert_eq!(bar.buttons(0, 14).len(), 1);
    }
}
