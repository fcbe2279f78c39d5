use ratatui::prelude::Rect;

use crate::actions::AppAction;
use crate::constants::{ICON_SPACING_X, ICON_SPACING_Y, ICON_START_X, ICON_START_Y};
use crate::layout::rect_contains;
use crate::theme;
use crate::ui::UiFrame;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesktopIcon {
    pub label: String,
    pub action: AppAction,
    pub art: [&'static str; 3],
}

impl DesktopIcon {
    fn new(label: &str, action: AppAction, art: [&'static str; 3]) -> Self {
        Self {
            label: label.to_string(),
            action,
            art,
        }
    }

    fn width(&self) -> u16 {
        self.art
            .iter()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(8) as u16
    }
}

/// Launcher icons drawn on the desktop background, laid out top to bottom
/// and wrapping into a new column when the workspace runs out of rows.
#[derive(Debug, Clone)]
pub struct DesktopIcons {
    icons: Vec<DesktopIcon>,
    selected: Option<usize>,
}

impl DesktopIcons {
    pub fn new(icons: Vec<DesktopIcon>) -> Self {
        Self {
            icons,
            selected: None,
        }
    }

    pub fn defaults(ascii: bool) -> Self {
        let icons = if ascii {
            vec![
                DesktopIcon::new("Files", AppAction::Files, ["+--+", "|##|", "+--+"]),
                DesktopIcon::new("Notepad", AppAction::NewWindow, ["+--+", "|==|", "+--+"]),
                DesktopIcon::new("Logs", AppAction::LogViewer, ["+--+", "|::|", "+--+"]),
                DesktopIcon::new("About", AppAction::About, ["+--+", "| ?|", "+--+"]),
            ]
        } else {
            vec![
                DesktopIcon::new("Files", AppAction::Files, ["┌──┐", "│▒▒│", "└──┘"]),
                DesktopIcon::new("Notepad", AppAction::NewWindow, ["╔══╗", "║≡≡║", "╚══╝"]),
                DesktopIcon::new("Logs", AppAction::LogViewer, ["┌──┐", "│░░│", "└──┘"]),
                DesktopIcon::new("About", AppAction::About, ["╭──╮", "│ ?│", "╰──╯"]),
            ]
        };
        Self::new(icons)
    }

    pub fn len(&self) -> usize {
        self.icons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&DesktopIcon> {
        self.icons.get(index)
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn select(&mut self, index: Option<usize>) {
        self.selected = index.filter(|i| *i < self.icons.len());
    }

    /// Top-left cell of icon `index` on a terminal `height` rows tall.
    pub fn position(&self, index: usize, height: u16) -> (u16, u16) {
        let per_column = (height.saturating_sub(3).saturating_sub(ICON_START_Y) / ICON_SPACING_Y)
            .max(1) as usize;
        let column = (index / per_column) as u16;
        let row = (index % per_column) as u16;
        (
            ICON_START_X + column * ICON_SPACING_X,
            ICON_START_Y + row * ICON_SPACING_Y,
        )
    }

    /// Art plus label row.
    pub fn bounds(&self, index: usize, height: u16) -> Option<Rect> {
        let icon = self.icons.get(index)?;
        let (x, y) = self.position(index, height);
        Some(Rect::new(x, y, icon.width(), icon.art.len() as u16 + 1))
    }

    pub fn icon_at(&self, column: u16, row: u16, height: u16) -> Option<usize> {
        (0..self.icons.len()).find(|i| {
            self.bounds(*i, height)
                .is_some_and(|r| rect_contains(r, column, row))
        })
    }

    pub fn render(&self, frame: &mut UiFrame<'_>) {
        let height = frame.area().height;
        for (index, icon) in self.icons.iter().enumerate() {
            let (x, y) = self.position(index, height);
            if y + 3 >= height.saturating_sub(1) {
                continue;
            }
            let style = theme::icon_style(self.selected == Some(index));
            for (row, line) in icon.art.iter().enumerate() {
                frame.set_string(x, y + row as u16, line, style);
            }
            let width = icon.width() as usize;
            let label = format!("{:^width$}", icon.label);
            frame.set_string(x, y + 3, &label, style);
        }
    }
}
