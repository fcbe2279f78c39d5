use ratatui::prelude::Rect;
use ratatui::style::{Modifier, Style};

use crate::constants::{MIN_BUTTON_OFFSET, TITLE_CONTROLS, TITLE_CONTROLS_ASCII};
use crate::theme;
use crate::ui::UiFrame;

use super::Window;

pub trait WindowDecorator: std::fmt::Debug {
    /// Draw the frame, title row, window menu row and an empty body.
    fn render_window(&self, frame: &mut UiFrame<'_>, window: &Window);
}

/// Double-line frame, title on the top border, `[─][□][×]` controls on the
/// right of the focused window.
#[derive(Debug, Default)]
pub struct RetroDecorator {
    ascii: bool,
}

impl RetroDecorator {
    pub fn new(ascii: bool) -> Self {
        Self { ascii }
    }

    pub fn set_ascii(&mut self, ascii: bool) {
        self.ascii = ascii;
    }

    fn styles(window: &Window) -> (Style, Style, Style) {
        let (mut border, mut title, body) = if window.is_active() {
            (
                theme::style(theme::window_border(), theme::window_title_bg()),
                theme::style(theme::window_title_fg(), theme::window_title_bg())
                    .add_modifier(Modifier::BOLD),
                theme::style(theme::window_body_fg(), theme::window_body_bg()),
            )
        } else {
            let inactive = theme::style(theme::window_inactive_fg(), theme::window_body_bg());
            (inactive, inactive, inactive)
        };
        if window.drop_highlighted() {
            border = theme::drop_highlight(border);
            title = theme::drop_highlight(title);
        }
        (border, title, body)
    }
}

impl WindowDecorator for RetroDecorator {
    fn render_window(&self, frame: &mut UiFrame<'_>, window: &Window) {
        let rect = window.rect();
        if !window.is_visible() || rect.width < 2 || rect.height < 2 {
            return;
        }
        let (border, title_style, body) = Self::styles(window);

        frame.draw_box(rect, border, !self.ascii);
        frame.fill(window.body_rect(), " ", body);

        let title = if window.is_active() && window.menu().is_some() {
            format!(" ≡ {} ", window.title())
        } else {
            format!(" {} ", window.title())
        };
        let room = rect.width.saturating_sub(MIN_BUTTON_OFFSET + 2) as usize;
        let title = crate::ui::truncate_to_width(&title, room);
        frame.set_string(rect.x.saturating_add(2), rect.y, &title, title_style);

        if window.is_active() && rect.width > MIN_BUTTON_OFFSET {
            let controls = if self.ascii {
                TITLE_CONTROLS_ASCII
            } else {
                TITLE_CONTROLS
            };
            let controls_style = theme::style(theme::window_title_bg(), theme::window_title_fg());
            frame.set_string(
                rect.x + rect.width - MIN_BUTTON_OFFSET,
                rect.y,
                controls,
                controls_style,
            );
        }

        if let Some(menu) = window.menu() {
            let inner = Rect {
                x: rect.x.saturating_add(1),
                y: rect.y.saturating_add(1),
                width: rect.width.saturating_sub(2),
                height: 1,
            };
            frame.fill(inner, " ", theme::menu_style(false));
            menu.render_bar(frame, window.menu_anchor(), window.is_active());
            let separator_row = rect.y.saturating_add(2);
            if separator_row < rect.y + rect.height - 1 {
                let (left, right, fill) = if self.ascii {
                    ("+", "+", "-")
                } else {
                    ("╟", "╢", "─")
                };
                let line = format!(
                    "{left}{}{right}",
                    fill.repeat(rect.width.saturating_sub(2) as usize)
                );
                frame.set_string(rect.x, separator_row, &line, border);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::test_support::window;
    use ratatui::buffer::Buffer;

    fn symbol(buf: &Buffer, x: u16, y: u16) -> &str {
        buf.cell((x, y)).map(|c| c.symbol()).unwrap_or("")
    }

    #[test]
    fn active_window_shows_controls() {
        let area = Rect::new(0, 0, 60, 20);
        let mut buf = Buffer::empty(area);
        let mut frame = UiFrame::from_parts(area, &mut buf);
        let mut w = window(1, Rect::new(5, 3, 30, 8));
        w.set_active_flag(true);
        RetroDecorator::new(false).render_window(&mut frame, &w);
        assert_eq!(symbol(&buf, 5, 3), "╔");
        assert_eq!(symbol(&buf, 34, 10), "╝");
        assert_eq!(symbol(&buf, 25, 3), "[");
        assert_eq!(symbol(&buf, 32, 3), "×");
        assert_eq!(symbol(&buf, 8, 3), "w");
    }

    #[test]
    fn inactive_window_hides_controls() {
        let area = Rect::new(0, 0, 60, 20);
        let mut buf = Buffer::empty(area);
        let mut frame = UiFrame::from_parts(area, &mut buf);
        let w = window(1, Rect::new(5, 3, 30, 8));
        RetroDecorator::new(true).render_window(&mut frame, &w);
        assert_eq!(symbol(&buf, 5, 3), "┌");
        assert_ne!(symbol(&buf, 32, 3), "x");
    }
}
