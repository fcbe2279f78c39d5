use ratatui::prelude::Rect;
use ratatui::style::Style;
use ratatui::widgets::{Scrollbar, ScrollbarOrientation, ScrollbarState};

use crate::ui::UiFrame;

/// Vertical scroll position. Deltas accumulate until the next
/// [`ScrollState::apply`], which clamps against the content that is
/// actually on screen.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScrollState {
    pub offset: usize,
    pending: isize,
}

impl ScrollState {
    pub fn reset(&mut self) {
        self.offset = 0;
        self.pending = 0;
    }

    pub fn bump(&mut self, delta: isize) {
        self.pending = self.pending.saturating_add(delta);
    }

    /// Jump to the last page on the next apply.
    pub fn to_end(&mut self) {
        self.offset = usize::MAX;
        self.pending = 0;
    }

    pub fn apply(&mut self, total: usize, view: usize) {
        let max_offset = total.saturating_sub(view);
        if self.pending != 0 {
            let delta = self.pending;
            self.pending = 0;
            let next = if delta.is_negative() {
                self.offset.saturating_sub(delta.unsigned_abs())
            } else {
                self.offset.saturating_add(delta as usize)
            };
            self.offset = next.min(max_offset);
        } else if self.offset > max_offset {
            self.offset = max_offset;
        }
    }
}

/// Draw `lines` from the scroll offset down, with a scrollbar in the last
/// column when the content overflows.
pub fn render_lines(
    frame: &mut UiFrame<'_>,
    area: Rect,
    lines: &[String],
    scroll: &mut ScrollState,
    style: Style,
) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    let view = area.height as usize;
    scroll.apply(lines.len(), view);
    let overflow = lines.len() > view;
    let text_width = if overflow {
        area.width.saturating_sub(1)
    } else {
        area.width
    } as usize;
    for (row, line) in lines.iter().skip(scroll.offset).take(view).enumerate() {
        let text: String = line.chars().take(text_width).collect();
        frame.set_string(area.x, area.y + row as u16, &text, style);
    }
    render_scrollbar(frame, area, lines.len(), view, scroll.offset);
}

pub fn render_scrollbar(
    frame: &mut UiFrame<'_>,
    area: Rect,
    total: usize,
    view: usize,
    offset: usize,
) {
    if total <= view || view == 0 || area.height == 0 {
        return;
    }
    let content_len = total.saturating_sub(view).saturating_add(1).max(1);
    let mut state = ScrollbarState::new(content_len)
        .position(offset.min(content_len.saturating_sub(1)))
        .viewport_content_length(view.max(1));
    let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight);
    frame.render_stateful_widget(scrollbar, area, &mut state);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::buffer::Buffer;

    #[test]
    fn apply_clamps_pending_delta() {
        let mut s = ScrollState::default();
        s.bump(50);
        s.apply(30, 10);
        assert_eq!(s.offset, 20);
        s.bump(-100);
        s.apply(30, 10);
        assert_eq!(s.offset, 0);
    }

    #[test]
    fn to_end_lands_on_last_page() {
        let mut s = ScrollState::default();
        s.to_end();
        s.apply(25, 10);
        assert_eq!(s.offset, 15);
    }

    #[test]
    fn render_lines_starts_at_offset() {
        let area = Rect::new(0, 0, 10, 2);
        let mut buf = Buffer::empty(area);
        let mut frame = UiFrame::from_parts(area, &mut buf);
        let lines: Vec<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
        let mut scroll = ScrollState::default();
        scroll.bump(1);
        render_lines(&mut frame, area, &lines, &mut scroll, Style::default());
        assert_eq!(buf.cell((0, 0)).map(|c| c.symbol()), Some("b"));
        assert_eq!(buf.cell((0, 1)).map(|c| c.symbol()), Some("c"));
    }
}
