//! UiFrame: a thin wrapper around `ratatui::Frame` that clamps drawing to the
//! visible area.
//!
//! Window geometry is computed in terminal cells and can drift past the
//! buffer edges while a window is dragged or the terminal shrinks. Every
//! drawing helper here clips against the frame area first, so callers never
//! index outside the `Buffer`.
use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::{StatefulWidget, Widget};

pub struct UiFrame<'a> {
    area: Rect,
    buffer: &'a mut Buffer,
}

impl<'a> UiFrame<'a> {
    pub fn new(frame: &'a mut Frame<'_>) -> Self {
        let area = frame.area();
        let buffer = frame.buffer_mut();
        Self { area, buffer }
    }

    /// Build a frame over a bare buffer, e.g. for offscreen or test rendering.
    pub fn from_parts(area: Rect, buffer: &'a mut Buffer) -> Self {
        Self { area, buffer }
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    pub fn buffer_mut(&mut self) -> &mut Buffer {
        self.buffer
    }

    pub fn buffer(&self) -> &Buffer {
        self.buffer
    }

    fn clip_rect(&self, rect: Rect) -> Option<Rect> {
        let clipped = rect.intersection(self.area);
        if clipped.width == 0 || clipped.height == 0 {
            None
        } else {
            Some(clipped)
        }
    }

    pub fn render_widget<W>(&mut self, widget: W, area: Rect)
    where
        W: Widget,
    {
        if let Some(clipped) = self.clip_rect(area) {
            widget.render(clipped, self.buffer);
        }
    }

    pub fn render_stateful_widget<W>(&mut self, widget: W, area: Rect, state: &mut W::State)
    where
        W: StatefulWidget,
    {
        if let Some(clipped) = self.clip_rect(area) {
            widget.render(clipped, self.buffer, state);
        }
    }

    /// Write `text` at `(x, y)`, truncated at the frame's right edge.
    pub fn set_string(&mut self, x: u16, y: u16, text: &str, style: Style) {
        let bounds = self.area;
        safe_set_string(self.buffer, bounds, x, y, text, style);
    }

    /// Fill `rect` with `symbol` in `style`.
    pub fn fill(&mut self, rect: Rect, symbol: &str, style: Style) {
        let Some(clipped) = self.clip_rect(rect) else {
            return;
        };
        for y in clipped.y..clipped.y.saturating_add(clipped.height) {
            for x in clipped.x..clipped.x.saturating_add(clipped.width) {
                if let Some(cell) = self.buffer.cell_mut((x, y)) {
                    cell.set_symbol(symbol);
                    cell.set_style(style);
                }
            }
        }
    }

    /// Draw a one-cell border around `rect`, single or double line.
    pub fn draw_box(&mut self, rect: Rect, style: Style, double: bool) {
        if rect.width < 2 || rect.height < 2 {
            return;
        }
        let glyphs = if double {
            BoxGlyphs::DOUBLE
        } else {
            BoxGlyphs::SINGLE
        };
        let right = rect.x.saturating_add(rect.width - 1);
        let bottom = rect.y.saturating_add(rect.height - 1);
        for x in rect.x..=right {
            let (top, bot) = if x == rect.x {
                (glyphs.top_left, glyphs.bottom_left)
            } else if x == right {
                (glyphs.top_right, glyphs.bottom_right)
            } else {
                (glyphs.horizontal, glyphs.horizontal)
            };
            self.put(x, rect.y, top, style);
            self.put(x, bottom, bot, style);
        }
        for y in rect.y.saturating_add(1)..bottom {
            self.put(rect.x, y, glyphs.vertical, style);
            self.put(right, y, glyphs.vertical, style);
        }
    }

    /// Apply `style` to every cell of `rect` without touching symbols.
    pub fn restyle(&mut self, rect: Rect, style: Style) {
        let Some(clipped) = self.clip_rect(rect) else {
            return;
        };
        for y in clipped.y..clipped.y.saturating_add(clipped.height) {
            for x in clipped.x..clipped.x.saturating_add(clipped.width) {
                if let Some(cell) = self.buffer.cell_mut((x, y)) {
                    cell.set_style(style);
                }
            }
        }
    }

    fn put(&mut self, x: u16, y: u16, symbol: &str, style: Style) {
        if !crate::layout::rect_contains(self.area, x, y) {
            return;
        }
        if let Some(cell) = self.buffer.cell_mut((x, y)) {
            cell.set_symbol(symbol);
            cell.set_style(style);
        }
    }
}

struct BoxGlyphs {
    top_left: &'static str,
    top_right: &'static str,
    bottom_left: &'static str,
    bottom_right: &'static str,
    horizontal: &'static str,
    vertical: &'static str,
}

impl BoxGlyphs {
    const SINGLE: BoxGlyphs = BoxGlyphs {
        top_left: "┌",
        top_right: "┐",
        bottom_left: "└",
        bottom_right: "┘",
        horizontal: "─",
        vertical: "│",
    };
    const DOUBLE: BoxGlyphs = BoxGlyphs {
        top_left: "╔",
        top_right: "╗",
        bottom_left: "╚",
        bottom_right: "╝",
        horizontal: "═",
        vertical: "║",
    };
}

pub(crate) fn safe_set_string(
    buffer: &mut Buffer,
    bounds: Rect,
    x: u16,
    y: u16,
    text: &str,
    style: Style,
) {
    if bounds.width == 0 || bounds.height == 0 {
        return;
    }
    let max_x = bounds.x.saturating_add(bounds.width);
    let max_y = bounds.y.saturating_add(bounds.height);
    if x < bounds.x || x >= max_x || y < bounds.y || y >= max_y {
        return;
    }
    let available = max_x.saturating_sub(x);
    if available == 0 {
        return;
    }
    let text = truncate_to_width(text, available as usize);
    buffer.set_string(x, y, text, style);
}

pub fn truncate_to_width(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    value.chars().take(width).collect()
}

/// Pad or truncate to exactly `width` characters.
pub fn fit_to_width(value: &str, width: usize) -> String {
    let mut out = truncate_to_width(value, width);
    let len = out.chars().count();
    out.extend(std::iter::repeat_n(' ', width - len));
    out
}

/// Greedy word wrap at `width` columns. Blank input lines are kept.
pub fn wrap_words(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            let line_len = line.chars().count();
            let word_len = word.chars().count();
            if line.is_empty() {
                line.push_str(word);
            } else if line_len + word_len + 1 <= width {
                line.push(' ');
                line.push_str(word);
            } else {
                lines.push(std::mem::take(&mut line));
                line.push_str(word);
            }
        }
        lines.push(line);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_to_width_short_and_long() {
        assert_eq!(truncate_to_width("abc", 5), "abc");
        assert_eq!(truncate_to_width("abcdef", 3), "abc");
    }

    #[test]
    fn fit_to_width_pads() {
        assert_eq!(fit_to_width("ab", 4), "ab  ");
        assert_eq!(fit_to_width("abcdef", 4), "abcd");
    }

    #[test]
    fn wrap_words_keeps_paragraphs() {
        let lines = wrap_words("one two three\n\nfour", 8);
        assert_eq!(lines, vec!["one two", "three", "", "four"]);
    }

    #[test]
    fn safe_set_string_ignores_out_of_bounds() {
        let bounds = Rect::new(0, 0, 10, 2);
        let mut buf = Buffer::empty(bounds);
        safe_set_string(&mut buf, bounds, 1, 0, "hello", Style::default());
        assert_eq!(buf.cell((1, 0)).unwrap().symbol(), "h");
        safe_set_string(&mut buf, bounds, 100, 0, "x", Style::default());
    }

    #[test]
    fn draw_box_clips_to_frame() {
        let area = Rect::new(0, 0, 5, 3);
        let mut buf = Buffer::empty(area);
        let mut ui = UiFrame::from_parts(area, &mut buf);
        ui.draw_box(Rect::new(2, 0, 6, 3), Style::default(), false);
        assert_eq!(buf.cell((2, 0)).unwrap().symbol(), "┌");
        assert_eq!(buf.cell((4, 0)).unwrap().symbol(), "─");
        assert_eq!(buf.cell((2, 1)).unwrap().symbol(), "│");
    }

    #[test]
    fn fill_clips_to_frame() {
        let area = Rect::new(0, 0, 4, 2);
        let mut buf = Buffer::empty(area);
        let mut ui = UiFrame::from_parts(area, &mut buf);
        ui.fill(Rect::new(2, 1, 10, 10), "#", Style::default());
        assert_eq!(buf.cell((3, 1)).unwrap().symbol(), "#");
        assert_eq!(buf.cell((1, 1)).unwrap().symbol(), " ");
    }
}
