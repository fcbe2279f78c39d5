use ratatui::layout::Rect;
use ratatui::style::Style;

use crate::ui::{UiFrame, truncate_to_width};

/// Bottom row: free text on the left, right-aligned text on the right.
pub struct StatusBar {
    left: String,
    right: String,
    style: Style,
}

impl StatusBar {
    pub fn new() -> Self {
        Self {
            left: String::new(),
            right: String::new(),
            style: Style::default(),
        }
    }

    pub fn set_left<T: Into<String>>(&mut self, value: T) {
        self.left = value.into();
    }

    pub fn set_right<T: Into<String>>(&mut self, value: T) {
        self.right = value.into();
    }

    pub fn set_style(&mut self, style: Style) {
        self.style = style;
    }

    pub fn left(&self) -> &str {
        &self.left
    }
}

impl Default for StatusBar {
    fn default() -> Self {
        Self::new()
    }
}

impl super::Component for StatusBar {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect) {
        if area.height == 0 || area.width == 0 {
            return;
        }
        let width = area.width as usize;
        frame.fill(Rect::new(area.x, area.y, area.width, 1), " ", self.style);

        let left = truncate_to_width(&self.left, width);
        frame.set_string(area.x, area.y, &left, self.style);

        let right = truncate_to_width(&self.right, width);
        let right_width = right.chars().count();
        if !right.is_empty() && right_width + left.chars().count() < width {
            let start_x = area.x.saturating_add((width - right_width) as u16);
            frame.set_string(start_x, area.y, &right, self.style);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Component;
    use ratatui::buffer::Buffer;

    #[test]
    fn right_text_is_right_aligned() {
        let area = Rect::new(0, 0, 20, 1);
        let mut buf = Buffer::empty(area);
        let mut frame = UiFrame::from_parts(area, &mut buf);
        let mut s = StatusBar::new();
        s.set_left("left");
        s.set_right("host");
        s.render(&mut frame, area);
        assert_eq!(buf.cell((0, 0)).map(|c| c.symbol()), Some("l"));
        assert_eq!(buf.cell((16, 0)).map(|c| c.symbol()), Some("h"));
    }

    #[test]
    fn right_text_dropped_when_crowded() {
        let area = Rect::new(0, 0, 8, 1);
        let mut buf = Buffer::empty(area);
        let mut frame = UiFrame::from_parts(area, &mut buf);
        let mut s = StatusBar::default();
        s.set_left("abcdef");
        s.set_right("xyz");
        s.render(&mut frame, area);
        assert_eq!(buf.cell((7, 0)).map(|c| c.symbol()), Some(" "));
    }
}
