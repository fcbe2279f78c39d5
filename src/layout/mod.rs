pub mod floating;

use ratatui::prelude::Rect;

use crate::config::TermSize;
use crate::constants::{BOTTOM_BARS_HEIGHT, MENU_BAR_HEIGHT};

pub fn rect_contains(rect: Rect, column: u16, row: u16) -> bool {
    if rect.width == 0 || rect.height == 0 {
        return false;
    }
    let max_x = rect.x.saturating_add(rect.width);
    let max_y = rect.y.saturating_add(rect.height);
    column >= rect.x && column < max_x && row >= rect.y && row < max_y
}

/// Area between the global menu bar and the taskbar.
pub fn workspace_rect(term: TermSize) -> Rect {
    Rect {
        x: 0,
        y: MENU_BAR_HEIGHT,
        width: term.width,
        height: term
            .height
            .saturating_sub(MENU_BAR_HEIGHT + BOTTOM_BARS_HEIGHT),
    }
}

/// Center a `width` x `height` box in `area`, shrinking it to fit.
pub fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x.saturating_add(area.width.saturating_sub(width) / 2),
        y: area.y.saturating_add(area.height.saturating_sub(height) / 2),
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_contains_edge_cases() {
        let r = Rect {
            x: 0,
            y: 0,
            width: 0,
            height: 5,
        };
        assert!(!rect_contains(r, 0, 0));
        let r2 = Rect {
            x: 1,
            y: 1,
            width: 3,
            height: 3,
        };
        assert!(rect_contains(r2, 1, 1));
        assert!(!rect_contains(r2, 4, 1));
    }

    #[test]
    fn workspace_excludes_bars() {
        let ws = workspace_rect(TermSize::new(80, 24));
        assert_eq!(ws, Rect::new(0, 1, 80, 21));
    }

    #[test]
    fn centered_rect_shrinks_to_area() {
        let area = Rect::new(0, 0, 80, 24);
        assert_eq!(centered_rect(area, 40, 10), Rect::new(20, 7, 40, 10));
        assert_eq!(centered_rect(area, 100, 30), area);
    }
}
