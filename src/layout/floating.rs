//! Geometry for floating windows: resize edges, drag moves and the clamps
//! that keep a window's origin inside the workspace.

use ratatui::prelude::Rect;

use crate::config::TermSize;
use crate::constants::{
    BOTTOM_BARS_HEIGHT, MENU_BAR_HEIGHT, WINDOW_MIN_HEIGHT, WINDOW_MIN_WIDTH,
};

/// Only the right and bottom edges resize; the top edge is the title bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeEdge {
    Right,
    Bottom,
    Corner,
}

impl ResizeEdge {
    fn grows_width(self) -> bool {
        matches!(self, ResizeEdge::Right | ResizeEdge::Corner)
    }

    fn grows_height(self) -> bool {
        matches!(self, ResizeEdge::Bottom | ResizeEdge::Corner)
    }
}

pub fn border_hit(rect: Rect, column: u16, row: u16) -> Option<ResizeEdge> {
    if rect.width == 0 || rect.height == 0 {
        return None;
    }
    let right = rect.x.saturating_add(rect.width - 1);
    let bottom = rect.y.saturating_add(rect.height - 1);
    let on_right = column == right && row >= rect.y && row <= bottom;
    let on_bottom = row == bottom && column >= rect.x && column <= right;
    match (on_right, on_bottom) {
        (true, true) => Some(ResizeEdge::Corner),
        (true, false) => Some(ResizeEdge::Right),
        (false, true) => Some(ResizeEdge::Bottom),
        (false, false) => None,
    }
}

/// New size for a window whose `edge` follows the pointer. The origin never
/// moves; width stops at the terminal's right edge and height stops above
/// the status bar.
pub fn apply_resize(rect: Rect, edge: ResizeEdge, column: u16, row: u16, term: TermSize) -> Rect {
    let mut out = rect;
    if edge.grows_width() {
        let wanted = column as i32 - rect.x as i32 + 1;
        let limit = term.width as i32 - rect.x as i32;
        out.width = wanted.min(limit).max(WINDOW_MIN_WIDTH as i32) as u16;
    }
    if edge.grows_height() {
        let wanted = row as i32 - rect.y as i32 + 1;
        let limit = term.height as i32 - rect.y as i32 - 1;
        out.height = wanted.min(limit).max(WINDOW_MIN_HEIGHT as i32) as u16;
    }
    out
}

/// Origin for a window dragged by its title bar, where `grab` is the pointer
/// offset from the window origin captured on press.
pub fn drag_origin(
    column: u16,
    row: u16,
    grab: (u16, u16),
    size: (u16, u16),
    term: TermSize,
) -> (u16, u16) {
    let x = column as i32 - grab.0 as i32;
    let y = row as i32 - grab.1 as i32;
    let max_x = (term.width as i32 - size.0 as i32).max(0);
    let max_y = (term.height as i32 - size.1 as i32 - 1).max(MENU_BAR_HEIGHT as i32);
    (
        x.clamp(0, max_x) as u16,
        y.clamp(MENU_BAR_HEIGHT as i32, max_y) as u16,
    )
}

/// Pull an origin back on screen after the terminal shrank.
pub fn clamp_origin(rect: Rect, term: TermSize) -> (u16, u16) {
    let w = rect.width.min(term.width) as i32;
    let h = rect.height.min(term.height) as i32;
    let x = (rect.x as i32).min(term.width as i32 - w).max(0);
    let y = (rect.y as i32)
        .min(term.height as i32 - h - 1)
        .max(MENU_BAR_HEIGHT as i32);
    (x as u16, y as u16)
}

/// Geometry of a maximized window: full width, between the menu bar and the
/// taskbar.
pub fn maximized_rect(term: TermSize) -> Rect {
    Rect {
        x: 0,
        y: MENU_BAR_HEIGHT,
        width: term.width,
        height: term.height.saturating_sub(BOTTOM_BARS_HEIGHT),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TERM: TermSize = TermSize {
        width: 80,
        height: 24,
    };

    #[test]
    fn border_hit_distinguishes_edges() {
        let r = Rect::new(10, 5, 20, 8);
        assert_eq!(border_hit(r, 29, 7), Some(ResizeEdge::Right));
        assert_eq!(border_hit(r, 15, 12), Some(ResizeEdge::Bottom));
        assert_eq!(border_hit(r, 29, 12), Some(ResizeEdge::Corner));
        assert_eq!(border_hit(r, 15, 7), None);
        assert_eq!(border_hit(r, 10, 7), None);
    }

    #[test]
    fn resize_respects_minimum_and_terminal() {
        let r = Rect::new(10, 5, 30, 10);
        let shrunk = apply_resize(r, ResizeEdge::Corner, 11, 6, TERM);
        assert_eq!(shrunk.width, WINDOW_MIN_WIDTH);
        assert_eq!(shrunk.height, WINDOW_MIN_HEIGHT);
        let grown = apply_resize(r, ResizeEdge::Corner, 200, 200, TERM);
        assert_eq!(grown.width, 70);
        assert_eq!(grown.height, 18);
        let right_only = apply_resize(r, ResizeEdge::Right, 50, 200, TERM);
        assert_eq!(right_only.height, 10);
        assert_eq!(right_only.width, 41);
    }

    #[test]
    fn drag_clamps_into_workspace() {
        assert_eq!(drag_origin(0, 0, (5, 0), (20, 8), TERM), (0, 1));
        assert_eq!(drag_origin(79, 23, (0, 0), (20, 8), TERM), (60, 15));
        assert_eq!(drag_origin(30, 10, (2, 0), (20, 8), TERM), (28, 10));
    }

    #[test]
    fn clamp_origin_after_shrink() {
        let r = Rect::new(70, 20, 30, 10);
        assert_eq!(clamp_origin(r, TERM), (50, 13));
        let huge = Rect::new(5, 5, 200, 100);
        assert_eq!(clamp_origin(huge, TERM), (0, 1));
    }

    #[test]
    fn maximized_leaves_room_for_bars() {
        assert_eq!(maximized_rect(TERM), Rect::new(0, 1, 80, 22));
    }
}
