use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::Rect;

use super::text_viewer::scroll_for_key;
use crate::actions::ActionResult;
use crate::components::{ScrollState, render_lines};
use crate::debug_log::DebugLogHandle;
use crate::keybindings::KeyBindings;
use crate::theme;
use crate::ui::UiFrame;
use crate::window::{ScrollDirection, WindowApp, WindowContext};

/// Tail of the in-memory log. Follows new lines until the user scrolls up;
/// `End` resumes following.
pub struct LogViewer {
    log: DebugLogHandle,
    scroll: ScrollState,
    follow: bool,
    bindings: KeyBindings,
}

impl LogViewer {
    pub fn new(log: DebugLogHandle) -> Self {
        Self {
            log,
            scroll: ScrollState::default(),
            follow: true,
            bindings: KeyBindings::default(),
        }
    }

    pub fn is_following(&self) -> bool {
        self.follow
    }
}

impl WindowApp for LogViewer {
    fn render(&mut self, frame: &mut UiFrame<'_>, body: Rect, _focused: bool) {
        let lines = self.log.lines(0, self.log.len());
        if self.follow {
            self.scroll.to_end();
        }
        let style = theme::style(theme::window_body_fg(), theme::window_body_bg());
        if lines.is_empty() {
            frame.set_string(body.x, body.y, "(log is empty)", style);
            return;
        }
        render_lines(frame, body, &lines, &mut self.scroll, style);
    }

    fn handle_key(&mut self, key: &KeyEvent, _ctx: &mut WindowContext<'_>) -> Option<ActionResult> {
        if key.code == KeyCode::End {
            self.follow = true;
        } else if scroll_for_key(&self.bindings, key, &mut self.scroll) {
            self.follow = false;
        }
        None
    }

    fn handle_scroll(&mut self, direction: ScrollDirection, steps: u16) {
        let delta = steps as isize;
        match direction {
            ScrollDirection::Up => {
                self.follow = false;
                self.scroll.bump(-delta);
            }
            ScrollDirection::Down => self.scroll.bump(delta),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::buffer::Buffer;

    fn draw(viewer: &mut LogViewer, area: Rect) -> Buffer {
        let mut buf = Buffer::empty(area);
        let mut frame = UiFrame::from_parts(area, &mut buf);
        viewer.render(&mut frame, area, true);
        buf
    }

    #[test]
    fn follows_tail_by_default() {
        let log = DebugLogHandle::new(100);
        for i in 0..10 {
            log.push(format!("line {i}"));
        }
        let mut viewer = LogViewer::new(log);
        let buf = draw(&mut viewer, Rect::new(0, 0, 20, 3));
        let row: String = (0..6).filter_map(|x| buf.cell((x, 2)).map(|c| c.symbol().to_string())).collect();
        assert_eq!(row, "line 9");
    }

    #[test]
    fn scrolling_up_stops_following() {
        let mut viewer = LogViewer::new(DebugLogHandle::new(10));
        viewer.handle_scroll(ScrollDirection::Up, 3);
        assert!(!viewer.is_following());
    }
}
