//! Input normalization and routing.
//!
//! Crossterm mouse events are folded into [`MouseInput`], a smaller
//! vocabulary the routers match on. Routing itself lives in `mouse` and
//! `keyboard` as methods on the desktop.
mod keyboard;
mod mouse;

use std::time::{Duration, Instant};

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};

use crate::window::{ScrollDirection, WindowId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseAction {
    Press(MouseButton),
    Release(MouseButton),
    /// Pointer motion; `button_down` is set for drag reports.
    Motion { button_down: bool },
    Scroll(ScrollDirection),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseInput {
    pub action: MouseAction,
    pub column: u16,
    pub row: u16,
}

impl MouseInput {
    pub fn new(action: MouseAction, column: u16, row: u16) -> Self {
        Self {
            action,
            column,
            row,
        }
    }

    /// Horizontal scrolling has no meaning on the desktop and maps to `None`.
    pub fn from_event(event: MouseEvent) -> Option<Self> {
        let action = match event.kind {
            MouseEventKind::Down(button) => MouseAction::Press(button),
            MouseEventKind::Up(button) => MouseAction::Release(button),
            MouseEventKind::Drag(_) => MouseAction::Motion { button_down: true },
            MouseEventKind::Moved => MouseAction::Motion { button_down: false },
            MouseEventKind::ScrollUp => MouseAction::Scroll(ScrollDirection::Up),
            MouseEventKind::ScrollDown => MouseAction::Scroll(ScrollDirection::Down),
            MouseEventKind::ScrollLeft | MouseEventKind::ScrollRight => return None,
        };
        Some(Self::new(action, event.column, event.row))
    }

    pub fn is_left_press(&self) -> bool {
        self.action == MouseAction::Press(MouseButton::Left)
    }
}

/// What a press landed on, for double-click detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    Icon(usize),
    TitleBar(WindowId),
    /// A row inside a window's own list.
    ListRow(usize),
}

/// Synthesizes double-clicks from press timestamps.
#[derive(Debug, Default)]
pub struct ClickTracker {
    last: Option<(ClickTarget, Instant)>,
}

impl ClickTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a press on `target`; `true` when it completes a double-click.
    /// A completed double-click is forgotten so a third press starts over.
    pub fn register(&mut self, target: ClickTarget, now: Instant, interval: Duration) -> bool {
        let double = self.last.is_some_and(|(prev, at)| {
            prev == target && now.saturating_duration_since(at) <= interval
        });
        self.last = if double { None } else { Some((target, now)) };
        double
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn event(kind: MouseEventKind) -> MouseEvent {
        MouseEvent {
            kind,
            column: 4,
            row: 2,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn drag_and_move_become_motion() {
        let drag = MouseInput::from_event(event(MouseEventKind::Drag(MouseButton::Left))).unwrap();
        assert_eq!(drag.action, MouseAction::Motion { button_down: true });
        let moved = MouseInput::from_event(event(MouseEventKind::Moved)).unwrap();
        assert_eq!(moved.action, MouseAction::Motion { button_down: false });
        assert_eq!((moved.column, moved.row), (4, 2));
        assert!(MouseInput::from_event(event(MouseEventKind::ScrollLeft)).is_none());
    }

    #[test]
    fn double_click_needs_same_target_within_interval() {
        let interval = Duration::from_millis(350);
        let t0 = Instant::now();
        let mut clicks = ClickTracker::new();
        assert!(!clicks.register(ClickTarget::Icon(0), t0, interval));
        assert!(clicks.register(ClickTarget::Icon(0), t0 + Duration::from_millis(100), interval));
        // third press starts a new sequence
        assert!(!clicks.register(ClickTarget::Icon(0), t0 + Duration::from_millis(200), interval));

        assert!(!clicks.register(ClickTarget::Icon(1), t0 + Duration::from_millis(250), interval));
        assert!(!clicks.register(ClickTarget::Icon(1), t0 + Duration::from_secs(2), interval));
    }
}
