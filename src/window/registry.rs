use ratatui::prelude::Rect;

use crate::config::TermSize;

use super::{Window, WindowApp, WindowId};

/// Owns every window in z-order: index 0 is the bottom, the last entry is
/// drawn on top. Pinned (always-on-top) windows form a suffix once
/// [`WindowRegistry::normalize_layers`] has run.
#[derive(Debug, Default)]
pub struct WindowRegistry {
    windows: Vec<Window>,
    next_id: u64,
}

impl WindowRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a window on top of its layer and focus it.
    pub fn spawn(
        &mut self,
        title: impl Into<String>,
        rect: Rect,
        app: Box<dyn WindowApp>,
    ) -> WindowId {
        self.next_id += 1;
        let id = WindowId::new(self.next_id);
        self.windows.push(Window::new(id, title, rect, app));
        self.set_active(id);
        id
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    pub fn get(&self, id: WindowId) -> Option<&Window> {
        self.windows.iter().find(|w| w.id == id)
    }

    pub fn get_mut(&mut self, id: WindowId) -> Option<&mut Window> {
        self.windows.iter_mut().find(|w| w.id == id)
    }

    fn position(&self, id: WindowId) -> Option<usize> {
        self.windows.iter().position(|w| w.id == id)
    }

    /// Bottom-to-top.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Window> {
        self.windows.iter()
    }

    pub fn iter_mut(&mut self) -> impl DoubleEndedIterator<Item = &mut Window> {
        self.windows.iter_mut()
    }

    pub fn ids(&self) -> Vec<WindowId> {
        self.windows.iter().map(|w| w.id).collect()
    }

    /// Visible windows, topmost first. Hit-testing walks this order.
    pub fn visible_top_down(&self) -> Vec<WindowId> {
        self.windows
            .iter()
            .rev()
            .filter(|w| w.visible)
            .map(|w| w.id)
            .collect()
    }

    pub fn visible_count(&self) -> usize {
        self.windows.iter().filter(|w| w.visible).count()
    }

    pub fn active_id(&self) -> Option<WindowId> {
        self.windows.iter().find(|w| w.active).map(|w| w.id)
    }

    pub fn active_mut(&mut self) -> Option<&mut Window> {
        self.windows.iter_mut().find(|w| w.active)
    }

    /// Minimized windows in registry order, as listed on the taskbar.
    pub fn minimized(&self) -> Vec<(WindowId, &str)> {
        self.windows
            .iter()
            .filter(|w| w.minimized)
            .map(|w| (w.id, w.title.as_str()))
            .collect()
    }

    pub fn topmost_at(&self, column: u16, row: u16) -> Option<WindowId> {
        self.windows
            .iter()
            .rev()
            .find(|w| w.visible && w.contains(column, row))
            .map(|w| w.id)
    }

    /// The window following the pointer for a title-bar drag or border
    /// resize, if any.
    pub fn tracking_pointer(&self) -> Option<WindowId> {
        self.windows
            .iter()
            .find(|w| w.is_dragging() || w.is_resizing())
            .map(|w| w.id)
    }

    /// Focus `id` and raise it to the top of its layer: the end of the
    /// unpinned segment, or the very end for pinned windows.
    pub fn set_active(&mut self, id: WindowId) -> bool {
        let Some(pos) = self.position(id) else {
            return false;
        };
        for w in &mut self.windows {
            w.active = false;
        }
        let mut win = self.windows.remove(pos);
        win.active = true;
        if win.always_on_top {
            self.windows.push(win);
        } else {
            let first_pinned = self
                .windows
                .iter()
                .position(|w| w.always_on_top)
                .unwrap_or(self.windows.len());
            self.windows.insert(first_pinned, win);
        }
        tracing::debug!(window = %id, "window activated");
        true
    }

    /// Stable partition into `[unpinned..., pinned...]`. Run once per frame
    /// so a window pinned since the last frame moves above the rest.
    pub fn normalize_layers(&mut self) {
        if self.windows.iter().all(|w| !w.always_on_top) {
            return;
        }
        let (mut layered, pinned): (Vec<Window>, Vec<Window>) =
            self.windows.drain(..).partition(|w| !w.always_on_top);
        layered.extend(pinned);
        self.windows = layered;
    }

    /// Run the close hook, drop the window and focus the topmost visible
    /// survivor. Hook errors are logged and the window is removed anyway.
    pub fn close(&mut self, id: WindowId) -> bool {
        let Some(pos) = self.position(id) else {
            return false;
        };
        let mut win = self.windows.remove(pos);
        if let Err(err) = win.run_close_hook() {
            tracing::warn!(window = %id, title = %win.title, error = %err, "close hook failed");
        }
        tracing::info!(window = %id, title = %win.title, "window closed");
        self.activate_last_visible();
        true
    }

    /// Close every window, topmost first, running each close hook.
    pub fn close_all(&mut self) {
        while let Some(mut win) = self.windows.pop() {
            if let Err(err) = win.run_close_hook() {
                tracing::warn!(window = %win.id, error = %err, "close hook failed at shutdown");
            }
        }
    }

    pub fn activate_last_visible(&mut self) -> Option<WindowId> {
        let id = self.windows.iter().rev().find(|w| w.visible).map(|w| w.id);
        match id {
            Some(id) => {
                self.set_active(id);
            }
            None => {
                for w in &mut self.windows {
                    w.active = false;
                }
            }
        }
        id
    }

    /// Move focus to the next visible window in z-order, wrapping.
    pub fn cycle_focus(&mut self) -> Option<WindowId> {
        let visible: Vec<WindowId> = self
            .windows
            .iter()
            .filter(|w| w.visible)
            .map(|w| w.id)
            .collect();
        if visible.is_empty() {
            return None;
        }
        let next = match self.active_id().and_then(|a| visible.iter().position(|id| *id == a)) {
            Some(idx) => visible[(idx + 1) % visible.len()],
            None => visible[0],
        };
        self.set_active(next);
        Some(next)
    }

    /// Minimize `id` and hand focus to the topmost visible window.
    pub fn minimize(&mut self, id: WindowId) {
        let Some(win) = self.get_mut(id) else {
            return;
        };
        if !win.minimized {
            win.toggle_minimize();
        }
        self.activate_last_visible();
    }

    /// Bring a minimized window back and focus it.
    pub fn restore(&mut self, id: WindowId) {
        let Some(win) = self.get_mut(id) else {
            return;
        };
        if win.minimized {
            win.toggle_minimize();
        }
        self.set_active(id);
    }

    pub fn clamp_all(&mut self, term: TermSize) {
        for w in &mut self.windows {
            w.clamp_to(term);
        }
    }

    pub fn close_menus_except(&mut self, keep: Option<WindowId>) {
        for w in &mut self.windows {
            if Some(w.id) != keep {
                w.close_menu();
            }
        }
    }

    pub fn clear_drop_highlights(&mut self) {
        for w in &mut self.windows {
            w.drop_highlight = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::test_support::Blank;
    use std::cell::Cell;
    use std::io;
    use std::rc::Rc;

    fn spawn(reg: &mut WindowRegistry, name: &str) -> WindowId {
        reg.spawn(name, Rect::new(5, 3, 30, 10), Box::new(Blank))
    }

    fn titles(reg: &WindowRegistry) -> Vec<&str> {
        reg.iter().map(|w| w.title()).collect()
    }

    fn active_count(reg: &WindowRegistry) -> usize {
        reg.iter().filter(|w| w.is_active()).count()
    }

    #[test]
    fn spawn_focuses_new_window() {
        let mut reg = WindowRegistry::new();
        let a = spawn(&mut reg, "a");
        let b = spawn(&mut reg, "b");
        assert_eq!(reg.active_id(), Some(b));
        assert_ne!(a, b);
        assert_eq!(active_count(&reg), 1);
    }

    #[test]
    fn activation_respects_pinned_layer() {
        let mut reg = WindowRegistry::new();
        let a = spawn(&mut reg, "A");
        let b = spawn(&mut reg, "B");
        let c = spawn(&mut reg, "C");
        reg.get_mut(b).unwrap().set_always_on_top(true);
        reg.normalize_layers();
        assert_eq!(titles(&reg), ["A", "C", "B"]);
        reg.set_active(a);
        assert_eq!(titles(&reg), ["C", "A", "B"]);
        reg.set_active(b);
        assert_eq!(titles(&reg), ["C", "A", "B"]);
        reg.set_active(c);
        assert_eq!(titles(&reg), ["A", "C", "B"]);
        assert_eq!(reg.active_id(), Some(c));
    }

    #[test]
    fn close_focuses_last_visible() {
        let mut reg = WindowRegistry::new();
        let a = spawn(&mut reg, "a");
        let b = spawn(&mut reg, "b");
        let c = spawn(&mut reg, "c");
        reg.minimize(b);
        reg.close(c);
        assert_eq!(reg.active_id(), Some(a));
        assert_eq!(active_count(&reg), 1);
    }

    #[test]
    fn minimizing_everything_leaves_nothing_active() {
        let mut reg = WindowRegistry::new();
        let a = spawn(&mut reg, "a");
        reg.minimize(a);
        assert_eq!(reg.active_id(), None);
        assert_eq!(reg.minimized().len(), 1);
        reg.restore(a);
        assert_eq!(reg.active_id(), Some(a));
        assert!(reg.minimized().is_empty());
    }

    #[test]
    fn cycle_focus_wraps_over_visible() {
        let mut reg = WindowRegistry::new();
        let a = spawn(&mut reg, "a");
        let b = spawn(&mut reg, "b");
        let c = spawn(&mut reg, "c");
        reg.minimize(b);
        assert_eq!(reg.active_id(), Some(c));
        assert_eq!(reg.cycle_focus(), Some(a));
        assert_eq!(reg.cycle_focus(), Some(c));
    }

    struct Hooked {
        closed: Rc<Cell<u32>>,
        fail: bool,
    }

    impl crate::window::WindowApp for Hooked {
        fn render(&mut self, _: &mut crate::ui::UiFrame<'_>, _: Rect, _: bool) {}
        fn closable(&mut self) -> Option<&mut dyn crate::window::Closable> {
            Some(self)
        }
    }

    impl crate::window::Closable for Hooked {
        fn close(&mut self) -> io::Result<()> {
            self.closed.set(self.closed.get() + 1);
            if self.fail {
                Err(io::Error::other("boom"))
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn close_hooks_run_even_when_failing() {
        let closed = Rc::new(Cell::new(0));
        let mut reg = WindowRegistry::new();
        let a = reg.spawn(
            "a",
            Rect::new(0, 1, 30, 10),
            Box::new(Hooked {
                closed: closed.clone(),
                fail: true,
            }),
        );
        reg.spawn(
            "b",
            Rect::new(0, 1, 30, 10),
            Box::new(Hooked {
                closed: closed.clone(),
                fail: false,
            }),
        );
        assert!(reg.close(a));
        assert_eq!(reg.len(), 1);
        reg.close_all();
        assert!(reg.is_empty());
        assert_eq!(closed.get(), 2);
    }

    #[test]
    fn topmost_at_prefers_upper_window() {
        let mut reg = WindowRegistry::new();
        let _a = spawn(&mut reg, "a");
        let b = spawn(&mut reg, "b");
        assert_eq!(reg.topmost_at(10, 5), Some(b));
        assert_eq!(reg.topmost_at(79, 20), None);
    }
}
