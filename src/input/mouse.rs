//! Mouse routing. Each stage either consumes the event or lets the next
//! stage look at it; the first stage that consumes wins.
use std::time::Instant;

use crossterm::event::MouseButton;
use ratatui::prelude::Rect;

use super::{ClickTarget, MouseAction, MouseInput};
use crate::components::MenuAnchor;
use crate::desktop::Desktop;
use crate::drag_drop::DragOutcome;
use crate::window::{WindowContext, WindowId};

/// Lines scrolled per wheel notch.
const SCROLL_STEPS: u16 = 3;

impl Desktop {
    pub fn handle_mouse(&mut self, input: MouseInput) {
        let input = self.track_buttons(input);
        if self.dialog.is_some() {
            self.dialog_mouse(input);
            return;
        }
        if self.drag_drop_mouse(input)
            || self.pointer_tracking_mouse(input)
            || self.global_menu_mouse(input)
            || self.taskbar_mouse(input)
            || self.windows_mouse(input)
        {
            return;
        }
        self.desktop_mouse(input);
    }

    /// Remember whether a button is held. Terminals that report plain
    /// motion during a drag get it upgraded to held motion.
    fn track_buttons(&mut self, mut input: MouseInput) -> MouseInput {
        match input.action {
            MouseAction::Press(_) => self.button_down = true,
            MouseAction::Release(_) => self.button_down = false,
            MouseAction::Motion { button_down: false } if self.button_down => {
                input.action = MouseAction::Motion { button_down: true };
            }
            _ => {}
        }
        input
    }

    fn term_area(&self) -> Rect {
        Rect::new(0, 0, self.term.width, self.term.height)
    }

    /// Modal: only left presses on a button do anything.
    fn dialog_mouse(&mut self, input: MouseInput) {
        if !input.is_left_press() {
            return;
        }
        let area = self.term_area();
        let hit = self
            .dialog
            .as_ref()
            .and_then(|d| d.handle_click(area, input.column, input.row));
        if let Some(index) = hit {
            self.resolve_dialog(index);
        }
    }

    fn drag_drop_mouse(&mut self, input: MouseInput) -> bool {
        match self.drag_drop.handle_mouse(&input, &mut self.windows) {
            DragOutcome::Ignored => false,
            DragOutcome::Consumed => true,
            DragOutcome::Dropped { target, result } => {
                self.windows.set_active(target);
                self.dispatch_opt(result, Some(target));
                true
            }
        }
    }

    /// Title-bar drags and border resizes follow the pointer until any
    /// button event ends them.
    fn pointer_tracking_mouse(&mut self, input: MouseInput) -> bool {
        let Some(id) = self.windows.tracking_pointer() else {
            return false;
        };
        let term = self.term;
        if let Some(window) = self.windows.get_mut(id) {
            match input.action {
                MouseAction::Motion { .. } => {
                    window.track_pointer(input.column, input.row, term);
                }
                MouseAction::Press(_) | MouseAction::Release(_) => window.stop_pointer_tracking(),
                MouseAction::Scroll(_) => {}
            }
        }
        true
    }

    fn global_menu_mouse(&mut self, input: MouseInput) -> bool {
        let anchor = MenuAnchor::global(self.term.width);
        let (column, row) = (input.column, input.row);
        if self.menu.is_active() {
            match input.action {
                MouseAction::Motion { .. } => {
                    self.menu.handle_hover(anchor, column, row);
                }
                MouseAction::Press(MouseButton::Left) => {
                    if let Some(action) = self.menu.handle_click(anchor, column, row) {
                        self.execute_action(action);
                    }
                }
                MouseAction::Press(_) => self.menu.close(),
                MouseAction::Release(_) | MouseAction::Scroll(_) => {}
            }
            return true;
        }
        if input.is_left_press() && row == anchor.row {
            self.windows.close_menus_except(None);
            self.menu.handle_click(anchor, column, row);
            return true;
        }
        false
    }

    fn taskbar_mouse(&mut self, input: MouseInput) -> bool {
        let taskbar_row = self.term.height.saturating_sub(2);
        if !input.is_left_press() || input.row != taskbar_row {
            return false;
        }
        match self
            .taskbar
            .hit(taskbar_row, self.term.width, input.column, input.row)
        {
            Some(id) => {
                tracing::debug!(window = %id, "restored from taskbar");
                self.windows.restore(id);
                true
            }
            None => false,
        }
    }

    /// Windows are hit-tested topmost first; the first one containing the
    /// pointer consumes the event.
    fn windows_mouse(&mut self, input: MouseInput) -> bool {
        for id in self.windows.visible_top_down() {
            if self.window_menu_mouse(id, input) {
                return true;
            }
            let inside = self
                .windows
                .get(id)
                .is_some_and(|w| w.contains(input.column, input.row));
            if inside {
                self.window_mouse(id, input);
                return true;
            }
        }
        false
    }

    /// Hover and clicks for an open window menu, including the part of a
    /// dropdown hanging below the window. A press anywhere else closes it.
    fn window_menu_mouse(&mut self, id: WindowId, input: MouseInput) -> bool {
        let (column, row) = (input.column, input.row);
        let Some(window) = self.windows.get_mut(id) else {
            return false;
        };
        if !window.menu_open() {
            return false;
        }
        let anchor = window.menu_anchor();
        let on_bar = row == anchor.row && window.contains(column, row);
        let Some(menu) = window.menu_mut() else {
            return false;
        };
        match input.action {
            MouseAction::Motion { .. } => menu.handle_hover(anchor, column, row),
            MouseAction::Press(MouseButton::Left)
                if on_bar || menu.hit_dropdown(anchor, column, row) =>
            {
                let command = menu.handle_click(anchor, column, row);
                if let Some(command) = command {
                    self.run_window_command(id, &command);
                }
                true
            }
            MouseAction::Press(_) => {
                menu.close();
                false
            }
            MouseAction::Release(_) | MouseAction::Scroll(_) => false,
        }
    }

    fn window_mouse(&mut self, id: WindowId, input: MouseInput) {
        let (column, row) = (input.column, input.row);
        match input.action {
            MouseAction::Press(MouseButton::Left) => self.window_left_press(id, column, row),
            MouseAction::Press(button) => {
                self.focus_window(id);
                self.forward_click(id, column, row, button);
            }
            MouseAction::Scroll(direction) => {
                if let Some(window) = self.windows.get_mut(id)
                    && window.body_point(column, row).is_some()
                {
                    window.app_mut().handle_scroll(direction, SCROLL_STEPS);
                }
            }
            MouseAction::Motion { button_down: true } => {
                if let Some(window) = self.windows.get_mut(id)
                    && let Some(point) = window.body_point(column, row)
                {
                    window.app_mut().handle_mouse_drag(point);
                }
            }
            MouseAction::Motion { button_down: false } | MouseAction::Release(_) => {}
        }
    }

    fn window_left_press(&mut self, id: WindowId, column: u16, row: u16) {
        let Some(window) = self.windows.get(id) else {
            return;
        };
        if window.on_close_button(column, row) {
            self.close_window(id);
            return;
        }
        if window.on_minimize_button(column, row) {
            self.windows.minimize(id);
            return;
        }
        if window.on_maximize_button(column, row) {
            self.focus_window(id);
            let term = self.term;
            if let Some(window) = self.windows.get_mut(id) {
                window.toggle_maximize(term);
            }
            return;
        }
        if let Some(edge) = window.on_border(column, row) {
            self.focus_window(id);
            if let Some(window) = self.windows.get_mut(id) {
                window.start_resize(edge);
            }
            return;
        }
        if window.on_title_bar(column, row) {
            self.focus_window(id);
            let interval = self.config.double_click_interval;
            let double = self
                .clicks
                .register(ClickTarget::TitleBar(id), Instant::now(), interval);
            let term = self.term;
            if let Some(window) = self.windows.get_mut(id) {
                if double {
                    window.toggle_maximize(term);
                } else if !window.is_maximized() {
                    window.start_drag(column, row);
                }
            }
            return;
        }
        let anchor = window.menu_anchor();
        if window.menu().is_some() && row == anchor.row {
            self.focus_window(id);
            if let Some(menu) = self.windows.get_mut(id).and_then(|w| w.menu_mut()) {
                menu.handle_click(anchor, column, row);
            }
            return;
        }
        self.focus_window(id);
        self.forward_click(id, column, row, MouseButton::Left);
        let pending = self
            .windows
            .get_mut(id)
            .and_then(|w| w.app_mut().drag_source())
            .is_some_and(|source| source.has_pending_drag());
        if pending {
            self.drag_drop.arm(id, (column, row));
        }
    }

    /// Raise and focus `id`, closing every menu that belongs to someone else.
    fn focus_window(&mut self, id: WindowId) {
        self.menu.close();
        self.windows.close_menus_except(Some(id));
        if self.windows.active_id() != Some(id) {
            self.windows.set_active(id);
        }
    }

    fn forward_click(&mut self, id: WindowId, column: u16, row: u16, button: MouseButton) {
        let Some(window) = self.windows.get_mut(id) else {
            return;
        };
        let Some(point) = window.body_point(column, row) else {
            return;
        };
        let mut ctx = WindowContext {
            clipboard: &mut self.clipboard,
            config: &self.config,
        };
        let result = window.app_mut().handle_click(point, button, &mut ctx);
        self.dispatch_opt(result, Some(id));
    }

    fn desktop_mouse(&mut self, input: MouseInput) {
        if !input.is_left_press() {
            return;
        }
        let height = self.term.height;
        match self.icons.icon_at(input.column, input.row, height) {
            Some(index) => {
                let interval = self.config.double_click_interval;
                let double = self
                    .clicks
                    .register(ClickTarget::Icon(index), Instant::now(), interval);
                self.icons.select(Some(index));
                if double && let Some(icon) = self.icons.get(index) {
                    let action = icon.action.clone();
                    tracing::debug!(icon = index, action = %action, "icon activated");
                    self.execute_action(action);
                }
            }
            None => {
                self.clicks.reset();
                self.icons.select(None);
                self.menu.close();
            }
        }
    }
}
