use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::actions::AppAction;
use crate::components::MenuKeyOutcome;
use crate::desktop::Desktop;
use crate::keybindings::Action;
use crate::window::{WindowContext, WindowId};

fn is_paste_shortcut(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('v') | KeyCode::Char('V'))
}

impl Desktop {
    /// Keyboard precedence: dialog, exit hotkey, menu toggle, open window
    /// menu, global menu, focus cycling, then the active window.
    pub fn handle_key(&mut self, key: &KeyEvent) {
        if key.kind == KeyEventKind::Release {
            return;
        }
        if let Some(dialog) = self.dialog.as_mut() {
            if dialog.is_input() && is_paste_shortcut(key) {
                if let Some(text) = self.clipboard.paste() {
                    dialog.insert_text(&text);
                }
                return;
            }
            if let Some(index) = dialog.handle_key(key, &self.keybindings) {
                self.resolve_dialog(index);
            }
            return;
        }
        if self.keybindings.matches(Action::Exit, key) {
            self.execute_action(AppAction::Exit);
            return;
        }
        if self.keybindings.matches(Action::MenuToggle, key) {
            self.toggle_menus();
            return;
        }
        if self.window_menu_key(key) {
            return;
        }
        match self.menu.handle_key(key, &self.keybindings) {
            MenuKeyOutcome::Ignored => {}
            MenuKeyOutcome::Consumed | MenuKeyOutcome::Closed => return,
            MenuKeyOutcome::Selected(action) => {
                self.execute_action(action);
                return;
            }
        }
        // Escape with nothing open to close stops here.
        if self.keybindings.matches(Action::MenuClose, key) {
            return;
        }
        if self.keybindings.matches(Action::FocusNext, key) {
            let consumed = self
                .windows
                .active_mut()
                .is_some_and(|w| w.app_mut().handle_tab());
            if !consumed && let Some(id) = self.windows.cycle_focus() {
                tracing::debug!(window = %id, "focus cycled");
            }
            return;
        }
        let Some(id) = self.windows.active_id() else {
            return;
        };
        let Some(window) = self.windows.get_mut(id) else {
            return;
        };
        let mut ctx = WindowContext {
            clipboard: &mut self.clipboard,
            config: &self.config,
        };
        let result = window.app_mut().handle_key(key, &mut ctx);
        self.dispatch_opt(result, Some(id));
    }

    /// F10: close whichever menu is open, otherwise open the active window's
    /// menu, falling back to the global one.
    fn toggle_menus(&mut self) {
        if self.menu.is_active() {
            self.menu.close();
            return;
        }
        if let Some(menu) = self.windows.active_mut().and_then(|w| w.menu_mut()) {
            menu.toggle();
            return;
        }
        self.menu.toggle();
    }

    fn window_menu_key(&mut self, key: &KeyEvent) -> bool {
        let Some(id) = self.windows.active_id() else {
            return false;
        };
        let Some(menu) = self.windows.get_mut(id).and_then(|w| w.menu_mut()) else {
            return false;
        };
        match menu.handle_key(key, &self.keybindings) {
            MenuKeyOutcome::Ignored => false,
            MenuKeyOutcome::Consumed | MenuKeyOutcome::Closed => true,
            MenuKeyOutcome::Selected(command) => {
                self.run_window_command(id, &command);
                true
            }
        }
    }

    /// Bracketed paste: into an input dialog when one is up, otherwise typed
    /// into the active window one character at a time.
    pub fn handle_paste(&mut self, text: &str) {
        if let Some(dialog) = self.dialog.as_mut() {
            if dialog.is_input() {
                dialog.insert_text(text);
            }
            return;
        }
        let Some(id) = self.windows.active_id() else {
            return;
        };
        for ch in text.chars().filter(|c| *c != '\r') {
            let code = if ch == '\n' {
                KeyCode::Enter
            } else {
                KeyCode::Char(ch)
            };
            let key = KeyEvent::new(code, KeyModifiers::NONE);
            let Some(window) = self.windows.get_mut(id) else {
                return;
            };
            let mut ctx = WindowContext {
                clipboard: &mut self.clipboard,
                config: &self.config,
            };
            let result = window.app_mut().handle_key(&key, &mut ctx);
            self.dispatch_opt(result, Some(id));
            if self.dialog.is_some() {
                return;
            }
        }
    }

    /// Hand a window-menu command to the window's [`MenuHost`](crate::window::MenuHost)
    /// and dispatch whatever it asks for.
    pub(crate) fn run_window_command(&mut self, id: WindowId, command: &str) {
        tracing::debug!(window = %id, command, "window menu command");
        let Some(window) = self.windows.get_mut(id) else {
            return;
        };
        window.close_menu();
        let mut ctx = WindowContext {
            clipboard: &mut self.clipboard,
            config: &self.config,
        };
        let result = window
            .app_mut()
            .menu_host()
            .and_then(|host| host.on_menu_command(command, &mut ctx));
        self.dispatch_opt(result, Some(id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DesktopConfig, TermSize};
    use crate::window::test_support::{Blank, Recorder};
    use ratatui::prelude::Rect;

    fn desktop() -> Desktop {
        let config = DesktopConfig {
            system_clipboard: false,
            ..DesktopConfig::default()
        };
        Desktop::new(config, TermSize::new(100, 30)).unwrap()
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn escape_never_reaches_the_window() {
        let mut desk = desktop();
        let recorder = Recorder::default();
        desk.open_window("r", Rect::new(5, 3, 30, 10), Box::new(recorder.clone()));
        desk.handle_key(&key(KeyCode::Esc));
        desk.handle_key(&key(KeyCode::Char('x')));
        assert_eq!(recorder.events(), ["key Char('x')"]);
    }

    #[test]
    fn f10_opens_global_menu_without_windows() {
        let mut desk = desktop();
        desk.handle_key(&key(KeyCode::F(10)));
        assert!(desk.menu().is_active());
        desk.handle_key(&key(KeyCode::Esc));
        assert!(!desk.menu().is_active());
    }

    #[test]
    fn global_menu_enter_runs_selected_action() {
        let mut desk = desktop();
        desk.handle_key(&key(KeyCode::F(10)));
        desk.handle_key(&key(KeyCode::Left));
        desk.handle_key(&key(KeyCode::Enter));
        assert!(desk.dialog().is_some_and(|d| d.title().starts_with("About")));
        assert!(!desk.menu().is_active());
    }

    #[test]
    fn ctrl_q_asks_before_exiting() {
        let mut desk = desktop();
        desk.handle_key(&KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL));
        assert!(desk.dialog().is_some_and(|d| d.is_exit_confirm()));
        assert!(desk.is_running());
    }

    #[test]
    fn tab_cycles_window_focus() {
        let mut desk = desktop();
        let first = desk.open_window("one", Rect::new(2, 2, 20, 8), Box::new(Blank));
        let second = desk.open_window("two", Rect::new(30, 2, 20, 8), Box::new(Blank));
        assert_eq!(desk.windows().active_id(), Some(second));
        desk.handle_key(&key(KeyCode::Tab));
        assert_eq!(desk.windows().active_id(), Some(first));
    }

    #[test]
    fn paste_goes_into_input_dialog() {
        let mut desk = desktop();
        desk.open_dialog(crate::components::Dialog::input("Open File", "Path:", "", 40));
        desk.handle_paste("/tmp/x");
        assert_eq!(desk.dialog().and_then(|d| d.value()), Some("/tmp/x"));
    }
}
