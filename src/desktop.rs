//! The compositor: owns the window registry, the global chrome and every
//! piece of modal state, and runs the draw → read → dispatch cycle.
use std::fmt;
use std::io;
use std::path::PathBuf;

use crossterm::event::Event;
use ratatui::prelude::Rect;

use crate::actions::{AppAction, ConfigUpdate};
use crate::apps::{FolderWindow, LogViewer, NoteWindow};
use crate::background::BackgroundOperationManager;
use crate::clipboard::Clipboard;
use crate::components::{
    Component, DesktopIcons, Dialog, Menu, MenuAnchor, MenuBar, MenuItem, StatusBar, Taskbar,
};
use crate::config::{DesktopConfig, TermSize};
use crate::constants::{DESKTOP_PATTERN, DESKTOP_PATTERN_ASCII, EXIT_DIALOG_TITLE};
use crate::content::{self, APP_NAME, APP_VERSION};
use crate::debug_log::DebugLogHandle;
use crate::dispatch::ActionDispatcher;
use crate::drag_drop::DragDropController;
use crate::drivers::{InputDriver, OutputDriver};
use crate::error::DesktopError;
use crate::event_loop::{ControlFlow, EventLoop};
use crate::input::{ClickTracker, MouseInput};
use crate::keybindings::KeyBindings;
use crate::layout::workspace_rect;
use crate::theme;
use crate::ui::UiFrame;
use crate::window::decorator::{RetroDecorator, WindowDecorator};
use crate::window::{WindowApp, WindowId, WindowRegistry};

pub struct Desktop {
    pub(crate) config: DesktopConfig,
    pub(crate) term: TermSize,
    pub(crate) windows: WindowRegistry,
    pub(crate) menu: MenuBar<AppAction>,
    pub(crate) dialog: Option<Dialog>,
    pub(crate) drag_drop: DragDropController,
    pub(crate) background: BackgroundOperationManager,
    pub(crate) dispatcher: ActionDispatcher,
    pub(crate) clipboard: Clipboard,
    pub(crate) keybindings: KeyBindings,
    pub(crate) icons: DesktopIcons,
    pub(crate) taskbar: Taskbar,
    pub(crate) status_bar: StatusBar,
    pub(crate) decorator: RetroDecorator,
    pub(crate) clicks: ClickTracker,
    /// Whether the last mouse report had a button held.
    pub(crate) button_down: bool,
    pub(crate) log: Option<DebugLogHandle>,
    pub(crate) running: bool,
    host: String,
}

impl fmt::Debug for Desktop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Desktop")
            .field("term", &self.term)
            .field("windows", &self.windows.len())
            .field("active", &self.windows.active_id())
            .field("dialog", &self.dialog.as_ref().map(Dialog::title))
            .field("running", &self.running)
            .finish_non_exhaustive()
    }
}

fn global_menus() -> Vec<Menu<AppAction>> {
    vec![
        Menu::new(
            "File",
            vec![
                MenuItem::new("New Window", AppAction::NewWindow),
                MenuItem::new("Files", AppAction::Files),
                MenuItem::new("Log Viewer", AppAction::LogViewer),
                MenuItem::separator(),
                MenuItem::new("Exit  Ctrl+Q", AppAction::Exit),
            ],
        ),
        Menu::new(
            "Help",
            vec![
                MenuItem::new("About", AppAction::About),
                MenuItem::new("Keyboard Help", AppAction::Help),
            ],
        ),
    ]
}

impl Desktop {
    pub fn new(config: DesktopConfig, term: TermSize) -> Result<Self, DesktopError> {
        config.check_terminal(term)?;
        let host = hostname::get()
            .map(|h| h.to_string_lossy().into_owned())
            .unwrap_or_else(|_| "localhost".to_string());
        let mut status_bar = StatusBar::new();
        status_bar.set_style(theme::style(theme::status_fg(), theme::status_bg()));
        tracing::info!(width = term.width, height = term.height, "desktop created");
        Ok(Self {
            clipboard: Clipboard::new(config.system_clipboard),
            icons: DesktopIcons::defaults(config.ascii_icons),
            decorator: RetroDecorator::new(config.ascii_icons),
            config,
            term,
            windows: WindowRegistry::new(),
            menu: MenuBar::global(global_menus()),
            dialog: None,
            drag_drop: DragDropController::new(),
            background: BackgroundOperationManager::new(),
            dispatcher: ActionDispatcher::with_defaults(),
            keybindings: KeyBindings::default(),
            taskbar: Taskbar::new(),
            status_bar,
            clicks: ClickTracker::new(),
            button_down: false,
            log: None,
            running: true,
            host,
        })
    }

    /// Attach the log buffer shown by the log viewer window.
    pub fn with_log(mut self, log: DebugLogHandle) -> Self {
        self.log = Some(log);
        self
    }

    pub fn config(&self) -> &DesktopConfig {
        &self.config
    }

    pub fn term_size(&self) -> TermSize {
        self.term
    }

    pub fn windows(&self) -> &WindowRegistry {
        &self.windows
    }

    pub fn windows_mut(&mut self) -> &mut WindowRegistry {
        &mut self.windows
    }

    pub fn menu(&self) -> &MenuBar<AppAction> {
        &self.menu
    }

    pub fn dialog(&self) -> Option<&Dialog> {
        self.dialog.as_ref()
    }

    pub fn icons(&self) -> &DesktopIcons {
        &self.icons
    }

    pub fn taskbar(&self) -> &Taskbar {
        &self.taskbar
    }

    pub fn status_bar(&self) -> &StatusBar {
        &self.status_bar
    }

    pub fn drag_drop(&self) -> &DragDropController {
        &self.drag_drop
    }

    pub fn background(&self) -> &BackgroundOperationManager {
        &self.background
    }

    pub fn dispatcher_mut(&mut self) -> &mut ActionDispatcher {
        &mut self.dispatcher
    }

    pub fn clipboard(&self) -> &Clipboard {
        &self.clipboard
    }

    pub fn clipboard_mut(&mut self) -> &mut Clipboard {
        &mut self.clipboard
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Ask the loop to stop after the current frame, without confirmation.
    pub fn request_quit(&mut self) {
        self.running = false;
    }

    /// Drive the desktop until the exit action is confirmed, then run every
    /// window's close hook. Only driver I/O errors escape.
    pub fn run<I, O>(&mut self, input: I, output: &mut O) -> io::Result<()>
    where
        I: InputDriver,
        O: OutputDriver,
    {
        output.enter()?;
        let mut event_loop = EventLoop::new(input, self.config.poll_interval);
        let result = event_loop.run(|_, event| {
            match event {
                None => {
                    self.tick();
                    output.draw(|mut frame| self.render(&mut frame))?;
                }
                Some(event) => self.handle_event(event),
            }
            Ok(if self.running {
                ControlFlow::Continue
            } else {
                ControlFlow::Quit
            })
        });
        self.shutdown();
        let restored = output.exit();
        result.and(restored)
    }

    /// Close every window, logging close-hook failures per window.
    pub fn shutdown(&mut self) {
        tracing::info!(windows = self.windows.len(), "desktop shutting down");
        self.dialog = None;
        self.windows.close_all();
    }

    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => self.handle_key(&key),
            Event::Mouse(mouse) => {
                if let Some(input) = MouseInput::from_event(mouse) {
                    self.handle_mouse(input);
                }
            }
            Event::Paste(text) => self.handle_paste(&text),
            Event::Resize(width, height) => self.resize(TermSize::new(width, height)),
            Event::FocusGained | Event::FocusLost => {}
        }
    }

    pub fn resize(&mut self, term: TermSize) {
        tracing::debug!(width = term.width, height = term.height, "terminal resized");
        self.term = term;
        self.windows.clamp_all(term);
    }

    /// Per-frame housekeeping that does not depend on input.
    pub fn tick(&mut self) {
        self.poll_background();
        self.windows.normalize_layers();
        self.taskbar.set_entries(self.windows.minimized());
        self.status_bar.set_left(format!(
            " {APP_NAME} v{APP_VERSION} | Windows: {}/{}",
            self.windows.visible_count(),
            self.windows.len()
        ));
        self.status_bar.set_right(format!("{} ", self.host));
    }

    pub fn render(&mut self, frame: &mut UiFrame<'_>) {
        let area = frame.area();
        let desktop_style = theme::style(theme::desktop_fg(), theme::desktop_bg());
        let pattern = if self.config.ascii_icons {
            DESKTOP_PATTERN_ASCII
        } else {
            DESKTOP_PATTERN
        };
        frame.fill(area, " ", desktop_style);
        frame.fill(workspace_rect(self.term), &pattern.to_string(), desktop_style);
        self.icons.render(frame);

        let decorator = &self.decorator;
        for window in self.windows.iter_mut() {
            if !window.is_visible() {
                continue;
            }
            decorator.render_window(frame, window);
            let body = window.body_rect();
            let focused = window.is_active();
            window.app_mut().render(frame, body, focused);
            if let Some(menu) = window.menu()
                && menu.is_active()
            {
                menu.render_dropdown(frame, window.menu_anchor());
            }
        }

        let anchor = MenuAnchor::global(area.width);
        self.menu.render_bar(frame, anchor, true);
        let clock = chrono::Local::now().format(" %H:%M ").to_string();
        let clock_x = area.width.saturating_sub(clock.chars().count() as u16 + 1);
        frame.set_string(clock_x, 0, &clock, theme::menu_style(false));
        if self.menu.is_active() {
            self.menu.render_dropdown(frame, anchor);
        }

        let bottom = area.y + area.height;
        self.taskbar
            .render(frame, Rect::new(area.x, bottom.saturating_sub(2), area.width, 1));
        self.status_bar
            .render(frame, Rect::new(area.x, bottom.saturating_sub(1), area.width, 1));

        if let Some(dialog) = &self.dialog {
            dialog.render(frame);
        }
    }

    /// Make `dialog` the modal receiver of all input. Open menus close and
    /// any drag in progress is abandoned.
    pub fn open_dialog(&mut self, dialog: Dialog) {
        tracing::debug!(title = dialog.title(), "dialog opened");
        self.menu.close();
        self.windows.close_menus_except(None);
        self.drag_drop.cancel(&mut self.windows);
        self.dialog = Some(dialog);
    }

    /// Add a window with exactly `rect` and focus it.
    pub fn open_window(
        &mut self,
        title: &str,
        rect: Rect,
        app: Box<dyn WindowApp>,
    ) -> WindowId {
        let id = self.windows.spawn(title, rect, app);
        tracing::info!(window = %id, title, "window opened");
        id
    }

    /// Open a window offset from `base` by two columns and one row per
    /// window already open, shrunk to fit the workspace.
    pub(crate) fn spawn_staggered(
        &mut self,
        title: &str,
        base: (u16, u16),
        size: (u16, u16),
        app: Box<dyn WindowApp>,
    ) -> WindowId {
        let count = self.windows.len() as u16;
        let workspace = workspace_rect(self.term);
        let width = size.0.min(workspace.width);
        let height = size.1.min(workspace.height);
        let x = (base.0 + count * 2).min(self.term.width.saturating_sub(width));
        let y = (base.1 + count).min(workspace.bottom().saturating_sub(height));
        self.open_window(title, Rect::new(x, y.max(workspace.y), width, height), app)
    }

    pub fn close_window(&mut self, id: WindowId) {
        self.windows.close(id);
    }

    pub fn execute_action(&mut self, action: AppAction) {
        tracing::debug!(action = %action, "executing action");
        match action {
            AppAction::Exit => self.open_dialog(Dialog::new(
                EXIT_DIALOG_TITLE,
                "Are you sure you want to exit?\n\nAll windows will be closed.",
                &["Yes", "No"],
                44,
            )),
            AppAction::About => {
                let title = format!("About {APP_NAME}");
                let message = content::about_message(&self.host);
                self.open_dialog(Dialog::new(title, &message, &["OK"], 52));
            }
            AppAction::Help => {
                let message = content::help_message(&self.keybindings);
                self.open_dialog(Dialog::new("Keyboard & Mouse Help", &message, &["OK"], 46));
            }
            AppAction::NewWindow => {
                self.spawn_staggered("Untitled", (20, 4), (60, 20), Box::new(NoteWindow::new()));
            }
            AppAction::Files => match std::env::current_dir() {
                Ok(dir) => {
                    self.open_folder(dir);
                }
                Err(err) => self.open_dialog(Dialog::message(
                    "Error",
                    &format!("Cannot read the working directory:\n{err}"),
                )),
            },
            AppAction::LogViewer => {
                let log = self.log.clone().unwrap_or_default();
                self.spawn_staggered("Log Viewer", (16, 4), (74, 22), Box::new(LogViewer::new(log)));
            }
            AppAction::CloseWindow => {
                if let Some(id) = self.windows.active_id() {
                    self.close_window(id);
                }
            }
            AppAction::Custom(name) => {
                tracing::info!(action = %name, "custom action has no built-in effect");
            }
        }
    }

    pub fn open_folder(&mut self, path: PathBuf) -> WindowId {
        let folder = FolderWindow::new(path, self.config.show_hidden);
        let title = folder.title();
        self.spawn_staggered(&title, (15, 3), (58, 22), Box::new(folder))
    }

    pub(crate) fn apply_config(&mut self, update: &ConfigUpdate) {
        self.config.apply(update);
        self.decorator.set_ascii(self.config.ascii_icons);
        if update.ascii_icons.is_some() {
            let selected = self.icons.selected();
            self.icons = DesktopIcons::defaults(self.config.ascii_icons);
            self.icons.select(selected);
        }
        tracing::info!(?update, "configuration updated");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::test_support::Blank;

    fn desktop() -> Desktop {
        let config = DesktopConfig {
            system_clipboard: false,
            ..DesktopConfig::default()
        };
        Desktop::new(config, TermSize::new(80, 24)).unwrap()
    }

    #[test]
    fn too_small_terminal_is_fatal() {
        let err = Desktop::new(DesktopConfig::default(), TermSize::new(40, 10)).unwrap_err();
        assert!(matches!(err, DesktopError::TerminalTooSmall { .. }));
    }

    #[test]
    fn debug_summarises_state() {
        let mut d = desktop();
        d.open_window("w", Rect::new(5, 3, 30, 10), Box::new(Blank));
        let text = format!("{d:?}");
        assert!(text.starts_with("Desktop"));
        assert!(text.contains("windows: 1"));
        assert!(text.contains("running: true"));
    }

    #[test]
    fn files_action_opens_folder_window() {
        let mut d = desktop();
        d.execute_action(AppAction::Files);
        assert!(d.dialog().is_none());
        assert_eq!(d.windows.len(), 1);
        let title = d.windows.iter().next().unwrap().title().to_string();
        assert!(title.starts_with("Files - "));
    }

    #[test]
    fn staggered_windows_shift_per_open_window() {
        let mut d = desktop();
        let a = d.spawn_staggered("a", (10, 3), (30, 10), Box::new(Blank));
        let b = d.spawn_staggered("b", (10, 3), (30, 10), Box::new(Blank));
        assert_eq!(d.windows.get(a).unwrap().rect(), Rect::new(10, 3, 30, 10));
        assert_eq!(d.windows.get(b).unwrap().rect(), Rect::new(12, 4, 30, 10));
        assert_eq!(d.windows.active_id(), Some(b));
    }

    #[test]
    fn staggered_window_fits_workspace() {
        let mut d = desktop();
        let id = d.spawn_staggered("big", (70, 20), (200, 100), Box::new(Blank));
        assert_eq!(d.windows.get(id).unwrap().rect(), Rect::new(0, 1, 80, 21));
    }

    #[test]
    fn exit_action_opens_confirmation() {
        let mut d = desktop();
        d.execute_action(AppAction::Exit);
        let dialog = d.dialog().unwrap();
        assert!(dialog.is_exit_confirm());
        assert_eq!(dialog.buttons(), ["Yes", "No"]);
        d.resolve_dialog(1);
        assert!(d.is_running());
        d.execute_action(AppAction::Exit);
        d.resolve_dialog(0);
        assert!(!d.is_running());
    }

    #[test]
    fn tick_updates_chrome() {
        let mut d = desktop();
        let id = d.open_window("w", Rect::new(5, 3, 30, 10), Box::new(Blank));
        d.windows.minimize(id);
        d.tick();
        assert!(d.status_bar.left().contains("Windows: 0/1"));
        assert_eq!(d.taskbar.buttons(22, 80).len(), 1);
    }

    #[test]
    fn resize_clamps_windows() {
        let mut d = desktop();
        let id = d.open_window("w", Rect::new(60, 15, 20, 8), Box::new(Blank));
        d.resize(TermSize::new(70, 20));
        let rect = d.windows.get(id).unwrap().rect();
        assert_eq!((rect.x, rect.y), (50, 11));
    }
}
