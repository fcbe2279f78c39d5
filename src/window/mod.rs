//! Window records and the seam between the compositor and hosted apps.
//!
//! The desktop owns geometry and lifecycle flags for every window; the app
//! inside a window only sees its body rectangle and the events routed to it.
//! Optional features (menus, drag and drop, file operations, documents,
//! process control, close hooks) are discovered at runtime through the
//! capability accessors on [`WindowApp`], each returning `None` by default.
pub mod decorator;
pub mod registry;

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use crossterm::event::{KeyEvent, MouseButton};
use ratatui::prelude::Rect;

use crate::actions::{ActionResult, KillRequest};
use crate::clipboard::Clipboard;
use crate::components::menu_bar::{Menu, MenuAnchor, MenuBar};
use crate::config::{DesktopConfig, TermSize};
use crate::constants::{
    CLOSE_BUTTON_OFFSET, MAX_BUTTON_OFFSET, MENU_BAR_HEIGHT, MIN_BUTTON_OFFSET,
    TITLE_BUTTON_WIDTH,
};
use crate::drag_drop::DragPayload;
use crate::file_ops::{EntryInfo, FileJob, FileOperation};
use crate::layout::floating::{self, ResizeEdge};
use crate::layout::rect_contains;
use crate::ui::UiFrame;

pub use registry::WindowRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowId(u64);

impl WindowId {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A point inside a window body, relative to the body's top-left cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodyPoint {
    pub column: u16,
    pub row: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    Up,
    Down,
}

/// Desktop services lent to a window while it handles input or a menu command.
pub struct WindowContext<'a> {
    pub clipboard: &'a mut Clipboard,
    pub config: &'a DesktopConfig,
}

/// Content hosted inside a desktop window.
pub trait WindowApp {
    /// Draw into `body`, the area inside the frame (and below the window
    /// menu, if any).
    fn render(&mut self, frame: &mut UiFrame<'_>, body: Rect, focused: bool);

    fn handle_key(
        &mut self,
        _key: &KeyEvent,
        _ctx: &mut WindowContext<'_>,
    ) -> Option<ActionResult> {
        None
    }

    fn handle_click(
        &mut self,
        _at: BodyPoint,
        _button: MouseButton,
        _ctx: &mut WindowContext<'_>,
    ) -> Option<ActionResult> {
        None
    }

    fn handle_scroll(&mut self, _direction: ScrollDirection, _steps: u16) {}

    /// Pointer motion with a button held, for apps that track selections.
    fn handle_mouse_drag(&mut self, _at: BodyPoint) {}

    /// Internal focus cycling (e.g. between panes). Return `true` when Tab
    /// was consumed; otherwise the desktop cycles window focus.
    fn handle_tab(&mut self) -> bool {
        false
    }

    /// Reload whatever the window shows from its source.
    fn refresh(&mut self) {}

    fn menu_host(&mut self) -> Option<&mut dyn MenuHost> {
        None
    }

    fn drop_target(&mut self) -> Option<&mut dyn DropTarget> {
        None
    }

    fn drag_source(&mut self) -> Option<&mut dyn DragSource> {
        None
    }

    fn file_operations(&mut self) -> Option<&mut dyn FileOperations> {
        None
    }

    fn document(&mut self) -> Option<&mut dyn Document> {
        None
    }

    fn process_control(&mut self) -> Option<&mut dyn ProcessControl> {
        None
    }

    fn closable(&mut self) -> Option<&mut dyn Closable> {
        None
    }
}

/// Windows with their own menu row. Item actions are command strings passed
/// back through [`MenuHost::on_menu_command`].
pub trait MenuHost {
    fn menus(&self) -> Vec<Menu<String>>;

    fn on_menu_command(
        &mut self,
        command: &str,
        ctx: &mut WindowContext<'_>,
    ) -> Option<ActionResult>;
}

pub trait DropTarget {
    fn accept_dropped_path(&mut self, path: &Path) -> Option<ActionResult>;
}

/// Windows that can start a drag. A click marks a candidate; the desktop
/// only turns it into a payload once the pointer moves with the button held.
pub trait DragSource {
    fn has_pending_drag(&self) -> bool;
    fn consume_pending_drag(&mut self) -> Option<DragPayload>;
    fn clear_pending_drag(&mut self);
}

/// Filesystem views. Jobs built by [`FileOperations::prepare`] must own
/// everything they touch; they may run on a worker thread.
pub trait FileOperations {
    fn selected_entry(&self) -> Option<EntryInfo>;
    fn current_path(&self) -> PathBuf;
    fn other_pane_path(&self) -> Option<PathBuf> {
        None
    }
    fn prepare(&mut self, operation: &FileOperation) -> Result<FileJob, String>;
    fn rename_selected(&mut self, new_name: &str) -> Option<ActionResult>;
    fn create_directory(&mut self, name: &str) -> Option<ActionResult>;
    fn create_file(&mut self, name: &str) -> Option<ActionResult>;
}

pub trait Document {
    fn save_as(&mut self, name: &str) -> Option<ActionResult>;
    fn open_path(&mut self, path: &str) -> Option<ActionResult>;
}

pub trait ProcessControl {
    fn kill_process(&mut self, request: &KillRequest) -> Option<ActionResult>;
}

/// Cleanup run when the window closes and again for every window at
/// shutdown. Errors are logged, never surfaced.
pub trait Closable {
    fn close(&mut self) -> io::Result<()>;
}

pub struct Window {
    id: WindowId,
    title: String,
    rect: Rect,
    restore_rect: Option<Rect>,
    visible: bool,
    active: bool,
    minimized: bool,
    maximized: bool,
    always_on_top: bool,
    resizable: bool,
    /// Pointer offset from the origin while the title bar is being dragged.
    drag_grab: Option<(u16, u16)>,
    resize_edge: Option<ResizeEdge>,
    drop_highlight: bool,
    menu: Option<MenuBar<String>>,
    app: Box<dyn WindowApp>,
}

impl fmt::Debug for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Window")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("rect", &self.rect)
            .field("visible", &self.visible)
            .field("active", &self.active)
            .field("minimized", &self.minimized)
            .field("maximized", &self.maximized)
            .field("always_on_top", &self.always_on_top)
            .finish_non_exhaustive()
    }
}

impl Window {
    pub(crate) fn new(
        id: WindowId,
        title: impl Into<String>,
        rect: Rect,
        mut app: Box<dyn WindowApp>,
    ) -> Self {
        let menu = app
            .menu_host()
            .map(|host| host.menus())
            .filter(|menus| !menus.is_empty())
            .map(MenuBar::window);
        Self {
            id,
            title: title.into(),
            rect,
            restore_rect: None,
            visible: true,
            active: false,
            minimized: false,
            maximized: false,
            always_on_top: false,
            resizable: true,
            drag_grab: None,
            resize_edge: None,
            drop_highlight: false,
            menu,
            app,
        }
    }

    pub fn id(&self) -> WindowId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    #[cfg(test)]
    pub(crate) fn set_active_flag(&mut self, active: bool) {
        self.active = active;
    }

    pub fn is_minimized(&self) -> bool {
        self.minimized
    }

    pub fn is_maximized(&self) -> bool {
        self.maximized
    }

    pub fn always_on_top(&self) -> bool {
        self.always_on_top
    }

    pub fn set_always_on_top(&mut self, pinned: bool) {
        self.always_on_top = pinned;
    }

    pub fn is_resizable(&self) -> bool {
        self.resizable
    }

    pub fn set_resizable(&mut self, resizable: bool) {
        self.resizable = resizable;
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_grab.is_some()
    }

    pub fn is_resizing(&self) -> bool {
        self.resize_edge.is_some()
    }

    pub fn drop_highlighted(&self) -> bool {
        self.drop_highlight
    }

    pub(crate) fn set_drop_highlight(&mut self, on: bool) {
        self.drop_highlight = on;
    }

    pub fn menu(&self) -> Option<&MenuBar<String>> {
        self.menu.as_ref()
    }

    pub fn menu_mut(&mut self) -> Option<&mut MenuBar<String>> {
        self.menu.as_mut()
    }

    pub fn menu_open(&self) -> bool {
        self.menu.as_ref().is_some_and(MenuBar::is_active)
    }

    pub fn close_menu(&mut self) {
        if let Some(menu) = self.menu.as_mut() {
            menu.close();
        }
    }

    /// Where the window's menu row sits on screen.
    pub fn menu_anchor(&self) -> MenuAnchor {
        MenuAnchor::for_window(self.rect)
    }

    pub fn app(&self) -> &dyn WindowApp {
        self.app.as_ref()
    }

    pub fn app_mut(&mut self) -> &mut dyn WindowApp {
        self.app.as_mut()
    }

    /// Menu row and separator are carved out of the body when present.
    pub fn body_rect(&self) -> Rect {
        let mut body = Rect {
            x: self.rect.x.saturating_add(1),
            y: self.rect.y.saturating_add(1),
            width: self.rect.width.saturating_sub(2),
            height: self.rect.height.saturating_sub(2),
        };
        if self.menu.is_some() {
            body.y = body.y.saturating_add(2);
            body.height = body.height.saturating_sub(2);
        }
        body
    }

    /// Translate a screen cell into body coordinates, if it is inside.
    pub fn body_point(&self, column: u16, row: u16) -> Option<BodyPoint> {
        let body = self.body_rect();
        rect_contains(body, column, row).then(|| BodyPoint {
            column: column - body.x,
            row: row - body.y,
        })
    }

    pub fn contains(&self, column: u16, row: u16) -> bool {
        rect_contains(self.rect, column, row)
    }

    /// The draggable part of the title row, excluding the control buttons.
    pub fn on_title_bar(&self, column: u16, row: u16) -> bool {
        let right = self.rect.x as i32 + self.rect.width as i32;
        let col = column as i32;
        row == self.rect.y
            && col >= self.rect.x as i32 + 1
            && col <= right - 2
            && col < right - MIN_BUTTON_OFFSET as i32
    }

    pub fn on_close_button(&self, column: u16, row: u16) -> bool {
        self.on_title_button(CLOSE_BUTTON_OFFSET, column, row)
    }

    pub fn on_maximize_button(&self, column: u16, row: u16) -> bool {
        self.on_title_button(MAX_BUTTON_OFFSET, column, row)
    }

    pub fn on_minimize_button(&self, column: u16, row: u16) -> bool {
        self.on_title_button(MIN_BUTTON_OFFSET, column, row)
    }

    fn on_title_button(&self, offset: u16, column: u16, row: u16) -> bool {
        let start = self.rect.x as i32 + self.rect.width as i32 - offset as i32;
        let col = column as i32;
        row == self.rect.y && col >= start && col < start + TITLE_BUTTON_WIDTH as i32
    }

    pub fn on_border(&self, column: u16, row: u16) -> Option<ResizeEdge> {
        if !self.resizable || self.maximized {
            return None;
        }
        floating::border_hit(self.rect, column, row)
    }

    pub fn toggle_maximize(&mut self, term: TermSize) {
        if self.maximized {
            if let Some(rect) = self.restore_rect.take() {
                self.rect = rect;
            }
            self.maximized = false;
        } else {
            self.restore_rect = Some(self.rect);
            self.rect = floating::maximized_rect(term);
            self.maximized = true;
            self.close_menu();
        }
    }

    pub fn toggle_minimize(&mut self) {
        self.minimized = !self.minimized;
        self.visible = !self.minimized;
        self.active = !self.minimized;
        self.close_menu();
    }

    pub fn start_drag(&mut self, column: u16, row: u16) {
        self.drag_grab = Some((
            column.saturating_sub(self.rect.x),
            row.saturating_sub(self.rect.y),
        ));
    }

    pub fn start_resize(&mut self, edge: ResizeEdge) {
        self.resize_edge = Some(edge);
    }

    /// Follow the pointer while dragging or resizing. Returns `false` when
    /// neither is in progress.
    pub fn track_pointer(&mut self, column: u16, row: u16, term: TermSize) -> bool {
        if let Some(grab) = self.drag_grab {
            let (x, y) = floating::drag_origin(
                column,
                row,
                grab,
                (self.rect.width, self.rect.height),
                term,
            );
            self.rect.x = x;
            self.rect.y = y;
            return true;
        }
        if let Some(edge) = self.resize_edge {
            self.rect = floating::apply_resize(self.rect, edge, column, row, term);
            return true;
        }
        false
    }

    pub fn stop_pointer_tracking(&mut self) {
        self.drag_grab = None;
        self.resize_edge = None;
    }

    /// Keep the window reachable after the terminal changed size.
    pub fn clamp_to(&mut self, term: TermSize) {
        if self.maximized {
            self.rect = floating::maximized_rect(term);
            return;
        }
        let (x, y) = floating::clamp_origin(self.rect, term);
        self.rect.x = x;
        self.rect.y = y.max(MENU_BAR_HEIGHT);
    }

    pub(crate) fn run_close_hook(&mut self) -> io::Result<()> {
        match self.app.closable() {
            Some(hook) => hook.close(),
            None => Ok(()),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::window;
    use super::*;

    const TERM: TermSize = TermSize {
        width: 80,
        height: 24,
    };

    #[test]
    fn title_bar_excludes_controls() {
        let w = window(1, Rect::new(10, 5, 30, 10));
        assert!(w.on_title_bar(11, 5));
        assert!(w.on_title_bar(29, 5));
        assert!(!w.on_title_bar(30, 5));
        assert!(!w.on_title_bar(10, 5));
        assert!(!w.on_title_bar(15, 6));
    }

    #[test]
    fn title_buttons_are_three_cells_wide() {
        let w = window(1, Rect::new(10, 5, 30, 10));
        assert!(w.on_minimize_button(30, 5));
        assert!(w.on_minimize_button(32, 5));
        assert!(w.on_maximize_button(33, 5));
        assert!(w.on_close_button(36, 5));
        assert!(w.on_close_button(38, 5));
        assert!(!w.on_close_button(39, 5));
        assert!(!w.on_close_button(36, 6));
    }

    #[test]
    fn maximize_round_trips_geometry() {
        let mut w = window(1, Rect::new(10, 5, 30, 10));
        w.toggle_maximize(TERM);
        assert!(w.is_maximized());
        assert_eq!(w.rect(), Rect::new(0, 1, 80, 22));
        assert_eq!(w.on_border(79, 10), None);
        w.toggle_maximize(TERM);
        assert_eq!(w.rect(), Rect::new(10, 5, 30, 10));
    }

    #[test]
    fn minimize_hides_and_deactivates() {
        let mut w = window(1, Rect::new(10, 5, 30, 10));
        w.set_active_flag(true);
        w.toggle_minimize();
        assert!(!w.is_visible());
        assert!(!w.is_active());
        w.toggle_minimize();
        assert!(w.is_visible());
        assert!(w.is_active());
    }

    #[test]
    fn drag_keeps_window_below_menu_bar() {
        let mut w = window(1, Rect::new(10, 5, 30, 10));
        w.start_drag(12, 5);
        assert!(w.track_pointer(2, 0, TERM));
        assert_eq!((w.rect().x, w.rect().y), (0, 1));
        w.stop_pointer_tracking();
        assert!(!w.track_pointer(20, 10, TERM));
    }

    #[test]
    fn body_point_is_relative() {
        let w = window(1, Rect::new(10, 5, 30, 10));
        assert_eq!(
            w.body_point(11, 6),
            Some(BodyPoint { column: 0, row: 0 })
        );
        assert_eq!(w.body_point(10, 6), None);
    }
}
