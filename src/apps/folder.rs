//! Directory listing window: navigation, file operations, and both ends of
//! drag and drop.
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, MouseButton};
use ratatui::prelude::Rect;

use crate::actions::{ActionResult, AppAction, ConfigUpdate};
use crate::components::{Menu, MenuItem, ScrollState, render_scrollbar};
use crate::drag_drop::DragPayload;
use crate::file_ops::{self, EntryInfo, FileJob, FileOperation};
use crate::input::{ClickTarget, ClickTracker};
use crate::theme;
use crate::ui::{UiFrame, fit_to_width};
use crate::window::{
    BodyPoint, DragSource, DropTarget, FileOperations, MenuHost, ScrollDirection, WindowApp,
    WindowContext,
};

/// Rows above the entry list: the current path.
const HEADER_ROWS: u16 = 1;

pub struct FolderWindow {
    path: PathBuf,
    entries: Vec<EntryInfo>,
    selected: usize,
    scroll: ScrollState,
    show_hidden: bool,
    error: Option<String>,
    clicks: ClickTracker,
    pending_drag: Option<PathBuf>,
}

impl FolderWindow {
    pub fn new(path: PathBuf, show_hidden: bool) -> Self {
        let path = fs::canonicalize(&path).unwrap_or(path);
        let mut folder = Self {
            path,
            entries: Vec::new(),
            selected: 0,
            scroll: ScrollState::default(),
            show_hidden,
            error: None,
            clicks: ClickTracker::new(),
            pending_drag: None,
        };
        folder.reload();
        folder
    }

    pub fn title(&self) -> String {
        let name = self
            .path
            .file_name()
            .map_or_else(|| self.path.display().to_string(), |n| n.to_string_lossy().into_owned());
        format!("Files - {name}")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entries(&self) -> &[EntryInfo] {
        &self.entries
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn select(&mut self, index: usize) {
        self.selected = index.min(self.entries.len().saturating_sub(1));
    }

    /// Select the entry called `name`, if listed.
    pub fn select_name(&mut self, name: &str) -> bool {
        match self.entries.iter().position(|e| e.name == name) {
            Some(index) => {
                self.selected = index;
                true
            }
            None => false,
        }
    }

    /// Re-read the directory, keeping the selection on the same name when
    /// it still exists.
    fn reload(&mut self) {
        let keep = self.entries.get(self.selected).map(|e| e.name.clone());
        match read_entries(&self.path, self.show_hidden) {
            Ok(entries) => {
                self.entries = entries;
                self.error = None;
            }
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "cannot list directory");
                self.entries = parent_entry(&self.path).into_iter().collect();
                self.error = Some(err.to_string());
            }
        }
        if !keep.is_some_and(|name| self.select_name(&name)) {
            self.select(self.selected);
        }
    }

    fn navigate(&mut self, path: PathBuf) {
        tracing::debug!(path = %path.display(), "navigate");
        self.path = path;
        self.selected = 0;
        self.scroll.reset();
        self.entries.clear();
        self.reload();
    }

    /// Enter a directory or ask the desktop to open a file.
    fn activate_selected(&mut self) -> Option<ActionResult> {
        let entry = self.entries.get(self.selected)?.clone();
        if entry.is_dir {
            self.navigate(entry.path);
            None
        } else {
            Some(ActionResult::OpenFile(entry.path))
        }
    }

    fn go_parent(&mut self) {
        if let Some(parent) = self.path.parent().map(Path::to_path_buf) {
            let from = self.path.file_name().map(|n| n.to_string_lossy().into_owned());
            self.navigate(parent);
            if let Some(name) = from {
                self.select_name(&name);
            }
        }
    }

    fn toggle_hidden(&mut self) -> Option<ActionResult> {
        self.show_hidden = !self.show_hidden;
        self.reload();
        Some(ActionResult::UpdateConfig(ConfigUpdate {
            show_hidden: Some(self.show_hidden),
            ..ConfigUpdate::default()
        }))
    }

    fn move_selection(&mut self, delta: isize) {
        if self.entries.is_empty() {
            return;
        }
        let last = self.entries.len() - 1;
        self.selected = if delta.is_negative() {
            self.selected.saturating_sub(delta.unsigned_abs())
        } else {
            self.selected.saturating_add(delta as usize).min(last)
        };
    }

    fn keep_selected_in_view(&mut self, view: usize) {
        if view == 0 {
            return;
        }
        if self.selected < self.scroll.offset {
            self.scroll.offset = self.selected;
        } else if self.selected >= self.scroll.offset + view {
            self.scroll.offset = self.selected + 1 - view;
        }
    }

    fn entry_line(entry: &EntryInfo, width: usize) -> String {
        let marker = if entry.is_dir { "[DIR]" } else { "     " };
        let size = match (entry.is_dir, entry.size) {
            (false, Some(size)) => human_size(size),
            _ => String::new(),
        };
        let name_width = width.saturating_sub(marker.len() + size.len() + 2);
        let name = fit_to_width(&entry.name, name_width);
        format!("{marker} {name} {size}")
    }
}

impl WindowApp for FolderWindow {
    fn render(&mut self, frame: &mut UiFrame<'_>, body: Rect, focused: bool) {
        if body.height <= HEADER_ROWS || body.width == 0 {
            return;
        }
        let body_style = theme::style(theme::window_body_fg(), theme::window_body_bg());
        let header = fit_to_width(&self.path.display().to_string(), body.width as usize);
        frame.set_string(body.x, body.y, &header, theme::style(theme::status_fg(), theme::status_bg()));

        let list = Rect::new(body.x, body.y + HEADER_ROWS, body.width, body.height - HEADER_ROWS);
        let view = list.height as usize;
        self.keep_selected_in_view(view);
        self.scroll.apply(self.entries.len(), view);
        let overflow = self.entries.len() > view;
        let text_width = if overflow { list.width - 1 } else { list.width } as usize;
        if let Some(error) = &self.error {
            let line = fit_to_width(&format!("Error: {error}"), text_width);
            frame.set_string(list.x, list.y + list.height - 1, &line, body_style);
        }
        for (row, entry) in self.entries.iter().enumerate().skip(self.scroll.offset).take(view) {
            let y = list.y + (row - self.scroll.offset) as u16;
            let style = if row == self.selected {
                theme::menu_style(focused)
            } else {
                body_style
            };
            frame.set_string(list.x, y, &Self::entry_line(entry, text_width), style);
        }
        render_scrollbar(frame, list, self.entries.len(), view, self.scroll.offset);
    }

    fn handle_key(&mut self, key: &KeyEvent, _ctx: &mut WindowContext<'_>) -> Option<ActionResult> {
        match key.code {
            KeyCode::Up => self.move_selection(-1),
            KeyCode::Down => self.move_selection(1),
            KeyCode::PageUp => self.move_selection(-10),
            KeyCode::PageDown => self.move_selection(10),
            KeyCode::Home => self.selected = 0,
            KeyCode::End => self.move_selection(isize::MAX),
            KeyCode::Enter => return self.activate_selected(),
            KeyCode::Backspace => self.go_parent(),
            KeyCode::F(2) => return Some(ActionResult::RequestRenameEntry),
            KeyCode::F(4) | KeyCode::F(6) => return Some(ActionResult::RequestMoveEntry),
            KeyCode::F(5) => return Some(ActionResult::RequestCopyEntry),
            KeyCode::F(7) => return Some(ActionResult::RequestNewDir),
            KeyCode::F(8) => return Some(ActionResult::RequestNewFile),
            KeyCode::Delete => return Some(ActionResult::RequestDeleteConfirm),
            KeyCode::Char('h') | KeyCode::Char('H') => return self.toggle_hidden(),
            _ => {}
        }
        None
    }

    fn handle_click(
        &mut self,
        at: BodyPoint,
        button: MouseButton,
        ctx: &mut WindowContext<'_>,
    ) -> Option<ActionResult> {
        if at.row < HEADER_ROWS {
            return None;
        }
        let index = self.scroll.offset + (at.row - HEADER_ROWS) as usize;
        let entry = self.entries.get(index)?;
        self.selected = index;
        if button != MouseButton::Left {
            return None;
        }
        self.pending_drag = (!entry.is_parent_link()).then(|| entry.path.clone());
        let double = self.clicks.register(
            ClickTarget::ListRow(index),
            Instant::now(),
            ctx.config.double_click_interval,
        );
        if double {
            self.pending_drag = None;
            return self.activate_selected();
        }
        None
    }

    fn handle_scroll(&mut self, direction: ScrollDirection, steps: u16) {
        let delta = steps as isize;
        match direction {
            ScrollDirection::Up => self.move_selection(-delta),
            ScrollDirection::Down => self.move_selection(delta),
        }
    }

    fn refresh(&mut self) {
        self.reload();
    }

    fn menu_host(&mut self) -> Option<&mut dyn MenuHost> {
        Some(self)
    }

    fn drop_target(&mut self) -> Option<&mut dyn DropTarget> {
        Some(self)
    }

    fn drag_source(&mut self) -> Option<&mut dyn DragSource> {
        Some(self)
    }

    fn file_operations(&mut self) -> Option<&mut dyn FileOperations> {
        Some(self)
    }
}

impl MenuHost for FolderWindow {
    fn menus(&self) -> Vec<Menu<String>> {
        let item = |label: &str, command: &str| MenuItem::new(label, command.to_string());
        vec![
            Menu::new(
                "File",
                vec![
                    item("Open       Enter", "open"),
                    item("Copy          F5", "copy"),
                    item("Move          F4", "move"),
                    item("Rename        F2", "rename"),
                    item("Delete       Del", "delete"),
                    item("New Folder    F7", "new_dir"),
                    item("New File      F8", "new_file"),
                    item("Parent Dir  Bksp", "parent"),
                    MenuItem::separator(),
                    item("Close", "close"),
                ],
            ),
            Menu::new(
                "View",
                vec![
                    item("Hidden Files   H", "toggle_hidden"),
                    item("Refresh", "refresh"),
                ],
            ),
        ]
    }

    fn on_menu_command(
        &mut self,
        command: &str,
        _ctx: &mut WindowContext<'_>,
    ) -> Option<ActionResult> {
        match command {
            "open" => self.activate_selected(),
            "copy" => Some(ActionResult::RequestCopyEntry),
            "move" => Some(ActionResult::RequestMoveEntry),
            "rename" => Some(ActionResult::RequestRenameEntry),
            "delete" => Some(ActionResult::RequestDeleteConfirm),
            "new_dir" => Some(ActionResult::RequestNewDir),
            "new_file" => Some(ActionResult::RequestNewFile),
            "parent" => {
                self.go_parent();
                None
            }
            "toggle_hidden" => self.toggle_hidden(),
            "refresh" => Some(ActionResult::Refresh),
            "close" => Some(ActionResult::Execute(AppAction::CloseWindow)),
            other => {
                tracing::debug!(command = other, "unknown folder command");
                None
            }
        }
    }
}

impl DragSource for FolderWindow {
    fn has_pending_drag(&self) -> bool {
        self.pending_drag.is_some()
    }

    fn consume_pending_drag(&mut self) -> Option<DragPayload> {
        self.pending_drag.take().map(DragPayload::file)
    }

    fn clear_pending_drag(&mut self) {
        self.pending_drag = None;
    }
}

impl DropTarget for FolderWindow {
    /// Ask the desktop to copy the dropped path into the listed directory.
    fn accept_dropped_path(&mut self, path: &Path) -> Option<ActionResult> {
        Some(ActionResult::CopyDropped {
            path: path.to_path_buf(),
            destination: self.path.clone(),
        })
    }
}

impl FileOperations for FolderWindow {
    fn selected_entry(&self) -> Option<EntryInfo> {
        self.entries.get(self.selected).cloned()
    }

    fn current_path(&self) -> PathBuf {
        self.path.clone()
    }

    fn prepare(&mut self, operation: &FileOperation) -> Result<FileJob, String> {
        let entry = self
            .selected_entry()
            .filter(|e| !e.is_parent_link())
            .ok_or_else(|| "No item selected.".to_string())?;
        file_ops::job_for(&entry, operation)
    }

    fn rename_selected(&mut self, new_name: &str) -> Option<ActionResult> {
        let entry = self.selected_entry().filter(|e| !e.is_parent_link())?;
        if new_name.contains(std::path::MAIN_SEPARATOR) {
            return Some(ActionResult::error("Name cannot contain a path separator."));
        }
        let target = self.path.join(new_name);
        if target.exists() {
            return Some(ActionResult::error(format!("{new_name} already exists.")));
        }
        match fs::rename(&entry.path, &target) {
            Ok(()) => {
                tracing::info!(from = %entry.name, to = new_name, "renamed");
                self.reload();
                self.select_name(new_name);
                None
            }
            Err(err) => Some(ActionResult::error(format!("Failed to rename {}: {err}", entry.name))),
        }
    }

    fn create_directory(&mut self, name: &str) -> Option<ActionResult> {
        let target = self.path.join(name);
        match fs::create_dir(&target) {
            Ok(()) => {
                self.reload();
                self.select_name(name);
                None
            }
            Err(err) => Some(ActionResult::error(format!("Failed to create folder {name}: {err}"))),
        }
    }

    fn create_file(&mut self, name: &str) -> Option<ActionResult> {
        let target = self.path.join(name);
        match fs::File::create_new(&target) {
            Ok(_) => {
                self.reload();
                self.select_name(name);
                None
            }
            Err(err) => Some(ActionResult::error(format!("Failed to create file {name}: {err}"))),
        }
    }
}

fn parent_entry(path: &Path) -> Option<EntryInfo> {
    path.parent().map(|parent| EntryInfo {
        name: "..".to_string(),
        path: parent.to_path_buf(),
        is_dir: true,
        size: None,
    })
}

/// `..` first, then directories, then files, each group sorted
/// case-insensitively.
fn read_entries(dir: &Path, show_hidden: bool) -> std::io::Result<Vec<EntryInfo>> {
    let mut entries = Vec::new();
    for item in fs::read_dir(dir)? {
        let item = item?;
        let name = item.file_name().to_string_lossy().into_owned();
        if !show_hidden && name.starts_with('.') {
            continue;
        }
        let path = item.path();
        let (is_dir, size) = match fs::metadata(&path) {
            Ok(meta) => (meta.is_dir(), (!meta.is_dir()).then_some(meta.len())),
            Err(_) => (false, None),
        };
        entries.push(EntryInfo {
            name,
            path,
            is_dir,
            size,
        });
    }
    entries.sort_by(|a, b| {
        b.is_dir
            .cmp(&a.is_dir)
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
    });
    if let Some(parent) = parent_entry(dir) {
        entries.insert(0, parent);
    }
    Ok(entries)
}

fn human_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["K", "M", "G", "T"];
    if bytes < 1024 {
        return format!("{bytes}B");
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.1}{}", UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::clipboard::Clipboard;
    use crate::config::DesktopConfig;

    fn click_row(folder: &mut FolderWindow, row: u16, config: &DesktopConfig) -> Option<ActionResult> {
        let mut clipboard = Clipboard::new(false);
        let mut ctx = WindowContext {
            clipboard: &mut clipboard,
            config,
        };
        folder.handle_click(BodyPoint { column: 2, row }, MouseButton::Left, &mut ctx)
    }

    fn scratch() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("b.txt"), b"bee").unwrap();
        fs::write(dir.path().join("A.txt"), b"a").unwrap();
        fs::write(dir.path().join(".hidden"), b"").unwrap();
        dir
    }

    fn names(folder: &FolderWindow) -> Vec<&str> {
        folder.entries().iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn listing_puts_parent_then_dirs_then_files() {
        let dir = scratch();
        let folder = FolderWindow::new(dir.path().to_path_buf(), false);
        assert_eq!(names(&folder), ["..", "sub", "A.txt", "b.txt"]);
    }

    #[test]
    fn hidden_toggle_reports_config_update() {
        let dir = scratch();
        let mut folder = FolderWindow::new(dir.path().to_path_buf(), false);
        let result = folder.toggle_hidden();
        assert!(names(&folder).contains(&".hidden"));
        assert_eq!(
            result,
            Some(ActionResult::UpdateConfig(ConfigUpdate {
                show_hidden: Some(true),
                ..ConfigUpdate::default()
            }))
        );
    }

    #[test]
    fn enter_on_file_requests_open_and_on_dir_navigates() {
        let dir = scratch();
        let mut folder = FolderWindow::new(dir.path().to_path_buf(), false);
        folder.select_name("A.txt");
        assert!(matches!(folder.activate_selected(), Some(ActionResult::OpenFile(p)) if p.ends_with("A.txt")));
        folder.select_name("sub");
        assert_eq!(folder.activate_selected(), None);
        assert!(folder.path().ends_with("sub"));
        folder.go_parent();
        assert_eq!(folder.selected_entry().map(|e| e.name), Some("sub".to_string()));
    }

    #[test]
    fn click_arms_drag_except_on_parent() {
        let dir = scratch();
        let mut folder = FolderWindow::new(dir.path().to_path_buf(), false);
        let config = DesktopConfig::default();
        click_row(&mut folder, HEADER_ROWS, &config);
        assert!(!folder.has_pending_drag());
        click_row(&mut folder, HEADER_ROWS + 2, &config);
        assert!(folder.has_pending_drag());
        let payload = folder.consume_pending_drag().unwrap();
        assert!(payload.path.ends_with("A.txt"));
        assert!(!folder.has_pending_drag());
    }

    #[test]
    fn row_double_click_follows_configured_interval() {
        let dir = scratch();
        let mut folder = FolderWindow::new(dir.path().to_path_buf(), false);
        // "sub" sits on the second list row
        let tight = DesktopConfig {
            double_click_interval: Duration::from_millis(1),
            ..DesktopConfig::default()
        };
        click_row(&mut folder, HEADER_ROWS + 1, &tight);
        std::thread::sleep(Duration::from_millis(20));
        click_row(&mut folder, HEADER_ROWS + 1, &tight);
        assert_eq!(folder.path(), fs::canonicalize(dir.path()).unwrap());

        let generous = DesktopConfig {
            double_click_interval: Duration::from_secs(60),
            ..DesktopConfig::default()
        };
        let mut folder = FolderWindow::new(dir.path().to_path_buf(), false);
        assert_eq!(click_row(&mut folder, HEADER_ROWS + 1, &generous), None);
        click_row(&mut folder, HEADER_ROWS + 1, &generous);
        assert!(folder.path().ends_with("sub"));
    }

    #[test]
    fn drop_requests_copy_into_listed_directory() {
        let dir = scratch();
        let other = tempfile::tempdir().unwrap();
        let mut folder = FolderWindow::new(other.path().to_path_buf(), false);
        let dropped = dir.path().join("b.txt");
        let result = folder.accept_dropped_path(&dropped);
        assert_eq!(
            result,
            Some(ActionResult::CopyDropped {
                path: dropped,
                destination: folder.path().to_path_buf(),
            })
        );
        assert!(!other.path().join("b.txt").exists());
    }

    #[test]
    fn create_and_rename_entries() {
        let dir = scratch();
        let mut folder = FolderWindow::new(dir.path().to_path_buf(), false);
        assert_eq!(folder.create_directory("new"), None);
        assert_eq!(folder.selected_entry().map(|e| e.name), Some("new".to_string()));
        assert_eq!(folder.rename_selected("renamed"), None);
        assert!(dir.path().join("renamed").is_dir());
        assert!(folder.create_file("b.txt").is_some());
    }

    #[test]
    fn sizes_are_human_readable() {
        assert_eq!(human_size(512), "512B");
        assert_eq!(human_size(2048), "2.0K");
        assert_eq!(human_size(20 * 1024 * 1024), "20.0M");
    }
}
