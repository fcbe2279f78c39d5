//! Table-driven handling of [`ActionResult`] values.
//!
//! Windows and dialog callbacks never act on the desktop directly; they hand
//! back an `ActionResult`, and [`Desktop::dispatch`] looks its
//! [`ActionType`] up in the [`ActionDispatcher`] table. Types without an
//! entry are logged and dropped.
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::actions::{ActionResult, ActionType, AppAction, KillRequest};
use crate::apps::text_viewer::{OpenError, TextViewer};
use crate::components::dialog::Dialog;
use crate::desktop::Desktop;
use crate::file_ops::{EntryInfo, FileOperation};
use crate::window::{WindowApp, WindowId};

pub type ActionHandler = fn(&mut Desktop, ActionResult, Option<WindowId>);

const SOURCE_CLOSED: &str = "The window that requested this was closed.";

#[derive(Clone)]
pub struct ActionDispatcher {
    table: BTreeMap<ActionType, ActionHandler>,
}

impl std::fmt::Debug for ActionDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionDispatcher")
            .field("types", &self.table.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Default for ActionDispatcher {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl ActionDispatcher {
    pub fn empty() -> Self {
        Self {
            table: BTreeMap::new(),
        }
    }

    /// A table with a handler for every [`ActionType`].
    pub fn with_defaults() -> Self {
        use ActionType::*;
        let mut d = Self::empty();
        d.register(Execute, handle_execute);
        d.register(OpenFile, handle_open_file);
        d.register(Refresh, handle_refresh);
        d.register(Error, handle_error);
        d.register(SaveError, handle_error);
        d.register(RequestSaveAs, handle_save_as);
        d.register(RequestOpenPath, handle_open_path);
        d.register(RequestRenameEntry, handle_rename);
        d.register(RequestDeleteConfirm, handle_delete_confirm);
        d.register(RequestCopyEntry, handle_copy_or_move);
        d.register(RequestMoveEntry, handle_copy_or_move);
        d.register(RequestCopyBetweenPanes, handle_between_panes);
        d.register(RequestMoveBetweenPanes, handle_between_panes);
        d.register(CopyDropped, handle_copy_dropped);
        d.register(RequestNewDir, handle_new_entry);
        d.register(RequestNewFile, handle_new_entry);
        d.register(RequestKillConfirm, handle_kill_confirm);
        d.register(RequestUrl, handle_url);
        d.register(UpdateConfig, handle_update_config);
        d
    }

    /// Install `handler` for `kind`, returning the one it replaced.
    pub fn register(&mut self, kind: ActionType, handler: ActionHandler) -> Option<ActionHandler> {
        self.table.insert(kind, handler)
    }

    pub fn unregister(&mut self, kind: ActionType) -> Option<ActionHandler> {
        self.table.remove(&kind)
    }

    pub fn handler(&self, kind: ActionType) -> Option<ActionHandler> {
        self.table.get(&kind).copied()
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl Desktop {
    /// Route `result` to its handler. `source` is the window it came from.
    pub fn dispatch(&mut self, result: ActionResult, source: Option<WindowId>) {
        let kind = result.kind();
        match self.dispatcher.handler(kind) {
            Some(handler) => {
                tracing::debug!(action = ?kind, source = ?source, "dispatching action result");
                handler(self, result, source);
            }
            None => tracing::warn!(action = ?kind, "no handler for action result; dropped"),
        }
    }

    pub fn dispatch_opt(&mut self, result: Option<ActionResult>, source: Option<WindowId>) {
        if let Some(result) = result {
            self.dispatch(result, source);
        }
    }

    /// Close the current dialog with button `index`.
    ///
    /// "Yes" on the exit confirmation stops the loop. Otherwise only index 0
    /// runs the callback, after the dialog has been cleared, and whatever it
    /// returns is dispatched against the window active at that point.
    pub fn resolve_dialog(&mut self, index: usize) {
        let Some(mut dialog) = self.dialog.take() else {
            return;
        };
        let label = dialog.buttons().get(index).cloned().unwrap_or_default();
        tracing::debug!(title = dialog.title(), button = index, label = %label, "dialog resolved");
        if dialog.is_exit_confirm() {
            if label == "Yes" {
                tracing::info!("exit confirmed");
                self.running = false;
            }
            return;
        }
        if index != 0 {
            return;
        }
        let Some(callback) = dialog.take_callback() else {
            return;
        };
        let value = dialog.value().map(str::to_string);
        let result = callback(self, value);
        // the callback may have moved focus; its result follows it
        let source = self.windows.active_id();
        self.dispatch_opt(result, source);
    }
}

/// Run `f` against the app of window `id`, or report that it went away.
fn on_window(
    desktop: &mut Desktop,
    id: WindowId,
    f: impl FnOnce(&mut dyn WindowApp) -> Option<ActionResult>,
) -> Option<ActionResult> {
    match desktop.windows.get_mut(id) {
        Some(window) => f(window.app_mut()),
        None => Some(ActionResult::error(SOURCE_CLOSED)),
    }
}

/// The source window, if it exposes the capability `has` checks for.
fn capable_source(
    desktop: &mut Desktop,
    source: Option<WindowId>,
    kind: ActionType,
    has: impl FnOnce(&mut dyn WindowApp) -> bool,
) -> Option<WindowId> {
    let id = source.filter(|id| {
        desktop
            .windows
            .get_mut(*id)
            .is_some_and(|w| has(w.app_mut()))
    });
    if id.is_none() {
        tracing::debug!(action = ?kind, source = ?source, "no capable source window; result dropped");
    }
    id
}

struct FolderState {
    entry: Option<EntryInfo>,
    current: PathBuf,
    other_pane: Option<PathBuf>,
}

fn folder_state(desktop: &mut Desktop, id: WindowId) -> Option<FolderState> {
    let ops = desktop.windows.get_mut(id)?.app_mut().file_operations()?;
    Some(FolderState {
        entry: ops.selected_entry(),
        current: ops.current_path(),
        other_pane: ops.other_pane_path(),
    })
}

/// Non-empty, trimmed input dialog text.
fn entered(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn handle_execute(desktop: &mut Desktop, result: ActionResult, source: Option<WindowId>) {
    let ActionResult::Execute(action) = result else {
        return;
    };
    if action == AppAction::CloseWindow {
        if let Some(id) = source.or_else(|| desktop.windows.active_id()) {
            desktop.close_window(id);
        }
        return;
    }
    desktop.execute_action(action);
}

fn handle_open_file(desktop: &mut Desktop, result: ActionResult, _source: Option<WindowId>) {
    let ActionResult::OpenFile(path) = result else {
        return;
    };
    open_file_viewer(desktop, &path);
}

pub(crate) fn open_file_viewer(desktop: &mut Desktop, path: &Path) {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    match TextViewer::open(path) {
        Ok(viewer) => {
            let size = (70.min(desktop.term.width.saturating_sub(4)), 25.min(desktop.term.height.saturating_sub(4)));
            desktop.spawn_staggered(&name, (18, 3), size, Box::new(viewer));
        }
        Err(OpenError::Binary) => desktop.open_dialog(Dialog::new(
            "Binary File",
            &format!("{name}\n\nThis appears to be a binary file\nand cannot be displayed as text."),
            &["OK"],
            48,
        )),
        Err(OpenError::Io(err)) => {
            tracing::warn!(path = %path.display(), error = %err, "could not open file");
            desktop.open_dialog(Dialog::message("Error", &format!("Cannot open {name}:\n{err}")));
        }
    }
}

fn handle_refresh(desktop: &mut Desktop, _result: ActionResult, source: Option<WindowId>) {
    match source.and_then(|id| desktop.windows.get_mut(id)) {
        Some(window) => window.app_mut().refresh(),
        None => tracing::debug!("refresh without a source window"),
    }
}

fn handle_error(desktop: &mut Desktop, result: ActionResult, _source: Option<WindowId>) {
    let (title, message) = match result {
        ActionResult::Error(message) => ("Error", message),
        ActionResult::SaveError(message) => ("Save Error", message),
        _ => return,
    };
    let message = if message.trim().is_empty() {
        "Unknown error.".to_string()
    } else {
        message
    };
    tracing::info!(title, message = %message, "showing error");
    desktop.open_dialog(Dialog::new(title, &message, &["OK"], 50));
}

fn handle_save_as(desktop: &mut Desktop, result: ActionResult, source: Option<WindowId>) {
    let Some(id) = capable_source(desktop, source, result.kind(), |app| app.document().is_some())
    else {
        return;
    };
    let dialog = Dialog::input("Save As", "Enter filename:", "", 40).with_callback(move |d, value| {
        let name = entered(value)?;
        on_window(d, id, |app| app.document().and_then(|doc| doc.save_as(&name)))
    });
    desktop.open_dialog(dialog);
}

fn handle_open_path(desktop: &mut Desktop, result: ActionResult, source: Option<WindowId>) {
    let Some(id) = capable_source(desktop, source, result.kind(), |app| app.document().is_some())
    else {
        return;
    };
    let dialog =
        Dialog::input("Open File", "Enter filename/path:", "", 52).with_callback(move |d, value| {
            let path = entered(value)?;
            on_window(d, id, |app| app.document().and_then(|doc| doc.open_path(&path)))
        });
    desktop.open_dialog(dialog);
}

fn handle_rename(desktop: &mut Desktop, result: ActionResult, source: Option<WindowId>) {
    let Some(id) = capable_source(desktop, source, result.kind(), |app| {
        app.file_operations().is_some()
    }) else {
        return;
    };
    let Some(state) = folder_state(desktop, id) else {
        return;
    };
    let entry = match state.entry {
        None => {
            desktop.open_dialog(Dialog::new("Rename Error", "No item selected.", &["OK"], 44));
            return;
        }
        Some(entry) if entry.is_parent_link() => {
            desktop.open_dialog(Dialog::new(
                "Rename Error",
                "Cannot rename parent entry.",
                &["OK"],
                44,
            ));
            return;
        }
        Some(entry) => entry,
    };
    let prompt = format!("Rename:\n{}", entry.name);
    let dialog = Dialog::input("Rename", &prompt, &entry.name, 56).with_callback(move |d, value| {
        let name = entered(value)?;
        on_window(d, id, |app| {
            app.file_operations().and_then(|ops| ops.rename_selected(&name))
        })
    });
    desktop.open_dialog(dialog);
}

fn handle_delete_confirm(desktop: &mut Desktop, result: ActionResult, source: Option<WindowId>) {
    let Some(id) = capable_source(desktop, source, result.kind(), |app| {
        app.file_operations().is_some()
    }) else {
        return;
    };
    let Some(state) = folder_state(desktop, id) else {
        return;
    };
    let entry = match state.entry {
        None => {
            desktop.open_dialog(Dialog::new("Delete Error", "No item selected.", &["OK"], 44));
            return;
        }
        Some(entry) if entry.is_parent_link() => {
            desktop.open_dialog(Dialog::new(
                "Delete Error",
                "Cannot delete parent entry.",
                &["OK"],
                44,
            ));
            return;
        }
        Some(entry) => entry,
    };
    let message = format!(
        "Delete {}:\n{}\n\nThis cannot be undone.",
        entry.kind(),
        entry.name
    );
    let dialog = Dialog::new("Confirm Delete", &message, &["Delete", "Cancel"], 58)
        .with_callback(move |d, _| d.run_file_operation(id, FileOperation::Delete));
    desktop.open_dialog(dialog);
}

fn handle_copy_or_move(desktop: &mut Desktop, result: ActionResult, source: Option<WindowId>) {
    let copy = matches!(result, ActionResult::RequestCopyEntry);
    let Some(id) = capable_source(desktop, source, result.kind(), |app| {
        app.file_operations().is_some()
    }) else {
        return;
    };
    let Some(state) = folder_state(desktop, id) else {
        return;
    };
    let (verb, error_title, title) = if copy {
        ("copy", "Copy Error", "Copy To")
    } else {
        ("move", "Move Error", "Move To")
    };
    let Some(entry) = state.entry.filter(|e| !e.is_parent_link()) else {
        desktop.open_dialog(Dialog::new(
            error_title,
            &format!("Select a valid item to {verb}."),
            &["OK"],
            48,
        ));
        return;
    };
    let label = if copy { "Copy" } else { "Move" };
    let prompt = format!("{label}:\n{}\n\nDestination path:", entry.name);
    let initial = state.current.display().to_string();
    let dialog = Dialog::input(title, &prompt, &initial, 62).with_callback(move |d, value| {
        let destination = PathBuf::from(entered(value)?);
        let operation = if copy {
            FileOperation::Copy { destination }
        } else {
            FileOperation::Move { destination }
        };
        d.run_file_operation(id, operation)
    });
    desktop.open_dialog(dialog);
}

fn handle_between_panes(desktop: &mut Desktop, result: ActionResult, source: Option<WindowId>) {
    let (copy, payload) = match result {
        ActionResult::RequestCopyBetweenPanes { destination } => (true, destination),
        ActionResult::RequestMoveBetweenPanes { destination } => (false, destination),
        _ => return,
    };
    let verb = if copy { "copy" } else { "move" };
    let Some(id) = source.filter(|id| desktop.windows.get(*id).is_some()) else {
        desktop.open_dialog(Dialog::new(
            "Operation Error",
            &format!("Cannot {verb}: no source window context."),
            &["OK"],
            54,
        ));
        return;
    };
    let destination = payload
        .filter(|p| !p.as_os_str().is_empty())
        .or_else(|| folder_state(desktop, id).and_then(|s| s.other_pane));
    let Some(destination) = destination else {
        desktop.open_dialog(Dialog::new(
            "Operation Error",
            &format!("Cannot {verb}: destination pane path is unavailable."),
            &["OK"],
            62,
        ));
        return;
    };
    let operation = if copy {
        FileOperation::Copy { destination }
    } else {
        FileOperation::Move { destination }
    };
    let outcome = desktop.run_file_operation(id, operation);
    desktop.dispatch_opt(outcome, Some(id));
}

fn handle_copy_dropped(desktop: &mut Desktop, result: ActionResult, source: Option<WindowId>) {
    let ActionResult::CopyDropped { path, destination } = result else {
        return;
    };
    let Some(id) = source.filter(|id| desktop.windows.get(*id).is_some()) else {
        tracing::debug!(path = %path.display(), "drop without a target window; dropped");
        return;
    };
    let outcome = desktop.copy_dropped_path(id, &path, destination);
    desktop.dispatch_opt(outcome, Some(id));
}

fn handle_new_entry(desktop: &mut Desktop, result: ActionResult, source: Option<WindowId>) {
    let directory = matches!(result, ActionResult::RequestNewDir);
    let Some(id) = capable_source(desktop, source, result.kind(), |app| {
        app.file_operations().is_some()
    }) else {
        return;
    };
    let (title, prompt) = if directory {
        ("New Folder", "Enter folder name:")
    } else {
        ("New File", "Enter file name:")
    };
    let dialog = Dialog::input(title, prompt, "", 52).with_callback(move |d, value| {
        let name = entered(value)?;
        on_window(d, id, |app| {
            let ops = app.file_operations()?;
            if directory {
                ops.create_directory(&name)
            } else {
                ops.create_file(&name)
            }
        })
    });
    desktop.open_dialog(dialog);
}

fn handle_kill_confirm(desktop: &mut Desktop, result: ActionResult, source: Option<WindowId>) {
    let ActionResult::RequestKillConfirm(request) = result else {
        return;
    };
    let Some(id) = source else {
        tracing::debug!(pid = request.pid, "kill request without a source window; dropped");
        return;
    };
    if request.pid == 0 {
        desktop.open_dialog(Dialog::new("Kill Error", "No process selected.", &["OK"], 44));
        return;
    }
    let command: String = request.command.chars().take(40).collect();
    let message = format!(
        "Kill process PID {}?\n{}\n\nSignal: SIGTERM (15)",
        request.pid, command
    );
    let dialog = Dialog::new("Confirm Kill", &message, &["Kill", "Cancel"], 58)
        .with_callback(move |d, _| kill(d, id, &request));
    desktop.open_dialog(dialog);
}

fn kill(desktop: &mut Desktop, id: WindowId, request: &KillRequest) -> Option<ActionResult> {
    on_window(desktop, id, |app| match app.process_control() {
        Some(control) => control.kill_process(request),
        None => Some(ActionResult::error("Window does not support process kill.")),
    })
}

fn handle_url(desktop: &mut Desktop, result: ActionResult, _source: Option<WindowId>) {
    let ActionResult::RequestUrl(url) = result else {
        return;
    };
    let message = format!("{url}\n\nCopy this link to the clipboard?");
    let dialog =
        Dialog::new("Open Link", &message, &["Copy", "Cancel"], 60).with_callback(move |d, _| {
            d.clipboard.copy(url);
            None
        });
    desktop.open_dialog(dialog);
}

fn handle_update_config(desktop: &mut Desktop, result: ActionResult, _source: Option<WindowId>) {
    let ActionResult::UpdateConfig(update) = result else {
        return;
    };
    desktop.apply_config(&update);
}
