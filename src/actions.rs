use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Desktop-level actions reachable from the global menu, icons and hotkeys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AppAction {
    Exit,
    About,
    Help,
    NewWindow,
    Files,
    LogViewer,
    CloseWindow,
    /// Host-defined action with no built-in effect.
    Custom(String),
}

impl fmt::Display for AppAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AppAction::Exit => "exit",
            AppAction::About => "about",
            AppAction::Help => "help",
            AppAction::NewWindow => "new_window",
            AppAction::Files => "files",
            AppAction::LogViewer => "log_viewer",
            AppAction::CloseWindow => "close_window",
            AppAction::Custom(name) => name.as_str(),
        };
        write!(f, "{}", s)
    }
}

/// Discriminant of [`ActionResult`], used as the dispatch table key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ActionType {
    Execute,
    OpenFile,
    Refresh,
    Error,
    SaveError,
    RequestSaveAs,
    RequestOpenPath,
    RequestRenameEntry,
    RequestDeleteConfirm,
    RequestCopyEntry,
    RequestMoveEntry,
    RequestCopyBetweenPanes,
    RequestMoveBetweenPanes,
    CopyDropped,
    RequestNewDir,
    RequestNewFile,
    RequestKillConfirm,
    RequestUrl,
    UpdateConfig,
}

impl ActionType {
    pub const ALL: [ActionType; 19] = [
        ActionType::Execute,
        ActionType::OpenFile,
        ActionType::Refresh,
        ActionType::Error,
        ActionType::SaveError,
        ActionType::RequestSaveAs,
        ActionType::RequestOpenPath,
        ActionType::RequestRenameEntry,
        ActionType::RequestDeleteConfirm,
        ActionType::RequestCopyEntry,
        ActionType::RequestMoveEntry,
        ActionType::RequestCopyBetweenPanes,
        ActionType::RequestMoveBetweenPanes,
        ActionType::CopyDropped,
        ActionType::RequestNewDir,
        ActionType::RequestNewFile,
        ActionType::RequestKillConfirm,
        ActionType::RequestUrl,
        ActionType::UpdateConfig,
    ];
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KillRequest {
    pub pid: u32,
    pub command: String,
}

/// Partial preference update carried by [`ActionResult::UpdateConfig`].
/// `None` fields leave the current value alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigUpdate {
    pub show_hidden: Option<bool>,
    pub ascii_icons: Option<bool>,
    pub double_click_interval: Option<Duration>,
}

/// The only value windows and dialogs hand back to the desktop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionResult {
    Execute(AppAction),
    OpenFile(PathBuf),
    Refresh,
    Error(String),
    SaveError(String),
    RequestSaveAs,
    RequestOpenPath,
    RequestRenameEntry,
    RequestDeleteConfirm,
    RequestCopyEntry,
    RequestMoveEntry,
    RequestCopyBetweenPanes { destination: Option<PathBuf> },
    RequestMoveBetweenPanes { destination: Option<PathBuf> },
    /// A file dropped on a window, to be copied into `destination`.
    CopyDropped { path: PathBuf, destination: PathBuf },
    RequestNewDir,
    RequestNewFile,
    RequestKillConfirm(KillRequest),
    RequestUrl(String),
    UpdateConfig(ConfigUpdate),
}

impl ActionResult {
    pub fn error(message: impl Into<String>) -> Self {
        ActionResult::Error(message.into())
    }

    pub fn kind(&self) -> ActionType {
        match self {
            ActionResult::Execute(_) => ActionType::Execute,
            ActionResult::OpenFile(_) => ActionType::OpenFile,
            ActionResult::Refresh => ActionType::Refresh,
            ActionResult::Error(_) => ActionType::Error,
            ActionResult::SaveError(_) => ActionType::SaveError,
            ActionResult::RequestSaveAs => ActionType::RequestSaveAs,
            ActionResult::RequestOpenPath => ActionType::RequestOpenPath,
            ActionResult::RequestRenameEntry => ActionType::RequestRenameEntry,
            ActionResult::RequestDeleteConfirm => ActionType::RequestDeleteConfirm,
            ActionResult::RequestCopyEntry => ActionType::RequestCopyEntry,
            ActionResult::RequestMoveEntry => ActionType::RequestMoveEntry,
            ActionResult::RequestCopyBetweenPanes { .. } => ActionType::RequestCopyBetweenPanes,
            ActionResult::RequestMoveBetweenPanes { .. } => ActionType::RequestMoveBetweenPanes,
            ActionResult::CopyDropped { .. } => ActionType::CopyDropped,
            ActionResult::RequestNewDir => ActionType::RequestNewDir,
            ActionResult::RequestNewFile => ActionType::RequestNewFile,
            ActionResult::RequestKillConfirm(_) => ActionType::RequestKillConfirm,
            ActionResult::RequestUrl(_) => ActionType::RequestUrl,
            ActionResult::UpdateConfig(_) => ActionType::UpdateConfig,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_matches_variant() {
        assert_eq!(
            ActionResult::Execute(AppAction::About).kind(),
            ActionType::Execute
        );
        assert_eq!(ActionResult::error("x").kind(), ActionType::Error);
        assert_eq!(
            ActionResult::RequestMoveBetweenPanes { destination: None }.kind(),
            ActionType::RequestMoveBetweenPanes
        );
    }

    #[test]
    fn all_types_are_distinct() {
        let mut seen = std::collections::BTreeSet::new();
        for kind in ActionType::ALL {
            assert!(seen.insert(kind));
        }
        assert_eq!(seen.len(), ActionType::ALL.len());
    }

    #[test]
    fn custom_action_displays_its_name() {
        assert_eq!(AppAction::Custom("games".into()).to_string(), "games");
        assert_eq!(AppAction::NewWindow.to_string(), "new_window");
    }
}
