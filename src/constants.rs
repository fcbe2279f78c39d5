//! Shared crate-wide constants.

use std::time::Duration;

/// Smallest terminal the desktop can lay itself out in. Anything smaller is
/// rejected before the event loop starts.
pub const MIN_TERM_WIDTH: u16 = 80;
pub const MIN_TERM_HEIGHT: u16 = 24;

/// Two presses on the same target closer together than this count as a
/// double-click. Terminals rarely report double-clicks natively.
pub const DEFAULT_DOUBLE_CLICK_INTERVAL: Duration = Duration::from_millis(350);

/// File operations on entries at least this large (or on directories) run on
/// a background worker with a progress dialog instead of inline.
pub const LONG_OPERATION_BYTES: u64 = 8 * 1024 * 1024;

/// Upper bound on how long the loop blocks waiting for input before it
/// redraws anyway (clocks, spinners, progress readouts).
pub const INPUT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Rows reserved above the desktop (global menu bar).
pub const MENU_BAR_HEIGHT: u16 = 1;

/// Rows reserved below the desktop (taskbar + status bar).
pub const BOTTOM_BARS_HEIGHT: u16 = 2;

pub const WINDOW_MIN_WIDTH: u16 = 20;
pub const WINDOW_MIN_HEIGHT: u16 = 6;

/// Title-bar controls, right aligned: `[─][□][×]`.
pub const TITLE_CONTROLS: &str = "[─][□][×]";
pub const TITLE_CONTROLS_ASCII: &str = "[_][^][x]";
/// Column offsets measured back from the window's right edge.
pub const MIN_BUTTON_OFFSET: u16 = 10;
pub const MAX_BUTTON_OFFSET: u16 = 7;
pub const CLOSE_BUTTON_OFFSET: u16 = 4;
pub const TITLE_BUTTON_WIDTH: u16 = 3;

/// Taskbar buttons truncate window titles to this many characters.
pub const TASKBAR_TITLE_CHARS: usize = 15;

pub const ICON_START_X: u16 = 3;
pub const ICON_START_Y: u16 = 3;
/// Three rows of art, one label row, one gap row.
pub const ICON_SPACING_Y: u16 = 5;
/// Icons that do not fit in one column wrap into the next one.
pub const ICON_SPACING_X: u16 = 12;

pub const DESKTOP_PATTERN: char = '░';
pub const DESKTOP_PATTERN_ASCII: char = '.';

pub const EXIT_DIALOG_TITLE: &str = "Exit";
pub const BACKGROUND_BUSY_MESSAGE: &str = "Another operation is already running.";
pub const PROGRESS_DIALOG_WIDTH: u16 = 62;

/// Name of the worker thread spawned for background file operations.
pub const FILE_OPERATION_THREAD: &str = "retrodesk-file-op";
