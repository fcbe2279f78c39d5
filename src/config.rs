use std::time::Duration;

use crate::actions::ConfigUpdate;
use crate::constants::{
    DEFAULT_DOUBLE_CLICK_INTERVAL, INPUT_POLL_INTERVAL, LONG_OPERATION_BYTES, MIN_TERM_HEIGHT,
    MIN_TERM_WIDTH,
};
use crate::error::DesktopError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TermSize {
    pub width: u16,
    pub height: u16,
}

impl TermSize {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Runtime knobs for the desktop. Built from CLI flags by the binary; the
/// defaults match the hand-tuned values the desktop has always shipped with.
#[derive(Debug, Clone)]
pub struct DesktopConfig {
    pub double_click_interval: Duration,
    pub long_operation_bytes: u64,
    pub poll_interval: Duration,
    pub min_terminal: TermSize,
    pub ascii_icons: bool,
    pub show_hidden: bool,
    pub system_clipboard: bool,
}

impl Default for DesktopConfig {
    fn default() -> Self {
        Self {
            double_click_interval: DEFAULT_DOUBLE_CLICK_INTERVAL,
            long_operation_bytes: LONG_OPERATION_BYTES,
            poll_interval: INPUT_POLL_INTERVAL,
            min_terminal: TermSize::new(MIN_TERM_WIDTH, MIN_TERM_HEIGHT),
            ascii_icons: false,
            show_hidden: false,
            system_clipboard: true,
        }
    }
}

impl DesktopConfig {
    /// Reject terminals too small to host the menu bar, taskbar, status bar
    /// and a minimum-size window.
    pub fn check_terminal(&self, size: TermSize) -> Result<(), DesktopError> {
        if size.width < self.min_terminal.width || size.height < self.min_terminal.height {
            return Err(DesktopError::TerminalTooSmall {
                width: size.width,
                height: size.height,
                min_width: self.min_terminal.width,
                min_height: self.min_terminal.height,
            });
        }
        Ok(())
    }

    pub fn apply(&mut self, update: &ConfigUpdate) {
        if let Some(show_hidden) = update.show_hidden {
            self.show_hidden = show_hidden;
        }
        if let Some(ascii) = update.ascii_icons {
            self.ascii_icons = ascii;
        }
        if let Some(interval) = update.double_click_interval {
            self.double_click_interval = interval;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimum_terminal_is_accepted() {
        let cfg = DesktopConfig::default();
        assert!(cfg.check_terminal(TermSize::new(80, 24)).is_ok());
        assert!(cfg.check_terminal(TermSize::new(79, 24)).is_err());
        assert!(cfg.check_terminal(TermSize::new(80, 23)).is_err());
    }

    #[test]
    fn apply_only_touches_set_fields() {
        let mut cfg = DesktopConfig::default();
        cfg.apply(&ConfigUpdate {
            show_hidden: Some(true),
            ..ConfigUpdate::default()
        });
        assert!(cfg.show_hidden);
        assert!(!cfg.ascii_icons);
        assert_eq!(cfg.double_click_interval, DEFAULT_DOUBLE_CLICK_INTERVAL);
    }
}
