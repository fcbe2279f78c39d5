use std::io;

use thiserror::Error;

/// Failures that stop the desktop before (or instead of) running the loop.
///
/// Everything that goes wrong inside the loop is surfaced to the user as an
/// [`ActionResult`](crate::actions::ActionResult) dialog instead.
#[derive(Debug, Error)]
pub enum DesktopError {
    #[error(
        "terminal is {width}x{height}, but at least {min_width}x{min_height} is required"
    )]
    TerminalTooSmall {
        width: u16,
        height: u16,
        min_width: u16,
        min_height: u16,
    },
    #[error("terminal I/O error: {0}")]
    Io(#[from] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn too_small_message_names_both_sizes() {
        let err = DesktopError::TerminalTooSmall {
            width: 40,
            height: 10,
            min_width: 80,
            min_height: 24,
        };
        let text = err.to_string();
        assert!(text.contains("40x10"));
        assert!(text.contains("80x24"));
    }

    #[test]
    fn io_errors_convert() {
        let err: DesktopError = io::Error::other("boom").into();
        assert!(matches!(err, DesktopError::Io(_)));
    }
}
