//! Clipboard service shared by dialogs and hosted windows.
//!
//! The desktop owns exactly one [`Clipboard`], created at startup and lent
//! out by reference. Text always lands in the in-process slot; when system
//! sync is enabled it is mirrored to the OS clipboard through `arboard`, and
//! mirror failures are logged rather than surfaced.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("clipboard backend error: {0}")]
    Backend(#[from] arboard::Error),
}

#[derive(Debug, Default)]
pub struct Clipboard {
    text: Option<String>,
    system_sync: bool,
}

impl Clipboard {
    pub fn new(system_sync: bool) -> Self {
        Self {
            text: None,
            system_sync,
        }
    }

    pub fn copy(&mut self, text: impl Into<String>) {
        let text = text.into();
        if self.system_sync
            && let Err(err) = set_system(&text)
        {
            tracing::debug!(error = %err, "system clipboard unavailable; keeping text in-process");
        }
        self.text = Some(text);
    }

    /// Internal text first; the system clipboard only fills an empty slot.
    pub fn paste(&self) -> Option<String> {
        if let Some(text) = &self.text {
            return Some(text.clone());
        }
        if !self.system_sync {
            return None;
        }
        match get_system() {
            Ok(text) if !text.is_empty() => Some(text),
            Ok(_) => None,
            Err(err) => {
                tracing::debug!(error = %err, "system clipboard read failed");
                None
            }
        }
    }

    pub fn has_text(&self) -> bool {
        self.text.as_deref().is_some_and(|t| !t.is_empty())
    }

    pub fn clear(&mut self) {
        self.text = None;
    }
}

fn get_system() -> Result<String, ClipboardError> {
    let mut cb = arboard::Clipboard::new()?;
    cb.get_text().map_err(ClipboardError::from)
}

fn set_system(text: &str) -> Result<(), ClipboardError> {
    let mut cb = arboard::Clipboard::new()?;
    cb.set_text(text.to_owned()).map_err(ClipboardError::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copy_then_paste_round_trips_in_process() {
        let mut cb = Clipboard::new(false);
        assert!(!cb.has_text());
        assert_eq!(cb.paste(), None);
        cb.copy("hello");
        assert!(cb.has_text());
        assert_eq!(cb.paste().as_deref(), Some("hello"));
    }

    #[test]
    fn clear_empties_slot() {
        let mut cb = Clipboard::new(false);
        cb.copy("x");
        cb.clear();
        assert!(!cb.has_text());
        assert_eq!(cb.paste(), None);
    }
}
