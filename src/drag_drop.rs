//! Dragging a file path from one window onto another.
//!
//! A press inside a drag-source window only arms the controller. The drag
//! becomes real on the first motion report with the button still held at a
//! cell other than the press origin; a plain click never produces a drop.
use std::path::PathBuf;

use crate::actions::ActionResult;
use crate::input::{MouseAction, MouseInput};
use crate::window::{WindowId, WindowRegistry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragKind {
    File,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragPayload {
    pub kind: DragKind,
    pub path: PathBuf,
}

impl DragPayload {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            kind: DragKind::File,
            path: path.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
enum DragState {
    #[default]
    Idle,
    Pending {
        source: WindowId,
        origin: (u16, u16),
    },
    Active {
        source: WindowId,
        payload: DragPayload,
        target: Option<WindowId>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragOutcome {
    /// Not a drag event; keep routing.
    Ignored,
    Consumed,
    /// The payload landed on `target`, which answered with `result`.
    Dropped {
        target: WindowId,
        result: Option<ActionResult>,
    },
}

#[derive(Debug, Default)]
pub struct DragDropController {
    state: DragState,
}

impl DragDropController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_idle(&self) -> bool {
        self.state == DragState::Idle
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, DragState::Pending { .. })
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, DragState::Active { .. })
    }

    pub fn payload(&self) -> Option<&DragPayload> {
        match &self.state {
            DragState::Active { payload, .. } => Some(payload),
            _ => None,
        }
    }

    pub fn target(&self) -> Option<WindowId> {
        match self.state {
            DragState::Active { target, .. } => target,
            _ => None,
        }
    }

    /// Record that `source` reported a drag candidate for a press at `origin`.
    pub fn arm(&mut self, source: WindowId, origin: (u16, u16)) {
        if self.is_idle() {
            self.state = DragState::Pending { source, origin };
        }
    }

    pub fn handle_mouse(
        &mut self,
        input: &MouseInput,
        windows: &mut WindowRegistry,
    ) -> DragOutcome {
        let at = (input.column, input.row);
        match std::mem::take(&mut self.state) {
            DragState::Idle => DragOutcome::Ignored,
            DragState::Pending { source, origin } => match input.action {
                MouseAction::Motion { button_down: true } if at != origin => {
                    let payload = windows
                        .get_mut(source)
                        .and_then(|w| w.app_mut().drag_source())
                        .and_then(|s| s.consume_pending_drag());
                    match payload {
                        Some(payload) => {
                            tracing::debug!(source = %source, path = %payload.path.display(), "drag started");
                            let target = drop_target_at(windows, source, at);
                            highlight(windows, target);
                            self.state = DragState::Active {
                                source,
                                payload,
                                target,
                            };
                            DragOutcome::Consumed
                        }
                        None => DragOutcome::Ignored,
                    }
                }
                MouseAction::Motion { .. } | MouseAction::Scroll(_) => {
                    self.state = DragState::Pending { source, origin };
                    DragOutcome::Ignored
                }
                MouseAction::Press(_) | MouseAction::Release(_) => {
                    clear_pending(windows, source);
                    DragOutcome::Ignored
                }
            },
            DragState::Active {
                source,
                payload,
                target,
            } => match input.action {
                MouseAction::Motion { .. } => {
                    let target = drop_target_at(windows, source, at);
                    highlight(windows, target);
                    self.state = DragState::Active {
                        source,
                        payload,
                        target,
                    };
                    DragOutcome::Consumed
                }
                MouseAction::Release(_) => {
                    let landing = drop_target_at(windows, source, at);
                    windows.clear_drop_highlights();
                    clear_pending(windows, source);
                    match landing {
                        Some(target) => {
                            let result = windows
                                .get_mut(target)
                                .and_then(|w| w.app_mut().drop_target())
                                .and_then(|t| t.accept_dropped_path(&payload.path));
                            tracing::info!(target = %target, path = %payload.path.display(), "dropped");
                            DragOutcome::Dropped { target, result }
                        }
                        None => {
                            tracing::debug!("drag released without a target");
                            DragOutcome::Consumed
                        }
                    }
                }
                MouseAction::Press(_) | MouseAction::Scroll(_) => {
                    self.state = DragState::Active {
                        source,
                        payload,
                        target,
                    };
                    DragOutcome::Consumed
                }
            },
        }
    }

    /// Drop any drag in progress, e.g. when a dialog takes over input.
    pub fn cancel(&mut self, windows: &mut WindowRegistry) {
        match std::mem::take(&mut self.state) {
            DragState::Idle => {}
            DragState::Pending { source, .. } | DragState::Active { source, .. } => {
                windows.clear_drop_highlights();
                clear_pending(windows, source);
            }
        }
    }
}

/// Topmost visible window under the pointer, if it accepts drops and is not
/// the source. A non-accepting window on top hides any target beneath it.
fn drop_target_at(
    windows: &mut WindowRegistry,
    source: WindowId,
    (column, row): (u16, u16),
) -> Option<WindowId> {
    let id = windows.topmost_at(column, row)?;
    if id == source {
        return None;
    }
    let accepts = windows
        .get_mut(id)
        .is_some_and(|w| w.app_mut().drop_target().is_some());
    accepts.then_some(id)
}

fn highlight(windows: &mut WindowRegistry, target: Option<WindowId>) {
    windows.clear_drop_highlights();
    if let Some(w) = target.and_then(|id| windows.get_mut(id)) {
        w.set_drop_highlight(true);
    }
}

fn clear_pending(windows: &mut WindowRegistry, source: WindowId) {
    if let Some(s) = windows
        .get_mut(source)
        .and_then(|w| w.app_mut().drag_source())
    {
        s.clear_pending_drag();
    }
}
