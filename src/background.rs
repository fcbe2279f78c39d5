//! Single-slot runner for long file operations.
//!
//! At most one job runs at a time, on a named worker thread. The UI thread
//! polls once per frame: while the job runs it refreshes the elapsed time on
//! the progress dialog, and when it finishes the result is dispatched against
//! the window that asked for it.
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::actions::ActionResult;
use crate::components::dialog::{Dialog, DialogId};
use crate::constants::{BACKGROUND_BUSY_MESSAGE, FILE_OPERATION_THREAD, PROGRESS_DIALOG_WIDTH};
use crate::desktop::Desktop;
use crate::file_ops::FileJob;
use crate::window::WindowId;

struct RunningOperation {
    dialog_id: DialogId,
    source: Option<WindowId>,
    started_at: Instant,
    receiver: Receiver<ActionResult>,
    handle: Option<JoinHandle<()>>,
}

/// A finished job, ready to be dispatched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub dialog_id: DialogId,
    pub source: Option<WindowId>,
    pub result: ActionResult,
    pub elapsed: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    Idle,
    Running {
        dialog_id: DialogId,
        elapsed: Duration,
    },
    Finished(Completion),
}

#[derive(Default)]
pub struct BackgroundOperationManager {
    state: Option<RunningOperation>,
}

impl std::fmt::Debug for BackgroundOperationManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackgroundOperationManager")
            .field("busy", &self.is_busy())
            .finish()
    }
}

impl BackgroundOperationManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        self.state.is_some()
    }

    /// Spawn `job` on the worker thread. A second job while one is running
    /// is refused with an error result instead of being queued.
    pub fn start(
        &mut self,
        dialog_id: DialogId,
        source: Option<WindowId>,
        job: FileJob,
    ) -> Result<(), ActionResult> {
        if self.is_busy() {
            tracing::warn!("background operation refused: worker busy");
            return Err(ActionResult::error(BACKGROUND_BUSY_MESSAGE));
        }
        let (tx, rx) = mpsc::channel();
        let handle = thread::Builder::new()
            .name(FILE_OPERATION_THREAD.to_string())
            .spawn(move || {
                let result = panic::catch_unwind(AssertUnwindSafe(job)).unwrap_or_else(|payload| {
                    let detail = payload
                        .downcast_ref::<&str>()
                        .map(|s| s.to_string())
                        .or_else(|| payload.downcast_ref::<String>().cloned())
                        .unwrap_or_else(|| "unknown failure".to_string());
                    ActionResult::Error(format!("Operation failed: {detail}"))
                });
                let _ = tx.send(result);
            })
            .map_err(|err| {
                tracing::error!(error = %err, "failed to spawn file operation worker");
                ActionResult::Error(format!("Could not start operation: {err}"))
            })?;
        tracing::info!(source = ?source, "background operation started");
        self.state = Some(RunningOperation {
            dialog_id,
            source,
            started_at: Instant::now(),
            receiver: rx,
            handle: Some(handle),
        });
        Ok(())
    }

    pub fn poll(&mut self) -> PollOutcome {
        let Some(op) = self.state.as_mut() else {
            return PollOutcome::Idle;
        };
        let elapsed = op.started_at.elapsed();
        let result = match op.receiver.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => {
                return PollOutcome::Running {
                    dialog_id: op.dialog_id,
                    elapsed,
                };
            }
            Err(TryRecvError::Disconnected) => {
                ActionResult::error("Operation ended without reporting a result.")
            }
        };
        let Some(mut op) = self.state.take() else {
            return PollOutcome::Idle;
        };
        if let Some(handle) = op.handle.take()
            && handle.join().is_err()
        {
            tracing::warn!("file operation worker panicked after reporting");
        }
        tracing::info!(elapsed_ms = elapsed.as_millis() as u64, "background operation finished");
        PollOutcome::Finished(Completion {
            dialog_id: op.dialog_id,
            source: op.source,
            result,
            elapsed,
        })
    }

    /// Block until the running job reports, if any. Used at shutdown and by
    /// tests; the UI thread never waits on the worker otherwise.
    pub fn wait(&mut self, timeout: Duration) -> PollOutcome {
        let deadline = Instant::now() + timeout;
        loop {
            match self.poll() {
                PollOutcome::Running { .. } if Instant::now() < deadline => {
                    thread::sleep(Duration::from_millis(5));
                }
                outcome => return outcome,
            }
        }
    }
}

impl Desktop {
    /// Show a progress dialog and hand `job` to the worker. Returns an error
    /// result to dispatch when the worker is already busy.
    pub fn start_background_operation(
        &mut self,
        title: &str,
        message: &str,
        job: FileJob,
        source: Option<WindowId>,
    ) -> Option<ActionResult> {
        let dialog = Dialog::progress(title, message, PROGRESS_DIALOG_WIDTH);
        match self.background.start(dialog.id(), source, job) {
            Ok(()) => {
                self.open_dialog(dialog);
                None
            }
            Err(result) => Some(result),
        }
    }

    /// Per-frame hook: refresh the progress readout, or close it and
    /// dispatch the result once the job is done.
    pub fn poll_background(&mut self) {
        match self.background.poll() {
            PollOutcome::Idle => {}
            PollOutcome::Running { dialog_id, elapsed } => {
                if let Some(dialog) = self.dialog.as_mut()
                    && dialog.id() == dialog_id
                {
                    dialog.set_elapsed(elapsed);
                }
            }
            PollOutcome::Finished(done) => self.finish_background(done),
        }
    }

    /// Block up to `timeout` for the running job, then finish it as a frame
    /// would. Returns `false` if the job is still running.
    pub fn wait_background(&mut self, timeout: Duration) -> bool {
        match self.background.wait(timeout) {
            PollOutcome::Idle => true,
            PollOutcome::Running { .. } => false,
            PollOutcome::Finished(done) => {
                self.finish_background(done);
                true
            }
        }
    }

    pub(crate) fn finish_background(&mut self, done: Completion) {
        if self.dialog.as_ref().is_some_and(|d| d.id() == done.dialog_id) {
            self.dialog = None;
        }
        self.dispatch(done.result, done.source);
    }
}
