use std::io;
use std::time::Duration;

use crossterm::event::Event;

use crate::drivers::InputDriver;

pub enum ControlFlow {
    Continue,
    Quit,
}

/// The single loop that owns the UI thread.
///
/// Each iteration first calls the handler with `None` (draw the frame and
/// run per-frame housekeeping), then waits up to `poll_interval` for one
/// input event and hands it over as `Some(event)`. Waking up on the timeout
/// keeps clocks and progress readouts moving while the user is idle.
///
/// Exactly one event is processed per frame, so what is on screen always
/// reflects every event handled so far.
pub struct EventLoop<D> {
    driver: D,
    poll_interval: Duration,
}

impl<D: InputDriver> EventLoop<D> {
    pub fn new(driver: D, poll_interval: Duration) -> Self {
        Self {
            driver,
            poll_interval,
        }
    }

    pub fn poll(&mut self) -> io::Result<Option<Event>> {
        if self.driver.poll(self.poll_interval)? {
            Ok(Some(self.driver.read()?))
        } else {
            Ok(None)
        }
    }

    pub fn driver(&mut self) -> &mut D {
        &mut self.driver
    }

    /// Run until the handler returns [`ControlFlow::Quit`]. Driver errors end
    /// the loop and are returned to the caller.
    pub fn run<F>(&mut self, mut handler: F) -> io::Result<()>
    where
        F: FnMut(&mut D, Option<Event>) -> io::Result<ControlFlow>,
    {
        loop {
            if let ControlFlow::Quit = handler(&mut self.driver, None)? {
                return Ok(());
            }
            if let Some(event) = self.poll()?
                && let ControlFlow::Quit = handler(&mut self.driver, Some(event))?
            {
                return Ok(());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::scripted::ScriptedInputDriver;

    #[test]
    fn one_event_per_frame() {
        let driver = ScriptedInputDriver::new([Event::FocusGained, Event::FocusLost]);
        let mut event_loop = EventLoop::new(driver, Duration::ZERO);
        let mut trace = Vec::new();
        event_loop
            .run(|_, event| {
                trace.push(event.is_some());
                Ok(if trace.len() >= 5 {
                    ControlFlow::Quit
                } else {
                    ControlFlow::Continue
                })
            })
            .unwrap();
        assert_eq!(trace, [false, true, false, true, false]);
    }

    #[test]
    fn quit_on_event_stops_immediately() {
        let driver = ScriptedInputDriver::new([Event::FocusGained, Event::FocusLost]);
        let mut event_loop = EventLoop::new(driver, Duration::ZERO);
        let mut frames = 0;
        event_loop
            .run(|_, event| {
                if event.is_none() {
                    frames += 1;
                    return Ok(ControlFlow::Continue);
                }
                Ok(ControlFlow::Quit)
            })
            .unwrap();
        assert_eq!(frames, 1);
        assert_eq!(event_loop.driver().remaining(), 1);
    }
}
