use std::collections::VecDeque;
use std::io;
use std::time::Duration;

use crossterm::event::Event;

use super::InputDriver;

/// Replays a fixed queue of events, then reports an idle terminal. Used for
/// headless runs of the desktop loop.
#[derive(Debug, Default)]
pub struct ScriptedInputDriver {
    events: VecDeque<Event>,
    polls: usize,
}

impl ScriptedInputDriver {
    pub fn new(events: impl IntoIterator<Item = Event>) -> Self {
        Self {
            events: events.into_iter().collect(),
            polls: 0,
        }
    }

    pub fn push(&mut self, event: Event) {
        self.events.push_back(event);
    }

    pub fn remaining(&self) -> usize {
        self.events.len()
    }

    /// Number of times the loop asked for input.
    pub fn polls(&self) -> usize {
        self.polls
    }
}

impl InputDriver for ScriptedInputDriver {
    fn poll(&mut self, _timeout: Duration) -> io::Result<bool> {
        self.polls += 1;
        Ok(!self.events.is_empty())
    }

    fn read(&mut self) -> io::Result<Event> {
        self.events
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::WouldBlock, "no scripted input left"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    #[test]
    fn replays_in_order_then_idles() {
        let mut d = ScriptedInputDriver::new([
            Event::Key(KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE)),
            Event::Resize(100, 40),
        ]);
        assert!(d.poll(Duration::ZERO).unwrap());
        assert!(matches!(d.read().unwrap(), Event::Key(_)));
        assert!(matches!(d.read().unwrap(), Event::Resize(100, 40)));
        assert!(!d.poll(Duration::ZERO).unwrap());
        assert!(d.read().is_err());
        assert_eq!(d.polls(), 2);
    }

    #[test]
    fn blanket_impl_for_mut_ref_works() {
        let mut d = ScriptedInputDriver::new([Event::FocusGained]);
        let mut r = &mut d;
        assert!(InputDriver::poll(&mut r, Duration::ZERO).unwrap());
        assert!(matches!(InputDriver::read(&mut r).unwrap(), Event::FocusGained));
    }
}
