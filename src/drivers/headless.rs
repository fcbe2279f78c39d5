use std::io;

use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;

use super::OutputDriver;
use crate::ui::UiFrame;

/// Renders into an in-memory buffer. Drives the desktop without a terminal,
/// e.g. in tests or scripted runs.
pub struct HeadlessOutputDriver {
    terminal: Terminal<TestBackend>,
    frames: usize,
}

impl HeadlessOutputDriver {
    pub fn new(width: u16, height: u16) -> io::Result<Self> {
        let terminal = Terminal::new(TestBackend::new(width, height))
            .map_err(|err| io::Error::other(err.to_string()))?;
        Ok(Self {
            terminal,
            frames: 0,
        })
    }

    pub fn buffer(&self) -> &Buffer {
        self.terminal.backend().buffer()
    }

    /// Symbols of row `y`, concatenated.
    pub fn row_text(&self, y: u16) -> String {
        let buffer = self.buffer();
        let area = buffer.area;
        (area.x..area.x + area.width)
            .filter_map(|x| buffer.cell((x, y)).map(|c| c.symbol().to_string()))
            .collect()
    }

    pub fn frames(&self) -> usize {
        self.frames
    }
}

impl OutputDriver for HeadlessOutputDriver {
    fn enter(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn exit(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn size(&self) -> io::Result<Rect> {
        Ok(self.buffer().area)
    }

    fn draw<F>(&mut self, f: F) -> io::Result<()>
    where
        F: FnOnce(UiFrame<'_>),
    {
        self.frames += 1;
        self.terminal
            .draw(move |frame| f(UiFrame::new(frame)))
            .map(|_| ())
            .map_err(|err| io::Error::other(err.to_string()))
    }
}
