use ratatui::layout::Rect;

use crate::ui::UiFrame;

pub mod dialog;
pub mod icons;
pub mod menu_bar;
pub mod scroll_view;
pub mod status_bar;
pub mod taskbar;

pub use dialog::{Dialog, DialogCallback, DialogId, DialogLayout};
pub use icons::{DesktopIcon, DesktopIcons};
pub use menu_bar::{Menu, MenuAnchor, MenuBar, MenuItem, MenuKeyOutcome, MenuScope};
pub use scroll_view::{ScrollState, render_lines, render_scrollbar};
pub use status_bar::StatusBar;
pub use taskbar::Taskbar;

/// Desktop chrome drawn into a fixed strip of the screen.
pub trait Component {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::buffer::Buffer;

    struct Stripe;

    impl Component for Stripe {
        fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect) {
            frame.fill(area, "=", ratatui::style::Style::default());
        }
    }

    #[test]
    fn components_draw_through_trait_objects() {
        let area = Rect::new(0, 0, 4, 1);
        let mut buf = Buffer::empty(area);
        let mut frame = UiFrame::from_parts(area, &mut buf);
        let mut parts: Vec<Box<dyn Component>> = vec![Box::new(Stripe)];
        for part in &mut parts {
            part.render(&mut frame, area);
        }
        assert_eq!(buf.cell((3, 0)).map(|c| c.symbol()), Some("="));
    }
}
