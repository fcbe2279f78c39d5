use ratatui::style::{Color, Modifier, Style};

// Centralized palette. Windows 3.1 flavoured: teal desktop, navy title
// bars, grey chrome.

// Desktop
pub fn desktop_fg() -> Color {
    Color::Cyan
}
pub fn desktop_bg() -> Color {
    Color::Blue
}

// Menu bar / dropdowns
pub fn menu_bg() -> Color {
    Color::Gray
}
pub fn menu_fg() -> Color {
    Color::Black
}
pub fn menu_selected_bg() -> Color {
    Color::Blue
}
pub fn menu_selected_fg() -> Color {
    Color::White
}

// Windows
pub fn window_body_bg() -> Color {
    Color::White
}
pub fn window_body_fg() -> Color {
    Color::Black
}
pub fn window_border() -> Color {
    Color::White
}
pub fn window_title_bg() -> Color {
    Color::Blue
}
pub fn window_title_fg() -> Color {
    Color::White
}
pub fn window_inactive_fg() -> Color {
    Color::DarkGray
}

// Dialog
pub fn dialog_bg() -> Color {
    Color::Gray
}
pub fn dialog_fg() -> Color {
    Color::Black
}
pub fn button_bg() -> Color {
    Color::DarkGray
}
pub fn button_fg() -> Color {
    Color::White
}
pub fn button_selected_bg() -> Color {
    Color::Cyan
}
pub fn button_selected_fg() -> Color {
    Color::Black
}

// Bottom bars
pub fn taskbar_bg() -> Color {
    Color::DarkGray
}
pub fn taskbar_fg() -> Color {
    Color::White
}
pub fn status_bg() -> Color {
    Color::Gray
}
pub fn status_fg() -> Color {
    Color::Black
}

pub fn icon_style(selected: bool) -> Style {
    let base = if selected {
        style(Color::Black, Color::Cyan)
    } else {
        style(Color::White, desktop_bg())
    };
    base.add_modifier(Modifier::BOLD)
}

pub fn style(fg: Color, bg: Color) -> Style {
    Style::default().fg(fg).bg(bg)
}

pub fn menu_style(selected: bool) -> Style {
    if selected {
        style(menu_selected_fg(), menu_selected_bg())
    } else {
        style(menu_fg(), menu_bg())
    }
}

pub fn button_style(selected: bool) -> Style {
    if selected {
        style(button_selected_fg(), button_selected_bg()).add_modifier(Modifier::BOLD)
    } else {
        style(button_fg(), button_bg())
    }
}

/// Drop targets under a dragged payload are drawn reversed and bold.
pub fn drop_highlight(base: Style) -> Style {
    base.add_modifier(Modifier::REVERSED | Modifier::BOLD)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selected_menu_differs_from_plain() {
        assert_ne!(menu_style(true), menu_style(false));
    }

    #[test]
    fn drop_highlight_adds_reverse() {
        let s = drop_highlight(Style::default());
        assert!(s.add_modifier.contains(Modifier::REVERSED));
    }
}
