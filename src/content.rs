//! Static text for the About and Help dialogs.
use indoc::{formatdoc, indoc};

use crate::keybindings::KeyBindings;

pub const APP_NAME: &str = "RetroDesk";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn about_message(host: &str) -> String {
    formatdoc! {"
        {APP_NAME} v{APP_VERSION}
        A retro desktop for the character terminal.

        Host: {host}
        OS: {os} ({arch})

        Mouse: xterm SGR protocol
        No windowing system required!",
        os = std::env::consts::OS,
        arch = std::env::consts::ARCH,
    }
}

const MOUSE_HELP: &str = indoc! {"
    Mouse Controls:

    Click           - Select/activate
    Drag title      - Move window
    Drag border     - Resize window
    Dbl-click title - Maximize
    Dbl-click icon  - Open
    [─] [□] [×]     - Minimize, maximize, close
    Scroll          - Scroll content"};

/// Key list generated from the live bindings, followed by the mouse help.
pub fn help_message(bindings: &KeyBindings) -> String {
    let mut text = String::from("Keyboard Controls:\n\n");
    for line in bindings.help_lines() {
        text.push_str(&line);
        text.push('\n');
    }
    text.push_str("Arrows   Navigate menus\n\n");
    text.push_str(MOUSE_HELP);
    text
}
