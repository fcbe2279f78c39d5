pub mod actions;
pub mod apps;
pub mod background;
pub mod clipboard;
pub mod components;
pub mod config;
pub mod constants;
pub mod content;
pub mod debug_log;
pub mod desktop;
pub mod dispatch;
pub mod drag_drop;
pub mod drivers;
pub mod error;
pub mod event_loop;
pub mod file_ops;
pub mod input;
pub mod keybindings;
pub mod layout;
pub mod theme;
pub mod tracing_sub;
pub mod ui;
pub mod window;

pub use desktop::Desktop;
pub use error::DesktopError;
