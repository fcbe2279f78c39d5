//! Small hosted apps that exercise the window contract.
pub mod folder;
pub mod log_viewer;
pub mod note;
pub mod text_viewer;

pub use folder::FolderWindow;
pub use log_viewer::LogViewer;
pub use note::NoteWindow;
pub use text_viewer::TextViewer;
