use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::Rect;

use retrodesk::Desktop;
use retrodesk::actions::{ActionResult, ActionType};
use retrodesk::apps::NoteWindow;
use retrodesk::components::Dialog;
use retrodesk::config::{DesktopConfig, TermSize};
use retrodesk::drivers::OutputDriver;
use retrodesk::drivers::headless::HeadlessOutputDriver;
use retrodesk::drivers::scripted::ScriptedInputDriver;

fn desktop(width: u16, height: u16) -> Desktop {
    let config = DesktopConfig {
        system_clipboard: false,
        ..DesktopConfig::default()
    };
    Desktop::new(config, TermSize::new(width, height)).unwrap()
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn press(desk: &mut Desktop, column: u16, row: u16) {
    desk.handle_event(Event::Mouse(MouseEvent {
        kind: MouseEventKind::Down(MouseButton::Left),
        column,
        row,
        modifiers: KeyModifiers::NONE,
    }));
}

#[test]
fn icon_single_click_selects_and_double_click_activates() {
    let mut desk = desktop(100, 30);
    let about = (0..desk.icons().len())
        .find(|i| desk.icons().get(*i).is_some_and(|icon| icon.label == "About"))
        .unwrap();
    let bounds = desk.icons().bounds(about, 30).unwrap();

    press(&mut desk, bounds.x, bounds.y);
    assert_eq!(desk.icons().selected(), Some(about));
    assert!(desk.dialog().is_none());

    press(&mut desk, bounds.x, bounds.y);
    assert!(desk.dialog().is_some_and(|d| d.title().starts_with("About")));

    desk.handle_key(&key(KeyCode::Enter));
    assert!(desk.dialog().is_none());
    // empty desktop deselects
    press(&mut desk, 90, 20);
    assert_eq!(desk.icons().selected(), None);
}

#[test]
fn global_menu_keyboard_skips_separators() {
    let mut desk = desktop(100, 30);
    desk.handle_key(&key(KeyCode::F(10)));
    assert!(desk.menu().is_active());
    assert_eq!(desk.menu().selected_item(), 0);
    // wrap from the first item to "Exit", then hop over the separator
    desk.handle_key(&key(KeyCode::Up));
    let exit = desk.menu().selected_item();
    assert!(desk.menu().menus()[0].items[exit].label.starts_with("Exit"));
    desk.handle_key(&key(KeyCode::Up));
    let logs = desk.menu().selected_item();
    assert_eq!(desk.menu().menus()[0].items[logs].label, "Log Viewer");
    desk.handle_key(&key(KeyCode::Enter));
    assert!(!desk.menu().is_active());
    assert_eq!(desk.windows().len(), 1);
    assert_eq!(desk.windows().iter().next().unwrap().title(), "Log Viewer");
}

#[test]
fn menu_bar_click_opens_and_item_click_executes() {
    let mut desk = desktop(100, 30);
    // "File" is the first name on row 0
    press(&mut desk, 2, 0);
    assert!(desk.menu().is_active());
    let first = desk.menu().menus()[0].items[0].label.clone();
    assert_eq!(first, "New Window");
    let dropdown = desk
        .menu()
        .dropdown_rect(retrodesk::components::MenuAnchor::global(100))
        .unwrap();
    // first item row sits below the dropdown's top border
    press(&mut desk, dropdown.x + 2, dropdown.y + 1);
    assert!(!desk.menu().is_active());
    assert_eq!(desk.windows().len(), 1);
}

#[test]
fn dialog_is_modal_and_escape_skips_callback() {
    let mut desk = desktop(100, 30);
    let id = desk.open_window("n", Rect::new(10, 5, 40, 12), Box::new(NoteWindow::new()));
    let dialog = Dialog::new("Confirm", "Really?", &["Delete", "Cancel"], 40).with_callback(
        |_desk, _value| Some(ActionResult::error("callback ran")),
    );
    desk.open_dialog(dialog);

    // clicks and keys do not reach the window underneath
    press(&mut desk, 15, 8);
    desk.handle_key(&key(KeyCode::Char('x')));
    assert!(desk.dialog().is_some_and(|d| d.title() == "Confirm"));
    assert_eq!(desk.windows().active_id(), Some(id));

    desk.handle_key(&key(KeyCode::Esc));
    assert!(desk.dialog().is_none());
}

#[test]
fn accepting_dialog_dispatches_callback_result() {
    let mut desk = desktop(100, 30);
    let dialog = Dialog::new("Confirm", "Really?", &["OK", "Cancel"], 40)
        .with_callback(|_desk, _value| Some(ActionResult::error("callback ran")));
    desk.open_dialog(dialog);
    desk.handle_key(&key(KeyCode::Enter));
    let error = desk.dialog().unwrap();
    assert_eq!(error.title(), "Error");
    assert!(error.lines().iter().any(|l| l.contains("callback ran")));
}

#[test]
fn unregistered_action_type_is_dropped() {
    let mut desk = desktop(100, 30);
    desk.dispatcher_mut().unregister(ActionType::Error);
    desk.dispatch(ActionResult::error("nobody listens"), None);
    assert!(desk.dialog().is_none());
}

#[test]
fn input_dialog_feeds_document_save() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("saved.txt");
    let mut desk = desktop(100, 30);
    desk.open_window("n", Rect::new(10, 5, 40, 12), Box::new(NoteWindow::new()));
    desk.handle_paste("hello");
    desk.handle_key(&KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL));
    assert!(desk.dialog().is_some_and(|d| d.title() == "Save As"));
    desk.handle_paste(target.to_str().unwrap());
    desk.handle_key(&key(KeyCode::Enter));
    assert!(desk.dialog().is_none());
    assert_eq!(std::fs::read_to_string(&target).unwrap(), "hello");
}

#[test]
fn exit_confirmation_stops_the_loop() {
    let mut desk = desktop(80, 24);
    desk.open_window("n", Rect::new(10, 5, 40, 12), Box::new(NoteWindow::new()));
    let input = ScriptedInputDriver::new([
        Event::Key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL)),
        Event::Key(key(KeyCode::Enter)),
    ]);
    let mut output = HeadlessOutputDriver::new(80, 24).unwrap();
    desk.run(input, &mut output).unwrap();
    assert!(!desk.is_running());
    assert_eq!(output.frames(), 2);
    assert!(desk.windows().is_empty());
}

#[test]
fn declining_exit_keeps_running() {
    let mut desk = desktop(80, 24);
    desk.handle_key(&KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL));
    desk.handle_key(&key(KeyCode::Right));
    desk.handle_key(&key(KeyCode::Enter));
    assert!(desk.dialog().is_none());
    assert!(desk.is_running());
}

#[test]
fn frame_shows_chrome_and_windows() {
    let mut desk = desktop(80, 24);
    desk.open_window("Scratch", Rect::new(10, 4, 40, 12), Box::new(NoteWindow::new()));
    desk.tick();
    let mut output = HeadlessOutputDriver::new(80, 24).unwrap();
    output.draw(|mut frame| desk.render(&mut frame)).unwrap();

    let menu_row = output.row_text(0);
    assert!(menu_row.contains("File"));
    assert!(menu_row.contains("Help"));
    assert!(output.row_text(4).contains("Scratch"));
    assert!(output.row_text(23).contains("RetroDesk"));
    assert!(output.row_text(23).contains("Windows: 1/1"));
}

#[test]
fn resize_keeps_windows_reachable() {
    let mut desk = desktop(120, 40);
    let id = desk.open_window("w", Rect::new(90, 25, 30, 10), Box::new(NoteWindow::new()));
    desk.handle_event(Event::Resize(80, 24));
    let rect = desk.windows().get(id).unwrap().rect();
    assert!(rect.x + rect.width <= 80);
    assert!(rect.y >= 1);
}
