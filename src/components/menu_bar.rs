//! Menu bars with dropdowns, shared by the desktop's global menu and the
//! per-window menus.
//!
//! Geometry is derived from a [`MenuAnchor`] on every call instead of being
//! cached at draw time, so hit-testing stays correct while a window moves.
//! Names start two cells in from the anchor and are spaced by their length
//! plus three; a dropdown opens one row below the bar, under its name.
use crossterm::event::KeyEvent;
use ratatui::prelude::Rect;

use crate::keybindings::{Action, KeyBindings};
use crate::layout::rect_contains;
use crate::theme;
use crate::ui::{UiFrame, fit_to_width};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem<A> {
    pub label: String,
    /// `None` marks a separator.
    pub action: Option<A>,
}

impl<A> MenuItem<A> {
    pub fn new(label: impl Into<String>, action: A) -> Self {
        Self {
            label: label.into(),
            action: Some(action),
        }
    }

    pub fn separator() -> Self {
        Self {
            label: String::new(),
            action: None,
        }
    }

    pub fn is_separator(&self) -> bool {
        self.action.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Menu<A> {
    pub name: String,
    pub items: Vec<MenuItem<A>>,
}

impl<A> Menu<A> {
    pub fn new(name: impl Into<String>, items: Vec<MenuItem<A>>) -> Self {
        Self {
            name: name.into(),
            items,
        }
    }

    fn first_selectable(&self) -> usize {
        self.items
            .iter()
            .position(|item| !item.is_separator())
            .unwrap_or(0)
    }

    fn label_width(&self) -> u16 {
        self.items
            .iter()
            .map(|item| item.label.chars().count())
            .max()
            .unwrap_or(0) as u16
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuScope {
    /// Row 0 of the terminal, with logo and clock.
    Global,
    /// The row under a window's title; dropdowns stay inside the window.
    Window,
}

/// Screen position of a menu bar row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuAnchor {
    pub x: u16,
    pub row: u16,
    pub width: u16,
}

impl MenuAnchor {
    pub fn global(term_width: u16) -> Self {
        Self {
            x: 0,
            row: 0,
            width: term_width,
        }
    }

    pub fn for_window(rect: Rect) -> Self {
        Self {
            x: rect.x,
            row: rect.y.saturating_add(1),
            width: rect.width,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuKeyOutcome<A> {
    /// The menu is closed; the key is not for it.
    Ignored,
    Consumed,
    Closed,
    Selected(A),
}

#[derive(Debug, Clone)]
pub struct MenuBar<A> {
    menus: Vec<Menu<A>>,
    scope: MenuScope,
    active: bool,
    selected_menu: usize,
    selected_item: usize,
}

impl<A: Clone> MenuBar<A> {
    pub fn new(scope: MenuScope, menus: Vec<Menu<A>>) -> Self {
        Self {
            menus,
            scope,
            active: false,
            selected_menu: 0,
            selected_item: 0,
        }
    }

    pub fn global(menus: Vec<Menu<A>>) -> Self {
        Self::new(MenuScope::Global, menus)
    }

    pub fn window(menus: Vec<Menu<A>>) -> Self {
        Self::new(MenuScope::Window, menus)
    }

    pub fn scope(&self) -> MenuScope {
        self.scope
    }

    pub fn menus(&self) -> &[Menu<A>] {
        &self.menus
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn selected_menu(&self) -> usize {
        self.selected_menu
    }

    pub fn selected_item(&self) -> usize {
        self.selected_item
    }

    /// Open menu `index` with its first selectable item highlighted.
    pub fn open(&mut self, index: usize) {
        if index >= self.menus.len() {
            return;
        }
        self.active = true;
        self.select_menu(index);
    }

    pub fn close(&mut self) {
        self.active = false;
    }

    pub fn toggle(&mut self) {
        if self.active {
            self.close();
        } else {
            self.open(self.selected_menu.min(self.menus.len().saturating_sub(1)));
        }
    }

    fn select_menu(&mut self, index: usize) {
        self.selected_menu = index;
        self.selected_item = self.menus[index].first_selectable();
    }

    /// Column of each menu name on the bar.
    pub fn name_positions(&self, anchor: MenuAnchor) -> Vec<u16> {
        let mut x = anchor.x.saturating_add(2);
        self.menus
            .iter()
            .map(|menu| {
                let at = x;
                x = x.saturating_add(menu.name.chars().count() as u16 + 3);
                at
            })
            .collect()
    }

    fn name_at(&self, anchor: MenuAnchor, column: u16) -> Option<usize> {
        self.name_positions(anchor)
            .into_iter()
            .zip(&self.menus)
            .position(|(pos, menu)| {
                let len = menu.name.chars().count() as u16;
                column >= pos && column < pos + len + 2
            })
    }

    /// Text column and inner width of the open dropdown.
    fn dropdown_origin(&self, anchor: MenuAnchor) -> Option<(u16, u16)> {
        let menu = self.menus.get(self.selected_menu)?;
        let positions = self.name_positions(anchor);
        let mut x = positions[self.selected_menu];
        let width = menu.label_width() + 4;
        if self.scope == MenuScope::Window {
            let right = anchor.x as i32 + anchor.width as i32;
            if x as i32 - 1 + width as i32 + 2 > right {
                x = (anchor.x as i32 + 2).max(right - width as i32 - 2).max(0) as u16;
            }
        }
        Some((x, width))
    }

    /// Bordered area of the open dropdown, or `None` while closed.
    pub fn dropdown_rect(&self, anchor: MenuAnchor) -> Option<Rect> {
        if !self.active {
            return None;
        }
        let (x, width) = self.dropdown_origin(anchor)?;
        let items = self.menus[self.selected_menu].items.len() as u16;
        Some(Rect {
            x: x.saturating_sub(1),
            y: anchor.row.saturating_add(1),
            width: width + 2,
            height: items + 2,
        })
    }

    pub fn hit_dropdown(&self, anchor: MenuAnchor, column: u16, row: u16) -> bool {
        self.dropdown_rect(anchor)
            .is_some_and(|rect| rect_contains(rect, column, row))
    }

    /// Item index under an item row of the open dropdown.
    fn item_at(&self, anchor: MenuAnchor, column: u16, row: u16) -> Option<usize> {
        let rect = self.dropdown_rect(anchor)?;
        let first_row = anchor.row.saturating_add(2);
        let items = self.menus[self.selected_menu].items.len() as u16;
        let inside_x = column >= rect.x && column < rect.x + rect.width;
        (inside_x && row >= first_row && row < first_row + items)
            .then(|| (row - first_row) as usize)
    }

    /// Track the pointer while open. Returns `true` when the pointer is over
    /// the bar row or the dropdown.
    pub fn handle_hover(&mut self, anchor: MenuAnchor, column: u16, row: u16) -> bool {
        if !self.active {
            return false;
        }
        if row == anchor.row {
            if let Some(index) = self.name_at(anchor, column)
                && index != self.selected_menu
            {
                self.select_menu(index);
            }
            return true;
        }
        if !self.hit_dropdown(anchor, column, row) {
            return false;
        }
        if let Some(index) = self.item_at(anchor, column, row)
            && !self.menus[self.selected_menu].items[index].is_separator()
        {
            self.selected_item = index;
        }
        true
    }

    /// A click on the bar opens or toggles a menu; a click on an item
    /// returns its action and closes; any other click closes.
    pub fn handle_click(&mut self, anchor: MenuAnchor, column: u16, row: u16) -> Option<A> {
        if row == anchor.row {
            match self.name_at(anchor, column) {
                Some(index) if self.active && index == self.selected_menu => self.close(),
                Some(index) => self.open(index),
                None => self.close(),
            }
            return None;
        }
        if !self.active {
            return None;
        }
        match self.item_at(anchor, column, row) {
            Some(index) => {
                let action = self.menus[self.selected_menu].items[index].action.clone();
                if action.is_some() {
                    self.close();
                }
                action
            }
            None => {
                self.close();
                None
            }
        }
    }

    pub fn handle_key(&mut self, key: &KeyEvent, bindings: &KeyBindings) -> MenuKeyOutcome<A> {
        if !self.active || self.menus.is_empty() {
            return MenuKeyOutcome::Ignored;
        }
        let count = self.menus.len();
        if bindings.matches(Action::MenuLeft, key) {
            self.select_menu((self.selected_menu + count - 1) % count);
        } else if bindings.matches(Action::MenuRight, key) {
            self.select_menu((self.selected_menu + 1) % count);
        } else if bindings.matches(Action::MenuUp, key) {
            self.step_item(false);
        } else if bindings.matches(Action::MenuDown, key) {
            self.step_item(true);
        } else if bindings.matches(Action::MenuSelect, key) {
            let action = self.menus[self.selected_menu]
                .items
                .get(self.selected_item)
                .and_then(|item| item.action.clone());
            if let Some(action) = action {
                self.close();
                return MenuKeyOutcome::Selected(action);
            }
        } else if bindings.matches(Action::MenuClose, key) {
            self.close();
            return MenuKeyOutcome::Closed;
        }
        MenuKeyOutcome::Consumed
    }

    /// Move the highlight one selectable item, wrapping past either end.
    fn step_item(&mut self, forward: bool) {
        let items = &self.menus[self.selected_menu].items;
        let len = items.len();
        if items.iter().all(MenuItem::is_separator) {
            return;
        }
        let mut index = self.selected_item;
        loop {
            index = if forward {
                (index + 1) % len
            } else {
                (index + len - 1) % len
            };
            if !items[index].is_separator() {
                break;
            }
        }
        self.selected_item = index;
    }

    /// Draw the bar row. `focused` dims window menus of inactive windows.
    pub fn render_bar(&self, frame: &mut UiFrame<'_>, anchor: MenuAnchor, focused: bool) {
        let bar = if focused {
            theme::menu_style(false)
        } else {
            theme::style(theme::window_inactive_fg(), theme::menu_bg())
        };
        if self.scope == MenuScope::Global {
            frame.fill(Rect::new(anchor.x, anchor.row, anchor.width, 1), " ", bar);
            frame.set_string(anchor.x, anchor.row, " ≡", bar);
        }
        for (index, (pos, menu)) in self
            .name_positions(anchor)
            .into_iter()
            .zip(&self.menus)
            .enumerate()
        {
            let style = theme::menu_style(self.active && index == self.selected_menu);
            frame.set_string(pos, anchor.row, &format!(" {} ", menu.name), style);
        }
    }

    pub fn render_dropdown(&self, frame: &mut UiFrame<'_>, anchor: MenuAnchor) {
        let Some(rect) = self.dropdown_rect(anchor) else {
            return;
        };
        let Some((x, width)) = self.dropdown_origin(anchor) else {
            return;
        };
        let plain = theme::menu_style(false);
        frame.fill(rect, " ", plain);
        frame.draw_box(rect, plain, false);
        let first_row = anchor.row.saturating_add(2);
        for (index, item) in self.menus[self.selected_menu].items.iter().enumerate() {
            let row = first_row + index as u16;
            if item.is_separator() {
                frame.set_string(x, row, &"─".repeat(width as usize), plain);
            } else {
                let style = theme::menu_style(index == self.selected_item);
                let label = format!(" {} ", fit_to_width(&item.label, width as usize - 2));
                frame.set_string(x, row, &label, style);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn sample() -> MenuBar<&'static str> {
        MenuBar::global(vec![
            Menu::new(
                "File",
                vec![
                    MenuItem::new("New", "new"),
                    MenuItem::separator(),
                    MenuItem::new("Exit", "exit"),
                ],
            ),
            Menu::new("Help", vec![MenuItem::new("About", "about")]),
        ])
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn names_are_spaced_by_length_plus_three() {
        let bar = sample();
        assert_eq!(bar.name_positions(MenuAnchor::global(80)), vec![2, 9]);
    }

    #[test]
    fn click_toggles_and_selects() {
        let mut bar = sample();
        let anchor = MenuAnchor::global(80);
        assert_eq!(bar.handle_click(anchor, 3, 0), None);
        assert!(bar.is_active());
        assert_eq!(bar.dropdown_rect(anchor), Some(Rect::new(1, 1, 10, 5)));
        assert_eq!(bar.handle_click(anchor, 3, 4), Some("exit"));
        assert!(!bar.is_active());
        bar.handle_click(anchor, 3, 0);
        bar.handle_click(anchor, 3, 0);
        assert!(!bar.is_active());
    }

    #[test]
    fn clicking_a_separator_keeps_menu_open() {
        let mut bar = sample();
        let anchor = MenuAnchor::global(80);
        bar.open(0);
        assert_eq!(bar.handle_click(anchor, 3, 3), None);
        assert!(bar.is_active());
        assert_eq!(bar.handle_click(anchor, 40, 10), None);
        assert!(!bar.is_active());
    }

    #[test]
    fn keyboard_skips_separators() {
        let kb = KeyBindings::default();
        let mut bar = sample();
        bar.open(0);
        assert_eq!(bar.selected_item(), 0);
        bar.handle_key(&key(KeyCode::Down), &kb);
        assert_eq!(bar.selected_item(), 2);
        bar.handle_key(&key(KeyCode::Down), &kb);
        assert_eq!(bar.selected_item(), 0);
        bar.handle_key(&key(KeyCode::Up), &kb);
        assert_eq!(bar.selected_item(), 2);
        assert_eq!(
            bar.handle_key(&key(KeyCode::Enter), &kb),
            MenuKeyOutcome::Selected("exit")
        );
        assert!(!bar.is_active());
    }

    #[test]
    fn left_right_wrap_menus() {
        let kb = KeyBindings::default();
        let mut bar = sample();
        bar.open(0);
        bar.handle_key(&key(KeyCode::Left), &kb);
        assert_eq!(bar.selected_menu(), 1);
        bar.handle_key(&key(KeyCode::Right), &kb);
        assert_eq!(bar.selected_menu(), 0);
        assert_eq!(bar.handle_key(&key(KeyCode::Esc), &kb), MenuKeyOutcome::Closed);
        assert_eq!(
            bar.handle_key(&key(KeyCode::Down), &kb),
            MenuKeyOutcome::Ignored
        );
    }

    #[test]
    fn hover_moves_between_menus_and_items() {
        let mut bar = sample();
        let anchor = MenuAnchor::global(80);
        bar.open(0);
        assert!(bar.handle_hover(anchor, 10, 0));
        assert_eq!(bar.selected_menu(), 1);
        bar.open(0);
        assert!(bar.handle_hover(anchor, 3, 3));
        assert_eq!(bar.selected_item(), 0);
        assert!(bar.handle_hover(anchor, 3, 4));
        assert_eq!(bar.selected_item(), 2);
        assert!(!bar.handle_hover(anchor, 50, 12));
    }

    #[test]
    fn window_dropdown_is_clamped_inside_window() {
        let mut bar: MenuBar<String> = MenuBar::window(vec![
            Menu::new("A", vec![]),
            Menu::new(
                "Edit",
                vec![MenuItem::new("Paste special!", "x".to_string())],
            ),
        ]);
        let anchor = MenuAnchor::for_window(Rect::new(10, 4, 24, 10));
        bar.open(1);
        let rect = bar.dropdown_rect(anchor).unwrap();
        assert_eq!(rect.y, 6);
        assert_eq!(rect.x, 13);
        assert!(rect.x + rect.width <= 10 + 24);
    }
}
