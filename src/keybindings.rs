use std::collections::HashMap;
use std::fmt;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Exit,
    // Menus
    MenuToggle,
    MenuClose,
    MenuUp,
    MenuDown,
    MenuLeft,
    MenuRight,
    MenuSelect,
    // Focus
    FocusNext,
    // Dialog navigation/actions
    DialogLeft,
    DialogRight,
    DialogNext,
    DialogAccept,
    DialogCancel,
    // Scrolling inside hosted windows
    ScrollUp,
    ScrollDown,
    ScrollPageUp,
    ScrollPageDown,
}

impl Action {
    /// Actions listed in the help dialog, in display order.
    pub const HELP_ORDER: [Action; 6] = [
        Action::Exit,
        Action::MenuToggle,
        Action::MenuClose,
        Action::FocusNext,
        Action::DialogAccept,
        Action::DialogCancel,
    ];
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Action::Exit => "Exit",
            Action::MenuToggle => "Open/close menu",
            Action::MenuClose => "Close menu",
            Action::MenuUp => "Menu up",
            Action::MenuDown => "Menu down",
            Action::MenuLeft => "Previous menu",
            Action::MenuRight => "Next menu",
            Action::MenuSelect => "Menu select",
            Action::FocusNext => "Next window",
            Action::DialogLeft => "Dialog left",
            Action::DialogRight => "Dialog right",
            Action::DialogNext => "Dialog next button",
            Action::DialogAccept => "Dialog accept",
            Action::DialogCancel => "Dialog cancel",
            Action::ScrollUp => "Scroll up",
            Action::ScrollDown => "Scroll down",
            Action::ScrollPageUp => "Scroll page up",
            Action::ScrollPageDown => "Scroll page down",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCombo {
    pub code: KeyCode,
    pub mods: KeyModifiers,
}

impl KeyCombo {
    pub fn new(code: KeyCode, mods: KeyModifiers) -> Self {
        Self { code, mods }
    }

    pub fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    pub fn matches(&self, key: &KeyEvent) -> bool {
        key.code == self.code && key.modifiers == self.mods
    }

    pub fn display(&self) -> String {
        let mut parts = Vec::new();
        if self.mods.contains(KeyModifiers::CONTROL) {
            parts.push("Ctrl".to_string());
        }
        if self.mods.contains(KeyModifiers::SHIFT) {
            parts.push("Shift".to_string());
        }
        if self.mods.contains(KeyModifiers::ALT) {
            parts.push("Alt".to_string());
        }
        let code = match self.code {
            KeyCode::Char(c) => c.to_ascii_uppercase().to_string(),
            KeyCode::Esc => "Esc".to_string(),
            KeyCode::Enter => "Enter".to_string(),
            KeyCode::Tab => "Tab".to_string(),
            KeyCode::Left => "Left".to_string(),
            KeyCode::Right => "Right".to_string(),
            KeyCode::Up => "Up".to_string(),
            KeyCode::Down => "Down".to_string(),
            KeyCode::PageUp => "PageUp".to_string(),
            KeyCode::PageDown => "PageDown".to_string(),
            KeyCode::F(n) => format!("F{}", n),
            _ => format!("{:?}", self.code),
        };
        parts.push(code);
        parts.join("+")
    }
}

impl fmt::Display for KeyCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

#[derive(Debug, Clone)]
pub struct KeyBindings {
    map: HashMap<Action, Vec<KeyCombo>>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        use Action::*;
        let mut kb = Self::empty();
        kb.add(
            Exit,
            KeyCombo::new(KeyCode::Char('q'), KeyModifiers::CONTROL),
        );
        kb.add(MenuToggle, KeyCombo::plain(KeyCode::F(10)));
        kb.add(MenuClose, KeyCombo::plain(KeyCode::Esc));
        kb.add(MenuUp, KeyCombo::plain(KeyCode::Up));
        kb.add(MenuDown, KeyCombo::plain(KeyCode::Down));
        kb.add(MenuLeft, KeyCombo::plain(KeyCode::Left));
        kb.add(MenuRight, KeyCombo::plain(KeyCode::Right));
        kb.add(MenuSelect, KeyCombo::plain(KeyCode::Enter));
        kb.add(FocusNext, KeyCombo::plain(KeyCode::Tab));
        kb.add(DialogLeft, KeyCombo::plain(KeyCode::Left));
        kb.add(DialogRight, KeyCombo::plain(KeyCode::Right));
        kb.add(DialogNext, KeyCombo::plain(KeyCode::Tab));
        kb.add(DialogAccept, KeyCombo::plain(KeyCode::Enter));
        kb.add(DialogCancel, KeyCombo::plain(KeyCode::Esc));
        kb.add(ScrollUp, KeyCombo::plain(KeyCode::Up));
        kb.add(ScrollDown, KeyCombo::plain(KeyCode::Down));
        kb.add(ScrollPageUp, KeyCombo::plain(KeyCode::PageUp));
        kb.add(ScrollPageDown, KeyCombo::plain(KeyCode::PageDown));
        kb
    }
}

impl KeyBindings {
    pub fn empty() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    pub fn add(&mut self, action: Action, combo: KeyCombo) {
        self.map.entry(action).or_default().push(combo);
    }

    pub fn matches(&self, action: Action, key: &KeyEvent) -> bool {
        self.map
            .get(&action)
            .is_some_and(|list| list.iter().any(|c| c.matches(key)))
    }

    /// Display strings for all combos mapped to `action`.
    pub fn combos_for(&self, action: Action) -> Vec<String> {
        self.map
            .get(&action)
            .map(|list| list.iter().map(|c| c.display()).collect())
            .unwrap_or_default()
    }

    pub fn first_combo(&self, action: Action) -> Option<KeyCombo> {
        self.map.get(&action).and_then(|list| list.first().cloned())
    }

    /// One `"Ctrl+Q  Exit"` style line per help-listed action.
    pub fn help_lines(&self) -> Vec<String> {
        Action::HELP_ORDER
            .iter()
            .map(|action| format!("{:<8} {}", self.combos_for(*action).join("/"), action))
            .collect()
    }
}
