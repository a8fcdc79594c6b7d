use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    Continue,
    Quit,
}

/// What a key means when the main panel has focus and no dialog is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    // Shortcuts that work from any focus
    Save,
    Load,
    FocusSearch,

    MoveUp,
    MoveDown,
    First,
    Last,
    Select,
    Expand,
    Collapse,
    ToggleExpand,
    NextTab,
    ToggleShowAll,
    EditValue,
    Reset,
    ResetAll,
    Export,
    SaveAs,
    SaveAndExit,
    Help,
    Quit,
}

pub struct EventHandler;

impl EventHandler {
    /// Ctrl (or Cmd) combinations that apply regardless of focus.
    pub fn shortcut(key: &KeyEvent) -> Option<Action> {
        if !key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::SUPER)
        {
            return None;
        }
        match key.code {
            KeyCode::Char('s') => Some(Action::Save),
            KeyCode::Char('o') => Some(Action::Load),
            KeyCode::Char('f') => Some(Action::FocusSearch),
            _ => None,
        }
    }

    pub fn main_action(key: &KeyEvent) -> Option<Action> {
        if let Some(action) = Self::shortcut(key) {
            return Some(action);
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return None;
        }

        match key.code {
            KeyCode::Up | KeyCode::Char('k') => Some(Action::MoveUp),
            KeyCode::Down | KeyCode::Char('j') => Some(Action::MoveDown),
            KeyCode::Home => Some(Action::First),
            KeyCode::End => Some(Action::Last),
            KeyCode::Enter => Some(Action::Select),
            KeyCode::Right | KeyCode::Char('l') => Some(Action::Expand),
            KeyCode::Left | KeyCode::Char('h') => Some(Action::Collapse),
            KeyCode::Char(' ') => Some(Action::ToggleExpand),
            KeyCode::Tab => Some(Action::NextTab),
            KeyCode::Char('/') => Some(Action::FocusSearch),
            KeyCode::Char('a') => Some(Action::ToggleShowAll),
            KeyCode::Char('e') => Some(Action::EditValue),
            KeyCode::Char('r') => Some(Action::Reset),
            KeyCode::Char('R') => Some(Action::ResetAll),
            KeyCode::Char('x') => Some(Action::Export),
            KeyCode::Char('w') => Some(Action::SaveAs),
            KeyCode::Char('X') => Some(Action::SaveAndExit),
            KeyCode::Char('?') => Some(Action::Help),
            KeyCode::Char('q') => Some(Action::Quit),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_ctrl_and_cmd_shortcuts() {
        for modifier in [KeyModifiers::CONTROL, KeyModifiers::SUPER] {
            assert_eq!(EventHandler::shortcut(&key(KeyCode::Char('s'), modifier)), Some(Action::Save));
            assert_eq!(EventHandler::shortcut(&key(KeyCode::Char('o'), modifier)), Some(Action::Load));
            assert_eq!(
                EventHandler::shortcut(&key(KeyCode::Char('f'), modifier)),
                Some(Action::FocusSearch)
            );
        }
        assert_eq!(EventHandler::shortcut(&key(KeyCode::Char('s'), KeyModifiers::NONE)), None);
        assert_eq!(EventHandler::shortcut(&key(KeyCode::Char('q'), KeyModifiers::CONTROL)), None);
    }

    #[test]
    fn test_plain_keys() {
        assert_eq!(
            EventHandler::main_action(&key(KeyCode::Char('R'), KeyModifiers::SHIFT)),
            Some(Action::ResetAll)
        );
        assert_eq!(
            EventHandler::main_action(&key(KeyCode::Char(' '), KeyModifiers::NONE)),
            Some(Action::ToggleExpand)
        );
        assert_eq!(
            EventHandler::main_action(&key(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            None
        );
        assert_eq!(
            EventHandler::main_action(&key(KeyCode::Char('s'), KeyModifiers::CONTROL)),
            Some(Action::Save)
        );
    }
}
