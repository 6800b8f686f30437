use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::App;

/// Input action that can be performed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Quit,
    ScrollDown,
    ScrollUp,
    FlickDown,
    FlickUp,
    NextScene,
    PrevScene,
    StartSearch,
    ResetDrawer,
    Confirm,
    Cancel,
    InputChar(char),
    Backspace,
    None,
}

/// Handle a key event and return the corresponding action
pub fn handle_key_event(key: KeyEvent, app: &App) -> Action {
    if app.is_input_mode() {
        return handle_input_mode(key);
    }

    match (key.code, key.modifiers) {
        (KeyCode::Char('q'), KeyModifiers::NONE) => Action::Quit,
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Action::Quit,

        (KeyCode::Char('j'), KeyModifiers::NONE) => Action::ScrollDown,
        (KeyCode::Char('k'), KeyModifiers::NONE) => Action::ScrollUp,
        (KeyCode::Down, KeyModifiers::NONE) => Action::ScrollDown,
        (KeyCode::Up, KeyModifiers::NONE) => Action::ScrollUp,

        // Some terminals report uppercase letters without SHIFT
        (KeyCode::Char('J'), _) => Action::FlickDown,
        (KeyCode::Char('K'), _) => Action::FlickUp,
        (KeyCode::PageDown, KeyModifiers::NONE) => Action::FlickDown,
        (KeyCode::PageUp, KeyModifiers::NONE) => Action::FlickUp,

        (KeyCode::Tab, KeyModifiers::NONE) => Action::NextScene,
        (KeyCode::BackTab, _) => Action::PrevScene,

        (KeyCode::Char('/'), KeyModifiers::NONE) => Action::StartSearch,
        (KeyCode::Char('r'), KeyModifiers::NONE) => Action::ResetDrawer,

        _ => Action::None,
    }
}

/// Handle key events in input mode (search)
fn handle_input_mode(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Enter => Action::Confirm,
        KeyCode::Esc => Action::Cancel,
        KeyCode::Backspace => Action::Backspace,
        KeyCode::Char(c) => Action::InputChar(c),
        _ => Action::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::Theme;
    use scenefold_core::AccordionConfig;
    use std::sync::Arc;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_normal_mode_keys() {
        let app = App::new(Arc::new(AccordionConfig::default()), None, Theme::default());
        assert_eq!(handle_key_event(key(KeyCode::Char('j'), KeyModifiers::NONE), &app), Action::ScrollDown);
        assert_eq!(handle_key_event(key(KeyCode::Char('J'), KeyModifiers::SHIFT), &app), Action::FlickDown);
        assert_eq!(handle_key_event(key(KeyCode::Char('K'), KeyModifiers::NONE), &app), Action::FlickUp);
        assert_eq!(handle_key_event(key(KeyCode::Tab, KeyModifiers::NONE), &app), Action::NextScene);
        assert_eq!(handle_key_event(key(KeyCode::Char('/'), KeyModifiers::NONE), &app), Action::StartSearch);
    }

    #[test]
    fn test_search_mode_captures_letters() {
        let mut app = App::new(Arc::new(AccordionConfig::default()), None, Theme::default());
        app.handle_action(Action::StartSearch, tokio::time::Instant::now());
        assert_eq!(handle_key_event(key(KeyCode::Char('q'), KeyModifiers::NONE), &app), Action::InputChar('q'));
        assert_eq!(handle_key_event(key(KeyCode::Esc, KeyModifiers::NONE), &app), Action::Cancel);
    }
}
