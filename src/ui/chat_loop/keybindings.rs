//! Key routing for the chat screen.
//!
//! Keys map to [`AppAction`]s where the view model has to react, and go
//! straight to whichever textarea has focus otherwise. Modal prompts take
//! precedence over the input box.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tui_textarea::Input as TAInput;

use crate::core::app::{App, AppAction};

/// Rows moved per PageUp/PageDown.
const PAGE_SCROLL: u16 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyResult {
    Actions(Vec<AppAction>),
    /// Consumed without touching the view model.
    Handled,
    Exit,
}

pub fn handle_key(app: &mut App, key: KeyEvent) -> KeyResult {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl && key.code == KeyCode::Char('c') {
        return KeyResult::Exit;
    }

    if app.ui.reset_prompt_open {
        return handle_reset_prompt_key(key);
    }
    if app.ui.settings.is_some() {
        return handle_settings_key(app, key);
    }

    match key.code {
        KeyCode::Enter if key.modifiers.contains(KeyModifiers::ALT) => {
            app.ui.textarea_mut().insert_newline();
            KeyResult::Handled
        }
        KeyCode::Enter => KeyResult::Actions(vec![AppAction::SubmitMessage {
            message: app.ui.input_text(),
        }]),
        KeyCode::Char('r') if ctrl => KeyResult::Actions(vec![AppAction::RequestReset]),
        KeyCode::Char('s') if ctrl => KeyResult::Actions(vec![AppAction::OpenSettings]),
        KeyCode::PageUp => {
            app.ui.scroll_up(PAGE_SCROLL);
            KeyResult::Handled
        }
        KeyCode::PageDown => {
            app.ui.scroll_down(PAGE_SCROLL);
            KeyResult::Handled
        }
        _ => {
            app.ui.textarea_mut().input(TAInput::from(key));
            KeyResult::Handled
        }
    }
}

fn handle_reset_prompt_key(key: KeyEvent) -> KeyResult {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
            KeyResult::Actions(vec![AppAction::ConfirmReset])
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            KeyResult::Actions(vec![AppAction::CancelReset])
        }
        _ => KeyResult::Handled,
    }
}

fn handle_settings_key(app: &mut App, key: KeyEvent) -> KeyResult {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Enter => KeyResult::Actions(vec![AppAction::SaveSettings]),
        KeyCode::Esc => KeyResult::Actions(vec![AppAction::CloseSettings]),
        KeyCode::Char('d') if ctrl => KeyResult::Actions(vec![AppAction::UseDemoMode]),
        _ => {
            if let Some(dialog) = app.ui.settings.as_mut() {
                dialog.error = None;
                dialog.textarea_mut().input(TAInput::from(key));
            }
            KeyResult::Handled
        }
    }
}

/// Insert pasted text into whichever textarea has focus. The endpoint field
/// is single-line, so newlines are dropped there.
pub fn handle_paste(app: &mut App, text: &str) {
    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    if let Some(dialog) = app.ui.settings.as_mut() {
        dialog.textarea_mut().insert_str(text.replace('\n', ""));
    } else if !app.ui.reset_prompt_open {
        app.ui.textarea_mut().insert_str(text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_utils::create_test_app;
    use ratatui::crossterm::event::KeyEventKind;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: ratatui::crossterm::event::KeyEventState::NONE,
        }
    }

    fn type_text(app: &mut App, text: &str) {
        for ch in text.chars() {
            handle_key(app, key(KeyCode::Char(ch), KeyModifiers::NONE));
        }
    }

    #[test]
    fn enter_submits_and_alt_enter_adds_a_line() {
        let mut app = create_test_app();
        type_text(&mut app, "膝蓋");
        handle_key(&mut app, key(KeyCode::Enter, KeyModifiers::ALT));
        type_text(&mut app, "痛");
        assert_eq!(app.ui.input_text(), "膝蓋\n痛");

        assert_eq!(
            handle_key(&mut app, key(KeyCode::Enter, KeyModifiers::NONE)),
            KeyResult::Actions(vec![AppAction::SubmitMessage {
                message: "膝蓋\n痛".to_string()
            }])
        );
    }

    #[test]
    fn ctrl_c_exits_from_any_mode() {
        let mut app = create_test_app();
        app.ui.reset_prompt_open = true;
        assert_eq!(
            handle_key(&mut app, key(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            KeyResult::Exit
        );
    }

    #[test]
    fn reset_prompt_captures_keys() {
        let mut app = create_test_app();
        assert_eq!(
            handle_key(&mut app, key(KeyCode::Char('r'), KeyModifiers::CONTROL)),
            KeyResult::Actions(vec![AppAction::RequestReset])
        );
        app.ui.reset_prompt_open = true;

        assert_eq!(
            handle_key(&mut app, key(KeyCode::Char('x'), KeyModifiers::NONE)),
            KeyResult::Handled
        );
        assert!(app.ui.input_text().is_empty());
        assert_eq!(
            handle_key(&mut app, key(KeyCode::Char('y'), KeyModifiers::NONE)),
            KeyResult::Actions(vec![AppAction::ConfirmReset])
        );
        assert_eq!(
            handle_key(&mut app, key(KeyCode::Esc, KeyModifiers::NONE)),
            KeyResult::Actions(vec![AppAction::CancelReset])
        );
    }

    #[test]
    fn settings_dialog_takes_typing_and_shortcuts() {
        let mut app = create_test_app();
        app.settings().open();
        type_text(&mut app, "http://x");
        assert_eq!(
            app.ui.settings.as_ref().map(|dialog| dialog.draft()).as_deref(),
            Some("http://x")
        );
        assert!(app.ui.input_text().is_empty());

        assert_eq!(
            handle_key(&mut app, key(KeyCode::Char('d'), KeyModifiers::CONTROL)),
            KeyResult::Actions(vec![AppAction::UseDemoMode])
        );
        assert_eq!(
            handle_key(&mut app, key(KeyCode::Enter, KeyModifiers::NONE)),
            KeyResult::Actions(vec![AppAction::SaveSettings])
        );
    }

    #[test]
    fn page_keys_scroll_the_transcript() {
        let mut app = create_test_app();
        handle_key(&mut app, key(KeyCode::PageUp, KeyModifiers::NONE));
        handle_key(&mut app, key(KeyCode::PageUp, KeyModifiers::NONE));
        assert_eq!(app.ui.scroll_from_bottom, 2 * PAGE_SCROLL);
        handle_key(&mut app, key(KeyCode::PageDown, KeyModifiers::NONE));
        assert_eq!(app.ui.scroll_from_bottom, PAGE_SCROLL);
    }

    #[test]
    fn paste_goes_to_the_focused_field() {
        let mut app = create_test_app();
        handle_paste(&mut app, "一\r\n二");
        assert_eq!(app.ui.input_text(), "一\n二");

        app.settings().open();
        handle_paste(&mut app, "https://coach.example.com/\nchat");
        assert_eq!(
            app.ui.settings.as_ref().map(|dialog| dialog.draft()).as_deref(),
            Some("https://coach.example.com/chat")
        );
    }
}
