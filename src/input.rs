use crate::app::App;
use crate::models::{ApiRequest, Overlay, Screen};
use crate::notes_input::FormField;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// What the terminal loop has to do after a key press.
#[derive(Debug)]
pub enum Action {
    None,
    Send(ApiRequest),
    ExportPdf,
    Quit,
}

impl From<Option<ApiRequest>> for Action {
    fn from(request: Option<ApiRequest>) -> Self {
        request.map(Action::Send).unwrap_or(Action::None)
    }
}

fn ctrl(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL)
}

pub fn handle_key(app: &mut App, key: KeyEvent) -> Action {
    if ctrl(&key) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return Action::Quit;
    }

    match &app.overlay {
        Some(Overlay::Alert(_)) => {
            app.dismiss_overlay();
            return Action::None;
        }
        Some(Overlay::QuitConfirm) => {
            return match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => {
                    app.should_quit = true;
                    Action::Quit
                }
                _ => {
                    app.dismiss_overlay();
                    Action::None
                }
            };
        }
        None => {}
    }

    if app.is_loading() {
        return Action::None;
    }

    match app.screen {
        Screen::Form => handle_form_input(app, key),
        Screen::Quiz => handle_quiz_input(app, key),
    }
}

fn handle_form_input(app: &mut App, key: KeyEvent) -> Action {
    if app.form.language_selector.is_open() {
        handle_language_input(app, key);
        return Action::None;
    }

    if ctrl(&key) {
        return match key.code {
            KeyCode::Char('g') => app.request_generation().into(),
            KeyCode::Char('q') => {
                app.show_quiz();
                Action::None
            }
            KeyCode::Char('x') => {
                app.form.clear_files();
                Action::None
            }
            _ => Action::None,
        };
    }

    match key.code {
        KeyCode::Esc => {
            app.overlay = Some(Overlay::QuitConfirm);
            Action::None
        }
        KeyCode::Tab => {
            app.form.focus = app.form.focus.next();
            Action::None
        }
        KeyCode::BackTab => {
            app.form.focus = app.form.focus.previous();
            Action::None
        }
        _ => match app.form.focus {
            FormField::Notes => {
                handle_notes_input(app, key);
                Action::None
            }
            FormField::Files => handle_files_input(app, key),
            FormField::Difficulty | FormField::Model | FormField::Questions => {
                handle_selector_input(app, key);
                Action::None
            }
            FormField::Language => {
                if key.code == KeyCode::Enter {
                    app.form.toggle_language_selector();
                }
                Action::None
            }
            FormField::Generate => {
                if key.code == KeyCode::Enter {
                    app.request_generation().into()
                } else {
                    Action::None
                }
            }
        },
    }
}

fn handle_notes_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char(c) => app.form.type_char(c),
        KeyCode::Enter => app.form.type_char('\n'),
        KeyCode::Backspace => app.form.backspace(),
        KeyCode::Left => app.form.move_cursor_left(),
        KeyCode::Right => app.form.move_cursor_right(),
        _ => {}
    }
}

fn handle_files_input(app: &mut App, key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Enter => return app.request_upload().into(),
        KeyCode::Char(c) => app.form.paths.insert(c),
        KeyCode::Backspace => app.form.paths.backspace(),
        KeyCode::Left => app.form.paths.move_left(),
        KeyCode::Right => app.form.paths.move_right(),
        _ => {}
    }
    Action::None
}

fn handle_selector_input(app: &mut App, key: KeyEvent) {
    let forward = match key.code {
        KeyCode::Right => true,
        KeyCode::Left => false,
        _ => return,
    };
    match app.form.focus {
        FormField::Difficulty => app.form.cycle_difficulty(forward),
        FormField::Model => app.form.cycle_model(forward),
        FormField::Questions => app.form.cycle_question_count(forward),
        _ => {}
    }
}

fn handle_language_input(app: &mut App, key: KeyEvent) {
    let selector = &mut app.form.language_selector;
    match key.code {
        KeyCode::Esc => selector.close(),
        KeyCode::Up => selector.highlight_previous(),
        KeyCode::Down => selector.highlight_next(),
        KeyCode::Backspace => selector.pop_search(),
        KeyCode::Char(c) => selector.push_search(c),
        KeyCode::Enter => app.form.select_highlighted_language(),
        _ => {}
    }
}

fn handle_quiz_input(app: &mut App, key: KeyEvent) -> Action {
    if ctrl(&key) {
        return match key.code {
            KeyCode::Char('s') => {
                app.submit_quiz();
                Action::None
            }
            KeyCode::Char('p') => Action::ExportPdf,
            _ => Action::None,
        };
    }

    match key.code {
        KeyCode::Esc => app.show_form(),
        KeyCode::Down => app.next_question(),
        KeyCode::Up => app.previous_question(),
        KeyCode::Right => app.next_option(),
        KeyCode::Left => app.previous_option(),
        KeyCode::Enter | KeyCode::Char(' ') => app.choose_highlighted(),
        KeyCode::Char(c) if c.is_ascii_alphabetic() => {
            let slot = (c.to_ascii_lowercase() as u8 - b'a') as usize;
            app.choose_option(slot);
        }
        _ => {}
    }
    Action::None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::GenerateResponse;
    use crate::models::Question;
    use crate::notes_input::NoteSource;

    fn press(app: &mut App, code: KeyCode) -> Action {
        handle_key(app, KeyEvent::new(code, KeyModifiers::empty()))
    }

    fn press_ctrl(app: &mut App, c: char) -> Action {
        handle_key(app, KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn app_on_quiz() -> App {
        let mut app = App::new();
        type_text(&mut app, "arithmetic");
        let request_id = match press_ctrl(&mut app, 'g') {
            Action::Send(ApiRequest::Generate { request_id, .. }) => request_id,
            other => panic!("expected generation, got {:?}", other),
        };
        app.handle_generation(
            request_id,
            Ok(GenerateResponse {
                quiz: Some(vec![
                    Question {
                        text: "2+2?".to_string(),
                        options: vec!["3".to_string(), "4".to_string()],
                        correct_answer: "4".to_string(),
                        explanation: None,
                    },
                    Question {
                        text: "3+3?".to_string(),
                        options: vec!["6".to_string(), "9".to_string()],
                        correct_answer: "6".to_string(),
                        explanation: Some("Three twice".to_string()),
                    },
                ]),
                error: None,
            }),
        );
        app
    }

    #[test]
    fn test_typing_goes_to_notes_field() {
        let mut app = App::new();
        type_text(&mut app, "Cells divide");
        assert_eq!(app.form.notes().text(), "Cells divide");
        assert_eq!(app.form.effective_notes(), Some("Cells divide"));
    }

    #[test]
    fn test_can_type_q_and_y_in_notes() {
        let mut app = App::new();
        type_text(&mut app, "quay");
        assert_eq!(app.form.notes().text(), "quay");
        assert!(!app.should_quit);
    }

    #[test]
    fn test_ctrl_x_keeps_typed_notes() {
        let mut app = App::new();
        type_text(&mut app, "Cells divide");
        let action = press_ctrl(&mut app, 'x');

        assert!(matches!(action, Action::None));
        assert_eq!(app.form.notes().text(), "Cells divide");
        assert_eq!(app.form.source(), &NoteSource::Typed);
    }

    #[test]
    fn test_tab_cycles_focus() {
        let mut app = App::new();
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.form.focus, FormField::Files);
        press(&mut app, KeyCode::BackTab);
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.form.focus, FormField::Generate);
    }

    #[test]
    fn test_generate_with_blank_notes_alerts() {
        let mut app = App::new();
        assert!(matches!(press_ctrl(&mut app, 'g'), Action::None));
        assert!(matches!(app.overlay, Some(Overlay::Alert(_))));

        // Any key dismisses the alert without reaching the form.
        press(&mut app, KeyCode::Char('x'));
        assert!(app.overlay.is_none());
        assert_eq!(app.form.notes().text(), "");
    }

    #[test]
    fn test_enter_on_generate_button_sends_request() {
        let mut app = App::new();
        type_text(&mut app, "notes");
        app.form.focus = FormField::Generate;
        match press(&mut app, KeyCode::Enter) {
            Action::Send(ApiRequest::Generate { params, .. }) => {
                assert_eq!(params.notes, "notes");
                assert_eq!(params.num_questions, 5);
            }
            other => panic!("expected generation, got {:?}", other),
        }
        assert!(app.is_loading());
    }

    #[test]
    fn test_keys_ignored_while_loading() {
        let mut app = App::new();
        type_text(&mut app, "notes");
        press_ctrl(&mut app, 'g');
        press(&mut app, KeyCode::Char('z'));
        assert_eq!(app.form.notes().text(), "notes");
    }

    #[test]
    fn test_selector_keys_cycle_values() {
        let mut app = App::new();
        type_text(&mut app, "notes");
        app.form.focus = FormField::Questions;
        press(&mut app, KeyCode::Right);
        assert_eq!(app.form.num_questions(), 10);
        press(&mut app, KeyCode::Left);
        press(&mut app, KeyCode::Left);
        assert_eq!(app.form.num_questions(), 30);
    }

    #[test]
    fn test_language_popup_search_and_select() {
        let mut app = App::new();
        type_text(&mut app, "notes");
        app.form.focus = FormField::Language;
        press(&mut app, KeyCode::Enter);
        assert!(app.form.language_selector.is_open());

        type_text(&mut app, "span");
        press(&mut app, KeyCode::Enter);
        assert!(!app.form.language_selector.is_open());
        assert_eq!(app.form.language, "Spanish");
    }

    #[test]
    fn test_files_field_rejects_missing_path() {
        let mut app = App::new();
        app.form.focus = FormField::Files;
        type_text(&mut app, "/definitely/not/here.pdf");
        assert!(matches!(press(&mut app, KeyCode::Enter), Action::None));
        assert!(app.form.upload_message().is_some());
        assert!(!app.form.is_uploading());
    }

    #[test]
    fn test_escape_on_form_asks_before_quitting() {
        let mut app = App::new();
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.overlay, Some(Overlay::QuitConfirm));
        press(&mut app, KeyCode::Char('n'));
        assert!(app.overlay.is_none());
        assert!(!app.should_quit);

        press(&mut app, KeyCode::Esc);
        assert!(matches!(press(&mut app, KeyCode::Char('y')), Action::Quit));
        assert!(app.should_quit);
    }

    #[test]
    fn test_ctrl_c_quits_anywhere() {
        let mut app = app_on_quiz();
        assert!(matches!(press_ctrl(&mut app, 'c'), Action::Quit));
        assert!(app.should_quit);
    }

    #[test]
    fn test_quiz_letter_keys_select_options() {
        let mut app = app_on_quiz();
        assert_eq!(app.screen, Screen::Quiz);

        press(&mut app, KeyCode::Char('b'));
        assert_eq!(app.quiz().answer(0), Some("4"));

        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Char('A'));
        assert_eq!(app.quiz().answer(1), Some("6"));

        press(&mut app, KeyCode::Char('z'));
        assert_eq!(app.quiz().answer(1), Some("6"));
    }

    #[test]
    fn test_quiz_submit_and_export() {
        let mut app = app_on_quiz();
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Enter);
        press_ctrl(&mut app, 's');

        assert_eq!(app.quiz().score(), Some(1));
        assert!(matches!(press_ctrl(&mut app, 'p'), Action::ExportPdf));
    }

    #[test]
    fn test_escape_returns_to_form_and_ctrl_q_comes_back() {
        let mut app = app_on_quiz();
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.screen, Screen::Form);
        press_ctrl(&mut app, 'q');
        assert_eq!(app.screen, Screen::Quiz);
    }
}
