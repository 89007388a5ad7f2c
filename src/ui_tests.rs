#[cfg(test)]
mod ui_integration_tests {
    use crate::api::{ExtractResponse, GenerateResponse};
    use crate::app::App;
    use crate::models::{ApiRequest, Overlay, Question, UploadFile};
    use crate::notes_input::FormField;
    use crate::ui;
    use ratatui::{Terminal, backend::TestBackend, buffer::Buffer};
    use std::path::PathBuf;

    fn render(app: &App, width: u16, height: u16) -> String {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| ui::draw(f, app)).unwrap();
        buffer_text(terminal.backend().buffer())
    }

    fn buffer_text(buffer: &Buffer) -> String {
        let mut out = String::new();
        for row in buffer.content.chunks(buffer.area.width as usize) {
            for cell in row {
                out.push_str(cell.symbol());
            }
            out.push('\n');
        }
        out
    }

    fn quiz_app(submit: bool) -> App {
        let mut app = App::new();
        app.form.set_notes("Arithmetic basics");
        let request_id = match app.request_generation() {
            Some(ApiRequest::Generate { request_id, .. }) => request_id,
            other => panic!("expected generation, got {:?}", other),
        };
        app.handle_generation(
            request_id,
            Ok(GenerateResponse {
                quiz: Some(vec![
                    Question {
                        text: "What is 2+2?".to_string(),
                        options: vec!["a. 3".to_string(), "b. 4".to_string(), "  ".to_string()],
                        correct_answer: "b. 4".to_string(),
                        explanation: Some("Adding two and two gives four.".to_string()),
                    },
                    Question {
                        text: "What is 3+3?".to_string(),
                        options: vec!["6".to_string(), "9".to_string()],
                        correct_answer: "6".to_string(),
                        explanation: None,
                    },
                ]),
                error: None,
            }),
        );
        app.choose_option(1);
        if submit {
            app.submit_quiz();
        }
        app
    }

    #[test]
    fn test_form_shows_fields_and_defaults() {
        let app = App::new();
        let screen = render(&app, 110, 40);

        assert!(screen.contains("Notes Quiz Generator"));
        assert!(screen.contains("Paste or type your notes here"));
        assert!(screen.contains("Files (separate paths with ;)"));
        assert!(screen.contains("Difficulty"));
        assert!(screen.contains("Easy"));
        assert!(screen.contains("Questions"));
        assert!(screen.contains("English"));
        assert!(screen.contains("[ Generate Quiz ]"));
        assert!(screen.contains("Ctrl+G"));
        assert!(!screen.contains("Ctrl+Q"));
        assert!(!screen.contains("Ctrl+X"));
    }

    #[test]
    fn test_clear_files_hint_only_with_uploaded_files() {
        let mut app = App::new();
        app.form.set_notes("Typed notes");
        assert!(!render(&app, 110, 40).contains("Ctrl+X"));

        let mut app = App::new();
        app.form.finish_upload(
            vec![UploadFile {
                path: PathBuf::from("slides.pptx"),
                name: "slides.pptx".to_string(),
                size: 10,
            }],
            Ok(ExtractResponse {
                text: Some("Slide text".to_string()),
                warning: None,
            }),
        );
        let screen = render(&app, 110, 40);
        assert!(screen.contains("Loaded: slides.pptx"));
        assert!(screen.contains("Ctrl+X"));
        assert!(screen.contains("Clear Files"));
    }

    #[test]
    fn test_form_shows_typed_notes() {
        let mut app = App::new();
        app.form.set_notes("Mitochondria are the powerhouse of the cell");
        let screen = render(&app, 110, 40);

        assert!(screen.contains("Mitochondria are the powerhouse"));
        assert!(!screen.contains("Paste or type your notes here"));
    }

    #[test]
    fn test_upload_error_is_shown_under_files() {
        let mut app = App::new();
        app.form.focus = FormField::Files;
        for c in "/no/such/file.pdf".chars() {
            app.form.paths.insert(c);
        }
        assert!(app.request_upload().is_none());

        let screen = render(&app, 110, 40);
        assert!(screen.contains("\"file.pdf\" was not found"));
    }

    #[test]
    fn test_language_popup_lists_matches() {
        let mut app = App::new();
        app.form.set_notes("notes");
        app.form.toggle_language_selector();
        for c in "fren".chars() {
            app.form.language_selector.push_search(c);
        }
        let screen = render(&app, 110, 40);

        assert!(screen.contains("Search: fren"));
        assert!(screen.contains("French"));
        assert!(!screen.contains("German"));
    }

    #[test]
    fn test_language_popup_empty_result() {
        let mut app = App::new();
        app.form.set_notes("notes");
        app.form.toggle_language_selector();
        for c in "zzzz".chars() {
            app.form.language_selector.push_search(c);
        }
        let screen = render(&app, 110, 40);

        assert!(screen.contains("No languages found"));
    }

    #[test]
    fn test_loading_overlay() {
        let mut app = App::new();
        app.form.set_notes("notes");
        app.request_generation();
        let screen = render(&app, 110, 40);

        assert!(screen.contains("Generating your quiz..."));
    }

    #[test]
    fn test_alert_overlay() {
        let mut app = App::new();
        app.request_generation();
        let screen = render(&app, 110, 40);

        assert!(screen.contains("Please paste some notes"));
        assert!(screen.contains("Press any key to continue"));
    }

    #[test]
    fn test_quit_confirmation_overlay() {
        let mut app = App::new();
        app.overlay = Some(Overlay::QuitConfirm);
        let screen = render(&app, 110, 40);

        assert!(screen.contains("Quit the quiz generator?"));
    }

    #[test]
    fn test_quiz_relabels_options() {
        let app = quiz_app(false);
        let screen = render(&app, 110, 40);

        assert!(screen.contains("1. What is 2+2?"));
        assert!(screen.contains("A) 3"));
        assert!(screen.contains("(•) B) 4"));
        assert!(!screen.contains("C)"));
        assert!(screen.contains("2. What is 3+3?"));
        assert!(screen.contains("1 / 2 answered"));
        assert!(screen.contains("Ctrl+S"));
        assert!(!screen.contains("Quiz Summary"));
    }

    #[test]
    fn test_submitted_quiz_shows_feedback_and_summary() {
        let app = quiz_app(true);
        let screen = render(&app, 110, 44);

        assert!(screen.contains("(✓) B) 4"));
        assert!(screen.contains("Correct!"));
        assert!(screen.contains("Adding two and two gives four."));
        assert!(screen.contains("Your answer: b. 4"));
        assert!(screen.contains("Correct answer: b. 4"));
        assert!(screen.contains("Your answer: Not attempted"));
        assert!(screen.contains("Quiz Summary"));
        assert!(screen.contains("Total Questions:2"));
        assert!(screen.contains("Not Attempted:  1"));
        assert!(screen.contains("Final Score:    1 / 2"));
        assert!(!screen.contains("Ctrl+S"));
    }

    #[test]
    fn test_small_terminal_does_not_panic() {
        let app = quiz_app(true);
        render(&app, 20, 8);
        let mut form = App::new();
        form.alert("Something went wrong");
        render(&form, 20, 8);
    }
}
