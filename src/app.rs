use crate::api::GenerateResponse;
use crate::display::render_quiz;
use crate::error::ApiError;
use crate::export::DocumentExporter;
use crate::models::{ApiRequest, ApiResponse, Overlay, Screen};
use crate::notes_input::NotesInput;
use crate::quiz::QuizSnapshot;
use std::path::{Path, PathBuf};

pub const EMPTY_QUIZ_MESSAGE: &str = "Quiz generation returned empty results. Please try again with different notes or a different model.";

/// Which question and option the keyboard cursor is on in the quiz screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuizCursor {
    pub question: usize,
    pub option: usize,
}

/// Top-level state. Owns the form, the quiz snapshot and the request
/// bookkeeping; the terminal loop feeds it events and worker responses.
#[derive(Debug)]
pub struct App {
    pub screen: Screen,
    pub overlay: Option<Overlay>,
    pub form: NotesInput,
    quiz: QuizSnapshot,
    loading: bool,
    pub cursor: QuizCursor,
    pub status: Option<String>,
    next_request_id: u64,
    latest_generation: Option<u64>,
    latest_upload: Option<u64>,
    pub should_quit: bool,
}

impl Default for App {
    fn default() -> Self {
        Self {
            screen: Screen::Form,
            overlay: None,
            form: NotesInput::new(),
            quiz: QuizSnapshot::default(),
            loading: false,
            cursor: QuizCursor::default(),
            status: None,
            next_request_id: 1,
            latest_generation: None,
            latest_upload: None,
            should_quit: false,
        }
    }
}

/// Alert text for a server-reported generation error.
pub fn generation_error_message(error: &str) -> String {
    if error.contains("API limit") || error.contains("exceeds") {
        format!(
            "{}\n\nPlease select a different model from the dropdown and try again.",
            error
        )
    } else {
        format!("Failed to generate quiz: {}", error)
    }
}

pub fn connectivity_error_message(error: &ApiError) -> String {
    format!(
        "Failed to generate quiz: {}\n\nPlease check your connection and try again.",
        error
    )
}

impl App {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn quiz(&self) -> &QuizSnapshot {
        &self.quiz
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn alert(&mut self, message: impl Into<String>) {
        self.overlay = Some(Overlay::Alert(message.into()));
    }

    pub fn dismiss_overlay(&mut self) {
        self.overlay = None;
    }

    fn allocate_request_id(&mut self) -> u64 {
        let id = self.next_request_id;
        self.next_request_id += 1;
        id
    }

    /// Validates the form and starts a generation. Blank notes raise an
    /// alert and produce no request.
    pub fn request_generation(&mut self) -> Option<ApiRequest> {
        let params = match self.form.submit() {
            Ok(params) => params,
            Err(e) => {
                self.alert(e.to_string());
                return None;
            }
        };

        self.quiz = QuizSnapshot::default();
        self.cursor = QuizCursor::default();
        self.status = None;
        self.loading = true;

        let request_id = self.allocate_request_id();
        self.latest_generation = Some(request_id);
        log::info!(
            "Generation #{} requested ({} {} x{} in {})",
            request_id,
            params.model,
            params.difficulty.as_str(),
            params.num_questions,
            params.language
        );
        Some(ApiRequest::Generate { request_id, params })
    }

    pub fn request_upload(&mut self) -> Option<ApiRequest> {
        let files = self.form.begin_upload().ok()?;
        let request_id = self.allocate_request_id();
        self.latest_upload = Some(request_id);
        Some(ApiRequest::Extract { request_id, files })
    }

    pub fn handle_response(&mut self, response: ApiResponse) {
        match response {
            ApiResponse::Generated {
                request_id,
                outcome,
            } => self.handle_generation(request_id, outcome),
            ApiResponse::Extracted {
                request_id,
                files,
                outcome,
            } => {
                if self.latest_upload != Some(request_id) {
                    log::info!("Discarding stale extraction #{}", request_id);
                    return;
                }
                self.latest_upload = None;
                self.form.finish_upload(files, outcome);
            }
        }
    }

    pub fn handle_generation(
        &mut self,
        request_id: u64,
        outcome: Result<GenerateResponse, ApiError>,
    ) {
        if self.latest_generation != Some(request_id) {
            log::info!("Discarding stale generation #{}", request_id);
            return;
        }
        self.latest_generation = None;
        self.loading = false;

        match outcome {
            Ok(response) => {
                if let Some(error) = response.error_message() {
                    log::warn!("Generation #{} reported: {}", request_id, error);
                    self.alert(generation_error_message(error));
                    self.quiz = QuizSnapshot::default();
                    return;
                }
                let questions = response.into_questions();
                log::info!(
                    "Generation #{} returned {} question(s)",
                    request_id,
                    questions.len()
                );
                self.quiz = QuizSnapshot::new(questions);
                self.cursor = QuizCursor::default();
                if self.quiz.is_empty() {
                    self.alert(EMPTY_QUIZ_MESSAGE);
                } else {
                    self.screen = Screen::Quiz;
                }
            }
            Err(e) => {
                log::warn!("Generation #{} failed: {}", request_id, e);
                self.alert(connectivity_error_message(&e));
                self.quiz = QuizSnapshot::default();
            }
        }
    }

    pub fn select_answer(&mut self, question: usize, option: &str) {
        self.quiz = self.quiz.with_answer(question, option);
    }

    pub fn submit_quiz(&mut self) {
        if self.quiz.is_empty() || self.quiz.is_submitted() {
            return;
        }
        self.quiz = self.quiz.submitted();
        if let Some(score) = self.quiz.score() {
            log::info!("Quiz submitted: {} / {}", score, self.quiz.len());
        }
    }

    /// Exports the rendered questions. Problems are logged and otherwise ignored.
    pub fn export_pdf(&mut self, exporter: &dyn DocumentExporter, path: &Path) -> Option<PathBuf> {
        if self.quiz.is_empty() {
            return None;
        }
        match exporter.export(&render_quiz(&self.quiz), path) {
            Ok(()) => {
                self.status = Some(format!("Saved {}", path.display()));
                Some(path.to_path_buf())
            }
            Err(e) => {
                log::warn!("PDF export failed: {}", e);
                None
            }
        }
    }

    pub fn show_quiz(&mut self) {
        if !self.quiz.is_empty() {
            self.screen = Screen::Quiz;
        }
    }

    pub fn show_form(&mut self) {
        self.screen = Screen::Form;
    }

    fn displayed_option_count(&self, question: usize) -> usize {
        self.quiz
            .questions()
            .get(question)
            .map(|q| q.options.iter().filter(|o| !o.trim().is_empty()).count())
            .unwrap_or(0)
    }

    pub fn next_question(&mut self) {
        if self.cursor.question + 1 < self.quiz.len() {
            self.cursor.question += 1;
            self.cursor.option = 0;
        }
    }

    pub fn previous_question(&mut self) {
        if self.cursor.question > 0 {
            self.cursor.question -= 1;
            self.cursor.option = 0;
        }
    }

    pub fn next_option(&mut self) {
        if self.cursor.option + 1 < self.displayed_option_count(self.cursor.question) {
            self.cursor.option += 1;
        }
    }

    pub fn previous_option(&mut self) {
        self.cursor.option = self.cursor.option.saturating_sub(1);
    }

    /// Chooses the `slot`-th displayed option (blanks skipped) of the current question.
    pub fn choose_option(&mut self, slot: usize) {
        let question = self.cursor.question;
        let raw = self.quiz.questions().get(question).and_then(|q| {
            q.options
                .iter()
                .filter(|o| !o.trim().is_empty())
                .nth(slot)
                .cloned()
        });
        if let Some(raw) = raw {
            if !self.quiz.is_submitted() {
                self.cursor.option = slot;
            }
            self.select_answer(question, &raw);
        }
    }

    pub fn choose_highlighted(&mut self) {
        self.choose_option(self.cursor.option);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ExtractResponse;
    use crate::display::RenderedQuestion;
    use crate::error::ExportError;
    use crate::models::{Question, UploadFile};
    use std::cell::RefCell;

    fn two_plus_two() -> GenerateResponse {
        GenerateResponse {
            quiz: Some(vec![Question {
                text: "2+2?".to_string(),
                options: vec!["3".to_string(), "4".to_string()],
                correct_answer: "4".to_string(),
                explanation: None,
            }]),
            error: None,
        }
    }

    fn start_generation(app: &mut App) -> u64 {
        match app.request_generation() {
            Some(ApiRequest::Generate { request_id, .. }) => request_id,
            other => panic!("expected generation request, got {:?}", other),
        }
    }

    fn app_with_notes() -> App {
        let mut app = App::new();
        app.form.set_notes("Basic arithmetic");
        app
    }

    #[test]
    fn test_blank_notes_send_nothing() {
        let mut app = App::new();
        assert!(app.request_generation().is_none());
        assert!(!app.is_loading());
        assert_eq!(
            app.overlay,
            Some(Overlay::Alert(
                "Please paste some notes or upload a readable document!".to_string()
            ))
        );
    }

    #[test]
    fn test_generation_resets_state_and_sets_loading() {
        let mut app = app_with_notes();
        let first = start_generation(&mut app);
        app.handle_generation(first, Ok(two_plus_two()));
        app.select_answer(0, "4");
        app.submit_quiz();

        let second = start_generation(&mut app);
        assert!(second > first);
        assert!(app.is_loading());
        assert!(app.quiz().is_empty());
        assert!(app.quiz().answers().is_empty());
        assert!(!app.quiz().is_submitted());
    }

    #[test]
    fn test_quota_error_scenario() {
        let mut app = app_with_notes();
        let id = start_generation(&mut app);
        app.handle_generation(
            id,
            Ok(GenerateResponse {
                quiz: None,
                error: Some("Free tier API limit exceeded".to_string()),
            }),
        );

        assert!(!app.is_loading());
        assert!(app.quiz().is_empty());
        assert_eq!(app.screen, Screen::Form);
        match &app.overlay {
            Some(Overlay::Alert(msg)) => {
                assert!(msg.starts_with("Free tier API limit exceeded"));
                assert!(msg.contains("select a different model"));
            }
            other => panic!("expected alert, got {:?}", other),
        }
    }

    #[test]
    fn test_generic_server_error() {
        assert_eq!(
            generation_error_message("model overloaded"),
            "Failed to generate quiz: model overloaded"
        );
        assert!(generation_error_message("API limit for model 'x' exceeds.").contains("dropdown"));
    }

    #[test]
    fn test_transport_failure_clears_loading() {
        let mut app = app_with_notes();
        let id = start_generation(&mut app);
        let err = serde_json::from_str::<GenerateResponse>("<html>").unwrap_err();
        app.handle_generation(id, Err(ApiError::Decode(err)));

        assert!(!app.is_loading());
        assert!(app.quiz().is_empty());
        match &app.overlay {
            Some(Overlay::Alert(msg)) => assert!(msg.contains("check your connection")),
            other => panic!("expected alert, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_quiz_warns() {
        let mut app = app_with_notes();
        let id = start_generation(&mut app);
        app.handle_generation(id, Ok(GenerateResponse::default()));

        assert!(!app.is_loading());
        assert_eq!(app.overlay, Some(Overlay::Alert(EMPTY_QUIZ_MESSAGE.to_string())));
        assert_eq!(app.screen, Screen::Form);
    }

    #[test]
    fn test_full_quiz_scenario() {
        let mut app = app_with_notes();
        let id = start_generation(&mut app);
        app.handle_generation(id, Ok(two_plus_two()));
        assert_eq!(app.screen, Screen::Quiz);
        assert!(app.overlay.is_none());

        app.next_option();
        app.choose_highlighted();
        app.submit_quiz();

        let summary = app.quiz().summary().unwrap();
        assert_eq!(summary.final_score(), "1 / 1");
        assert_eq!(summary.correct, 1);
        assert_eq!(summary.incorrect, 0);
        assert_eq!(summary.not_attempted, 0);
    }

    #[test]
    fn test_stale_generation_is_discarded() {
        let mut app = app_with_notes();
        let stale = start_generation(&mut app);
        let fresh = start_generation(&mut app);

        app.handle_generation(stale, Ok(two_plus_two()));
        assert!(app.is_loading(), "stale response must not end the newer request");
        assert!(app.quiz().is_empty());

        app.handle_generation(fresh, Ok(GenerateResponse::default()));
        assert!(!app.is_loading());
        assert!(app.quiz().is_empty());
    }

    #[test]
    fn test_stale_upload_is_discarded() {
        let mut app = App::new();
        app.latest_upload = Some(5);
        app.handle_response(ApiResponse::Extracted {
            request_id: 4,
            files: vec![UploadFile {
                path: PathBuf::from("old.txt"),
                name: "old.txt".to_string(),
                size: 1,
            }],
            outcome: Ok(ExtractResponse {
                text: Some("old".to_string()),
                warning: None,
            }),
        });
        assert!(app.form.effective_notes().is_none());

        app.handle_response(ApiResponse::Extracted {
            request_id: 5,
            files: Vec::new(),
            outcome: Ok(ExtractResponse {
                text: Some("fresh".to_string()),
                warning: None,
            }),
        });
        assert_eq!(app.form.effective_notes(), Some("fresh"));
    }

    #[test]
    fn test_choose_option_skips_blank_slots() {
        let mut app = app_with_notes();
        let id = start_generation(&mut app);
        app.handle_generation(
            id,
            Ok(GenerateResponse {
                quiz: Some(vec![Question {
                    text: "Capital?".to_string(),
                    options: vec!["B) Paris".to_string(), "".to_string(), "A) London".to_string()],
                    correct_answer: "B) Paris".to_string(),
                    explanation: None,
                }]),
                error: None,
            }),
        );

        app.choose_option(1);
        assert_eq!(app.quiz().answer(0), Some("A) London"));
        app.choose_option(2);
        assert_eq!(app.quiz().answer(0), Some("A) London"));

        app.next_option();
        app.next_option();
        assert_eq!(app.cursor.option, 1);
    }

    #[test]
    fn test_selection_ignored_after_submit() {
        let mut app = app_with_notes();
        let id = start_generation(&mut app);
        app.handle_generation(id, Ok(two_plus_two()));
        app.choose_option(0);
        app.submit_quiz();
        app.choose_option(1);

        assert_eq!(app.quiz().answer(0), Some("3"));
        assert_eq!(app.quiz().score(), Some(0));
    }

    struct RecordingExporter {
        calls: RefCell<usize>,
        fail: bool,
    }

    impl DocumentExporter for RecordingExporter {
        fn export(&self, questions: &[RenderedQuestion], _path: &Path) -> Result<(), ExportError> {
            *self.calls.borrow_mut() += 1;
            assert!(!questions.is_empty());
            if self.fail {
                Err(ExportError::EmptyQuiz)
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn test_export_skips_empty_quiz() {
        let mut app = App::new();
        let exporter = RecordingExporter {
            calls: RefCell::new(0),
            fail: false,
        };
        assert!(app.export_pdf(&exporter, Path::new("quiz.pdf")).is_none());
        assert_eq!(*exporter.calls.borrow(), 0);
    }

    #[test]
    fn test_export_failure_is_silent() {
        let mut app = app_with_notes();
        let id = start_generation(&mut app);
        app.handle_generation(id, Ok(two_plus_two()));

        let exporter = RecordingExporter {
            calls: RefCell::new(0),
            fail: true,
        };
        assert!(app.export_pdf(&exporter, Path::new("quiz.pdf")).is_none());
        assert_eq!(*exporter.calls.borrow(), 1);
        assert!(app.overlay.is_none());
        assert!(app.status.is_none());
    }
}
