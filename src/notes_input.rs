use crate::api::ExtractResponse;
use crate::error::{ApiError, FormError, UploadError};
use crate::language_selector::LanguageSelector;
use crate::models::{
    ACCEPTED_EXTENSIONS, DEFAULT_LANGUAGE, Difficulty, GenerateParams, MAX_UPLOAD_BYTES, MODELS,
    QUESTION_COUNTS, UploadFile,
};
use crate::text_input::TextInput;
use std::path::{Path, PathBuf};

pub const UNREADABLE_UPLOAD_MESSAGE: &str =
    "Unable to read text from the uploaded files. Please try another file.";
pub const UPLOAD_FAILED_MESSAGE: &str = "Failed to upload files. Please try again.";

/// Text extracted from uploaded files. `text` is `None` when the service
/// returned nothing readable; the files are kept so they can be cleared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedNotes {
    pub files: Vec<UploadFile>,
    pub text: Option<String>,
}

/// Where the quiz notes come from. Typed text lives in the notes editor and
/// is non-blank exactly when the source is `Typed`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum NoteSource {
    #[default]
    Empty,
    Typed,
    Uploaded(UploadedNotes),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormField {
    #[default]
    Notes,
    Files,
    Difficulty,
    Model,
    Questions,
    Language,
    Generate,
}

impl FormField {
    const ORDER: [FormField; 7] = [
        FormField::Notes,
        FormField::Files,
        FormField::Difficulty,
        FormField::Model,
        FormField::Questions,
        FormField::Language,
        FormField::Generate,
    ];

    fn position(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ORDER[(self.position() + 1) % Self::ORDER.len()]
    }

    pub fn previous(self) -> Self {
        let len = Self::ORDER.len();
        Self::ORDER[(self.position() + len - 1) % len]
    }
}

#[derive(Debug)]
pub struct NotesInput {
    notes: TextInput,
    source: NoteSource,
    pub paths: TextInput,
    pub difficulty: Difficulty,
    model_index: usize,
    count_index: usize,
    pub language: String,
    pub language_selector: LanguageSelector,
    uploading: bool,
    upload_message: Option<String>,
    pub focus: FormField,
}

impl Default for NotesInput {
    fn default() -> Self {
        Self {
            notes: TextInput::new(),
            source: NoteSource::Empty,
            paths: TextInput::new(),
            difficulty: Difficulty::default(),
            model_index: 0,
            count_index: 0,
            language: DEFAULT_LANGUAGE.to_string(),
            language_selector: LanguageSelector::new(),
            uploading: false,
            upload_message: None,
            focus: FormField::default(),
        }
    }
}

impl NotesInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn source(&self) -> &NoteSource {
        &self.source
    }

    pub fn notes(&self) -> &TextInput {
        &self.notes
    }

    pub fn model(&self) -> &'static str {
        MODELS[self.model_index].id
    }

    pub fn model_label(&self) -> &'static str {
        MODELS[self.model_index].label
    }

    pub fn num_questions(&self) -> u32 {
        QUESTION_COUNTS[self.count_index]
    }

    pub fn is_uploading(&self) -> bool {
        self.uploading
    }

    pub fn upload_message(&self) -> Option<&str> {
        self.upload_message.as_deref()
    }

    pub fn uploaded_files(&self) -> &[UploadFile] {
        match &self.source {
            NoteSource::Uploaded(uploaded) => &uploaded.files,
            _ => &[],
        }
    }

    pub fn effective_notes(&self) -> Option<&str> {
        let notes = match &self.source {
            NoteSource::Empty => None,
            NoteSource::Typed => Some(self.notes.text()),
            NoteSource::Uploaded(uploaded) => uploaded.text.as_deref(),
        };
        notes.filter(|n| !n.trim().is_empty())
    }

    /// Difficulty, model, count, language and the generate button are only
    /// usable once there is something to build a quiz from.
    pub fn controls_enabled(&self) -> bool {
        self.effective_notes().is_some()
    }

    pub fn notes_editable(&self) -> bool {
        !matches!(self.source, NoteSource::Uploaded(_))
    }

    pub fn upload_enabled(&self) -> bool {
        !matches!(self.source, NoteSource::Typed) && !self.uploading
    }

    fn edit_notes<F>(&mut self, edit: F)
    where
        F: FnOnce(&mut TextInput),
    {
        if !self.notes_editable() {
            return;
        }
        edit(&mut self.notes);
        self.on_notes_changed();
    }

    fn on_notes_changed(&mut self) {
        if self.notes.is_blank() {
            self.source = NoteSource::Empty;
        } else {
            if matches!(self.source, NoteSource::Uploaded(_)) {
                self.upload_message = None;
            }
            self.source = NoteSource::Typed;
        }
    }

    pub fn type_char(&mut self, c: char) {
        self.edit_notes(|notes| notes.insert(c));
    }

    pub fn backspace(&mut self) {
        self.edit_notes(TextInput::backspace);
    }

    pub fn move_cursor_left(&mut self) {
        self.notes.move_left();
    }

    pub fn move_cursor_right(&mut self) {
        self.notes.move_right();
    }

    /// Replaces the whole notes field, as a paste would.
    pub fn set_notes(&mut self, text: &str) {
        self.edit_notes(|notes| notes.set(text));
    }

    pub fn has_uploaded_files(&self) -> bool {
        matches!(self.source, NoteSource::Uploaded(_))
    }

    /// Drops uploaded files and their text. Typed notes are left alone.
    pub fn clear_files(&mut self) {
        if !self.has_uploaded_files() {
            return;
        }
        self.source = NoteSource::Empty;
        self.notes.clear();
        self.paths.clear();
        self.upload_message = None;
    }

    pub fn cycle_difficulty(&mut self, forward: bool) {
        if !self.controls_enabled() {
            return;
        }
        let all = Difficulty::ALL;
        let current = all.iter().position(|d| *d == self.difficulty).unwrap_or(0);
        self.difficulty = all[step(current, all.len(), forward)];
    }

    pub fn cycle_model(&mut self, forward: bool) {
        if !self.controls_enabled() {
            return;
        }
        self.model_index = step(self.model_index, MODELS.len(), forward);
    }

    pub fn cycle_question_count(&mut self, forward: bool) {
        if !self.controls_enabled() {
            return;
        }
        self.count_index = step(self.count_index, QUESTION_COUNTS.len(), forward);
    }

    pub fn toggle_language_selector(&mut self) {
        let disabled = !self.controls_enabled();
        self.language_selector.toggle(disabled);
    }

    pub fn select_highlighted_language(&mut self) {
        let disabled = !self.controls_enabled();
        let language = &mut self.language;
        self.language_selector
            .select_highlighted(disabled, |lang| *language = lang.to_string());
    }

    /// Validates the entered paths and marks the form as uploading.
    /// On rejection the message is kept for display and nothing is sent.
    pub fn begin_upload(&mut self) -> Result<Vec<UploadFile>, UploadError> {
        let result = if matches!(self.source, NoteSource::Typed) {
            Err(UploadError::TypedNotesPresent)
        } else if self.uploading {
            Err(UploadError::InProgress)
        } else {
            validate_upload(&parse_paths(self.paths.text()))
        };

        match &result {
            Ok(files) => {
                log::info!("Uploading {} file(s)", files.len());
                self.uploading = true;
                self.upload_message = None;
            }
            Err(e) => {
                log::warn!("Upload rejected: {}", e);
                self.upload_message = Some(e.to_string());
            }
        }
        result
    }

    pub fn finish_upload(
        &mut self,
        files: Vec<UploadFile>,
        outcome: Result<ExtractResponse, ApiError>,
    ) {
        self.uploading = false;
        match outcome {
            Ok(response) => {
                if let Some(text) = response.extracted_text() {
                    self.source = NoteSource::Uploaded(UploadedNotes {
                        files,
                        text: Some(text.to_string()),
                    });
                    self.upload_message = None;
                } else {
                    let warning = response
                        .warning_message()
                        .unwrap_or(UNREADABLE_UPLOAD_MESSAGE)
                        .to_string();
                    self.source = NoteSource::Uploaded(UploadedNotes { files, text: None });
                    self.upload_message = Some(warning);
                }
                self.notes.clear();
                self.paths.clear();
            }
            Err(e) => {
                log::warn!("Upload failed: {}", e);
                self.upload_message = Some(UPLOAD_FAILED_MESSAGE.to_string());
            }
        }
    }

    pub fn submit(&self) -> Result<GenerateParams, FormError> {
        let notes = self.effective_notes().ok_or(FormError::BlankNotes)?;
        Ok(GenerateParams {
            notes: notes.to_string(),
            difficulty: self.difficulty,
            model: self.model(),
            num_questions: self.num_questions(),
            language: self.language.clone(),
        })
    }
}

fn step(current: usize, len: usize, forward: bool) -> usize {
    if forward {
        (current + 1) % len
    } else {
        (current + len - 1) % len
    }
}

pub fn parse_paths(input: &str) -> Vec<PathBuf> {
    input
        .split(';')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(PathBuf::from)
        .collect()
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}

pub fn is_accepted_extension(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| ACCEPTED_EXTENSIONS.contains(&ext.as_str()))
}

/// Checks every file in order; the first bad one rejects the whole batch.
pub fn validate_upload(paths: &[PathBuf]) -> Result<Vec<UploadFile>, UploadError> {
    if paths.is_empty() {
        return Err(UploadError::NoFiles);
    }

    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        let name = file_name(path);
        let metadata = match std::fs::metadata(path) {
            Ok(m) if m.is_file() => m,
            _ => return Err(UploadError::Missing { name }),
        };
        if !is_accepted_extension(path) {
            return Err(UploadError::Unsupported { name });
        }
        if metadata.len() > MAX_UPLOAD_BYTES {
            return Err(UploadError::TooLarge { name });
        }
        files.push(UploadFile {
            path: path.clone(),
            name,
            size: metadata.len(),
        });
    }
    Ok(files)
}
