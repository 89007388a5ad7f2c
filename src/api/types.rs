use crate::models::{GenerateParams, Question};
use serde::{Deserialize, Serialize};

/// Body of `POST /generate-quiz`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub notes: String,
    pub difficulty: String,
    pub model: String,
    pub num_questions: u32,
    pub language: String,
}

impl From<&GenerateParams> for GenerateRequest {
    fn from(params: &GenerateParams) -> Self {
        Self {
            notes: params.notes.clone(),
            difficulty: params.difficulty.as_str().to_string(),
            model: params.model.to_string(),
            num_questions: params.num_questions,
            language: params.language.clone(),
        }
    }
}

/// Either `{quiz: [...]}` or `{error: "..."}`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub quiz: Option<Vec<Question>>,
    #[serde(default)]
    pub error: Option<String>,
}

impl GenerateResponse {
    /// Server-reported error, ignoring an empty string.
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref().filter(|e| !e.is_empty())
    }

    pub fn into_questions(self) -> Vec<Question> {
        self.quiz.unwrap_or_default()
    }
}

/// Body returned by `POST /extract-notes`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ExtractResponse {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub warning: Option<String>,
}

impl ExtractResponse {
    /// Extracted text, or `None` when the service found nothing readable.
    pub fn extracted_text(&self) -> Option<&str> {
        self.text.as_deref().filter(|t| !t.trim().is_empty())
    }

    pub fn warning_message(&self) -> Option<&str> {
        self.warning.as_deref().filter(|w| !w.trim().is_empty())
    }
}
