use crate::api::{ExtractResponse, GenerateResponse};
use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const MAX_UPLOAD_MB: u64 = 50;
pub const MAX_UPLOAD_BYTES: u64 = MAX_UPLOAD_MB * 1024 * 1024;
pub const ACCEPTED_EXTENSIONS: [&str; 9] =
    ["pdf", "doc", "docx", "ppt", "pptx", "txt", "png", "jpg", "jpeg"];
pub const QUESTION_COUNTS: [u32; 6] = [5, 10, 15, 20, 25, 30];
pub const DEFAULT_LANGUAGE: &str = "English";

/// One generated multiple-choice question, as returned by `/generate-quiz`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    #[serde(rename = "question")]
    pub text: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(rename = "answer", default)]
    pub correct_answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelChoice {
    pub id: &'static str,
    pub label: &'static str,
}

pub const MODELS: [ModelChoice; 9] = [
    ModelChoice {
        id: "gemini-flash-latest",
        label: "Gemini Flash Latest",
    },
    ModelChoice {
        id: "gemini-2.0-flash",
        label: "Gemini 2.0 Flash",
    },
    ModelChoice {
        id: "gemini-2.5-flash-lite-preview-09-2025",
        label: "Gemini 2.5 Flash-Lite Preview",
    },
    ModelChoice {
        id: "gemini-2.0-flash-lite",
        label: "Gemini 2.0 Flash-Lite",
    },
    ModelChoice {
        id: "gemini-flash-lite-latest",
        label: "Gemini Flash-Lite Latest",
    },
    ModelChoice {
        id: "gemini-2.5-pro",
        label: "Gemini 2.5 Pro",
    },
    ModelChoice {
        id: "gemini-2.5-flash-lite",
        label: "Gemini 2.5 Flash-Lite",
    },
    ModelChoice {
        id: "gemini-2.5-flash-preview-09-2025",
        label: "Gemini 2.5 Flash Preview",
    },
    ModelChoice {
        id: "gemini-2.5-flash",
        label: "Gemini 2.5 Flash",
    },
];

/// Everything the generation endpoint needs, captured when the form is submitted.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateParams {
    pub notes: String,
    pub difficulty: Difficulty,
    pub model: &'static str,
    pub num_questions: u32,
    pub language: String,
}

/// A file the user picked for extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub path: PathBuf,
    pub name: String,
    pub size: u64,
}

#[derive(Debug)]
pub enum ApiRequest {
    Generate {
        request_id: u64,
        params: GenerateParams,
    },
    Extract {
        request_id: u64,
        files: Vec<UploadFile>,
    },
}

#[derive(Debug)]
pub enum ApiResponse {
    Generated {
        request_id: u64,
        outcome: Result<GenerateResponse, ApiError>,
    },
    Extracted {
        request_id: u64,
        files: Vec<UploadFile>,
        outcome: Result<ExtractResponse, ApiError>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Form,
    Quiz,
}

/// Modal layered over the current screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Overlay {
    Alert(String),
    QuitConfirm,
}
