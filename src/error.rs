use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failures talking to the quiz service.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Transport(#[from] reqwest::Error),
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("could not read \"{name}\": {source}")]
    FileRead {
        name: String,
        #[source]
        source: io::Error,
    },
}

/// Client-side rejection of an upload batch. Nothing is sent when one of these is raised.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UploadError {
    #[error("Clear the typed notes before uploading files.")]
    TypedNotesPresent,
    #[error("An upload is already in progress.")]
    InProgress,
    #[error("Enter one or more file paths separated by ';'.")]
    NoFiles,
    #[error("File \"{name}\" was not found or cannot be read.")]
    Missing { name: String },
    #[error("File \"{name}\" is not supported. Use PDF, DOC, DOCX, PPT, PPTX, TXT, PNG, JPG or JPEG.")]
    Unsupported { name: String },
    #[error(
        "You have uploaded file \"{name}\" more than 50 MB, so please upload a file less than 50 MB to proceed further."
    )]
    TooLarge { name: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("Please paste some notes or upload a readable document!")]
    BlankNotes,
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("nothing to export")]
    EmptyQuiz,
    #[error("pdf error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error(transparent)]
    Font(#[from] FontError),
    #[error("no PDF font can draw {0:?}; set QUIZ_PDF_FONTS to a TrueType font that covers it")]
    MissingGlyphs(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

#[derive(Debug, Error)]
pub enum FontError {
    #[error("could not read font {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("font \"{name}\" could not be parsed: {reason}")]
    Parse { name: String, reason: String },
    #[error("font \"{name}\" is not supported: {reason}")]
    Unsupported { name: String, reason: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("QUIZ_API_URL is not a valid URL ({value}): {reason}")]
    InvalidUrl { value: String, reason: String },
}
