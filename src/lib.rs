pub mod api;
pub mod api_worker;
pub mod app;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod input;
pub mod language_selector;
pub mod languages;
pub mod logger;
pub mod models;
pub mod notes_input;
pub mod quiz;
pub mod text_input;
pub mod ui;
pub mod utils;

#[cfg(test)]
mod ui_tests;

// Re-exports for convenience
pub use api::{HttpQuizService, QuizService};
pub use api_worker::spawn_api_worker;
pub use app::App;
pub use config::Config;
pub use export::{DocumentExporter, FontSet, PageSetup, PdfExporter};
pub use input::{Action, handle_key};
pub use models::{ApiRequest, ApiResponse, Question};
pub use quiz::{QuizSnapshot, QuizSummary};
