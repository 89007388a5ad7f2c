pub mod client;
pub mod types;

// Public API exports
pub use client::{HttpQuizService, QuizService};
pub use types::{ExtractResponse, GenerateRequest, GenerateResponse};
