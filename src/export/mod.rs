pub mod font;
pub mod pdf;

use crate::display::RenderedQuestion;
use crate::error::ExportError;
use std::path::Path;

pub use font::{FontFile, FontSet};
pub use pdf::{PageSetup, PdfExporter};

/// Writes the question, option and feedback region of a quiz to a document.
/// Buttons, help text and the score summary are never part of the output.
pub trait DocumentExporter {
    fn export(&self, questions: &[RenderedQuestion], path: &Path) -> Result<(), ExportError>;
}
