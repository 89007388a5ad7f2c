mod dialogs;
mod form;
mod language;
pub mod layout;
mod quiz;
mod summary;

use crate::app::App;
use crate::models::{Overlay, Screen};
use ratatui::{
    Frame,
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

pub use dialogs::{draw_alert, draw_loading, draw_quit_confirmation};
pub use form::draw_form;
pub use language::draw_language_popup;
pub use layout::{calculate_form_chunks, calculate_quiz_chunks, centered_rect};
pub use quiz::{draw_quiz, option_style};
pub use summary::draw_summary;

pub(crate) fn key_style(color: Color) -> Style {
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

/// One help bar row: highlighted key followed by its label.
pub(crate) fn help_line(entries: &[(&'static str, &'static str)]) -> Line<'static> {
    let mut spans = Vec::with_capacity(entries.len() * 2);
    for (i, (key, label)) in entries.iter().enumerate() {
        spans.push(Span::styled(*key, key_style(Color::Cyan)));
        if i + 1 < entries.len() {
            spans.push(Span::from(format!(" {}  ", label)));
        } else {
            spans.push(Span::from(format!(" {}", label)));
        }
    }
    Line::from(spans)
}

/// Draws the current screen and whatever overlay sits on top of it.
pub fn draw(f: &mut Frame, app: &App) {
    match app.screen {
        Screen::Form => draw_form(f, app),
        Screen::Quiz => draw_quiz(f, app),
    }

    if app.is_loading() {
        draw_loading(f);
    }

    match &app.overlay {
        Some(Overlay::Alert(message)) => draw_alert(f, message),
        Some(Overlay::QuitConfirm) => draw_quit_confirmation(f),
        None => {}
    }
}
