use crate::quiz::{QuizSnapshot, QuizSummary};
use crate::ui::key_style;
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

pub(crate) fn summary_lines(summary: &QuizSummary) -> Vec<Line<'static>> {
    let row = |label: &'static str, value: String, color: Color| {
        Line::from(vec![
            Span::from(format!("{:<16}", label)),
            Span::styled(value, key_style(color)),
        ])
    };

    vec![
        row("Total Questions:", summary.total.to_string(), Color::White),
        row("Attempted:", summary.attempted.to_string(), Color::Cyan),
        row("Not Attempted:", summary.not_attempted.to_string(), Color::Yellow),
        row("Correct:", summary.correct.to_string(), Color::Green),
        row("Incorrect:", summary.incorrect.to_string(), Color::Red),
        row("Final Score:", summary.final_score(), Color::Cyan),
    ]
}

/// Score box shown under the questions once the quiz is submitted.
pub fn draw_summary(f: &mut Frame, quiz: &QuizSnapshot, area: Rect) {
    let Some(summary) = quiz.summary() else {
        return;
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title("Quiz Summary")
        .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
    let paragraph = Paragraph::new(summary_lines(&summary))
        .alignment(Alignment::Left)
        .block(block);
    f.render_widget(paragraph, area);
}
