use crate::app::App;
use crate::display::{OptionMark, RenderedQuestion, render_quiz};
use crate::ui::layout::calculate_quiz_chunks;
use crate::ui::{help_line, key_style, summary::draw_summary};
use crate::utils::wrap_text;
use ratatui::{
    Frame,
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph},
};

pub fn option_style(mark: OptionMark) -> Style {
    match mark {
        OptionMark::None => Style::default(),
        OptionMark::Selected => Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        OptionMark::Correct => Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        OptionMark::Incorrect => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        OptionMark::HighlightCorrect => Style::default().fg(Color::Green),
    }
}

fn mark_symbol(mark: OptionMark) -> &'static str {
    match mark {
        OptionMark::None => "( )",
        OptionMark::Selected => "(•)",
        OptionMark::Correct => "(✓)",
        OptionMark::Incorrect => "(✗)",
        OptionMark::HighlightCorrect => " ✓ ",
    }
}

/// Lines for one question. Text is pre-wrapped to `width` so line counts are
/// exact for scrolling.
fn question_lines(
    question: &RenderedQuestion,
    focused: bool,
    cursor_option: Option<usize>,
    width: usize,
) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    let title_style = if focused {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };

    let heading = format!("{}. {}", question.number, question.text);
    for line in wrap_text(&heading, width) {
        lines.push(Line::styled(line, title_style));
    }

    for (i, (option, mark)) in question.options.iter().enumerate() {
        let pointer = if cursor_option == Some(i) { "›" } else { " " };
        let prefix = format!("{} {} ", pointer, mark_symbol(*mark));
        let indent = " ".repeat(prefix.chars().count());
        let body_width = width.saturating_sub(indent.len()).max(1);
        for (j, line) in wrap_text(&option.labelled(), body_width).into_iter().enumerate() {
            let lead = if j == 0 { prefix.clone() } else { indent.clone() };
            lines.push(Line::from(vec![
                Span::from(lead),
                Span::styled(line, option_style(*mark)),
            ]));
        }
    }

    if let Some(feedback) = &question.feedback {
        let verdict = if feedback.is_correct {
            Span::styled("Correct!", key_style(Color::Green))
        } else {
            Span::styled("Incorrect", key_style(Color::Red))
        };
        lines.push(Line::from(vec![Span::from("  "), verdict]));

        lines.push(Line::from(vec![
            Span::styled("  Your answer: ", key_style(Color::Yellow)),
            Span::from(feedback.selected_label().to_string()),
        ]));
        lines.push(Line::from(vec![
            Span::styled("  Correct answer: ", key_style(Color::Green)),
            Span::from(feedback.correct.clone()),
        ]));
        if let Some(explanation) = &feedback.explanation {
            lines.push(Line::styled("  Explanation:", key_style(Color::Cyan)));
            for line in wrap_text(explanation, width.saturating_sub(4).max(1)) {
                lines.push(Line::from(format!("    {}", line)));
            }
        }
    }

    lines.push(Line::from(""));
    lines
}

pub fn draw_quiz(f: &mut Frame, app: &App) {
    let quiz = app.quiz();
    let layout = calculate_quiz_chunks(f.area(), quiz.is_submitted());

    let status = if quiz.is_submitted() {
        "Submitted".to_string()
    } else {
        format!("{} / {} answered", quiz.answers().len(), quiz.len())
    };
    let header = Paragraph::new(format!(
        "Quiz - Question {} / {} - {}",
        (app.cursor.question + 1).min(quiz.len()),
        quiz.len(),
        status
    ))
    .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, layout.header_area);

    let width = layout.questions_area.width.saturating_sub(2) as usize;
    let visible_height = layout.questions_area.height.saturating_sub(2) as usize;
    let mut text = Text::default();
    let mut focused_range = (0, 0);

    for (i, question) in render_quiz(quiz).iter().enumerate() {
        let focused = i == app.cursor.question;
        let cursor_option = (focused && !quiz.is_submitted()).then_some(app.cursor.option);
        let lines = question_lines(question, focused, cursor_option, width);
        if focused {
            focused_range = (text.lines.len(), text.lines.len() + lines.len());
        }
        text.extend(lines);
    }

    // Keep the whole focused question visible when it fits, else its heading.
    let (start, end) = focused_range;
    let scroll = if end <= visible_height {
        0
    } else if end - start > visible_height {
        start
    } else {
        end - visible_height
    };

    let questions = Paragraph::new(text)
        .scroll((scroll as u16, 0))
        .block(Block::default().borders(Borders::ALL).title("Questions"));
    f.render_widget(questions, layout.questions_area);

    if quiz.is_submitted() {
        draw_summary(f, quiz, layout.summary_area);
    }

    let mut help = vec![help_line(&[
        ("↑/↓", "Question"),
        ("←/→", "Option"),
        ("Enter/Space/a-z", "Select"),
        ("Esc", "Back to Notes"),
    ])];
    let mut ctrl = Vec::new();
    if !quiz.is_submitted() {
        ctrl.push(("Ctrl+S", "Submit Quiz"));
    }
    ctrl.push(("Ctrl+P", "Export PDF"));
    ctrl.push(("Ctrl+C", "Exit App"));
    help.push(help_line(&ctrl));
    if let Some(status) = &app.status {
        help.push(Line::styled(status.clone(), Style::default().fg(Color::Green)));
    }
    let help = Paragraph::new(help)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, layout.help_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::render_question;
    use crate::models::Question;

    fn sample() -> Question {
        Question {
            text: "2+2?".to_string(),
            options: vec!["A) 3".to_string(), "B) 4".to_string()],
            correct_answer: "B) 4".to_string(),
            explanation: Some("Two plus two".to_string()),
        }
    }

    fn plain(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_question_lines_before_submit() {
        let rendered = render_question(0, &sample(), Some("A) 3"), false);
        let lines = question_lines(&rendered, true, Some(1), 40);
        let texts: Vec<String> = lines.iter().map(plain).collect();

        assert_eq!(texts[0], "1. 2+2?");
        assert_eq!(texts[1], "  (•) A) 3");
        assert_eq!(texts[2], "› ( ) B) 4");
        assert_eq!(texts.len(), 4);
    }

    #[test]
    fn test_question_lines_after_submit_show_feedback() {
        let rendered = render_question(0, &sample(), Some("A) 3"), true);
        let lines = question_lines(&rendered, false, None, 40);
        let texts: Vec<String> = lines.iter().map(plain).collect();

        assert_eq!(texts[1], "  (✗) A) 3");
        assert_eq!(texts[2], "   ✓  B) 4");
        assert!(texts.contains(&"  Incorrect".to_string()));
        assert!(texts.contains(&"  Your answer: A) 3".to_string()));
        assert!(texts.contains(&"  Correct answer: B) 4".to_string()));
        assert!(texts.contains(&"    Two plus two".to_string()));
    }

    #[test]
    fn test_unanswered_feedback_says_not_attempted() {
        let rendered = render_question(0, &sample(), None, true);
        let texts: Vec<String> = question_lines(&rendered, false, None, 40)
            .iter()
            .map(plain)
            .collect();
        assert!(texts.contains(&"  Your answer: Not attempted".to_string()));
    }

    #[test]
    fn test_option_styles() {
        assert_eq!(option_style(OptionMark::Correct).fg, Some(Color::Green));
        assert_eq!(option_style(OptionMark::Incorrect).fg, Some(Color::Red));
        assert!(
            !option_style(OptionMark::HighlightCorrect)
                .add_modifier
                .contains(Modifier::BOLD)
        );
    }
}
