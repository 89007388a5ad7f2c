use crate::ui::layout::centered_rect;
use crate::ui::key_style;
use crate::utils::wrap_text;
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

pub const LOADING_MESSAGE: &str = "Generating your quiz...";

/// Popup sized to its content, centered in the frame.
fn popup_area(frame: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(frame.width);
    let height = height.min(frame.height);
    Rect::new(
        frame.x + (frame.width - width) / 2,
        frame.y + (frame.height - height) / 2,
        width,
        height,
    )
}

pub fn draw_alert(f: &mut Frame, message: &str) {
    let outer = centered_rect(60, 100, f.area());
    let inner_width = outer.width.saturating_sub(4).max(1) as usize;

    let mut lines: Vec<Line> = Vec::new();
    for line in wrap_text(message, inner_width) {
        lines.push(Line::from(line));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Press any key to continue",
        Style::default().fg(Color::DarkGray),
    )));

    let area = popup_area(f.area(), outer.width, lines.len() as u16 + 2);
    f.render_widget(Clear, area);
    let alert = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Notice")
                .border_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
        );
    f.render_widget(alert, area);
}

pub fn draw_loading(f: &mut Frame) {
    let area = popup_area(f.area(), LOADING_MESSAGE.len() as u16 + 8, 3);
    f.render_widget(Clear, area);
    let loading = Paragraph::new(LOADING_MESSAGE)
        .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(loading, area);
}

pub fn draw_quit_confirmation(f: &mut Frame) {
    let area = popup_area(f.area(), 50, 5);
    f.render_widget(Clear, area);

    let lines = vec![
        Line::from("Quit the quiz generator?"),
        Line::from(vec![
            Span::styled("y", key_style(Color::Green)),
            Span::from(" Yes  "),
            Span::styled("n", key_style(Color::Red)),
            Span::from(" No  "),
            Span::styled("Ctrl+C", key_style(Color::Cyan)),
            Span::from(" Exit App"),
        ]),
    ];
    let confirm = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Quit")
                .border_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
        );
    f.render_widget(confirm, area);
}
