use crate::language_selector::{LanguageSelector, NO_MATCHES_LABEL};
use crate::ui::layout::centered_rect;
use crate::ui::{help_line, key_style};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
};

pub fn draw_language_popup(f: &mut Frame, selector: &LanguageSelector, current: &str) {
    let area = centered_rect(50, 70, f.area());
    f.render_widget(Clear, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(3),
        ])
        .split(area);

    let search = Paragraph::new(Line::from(vec![
        Span::styled("Search: ", key_style(Color::Cyan)),
        Span::from(selector.search().to_string()),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title("Language")
            .border_style(Style::default().fg(Color::Cyan)),
    );
    f.render_widget(search, chunks[0]);
    f.set_cursor_position((
        chunks[0].x + 9 + selector.search().chars().count() as u16,
        chunks[0].y + 1,
    ));

    let languages = selector.filtered();
    let block = Block::default().borders(Borders::ALL);

    if languages.is_empty() {
        let empty = Paragraph::new(Span::styled(
            NO_MATCHES_LABEL,
            Style::default().fg(Color::DarkGray),
        ))
        .block(block);
        f.render_widget(empty, chunks[1]);
    } else {
        let items: Vec<ListItem> = languages
            .iter()
            .map(|lang| {
                let style = if *lang == current {
                    Style::default().fg(Color::Green)
                } else {
                    Style::default()
                };
                ListItem::new(*lang).style(style)
            })
            .collect();
        let list = List::new(items).block(block).highlight_style(
            Style::default()
                .bg(Color::Cyan)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        );
        let mut state = ListState::default();
        state.select(Some(selector.highlighted()));
        f.render_stateful_widget(list, chunks[1], &mut state);
    }

    let help = Paragraph::new(help_line(&[
        ("↑/↓", "Navigate"),
        ("Enter", "Select"),
        ("Esc", "Close"),
    ]))
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[2]);
}
