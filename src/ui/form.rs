use crate::app::App;
use crate::language_selector::display_label;
use crate::notes_input::{FormField, NoteSource, NotesInput};
use crate::ui::layout::calculate_form_chunks;
use crate::ui::{help_line, key_style};
use crate::utils::{calculate_wrapped_cursor_position, truncate_string};
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
};

const NOTES_PLACEHOLDER: &str = "[Paste or type your notes here...]";
const FILES_PLACEHOLDER: &str = "[path/to/notes.pdf; path/to/slides.pptx]";

fn field_block(title: &str, focused: bool, enabled: bool) -> Block<'_> {
    let border = if focused {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else if enabled {
        Style::default()
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(title)
}

fn value_style(enabled: bool) -> Style {
    if enabled {
        Style::default().fg(Color::White)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

pub fn draw_form(f: &mut Frame, app: &App) {
    let layout = calculate_form_chunks(f.area());
    let form = &app.form;

    let header = Paragraph::new("Notes Quiz Generator")
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, layout.header_area);

    draw_notes(f, form, layout.notes_area);
    draw_files(f, form, layout.files_area);

    let enabled = form.controls_enabled();
    let count = form.num_questions().to_string();
    let selectors = [
        (FormField::Difficulty, "Difficulty", form.difficulty.as_str()),
        (FormField::Model, "Model", form.model_label()),
        (FormField::Questions, "Questions", count.as_str()),
        (FormField::Language, "Language", display_label(&form.language)),
    ];
    for ((field, title, value), area) in selectors.into_iter().zip(layout.settings_areas) {
        let arrows = if field == FormField::Language { "▾" } else { "◂ ▸" };
        let width = area.width.saturating_sub(6) as usize;
        let content = Line::from(vec![
            Span::styled(truncate_string(value, width), value_style(enabled)),
            Span::from(" "),
            Span::styled(arrows, Style::default().fg(Color::DarkGray)),
        ]);
        let selector = Paragraph::new(content)
            .block(field_block(title, form.focus == field, enabled));
        f.render_widget(selector, area);
    }

    let button_style = if !enabled {
        Style::default().fg(Color::DarkGray)
    } else if form.focus == FormField::Generate {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Green)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    };
    let label = if app.is_loading() {
        "Generating..."
    } else {
        "[ Generate Quiz ]"
    };
    let generate = Paragraph::new(Span::styled(label, button_style))
        .alignment(Alignment::Center)
        .block(field_block("", form.focus == FormField::Generate, enabled));
    f.render_widget(generate, layout.generate_area);

    let mut help = vec![help_line(&[
        ("Tab", "Next Field"),
        ("Shift+Tab", "Previous"),
        ("←/→", "Change"),
        ("Enter", "Upload/Open/Generate"),
    ])];
    let mut ctrl = vec![("Ctrl+G", "Generate")];
    if form.has_uploaded_files() {
        ctrl.push(("Ctrl+X", "Clear Files"));
    }
    if !app.quiz().is_empty() {
        ctrl.push(("Ctrl+Q", "Back to Quiz"));
    }
    ctrl.push(("Esc/Ctrl+C", "Quit"));
    help.push(help_line(&ctrl));
    let help = Paragraph::new(help)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, layout.help_area);

    if form.language_selector.is_open() {
        super::language::draw_language_popup(f, &form.language_selector, &form.language);
    }
}

fn draw_notes(f: &mut Frame, form: &NotesInput, area: Rect) {
    let focused = form.focus == FormField::Notes;
    let editable = form.notes_editable();
    let inner_width = area.width.saturating_sub(2) as usize;
    let visible_height = area.height.saturating_sub(2) as usize;

    let (content, title) = match form.source() {
        NoteSource::Uploaded(uploaded) => {
            let text = match &uploaded.text {
                Some(text) => Text::styled(text.as_str(), Style::default().fg(Color::Gray)),
                None => Text::styled("[No readable text]", Style::default().fg(Color::DarkGray)),
            };
            (text, "Notes (from uploaded files, read-only)")
        }
        _ if form.notes().text().is_empty() => (
            Text::styled(NOTES_PLACEHOLDER, Style::default().fg(Color::DarkGray)),
            "Notes",
        ),
        _ => (Text::from(form.notes().text()), "Notes"),
    };

    let (cursor_line, cursor_col) = calculate_wrapped_cursor_position(
        form.notes().text(),
        form.notes().cursor(),
        inner_width,
    );
    let scroll = if editable && cursor_line >= visible_height {
        cursor_line + 1 - visible_height
    } else {
        0
    };

    let notes = Paragraph::new(content)
        .wrap(Wrap { trim: true })
        .scroll((scroll as u16, 0))
        .block(field_block(title, focused, editable));
    f.render_widget(notes, area);

    if focused && editable {
        let x = area.x + 1 + cursor_col as u16;
        let y = area.y + 1 + cursor_line.saturating_sub(scroll) as u16;
        f.set_cursor_position((x, y));
    }
}

fn draw_files(f: &mut Frame, form: &NotesInput, area: Rect) {
    let focused = form.focus == FormField::Files;
    let enabled = form.upload_enabled();
    let mut text = Text::default();

    if form.paths.text().is_empty() {
        text.push_line(Line::styled(
            FILES_PLACEHOLDER,
            Style::default().fg(Color::DarkGray),
        ));
    } else {
        text.push_line(Line::from(form.paths.text()));
    }

    let status = if form.is_uploading() {
        Line::styled("Uploading...", Style::default().fg(Color::Yellow))
    } else if let Some(message) = form.upload_message() {
        Line::styled(message, Style::default().fg(Color::Red))
    } else if !form.uploaded_files().is_empty() {
        let names: Vec<&str> = form
            .uploaded_files()
            .iter()
            .map(|file| file.name.as_str())
            .collect();
        Line::from(vec![
            Span::styled("Loaded: ", key_style(Color::Green)),
            Span::from(names.join(", ")),
        ])
    } else {
        Line::default()
    };
    text.push_line(status);

    let files = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .block(field_block("Files (separate paths with ;)", focused, enabled));
    f.render_widget(files, area);

    if focused && enabled {
        let x = area.x + 1 + form.paths.cursor().min(area.width.saturating_sub(3) as usize) as u16;
        f.set_cursor_position((x, area.y + 1));
    }
}
