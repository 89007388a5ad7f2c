use ratatui::layout::{Constraint, Direction, Layout, Rect};

pub struct FormLayout {
    pub header_area: Rect,
    pub notes_area: Rect,
    pub files_area: Rect,
    // Difficulty, model, question count, language
    pub settings_areas: [Rect; 4],
    pub generate_area: Rect,
    pub help_area: Rect,
}

pub struct QuizLayout {
    pub header_area: Rect,
    pub questions_area: Rect,
    pub summary_area: Rect, // zero height until the quiz is submitted
    pub help_area: Rect,
}

pub const SUMMARY_HEIGHT: u16 = 8;

pub fn calculate_form_chunks(area: Rect) -> FormLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(6),
            Constraint::Length(4),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(4),
        ])
        .split(area);

    let settings = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(20),
            Constraint::Percentage(35),
            Constraint::Percentage(20),
            Constraint::Percentage(25),
        ])
        .split(chunks[3]);

    FormLayout {
        header_area: chunks[0],
        notes_area: chunks[1],
        files_area: chunks[2],
        settings_areas: [settings[0], settings[1], settings[2], settings[3]],
        generate_area: chunks[4],
        help_area: chunks[5],
    }
}

pub fn calculate_quiz_chunks(area: Rect, submitted: bool) -> QuizLayout {
    let summary_height = if submitted { SUMMARY_HEIGHT } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(summary_height),
            Constraint::Length(4),
        ])
        .split(area);

    QuizLayout {
        header_area: chunks[0],
        questions_area: chunks[1],
        summary_area: chunks[2],
        help_area: chunks[3],
    }
}

/// Rectangle of `percent_x` by `percent_y` centered in `area`.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_layout() {
        let area = Rect::new(0, 0, 100, 40);
        let layout = calculate_form_chunks(area);

        // Margin 1 leaves 38 rows; fixed rows take 17.
        assert_eq!(layout.header_area.height, 3);
        assert_eq!(layout.files_area.height, 4);
        assert_eq!(layout.generate_area.height, 3);
        assert_eq!(layout.help_area.height, 4);
        assert_eq!(layout.notes_area.height, 21);

        for settings in layout.settings_areas {
            assert_eq!(settings.height, 3);
            assert_eq!(settings.y, layout.files_area.y + 4);
        }
        let total: u16 = layout.settings_areas.iter().map(|a| a.width).sum();
        assert_eq!(total, 98);
    }

    #[test]
    fn test_quiz_layout_before_submission() {
        let layout = calculate_quiz_chunks(Rect::new(0, 0, 100, 40), false);

        assert_eq!(layout.header_area.height, 3);
        assert_eq!(layout.summary_area.height, 0);
        assert_eq!(layout.help_area.height, 4);
        assert_eq!(layout.questions_area.height, 31);
    }

    #[test]
    fn test_quiz_layout_after_submission() {
        let layout = calculate_quiz_chunks(Rect::new(0, 0, 100, 40), true);

        assert_eq!(layout.summary_area.height, SUMMARY_HEIGHT);
        assert_eq!(layout.questions_area.height, 31 - SUMMARY_HEIGHT);
    }

    #[test]
    fn test_centered_rect_is_inside_area() {
        let area = Rect::new(0, 0, 100, 50);
        let popup = centered_rect(60, 40, area);

        assert_eq!(popup.width, 60);
        assert_eq!(popup.height, 20);
        assert_eq!(popup.x, 20);
        assert_eq!(popup.y, 15);
    }
}
