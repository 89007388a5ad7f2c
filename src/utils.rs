use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Greedy word wrap by display width. Explicit newlines are kept and words
/// wider than the line are split.
pub fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    let max_width = max_width.max(1);
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut current = String::new();
        let mut width = 0;

        for word in paragraph.split_whitespace() {
            let word_width = UnicodeWidthStr::width(word);
            if width > 0 && width + 1 + word_width > max_width {
                lines.push(std::mem::take(&mut current));
                width = 0;
            }

            if word_width > max_width {
                for ch in word.chars() {
                    let ch_width = ch.width().unwrap_or(1);
                    if width + ch_width > max_width && width > 0 {
                        lines.push(std::mem::take(&mut current));
                        width = 0;
                    }
                    current.push(ch);
                    width += ch_width;
                }
                continue;
            }

            if width > 0 {
                current.push(' ');
                width += 1;
            }
            current.push_str(word);
            width += word_width;
        }
        lines.push(current);
    }

    lines
}

/// Simulate how text wraps with trimming (matching ratatui Wrap { trim: true } behavior).
/// Returns (line_text, start_char, end_char) for each visual line.
fn simulate_wrapped_lines(text: &str, max_width: usize) -> Vec<(String, usize, usize)> {
    let mut lines = Vec::new();
    let mut current_line = String::new();
    let mut current_width = 0;
    let mut line_start = 0;
    let mut char_count = 0;

    for (idx, ch) in text.chars().enumerate() {
        char_count = idx + 1;
        if ch == '\n' {
            lines.push((current_line.trim_end().to_string(), line_start, idx));
            current_line = String::new();
            current_width = 0;
            line_start = idx + 1;
        } else {
            let ch_width = ch.width().unwrap_or(1);
            if current_width + ch_width > max_width && current_width > 0 {
                lines.push((current_line.trim_end().to_string(), line_start, idx));
                current_line = ch.to_string();
                current_width = ch_width;
                line_start = idx;
            } else {
                current_line.push(ch);
                current_width += ch_width;
            }
        }
    }

    if !current_line.is_empty() || text.ends_with('\n') {
        lines.push((current_line.trim_end().to_string(), line_start, char_count));
    }

    lines
}

/// Line and column of a character cursor inside wrapped text.
pub fn calculate_wrapped_cursor_position(
    text: &str,
    cursor_index: usize,
    max_width: usize,
) -> (usize, usize) {
    if text.is_empty() || cursor_index == 0 {
        return (0, 0);
    }

    let wrapped_lines = simulate_wrapped_lines(text, max_width);

    for (line_idx, (_, start, end)) in wrapped_lines.iter().enumerate() {
        if cursor_index >= *start && cursor_index <= *end {
            return (line_idx, cursor_index - start);
        }
    }

    if let Some((last_text, _, last_end)) = wrapped_lines.last()
        && cursor_index >= *last_end
    {
        return (wrapped_lines.len() - 1, last_text.chars().count());
    }

    (0, 0)
}
