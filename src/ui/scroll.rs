use ratatui::text::Line;

/// Scroll math for the transcript view.
///
/// Mirrors ratatui's `Wrap { trim: true }` behavior closely enough to keep
/// the bottom of the conversation in view after every render.
pub struct ScrollCalculator;

impl ScrollCalculator {
    /// Calculate how many wrapped lines the given lines will take.
    pub fn calculate_wrapped_line_count(lines: &[Line], terminal_width: u16) -> u16 {
        let mut total_wrapped_lines = 0u16;

        for line in lines {
            let line_text = line
                .spans
                .iter()
                .map(|s| s.content.as_ref())
                .collect::<String>();
            let trimmed_text = line_text.trim();

            if trimmed_text.is_empty() || terminal_width == 0 {
                total_wrapped_lines = total_wrapped_lines.saturating_add(1);
            } else {
                let wrapped = Self::calculate_word_wrapped_lines(trimmed_text, terminal_width);
                total_wrapped_lines = total_wrapped_lines.saturating_add(wrapped);
            }
        }

        total_wrapped_lines
    }

    /// How many lines a single text string wraps to at the given width.
    fn calculate_word_wrapped_lines(text: &str, terminal_width: u16) -> u16 {
        let mut current_line_len = 0;
        let mut line_count = 1u16;

        for word in text.split_whitespace() {
            let word_len = word.chars().count();

            if current_line_len > 0 && current_line_len + 1 + word_len > terminal_width as usize {
                line_count = line_count.saturating_add(1);
                current_line_len = word_len;
            } else {
                if current_line_len > 0 {
                    current_line_len += 1; // Add space
                }
                current_line_len += word_len;
            }
        }

        line_count
    }

    /// Scroll offset that shows the bottom of the transcript.
    pub fn scroll_to_bottom(lines: &[Line], terminal_width: u16, available_height: u16) -> u16 {
        let total = Self::calculate_wrapped_line_count(lines, terminal_width);
        total.saturating_sub(available_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_lines_count_once() {
        let lines = vec![Line::from("hello"), Line::from("")];
        assert_eq!(ScrollCalculator::calculate_wrapped_line_count(&lines, 80), 2);
    }

    #[test]
    fn long_lines_wrap_by_words() {
        let lines = vec![Line::from("alpha beta gamma delta")];
        assert_eq!(ScrollCalculator::calculate_wrapped_line_count(&lines, 11), 2);
    }

    #[test]
    fn bottom_offset_is_zero_when_everything_fits() {
        let lines = vec![Line::from("one"), Line::from("two")];
        assert_eq!(ScrollCalculator::scroll_to_bottom(&lines, 80, 10), 0);
    }
}
