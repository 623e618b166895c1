//! Display formatting shared by the layout engine and surfaces

/// Format a fraction as a percentage with `decimals` places (-0.1461 -> "-14.61%")
#[must_use]
pub fn format_percentage(value: f64, decimals: usize) -> String {
    format!("{:.*}%", decimals, value * 100.0)
}

/// Format a plain ratio with two decimals (-0.8 -> "-0.80")
#[must_use]
pub fn format_ratio(value: f64) -> String {
    format!("{value:.2}")
}

/// Left-justify every cell to `width` and join with single spaces.
///
/// Trailing padding is trimmed so rows compare cleanly in tests.
#[must_use]
pub fn format_row(cells: &[&str], width: usize) -> String {
    cells
        .iter()
        .map(|cell| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join(" ")
        .trim_end()
        .to_string()
}

/// Greedy word wrap of one note into bullet lines.
///
/// The first line starts with `bullet`, continuation lines are indented to
/// line up under the first word.
#[must_use]
pub fn wrap_note(text: &str, bullet: &str, width: usize) -> Vec<String> {
    let indent = " ".repeat(bullet.chars().count());
    let mut lines = Vec::new();
    let mut current = bullet.to_string();
    let mut current_len = current.chars().count();
    let mut line_has_word = false;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        if line_has_word && current_len + 1 + word_len > width {
            lines.push(std::mem::replace(&mut current, indent.clone()));
            current_len = indent.chars().count();
            line_has_word = false;
        }
        if line_has_word {
            current.push(' ');
            current_len += 1;
        }
        current.push_str(word);
        current_len += word_len;
        line_has_word = true;
    }

    if line_has_word {
        lines.push(current);
    }
    lines
}
