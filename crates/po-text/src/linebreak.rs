//! Line breaking for bounded text regions

/// Break `text` into lines no wider than `max_width`
///
/// Explicit `\n` always starts a new line. Words are separated on whitespace
/// and packed greedily; a single word wider than the region is split between
/// characters. `measure` returns the rendered width of a string in the same
/// unit as `max_width`.
///
/// Empty input yields no lines.
pub fn wrap_to_width<F>(text: &str, max_width: f64, measure: F) -> Vec<String>
where
    F: Fn(&str) -> f64,
{
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut current = String::new();

        for word in paragraph.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{current} {word}")
            };

            if measure(&candidate) <= max_width {
                current = candidate;
                continue;
            }

            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }

            if measure(word) <= max_width {
                current = word.to_string();
            } else {
                let mut pieces = split_long_word(word, max_width, &measure);
                // Last piece stays open so the next word can follow it
                current = pieces.pop().unwrap_or_default();
                lines.extend(pieces);
            }
        }

        if !current.is_empty() {
            lines.push(current);
        }
    }

    lines
}

/// Split a word between characters; every piece holds at least one character
fn split_long_word<F>(word: &str, max_width: f64, measure: &F) -> Vec<String>
where
    F: Fn(&str) -> f64,
{
    let mut pieces = Vec::new();
    let mut current = String::new();

    for c in word.chars() {
        current.push(c);
        if measure(&current) > max_width && current.chars().count() > 1 {
            current.pop();
            pieces.push(std::mem::take(&mut current));
            current.push(c);
        }
    }

    if !current.is_empty() {
        pieces.push(current);
    }

    pieces
}

/// Collapse `text` onto one line
///
/// Line breaks, tabs and other control characters become spaces so the
/// string can be drawn as a single text run.
pub fn flatten_line(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}
