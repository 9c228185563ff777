//! Output file naming

/// Used when nothing printable is left of the requested stem
const FALLBACK_STEM: &str = "purchase_order";

/// Make a PO number safe to use as a file stem
///
/// Path separators, characters reserved on Windows and control characters
/// become `_`; leading/trailing dots and spaces are trimmed.
pub fn sanitize_file_stem(stem: &str) -> String {
    let replaced: String = stem
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    let trimmed = replaced.trim_matches(|c: char| c == '.' || c.is_whitespace());
    if trimmed.is_empty() {
        FALLBACK_STEM.to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_po_number_is_kept() {
        assert_eq!(sanitize_file_stem("MSIC-PO-A065-08-2025"), "MSIC-PO-A065-08-2025");
    }

    #[test]
    fn test_separators_replaced() {
        assert_eq!(sanitize_file_stem("PO/2025\\08:1"), "PO_2025_08_1");
        assert_eq!(sanitize_file_stem("a\tb"), "a_b");
    }

    #[test]
    fn test_dots_trimmed() {
        assert_eq!(sanitize_file_stem(" ..PO-1.. "), "PO-1");
        assert_eq!(sanitize_file_stem(".."), FALLBACK_STEM);
        assert_eq!(sanitize_file_stem(""), FALLBACK_STEM);
    }
}
