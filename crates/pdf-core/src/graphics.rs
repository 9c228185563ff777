//! Vector drawing operators (rules and rectangles)

use crate::text::fmt_num;

/// Generate operators for a straight stroked line.
///
/// Coordinates are PDF coordinates (origin bottom-left).
pub fn generate_line_operators(x1: f64, y1: f64, x2: f64, y2: f64, line_width: f64) -> Vec<u8> {
    format!(
        "q\n{} w\n{} {} m\n{} {} l\nS\nQ\n",
        fmt_num(line_width),
        fmt_num(x1),
        fmt_num(y1),
        fmt_num(x2),
        fmt_num(y2)
    )
    .into_bytes()
}

/// Generate operators for a stroked rectangle outline.
///
/// `(x, y)` is the bottom-left corner in PDF coordinates.
pub fn generate_rect_operators(x: f64, y: f64, width: f64, height: f64, line_width: f64) -> Vec<u8> {
    format!(
        "q\n{} w\n{} {} {} {} re\nS\nQ\n",
        fmt_num(line_width),
        fmt_num(x),
        fmt_num(y),
        fmt_num(width),
        fmt_num(height)
    )
    .into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_line_operators() {
        let ops = String::from_utf8(generate_line_operators(40.0, 762.0, 555.0, 762.0, 1.0)).unwrap();
        assert_eq!(ops, "q\n1 w\n40 762 m\n555 762 l\nS\nQ\n");
    }

    #[test]
    fn test_thin_line_operators() {
        let ops = String::from_utf8(generate_line_operators(130.0, 710.0, 287.5, 710.0, 0.3)).unwrap();
        assert!(ops.contains("0.3 w"));
        assert!(ops.contains("287.5 710 l"));
    }

    #[test]
    fn test_rect_operators() {
        let ops = String::from_utf8(generate_rect_operators(40.0, 100.0, 490.0, 36.0, 0.5)).unwrap();
        assert_eq!(ops, "q\n0.5 w\n40 100 490 36 re\nS\nQ\n");
    }
}
