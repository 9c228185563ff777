//! Standard-14 Helvetica metrics and WinAnsi encoding
//!
//! Viewers ship these faces, so nothing is embedded; only the advance widths
//! are needed here for alignment and wrapping.

use lopdf::Dictionary;

/// A built-in (non-embedded) PDF font
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StandardFont {
    Helvetica,
    HelveticaBold,
}

/// Advance widths (1/1000 em) for WinAnsi 0x20..=0x7E.
#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    278, 278, 584, 584, 584, 556, 1015,
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    278, 278, 278, 469, 556, 333,
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,
    334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    333, 333, 584, 584, 584, 611, 975,
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    333, 278, 333, 584, 556, 333,
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889,
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500,
    389, 280, 389, 584,
];

/// Width used for characters outside the ASCII table
const DEFAULT_WIDTH: u16 = 556;

impl StandardFont {
    /// PostScript name written as `/BaseFont`
    pub fn base_font(self) -> &'static str {
        match self {
            StandardFont::Helvetica => "Helvetica",
            StandardFont::HelveticaBold => "Helvetica-Bold",
        }
    }

    /// Advance width of a character in 1/1000 em
    pub fn char_width(self, c: char) -> u16 {
        let table = match self {
            StandardFont::Helvetica => &HELVETICA_WIDTHS,
            StandardFont::HelveticaBold => &HELVETICA_BOLD_WIDTHS,
        };
        match encode_char(c) {
            code @ 0x20..=0x7E => table[(code - 0x20) as usize],
            0x91 | 0x92 => 278,
            0x93 | 0x94 => 500,
            0x95 => 350,
            0x85 | 0x97 => 1000,
            0xA0 => 278,
            _ => DEFAULT_WIDTH,
        }
    }

    /// Encode text as a hex string of WinAnsi codes for the Tj operator
    pub fn encode_text_hex(self, text: &str) -> String {
        let mut result = String::with_capacity(text.len() * 2 + 2);
        result.push('<');
        for c in text.chars() {
            result.push_str(&format!("{:02X}", encode_char(c)));
        }
        result.push('>');
        result
    }

    /// Font dictionary for the page resources
    pub fn to_pdf_dictionary(self) -> Dictionary {
        Dictionary::from_iter(vec![
            ("Type", "Font".into()),
            ("Subtype", "Type1".into()),
            ("BaseFont", self.base_font().into()),
            ("Encoding", "WinAnsiEncoding".into()),
        ])
    }
}

/// Map a character to its WinAnsiEncoding code; unmappable characters become `?`.
fn encode_char(c: char) -> u8 {
    let code = c as u32;
    match code {
        0x20..=0x7E | 0xA0..=0xFF => code as u8,
        _ => match c {
            '€' => 0x80,
            '‚' => 0x82,
            'ƒ' => 0x83,
            '„' => 0x84,
            '…' => 0x85,
            '†' => 0x86,
            '‡' => 0x87,
            'ˆ' => 0x88,
            '‰' => 0x89,
            'Š' => 0x8A,
            '‹' => 0x8B,
            'Œ' => 0x8C,
            'Ž' => 0x8E,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            '˜' => 0x98,
            '™' => 0x99,
            'š' => 0x9A,
            '›' => 0x9B,
            'œ' => 0x9C,
            'ž' => 0x9E,
            'Ÿ' => 0x9F,
            '\t' => b' ',
            _ => b'?',
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_ascii_widths() {
        assert_eq!(StandardFont::Helvetica.char_width(' '), 278);
        assert_eq!(StandardFont::Helvetica.char_width('A'), 667);
        assert_eq!(StandardFont::Helvetica.char_width('i'), 222);
        assert_eq!(StandardFont::Helvetica.char_width('~'), 584);
        assert_eq!(StandardFont::HelveticaBold.char_width('A'), 722);
        assert_eq!(StandardFont::HelveticaBold.char_width('i'), 278);
    }

    #[test]
    fn test_digits_are_tabular() {
        for c in '0'..='9' {
            assert_eq!(StandardFont::Helvetica.char_width(c), 556);
            assert_eq!(StandardFont::HelveticaBold.char_width(c), 556);
        }
    }

    #[test]
    fn test_encode_text_hex() {
        assert_eq!(StandardFont::Helvetica.encode_text_hex("PO"), "<504F>");
        assert_eq!(StandardFont::Helvetica.encode_text_hex(""), "<>");
        assert_eq!(StandardFont::Helvetica.encode_text_hex("é"), "<E9>");
        assert_eq!(StandardFont::Helvetica.encode_text_hex("€"), "<80>");
        assert_eq!(StandardFont::Helvetica.encode_text_hex("ก"), "<3F>");
    }

    #[test]
    fn test_dictionary() {
        let dict = StandardFont::HelveticaBold.to_pdf_dictionary();
        assert_eq!(dict.get(b"BaseFont").unwrap().as_name().unwrap(), b"Helvetica-Bold");
        assert_eq!(dict.get(b"Subtype").unwrap().as_name().unwrap(), b"Type1");
    }
}
