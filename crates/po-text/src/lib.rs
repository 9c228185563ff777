//! PO Text - text processing for purchase-order documents
//!
//! This crate provides:
//! - Money formatting with thousands separators (`#,##0.00`)
//! - Lenient decimal / quantity parsing for form input
//! - Long date formatting (`Sunday, August 10, 2025`)
//! - Width-measured word wrapping for bounded text regions
//! - File-stem sanitising for output names
//!
//! # Example
//!
//! ```
//! use po_text::{format_amount, parse_amount, wrap_to_width};
//!
//! let amount = parse_amount("1,250.5").unwrap();
//! assert_eq!(format_amount(amount), "1,250.50");
//!
//! let lines = wrap_to_width("one two three", 7.0, |s| s.chars().count() as f64);
//! assert_eq!(lines, vec!["one two", "three"]);
//! ```

mod filename;
mod formatter;
mod linebreak;

pub use filename::sanitize_file_stem;
pub use formatter::{
    format_amount, format_long_date, parse_amount, parse_iso_date, parse_quantity, render_amount,
};
pub use linebreak::{flatten_line, wrap_to_width};

use thiserror::Error;

/// Errors that can occur while parsing form text
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TextError {
    #[error("Invalid number: {0:?}")]
    InvalidNumber(String),

    #[error("Invalid date: {0:?}")]
    InvalidDate(String),
}

/// Result type for text operations
pub type Result<T> = std::result::Result<T, TextError>;

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(dec!(0)), "0.00");
        assert_eq!(format_amount(dec!(1234.5)), "1,234.50");
        assert_eq!(format_amount(dec!(1000000)), "1,000,000.00");
    }

    #[test]
    fn test_parse_amount_rejects_text() {
        assert!(matches!(parse_amount("abc"), Err(TextError::InvalidNumber(_))));
    }
}
