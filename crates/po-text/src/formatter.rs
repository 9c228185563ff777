//! Money, quantity and date formatting

use crate::{Result, TextError};
use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// Pattern used for every amount on a purchase order
pub const AMOUNT_FORMAT: &str = "#,##0.00";

/// Format an amount with thousands separators and exactly two decimals
///
/// Rounds half away from zero, so `0.005` becomes `0.01`.
///
/// # Examples
/// ```
/// use po_text::format_amount;
/// use rust_decimal::Decimal;
///
/// assert_eq!(format_amount(Decimal::new(23000, 2)), "230.00");
/// assert_eq!(format_amount(Decimal::new(12345678, 1)), "1,234,567.80");
/// ```
pub fn format_amount(n: Decimal) -> String {
    render_amount(AMOUNT_FORMAT, n)
}

/// Render a decimal with a formatting pattern
///
/// Supports patterns like "#,###.##" for thousand separators and decimal places.
///
/// # Arguments
/// * `format` - Format pattern
/// * `n` - Number to format
pub fn render_amount(format: &str, n: Decimal) -> String {
    let (precision, thousand_sep, decimal_sep) = parse_format(format);

    let mut rounded = n.round_dp_with_strategy(precision, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(precision);

    let digits = rounded.abs().to_string();
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((int_part, frac_part)) => (int_part, frac_part),
        None => (digits.as_str(), ""),
    };

    let int_str = format_with_thousands(int_part, thousand_sep);

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };

    if precision > 0 {
        format!("{sign}{int_str}{decimal_sep}{frac_part}")
    } else {
        format!("{sign}{int_str}")
    }
}

/// Parse format pattern to extract precision and separators
fn parse_format(format: &str) -> (u32, &str, &str) {
    if format.is_empty() {
        return (2, ",", ".");
    }

    let decimal_pos = format.rfind('.');

    let precision = match decimal_pos {
        Some(pos) => format[pos + 1..]
            .chars()
            .filter(|c| *c == '#' || *c == '0')
            .count() as u32,
        None => 0,
    };

    let thousand_sep = if format.contains(',') { "," } else { "" };
    let decimal_sep = if precision > 0 { "." } else { "" };

    (precision, thousand_sep, decimal_sep)
}

/// Insert thousand separators into a run of ASCII digits
fn format_with_thousands(digits: &str, sep: &str) -> String {
    if sep.is_empty() {
        return digits.to_string();
    }

    let mut result = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            result.push_str(sep);
        }
        result.push(c);
    }

    result
}

/// Parse a decimal typed into a form field
///
/// Surrounding whitespace and thousands separators are ignored.
pub fn parse_amount(input: &str) -> Result<Decimal> {
    let cleaned: String = input.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return Err(TextError::InvalidNumber(input.to_string()));
    }

    Decimal::from_str(&cleaned).map_err(|_| TextError::InvalidNumber(input.to_string()))
}

/// Parse a whole-number quantity
///
/// Accepts `"3"`, `" 1,200 "` and `"2.0"`; rejects fractions and negatives.
pub fn parse_quantity(input: &str) -> Result<u32> {
    let value = parse_amount(input)?;
    if !value.fract().is_zero() || value.is_sign_negative() {
        return Err(TextError::InvalidNumber(input.to_string()));
    }

    let whole = value.trunc().to_string();
    whole
        .parse::<u32>()
        .map_err(|_| TextError::InvalidNumber(input.to_string()))
}

/// Format a date the way it is printed on the order (e.g. "Sunday, August 10, 2025")
pub fn format_long_date(date: NaiveDate) -> String {
    date.format("%A, %B %d, %Y").to_string()
}

/// Parse a `YYYY-MM-DD` date
pub fn parse_iso_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|_| TextError::InvalidDate(input.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_render_amount() {
        assert_eq!(render_amount("#,###.##", dec!(1234.56)), "1,234.56");
        assert_eq!(render_amount("#,###.##", dec!(1000000)), "1,000,000.00");
        assert_eq!(render_amount("#,###.##", dec!(-100.5)), "-100.50");
        assert_eq!(render_amount("#,###", dec!(1234.5)), "1,235");
        assert_eq!(render_amount("0.0", dec!(1234.56)), "1234.6");
    }

    #[test]
    fn test_rounding_half_away_from_zero() {
        assert_eq!(format_amount(dec!(0.005)), "0.01");
        assert_eq!(format_amount(dec!(2.345)), "2.35");
        assert_eq!(format_amount(dec!(-2.345)), "-2.35");
        assert_eq!(format_amount(dec!(-0.001)), "0.00");
    }

    #[test]
    fn test_format_with_thousands() {
        assert_eq!(format_with_thousands("1000", ","), "1,000");
        assert_eq!(format_with_thousands("1000000", ","), "1,000,000");
        assert_eq!(format_with_thousands("100", ","), "100");
        assert_eq!(format_with_thousands("12345", ""), "12345");
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("100").unwrap(), dec!(100));
        assert_eq!(parse_amount(" 1,250.75 ").unwrap(), dec!(1250.75));
        assert_eq!(parse_amount("0.0").unwrap(), dec!(0));
        assert!(parse_amount("").is_err());
        assert!(parse_amount("12a").is_err());
        assert!(parse_amount("1.2.3").is_err());
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("3").unwrap(), 3);
        assert_eq!(parse_quantity(" 1,200 ").unwrap(), 1200);
        assert_eq!(parse_quantity("2.0").unwrap(), 2);
        assert!(parse_quantity("2.5").is_err());
        assert!(parse_quantity("-1").is_err());
        assert!(parse_quantity("five").is_err());
        assert!(parse_quantity("99999999999").is_err());
    }

    #[test]
    fn test_format_long_date() {
        let date = NaiveDate::from_ymd_opt(2025, 8, 10).unwrap();
        assert_eq!(format_long_date(date), "Sunday, August 10, 2025");

        let date = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        assert_eq!(format_long_date(date), "Monday, January 05, 2026");
    }

    #[test]
    fn test_parse_iso_date() {
        assert_eq!(
            parse_iso_date("2025-08-10").unwrap(),
            NaiveDate::from_ymd_opt(2025, 8, 10).unwrap()
        );
        assert_eq!(
            parse_iso_date("10/08/2025"),
            Err(TextError::InvalidDate("10/08/2025".to_string()))
        );
    }

    proptest! {
        #[test]
        fn formatted_amount_parses_back(cents in 0i64..10_000_000_000) {
            let amount = Decimal::new(cents, 2);
            let text = format_amount(amount);
            prop_assert_eq!(parse_amount(&text).unwrap(), amount);
            let cents_suffix = format!("{:02}", cents % 100);
            prop_assert!(text.ends_with(&cents_suffix));
        }
    }
}
