//! Data binding resolution and value formatting

use crate::schema::ValueFormat;
use crate::{Result, TemplateError};
use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;

/// Resolve a JSONPath-like binding expression against data
///
/// Supports simple paths like:
/// - `$.field` - Root field
/// - `$.object.field` - Nested field
/// - `$.array[0]` - Array index
/// - `$.array[0].field` - Array element field
/// - `$` - The data itself
pub fn resolve_binding<'a>(path: &str, data: &'a Value) -> Option<&'a Value> {
    if path == "$" {
        return Some(data);
    }
    let path = path.strip_prefix("$.")?;
    let mut current = data;

    for segment in path.split('.') {
        if let Some(bracket_pos) = segment.find('[') {
            let field = &segment[..bracket_pos];
            let index: usize = segment[bracket_pos + 1..]
                .strip_suffix(']')?
                .parse()
                .ok()?;

            if !field.is_empty() {
                current = current.get(field)?;
            }
            current = current.get(index)?;
        } else {
            current = current.get(segment)?;
        }
    }

    Some(current)
}

/// Convert a JSON value to string for rendering
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// Render a bound value with `format`
///
/// Null always renders as the empty string.
pub fn format_value(value: &Value, format: ValueFormat) -> Result<String> {
    if value.is_null() {
        return Ok(String::new());
    }

    match format {
        ValueFormat::Plain => Ok(value_to_string(value)),
        ValueFormat::Money => {
            let amount = match value {
                Value::String(s) => po_text::parse_amount(s)?,
                Value::Number(n) => Decimal::from_str(&n.to_string()).map_err(|_| {
                    TemplateError::BindingError(format!("{n} is not a decimal amount"))
                })?,
                other => {
                    return Err(TemplateError::BindingError(format!(
                        "{other} is not an amount"
                    )))
                }
            };
            Ok(po_text::format_amount(amount))
        }
        ValueFormat::LongDate => {
            let date = po_text::parse_iso_date(&value_to_string(value))?;
            Ok(po_text::format_long_date(date))
        }
    }
}
