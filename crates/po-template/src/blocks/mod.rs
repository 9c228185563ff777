//! Text resolution for blocks
//!
//! Turns the [`TextSource`]s held by blocks into the strings that are placed
//! on the page.

pub use crate::schema::{Block, Field, TableBlock, TableColumn, TextBlock, TextSource};

use crate::parser::{format_value, resolve_binding};
use crate::Result;
use serde_json::Value;

/// Trait for blocks that can provide their text content
pub trait TextContent {
    /// Resolved text lines, bindings substituted and formatted
    fn get_text(&self, data: &Value) -> Result<Vec<String>>;
}

impl TextSource {
    /// Prefix followed by the formatted bound value
    pub fn resolve(&self, data: &Value) -> Result<String> {
        let value = match &self.bind {
            Some(bind) => match resolve_binding(bind, data) {
                Some(value) => format_value(value, self.format)?,
                None => String::new(),
            },
            None => String::new(),
        };

        if self.prefix.is_empty() {
            Ok(value)
        } else {
            Ok(format!("{}{value}", self.prefix))
        }
    }
}

impl TextContent for TextBlock {
    fn get_text(&self, data: &Value) -> Result<Vec<String>> {
        self.lines.iter().map(|line| line.resolve(data)).collect()
    }
}
