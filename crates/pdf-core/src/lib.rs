//! PDF Core - Low-level PDF writing
//!
//! This crate provides functionality for:
//! - Creating fixed-size documents page by page
//! - Using the standard Helvetica pair or embedding a TrueType family (subset on save)
//! - Inserting text, rules and rectangles at specific coordinates
//! - Inserting images (JPEG, PNG with transparency)
//!
//! All coordinates take `y` from the top edge of the page; conversion to the
//! PDF bottom-left origin happens inside [`PdfDocument`].
//!
//! # Example
//!
//! ```ignore
//! use pdf_core::{Align, FontFamily, PageSize, PdfDocument};
//!
//! let mut doc = PdfDocument::new(PageSize::A4);
//! doc.add_font_family("helvetica", FontFamily::helvetica())?;
//! let page = doc.add_page()?;
//! doc.set_font("helvetica", 12.0)?;
//! doc.insert_text("Hello, World!", page, 40.0, 60.0, Align::Left)?;
//! doc.draw_line(page, 40.0, 80.0, 555.0, 80.0, 1.0)?;
//! let bytes = doc.to_bytes()?;
//! ```

mod document;
mod font;
mod graphics;
mod image;
mod standard;
mod text;

pub use document::{PageSize, PdfDocument};
pub use font::{FontData, FontFamily, FontFamilyBuilder, FontWeight};
pub use image::{calculate_scaled_dimensions, image_dimensions, ImageDimensions, ImageScaleMode};
pub use standard::StandardFont;
pub use text::{generate_text_operators, TextRenderContext};

use thiserror::Error;

/// Errors that can occur during PDF operations
#[derive(Debug, Error)]
pub enum PdfError {
    #[error("Failed to save PDF: {0}")]
    SaveError(String),

    #[error("Font not found: {0}")]
    FontNotFound(String),

    #[error("Font already exists: {0}")]
    FontAlreadyExists(String),

    #[error("Failed to parse font: {0}")]
    FontParseError(String),

    #[error("Font subset error: {0}")]
    FontSubsetError(String),

    #[error("Invalid page number: {0} (document has {1} pages)")]
    InvalidPage(usize, usize),

    #[error("Image error: {0}")]
    ImageError(String),

    #[error("PDF structure error: {0}")]
    StructureError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Lopdf error: {0}")]
    LopdfError(#[from] lopdf::Error),
}

/// Result type for PDF operations
pub type Result<T> = std::result::Result<T, PdfError>;

/// Text alignment options
///
/// The anchor point given to [`PdfDocument::insert_text`] is the left edge,
/// the centre or the right edge of the rendered string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

impl Align {
    /// Horizontal shift applied to a string of `width` points anchored at x.
    pub fn offset(self, width: f64) -> f64 {
        match self {
            Align::Left => 0.0,
            Align::Center => -width / 2.0,
            Align::Right => -width,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_align_default() {
        assert_eq!(Align::default(), Align::Left);
    }

    #[test]
    fn test_align_offset() {
        assert_eq!(Align::Left.offset(100.0), 0.0);
        assert_eq!(Align::Center.offset(100.0), -50.0);
        assert_eq!(Align::Right.offset(100.0), -100.0);
    }
}
