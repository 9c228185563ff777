//! Text rendering utilities

use crate::Align;

/// Context for rendering text
pub struct TextRenderContext {
    /// PDF font resource name (e.g., "F1")
    pub font_name: String,
    /// Font size in points
    pub font_size: f32,
    /// Text width in points (for alignment)
    pub text_width: f64,
}

/// Generate PDF operators for text insertion
///
/// Creates the text operators (BT, Tf, Td, Tj, ET) that render an already
/// encoded string at a baseline position.
///
/// # Arguments
/// * `text_hex` - Hex-encoded text (e.g., "<0041004200>" or "<4142>")
/// * `x` - X anchor in points (PDF coordinates, from left)
/// * `y` - Baseline in points (PDF coordinates, from bottom)
/// * `align` - Which part of the string sits on `x`
/// * `ctx` - Text rendering context
pub fn generate_text_operators(
    text_hex: &str,
    x: f64,
    y: f64,
    align: Align,
    ctx: &TextRenderContext,
) -> Vec<u8> {
    let final_x = x + align.offset(ctx.text_width);

    let mut ops = String::new();
    ops.push_str("BT\n");
    ops.push_str(&format!("/{} {} Tf\n", ctx.font_name, ctx.font_size));
    ops.push_str(&format!("{} {} Td\n", fmt_num(final_x), fmt_num(y)));
    ops.push_str(&format!("{text_hex} Tj\n"));
    ops.push_str("ET\n");

    ops.into_bytes()
}

/// Format a coordinate for a content stream.
///
/// Rounded to 1/1000 pt so that repeated renders produce identical bytes and
/// float noise like `841.8900000000001` never reaches the output.
pub(crate) fn fmt_num(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    if rounded == 0.0 {
        // avoids "-0"
        return "0".to_string();
    }
    format!("{rounded}")
}
