//! Table measurement and drawing

use crate::fonts::TextMeasure;
use crate::layout::DrawOp;
use crate::parser::{format_value, resolve_binding};
use crate::schema::{FontSpec, RowHeight, TableRows, TableSpec};
use crate::{Result, TemplateError};
use pdf_core::Align;
use serde_json::Value;

/// Horizontal inset of cell text
pub const CELL_PADDING_X: f64 = 6.0;
/// Gap between the row top and the cap height of the first line
pub const CELL_PADDING_TOP: f64 = 3.0;
/// Room below the last baseline of an auto-sized row
pub const CELL_PADDING_BOTTOM: f64 = 5.0;

/// A table with every cell resolved and every row measured
#[derive(Debug, Clone, PartialEq)]
pub struct TableLayout {
    x: f64,
    columns: Vec<(f64, Align)>,
    rows: Vec<MeasuredRow>,
    grid_width: f64,
}

#[derive(Debug, Clone, PartialEq)]
struct MeasuredRow {
    height: f64,
    font: FontSpec,
    leading: f64,
    header: bool,
    /// Lines per cell
    cells: Vec<Vec<String>>,
}

impl TableLayout {
    /// Resolve `spec` against `data` and compute every row height
    pub fn measure(spec: &TableSpec, data: &Value, measure: &dyn TextMeasure) -> Result<Self> {
        let mut rows = Vec::new();

        if spec.show_header {
            let titles = spec.columns.iter().map(|c| c.title.clone()).collect();
            rows.push(measure_row(spec, titles, spec.header_font, true, measure));
        }

        for cells in body_cells(spec, data)? {
            rows.push(measure_row(spec, cells, spec.font, false, measure));
        }

        Ok(Self {
            x: spec.x,
            columns: spec.columns.iter().map(|c| (c.width, c.align)).collect(),
            rows,
            grid_width: spec.grid_width,
        })
    }

    /// Total height including the header row
    pub fn height(&self) -> f64 {
        self.rows.iter().map(|r| r.height).sum()
    }

    pub fn width(&self) -> f64 {
        self.columns.iter().map(|(w, _)| w).sum()
    }

    /// Number of body rows
    pub fn body_rows(&self) -> usize {
        self.rows.iter().filter(|r| !r.header).count()
    }

    /// Cell text and grid with the table's top edge at `top`
    pub fn draw(&self, top: f64) -> Vec<DrawOp> {
        let mut ops = Vec::new();
        if self.rows.is_empty() {
            return ops;
        }

        let width = self.width();
        let height = self.height();

        let mut row_top = top;
        for row in &self.rows {
            let mut cell_x = self.x;
            for ((col_width, col_align), lines) in self.columns.iter().zip(&row.cells) {
                let align = if row.header { Align::Left } else { *col_align };
                let x = match align {
                    Align::Left => cell_x + CELL_PADDING_X,
                    Align::Center => cell_x + col_width / 2.0,
                    Align::Right => cell_x + col_width - CELL_PADDING_X,
                };

                for (i, line) in lines.iter().enumerate() {
                    if line.is_empty() {
                        continue;
                    }
                    ops.push(DrawOp::Text {
                        x,
                        y: row_top + first_baseline(row.font) + i as f64 * row.leading,
                        text: line.clone(),
                        font: row.font,
                        align,
                    });
                }
                cell_x += col_width;
            }
            row_top += row.height;
        }

        // Grid: outer border, then inner row and column lines
        ops.push(DrawOp::Rect {
            x: self.x,
            y: top,
            width,
            height,
            line_width: self.grid_width,
        });

        let mut y = top;
        for row in &self.rows[..self.rows.len() - 1] {
            y += row.height;
            ops.push(DrawOp::Line {
                x1: self.x,
                y1: y,
                x2: self.x + width,
                y2: y,
                width: self.grid_width,
            });
        }

        let mut x = self.x;
        for (col_width, _) in &self.columns[..self.columns.len().saturating_sub(1)] {
            x += col_width;
            ops.push(DrawOp::Line {
                x1: x,
                y1: top,
                x2: x,
                y2: top + height,
                width: self.grid_width,
            });
        }

        ops
    }
}

fn first_baseline(font: FontSpec) -> f64 {
    CELL_PADDING_TOP + font.size as f64
}

/// Raw cell strings of every body row
fn body_cells(spec: &TableSpec, data: &Value) -> Result<Vec<Vec<String>>> {
    match &spec.rows {
        TableRows::Static(rows) => rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| cell.resolve(data))
                    .collect::<Result<Vec<_>>>()
            })
            .collect(),
        TableRows::Bound(path) => {
            let items = match resolve_binding(path, data) {
                None | Some(Value::Null) => return Ok(Vec::new()),
                Some(Value::Array(items)) => items,
                Some(other) => {
                    return Err(TemplateError::BindingError(format!(
                        "{path} is not an array: {other}"
                    )))
                }
            };

            items
                .iter()
                .map(|item| {
                    spec.columns
                        .iter()
                        .map(|col| match item.get(&col.field) {
                            Some(value) => format_value(value, col.format),
                            None => Ok(String::new()),
                        })
                        .collect::<Result<Vec<_>>>()
                })
                .collect()
        }
    }
}

fn measure_row(
    spec: &TableSpec,
    cells: Vec<String>,
    font: FontSpec,
    header: bool,
    measure: &dyn TextMeasure,
) -> MeasuredRow {
    let leading = match spec.row_height {
        RowHeight::Auto { leading, .. } => leading,
        RowHeight::Fixed(_) => font.size as f64 * 1.2,
    };

    let cells: Vec<Vec<String>> = spec
        .columns
        .iter()
        .zip(cells)
        .map(|(col, text)| {
            if col.wrap && !header {
                let max_width = col.width - 2.0 * CELL_PADDING_X;
                po_text::wrap_to_width(&text, max_width, |s| measure.text_width(s, font))
            } else {
                vec![text]
            }
        })
        .collect();

    let height = match spec.row_height {
        RowHeight::Fixed(height) => height,
        RowHeight::Auto { min, leading } => {
            let lines = cells.iter().map(Vec::len).max().unwrap_or(1).max(1);
            let content = CELL_PADDING_TOP
                + font.size as f64
                + (lines - 1) as f64 * leading
                + CELL_PADDING_BOTTOM;
            content.max(min)
        }
    };

    MeasuredRow {
        height,
        font,
        leading,
        header,
        cells,
    }
}
