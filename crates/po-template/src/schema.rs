//! Template description types
//!
//! A [`DocumentTemplate`] enumerates every field, font and offset of one
//! purchase-order variant. Both variants are laid out by the same
//! [`LayoutEngine`](crate::LayoutEngine); they differ only in these values.

use crate::assets::AssetKind;
use pdf_core::{Align, FontWeight, PageSize};

/// Root template structure
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentTemplate {
    pub page: PageSize,
    /// Replayed at the top of every page
    pub header: Vec<Block>,
    /// One block list per page, in order
    pub pages: Vec<Vec<Block>>,
    /// Replayed at the end of every page
    pub footer: Vec<Block>,
}

/// Where a block sits vertically
///
/// All y values are measured from the top edge of the page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    /// `gap` below the cursor; the cursor moves past the block
    Flow { gap: f64 },
    /// `gap` below the cursor; the cursor stays put
    Overlay { gap: f64 },
    /// Fixed distance up from the bottom edge, ignoring the cursor
    Bottom { offset: f64 },
}

impl Placement {
    pub fn flow(gap: f64) -> Self {
        Placement::Flow { gap }
    }

    pub fn overlay(gap: f64) -> Self {
        Placement::Overlay { gap }
    }

    pub fn bottom(offset: f64) -> Self {
        Placement::Bottom { offset }
    }

    /// Reference y of a block placed with the cursor at `cursor`
    pub fn anchor_y(&self, cursor: f64, page_height: f64) -> f64 {
        match *self {
            Placement::Flow { gap } | Placement::Overlay { gap } => cursor + gap,
            Placement::Bottom { offset } => page_height - offset,
        }
    }

    /// Cursor advance for a block whose content spans `extent` points
    pub fn consumed(&self, extent: f64) -> f64 {
        match *self {
            Placement::Flow { gap } => gap + extent,
            Placement::Overlay { .. } | Placement::Bottom { .. } => 0.0,
        }
    }
}

/// Font size and weight; the family is chosen by the renderer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontSpec {
    pub size: f32,
    pub weight: FontWeight,
}

impl FontSpec {
    pub const fn regular(size: f32) -> Self {
        Self {
            size,
            weight: FontWeight::Regular,
        }
    }

    pub const fn bold(size: f32) -> Self {
        Self {
            size,
            weight: FontWeight::Bold,
        }
    }
}

/// How a bound value is turned into text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ValueFormat {
    #[default]
    Plain,
    /// `#,##0.00`
    Money,
    /// `Sunday, August 10, 2025` from an ISO date
    LongDate,
}

/// Literal text, optionally followed by a bound value
///
/// `prefix` is printed as is; `bind` is a `$.path` into the order data.
/// A missing or null bound value prints as the prefix alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextSource {
    pub prefix: String,
    pub bind: Option<String>,
    pub format: ValueFormat,
}

impl TextSource {
    pub fn literal(text: &str) -> Self {
        Self {
            prefix: text.to_string(),
            ..Self::default()
        }
    }

    pub fn bound(path: &str) -> Self {
        Self {
            bind: Some(path.to_string()),
            ..Self::default()
        }
    }

    pub fn labelled(prefix: &str, path: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            bind: Some(path.to_string()),
            format: ValueFormat::Plain,
        }
    }

    pub fn with_format(mut self, format: ValueFormat) -> Self {
        self.format = format;
        self
    }
}

/// Content blocks
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Text(TextBlock),
    Rule(RuleBlock),
    FieldGrid(FieldGridBlock),
    Table(TableBlock),
    TablePair(TablePairBlock),
    Approvals(ApprovalsBlock),
    Image(ImageBlock),
}

impl Block {
    /// Region name recorded on the laid-out page, if any
    pub fn id(&self) -> Option<&str> {
        match self {
            Block::Text(b) => b.id.as_deref(),
            Block::FieldGrid(b) => b.id.as_deref(),
            Block::Table(b) => Some(&b.id),
            Block::TablePair(b) => Some(&b.id),
            Block::Approvals(_) => Some(APPROVALS_REGION),
            Block::Rule(_) | Block::Image(_) => None,
        }
    }
}

/// Region name of the approvals block
pub const APPROVALS_REGION: &str = "approvals";

/// Lines of text, one baseline per `leading`
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub id: Option<String>,
    pub x: f64,
    pub placement: Placement,
    pub font: FontSpec,
    pub align: Align,
    pub leading: f64,
    pub lines: Vec<TextSource>,
    /// Wrap each line to this width; `None` draws lines as they are
    pub wrap_width: Option<f64>,
}

impl TextBlock {
    /// Unwrapped left-aligned lines
    pub fn new(x: f64, placement: Placement, font: FontSpec, leading: f64) -> Self {
        Self {
            id: None,
            x,
            placement,
            font,
            align: Align::Left,
            leading,
            lines: Vec::new(),
            wrap_width: None,
        }
    }

    pub fn id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub fn wrap(mut self, width: f64) -> Self {
        self.wrap_width = Some(width);
        self
    }

    pub fn line(mut self, source: TextSource) -> Self {
        self.lines.push(source);
        self
    }

    pub fn literals(mut self, lines: &[&str]) -> Self {
        self.lines.extend(lines.iter().map(|l| TextSource::literal(l)));
        self
    }
}

/// Horizontal rule
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RuleBlock {
    pub x1: f64,
    pub x2: f64,
    pub placement: Placement,
    pub width: f64,
}

/// Two-column label/value grid with an underline under each value
#[derive(Debug, Clone, PartialEq)]
pub struct FieldGridBlock {
    pub id: Option<String>,
    pub placement: Placement,
    pub font: FontSpec,
    pub columns: Vec<GridColumn>,
    pub rows: Vec<FieldRow>,
    pub rule_width: f64,
}

/// Horizontal geometry of one grid column
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridColumn {
    pub label_x: f64,
    pub value_x: f64,
    /// Right end of the value underline
    pub rule_end: f64,
}

/// One grid row; `fields[i]` belongs to `columns[i]`
#[derive(Debug, Clone, PartialEq)]
pub struct FieldRow {
    /// Distance from this row's baseline to the next one
    pub advance: f64,
    pub fields: Vec<Option<Field>>,
}

impl FieldRow {
    pub fn new(advance: f64, fields: Vec<Option<Field>>) -> Self {
        Self { advance, fields }
    }
}

/// Labelled value inside a grid row
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Label lines, stacked `label_leading` apart
    pub label: Vec<String>,
    pub label_leading: f64,
    pub value: TextSource,
    /// Value baseline relative to the row baseline
    pub value_dy: f64,
    /// Underline position relative to the row baseline
    pub rule_dy: f64,
    /// Flow the value inside a bounded region instead of one line
    pub wrap: Option<WrapRegion>,
}

impl Field {
    pub fn new(label: &str, value: TextSource) -> Self {
        Self {
            label: label.split('\n').map(str::to_string).collect(),
            label_leading: 10.0,
            value,
            value_dy: 0.0,
            rule_dy: 2.0,
            wrap: None,
        }
    }

    pub fn bound(label: &str, path: &str) -> Self {
        Self::new(label, TextSource::bound(path))
    }

    pub fn value_dy(mut self, dy: f64) -> Self {
        self.value_dy = dy;
        self
    }

    pub fn rule_dy(mut self, dy: f64) -> Self {
        self.rule_dy = dy;
        self
    }

    pub fn wrapped(mut self, region: WrapRegion) -> Self {
        self.wrap = Some(region);
        self
    }
}

/// Bounded text-flow area anchored at a field's value x
///
/// The region top sits `rise` above the row baseline. Lines that do not fit
/// inside `height` are dropped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WrapRegion {
    pub rise: f64,
    pub width: f64,
    pub height: f64,
    pub padding: f64,
    pub leading: f64,
}

/// Bordered table
#[derive(Debug, Clone, PartialEq)]
pub struct TableBlock {
    pub id: String,
    pub placement: Placement,
    pub table: TableSpec,
}

/// Two tables sharing a top edge; the taller one sets the extent
#[derive(Debug, Clone, PartialEq)]
pub struct TablePairBlock {
    pub id: String,
    pub placement: Placement,
    pub left: TableSpec,
    pub right: TableSpec,
}

/// Geometry and content of one table
#[derive(Debug, Clone, PartialEq)]
pub struct TableSpec {
    pub x: f64,
    pub font: FontSpec,
    pub header_font: FontSpec,
    pub columns: Vec<TableColumn>,
    pub rows: TableRows,
    pub row_height: RowHeight,
    pub show_header: bool,
    pub grid_width: f64,
}

impl TableSpec {
    pub fn width(&self) -> f64 {
        self.columns.iter().map(|c| c.width).sum()
    }
}

/// Table column definition
#[derive(Debug, Clone, PartialEq)]
pub struct TableColumn {
    pub title: String,
    pub width: f64,
    /// Key read from each bound row object
    pub field: String,
    /// Body alignment; header cells are always left aligned
    pub align: Align,
    pub format: ValueFormat,
    pub wrap: bool,
}

impl TableColumn {
    pub fn new(title: &str, width: f64, field: &str) -> Self {
        Self {
            title: title.to_string(),
            width,
            field: field.to_string(),
            align: Align::Left,
            format: ValueFormat::Plain,
            wrap: false,
        }
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub fn format(mut self, format: ValueFormat) -> Self {
        self.format = format;
        self
    }

    pub fn wrapped(mut self) -> Self {
        self.wrap = true;
        self
    }
}

/// Where table body rows come from
#[derive(Debug, Clone, PartialEq)]
pub enum TableRows {
    /// An array in the order data; one row per element
    Bound(String),
    /// Fixed cells
    Static(Vec<Vec<TextSource>>),
}

/// Row sizing
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RowHeight {
    Fixed(f64),
    /// Grow with the tallest wrapped cell, never below `min`
    Auto { min: f64, leading: f64 },
}

/// Signature columns pinned to the page bottom
#[derive(Debug, Clone, PartialEq)]
pub struct ApprovalsBlock {
    /// Left edge of each column
    pub columns: Vec<f64>,
    pub signatories: Vec<Signatory>,
    pub caption: ApprovalLine,
    pub name: ApprovalLine,
    pub role: ApprovalLine,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Signatory {
    pub caption: String,
    pub name: String,
    pub role: String,
}

impl Signatory {
    pub fn new(caption: &str, name: &str, role: &str) -> Self {
        Self {
            caption: caption.to_string(),
            name: name.to_string(),
            role: role.to_string(),
        }
    }
}

/// Baseline (distance up from the page bottom) and font of one approval line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApprovalLine {
    pub offset: f64,
    pub font: FontSpec,
}

/// Optional image asset
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageBlock {
    pub asset: AssetKind,
    /// Left edge of the bounding box
    pub x: f64,
    pub width: f64,
    /// `None` scales to `width` keeping the aspect ratio
    pub height: Option<f64>,
    pub placement: Placement,
    pub anchor: ImageAnchor,
}

/// Which corner of the bounding box the image sticks to
///
/// For top anchors the placement y is the box top; for [`ImageAnchor::BottomLeft`]
/// it is the image bottom.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ImageAnchor {
    #[default]
    TopLeft,
    TopRight,
    BottomLeft,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_placement_anchor() {
        assert_eq!(Placement::flow(20.0).anchor_y(110.0, 842.0), 130.0);
        assert_eq!(Placement::overlay(18.0).anchor_y(0.0, 842.0), 18.0);
        assert_eq!(Placement::bottom(62.0).anchor_y(500.0, 842.0), 780.0);
    }

    #[test]
    fn test_placement_consumed() {
        assert_eq!(Placement::flow(15.0).consumed(24.0), 39.0);
        assert_eq!(Placement::overlay(15.0).consumed(24.0), 0.0);
        assert_eq!(Placement::bottom(30.0).consumed(100.0), 0.0);
    }

    #[test]
    fn test_field_label_lines() {
        let field = Field::bound("Supplier\nReference:", "$.header.quotation_ref");
        assert_eq!(field.label, vec!["Supplier", "Reference:"]);
        assert_eq!(field.rule_dy, 2.0);
    }

    #[test]
    fn test_table_width() {
        let table = TableSpec {
            x: 40.0,
            font: FontSpec::regular(9.0),
            header_font: FontSpec::regular(9.0),
            columns: vec![
                TableColumn::new("A", 40.0, "a"),
                TableColumn::new("B", 220.0, "b"),
            ],
            rows: TableRows::Static(Vec::new()),
            row_height: RowHeight::Fixed(18.0),
            show_header: true,
            grid_width: 0.5,
        };
        assert_eq!(table.width(), 260.0);
    }
}
