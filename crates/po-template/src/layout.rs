//! Layout engine
//!
//! Turns a [`DocumentTemplate`] plus order data into a display list of
//! absolute-positioned [`DrawOp`]s, one list per page. Flowing blocks are
//! stacked with a [`LayoutContext`] cursor: every `place_*` call returns the
//! height it consumed and the caller advances the cursor by that amount, so
//! anything below a variable-height table moves down with it.

use crate::assets::{AssetKind, AssetSet};
use crate::blocks::TextContent;
use crate::fonts::TextMeasure;
use crate::schema::*;
use crate::table::TableLayout;
use crate::Result;
use pdf_core::{calculate_scaled_dimensions, Align, ImageScaleMode, PageSize};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// One drawing primitive, y measured from the top of the page
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// `y` is the baseline; `x` is the anchor given by `align`
    Text {
        x: f64,
        y: f64,
        text: String,
        font: FontSpec,
        align: Align,
    },
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        width: f64,
    },
    /// Stroked rectangle with its top-left corner at `(x, y)`
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        line_width: f64,
    },
    /// Image with its top-left corner at `(x, y)`
    Image {
        asset: AssetKind,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
}

/// Vertical span occupied by a named block
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    pub top: f64,
    pub bottom: f64,
}

impl Region {
    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }
}

/// Display list of one page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LaidOutPage {
    pub ops: Vec<DrawOp>,
    pub regions: BTreeMap<String, Region>,
}

impl LaidOutPage {
    pub fn region(&self, id: &str) -> Option<&Region> {
        self.regions.get(id)
    }

    /// Every text op as `(text, x, y)`
    pub fn texts(&self) -> impl Iterator<Item = (&str, f64, f64)> + '_ {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, x, y, .. } => Some((text.as_str(), *x, *y)),
            _ => None,
        })
    }

    /// Position of the first text that starts with `prefix`
    pub fn find_text(&self, prefix: &str) -> Option<(f64, f64)> {
        self.texts()
            .find(|(text, _, _)| text.starts_with(prefix))
            .map(|(_, x, y)| (x, y))
    }

    pub fn images(&self) -> impl Iterator<Item = &DrawOp> + '_ {
        self.ops.iter().filter(|op| matches!(op, DrawOp::Image { .. }))
    }
}

/// Display lists of every page
#[derive(Debug, Clone, PartialEq)]
pub struct LaidOutDocument {
    pub page_size: PageSize,
    pub pages: Vec<LaidOutPage>,
}

impl LaidOutDocument {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// Cursor and output of the page being laid out
pub struct LayoutContext<'a> {
    page_size: PageSize,
    measure: &'a dyn TextMeasure,
    cursor: f64,
    ops: Vec<DrawOp>,
    regions: BTreeMap<String, Region>,
}

impl<'a> LayoutContext<'a> {
    pub fn new(page_size: PageSize, measure: &'a dyn TextMeasure) -> Self {
        Self {
            page_size,
            measure,
            cursor: 0.0,
            ops: Vec::new(),
            regions: BTreeMap::new(),
        }
    }

    /// Current writing position, from the top edge
    pub fn cursor(&self) -> f64 {
        self.cursor
    }

    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    pub fn advance(&mut self, height: f64) {
        self.cursor += height;
    }

    /// Reference y of a block placed now
    pub fn anchor(&self, placement: Placement) -> f64 {
        placement.anchor_y(self.cursor, self.page_size.height)
    }

    pub fn measure(&self) -> &'a dyn TextMeasure {
        self.measure
    }

    pub fn push(&mut self, op: DrawOp) {
        self.ops.push(op);
    }

    pub fn mark_region(&mut self, id: &str, region: Region) {
        self.regions.insert(id.to_string(), region);
    }

    /// Lines stacked `leading` apart; the first baseline is the anchor
    ///
    /// Empty lines draw nothing but keep their slot.
    pub fn place_text(
        &mut self,
        x: f64,
        placement: Placement,
        font: FontSpec,
        align: Align,
        leading: f64,
        lines: &[String],
    ) -> f64 {
        let y = self.anchor(placement);
        for (i, line) in lines.iter().enumerate() {
            if line.is_empty() {
                continue;
            }
            self.ops.push(DrawOp::Text {
                x,
                y: y + i as f64 * leading,
                text: po_text::flatten_line(line),
                font,
                align,
            });
        }

        let extent = lines.len().saturating_sub(1) as f64 * leading;
        placement.consumed(extent)
    }

    /// Like [`LayoutContext::place_text`], wrapping each line to `width`
    #[allow(clippy::too_many_arguments)]
    pub fn place_wrapped_text(
        &mut self,
        x: f64,
        placement: Placement,
        font: FontSpec,
        align: Align,
        leading: f64,
        width: f64,
        lines: &[String],
    ) -> f64 {
        let measure = self.measure;
        let wrapped: Vec<String> = lines
            .iter()
            .flat_map(|line| {
                let pieces = po_text::wrap_to_width(line, width, |s| measure.text_width(s, font));
                if pieces.is_empty() {
                    vec![String::new()]
                } else {
                    pieces
                }
            })
            .collect();
        self.place_text(x, placement, font, align, leading, &wrapped)
    }

    /// Horizontal rule at the anchor
    pub fn place_rule(&mut self, x1: f64, x2: f64, placement: Placement, width: f64) -> f64 {
        let y = self.anchor(placement);
        self.ops.push(DrawOp::Line {
            x1,
            y1: y,
            x2,
            y2: y,
            width,
        });
        placement.consumed(0.0)
    }

    /// Table with its top edge at the anchor
    pub fn place_table(&mut self, id: &str, placement: Placement, table: &TableLayout) -> f64 {
        let top = self.anchor(placement);
        let height = table.height();
        self.ops.extend(table.draw(top));
        self.mark_region(
            id,
            Region {
                top,
                bottom: top + height,
            },
        );
        placement.consumed(height)
    }

    /// Two tables sharing a top edge; consumes the taller of the two
    pub fn place_table_pair(
        &mut self,
        id: &str,
        placement: Placement,
        left: &TableLayout,
        right: &TableLayout,
    ) -> f64 {
        let top = self.anchor(placement);
        let height = left.height().max(right.height());
        self.ops.extend(left.draw(top));
        self.ops.extend(right.draw(top));
        self.mark_region(
            id,
            Region {
                top,
                bottom: top + height,
            },
        );
        placement.consumed(height)
    }

    /// Close the page, warning about content that ran into fixed blocks
    pub fn finish(self, page: usize) -> LaidOutPage {
        if let Some(approvals) = self.regions.get(APPROVALS_REGION) {
            if self.cursor > approvals.top {
                warn!(
                    page,
                    cursor = self.cursor,
                    approvals_top = approvals.top,
                    "Content runs into the approvals block"
                );
            }
        }
        if self.cursor > self.page_size.height {
            warn!(page, cursor = self.cursor, "Content runs off the page");
        }

        LaidOutPage {
            ops: self.ops,
            regions: self.regions,
        }
    }
}

/// Lays out a template against order data
pub struct LayoutEngine<'a> {
    template: &'a DocumentTemplate,
    measure: &'a dyn TextMeasure,
    assets: &'a AssetSet,
}

impl<'a> LayoutEngine<'a> {
    pub fn new(
        template: &'a DocumentTemplate,
        measure: &'a dyn TextMeasure,
        assets: &'a AssetSet,
    ) -> Self {
        Self {
            template,
            measure,
            assets,
        }
    }

    /// Lay out every page: header, page blocks, then footer
    pub fn layout(&self, data: &Value) -> Result<LaidOutDocument> {
        let mut pages = Vec::with_capacity(self.template.pages.len());

        for (index, blocks) in self.template.pages.iter().enumerate() {
            let page = index + 1;
            let mut ctx = LayoutContext::new(self.template.page, self.measure);

            for block in self
                .template
                .header
                .iter()
                .chain(blocks)
                .chain(&self.template.footer)
            {
                let consumed = self.place_block(&mut ctx, block, data)?;
                ctx.advance(consumed);
                debug!(page, block = block.id().unwrap_or("-"), cursor = ctx.cursor(), "Placed block");
            }

            pages.push(ctx.finish(page));
        }

        Ok(LaidOutDocument {
            page_size: self.template.page,
            pages,
        })
    }

    fn place_block(&self, ctx: &mut LayoutContext, block: &Block, data: &Value) -> Result<f64> {
        match block {
            Block::Text(b) => self.place_text_block(ctx, b, data),
            Block::Rule(b) => Ok(ctx.place_rule(b.x1, b.x2, b.placement, b.width)),
            Block::FieldGrid(b) => self.place_field_grid(ctx, b, data),
            Block::Table(b) => {
                let table = TableLayout::measure(&b.table, data, self.measure)?;
                Ok(ctx.place_table(&b.id, b.placement, &table))
            }
            Block::TablePair(b) => {
                let left = TableLayout::measure(&b.left, data, self.measure)?;
                let right = TableLayout::measure(&b.right, data, self.measure)?;
                Ok(ctx.place_table_pair(&b.id, b.placement, &left, &right))
            }
            Block::Approvals(b) => Ok(self.place_approvals(ctx, b)),
            Block::Image(b) => Ok(self.place_image(ctx, b)),
        }
    }

    fn place_text_block(&self, ctx: &mut LayoutContext, block: &TextBlock, data: &Value) -> Result<f64> {
        let lines = block.get_text(data)?;
        let top = ctx.anchor(block.placement);

        let consumed = match block.wrap_width {
            Some(width) => ctx.place_wrapped_text(
                block.x,
                block.placement,
                block.font,
                block.align,
                block.leading,
                width,
                &lines,
            ),
            None => ctx.place_text(
                block.x,
                block.placement,
                block.font,
                block.align,
                block.leading,
                &lines,
            ),
        };

        if let Some(id) = &block.id {
            let extent = match block.placement {
                Placement::Flow { gap } => consumed - gap,
                _ => block.leading * lines.len().saturating_sub(1) as f64,
            };
            ctx.mark_region(
                id,
                Region {
                    top: top - block.font.size as f64,
                    bottom: top + extent,
                },
            );
        }

        Ok(consumed)
    }

    fn place_field_grid(
        &self,
        ctx: &mut LayoutContext,
        block: &FieldGridBlock,
        data: &Value,
    ) -> Result<f64> {
        let top = ctx.anchor(block.placement);
        let mut baseline = top;

        for row in &block.rows {
            for (column, field) in block.columns.iter().zip(&row.fields) {
                if let Some(field) = field {
                    self.place_field(ctx, block, column, field, baseline, data)?;
                }
            }
            baseline += row.advance;
        }

        let extent = block.rows.iter().map(|r| r.advance).sum::<f64>();
        if let Some(id) = &block.id {
            ctx.mark_region(
                id,
                Region {
                    top: top - block.font.size as f64,
                    bottom: top + extent,
                },
            );
        }

        Ok(block.placement.consumed(extent))
    }

    fn place_field(
        &self,
        ctx: &mut LayoutContext,
        block: &FieldGridBlock,
        column: &GridColumn,
        field: &Field,
        baseline: f64,
        data: &Value,
    ) -> Result<()> {
        let font = block.font;

        for (i, label) in field.label.iter().enumerate() {
            if label.is_empty() {
                continue;
            }
            ctx.push(DrawOp::Text {
                x: column.label_x,
                y: baseline + i as f64 * field.label_leading,
                text: label.clone(),
                font,
                align: Align::Left,
            });
        }

        let value = field.value.resolve(data)?;
        match &field.wrap {
            None => {
                if !value.is_empty() {
                    ctx.push(DrawOp::Text {
                        x: column.value_x,
                        y: baseline + field.value_dy,
                        text: po_text::flatten_line(&value),
                        font,
                        align: Align::Left,
                    });
                }
            }
            Some(region) => {
                let region_top = baseline - region.rise;
                let lines = wrap_in_region(ctx.measure(), &value, font, region);
                for (i, line) in lines.into_iter().enumerate() {
                    ctx.push(DrawOp::Text {
                        x: column.value_x + region.padding,
                        y: region_top + region.padding + font.size as f64 + i as f64 * region.leading,
                        text: line,
                        font,
                        align: Align::Left,
                    });
                }
            }
        }

        let rule_y = baseline + field.rule_dy;
        ctx.push(DrawOp::Line {
            x1: column.value_x,
            y1: rule_y,
            x2: column.rule_end,
            y2: rule_y,
            width: block.rule_width,
        });

        Ok(())
    }

    fn place_approvals(&self, ctx: &mut LayoutContext, block: &ApprovalsBlock) -> f64 {
        let height = ctx.page_size().height;
        let lines = [block.caption, block.name, block.role];

        for (x, signatory) in block.columns.iter().zip(&block.signatories) {
            let texts = [&signatory.caption, &signatory.name, &signatory.role];
            for (line, text) in lines.iter().zip(texts) {
                if text.is_empty() {
                    continue;
                }
                ctx.push(DrawOp::Text {
                    x: *x,
                    y: height - line.offset,
                    text: text.clone(),
                    font: line.font,
                    align: Align::Left,
                });
            }
        }

        let top = lines
            .iter()
            .map(|l| height - l.offset - l.font.size as f64)
            .fold(f64::INFINITY, f64::min);
        let bottom = lines
            .iter()
            .map(|l| height - l.offset)
            .fold(f64::NEG_INFINITY, f64::max);
        ctx.mark_region(APPROVALS_REGION, Region { top, bottom });

        0.0
    }

    fn place_image(&self, ctx: &mut LayoutContext, block: &ImageBlock) -> f64 {
        let Some(asset) = self.assets.get(block.asset) else {
            debug!(asset = ?block.asset, "No image for block, skipping");
            return block.placement.consumed(block.height.unwrap_or(0.0));
        };

        let (mode, box_height) = match block.height {
            Some(height) => (ImageScaleMode::FitBox, height),
            None => (ImageScaleMode::FitWidth, 0.0),
        };
        let (width, height) = calculate_scaled_dimensions(
            asset.dims.width,
            asset.dims.height,
            block.width,
            box_height,
            mode,
        );

        let anchor = ctx.anchor(block.placement);
        let (x, y) = match block.anchor {
            ImageAnchor::TopLeft => (block.x, anchor),
            ImageAnchor::TopRight => (block.x + block.width - width, anchor),
            ImageAnchor::BottomLeft => (block.x, anchor - height),
        };

        ctx.push(DrawOp::Image {
            asset: block.asset,
            x,
            y,
            width,
            height,
        });

        block.placement.consumed(height)
    }
}

/// Lines of `text` that fit inside a wrap region; the rest are dropped
fn wrap_in_region(
    measure: &dyn TextMeasure,
    text: &str,
    font: FontSpec,
    region: &WrapRegion,
) -> Vec<String> {
    let inner_width = region.width - 2.0 * region.padding;
    let inner_height = region.height - 2.0 * region.padding;
    let mut lines = po_text::wrap_to_width(text, inner_width, |s| measure.text_width(s, font));

    let size = font.size as f64;
    let capacity = if inner_height < size {
        0
    } else {
        ((inner_height - size) / region.leading).floor() as usize + 1
    };

    if lines.len() > capacity {
        warn!(
            lines = lines.len(),
            capacity,
            "Text does not fit its region, dropping lines"
        );
        lines.truncate(capacity);
    }
    lines
}
