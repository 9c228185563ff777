//! Purchase-order rendering

use crate::assets::AssetSet;
use crate::config::RenderConfig;
use crate::fonts::FontSet;
use crate::layout::{DrawOp, LaidOutDocument, LayoutEngine};
use crate::order::PurchaseOrder;
use crate::variants::template_for;
use crate::Result;
use chrono::{Local, NaiveDate};
use pdf_core::PdfDocument;
use tracing::{debug, info};

/// A finished document and the name it should be saved under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Purchase-order renderer
///
/// Output is a pure function of the order, the assets and the render date;
/// pin the date with [`PurchaseOrderRenderer::with_date`] for repeatable
/// bytes.
pub struct PurchaseOrderRenderer<'a> {
    fonts: &'a FontSet,
    assets: AssetSet,
    date: NaiveDate,
}

impl<'a> PurchaseOrderRenderer<'a> {
    /// Create a renderer dated today
    pub fn new(fonts: &'a FontSet, assets: AssetSet) -> Self {
        Self {
            fonts,
            assets,
            date: Local::now().date_naive(),
        }
    }

    /// Date printed when an order carries no PO date
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }
}

impl PurchaseOrderRenderer<'static> {
    /// Renderer using the process font registry and the configured assets
    pub fn from_config(config: &RenderConfig) -> Result<Self> {
        let fonts = FontSet::global(config.font.as_ref())?;
        Ok(Self::new(fonts, AssetSet::load(&config.assets)))
    }
}

impl PurchaseOrderRenderer<'_> {
    /// Display list of `order`, without producing a PDF
    pub fn layout(&self, order: &PurchaseOrder) -> Result<LaidOutDocument> {
        let template = template_for(order.variant());
        let data = order.binding_data(self.date)?;
        LayoutEngine::new(&template, self.fonts, &self.assets).layout(&data)
    }

    /// Render `order` to PDF bytes
    pub fn render(&self, order: &PurchaseOrder) -> Result<RenderedDocument> {
        info!(
            variant = %order.variant(),
            items = order.item_count(),
            "Rendering purchase order"
        );

        let laid_out = self.layout(order)?;
        let bytes = self.write_pdf(&laid_out)?;

        info!(
            pages = laid_out.page_count(),
            bytes = bytes.len(),
            "Rendered purchase order"
        );

        Ok(RenderedDocument {
            file_name: order.file_name(),
            bytes,
        })
    }

    fn write_pdf(&self, laid_out: &LaidOutDocument) -> Result<Vec<u8>> {
        let family = self.fonts.name();
        let mut doc = PdfDocument::new(laid_out.page_size);
        doc.add_font_family(family, self.fonts.family())?;

        for page in &laid_out.pages {
            let page_number = doc.add_page()?;
            for op in &page.ops {
                self.draw(&mut doc, page_number, family, op)?;
            }
            debug!(page = page_number, ops = page.ops.len(), "Wrote page");
        }
        debug!(pages = doc.page_count(), "Serialising document");

        Ok(doc.to_bytes()?)
    }

    fn draw(&self, doc: &mut PdfDocument, page: usize, family: &str, op: &DrawOp) -> Result<()> {
        match op {
            DrawOp::Text {
                x,
                y,
                text,
                font,
                align,
            } => {
                doc.set_font(family, font.size)?;
                doc.set_font_weight(font.weight)?;
                doc.insert_text(text, page, *x, *y, *align)?;
            }
            DrawOp::Line {
                x1,
                y1,
                x2,
                y2,
                width,
            } => doc.draw_line(page, *x1, *y1, *x2, *y2, *width)?,
            DrawOp::Rect {
                x,
                y,
                width,
                height,
                line_width,
            } => doc.draw_rect(page, *x, *y, *width, *height, *line_width)?,
            DrawOp::Image {
                asset,
                x,
                y,
                width,
                height,
            } => {
                // Layout only emits images for assets that are present
                if let Some(image) = self.assets.get(*asset) {
                    doc.insert_image(&image.data, page, *x, *y, *width, *height)?;
                }
            }
        }
        Ok(())
    }
}
