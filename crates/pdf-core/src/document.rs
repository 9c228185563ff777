//! PDF Document wrapper

use crate::graphics::{generate_line_operators, generate_rect_operators};
use crate::image::{generate_image_operators, ImageXObject};
use crate::text::{generate_text_operators, TextRenderContext};
use crate::{Align, FontFamily, FontWeight, PdfError, Result};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::collections::hash_map::DefaultHasher;
use std::collections::{BTreeMap, BTreeSet};
use std::hash::{Hash, Hasher};

/// Fixed page dimensions in points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width: f64,
    pub height: f64,
}

impl PageSize {
    /// ISO A4 portrait, rounded to whole points
    pub const A4: PageSize = PageSize {
        width: 595.0,
        height: 842.0,
    };
}

impl Default for PageSize {
    fn default() -> Self {
        Self::A4
    }
}

/// A buffered text operation for deferred encoding
///
/// Text is buffered while drawing and encoded during save,
/// after fonts have been subsetted and glyph IDs remapped.
#[derive(Debug, Clone)]
struct BufferedTextOp {
    text: String,
    family: String,
    weight: FontWeight,
    /// Font resource name (e.g., "F1")
    resource: String,
    /// Left edge, PDF coordinates
    x: f64,
    /// Baseline, PDF coordinates
    y: f64,
    font_size: f32,
}

/// Page content in drawing order
#[derive(Debug, Clone)]
enum PageOp {
    Operators(Vec<u8>),
    Text(BufferedTextOp),
}

#[derive(Debug, Default)]
struct PageState {
    ops: Vec<PageOp>,
    fonts: BTreeSet<String>,
    images: BTreeSet<usize>,
}

/// PDF Document wrapper providing high-level operations
///
/// Pages share one [`PageSize`]. Nothing is written to a `lopdf::Document`
/// until [`PdfDocument::to_bytes`] or [`PdfDocument::save`]; that is when the
/// used fonts are subset and embedded.
pub struct PdfDocument {
    page_size: PageSize,
    pages: Vec<PageState>,
    /// Registered font families
    font_families: BTreeMap<String, FontFamily>,
    /// Current font family name
    current_family: Option<String>,
    /// Current font weight
    current_weight: FontWeight,
    /// Current font size
    current_font_size: f32,
    /// (family, resolved weight) -> resource name, shared by all pages
    font_resources: BTreeMap<(String, FontWeight), String>,
    /// Decoded images in insertion order; resource name is `Im{index + 1}`
    images: Vec<ImageXObject>,
    /// Image data hash -> index into `images`
    image_index: BTreeMap<u64, usize>,
}

impl PdfDocument {
    /// Create an empty document (no pages yet)
    pub fn new(page_size: PageSize) -> Self {
        Self {
            page_size,
            pages: Vec::new(),
            font_families: BTreeMap::new(),
            current_family: None,
            current_weight: FontWeight::default(),
            current_font_size: 12.0,
            font_resources: BTreeMap::new(),
            images: Vec::new(),
            image_index: BTreeMap::new(),
        }
    }

    /// Get the number of pages in the document
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Append a blank page and return its number (1-indexed)
    pub fn add_page(&mut self) -> Result<usize> {
        self.pages.push(PageState::default());
        Ok(self.pages.len())
    }

    /// Register an already built font family
    pub fn add_font_family(&mut self, name: &str, family: FontFamily) -> Result<()> {
        if self.font_families.contains_key(name) {
            return Err(PdfError::FontAlreadyExists(name.to_string()));
        }
        self.font_families.insert(name.to_string(), family);
        Ok(())
    }

    /// Set the current font family and size; the weight is kept
    pub fn set_font(&mut self, family: &str, size: f32) -> Result<()> {
        if !self.font_families.contains_key(family) {
            return Err(PdfError::FontNotFound(family.to_string()));
        }

        self.current_family = Some(family.to_string());
        self.current_font_size = size;

        Ok(())
    }

    /// Set the font weight (keeps current family/size)
    pub fn set_font_weight(&mut self, weight: FontWeight) -> Result<()> {
        if self.current_family.is_none() {
            return Err(PdfError::FontNotFound("No font family set".to_string()));
        }

        self.current_weight = weight;
        Ok(())
    }

    fn current_family(&self) -> Result<(&str, &FontFamily)> {
        let name = self
            .current_family
            .as_deref()
            .ok_or_else(|| PdfError::FontNotFound("No font family set".to_string()))?;
        let family = self
            .font_families
            .get(name)
            .ok_or_else(|| PdfError::FontNotFound(name.to_string()))?;
        Ok((name, family))
    }

    fn check_page(&self, page: usize) -> Result<()> {
        if page == 0 || page > self.pages.len() {
            return Err(PdfError::InvalidPage(page, self.pages.len()));
        }
        Ok(())
    }

    fn page_mut(&mut self, page: usize) -> Result<&mut PageState> {
        self.check_page(page)?;
        Ok(&mut self.pages[page - 1])
    }

    /// Insert text at a specific position
    ///
    /// # Arguments
    /// * `text` - Text to insert
    /// * `page` - Page number (1-indexed)
    /// * `x` - Anchor x in points
    /// * `y` - Baseline in points (from top)
    /// * `align` - Which part of the string sits on `x`
    pub fn insert_text(
        &mut self,
        text: &str,
        page: usize,
        x: f64,
        y: f64,
        align: Align,
    ) -> Result<()> {
        self.check_page(page)?;

        // Nothing to draw
        if text.is_empty() {
            return Ok(());
        }

        let (family_name, family) = self.current_family()?;
        let family_name = family_name.to_string();
        let weight = family.resolve_weight(self.current_weight);
        let font_size = self.current_font_size;

        let width = {
            let Some(family) = self.font_families.get_mut(&family_name) else {
                return Err(PdfError::FontNotFound(family_name));
            };
            let font_data = family.get_variant_mut(weight);
            font_data.add_chars(text);
            font_data.text_width_points(text, font_size)
        };

        let next = self.font_resources.len() + 1;
        let resource = self
            .font_resources
            .entry((family_name.clone(), weight))
            .or_insert_with(|| format!("F{next}"))
            .clone();

        let pdf_y = self.page_size.height - y;
        let op = BufferedTextOp {
            text: text.to_string(),
            family: family_name,
            weight,
            resource: resource.clone(),
            x: x + align.offset(width),
            y: pdf_y,
            font_size,
        };

        let state = self.page_mut(page)?;
        state.fonts.insert(resource);
        state.ops.push(PageOp::Text(op));

        Ok(())
    }

    /// Draw a straight line; y values are measured from the top
    pub fn draw_line(
        &mut self,
        page: usize,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        line_width: f64,
    ) -> Result<()> {
        let height = self.page_size.height;
        let operators = generate_line_operators(x1, height - y1, x2, height - y2, line_width);
        self.page_mut(page)?.ops.push(PageOp::Operators(operators));
        Ok(())
    }

    /// Stroke a rectangle whose top-left corner is `(x, y)` (y from the top)
    pub fn draw_rect(
        &mut self,
        page: usize,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        line_width: f64,
    ) -> Result<()> {
        let pdf_y = self.page_size.height - y - height;
        let operators = generate_rect_operators(x, pdf_y, width, height, line_width);
        self.page_mut(page)?.ops.push(PageOp::Operators(operators));
        Ok(())
    }

    /// Insert an image stretched to the given box
    ///
    /// Callers that need the aspect ratio kept compute the box with
    /// [`crate::calculate_scaled_dimensions`] first.
    ///
    /// # Arguments
    /// * `data` - Image file bytes (JPEG or PNG)
    /// * `page` - Page number (1-indexed)
    /// * `x` - X coordinate in points
    /// * `y` - Y coordinate of the top edge in points (from top)
    /// * `width` - Image width in points
    /// * `height` - Image height in points
    pub fn insert_image(
        &mut self,
        data: &[u8],
        page: usize,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> Result<()> {
        self.check_page(page)?;

        let index = self.get_or_create_image(data)?;
        let pdf_y = self.page_size.height - y - height;
        let resource = image_resource_name(index);
        let operators = generate_image_operators(&resource, x, pdf_y, width, height);

        let state = self.page_mut(page)?;
        state.images.insert(index);
        state.ops.push(PageOp::Operators(operators));

        Ok(())
    }

    /// Decode an image once; repeated data (e.g. a logo on every page) is shared
    fn get_or_create_image(&mut self, data: &[u8]) -> Result<usize> {
        let mut hasher = DefaultHasher::new();
        data.hash(&mut hasher);
        let data_hash = hasher.finish();

        if let Some(&index) = self.image_index.get(&data_hash) {
            return Ok(index);
        }

        let xobject = ImageXObject::from_bytes(data)
            .map_err(|e| PdfError::ImageError(format!("Failed to create image XObject: {e}")))?;
        self.images.push(xobject);
        let index = self.images.len() - 1;
        self.image_index.insert(data_hash, index);
        Ok(index)
    }

    /// Serialize the document
    ///
    /// Can be called more than once; every call builds a fresh PDF from the
    /// buffered pages, so identical input gives identical bytes.
    pub fn to_bytes(&mut self) -> Result<Vec<u8>> {
        if self.pages.is_empty() {
            return Err(PdfError::StructureError("Document has no pages".to_string()));
        }

        // 1. Subset fonts so text can be encoded with remapped glyph IDs
        for family in self.font_families.values_mut() {
            family.subset_used()?;
        }

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        // 2. Embed fonts and images once, shared by every page
        let mut font_ids: BTreeMap<&str, ObjectId> = BTreeMap::new();
        for ((family_name, weight), resource) in &self.font_resources {
            let family = self
                .font_families
                .get(family_name)
                .ok_or_else(|| PdfError::FontNotFound(family_name.clone()))?;
            let id = family.get_variant(*weight).embed(&mut doc)?;
            font_ids.insert(resource.as_str(), id);
        }

        let image_ids: Vec<ObjectId> = self
            .images
            .iter()
            .map(|image| image.embed(&mut doc))
            .collect();

        // 3. One content stream and resource dictionary per page
        let mut kids = Vec::with_capacity(self.pages.len());
        for state in &self.pages {
            let content = self.encode_page(state)?;
            let contents_id = doc.add_object(Stream::new(Dictionary::new(), content));

            let mut fonts = Dictionary::new();
            for resource in &state.fonts {
                let id = font_ids.get(resource.as_str()).ok_or_else(|| {
                    PdfError::StructureError(format!("Unknown font resource {resource}"))
                })?;
                fonts.set(resource.as_bytes().to_vec(), Object::Reference(*id));
            }

            let mut xobjects = Dictionary::new();
            for &index in &state.images {
                xobjects.set(
                    image_resource_name(index).into_bytes(),
                    Object::Reference(image_ids[index]),
                );
            }

            let mut resources = Dictionary::new();
            if !fonts.is_empty() {
                resources.set("Font", Object::Dictionary(fonts));
            }
            if !xobjects.is_empty() {
                resources.set("XObject", Object::Dictionary(xobjects));
            }

            let mut page_dict = Dictionary::new();
            page_dict.set("Type", Object::Name(b"Page".to_vec()));
            page_dict.set("Parent", Object::Reference(pages_id));
            page_dict.set(
                "MediaBox",
                Object::Array(vec![
                    0.into(),
                    0.into(),
                    Object::Real(self.page_size.width as _),
                    Object::Real(self.page_size.height as _),
                ]),
            );
            page_dict.set("Resources", Object::Dictionary(resources));
            page_dict.set("Contents", Object::Reference(contents_id));
            kids.push(Object::Reference(doc.add_object(page_dict)));
        }

        let count = kids.len() as i64;
        let mut pages_dict = Dictionary::new();
        pages_dict.set("Type", Object::Name(b"Pages".to_vec()));
        pages_dict.set("Kids", Object::Array(kids));
        pages_dict.set("Count", count);
        doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

        let mut catalog = Dictionary::new();
        catalog.set("Type", Object::Name(b"Catalog".to_vec()));
        catalog.set("Pages", Object::Reference(pages_id));
        let catalog_id = doc.add_object(catalog);
        doc.trailer.set("Root", Object::Reference(catalog_id));

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer)
            .map_err(|e| PdfError::SaveError(e.to_string()))?;

        Ok(buffer)
    }

    /// Encode buffered text with remapped glyph IDs and join all operators
    fn encode_page(&self, state: &PageState) -> Result<Vec<u8>> {
        let mut content = Vec::new();
        for op in &state.ops {
            match op {
                PageOp::Operators(bytes) => content.extend_from_slice(bytes),
                PageOp::Text(text_op) => {
                    let font_data = self
                        .font_families
                        .get(&text_op.family)
                        .ok_or_else(|| PdfError::FontNotFound(text_op.family.clone()))?
                        .get_variant(text_op.weight);

                    let ctx = TextRenderContext {
                        font_name: text_op.resource.clone(),
                        font_size: text_op.font_size,
                        text_width: font_data.text_width_points(&text_op.text, text_op.font_size),
                    };

                    // Position already includes the alignment offset
                    let text_hex = font_data.encode_text_hex(&text_op.text);
                    content.extend(generate_text_operators(
                        &text_hex,
                        text_op.x,
                        text_op.y,
                        Align::Left,
                        &ctx,
                    ));
                }
            }
        }
        Ok(content)
    }
}

fn image_resource_name(index: usize) -> String {
    format!("Im{}", index + 1)
}
