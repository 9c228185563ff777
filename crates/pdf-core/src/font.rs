//! Font handling for PDF documents

use crate::standard::StandardFont;
use crate::{PdfError, Result};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::collections::{BTreeMap, BTreeSet};
use subsetter::GlyphRemapper;

/// Font weight
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum FontWeight {
    #[default]
    Regular,
    Bold,
}

/// Where the glyphs of a font come from
#[derive(Debug, Clone)]
enum FontProgram {
    /// Built-in Type1 font, not embedded
    Standard(StandardFont),
    /// Embedded TrueType font (Type0 / CIDFontType2, Identity-H)
    TrueType {
        ttf_data: Vec<u8>,
        face: Option<ttf_parser::Face<'static>>,
    },
}

/// Result of subsetting a TrueType program
#[derive(Debug, Clone)]
struct FontSubset {
    data: Vec<u8>,
    /// original glyph id -> glyph id inside `data`
    gid_map: BTreeMap<u16, u16>,
}

/// Font data structure for document fonts
#[derive(Debug, Clone)]
pub struct FontData {
    /// Font name/identifier, also used as `/BaseFont`
    pub name: String,
    /// Characters used (for subsetting and ToUnicode)
    pub used_chars: BTreeSet<char>,
    program: FontProgram,
    subset: Option<FontSubset>,
}

/// PDF objects generated for an embedded TrueType font
struct FontObjects {
    type0_font: Dictionary,
    cid_font: Dictionary,
    font_descriptor: Dictionary,
    font_file_stream: Stream,
    tounicode_stream: Stream,
}

/// Font family with a regular and an optional bold variant
#[derive(Debug, Clone)]
pub struct FontFamily {
    pub regular: FontData,
    pub bold: Option<FontData>,
}

impl FontFamily {
    /// The built-in Helvetica / Helvetica-Bold pair
    pub fn helvetica() -> Self {
        Self {
            regular: FontData::standard(StandardFont::Helvetica),
            bold: Some(FontData::standard(StandardFont::HelveticaBold)),
        }
    }

    /// Get the font data for the specified weight, falling back to regular
    pub fn get_variant(&self, weight: FontWeight) -> &FontData {
        match weight {
            FontWeight::Bold => self.bold.as_ref().unwrap_or(&self.regular),
            FontWeight::Regular => &self.regular,
        }
    }

    /// Mutable counterpart of [`FontFamily::get_variant`]
    pub fn get_variant_mut(&mut self, weight: FontWeight) -> &mut FontData {
        match weight {
            FontWeight::Bold if self.bold.is_some() => {
                self.bold.as_mut().unwrap_or(&mut self.regular)
            }
            _ => &mut self.regular,
        }
    }

    /// Weight that will actually be used for a request (bold falls back to regular)
    pub fn resolve_weight(&self, weight: FontWeight) -> FontWeight {
        match weight {
            FontWeight::Bold if self.bold.is_some() => FontWeight::Bold,
            _ => FontWeight::Regular,
        }
    }

    fn variants_mut(&mut self) -> impl Iterator<Item = &mut FontData> {
        std::iter::once(&mut self.regular).chain(self.bold.as_mut())
    }
}

/// Builder for TrueType font families
pub struct FontFamilyBuilder {
    regular: Option<Vec<u8>>,
    bold: Option<Vec<u8>>,
}

impl FontFamilyBuilder {
    pub fn new() -> Self {
        Self {
            regular: None,
            bold: None,
        }
    }

    pub fn regular(mut self, ttf_data: Vec<u8>) -> Self {
        self.regular = Some(ttf_data);
        self
    }

    pub fn bold(mut self, ttf_data: Vec<u8>) -> Self {
        self.bold = Some(ttf_data);
        self
    }

    /// Build the FontFamily from the provided TTF data
    pub fn build(self, family_name: &str) -> Result<FontFamily> {
        let regular = match self.regular {
            Some(data) => FontData::from_ttf(&format!("{family_name}-Regular"), &data)?,
            None => {
                return Err(PdfError::FontParseError(
                    "FontFamily must have at least a regular variant".to_string(),
                ))
            }
        };

        let bold = self
            .bold
            .map(|data| FontData::from_ttf(&format!("{family_name}-Bold"), &data))
            .transpose()?;

        Ok(FontFamily { regular, bold })
    }
}

impl Default for FontFamilyBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FontData {
    /// Create font data for a built-in standard font
    pub fn standard(font: StandardFont) -> Self {
        Self {
            name: font.base_font().to_string(),
            used_chars: BTreeSet::new(),
            program: FontProgram::Standard(font),
            subset: None,
        }
    }

    /// Create font data from TTF bytes
    ///
    /// # Arguments
    /// * `name` - Font identifier (spaces are not allowed in `/BaseFont`)
    /// * `ttf_data` - TrueType font file bytes
    pub fn from_ttf(name: &str, ttf_data: &[u8]) -> Result<Self> {
        let data = ttf_data.to_vec();

        // The face borrows for 'static: families are built once per process
        // and shared by every document.
        let static_data: &'static [u8] = Box::leak(data.clone().into_boxed_slice());

        let face = ttf_parser::Face::parse(static_data, 0)
            .map_err(|e| PdfError::FontParseError(format!("{name}: {e:?}")))?;

        Ok(Self {
            name: name.replace(' ', "-"),
            used_chars: BTreeSet::new(),
            program: FontProgram::TrueType {
                ttf_data: data,
                face: Some(face),
            },
            subset: None,
        })
    }

    /// Whether the font program is written into the file
    pub fn is_embedded(&self) -> bool {
        matches!(self.program, FontProgram::TrueType { .. })
    }

    /// Add characters to the used set (for subsetting)
    pub fn add_chars(&mut self, text: &str) {
        self.used_chars.extend(text.chars());
    }

    fn face(&self) -> Option<&ttf_parser::Face<'static>> {
        match &self.program {
            FontProgram::TrueType { face, .. } => face.as_ref(),
            FontProgram::Standard(_) => None,
        }
    }

    /// Get glyph ID for a character (TrueType only)
    pub fn glyph_id(&self, c: char) -> Option<u16> {
        self.face()
            .and_then(|face| face.glyph_index(c).map(|id| id.0))
    }

    /// Get glyph advance width in font units
    pub fn glyph_advance(&self, c: char) -> Option<u16> {
        match &self.program {
            FontProgram::Standard(font) => Some(font.char_width(c)),
            FontProgram::TrueType { face, .. } => face.as_ref().and_then(|face| {
                let glyph_id = face.glyph_index(c)?;
                face.glyph_hor_advance(glyph_id)
            }),
        }
    }

    /// Get font units per em
    pub fn units_per_em(&self) -> u16 {
        self.face().map(|face| face.units_per_em()).unwrap_or(1000)
    }

    /// Get font ascender
    pub fn ascender(&self) -> i16 {
        self.face().map(|face| face.ascender()).unwrap_or(718)
    }

    /// Get font descender
    pub fn descender(&self) -> i16 {
        self.face().map(|face| face.descender()).unwrap_or(-207)
    }

    /// Calculate text width in font units
    pub fn text_width(&self, text: &str) -> u32 {
        text.chars()
            .filter_map(|c| self.glyph_advance(c))
            .map(u32::from)
            .sum()
    }

    /// Calculate text width in points for a given font size
    pub fn text_width_points(&self, text: &str, font_size: f32) -> f64 {
        let width = self.text_width(text) as f64;
        let units_per_em = self.units_per_em() as f64;
        width / units_per_em * font_size as f64
    }

    /// Create a subset holding only the glyphs of `used_chars`
    ///
    /// A no-op for standard fonts. Must run before [`FontData::encode_text_hex`]
    /// and [`FontData::embed`] so both see the remapped glyph ids.
    pub fn create_subset(&mut self) -> Result<()> {
        let FontProgram::TrueType { ttf_data, .. } = &self.program else {
            return Ok(());
        };
        if self.face().is_none() {
            return Ok(());
        }

        let mut remapper = GlyphRemapper::new();
        let mut gid_map = BTreeMap::new();
        gid_map.insert(0, remapper.remap(0));
        for c in &self.used_chars {
            if let Some(gid) = self.glyph_id(*c) {
                gid_map.insert(gid, remapper.remap(gid));
            }
        }

        let data = subsetter::subset(ttf_data, 0, &remapper)
            .map_err(|e| PdfError::FontSubsetError(format!("{}: {e:?}", self.name)))?;

        self.subset = Some(FontSubset { data, gid_map });
        Ok(())
    }

    /// Glyph id as written to the content stream (after subsetting, if any)
    fn output_gid(&self, c: char) -> u16 {
        let gid = self.glyph_id(c).unwrap_or(0);
        match &self.subset {
            Some(subset) => subset.gid_map.get(&gid).copied().unwrap_or(0),
            None => gid,
        }
    }

    /// Encode text as hex string for the PDF Tj operator
    pub fn encode_text_hex(&self, text: &str) -> String {
        if let FontProgram::Standard(font) = &self.program {
            return font.encode_text_hex(text);
        }
        let mut result = String::with_capacity(text.len() * 4 + 2);
        result.push('<');
        for c in text.chars() {
            result.push_str(&format!("{:04X}", self.output_gid(c)));
        }
        result.push('>');
        result
    }

    /// Write this font into `doc` and return the object to reference from page resources
    pub fn embed(&self, doc: &mut Document) -> Result<ObjectId> {
        if let FontProgram::Standard(font) = &self.program {
            return Ok(doc.add_object(font.to_pdf_dictionary()));
        }

        let objects = self.to_pdf_objects();

        let font_file_id = doc.add_object(objects.font_file_stream);

        let mut font_descriptor = objects.font_descriptor;
        font_descriptor.set("FontFile2", Object::Reference(font_file_id));
        let font_descriptor_id = doc.add_object(font_descriptor);

        let mut cid_font = objects.cid_font;
        cid_font.set("FontDescriptor", Object::Reference(font_descriptor_id));
        let cid_font_id = doc.add_object(cid_font);

        let tounicode_id = doc.add_object(objects.tounicode_stream);

        let mut type0_font = objects.type0_font;
        type0_font.set(
            "DescendantFonts",
            Object::Array(vec![Object::Reference(cid_font_id)]),
        );
        type0_font.set("ToUnicode", Object::Reference(tounicode_id));

        Ok(doc.add_object(type0_font))
    }

    /// Scale a value in font units to PDF glyph space (1/1000 em)
    fn to_glyph_space(&self, value: i32) -> i32 {
        let upem = self.units_per_em().max(1) as i32;
        (value * 1000 + upem / 2 * value.signum()) / upem
    }

    /// `/BaseFont` for the embedded program; subsets carry a six-letter tag
    fn base_font_name(&self) -> String {
        match &self.subset {
            Some(subset) => format!("{}+{}", subset_tag(&subset.gid_map), self.name),
            None => self.name.clone(),
        }
    }

    fn to_pdf_objects(&self) -> FontObjects {
        let font_name = Object::Name(self.base_font_name().into_bytes());

        let tounicode_content = self.generate_tounicode_cmap();
        let tounicode_stream = Stream::new(Dictionary::new(), tounicode_content.into_bytes());

        let program = match (&self.subset, &self.program) {
            (Some(subset), _) => subset.data.clone(),
            (None, FontProgram::TrueType { ttf_data, .. }) => ttf_data.clone(),
            (None, FontProgram::Standard(_)) => Vec::new(),
        };
        let font_file_stream = Stream::new(
            Dictionary::from_iter(vec![("Length1", (program.len() as i64).into())]),
            program,
        );

        let ascent = self.to_glyph_space(self.ascender() as i32);
        let descent = self.to_glyph_space(self.descender() as i32);
        let font_bbox: Vec<Object> = match self.face().map(|face| face.global_bounding_box()) {
            Some(bbox) => vec![
                self.to_glyph_space(bbox.x_min as i32).into(),
                self.to_glyph_space(bbox.y_min as i32).into(),
                self.to_glyph_space(bbox.x_max as i32).into(),
                self.to_glyph_space(bbox.y_max as i32).into(),
            ],
            None => vec![0.into(), descent.into(), 1000.into(), ascent.into()],
        };

        let font_descriptor = Dictionary::from_iter(vec![
            ("Type", "FontDescriptor".into()),
            ("FontName", font_name.clone()),
            ("Flags", 4.into()),
            ("FontBBox", font_bbox.into()),
            ("ItalicAngle", 0.into()),
            ("Ascent", ascent.into()),
            ("Descent", descent.into()),
            ("CapHeight", ascent.into()),
            ("StemV", 80.into()),
        ]);

        let cid_system_info = Dictionary::from_iter(vec![
            ("Registry", Object::string_literal("Adobe")),
            ("Ordering", Object::string_literal("Identity")),
            ("Supplement", 0.into()),
        ]);

        let cid_font = Dictionary::from_iter(vec![
            ("Type", "Font".into()),
            ("Subtype", "CIDFontType2".into()),
            ("BaseFont", font_name.clone()),
            ("CIDSystemInfo", cid_system_info.into()),
            ("CIDToGIDMap", "Identity".into()),
            ("W", self.generate_widths_array().into()),
            ("DW", 1000.into()),
        ]);

        let type0_font = Dictionary::from_iter(vec![
            ("Type", "Font".into()),
            ("Subtype", "Type0".into()),
            ("BaseFont", font_name),
            ("Encoding", "Identity-H".into()),
        ]);

        FontObjects {
            type0_font,
            cid_font,
            font_descriptor,
            font_file_stream,
            tounicode_stream,
        }
    }

    /// Generate /W array: `[gid [width] gid [width] ...]` in output glyph ids
    fn generate_widths_array(&self) -> Vec<Object> {
        let mut widths = Vec::new();
        let Some(face) = self.face() else {
            return widths;
        };

        let glyphs: BTreeMap<u16, u16> = self
            .used_chars
            .iter()
            .filter_map(|&c| self.glyph_id(c).map(|gid| (self.output_gid(c), gid)))
            .collect();

        for (output_gid, gid) in glyphs {
            let advance = face
                .glyph_hor_advance(ttf_parser::GlyphId(gid))
                .unwrap_or(0);
            widths.push((output_gid as i64).into());
            widths.push(vec![(self.to_glyph_space(advance as i32) as i64).into()].into());
        }

        widths
    }

    /// Generate ToUnicode CMap stream content
    fn generate_tounicode_cmap(&self) -> String {
        let mut cmap = String::new();

        cmap.push_str("/CIDInit /ProcSet findresource begin\n");
        cmap.push_str("12 dict begin\n");
        cmap.push_str("begincmap\n");
        cmap.push_str("/CIDSystemInfo << /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def\n");
        cmap.push_str("/CMapName /Adobe-Identity-UCS def\n");
        cmap.push_str("/CMapType 2 def\n");
        cmap.push_str("1 begincodespacerange\n");
        cmap.push_str("<0000> <FFFF>\n");
        cmap.push_str("endcodespacerange\n");

        let chars: Vec<char> = self.used_chars.iter().copied().collect();

        // bfchar sections are limited to 100 entries
        for chunk in chars.chunks(100) {
            cmap.push_str(&format!("{} beginbfchar\n", chunk.len()));
            for c in chunk {
                let mut utf16 = [0u16; 2];
                let unicode: String = c
                    .encode_utf16(&mut utf16)
                    .iter()
                    .map(|unit| format!("{unit:04X}"))
                    .collect();
                cmap.push_str(&format!("<{:04X}> <{unicode}>\n", self.output_gid(*c)));
            }
            cmap.push_str("endbfchar\n");
        }

        cmap.push_str("endcmap\n");
        cmap.push_str("CMapName currentdict /CMap defineresource pop\n");
        cmap.push_str("end\n");
        cmap.push_str("end\n");

        cmap
    }
}

/// Deterministic six-letter subset tag derived from the glyph set (FNV-1a)
fn subset_tag(gid_map: &BTreeMap<u16, u16>) -> String {
    let mut hash: u32 = 0x811C_9DC5;
    for gid in gid_map.keys() {
        for byte in gid.to_be_bytes() {
            hash ^= byte as u32;
            hash = hash.wrapping_mul(0x0100_0193);
        }
    }
    (0..6)
        .map(|_| {
            let letter = (b'A' + (hash % 26) as u8) as char;
            hash /= 26;
            letter
        })
        .collect()
}

impl FontFamily {
    /// Subset every variant that was used
    pub(crate) fn subset_used(&mut self) -> Result<()> {
        for variant in self.variants_mut() {
            if !variant.used_chars.is_empty() {
                variant.create_subset()?;
            }
        }
        Ok(())
    }
}
