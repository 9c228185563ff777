//! Image handling for PDF documents

use crate::{PdfError, Result};
use image::{DynamicImage, ImageDecoder, ImageReader};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::io::{Cursor, Write};

impl From<image::ImageError> for PdfError {
    fn from(err: image::ImageError) -> Self {
        PdfError::ImageError(err.to_string())
    }
}

/// Detected image format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
}

/// How an image is scaled into its target box, aspect ratio kept
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageScaleMode {
    /// Take the target width; height follows
    FitWidth,
    /// Largest size that fits inside the target box
    FitBox,
}

/// Pixel dimensions of an image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

/// Calculate display dimensions based on scaling mode
///
/// Returns `(width, height)` in points.
pub fn calculate_scaled_dimensions(
    original_width: u32,
    original_height: u32,
    target_width: f64,
    target_height: f64,
    mode: ImageScaleMode,
) -> (f64, f64) {
    if original_width == 0 || original_height == 0 {
        return (target_width, target_height);
    }
    match mode {
        ImageScaleMode::FitWidth => {
            let aspect = original_height as f64 / original_width as f64;
            (target_width, target_width * aspect)
        }
        ImageScaleMode::FitBox => {
            let width_ratio = target_width / original_width as f64;
            let height_ratio = target_height / original_height as f64;
            let scale = width_ratio.min(height_ratio);
            (
                original_width as f64 * scale,
                original_height as f64 * scale,
            )
        }
    }
}

/// Detect image format from magic bytes
pub fn detect_format(data: &[u8]) -> Result<ImageFormat> {
    if data.len() < 8 {
        return Err(PdfError::ImageError("Image data too short".to_string()));
    }

    if data[0] == 0xFF && data[1] == 0xD8 && data[2] == 0xFF {
        return Ok(ImageFormat::Jpeg);
    }

    if data[0..8] == [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A] {
        return Ok(ImageFormat::Png);
    }

    Err(PdfError::ImageError("Unknown image format".to_string()))
}

/// Get image dimensions from the file header without decoding pixels
pub fn image_dimensions(data: &[u8]) -> Result<ImageDimensions> {
    match detect_format(data)? {
        ImageFormat::Jpeg => {
            let info = get_jpeg_info(data)?;
            Ok(ImageDimensions {
                width: info.width,
                height: info.height,
            })
        }
        ImageFormat::Png => get_png_dimensions(data),
    }
}

/// JPEG info including dimensions and color components
#[derive(Debug, Clone, Copy)]
struct JpegInfo {
    width: u32,
    height: u32,
    num_components: u8,
}

/// Scan JPEG markers for the first SOFn segment
fn get_jpeg_info(data: &[u8]) -> Result<JpegInfo> {
    // SOF layout after the marker: length(2) precision(1) height(2) width(2) components(1)
    let mut i = 2;
    while i + 10 < data.len() {
        if data[i] != 0xFF {
            i += 1;
            continue;
        }

        let marker = data[i + 1];

        // DHT (C4), JPG (C8) and DAC (CC) share the range but are not frame headers
        if (0xC0..=0xCF).contains(&marker) && marker != 0xC4 && marker != 0xC8 && marker != 0xCC {
            let height = u16::from_be_bytes([data[i + 5], data[i + 6]]) as u32;
            let width = u16::from_be_bytes([data[i + 7], data[i + 8]]) as u32;
            let num_components = data[i + 9];
            return Ok(JpegInfo {
                width,
                height,
                num_components,
            });
        }

        let length = u16::from_be_bytes([data[i + 2], data[i + 3]]) as usize;
        if length < 2 {
            break;
        }
        i += 2 + length;
    }

    Err(PdfError::ImageError("Could not parse JPEG info".to_string()))
}

/// Get PNG dimensions from the IHDR chunk
fn get_png_dimensions(data: &[u8]) -> Result<ImageDimensions> {
    if data.len() < 24 {
        return Err(PdfError::ImageError("PNG data too short".to_string()));
    }

    if &data[12..16] != b"IHDR" {
        return Err(PdfError::ImageError(
            "Invalid PNG: IHDR not found".to_string(),
        ));
    }

    let width = u32::from_be_bytes([data[16], data[17], data[18], data[19]]);
    let height = u32::from_be_bytes([data[20], data[21], data[22], data[23]]);

    Ok(ImageDimensions { width, height })
}

/// Image XObject for PDF embedding
#[derive(Debug, Clone)]
pub struct ImageXObject {
    pub width: u32,
    pub height: u32,
    /// "DeviceRGB", "DeviceGray" or "DeviceCMYK"
    pub color_space: String,
    pub bits_per_component: u8,
    /// "DCTDecode" for JPEG, "FlateDecode" for decoded PNG pixels
    pub filter: String,
    /// Encoded image data
    pub data: Vec<u8>,
    /// Flate-compressed 8-bit alpha channel, written as an /SMask
    pub soft_mask: Option<Vec<u8>>,
    /// Inverted CMYK (Adobe JPEGs) needs a /Decode array
    pub invert_cmyk: bool,
}

impl ImageXObject {
    /// Build an XObject from JPEG or PNG bytes
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        match detect_format(data)? {
            ImageFormat::Jpeg => Self::from_jpeg(data),
            ImageFormat::Png => Self::from_png(data),
        }
    }

    /// JPEG is passed through with DCTDecode.
    pub fn from_jpeg(data: &[u8]) -> Result<Self> {
        let info = get_jpeg_info(data)?;

        let (color_space, invert_cmyk) = match info.num_components {
            1 => ("DeviceGray", false),
            4 => ("DeviceCMYK", true),
            _ => ("DeviceRGB", false),
        };

        Ok(Self {
            width: info.width,
            height: info.height,
            color_space: color_space.to_string(),
            bits_per_component: 8,
            filter: "DCTDecode".to_string(),
            data: data.to_vec(),
            soft_mask: None,
            invert_cmyk,
        })
    }

    /// PNG is decoded to 8-bit samples and re-compressed with FlateDecode.
    /// Any alpha channel is split out into a soft mask.
    pub fn from_png(data: &[u8]) -> Result<Self> {
        let reader = ImageReader::new(Cursor::new(data)).with_guessed_format()?;
        let decoder = reader.into_decoder()?;

        let (width, height) = decoder.dimensions();
        let color_type = decoder.color_type();
        let image = DynamicImage::from_decoder(decoder)?;

        let (samples, alpha, color_space) = match color_type {
            image::ColorType::L8 | image::ColorType::L16 => {
                (image.to_luma8().into_raw(), None, "DeviceGray")
            }
            image::ColorType::La8 | image::ColorType::La16 => {
                let la = image.to_luma_alpha8();
                let mut gray = Vec::with_capacity((width * height) as usize);
                let mut alpha = Vec::with_capacity((width * height) as usize);
                for pixel in la.pixels() {
                    gray.push(pixel[0]);
                    alpha.push(pixel[1]);
                }
                (gray, Some(alpha), "DeviceGray")
            }
            image::ColorType::Rgba8 | image::ColorType::Rgba16 | image::ColorType::Rgba32F => {
                let rgba = image.to_rgba8();
                let mut rgb = Vec::with_capacity((width * height * 3) as usize);
                let mut alpha = Vec::with_capacity((width * height) as usize);
                for pixel in rgba.pixels() {
                    rgb.extend_from_slice(&pixel.0[..3]);
                    alpha.push(pixel[3]);
                }
                (rgb, Some(alpha), "DeviceRGB")
            }
            _ => (image.to_rgb8().into_raw(), None, "DeviceRGB"),
        };

        // Fully opaque masks are dropped
        let soft_mask = match alpha {
            Some(alpha) if alpha.iter().any(|&a| a != 255) => Some(deflate(&alpha)?),
            _ => None,
        };

        Ok(Self {
            width,
            height,
            color_space: color_space.to_string(),
            bits_per_component: 8,
            filter: "FlateDecode".to_string(),
            data: deflate(&samples)?,
            soft_mask,
            invert_cmyk: false,
        })
    }

    /// Convert to a lopdf Stream object (without the soft mask reference)
    pub fn to_pdf_stream(&self) -> Stream {
        let mut dict = Dictionary::new();

        dict.set("Type", Object::Name(b"XObject".to_vec()));
        dict.set("Subtype", Object::Name(b"Image".to_vec()));
        dict.set("Width", self.width as i64);
        dict.set("Height", self.height as i64);
        dict.set("ColorSpace", Object::Name(self.color_space.as_bytes().to_vec()));
        dict.set("BitsPerComponent", self.bits_per_component as i64);
        dict.set("Filter", Object::Name(self.filter.as_bytes().to_vec()));
        if self.invert_cmyk {
            dict.set(
                "Decode",
                Object::Array([1, 0, 1, 0, 1, 0, 1, 0].iter().map(|&v| Object::Integer(v)).collect()),
            );
        }

        Stream::new(dict, self.data.clone())
    }

    /// Add the image (and its soft mask, if any) to `doc`
    pub fn embed(&self, doc: &mut Document) -> ObjectId {
        let mut stream = self.to_pdf_stream();

        if let Some(mask) = &self.soft_mask {
            let mut mask_dict = Dictionary::new();
            mask_dict.set("Type", Object::Name(b"XObject".to_vec()));
            mask_dict.set("Subtype", Object::Name(b"Image".to_vec()));
            mask_dict.set("Width", self.width as i64);
            mask_dict.set("Height", self.height as i64);
            mask_dict.set("ColorSpace", Object::Name(b"DeviceGray".to_vec()));
            mask_dict.set("BitsPerComponent", 8);
            mask_dict.set("Filter", Object::Name(b"FlateDecode".to_vec()));
            let mask_id = doc.add_object(Stream::new(mask_dict, mask.clone()));
            stream.dict.set("SMask", Object::Reference(mask_id));
        }

        doc.add_object(stream)
    }
}

fn deflate(raw: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(raw)?;
    Ok(encoder.finish()?)
}

/// Generate operators to draw an image resource
///
/// `(x, y)` is the lower-left corner in PDF coordinates.
pub fn generate_image_operators(
    image_name: &str,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
) -> Vec<u8> {
    use crate::text::fmt_num;

    format!(
        "q\n{} 0 0 {} {} {} cm\n/{image_name} Do\nQ\n",
        fmt_num(width),
        fmt_num(height),
        fmt_num(x),
        fmt_num(y)
    )
    .into_bytes()
}
