//! Process-wide font registry

use crate::config::FontConfig;
use crate::schema::FontSpec;
use crate::{Result, TemplateError};
use once_cell::sync::OnceCell;
use pdf_core::{FontFamily, FontFamilyBuilder};
use std::path::Path;
use tracing::{debug, info};

/// Family name used when no TrueType font is configured
pub const DEFAULT_FAMILY: &str = "helvetica";

static GLOBAL_FONTS: OnceCell<FontSet> = OnceCell::new();

/// Width of rendered text, in points
pub trait TextMeasure {
    fn text_width(&self, text: &str, font: FontSpec) -> f64;
}

/// The single font family every document is set in
#[derive(Debug, Clone)]
pub struct FontSet {
    name: String,
    family: FontFamily,
}

impl FontSet {
    /// The built-in Helvetica / Helvetica-Bold pair
    pub fn helvetica() -> Self {
        Self {
            name: DEFAULT_FAMILY.to_string(),
            family: FontFamily::helvetica(),
        }
    }

    /// Load the configured TrueType family, or Helvetica for `None`
    ///
    /// A configured file that cannot be read or parsed is a
    /// [`TemplateError::FontRegistration`].
    pub fn load(config: Option<&FontConfig>) -> Result<Self> {
        let Some(config) = config else {
            return Ok(Self::helvetica());
        };

        let mut builder = FontFamilyBuilder::new().regular(read_font(&config.regular)?);
        if let Some(bold) = &config.bold {
            builder = builder.bold(read_font(bold)?);
        }

        let family = builder
            .build(&config.family)
            .map_err(|e| TemplateError::FontRegistration {
                path: config.regular.clone(),
                source: e.to_string().into(),
            })?;

        info!(family = %config.family, "Registered font family");
        Ok(Self {
            name: config.family.clone(),
            family,
        })
    }

    /// Fonts registered once for the lifetime of the process
    ///
    /// The first successful call decides the family; later configurations
    /// are ignored.
    pub fn global(config: Option<&FontConfig>) -> Result<&'static FontSet> {
        GLOBAL_FONTS.get_or_try_init(|| {
            debug!("Initialising process font registry");
            Self::load(config)
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fresh copy of the family for one document
    pub fn family(&self) -> FontFamily {
        self.family.clone()
    }
}

impl TextMeasure for FontSet {
    fn text_width(&self, text: &str, font: FontSpec) -> f64 {
        self.family
            .get_variant(font.weight)
            .text_width_points(text, font.size)
    }
}

fn read_font(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| TemplateError::FontRegistration {
        path: path.to_path_buf(),
        source: Box::new(e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_default_is_helvetica() {
        let fonts = FontSet::load(None).unwrap();
        assert_eq!(fonts.name(), DEFAULT_FAMILY);
        assert!(!fonts.family().regular.is_embedded());
    }

    #[test]
    fn test_bold_is_wider() {
        let fonts = FontSet::helvetica();
        let regular = fonts.text_width("PURCHASE ORDER", FontSpec::regular(16.0));
        let bold = fonts.text_width("PURCHASE ORDER", FontSpec::bold(16.0));
        assert!(bold > regular);
        assert!(regular > 0.0);
    }

    #[test]
    fn test_missing_font_file_is_fatal() {
        let config = FontConfig {
            family: "noto".to_string(),
            regular: PathBuf::from("/definitely/not/here.ttf"),
            bold: None,
        };
        let err = FontSet::load(Some(&config)).unwrap_err();
        assert!(matches!(err, TemplateError::FontRegistration { .. }));
    }

    #[test]
    fn test_unparsable_font_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.ttf");
        std::fs::write(&path, b"not a font").unwrap();

        let config = FontConfig {
            family: "broken".to_string(),
            regular: path,
            bold: None,
        };
        let err = FontSet::load(Some(&config)).unwrap_err();
        assert!(matches!(err, TemplateError::FontRegistration { .. }));
    }

    #[test]
    fn test_global_is_shared() {
        let a = FontSet::global(None).unwrap();
        let b = FontSet::global(None).unwrap();
        assert!(std::ptr::eq(a, b));
    }
}
