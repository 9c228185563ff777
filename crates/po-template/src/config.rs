//! Render configuration

use crate::{Result, TemplateError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Everything the renderer reads from disk
///
/// ```json
/// {
///   "assets": { "logo_left": "img/left.png", "footer": "img/footer.png" },
///   "font": { "family": "noto", "regular": "NotoSans-Regular.ttf", "bold": "NotoSans-Bold.ttf" }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub assets: AssetPaths,
    /// `None` uses the built-in Helvetica pair
    pub font: Option<FontConfig>,
}

/// Optional header and footer images
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetPaths {
    pub logo_left: PathBuf,
    pub logo_right: PathBuf,
    pub footer: PathBuf,
}

impl Default for AssetPaths {
    fn default() -> Self {
        Self {
            logo_left: PathBuf::from("Metasol_Logo_left.png"),
            logo_right: PathBuf::from("Metasol_Logo_Right.png"),
            footer: PathBuf::from("Footer.png"),
        }
    }
}

impl AssetPaths {
    /// Default file names looked up inside `dir`
    pub fn in_dir(dir: &Path) -> Self {
        let defaults = Self::default();
        Self {
            logo_left: dir.join(defaults.logo_left),
            logo_right: dir.join(defaults.logo_right),
            footer: dir.join(defaults.footer),
        }
    }
}

/// A TrueType family to embed instead of Helvetica
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontConfig {
    pub family: String,
    pub regular: PathBuf,
    /// Bold text falls back to the regular face when absent
    #[serde(default)]
    pub bold: Option<PathBuf>,
}

impl RenderConfig {
    /// Parse a configuration from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| TemplateError::ConfigParse(e.to_string()))
    }

    /// Read and parse a JSON configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| TemplateError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }
}
