//! Optional header and footer images

use crate::config::AssetPaths;
use pdf_core::{image_dimensions, ImageDimensions};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, warn};

/// The three images a purchase order can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AssetKind {
    LogoLeft,
    LogoRight,
    Footer,
}

/// Image bytes with their pixel size
#[derive(Debug, Clone, PartialEq)]
pub struct ImageAsset {
    pub data: Vec<u8>,
    pub dims: ImageDimensions,
}

impl ImageAsset {
    pub fn from_bytes(data: Vec<u8>) -> pdf_core::Result<Self> {
        let dims = image_dimensions(&data)?;
        Ok(Self { data, dims })
    }
}

/// Images available to the layout; absent kinds are simply not drawn
#[derive(Debug, Clone, Default)]
pub struct AssetSet {
    images: BTreeMap<AssetKind, ImageAsset>,
}

impl AssetSet {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Read every configured image
    ///
    /// Missing files are skipped; unreadable or undecodable ones are skipped
    /// with a warning.
    pub fn load(paths: &AssetPaths) -> Self {
        let mut set = Self::empty();
        for (kind, path) in [
            (AssetKind::LogoLeft, &paths.logo_left),
            (AssetKind::LogoRight, &paths.logo_right),
            (AssetKind::Footer, &paths.footer),
        ] {
            if let Some(asset) = load_one(kind, path) {
                set.images.insert(kind, asset);
            }
        }
        set
    }

    pub fn insert(&mut self, kind: AssetKind, asset: ImageAsset) {
        self.images.insert(kind, asset);
    }

    pub fn get(&self, kind: AssetKind) -> Option<&ImageAsset> {
        self.images.get(&kind)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

fn load_one(kind: AssetKind, path: &Path) -> Option<ImageAsset> {
    if !path.exists() {
        debug!(?kind, path = %path.display(), "Image asset not found, skipping");
        return None;
    }

    let data = match std::fs::read(path) {
        Ok(data) => data,
        Err(e) => {
            warn!(?kind, path = %path.display(), error = %e, "Failed to read image asset");
            return None;
        }
    };

    match ImageAsset::from_bytes(data) {
        Ok(asset) => Some(asset),
        Err(e) => {
            warn!(?kind, path = %path.display(), error = %e, "Unsupported image asset");
            None
        }
    }
}
