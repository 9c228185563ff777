//! PO Template - purchase-order model and fixed-layout rendering
//!
//! This crate provides:
//! - Order types for the local and foreign purchase-order variants
//! - A session that validates and numbers line items as they are added
//! - Totals (subtotal, VAT, grand total) in exact decimal arithmetic
//! - Template descriptions (blocks) for both variants
//! - A layout engine that turns a description plus order data into a display list
//! - A renderer that writes the display list to a PDF
//!
//! # Example
//!
//! ```ignore
//! use po_template::{ItemDraft, OrderSession, PurchaseOrderRenderer, RenderConfig};
//!
//! let mut session = OrderSession::new();
//! session.add_local_item(&ItemDraft::new("Licence", "EA", "2", "100.00"))?;
//! let order = session.local_order(header);
//!
//! let renderer = PurchaseOrderRenderer::from_config(&RenderConfig::default())?;
//! let rendered = renderer.render(&order)?;
//! std::fs::write(&rendered.file_name, &rendered.bytes)?;
//! ```

mod assets;
pub mod blocks;
mod config;
mod fonts;
pub mod layout;
mod order;
pub mod parser;
mod renderer;
mod schema;
mod session;
mod table;
mod totals;
pub mod variants;

pub use assets::{AssetKind, AssetSet, ImageAsset};
pub use config::{AssetPaths, FontConfig, RenderConfig};
pub use fonts::{FontSet, TextMeasure};
pub use layout::{DrawOp, LaidOutDocument, LaidOutPage, LayoutContext, LayoutEngine, Region};
pub use order::{
    Consignee, ForeignLineItem, ForeignPurchaseOrderHeader, ItemDraft, LineItem, OrderRequest,
    PurchaseOrder, PurchaseOrderHeader, SupplierContact, Variant,
};
pub use renderer::{PurchaseOrderRenderer, RenderedDocument};
pub use schema::*;
pub use session::OrderSession;
pub use totals::{PricedItem, TaxTreatment, Totals};

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while building or rendering a purchase order
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    ConfigParse(String),

    #[error("Failed to register font {path}: {source}")]
    FontRegistration {
        path: PathBuf,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Malformed {field}: {value:?}")]
    MalformedNumericField { field: &'static str, value: String },

    #[error("Invalid line item: {0}")]
    InvalidLineItem(String),

    #[error("Order total out of range")]
    TotalOutOfRange,

    #[error("Invalid data binding: {0}")]
    BindingError(String),

    #[error("Render error: {0}")]
    RenderError(String),

    #[error("PDF error: {0}")]
    PdfError(#[from] pdf_core::PdfError),

    #[error("Text error: {0}")]
    TextError(#[from] po_text::TextError),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type for template operations
pub type Result<T> = std::result::Result<T, TemplateError>;
