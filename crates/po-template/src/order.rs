//! Purchase-order data model

use crate::totals::{TaxTreatment, Totals};
use crate::{OrderSession, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};
use std::fmt;

/// File name used for every foreign purchase order
pub const FOREIGN_FILE_NAME: &str = "Foreign_Purchase_Order.pdf";

/// Document schema selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    Local,
    Foreign,
}

impl Variant {
    pub fn as_str(self) -> &'static str {
        match self {
            Variant::Local => "local",
            Variant::Foreign => "foreign",
        }
    }

    /// Tax applied on top of the subtotal
    pub fn tax_treatment(self) -> TaxTreatment {
        match self {
            Variant::Local => TaxTreatment::local_vat(),
            Variant::Foreign => TaxTreatment::Exempt,
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Header of a local purchase order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PurchaseOrderHeader {
    // Requester
    pub name: String,
    pub designation: String,
    pub vat_number: String,
    pub mobile: String,
    pub company_name: String,

    // PO identifiers
    pub po_number: String,
    /// `None` prints the render date
    pub po_date: Option<NaiveDate>,
    pub fax: String,
    pub pr_number: String,
    pub supplier_name: String,
    pub quotation_ref: String,
    pub telephone: String,
    pub email: String,

    pub subject: String,
}

/// Supplier contact block of a foreign purchase order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SupplierContact {
    pub to: String,
    pub designation: String,
    pub company: String,
    pub telephone: String,
    pub email: String,
    pub fax: String,
    pub mobile: String,
    pub address: String,
}

/// Consignee / notify party of a foreign purchase order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Consignee {
    pub name: String,
    pub address: String,
    pub contact: String,
    pub telephone: String,
    pub fax: String,
    pub email: String,
}

/// Header of a foreign purchase order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForeignPurchaseOrderHeader {
    pub po_number: String,
    pub po_date: Option<NaiveDate>,
    pub pr_number: String,
    pub supplier: SupplierContact,
    pub subject: String,
    pub consignee: Consignee,
}

/// One priced row of a local purchase order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// 1-based, contiguous within an order
    pub sequence: u32,
    pub description: String,
    pub unit: String,
    pub quantity: u32,
    pub unit_cost: Decimal,
    /// `quantity × unit_cost`, rounded to 2 places when the item was added
    pub total_price: Decimal,
}

/// One priced row of a foreign purchase order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignLineItem {
    pub sequence: u32,
    pub hs_code: String,
    pub description: String,
    pub unit: String,
    pub quantity: u32,
    pub unit_cost: Decimal,
    pub total_price: Decimal,
}

/// A line item as typed into the form, before validation
///
/// `quantity` and `unit_cost` stay raw text until [`OrderSession`] coerces
/// them; JSON numbers are accepted too.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemDraft {
    /// Foreign orders only
    pub hs_code: String,
    pub description: String,
    pub unit: String,
    #[serde(deserialize_with = "raw_text")]
    pub quantity: String,
    #[serde(deserialize_with = "raw_text")]
    pub unit_cost: String,
}

impl ItemDraft {
    pub fn new(description: &str, unit: &str, quantity: &str, unit_cost: &str) -> Self {
        Self {
            hs_code: String::new(),
            description: description.to_string(),
            unit: unit.to_string(),
            quantity: quantity.to_string(),
            unit_cost: unit_cost.to_string(),
        }
    }

    pub fn with_hs_code(mut self, hs_code: &str) -> Self {
        self.hs_code = hs_code.to_string();
        self
    }
}

/// Accept `"12.50"`, `12.5` or `null` for a numeric form field
fn raw_text<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(D::Error::custom(format!(
            "expected a number or a string, got {other}"
        ))),
    }
}

/// Order as submitted: header plus unvalidated item drafts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "variant", rename_all = "lowercase")]
pub enum OrderRequest {
    Local {
        #[serde(default)]
        header: PurchaseOrderHeader,
        #[serde(default)]
        items: Vec<ItemDraft>,
    },
    Foreign {
        #[serde(default)]
        header: ForeignPurchaseOrderHeader,
        #[serde(default)]
        items: Vec<ItemDraft>,
    },
}

impl OrderRequest {
    /// Parse an order request from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn variant(&self) -> Variant {
        match self {
            OrderRequest::Local { .. } => Variant::Local,
            OrderRequest::Foreign { .. } => Variant::Foreign,
        }
    }

    /// Validate every draft through a fresh session and snapshot the result
    pub fn into_order(self) -> Result<PurchaseOrder> {
        let mut session = OrderSession::new();
        match self {
            OrderRequest::Local { header, items } => {
                for draft in &items {
                    session.add_local_item(draft)?;
                }
                Ok(session.local_order(header))
            }
            OrderRequest::Foreign { header, items } => {
                for draft in &items {
                    session.add_foreign_item(draft)?;
                }
                Ok(session.foreign_order(header))
            }
        }
    }

    /// An example order filled with the form's default values
    pub fn sample(variant: Variant) -> Self {
        match variant {
            Variant::Local => OrderRequest::Local {
                header: PurchaseOrderHeader {
                    name: "Anu Shams".to_string(),
                    designation: "Sales".to_string(),
                    vat_number: "311863395100003".to_string(),
                    mobile: "+966 543 824 224".to_string(),
                    company_name: "Advanced Solutions Arabia Trading Est.".to_string(),
                    po_number: "MSIC-PO-A065-08-2025".to_string(),
                    po_date: NaiveDate::from_ymd_opt(2025, 8, 10),
                    fax: "-".to_string(),
                    pr_number: "MSIC-PR-A020-08-2025".to_string(),
                    supplier_name: String::new(),
                    quotation_ref: "QT210163".to_string(),
                    telephone: "+966 13 851 1013 x 1001".to_string(),
                    email: "anu@fssitech.com".to_string(),
                    subject: "Annual software subscription renewal".to_string(),
                },
                items: vec![ItemDraft::new(
                    "Microsoft 365 Business Standard - annual subscription",
                    "License",
                    "10",
                    "540.00",
                )],
            },
            Variant::Foreign => OrderRequest::Foreign {
                header: ForeignPurchaseOrderHeader {
                    po_number: "MSIC-PO-F012-08-2025".to_string(),
                    po_date: NaiveDate::from_ymd_opt(2025, 8, 10),
                    pr_number: "MSIC-PR-F007-08-2025".to_string(),
                    supplier: SupplierContact {
                        to: "Mr. Daniel Weber".to_string(),
                        designation: "Export Sales Manager".to_string(),
                        company: "Rhein Industrial Components GmbH".to_string(),
                        telephone: "+49 211 555 0190".to_string(),
                        email: "d.weber@rhein-components.example".to_string(),
                        fax: "-".to_string(),
                        mobile: "+49 170 555 2214".to_string(),
                        address: "Industriestrasse 42, 40231 Duesseldorf, Germany".to_string(),
                    },
                    subject: "Supply of replacement valve assemblies".to_string(),
                    consignee: Consignee {
                        name: "Meta Solutions Industrial Company".to_string(),
                        address: "First Floor, KCT Building No: 8588, Al Firdaws, Dammam, Kingdom of Saudi Arabia".to_string(),
                        contact: "Procurement Department".to_string(),
                        telephone: "+966 13 851 1013".to_string(),
                        fax: "-".to_string(),
                        email: "procurement@metasol.example".to_string(),
                    },
                },
                items: vec![
                    ItemDraft::new("Pneumatic valve assembly, stainless steel, DN50", "EA", "4", "1,250.00")
                        .with_hs_code("8481.80"),
                    ItemDraft::new("Seal kit for DN50 valve assembly", "SET", "8", "85.50")
                        .with_hs_code("8484.90"),
                ],
            },
        }
    }
}

/// Validated order snapshot handed to the renderer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "variant", rename_all = "lowercase")]
pub enum PurchaseOrder {
    Local {
        header: PurchaseOrderHeader,
        items: Vec<LineItem>,
    },
    Foreign {
        header: ForeignPurchaseOrderHeader,
        items: Vec<ForeignLineItem>,
    },
}

impl PurchaseOrder {
    pub fn variant(&self) -> Variant {
        match self {
            PurchaseOrder::Local { .. } => Variant::Local,
            PurchaseOrder::Foreign { .. } => Variant::Foreign,
        }
    }

    pub fn item_count(&self) -> usize {
        match self {
            PurchaseOrder::Local { items, .. } => items.len(),
            PurchaseOrder::Foreign { items, .. } => items.len(),
        }
    }

    pub fn po_number(&self) -> &str {
        match self {
            PurchaseOrder::Local { header, .. } => &header.po_number,
            PurchaseOrder::Foreign { header, .. } => &header.po_number,
        }
    }

    /// Subtotal, tax and grand total for this order
    pub fn totals(&self) -> Result<Totals> {
        let tax = self.variant().tax_treatment();
        match self {
            PurchaseOrder::Local { items, .. } => Totals::compute(items, tax),
            PurchaseOrder::Foreign { items, .. } => Totals::compute(items, tax),
        }
    }

    /// Output file name: the sanitised PO number for local orders, a fixed
    /// name for foreign ones
    pub fn file_name(&self) -> String {
        match self {
            PurchaseOrder::Local { header, .. } => {
                format!("{}.pdf", po_text::sanitize_file_stem(&header.po_number))
            }
            PurchaseOrder::Foreign { .. } => FOREIGN_FILE_NAME.to_string(),
        }
    }

    /// Data tree that template bindings resolve against
    ///
    /// `$.header.*`, `$.items[n].*` and `$.totals.*`. A missing PO date is
    /// replaced by `default_date`.
    pub fn binding_data(&self, default_date: NaiveDate) -> Result<Value> {
        let (mut header, items) = match self {
            PurchaseOrder::Local { header, items } => {
                (serde_json::to_value(header)?, serde_json::to_value(items)?)
            }
            PurchaseOrder::Foreign { header, items } => {
                (serde_json::to_value(header)?, serde_json::to_value(items)?)
            }
        };

        if let Some(fields) = header.as_object_mut() {
            if fields.get("po_date").map_or(true, Value::is_null) {
                fields.insert("po_date".to_string(), json!(default_date));
            }
        }

        Ok(json!({
            "header": header,
            "items": items,
            "totals": serde_json::to_value(self.totals()?)?,
        }))
    }
}
