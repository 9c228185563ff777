//! Session-scoped line-item state

use crate::order::{
    ForeignLineItem, ForeignPurchaseOrderHeader, ItemDraft, LineItem, PurchaseOrder,
    PurchaseOrderHeader, Variant,
};
use crate::totals::{line_total, Totals};
use crate::{Result, TemplateError};
use po_text::{parse_amount, parse_quantity};
use rust_decimal::Decimal;
use tracing::debug;

/// Line items entered during one interactive session
///
/// The local and foreign lists are independent and append-only. Renderers
/// never see the live lists, only the snapshots returned by
/// [`OrderSession::local_order`] and [`OrderSession::foreign_order`].
#[derive(Debug, Default)]
pub struct OrderSession {
    local: Vec<LineItem>,
    foreign: Vec<ForeignLineItem>,
}

/// Coerced numeric part of a draft
struct Priced {
    quantity: u32,
    unit_cost: Decimal,
    total_price: Decimal,
}

impl OrderSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate `draft` and append it to the local list
    pub fn add_local_item(&mut self, draft: &ItemDraft) -> Result<&LineItem> {
        let priced = price_draft(draft)?;
        let sequence = next_sequence(self.local.len())?;
        check_order_total(
            self.local.iter().map(|item| item.total_price),
            priced.total_price,
            Variant::Local,
        )?;

        self.local.push(LineItem {
            sequence,
            description: draft.description.clone(),
            unit: draft.unit.clone(),
            quantity: priced.quantity,
            unit_cost: priced.unit_cost,
            total_price: priced.total_price,
        });
        debug!(sequence, "Added local line item");

        let index = self.local.len() - 1;
        Ok(&self.local[index])
    }

    /// Validate `draft` and append it to the foreign list
    pub fn add_foreign_item(&mut self, draft: &ItemDraft) -> Result<&ForeignLineItem> {
        let priced = price_draft(draft)?;
        let sequence = next_sequence(self.foreign.len())?;
        check_order_total(
            self.foreign.iter().map(|item| item.total_price),
            priced.total_price,
            Variant::Foreign,
        )?;

        self.foreign.push(ForeignLineItem {
            sequence,
            hs_code: draft.hs_code.clone(),
            description: draft.description.clone(),
            unit: draft.unit.clone(),
            quantity: priced.quantity,
            unit_cost: priced.unit_cost,
            total_price: priced.total_price,
        });
        debug!(sequence, "Added foreign line item");

        let index = self.foreign.len() - 1;
        Ok(&self.foreign[index])
    }

    pub fn local_items(&self) -> &[LineItem] {
        &self.local
    }

    pub fn foreign_items(&self) -> &[ForeignLineItem] {
        &self.foreign
    }

    /// Snapshot of the local list under `header`
    pub fn local_order(&self, header: PurchaseOrderHeader) -> PurchaseOrder {
        PurchaseOrder::Local {
            header,
            items: self.local.clone(),
        }
    }

    /// Snapshot of the foreign list under `header`
    pub fn foreign_order(&self, header: ForeignPurchaseOrderHeader) -> PurchaseOrder {
        PurchaseOrder::Foreign {
            header,
            items: self.foreign.clone(),
        }
    }

    /// End of session: drop both lists
    pub fn reset(&mut self) {
        self.local.clear();
        self.foreign.clear();
    }
}

fn next_sequence(len: usize) -> Result<u32> {
    u32::try_from(len + 1)
        .map_err(|_| TemplateError::InvalidLineItem("too many line items".to_string()))
}

/// Reject an item whose addition would push the order totals out of range
fn check_order_total(
    existing: impl Iterator<Item = Decimal>,
    total_price: Decimal,
    variant: Variant,
) -> Result<()> {
    Totals::from_line_totals(existing.chain(Some(total_price)), variant.tax_treatment())
        .map(|_| ())
        .map_err(|_| TemplateError::InvalidLineItem("order total out of range".to_string()))
}

fn price_draft(draft: &ItemDraft) -> Result<Priced> {
    let quantity =
        parse_quantity(&draft.quantity).map_err(|_| TemplateError::MalformedNumericField {
            field: "quantity",
            value: draft.quantity.clone(),
        })?;
    if quantity < 1 {
        return Err(TemplateError::InvalidLineItem(
            "quantity must be at least 1".to_string(),
        ));
    }

    let unit_cost =
        parse_amount(&draft.unit_cost).map_err(|_| TemplateError::MalformedNumericField {
            field: "unit_cost",
            value: draft.unit_cost.clone(),
        })?;
    if unit_cost.is_sign_negative() && !unit_cost.is_zero() {
        return Err(TemplateError::InvalidLineItem(
            "unit cost must not be negative".to_string(),
        ));
    }

    let total_price = line_total(quantity, unit_cost)
        .ok_or_else(|| TemplateError::InvalidLineItem("total price out of range".to_string()))?;

    Ok(Priced {
        quantity,
        unit_cost,
        total_price,
    })
}
