//! Template descriptions of the two purchase-order variants
//!
//! Header (logos, VAT line, title) and footer banner are shared; everything
//! else lives in [`local`] and [`foreign`].

pub mod foreign;
pub mod local;

use crate::assets::AssetKind;
use crate::order::Variant;
use crate::schema::*;
use pdf_core::{Align, PageSize};

/// Left and right page margin
pub const MARGIN: f64 = 40.0;

const INCH: f64 = 72.0;

/// Issuing company's VAT registration, printed under the logos
pub const COMPANY_VAT_LINE: &str = " VAT No. 311863395100003";

pub const TITLE: &str = "PURCHASE ORDER";

pub const COMPANY_NAME: &str = "Meta Solutions Industrial Company";

/// Template for `variant` on an A4 page
pub fn template_for(variant: Variant) -> DocumentTemplate {
    match variant {
        Variant::Local => local::template(),
        Variant::Foreign => foreign::template(),
    }
}

/// Logos, VAT line, title and the two rules around it
///
/// Leaves the cursor on the lower title rule (110pt from the top).
pub fn header_blocks(page: PageSize) -> Vec<Block> {
    let logo_top = 60.0 - 0.58 * INCH;
    let right_width = 2.33 * INCH;
    let right_edge = page.width - MARGIN;

    vec![
        Block::Image(ImageBlock {
            asset: AssetKind::LogoLeft,
            x: MARGIN,
            width: 2.11 * INCH,
            height: Some(0.58 * INCH),
            placement: Placement::overlay(logo_top),
            anchor: ImageAnchor::TopLeft,
        }),
        Block::Image(ImageBlock {
            asset: AssetKind::LogoRight,
            x: right_edge - right_width,
            width: right_width,
            height: Some(0.58 * INCH),
            placement: Placement::overlay(logo_top),
            anchor: ImageAnchor::TopRight,
        }),
        Block::Text(
            TextBlock::new(MARGIN, Placement::flow(70.0), FontSpec::regular(10.0), 0.0)
                .id("vat")
                .literals(&[COMPANY_VAT_LINE]),
        ),
        Block::Rule(RuleBlock {
            x1: MARGIN,
            x2: right_edge,
            placement: Placement::flow(10.0),
            width: 1.0,
        }),
        Block::Text(
            TextBlock::new(page.width / 2.0, Placement::flow(20.0), FontSpec::bold(16.0), 0.0)
                .id("title")
                .align(Align::Center)
                .literals(&[TITLE]),
        ),
        Block::Rule(RuleBlock {
            x1: MARGIN,
            x2: right_edge,
            placement: Placement::flow(10.0),
            width: 1.0,
        }),
    ]
}

/// Full content-width banner whose bottom edge bleeds 30pt past the page
pub fn footer_blocks(page: PageSize) -> Vec<Block> {
    vec![Block::Image(ImageBlock {
        asset: AssetKind::Footer,
        x: MARGIN,
        width: page.width - 2.0 * MARGIN,
        height: None,
        placement: Placement::bottom(-30.0),
        anchor: ImageAnchor::BottomLeft,
    })]
}

/// Four signature columns pinned near the page bottom
pub fn approvals_block() -> Block {
    Block::Approvals(ApprovalsBlock {
        columns: vec![40.0, 180.0, 320.0, 460.0],
        signatories: vec![
            Signatory::new("Prepared & checked by:", "AMIR RODRIGUEZ", "Procurement Manager"),
            Signatory::new("Reviewed by:", "WASIUR REHMAN KHAN", "Finance Manager"),
            Signatory::new("Authorized by", "DR. VIMAL PATEL", "General Manager"),
            Signatory::new("Approved by:", " ANVER SADATH", "Chairman & Managing Director"),
        ],
        caption: ApprovalLine {
            offset: 62.0,
            font: FontSpec::regular(9.0),
        },
        name: ApprovalLine {
            offset: 36.0,
            font: FontSpec::regular(9.0),
        },
        role: ApprovalLine {
            offset: 50.0,
            font: FontSpec::regular(8.0),
        },
    })
}

/// Two label/value columns split at the page centre
pub(crate) fn grid_columns(page: PageSize) -> Vec<GridColumn> {
    let centre = page.width / 2.0;
    vec![
        GridColumn {
            label_x: MARGIN,
            value_x: 130.0,
            rule_end: centre - 10.0,
        },
        GridColumn {
            label_x: centre,
            value_x: centre + 70.0,
            rule_end: page.width - 50.0,
        },
    ]
}
