//! Foreign purchase order: two pages, no VAT, totals in USD
//!
//! Page 1 carries supplier details, consignee and shipping-document tables
//! and the regulatory notices; page 2 the purchase details, terms and
//! signatures. The split is fixed: a long item list is not carried over to
//! a third page.

use super::{approvals_block, footer_blocks, grid_columns, header_blocks, COMPANY_NAME, MARGIN};
use crate::schema::*;
use pdf_core::{Align, PageSize};

/// Region id of the consignee / shipping-documents pair
pub const PARTY_TABLES: &str = "consignee_documents";
/// Region id of the purchase-details table on page 2
pub const ITEMS_TABLE: &str = "purchase_details";
pub const GRAND_TOTAL: &str = "grand_total";

/// Document name, originals, copies
pub const SHIPPING_DOCUMENTS: &[(&str, &str, &str)] = &[
    ("Commercial Invoice", "1", "3"),
    ("Packing List", "1", "3"),
    ("Certificate of Origin", "1", "2"),
    ("Bill of Lading / Airway Bill", "3", "3"),
    ("Insurance Certificate", "1", "2"),
];

pub const NOTICES: &[&str] = &[
    "1. All shipping documents must quote the PO number and the HS code of every item.",
    "2. Goods must conform to the technical regulations of the Kingdom of Saudi Arabia; the shipment certificate of conformity must be issued before dispatch.",
    "3. The Certificate of Origin must be attested by the chamber of commerce of the country of origin.",
    "4. The commercial invoice must state country of origin, manufacturer, unit price and total value in USD.",
    "5. Wooden packing material must be ISPM 15 treated and marked.",
    "6. Original shipping documents must reach the consignee before the arrival of the vessel or flight.",
];

pub const TERMS: &[&str] = &[
    "Payment Terms: 30% advance, 70% against copy of shipping documents",
    "Incoterm: CIF Dammam Port",
    "Partial Shipment: Not allowed",
    "Transshipment: Allowed",
    "Delivery Schedule: 6-8 weeks from the date of PO",
    "Warranty: 12 months from the date of delivery",
];

pub fn template() -> DocumentTemplate {
    let page = PageSize::A4;
    DocumentTemplate {
        page,
        header: header_blocks(page),
        pages: vec![parties_page(page), purchase_page(page)],
        footer: footer_blocks(page),
    }
}

fn parties_page(page: PageSize) -> Vec<Block> {
    vec![
        Block::Text(
            TextBlock::new(MARGIN, Placement::flow(20.0), FontSpec::bold(10.0), 0.0)
                .literals(&["Supplier Details"]),
        ),
        Block::FieldGrid(supplier_grid(page)),
        Block::Text(
            TextBlock::new(MARGIN, Placement::flow(18.0), FontSpec::regular(9.0), 11.0)
                .id("subject")
                .wrap(page.width - 2.0 * MARGIN)
                .line(TextSource::labelled("Subject: ", "$.header.subject")),
        ),
        Block::TablePair(TablePairBlock {
            id: PARTY_TABLES.to_string(),
            placement: Placement::flow(14.0),
            left: consignee_table(),
            right: shipping_documents_table(page),
        }),
        Block::Text(
            TextBlock::new(MARGIN, Placement::flow(20.0), FontSpec::bold(9.0), 0.0)
                .literals(&["Important Notes"]),
        ),
        Block::Text(
            TextBlock::new(MARGIN, Placement::flow(14.0), FontSpec::regular(8.0), 11.0)
                .id("notes")
                .wrap(page.width - 2.0 * MARGIN)
                .literals(NOTICES),
        ),
    ]
}

fn purchase_page(page: PageSize) -> Vec<Block> {
    let right_edge = page.width - MARGIN;
    let sign_right = page.width / 2.0 + 20.0;

    vec![
        Block::Text(
            TextBlock::new(MARGIN, Placement::flow(20.0), FontSpec::bold(10.0), 0.0)
                .literals(&["Purchase Details"]),
        ),
        Block::Table(TableBlock {
            id: ITEMS_TABLE.to_string(),
            placement: Placement::flow(10.0),
            table: purchase_table(),
        }),
        Block::Text(
            TextBlock::new(400.0, Placement::flow(15.0), FontSpec::bold(10.0), 0.0)
                .id(GRAND_TOTAL)
                .line(
                    TextSource::labelled("Grand Total (USD): ", "$.totals.grand_total")
                        .with_format(ValueFormat::Money),
                ),
        ),
        Block::Rule(RuleBlock {
            x1: MARGIN,
            x2: right_edge,
            placement: Placement::flow(12.0),
            width: 0.5,
        }),
        Block::Text(
            TextBlock::new(MARGIN, Placement::flow(12.0), FontSpec::regular(10.0), 0.0)
                .literals(&["Terms and Conditions"]),
        ),
        Block::Text(
            TextBlock::new(MARGIN, Placement::flow(25.0), FontSpec::regular(9.0), 12.0)
                .id("terms")
                .literals(TERMS),
        ),
        // Signature block: supplier column drawn as overlays beside the buyer column
        Block::Text(
            TextBlock::new(sign_right, Placement::overlay(40.0), FontSpec::regular(10.0), 0.0)
                .literals(&["Accepted by Supplier"]),
        ),
        Block::Text(
            TextBlock::new(MARGIN, Placement::flow(40.0), FontSpec::regular(10.0), 0.0)
                .id("signature")
                .line(TextSource::literal(&format!("For and on behalf of {COMPANY_NAME}"))),
        ),
        Block::Rule(RuleBlock {
            x1: sign_right,
            x2: sign_right + 180.0,
            placement: Placement::overlay(35.0),
            width: 0.5,
        }),
        Block::Rule(RuleBlock {
            x1: MARGIN,
            x2: MARGIN + 180.0,
            placement: Placement::flow(35.0),
            width: 0.5,
        }),
        Block::Text(
            TextBlock::new(sign_right, Placement::overlay(10.0), FontSpec::regular(8.0), 0.0)
                .literals(&["Signature, Name & Company Stamp"]),
        ),
        Block::Text(
            TextBlock::new(MARGIN, Placement::flow(10.0), FontSpec::regular(8.0), 0.0)
                .literals(&["Authorized Signature & Company Stamp"]),
        ),
        approvals_block(),
    ]
}

/// Supplier contact and PO identifiers, 10pt rows
fn supplier_grid(page: PageSize) -> FieldGridBlock {
    let columns = grid_columns(page);
    let address_width = columns[0].rule_end - columns[0].value_x;
    let address = Field::bound("Address:", "$.header.supplier.address")
        .rule_dy(24.0)
        .wrapped(WrapRegion {
            rise: 8.0,
            width: address_width,
            height: 32.0,
            padding: 2.0,
            leading: 10.0,
        });
    let po_date = Field::new(
        "PO Date:",
        TextSource::bound("$.header.po_date").with_format(ValueFormat::LongDate),
    );

    let row = |left: Field, right: Option<Field>| FieldRow::new(10.0, vec![Some(left), right]);

    FieldGridBlock {
        id: Some("supplier".to_string()),
        placement: Placement::flow(14.0),
        font: FontSpec::regular(8.0),
        columns,
        rows: vec![
            row(
                Field::bound("To:", "$.header.supplier.to"),
                Some(Field::bound("PO No.:", "$.header.po_number")),
            ),
            row(
                Field::bound("Designation:", "$.header.supplier.designation"),
                Some(po_date),
            ),
            row(
                Field::bound("Company:", "$.header.supplier.company"),
                Some(Field::bound("PR Number:", "$.header.pr_number")),
            ),
            row(Field::bound("Telephone:", "$.header.supplier.telephone"), None),
            row(Field::bound("Email:", "$.header.supplier.email"), None),
            row(Field::bound("Fax:", "$.header.supplier.fax"), None),
            row(Field::bound("Mobile:", "$.header.supplier.mobile"), None),
            FieldRow::new(24.0, vec![Some(address), None]),
        ],
        rule_width: 0.3,
    }
}

fn consignee_table() -> TableSpec {
    let row = |label: &str, path: &str| vec![TextSource::literal(label), TextSource::bound(path)];

    TableSpec {
        x: MARGIN,
        font: FontSpec::regular(8.0),
        header_font: FontSpec::bold(8.0),
        columns: vec![
            TableColumn::new("Consignee / Notify Party", 95.0, "label"),
            TableColumn::new("", 155.0, "value").wrapped(),
        ],
        rows: TableRows::Static(vec![
            row("Name", "$.header.consignee.name"),
            row("Address", "$.header.consignee.address"),
            row("Contact Person", "$.header.consignee.contact"),
            row("Telephone", "$.header.consignee.telephone"),
            row("Fax", "$.header.consignee.fax"),
            row("Email", "$.header.consignee.email"),
        ]),
        row_height: RowHeight::Auto {
            min: 14.0,
            leading: 10.0,
        },
        show_header: true,
        grid_width: 0.5,
    }
}

fn shipping_documents_table(page: PageSize) -> TableSpec {
    let rows = SHIPPING_DOCUMENTS
        .iter()
        .map(|(name, originals, copies)| {
            vec![
                TextSource::literal(name),
                TextSource::literal(originals),
                TextSource::literal(copies),
            ]
        })
        .collect();

    TableSpec {
        x: page.width - MARGIN - 250.0,
        font: FontSpec::regular(8.0),
        header_font: FontSpec::bold(8.0),
        columns: vec![
            TableColumn::new("Shipping Documents", 150.0, "document"),
            TableColumn::new("Original", 50.0, "originals").align(Align::Center),
            TableColumn::new("Copy", 50.0, "copies").align(Align::Center),
        ],
        rows: TableRows::Static(rows),
        row_height: RowHeight::Fixed(14.0),
        show_header: true,
        grid_width: 0.5,
    }
}

fn purchase_table() -> TableSpec {
    TableSpec {
        x: MARGIN,
        font: FontSpec::regular(9.0),
        header_font: FontSpec::bold(9.0),
        columns: vec![
            TableColumn::new("Sr.No.", 30.0, "sequence"),
            TableColumn::new("HS Code", 60.0, "hs_code"),
            TableColumn::new("Product Description", 175.0, "description").wrapped(),
            TableColumn::new("UOM", 45.0, "unit").align(Align::Center),
            TableColumn::new("Qty", 35.0, "quantity").align(Align::Center),
            TableColumn::new("Unit Cost", 80.0, "unit_cost")
                .align(Align::Center)
                .format(ValueFormat::Money),
            TableColumn::new("Total Price", 90.0, "total_price")
                .align(Align::Center)
                .format(ValueFormat::Money),
        ],
        rows: TableRows::Bound("$.items".to_string()),
        row_height: RowHeight::Auto {
            min: 18.0,
            leading: 11.0,
        },
        show_header: true,
        grid_width: 0.5,
    }
}
