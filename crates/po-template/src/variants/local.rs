//! Local purchase order: one page, prices in SAR with 15% VAT

use super::{approvals_block, footer_blocks, grid_columns, header_blocks, COMPANY_NAME, MARGIN};
use crate::schema::*;
use pdf_core::{Align, PageSize};

/// Region id of the line-item table
pub const ITEMS_TABLE: &str = "items";
/// Region id of the totals lines
pub const TOTALS: &str = "totals";

pub const TERMS: &[&str] = &[
    "Payment Terms: 100% Advance through bank",
    "Contact Person:",
    "Incoterm: DPA",
    "Place of Delivery: Meta Solutions Industrial Company,  First Floor, KCT Building No: 8588, Al Firdaws Ar",
    "Contact Person: ",
    "Delivery Schedule: Immediate",
    "Packing: N/A",
    "Packaging: N/A",
    "Note: Duration of Subscription: 7th Aug 2025 to 6th Aug 2026 ",
];

pub fn closing_lines() -> Vec<String> {
    vec![
        "Please confirm the purchase order.".to_string(),
        "Best Regards".to_string(),
        format!("On behalf of {COMPANY_NAME}"),
    ]
}

pub fn template() -> DocumentTemplate {
    let page = PageSize::A4;
    DocumentTemplate {
        page,
        header: header_blocks(page),
        pages: vec![body(page)],
        footer: footer_blocks(page),
    }
}

fn body(page: PageSize) -> Vec<Block> {
    let right_edge = page.width - MARGIN;
    let mut closing = TextBlock::new(MARGIN, Placement::flow(70.0), FontSpec::regular(10.0), 12.0);
    closing.lines = closing_lines().iter().map(|l| TextSource::literal(l)).collect();

    vec![
        Block::FieldGrid(details_grid(page)),
        Block::Text(
            TextBlock::new(MARGIN, Placement::flow(20.0), FontSpec::regular(10.0), 12.0)
                .id("subject")
                .line(TextSource::labelled("Subject: ", "$.header.subject")),
        ),
        Block::Table(TableBlock {
            id: ITEMS_TABLE.to_string(),
            placement: Placement::flow(35.0),
            table: items_table(),
        }),
        Block::Text(
            TextBlock::new(400.0, Placement::flow(15.0), FontSpec::bold(10.0), 12.0)
                .id(TOTALS)
                .line(money("Total: ", "$.totals.subtotal"))
                .line(money("15% VAT: ", "$.totals.tax"))
                .line(money("Grand Total (SAR): ", "$.totals.grand_total")),
        ),
        Block::Rule(RuleBlock {
            x1: MARGIN,
            x2: right_edge,
            placement: Placement::flow(12.0),
            width: 0.5,
        }),
        Block::Text(
            TextBlock::new(MARGIN, Placement::flow(12.0), FontSpec::regular(10.0), 12.0)
                .literals(&["Terms and Conditions"]),
        ),
        Block::Text(
            TextBlock::new(MARGIN, Placement::flow(25.0), FontSpec::regular(9.0), 12.0)
                .id("terms")
                .literals(TERMS),
        ),
        Block::Text(closing.id("closing")),
        approvals_block(),
    ]
}

fn money(prefix: &str, path: &str) -> TextSource {
    TextSource::labelled(prefix, path).with_format(ValueFormat::Money)
}

/// Requester and PO identifier grid, baselines 130 to 250
fn details_grid(page: PageSize) -> FieldGridBlock {
    let company = Field::bound("Company Name:", "$.header.company_name")
        .rule_dy(15.0)
        .wrapped(WrapRegion {
            rise: 25.0,
            width: 150.0,
            height: 50.0,
            padding: 6.0,
            leading: 12.0,
        });
    let reference = Field::new(
        "Supplier\nReference:",
        TextSource::labelled("Quotation #: ", "$.header.quotation_ref"),
    )
    .value_dy(5.0)
    .rule_dy(15.0);
    let po_date = Field::new(
        "PO Date:",
        TextSource::bound("$.header.po_date").with_format(ValueFormat::LongDate),
    );

    FieldGridBlock {
        id: Some("details".to_string()),
        placement: Placement::flow(20.0),
        font: FontSpec::regular(10.0),
        columns: grid_columns(page),
        rows: vec![
            FieldRow::new(
                20.0,
                vec![
                    Some(Field::bound("Name:", "$.header.name")),
                    Some(Field::bound("PO No.:", "$.header.po_number")),
                ],
            ),
            FieldRow::new(
                25.0,
                vec![
                    Some(Field::bound("Designation:", "$.header.designation")),
                    Some(po_date),
                ],
            ),
            FieldRow::new(35.0, vec![Some(company), Some(reference)]),
            FieldRow::new(
                20.0,
                vec![
                    Some(Field::bound("Telephone No.:", "$.header.telephone")),
                    Some(Field::bound("Email:", "$.header.email")),
                ],
            ),
            FieldRow::new(
                20.0,
                vec![
                    Some(Field::bound("Fax No.:", "$.header.fax")),
                    Some(Field::bound("PR Number:", "$.header.pr_number")),
                ],
            ),
            FieldRow::new(
                0.0,
                vec![
                    Some(Field::bound("Mobile No.:", "$.header.mobile")),
                    Some(Field::bound("Supplier:", "$.header.supplier_name")),
                ],
            ),
        ],
        rule_width: 0.3,
    }
}

fn items_table() -> TableSpec {
    TableSpec {
        x: MARGIN,
        font: FontSpec::regular(9.0),
        header_font: FontSpec::regular(9.0),
        columns: vec![
            TableColumn::new("Sr. No.", 40.0, "sequence"),
            TableColumn::new("Description", 220.0, "description"),
            TableColumn::new("Unit", 50.0, "unit").align(Align::Center),
            TableColumn::new("Qty", 40.0, "quantity").align(Align::Center),
            TableColumn::new("Unit Cost", 70.0, "unit_cost")
                .align(Align::Center)
                .format(ValueFormat::Money),
            TableColumn::new("Total Price", 70.0, "total_price")
                .align(Align::Center)
                .format(ValueFormat::Money),
        ],
        rows: TableRows::Bound("$.items".to_string()),
        row_height: RowHeight::Fixed(18.0),
        show_header: true,
        grid_width: 0.5,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::AssetSet;
    use crate::fonts::FontSet;
    use crate::layout::LayoutEngine;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn data(items: usize) -> serde_json::Value {
        let items: Vec<_> = (1..=items)
            .map(|i| {
                json!({
                    "sequence": i, "description": "Licence", "unit": "EA", "quantity": 2,
                    "unit_cost": "100.00", "total_price": "200.00"
                })
            })
            .collect();
        json!({
            "header": {
                "name": "Anu Shams", "po_number": "MSIC-PO-A065-08-2025", "po_date": "2025-08-10",
                "company_name": "Advanced Solutions Arabia Trading Est.", "quotation_ref": "QT210163",
                "subject": "Renewal"
            },
            "items": items,
            "totals": { "subtotal": "200.00", "tax": "30.0000", "grand_total": "230.0000" }
        })
    }

    fn layout(items: usize) -> crate::layout::LaidOutPage {
        let template = template();
        let fonts = FontSet::helvetica();
        let assets = AssetSet::empty();
        let mut document = LayoutEngine::new(&template, &fonts, &assets)
            .layout(&data(items))
            .unwrap();
        assert_eq!(document.page_count(), 1);
        document.pages.remove(0)
    }

    #[test]
    fn test_fixed_positions() {
        let page = layout(1);

        assert_eq!(page.find_text(" VAT No."), Some((40.0, 70.0)));
        assert_eq!(page.find_text("Name:"), Some((40.0, 130.0)));
        assert_eq!(page.find_text("MSIC-PO-A065"), Some((367.5, 130.0)));
        assert_eq!(page.find_text("Sunday, August 10, 2025"), Some((367.5, 150.0)));
        assert_eq!(page.find_text("Company Name:"), Some((40.0, 175.0)));
        assert_eq!(page.find_text("Quotation #: QT210163"), Some((367.5, 180.0)));
        assert_eq!(page.find_text("Reference:"), Some((297.5, 185.0)));
        assert_eq!(page.find_text("Mobile No.:"), Some((40.0, 250.0)));
        assert_eq!(page.find_text("Subject: Renewal"), Some((40.0, 270.0)));
        assert_eq!(page.region(ITEMS_TABLE).map(|r| r.top), Some(305.0));
    }

    #[test]
    fn test_company_name_wraps_in_region() {
        let page = layout(0);
        let (x, y) = page.find_text("Advanced Solutions").unwrap();
        assert_eq!((x, y), (136.0, 166.0));
        assert!(page.find_text("Trading Est.").is_some() || page.find_text("Arabia").is_some());
    }

    #[test]
    fn test_totals_follow_table() {
        let page = layout(1);
        let table = *page.region(ITEMS_TABLE).unwrap();
        assert_eq!(table.height(), 36.0);

        assert_eq!(page.find_text("Total: 200.00"), Some((400.0, table.bottom + 15.0)));
        assert_eq!(page.find_text("15% VAT: 30.00"), Some((400.0, table.bottom + 27.0)));
        assert_eq!(
            page.find_text("Grand Total (SAR): 230.00"),
            Some((400.0, table.bottom + 39.0))
        );
        assert_eq!(
            page.find_text("Payment Terms"),
            Some((40.0, table.bottom + 39.0 + 12.0 + 12.0 + 25.0))
        );
    }

    #[test]
    fn test_approvals_ignore_item_count() {
        let few = layout(0);
        let many = layout(50);

        for caption in ["Prepared & checked by:", "Approved by:", "AMIR RODRIGUEZ", "Chairman"] {
            assert_eq!(few.find_text(caption), many.find_text(caption));
        }
        assert_eq!(few.find_text("Reviewed by:"), Some((180.0, 780.0)));
        assert_eq!(many.find_text("Finance Manager"), Some((180.0, 792.0)));
    }
}
