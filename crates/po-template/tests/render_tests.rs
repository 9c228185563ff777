//! End-to-end tests: order entry, layout and PDF output

use chrono::NaiveDate;
use image::{ImageBuffer, Rgb, Rgba};
use lopdf::{Document, Object};
use po_template::variants::{foreign, local};
use po_template::{
    AssetPaths, AssetSet, DrawOp, FontConfig, FontSet, ItemDraft, OrderRequest, OrderSession,
    PurchaseOrder, PurchaseOrderHeader, PurchaseOrderRenderer, RenderConfig, TemplateError,
    Variant, APPROVALS_REGION,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rust_decimal_macros::dec;
use std::path::Path;

fn render_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 8, 10).unwrap()
}

fn renderer(fonts: &FontSet) -> PurchaseOrderRenderer<'_> {
    PurchaseOrderRenderer::new(fonts, AssetSet::empty()).with_date(render_date())
}

fn local_order(items: usize) -> PurchaseOrder {
    let mut session = OrderSession::new();
    for i in 0..items {
        session
            .add_local_item(&ItemDraft::new(&format!("Item {i}"), "EA", "2", "100.00"))
            .unwrap();
    }
    session.local_order(PurchaseOrderHeader {
        po_number: "PO-TEST-1".to_string(),
        ..PurchaseOrderHeader::default()
    })
}

fn write_assets(dir: &Path) -> AssetPaths {
    let paths = AssetPaths::in_dir(dir);
    let logo: ImageBuffer<Rgb<u8>, Vec<u8>> = ImageBuffer::from_pixel(300, 80, Rgb([10, 60, 120]));
    logo.save(&paths.logo_left).unwrap();
    logo.save(&paths.logo_right).unwrap();
    let footer: ImageBuffer<Rgba<u8>, Vec<u8>> =
        ImageBuffer::from_pixel(1030, 60, Rgba([200, 30, 30, 128]));
    footer.save(&paths.footer).unwrap();
    paths
}

#[test]
fn test_single_item_scenario() {
    let mut session = OrderSession::new();
    let item = session
        .add_local_item(&ItemDraft::new("Licence", "EA", "2", "100.00"))
        .unwrap();
    assert_eq!(item.total_price.to_string(), "200.00");

    let order = session.local_order(PurchaseOrderHeader::default());
    let totals = order.totals().unwrap().rounded();
    assert_eq!(totals.subtotal, dec!(200.00));
    assert_eq!(totals.tax, Some(dec!(30.00)));
    assert_eq!(totals.grand_total, dec!(230.00));

    let fonts = FontSet::helvetica();
    let page = renderer(&fonts).layout(&order).unwrap().pages.remove(0);
    assert!(page.find_text("Total: 200.00").is_some());
    assert!(page.find_text("15% VAT: 30.00").is_some());
    assert!(page.find_text("Grand Total (SAR): 230.00").is_some());
    assert!(page.find_text("200.00").is_some());
}

#[test]
fn test_empty_order_renders_header_only_table() {
    let fonts = FontSet::helvetica();
    let order = local_order(0);
    let page = renderer(&fonts).layout(&order).unwrap().pages.remove(0);

    let table = page.region(local::ITEMS_TABLE).unwrap();
    assert_eq!(table.height(), 18.0);
    assert!(page.find_text("Sr. No.").is_some());
    assert!(page.find_text("Total: 0.00").is_some());
    assert!(page.find_text("15% VAT: 0.00").is_some());
    assert!(page.find_text("Grand Total (SAR): 0.00").is_some());

    let rendered = renderer(&fonts).render(&order).unwrap();
    let doc = Document::load_mem(&rendered.bytes).unwrap();
    assert_eq!(doc.get_pages().len(), 1);
}

#[test]
fn test_approvals_fixed_for_0_and_50_items() {
    let fonts = FontSet::helvetica();
    let few = renderer(&fonts).layout(&local_order(0)).unwrap().pages.remove(0);
    let many = renderer(&fonts).layout(&local_order(50)).unwrap().pages.remove(0);

    assert_eq!(few.region(APPROVALS_REGION), many.region(APPROVALS_REGION));
    for text in ["Prepared & checked by:", "WASIUR REHMAN KHAN", "General Manager"] {
        assert_eq!(few.find_text(text), many.find_text(text));
    }
    assert!(
        many.region(local::ITEMS_TABLE).unwrap().height()
            > few.region(local::ITEMS_TABLE).unwrap().height()
    );
}

#[test]
fn test_foreign_layout() {
    let fonts = FontSet::helvetica();
    let order = OrderRequest::sample(Variant::Foreign).into_order().unwrap();
    let document = renderer(&fonts).layout(&order).unwrap();

    assert_eq!(document.page_count(), 2);
    assert!(document.pages[0].region(foreign::PARTY_TABLES).is_some());
    assert!(document.pages[0].find_text("Bill of Lading / Airway Bill").is_some());

    let details = &document.pages[1];
    assert!(details.find_text("8481.80").is_some());
    // 4 x 1,250.00 + 8 x 85.50
    assert!(details.find_text("Grand Total (USD): 5,684.00").is_some());
    assert!(details.find_text("15% VAT").is_none());

    let rendered = renderer(&fonts).render(&order).unwrap();
    assert_eq!(rendered.file_name, "Foreign_Purchase_Order.pdf");
    assert_eq!(Document::load_mem(&rendered.bytes).unwrap().get_pages().len(), 2);
}

#[test]
fn test_byte_identical_rerender() {
    let dir = tempfile::tempdir().unwrap();
    let paths = write_assets(dir.path());
    let fonts = FontSet::helvetica();

    for variant in [Variant::Local, Variant::Foreign] {
        let order = OrderRequest::sample(variant).into_order().unwrap();
        let first = PurchaseOrderRenderer::new(&fonts, AssetSet::load(&paths))
            .with_date(render_date())
            .render(&order)
            .unwrap();
        let second = PurchaseOrderRenderer::new(&fonts, AssetSet::load(&paths))
            .with_date(render_date())
            .render(&order)
            .unwrap();
        assert_eq!(first, second);
    }
}

#[test]
fn test_assets_are_drawn_on_every_page() {
    let dir = tempfile::tempdir().unwrap();
    let paths = write_assets(dir.path());
    let fonts = FontSet::helvetica();
    let assets = AssetSet::load(&paths);
    assert_eq!(assets.len(), 3);

    let order = OrderRequest::sample(Variant::Foreign).into_order().unwrap();
    let renderer = PurchaseOrderRenderer::new(&fonts, assets).with_date(render_date());

    let document = renderer.layout(&order).unwrap();
    for page in &document.pages {
        assert_eq!(page.images().count(), 3);
        let footer_bottom = page
            .images()
            .filter_map(|op| match op {
                DrawOp::Image { y, height, .. } => Some(y + height),
                _ => None,
            })
            .fold(0.0, f64::max);
        assert!((footer_bottom - 872.0).abs() < 1e-6);
    }

    let rendered = renderer.render(&order).unwrap();
    let doc = Document::load_mem(&rendered.bytes).unwrap();
    for (_, page_id) in doc.get_pages() {
        let page = doc.get_dictionary(page_id).unwrap();
        let resources = match page.get(b"Resources").unwrap() {
            Object::Reference(id) => doc.get_dictionary(*id).unwrap(),
            Object::Dictionary(dict) => dict,
            other => panic!("Unexpected resources {other:?}"),
        };
        let xobjects = resources.get(b"XObject").unwrap().as_dict().unwrap();
        // Both logos share one image object
        assert_eq!(xobjects.len(), 2);
    }
}

#[test]
fn test_missing_assets_are_tolerated() {
    let dir = tempfile::tempdir().unwrap();
    let config = RenderConfig {
        assets: AssetPaths::in_dir(dir.path()),
        font: None,
    };
    let renderer = PurchaseOrderRenderer::from_config(&config)
        .unwrap()
        .with_date(render_date());

    let order = OrderRequest::sample(Variant::Local).into_order().unwrap();
    let document = renderer.layout(&order).unwrap();
    assert_eq!(document.pages[0].images().count(), 0);
    assert!(renderer.render(&order).unwrap().bytes.starts_with(b"%PDF"));
}

#[test]
fn test_unreadable_font_is_fatal() {
    let config = FontConfig {
        family: "noto".to_string(),
        regular: "/no/such/font.ttf".into(),
        bold: None,
    };
    assert!(matches!(
        FontSet::load(Some(&config)),
        Err(TemplateError::FontRegistration { .. })
    ));
}

#[test]
fn test_json_request_with_bad_number_is_rejected() {
    let json = r#"{
        "variant": "local",
        "header": { "po_number": "PO-9" },
        "items": [ { "description": "Cable", "unit": "m", "quantity": 1, "unit_cost": "n/a" } ]
    }"#;
    let err = OrderRequest::from_json(json).unwrap().into_order().unwrap_err();
    assert!(matches!(
        err,
        TemplateError::MalformedNumericField { field: "unit_cost", .. }
    ));
}

#[test]
fn test_unsafe_po_number_is_sanitised() {
    let mut session = OrderSession::new();
    session
        .add_local_item(&ItemDraft::new("a", "EA", "1", "1"))
        .unwrap();
    let order = session.local_order(PurchaseOrderHeader {
        po_number: "PO/2025:08".to_string(),
        ..PurchaseOrderHeader::default()
    });
    assert_eq!(order.file_name(), "PO_2025_08.pdf");
}

#[test]
fn test_demo_orders_render() {
    let fonts = FontSet::helvetica();
    for (json, pages) in [
        (include_str!("../../../demos/local_order.json"), 1),
        (include_str!("../../../demos/foreign_order.json"), 2),
    ] {
        let order = OrderRequest::from_json(json).unwrap().into_order().unwrap();
        assert_eq!(order.item_count(), 2);
        assert_eq!(renderer(&fonts).layout(&order).unwrap().page_count(), pages);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_table_height_is_monotonic(n in 0usize..40) {
        let fonts = FontSet::helvetica();
        let smaller = renderer(&fonts).layout(&local_order(n)).unwrap().pages.remove(0);
        let larger = renderer(&fonts).layout(&local_order(n + 1)).unwrap().pages.remove(0);

        let a = *smaller.region(local::ITEMS_TABLE).unwrap();
        let b = *larger.region(local::ITEMS_TABLE).unwrap();
        prop_assert!(b.height() >= a.height());

        // Totals and everything after them sit below the table
        let totals = larger.region(local::TOTALS).unwrap();
        prop_assert!(totals.top > b.bottom);
        let (_, terms_y) = larger.find_text("Payment Terms").unwrap();
        prop_assert!(terms_y > b.bottom);
    }
}
