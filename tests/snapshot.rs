mod common;

use common::*;
use invoice_pdf::{Error, InvoiceSnapshot, InvoiceStatus, SectionKind, invoice_file_name, render_invoice};

const PAID: &str = include_str!("fixtures/invoice_paid.json");

#[test]
fn parses_camel_case_snapshot() {
    let invoice = InvoiceSnapshot::from_json(PAID).unwrap();

    assert_eq!(invoice.invoice_number, "INV-2025-0107");
    assert_eq!(invoice.status, InvoiceStatus::Paid);
    assert_eq!(invoice.due_date.unwrap().to_string(), "2025-04-16");
    assert_eq!(invoice.tax_percentage, dec("18"));
    assert_eq!(invoice.line_items.len(), 2);
    assert_eq!(invoice.line_items[1].unit_price, dec("900"));
    assert_eq!(invoice.payments[0].method, "Card");
    assert_eq!(invoice.booking_id.as_deref(), Some("BK-2207"));
    assert!(invoice.subscription_id.is_none());
    assert!(invoice.has_cross_references());
    invoice.validate().unwrap();
}

#[test]
fn optional_fields_default() {
    let json = r#"{
        "invoiceNumber": "INV-1",
        "createdAt": "2025-01-01T00:00:00Z",
        "status": "draft",
        "owner": { "name": "Meera" },
        "subtotal": "100", "taxPercentage": "0", "taxAmount": "0", "totalAmount": "100",
        "lineItems": [{ "description": "Consultation", "quantity": 1, "unitPrice": "100", "totalPrice": "100" }]
    }"#;
    let invoice = InvoiceSnapshot::from_json(json).unwrap();

    assert!(invoice.due_date.is_none());
    assert!(invoice.owner.email.is_none());
    assert!(invoice.payments.is_empty());
    assert!(invoice.discount_amount.is_zero());
    assert!(!invoice.has_cross_references());
}

#[test]
fn unknown_status_is_a_json_error() {
    let json = PAID.replace("\"paid\"", "\"settled\"");
    assert!(matches!(InvoiceSnapshot::from_json(&json), Err(Error::Json(_))));
}

#[test]
fn fixture_lays_out_every_section() {
    init_logging();
    let invoice = InvoiceSnapshot::from_json(PAID).unwrap();
    let layout = invoice_pdf::InvoiceRenderer::default().layout(&invoice).unwrap();

    assert_eq!(layout.page_count(), 1);
    assert!(layout.has_section(SectionKind::PaymentHistory));
    assert!(layout.has_section(SectionKind::CrossReferences));
    let page = &layout.pages[0];
    assert!(page.contains_text("-Rs. 250.00"));
    assert!(page.contains_text("Rs. 5,060.00"));
    assert!(page.contains_text("BK-2207"));
    assert!(!page.contains_text("Subscription ID:"));
    assert!(page.contains_text("Card"));
    assert!(page.contains_text("SUCCESS"));
}

#[test]
fn blank_invoice_number_is_rejected() {
    let mut invoice = simple_snapshot();
    invoice.invoice_number = "   ".to_string();
    assert!(matches!(render_invoice(&invoice), Err(Error::MissingInvoiceNumber)));
}

#[test]
fn empty_line_items_are_rejected() {
    let mut invoice = simple_snapshot();
    invoice.line_items.clear();
    assert!(matches!(invoice.validate(), Err(Error::NoLineItems)));
}

#[test]
fn zero_quantity_names_the_line() {
    let mut invoice = simple_snapshot();
    invoice.line_items[1].quantity = 0;
    assert!(matches!(invoice.validate(), Err(Error::ZeroQuantity { line: 2 })));
}

#[test]
fn negative_amounts_are_rejected() {
    let mut invoice = simple_snapshot();
    invoice.discount_amount = dec("-10");
    let err = invoice.validate().unwrap_err();
    assert!(matches!(&err, Error::NegativeAmount { field, .. } if field == "discount amount"));
    assert_eq!(err.to_string(), "discount amount must not be negative, got -10");

    let mut invoice = simple_snapshot();
    invoice.line_items[0].total_price = dec("-3000.00");
    assert!(matches!(
        invoice.validate(),
        Err(Error::NegativeAmount { field, .. }) if field == "line 1 total price"
    ));

    let mut invoice = simple_snapshot();
    invoice.payments = vec![payment(None, "-1.00")];
    assert!(invoice.validate().is_err());
}

#[test]
fn zero_amounts_are_fine() {
    let mut invoice = simple_snapshot();
    invoice.tax_percentage = dec("0");
    invoice.tax_amount = dec("0.00");
    invoice.total_amount = dec("5000.00");
    invoice.validate().unwrap();
}

#[test]
fn file_name_is_sanitized() {
    let mut invoice = simple_snapshot();
    assert_eq!(invoice_file_name(&invoice), "invoice_INV-2025-0042.pdf");
    invoice.invoice_number = " INV/2025 #7 ".to_string();
    assert_eq!(invoice_file_name(&invoice), "invoice_INV_2025__7.pdf");
}
