#![allow(dead_code)]

use std::str::FromStr;

use chrono::{NaiveDate, TimeZone, Utc};
use invoice_pdf::{
    BillingParty, InvoiceSnapshot, InvoiceStatus, Layout, LineItem, Page, Payment, TextSpan,
};
use rust_decimal::Decimal;

pub const EPS: f32 = 1e-3;

/// Route `log` output through the test harness; safe to call from every test.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn item(i: usize) -> LineItem {
    let quantity = 1 + (i % 3) as u32;
    let unit_price = dec("1200.00") + Decimal::from(i as u32 * 50);
    LineItem {
        description: format!("Grooming session {}", i + 1),
        quantity,
        unit_price,
        total_price: unit_price * Decimal::from(quantity),
    }
}

/// A pending invoice with `items` line items, 18% tax, no discount, no
/// payments and no cross references. Totals add up.
pub fn snapshot(items: usize) -> InvoiceSnapshot {
    let line_items: Vec<LineItem> = (0..items).map(item).collect();
    let subtotal: Decimal = line_items.iter().map(|l| l.total_price).sum();
    let tax_percentage = dec("18");
    let tax_amount = (subtotal * tax_percentage / Decimal::ONE_HUNDRED).round_dp(2);
    InvoiceSnapshot {
        invoice_number: "INV-2025-0042".to_string(),
        created_at: Utc.with_ymd_and_hms(2025, 3, 12, 10, 30, 0).unwrap(),
        due_date: NaiveDate::from_ymd_opt(2025, 3, 26),
        status: InvoiceStatus::Pending,
        owner: BillingParty {
            name: "Asha Menon".to_string(),
            email: Some("asha.menon@example.com".to_string()),
            phone: Some("+91 98450 12345".to_string()),
        },
        subtotal,
        tax_percentage,
        tax_amount,
        discount_amount: Decimal::ZERO,
        total_amount: subtotal + tax_amount,
        line_items,
        payments: Vec::new(),
        booking_id: None,
        subscription_id: None,
    }
}

/// Two items with round figures: subtotal 5000, tax 900 (18%).
pub fn simple_snapshot() -> InvoiceSnapshot {
    let mut s = snapshot(0);
    s.line_items = vec![
        LineItem {
            description: "Full grooming".to_string(),
            quantity: 2,
            unit_price: dec("1500.00"),
            total_price: dec("3000.00"),
        },
        LineItem {
            description: "Vaccination".to_string(),
            quantity: 1,
            unit_price: dec("2000.00"),
            total_price: dec("2000.00"),
        },
    ];
    s.subtotal = dec("5000.00");
    s.tax_amount = dec("900.00");
    s.total_amount = dec("5900.00");
    s
}

pub fn payment(transaction_id: Option<&str>, amount: &str) -> Payment {
    Payment {
        transaction_id: transaction_id.map(str::to_string),
        created_at: Utc.with_ymd_and_hms(2025, 3, 13, 9, 0, 0).unwrap(),
        method: "UPI".to_string(),
        status: "success".to_string(),
        amount: dec(amount),
    }
}

/// Every span with exactly this text, across all pages, with its page number.
pub fn spans<'a>(layout: &'a Layout, text: &str) -> Vec<(usize, &'a TextSpan)> {
    layout
        .pages
        .iter()
        .flat_map(|p| p.texts().map(move |s| (p.number, s)))
        .filter(|(_, s)| s.text == text)
        .collect()
}

pub fn span<'a>(page: &'a Page, text: &str) -> &'a TextSpan {
    page.find_text(text)
        .unwrap_or_else(|| panic!("{text:?} not found on page {}", page.number))
}

pub fn count_occurrences(haystack: &[u8], needle: &[u8]) -> usize {
    haystack
        .windows(needle.len())
        .filter(|w| *w == needle)
        .count()
}
