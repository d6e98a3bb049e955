mod common;

use common::*;
use invoice_pdf::{Brand, InvoiceRenderer, Layout, SectionKind, Theme};

fn layout_for(items: usize) -> Layout {
    init_logging();
    InvoiceRenderer::default().layout(&snapshot(items)).unwrap()
}

#[test]
fn page_count_grows_with_line_items() {
    for (items, pages) in [(1, 1), (10, 1), (40, 2), (60, 3), (100, 4)] {
        assert_eq!(layout_for(items).page_count(), pages, "{items} line items");
    }
}

#[test]
fn pages_are_numbered_from_one() {
    let layout = layout_for(100);
    for (i, page) in layout.pages.iter().enumerate() {
        assert_eq!(page.number, i + 1);
    }
}

#[test]
fn table_header_repeats_on_continuation_pages() {
    let layout = layout_for(40);
    assert_eq!(layout.page_count(), 2);

    for page in &layout.pages {
        assert!(page.contains_text("Description"), "page {}", page.number);
        assert!(page.contains_text("Unit Price"), "page {}", page.number);
    }
    // Page header only on the first page.
    assert!(layout.pages[0].contains_text("INVOICE"));
    assert!(!layout.pages[1].contains_text("INVOICE"));

    let geometry = Theme::default().geometry;
    let header = span(&layout.pages[1], "Description");
    assert!(header.baseline > geometry.margin_top);
    assert!(header.baseline < geometry.margin_top + 9.0);

    let first_row = span(&layout.pages[1], "Grooming session 24");
    assert!(first_row.baseline > header.baseline + 7.0);
    assert!(layout.pages[0].contains_text("Grooming session 23"));
    assert!(!layout.pages[0].contains_text("Grooming session 24"));
}

#[test]
fn table_result_records_breaks() {
    let layout = layout_for(100);
    let mark = layout.section(SectionKind::LineItems).unwrap();
    let table = mark.table.as_ref().unwrap();

    assert_eq!(table.breaks_before, vec![23, 52, 81]);
    assert_eq!(table.pages_added, 3);
    assert_eq!(table.last_page, 4);
    assert_eq!(mark.first_page, 1);
    assert_eq!(mark.last_page, 4);
    // 19 rows under the repeated header on the last page
    assert!((table.final_y - (20.0 + 9.0 + 19.0 * 8.0)).abs() < EPS);
}

#[test]
fn totals_move_to_next_page_as_a_block() {
    // 23 rows fill page 1 exactly; the totals block cannot follow.
    let layout = layout_for(23);
    assert_eq!(layout.page_count(), 2);

    let table = layout.section(SectionKind::LineItems).unwrap();
    assert_eq!(table.last_page, 1);
    assert!(table.table.as_ref().unwrap().breaks_before.is_empty());
    assert!(!layout.pages[1].contains_text("Description"));

    let totals = layout.section(SectionKind::Totals).unwrap();
    assert_eq!(totals.first_page, 2);
    assert_eq!(totals.last_page, 2);
    assert!((totals.top - Theme::default().geometry.margin_top).abs() < EPS);
    assert!(!layout.pages[0].contains_text("Subtotal"));
    assert!(layout.pages[1].contains_text("Subtotal"));
    assert!(layout.pages[1].contains_text("Tax (18%)"));
}

#[test]
fn payment_history_title_is_not_orphaned() {
    init_logging();
    let mut invoice = snapshot(16);
    invoice.payments = vec![payment(Some("pay_1"), "100.00")];
    let layout = InvoiceRenderer::default().layout(&invoice).unwrap();

    assert_eq!(layout.section(SectionKind::Totals).unwrap().first_page, 1);
    let payments = layout.section(SectionKind::PaymentHistory).unwrap();
    assert_eq!(payments.first_page, 2);
    assert!(!layout.pages[0].contains_text("Payment History"));
    assert!(layout.pages[1].contains_text("Payment History"));
    assert!(layout.pages[1].contains_text("Transaction ID"));
}

#[test]
fn long_payment_history_repeats_its_header() {
    init_logging();
    let mut invoice = snapshot(2);
    invoice.payments = (0..45)
        .map(|i| payment(Some(&format!("pay_{i:03}")), "10.00"))
        .collect();
    let layout = InvoiceRenderer::default().layout(&invoice).unwrap();

    let mark = layout.section(SectionKind::PaymentHistory).unwrap();
    assert!(mark.last_page > mark.first_page);
    for number in mark.first_page..=mark.last_page {
        assert!(layout.pages[number - 1].contains_text("Transaction ID"));
    }
    assert_eq!(spans(&layout, "Payment History").len(), 1);
    assert_eq!(spans(&layout, "pay_044").len(), 1);
}

#[test]
fn footer_and_page_numbers_on_every_page() {
    let layout = layout_for(100);
    let brand = Brand::default();
    let total = layout.page_count();

    for page in &layout.pages {
        for line in brand.footer_lines.iter().filter(|l| !l.is_empty()) {
            assert!(page.contains_text(line), "footer missing on page {}", page.number);
        }
        assert!(page.contains_text(&format!("Page {} of {total}", page.number)));
    }
    let footers = layout
        .sections
        .iter()
        .filter(|m| m.kind == SectionKind::Footer)
        .count();
    assert_eq!(footers, total);
}

#[test]
fn body_content_stays_above_the_footer_band() {
    let layout = layout_for(100);
    let brand = Brand::default();
    let bottom = Theme::default().geometry.content_bottom();

    for page in &layout.pages {
        for s in page.texts() {
            let is_footer = brand.footer_lines.contains(&s.text) || s.text.starts_with("Page ");
            if !is_footer {
                assert!(s.baseline <= bottom, "{:?} on page {} at {}", s.text, page.number, s.baseline);
            }
        }
    }
}

#[test]
fn layout_is_deterministic() {
    let a = layout_for(60);
    let b = layout_for(60);
    assert_eq!(a.page_count(), b.page_count());
    for (pa, pb) in a.pages.iter().zip(&b.pages) {
        assert_eq!(pa.elements, pb.elements);
    }
    assert_eq!(a.sections, b.sections);
}
