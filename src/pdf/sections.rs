//! The invoice sections, in document order. Each one reads the snapshot, draws
//! at anchors handed out by the `PageContext`, and leaves the cursor beneath
//! itself.

use rust_decimal::Decimal;

use crate::fonts::FontFace;
use crate::model::{InvoiceSnapshot, InvoiceStatus, present};
use crate::money::{MoneyFormat, format_percentage};
use crate::theme::{Brand, Rgb, Theme};

use super::cursor::PageContext;
use super::layout::{Align, Element, Page, SectionKind, SectionMark, place_text};
use super::table::{Column, HEADER_ROW_HEIGHT, ROW_HEIGHT, TableStyle, layout_table};

const DATE_FORMAT: &str = "%d %b %Y";
const PLACEHOLDER: &str = "N/A";

// Header (page 1 only)
const HEADER_TOP: f32 = 10.0;
const HEADER_HEIGHT: f32 = 24.0;
const BRAND_BASELINE: f32 = 10.0;
const TAGLINE_BASELINE: f32 = 16.0;
const INVOICE_NO_BASELINE: f32 = 17.0;
const HEADER_DIVIDER: f32 = 22.0;
const LOGO_MAX_HEIGHT: f32 = 18.0;
const LOGO_GAP: f32 = 4.0;

// Billing parties
const PARTIES_GAP: f32 = 4.0;
const PARTIES_HEIGHT: f32 = 30.0;
const DETAILS_X: f32 = 130.0;
const PARTY_TITLE_BASELINE: f32 = 5.0;
const PARTY_LINE_BASELINES: [f32; 3] = [12.0, 18.0, 24.0];

const TABLE_GAP: f32 = 4.0;

// Totals
const TOTALS_GAP: f32 = 6.0;
const TOTALS_LABEL_X: f32 = 130.0;
const SUBTOTAL_BASELINE: f32 = 5.0;
const TAX_BASELINE: f32 = 12.0;
const DISCOUNT_BASELINE: f32 = 19.0;
/// Rule offset from the block top, without and with a discount line.
const TOTALS_RULE: [f32; 2] = [15.0, 22.0];
const GRAND_TOTAL_BELOW_RULE: f32 = 8.0;
const TOTALS_PADDING_BELOW: f32 = 3.0;

// Payment history
const PAYMENTS_GAP: f32 = 8.0;
const SECTION_TITLE_HEIGHT: f32 = 8.0;
const SECTION_TITLE_BASELINE: f32 = 5.0;

// Cross references
const REFERENCES_GAP: f32 = 6.0;
const REFERENCE_LINE_HEIGHT: f32 = 6.0;
const REFERENCE_BASELINE: f32 = 4.0;

// Footer, measured up from the bottom edge of the paper
const FOOTER_DIVIDER_FROM_BOTTOM: f32 = 26.0;
const FOOTER_LINE_FROM_BOTTOM: [f32; 2] = [20.0, 15.0];
const PAGE_NUMBER_FROM_BOTTOM: f32 = 10.0;

/// Read-only inputs shared by every section.
pub(crate) struct SectionEnv<'a> {
    pub(crate) theme: &'a Theme,
    pub(crate) brand: &'a Brand,
    pub(crate) money: &'a dyn MoneyFormat,
}

impl SectionEnv<'_> {
    fn text(
        &self,
        text: &str,
        x: f32,
        baseline: f32,
        face: FontFace,
        size: f32,
        color: Rgb,
        align: Align,
    ) -> Element {
        Element::Text(place_text(text, x, baseline, face, size, color, align))
    }

    fn divider(&self, y: f32, thickness: f32) -> Element {
        let g = &self.theme.geometry;
        Element::Rule {
            x1: g.margin_left,
            x2: g.margin_right,
            y,
            thickness,
            color: self.theme.palette.divider,
        }
    }

    fn status_color(&self, status: InvoiceStatus) -> Rgb {
        let p = &self.theme.palette;
        match status {
            InvoiceStatus::Paid => p.positive,
            InvoiceStatus::Overdue | InvoiceStatus::Cancelled => p.negative,
            InvoiceStatus::Draft | InvoiceStatus::Pending | InvoiceStatus::Refunded => p.muted,
        }
    }
}

pub(crate) fn header(ctx: &mut PageContext, invoice: &InvoiceSnapshot, env: &SectionEnv) {
    ctx.skip(HEADER_TOP);
    let open = ctx.open_section(SectionKind::Header);
    let top = ctx.advance(HEADER_HEIGHT);
    let (t, g) = (env.theme, &env.theme.geometry);

    let mut brand_x = g.margin_left;
    if let Some(logo) = &env.brand.logo {
        let scale = (LOGO_MAX_HEIGHT / logo.height).min(1.0);
        let (width, height) = (logo.width * scale, logo.height * scale);
        ctx.push(Element::Logo {
            x: g.margin_left,
            y: top,
            width,
            height,
        });
        brand_x += width + LOGO_GAP;
    }

    ctx.push(env.text(
        &env.brand.name,
        brand_x,
        top + BRAND_BASELINE,
        FontFace::Bold,
        t.fonts.title,
        t.palette.primary,
        Align::Left,
    ));
    if !env.brand.tagline.is_empty() {
        ctx.push(env.text(
            &env.brand.tagline,
            brand_x,
            top + TAGLINE_BASELINE,
            FontFace::Regular,
            t.fonts.small,
            t.palette.muted,
            Align::Left,
        ));
    }
    ctx.push(env.text(
        "INVOICE",
        g.margin_right,
        top + BRAND_BASELINE,
        FontFace::Bold,
        t.fonts.title,
        t.palette.text,
        Align::Right,
    ));
    ctx.push(env.text(
        &format!("#{}", invoice.invoice_number.trim()),
        g.margin_right,
        top + INVOICE_NO_BASELINE,
        FontFace::Regular,
        t.fonts.body,
        t.palette.muted,
        Align::Right,
    ));
    ctx.push(env.divider(top + HEADER_DIVIDER, 0.5));
    ctx.close_section(open);
}

pub(crate) fn billing_parties(ctx: &mut PageContext, invoice: &InvoiceSnapshot, env: &SectionEnv) {
    ctx.skip(PARTIES_GAP);
    let open = ctx.open_section(SectionKind::BillingParties);
    let top = ctx.advance(PARTIES_HEIGHT);
    let (t, g) = (env.theme, &env.theme.geometry);

    ctx.push(env.text(
        "Bill To",
        g.margin_left,
        top + PARTY_TITLE_BASELINE,
        FontFace::Bold,
        t.fonts.section_title,
        t.palette.primary,
        Align::Left,
    ));
    let owner = &invoice.owner;
    let owner_lines = [
        (owner.name.trim(), FontFace::Bold, t.fonts.body, t.palette.text),
        (present(&owner.email).unwrap_or(""), FontFace::Regular, t.fonts.small, t.palette.muted),
        (present(&owner.phone).unwrap_or(""), FontFace::Regular, t.fonts.small, t.palette.muted),
    ];
    // Missing contact details leave their slot empty so the column keeps its shape.
    for ((text, face, size, color), offset) in owner_lines.into_iter().zip(PARTY_LINE_BASELINES) {
        if !text.is_empty() {
            ctx.push(env.text(text, g.margin_left, top + offset, face, size, color, Align::Left));
        }
    }

    ctx.push(env.text(
        "Invoice Details",
        DETAILS_X,
        top + PARTY_TITLE_BASELINE,
        FontFace::Bold,
        t.fonts.section_title,
        t.palette.primary,
        Align::Left,
    ));
    let due = invoice
        .due_date
        .map(|d| d.format(DATE_FORMAT).to_string())
        .unwrap_or_else(|| PLACEHOLDER.to_string());
    let status = invoice.status.label().to_uppercase();
    let details = [
        ("Date:", invoice.created_at.format(DATE_FORMAT).to_string(), FontFace::Regular, t.palette.text),
        ("Due Date:", due, FontFace::Regular, t.palette.text),
        ("Status:", status, FontFace::Bold, env.status_color(invoice.status)),
    ];
    for ((label, value, face, color), offset) in details.into_iter().zip(PARTY_LINE_BASELINES) {
        let baseline = top + offset;
        ctx.push(env.text(label, DETAILS_X, baseline, FontFace::Regular, t.fonts.body, t.palette.muted, Align::Left));
        ctx.push(env.text(&value, g.margin_right, baseline, face, t.fonts.body, color, Align::Right));
    }
    ctx.close_section(open);
}

pub(crate) fn line_items(ctx: &mut PageContext, invoice: &InvoiceSnapshot, env: &SectionEnv) {
    ctx.skip(TABLE_GAP);
    // Same check the table makes, done here so the section opens on the right page.
    ctx.ensure_space(HEADER_ROW_HEIGHT + ROW_HEIGHT);
    let open = ctx.open_section(SectionKind::LineItems);
    let t = env.theme;

    let columns = [
        Column::new("Description", 3.2, Align::Left),
        Column::new("Qty", 0.8, Align::Center),
        Column::new("Unit Price", 1.5, Align::Right),
        Column::new("Total", 1.5, Align::Right),
    ];
    let rows: Vec<Vec<String>> = invoice
        .line_items
        .iter()
        .map(|item| {
            vec![
                item.description.trim().to_string(),
                item.quantity.to_string(),
                env.money.format(item.unit_price),
                env.money.format(item.total_price),
            ]
        })
        .collect();
    let style = TableStyle {
        header_fill: t.palette.primary,
        header_text: t.palette.on_primary,
        body_text: t.palette.text,
        stripe: Some(t.palette.stripe),
    };

    let result = layout_table(ctx, t, &columns, &rows, &style);
    log::debug!(
        "line items: {} rows, {} page(s) added, ends on page {} at y={:.2}",
        rows.len(),
        result.pages_added,
        result.last_page,
        result.final_y
    );
    ctx.close_table_section(open, result);
}

/// Height of the totals block; the only thing a discount line changes.
pub(crate) fn totals_height(has_discount: bool) -> f32 {
    TOTALS_RULE[has_discount as usize] + GRAND_TOTAL_BELOW_RULE + TOTALS_PADDING_BELOW
}

pub(crate) fn totals(ctx: &mut PageContext, invoice: &InvoiceSnapshot, env: &SectionEnv) {
    ctx.skip(TOTALS_GAP);
    let has_discount = invoice.discount_amount > Decimal::ZERO;
    let top = ctx.advance(totals_height(has_discount));
    let open = ctx.open_section_at(SectionKind::Totals, top);
    let (t, g) = (env.theme, &env.theme.geometry);

    let expected = invoice.subtotal + invoice.tax_amount - invoice.discount_amount;
    if (expected - invoice.total_amount).abs() > Decimal::new(1, 2) {
        log::warn!(
            "invoice {}: total {} differs from subtotal + tax - discount = {}; printing the given total",
            invoice.invoice_number,
            invoice.total_amount,
            expected
        );
    }

    let tax_label = format!("Tax ({}%)", format_percentage(invoice.tax_percentage));
    let mut lines = vec![
        ("Subtotal".to_string(), env.money.format(invoice.subtotal), t.palette.text, SUBTOTAL_BASELINE),
        (tax_label, env.money.format(invoice.tax_amount), t.palette.text, TAX_BASELINE),
    ];
    if has_discount {
        lines.push((
            "Discount".to_string(),
            format!("-{}", env.money.format(invoice.discount_amount)),
            t.palette.positive,
            DISCOUNT_BASELINE,
        ));
    }
    for (label, value, color, offset) in &lines {
        let baseline = top + offset;
        ctx.push(env.text(label, TOTALS_LABEL_X, baseline, FontFace::Regular, t.fonts.body, *color, Align::Left));
        ctx.push(env.text(value, g.margin_right, baseline, FontFace::Regular, t.fonts.body, *color, Align::Right));
    }

    let rule_y = top + TOTALS_RULE[has_discount as usize];
    ctx.push(Element::Rule {
        x1: TOTALS_LABEL_X,
        x2: g.margin_right,
        y: rule_y,
        thickness: 0.3,
        color: t.palette.divider,
    });
    let total_baseline = rule_y + GRAND_TOTAL_BELOW_RULE;
    ctx.push(env.text(
        "Total",
        TOTALS_LABEL_X,
        total_baseline,
        FontFace::Bold,
        t.fonts.grand_total,
        t.palette.text,
        Align::Left,
    ));
    ctx.push(env.text(
        &env.money.format(invoice.total_amount),
        g.margin_right,
        total_baseline,
        FontFace::Bold,
        t.fonts.grand_total,
        t.palette.primary,
        Align::Right,
    ));
    ctx.close_section(open);
}

pub(crate) fn payment_history(ctx: &mut PageContext, invoice: &InvoiceSnapshot, env: &SectionEnv) {
    if invoice.payments.is_empty() {
        log::debug!("no payments recorded, skipping payment history");
        return;
    }
    ctx.skip(PAYMENTS_GAP);
    // The title must not be left alone at the bottom of a page.
    ctx.ensure_space(SECTION_TITLE_HEIGHT + HEADER_ROW_HEIGHT + ROW_HEIGHT);
    let open = ctx.open_section(SectionKind::PaymentHistory);
    let (t, g) = (env.theme, &env.theme.geometry);

    let top = ctx.advance(SECTION_TITLE_HEIGHT);
    ctx.push(env.text(
        "Payment History",
        g.margin_left,
        top + SECTION_TITLE_BASELINE,
        FontFace::Bold,
        t.fonts.section_title,
        t.palette.primary,
        Align::Left,
    ));

    let columns = [
        Column::new("Transaction ID", 2.4, Align::Left),
        Column::new("Date", 1.4, Align::Left),
        Column::new("Method", 1.5, Align::Left),
        Column::new("Status", 1.2, Align::Center),
        Column::new("Amount", 1.5, Align::Right),
    ];
    let rows: Vec<Vec<String>> = invoice
        .payments
        .iter()
        .map(|p| {
            vec![
                present(&p.transaction_id).unwrap_or(PLACEHOLDER).to_string(),
                p.created_at.format(DATE_FORMAT).to_string(),
                p.method.trim().to_string(),
                p.status.trim().to_uppercase(),
                env.money.format(p.amount),
            ]
        })
        .collect();
    let style = TableStyle {
        header_fill: t.palette.muted,
        header_text: t.palette.on_primary,
        body_text: t.palette.text,
        stripe: Some(t.palette.stripe),
    };

    let result = layout_table(ctx, t, &columns, &rows, &style);
    log::debug!(
        "payment history: {} rows, ends on page {} with {:.1}mm left",
        rows.len(),
        result.last_page,
        ctx.remaining()
    );
    ctx.close_table_section(open, result);
}

pub(crate) fn cross_references(ctx: &mut PageContext, invoice: &InvoiceSnapshot, env: &SectionEnv) {
    let references: Vec<(&str, &str)> = [
        ("Booking ID:", present(&invoice.booking_id)),
        ("Subscription ID:", present(&invoice.subscription_id)),
    ]
    .into_iter()
    .filter_map(|(label, value)| value.map(|v| (label, v)))
    .collect();
    if references.is_empty() {
        return;
    }

    ctx.skip(REFERENCES_GAP);
    let top = ctx.advance(references.len() as f32 * REFERENCE_LINE_HEIGHT);
    let open = ctx.open_section_at(SectionKind::CrossReferences, top);
    let (t, g) = (env.theme, &env.theme.geometry);

    for (i, (label, value)) in references.into_iter().enumerate() {
        let baseline = top + i as f32 * REFERENCE_LINE_HEIGHT + REFERENCE_BASELINE;
        let label_el = place_text(label, g.margin_left, baseline, FontFace::Bold, t.fonts.small, t.palette.muted, Align::Left);
        let value_x = label_el.right() + 1.5;
        ctx.push(Element::Text(label_el));
        ctx.push(env.text(value, value_x, baseline, FontFace::Regular, t.fonts.small, t.palette.text, Align::Left));
    }
    ctx.close_section(open);
}

/// Draw the footer onto a finished page. Runs after layout because the
/// page count is only known then.
pub(crate) fn footer(page: &mut Page, total_pages: usize, env: &SectionEnv) -> SectionMark {
    let (t, g) = (env.theme, &env.theme.geometry);
    let bottom = g.page_height;
    page.elements.push(env.divider(bottom - FOOTER_DIVIDER_FROM_BOTTOM, 0.2));

    let faces = [FontFace::Bold, FontFace::Regular];
    for (i, line) in env.brand.footer_lines.iter().enumerate() {
        if line.is_empty() {
            continue;
        }
        page.elements.push(env.text(
            line,
            g.center_x(),
            bottom - FOOTER_LINE_FROM_BOTTOM[i],
            faces[i],
            t.fonts.small,
            t.palette.muted,
            Align::Center,
        ));
    }
    if total_pages > 1 {
        page.elements.push(env.text(
            &format!("Page {} of {total_pages}", page.number),
            g.margin_right,
            bottom - PAGE_NUMBER_FROM_BOTTOM,
            FontFace::Regular,
            t.fonts.small,
            t.palette.muted,
            Align::Right,
        ));
    }

    SectionMark {
        kind: SectionKind::Footer,
        first_page: page.number,
        last_page: page.number,
        top: bottom - FOOTER_DIVIDER_FROM_BOTTOM,
        bottom: bottom - PAGE_NUMBER_FROM_BOTTOM,
        table: None,
    }
}
