use crate::fonts::FontFace;
use crate::theme::{Rgb, Theme};

use super::cursor::PageContext;
use super::layout::{Align, Element, centered_baseline, fit_text, place_text};

pub(crate) const HEADER_ROW_HEIGHT: f32 = 9.0;
pub(crate) const ROW_HEIGHT: f32 = 8.0;
const CELL_PADDING: f32 = 2.0;

#[derive(Clone, Debug)]
pub struct Column {
    pub label: String,
    /// Share of the content width relative to the other columns.
    pub weight: f32,
    pub align: Align,
}

impl Column {
    pub fn new(label: &str, weight: f32, align: Align) -> Self {
        Self {
            label: label.to_string(),
            weight,
            align,
        }
    }
}

#[derive(Clone, Debug)]
pub struct TableStyle {
    pub header_fill: Rgb,
    pub header_text: Rgb,
    pub body_text: Rgb,
    /// Fill for every second body row; `None` for a plain table.
    pub stripe: Option<Rgb>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TableLayoutResult {
    /// Indices of rows that start a new page.
    pub breaks_before: Vec<usize>,
    pub final_y: f32,
    pub last_page: usize,
    pub pages_added: usize,
}

/// Column left edges and widths. Widths are proportional to the weights and
/// snapped to 0.01mm; the last column absorbs the rounding so its right edge
/// sits exactly on `right`.
pub(crate) fn column_bounds(columns: &[Column], left: f32, right: f32) -> Vec<(f32, f32)> {
    let total_weight: f32 = columns.iter().map(|c| c.weight.max(0.0)).sum();
    let available = right - left;
    let mut bounds = Vec::with_capacity(columns.len());
    let mut x = left;
    for (i, col) in columns.iter().enumerate() {
        let width = if i + 1 == columns.len() {
            right - x
        } else if total_weight > 0.0 {
            (col.weight.max(0.0) / total_weight * available * 100.0).round() / 100.0
        } else {
            (available / columns.len() as f32 * 100.0).round() / 100.0
        };
        bounds.push((x, width));
        x += width;
    }
    bounds
}

fn cell_text(
    text: &str,
    (x, width): (f32, f32),
    row_top: f32,
    row_height: f32,
    face: FontFace,
    size: f32,
    color: Rgb,
    align: Align,
) -> Element {
    let fitted = fit_text(text, face, size, (width - 2.0 * CELL_PADDING).max(0.0));
    let anchor = match align {
        Align::Left => x + CELL_PADDING,
        Align::Center => x + width / 2.0,
        Align::Right => x + width - CELL_PADDING,
    };
    let baseline = centered_baseline(row_top, row_height, size);
    Element::Text(place_text(&fitted, anchor, baseline, face, size, color, align))
}

fn draw_header(
    ctx: &mut PageContext,
    theme: &Theme,
    columns: &[Column],
    bounds: &[(f32, f32)],
    style: &TableStyle,
) {
    let top = ctx.advance(HEADER_ROW_HEIGHT);
    let g = ctx.geometry();
    let (left, width) = (g.margin_left, g.content_width());
    ctx.push(Element::Fill {
        x: left,
        y: top,
        width,
        height: HEADER_ROW_HEIGHT,
        color: style.header_fill,
    });
    for (col, &b) in columns.iter().zip(bounds) {
        ctx.push(cell_text(
            &col.label,
            b,
            top,
            HEADER_ROW_HEIGHT,
            FontFace::Bold,
            theme.fonts.body,
            style.header_text,
            col.align,
        ));
    }
}

/// Lay out a header row and `rows` under it, breaking pages between rows and
/// repeating the header at the top of every continuation page.
pub(crate) fn layout_table(
    ctx: &mut PageContext,
    theme: &Theme,
    columns: &[Column],
    rows: &[Vec<String>],
    style: &TableStyle,
) -> TableLayoutResult {
    let g = ctx.geometry();
    let bounds = column_bounds(columns, g.margin_left, g.margin_right);
    let start_page = ctx.page_number();

    // Keep the header together with at least the first row.
    let first_block = HEADER_ROW_HEIGHT + if rows.is_empty() { 0.0 } else { ROW_HEIGHT };
    ctx.ensure_space(first_block);
    draw_header(ctx, theme, columns, &bounds, style);

    let mut breaks_before = Vec::new();
    for (ri, row) in rows.iter().enumerate() {
        if ctx.ensure_space(ROW_HEIGHT) {
            breaks_before.push(ri);
            draw_header(ctx, theme, columns, &bounds, style);
        }
        let top = ctx.advance(ROW_HEIGHT);
        log::debug!("table row={ri} page={} top={top:.2}", ctx.page_number());

        if let Some(stripe) = style.stripe
            && ri % 2 == 1
        {
            let g = ctx.geometry();
            let (left, width) = (g.margin_left, g.content_width());
            ctx.push(Element::Fill {
                x: left,
                y: top,
                width,
                height: ROW_HEIGHT,
                color: stripe,
            });
        }

        for (ci, (col, &b)) in columns.iter().zip(&bounds).enumerate() {
            let text = row.get(ci).map(String::as_str).unwrap_or("");
            if text.is_empty() {
                continue;
            }
            ctx.push(cell_text(
                text,
                b,
                top,
                ROW_HEIGHT,
                FontFace::Regular,
                theme.fonts.body,
                style.body_text,
                col.align,
            ));
        }
    }

    let g = ctx.geometry();
    let (left, right, divider) = (g.margin_left, g.margin_right, theme.palette.divider);
    let final_y = ctx.cursor();
    ctx.push(Element::Rule {
        x1: left,
        x2: right,
        y: final_y,
        thickness: 0.2,
        color: divider,
    });

    TableLayoutResult {
        breaks_before,
        final_y,
        last_page: ctx.page_number(),
        pages_added: ctx.page_number() - start_page,
    }
}
