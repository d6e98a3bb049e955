//! The display list produced by layout and its translation into PDF content.
//!
//! Layout coordinates are millimetres from the top-left page corner; text
//! positions are baselines. Conversion to PDF points (bottom-left origin)
//! happens only in `render_elements`.

use std::borrow::Cow;

use pdf_writer::{Content, Name, Str};

use crate::fonts::{FontFace, PT_TO_MM, to_winansi_bytes, unmappable_chars};
use crate::theme::{PageGeometry, Rgb};

use super::table::TableLayoutResult;

pub(crate) const MM_TO_PT: f32 = 72.0 / 25.4;
const ELLIPSIS: char = '\u{2026}';

/// Helvetica cap height in 1000-units, used to centre text vertically in rows.
pub(crate) const CAP_HEIGHT_1000: f32 = 718.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TextSpan {
    pub text: String,
    /// Left edge after alignment has been applied.
    pub x: f32,
    pub baseline: f32,
    pub width: f32,
    pub size: f32,
    pub face: FontFace,
    pub color: Rgb,
    pub align: Align,
}

impl TextSpan {
    pub fn right(&self) -> f32 {
        self.x + self.width
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Element {
    Text(TextSpan),
    Rule {
        x1: f32,
        x2: f32,
        y: f32,
        thickness: f32,
        color: Rgb,
    },
    Fill {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Rgb,
    },
    Logo {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SectionKind {
    Header,
    BillingParties,
    LineItems,
    Totals,
    PaymentHistory,
    CrossReferences,
    Footer,
}

/// Where a section ended up: pages are 1-based, `top`/`bottom` are cursor
/// positions on the first and last page respectively.
#[derive(Clone, Debug, PartialEq)]
pub struct SectionMark {
    pub kind: SectionKind,
    pub first_page: usize,
    pub last_page: usize,
    pub top: f32,
    pub bottom: f32,
    /// Pagination outcome for sections drawn by the table engine.
    pub table: Option<TableLayoutResult>,
}

#[derive(Clone, Debug, Default)]
pub struct Page {
    pub number: usize,
    pub elements: Vec<Element>,
}

impl Page {
    pub(crate) fn new(number: usize) -> Self {
        Self {
            number,
            elements: Vec::new(),
        }
    }

    pub fn texts(&self) -> impl Iterator<Item = &TextSpan> {
        self.elements.iter().filter_map(|e| match e {
            Element::Text(span) => Some(span),
            _ => None,
        })
    }

    pub fn find_text(&self, text: &str) -> Option<&TextSpan> {
        self.texts().find(|span| span.text == text)
    }

    pub fn contains_text(&self, text: &str) -> bool {
        self.find_text(text).is_some()
    }
}

/// A laid-out invoice, ready to be written as PDF.
#[derive(Clone, Debug)]
pub struct Layout {
    pub pages: Vec<Page>,
    pub sections: Vec<SectionMark>,
    pub geometry: PageGeometry,
}

impl Layout {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn section(&self, kind: SectionKind) -> Option<&SectionMark> {
        self.sections.iter().find(|m| m.kind == kind)
    }

    pub fn has_section(&self, kind: SectionKind) -> bool {
        self.section(kind).is_some()
    }
}

/// Build a text span whose anchor `x` is interpreted according to `align`:
/// the left edge, the centre, or the right edge of the text.
pub(crate) fn place_text(
    text: &str,
    x: f32,
    baseline: f32,
    face: FontFace,
    size: f32,
    color: Rgb,
    align: Align,
) -> TextSpan {
    let text = clean_text(text);
    let width = face.text_width(&text, size);
    let left = match align {
        Align::Left => x,
        Align::Center => x - width / 2.0,
        Align::Right => x - width,
    };
    TextSpan {
        text: text.into_owned(),
        x: left,
        baseline,
        width,
        size,
        face,
        color,
        align,
    }
}

/// Control characters (tabs, newlines) would otherwise show up as '?'.
fn clean_text(text: &str) -> Cow<'_, str> {
    if text.chars().any(char::is_control) {
        Cow::Owned(
            text.chars()
                .map(|c| if c.is_control() { ' ' } else { c })
                .collect(),
        )
    } else {
        Cow::Borrowed(text)
    }
}

/// Shorten `text` with a trailing ellipsis until it fits in `max_width` mm.
pub(crate) fn fit_text(text: &str, face: FontFace, size: f32, max_width: f32) -> Cow<'_, str> {
    if face.text_width(text, size) <= max_width {
        return Cow::Borrowed(text);
    }
    let ellipsis_w = face.text_width(&ELLIPSIS.to_string(), size);
    let mut used = 0.0f32;
    let mut out = String::new();
    for ch in text.chars() {
        let w = face.char_width_1000(ch) * size / 1000.0 * PT_TO_MM;
        if used + w + ellipsis_w > max_width {
            break;
        }
        used += w;
        out.push(ch);
    }
    let trimmed_len = out.trim_end().len();
    out.truncate(trimmed_len);
    out.push(ELLIPSIS);
    log::debug!("shortened {text:?} to {out:?} to fit {max_width:.1}mm");
    Cow::Owned(out)
}

/// Distance from a row's top edge to the baseline that centres cap height in it.
pub(crate) fn centered_baseline(row_top: f32, row_height: f32, size: f32) -> f32 {
    let cap = CAP_HEIGHT_1000 / 1000.0 * size * PT_TO_MM;
    row_top + (row_height + cap) / 2.0
}

fn set_fill(content: &mut Content, [r, g, b]: Rgb) {
    content.set_fill_rgb(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0);
}

/// Write one page of elements into `content`, converting to PDF user space.
pub(super) fn render_elements(
    content: &mut Content,
    elements: &[Element],
    geometry: &PageGeometry,
    logo_name: Option<&str>,
) {
    let px = |x: f32| x * MM_TO_PT;
    let py = |y: f32| (geometry.page_height - y) * MM_TO_PT;

    let mut i = 0;
    while i < elements.len() {
        match &elements[i] {
            Element::Text(_) => {
                // Consecutive spans share one text object, positioned with relative Td.
                let mut current_color: Option<Rgb> = None;
                let mut cur_font: Option<(FontFace, f32)> = None;
                let mut td_x = 0.0f32;
                let mut td_y = 0.0f32;
                content.begin_text();
                while let Some(Element::Text(span)) = elements.get(i) {
                    if current_color != Some(span.color) {
                        set_fill(content, span.color);
                        current_color = Some(span.color);
                    }
                    if cur_font != Some((span.face, span.size)) {
                        content.set_font(Name(span.face.pdf_name().as_bytes()), span.size);
                        cur_font = Some((span.face, span.size));
                    }
                    let (x, y) = (px(span.x), py(span.baseline));
                    content.next_line(x - td_x, y - td_y);
                    td_x = x;
                    td_y = y;

                    if let Some(ch) = unmappable_chars(&span.text).next() {
                        log::warn!("{ch:?} is not available in the standard fonts, drawn as '?'");
                    }
                    content.show(Str(&to_winansi_bytes(&span.text)));
                    i += 1;
                }
                content.end_text();
                continue;
            }
            Element::Rule {
                x1,
                x2,
                y,
                thickness,
                color: [r, g, b],
            } => {
                content.save_state();
                content.set_line_width(thickness * MM_TO_PT);
                content.set_stroke_rgb(*r as f32 / 255.0, *g as f32 / 255.0, *b as f32 / 255.0);
                content.move_to(px(*x1), py(*y));
                content.line_to(px(*x2), py(*y));
                content.stroke();
                content.restore_state();
            }
            Element::Fill {
                x,
                y,
                width,
                height,
                color,
            } => {
                content.save_state();
                set_fill(content, *color);
                content.rect(px(*x), py(y + height), width * MM_TO_PT, height * MM_TO_PT);
                content.fill_nonzero();
                content.restore_state();
            }
            Element::Logo {
                x,
                y,
                width,
                height,
            } => {
                if let Some(name) = logo_name {
                    content.save_state();
                    content.transform([
                        width * MM_TO_PT,
                        0.0,
                        0.0,
                        height * MM_TO_PT,
                        px(*x),
                        py(y + height),
                    ]);
                    content.x_object(Name(name.as_bytes()));
                    content.restore_state();
                }
            }
        }
        i += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn right_aligned_text_ends_at_anchor() {
        let span = place_text("Rs. 1,200.00", 196.0, 50.0, FontFace::Regular, 10.0, [0; 3], Align::Right);
        assert!((span.right() - 196.0).abs() < 1e-3);
    }

    #[test]
    fn centered_text_straddles_anchor() {
        let span = place_text("Thank you", 105.0, 280.0, FontFace::Regular, 9.0, [0; 3], Align::Center);
        assert!(((span.x + span.right()) / 2.0 - 105.0).abs() < 1e-3);
    }

    #[test]
    fn fit_text_keeps_short_text() {
        assert_eq!(fit_text("Bath", FontFace::Regular, 10.0, 50.0), "Bath");
    }

    #[test]
    fn fit_text_shortens_long_text() {
        let long = "Full grooming package with nail trimming, ear cleaning and teeth brushing";
        let fitted = fit_text(long, FontFace::Regular, 10.0, 40.0);
        assert!(fitted.ends_with(ELLIPSIS));
        assert!(FontFace::Regular.text_width(&fitted, 10.0) <= 40.0);
    }

    #[test]
    fn control_characters_become_spaces() {
        let span = place_text("Nail\ttrim", 14.0, 10.0, FontFace::Regular, 10.0, [0; 3], Align::Left);
        assert_eq!(span.text, "Nail trim");
    }
}
