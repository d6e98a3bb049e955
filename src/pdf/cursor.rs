use crate::theme::PageGeometry;

use super::layout::{Element, Layout, Page, SectionKind, SectionMark};
use super::table::TableLayoutResult;

/// Vertical cursor plus page-break policy for one render.
///
/// Blocks are atomic: `advance` moves a whole block to the next page rather
/// than splitting it. Only the table engine breaks between rows.
pub(crate) struct PageContext<'g> {
    geometry: &'g PageGeometry,
    pages: Vec<Page>,
    sections: Vec<SectionMark>,
    cursor: f32,
}

pub(crate) struct OpenSection {
    kind: SectionKind,
    page: usize,
    top: f32,
}

impl<'g> PageContext<'g> {
    /// Starts on page 1 with the cursor at the top edge of the paper.
    pub(crate) fn new(geometry: &'g PageGeometry) -> Self {
        Self {
            geometry,
            pages: vec![Page::new(1)],
            sections: Vec::new(),
            cursor: 0.0,
        }
    }

    pub(crate) fn geometry(&self) -> &'g PageGeometry {
        self.geometry
    }

    pub(crate) fn page_number(&self) -> usize {
        self.pages.len()
    }

    pub(crate) fn cursor(&self) -> f32 {
        self.cursor
    }

    pub(crate) fn remaining(&self) -> f32 {
        self.geometry.content_bottom() - self.cursor
    }

    fn at_page_top(&self) -> bool {
        self.page_number() > 1 && (self.cursor - self.geometry.margin_top).abs() < 0.01
    }

    pub(crate) fn page_break(&mut self) {
        let next = self.page_number() + 1;
        log::debug!(
            "page break: page {} closed at y={:.2}, opening page {next}",
            self.page_number(),
            self.cursor
        );
        self.pages.push(Page::new(next));
        self.cursor = self.geometry.margin_top;
    }

    /// Break the page unless at least `min_height` remains. Returns whether a
    /// break happened. A fresh page never breaks again, so content taller than
    /// a page overflows instead of looping.
    pub(crate) fn ensure_space(&mut self, min_height: f32) -> bool {
        if self.cursor + min_height <= self.geometry.content_bottom() || self.at_page_top() {
            return false;
        }
        self.page_break();
        true
    }

    /// Reserve `amount` for an atomic block and return its top edge.
    pub(crate) fn advance(&mut self, amount: f32) -> f32 {
        self.ensure_space(amount);
        if self.cursor + amount > self.geometry.content_bottom() {
            log::warn!(
                "block of {amount:.1}mm is taller than the usable page, it will overflow the bottom margin"
            );
        }
        let top = self.cursor;
        self.cursor += amount;
        top
    }

    /// Move down without a break check; a gap that crosses the bottom margin
    /// is absorbed by the next `ensure_space`/`advance`.
    pub(crate) fn skip(&mut self, amount: f32) {
        self.cursor += amount;
    }

    pub(crate) fn push(&mut self, element: Element) {
        // pages is never empty: it starts with page 1 and only grows
        if let Some(page) = self.pages.last_mut() {
            page.elements.push(element);
        }
    }

    pub(crate) fn open_section(&self, kind: SectionKind) -> OpenSection {
        OpenSection {
            kind,
            page: self.page_number(),
            top: self.cursor,
        }
    }

    /// For sections that reserve their block with `advance` first, so the
    /// mark lands on the page the block was moved to.
    pub(crate) fn open_section_at(&self, kind: SectionKind, top: f32) -> OpenSection {
        OpenSection {
            kind,
            page: self.page_number(),
            top,
        }
    }

    pub(crate) fn close_section(&mut self, open: OpenSection) {
        self.record(open, None);
    }

    pub(crate) fn close_table_section(&mut self, open: OpenSection, table: TableLayoutResult) {
        self.record(open, Some(table));
    }

    fn record(&mut self, open: OpenSection, table: Option<TableLayoutResult>) {
        self.sections.push(SectionMark {
            kind: open.kind,
            first_page: open.page,
            last_page: self.page_number(),
            top: open.top,
            bottom: self.cursor,
            table,
        });
    }

    pub(crate) fn finish(self) -> Layout {
        Layout {
            pages: self.pages,
            sections: self.sections,
            geometry: self.geometry.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::Theme;

    #[test]
    fn advance_returns_anchor_and_moves_cursor() {
        let theme = Theme::default();
        let mut ctx = PageContext::new(&theme.geometry);
        ctx.skip(40.0);
        assert_eq!(ctx.advance(10.0), 40.0);
        assert_eq!(ctx.cursor(), 50.0);
        assert_eq!(ctx.page_number(), 1);
    }

    #[test]
    fn advance_moves_block_to_next_page_whole() {
        let theme = Theme::default();
        let mut ctx = PageContext::new(&theme.geometry);
        ctx.skip(theme.geometry.content_bottom() - 5.0);
        let top = ctx.advance(8.0);
        assert_eq!(ctx.page_number(), 2);
        assert_eq!(top, theme.geometry.margin_top);
        assert_eq!(ctx.cursor(), theme.geometry.margin_top + 8.0);
    }

    #[test]
    fn block_ending_exactly_at_bottom_stays() {
        let theme = Theme::default();
        let mut ctx = PageContext::new(&theme.geometry);
        ctx.skip(theme.geometry.content_bottom() - 8.0);
        ctx.advance(8.0);
        assert_eq!(ctx.page_number(), 1);
    }

    #[test]
    fn ensure_space_reports_breaks() {
        let theme = Theme::default();
        let mut ctx = PageContext::new(&theme.geometry);
        ctx.skip(100.0);
        assert!(!ctx.ensure_space(50.0));
        ctx.skip(150.0);
        assert!(ctx.ensure_space(50.0));
        assert_eq!(ctx.page_number(), 2);
    }

    #[test]
    fn oversized_block_does_not_loop() {
        let theme = Theme::default();
        let mut ctx = PageContext::new(&theme.geometry);
        ctx.skip(200.0);
        assert!(ctx.ensure_space(400.0));
        assert!(!ctx.ensure_space(400.0));
        let top = ctx.advance(400.0);
        assert_eq!(top, theme.geometry.margin_top);
        assert_eq!(ctx.page_number(), 2);
    }

    #[test]
    fn page_numbers_are_monotonic() {
        let theme = Theme::default();
        let mut ctx = PageContext::new(&theme.geometry);
        for expected in 2..=5 {
            ctx.page_break();
            assert_eq!(ctx.page_number(), expected);
        }
        let layout = ctx.finish();
        let numbers: Vec<usize> = layout.pages.iter().map(|p| p.number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5]);
    }
}
