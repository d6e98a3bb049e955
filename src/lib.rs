mod error;
mod fonts;
mod model;
pub mod money;
mod pdf;
pub mod theme;

pub use error::Error;
pub use fonts::FontFace;
pub use model::{BillingParty, InvoiceSnapshot, InvoiceStatus, LineItem, Payment};
pub use money::{GroupedCurrency, MoneyFormat};
pub use pdf::layout::{Align, Element, Layout, Page, SectionKind, SectionMark, TextSpan};
pub use pdf::table::TableLayoutResult;
pub use theme::{Brand, Logo, Theme};

use std::time::Instant;

use pdf::SectionEnv;

/// Renders invoice snapshots to PDF. Holds only read-only configuration, so
/// one renderer can serve many threads; every call lays out from scratch.
pub struct InvoiceRenderer {
    theme: Theme,
    brand: Brand,
    money: Box<dyn MoneyFormat>,
}

impl Default for InvoiceRenderer {
    fn default() -> Self {
        Self::new(Theme::default(), Brand::default(), GroupedCurrency::default())
    }
}

impl InvoiceRenderer {
    pub fn new(theme: Theme, brand: Brand, money: impl MoneyFormat + 'static) -> Self {
        Self {
            theme,
            brand,
            money: Box::new(money),
        }
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn brand(&self) -> &Brand {
        &self.brand
    }

    fn env(&self) -> SectionEnv<'_> {
        SectionEnv {
            theme: &self.theme,
            brand: &self.brand,
            money: self.money.as_ref(),
        }
    }

    /// Validate the snapshot and compute page geometry without producing PDF.
    pub fn layout(&self, invoice: &InvoiceSnapshot) -> Result<Layout, Error> {
        invoice.validate()?;
        Ok(pdf::layout_invoice(invoice, &self.env()))
    }

    pub fn render(&self, invoice: &InvoiceSnapshot) -> Result<Vec<u8>, Error> {
        let t0 = Instant::now();

        let layout = self.layout(invoice)?;
        let t_layout = t0.elapsed();

        let title = format!("Invoice {}", invoice.invoice_number.trim());
        let bytes = pdf::write_pdf(&layout, self.brand.logo.as_ref(), &title);
        let t_total = t0.elapsed();

        log::info!(
            "Invoice {}: {} page(s), layout={:.1}ms, write={:.1}ms, total={:.1}ms (output {} bytes)",
            invoice.invoice_number.trim(),
            layout.page_count(),
            t_layout.as_secs_f64() * 1000.0,
            (t_total - t_layout).as_secs_f64() * 1000.0,
            t_total.as_secs_f64() * 1000.0,
            bytes.len(),
        );

        Ok(bytes)
    }
}

/// Render with the default theme, branding and en-IN currency format.
pub fn render_invoice(invoice: &InvoiceSnapshot) -> Result<Vec<u8>, Error> {
    InvoiceRenderer::default().render(invoice)
}

/// `invoice_<number>.pdf`, with anything but ASCII letters, digits, '-' and
/// '_' in the number replaced by '_'.
pub fn invoice_file_name(invoice: &InvoiceSnapshot) -> String {
    let number: String = invoice
        .invoice_number
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("invoice_{number}.pdf")
}
