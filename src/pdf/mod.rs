mod cursor;
pub(crate) mod layout;
mod sections;
pub(crate) mod table;

use pdf_writer::{Content, Filter, Name, Pdf, Rect, Ref, TextStr};

use crate::fonts::register_fonts;
use crate::model::InvoiceSnapshot;
use crate::theme::Logo;

use cursor::PageContext;
use layout::{Element, Layout, MM_TO_PT, render_elements};
pub(crate) use sections::SectionEnv;

const LOGO_XOBJECT: &str = "Im1";

/// Run the sections in document order over a fresh page context.
/// The snapshot must already be validated.
pub(crate) fn layout_invoice(invoice: &InvoiceSnapshot, env: &SectionEnv) -> Layout {
    let mut ctx = PageContext::new(&env.theme.geometry);

    sections::header(&mut ctx, invoice, env);
    sections::billing_parties(&mut ctx, invoice, env);
    sections::line_items(&mut ctx, invoice, env);
    sections::totals(&mut ctx, invoice, env);
    sections::payment_history(&mut ctx, invoice, env);
    sections::cross_references(&mut ctx, invoice, env);

    let mut layout = ctx.finish();
    let total_pages = layout.pages.len();
    for page in &mut layout.pages {
        let mark = sections::footer(page, total_pages, env);
        layout.sections.push(mark);
    }
    layout
}

/// Decode a PNG and write it as an image XObject, with an SMask when it has
/// transparency. Returns `None` if the bytes cannot be decoded.
fn embed_png(png: &[u8], pdf: &mut Pdf, alloc: &mut impl FnMut() -> Ref) -> Option<Ref> {
    let cursor = std::io::Cursor::new(png);
    let reader =
        image::ImageReader::with_format(std::io::BufReader::new(cursor), image::ImageFormat::Png);
    let decoded = match reader.decode() {
        Ok(decoded) => decoded,
        Err(e) => {
            log::warn!("Logo could not be decoded ({e}), header drawn without it");
            return None;
        }
    };

    let rgba: image::RgbaImage = decoded.to_rgba8();
    let (w, h) = (rgba.width(), rgba.height());
    let has_alpha = rgba.pixels().any(|p| p.0[3] < 255);

    let rgb_data: Vec<u8> = rgba
        .pixels()
        .flat_map(|p| [p.0[0], p.0[1], p.0[2]])
        .collect();
    let compressed_rgb = miniz_oxide::deflate::compress_to_vec_zlib(&rgb_data, 6);

    let smask_ref = if has_alpha {
        let alpha_data: Vec<u8> = rgba.pixels().map(|p| p.0[3]).collect();
        let compressed_alpha = miniz_oxide::deflate::compress_to_vec_zlib(&alpha_data, 6);
        let mask_ref = alloc();
        let mut mask = pdf.image_xobject(mask_ref, &compressed_alpha);
        mask.filter(Filter::FlateDecode);
        mask.width(w as i32);
        mask.height(h as i32);
        mask.color_space().device_gray();
        mask.bits_per_component(8);
        Some(mask_ref)
    } else {
        None
    };

    let xobj_ref = alloc();
    let mut xobj = pdf.image_xobject(xobj_ref, &compressed_rgb);
    xobj.filter(Filter::FlateDecode);
    xobj.width(w as i32);
    xobj.height(h as i32);
    xobj.color_space().device_rgb();
    xobj.bits_per_component(8);
    if let Some(mask_ref) = smask_ref {
        xobj.s_mask(mask_ref);
    }
    Some(xobj_ref)
}

/// Serialize a finished layout. Output depends only on the layout and the
/// logo bytes, so equal inputs give byte-identical files.
pub(crate) fn write_pdf(layout: &Layout, logo: Option<&Logo>, title: &str) -> Vec<u8> {
    let t0 = std::time::Instant::now();
    let mut pdf = Pdf::new();
    let mut next_id = 1i32;
    let mut alloc = || {
        let r = Ref::new(next_id);
        next_id += 1;
        r
    };

    let catalog_id = alloc();
    let pages_id = alloc();
    let info_id = alloc();

    let fonts = register_fonts(&mut pdf, &mut alloc);

    let draws_logo = layout
        .pages
        .iter()
        .flat_map(|p| p.elements.iter())
        .any(|e| matches!(e, Element::Logo { .. }));
    let logo_ref = match logo {
        Some(logo) if draws_logo => embed_png(&logo.png, &mut pdf, &mut alloc),
        _ => None,
    };
    let logo_name = logo_ref.map(|_| LOGO_XOBJECT);

    let n = layout.pages.len();
    let page_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();
    let content_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();

    for (i, page) in layout.pages.iter().enumerate() {
        let mut content = Content::new();
        render_elements(&mut content, &page.elements, &layout.geometry, logo_name);
        let raw = content.finish();
        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(raw.as_slice(), 6);
        pdf.stream(content_ids[i], &compressed).filter(Filter::FlateDecode);
    }

    pdf.catalog(catalog_id).pages(pages_id);
    pdf.pages(pages_id)
        .kids(page_ids.iter().copied())
        .count(n as i32);
    pdf.document_info(info_id)
        .title(TextStr(title))
        .producer(TextStr(concat!("invoice-pdf ", env!("CARGO_PKG_VERSION"))));

    let g = &layout.geometry;
    let media_box = Rect::new(0.0, 0.0, g.page_width * MM_TO_PT, g.page_height * MM_TO_PT);
    for i in 0..n {
        let mut page = pdf.page(page_ids[i]);
        page.media_box(media_box)
            .parent(pages_id)
            .contents(content_ids[i]);
        let mut resources = page.resources();
        {
            let mut font_dict = resources.fonts();
            for entry in &fonts {
                font_dict.pair(Name(entry.face.pdf_name().as_bytes()), entry.font_ref);
            }
        }
        if let Some(xobj_ref) = logo_ref {
            resources
                .x_objects()
                .pair(Name(LOGO_XOBJECT.as_bytes()), xobj_ref);
        }
    }

    let bytes = pdf.finish();
    log::debug!(
        "write_pdf: {n} page(s), {} bytes in {:.1}ms",
        bytes.len(),
        t0.elapsed().as_secs_f64() * 1000.0
    );
    bytes
}
