use pdf_writer::{Name, Pdf, Ref};

/// The two standard Type1 faces used by the invoice (not embedded).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FontFace {
    Regular,
    Bold,
}

pub(crate) const ALL_FACES: [FontFace; 2] = [FontFace::Regular, FontFace::Bold];

/// Millimetres per point.
pub(crate) const PT_TO_MM: f32 = 25.4 / 72.0;

impl FontFace {
    pub(crate) fn pdf_name(self) -> &'static str {
        match self {
            FontFace::Regular => "F1",
            FontFace::Bold => "F2",
        }
    }

    fn base_font(self) -> &'static [u8] {
        match self {
            FontFace::Regular => b"Helvetica",
            FontFace::Bold => b"Helvetica-Bold",
        }
    }

    fn ascii_widths(self) -> &'static [u16; 95] {
        match self {
            FontFace::Regular => &HELVETICA_WIDTHS,
            FontFace::Bold => &HELVETICA_BOLD_WIDTHS,
        }
    }

    /// Width of a single character in 1000-units.
    pub(crate) fn char_width_1000(self, ch: char) -> f32 {
        let byte = char_to_winansi(ch);
        match byte {
            32..=126 => self.ascii_widths()[(byte - 32) as usize] as f32,
            // drawn as '?'
            0 => self.ascii_widths()[(b'?' - 32) as usize] as f32,
            _ => upper_half_width(byte),
        }
    }

    /// Rendered width of `text` in millimetres at `size_pt`.
    pub fn text_width(self, text: &str, size_pt: f32) -> f32 {
        let units: f32 = text.chars().map(|ch| self.char_width_1000(ch)).sum();
        units * size_pt / 1000.0 * PT_TO_MM
    }
}

/// Helvetica AFM advance widths for WinAnsi 32..=126.
#[rustfmt::skip]
static HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

/// Helvetica-Bold AFM advance widths for WinAnsi 32..=126.
#[rustfmt::skip]
static HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

/// Approximate widths for the WinAnsi upper half (128..=255).
fn upper_half_width(byte: u8) -> f32 {
    match byte {
        0x80 => 556.0,               // euro
        0x85 | 0x89 => 1000.0,       // ellipsis, per mille
        0x91..=0x94 => 333.0,        // curly quotes
        0x95 => 350.0,               // bullet
        0x96 => 556.0,               // en dash
        0x97 => 1000.0,              // em dash
        0xA0 => 278.0,               // nbsp
        0xA3 | 0xA5 => 556.0,        // pound, yen
        0xC0..=0xDE => 722.0,        // accented uppercase
        _ => 556.0,
    }
}

/// Map a single Unicode char to its WinAnsi byte, or 0 if unmappable.
fn char_to_winansi(c: char) -> u8 {
    match c as u32 {
        0x0020..=0x007E => c as u8,
        0x00A0..=0x00FF => c as u8,
        0x20AC => 0x80,
        0x201A => 0x82,
        0x0192 => 0x83,
        0x201E => 0x84,
        0x2026 => 0x85,
        0x2020 => 0x86,
        0x2021 => 0x87,
        0x02C6 => 0x88,
        0x2030 => 0x89,
        0x0160 => 0x8A,
        0x2039 => 0x8B,
        0x0152 => 0x8C,
        0x017D => 0x8E,
        0x2018 => 0x91,
        0x2019 => 0x92,
        0x201C => 0x93,
        0x201D => 0x94,
        0x2022 => 0x95,
        0x2013 => 0x96,
        0x2014 => 0x97,
        0x02DC => 0x98,
        0x2122 => 0x99,
        0x0161 => 0x9A,
        0x203A => 0x9B,
        0x0153 => 0x9C,
        0x017E => 0x9E,
        0x0178 => 0x9F,
        _ => 0,
    }
}

/// Convert a UTF-8 string to WinAnsi (Windows-1252) bytes for PDF Str encoding.
/// Characters outside the code page are replaced with '?'.
pub(crate) fn to_winansi_bytes(s: &str) -> Vec<u8> {
    s.chars()
        .map(|c| match char_to_winansi(c) {
            0 => b'?',
            b => b,
        })
        .collect()
}

/// Characters the standard fonts cannot show, for logging.
pub(crate) fn unmappable_chars(s: &str) -> impl Iterator<Item = char> + '_ {
    s.chars().filter(|&c| char_to_winansi(c) == 0)
}

pub(crate) struct FontEntry {
    pub(crate) face: FontFace,
    pub(crate) font_ref: Ref,
}

pub(crate) fn register_fonts(pdf: &mut Pdf, alloc: &mut impl FnMut() -> Ref) -> Vec<FontEntry> {
    ALL_FACES
        .iter()
        .map(|&face| {
            let font_ref = alloc();
            pdf.type1_font(font_ref)
                .base_font(Name(face.base_font()))
                .encoding_predefined(Name(b"WinAnsiEncoding"));
            FontEntry { face, font_ref }
        })
        .collect()
}
