//! Colors, font sizes, page geometry and branding shared by every section.
//!
//! Geometry is in millimetres with the origin at the top-left corner of the
//! page. Font sizes are in points.

pub type Rgb = [u8; 3];

#[derive(Clone, Debug)]
pub struct Palette {
    pub primary: Rgb,
    pub muted: Rgb,
    pub text: Rgb,
    pub positive: Rgb,
    pub negative: Rgb,
    pub divider: Rgb,
    pub stripe: Rgb,
    pub on_primary: Rgb,
}

#[derive(Clone, Debug)]
pub struct FontSizes {
    pub title: f32,
    pub section_title: f32,
    pub body: f32,
    pub small: f32,
    pub grand_total: f32,
}

#[derive(Clone, Debug)]
pub struct PageGeometry {
    pub page_width: f32,
    pub page_height: f32,
    pub margin_left: f32,
    /// Right edge of the content area, measured from the left page edge.
    pub margin_right: f32,
    /// Where the cursor restarts on continuation pages.
    pub margin_top: f32,
    /// Band at the bottom kept free for the footer.
    pub margin_bottom: f32,
}

impl PageGeometry {
    pub fn content_width(&self) -> f32 {
        self.margin_right - self.margin_left
    }

    pub fn content_bottom(&self) -> f32 {
        self.page_height - self.margin_bottom
    }

    pub fn center_x(&self) -> f32 {
        self.page_width / 2.0
    }
}

#[derive(Clone, Debug)]
pub struct Theme {
    pub palette: Palette,
    pub fonts: FontSizes,
    pub geometry: PageGeometry,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            palette: Palette {
                primary: [37, 99, 235],
                muted: [100, 116, 139],
                text: [30, 41, 59],
                positive: [22, 163, 74],
                negative: [220, 38, 38],
                divider: [203, 213, 225],
                stripe: [241, 245, 249],
                on_primary: [255, 255, 255],
            },
            fonts: FontSizes {
                title: 22.0,
                section_title: 12.0,
                body: 10.0,
                small: 9.0,
                grand_total: 14.0,
            },
            geometry: PageGeometry {
                page_width: 210.0,
                page_height: 297.0,
                margin_left: 14.0,
                margin_right: 196.0,
                margin_top: 20.0,
                margin_bottom: 30.0,
            },
        }
    }
}

/// PNG image drawn in the header, scaled into a box of `width` x `height` mm.
#[derive(Clone, Debug)]
pub struct Logo {
    pub png: Vec<u8>,
    pub width: f32,
    pub height: f32,
}

#[derive(Clone, Debug)]
pub struct Brand {
    pub name: String,
    pub tagline: String,
    pub footer_lines: [String; 2],
    pub logo: Option<Logo>,
}

impl Default for Brand {
    fn default() -> Self {
        Self {
            name: "PetCare".to_string(),
            tagline: "Grooming, boarding & veterinary care".to_string(),
            footer_lines: [
                "Thank you for trusting us with your pet's care!".to_string(),
                "This is a computer-generated invoice and does not require a signature."
                    .to_string(),
            ],
            logo: None,
        }
    }
}
