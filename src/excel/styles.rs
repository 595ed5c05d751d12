use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder};

const HEADER_FILL: u32 = 0xDDDDDD;
const TOTAL_FILL: u32 = 0xE6F2FF;
const DEDUCTION_FONT: u32 = 0xFF0000;

/// Cell formats shared by slips, summaries and templates
pub struct CellStyles {
    pub header: Format,
    pub normal: Format,
    /// Absence deduction: red font
    pub deduction: Format,
    /// Net salary and totals: bold on light blue
    pub total: Format,
}

fn base() -> Format {
    Format::new()
        .set_border(FormatBorder::Thin)
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
}

impl CellStyles {
    pub fn new() -> Self {
        Self {
            header: base()
                .set_bold()
                .set_font_size(12)
                .set_background_color(Color::RGB(HEADER_FILL)),
            normal: base().set_font_size(11),
            deduction: base()
                .set_font_size(11)
                .set_font_color(Color::RGB(DEDUCTION_FONT)),
            total: base()
                .set_bold()
                .set_font_size(12)
                .set_background_color(Color::RGB(TOTAL_FILL)),
        }
    }
}

impl Default for CellStyles {
    fn default() -> Self {
        Self::new()
    }
}
