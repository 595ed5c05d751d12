//! Excel output: individual payslips, the consolidated summary sheet and
//! the import template

mod exporter;
mod styles;
mod template;

pub use exporter::{
    file_timestamp, slip_file_name, summary_file_name, PayslipExporter, SlipColumn, SlipLayout,
};
pub use styles::CellStyles;
pub use template::{write_template, TemplateVariant, TEMPLATE_FILE_NAME};
