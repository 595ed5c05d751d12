//! Blank import template with worked examples

use super::styles::CellStyles;
use crate::error::{PayslipError, PayslipResult};
use crate::types::LogicalField;
use rust_xlsxwriter::{Workbook, Worksheet};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

pub const TEMPLATE_FILE_NAME: &str = "工资条导入模板.xlsx";
const TEMPLATE_SHEET_NAME: &str = "员工数据";

/// Example rows: name, base, required days, actual days, night shift,
/// high temp, late fine, others
const EXAMPLES: [(&str, f64, f64, f64, f64, f64, f64, f64); 3] = [
    ("示例：张三", 5000.0, 30.0, 28.0, 200.0, 100.0, -50.0, 0.0),
    ("示例：李四", 4500.0, 22.0, 22.0, 0.0, 150.0, 0.0, 100.0),
    ("示例：王五", 6000.0, 21.0, 19.0, 300.0, 0.0, -100.0, 0.0),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateVariant {
    /// One header row followed by all examples
    #[default]
    SingleHeader,
    /// Header repeated above each example, blank rows between blocks
    MultiHeader,
}

fn write_header(worksheet: &mut Worksheet, row: u32, styles: &CellStyles) -> PayslipResult<()> {
    for (col, field) in LogicalField::ALL.iter().enumerate() {
        worksheet.write_string_with_format(row, col as u16, field.label(), &styles.header)?;
    }
    Ok(())
}

fn write_example(
    worksheet: &mut Worksheet,
    row: u32,
    month: u32,
    example: &(&str, f64, f64, f64, f64, f64, f64, f64),
    styles: &CellStyles,
) -> PayslipResult<()> {
    let &(name, base, required, actual, night, high_temp, late_fine, others) = example;
    worksheet.write_string_with_format(row, 0, name, &styles.normal)?;
    let numbers = [
        f64::from(month),
        base,
        required,
        actual,
        night,
        high_temp,
        late_fine,
        others,
    ];
    for (offset, value) in numbers.iter().enumerate() {
        worksheet.write_number_with_format(row, offset as u16 + 1, *value, &styles.normal)?;
    }
    Ok(())
}

/// Write the import template; `month` fills the example rows' 月份 column
pub fn write_template(path: &Path, variant: TemplateVariant, month: u32) -> PayslipResult<()> {
    let styles = CellStyles::new();
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(TEMPLATE_SHEET_NAME)?;
    for col in 0..LogicalField::ALL.len() {
        worksheet.set_column_width(col as u16, 15)?;
    }

    match variant {
        TemplateVariant::SingleHeader => {
            write_header(worksheet, 0, &styles)?;
            for (idx, example) in EXAMPLES.iter().enumerate() {
                write_example(worksheet, idx as u32 + 1, month, example, &styles)?;
            }
        }
        TemplateVariant::MultiHeader => {
            let mut row = 0;
            for example in &EXAMPLES {
                write_header(worksheet, row, &styles)?;
                write_example(worksheet, row + 1, month, example, &styles)?;
                row += 3;
            }
        }
    }

    workbook
        .save(path)
        .map_err(|e| PayslipError::Export(format!("Failed to save {}: {}", path.display(), e)))?;
    info!(path = %path.display(), ?variant, "wrote import template");
    Ok(())
}
