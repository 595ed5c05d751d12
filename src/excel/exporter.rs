//! Excel slip and summary writer

use super::styles::CellStyles;
use crate::error::{PayslipError, PayslipResult};
use crate::types::{EmployeePayRecord, PayrollTotals};
use rust_xlsxwriter::{Workbook, Worksheet};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

const COLUMN_WIDTH: f64 = 15.0;
const SLIP_SHEET_NAME: &str = "工资条";
const SUMMARY_SHEET_NAME: &str = "工资表";
const TOTAL_LABEL: &str = "总计";

/// One column of an exported slip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlipColumn {
    Name,
    Year,
    Month,
    BaseSalary,
    RequiredDays,
    ActualDays,
    NightShift,
    HighTemp,
    LateFine,
    Others,
    AbsenceDeduction,
    NetSalary,
    Signature,
}

impl SlipColumn {
    pub fn label(self) -> &'static str {
        match self {
            SlipColumn::Name => "姓名",
            SlipColumn::Year => "年份",
            SlipColumn::Month => "月份",
            SlipColumn::BaseSalary => "基本工资",
            SlipColumn::RequiredDays => "应出勤天数",
            SlipColumn::ActualDays => "实际出勤天数",
            SlipColumn::NightShift => "夜班补助",
            SlipColumn::HighTemp => "高温补贴",
            SlipColumn::LateFine => "迟到罚款",
            SlipColumn::Others => "其他",
            SlipColumn::AbsenceDeduction => "缺勤扣款",
            SlipColumn::NetSalary => "实发工资",
            SlipColumn::Signature => "签字",
        }
    }
}

/// Which optional columns a slip carries, and the year it is issued for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlipLayout {
    pub year: i32,
    pub include_year: bool,
    pub include_signature: bool,
}

impl SlipLayout {
    pub fn new(year: i32) -> Self {
        Self {
            year,
            include_year: true,
            include_signature: true,
        }
    }

    /// Columns in sheet order (11 to 13 of them)
    pub fn columns(&self) -> Vec<SlipColumn> {
        let mut columns = vec![SlipColumn::Name];
        if self.include_year {
            columns.push(SlipColumn::Year);
        }
        columns.extend([
            SlipColumn::Month,
            SlipColumn::BaseSalary,
            SlipColumn::RequiredDays,
            SlipColumn::ActualDays,
            SlipColumn::NightShift,
            SlipColumn::HighTemp,
            SlipColumn::LateFine,
            SlipColumn::Others,
            SlipColumn::AbsenceDeduction,
            SlipColumn::NetSalary,
        ]);
        if self.include_signature {
            columns.push(SlipColumn::Signature);
        }
        columns
    }

    fn position(&self, column: SlipColumn) -> Option<u16> {
        self.columns()
            .iter()
            .position(|&c| c == column)
            .map(|idx| idx as u16)
    }
}

/// Replace characters that are not allowed in file names
fn sanitize_file_component(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

/// `{year}年{month}月_工资条_{name}_{timestamp}.xlsx`
pub fn slip_file_name(year: i32, record: &EmployeePayRecord, timestamp: &str) -> String {
    format!(
        "{}年{}月_工资条_{}_{}.xlsx",
        year,
        record.month(),
        sanitize_file_component(record.name()),
        timestamp
    )
}

/// `{year}年{month}月_工资表_{timestamp}.xlsx`
pub fn summary_file_name(year: i32, month: u32, timestamp: &str) -> String {
    format!("{}年{}月_工资表_{}.xlsx", year, month, timestamp)
}

/// Local time, as embedded in generated file names
pub fn file_timestamp() -> String {
    chrono::Local::now().format("%Y%m%d%H%M%S").to_string()
}

/// Writes individual payslips and the consolidated summary sheet
pub struct PayslipExporter {
    layout: SlipLayout,
    styles: CellStyles,
}

impl PayslipExporter {
    pub fn new(layout: SlipLayout) -> Self {
        Self {
            layout,
            styles: CellStyles::new(),
        }
    }

    /// Write one employee's slip: header row + data row
    pub fn write_slip(&self, record: &EmployeePayRecord, path: &Path) -> PayslipResult<()> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(SLIP_SHEET_NAME)?;
        self.set_column_widths(worksheet)?;

        self.write_header(worksheet, 0)?;
        self.write_record(worksheet, 1, record)?;

        workbook
            .save(path)
            .map_err(|e| PayslipError::Export(format!("Failed to save {}: {}", path.display(), e)))?;
        info!(path = %path.display(), name = record.name(), "wrote payslip");
        Ok(())
    }

    /// Write one slip file per employee into `dir`, creating it if needed.
    ///
    /// Employees sharing a name get a numeric suffix instead of overwriting
    /// each other.
    pub fn write_slips(
        &self,
        records: &[EmployeePayRecord],
        dir: &Path,
        timestamp: &str,
    ) -> PayslipResult<Vec<PathBuf>> {
        fs::create_dir_all(dir)?;

        let mut used = HashSet::new();
        let mut paths = Vec::with_capacity(records.len());
        for record in records {
            let base = slip_file_name(self.layout.year, record, timestamp);
            let mut file_name = base.clone();
            let mut n = 2;
            while !used.insert(file_name.clone()) {
                file_name = format!("{}_{}.xlsx", base.trim_end_matches(".xlsx"), n);
                n += 1;
            }

            let path = dir.join(file_name);
            self.write_slip(record, &path)?;
            paths.push(path);
        }
        Ok(paths)
    }

    /// Write the consolidated sheet: a header above each employee's row,
    /// blank rows between blocks, and a 总计 row at the end
    pub fn write_summary(&self, records: &[EmployeePayRecord], path: &Path) -> PayslipResult<()> {
        if records.is_empty() {
            return Err(PayslipError::Validation(
                "no employee records to export".to_string(),
            ));
        }

        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(SUMMARY_SHEET_NAME)?;
        self.set_column_widths(worksheet)?;

        let mut row: u32 = 0;
        for (idx, record) in records.iter().enumerate() {
            if idx > 0 {
                row += 1; // blank separator
            }
            self.write_header(worksheet, row)?;
            self.write_record(worksheet, row + 1, record)?;
            row += 2;
        }

        // One blank row, then totals
        self.write_totals(worksheet, row + 1, &PayrollTotals::from_records(records))?;

        workbook
            .save(path)
            .map_err(|e| PayslipError::Export(format!("Failed to save {}: {}", path.display(), e)))?;
        info!(path = %path.display(), employees = records.len(), "wrote summary");
        Ok(())
    }

    fn set_column_widths(&self, worksheet: &mut Worksheet) -> PayslipResult<()> {
        for col in 0..self.layout.columns().len() {
            worksheet.set_column_width(col as u16, COLUMN_WIDTH)?;
        }
        Ok(())
    }

    fn write_header(&self, worksheet: &mut Worksheet, row: u32) -> PayslipResult<()> {
        for (col, column) in self.layout.columns().iter().enumerate() {
            worksheet.write_string_with_format(row, col as u16, column.label(), &self.styles.header)?;
        }
        Ok(())
    }

    fn write_record(
        &self,
        worksheet: &mut Worksheet,
        row: u32,
        record: &EmployeePayRecord,
    ) -> PayslipResult<()> {
        let inputs = record.inputs();
        for (col, column) in self.layout.columns().iter().enumerate() {
            let col = col as u16;
            let normal = &self.styles.normal;
            match column {
                SlipColumn::Name => {
                    worksheet.write_string_with_format(row, col, record.name(), normal)?;
                }
                SlipColumn::Signature => {
                    worksheet.write_blank(row, col, normal)?;
                }
                SlipColumn::AbsenceDeduction => {
                    worksheet.write_number_with_format(
                        row,
                        col,
                        record.absence_deduction(),
                        &self.styles.deduction,
                    )?;
                }
                SlipColumn::NetSalary => {
                    worksheet.write_number_with_format(
                        row,
                        col,
                        record.net_salary(),
                        &self.styles.total,
                    )?;
                }
                other => {
                    let value = match other {
                        SlipColumn::Year => f64::from(self.layout.year),
                        SlipColumn::Month => f64::from(record.month()),
                        SlipColumn::BaseSalary => inputs.base_salary,
                        SlipColumn::RequiredDays => inputs.required_days as f64,
                        SlipColumn::ActualDays => inputs.actual_days as f64,
                        SlipColumn::NightShift => inputs.night_shift,
                        SlipColumn::HighTemp => inputs.high_temp,
                        SlipColumn::LateFine => inputs.late_fine,
                        _ => inputs.others,
                    };
                    worksheet.write_number_with_format(row, col, value, normal)?;
                }
            }
        }
        Ok(())
    }

    fn write_totals(
        &self,
        worksheet: &mut Worksheet,
        row: u32,
        totals: &PayrollTotals,
    ) -> PayslipResult<()> {
        worksheet.write_string_with_format(row, 0, TOTAL_LABEL, &self.styles.header)?;

        let cells = [
            (SlipColumn::BaseSalary, totals.base_salary),
            (SlipColumn::HighTemp, totals.high_temp),
            (SlipColumn::AbsenceDeduction, totals.absence_deduction),
            (SlipColumn::NetSalary, totals.net_salary),
        ];
        for (column, value) in cells {
            if let Some(col) = self.layout.position(column) {
                worksheet.write_number_with_format(row, col, value, &self.styles.total)?;
            }
        }
        Ok(())
    }
}
