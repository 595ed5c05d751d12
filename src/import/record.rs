//! Data row → EmployeePayRecord, with per-field defaults

use super::header::ColumnBinding;
use super::sheet::Sheet;
use crate::types::{EmployeePayRecord, LogicalField, PayInputs};
use tracing::warn;

/// Parse a decimal, ignoring thousands separators
fn parse_decimal(text: &str) -> Option<f64> {
    let cleaned = text.replace(',', "");
    cleaned
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// Amount fields: any parse failure counts as 0
fn parse_amount(text: Option<&str>) -> f64 {
    text.and_then(parse_decimal).unwrap_or(0.0)
}

/// Day counts: decimal truncated toward zero; negatives count as invalid
fn parse_days(text: Option<&str>) -> i64 {
    text.and_then(parse_decimal)
        .map(|v| v.trunc() as i64)
        .filter(|&v| v >= 0)
        .unwrap_or(0)
}

fn parse_month(text: Option<&str>, default_month: u32) -> u32 {
    text.and_then(parse_decimal)
        .map(f64::trunc)
        .filter(|v| (1.0..=12.0).contains(v))
        .map(|v| v as u32)
        .unwrap_or(default_month)
}

/// Build a record from one data row.
///
/// Returns `None` when the bound name cell is blank; such rows are not
/// payroll entries (spacer rows, totals, notes).
pub fn parse_data_row(
    sheet: &Sheet,
    row: usize,
    binding: &ColumnBinding,
    default_month: u32,
) -> Option<EmployeePayRecord> {
    let field = |f: LogicalField| binding.column(f).and_then(|col| sheet.cell(row, col));

    let name = field(LogicalField::Name)?;

    let base_salary = parse_amount(field(LogicalField::BaseSalary));
    let inputs = PayInputs {
        base_salary: if base_salary < 0.0 { 0.0 } else { base_salary },
        required_days: parse_days(field(LogicalField::RequiredDays)),
        actual_days: parse_days(field(LogicalField::ActualDays)),
        night_shift: parse_amount(field(LogicalField::NightShift)),
        high_temp: parse_amount(field(LogicalField::HighTemp)),
        late_fine: parse_amount(field(LogicalField::LateFine)),
        others: parse_amount(field(LogicalField::Others)),
    };
    let month = parse_month(field(LogicalField::Month), default_month);

    match EmployeePayRecord::new(name, month, inputs) {
        Ok(record) => Some(record),
        Err(e) => {
            // Only reachable with an out-of-range default month
            warn!(row = row + 1, error = %e, "dropping row");
            None
        }
    }
}
