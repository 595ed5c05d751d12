//! Payroll import: spreadsheet/CSV → EmployeePayRecord list
//!
//! Payroll source files are hand-edited, so the header row is located by
//! fuzzy label matching instead of a fixed schema. Two placement policies
//! are supported:
//! - `FirstOrSecondRow`: header on row 1 or 2, every later row is data
//! - `ScanAnywhere`: any number of header + single data row blocks, as
//!   produced by the summary export and the multi-header template

mod header;
mod record;
mod sheet;

pub use header::{cell_matches, missing_required, ColumnBinding, HeaderCandidate};
pub use record::parse_data_row;
pub use sheet::Sheet;

use crate::error::{PayslipError, PayslipResult};
use crate::types::{EmployeePayRecord, LogicalField};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info};

/// Where header rows may appear in an import file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderPolicy {
    /// Header on row 1 or row 2, followed by data rows to the end of the file
    FirstOrSecondRow,
    /// Header + one data row blocks, repeated anywhere in the file
    #[default]
    ScanAnywhere,
}

impl FromStr for HeaderPolicy {
    type Err = PayslipError;

    fn from_str(s: &str) -> PayslipResult<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "first_or_second_row" | "first_rows" | "first" => Ok(HeaderPolicy::FirstOrSecondRow),
            "scan_anywhere" | "scan" | "multi" => Ok(HeaderPolicy::ScanAnywhere),
            other => Err(PayslipError::Validation(format!(
                "unknown header policy '{other}' (expected scan-anywhere or first-or-second-row)"
            ))),
        }
    }
}

fn missing_labels(fields: &[LogicalField]) -> Vec<String> {
    fields.iter().map(|f| f.label().to_string()).collect()
}

/// Parse an already-loaded sheet into records, in file order
pub fn parse_sheet(
    sheet: &Sheet,
    policy: HeaderPolicy,
    default_month: u32,
) -> PayslipResult<Vec<EmployeePayRecord>> {
    let records = match policy {
        HeaderPolicy::FirstOrSecondRow => parse_first_or_second_row(sheet, default_month)?,
        HeaderPolicy::ScanAnywhere => parse_scan_anywhere(sheet, default_month)?,
    };

    if records.is_empty() {
        return Err(PayslipError::EmptyResult);
    }
    info!(count = records.len(), "imported employee records");
    Ok(records)
}

fn parse_first_or_second_row(
    sheet: &Sheet,
    default_month: u32,
) -> PayslipResult<Vec<EmployeePayRecord>> {
    let mut header_row = 0;
    let mut candidate = HeaderCandidate::evaluate(sheet.row(0));

    if !candidate.is_header() && sheet.row_count() > 1 {
        let second = HeaderCandidate::evaluate(sheet.row(1));
        if second.missing.len() < candidate.missing.len() {
            debug!("header not on row 1, using row 2");
            header_row = 1;
            candidate = second;
        }
    }

    if !candidate.is_header() {
        return Err(PayslipError::MissingColumns(missing_labels(&candidate.missing)));
    }
    debug!(row = header_row + 1, binding = ?candidate.binding, "header row");

    Ok((header_row + 1..sheet.row_count())
        .filter_map(|row| parse_data_row(sheet, row, &candidate.binding, default_month))
        .collect())
}

fn parse_scan_anywhere(
    sheet: &Sheet,
    default_month: u32,
) -> PayslipResult<Vec<EmployeePayRecord>> {
    let mut records = Vec::new();
    let mut headers_found = 0;
    // Closest miss, reported when no row qualifies
    let mut best_miss: Option<Vec<LogicalField>> = None;

    let mut row = 0;
    while row < sheet.row_count() {
        let candidate = HeaderCandidate::evaluate(sheet.row(row));
        if !candidate.is_header() {
            if best_miss
                .as_ref()
                .map_or(true, |best| candidate.missing.len() < best.len())
            {
                best_miss = Some(candidate.missing);
            }
            row += 1;
            continue;
        }

        headers_found += 1;
        debug!(row = row + 1, binding = ?candidate.binding, "header row");

        let data_row = row + 1;
        if let Some(record) = parse_data_row(sheet, data_row, &candidate.binding, default_month) {
            records.push(record);
        } else {
            debug!(row = data_row + 1, "data row has no name, skipped");
        }

        row = data_row + 1;
        while row < sheet.row_count() && sheet.is_blank_row(row) {
            row += 1;
        }
    }

    if headers_found == 0 {
        let missing = best_miss.unwrap_or_else(|| LogicalField::REQUIRED.to_vec());
        return Err(PayslipError::MissingColumns(missing_labels(&missing)));
    }
    Ok(records)
}

/// Reads an import file from disk and parses it under a header policy
pub struct PayrollImporter {
    path: PathBuf,
    policy: HeaderPolicy,
    default_month: u32,
}

impl PayrollImporter {
    /// Create an importer; rows without a valid month get `default_month`
    pub fn new<P: AsRef<Path>>(path: P, default_month: u32) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            policy: HeaderPolicy::default(),
            default_month,
        }
    }

    pub fn with_policy(mut self, policy: HeaderPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn import(&self) -> PayslipResult<Vec<EmployeePayRecord>> {
        debug!(path = %self.path.display(), policy = ?self.policy, "importing");
        let sheet = Sheet::open(&self.path)?;
        parse_sheet(&sheet, self.policy, self.default_month)
    }
}
