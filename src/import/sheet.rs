//! Row/cell access over spreadsheet and delimited-text files

use crate::error::{PayslipError, PayslipResult};
use calamine::{open_workbook_auto, Data, Range, Reader};
use std::fs;
use std::path::Path;
use tracing::debug;

const UTF8_BOM: &str = "\u{feff}";

/// Cell texts of one worksheet, addressed by absolute row and column (0-based).
///
/// Rows may be ragged; cells past a row's end read as empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sheet {
    rows: Vec<Vec<String>>,
}

impl Sheet {
    pub fn from_rows<R, C>(rows: R) -> Self
    where
        R: IntoIterator<Item = Vec<C>>,
        C: Into<String>,
    {
        Self {
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        }
    }

    /// Load the first worksheet of a workbook, or a CSV/TSV file
    pub fn open<P: AsRef<Path>>(path: P) -> PayslipResult<Self> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        match ext.as_str() {
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Self::from_workbook(path),
            "csv" => Self::from_delimited(path, b','),
            "tsv" => Self::from_delimited(path, b'\t'),
            _ => Err(PayslipError::UnsupportedFormat(format!(".{ext}"))),
        }
    }

    fn from_workbook(path: &Path) -> PayslipResult<Self> {
        let mut workbook = open_workbook_auto(path)
            .map_err(|e| PayslipError::Spreadsheet(format!("Failed to open workbook: {e}")))?;

        let range = match workbook.worksheet_range_at(0) {
            Some(range) => range
                .map_err(|e| PayslipError::Spreadsheet(format!("Failed to read sheet: {e}")))?,
            None => {
                debug!(path = %path.display(), "workbook has no worksheets");
                return Ok(Self::default());
            }
        };

        Ok(Self::from_range(&range))
    }

    /// Re-anchor a calamine range at A1, so row 0 is the sheet's first row
    /// even when the used range starts further down
    fn from_range(range: &Range<Data>) -> Self {
        let (row_offset, col_offset) = match range.start() {
            Some((row, col)) => (row as usize, col as usize),
            None => return Self::default(),
        };

        let mut rows = vec![Vec::new(); row_offset];
        for source_row in range.rows() {
            let mut row = vec![String::new(); col_offset];
            row.extend(source_row.iter().map(cell_text));
            rows.push(row);
        }
        Self { rows }
    }

    fn from_delimited(path: &Path, delimiter: u8) -> PayslipResult<Self> {
        let content = fs::read_to_string(path)?;
        let content = content.strip_prefix(UTF8_BOM).unwrap_or(&content);

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(delimiter)
            .from_reader(content.as_bytes());

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(str::to_string).collect());
        }
        Ok(Self { rows })
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Cells of a row; empty slice past the end of the sheet
    pub fn row(&self, index: usize) -> &[String] {
        self.rows.get(index).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Trimmed text of a cell; `None` when absent or blank
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.row(row)
            .get(col)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
    }

    pub fn is_blank_row(&self, index: usize) -> bool {
        self.row(index).iter().all(|c| c.trim().is_empty())
    }
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        other => other.to_string(),
    }
}
