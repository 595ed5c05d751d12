//! Payslip - payroll slip generator
//!
//! Collects per-employee attendance and pay adjustments, derives the absence
//! deduction and net salary, and writes formatted Excel payslips.
//!
//! # Features
//!
//! - Import from .xlsx/.xls/.ods workbooks or CSV/TSV files, with fuzzy
//!   header detection (header on row 1 or 2, or repeated anywhere)
//! - Individual slips, a consolidated summary sheet with totals, and an
//!   import template
//! - A persisted session holding the default month and the batch
//!
//! # Example
//!
//! ```no_run
//! use payslip::excel::{PayslipExporter, SlipLayout};
//! use payslip::import::{HeaderPolicy, PayrollImporter};
//! use std::path::Path;
//!
//! let records = PayrollImporter::new("attendance.xlsx", 5)
//!     .with_policy(HeaderPolicy::FirstOrSecondRow)
//!     .import()?;
//!
//! for r in &records {
//!     println!("{}: {:.2}", r.name(), r.net_salary());
//! }
//!
//! let exporter = PayslipExporter::new(SlipLayout::new(2024));
//! exporter.write_summary(&records, Path::new("summary.xlsx"))?;
//! # Ok::<(), payslip::error::PayslipError>(())
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod excel;
pub mod import;
pub mod session;
pub mod types;

// Re-export commonly used types
pub use error::{PayslipError, PayslipResult};
pub use session::Session;
pub use types::{EmployeePayRecord, LogicalField, PayInputs, PayrollTotals};
