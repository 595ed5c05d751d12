use thiserror::Error;

pub type PayslipResult<T> = Result<T, PayslipError>;

#[derive(Error, Debug)]
pub enum PayslipError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Spreadsheet read error: {0}")]
    Spreadsheet(String),

    #[error("Unsupported file type: {0}")]
    UnsupportedFormat(String),

    #[error("Input is missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("No valid employee records found")]
    EmptyResult,

    #[error("Export error: {0}")]
    Export(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<rust_xlsxwriter::XlsxError> for PayslipError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        PayslipError::Export(err.to_string())
    }
}
