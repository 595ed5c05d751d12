//! Optional YAML settings file (`payslip.yaml`)

use crate::error::PayslipResult;
use crate::excel::SlipLayout;
use crate::import::HeaderPolicy;
use crate::types::current_year;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Looked up in the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "payslip.yaml";
pub const DEFAULT_SESSION_FILE: &str = ".payslip-session.yaml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Where generated slips and summaries go
    pub output_dir: PathBuf,
    /// Year printed on slips; current year when unset
    pub year: Option<i32>,
    pub include_year: bool,
    pub include_signature: bool,
    pub header_policy: HeaderPolicy,
    pub session_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            year: None,
            include_year: true,
            include_signature: true,
            header_policy: HeaderPolicy::default(),
            session_file: PathBuf::from(DEFAULT_SESSION_FILE),
        }
    }
}

impl Config {
    pub fn from_file(path: &Path) -> PayslipResult<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        debug!(path = %path.display(), ?config, "loaded config");
        Ok(config)
    }

    /// Explicit path must exist; otherwise `payslip.yaml` is used if present
    pub fn load(explicit: Option<&Path>) -> PayslipResult<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::from_file(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn year(&self) -> i32 {
        self.year.unwrap_or_else(current_year)
    }

    pub fn slip_layout(&self) -> SlipLayout {
        SlipLayout {
            year: self.year(),
            include_year: self.include_year,
            include_signature: self.include_signature,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PayslipError;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.output_dir, PathBuf::from("."));
        assert_eq!(config.header_policy, HeaderPolicy::ScanAnywhere);
        assert_eq!(config.year(), current_year());
        assert_eq!(config.slip_layout().columns().len(), 13);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("payslip.yaml");
        fs::write(
            &path,
            "year: 2023\ninclude_signature: false\nheader_policy: first_or_second_row\n",
        )
        .unwrap();

        let config = Config::load(Some(path.as_path())).unwrap();
        assert_eq!(config.year(), 2023);
        assert!(config.include_year);
        assert!(!config.include_signature);
        assert_eq!(config.header_policy, HeaderPolicy::FirstOrSecondRow);
        assert_eq!(config.session_file, PathBuf::from(DEFAULT_SESSION_FILE));
        assert_eq!(config.slip_layout().columns().len(), 12);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("payslip.yaml");
        fs::write(&path, "output_directory: out\n").unwrap();

        assert!(matches!(
            Config::load(Some(path.as_path())),
            Err(PayslipError::Yaml(_))
        ));
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let dir = TempDir::new().unwrap();
        let result = Config::load(Some(&dir.path().join("nope.yaml")));
        assert!(matches!(result, Err(PayslipError::Io(_))));
    }
}
