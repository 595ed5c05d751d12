//! Working data shared between single-entry and batch commands

use crate::error::{PayslipError, PayslipResult};
use crate::types::{current_month, EmployeePayRecord};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Current month setting plus the single-entry and batch records.
///
/// Built once per process and passed to whichever command needs it;
/// persisted as YAML between invocations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    current_month: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    single: Option<EmployeePayRecord>,
    #[serde(default)]
    batch: Vec<EmployeePayRecord>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            current_month: current_month(),
            single: None,
            batch: Vec::new(),
        }
    }

    /// Load a saved session; a missing file yields a fresh one
    pub fn load(path: &Path) -> PayslipResult<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no saved session, starting fresh");
            return Ok(Self::new());
        }
        let content = fs::read_to_string(path)?;
        let session: Session = serde_yaml::from_str(&content)?;
        // Saved by hand or by an older build: re-check the month setting
        let mut fresh = Self::new();
        fresh.set_current_month(session.current_month)?;
        fresh.single = session.single;
        fresh.batch = session.batch;
        Ok(fresh)
    }

    pub fn save(&self, path: &Path) -> PayslipResult<()> {
        let yaml = serde_yaml::to_string(self)?;
        fs::write(path, yaml)?;
        debug!(path = %path.display(), batch = self.batch.len(), "session saved");
        Ok(())
    }

    pub fn current_month(&self) -> u32 {
        self.current_month
    }

    pub fn set_current_month(&mut self, month: u32) -> PayslipResult<()> {
        if !(1..=12).contains(&month) {
            return Err(PayslipError::Validation(format!(
                "month must be between 1 and 12, got {month}"
            )));
        }
        self.current_month = month;
        Ok(())
    }

    pub fn single(&self) -> Option<&EmployeePayRecord> {
        self.single.as_ref()
    }

    pub fn save_single(&mut self, record: EmployeePayRecord) {
        self.single = Some(record);
    }

    pub fn batch(&self) -> &[EmployeePayRecord] {
        &self.batch
    }

    pub fn save_batch(&mut self, records: Vec<EmployeePayRecord>) {
        self.batch = records;
    }

    /// Replace the batch entry with the same name, or append
    pub fn upsert_batch(&mut self, record: EmployeePayRecord) {
        match self.batch.iter_mut().find(|r| r.name() == record.name()) {
            Some(existing) => *existing = record,
            None => self.batch.push(record),
        }
    }

    /// Add an imported file's records. Earlier entries sharing a name with
    /// any of them are dropped; rows within `records` are all kept.
    pub fn merge_batch(&mut self, records: Vec<EmployeePayRecord>) {
        self.batch
            .retain(|existing| !records.iter().any(|r| r.name() == existing.name()));
        self.batch.extend(records);
    }

    /// Remove the batch entry with this name; false if there was none
    pub fn remove_batch(&mut self, name: &str) -> bool {
        let before = self.batch.len();
        self.batch.retain(|r| r.name() != name.trim());
        self.batch.len() != before
    }

    /// Copy the single-entry record into the batch (upsert by name)
    pub fn convert_single_to_batch(&mut self) -> &[EmployeePayRecord] {
        if let Some(record) = self.single.clone() {
            self.upsert_batch(record);
        }
        &self.batch
    }

    /// Drop both records; the month setting is kept
    pub fn clear_all(&mut self) {
        self.single = None;
        self.batch.clear();
    }
}
