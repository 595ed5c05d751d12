use crate::core::{absence_deduction, net_salary, round2};
use crate::error::{PayslipError, PayslipResult};
use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Current calendar month (1-12), local time
pub fn current_month() -> u32 {
    chrono::Local::now().month()
}

/// Current calendar year, local time
pub fn current_year() -> i32 {
    chrono::Local::now().year()
}

//==============================================================================
// Logical Fields
//==============================================================================

/// A semantic payroll attribute a column may represent, independent of its
/// literal header text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LogicalField {
    Name,
    Month,
    BaseSalary,
    RequiredDays,
    ActualDays,
    NightShift,
    HighTemp,
    LateFine,
    Others,
}

impl LogicalField {
    /// All fields, in header order
    pub const ALL: [LogicalField; 9] = [
        LogicalField::Name,
        LogicalField::Month,
        LogicalField::BaseSalary,
        LogicalField::RequiredDays,
        LogicalField::ActualDays,
        LogicalField::NightShift,
        LogicalField::HighTemp,
        LogicalField::LateFine,
        LogicalField::Others,
    ];

    /// Fields every header row must name
    pub const REQUIRED: [LogicalField; 4] = [
        LogicalField::Name,
        LogicalField::BaseSalary,
        LogicalField::RequiredDays,
        LogicalField::ActualDays,
    ];

    /// Column label used in import files and exported sheets
    pub fn label(self) -> &'static str {
        match self {
            LogicalField::Name => "姓名",
            LogicalField::Month => "月份",
            LogicalField::BaseSalary => "基本工资",
            LogicalField::RequiredDays => "应出勤天数",
            LogicalField::ActualDays => "实际出勤天数",
            LogicalField::NightShift => "夜班补助",
            LogicalField::HighTemp => "高温补贴",
            LogicalField::LateFine => "迟到罚款",
            LogicalField::Others => "其他",
        }
    }

    /// Serialized key (matches the record's serde field names)
    pub fn key(self) -> &'static str {
        match self {
            LogicalField::Name => "name",
            LogicalField::Month => "month",
            LogicalField::BaseSalary => "base_salary",
            LogicalField::RequiredDays => "required_days",
            LogicalField::ActualDays => "actual_days",
            LogicalField::NightShift => "night_shift",
            LogicalField::HighTemp => "high_temp",
            LogicalField::LateFine => "late_fine",
            LogicalField::Others => "others",
        }
    }

    pub fn is_required(self) -> bool {
        Self::REQUIRED.contains(&self)
    }
}

impl fmt::Display for LogicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

//==============================================================================
// Employee Pay Record
//==============================================================================

/// User-entered pay figures for one employee
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PayInputs {
    pub base_salary: f64,
    pub required_days: i64,
    pub actual_days: i64,
    #[serde(default)]
    pub night_shift: f64,
    #[serde(default)]
    pub high_temp: f64,
    #[serde(default)]
    pub late_fine: f64,
    #[serde(default)]
    pub others: f64,
}

impl PayInputs {
    fn validate(&self) -> PayslipResult<()> {
        let amounts = [
            ("base salary", self.base_salary),
            ("night shift", self.night_shift),
            ("high temp", self.high_temp),
            ("late fine", self.late_fine),
            ("others", self.others),
        ];
        if let Some((label, value)) = amounts.iter().find(|(_, v)| !v.is_finite()) {
            return Err(PayslipError::Validation(format!(
                "{} must be a finite number, got {}",
                label, value
            )));
        }
        if self.base_salary < 0.0 {
            return Err(PayslipError::Validation(format!(
                "base salary must be a non-negative number, got {}",
                self.base_salary
            )));
        }
        if self.required_days < 0 || self.actual_days < 0 {
            return Err(PayslipError::Validation(format!(
                "attendance days must be non-negative, got required={} actual={}",
                self.required_days, self.actual_days
            )));
        }
        Ok(())
    }
}

/// One employee's payslip: inputs plus the two derived amounts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RecordFields")]
pub struct EmployeePayRecord {
    name: String,
    month: u32,
    #[serde(flatten)]
    inputs: PayInputs,
    absence_deduction: f64,
    net_salary: f64,
}

/// Serialized shape; derived amounts are ignored and recomputed on load
#[derive(Deserialize)]
struct RecordFields {
    name: String,
    #[serde(default = "current_month")]
    month: u32,
    #[serde(flatten)]
    inputs: PayInputs,
}

impl TryFrom<RecordFields> for EmployeePayRecord {
    type Error = PayslipError;

    fn try_from(fields: RecordFields) -> PayslipResult<Self> {
        EmployeePayRecord::new(fields.name, fields.month, fields.inputs)
    }
}

impl EmployeePayRecord {
    /// Build a record, validating inputs and computing the derived amounts
    pub fn new(name: impl Into<String>, month: u32, inputs: PayInputs) -> PayslipResult<Self> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(PayslipError::Validation(
                "employee name must not be empty".to_string(),
            ));
        }
        validate_month(month)?;
        inputs.validate()?;

        let mut record = Self {
            name,
            month,
            inputs,
            absence_deduction: 0.0,
            net_salary: 0.0,
        };
        record.recalculate();
        Ok(record)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn inputs(&self) -> &PayInputs {
        &self.inputs
    }

    pub fn absence_deduction(&self) -> f64 {
        self.absence_deduction
    }

    pub fn net_salary(&self) -> f64 {
        self.net_salary
    }

    pub fn set_month(&mut self, month: u32) -> PayslipResult<()> {
        validate_month(month)?;
        self.month = month;
        Ok(())
    }

    /// Change input figures; derived amounts are recomputed afterwards.
    ///
    /// On validation failure the record is left unchanged.
    pub fn edit<F>(&mut self, f: F) -> PayslipResult<()>
    where
        F: FnOnce(&mut PayInputs),
    {
        let mut inputs = self.inputs;
        f(&mut inputs);
        inputs.validate()?;
        self.inputs = inputs;
        self.recalculate();
        Ok(())
    }

    fn recalculate(&mut self) {
        let i = &self.inputs;
        self.absence_deduction = absence_deduction(i.base_salary, i.required_days, i.actual_days);
        self.net_salary = net_salary(
            i.base_salary,
            self.absence_deduction,
            i.night_shift,
            i.high_temp,
            i.late_fine,
            i.others,
        );
    }
}

fn validate_month(month: u32) -> PayslipResult<()> {
    if (1..=12).contains(&month) {
        Ok(())
    } else {
        Err(PayslipError::Validation(format!(
            "month must be between 1 and 12, got {month}"
        )))
    }
}

//==============================================================================
// Totals
//==============================================================================

/// Column sums shown on the summary sheet's 总计 row
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PayrollTotals {
    pub base_salary: f64,
    pub high_temp: f64,
    pub absence_deduction: f64,
    pub net_salary: f64,
}

impl PayrollTotals {
    pub fn from_records(records: &[EmployeePayRecord]) -> Self {
        let mut totals = records.iter().fold(Self::default(), |acc, r| Self {
            base_salary: acc.base_salary + r.inputs.base_salary,
            high_temp: acc.high_temp + r.inputs.high_temp,
            absence_deduction: acc.absence_deduction + r.absence_deduction,
            net_salary: acc.net_salary + r.net_salary,
        });
        totals.base_salary = round2(totals.base_salary);
        totals.high_temp = round2(totals.high_temp);
        totals.absence_deduction = round2(totals.absence_deduction);
        totals.net_salary = round2(totals.net_salary);
        totals
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(base: f64, required: i64, actual: i64) -> PayInputs {
        PayInputs {
            base_salary: base,
            required_days: required,
            actual_days: actual,
            ..PayInputs::default()
        }
    }

    #[test]
    fn test_new_computes_derived_fields() {
        let record = EmployeePayRecord::new(
            "张三",
            5,
            PayInputs {
                night_shift: 100.0,
                late_fine: -50.0,
                ..inputs(5000.0, 30, 28)
            },
        )
        .unwrap();

        assert_eq!(record.absence_deduction(), -333.33);
        assert_eq!(record.net_salary(), 4716.67);
    }

    #[test]
    fn test_new_trims_name() {
        let record = EmployeePayRecord::new("  李四 ", 1, inputs(3000.0, 22, 22)).unwrap();
        assert_eq!(record.name(), "李四");
    }

    #[test]
    fn test_new_rejects_blank_name() {
        let result = EmployeePayRecord::new("   ", 1, inputs(3000.0, 22, 22));
        assert!(matches!(result, Err(PayslipError::Validation(_))));
    }

    #[test]
    fn test_new_rejects_bad_month() {
        assert!(EmployeePayRecord::new("张三", 0, inputs(1.0, 1, 1)).is_err());
        assert!(EmployeePayRecord::new("张三", 13, inputs(1.0, 1, 1)).is_err());
    }

    #[test]
    fn test_new_rejects_negative_inputs() {
        assert!(EmployeePayRecord::new("张三", 3, inputs(-1.0, 22, 22)).is_err());
        assert!(EmployeePayRecord::new("张三", 3, inputs(1000.0, -1, 0)).is_err());
        assert!(EmployeePayRecord::new("张三", 3, inputs(f64::NAN, 22, 22)).is_err());
    }

    #[test]
    fn test_new_rejects_non_finite_amounts() {
        let result = EmployeePayRecord::new("张三", 5, inputs(f64::INFINITY, 30, 28));
        assert!(matches!(result, Err(PayslipError::Validation(_))));

        let adjustments = [
            PayInputs { night_shift: f64::NAN, ..inputs(3000.0, 30, 28) },
            PayInputs { high_temp: f64::NEG_INFINITY, ..inputs(3000.0, 30, 28) },
            PayInputs { late_fine: f64::NAN, ..inputs(3000.0, 30, 28) },
            PayInputs { others: f64::INFINITY, ..inputs(3000.0, 30, 28) },
        ];
        for adjusted in adjustments {
            assert!(matches!(
                EmployeePayRecord::new("张三", 5, adjusted),
                Err(PayslipError::Validation(_))
            ));
        }
    }

    #[test]
    fn test_edit_recalculates() {
        let mut record = EmployeePayRecord::new("张三", 3, inputs(3000.0, 30, 30)).unwrap();
        assert_eq!(record.absence_deduction(), 0.0);
        assert_eq!(record.net_salary(), 3000.0);

        record.edit(|i| i.actual_days = 28).unwrap();
        assert_eq!(record.absence_deduction(), -200.0);
        assert_eq!(record.net_salary(), 2800.0);
    }

    #[test]
    fn test_edit_rejects_invalid_and_keeps_state() {
        let mut record = EmployeePayRecord::new("张三", 3, inputs(3000.0, 30, 28)).unwrap();
        assert!(record.edit(|i| i.base_salary = -5.0).is_err());
        assert_eq!(record.inputs().base_salary, 3000.0);
        assert_eq!(record.absence_deduction(), -200.0);
    }

    #[test]
    fn test_deserialize_recomputes_derived_fields() {
        let yaml = "name: 王五\nmonth: 7\nbase_salary: 3000\nrequired_days: 30\nactual_days: 28\nabsence_deduction: 999\nnet_salary: 1\n";
        let record: EmployeePayRecord = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(record.absence_deduction(), -200.0);
        assert_eq!(record.net_salary(), 2800.0);
    }

    #[test]
    fn test_deserialize_rejects_empty_name() {
        let yaml = "name: ''\nmonth: 7\nbase_salary: 3000\nrequired_days: 30\nactual_days: 28\n";
        let result: Result<EmployeePayRecord, _> = serde_yaml::from_str(yaml);
        assert!(result.is_err());
    }

    #[test]
    fn test_serialize_includes_derived_fields() {
        let record = EmployeePayRecord::new("张三", 3, inputs(3000.0, 30, 28)).unwrap();
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["absence_deduction"], -200.0);
        assert_eq!(json["net_salary"], 2800.0);
        assert_eq!(json["base_salary"], 3000.0);
    }

    #[test]
    fn test_totals() {
        let a = EmployeePayRecord::new(
            "张三",
            3,
            PayInputs {
                high_temp: 100.0,
                ..inputs(3000.0, 30, 28)
            },
        )
        .unwrap();
        let b = EmployeePayRecord::new("李四", 3, inputs(5000.0, 22, 22)).unwrap();

        let totals = PayrollTotals::from_records(&[a, b]);
        assert_eq!(totals.base_salary, 8000.0);
        assert_eq!(totals.high_temp, 100.0);
        assert_eq!(totals.absence_deduction, -200.0);
        assert_eq!(totals.net_salary, 7900.0);
    }

    #[test]
    fn test_required_fields() {
        let required: Vec<_> = LogicalField::ALL
            .iter()
            .filter(|f| f.is_required())
            .map(|f| f.label())
            .collect();
        assert_eq!(required, vec!["姓名", "基本工资", "应出勤天数", "实际出勤天数"]);
    }
}
