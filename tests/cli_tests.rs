//! Binary-level CLI tests
//!
//! Each test runs the `payslip` binary inside its own temp directory so the
//! default session and config files never leak between tests.

#![allow(deprecated)] // Command::cargo_bin deprecation - no stable replacement yet

use assert_cmd::Command;
use payslip::session::Session;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const CSV_HEADER: &str = "姓名,月份,基本工资,应出勤天数,实际出勤天数,夜班补助,高温补贴,迟到罚款,其他\n";

fn payslip(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("payslip").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("PAYSLIP_CONFIG")
        .env_remove("RUST_LOG");
    cmd
}

fn session(dir: &TempDir) -> Session {
    Session::load(&dir.path().join(".payslip-session.yaml")).unwrap()
}

// ═══════════════════════════════════════════════════════════════════════════
// CALC
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_calc_prints_results() {
    let dir = TempDir::new().unwrap();
    payslip(&dir)
        .args([
            "calc",
            "--name",
            "张三",
            "--base",
            "5000",
            "--required-days",
            "30",
            "--actual-days",
            "28",
            "--night-shift",
            "100",
            "--late-fine",
            "-50",
            "--month",
            "5",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("-333.33"))
        .stdout(predicate::str::contains("4716.67"));

    let saved = session(&dir);
    assert_eq!(saved.single().unwrap().name(), "张三");
    assert!(saved.batch().is_empty());
}

#[test]
fn test_calc_writes_slip_and_adds_to_batch() {
    let dir = TempDir::new().unwrap();
    payslip(&dir)
        .args([
            "calc",
            "--name",
            "李四",
            "--base",
            "3000",
            "--required-days",
            "30",
            "--actual-days",
            "28",
            "--output",
            "out/slip.xlsx",
            "--add-to-batch",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Payslip written"));

    assert!(dir.path().join("out/slip.xlsx").exists());
    let saved = session(&dir);
    assert_eq!(saved.batch().len(), 1);
    assert_eq!(saved.batch()[0].net_salary(), 2800.0);
}

#[test]
fn test_calc_rejects_blank_name() {
    let dir = TempDir::new().unwrap();
    payslip(&dir)
        .args([
            "calc",
            "--name",
            " ",
            "--base",
            "3000",
            "--required-days",
            "30",
            "--actual-days",
            "28",
        ])
        .assert()
        .failure();
}

#[test]
fn test_calc_rejects_month_out_of_range() {
    let dir = TempDir::new().unwrap();
    payslip(&dir)
        .args([
            "calc",
            "--name",
            "张三",
            "--base",
            "3000",
            "--required-days",
            "30",
            "--actual-days",
            "28",
            "--month",
            "13",
        ])
        .assert()
        .failure();
}

#[test]
fn test_calc_rejects_infinite_amount() {
    let dir = TempDir::new().unwrap();
    payslip(&dir)
        .args([
            "calc",
            "--name",
            "张三",
            "--base",
            "3000",
            "--required-days",
            "30",
            "--actual-days",
            "28",
            "--others",
            "inf",
            "--output",
            "slip.xlsx",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("finite"));

    assert!(!dir.path().join("slip.xlsx").exists());
    assert!(!dir.path().join(".payslip-session.yaml").exists());
}

// ═══════════════════════════════════════════════════════════════════════════
// IMPORT / BATCH
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_import_fills_batch_and_writes_records() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("data.csv"),
        format!("2024年5月工资\n{CSV_HEADER}张三,5,3000,30,28,0,0,0,0\n李四,5,4000,22,22,0,0,0,0\n"),
    )
    .unwrap();

    payslip(&dir)
        .args([
            "import",
            "data.csv",
            "--policy",
            "first-or-second-row",
            "--output",
            "records.json",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 records imported"));

    let json = fs::read_to_string(dir.path().join("records.json")).unwrap();
    assert!(json.contains("\"absence_deduction\": -200.0"));
    assert_eq!(session(&dir).batch().len(), 2);

    payslip(&dir)
        .args(["batch", "remove", "张三"])
        .assert()
        .success();
    assert_eq!(session(&dir).batch().len(), 1);

    payslip(&dir)
        .args(["batch", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("李四"));

    payslip(&dir).args(["batch", "clear"]).assert().success();
    assert!(session(&dir).batch().is_empty());
}

#[test]
fn test_import_keeps_every_row_for_repeated_name() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("data.csv"),
        format!("{CSV_HEADER}张三,5,3000,30,28,0,0,0,0\n张三,6,3000,30,30,0,0,0,0\n"),
    )
    .unwrap();

    payslip(&dir)
        .args(["import", "data.csv", "--policy", "first-or-second-row"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 records imported, batch holds 2"));

    let months: Vec<u32> = session(&dir).batch().iter().map(|r| r.month()).collect();
    assert_eq!(months, vec![5, 6]);
}

#[test]
fn test_import_replaces_batch_unless_merging() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("may.csv"),
        format!("{CSV_HEADER}张三,5,3000,30,28,0,0,0,0\n李四,5,4000,22,22,0,0,0,0\n"),
    )
    .unwrap();
    fs::write(
        dir.path().join("june.csv"),
        format!("{CSV_HEADER}张三,6,3200,30,30,0,0,0,0\n"),
    )
    .unwrap();

    payslip(&dir)
        .args(["import", "may.csv", "--policy", "first-or-second-row"])
        .assert()
        .success();
    assert_eq!(session(&dir).batch().len(), 2);
    payslip(&dir)
        .args(["import", "june.csv", "--merge"])
        .assert()
        .success();
    let names: Vec<String> = session(&dir)
        .batch()
        .iter()
        .map(|r| format!("{}/{}", r.name(), r.month()))
        .collect();
    assert_eq!(names, vec!["李四/5", "张三/6"]);

    payslip(&dir).args(["import", "june.csv"]).assert().success();
    assert_eq!(session(&dir).batch().len(), 1);
}

#[test]
fn test_import_missing_column_reports_label() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("bad.csv"), "姓名,基本工资,实际出勤天数\n张三,3000,28\n").unwrap();

    payslip(&dir)
        .args(["import", "bad.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("应出勤天数"));
}

#[test]
fn test_import_unsupported_format() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("data.pdf"), "x").unwrap();

    payslip(&dir)
        .args(["import", "data.pdf"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("UnsupportedFormat"));
}

#[test]
fn test_batch_remove_unknown_name_fails() {
    let dir = TempDir::new().unwrap();
    payslip(&dir)
        .args(["batch", "remove", "nobody"])
        .assert()
        .failure();
}

// ═══════════════════════════════════════════════════════════════════════════
// OUTPUTS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_template_then_summary_and_slips() {
    let dir = TempDir::new().unwrap();

    payslip(&dir)
        .args(["template", "template.xlsx", "--multi-header"])
        .assert()
        .success();
    assert!(dir.path().join("template.xlsx").exists());

    payslip(&dir)
        .args(["summary", "--from", "template.xlsx", "--output", "summary.xlsx"])
        .assert()
        .success()
        .stdout(predicate::str::contains("示例：王五"));
    assert!(dir.path().join("summary.xlsx").exists());

    payslip(&dir)
        .args(["slips", "--from", "summary.xlsx", "--dir", "slips"])
        .assert()
        .success()
        .stdout(predicate::str::contains("3 payslips written"));
    assert_eq!(fs::read_dir(dir.path().join("slips")).unwrap().count(), 3);
}

#[test]
fn test_summary_with_empty_batch_fails() {
    let dir = TempDir::new().unwrap();
    payslip(&dir)
        .arg("summary")
        .assert()
        .failure()
        .stderr(predicate::str::contains("batch is empty"));
}

// ═══════════════════════════════════════════════════════════════════════════
// MONTH / CONFIG
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_month_set_and_used_as_default() {
    let dir = TempDir::new().unwrap();
    payslip(&dir).args(["month", "3"]).assert().success();
    assert_eq!(session(&dir).current_month(), 3);

    payslip(&dir)
        .arg("month")
        .assert()
        .success()
        .stdout(predicate::str::contains("Default month: 3"));

    fs::write(
        dir.path().join("data.csv"),
        format!("{CSV_HEADER}张三,,3000,30,30,0,0,0,0\n"),
    )
    .unwrap();
    payslip(&dir).args(["import", "data.csv"]).assert().success();
    assert_eq!(session(&dir).batch()[0].month(), 3);
}

#[test]
fn test_config_file_controls_output_dir() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("payslip.yaml"),
        "output_dir: generated\nyear: 2023\nsession_file: state.yaml\n",
    )
    .unwrap();
    fs::create_dir(dir.path().join("generated")).unwrap();

    payslip(&dir)
        .args([
            "calc",
            "--name",
            "王五",
            "--base",
            "3000",
            "--required-days",
            "30",
            "--actual-days",
            "30",
            "--month",
            "6",
            "--write",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("2023年6月"));

    let written: Vec<String> = fs::read_dir(dir.path().join("generated"))
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(written.len(), 1);
    assert!(written[0].starts_with("2023年6月_工资条_王五_"));
    assert!(dir.path().join("state.yaml").exists());
}

#[test]
fn test_unknown_config_key_fails() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("payslip.yaml"), "colour: blue\n").unwrap();
    payslip(&dir).args(["month"]).assert().failure();
}
