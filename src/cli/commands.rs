use crate::config::Config;
use crate::error::{PayslipError, PayslipResult};
use crate::excel::{
    file_timestamp, slip_file_name, summary_file_name, write_template, PayslipExporter,
    TemplateVariant, TEMPLATE_FILE_NAME,
};
use crate::import::{HeaderPolicy, PayrollImporter};
use crate::session::Session;
use crate::types::{EmployeePayRecord, PayInputs, PayrollTotals};
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};

/// Format a money amount with two decimals
pub fn format_amount(n: f64) -> String {
    let s = format!("{:.2}", n);
    if s == "-0.00" {
        "0.00".to_string()
    } else {
        s
    }
}

/// Print records as an aligned table followed by the totals line
fn print_records(records: &[EmployeePayRecord]) {
    println!(
        "   {:<12} {:>4} {:>10} {:>6} {:>6} {:>10} {:>10} {:>10} {:>10} {:>10} {:>12}",
        "Name", "Mon", "Base", "Req", "Act", "Night", "HighTemp", "LateFine", "Others", "Deduct", "Net"
    );
    for r in records {
        let i = r.inputs();
        let deduction = format!("{:>10}", format_amount(r.absence_deduction()));
        println!(
            "   {:<12} {:>4} {:>10} {:>6} {:>6} {:>10} {:>10} {:>10} {:>10} {} {:>12}",
            r.name(),
            r.month(),
            format_amount(i.base_salary),
            i.required_days,
            i.actual_days,
            format_amount(i.night_shift),
            format_amount(i.high_temp),
            format_amount(i.late_fine),
            format_amount(i.others),
            if r.absence_deduction() < 0.0 {
                deduction.red()
            } else {
                deduction.normal()
            },
            format_amount(r.net_salary()).bold()
        );
    }

    let totals = PayrollTotals::from_records(records);
    println!(
        "\n   {} {} employees | base {} | high temp {} | deductions {} | net {}\n",
        "Total:".bold(),
        records.len(),
        format_amount(totals.base_salary),
        format_amount(totals.high_temp),
        format_amount(totals.absence_deduction).red(),
        format_amount(totals.net_salary).bold().green()
    );
}

/// Records from an import file, or the session batch when no file is given
fn load_records(
    config: &Config,
    session: &Session,
    from: Option<&Path>,
    policy: Option<HeaderPolicy>,
) -> PayslipResult<Vec<EmployeePayRecord>> {
    match from {
        Some(path) => PayrollImporter::new(path, session.current_month())
            .with_policy(policy.unwrap_or(config.header_policy))
            .import(),
        None if session.batch().is_empty() => Err(PayslipError::Validation(
            "batch is empty; run 'payslip import' or 'payslip calc --add-to-batch' first"
                .to_string(),
        )),
        None => Ok(session.batch().to_vec()),
    }
}

/// Serialize records to YAML or JSON, chosen by the file extension
fn write_records(records: &[EmployeePayRecord], output: &Path) -> PayslipResult<()> {
    let ext = output
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    let content = match ext.as_str() {
        "yaml" | "yml" => serde_yaml::to_string(records)?,
        "json" => serde_json::to_string_pretty(records)?,
        _ => return Err(PayslipError::UnsupportedFormat(format!(".{ext}"))),
    };
    fs::write(output, content)?;
    Ok(())
}

/// Figures for the single-entry form
#[derive(Debug, Clone)]
pub struct SingleEntry {
    pub name: String,
    /// Session's current month when unset
    pub month: Option<u32>,
    pub inputs: PayInputs,
}

/// Execute the calc command - compute one employee's payslip
pub fn calc(
    config: &Config,
    session: &mut Session,
    entry: SingleEntry,
    output: Option<PathBuf>,
    write: bool,
    add_to_batch: bool,
) -> PayslipResult<()> {
    let month = entry.month.unwrap_or(session.current_month());
    let record = EmployeePayRecord::new(entry.name, month, entry.inputs)?;

    println!("{}", "💰 Payslip - Single Entry".bold().green());
    println!("   Name:          {}", record.name().bright_blue());
    println!("   Period:        {}年{}月", config.year(), record.month());
    println!("   Base salary:   {}", format_amount(record.inputs().base_salary));
    println!(
        "   Attendance:    {}/{} days",
        record.inputs().actual_days,
        record.inputs().required_days
    );
    println!(
        "   Deduction:     {}",
        format_amount(record.absence_deduction()).red()
    );
    println!(
        "   Net salary:    {}\n",
        format_amount(record.net_salary()).bold().green()
    );

    let output = match output {
        Some(path) => Some(path),
        None if write => Some(
            config
                .output_dir
                .join(slip_file_name(config.year(), &record, &file_timestamp())),
        ),
        None => None,
    };
    if let Some(path) = output {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        PayslipExporter::new(config.slip_layout()).write_slip(&record, &path)?;
        println!("{}", "✅ Payslip written".bold().green());
        println!("   Excel file: {}\n", path.display());
    }

    session.save_single(record);
    if add_to_batch {
        let batch = session.convert_single_to_batch();
        println!("   Batch now holds {} employees\n", batch.len());
    }
    Ok(())
}

/// Execute the import command
pub fn import(
    config: &Config,
    session: &mut Session,
    input: PathBuf,
    policy: Option<HeaderPolicy>,
    output: Option<PathBuf>,
    merge: bool,
    verbose: bool,
) -> PayslipResult<()> {
    let policy = policy.unwrap_or(config.header_policy);
    println!("{}", "💰 Payslip - Import".bold().green());
    println!("   Input:  {}", input.display());
    if verbose {
        println!("   Header policy: {:?}", policy);
        println!("   Default month: {}", session.current_month());
    }
    println!();

    let records = PayrollImporter::new(&input, session.current_month())
        .with_policy(policy)
        .import()?;

    print_records(&records);

    if let Some(path) = output {
        write_records(&records, &path)?;
        println!("   Records file: {}", path.display());
    }

    let imported = records.len();
    if merge {
        session.merge_batch(records);
    } else {
        session.save_batch(records);
    }

    println!(
        "{} {} records imported, batch holds {}\n",
        "✅".green(),
        imported,
        session.batch().len()
    );
    Ok(())
}

/// Execute the template command
pub fn template(
    config: &Config,
    session: &Session,
    output: Option<PathBuf>,
    multi_header: bool,
) -> PayslipResult<()> {
    let output = output.unwrap_or_else(|| config.output_dir.join(TEMPLATE_FILE_NAME));
    let variant = if multi_header {
        TemplateVariant::MultiHeader
    } else {
        TemplateVariant::SingleHeader
    };

    write_template(&output, variant, session.current_month())?;

    println!("{}", "✅ Template written".bold().green());
    println!("   Excel file: {}", output.display());
    if multi_header {
        println!("   Header repeated above each example (import with scan-anywhere policy)");
    }
    println!();
    Ok(())
}

/// Execute the slips command - one file per employee
pub fn slips(
    config: &Config,
    session: &Session,
    from: Option<PathBuf>,
    policy: Option<HeaderPolicy>,
    dir: Option<PathBuf>,
) -> PayslipResult<()> {
    let records = load_records(config, session, from.as_deref(), policy)?;
    let dir = dir.unwrap_or_else(|| config.output_dir.clone());

    let exporter = PayslipExporter::new(config.slip_layout());
    let paths = exporter.write_slips(&records, &dir, &file_timestamp())?;

    println!(
        "{} {} payslips written to {}",
        "✅".green(),
        paths.len(),
        dir.display()
    );
    for path in &paths {
        println!("   {}", path.display());
    }
    println!();
    Ok(())
}

/// Execute the summary command - consolidated sheet with totals
pub fn summary(
    config: &Config,
    session: &Session,
    from: Option<PathBuf>,
    policy: Option<HeaderPolicy>,
    output: Option<PathBuf>,
) -> PayslipResult<()> {
    let records = load_records(config, session, from.as_deref(), policy)?;
    let output = output.unwrap_or_else(|| {
        config.output_dir.join(summary_file_name(
            config.year(),
            session.current_month(),
            &file_timestamp(),
        ))
    });

    PayslipExporter::new(config.slip_layout()).write_summary(&records, &output)?;

    println!("{}", "✅ Summary written".bold().green());
    println!("   Excel file: {}\n", output.display());
    print_records(&records);
    Ok(())
}

/// Execute the batch list command
pub fn batch_list(session: &Session) -> PayslipResult<()> {
    if session.batch().is_empty() {
        println!("{}", "Batch is empty".yellow());
        return Ok(());
    }
    println!("{}", "💰 Payslip - Batch".bold().green());
    print_records(session.batch());
    Ok(())
}

/// Execute the batch remove command
pub fn batch_remove(session: &mut Session, name: &str) -> PayslipResult<()> {
    if !session.remove_batch(name) {
        return Err(PayslipError::Validation(format!(
            "no employee named '{}' in batch",
            name
        )));
    }
    println!(
        "{} Removed {}, batch holds {}",
        "✅".green(),
        name,
        session.batch().len()
    );
    Ok(())
}

/// Execute the batch clear command
pub fn batch_clear(session: &mut Session) -> PayslipResult<()> {
    session.clear_all();
    println!("{} Session data cleared", "✅".green());
    Ok(())
}

/// Execute the month command - show or set the default month
pub fn month(session: &mut Session, month: Option<u32>) -> PayslipResult<()> {
    if let Some(m) = month {
        session.set_current_month(m)?;
        println!("{} Default month set to {}", "✅".green(), m);
    } else {
        println!("Default month: {}", session.current_month());
    }
    Ok(())
}
