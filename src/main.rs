use clap::{Parser, Subcommand};
use payslip::cli;
use payslip::config::Config;
use payslip::error::PayslipResult;
use payslip::import::HeaderPolicy;
use payslip::session::Session;
use payslip::types::PayInputs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "payslip")]
#[command(about = "Payroll slip generator: attendance in, Excel payslips out.")]
#[command(long_about = "Payslip - payroll slip generator

Computes each employee's absence deduction and net salary, and writes
formatted Excel payslips.

  absence deduction = -(base / required days) * (required - actual days)
  net salary        = base + deduction + night shift + high temp
                      + late fine + others

COMMANDS:
  calc      - Single entry: compute one employee, optionally write a slip
  import    - Read employees from .xlsx/.xls/.ods/.csv/.tsv into the batch
  template  - Write a blank import template with examples
  slips     - One payslip file per employee
  summary   - One sheet with every employee and a totals row
  batch     - List or edit the saved batch
  month     - Show or set the default month

EXAMPLES:
  payslip calc --name 张三 --base 3000 --required-days 30 --actual-days 28
  payslip import 员工数据.xlsx
  payslip summary -o 5月工资表.xlsx
  payslip slips --from 员工数据.csv --dir out/")]
#[command(version)]
struct Cli {
    /// Settings file (YAML); defaults to ./payslip.yaml when present
    #[arg(long, global = true, env = "PAYSLIP_CONFIG")]
    config: Option<PathBuf>,

    /// Session file holding the batch and default month
    #[arg(long, global = true)]
    session: Option<PathBuf>,

    /// Show verbose output (debug logging)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute one employee's deduction and net salary
    Calc {
        /// Employee name
        #[arg(long)]
        name: String,

        /// Month (1-12); defaults to the session month
        #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: Option<u32>,

        /// Base salary
        #[arg(long)]
        base: f64,

        /// Required attendance days
        #[arg(long)]
        required_days: i64,

        /// Actual attendance days
        #[arg(long)]
        actual_days: i64,

        /// Night shift allowance
        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        night_shift: f64,

        /// High temperature allowance
        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        high_temp: f64,

        /// Late fine (usually negative)
        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        late_fine: f64,

        /// Other adjustments
        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        others: f64,

        /// Write the payslip to this .xlsx path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write the payslip under the output directory with a generated name
        #[arg(short, long)]
        write: bool,

        /// Also add (or update) this employee in the batch
        #[arg(long)]
        add_to_batch: bool,
    },

    #[command(long_about = "Import employee data into the batch.

The header row is found by matching cells against the expected labels:
  姓名, 月份, 基本工资, 应出勤天数, 实际出勤天数, 夜班补助, 高温补贴, 迟到罚款, 其他
(exact, then case-insensitive, then substring). 姓名, 基本工资, 应出勤天数 and
实际出勤天数 are required.

HEADER POLICIES:
  scan-anywhere        Header + one data row blocks anywhere in the sheet
                       (summary exports, multi-header templates). Default.
  first-or-second-row  Header on row 1 or 2, every later row is data.

Unparsable numbers become 0; a missing or invalid month becomes the
default month.

The batch is replaced by the imported rows. With --merge the batch is kept
and any employee named in the file has earlier entries swapped for the
file's rows.")]
    /// Import employees from a spreadsheet or CSV file
    Import {
        /// Input file (.xlsx, .xlsm, .xlsb, .xls, .ods, .csv, .tsv)
        input: PathBuf,

        /// Header policy: scan-anywhere or first-or-second-row
        #[arg(short, long)]
        policy: Option<HeaderPolicy>,

        /// Also save the parsed records (.yaml/.yml or .json)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Keep the existing batch; employees named in the file replace
        /// their earlier entries
        #[arg(long)]
        merge: bool,
    },

    /// Write a blank import template with worked examples
    Template {
        /// Output path (default: 工资条导入模板.xlsx in the output directory)
        output: Option<PathBuf>,

        /// Repeat the header above each example
        #[arg(long)]
        multi_header: bool,
    },

    /// Write one payslip file per employee
    Slips {
        /// Import employees from this file instead of the batch
        #[arg(long)]
        from: Option<PathBuf>,

        /// Header policy used with --from
        #[arg(short, long)]
        policy: Option<HeaderPolicy>,

        /// Output directory
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },

    /// Write the consolidated summary sheet with totals
    Summary {
        /// Import employees from this file instead of the batch
        #[arg(long)]
        from: Option<PathBuf>,

        /// Header policy used with --from
        #[arg(short, long)]
        policy: Option<HeaderPolicy>,

        /// Output path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List or edit the saved batch
    Batch {
        #[command(subcommand)]
        action: BatchAction,
    },

    /// Show or set the default month for new entries
    Month {
        /// New default month (1-12)
        #[arg(value_parser = clap::value_parser!(u32).range(1..=12))]
        month: Option<u32>,
    },
}

#[derive(Subcommand)]
enum BatchAction {
    /// Show batch employees and totals
    List,
    /// Remove an employee by name
    Remove { name: String },
    /// Clear the batch and the single-entry record
    Clear,
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "payslip=debug" } else { "payslip=warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> PayslipResult<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::load(cli.config.as_deref())?;
    let session_path = cli
        .session
        .clone()
        .unwrap_or_else(|| config.session_file.clone());
    let mut session = Session::load(&session_path)?;

    let modified = match cli.command {
        Commands::Calc {
            name,
            month,
            base,
            required_days,
            actual_days,
            night_shift,
            high_temp,
            late_fine,
            others,
            output,
            write,
            add_to_batch,
        } => {
            let entry = cli::SingleEntry {
                name,
                month,
                inputs: PayInputs {
                    base_salary: base,
                    required_days,
                    actual_days,
                    night_shift,
                    high_temp,
                    late_fine,
                    others,
                },
            };
            cli::calc(&config, &mut session, entry, output, write, add_to_batch)?;
            true
        }

        Commands::Import {
            input,
            policy,
            output,
            merge,
        } => {
            cli::import(
                &config,
                &mut session,
                input,
                policy,
                output,
                merge,
                cli.verbose,
            )?;
            true
        }

        Commands::Template {
            output,
            multi_header,
        } => {
            cli::template(&config, &session, output, multi_header)?;
            false
        }

        Commands::Slips { from, policy, dir } => {
            cli::slips(&config, &session, from, policy, dir)?;
            false
        }

        Commands::Summary {
            from,
            policy,
            output,
        } => {
            cli::summary(&config, &session, from, policy, output)?;
            false
        }

        Commands::Batch { action } => match action {
            BatchAction::List => {
                cli::batch_list(&session)?;
                false
            }
            BatchAction::Remove { name } => {
                cli::batch_remove(&mut session, &name)?;
                true
            }
            BatchAction::Clear => {
                cli::batch_clear(&mut session)?;
                true
            }
        },

        Commands::Month { month } => {
            let setting = month.is_some();
            cli::month(&mut session, month)?;
            setting
        }
    };

    if modified {
        session.save(&session_path)?;
    }
    Ok(())
}
