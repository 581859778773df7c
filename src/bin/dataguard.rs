//! CLI binary (A5): `dataguard validate --config <toml> --input <csv>`.
//!
//! Exit code is `0` iff every rule passed on every row and the run was not
//! cancelled; `1` on a validation failure, `2` on a plan or I/O error.

use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;

use clap::{Parser, Subcommand};
use dataguard::reader::CsvReader;
use tracing::error;

#[derive(Parser)]
#[command(name = "dataguard", version, about = "Columnar dataset validation")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate a CSV file against a TOML rule configuration.
    Validate {
        /// Path to the TOML schema/rule configuration.
        #[arg(long)]
        config: PathBuf,

        /// Path to the CSV file to validate.
        #[arg(long)]
        input: PathBuf,

        /// Print every rule outcome, not just failing ones.
        #[arg(long)]
        verbose: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let exit_code = match cli.command {
        Command::Validate {
            config,
            input,
            verbose,
        } => run_validate(&config, &input, verbose),
    };
    std::process::exit(exit_code);
}

fn run_validate(config: &Path, input: &Path, verbose: bool) -> i32 {
    let mut plan = match dataguard::config::load_plan(config) {
        Ok(plan) => plan,
        Err(err) => {
            error!(%err, "failed to load configuration");
            return 2;
        }
    };
    if let Err(err) = plan.finalize() {
        error!(%err, "failed to finalize plan");
        return 2;
    }

    let cancel = AtomicBool::new(false);
    let options = dataguard::config::engine_options_from_env();
    let report = dataguard::engine::run(&mut plan, || CsvReader::open(input), options, &cancel);

    let report = match report {
        Ok(report) => report,
        Err(err) => {
            error!(%err, "validation run failed");
            return 2;
        }
    };

    if verbose {
        println!("{report}");
    } else {
        let failing: Vec<_> = report.outcomes.iter().filter(|o| o.failed() > 0).collect();
        if failing.is_empty() {
            println!("table: {} ({} rows) — all rules passed", report.table_name, report.total_rows);
        } else {
            println!("table: {} ({} rows)", report.table_name, report.total_rows);
            for outcome in failing {
                println!(
                    "  {}.{}: {}/{} passed (samples: {})",
                    outcome.column,
                    outcome.rule_name,
                    outcome.passed,
                    outcome.considered,
                    outcome
                        .samples
                        .iter()
                        .map(|(row, value)| format!("[{row}] {value}"))
                        .collect::<Vec<_>>()
                        .join(", ")
                );
            }
        }
    }

    if report.is_clean() {
        0
    } else {
        1
    }
}
