//! Security verification CLI.
//!
//! Runs every verification category against the two clusters and exits
//! non-zero if any category fails.
//!
//! # Usage
//!
//! ```bash
//! security-verify --config config.json
//! security-verify --config config.json --report security_report.json -v
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use crossfire_core::{DEFAULT_VERIFY_CONFIG, logging};
use crossfire_verify::VerificationSuite;

#[derive(Debug, Parser)]
#[command(author, version, about = "Cross-cluster security verification tool", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(long, default_value = DEFAULT_VERIFY_CONFIG)]
    config: PathBuf,

    /// Generate detailed report to file
    #[arg(long, value_name = "PATH")]
    report: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("❌ Unexpected error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let suite = match VerificationSuite::from_config_path(&cli.config) {
        Ok(suite) => suite,
        Err(e) if e.is_config_not_found() => {
            eprintln!("❌ Configuration file not found: {}", cli.config.display());
            return Ok(ExitCode::FAILURE);
        }
        Err(e) => return Err(e.into()),
    };

    println!("🔍 Starting cross-cluster security verification...");
    let outcome = suite.run_all().await;
    println!();
    print!("{}", outcome.render());

    if let Some(path) = cli.report.as_deref() {
        suite.report(&outcome).write_to(path)?;
        println!("📄 Detailed report saved to {}", path.display());
    }

    Ok(if outcome.passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
