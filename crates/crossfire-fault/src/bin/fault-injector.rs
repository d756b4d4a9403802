//! Fault injection CLI.
//!
//! Injects simulated failure modes into the two-cluster deployment to
//! exercise monitoring and alerting.
//!
//! # Usage
//!
//! ```bash
//! fault-injector --list
//! fault-injector --inject latency_injection --duration 120
//! fault-injector --inject network_partition --duration 30 --wait --report fault_report.json
//! fault-injector --remove-all
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossfire_core::{DEFAULT_FAULT_CONFIG, VerificationConfig, logging};
use crossfire_fault::{FaultLifecycleManager, FaultReport};

#[derive(Debug, Parser)]
#[command(author, version, about = "Cross-cluster fault injection tool", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(long, default_value = DEFAULT_FAULT_CONFIG)]
    config: PathBuf,

    /// List available fault types
    #[arg(long)]
    list: bool,

    /// Inject a specific fault type
    #[arg(long, value_name = "KIND")]
    inject: Option<String>,

    /// Remove a specific fault type
    #[arg(long, value_name = "KIND")]
    remove: Option<String>,

    /// Remove all active faults
    #[arg(long)]
    remove_all: bool,

    /// List active faults
    #[arg(long)]
    active: bool,

    /// Fault duration in seconds
    #[arg(long, default_value_t = 300, value_parser = clap::value_parser!(u64).range(1..))]
    duration: u64,

    /// Generate fault report to file
    #[arg(long, value_name = "PATH")]
    report: Option<PathBuf>,

    /// After --inject, stay running until the fault expires
    #[arg(long, requires = "inject")]
    wait: bool,

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
    if let Err(e) = VerificationConfig::load(&cli.config) {
        if e.is_not_found() {
            eprintln!("❌ Configuration file not found: {}", cli.config.display());
            return Ok(ExitCode::FAILURE);
        }
        return Err(e.into());
    }

    let manager = FaultLifecycleManager::simulated();

    if cli.list {
        print_catalog(&manager);
        return Ok(ExitCode::SUCCESS);
    }

    if let Some(name) = cli.inject.as_deref() {
        println!("🔧 Injecting fault: {name}");
        println!("⏱️  Duration: {} seconds", cli.duration);
        println!("{}", "-".repeat(40));

        if let Err(e) = manager.inject_named(name, cli.duration).await {
            println!("❌ {e}");
            return Ok(ExitCode::FAILURE);
        }
        println!("✅ Fault '{name}' injected successfully");

        if cli.wait {
            println!("⏳ Waiting for fault to expire...");
            manager.wait_until_idle().await;
            println!("✅ Fault '{name}' expired");
            if let Some(path) = cli.report.as_deref() {
                save_report(&manager.generate_report(), path)?;
            }
        }
        return Ok(ExitCode::SUCCESS);
    }

    if let Some(name) = cli.remove.as_deref() {
        println!("🔧 Removing fault: {name}");
        return Ok(match manager.remove_named(name).await {
            Ok(_) => {
                println!("✅ Fault '{name}' removed successfully");
                ExitCode::SUCCESS
            }
            Err(e) => {
                println!("❌ {e}");
                ExitCode::FAILURE
            }
        });
    }

    if cli.remove_all {
        let summary = manager.remove_all().await;
        println!("🔧 Removed {}/{} active faults", summary.removed.len(), summary.attempted);
        for failure in &summary.failures {
            println!("❌ {failure}");
        }
        return Ok(if summary.is_success() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        });
    }

    if cli.active {
        print_active(&manager);
        return Ok(ExitCode::SUCCESS);
    }

    if let Some(path) = cli.report.as_deref() {
        save_report(&manager.generate_report(), path)?;
        return Ok(ExitCode::SUCCESS);
    }

    println!("Use --help for available options");
    Ok(ExitCode::FAILURE)
}

fn print_catalog(manager: &FaultLifecycleManager) {
    println!("Available Fault Injection Scenarios:");
    println!("{}", "=".repeat(50));
    for (i, entry) in manager.list_available_faults().iter().enumerate() {
        println!("{}. {}: {}", i + 1, entry.kind, entry.description);
    }
}

fn print_active(manager: &FaultLifecycleManager) {
    let active = manager.list_active();
    if active.is_empty() {
        println!("No active faults");
        return;
    }

    println!("Active Faults:");
    println!("{}", "=".repeat(30));
    for fault in active {
        if fault.remaining_secs >= 0.0 {
            let remaining = Duration::from_secs(fault.remaining_secs.round() as u64);
            println!(
                "• {}: {} remaining",
                fault.kind,
                humantime::format_duration(remaining)
            );
        } else {
            println!("• {}: expiry overdue by {:.0}s", fault.kind, -fault.remaining_secs);
        }
    }
}

fn save_report(report: &FaultReport, path: &std::path::Path) -> Result<()> {
    report.write_to(path)?;
    println!("📄 Fault report saved to {}", path.display());
    Ok(())
}
