//! polydep - Multi-ecosystem dependency conflict detector CLI tool
//!
//! This tool reads dependency manifests from several ecosystems:
//! - Python (requirements.txt, pyproject.toml)
//! - JavaScript (package.json)
//! - Java (pom.xml, build.gradle)
//! - Rust (Cargo.toml)
//!
//! and reports one resolved version per package, or the conflict that
//! prevents it.

use clap::Parser;
use polydep::cli::CliArgs;
use polydep::config::AnalysisConfig;
use polydep::engine::AnalysisReport;
use polydep::orchestrator::Orchestrator;
use polydep::output::{create_formatter, OutputConfig};
use std::io::{self, IsTerminal, Write};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Every package resolved
const EXIT_RESOLVED: u8 = 0;
/// At least one package could not be resolved
const EXIT_UNRESOLVED: u8 = 1;
/// An ecosystem failed to analyze, or the run could not start
const EXIT_FAILED: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();
    init_tracing(args.verbose);

    // Run the main logic and handle errors
    match run(args).await {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(EXIT_FAILED)
        }
    }
}

/// Logs go to stderr; `--verbose` turns on debug events for this crate,
/// otherwise `RUST_LOG` applies with `warn` as the fallback
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("polydep=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Main application logic
async fn run(args: CliArgs) -> anyhow::Result<ExitCode> {
    let config = AnalysisConfig::from_cli(&args)?;

    if args.verbose {
        eprintln!("polydep v{}", env!("CARGO_PKG_VERSION"));
        eprintln!("Target: {}", args.path.display());
        let settings = AnalysisConfig::settings_path(&args);
        if settings.is_file() {
            eprintln!("Config: {}", settings.display());
        }
        eprintln!(
            "Ecosystems: {}",
            config
                .registry
                .ecosystems()
                .iter()
                .map(|e| e.id())
                .collect::<Vec<_>>()
                .join(", ")
        );
    }

    let orchestrator = Orchestrator::new(config);
    let report = orchestrator
        .run_with_progress(&args.path, args.show_progress())
        .await?;

    let output_config = OutputConfig::from_cli(args.json, args.verbose, args.quiet)
        .with_color(io::stdout().is_terminal());
    let formatter = create_formatter(output_config);

    let mut stdout = io::stdout().lock();
    formatter.format(&report, &mut stdout)?;
    stdout.flush()?;

    Ok(ExitCode::from(exit_status(&report)))
}

fn exit_status(report: &AnalysisReport) -> u8 {
    if report.has_errors() {
        EXIT_FAILED
    } else if !report.resolution.is_fully_resolved() {
        EXIT_UNRESOLVED
    } else {
        EXIT_RESOLVED
    }
}
