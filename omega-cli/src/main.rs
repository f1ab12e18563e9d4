mod args;
mod prompt;
mod runner;

use std::io;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use omega_core::config::OmegaConfig;
use omega_core::targets::{Target, TargetParseError};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use args::Args;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.log_filter()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    println!("omega v{}", env!("CARGO_PKG_VERSION"));
    println!("Recon council: Strategist -> Auditor -> Judge");
    println!();

    let mut config = OmegaConfig::load(args.config.as_deref())?;
    if let Some(dir) = args.output {
        config.output.report_dir = dir;
    }
    debug!(
        report_dir = %config.output.report_dir.display(),
        seats = config.council.seats.len(),
        "Configuration loaded"
    );

    let input = prompt::read_target(&mut io::stdin().lock(), &mut io::stdout())?;
    let target = match Target::parse(&input) {
        Ok(target) => target,
        Err(e) => {
            eprintln!("{}", rejection_message(&e));
            return Ok(ExitCode::FAILURE);
        }
    };

    let summary = runner::run_mission(config, &target).await?;
    runner::print_summary(&summary);
    Ok(ExitCode::SUCCESS)
}

/// Line printed when the entered target is refused
fn rejection_message(error: &TargetParseError) -> String {
    match error {
        TargetParseError::MissingScheme(_) => {
            "Error: Please include http:// or https://".to_string()
        }
        TargetParseError::Invalid(_) => format!("Error: invalid target {error}"),
    }
}
