//! Pipeline execution and result printing

use anyhow::Result;
use omega_core::config::OmegaConfig;
use omega_core::targets::Target;
use omega_core::{Pipeline, RunSummary};

/// Build the pipeline from `config` and run it against `target`
pub async fn run_mission(config: OmegaConfig, target: &Target) -> Result<RunSummary> {
    let pipeline = Pipeline::builder(config).build()?;
    let summary = pipeline.run(target).await?;
    Ok(summary)
}

/// Print the closing lines for a finished run
pub fn print_summary(summary: &RunSummary) {
    let usage = summary.usage;
    println!();
    println!(
        "[MISSION SUCCESS] Report generated in {:.2}s",
        summary.elapsed.as_secs_f64()
    );
    println!("Location: {}", summary.report_path.display());
    if let Some(path) = &summary.transcript_path {
        println!("Transcript: {}", path.display());
    }
    println!(
        "Tokens (est.): {} in / {} out",
        usage.input_tokens, usage.output_tokens
    );
    println!("To view: cat {}", summary.report_path.display());
}
