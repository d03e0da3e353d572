mod output;
mod workloads;

use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use muster_core::Orchestrator;

#[derive(Parser)]
#[command(
    name = "muster",
    about = "Race a demo batch of async operations against a shared deadline",
    version
)]
struct Cli {
    /// Shared deadline for every operation, in milliseconds
    #[arg(long, default_value = "2000", env = "MUSTER_TIMEOUT_MS")]
    timeout_ms: u64,

    /// URL fetched by the network workload
    #[arg(long, default_value = "https://www.google.com")]
    url: String,

    /// Output the report as JSON
    #[arg(long, short = 'j')]
    json: bool,
}

fn main() {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries only the report (text or JSON).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let rt = tokio::runtime::Runtime::new().expect("tokio runtime");
    if let Err(e) = rt.block_on(run(cli)) {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

/// Incomplete operations are data in the report, not an `Err`; the process
/// exits 0 even when some of the batch timed out or crashed.
async fn run(cli: Cli) -> Result<()> {
    let orchestrator = Orchestrator::new(Duration::from_millis(cli.timeout_ms));
    let report = orchestrator.execute(workloads::demo_batch(&cli.url)).await;

    if cli.json {
        output::print_json(&report)?;
    } else {
        println!("{report}");
    }
    Ok(())
}
