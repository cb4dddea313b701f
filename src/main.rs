use clap::Parser;
use ipobf::cli::{prompt_ip, Cli};
use ipobf_driver::{print_results, run_singleton, RandomizedRun};
use ipobf_oracle::CurlOracle;
use std::time::Duration;
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    ipobf::init_tracing(cli.verbose);

    let config = cli.resolve_config()?;
    let ip = match &cli.ip {
        Some(ip) => ip.clone(),
        None => prompt_ip(std::io::stdin().lock(), std::io::stdout())?,
    };

    let oracle = CurlOracle::from_config(&config);
    tracing::info!("Using oracle client {}", oracle.client());

    if cli.random {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let printer = tokio::spawn(print_results(events_rx));

        let outcome = RandomizedRun::new(oracle, &ip)?
            .with_iterations(usize::from(cli.iterations))
            .with_workers(config.threads)
            .with_max_jitter(Duration::from_millis(config.max_jitter_ms))
            .run(events_tx)
            .await;

        let printed = printer.await?;
        let summary = outcome?;
        tracing::info!(
            "Printed {} results ({} succeeded, {} duplicate specs, {} unencodable specs)",
            printed,
            summary.successes,
            summary.duplicates,
            summary.skipped
        );
    } else {
        let result = run_singleton(&oracle, &ip, cli.spec()?).await?;
        println!("{}", result);
    }

    Ok(())
}
