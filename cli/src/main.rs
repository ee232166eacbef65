//! Prints the stock backoff comparison table and writes `retries.txt` for
//! plotting.

use std::io;

use anyhow::Context;
use backoff_table::ReportConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Write the plot file next to the table.
const WRITE_PLOT_FILE: bool = true;

/// Jitter the capped strategy.
const JITTER: bool = true;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let mut config = ReportConfig::standard(JITTER);
    if !WRITE_PLOT_FILE {
        config = config.without_plot_file();
    }

    let stdout = io::stdout();
    let grid =
        backoff_table::run(&config, &mut stdout.lock()).context("backoff comparison failed")?;

    info!(
        attempts = grid.rows().len(),
        strategies = grid.strategy_count(),
        plot_file = ?config.plot_file,
        "comparison complete"
    );

    Ok(())
}
