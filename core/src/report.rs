//! Sampling strategies into a comparison grid and rendering it.

use std::io::Write;
use std::time::Duration;

use rand::Rng;
use tracing::{debug, info};

use crate::config::ReportConfig;
use crate::duration::format_duration;
use crate::error::{Error, Result};
use crate::plot;
use crate::strategy::Strategy;
use crate::table::Table;

/// Column labels repeated under every strategy heading.
pub const SUBHEADING_COLUMNS: [&str; 2] = ["Duration", "Cumulative Duration"];

/// Label of the first column.
pub const ATTEMPTS_LABEL: &str = "Attempts";

/// One strategy's values for one attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    /// Delay drawn for this attempt
    pub duration: Duration,
    /// Sum of all delays up to and including this attempt
    pub cumulative: Duration,
}

/// Values of every strategy for a single attempt, in strategy order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptRow {
    pub attempt: usize,
    pub cells: Vec<Cell>,
}

/// Attempts × strategies grid of sampled delays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    names: Vec<String>,
    rows: Vec<AttemptRow>,
}

impl Grid {
    /// Sample `attempts` delays from every strategy.
    ///
    /// Strategies are advanced one attempt at a time, in order. Each strategy's
    /// running total is kept numerically and carried into the next row.
    ///
    /// # Errors
    ///
    /// [`Error::BackoffExhausted`] if a strategy's sequence ends before
    /// `attempts` delays were drawn.
    pub fn collect<R: Rng>(strategies: &mut [Strategy<R>], attempts: usize) -> Result<Self> {
        let names = strategies.iter().map(|s| s.name.clone()).collect();
        let mut totals = vec![Duration::ZERO; strategies.len()];
        let mut rows = Vec::with_capacity(attempts);

        for attempt in 0..attempts {
            let mut cells = Vec::with_capacity(strategies.len());
            for (strategy, total) in strategies.iter_mut().zip(totals.iter_mut()) {
                let duration = strategy.sequence.next().ok_or_else(|| Error::BackoffExhausted {
                    strategy: strategy.name.clone(),
                    attempt,
                })?;
                let cumulative = total.saturating_add(duration);
                *total = cumulative;

                debug!(strategy = %strategy.name, attempt, ?duration, ?cumulative, "sampled delay");
                cells.push(Cell {
                    duration,
                    cumulative,
                });
            }
            rows.push(AttemptRow { attempt, cells });
        }

        Ok(Self { names, rows })
    }

    /// Strategy names, in column order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn rows(&self) -> &[AttemptRow] {
        &self.rows
    }

    pub fn strategy_count(&self) -> usize {
        self.names.len()
    }

    /// Cells of the strategy at `index`, one per attempt.
    pub fn column(&self, index: usize) -> impl Iterator<Item = &Cell> {
        self.rows.iter().filter_map(move |row| row.cells.get(index))
    }

    /// Lay the grid out as a console table.
    ///
    /// The header holds each strategy name over its two sub-columns, the first
    /// body row labels the sub-columns, and every following row is one attempt.
    pub fn table(&self) -> Table {
        let mut header = vec![String::new()];
        let mut subheader = vec![ATTEMPTS_LABEL.to_string()];
        for name in &self.names {
            header.push(name.clone());
            header.push(String::new());
            subheader.extend(SUBHEADING_COLUMNS.iter().map(|label| label.to_string()));
        }

        let mut table = Table::new(header);
        table.push_row(subheader);
        for row in &self.rows {
            let mut line = vec![row.attempt.to_string()];
            for cell in &row.cells {
                line.push(format_duration(cell.duration));
                line.push(format_duration(cell.cumulative));
            }
            table.push_row(line);
        }

        table
    }
}

/// Run a full comparison: sample the configured strategies, write the plot
/// file if one is configured, then render the table to `out`.
pub fn run<W: Write>(config: &ReportConfig, out: &mut W) -> Result<Grid> {
    let mut strategies = config.strategies.sequences();
    run_with(config, &mut strategies, out)
}

/// [`run`] with caller-provided sequences, for deterministic output.
pub fn run_with<R: Rng, W: Write>(
    config: &ReportConfig,
    strategies: &mut [Strategy<R>],
    out: &mut W,
) -> Result<Grid> {
    info!(
        attempts = config.attempts,
        strategies = strategies.len(),
        "comparing backoff strategies"
    );
    let grid = Grid::collect(strategies, config.attempts)?;

    if let Some(path) = &config.plot_file {
        plot::write_plot_file(&grid, path)?;
    }

    write!(out, "{}", grid.table())?;
    out.flush()?;

    Ok(grid)
}
