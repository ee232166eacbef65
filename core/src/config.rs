//! Run configuration and the stock strategy comparison.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::backoff::{BackoffPolicy, ConstantBackoff, ExponentialBackoff};
use crate::strategy::StrategySet;

/// Number of attempts sampled per strategy.
pub const DEFAULT_ATTEMPTS: usize = 20;

/// File the plot data is written to, relative to the working directory.
pub const DEFAULT_PLOT_FILE: &str = "retries.txt";

/// Jitter applied to the capped strategy when jitter is enabled.
pub const DEFAULT_JITTER_PERCENT: u32 = 10;

/// Configuration for one comparison run.
///
/// Built once at startup and handed to [`crate::report::run`].
#[derive(Debug, Clone, PartialEq)]
pub struct ReportConfig {
    /// Number of attempts (table rows) to sample.
    ///
    /// Default 20
    pub attempts: usize,
    /// Strategies to compare, in column order.
    ///
    /// Default: see [`ReportConfig::standard`]
    pub strategies: StrategySet,
    /// Where to write the plot file. If None, no file is written.
    ///
    /// Default `retries.txt`
    pub plot_file: Option<PathBuf>,
}

impl ReportConfig {
    /// Create an empty configuration: default attempts and plot file, no
    /// strategies.
    pub fn new() -> Self {
        Self {
            attempts: DEFAULT_ATTEMPTS,
            strategies: StrategySet::new(),
            plot_file: Some(PathBuf::from(DEFAULT_PLOT_FILE)),
        }
    }

    /// The stock comparison: one hour constant delay, exponential backoff
    /// from 20s, and the same exponential capped at two hours.
    ///
    /// With `jitter` enabled the capped strategy is perturbed by ±10% before
    /// capping and named "Capped Duration"; without it the strategy is exact
    /// and named "Capped Exponential Backoff".
    pub fn standard(jitter: bool) -> Self {
        let base = Duration::from_secs(20);
        let capped = ExponentialBackoff::new()
            .base_delay(base)
            .max_delay(Duration::from_secs(7200));
        let (capped_name, capped) = if jitter {
            ("Capped Duration", capped.jitter_percent(DEFAULT_JITTER_PERCENT))
        } else {
            ("Capped Exponential Backoff", capped)
        };

        Self::new()
            .strategy(
                "Linear Retry",
                ConstantBackoff::new().interval(Duration::from_secs(3600)),
            )
            .strategy("Exponential Backoff", ExponentialBackoff::new().base_delay(base))
            .strategy(capped_name, capped)
    }

    /// Set the number of attempts
    pub fn attempts(mut self, attempts: usize) -> Self {
        self.attempts = attempts;
        self
    }

    /// Append a strategy, or replace the one registered under `name`
    pub fn strategy(mut self, name: impl Into<String>, policy: impl Into<BackoffPolicy>) -> Self {
        self.strategies.register(name, policy);
        self
    }

    /// Write plot data to `path`
    pub fn plot_file(mut self, path: impl AsRef<Path>) -> Self {
        self.plot_file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Skip the plot file
    pub fn without_plot_file(mut self) -> Self {
        self.plot_file = None;
        self
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self::standard(true)
    }
}
