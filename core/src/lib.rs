//! backoff-table - side-by-side comparison of retry backoff strategies
//!
//! This crate samples the delay sequences that constant, exponential, capped
//! exponential and Fibonacci backoff strategies would produce, without ever
//! retrying anything, and lays them out as a table of per-attempt and
//! cumulative waits. The same data can be written as a space-separated file
//! for plotting.
//!
//! # Features
//!
//! - **Jitter**: ± percentage jitter applied before the cap, so capped
//!   sequences never exceed their ceiling
//! - **Saturating**: exponential growth saturates at [`Duration::MAX`] instead
//!   of overflowing
//! - **Deterministic testing**: every sequence accepts a caller-provided RNG
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use backoff_table::{ConstantBackoff, ExponentialBackoff, ReportConfig};
//!
//! let config = ReportConfig::new()
//!     .attempts(5)
//!     .strategy("Constant", ConstantBackoff::new().interval(Duration::from_secs(1)))
//!     .strategy(
//!         "Capped",
//!         ExponentialBackoff::new()
//!             .base_delay(Duration::from_secs(1))
//!             .max_delay(Duration::from_secs(4)),
//!     )
//!     .without_plot_file();
//!
//! let mut out = Vec::new();
//! let grid = backoff_table::run(&config, &mut out)?;
//!
//! let last = &grid.rows()[4].cells[1];
//! assert_eq!(last.duration, Duration::from_secs(4));
//! assert_eq!(last.cumulative, Duration::from_secs(1 + 2 + 4 + 4 + 4));
//! # Ok::<(), backoff_table::Error>(())
//! ```
//!
//! [`Duration::MAX`]: std::time::Duration::MAX

pub mod backoff;
pub mod config;
pub mod duration;
pub mod error;
pub mod plot;
pub mod report;
pub mod sequence;
pub mod strategy;
pub mod table;

pub use backoff::{
    BackoffPolicy, BackoffStrategy, ConstantBackoff, ExponentialBackoff, FibonacciBackoff,
};
pub use config::{DEFAULT_ATTEMPTS, DEFAULT_PLOT_FILE, ReportConfig};
pub use duration::{HumanDuration, format_duration};
pub use error::{Error, Result};
pub use report::{AttemptRow, Cell, Grid, run, run_with};
pub use sequence::BackoffSequence;
pub use strategy::{Strategy, StrategySet};
pub use table::Table;
