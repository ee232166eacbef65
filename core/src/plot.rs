//! Space-separated plot data.
//!
//! The file starts with a `# Format:` comment naming the columns, followed by
//! one line per attempt holding the attempt index and each strategy's
//! cumulative delay in whole seconds:
//!
//! ```text
//! # Format: Attempts Linear Retry
//! 0 3600
//! 1 7200
//! 2 10800
//! ```

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use tracing::info;

use crate::error::{Error, Result};
use crate::report::{ATTEMPTS_LABEL, Grid};

/// Prefix of the header line.
pub const FORMAT_PREFIX: &str = "# Format:";

/// Write the plot data for `grid` to `writer`.
pub fn write_plot<W: Write>(grid: &Grid, writer: &mut W) -> io::Result<()> {
    write!(writer, "{FORMAT_PREFIX} {ATTEMPTS_LABEL}")?;
    for name in grid.names() {
        write!(writer, " {name}")?;
    }
    writeln!(writer)?;

    for row in grid.rows() {
        write!(writer, "{}", row.attempt)?;
        for cell in &row.cells {
            write!(writer, " {}", cell.cumulative.as_secs())?;
        }
        writeln!(writer)?;
    }

    Ok(())
}

/// Create (or truncate) the file at `path` and write the plot data to it.
pub fn write_plot_file(grid: &Grid, path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|source| Error::CreatePlotFile {
        path: path.to_path_buf(),
        source,
    })?;

    let mut writer = BufWriter::new(file);
    write_plot(grid, &mut writer)
        .and_then(|()| writer.flush())
        .map_err(|source| Error::WritePlotFile {
            path: path.to_path_buf(),
            source,
        })?;

    info!(path = %path.display(), lines = grid.rows().len() + 1, "wrote plot file");
    Ok(())
}
