//! Errors raised while sampling strategies or writing the report.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("strategy '{strategy}' ran out of retries at attempt {attempt}")]
    BackoffExhausted { strategy: String, attempt: usize },

    #[error("failed to create plot file {}: {source}", path.display())]
    CreatePlotFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write plot file {}: {source}", path.display())]
    WritePlotFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write table: {0}")]
    Output(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
