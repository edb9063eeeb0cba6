use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("input line {line} is not valid UTF-8")]
    InvalidUtf8 { line: usize },

    #[error("JSON rendering failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV rendering failed: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
