use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OutlookError {
    #[error("data file not found at {}", path.display())]
    MissingDataFile { path: PathBuf },

    #[error("failed to read outlook spreadsheet {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

pub type Result<T> = std::result::Result<T, OutlookError>;
