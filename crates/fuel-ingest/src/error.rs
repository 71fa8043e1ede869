use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("directory not found: {}", path.display())]
    DirectoryNotFound { path: PathBuf },

    #[error("CSV file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("failed to read directory {}: {source}", path.display())]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Polars could not open or parse the file.
    #[error("failed to parse CSV {}: {message}", path.display())]
    CsvParse { path: PathBuf, message: String },

    #[error("failed to write CSV {}: {source}", path.display())]
    CsvWrite {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Required raw columns are absent.
    #[error("invalid raw schema, missing columns: {}", missing.join(", "))]
    Schema { missing: Vec<String> },
}

pub type Result<T> = std::result::Result<T, IngestError>;
