use std::path::PathBuf;

use polars::prelude::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("partition columns not found: {}", columns.join(", "))]
    MissingPartitionColumns { columns: Vec<String> },

    #[error("partition column '{column}' has null values")]
    NullPartitionValue { column: String },

    #[error("partition column '{column}' value '{value}' is not a single path segment")]
    InvalidPartitionValue { column: String, value: String },

    #[error("store root not found: {}", path.display())]
    RootNotFound { path: PathBuf },

    #[error("no readable parquet files under {}", path.display())]
    NoData { path: PathBuf },

    #[error("failed to {operation} {}", path.display())]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("dataframe operation failed: {0}")]
    Polars(#[from] PolarsError),
}

impl StoreError {
    pub(crate) fn io(operation: &'static str, path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io {
            operation,
            path,
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
