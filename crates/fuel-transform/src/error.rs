use polars::prelude::PolarsError;
use thiserror::Error;

use crate::stage::Stage;

#[derive(Debug, Error)]
pub enum TransformError {
    /// A stage ran without the columns it derives from.
    #[error("{stage} stage requires missing columns: {}", missing.join(", "))]
    Precondition { stage: Stage, missing: Vec<String> },

    /// Every row was dropped.
    #[error("{stage} stage left no valid rows")]
    NoValidRows { stage: Stage },

    #[error("dataframe operation failed: {0}")]
    Polars(#[from] PolarsError),
}

pub type Result<T> = std::result::Result<T, TransformError>;
