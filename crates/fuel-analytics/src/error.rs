use polars::prelude::PolarsError;
use thiserror::Error;

use crate::table::Category;

#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// The silver table lacks columns a category aggregates over.
    #[error("{category} analytics require missing columns: {}", missing.join(", "))]
    MissingColumns {
        category: Category,
        missing: Vec<String>,
    },

    #[error("dataframe operation failed: {0}")]
    Polars(#[from] PolarsError),
}

pub type Result<T> = std::result::Result<T, AnalyticsError>;
