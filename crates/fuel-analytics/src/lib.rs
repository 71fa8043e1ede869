//! Gold-layer analytics over the silver fuel price table.
//!
//! Each category produces a set of named tables:
//!
//! - **temporal**: monthly evolution, seasonality, yearly trends, volatility
//! - **regional**: state ranking, regional classification, regional disparity
//! - **competitive**: brand market share, price positioning, major brands
//! - **product**: ethanol viability, diesel grades, categories, elasticity

pub mod aggregate;
pub mod competitive;
pub mod error;
pub mod product;
pub mod regional;
pub mod stats;
pub mod table;
pub mod temporal;

use polars::prelude::DataFrame;
use tracing::{debug, info};

use fuel_model::AnalyticsConfig;

pub use error::{AnalyticsError, Result};
pub use table::{AnalyticsTable, Category};

/// Every analytics table, grouped by category in [`Category::ALL`] order.
pub fn gold_tables(df: &DataFrame, config: &AnalyticsConfig) -> Result<Vec<AnalyticsTable>> {
    let mut tables = Vec::new();
    for category in Category::ALL {
        let produced = match category {
            Category::Temporal => temporal::temporal_tables(df)?,
            Category::Regional => regional::regional_tables(df)?,
            Category::Competitive => competitive::competitive_tables(df, &config.major_brands)?,
            Category::Product => {
                product::product_tables(df, config.ethanol_viability_threshold)?
            }
        };
        for table in &produced {
            debug!(category = %category, table = table.name, rows = table.height(), "table built");
        }
        info!(category = %category, tables = produced.len(), "analytics generated");
        tables.extend(produced);
    }
    Ok(tables)
}
