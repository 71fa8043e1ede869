use std::fmt;

use polars::prelude::DataFrame;
use serde::Serialize;

/// Grouping of gold tables; also the directory each table is written under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Temporal,
    Regional,
    Competitive,
    Product,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Temporal,
        Category::Regional,
        Category::Competitive,
        Category::Product,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Temporal => "temporal",
            Category::Regional => "regional",
            Category::Competitive => "competitive",
            Category::Product => "product",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One named analytics table.
#[derive(Debug, Clone)]
pub struct AnalyticsTable {
    pub category: Category,
    pub name: &'static str,
    pub data: DataFrame,
}

impl AnalyticsTable {
    pub fn new(category: Category, name: &'static str, data: DataFrame) -> Self {
        Self {
            category,
            name,
            data,
        }
    }

    pub fn height(&self) -> usize {
        self.data.height()
    }
}
