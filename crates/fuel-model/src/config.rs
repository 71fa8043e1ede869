//! Pipeline configuration.
//!
//! Built once at process start (defaults, then an optional TOML file, then
//! command-line overrides) and passed by reference to every job.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub lake: LakeConfig,
    pub source: SourceConfig,
    pub quality: QualityConfig,
    pub analytics: AnalyticsConfig,
}

impl PipelineConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        toml::from_str(raw).map_err(|source| ConfigError::Parse {
            message: source.to_string(),
        })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            message: format!("{}: {source}", path.display()),
        })
    }

    #[must_use]
    pub fn with_lake_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.lake.root = root.into();
        self
    }
}

/// Storage layout of the lake.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LakeConfig {
    pub root: PathBuf,
    pub partition_columns: Vec<String>,
}

impl Default for LakeConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("data"),
            partition_columns: vec!["ano".to_string(), "mes".to_string()],
        }
    }
}

impl LakeConfig {
    pub fn transient_dir(&self) -> PathBuf {
        self.root.join("transient")
    }

    pub fn bronze_dir(&self) -> PathBuf {
        self.root.join("bronze")
    }

    pub fn silver_dir(&self) -> PathBuf {
        self.root.join("silver")
    }

    pub fn gold_dir(&self) -> PathBuf {
        self.root.join("gold")
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.root.join("logs")
    }
}

/// Synthetic source generation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub default_records: usize,
    pub seed: u64,
    pub start_year: i32,
    pub end_year: i32,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            default_records: 50_000,
            seed: 42,
            start_year: 2020,
            end_year: 2024,
        }
    }
}

/// Thresholds and vocabularies used to score quality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityConfig {
    pub min_quality_score: f64,
    pub max_null_percentage: f64,
    pub valid_produtos: Vec<String>,
    pub valid_regioes: Vec<String>,
    pub min_preco: f64,
    pub max_preco: f64,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            min_quality_score: 0.8,
            max_null_percentage: 0.1,
            valid_produtos: [
                "GASOLINA COMUM",
                "GASOLINA ADITIVADA",
                "ETANOL",
                "ÓLEO DIESEL",
                "ÓLEO DIESEL S10",
                "GNV",
                "GLP",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            valid_regioes: ["NORTE", "NORDESTE", "CENTRO-OESTE", "SUDESTE", "SUL"]
                .into_iter()
                .map(String::from)
                .collect(),
            min_preco: 0.1,
            max_preco: 15.0,
        }
    }
}

/// Business parameters for enrichment and gold analytics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    pub ethanol_viability_threshold: f64,
    pub major_brands: Vec<String>,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            ethanol_viability_threshold: 0.7,
            major_brands: ["PETROBRAS", "SHELL", "IPIRANGA", "RAIZEN", "ALESAT"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}
