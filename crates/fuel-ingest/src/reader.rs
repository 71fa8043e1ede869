//! Raw CSV loading and schema checks.

use std::path::{Path, PathBuf};

use polars::prelude::{CsvReadOptions, DataFrame, SerReader};
use tracing::{info, warn};

use fuel_common::missing_columns;
use fuel_model::columns::REQUIRED_RAW_COLUMNS;

use crate::error::{IngestError, Result};

/// Read a raw survey file with every column as String. Empty cells are null.
pub fn read_raw_csv(path: &Path) -> Result<DataFrame> {
    if !path.is_file() {
        return Err(IngestError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
        .finish()
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
    info!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "raw file loaded"
    );
    Ok(df)
}

/// Fail when any required raw column is absent.
pub fn validate_raw_schema(df: &DataFrame) -> Result<()> {
    let missing = missing_columns(df, &REQUIRED_RAW_COLUMNS);
    if missing.is_empty() {
        return Ok(());
    }
    warn!(missing = ?missing, "raw schema is missing required columns");
    Err(IngestError::Schema { missing })
}

/// `*.csv` files directly inside `dir`, sorted.
pub fn list_raw_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }
    let read_error = |source: std::io::Error| IngestError::DirectoryRead {
        path: dir.to_path_buf(),
        source,
    };
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(read_error)? {
        let path = entry.map_err(read_error)?.path();
        if path.is_file() && is_csv(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn is_csv(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}
