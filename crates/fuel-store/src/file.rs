//! Parquet file naming and single-file IO.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use chrono::Local;
use polars::prelude::{DataFrame, ParquetCompression, ParquetReader, ParquetWriter, SerReader};

use crate::error::{Result, StoreError};

pub const PARQUET_EXTENSION: &str = "parquet";

/// `{prefix}_{YYYYmmdd_HHMMSS_micro}.parquet` inside `dir`, with a numeric
/// suffix when that name is already taken.
pub fn timestamped_path(dir: &Path, prefix: &str) -> PathBuf {
    let stamp = Local::now().format("%Y%m%d_%H%M%S_%6f");
    let base = format!("{prefix}_{stamp}");
    let mut path = dir.join(format!("{base}.{PARQUET_EXTENSION}"));
    let mut suffix = 1;
    while path.exists() {
        path = dir.join(format!("{base}_{suffix}.{PARQUET_EXTENSION}"));
        suffix += 1;
    }
    path
}

pub fn write_parquet(df: &mut DataFrame, path: &Path) -> Result<()> {
    let file = File::create(path).map_err(StoreError::io("create", path))?;
    ParquetWriter::new(file)
        .with_compression(ParquetCompression::Snappy)
        .finish(df)?;
    Ok(())
}

pub fn read_parquet(path: &Path) -> Result<DataFrame> {
    let file = File::open(path).map_err(StoreError::io("open", path))?;
    Ok(ParquetReader::new(file).finish()?)
}

/// Write one unpartitioned table as `dir/{name}_{timestamp}.parquet`.
pub fn write_table(df: &DataFrame, dir: &Path, name: &str) -> Result<PathBuf> {
    fs::create_dir_all(dir).map_err(StoreError::io("create directory", dir))?;
    let path = timestamped_path(dir, name);
    let mut df = df.clone();
    write_parquet(&mut df, &path)?;
    Ok(path)
}

pub fn is_parquet(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(PARQUET_EXTENSION))
}
