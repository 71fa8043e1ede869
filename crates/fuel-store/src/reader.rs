//! Partitioned reads: walk the tree, attach path values, align and concatenate.

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

use polars::prelude::{Column, DataFrame, DataType, IntoColumn, NamedFrom, Series};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::error::{Result, StoreError};
use crate::file::{is_parquet, read_parquet};

/// A partition value parsed from a `key=value` path segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartitionValue {
    Int(i64),
    Text(String),
}

impl PartitionValue {
    /// All-digit values are integers; everything else is text.
    pub fn parse(raw: &str) -> Self {
        if !raw.is_empty()
            && raw.bytes().all(|b| b.is_ascii_digit())
            && let Ok(value) = raw.parse::<i64>()
        {
            return Self::Int(value);
        }
        Self::Text(raw.to_string())
    }

    fn column(&self, name: &str, height: usize) -> Column {
        match self {
            Self::Int(value) => Series::new(name.into(), vec![*value; height]).into_column(),
            Self::Text(value) => {
                Series::new(name.into(), vec![value.as_str(); height]).into_column()
            }
        }
    }
}

/// `key=value` segments of `path` relative to `root`, outermost first.
pub fn partition_values(root: &Path, path: &Path) -> Vec<(String, PartitionValue)> {
    let relative = path.strip_prefix(root).unwrap_or(path);
    let Some(parent) = relative.parent() else {
        return Vec::new();
    };
    parent
        .components()
        .filter_map(|component| match component {
            Component::Normal(segment) => segment.to_str(),
            _ => None,
        })
        .filter_map(|segment| segment.split_once('='))
        .map(|(key, value)| (key.to_string(), PartitionValue::parse(value)))
        .collect()
}

/// A partition directory holding parquet files.
#[derive(Debug, Clone, PartialEq)]
pub struct PartitionInfo {
    /// Path relative to the store root.
    pub path: PathBuf,
    pub files: usize,
    pub size_mb: f64,
}

#[derive(Debug, Clone)]
pub struct PartitionReader {
    root: PathBuf,
}

impl PartitionReader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Parquet files under the root, sorted.
    pub fn files(&self) -> Result<Vec<PathBuf>> {
        if !self.root.is_dir() {
            return Err(StoreError::RootNotFound {
                path: self.root.clone(),
            });
        }
        let mut files: Vec<PathBuf> = WalkDir::new(&self.root)
            .into_iter()
            .filter_map(std::result::Result::ok)
            .filter(|entry| entry.file_type().is_file() && is_parquet(entry.path()))
            .map(|entry| entry.path().to_path_buf())
            .collect();
        files.sort();
        Ok(files)
    }

    /// Read every file into one table. Unreadable files are skipped.
    pub fn read(&self) -> Result<DataFrame> {
        let files = self.files()?;
        let mut frames = Vec::with_capacity(files.len());
        for path in &files {
            let mut df = match read_parquet(path) {
                Ok(df) => df,
                Err(error) => {
                    warn!(path = %path.display(), %error, "skipping unreadable parquet file");
                    continue;
                }
            };
            let height = df.height();
            for (key, value) in partition_values(&self.root, path) {
                df.with_column(value.column(&key, height))?;
            }
            debug!(path = %path.display(), rows = height, "parquet file read");
            frames.push(df);
        }
        if frames.is_empty() {
            return Err(StoreError::NoData {
                path: self.root.clone(),
            });
        }
        let combined = concat_aligned(frames)?;
        info!(
            root = %self.root.display(),
            files = files.len(),
            rows = combined.height(),
            "partitioned read complete"
        );
        Ok(combined)
    }

    /// Partition directories with their file counts and sizes.
    pub fn describe(&self) -> Result<Vec<PartitionInfo>> {
        let mut partitions: BTreeMap<PathBuf, (usize, u64)> = BTreeMap::new();
        for path in self.files()? {
            let size = path.metadata().map(|meta| meta.len()).unwrap_or(0);
            let relative = path
                .parent()
                .and_then(|dir| dir.strip_prefix(&self.root).ok())
                .map(Path::to_path_buf)
                .unwrap_or_default();
            let entry = partitions.entry(relative).or_insert((0, 0));
            entry.0 += 1;
            entry.1 += size;
        }
        Ok(partitions
            .into_iter()
            .map(|(path, (files, bytes))| PartitionInfo {
                path,
                files,
                size_mb: bytes as f64 / (1024.0 * 1024.0),
            })
            .collect())
    }
}

/// Union the column sets in first-seen order, fill gaps with typed nulls and stack.
fn concat_aligned(frames: Vec<DataFrame>) -> Result<DataFrame> {
    let mut schema: Vec<(String, DataType)> = Vec::new();
    for df in &frames {
        for column in df.get_columns() {
            if !schema.iter().any(|(name, _)| name == column.name().as_str()) {
                schema.push((column.name().to_string(), column.dtype().clone()));
            }
        }
    }

    let mut combined: Option<DataFrame> = None;
    for df in frames {
        let height = df.height();
        let mut columns = Vec::with_capacity(schema.len());
        for (name, dtype) in &schema {
            let column = match df.column(name) {
                Ok(column) if column.dtype() == dtype => column.clone(),
                Ok(column) => column.cast(dtype)?,
                Err(_) => Series::full_null(name.as_str().into(), height, dtype).into_column(),
            };
            columns.push(column);
        }
        let aligned = DataFrame::new(columns)?;
        match combined.as_mut() {
            Some(existing) => {
                existing.vstack_mut(&aligned)?;
            }
            None => combined = Some(aligned),
        }
    }
    let mut combined = combined.unwrap_or_default();
    combined.align_chunks_par();
    Ok(combined)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digits_parse_as_integers() {
        assert_eq!(PartitionValue::parse("2022"), PartitionValue::Int(2022));
        assert_eq!(PartitionValue::parse("03"), PartitionValue::Int(3));
        assert_eq!(
            PartitionValue::parse("SP"),
            PartitionValue::Text("SP".to_string())
        );
        assert_eq!(
            PartitionValue::parse("-1"),
            PartitionValue::Text("-1".to_string())
        );
        assert_eq!(PartitionValue::parse(""), PartitionValue::Text(String::new()));
    }

    #[test]
    fn path_segments_are_relative_to_root() {
        let values = partition_values(
            Path::new("/lake/ano=1999"),
            Path::new("/lake/ano=1999/mes=12/x.parquet"),
        );
        assert_eq!(values, vec![("mes".to_string(), PartitionValue::Int(12))]);
    }
}
