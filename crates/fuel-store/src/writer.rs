//! Partitioned writes: one directory per distinct partition tuple.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use polars::prelude::DataFrame;
use tracing::{debug, info, warn};

use fuel_common::{any_to_string, filter_rows, is_missing, missing_columns};

use crate::error::{Result, StoreError};
use crate::file::{timestamped_path, write_parquet};

const STAGING_EXTENSION: &str = "parquet.partial";

/// Files and directories produced by one partitioned write.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WriteSummary {
    pub rows_written: usize,
    /// Partition directories, in write order.
    pub partitions: Vec<PathBuf>,
    pub files: Vec<PathBuf>,
}

impl WriteSummary {
    pub fn partition_count(&self) -> usize {
        self.partitions.len()
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }
}

#[derive(Debug, Clone)]
pub struct PartitionWriter {
    root: PathBuf,
    prefix: String,
}

impl PartitionWriter {
    pub fn new(root: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            prefix: prefix.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write `df` partitioned by `partition_columns`. Returns false, having
    /// written nothing, when a partition column is missing, holds nulls or
    /// holds a value that is not a single path segment.
    pub fn write<S: AsRef<str>>(&self, df: &DataFrame, partition_columns: &[S]) -> bool {
        match self.try_write(df, partition_columns) {
            Ok(_) => true,
            Err(error) => {
                warn!(root = %self.root.display(), %error, "partitioned write failed");
                false
            }
        }
    }

    pub fn try_write<S: AsRef<str>>(
        &self,
        df: &DataFrame,
        partition_columns: &[S],
    ) -> Result<WriteSummary> {
        let missing = missing_columns(df, partition_columns);
        if !missing.is_empty() {
            return Err(StoreError::MissingPartitionColumns { columns: missing });
        }
        let names: Vec<&str> = partition_columns.iter().map(AsRef::as_ref).collect();
        let groups = group_rows(df, &names)?;

        let payload_columns: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .filter(|name| !names.contains(&name.as_str()))
            .collect();

        // Groups are staged under a temporary extension and renamed into place
        // only after every group is written.
        let mut summary = WriteSummary::default();
        let mut staged = Vec::with_capacity(groups.len());
        for (values, keep) in groups {
            let dir = partition_dir(&self.root, &names, &values);
            let path = timestamped_path(&dir, &self.prefix);
            let staging = path.with_extension(STAGING_EXTENSION);
            let written = fs::create_dir_all(&dir)
                .map_err(StoreError::io("create directory", &dir))
                .and_then(|()| {
                    let mut group =
                        filter_rows(df, &keep)?.select(payload_columns.iter().map(String::as_str))?;
                    write_parquet(&mut group, &staging)?;
                    Ok(group.height())
                });
            let rows = match written {
                Ok(rows) => rows,
                Err(error) => {
                    discard(staged.iter().map(|(staging, _)| staging).chain([&staging]));
                    return Err(error);
                }
            };
            staged.push((staging, path.clone()));
            summary.rows_written += rows;
            summary.partitions.push(dir);
            summary.files.push(path);
        }
        for (idx, (staging, path)) in staged.iter().enumerate() {
            if let Err(source) = fs::rename(staging, path) {
                discard(staged[idx..].iter().map(|(staging, _)| staging));
                discard(&summary.files[..idx]);
                return Err(StoreError::Io {
                    operation: "rename",
                    path: staging.clone(),
                    source,
                });
            }
            debug!(path = %path.display(), "partition written");
        }
        info!(
            root = %self.root.display(),
            rows = summary.rows_written,
            partitions = summary.partition_count(),
            "partitioned write complete"
        );
        Ok(summary)
    }
}

/// Row masks keyed by the rendered partition tuple, in sorted order.
///
/// Every key cell must be present and render to a single path segment, so
/// the value can be read back from the directory name.
fn group_rows(df: &DataFrame, names: &[&str]) -> Result<BTreeMap<Vec<String>, Vec<bool>>> {
    let mut columns = Vec::with_capacity(names.len());
    for name in names {
        let column = df.column(name)?;
        let mut values = Vec::with_capacity(df.height());
        for idx in 0..df.height() {
            let cell = column.get(idx)?;
            if is_missing(&cell) {
                return Err(StoreError::NullPartitionValue {
                    column: (*name).to_string(),
                });
            }
            let value = any_to_string(cell);
            if !is_path_segment(&value) {
                return Err(StoreError::InvalidPartitionValue {
                    column: (*name).to_string(),
                    value,
                });
            }
            values.push(value);
        }
        columns.push(values);
    }
    let mut groups: BTreeMap<Vec<String>, Vec<bool>> = BTreeMap::new();
    for idx in 0..df.height() {
        let key: Vec<String> = columns.iter().map(|values| values[idx].clone()).collect();
        groups
            .entry(key)
            .or_insert_with(|| vec![false; df.height()])[idx] = true;
    }
    Ok(groups)
}

fn is_path_segment(value: &str) -> bool {
    !matches!(value, "." | "..") && !value.contains(['/', '\\'])
}

/// Best-effort removal of files left by a failed write.
fn discard<'p>(paths: impl IntoIterator<Item = &'p PathBuf>) {
    for path in paths {
        if let Err(error) = fs::remove_file(path)
            && error.kind() != std::io::ErrorKind::NotFound
        {
            warn!(path = %path.display(), %error, "could not remove partial output");
        }
    }
}

fn partition_dir(root: &Path, names: &[&str], values: &[String]) -> PathBuf {
    names
        .iter()
        .zip(values)
        .fold(root.to_path_buf(), |dir, (name, value)| {
            dir.join(format!("{name}={value}"))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partition_dir_nests_segments() {
        let dir = partition_dir(
            Path::new("lake"),
            &["ano", "mes"],
            &["2022".to_string(), "3".to_string()],
        );
        assert_eq!(dir, Path::new("lake/ano=2022/mes=3"));
    }
}
