use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::{IngestError, Result};
use crate::sample::RawRecord;

/// Write records as a headed CSV, creating parent directories as needed.
pub fn write_raw_csv(path: &Path, records: &[RawRecord]) -> Result<()> {
    let to_error = |source: csv::Error| IngestError::CsvWrite {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| to_error(e.into()))?;
    }
    let mut writer = csv::Writer::from_path(path).map_err(to_error)?;
    for record in records {
        writer.serialize(record).map_err(to_error)?;
    }
    writer.flush().map_err(|e| to_error(e.into()))?;
    info!(path = %path.display(), records = records.len(), "raw CSV written");
    Ok(())
}
