//! Raw survey ingestion.
//!
//! This crate loads raw fuel price CSV files (every column as text), checks
//! them against the required raw schema, and produces synthetic survey data
//! for runs without an input file.

pub mod error;
pub mod reader;
pub mod sample;
pub mod writer;

pub use error::{IngestError, Result};
pub use reader::{list_raw_files, read_raw_csv, validate_raw_schema};
pub use sample::{RawRecord, generate_sample};
pub use writer::write_raw_csv;
